use crate::domain::models::{AppDocument, BlockId, Company, OrgKind, Role, User};
use crate::state::SharedState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct CompanyDraft {
    pub name: String,
    pub vat_id: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub legal_form: String,
    #[serde(default)]
    pub employee_count: Option<u32>,
    pub is_main: bool,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub owner_name: String,
    pub structure: OrgKind,
    pub companies: Vec<CompanyDraft>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/register", post(register))
        .with_state(state)
}

/// Completes the registration wizard. The store precondition lives here:
/// at least one company, exactly one flagged as main.
async fn register(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AppDocument>, StatusCode> {
    if payload.companies.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    if payload.companies.iter().filter(|c| c.is_main).count() != 1 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let companies: Vec<Company> = payload
        .companies
        .into_iter()
        .map(|draft| Company {
            id: Uuid::new_v4(),
            name: draft.name,
            vat_id: draft.vat_id,
            logo: draft.logo,
            sector: draft.sector,
            legal_form: draft.legal_form,
            employee_count: draft.employee_count,
            is_main: draft.is_main,
        })
        .collect();

    let owner = User {
        id: Uuid::new_v4(),
        name: payload.owner_name,
        role: Role::Owner,
        department: None,
        assigned_blocks: BlockId::ALL.to_vec(),
    };

    let doc = state
        .store
        .register_owner(owner, payload.structure, companies)
        .await;
    Ok(Json(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::testutil;
    use std::sync::Arc;

    fn draft(name: &str, is_main: bool) -> CompanyDraft {
        CompanyDraft {
            name: name.into(),
            vat_id: "IT09876543210".into(),
            logo: None,
            sector: "servizi".into(),
            legal_form: "srl".into(),
            employee_count: Some(12),
            is_main,
        }
    }

    #[tokio::test]
    async fn rejects_an_empty_company_list() {
        let dir = tempfile::tempdir().unwrap();
        let state = testutil::shared_state(&dir, Arc::new(testutil::FixedTranscriber("")));
        let err = register(
            State(state),
            Json(RegisterRequest {
                owner_name: "Anna Viola".into(),
                structure: OrgKind::Single,
                companies: vec![],
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_two_main_companies() {
        let dir = tempfile::tempdir().unwrap();
        let state = testutil::shared_state(&dir, Arc::new(testutil::FixedTranscriber("")));
        let err = register(
            State(state),
            Json(RegisterRequest {
                owner_name: "Anna Viola".into(),
                structure: OrgKind::Group,
                companies: vec![draft("Prima", true), draft("Seconda", true)],
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn registers_a_group_and_unlocks_the_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let state = testutil::shared_state(&dir, Arc::new(testutil::FixedTranscriber("")));
        let Json(doc) = register(
            State(state),
            Json(RegisterRequest {
                owner_name: "Anna Viola".into(),
                structure: OrgKind::Group,
                companies: vec![draft("Capogruppo", true), draft("Controllata", false)],
            }),
        )
        .await
        .unwrap();

        assert!(doc.onboarding_complete);
        assert_eq!(doc.user.as_ref().unwrap().role, Role::Owner);
        assert_eq!(doc.organization.as_ref().unwrap().departments.len(), 12);
        assert_eq!(doc.active_company.as_ref().unwrap().name, "Capogruppo");
    }
}
