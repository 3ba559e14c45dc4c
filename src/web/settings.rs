use crate::domain::models::{AppDocument, Role};
use crate::state::SharedState;
use crate::store::CompanyPatch;
use crate::web::require_user;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use uuid::Uuid;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/company/:id", put(update_company))
        .route("/reset", post(reset))
        .with_state(state)
}

fn require_owner(doc: &AppDocument) -> Result<(), StatusCode> {
    let user = require_user(doc)?;
    if user.role == Role::Owner {
        Ok(())
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

async fn update_company(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CompanyPatch>,
) -> Result<Json<AppDocument>, StatusCode> {
    let doc = state.store.snapshot().await;
    require_owner(&doc)?;
    let known = doc
        .organization
        .as_ref()
        .is_some_and(|org| org.companies.iter().any(|c| c.id == id));
    if !known {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(state.store.update_company(id, patch).await))
}

/// Destructive full reset of the workspace. Any confirmation dialog is the
/// client's concern; the endpoint itself does not ask twice.
async fn reset(State(state): State<SharedState>) -> Result<Json<AppDocument>, StatusCode> {
    require_owner(&state.store.snapshot().await)?;
    Ok(Json(state.store.reset().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access;
    use crate::domain::models::{Company, OrgKind};
    use crate::web::testutil;
    use std::sync::Arc;

    #[tokio::test]
    async fn reset_is_owner_only() {
        let dir = tempfile::tempdir().unwrap();
        let state = testutil::shared_state(&dir, Arc::new(testutil::FixedTranscriber("")));
        state.store.login(Role::Advisor).await;
        let err = reset(State(state)).await.unwrap_err();
        assert_eq!(err, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn reset_returns_the_initial_document() {
        let dir = tempfile::tempdir().unwrap();
        let state = testutil::shared_state(&dir, Arc::new(testutil::FixedTranscriber("")));
        state.store.login(Role::Owner).await;
        state.store.upload_document("statuto", "statuto.pdf".into()).await;
        let Json(doc) = reset(State(state)).await.unwrap();
        assert_eq!(doc, AppDocument::default());
    }

    #[tokio::test]
    async fn company_updates_require_a_known_company() {
        let dir = tempfile::tempdir().unwrap();
        let state = testutil::shared_state(&dir, Arc::new(testutil::FixedTranscriber("")));
        let company = Company {
            id: Uuid::new_v4(),
            name: "Wallnut".into(),
            vat_id: "IT01234567890".into(),
            logo: None,
            sector: "servizi".into(),
            legal_form: "srl".into(),
            employee_count: None,
            is_main: true,
        };
        state
            .store
            .register_owner(
                access::demo_user(Role::Owner),
                OrgKind::Single,
                vec![company.clone()],
            )
            .await;

        let err = update_company(
            State(state.clone()),
            Path(Uuid::new_v4()),
            Json(CompanyPatch::default()),
        )
        .await
        .unwrap_err();
        assert_eq!(err, StatusCode::NOT_FOUND);

        let Json(doc) = update_company(
            State(state),
            Path(company.id),
            Json(CompanyPatch {
                sector: Some("manifatturiero".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            doc.organization.as_ref().unwrap().companies[0].sector,
            "manifatturiero"
        );
    }
}
