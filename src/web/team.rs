use crate::domain::models::{AppDocument, Area, Contact, Department, TeamMember};
use crate::state::SharedState;
use crate::web::{require_team_access, require_user};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(list_departments))
        .route("/:department_id/delegate", put(set_delegate))
        .route("/:department_id/members", post(add_member))
        .route("/:department_id/members/:member_id", delete(remove_member))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct DepartmentRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub area: Area,
    pub area_label: &'static str,
    pub delegate: Option<Contact>,
    pub members: Vec<TeamMember>,
}

async fn list_departments(
    State(state): State<SharedState>,
) -> Result<Json<Vec<DepartmentRow>>, StatusCode> {
    let doc = state.store.snapshot().await;
    require_user(&doc)?;
    let rows = doc
        .organization
        .as_ref()
        .map(|org| {
            org.departments
                .iter()
                .map(|d| DepartmentRow {
                    id: d.id,
                    company_id: d.company_id,
                    area: d.area,
                    area_label: d.area.label(),
                    delegate: d.delegate.clone(),
                    members: d.members.clone(),
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(Json(rows))
}

fn checked_department(doc: &AppDocument, department_id: Uuid) -> Result<Area, StatusCode> {
    let dept: &Department = doc
        .organization
        .as_ref()
        .and_then(|org| org.departments.iter().find(|d| d.id == department_id))
        .ok_or(StatusCode::NOT_FOUND)?;
    let user = require_user(doc)?;
    require_team_access(user, dept.area)?;
    Ok(dept.area)
}

#[derive(Deserialize)]
pub struct DelegateRequest {
    /// Omitted or null clears the delegate.
    #[serde(default)]
    pub delegate: Option<Contact>,
}

async fn set_delegate(
    State(state): State<SharedState>,
    Path(department_id): Path<Uuid>,
    Json(payload): Json<DelegateRequest>,
) -> Result<Json<AppDocument>, StatusCode> {
    checked_department(&state.store.snapshot().await, department_id)?;
    Ok(Json(
        state
            .store
            .set_department_delegate(department_id, payload.delegate)
            .await,
    ))
}

#[derive(Deserialize)]
pub struct MemberRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role_title: String,
}

async fn add_member(
    State(state): State<SharedState>,
    Path(department_id): Path<Uuid>,
    Json(payload): Json<MemberRequest>,
) -> Result<Json<AppDocument>, StatusCode> {
    checked_department(&state.store.snapshot().await, department_id)?;
    let member = TeamMember {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email,
        role_title: payload.role_title,
    };
    Ok(Json(state.store.add_team_member(department_id, member).await))
}

async fn remove_member(
    State(state): State<SharedState>,
    Path((department_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AppDocument>, StatusCode> {
    checked_department(&state.store.snapshot().await, department_id)?;
    Ok(Json(
        state.store.remove_team_member(department_id, member_id).await,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access;
    use crate::domain::models::{Company, OrgKind, Role};
    use crate::web::testutil;
    use std::sync::Arc;

    async fn registered_state(dir: &tempfile::TempDir) -> crate::state::SharedState {
        let state = testutil::shared_state(dir, Arc::new(testutil::FixedTranscriber("")));
        let company = Company {
            id: Uuid::new_v4(),
            name: "Wallnut".into(),
            vat_id: "IT01234567890".into(),
            logo: None,
            sector: "servizi".into(),
            legal_form: "srl".into(),
            employee_count: Some(8),
            is_main: true,
        };
        state
            .store
            .register_owner(access::demo_user(Role::Owner), OrgKind::Single, vec![company])
            .await;
        state
    }

    #[tokio::test]
    async fn departments_list_is_empty_before_registration() {
        let dir = tempfile::tempdir().unwrap();
        let state = testutil::shared_state(&dir, Arc::new(testutil::FixedTranscriber("")));
        state.store.login(Role::Owner).await;
        let Json(rows) = list_departments(State(state)).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn owner_manages_delegates_and_members() {
        let dir = tempfile::tempdir().unwrap();
        let state = registered_state(&dir).await;
        let Json(rows) = list_departments(State(state.clone())).await.unwrap();
        assert_eq!(rows.len(), 6);
        let dept_id = rows[0].id;

        let Json(doc) = set_delegate(
            State(state.clone()),
            Path(dept_id),
            Json(DelegateRequest {
                delegate: Some(Contact {
                    name: "Paola Conti".into(),
                    email: "paola@wallnut.it".into(),
                }),
            }),
        )
        .await
        .unwrap();
        let dept = &doc.organization.as_ref().unwrap().departments[0];
        assert_eq!(dept.delegate.as_ref().unwrap().name, "Paola Conti");

        let Json(doc) = add_member(
            State(state.clone()),
            Path(dept_id),
            Json(MemberRequest {
                name: "Sara Galli".into(),
                email: "sara@wallnut.it".into(),
                role_title: "Controller".into(),
            }),
        )
        .await
        .unwrap();
        let member_id = doc.organization.as_ref().unwrap().departments[0].members[0].id;

        let Json(doc) = remove_member(State(state), Path((dept_id, member_id)))
            .await
            .unwrap();
        assert!(doc.organization.as_ref().unwrap().departments[0]
            .members
            .is_empty());
    }

    #[tokio::test]
    async fn employee_cannot_manage_the_team() {
        let dir = tempfile::tempdir().unwrap();
        let state = registered_state(&dir).await;
        let Json(rows) = list_departments(State(state.clone())).await.unwrap();
        let dept_id = rows[0].id;

        state.store.login(Role::Employee).await;
        let err = set_delegate(
            State(state),
            Path(dept_id),
            Json(DelegateRequest { delegate: None }),
        )
        .await
        .unwrap_err();
        assert_eq!(err, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_department_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = registered_state(&dir).await;
        let err = add_member(
            State(state),
            Path(Uuid::new_v4()),
            Json(MemberRequest {
                name: "Nessuno".into(),
                email: "nessuno@wallnut.it".into(),
                role_title: String::new(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err, StatusCode::NOT_FOUND);
    }
}
