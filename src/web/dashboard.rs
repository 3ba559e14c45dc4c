use crate::domain::models::{BlockState, Company, OrgKind};
use crate::domain::progress;
use crate::state::SharedState;
use crate::web::{blocks::BlockOverview, require_user};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

pub fn router(state: SharedState) -> Router {
    Router::new().route("/", get(dashboard)).with_state(state)
}

#[derive(Debug, Serialize)]
pub struct DashboardPayload {
    /// Arithmetic mean of the five stored block percentages.
    pub overall_progress: u8,
    pub documents_completion: u8,
    pub completed_blocks: usize,
    pub blocks: Vec<BlockOverview>,
    pub organization_kind: Option<OrgKind>,
    pub active_company: Option<Company>,
}

async fn dashboard(
    State(state): State<SharedState>,
) -> Result<Json<DashboardPayload>, StatusCode> {
    let doc = state.store.snapshot().await;
    let user = require_user(&doc)?;
    // The dashboard view only exists once onboarding has finished.
    if !doc.onboarding_complete {
        return Err(StatusCode::CONFLICT);
    }

    let blocks: Vec<BlockOverview> = crate::domain::models::BlockId::ALL
        .iter()
        .map(|id| {
            let status = doc.block(*id);
            BlockOverview {
                id: id.number(),
                title: id.title(),
                state: status.state,
                progress: status.progress,
                accessible: user.can_access_block(*id),
            }
        })
        .collect();

    Ok(Json(DashboardPayload {
        overall_progress: progress::overall_progress(&doc),
        documents_completion: progress::documents_completion(&doc),
        completed_blocks: doc
            .blocks
            .iter()
            .filter(|b| b.state == BlockState::Completed)
            .count(),
        blocks,
        organization_kind: doc.organization.as_ref().map(|o| o.kind),
        active_company: doc.active_company.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access;
    use crate::domain::models::{BlockId, Role};
    use crate::web::testutil;
    use std::sync::Arc;
    use uuid::Uuid;

    #[tokio::test]
    async fn dashboard_requires_completed_onboarding() {
        let dir = tempfile::tempdir().unwrap();
        let state = testutil::shared_state(&dir, Arc::new(testutil::FixedTranscriber("")));
        state.store.login(Role::Owner).await;
        let err = dashboard(State(state)).await.unwrap_err();
        assert_eq!(err, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn aggregate_is_the_mean_of_block_progress() {
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
            .register_owner(access::demo_user(Role::Owner), OrgKind::Single, vec![company])
            .await;
        for (id, progress) in BlockId::ALL.into_iter().zip([10u8, 20, 30, 40, 100]) {
            state.store.update_block_progress(id, progress, None).await;
        }

        let Json(payload) = dashboard(State(state)).await.unwrap();
        assert_eq!(payload.overall_progress, 40);
        assert_eq!(payload.completed_blocks, 1);
        assert_eq!(payload.active_company.unwrap().name, "Wallnut");
    }
}
