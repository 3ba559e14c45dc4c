use crate::domain::models::{Role, User};
use crate::state::SharedState;
use crate::web::require_user;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub role: Role,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .with_state(state)
}

/// Demo login: the role picks a fixed identity and permission set; there
/// is no credential check in this workspace.
async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<User>, StatusCode> {
    let doc = state.store.login(payload.role).await;
    doc.user.map(Json).ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn logout(State(state): State<SharedState>) -> StatusCode {
    state.store.logout().await;
    StatusCode::NO_CONTENT
}

async fn me(State(state): State<SharedState>) -> Result<Json<User>, StatusCode> {
    let doc = state.store.snapshot().await;
    let user = require_user(&doc)?;
    Ok(Json(user.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::testutil;
    use std::sync::Arc;

    #[tokio::test]
    async fn login_then_me_returns_the_demo_identity() {
        let dir = tempfile::tempdir().unwrap();
        let state = testutil::shared_state(&dir, Arc::new(testutil::FixedTranscriber("")));

        let Json(user) = login(
            State(state.clone()),
            Json(LoginRequest { role: Role::Delegate }),
        )
        .await
        .unwrap();
        assert_eq!(user.role, Role::Delegate);

        let Json(current) = me(State(state.clone())).await.unwrap();
        assert_eq!(current.name, user.name);

        assert_eq!(logout(State(state.clone())).await, StatusCode::NO_CONTENT);
        assert_eq!(
            me(State(state)).await.unwrap_err(),
            StatusCode::UNAUTHORIZED
        );
    }
}
