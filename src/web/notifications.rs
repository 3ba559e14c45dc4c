use crate::domain::models::Notification;
use crate::state::SharedState;
use crate::web::require_user;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use uuid::Uuid;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(list))
        .route("/:id", delete(dismiss))
        .with_state(state)
}

async fn list(State(state): State<SharedState>) -> Result<Json<Vec<Notification>>, StatusCode> {
    let doc = state.store.snapshot().await;
    require_user(&doc)?;
    Ok(Json(doc.notifications))
}

/// Early dismissal by id; anything left over expires on its own.
async fn dismiss(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    require_user(&state.store.snapshot().await)?;
    state.store.remove_notification(id).await;
    Ok(StatusCode::NO_CONTENT)
}
