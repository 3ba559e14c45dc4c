pub mod auth;
pub mod blocks;
pub mod dashboard;
pub mod documents;
pub mod notifications;
pub mod onboarding;
pub mod settings;
pub mod team;

use crate::domain::models::{AppDocument, Area, BlockId, Role, User};
use crate::state::SharedState;
use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

async fn health() -> &'static str {
    "OK"
}

#[derive(Serialize)]
struct AppInfo {
    name: &'static str,
    version: &'static str,
}

async fn info() -> Json<AppInfo> {
    Json(AppInfo {
        name: "Wallnut",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .nest("/auth", auth::router(state.clone()))
        .nest("/onboarding", onboarding::router(state.clone()))
        .nest("/blocks", blocks::router(state.clone()))
        .nest("/documents", documents::router(state.clone()))
        .nest("/team", team::router(state.clone()))
        .nest("/dashboard", dashboard::router(state.clone()))
        .nest("/settings", settings::router(state.clone()))
        .nest("/notifications", notifications::router(state))
}

/// Every view past login requires a user in the snapshot.
pub(crate) fn require_user(doc: &AppDocument) -> Result<&User, StatusCode> {
    doc.user.as_ref().ok_or(StatusCode::UNAUTHORIZED)
}

/// The access-denied branch for block editors: a role without the block in
/// its assignment sees 403, never a store-level error.
pub(crate) fn require_block_access(user: &User, block: BlockId) -> Result<(), StatusCode> {
    if user.can_access_block(block) {
        Ok(())
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

/// Department-scoped roles only act on documents of their own area.
pub(crate) fn require_area_access(user: &User, area: Area) -> Result<(), StatusCode> {
    match user.department {
        None => Ok(()),
        Some(own) if own == area => Ok(()),
        Some(_) => Err(StatusCode::FORBIDDEN),
    }
}

/// Team management is open to owners, advisors and the area's delegate.
pub(crate) fn require_team_access(user: &User, area: Area) -> Result<(), StatusCode> {
    match user.role {
        Role::Owner | Role::Advisor => Ok(()),
        Role::Delegate => require_area_access(user, area),
        Role::Employee => Err(StatusCode::FORBIDDEN),
    }
}
