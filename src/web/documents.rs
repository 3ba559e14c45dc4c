use crate::domain::catalog::{self, DocumentDefinition};
use crate::domain::models::{AppDocument, Area, Contact, DocumentStatus, Priority};
use crate::domain::progress;
use crate::state::SharedState;
use crate::web::{require_area_access, require_user};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(list_documents))
        .route("/:id/upload", post(upload))
        .route("/:id/assign", post(assign))
        .route("/:id/not-available", post(mark_not_available))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct DocumentRow {
    pub id: &'static str,
    pub area: Area,
    pub label: &'static str,
    pub priority: Priority,
    /// MISSING when the user has no state for the document yet.
    pub status: Option<DocumentStatus>,
    pub file_name: Option<String>,
    pub assignee: Option<Contact>,
}

#[derive(Debug, Serialize)]
pub struct ChecklistPayload {
    pub completion: u8,
    pub documents: Vec<DocumentRow>,
}

async fn list_documents(
    State(state): State<SharedState>,
) -> Result<Json<ChecklistPayload>, StatusCode> {
    let doc = state.store.snapshot().await;
    require_user(&doc)?;

    let documents = catalog::CATALOG
        .iter()
        .map(|def| {
            let stored = doc.documents.get(def.id);
            DocumentRow {
                id: def.id,
                area: def.area,
                label: def.label,
                priority: def.priority,
                status: stored.map(|s| s.status),
                file_name: stored.and_then(|s| s.file_name.clone()),
                assignee: stored.and_then(|s| s.assignee.clone()),
            }
        })
        .collect();

    Ok(Json(ChecklistPayload {
        completion: progress::documents_completion(&doc),
        documents,
    }))
}

fn checked_definition(
    doc: &AppDocument,
    id: &str,
) -> Result<&'static DocumentDefinition, StatusCode> {
    let def = catalog::find(id).ok_or(StatusCode::NOT_FOUND)?;
    let user = require_user(doc)?;
    require_area_access(user, def.area)?;
    Ok(def)
}

/// Records the display name of the picked file; the bytes themselves are
/// not persisted here.
async fn upload(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<AppDocument>, StatusCode> {
    let def = checked_definition(&state.store.snapshot().await, &id)?;

    let mut file_name = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if let Some(name) = field.file_name() {
            file_name = Some(name.to_string());
        }
        // Drain the field so the stream can advance.
        let _ = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
    }
    let file_name = file_name.ok_or(StatusCode::BAD_REQUEST)?;

    Ok(Json(state.store.upload_document(def.id, file_name).await))
}

#[derive(Deserialize)]
pub struct AssignRequest {
    pub name: String,
    pub email: String,
}

async fn assign(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<AssignRequest>,
) -> Result<Json<AppDocument>, StatusCode> {
    let def = checked_definition(&state.store.snapshot().await, &id)?;
    let assignee = Contact {
        name: payload.name,
        email: payload.email,
    };
    Ok(Json(state.store.assign_document(def.id, assignee).await))
}

/// The view layer discourages waiving MUST-priority documents, but the
/// data layer accepts the waiver for any priority.
async fn mark_not_available(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<AppDocument>, StatusCode> {
    let def = checked_definition(&state.store.snapshot().await, &id)?;
    Ok(Json(state.store.mark_document_not_available(def.id).await))
}
