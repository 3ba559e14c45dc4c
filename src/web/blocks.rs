use crate::domain::models::{AppDocument, BlockId, BlockState};
use crate::domain::progress::{self, SectionSummary};
use crate::state::SharedState;
use crate::store::{IdentityPatch, MarketPatch, ProfilePatch, TechPatch};
use crate::web::{require_block_access, require_user};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(list_blocks))
        .route("/:id", get(block_detail))
        .route("/:id/progress", put(update_progress))
        .route("/profile", put(update_profile))
        .route("/identity", put(update_identity))
        .route("/market", put(update_market))
        .route("/tech", put(update_tech))
        .route("/answers/:key", put(save_answer))
        .route("/audio/:key", put(save_audio))
        .route("/audio/:key/transcribe", post(transcribe_audio))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct BlockOverview {
    pub id: u8,
    pub title: &'static str,
    pub state: BlockState,
    pub progress: u8,
    pub accessible: bool,
}

async fn list_blocks(
    State(state): State<SharedState>,
) -> Result<Json<Vec<BlockOverview>>, StatusCode> {
    let doc = state.store.snapshot().await;
    let user = require_user(&doc)?;
    let overview = BlockId::ALL
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
    Ok(Json(overview))
}

#[derive(Debug, Serialize)]
pub struct BlockDetail {
    pub id: u8,
    pub title: &'static str,
    pub state: BlockState,
    pub progress: u8,
    /// Completion recomputed live from the current form data, as opposed
    /// to the stored progress value.
    pub computed_completion: u8,
    pub sections: Vec<SectionSummary>,
    pub data: serde_json::Value,
}

fn resolve_block(raw: u8) -> Result<BlockId, StatusCode> {
    BlockId::from_number(raw).ok_or(StatusCode::NOT_FOUND)
}

fn block_data(doc: &AppDocument, id: BlockId) -> Result<serde_json::Value, StatusCode> {
    let value = match id {
        BlockId::Profile => serde_json::to_value(&doc.profile),
        BlockId::Identity => serde_json::to_value(&doc.identity),
        BlockId::Market => serde_json::to_value(&doc.market),
        BlockId::Technology => serde_json::to_value(&doc.tech),
        BlockId::Execution => {
            let answers: std::collections::BTreeMap<&str, &str> = progress::EXECUTION_QUESTIONS
                .iter()
                .filter_map(|key| doc.answers.get(*key).map(|v| (*key, v.as_str())))
                .collect();
            serde_json::to_value(answers)
        }
    };
    value.map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn block_detail(
    State(state): State<SharedState>,
    Path(raw): Path<u8>,
) -> Result<Json<BlockDetail>, StatusCode> {
    let id = resolve_block(raw)?;
    let doc = state.store.snapshot().await;
    let user = require_user(&doc)?;
    require_block_access(user, id)?;

    let status = doc.block(id);
    Ok(Json(BlockDetail {
        id: id.number(),
        title: id.title(),
        state: status.state,
        progress: status.progress,
        computed_completion: progress::block_completion(&doc, id),
        sections: progress::block_sections(&doc, id),
        data: block_data(&doc, id)?,
    }))
}

#[derive(Deserialize)]
pub struct ProgressRequest {
    pub progress: u8,
    #[serde(default)]
    pub state: Option<BlockState>,
}

async fn update_progress(
    State(state): State<SharedState>,
    Path(raw): Path<u8>,
    Json(payload): Json<ProgressRequest>,
) -> Result<Json<AppDocument>, StatusCode> {
    let id = resolve_block(raw)?;
    {
        let doc = state.store.snapshot().await;
        let user = require_user(&doc)?;
        require_block_access(user, id)?;
    }
    let doc = state
        .store
        .update_block_progress(id, payload.progress, payload.state)
        .await;
    Ok(Json(doc))
}

macro_rules! form_handler {
    ($name:ident, $patch:ty, $block:expr, $op:ident) => {
        async fn $name(
            State(state): State<SharedState>,
            Json(patch): Json<$patch>,
        ) -> Result<Json<AppDocument>, StatusCode> {
            {
                let doc = state.store.snapshot().await;
                let user = require_user(&doc)?;
                require_block_access(user, $block)?;
            }
            Ok(Json(state.store.$op(patch).await))
        }
    };
}

form_handler!(update_profile, ProfilePatch, BlockId::Profile, update_profile_data);
form_handler!(update_identity, IdentityPatch, BlockId::Identity, update_identity_data);
form_handler!(update_market, MarketPatch, BlockId::Market, update_market_data);
form_handler!(update_tech, TechPatch, BlockId::Technology, update_tech_data);

fn answer_gate(doc: &AppDocument, key: &str) -> Result<(), StatusCode> {
    let user = require_user(doc)?;
    if key.starts_with("execution.") {
        require_block_access(user, BlockId::Execution)?;
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub value: String,
}

async fn save_answer(
    State(state): State<SharedState>,
    Path(key): Path<String>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AppDocument>, StatusCode> {
    answer_gate(&state.store.snapshot().await, &key)?;
    Ok(Json(state.store.save_answer(key, payload.value).await))
}

#[derive(Deserialize)]
pub struct AudioRequest {
    /// Base64-encoded recording; the empty string deletes the recording.
    pub audio: String,
}

async fn save_audio(
    State(state): State<SharedState>,
    Path(key): Path<String>,
    Json(payload): Json<AudioRequest>,
) -> Result<Json<AppDocument>, StatusCode> {
    answer_gate(&state.store.snapshot().await, &key)?;
    Ok(Json(state.store.save_audio_answer(key, payload.audio).await))
}

#[derive(Deserialize)]
pub struct TranscribeRequest {
    pub audio: String,
    #[serde(default = "default_mime")]
    pub mime_type: String,
}

fn default_mime() -> String {
    "audio/webm".to_string()
}

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
    pub answer: String,
}

/// Sends the recording to the transcription service and appends the
/// returned text to the question's answer in a single store update. Any
/// service failure degrades to the empty string, leaving the answer as it
/// was.
async fn transcribe_audio(
    State(state): State<SharedState>,
    Path(key): Path<String>,
    Json(payload): Json<TranscribeRequest>,
) -> Result<Json<TranscribeResponse>, StatusCode> {
    answer_gate(&state.store.snapshot().await, &key)?;

    let audio = general_purpose::STANDARD
        .decode(payload.audio.as_bytes())
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    let text = match state.transcriber.transcribe(audio, &payload.mime_type).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("transcription failed for {key}: {e}");
            String::new()
        }
    };

    // The answer may change while the service call is in flight, so the
    // append runs against the value current at commit time, under the
    // store's write lock, never against a pre-await snapshot.
    let doc = if text.is_empty() {
        state.store.snapshot().await
    } else {
        state
            .store
            .append_transcript(key.clone(), text.clone())
            .await
    };
    let answer = doc.answers.get(&key).cloned().unwrap_or_default();

    Ok(Json(TranscribeResponse { text, answer }))
}
