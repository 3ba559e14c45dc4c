use crate::services::transcribe::Transcriber;
use crate::store::StateStore;
use std::sync::Arc;

pub struct AppState {
    pub store: Arc<StateStore>,
    pub transcriber: Arc<dyn Transcriber>,
}

pub type SharedState = Arc<AppState>;
