mod domain;
mod services;
mod state;
mod store;
mod web;

use crate::services::transcribe::{DisabledTranscriber, OpenAiTranscriber, Transcriber};
use crate::state::{AppState, SharedState};
use crate::store::storage::JsonStorage;
use crate::store::StateStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_path = std::env::var("WALLNUT_DATA_PATH")
        .unwrap_or_else(|_| "wallnut-data.json".to_string());
    let store = Arc::new(StateStore::open(JsonStorage::new(&data_path)));
    tracing::info!("State loaded from {data_path}");

    let transcriber: Arc<dyn Transcriber> = match std::env::var("OPENAI_API_KEY") {
        Ok(key) => Arc::new(OpenAiTranscriber::new(key)),
        Err(_) => {
            tracing::warn!("OPENAI_API_KEY not set; voice transcription disabled");
            Arc::new(DisabledTranscriber)
        }
    };

    let shared: SharedState = Arc::new(AppState {
        store: store.clone(),
        transcriber,
    });

    // Notifications expire on their own after a fixed delay; a small
    // background task sweeps them out.
    let sweeper = store.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_millis(500));
        loop {
            tick.tick().await;
            sweeper.expire_notifications(chrono::Utc::now()).await;
        }
    });

    let app = web::routes(shared)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| {
        let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        format!("0.0.0.0:{port}")
    });
    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
