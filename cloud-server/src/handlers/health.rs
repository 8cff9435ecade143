//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    timestamp: i64,
    lexicon_version: String,
    model_enabled: bool,
    active_calls: usize,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        timestamp: chrono::Utc::now().timestamp(),
        lexicon_version: state.engine.rules().lexicon().version().to_string(),
        model_enabled: state.engine.has_model(),
        active_calls: state.sessions.active_calls(),
    })
}

#[derive(Serialize)]
pub struct RootResponse {
    message: &'static str,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "VoiceShield API is running",
    })
}
