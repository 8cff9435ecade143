//! Single-shot text analysis

use axum::{extract::State, Json};
use serde::Deserialize;
use voiceshield_core::{IncomingTurn, RiskResult, Speaker, Turn};

use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Score a pasted message as a one-turn caller transcript
pub async fn analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> AppResult<Json<RiskResult>> {
    let turn = Turn::try_from(IncomingTurn {
        speaker: Speaker::Caller,
        text: req.text,
        language: req.language.or_else(|| Some("en".to_string())),
    })
    .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let result = state.engine.score(&[turn]).await;
    tracing::debug!("Text analysis: {} ({})", result.label(), result.score());

    Ok(Json(result))
}
