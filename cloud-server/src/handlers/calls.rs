//! Call lifecycle over plain HTTP
//!
//! Same semantics as the WebSocket stream for clients that poll. Calls held
//! by a live WebSocket are answered with 409.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use voiceshield_core::{CallOwner, IncomingTurn, RiskResult, Turn};

use crate::{AppResult, AppState};

#[derive(Serialize)]
pub struct CallStatus {
    call_id: String,
    active: bool,
    turns: usize,
}

/// Begin a call
pub async fn begin(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> AppResult<(StatusCode, Json<CallStatus>)> {
    state.sessions.begin_call(&call_id, CallOwner::Api)?;

    Ok((
        StatusCode::CREATED,
        Json(CallStatus {
            call_id,
            active: true,
            turns: 0,
        }),
    ))
}

/// Append a turn and return the updated verdict
pub async fn submit_turn(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
    Json(turn): Json<IncomingTurn>,
) -> AppResult<Json<RiskResult>> {
    let call = state.sessions.lookup(&call_id)?;
    let result = state.sessions.submit_turn(&call, turn, &state.engine).await?;
    Ok(Json(result))
}

/// Transcript so far
pub async fn transcript(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> AppResult<Json<Vec<Turn>>> {
    let call = state.sessions.lookup(&call_id)?;
    let turns = state.sessions.transcript(&call).await?;
    Ok(Json(turns))
}

/// End a call and release its transcript
pub async fn end(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> AppResult<Json<CallStatus>> {
    let call = state.sessions.lookup(&call_id)?;
    let turns = state.sessions.end_call(&call).await?;

    Ok(Json(CallStatus {
        call_id,
        active: false,
        turns,
    }))
}
