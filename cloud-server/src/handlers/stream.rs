//! Live call stream (WebSocket)
//!
//! Client → server:
//! - `{"type": "transcript", "payload": {"speaker": "caller", "text": "..."}}`
//! - `{"type": "end_call"}`
//!
//! Server → client:
//! - `{"type": "risk_update", "payload": RiskResult}` after every turn
//! - `{"type": "error", "payload": {"error": "..."}}` for a rejected message
//! - `{"type": "call_ended", "payload": {"turns": n}}` before closing
//!
//! Messages of one socket are handled one at a time, so verdicts go out in
//! turn order.

use std::fmt::Display;

use axum::{
    extract::{
        ws::{Message, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use voiceshield_core::{CallHandle, CallOwner, IncomingTurn, RiskResult};

use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientMessage {
    Transcript(IncomingTurn),
    EndCall,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    RiskUpdate(RiskResult),
    Error { error: String },
    CallEnded { turns: usize },
}

/// What to do after one inbound text frame
#[derive(Debug)]
pub enum Outcome {
    Reply(ServerMessage),
    End,
}

/// `GET /ws/call/:call_id`
pub async fn call_socket(
    ws: WebSocketUpgrade,
    Path(call_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| {
        let (outgoing, incoming) = socket.split();
        run_call(incoming, outgoing, call_id, state)
    })
}

/// Own one call for the lifetime of a socket.
///
/// The session is opened here and ended here, whichever way the loop stops.
pub async fn run_call<R, W>(mut incoming: R, mut outgoing: W, call_id: String, state: AppState)
where
    R: Stream<Item = Result<Message, axum::Error>> + Unpin,
    W: Sink<Message> + Unpin,
    W::Error: Display,
{
    let call = match state.sessions.begin_call(&call_id, CallOwner::Stream) {
        Ok(call) => call,
        Err(e) => {
            tracing::warn!("Rejecting stream for call {}: {}", call_id, e);
            let _ = send(&mut outgoing, &ServerMessage::Error { error: e.to_string() }).await;
            let _ = outgoing.send(Message::Close(None)).await;
            return;
        }
    };

    tracing::info!("Call {} stream connected", call_id);
    let mut ended_by_client = false;

    while let Some(msg) = incoming.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("Call {} socket error: {}", call_id, e);
                break;
            }
        };

        match handle_text(&state, &call, &text).await {
            Outcome::Reply(reply) => {
                if let Err(e) = send(&mut outgoing, &reply).await {
                    tracing::debug!("Call {} client went away mid-stream: {}", call_id, e);
                    break;
                }
            }
            Outcome::End => {
                ended_by_client = true;
                break;
            }
        }
    }

    match state.sessions.end_call(&call).await {
        Ok(turns) => {
            if ended_by_client {
                let _ = send(&mut outgoing, &ServerMessage::CallEnded { turns }).await;
                let _ = outgoing.send(Message::Close(None)).await;
            }
            tracing::info!("Call {} stream closed after {} turns", call_id, turns);
        }
        Err(e) => tracing::warn!("Call {} already gone at close: {}", call_id, e),
    }
}

/// Handle one text frame for the call behind `call`
pub async fn handle_text(state: &AppState, call: &CallHandle, text: &str) -> Outcome {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!("Call {} sent an unreadable message: {}", call.call_id(), e);
            return Outcome::Reply(ServerMessage::Error {
                error: format!("invalid message: {}", e),
            });
        }
    };

    match message {
        ClientMessage::Transcript(turn) => {
            match state.sessions.submit_turn(call, turn, &state.engine).await {
                Ok(result) => Outcome::Reply(ServerMessage::RiskUpdate(result)),
                Err(e) => Outcome::Reply(ServerMessage::Error { error: e.to_string() }),
            }
        }
        ClientMessage::EndCall => Outcome::End,
    }
}

async fn send<W>(outgoing: &mut W, message: &ServerMessage) -> Result<(), W::Error>
where
    W: Sink<Message> + Unpin,
{
    match serde_json::to_string(message) {
        Ok(json) => outgoing.send(Message::Text(json)).await,
        Err(e) => {
            tracing::error!("Failed to encode {:?}: {}", message, e);
            Ok(())
        }
    }
}
