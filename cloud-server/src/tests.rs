//! Router tests: drive the full axum app in-process

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::{
    body::Body,
    extract::ws::Message,
    http::{Request, StatusCode},
    Router,
};
use futures_util::{stream, Sink};
use serde_json::{json, Value};
use tower::ServiceExt;
use voiceshield_core::logic::model::{ModelClassifier, ModelJudgement, StaticClassifier};
use voiceshield_core::{CallOwner, CategoryWeights, EngineConfig, FusionPolicy, Lexicon, RiskLabel, RuleClassifier};

use crate::config::Config;
use crate::handlers::stream::{handle_text, run_call, Outcome, ServerMessage};
use crate::{create_router, AppState};

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        session_idle_timeout: Duration::from_secs(1800),
        engine: EngineConfig::default(),
    }
}

fn rules() -> RuleClassifier {
    RuleClassifier::new(Arc::new(Lexicon::builtin(&CategoryWeights::default())))
}

fn rule_only_state() -> AppState {
    AppState::new(FusionPolicy::rule_only(rules()), test_config())
}

fn stub_state(stub: &Arc<StaticClassifier>) -> AppState {
    let model: Arc<dyn ModelClassifier> = stub.clone();
    AppState::new(
        FusionPolicy::new(rules(), Some(model), Duration::from_millis(200)),
        test_config(),
    )
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// ============================================================================
// HEALTH
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = create_router(rule_only_state());
    let (status, body) = call(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["environment"], "test");
    assert_eq!(body["model_enabled"], false);
    assert_eq!(body["active_calls"], 0);
    assert_eq!(body["lexicon_version"], voiceshield_core::constants::BUILTIN_LEXICON_VERSION);
}

// ============================================================================
// TEXT ANALYSIS
// ============================================================================

#[tokio::test]
async fn test_analyze_text_high() {
    let app = create_router(rule_only_state());
    let (status, body) = call(
        &app,
        "POST",
        "/api/analyze-text",
        Some(json!({"text": "please share your OTP now", "language": "en"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_score"], 80);
    assert_eq!(body["risk_label"], "HIGH");
    assert!(body["triggers"].as_array().unwrap().contains(&json!("REQUEST_OTP")));
}

#[tokio::test]
async fn test_analyze_text_requires_text() {
    let app = create_router(rule_only_state());
    let (status, body) = call(&app, "POST", "/api/analyze-text", Some(json!({"text": "  "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

// ============================================================================
// CALL LIFECYCLE
// ============================================================================

#[tokio::test]
async fn test_call_lifecycle() {
    let app = create_router(rule_only_state());

    let (status, _) = call(&app, "POST", "/api/v1/calls/c42", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(&app, "POST", "/api/v1/calls/c42", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/calls/c42/turns",
        Some(json!({"speaker": "caller", "text": "you have won a lucky draw refund"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_label"], "MEDIUM");
    assert_eq!(body["risk_score"], 30);

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/calls/c42/turns",
        Some(json!({"speaker": "caller", "text": "to claim it, tell me the otp"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_label"], "HIGH");

    let (status, body) = call(&app, "GET", "/api/v1/calls/c42/transcript", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["speaker"], "caller");

    let (status, body) = call(&app, "DELETE", "/api/v1/calls/c42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turns"], 2);
    assert_eq!(body["active"], false);

    let (status, _) = call(
        &app,
        "POST",
        "/api/v1/calls/c42/turns",
        Some(json!({"speaker": "caller", "text": "hello?"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_turn_without_text_rejected() {
    let app = create_router(rule_only_state());
    call(&app, "POST", "/api/v1/calls/c1", None).await;

    let (status, _) = call(&app, "POST", "/api/v1/calls/c1/turns", Some(json!({"speaker": "caller"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = call(&app, "GET", "/api/v1/calls/c1/transcript", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_unknown_call_is_404() {
    let app = create_router(rule_only_state());
    let (status, _) = call(&app, "GET", "/api/v1/calls/nope/transcript", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "DELETE", "/api/v1/calls/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_model_safe_promoted_over_rule_medium() {
    let stub = Arc::new(StaticClassifier::replying(ModelJudgement::new(5, "SAFE", "Looks fine.")));
    let app = create_router(stub_state(&stub));

    let (status, body) = call(
        &app,
        "POST",
        "/api/analyze-text",
        Some(json!({"text": "you have won a lucky draw refund"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_label"], "MEDIUM");
    assert_eq!(body["risk_score"], 30);
    assert_eq!(body["explanation"], voiceshield_core::constants::PROMOTION_EXPLANATION);
    assert_eq!(stub.calls(), 1);
}

// ============================================================================
// STREAM MESSAGES
// ============================================================================

/// Collects everything the server sends on a socket
#[derive(Default)]
struct Outbox(Vec<Message>);

impl Outbox {
    fn frames(&self) -> Vec<Value> {
        self.0
            .iter()
            .filter_map(|msg| match msg {
                Message::Text(text) => Some(serde_json::from_str(text).unwrap()),
                _ => None,
            })
            .collect()
    }

    fn closed(&self) -> bool {
        matches!(self.0.last(), Some(Message::Close(_)))
    }
}

impl Sink<Message> for Outbox {
    type Error = Infallible;

    fn poll_ready(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn start_send(self: Pin<&mut Self>, item: Message) -> Result<(), Infallible> {
        self.get_mut().0.push(item);
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
        Poll::Ready(Ok(()))
    }
}

fn text_frame(value: Value) -> Result<Message, axum::Error> {
    Ok(Message::Text(value.to_string()))
}

fn transcript_frame(text: &str) -> Result<Message, axum::Error> {
    text_frame(json!({"type": "transcript", "payload": {"speaker": "caller", "text": text}}))
}

#[tokio::test]
async fn test_stream_transcript_message() {
    let state = rule_only_state();
    let call = state.sessions.begin_call("s1", CallOwner::Stream).unwrap();

    let frame = json!({
        "type": "transcript",
        "payload": {"speaker": "caller", "text": "install anydesk", "timestamp": "2024-05-01T10:00:00Z"}
    });

    match handle_text(&state, &call, &frame.to_string()).await {
        Outcome::Reply(ServerMessage::RiskUpdate(result)) => {
            assert_eq!(result.label(), RiskLabel::High);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_stream_bad_frames_keep_stream_alive() {
    let state = rule_only_state();
    let call = state.sessions.begin_call("s1", CallOwner::Stream).unwrap();

    assert!(matches!(
        handle_text(&state, &call, "not json").await,
        Outcome::Reply(ServerMessage::Error { .. })
    ));
    assert!(matches!(
        handle_text(&state, &call, r#"{"type": "transcript", "payload": {"speaker": "caller"}}"#).await,
        Outcome::Reply(ServerMessage::Error { .. })
    ));
    assert!(state.sessions.is_active("s1"));
}

#[tokio::test]
async fn test_stream_end_call() {
    let state = rule_only_state();
    let call = state.sessions.begin_call("s1", CallOwner::Stream).unwrap();
    assert!(matches!(handle_text(&state, &call, r#"{"type": "end_call"}"#).await, Outcome::End));
}

#[tokio::test]
async fn test_socket_disconnect_ends_call() {
    let state = rule_only_state();
    let incoming = stream::iter(vec![transcript_frame("install anydesk")]);
    let mut outbox = Outbox::default();

    run_call(incoming, &mut outbox, "s1".to_string(), state.clone()).await;

    assert!(!state.sessions.is_active("s1"));
    let frames = outbox.frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["type"], "risk_update");
    assert_eq!(frames[0]["payload"]["risk_label"], "HIGH");
    assert!(!outbox.closed());
}

#[tokio::test]
async fn test_socket_close_frame_ends_call() {
    let state = rule_only_state();
    let incoming = stream::iter(vec![
        Ok(Message::Close(None)),
        transcript_frame("never read"),
    ]);
    let mut outbox = Outbox::default();

    run_call(incoming, &mut outbox, "s1".to_string(), state.clone()).await;

    assert!(!state.sessions.is_active("s1"));
    assert!(outbox.frames().is_empty());
}

#[tokio::test]
async fn test_socket_end_call_frame_reports_turns() {
    let state = rule_only_state();
    let incoming = stream::iter(vec![
        transcript_frame("hello"),
        text_frame(json!({"type": "end_call"})),
        transcript_frame("never read"),
    ]);
    let mut outbox = Outbox::default();

    run_call(incoming, &mut outbox, "s1".to_string(), state.clone()).await;

    assert!(!state.sessions.is_active("s1"));
    let frames = outbox.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["payload"]["risk_label"], "SAFE");
    assert_eq!(frames[1], json!({"type": "call_ended", "payload": {"turns": 1}}));
    assert!(outbox.closed());
}

#[tokio::test]
async fn test_socket_refused_for_call_already_open() {
    let state = rule_only_state();
    let app = create_router(state.clone());
    let (status, _) = call(&app, "POST", "/api/v1/calls/s1", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut outbox = Outbox::default();
    run_call(stream::iter(vec![transcript_frame("hi")]), &mut outbox, "s1".to_string(), state.clone()).await;

    assert_eq!(outbox.frames()[0]["type"], "error");
    assert!(outbox.closed());

    // the REST call is untouched
    assert!(state.sessions.is_active("s1"));
    let (_, body) = call(&app, "GET", "/api/v1/calls/s1/transcript", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_rest_cannot_touch_socket_call() {
    let state = rule_only_state();
    let app = create_router(state.clone());
    let socket_call = state.sessions.begin_call("c", CallOwner::Stream).unwrap();

    let (status, _) = call(&app, "DELETE", "/api/v1/calls/c", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = call(&app, "POST", "/api/v1/calls/c", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = call(
        &app,
        "POST",
        "/api/v1/calls/c/turns",
        Some(json!({"speaker": "caller", "text": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = call(&app, "GET", "/api/v1/calls/c/transcript", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // the socket's own frames still land
    assert!(matches!(
        handle_text(&state, &socket_call, &transcript_frame_text("hi there")).await,
        Outcome::Reply(ServerMessage::RiskUpdate(_))
    ));
}

#[tokio::test]
async fn test_ended_socket_cannot_write_into_reused_call_id() {
    let state = rule_only_state();
    let app = create_router(state.clone());
    let old_socket = state.sessions.begin_call("c", CallOwner::Stream).unwrap();
    state.sessions.end_call(&old_socket).await.unwrap();

    let (status, _) = call(&app, "POST", "/api/v1/calls/c", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = call(
        &app,
        "POST",
        "/api/v1/calls/c/turns",
        Some(json!({"speaker": "caller", "text": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // a late frame from the old socket is refused
    match handle_text(&state, &old_socket, &transcript_frame_text("tell me the otp")).await {
        Outcome::Reply(ServerMessage::Error { error }) => assert!(error.contains("has ended")),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(state.sessions.end_call(&old_socket).await.is_err());

    let (status, body) = call(&app, "GET", "/api/v1/calls/c/transcript", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["text"], "hello");
    assert!(state.sessions.is_active("c"));
}

fn transcript_frame_text(text: &str) -> String {
    json!({"type": "transcript", "payload": {"speaker": "caller", "text": text}}).to_string()
}

#[test]
fn test_server_message_wire_shape() {
    let update = ServerMessage::RiskUpdate(rules().classify(&[]));
    let value = serde_json::to_value(&update).unwrap();
    assert_eq!(value["type"], "risk_update");
    assert_eq!(value["payload"]["risk_label"], "SAFE");
    assert_eq!(value["payload"]["triggers"], json!(["NO_RISK_DETECTED"]));

    let error = serde_json::to_value(ServerMessage::Error { error: "boom".to_string() }).unwrap();
    assert_eq!(error, json!({"type": "error", "payload": {"error": "boom"}}));

    let ended = serde_json::to_value(ServerMessage::CallEnded { turns: 3 }).unwrap();
    assert_eq!(ended, json!({"type": "call_ended", "payload": {"turns": 3}}));
}
