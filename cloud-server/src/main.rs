//! VoiceShield Server
//!
//! Streams scam-risk verdicts for live phone calls.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    VOICESHIELD SERVER                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │ WebSocket │  │  REST     │  │  Text Analysis          │ │
//! │  │ /ws/call  │  │  /calls   │  │  /api/analyze-text      │ │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘ │
//! │        └──────────────┼──────────────────────┘              │
//! │                       ▼                                     │
//! │     SessionRegistry ──► FusionPolicy (rules + model)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod handlers;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voiceshield_core::{FusionPolicy, SessionRegistry};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG from it reaches the filter
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "voiceshield_server=debug,voiceshield_core=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env();

    tracing::info!("VoiceShield Server starting ({})...", config.environment);
    if config.is_production() && !config.engine.model_enabled() {
        tracing::warn!("Production without GOOGLE_API_KEY: verdicts are rule-based only");
    }

    // Build scoring engine
    let engine = FusionPolicy::from_config(&config.engine)
        .context("failed to build scoring engine")?;
    tracing::info!(
        "Lexicon {} loaded ({} phrases)",
        engine.rules().lexicon().version(),
        engine.rules().lexicon().len()
    );

    // Build application state
    let state = AppState::new(engine, config.clone());

    // End REST calls whose clients never sent DELETE
    spawn_idle_sweep(state.sessions.clone(), config.session_idle_timeout);

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid HOST/PORT")?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FusionPolicy>,
    pub sessions: Arc<SessionRegistry>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(engine: FusionPolicy, config: config::Config) -> Self {
        Self {
            engine: Arc::new(engine),
            sessions: Arc::new(SessionRegistry::new()),
            config,
        }
    }
}

fn spawn_idle_sweep(sessions: Arc<SessionRegistry>, max_idle: Duration) {
    let period = (max_idle / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let ended = sessions.sweep_idle(max_idle);
            if ended > 0 {
                tracing::info!("Ended {} idle calls", ended);
            }
        }
    });
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::check))

        // Single-shot analysis
        .route("/api/analyze-text", post(handlers::analyze::analyze_text))

        // Live call stream
        .route("/ws/call/:call_id", get(handlers::stream::call_socket))

        // Call lifecycle (REST)
        .route(
            "/api/v1/calls/:call_id",
            post(handlers::calls::begin).delete(handlers::calls::end),
        )
        .route("/api/v1/calls/:call_id/turns", post(handlers::calls::submit_turn))
        .route("/api/v1/calls/:call_id/transcript", get(handlers::calls::transcript))

        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

#[cfg(test)]
mod tests;
