//! Model Module - External Classifier Capability
//!
//! The engine never trusts the model: every reply is validated into a
//! [`RiskResult`](crate::RiskResult) or rejected as a [`ModelError`], and the
//! fusion policy falls back to the rule verdict on any error.
//!
//! ## Structure
//! - `types`: raw judgement, errors, validation
//! - `extract`: prompt history formatting + JSON span extraction
//! - `gemini`: Google Gemini REST implementation
//! - `stub`: deterministic classifier for tests and offline runs

pub mod types;
pub mod extract;
pub mod gemini;
pub mod stub;

pub use types::{ModelError, ModelJudgement};
pub use extract::{extract_json_object, format_history, parse_reply};
pub use gemini::GeminiClassifier;
pub use stub::{StaticClassifier, StubReply};

use async_trait::async_trait;

use crate::logic::types::Turn;

/// A classifier that judges a transcript out of process.
///
/// Implementations report transport and parse problems as errors; schema
/// checks on the returned judgement happen in the engine.
#[async_trait]
pub trait ModelClassifier: Send + Sync {
    /// Short name for logs (e.g. "gemini")
    fn name(&self) -> &str;

    /// Judge the full turn history
    async fn judge(&self, turns: &[Turn]) -> Result<ModelJudgement, ModelError>;
}
