//! VoiceShield Core - Call Scam Scoring Engine
//!
//! Scores an in-progress phone call transcript for scam intent, one speech
//! turn at a time.
//!
//! # Architecture
//!
//! ```text
//!   Turn ──► SessionRegistry ──► FusionPolicy ──► RiskResult
//!                                 │        │
//!                      RuleClassifier   ModelClassifier (optional, fallible)
//!                                 │
//!                              Lexicon
//! ```
//!
//! - `logic::lexicon` - versioned phrase taxonomy (high / medium / regional)
//! - `logic::rules` - deterministic keyword classifier
//! - `logic::model` - external model capability + validation of its output
//! - `logic::fusion` - override/promotion policy, the scoring entry point
//! - `logic::session` - per-call append-only transcripts

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{EngineError, EngineResult};
pub use logic::config::EngineConfig;
pub use logic::fusion::FusionPolicy;
pub use logic::lexicon::{Category, CategoryWeights, Lexicon, LexiconEntry, LexiconError};
pub use logic::model::{ModelClassifier, ModelError, ModelJudgement};
pub use logic::rules::{LabelThresholds, RuleClassifier};
pub use logic::session::{CallHandle, CallOwner, CallSession, SessionError, SessionRegistry};
pub use logic::types::{IncomingTurn, RiskLabel, RiskResult, Speaker, TriggerTag, Turn, TurnError};
