//! Logic Module - Scoring Engines & Call State
//!
//! ## Layout
//! - `types` - Turn, RiskLabel, TriggerTag, RiskResult
//! - `lexicon/` - phrase taxonomy + loader
//! - `rules/` - keyword classifier
//! - `model/` - external model capability (Gemini, stub)
//! - `fusion/` - rule/model conflict resolution
//! - `session/` - per-call transcripts

pub mod config;
pub mod types;

pub mod lexicon;
pub mod rules;
pub mod model;
pub mod fusion;
pub mod session;
