//! Engine Configuration
//!
//! Weight table, label boundaries and model settings. Read once at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GEMINI_MODEL, DEFAULT_MODEL_TIMEOUT_MS};
use crate::logic::lexicon::{CategoryWeights, Lexicon, LexiconError};
use crate::logic::rules::LabelThresholds;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Score per firing lexicon entry, by category
    pub weights: CategoryWeights,

    /// Rule score → label boundaries
    pub thresholds: LabelThresholds,

    /// Budget for one model call (milliseconds)
    pub model_timeout_ms: u64,

    /// Gemini model name
    pub model_name: String,

    /// Gemini API key. None = rule-only operation.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Replaces the built-in lexicon when set
    pub lexicon_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            thresholds: LabelThresholds::default(),
            model_timeout_ms: DEFAULT_MODEL_TIMEOUT_MS,
            model_name: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: None,
            lexicon_path: None,
        }
    }
}

impl EngineConfig {
    /// Load from environment variables, defaulting anything unset or unparsable
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            weights: CategoryWeights {
                high: env_parse("RULE_WEIGHT_HIGH").unwrap_or(defaults.weights.high),
                medium: env_parse("RULE_WEIGHT_MEDIUM").unwrap_or(defaults.weights.medium),
                regional: env_parse("RULE_WEIGHT_REGIONAL").unwrap_or(defaults.weights.regional),
            },
            thresholds: defaults.thresholds,
            model_timeout_ms: env_parse("MODEL_TIMEOUT_MS").unwrap_or(defaults.model_timeout_ms),
            model_name: env::var("GEMINI_MODEL").unwrap_or(defaults.model_name),
            api_key: env::var("GOOGLE_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            lexicon_path: env::var("LEXICON_PATH").ok().filter(|p| !p.is_empty()).map(PathBuf::from),
        }
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_millis(self.model_timeout_ms)
    }

    pub fn model_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Lexicon file if configured, built-in tables otherwise
    pub fn load_lexicon(&self) -> Result<Lexicon, LexiconError> {
        match &self.lexicon_path {
            Some(path) => Lexicon::from_json_file(path, &self.weights),
            None => Ok(Lexicon::builtin(&self.weights)),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
