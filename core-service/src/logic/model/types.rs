//! Model Types
//!
//! Raw judgement as the external model returns it, and its validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::types::{RiskLabel, RiskResult, TriggerTag};

// ============================================================================
// ERRORS
// ============================================================================

/// Any failure of the external classifier. Always recoverable.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model classifier not configured: {0}")]
    NotConfigured(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model endpoint returned HTTP {0}")]
    Status(u16),

    #[error("model call exceeded {0:?}")]
    Timeout(Duration),

    #[error("model reply contains no JSON object")]
    NoJson,

    #[error("malformed model payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("risk_score {0} outside 0..=100")]
    ScoreOutOfRange(i64),

    #[error("unknown risk_label {0:?}")]
    UnknownLabel(String),
}

// ============================================================================
// JUDGEMENT
// ============================================================================

/// Un-validated model output. All four fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelJudgement {
    pub risk_score: i64,
    pub risk_label: String,
    pub explanation: String,
    pub triggers: Vec<String>,
}

impl ModelJudgement {
    pub fn new(risk_score: i64, risk_label: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            risk_score,
            risk_label: risk_label.into(),
            explanation: explanation.into(),
            triggers: Vec::new(),
        }
    }

    pub fn with_trigger(mut self, tag: impl Into<String>) -> Self {
        self.triggers.push(tag.into());
        self
    }

    /// Turn into a verdict, rejecting out-of-range scores and labels
    /// outside SAFE/LOW/MEDIUM/HIGH. Blank trigger strings are dropped.
    pub fn validate(self) -> Result<RiskResult, ModelError> {
        if !(0..=100).contains(&self.risk_score) {
            return Err(ModelError::ScoreOutOfRange(self.risk_score));
        }

        let label: RiskLabel = self
            .risk_label
            .parse()
            .map_err(|_| ModelError::UnknownLabel(self.risk_label.clone()))?;

        let triggers = self
            .triggers
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .map(TriggerTag::from);

        Ok(RiskResult::new(
            self.risk_score as u32,
            label,
            self.explanation.trim(),
            triggers,
        ))
    }
}
