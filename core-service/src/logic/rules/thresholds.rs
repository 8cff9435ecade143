//! Label Thresholds
//!
//! Score boundaries for rule verdicts. Rules only produce SAFE, MEDIUM or
//! HIGH; LOW comes from the model classifier alone.

use serde::{Deserialize, Serialize};

use crate::constants::{HIGH_EXPLANATION, HIGH_SCORE_MIN, MEDIUM_EXPLANATION, MEDIUM_SCORE_MIN, SAFE_EXPLANATION};
use crate::logic::types::RiskLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelThresholds {
    /// At or above = HIGH
    pub high_min: u8,
    /// At or above (below `high_min`) = MEDIUM, below = SAFE
    pub medium_min: u8,
}

impl Default for LabelThresholds {
    fn default() -> Self {
        Self {
            high_min: HIGH_SCORE_MIN,
            medium_min: MEDIUM_SCORE_MIN,
        }
    }
}

impl LabelThresholds {
    pub fn label_for(&self, score: u8) -> RiskLabel {
        if score >= self.high_min {
            RiskLabel::High
        } else if score >= self.medium_min {
            RiskLabel::Medium
        } else {
            RiskLabel::Safe
        }
    }
}

/// Fixed explanation per rule label
pub fn explanation_for(label: RiskLabel) -> &'static str {
    match label {
        RiskLabel::High => HIGH_EXPLANATION,
        RiskLabel::Medium | RiskLabel::Low => MEDIUM_EXPLANATION,
        RiskLabel::Safe => SAFE_EXPLANATION,
    }
}
