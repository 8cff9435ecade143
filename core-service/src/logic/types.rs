//! Core Types
//!
//! Data structures shared by every engine stage. No scoring logic here.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_RISK_SCORE;

// ============================================================================
// TURN
// ============================================================================

/// Who said a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Caller,
    /// The protected user. Older clients send `"user"`.
    #[serde(alias = "user")]
    Callee,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Caller => "caller",
            Speaker::Callee => "callee",
            Speaker::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated speech turn. Immutable once appended to a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    speaker: Speaker,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// Turn as it arrives from a client, before validation.
///
/// Unknown fields (timestamps etc.) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingTurn {
    #[serde(default)]
    pub speaker: Speaker,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Malformed turn, rejected before it can reach scoring
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("turn is missing its text")]
    MissingText,
}

impl TryFrom<IncomingTurn> for Turn {
    type Error = TurnError;

    fn try_from(incoming: IncomingTurn) -> Result<Self, Self::Error> {
        let text = incoming
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or(TurnError::MissingText)?;

        Ok(Self {
            speaker: incoming.speaker,
            text,
            language: incoming.language.filter(|l| !l.trim().is_empty()),
        })
    }
}

// ============================================================================
// TRIGGER TAGS
// ============================================================================

/// Symbolic reason attached to a risk verdict.
///
/// Model replies may carry tags outside the known set; those are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TriggerTag {
    RequestOtp,
    RequestUpiPin,
    RemoteAccess,
    UrgencyScam,
    RegionalFraudPattern,
    ImpersonationBank,
    FinancialRisk,
    NoRiskDetected,
    Other(String),
}

impl TriggerTag {
    pub fn as_str(&self) -> &str {
        match self {
            TriggerTag::RequestOtp => "REQUEST_OTP",
            TriggerTag::RequestUpiPin => "REQUEST_UPI_PIN",
            TriggerTag::RemoteAccess => "REMOTE_ACCESS",
            TriggerTag::UrgencyScam => "URGENCY_SCAM",
            TriggerTag::RegionalFraudPattern => "REGIONAL_FRAUD_PATTERN",
            TriggerTag::ImpersonationBank => "IMPERSONATION_BANK",
            TriggerTag::FinancialRisk => "FINANCIAL_RISK",
            TriggerTag::NoRiskDetected => "NO_RISK_DETECTED",
            TriggerTag::Other(tag) => tag,
        }
    }
}

impl From<String> for TriggerTag {
    fn from(raw: String) -> Self {
        let tag = raw.trim().to_ascii_uppercase();
        match tag.as_str() {
            "REQUEST_OTP" => TriggerTag::RequestOtp,
            "REQUEST_UPI_PIN" => TriggerTag::RequestUpiPin,
            "REMOTE_ACCESS" | "REMOTE_ACCESS_APP" => TriggerTag::RemoteAccess,
            "URGENCY_SCAM" | "URGENCY_PRESSURE" => TriggerTag::UrgencyScam,
            "REGIONAL_FRAUD_PATTERN" => TriggerTag::RegionalFraudPattern,
            "IMPERSONATION_BANK" => TriggerTag::ImpersonationBank,
            "FINANCIAL_RISK" => TriggerTag::FinancialRisk,
            "NO_RISK_DETECTED" | "NO_RISK_SIGNAL" => TriggerTag::NoRiskDetected,
            _ => TriggerTag::Other(tag),
        }
    }
}

impl From<TriggerTag> for String {
    fn from(tag: TriggerTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for TriggerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RISK LABEL
// ============================================================================

/// Ordered risk levels: SAFE < LOW < MEDIUM < HIGH
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLabel {
    Safe,
    Low,
    Medium,
    High,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Safe => "SAFE",
            RiskLabel::Low => "LOW",
            RiskLabel::Medium => "MEDIUM",
            RiskLabel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown risk label {0:?}")]
pub struct UnknownRiskLabel(pub String);

impl FromStr for RiskLabel {
    type Err = UnknownRiskLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        [RiskLabel::Safe, RiskLabel::Low, RiskLabel::Medium, RiskLabel::High]
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| UnknownRiskLabel(s.to_string()))
    }
}

// ============================================================================
// RISK RESULT
// ============================================================================

/// Verdict for one scoring call. Built fresh each time, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskResult {
    risk_score: u8,
    risk_label: RiskLabel,
    explanation: String,
    triggers: BTreeSet<TriggerTag>,
}

impl RiskResult {
    /// Clamps the score to 0..=100 and fills an empty trigger set with
    /// `NO_RISK_DETECTED`.
    pub fn new(
        risk_score: u32,
        risk_label: RiskLabel,
        explanation: impl Into<String>,
        triggers: impl IntoIterator<Item = TriggerTag>,
    ) -> Self {
        let mut triggers: BTreeSet<TriggerTag> = triggers.into_iter().collect();
        if triggers.is_empty() {
            triggers.insert(TriggerTag::NoRiskDetected);
        }

        Self {
            risk_score: risk_score.min(MAX_RISK_SCORE as u32) as u8,
            risk_label,
            explanation: explanation.into(),
            triggers,
        }
    }

    pub fn score(&self) -> u8 {
        self.risk_score
    }

    pub fn label(&self) -> RiskLabel {
        self.risk_label
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn triggers(&self) -> &BTreeSet<TriggerTag> {
        &self.triggers
    }

    pub fn has_trigger(&self, tag: &TriggerTag) -> bool {
        self.triggers.contains(tag)
    }
}

// ============================================================================
// TESTS
// ============================================================================
