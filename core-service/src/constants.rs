//! Engine Constants
//!
//! Default weights, label boundaries and the fixed explanation templates.
//! Runtime values live in [`crate::EngineConfig`]; these are only defaults.

// ============================================================================
// CATEGORY WEIGHTS
// ============================================================================

/// OTP / PIN / CVV / remote access / KYC / document phrases
pub const DEFAULT_HIGH_WEIGHT: u32 = 80;

/// Lottery / prize / refund / urgency phrases
pub const DEFAULT_MEDIUM_WEIGHT: u32 = 30;

/// Transliterated Hindi / Telugu / Tamil scam phrases
pub const DEFAULT_REGIONAL_WEIGHT: u32 = 50;

// ============================================================================
// LABEL BOUNDARIES
// ============================================================================

/// Rule score at or above this = HIGH
pub const HIGH_SCORE_MIN: u8 = 70;

/// Rule score at or above this (and below HIGH) = MEDIUM
pub const MEDIUM_SCORE_MIN: u8 = 25;

/// Upper bound of every risk score
pub const MAX_RISK_SCORE: u8 = 100;

// ============================================================================
// MODEL CLASSIFIER
// ============================================================================

/// Budget for one model round-trip before falling back to rules
pub const DEFAULT_MODEL_TIMEOUT_MS: u64 = 8_000;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

// ============================================================================
// EXPLANATIONS
// ============================================================================

pub const HIGH_EXPLANATION: &str = "The caller is asking for sensitive information like an OTP, PIN or remote access. \
     Hang up now - banks and support staff never ask for these.";

pub const MEDIUM_EXPLANATION: &str = "The conversation mentions prizes, refunds or urgent pressure that scammers often use. \
     Be cautious and do not share any details.";

pub const SAFE_EXPLANATION: &str = "No obvious scam patterns detected in this conversation.";

pub const PROMOTION_EXPLANATION: &str = "AI was unsure, but keyword patterns in this call were suspicious. \
     Treat the caller with caution.";

/// Version tag of the built-in lexicon
pub const BUILTIN_LEXICON_VERSION: &str = "builtin-2024.1";
