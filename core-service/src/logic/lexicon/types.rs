//! Lexicon Types
//!
//! Categories, weight table and entries. No matching logic here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HIGH_WEIGHT, DEFAULT_MEDIUM_WEIGHT, DEFAULT_REGIONAL_WEIGHT};
use crate::logic::types::TriggerTag;

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// OTP, PIN, CVV, remote access, KYC, identity documents
    High,
    /// Lottery, prize, refund, urgency
    Medium,
    /// Transliterated Hindi / Telugu / Tamil scam phrases
    Regional,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::High => "high",
            Category::Medium => "medium",
            Category::Regional => "regional",
        }
    }
}

// ============================================================================
// WEIGHTS
// ============================================================================

/// Score added per firing entry, by category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub high: u32,
    pub medium: u32,
    pub regional: u32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_WEIGHT,
            medium: DEFAULT_MEDIUM_WEIGHT,
            regional: DEFAULT_REGIONAL_WEIGHT,
        }
    }
}

impl CategoryWeights {
    pub fn weight(&self, category: Category) -> u32 {
        match category {
            Category::High => self.high,
            Category::Medium => self.medium,
            Category::Regional => self.regional,
        }
    }
}

// ============================================================================
// ENTRIES
// ============================================================================

/// Phrase definition before weights are applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseSpec {
    pub phrase: String,
    pub category: Category,
    /// Extra tags on top of the derived ones
    #[serde(default)]
    pub tags: Vec<TriggerTag>,
}

impl PhraseSpec {
    pub fn new(phrase: impl Into<String>, category: Category) -> Self {
        Self {
            phrase: phrase.into(),
            category,
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: TriggerTag) -> Self {
        self.tags.push(tag);
        self
    }
}

/// One weighted trigger phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    phrase: String,
    category: Category,
    weight: u32,
    tags: BTreeSet<TriggerTag>,
}

impl LexiconEntry {
    /// `phrase` must already be case-folded.
    pub fn new(
        phrase: String,
        category: Category,
        weights: &CategoryWeights,
        extra_tags: impl IntoIterator<Item = TriggerTag>,
    ) -> Self {
        let mut tags = derive_tags(&phrase, category);
        tags.extend(extra_tags);
        // every firing entry must explain itself
        if tags.is_empty() {
            tags.insert(TriggerTag::FinancialRisk);
        }

        Self {
            weight: weights.weight(category),
            phrase,
            category,
            tags,
        }
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn tags(&self) -> &BTreeSet<TriggerTag> {
        &self.tags
    }
}

/// Tags implied by a phrase's wording and category.
///
/// Plain substring checks: "code" also matches "encode", "pin" also matches
/// "shopping". Known false-positive source, kept as is.
pub fn derive_tags(phrase: &str, category: Category) -> BTreeSet<TriggerTag> {
    let mut tags = BTreeSet::new();

    if phrase.contains("otp") || phrase.contains("code") {
        tags.insert(TriggerTag::RequestOtp);
    }
    if phrase.contains("pin") {
        tags.insert(TriggerTag::RequestUpiPin);
    }
    if phrase.contains("anydesk") || phrase.contains("share") {
        tags.insert(TriggerTag::RemoteAccess);
    }

    match category {
        Category::Medium => {
            tags.insert(TriggerTag::UrgencyScam);
        }
        Category::Regional => {
            tags.insert(TriggerTag::RegionalFraudPattern);
        }
        Category::High => {}
    }

    tags
}
