//! Lexicon Module
//!
//! Static, versioned phrase taxonomy used by the rule classifier.
//! Loaded once at startup and shared read-only (`Arc<Lexicon>`).
//!
//! ## Structure
//! - `types`: Category, CategoryWeights, LexiconEntry, tag derivation
//! - `builtin`: default phrase tables (English + transliterated regional)
//! - `loader`: JSON lexicon files

pub mod types;
pub mod builtin;
pub mod loader;

pub use types::{derive_tags, Category, CategoryWeights, LexiconEntry, PhraseSpec};
pub use loader::{LexiconError, LexiconFile};

use std::collections::HashSet;

/// Versioned set of trigger phrases
#[derive(Debug, Clone)]
pub struct Lexicon {
    version: String,
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    /// Build from phrase specs. Phrases are case-folded; a phrase listed
    /// twice keeps its first category.
    pub fn from_specs(
        version: impl Into<String>,
        specs: impl IntoIterator<Item = PhraseSpec>,
        weights: &CategoryWeights,
    ) -> Result<Self, LexiconError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for spec in specs {
            let phrase = spec.phrase.trim().to_lowercase();
            if phrase.is_empty() {
                return Err(LexiconError::EmptyPhrase);
            }
            if !seen.insert(phrase.clone()) {
                log::debug!("Duplicate lexicon phrase ignored: {}", phrase);
                continue;
            }
            entries.push(LexiconEntry::new(phrase, spec.category, weights, spec.tags));
        }

        if entries.is_empty() {
            return Err(LexiconError::Empty);
        }

        Ok(Self {
            version: version.into(),
            entries,
        })
    }

    /// Default taxonomy shipped with the engine
    pub fn builtin(weights: &CategoryWeights) -> Self {
        Self {
            version: crate::constants::BUILTIN_LEXICON_VERSION.to_string(),
            entries: builtin::entries(weights),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_by_category(&self, category: Category) -> usize {
        self.entries.iter().filter(|e| e.category() == category).count()
    }
}
