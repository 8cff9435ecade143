//! JSON lexicon files
//!
//! ```json
//! {
//!   "version": "2024-06-custom",
//!   "entries": [
//!     { "phrase": "gift card", "category": "medium" },
//!     { "phrase": "sbi manager", "category": "high", "tags": ["IMPERSONATION_BANK"] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{CategoryWeights, PhraseSpec};
use super::Lexicon;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse lexicon file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("lexicon contains an empty phrase")]
    EmptyPhrase,

    #[error("lexicon has no entries")]
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconFile {
    #[serde(default)]
    pub version: Option<String>,
    pub entries: Vec<PhraseSpec>,
}

impl Lexicon {
    /// Load a lexicon file. The file name stands in for a missing version.
    pub fn from_json_file(path: &Path, weights: &CategoryWeights) -> Result<Self, LexiconError> {
        log::info!("Loading lexicon from: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let file: LexiconFile = serde_json::from_str(&content)?;

        let version = file.version.unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "custom".to_string())
        });

        let lexicon = Lexicon::from_specs(version, file.entries, weights)?;
        log::info!("Lexicon {} loaded: {} entries", lexicon.version(), lexicon.len());
        Ok(lexicon)
    }
}
