//! Rules Module
//!
//! Keyword classifier over the whole accumulated transcript.
//! Synchronous, deterministic, never fails.
//!
//! ## Structure
//! - `thresholds`: score → label boundaries
//! - `classifier`: matching and scoring
//!
//! ## Usage
//! ```ignore
//! let rules = RuleClassifier::new(Arc::new(Lexicon::builtin(&weights)));
//! let result = rules.classify(&turns);
//! ```

pub mod thresholds;
pub mod classifier;

pub use thresholds::LabelThresholds;
pub use classifier::RuleClassifier;
