//! Engine-level errors (startup only - scoring never fails)

use thiserror::Error;

use crate::logic::lexicon::LexiconError;
use crate::logic::model::ModelError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("lexicon: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("model classifier: {0}")]
    Model(#[from] ModelError),
}
