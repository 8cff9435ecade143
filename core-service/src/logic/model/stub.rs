//! Deterministic model classifier
//!
//! Replies with a fixed outcome and counts invocations, so callers can
//! assert whether the model was consulted at all.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::extract::{format_history, parse_reply};
use super::types::{ModelError, ModelJudgement};
use super::ModelClassifier;
use crate::logic::types::Turn;

#[derive(Debug, Clone)]
pub enum StubReply {
    /// Return this judgement
    Judgement(ModelJudgement),
    /// Run this raw text through the normal reply parser
    Raw(String),
    /// Fail as if the endpoint were unreachable
    Unavailable,
    /// Never answer within any sane budget
    Hang,
}

pub struct StaticClassifier {
    reply: StubReply,
    calls: AtomicUsize,
    last_history: Mutex<Option<String>>,
}

impl StaticClassifier {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_history: Mutex::new(None),
        }
    }

    pub fn replying(judgement: ModelJudgement) -> Self {
        Self::new(StubReply::Judgement(judgement))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// History text of the most recent call
    pub fn last_history(&self) -> Option<String> {
        self.last_history.lock().clone()
    }
}

#[async_trait]
impl ModelClassifier for StaticClassifier {
    fn name(&self) -> &str {
        "static"
    }

    async fn judge(&self, turns: &[Turn]) -> Result<ModelJudgement, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_history.lock() = Some(format_history(turns));

        match &self.reply {
            StubReply::Judgement(judgement) => Ok(judgement.clone()),
            StubReply::Raw(text) => parse_reply(text),
            StubReply::Unavailable => Err(ModelError::Status(503)),
            StubReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ModelError::Timeout(Duration::from_secs(3600)))
            }
        }
    }
}
