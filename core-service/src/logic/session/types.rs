//! Session Types

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::logic::types::{Turn, TurnError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("call {0} not found")]
    NotFound(String),

    #[error("call {0} has ended")]
    Closed(String),

    #[error("call {0} is already active")]
    AlreadyActive(String),

    #[error("call {0} belongs to another connection")]
    NotOwner(String),

    #[error("invalid turn: {0}")]
    InvalidTurn(#[from] TurnError),
}

/// Transport path that opened a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOwner {
    /// Plain HTTP: any request naming the call id may use it
    Api,
    /// A live socket: only the socket's own handle may use it
    Stream,
}

/// Transcript of one call
#[derive(Debug, Clone)]
pub struct CallSession {
    call_id: String,
    transcript: Vec<Turn>,
    started_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl CallSession {
    pub fn new(call_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            call_id: call_id.into(),
            transcript: Vec::new(),
            started_at: now,
            last_activity: now,
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time of the last appended turn, or of the start
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Turns in arrival order
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn turn_count(&self) -> usize {
        self.transcript.len()
    }

    pub(crate) fn append(&mut self, turn: Turn) {
        self.transcript.push(turn);
        self.last_activity = Utc::now();
    }
}

#[derive(Debug)]
pub(crate) struct SessionSlot {
    pub(crate) owner: CallOwner,
    pub(crate) closed: AtomicBool,
    pub(crate) session: tokio::sync::Mutex<CallSession>,
}

/// Reference to one specific session.
///
/// Holds the session itself rather than its id, so a handle can never reach
/// a later call that reuses the same id.
#[derive(Debug, Clone)]
pub struct CallHandle {
    pub(crate) call_id: String,
    pub(crate) slot: Arc<SessionSlot>,
}

impl CallHandle {
    pub(crate) fn open(call_id: &str, owner: CallOwner) -> Self {
        Self {
            call_id: call_id.to_string(),
            slot: Arc::new(SessionSlot {
                owner,
                closed: AtomicBool::new(false),
                session: tokio::sync::Mutex::new(CallSession::new(call_id)),
            }),
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn owner(&self) -> CallOwner {
        self.slot.owner
    }

    pub fn is_closed(&self) -> bool {
        self.slot.closed.load(Ordering::SeqCst)
    }
}
