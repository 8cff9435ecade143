//! Session Registry
//!
//! Map lock (`parking_lot`) is held only for lookups; each call has its own
//! async lock held across append + score. Scoring and ending go through a
//! `CallHandle`, never through a bare call id, so a stale caller cannot touch
//! a newer session that reuses its id.

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;

use super::types::{CallHandle, CallOwner, SessionError, SessionSlot};
use crate::logic::fusion::FusionPolicy;
use crate::logic::types::{IncomingTurn, RiskResult, Turn};

#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<SessionSlot>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `call_id`
    pub fn begin_call(&self, call_id: &str, owner: CallOwner) -> Result<CallHandle, SessionError> {
        let mut sessions = self.sessions.lock();
        if sessions.contains_key(call_id) {
            return Err(SessionError::AlreadyActive(call_id.to_string()));
        }

        let handle = CallHandle::open(call_id, owner);
        sessions.insert(call_id.to_string(), handle.slot.clone());
        log::info!("Call {} started by {:?} ({} active)", call_id, owner, sessions.len());
        Ok(handle)
    }

    /// Handle of an API-owned call. Calls held by a live stream are refused.
    pub fn lookup(&self, call_id: &str) -> Result<CallHandle, SessionError> {
        let slot = self
            .sessions
            .lock()
            .get(call_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(call_id.to_string()))?;

        if slot.owner != CallOwner::Api {
            return Err(SessionError::NotOwner(call_id.to_string()));
        }

        Ok(CallHandle {
            call_id: call_id.to_string(),
            slot,
        })
    }

    /// Validate, append and score one turn.
    ///
    /// Waits for any earlier turn of the same call to finish scoring first.
    pub async fn submit_turn(
        &self,
        call: &CallHandle,
        incoming: IncomingTurn,
        policy: &FusionPolicy,
    ) -> Result<RiskResult, SessionError> {
        let turn = Turn::try_from(incoming)?;

        let mut session = call.slot.session.lock().await;
        if call.is_closed() {
            return Err(SessionError::Closed(call.call_id.clone()));
        }

        session.append(turn);
        let result = policy.score(session.transcript()).await;

        log::info!(
            "Call {} turn {}: {} ({})",
            call.call_id,
            session.turn_count(),
            result.label(),
            result.score()
        );
        Ok(result)
    }

    /// Close the session and drop its transcript. Returns the turn count.
    ///
    /// Only the handle's own session is removed from the map.
    pub async fn end_call(&self, call: &CallHandle) -> Result<usize, SessionError> {
        if call.slot.closed.swap(true, Ordering::SeqCst) {
            return Err(SessionError::Closed(call.call_id.clone()));
        }

        {
            let mut sessions = self.sessions.lock();
            let owns_entry = sessions
                .get(&call.call_id)
                .map_or(false, |slot| Arc::ptr_eq(slot, &call.slot));
            if owns_entry {
                sessions.remove(&call.call_id);
            }
        }

        let turns = call.slot.session.lock().await.turn_count();
        log::info!("Call {} ended after {} turns", call.call_id, turns);
        Ok(turns)
    }

    /// Copy of the transcript so far
    pub async fn transcript(&self, call: &CallHandle) -> Result<Vec<Turn>, SessionError> {
        let session = call.slot.session.lock().await;
        if call.is_closed() {
            return Err(SessionError::Closed(call.call_id.clone()));
        }
        Ok(session.transcript().to_vec())
    }

    /// End API-owned calls with no new turn for `max_idle`.
    ///
    /// Stream-owned calls end with their socket and are never swept. A call
    /// that is busy scoring is skipped. Returns how many calls were ended.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.lock();
        let before = sessions.len();

        sessions.retain(|call_id, slot| {
            if slot.owner != CallOwner::Api {
                return true;
            }
            let idle = match slot.session.try_lock() {
                Ok(session) => (now - session.last_activity())
                    .to_std()
                    .map_or(false, |elapsed| elapsed >= max_idle),
                Err(_) => false,
            };
            if idle {
                slot.closed.store(true, Ordering::SeqCst);
                log::info!("Call {} idle for {:?}, ended", call_id, max_idle);
            }
            !idle
        });

        before - sessions.len()
    }

    pub fn is_active(&self, call_id: &str) -> bool {
        self.sessions.lock().contains_key(call_id)
    }

    pub fn active_calls(&self) -> usize {
        self.sessions.lock().len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
