//! Session Module
//!
//! One append-only transcript per active call. Turns of the same call are
//! scored strictly one after another; different calls run in parallel.

pub mod types;
pub mod registry;

pub use types::{CallHandle, CallOwner, CallSession, SessionError};
pub use registry::SessionRegistry;
