//! HTTP handlers

pub mod health;
pub mod analyze;
pub mod calls;
pub mod stream;
