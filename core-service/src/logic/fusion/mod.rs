//! Fusion Module
//!
//! Rule-first scoring with an optional model second opinion. The only
//! scoring entry point of the engine.

pub mod policy;


pub use policy::{reconcile, FusionPolicy};
