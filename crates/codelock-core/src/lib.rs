//! Core vocabulary for the codelock keypad engine.
//!
//! This crate holds the types shared by the engine and its collaborators:
//! input tokens, match results, notification kinds, actor identities, the
//! error taxonomy, and the tuning constants that the configuration layer
//! falls back to when normalizing a defective setup.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
