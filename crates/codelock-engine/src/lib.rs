//! Access-control keypad engine.
//!
//! This crate implements the password-evaluation and state-transition core
//! of a self-contained keypad: buffer management, multi-code matching with
//! per-code side effects, allow/deny precedence, lockout-after-N-failures,
//! and outcome relaying to host listeners. Everything peripheral (display
//! rendering, audio, networking) stays on the host side and only receives
//! relay notifications.

pub mod config;
pub mod engine;
pub mod output;
pub mod relay;
pub mod roster;
pub mod state;

pub use config::{EventNames, KeypadConfig, KeypadConfigBuilder, Translations};
pub use engine::{Decision, InputOutcome, KeypadEngine};
pub use output::ControlledOutput;
pub use relay::{RelayBank, RelayPayload, RelayTarget};
pub use roster::DynamicRoster;
