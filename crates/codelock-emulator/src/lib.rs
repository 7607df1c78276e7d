//! Mock collaborators for keypad engine development and testing.
//!
//! The engine core is synchronous; its asynchronous edge is the roster
//! loader, which the host drives through two callbacks. This crate provides
//! a channel-backed mock of that loader plus a recording relay panel, so
//! integrations can be exercised without a real network fetch or scene
//! objects.

pub mod mock;

pub use mock::{MockRosterHandle, MockRosterLoader, RecordingPanel, RosterDelivery};
