//! Mock device and collaborator implementations.

pub mod loader;
pub mod panel;

pub use loader::{MockRosterHandle, MockRosterLoader, RosterDelivery};
pub use panel::RecordingPanel;
