//! Recording relay panel for integration assertions.

use codelock_core::KeypadEvent;
use codelock_engine::{RelayPayload, RelayTarget};

/// Relay target that records every payload it receives, in order.
///
/// Wrap it in `Rc<RefCell<_>>` and register it with
/// [`KeypadEngine::add_relay`](codelock_engine::KeypadEngine::add_relay);
/// the test keeps the `Rc` and inspects the recording afterwards.
#[derive(Debug, Default)]
pub struct RecordingPanel {
    payloads: Vec<RelayPayload>,
}

impl RecordingPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payloads(&self) -> &[RelayPayload] {
        &self.payloads
    }

    /// Event kinds in notification order.
    pub fn events(&self) -> Vec<KeypadEvent> {
        self.payloads.iter().map(|p| p.event).collect()
    }

    pub fn last(&self) -> Option<&RelayPayload> {
        self.payloads.last()
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn clear(&mut self) {
        self.payloads.clear();
    }
}

impl RelayTarget for RecordingPanel {
    fn notify(&mut self, payload: &RelayPayload) {
        self.payloads.push(payload.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codelock_core::constants::MARKER_NO_MATCH;

    #[test]
    fn test_records_in_order() {
        let mut panel = RecordingPanel::new();
        for event in [KeypadEvent::Denied, KeypadEvent::Locked] {
            panel.notify(&RelayPayload {
                event,
                event_name: "_test".to_string(),
                buffer: String::new(),
                marker: MARKER_NO_MATCH,
            });
        }
        assert_eq!(panel.len(), 2);
        assert_eq!(panel.events(), vec![KeypadEvent::Denied, KeypadEvent::Locked]);
        assert_eq!(panel.last().unwrap().event, KeypadEvent::Locked);
    }
}
