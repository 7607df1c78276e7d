//! Relay targets: the opaque listeners notified of keypad outcomes.
//!
//! Listeners are heterogeneous host objects (doors, sounds, teleporters,
//! loggers); the engine never branches on what a listener is, it only calls
//! the uniform [`RelayTarget::notify`] capability. Targets are held weakly:
//! a listener the host has dropped is skipped in order, never an error.

use codelock_core::KeypadEvent;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Notification payload delivered to relay targets.
///
/// `marker` is the flattened [`CodeMatch`](codelock_core::CodeMatch):
/// `-1` not applicable, `-2` allow-list grant, `>= 0` matched table index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayPayload {
    /// Notification kind.
    pub event: KeypadEvent,
    /// Configured event name for this kind, carried for hosts that dispatch
    /// by string.
    pub event_name: String,
    /// Buffer contents at the moment of the notification.
    pub buffer: String,
    /// Matched-code marker.
    pub marker: i32,
}

/// Uniform notification capability implemented by host listeners.
pub trait RelayTarget {
    fn notify(&mut self, payload: &RelayPayload);
}

/// Per-event ordered lists of weakly-held relay targets.
#[derive(Default)]
pub struct RelayBank {
    closed: Vec<Weak<RefCell<dyn RelayTarget>>>,
    denied: Vec<Weak<RefCell<dyn RelayTarget>>>,
    granted: Vec<Weak<RefCell<dyn RelayTarget>>>,
    locked: Vec<Weak<RefCell<dyn RelayTarget>>>,
}

impl RelayBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target for one event kind. The bank keeps only a weak
    /// reference; the host owns the listener.
    pub fn register<T: RelayTarget + 'static>(
        &mut self,
        event: KeypadEvent,
        target: &Rc<RefCell<T>>,
    ) {
        let target: Rc<RefCell<dyn RelayTarget>> = target.clone();
        let weak: Weak<RefCell<dyn RelayTarget>> = Rc::downgrade(&target);
        self.list_mut(event).push(weak);
    }

    /// Notify all live targets registered for `payload.event`, in
    /// registration order. Dropped targets are skipped.
    pub fn notify(&self, payload: &RelayPayload) {
        for target in self.list(payload.event) {
            if let Some(target) = target.upgrade() {
                target.borrow_mut().notify(payload);
            }
        }
    }

    /// Number of registered (live or dropped) targets for an event kind.
    pub fn len(&self, event: KeypadEvent) -> usize {
        self.list(event).len()
    }

    pub fn is_empty(&self, event: KeypadEvent) -> bool {
        self.list(event).is_empty()
    }

    fn list(&self, event: KeypadEvent) -> &[Weak<RefCell<dyn RelayTarget>>] {
        match event {
            KeypadEvent::Closed => &self.closed,
            KeypadEvent::Denied => &self.denied,
            KeypadEvent::Granted => &self.granted,
            KeypadEvent::Locked => &self.locked,
        }
    }

    fn list_mut(&mut self, event: KeypadEvent) -> &mut Vec<Weak<RefCell<dyn RelayTarget>>> {
        match event {
            KeypadEvent::Closed => &mut self.closed,
            KeypadEvent::Denied => &mut self.denied,
            KeypadEvent::Granted => &mut self.granted,
            KeypadEvent::Locked => &mut self.locked,
        }
    }
}

impl std::fmt::Debug for RelayBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayBank")
            .field("closed", &self.closed.len())
            .field("denied", &self.denied.len())
            .field("granted", &self.granted.len())
            .field("locked", &self.locked.len())
            .finish()
    }
}
