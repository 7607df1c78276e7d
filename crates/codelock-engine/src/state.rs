//! Mutable runtime state owned by one engine instance.
//!
//! All of this is in-memory only and dies with the engine; nothing persists
//! across a reload (deliberate non-goal). The state is mutated exclusively
//! from the engine's own call path, so independent keypad instances never
//! share anything.

use codelock_core::{CodeMatch, KeypadState};

/// Runtime state of a keypad engine.
#[derive(Debug, Clone)]
pub struct RuntimeState {
    /// In-progress input buffer, bounded by the configured max length.
    pub(crate) buffer: String,

    /// Set once access has been granted and not yet reverted by a clear.
    pub(crate) granted: bool,

    /// Consecutive denial counter. Monotonic until lockout or external
    /// reset; a grant does not reset it.
    pub(crate) failed_attempts: u32,

    /// Idle or Locked.
    pub(crate) state: KeypadState,

    /// Result of the most recent evaluation that granted access.
    pub(crate) last_match: CodeMatch,

    /// Whether the display should mask typed input.
    pub(crate) mask_input: bool,
}

impl RuntimeState {
    pub(crate) fn new() -> Self {
        Self {
            buffer: String::new(),
            granted: false,
            failed_attempts: 0,
            state: KeypadState::Idle,
            last_match: CodeMatch::None,
            mask_input: true,
        }
    }

    /// Buffer rendered for a display: masked (`"* * *"`) unless visibility
    /// was toggled on. Pure formatting helper, no transition effect.
    pub(crate) fn display_buffer(&self, mask_char: char) -> String {
        if self.mask_input {
            let masks: Vec<String> = self.buffer.chars().map(|_| mask_char.to_string()).collect();
            masks.join(" ")
        } else {
            self.buffer.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let state = RuntimeState::new();
        assert!(state.buffer.is_empty());
        assert!(!state.granted);
        assert_eq!(state.failed_attempts, 0);
        assert_eq!(state.state, KeypadState::Idle);
        assert_eq!(state.last_match, CodeMatch::None);
        assert!(state.mask_input);
    }

    #[test]
    fn test_display_buffer_masked() {
        let mut state = RuntimeState::new();
        state.buffer = "123".to_string();
        assert_eq!(state.display_buffer('*'), "* * *");
    }

    #[test]
    fn test_display_buffer_visible() {
        let mut state = RuntimeState::new();
        state.buffer = "123".to_string();
        state.mask_input = false;
        assert_eq!(state.display_buffer('*'), "123");
    }

    #[test]
    fn test_display_buffer_empty() {
        let state = RuntimeState::new();
        assert_eq!(state.display_buffer('*'), "");
    }
}
