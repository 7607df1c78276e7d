use crate::{Result, constants::{MARKER_ALLOW_LIST, MARKER_NO_MATCH}, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// One unit of keypad input.
///
/// A physical panel maps each button press to exactly one token: digit and
/// character buttons produce [`Token::Key`], the clear button produces
/// [`Token::Clear`], the confirm button produces [`Token::Confirm`], and the
/// show/hide button produces [`Token::ToggleVisibility`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    /// Literal character to append to the input buffer.
    Key(char),

    /// Clear the buffer and revert granted effects when configured.
    Clear,

    /// Evaluate the buffer against the configured codes.
    Confirm,

    /// Flip input masking on the display. Display-only, no evaluation effect.
    ToggleVisibility,
}

impl Token {
    /// Create a key token with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidToken` if the character is a control character,
    /// which a physical panel can never produce.
    pub fn key(c: char) -> Result<Self> {
        if c.is_control() {
            return Err(Error::InvalidToken {
                message: format!("control character {:?} is not a keypad key", c),
            });
        }
        Ok(Token::Key(c))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Key(c) => write!(f, "{}", c),
            Token::Clear => write!(f, "CLEAR"),
            Token::Confirm => write!(f, "CONFIRM"),
            Token::ToggleVisibility => write!(f, "TOGGLE_VISIBILITY"),
        }
    }
}

/// A configured passcode.
///
/// # Security
/// Codes are compared in plaintext (this is access convenience, not a vault),
/// but the comparison itself is constant-time so a match reveals nothing
/// about how many leading characters were right.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Passcode(String);

impl Passcode {
    /// Wrap a code string. Length policy is enforced by the engine
    /// configuration, not here.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Passcode(code.into())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes (codes are ASCII in practice).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty code, which never matches anything
    /// after normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Constant-time comparison against an input buffer.
    #[must_use]
    pub fn matches(&self, buffer: &str) -> bool {
        self.0.as_bytes().ct_eq(buffer.as_bytes()).into()
    }
}

impl PartialEq for Passcode {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl From<&str> for Passcode {
    fn from(s: &str) -> Self {
        Passcode::new(s)
    }
}

impl fmt::Display for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable string identity of the actor currently at the keypad.
///
/// The engine does not own actors; the host supplies the identity and may
/// replace it at any time. When no actor context exists (local testing,
/// headless runs) the [`ActorId::unknown`] sentinel is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ActorId(name.into())
    }

    /// Sentinel identity for host-less contexts.
    #[must_use]
    pub fn unknown() -> Self {
        ActorId("unknown".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self {
        ActorId::new(s)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of matching the input buffer against the unified code table.
///
/// Relay payloads flatten this to an integer marker for wire compatibility
/// with older listeners; see [`CodeMatch::marker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeMatch {
    /// No code in the table equals the buffer.
    None,

    /// Index into the unified match table (primary codes first, then
    /// additional codes). The lowest index wins on duplicate codes.
    Code(usize),

    /// Access was granted through the allow list without a code match.
    AllowList,
}

impl CodeMatch {
    /// Flatten to the legacy integer marker carried by relay payloads:
    /// `-1` no match, `-2` allow-list grant, `>= 0` table index.
    #[must_use]
    pub fn marker(&self) -> i32 {
        match self {
            CodeMatch::None => MARKER_NO_MATCH,
            CodeMatch::AllowList => MARKER_ALLOW_LIST,
            CodeMatch::Code(i) => *i as i32,
        }
    }

    /// Returns `true` if a code (not the allow list) produced this match.
    #[must_use]
    pub fn is_code(&self) -> bool {
        matches!(self, CodeMatch::Code(_))
    }
}

/// Notification kind delivered to relay targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeypadEvent {
    /// Buffer cleared / keypad closed.
    Closed,

    /// Evaluation rejected the buffer.
    Denied,

    /// Evaluation (or the allow list) accepted the actor.
    Granted,

    /// Lockout engaged, or an evaluation was rejected while locked.
    Locked,
}

impl fmt::Display for KeypadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KeypadEvent::Closed => "Closed",
            KeypadEvent::Denied => "Denied",
            KeypadEvent::Granted => "Granted",
            KeypadEvent::Locked => "Locked",
        };
        write!(f, "{}", s)
    }
}

/// Engine state.
///
/// The keypad has exactly two states: `Idle` accepts input and evaluates on
/// confirm; `Locked` still accepts typing and clearing but rejects every
/// evaluation until an external reset. Lockout has no auto-expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeypadState {
    /// Accepting input and evaluating on confirm.
    Idle,

    /// Too many consecutive denials; evaluation suppressed until reset.
    Locked,
}

impl KeypadState {
    /// Check if a transition to `target` is valid from this state.
    ///
    /// `Idle -> Locked` happens when the attempt counter reaches its limit;
    /// `Locked -> Idle` only through an external reset.
    #[must_use]
    pub fn can_transition_to(&self, target: &KeypadState) -> bool {
        matches!(
            (self, target),
            (KeypadState::Idle, KeypadState::Locked) | (KeypadState::Locked, KeypadState::Idle)
        )
    }

    /// Returns `true` while evaluation is suppressed.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self, KeypadState::Locked)
    }
}

impl fmt::Display for KeypadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeypadState::Idle => write!(f, "Idle"),
            KeypadState::Locked => write!(f, "Locked"),
        }
    }
}
