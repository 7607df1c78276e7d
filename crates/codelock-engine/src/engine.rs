//! The keypad engine: buffer management, evaluation, and outcome relaying.
//!
//! One engine instance is authoritative over one keypad. It is driven by
//! [`KeypadEngine::submit_input`], one token at a time, and reacts by
//! mutating its own runtime state, flipping its controlled outputs, and
//! notifying relay targets. There is no internal locking: the host invokes
//! the engine sequentially, and independent instances share nothing.
//!
//! # Evaluation precedence
//!
//! On confirm, the decision is `(code matched AND not denied) OR allowed`:
//! the deny list overrides a correct code, and the allow list overrides
//! everything including deny-list membership. Allow > deny > code match.
//!
//! # Examples
//!
//! ```
//! use codelock_engine::{KeypadConfig, KeypadEngine, InputOutcome, Decision};
//! use codelock_core::{CodeMatch, Token};
//!
//! let config = KeypadConfig::builder()
//!     .with_primary_code("1234")
//!     .with_primary_output("main-door")
//!     .build();
//! let mut engine = KeypadEngine::new(config);
//!
//! for c in "1234".chars() {
//!     engine.submit_input(Token::Key(c));
//! }
//! let outcome = engine.submit_input(Token::Confirm);
//!
//! assert_eq!(
//!     outcome,
//!     InputOutcome::Decided(Decision::Granted(CodeMatch::Code(0)))
//! );
//! assert!(engine.primary_outputs()[0].is_released());
//! ```

use crate::config::KeypadConfig;
use crate::output::ControlledOutput;
use crate::relay::{RelayBank, RelayPayload, RelayTarget};
use crate::roster::DynamicRoster;
use crate::state::RuntimeState;
use codelock_core::constants::MARKER_NO_MATCH;
use codelock_core::{ActorId, CodeMatch, KeypadEvent, KeypadState, Passcode, Token, VERSION};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Result of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Access granted, with the match that produced it.
    Granted(CodeMatch),
    /// Access denied.
    Denied,
}

/// Outcome of one [`KeypadEngine::submit_input`] call.
///
/// Rejections are outcomes, not errors: a full buffer or a locked keypad is
/// expected behavior, reported as state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputOutcome {
    /// Key appended to the buffer.
    Appended,
    /// Buffer already at max length; input rejected, nothing changed.
    CapacityRejected,
    /// Buffer cleared (and granted effects reverted when configured).
    Cleared,
    /// Confirm rejected because the keypad is locked.
    LockedRejected,
    /// Input masking flipped; display-only.
    VisibilityToggled,
    /// Confirm ran an evaluation.
    Decided(Decision),
}

/// Access-control keypad engine.
///
/// Owns its configuration (already normalized by the builder), its runtime
/// state, the unified code table, the controlled outputs, the dynamic
/// allow-list roster, and the relay bank.
pub struct KeypadEngine {
    id: String,
    config: KeypadConfig,
    state: RuntimeState,
    /// Unified match table: primary codes first, then additional codes.
    table: Vec<Passcode>,
    primary_count: usize,
    /// Shared output set released on any grant.
    primary_outputs: Vec<ControlledOutput>,
    /// Outputs bound 1:1 to additional codes; only populated when key
    /// separation survived normalization.
    bound_outputs: Vec<ControlledOutput>,
    roster: DynamicRoster,
    relays: RelayBank,
    actor: ActorId,
}

impl KeypadEngine {
    /// Create an engine from a (builder-normalized) configuration.
    ///
    /// The actor identity starts at the [`ActorId::unknown`] sentinel; call
    /// [`set_actor`](Self::set_actor) once the host knows who is present.
    pub fn new(config: KeypadConfig) -> Self {
        let table: Vec<Passcode> = config
            .primary_codes()
            .iter()
            .chain(config.additional_codes().iter())
            .map(|c| Passcode::new(c.clone()))
            .collect();
        let primary_count = config.primary_codes().len();

        let mut primary_outputs: Vec<ControlledOutput> = config
            .primary_outputs()
            .iter()
            .map(|label| ControlledOutput::new(label.clone(), config.hide_on_grant()))
            .collect();
        let mut bound_outputs = Vec::new();
        if config.key_separation() {
            bound_outputs = config
                .additional_outputs()
                .iter()
                .map(|label| ControlledOutput::new(label.clone(), config.hide_on_grant()))
                .collect();
        } else {
            // Without key separation every output belongs to the shared set.
            primary_outputs.extend(
                config
                    .additional_outputs()
                    .iter()
                    .map(|label| ControlledOutput::new(label.clone(), config.hide_on_grant())),
            );
        }

        let roster = DynamicRoster::new(config.roster_delimiter());
        let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
        info!(
            keypad = %id,
            version = VERSION,
            codes = table.len(),
            key_separation = config.key_separation(),
            "keypad engine started"
        );

        Self {
            id,
            config,
            state: RuntimeState::new(),
            table,
            primary_count,
            primary_outputs,
            bound_outputs,
            roster,
            relays: RelayBank::new(),
            actor: ActorId::unknown(),
        }
    }

    /// Register a relay target for one notification kind. Targets are held
    /// weakly and notified in registration order.
    pub fn add_relay<T: RelayTarget + 'static>(
        &mut self,
        event: KeypadEvent,
        target: &Rc<RefCell<T>>,
    ) {
        self.relays.register(event, target);
    }

    /// Replace the current actor identity.
    ///
    /// When auto-grant is configured, the new actor is immediately checked
    /// against the allow list and the dynamic roster; returns `true` when
    /// that check granted access. Register relay targets before setting the
    /// actor if the host wants to observe the auto-grant notification.
    pub fn set_actor(&mut self, actor: ActorId) -> bool {
        self.actor = actor;
        self.try_auto_grant()
    }

    /// Process one token. Runs to completion before the next call; the only
    /// other entry points are the roster callbacks and the lockout reset.
    pub fn submit_input(&mut self, token: Token) -> InputOutcome {
        match token {
            Token::Key(c) => self.append_key(c),
            Token::Clear => self.clear(),
            Token::ToggleVisibility => {
                self.state.mask_input = !self.state.mask_input;
                InputOutcome::VisibilityToggled
            }
            Token::Confirm => {
                // Lockout suppresses evaluation only; typing and clearing
                // stay available.
                if self.state.state.is_locked() {
                    debug!(keypad = %self.id, "confirm rejected while locked");
                    self.emit(KeypadEvent::Locked, MARKER_NO_MATCH);
                    InputOutcome::LockedRejected
                } else {
                    self.evaluate()
                }
            }
        }
    }

    /// Roster delivery callback: append the chunk, re-derive the full
    /// roster, then re-check auto-grant for the current actor. Returns
    /// `true` when the delivery itself granted access.
    pub fn on_list_delivered(&mut self, chunk: &str) -> bool {
        self.roster.deliver(chunk);
        info!(
            keypad = %self.id,
            entries = self.roster.entries().len(),
            "roster delivery applied"
        );
        self.try_auto_grant()
    }

    /// Roster delivery failure callback: logged and otherwise ignored; the
    /// previously derived roster stays in effect.
    pub fn on_list_delivery_failed(&mut self, reason: &str) {
        warn!(keypad = %self.id, reason, "roster delivery failed, keeping previous roster");
    }

    /// External lockout reset: back to Idle, attempt counter zeroed.
    /// Lockout has no auto-expiry; this is the only way out.
    pub fn reset_lockout(&mut self) {
        if self.state.state.is_locked() {
            info!(keypad = %self.id, "lockout reset");
        }
        self.state.state = KeypadState::Idle;
        self.state.failed_attempts = 0;
    }

    pub fn state(&self) -> KeypadState {
        self.state.state
    }

    pub fn buffer(&self) -> &str {
        &self.state.buffer
    }

    /// Buffer as a display would render it: masked unless visibility was
    /// toggled on.
    pub fn display_buffer(&self) -> String {
        self.state.display_buffer(self.config.mask_char())
    }

    pub fn failed_attempts(&self) -> u32 {
        self.state.failed_attempts
    }

    pub fn is_granted(&self) -> bool {
        self.state.granted
    }

    /// Match recorded by the most recent grant.
    pub fn last_match(&self) -> CodeMatch {
        self.state.last_match
    }

    pub fn primary_outputs(&self) -> &[ControlledOutput] {
        &self.primary_outputs
    }

    pub fn bound_outputs(&self) -> &[ControlledOutput] {
        &self.bound_outputs
    }

    pub fn roster(&self) -> &DynamicRoster {
        &self.roster
    }

    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    pub fn config(&self) -> &KeypadConfig {
        &self.config
    }

    fn append_key(&mut self, c: char) -> InputOutcome {
        if self.state.buffer.chars().count() >= self.config.max_input_length() {
            debug!(keypad = %self.id, limit = self.config.max_input_length(), "input limit reached");
            return InputOutcome::CapacityRejected;
        }
        self.state.buffer.push(c);
        InputOutcome::Appended
    }

    fn clear(&mut self) -> InputOutcome {
        if self.state.granted && self.config.revert_on_clear() {
            self.secure_all();
            self.state.granted = false;
        }
        // Closed carries the buffer being abandoned, then the buffer resets.
        self.emit(KeypadEvent::Closed, MARKER_NO_MATCH);
        self.state.buffer.clear();
        InputOutcome::Cleared
    }

    fn evaluate(&mut self) -> InputOutcome {
        let actor = self.actor.as_str();
        let on_allow =
            self.config.allow_list().iter().any(|a| a == actor) || self.roster.contains(actor);
        let on_deny = self.config.deny_list().iter().any(|a| a == actor);
        let matched = self
            .table
            .iter()
            .position(|code| code.matches(&self.state.buffer));

        // Allow > deny > code match.
        if (matched.is_some() && !on_deny) || on_allow {
            let result = match matched {
                Some(i) if !on_deny => CodeMatch::Code(i),
                _ => CodeMatch::AllowList,
            };
            self.apply_grant(result);
            InputOutcome::Decided(Decision::Granted(result))
        } else {
            // Deny-list members are not told why; they just see a denial.
            self.apply_deny();
            InputOutcome::Decided(Decision::Denied)
        }
    }

    fn try_auto_grant(&mut self) -> bool {
        if !self.config.auto_grant_allowed()
            || self.state.state.is_locked()
            || self.state.granted
        {
            return false;
        }
        let actor = self.actor.as_str();
        if self.config.allow_list().iter().any(|a| a == actor) || self.roster.contains(actor) {
            info!(keypad = %self.id, %actor, "auto-granting allowed actor");
            self.apply_grant(CodeMatch::AllowList);
            true
        } else {
            false
        }
    }

    fn apply_grant(&mut self, matched: CodeMatch) {
        match matched {
            // Key separation: exactly the bound output for the matched
            // additional code releases; everything else secures.
            CodeMatch::Code(i) if self.config.key_separation() && i >= self.primary_count => {
                let bound = i - self.primary_count;
                for (j, output) in self.bound_outputs.iter_mut().enumerate() {
                    if j == bound {
                        output.release();
                    } else {
                        output.secure();
                    }
                }
                for output in &mut self.primary_outputs {
                    output.secure();
                }
            }
            _ => {
                for output in &mut self.primary_outputs {
                    output.release();
                }
                for output in &mut self.bound_outputs {
                    output.secure();
                }
            }
        }

        self.state.granted = true;
        self.state.last_match = matched;
        info!(keypad = %self.id, marker = matched.marker(), "access granted");
        self.emit(KeypadEvent::Granted, matched.marker());

        // The buffer survives a plain code-match grant so a paired
        // confirm-again flow can reuse it; only the allow-list path clears.
        if matched == CodeMatch::AllowList {
            self.state.buffer.clear();
        }
    }

    fn apply_deny(&mut self) {
        self.secure_all();
        info!(keypad = %self.id, attempts = self.state.failed_attempts + 1, "access denied");
        self.emit(KeypadEvent::Denied, MARKER_NO_MATCH);
        self.state.buffer.clear();
        self.state.failed_attempts += 1;

        if self.config.lockout_enabled()
            && self.state.failed_attempts >= self.config.max_attempts()
        {
            self.state.state = KeypadState::Locked;
            warn!(
                keypad = %self.id,
                attempts = self.state.failed_attempts,
                "too many failed attempts, keypad locked"
            );
            self.emit(KeypadEvent::Locked, MARKER_NO_MATCH);
        }
    }

    fn secure_all(&mut self) {
        for output in &mut self.primary_outputs {
            output.secure();
        }
        for output in &mut self.bound_outputs {
            output.secure();
        }
    }

    fn emit(&self, event: KeypadEvent, marker: i32) {
        let names = self.config.event_names();
        let event_name = match event {
            KeypadEvent::Closed => names.on_closed.clone(),
            KeypadEvent::Denied => names.on_denied.clone(),
            KeypadEvent::Granted => names.on_granted.clone(),
            KeypadEvent::Locked => names.on_locked.clone(),
        };
        let payload = RelayPayload {
            event,
            event_name,
            buffer: self.state.buffer.clone(),
            marker,
        };
        self.relays.notify(&payload);
    }
}

impl std::fmt::Debug for KeypadEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypadEngine")
            .field("id", &self.id)
            .field("state", &self.state.state)
            .field("buffer_len", &self.state.buffer.len())
            .field("failed_attempts", &self.state.failed_attempts)
            .field("granted", &self.state.granted)
            .finish()
    }
}
