//! Keypad configuration and normalization.
//!
//! Configuration is immutable once the engine owns it. Every defective field
//! is corrected to a safe default during [`KeypadConfig::normalize`] and the
//! correction is logged as a warning; a misconfigured keypad stays usable,
//! it never takes the whole host down. The one security-sensitive case is a
//! broken primary code: that is replaced with a random value so the keypad
//! becomes unreachable rather than openable through a predictable fallback.

use codelock_core::constants::{
    DEFAULT_MASK_CHAR, DEFAULT_MAX_INPUT_LENGTH, DEFAULT_PRIMARY_CODE, DEFAULT_ROSTER_DELIMITER,
    EVENT_ON_CLOSED, EVENT_ON_DENIED, EVENT_ON_GRANTED, EVENT_ON_LOCKED, MAX_LIST_ENTRIES,
    TRANSLATION_DENIED, TRANSLATION_GRANTED, TRANSLATION_LOCKED, TRANSLATION_WAITCODE,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Display feedback strings shown by the host for each keypad outcome.
///
/// The engine never renders these itself; they are normalized here so hosts
/// always receive non-empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translations {
    /// Idle prompt.
    pub waitcode: String,
    /// Denial feedback.
    pub denied: String,
    /// Grant feedback.
    pub granted: String,
    /// Lockout feedback.
    pub locked: String,
}

impl Default for Translations {
    fn default() -> Self {
        Self {
            waitcode: TRANSLATION_WAITCODE.to_string(),
            denied: TRANSLATION_DENIED.to_string(),
            granted: TRANSLATION_GRANTED.to_string(),
            locked: TRANSLATION_LOCKED.to_string(),
        }
    }
}

/// Event names carried to relay targets for each notification kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventNames {
    pub on_closed: String,
    pub on_denied: String,
    pub on_granted: String,
    pub on_locked: String,
}

impl Default for EventNames {
    fn default() -> Self {
        Self {
            on_closed: EVENT_ON_CLOSED.to_string(),
            on_denied: EVENT_ON_DENIED.to_string(),
            on_granted: EVENT_ON_GRANTED.to_string(),
            on_locked: EVENT_ON_LOCKED.to_string(),
        }
    }
}

/// Immutable keypad configuration.
///
/// Build one with [`KeypadConfig::builder`]; the builder normalizes the
/// result, so an engine never sees a defective configuration.
///
/// # Examples
///
/// ```
/// use codelock_engine::KeypadConfig;
///
/// let config = KeypadConfig::builder()
///     .with_primary_code("1234")
///     .with_primary_output("main-door")
///     .with_max_attempts(3)
///     .build();
///
/// assert_eq!(config.primary_codes(), ["1234"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeypadConfig {
    primary_codes: Vec<String>,
    additional_codes: Vec<String>,
    allow_list: Vec<String>,
    deny_list: Vec<String>,
    primary_outputs: Vec<String>,
    additional_outputs: Vec<String>,
    max_input_length: usize,
    max_attempts: u32,
    key_separation: bool,
    hide_on_grant: bool,
    revert_on_clear: bool,
    auto_grant_allowed: bool,
    mask_char: char,
    roster_delimiter: String,
    translations: Translations,
    event_names: EventNames,
}

impl KeypadConfig {
    /// Create a builder with safe defaults.
    pub fn builder() -> KeypadConfigBuilder {
        KeypadConfigBuilder::default()
    }

    pub fn primary_codes(&self) -> &[String] {
        &self.primary_codes
    }

    pub fn additional_codes(&self) -> &[String] {
        &self.additional_codes
    }

    pub fn allow_list(&self) -> &[String] {
        &self.allow_list
    }

    pub fn deny_list(&self) -> &[String] {
        &self.deny_list
    }

    pub fn primary_outputs(&self) -> &[String] {
        &self.primary_outputs
    }

    pub fn additional_outputs(&self) -> &[String] {
        &self.additional_outputs
    }

    pub fn max_input_length(&self) -> usize {
        self.max_input_length
    }

    /// Maximum consecutive denials before lockout; `0` disables lockout.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn key_separation(&self) -> bool {
        self.key_separation
    }

    pub fn hide_on_grant(&self) -> bool {
        self.hide_on_grant
    }

    pub fn revert_on_clear(&self) -> bool {
        self.revert_on_clear
    }

    pub fn auto_grant_allowed(&self) -> bool {
        self.auto_grant_allowed
    }

    pub fn mask_char(&self) -> char {
        self.mask_char
    }

    pub fn roster_delimiter(&self) -> &str {
        &self.roster_delimiter
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    pub fn event_names(&self) -> &EventNames {
        &self.event_names
    }

    /// Returns `true` when lockout is active policy.
    pub fn lockout_enabled(&self) -> bool {
        self.max_attempts > 0
    }

    /// Validation pass. Each step is independently idempotent and logged;
    /// none of them fail.
    fn normalize(&mut self) {
        if self.max_input_length == 0 {
            warn!(
                fallback = DEFAULT_MAX_INPUT_LENGTH,
                "max input length was zero, using default"
            );
            self.max_input_length = DEFAULT_MAX_INPUT_LENGTH;
        }

        // Step 1: primary codes. An empty set or a broken code becomes a
        // random value so access is unreachable, not guessable.
        if self.primary_codes.is_empty() {
            warn!("primary code set was empty, generating random code for security");
            self.primary_codes.push(random_code());
        }
        for code in &mut self.primary_codes {
            if code.is_empty() || code.len() > self.max_input_length {
                warn!(
                    max = self.max_input_length,
                    "primary code was empty or over the input limit, generating random code for security"
                );
                *code = random_code();
            }
        }

        // Step 2: oversized lists are wiring mistakes, reset each one.
        reset_if_oversized(&mut self.allow_list, "allow list");
        reset_if_oversized(&mut self.deny_list, "deny list");
        reset_if_oversized(&mut self.additional_codes, "additional code list");
        reset_if_oversized(&mut self.primary_outputs, "primary output list");
        reset_if_oversized(&mut self.additional_outputs, "additional output list");

        // Step 3: key separation needs a 1:1 code/output pairing.
        if self.key_separation && self.additional_codes.len() != self.additional_outputs.len() {
            warn!(
                codes = self.additional_codes.len(),
                outputs = self.additional_outputs.len(),
                "key separation enabled but code and output counts differ, disabling"
            );
            self.key_separation = false;
        }

        // Step 4 needs no correction: max_attempts == 0 simply means
        // lockout is disabled.

        // Step 5: display placeholder and feedback strings.
        if self.mask_char.is_control() {
            warn!("mask character was a control character, using default");
            self.mask_char = DEFAULT_MASK_CHAR;
        }
        if self.roster_delimiter.is_empty() {
            warn!(
                fallback = DEFAULT_ROSTER_DELIMITER,
                "roster delimiter was empty, using default"
            );
            self.roster_delimiter = DEFAULT_ROSTER_DELIMITER.to_string();
        }
        let defaults = Translations::default();
        fill_if_empty(&mut self.translations.waitcode, &defaults.waitcode, "waitcode");
        fill_if_empty(&mut self.translations.denied, &defaults.denied, "denied");
        fill_if_empty(&mut self.translations.granted, &defaults.granted, "granted");
        fill_if_empty(&mut self.translations.locked, &defaults.locked, "locked");

        let default_events = EventNames::default();
        fill_if_empty(&mut self.event_names.on_closed, &default_events.on_closed, "on_closed");
        fill_if_empty(&mut self.event_names.on_denied, &default_events.on_denied, "on_denied");
        fill_if_empty(&mut self.event_names.on_granted, &default_events.on_granted, "on_granted");
        fill_if_empty(&mut self.event_names.on_locked, &default_events.on_locked, "on_locked");
    }
}

impl Default for KeypadConfig {
    fn default() -> Self {
        KeypadConfig::builder().build()
    }
}

/// Non-guessable replacement code for a defective primary code.
fn random_code() -> String {
    Uuid::new_v4().simple().to_string()
}

fn reset_if_oversized(list: &mut Vec<String>, name: &str) {
    if list.len() > MAX_LIST_ENTRIES {
        warn!(
            len = list.len(),
            max = MAX_LIST_ENTRIES,
            "{name} was oversized, most likely unintentional, resetting to empty"
        );
        list.clear();
    }
}

fn fill_if_empty(value: &mut String, fallback: &str, name: &str) {
    if value.is_empty() {
        warn!(fallback, "{name} string was empty, using default");
        *value = fallback.to_string();
    }
}

/// Builder for [`KeypadConfig`].
///
/// # Examples
///
/// ```
/// use codelock_engine::KeypadConfig;
///
/// let config = KeypadConfig::builder()
///     .with_primary_code("2580")
///     .with_additional_code("7777")
///     .with_additional_output("side-door")
///     .with_key_separation(true)
///     .build();
///
/// assert!(config.key_separation());
/// ```
#[derive(Debug, Clone)]
pub struct KeypadConfigBuilder {
    config: KeypadConfig,
    explicit_primary: bool,
}

impl Default for KeypadConfigBuilder {
    fn default() -> Self {
        Self {
            config: KeypadConfig {
                primary_codes: vec![DEFAULT_PRIMARY_CODE.to_string()],
                additional_codes: Vec::new(),
                allow_list: Vec::new(),
                deny_list: Vec::new(),
                primary_outputs: Vec::new(),
                additional_outputs: Vec::new(),
                max_input_length: DEFAULT_MAX_INPUT_LENGTH,
                max_attempts: 0,
                key_separation: false,
                hide_on_grant: true,
                revert_on_clear: true,
                auto_grant_allowed: false,
                mask_char: DEFAULT_MASK_CHAR,
                roster_delimiter: DEFAULT_ROSTER_DELIMITER.to_string(),
                translations: Translations::default(),
                event_names: EventNames::default(),
            },
            explicit_primary: false,
        }
    }
}

impl KeypadConfigBuilder {
    /// Append a primary code. The first explicit code replaces the built-in
    /// default instead of joining it.
    pub fn with_primary_code(mut self, code: impl Into<String>) -> Self {
        if !self.explicit_primary {
            self.config.primary_codes.clear();
            self.explicit_primary = true;
        }
        self.config.primary_codes.push(code.into());
        self
    }

    /// Append an additional code (paired by position with an additional
    /// output when key separation is on).
    pub fn with_additional_code(mut self, code: impl Into<String>) -> Self {
        self.config.additional_codes.push(code.into());
        self
    }

    /// Append an actor to the allow list.
    pub fn with_allowed(mut self, actor: impl Into<String>) -> Self {
        self.config.allow_list.push(actor.into());
        self
    }

    /// Append an actor to the deny list.
    pub fn with_denied(mut self, actor: impl Into<String>) -> Self {
        self.config.deny_list.push(actor.into());
        self
    }

    /// Replace the whole allow list.
    pub fn with_allow_list(mut self, actors: Vec<String>) -> Self {
        self.config.allow_list = actors;
        self
    }

    /// Replace the whole deny list.
    pub fn with_deny_list(mut self, actors: Vec<String>) -> Self {
        self.config.deny_list = actors;
        self
    }

    /// Append a label to the shared primary output set.
    pub fn with_primary_output(mut self, label: impl Into<String>) -> Self {
        self.config.primary_outputs.push(label.into());
        self
    }

    /// Append a bound output label (paired by position with an additional
    /// code when key separation is on).
    pub fn with_additional_output(mut self, label: impl Into<String>) -> Self {
        self.config.additional_outputs.push(label.into());
        self
    }

    pub fn with_max_input_length(mut self, len: usize) -> Self {
        self.config.max_input_length = len;
        self
    }

    /// Lockout threshold; `0` disables lockout entirely.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn with_key_separation(mut self, enabled: bool) -> Self {
        self.config.key_separation = enabled;
        self
    }

    pub fn with_hide_on_grant(mut self, hide: bool) -> Self {
        self.config.hide_on_grant = hide;
        self
    }

    pub fn with_revert_on_clear(mut self, revert: bool) -> Self {
        self.config.revert_on_clear = revert;
        self
    }

    pub fn with_auto_grant_allowed(mut self, enabled: bool) -> Self {
        self.config.auto_grant_allowed = enabled;
        self
    }

    pub fn with_mask_char(mut self, c: char) -> Self {
        self.config.mask_char = c;
        self
    }

    pub fn with_roster_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.roster_delimiter = delimiter.into();
        self
    }

    pub fn with_translations(mut self, translations: Translations) -> Self {
        self.config.translations = translations;
        self
    }

    pub fn with_event_names(mut self, event_names: EventNames) -> Self {
        self.config.event_names = event_names;
        self
    }

    /// Normalize and return the configuration.
    pub fn build(mut self) -> KeypadConfig {
        self.config.normalize();
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config_is_usable() {
        let config = KeypadConfig::default();
        assert_eq!(config.primary_codes(), [DEFAULT_PRIMARY_CODE]);
        assert_eq!(config.max_input_length(), DEFAULT_MAX_INPUT_LENGTH);
        assert!(!config.lockout_enabled());
        assert!(config.hide_on_grant());
        assert!(config.revert_on_clear());
    }

    #[test]
    fn test_explicit_primary_replaces_default() {
        let config = KeypadConfig::builder().with_primary_code("1234").build();
        assert_eq!(config.primary_codes(), ["1234"]);
    }

    #[test]
    fn test_empty_primary_code_replaced_with_random() {
        let config = KeypadConfig::builder().with_primary_code("").build();
        assert_eq!(config.primary_codes().len(), 1);
        let code = &config.primary_codes()[0];
        assert!(!code.is_empty());
        assert_ne!(code, DEFAULT_PRIMARY_CODE);
        // A random replacement is deliberately longer than the input limit,
        // so it can never be typed in.
        assert!(code.len() > config.max_input_length());
    }

    #[test]
    fn test_oversized_code_replaced_with_random() {
        let config = KeypadConfig::builder()
            .with_max_input_length(4)
            .with_primary_code("123456789")
            .build();
        assert_ne!(config.primary_codes()[0], "123456789");
    }

    #[test]
    fn test_oversized_lists_reset_to_empty() {
        let huge: Vec<String> = (0..1000).map(|i| format!("user{i}")).collect();
        let config = KeypadConfig::builder()
            .with_allow_list(huge.clone())
            .with_deny_list(huge)
            .build();
        assert!(config.allow_list().is_empty());
        assert!(config.deny_list().is_empty());
    }

    #[test]
    fn test_list_at_limit_is_kept() {
        let full: Vec<String> = (0..MAX_LIST_ENTRIES).map(|i| format!("user{i}")).collect();
        let config = KeypadConfig::builder().with_allow_list(full).build();
        assert_eq!(config.allow_list().len(), MAX_LIST_ENTRIES);
    }

    #[rstest]
    #[case(2, 1)]
    #[case(0, 3)]
    #[case(1, 0)]
    fn test_key_separation_mismatch_forced_off(#[case] codes: usize, #[case] outputs: usize) {
        let mut builder = KeypadConfig::builder().with_key_separation(true);
        for i in 0..codes {
            builder = builder.with_additional_code(format!("900{i}"));
        }
        for i in 0..outputs {
            builder = builder.with_additional_output(format!("door-{i}"));
        }
        let config = builder.build();
        assert!(!config.key_separation());
    }

    #[test]
    fn test_key_separation_matching_counts_kept() {
        let config = KeypadConfig::builder()
            .with_key_separation(true)
            .with_additional_code("9001")
            .with_additional_output("door-a")
            .build();
        assert!(config.key_separation());
    }

    #[test]
    fn test_control_mask_char_replaced() {
        let config = KeypadConfig::builder().with_mask_char('\t').build();
        assert_eq!(config.mask_char(), DEFAULT_MASK_CHAR);
    }

    #[test]
    fn test_empty_translation_filled() {
        let config = KeypadConfig::builder()
            .with_translations(Translations {
                waitcode: String::new(),
                denied: "NOPE".to_string(),
                granted: String::new(),
                locked: String::new(),
            })
            .build();
        assert_eq!(config.translations().waitcode, TRANSLATION_WAITCODE);
        assert_eq!(config.translations().denied, "NOPE");
        assert_eq!(config.translations().granted, TRANSLATION_GRANTED);
    }

    #[test]
    fn test_empty_roster_delimiter_defaulted() {
        let config = KeypadConfig::builder().with_roster_delimiter("").build();
        assert_eq!(config.roster_delimiter(), DEFAULT_ROSTER_DELIMITER);
    }

    #[test]
    fn test_zero_max_input_length_defaulted() {
        let config = KeypadConfig::builder().with_max_input_length(0).build();
        assert_eq!(config.max_input_length(), DEFAULT_MAX_INPUT_LENGTH);
    }

    #[test]
    fn test_zero_attempts_disables_lockout() {
        let config = KeypadConfig::builder().with_max_attempts(0).build();
        assert!(!config.lockout_enabled());
        let config = KeypadConfig::builder().with_max_attempts(2).build();
        assert!(config.lockout_enabled());
    }
}
