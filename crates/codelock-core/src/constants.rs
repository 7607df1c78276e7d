//! Tuning constants for the codelock keypad engine.
//!
//! These are the safe defaults the configuration normalizer falls back to
//! when a field is missing, empty, or out of range. Normalization never
//! fails: a defective field is replaced by its constant here and a warning
//! is logged.

// ============================================================================
// Input limits
// ============================================================================

/// Default maximum number of characters the input buffer accepts.
///
/// Input beyond this limit is rejected outright, never truncated.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 8;

/// Maximum accepted size for any configured list (allow, deny, additional
/// codes, outputs).
///
/// A list larger than this is almost certainly a wiring mistake; the
/// normalizer resets it to empty and logs the reset.
pub const MAX_LIST_ENTRIES: usize = 999;

// ============================================================================
// Code defaults
// ============================================================================

/// Default primary passcode used when none is configured at all.
///
/// Note that an *invalid* configured code (empty or over the length limit)
/// is replaced with a random value instead, so a misconfigured keypad does
/// not silently open on a well-known default.
pub const DEFAULT_PRIMARY_CODE: &str = "2580";

// ============================================================================
// Display defaults
// ============================================================================

/// Character substituted for each buffered key when input masking is on.
pub const DEFAULT_MASK_CHAR: char = '*';

/// Default idle prompt text.
pub const TRANSLATION_WAITCODE: &str = "PASSCODE";

/// Default denial feedback text.
pub const TRANSLATION_DENIED: &str = "DENIED";

/// Default grant feedback text.
pub const TRANSLATION_GRANTED: &str = "GRANTED";

/// Default lockout feedback text.
pub const TRANSLATION_LOCKED: &str = "LOCKED";

// ============================================================================
// Relay event names
// ============================================================================

/// Default event name sent to relay targets when the keypad closes/clears.
pub const EVENT_ON_CLOSED: &str = "_keypadClosed";

/// Default event name sent to relay targets on a denial.
pub const EVENT_ON_DENIED: &str = "_keypadDenied";

/// Default event name sent to relay targets on a grant.
pub const EVENT_ON_GRANTED: &str = "_keypadGranted";

/// Default event name sent to relay targets when lockout engages or an
/// evaluation is rejected while locked.
pub const EVENT_ON_LOCKED: &str = "_keypadLocked";

// ============================================================================
// Dynamic roster
// ============================================================================

/// Default delimiter used to re-derive the dynamic allow-list from the
/// accumulated delivery text.
pub const DEFAULT_ROSTER_DELIMITER: &str = ",";

// ============================================================================
// Relay marker sentinels
// ============================================================================

/// Relay payload marker: no matched code applies to this notification.
pub const MARKER_NO_MATCH: i32 = -1;

/// Relay payload marker: the grant came through the allow list, not a code.
pub const MARKER_ALLOW_LIST: i32 = -2;
