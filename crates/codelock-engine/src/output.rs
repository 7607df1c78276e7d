//! Controlled outputs: the binary-state targets a grant operates on.
//!
//! An output is either secured or released, nothing in between, and only
//! grant/deny/clear events move it. The `hide_on_grant` polarity captured at
//! construction decides what "released" means for the host's visible object
//! (the original hardware hides the door object when access is granted).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A binary-state actuator (door, relay) with identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlledOutput {
    label: String,
    hide_on_grant: bool,
    /// Host-visible active flag, polarity already applied.
    active: bool,
}

impl ControlledOutput {
    /// Create an output in the secured state.
    pub fn new(label: impl Into<String>, hide_on_grant: bool) -> Self {
        Self {
            label: label.into(),
            hide_on_grant,
            // Secured: visible when hide_on_grant, hidden otherwise.
            active: hide_on_grant,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Move to the released (access granted) state.
    pub fn release(&mut self) {
        self.active = !self.hide_on_grant;
    }

    /// Move to the secured (default) state.
    pub fn secure(&mut self) {
        self.active = self.hide_on_grant;
    }

    pub fn is_released(&self) -> bool {
        self.active == !self.hide_on_grant
    }

    /// Raw host-visible flag with polarity applied, as a host would pass to
    /// its scene object.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl fmt::Display for ControlledOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]",
            self.label,
            if self.is_released() { "released" } else { "secured" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_new_output_starts_secured(#[case] hide_on_grant: bool) {
        let output = ControlledOutput::new("door", hide_on_grant);
        assert!(!output.is_released());
        // Secured visibility follows polarity.
        assert_eq!(output.is_active(), hide_on_grant);
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_release_then_secure(#[case] hide_on_grant: bool) {
        let mut output = ControlledOutput::new("door", hide_on_grant);

        output.release();
        assert!(output.is_released());
        assert_eq!(output.is_active(), !hide_on_grant);

        output.secure();
        assert!(!output.is_released());
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut output = ControlledOutput::new("door", true);
        output.release();
        output.release();
        assert!(output.is_released());
    }

    #[test]
    fn test_display() {
        let mut output = ControlledOutput::new("main-door", true);
        assert_eq!(output.to_string(), "main-door [secured]");
        output.release();
        assert_eq!(output.to_string(), "main-door [released]");
    }
}
