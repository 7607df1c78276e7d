//! Dynamically delivered allow-list roster.
//!
//! An external loader delivers chunks of text, zero or more times, in host
//! call order. Each delivery is appended to an accumulator and the whole
//! roster is re-derived from the full accumulated text: the derived list is
//! replaced, never patched incrementally, so a delivery can never leave the
//! list half-updated. A failed delivery leaves everything untouched.

use tracing::debug;

/// Accumulated roster text and its derived entry list.
#[derive(Debug, Clone)]
pub struct DynamicRoster {
    accumulated: String,
    delimiter: String,
    entries: Vec<String>,
}

impl DynamicRoster {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            accumulated: String::new(),
            delimiter: delimiter.into(),
            entries: Vec::new(),
        }
    }

    /// Append a delivered chunk and re-derive the entry list from the full
    /// accumulated text.
    ///
    /// Chunks are joined with the delimiter unless the accumulator already
    /// ends with one, so `"a,b,c"` followed by `"d"` derives `{a,b,c,d}`.
    pub fn deliver(&mut self, chunk: &str) {
        if !self.accumulated.is_empty() && !self.accumulated.ends_with(&self.delimiter) {
            self.accumulated.push_str(&self.delimiter);
        }
        self.accumulated.push_str(chunk);
        self.rederive();
        debug!(entries = self.entries.len(), "roster re-derived");
    }

    /// Full re-split of the accumulator; empty segments are skipped.
    fn rederive(&mut self) {
        self.entries = self
            .accumulated
            .split(&self.delimiter)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    pub fn contains(&self, actor: &str) -> bool {
        self.entries.iter().any(|e| e == actor)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let roster = DynamicRoster::new(",");
        assert!(roster.is_empty());
        assert!(!roster.contains("alice"));
    }

    #[test]
    fn test_single_delivery_splits_on_delimiter() {
        let mut roster = DynamicRoster::new(",");
        roster.deliver("a,b,c");
        assert_eq!(roster.entries(), ["a", "b", "c"]);
    }

    #[test]
    fn test_subsequent_delivery_rederives_full_list() {
        let mut roster = DynamicRoster::new(",");
        roster.deliver("a,b,c");
        roster.deliver("d");
        assert_eq!(roster.entries(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_redelivery_is_idempotent_per_text() {
        let mut roster = DynamicRoster::new(",");
        roster.deliver("a,b");
        let first = roster.entries().to_vec();
        roster.deliver("a,b");
        // Full re-split of "a,b,a,b"; derived from the accumulator, not
        // patched in place.
        assert_eq!(roster.entries()[..2], first[..]);
        assert!(roster.contains("a"));
    }

    #[test]
    fn test_empty_segments_skipped() {
        let mut roster = DynamicRoster::new(",");
        roster.deliver("a,,b,");
        assert_eq!(roster.entries(), ["a", "b"]);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let mut roster = DynamicRoster::new(",");
        roster.deliver(" alice , bob ");
        assert_eq!(roster.entries(), ["alice", "bob"]);
        assert!(roster.contains("alice"));
    }

    #[test]
    fn test_newline_delimiter() {
        let mut roster = DynamicRoster::new("\n");
        roster.deliver("alice\nbob");
        roster.deliver("carol");
        assert_eq!(roster.entries(), ["alice", "bob", "carol"]);
    }
}
