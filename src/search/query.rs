//! # Query
//!
//! Normalized search text. Two queries are the same search iff their strings
//! are exactly equal; no trimming or case folding happens beyond stripping
//! the focus-marker affordance.

use std::fmt;

/// The UI seeds the input box with a single leading space when it grabs
/// keyboard focus; that marker is a UI affordance, not search text.
pub const FOCUS_MARKER: char = ' ';

/// A normalized search string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// Build a query from already-normalized text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Normalize raw input-box text: strips at most one leading focus marker.
    pub fn from_input(raw: &str) -> Self {
        let text = raw.strip_prefix(FOCUS_MARKER).unwrap_or(raw);
        Self(text.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
