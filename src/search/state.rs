//! # Result State
//!
//! The externally observable search snapshot: `{items, error, is_loading}`.
//! All mutation goes through the crate-private transition methods, which the
//! lifecycle manager alone calls; consumers only ever see a read-only view.
//!
//! Invariants:
//! - `is_loading` is true exactly while the current generation's lookup is
//!   pending.
//! - `error` is set only by a non-abort failure of the current generation,
//!   and is cleared at the start of every new generation.

use crate::api::MovieSummary;

/// Read-only search state snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultState {
    items: Vec<MovieSummary>,
    error: Option<String>,
    is_loading: bool,
}

impl ResultState {
    /// Result list from the most recent successful lookup.
    pub fn items(&self) -> &[MovieSummary] {
        &self.items
    }

    /// User-visible failure message from the current generation, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while the current generation's lookup is pending.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// A new generation started: clear the error, mark loading.
    pub(crate) fn begin_generation(&mut self) {
        self.error = None;
        self.is_loading = true;
    }

    /// Empty-query skip: no lookup will be issued for this generation.
    pub(crate) fn clear_for_empty_query(&mut self) {
        self.items.clear();
        self.error = None;
        self.is_loading = false;
    }

    pub(crate) fn finish_success(&mut self, items: Vec<MovieSummary>) {
        self.items = items;
        self.error = None;
        self.is_loading = false;
    }

    /// Abort is never surfaced: loading stops, the error stays untouched.
    pub(crate) fn finish_aborted(&mut self) {
        self.is_loading = false;
    }

    pub(crate) fn finish_failure(&mut self, message: String) {
        self.error = Some(message);
        self.is_loading = false;
    }
}
