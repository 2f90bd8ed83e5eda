//! # Query Controller
//!
//! Thin adapter between raw input-box text and the fetch lifecycle. It
//! normalizes the text into a [`Query`] and forwards it only when the query
//! actually changed; it performs no business logic beyond that. There is
//! deliberately no debouncing here.

use crate::search::lifecycle::FetchLifecycleManager;
use crate::search::query::Query;

/// Adapter that turns input-box edits into search cycles.
#[derive(Debug, Default)]
pub struct QueryController {
    last: Option<Query>,
}

impl QueryController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently forwarded query, if any.
    pub fn current(&self) -> Option<&Query> {
        self.last.as_ref()
    }

    /// Handle a change of the raw input text.
    ///
    /// Normalizes and forwards to the manager; an edit that normalizes to
    /// the same query as before is not a query change and is dropped.
    pub fn input_changed(&mut self, raw: &str, manager: &mut FetchLifecycleManager) {
        let query = Query::from_input(raw);
        if self.last.as_ref() == Some(&query) {
            tracing::trace!(%query, "input edit produced identical query, ignoring");
            return;
        }
        self.last = Some(query.clone());
        manager.on_query_changed(query);
    }
}
