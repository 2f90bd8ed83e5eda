//! # Search Events
//!
//! Decoupled notification channel between the fetch lifecycle and its
//! observers using the observer pattern. The detail-view closer subscribes
//! here rather than reaching into fetch internals.

/// Events emitted by the fetch lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// A new search cycle was accepted. Fired exactly once, synchronously,
    /// before the lookup is issued; not fired for a skipped empty query.
    QueryChanged,

    /// The current search settled successfully.
    ResultsUpdated { count: usize },

    /// The current search settled with a user-visible failure.
    SearchFailed { message: String },
}

/// Type alias for search event handlers to reduce complexity.
pub type SearchEventHandler = Box<dyn Fn(&SearchEvent) + Send + Sync>;

/// Simple in-memory event bus for search lifecycle notifications.
#[derive(Default)]
pub struct SearchEventBus {
    handlers: Vec<SearchEventHandler>,
}

impl SearchEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all search events.
    pub fn subscribe(&mut self, handler: SearchEventHandler) {
        self.handlers.push(handler);
    }

    /// Publish an event to every subscriber, in subscription order.
    pub fn publish(&self, event: SearchEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }
}
