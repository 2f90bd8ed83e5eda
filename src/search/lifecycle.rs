//! # Fetch Lifecycle
//!
//! Owns the request generation counter and guarantees that only the most
//! recently intended query's outcome ever reaches [`ResultState`], no matter
//! in which order lookups settle.
//!
//! Each accepted query change cancels the pending lookup, bumps the
//! generation, and spawns the new lookup tagged with that generation. The
//! spawned task reports back over an internal channel; completions are
//! applied on the event loop, and a completion whose generation is no longer
//! current is discarded without touching state. The generation check is the
//! authoritative staleness guard; token cancellation only saves wasted work.

use crate::api::{ApiError, MovieApi, MovieSummary};
use crate::events::{SearchEvent, SearchEventBus, SearchEventHandler};
use crate::search::query::Query;
use crate::search::state::ResultState;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// What to do when the normalized query is empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EmptyQueryPolicy {
    /// Skip the lookup entirely: clear items and error, stop loading, and do
    /// not fire the query-changed notification.
    #[default]
    Skip,
    /// Search for a fixed default term instead.
    Substitute(String),
}

/// One in-flight lookup tied to a generation.
struct SearchRequest {
    generation: u64,
    token: CancellationToken,
}

/// Outcome of one lookup, tagged with the generation it was issued under.
#[derive(Debug)]
pub struct SearchCompletion {
    generation: u64,
    outcome: Result<Vec<MovieSummary>, ApiError>,
}

/// Controller for the query-driven fetch lifecycle.
pub struct FetchLifecycleManager {
    api: Arc<dyn MovieApi>,
    bus: SearchEventBus,
    generation: u64,
    current: Option<SearchRequest>,
    state: ResultState,
    policy: EmptyQueryPolicy,
    disposed: bool,
    completion_tx: mpsc::Sender<SearchCompletion>,
    completion_rx: mpsc::Receiver<SearchCompletion>,
}

impl FetchLifecycleManager {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self::with_policy(api, EmptyQueryPolicy::default())
    }

    pub fn with_policy(api: Arc<dyn MovieApi>, policy: EmptyQueryPolicy) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel(10);
        Self {
            api,
            bus: SearchEventBus::new(),
            generation: 0,
            current: None,
            state: ResultState::default(),
            policy,
            disposed: false,
            completion_tx,
            completion_rx,
        }
    }

    /// Subscribe to lifecycle notifications (query changed, results updated,
    /// search failed).
    pub fn subscribe(&mut self, handler: SearchEventHandler) {
        self.bus.subscribe(handler);
    }

    /// The read-only state snapshot. Fresh synchronously after every
    /// transition.
    pub fn snapshot(&self) -> &ResultState {
        &self.state
    }

    /// Accept a query change and start a new search cycle.
    ///
    /// Cancels the pending lookup (if any), bumps the generation, clears the
    /// error, and issues the new lookup tagged with the new generation. The
    /// query-changed notification fires synchronously before the lookup is
    /// issued, so the detail panel is already closed by the time any result
    /// can arrive.
    pub fn on_query_changed(&mut self, query: Query) {
        if self.disposed {
            tracing::warn!("query change ignored after dispose");
            return;
        }

        if let Some(request) = self.current.take() {
            tracing::debug!(generation = request.generation, "cancelling pending lookup");
            request.token.cancel();
        }
        self.generation += 1;

        let query = if query.is_empty() {
            match &self.policy {
                EmptyQueryPolicy::Skip => {
                    tracing::debug!(generation = self.generation, "empty query, skipping lookup");
                    self.state.clear_for_empty_query();
                    return;
                }
                EmptyQueryPolicy::Substitute(term) => Query::new(term.clone()),
            }
        } else {
            query
        };

        self.state.begin_generation();
        self.bus.publish(SearchEvent::QueryChanged);

        let token = CancellationToken::new();
        let generation = self.generation;
        self.current = Some(SearchRequest {
            generation,
            token: token.clone(),
        });

        tracing::debug!(generation, query = %query, "issuing lookup");
        let api = Arc::clone(&self.api);
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let outcome = api.search(query.as_str(), token).await;
            // Receiver dropped means the manager is gone; nothing to report.
            let _ = tx.send(SearchCompletion { generation, outcome }).await;
        });
    }

    /// Wait for the next completion from a spawned lookup.
    pub async fn next_completion(&mut self) -> Option<SearchCompletion> {
        self.completion_rx.recv().await
    }

    /// Apply one pending completion if any has arrived (non-blocking).
    pub fn poll_completion(&mut self) -> bool {
        match self.completion_rx.try_recv() {
            Ok(completion) => {
                self.apply_completion(completion);
                true
            }
            Err(_) => false,
        }
    }

    /// Apply a settled lookup to the state, unless it is stale.
    ///
    /// A completion tagged with anything but the current generation is
    /// discarded unconditionally. This is the correctness backstop against
    /// cancellation races: the transport's cancellation is cooperative and a
    /// superseded lookup may still settle with a real response.
    pub fn apply_completion(&mut self, completion: SearchCompletion) {
        if self.disposed || completion.generation != self.generation {
            tracing::debug!(
                completed = completion.generation,
                current = self.generation,
                disposed = self.disposed,
                "discarding stale completion"
            );
            return;
        }

        self.current = None;
        match completion.outcome {
            Ok(items) => {
                tracing::debug!(generation = completion.generation, count = items.len(), "lookup succeeded");
                let count = items.len();
                self.state.finish_success(items);
                self.bus.publish(SearchEvent::ResultsUpdated { count });
            }
            Err(e) if e.is_abort() => {
                self.state.finish_aborted();
            }
            Err(e) => {
                let message = e.to_string();
                tracing::debug!(generation = completion.generation, %message, "lookup failed");
                self.state.finish_failure(message.clone());
                self.bus.publish(SearchEvent::SearchFailed { message });
            }
        }
    }

    /// Tear down: cancel the pending lookup and refuse all further writes.
    ///
    /// Disposal is permanent; late completions arriving afterwards never
    /// touch the snapshot.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(request) = self.current.take() {
            tracing::debug!(generation = request.generation, "cancelling lookup on dispose");
            request.token.cancel();
        }
        self.state.finish_aborted();
        self.disposed = true;
    }
}

impl Drop for FetchLifecycleManager {
    fn drop(&mut self) {
        self.dispose();
    }
}
