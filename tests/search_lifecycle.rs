//! Integration tests for the query-driven fetch lifecycle.
//!
//! The mock catalog lets each test decide when and in which order lookups
//! settle, including a mode that ignores cancellation entirely to prove the
//! generation check alone keeps stale results out of the snapshot.

use async_trait::async_trait;
use marquee::{
    ApiError, EmptyQueryPolicy, FetchLifecycleManager, MovieApi, MovieDetail, MovieSummary, Query,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

type SearchOutcome = Result<Vec<MovieSummary>, ApiError>;

struct PendingSearch {
    query: String,
    responder: oneshot::Sender<SearchOutcome>,
}

/// Catalog double whose lookups stay pending until the test resolves them.
struct MockApi {
    /// When false, the transport ignores the cancellation token, modelling a
    /// transport whose cooperative cancellation arrives too late.
    honor_cancel: bool,
    pending: Mutex<Vec<PendingSearch>>,
    calls: AtomicUsize,
}

impl MockApi {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            honor_cancel: true,
            pending: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn ignoring_cancellation() -> Arc<Self> {
        Arc::new(Self {
            honor_cancel: false,
            pending: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn has_pending(&self, query: &str) -> bool {
        self.pending.lock().unwrap().iter().any(|p| p.query == query)
    }

    /// Settle the pending lookup for `query` with the given outcome.
    fn resolve(&self, query: &str, outcome: SearchOutcome) {
        let mut pending = self.pending.lock().unwrap();
        let index = pending
            .iter()
            .position(|p| p.query == query)
            .unwrap_or_else(|| panic!("no pending lookup for '{query}'"));
        let entry = pending.remove(index);
        // The waiting task may already have settled as aborted.
        let _ = entry.responder.send(outcome);
    }
}

#[async_trait]
impl MovieApi for MockApi {
    async fn search(&self, query: &str, cancel: CancellationToken) -> SearchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (responder, waiter) = oneshot::channel();
        self.pending.lock().unwrap().push(PendingSearch {
            query: query.to_string(),
            responder,
        });

        if self.honor_cancel {
            tokio::select! {
                _ = cancel.cancelled() => Err(ApiError::Aborted),
                outcome = waiter => outcome.unwrap_or(Err(ApiError::Aborted)),
            }
        } else {
            waiter.await.unwrap_or(Err(ApiError::Aborted))
        }
    }

    async fn detail(&self, _id: &str, _cancel: CancellationToken) -> Result<MovieDetail, ApiError> {
        Ok(MovieDetail::default())
    }
}

fn hits(title: &str) -> Vec<MovieSummary> {
    vec![MovieSummary {
        id: format!("tt-{title}"),
        title: title.to_string(),
        year: "2020".to_string(),
        poster_url: "N/A".to_string(),
    }]
}

/// Spin the scheduler until the mock has registered the lookup for `query`.
async fn wait_for_pending(api: &MockApi, query: &str) {
    for _ in 0..100 {
        if api.has_pending(query) {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("lookup for '{query}' never started");
}

async fn apply_next(manager: &mut FetchLifecycleManager) {
    let completion = manager.next_completion().await.expect("completion channel closed");
    manager.apply_completion(completion);
}

#[tokio::test]
async fn later_query_wins_even_when_earlier_lookup_resolves_last() {
    let api = MockApi::ignoring_cancellation();
    let mut manager = FetchLifecycleManager::new(Arc::clone(&api) as Arc<dyn MovieApi>);

    manager.on_query_changed(Query::new("batman"));
    wait_for_pending(&api, "batman").await;

    manager.on_query_changed(Query::new("superman"));
    wait_for_pending(&api, "superman").await;

    // Reverse completion order: the newer lookup settles first, the stale
    // one afterwards with perfectly good data.
    api.resolve("superman", Ok(hits("superman")));
    apply_next(&mut manager).await;
    api.resolve("batman", Ok(hits("batman")));
    apply_next(&mut manager).await;

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.items().len(), 1);
    assert_eq!(snapshot.items()[0].title, "superman");
    assert!(snapshot.error().is_none());
    assert!(!snapshot.is_loading());
}

#[tokio::test]
async fn loading_is_true_exactly_while_current_lookup_is_pending() {
    let api = MockApi::new();
    let mut manager = FetchLifecycleManager::new(Arc::clone(&api) as Arc<dyn MovieApi>);

    // Before any query is issued.
    assert!(!manager.snapshot().is_loading());

    manager.on_query_changed(Query::new("batman"));
    assert!(manager.snapshot().is_loading());
    wait_for_pending(&api, "batman").await;

    api.resolve("batman", Ok(hits("batman")));
    apply_next(&mut manager).await;
    assert!(!manager.snapshot().is_loading());

    // And after teardown.
    manager.on_query_changed(Query::new("superman"));
    assert!(manager.snapshot().is_loading());
    manager.dispose();
    assert!(!manager.snapshot().is_loading());
}

#[tokio::test]
async fn superseding_a_pending_lookup_never_sets_error() {
    let api = MockApi::new();
    let mut manager = FetchLifecycleManager::new(Arc::clone(&api) as Arc<dyn MovieApi>);

    manager.on_query_changed(Query::new("batman"));
    wait_for_pending(&api, "batman").await;

    // Superseding cancels the first lookup; its task settles as aborted.
    manager.on_query_changed(Query::new("superman"));
    wait_for_pending(&api, "superman").await;
    apply_next(&mut manager).await;
    assert!(manager.snapshot().error().is_none());

    api.resolve("superman", Ok(hits("superman")));
    apply_next(&mut manager).await;
    assert!(manager.snapshot().error().is_none());
    assert_eq!(manager.snapshot().items()[0].title, "superman");
}

#[tokio::test]
async fn abort_of_the_current_generation_stops_loading_without_error() {
    let api = MockApi::new();
    let mut manager = FetchLifecycleManager::new(Arc::clone(&api) as Arc<dyn MovieApi>);

    manager.on_query_changed(Query::new("batman"));
    wait_for_pending(&api, "batman").await;

    // The transport itself reports cancellation for the current lookup.
    api.resolve("batman", Err(ApiError::Aborted));
    apply_next(&mut manager).await;

    assert!(!manager.snapshot().is_loading());
    assert!(manager.snapshot().error().is_none());
}

#[tokio::test]
async fn new_query_clears_previous_error_before_its_outcome_is_known() {
    let api = MockApi::new();
    let mut manager = FetchLifecycleManager::new(Arc::clone(&api) as Arc<dyn MovieApi>);

    manager.on_query_changed(Query::new("batman"));
    wait_for_pending(&api, "batman").await;
    api.resolve("batman", Err(ApiError::Transport("connection reset".to_string())));
    apply_next(&mut manager).await;
    assert_eq!(
        manager.snapshot().error(),
        Some("catalog request failed: connection reset")
    );

    manager.on_query_changed(Query::new("superman"));
    // The new lookup has not settled, yet the error is already gone.
    assert!(manager.snapshot().error().is_none());
    assert!(manager.snapshot().is_loading());
}

#[tokio::test]
async fn toggling_empty_and_nonempty_queries_is_deterministic() {
    let api = MockApi::new();
    let mut manager = FetchLifecycleManager::new(Arc::clone(&api) as Arc<dyn MovieApi>);

    for round in 1..=3 {
        manager.on_query_changed(Query::new("batman"));
        wait_for_pending(&api, "batman").await;
        api.resolve("batman", Ok(hits("batman")));
        apply_next(&mut manager).await;
        assert_eq!(manager.snapshot().items().len(), 1);

        manager.on_query_changed(Query::new(""));
        assert!(manager.snapshot().items().is_empty());
        assert!(manager.snapshot().error().is_none());
        assert!(!manager.snapshot().is_loading());

        // One network call per non-empty round, none for the empty ones.
        assert_eq!(api.call_count(), round);
    }
}

#[tokio::test]
async fn empty_query_with_substitute_policy_issues_the_default_lookup() {
    let api = MockApi::new();
    let mut manager = FetchLifecycleManager::with_policy(
        Arc::clone(&api) as Arc<dyn MovieApi>,
        EmptyQueryPolicy::Substitute("Inception".to_string()),
    );

    manager.on_query_changed(Query::new(""));
    wait_for_pending(&api, "Inception").await;
    api.resolve("Inception", Ok(hits("Inception")));
    apply_next(&mut manager).await;

    assert_eq!(manager.snapshot().items()[0].title, "Inception");
}

#[tokio::test]
async fn completion_delivered_after_dispose_changes_nothing() {
    let api = MockApi::ignoring_cancellation();
    let mut manager = FetchLifecycleManager::new(Arc::clone(&api) as Arc<dyn MovieApi>);

    manager.on_query_changed(Query::new("batman"));
    wait_for_pending(&api, "batman").await;

    manager.dispose();
    let before = manager.snapshot().clone();

    // The transport ignored cancellation and still produces a full result.
    api.resolve("batman", Ok(hits("batman")));
    apply_next(&mut manager).await;

    assert_eq!(manager.snapshot(), &before);
    assert!(manager.snapshot().items().is_empty());
    assert!(manager.snapshot().error().is_none());
    assert!(!manager.snapshot().is_loading());
}

#[tokio::test]
async fn late_transport_failure_after_dispose_is_silent() {
    let api = MockApi::ignoring_cancellation();
    let mut manager = FetchLifecycleManager::new(Arc::clone(&api) as Arc<dyn MovieApi>);

    manager.on_query_changed(Query::new("batman"));
    wait_for_pending(&api, "batman").await;
    manager.dispose();

    api.resolve("batman", Err(ApiError::Transport("timed out".to_string())));
    apply_next(&mut manager).await;

    assert!(manager.snapshot().error().is_none());
}
