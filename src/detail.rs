//! # Detail View
//!
//! State for the single open detail panel: which movie is selected, the
//! fetched record, and the user's in-progress star rating. The panel closes
//! itself whenever a new search cycle begins; that wiring lives in the app
//! controller as a query-changed subscription, not here.

use crate::api::MovieDetail;
use tokio_util::sync::CancellationToken;

/// Highest star the rating widget offers.
pub const MAX_RATING: u8 = 10;

#[derive(Debug, Default)]
pub struct DetailView {
    selected: Option<String>,
    movie: Option<MovieDetail>,
    user_rating: Option<u8>,
    rate_decisions: u32,
    fetch_token: Option<CancellationToken>,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn movie(&self) -> Option<&MovieDetail> {
        self.movie.as_ref()
    }

    pub fn user_rating(&self) -> Option<u8> {
        self.user_rating
    }

    pub fn rate_decisions(&self) -> u32 {
        self.rate_decisions
    }

    /// Select a movie, or close the panel if the same movie is re-selected.
    /// Returns true when the panel is now open on `id` and needs a fetch.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.as_deref() == Some(id) {
            self.close();
            return false;
        }
        self.close();
        self.selected = Some(id.to_string());
        true
    }

    /// Start a detail fetch for the current selection; the returned token is
    /// cancelled when the panel closes.
    pub fn begin_fetch(&mut self) -> CancellationToken {
        let token = CancellationToken::new();
        self.fetch_token = Some(token.clone());
        token
    }

    /// Install the fetched record if `id` still matches the selection.
    /// A record for a movie the user has already navigated away from is
    /// dropped.
    pub fn set_movie(&mut self, id: &str, movie: MovieDetail) -> bool {
        if self.selected.as_deref() != Some(id) {
            tracing::debug!(id, "detail record arrived for a closed panel, dropping");
            return false;
        }
        self.movie = Some(movie);
        true
    }

    /// Record a star rating, clamped to 1..=[`MAX_RATING`]. Each call counts
    /// as one rate decision.
    pub fn set_user_rating(&mut self, rating: u8) {
        self.user_rating = Some(rating.clamp(1, MAX_RATING));
        self.rate_decisions += 1;
    }

    /// Close the panel, cancelling any in-flight detail fetch.
    pub fn close(&mut self) {
        if let Some(token) = self.fetch_token.take() {
            token.cancel();
        }
        self.selected = None;
        self.movie = None;
        self.user_rating = None;
        self.rate_decisions = 0;
    }
}
