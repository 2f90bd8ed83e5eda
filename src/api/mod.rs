//! # Movie Catalog API
//!
//! Contract for the remote movie catalog: a cancellable search by free-text
//! query and a cancellable detail lookup by catalog id, plus the error
//! taxonomy callers match on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub mod omdb;

pub use omdb::OmdbClient;

/// Failure kinds a catalog lookup can settle with.
///
/// `Aborted` is the one kind that must stay distinguishable from all others:
/// it signifies the lookup was superseded or torn down, not that anything
/// actually went wrong, and it is never surfaced to the user.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The lookup was cancelled before it settled.
    #[error("lookup aborted")]
    Aborted,

    /// Network or protocol failure talking to the catalog.
    #[error("catalog request failed: {0}")]
    Transport(String),

    /// The catalog answered, but with no matches for the query.
    #[error("no movies found for this search")]
    NoMatches,
}

impl ApiError {
    /// True for cancellation-class failures that must never reach the user.
    pub fn is_abort(&self) -> bool {
        matches!(self, ApiError::Aborted)
    }
}

/// One remote search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
}

/// Full record for a single movie, as returned by the detail lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    /// Raw runtime string from the catalog, e.g. "148 min".
    pub runtime: String,
    /// Raw rating string from the catalog, e.g. "8.8".
    pub imdb_rating: String,
    pub plot: String,
    pub released: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

impl MovieDetail {
    /// Parse the catalog's `"148 min"` runtime format into minutes.
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime.split_whitespace().next()?.parse().ok()
    }

    /// Parse the catalog's rating string into a number.
    pub fn imdb_rating_value(&self) -> Option<f64> {
        self.imdb_rating.parse().ok()
    }
}

/// The remote catalog contract.
///
/// Both calls are asynchronous and cooperatively cancellable: the caller
/// passes a [`CancellationToken`] and a cancelled lookup settles with
/// [`ApiError::Aborted`]. Cancellation is an optimization to save wasted
/// work; callers must not rely on it for correctness.
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// Search the catalog by free-text query.
    async fn search(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<MovieSummary>, ApiError>;

    /// Fetch the full record for one movie by catalog id.
    async fn detail(
        &self,
        id: &str,
        cancel: CancellationToken,
    ) -> Result<MovieDetail, ApiError>;
}
