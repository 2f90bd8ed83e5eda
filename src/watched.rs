//! # Watched List
//!
//! Movies the user has rated and filed away, plus the summary arithmetic
//! shown above the list.

/// One movie on the watched list, frozen at the moment it was added.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchedMovie {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub imdb_rating: f64,
    pub runtime_min: u32,
    /// Star rating the user settled on, 1..=10.
    pub user_rating: u8,
    /// How many times the user changed their rating before adding.
    pub rate_decisions: u32,
}

/// Aggregates over the watched list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime_min: f64,
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// The user's watched list. Ids are unique; rating a movie twice means
/// removing and re-adding it.
#[derive(Debug, Default)]
pub struct WatchedList {
    movies: Vec<WatchedMovie>,
}

impl WatchedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn movies(&self) -> &[WatchedMovie] {
        &self.movies
    }

    pub fn contains(&self, id: &str) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }

    /// The rating the user gave a movie, if it is on the list.
    pub fn user_rating_for(&self, id: &str) -> Option<u8> {
        self.movies.iter().find(|m| m.id == id).map(|m| m.user_rating)
    }

    /// Add a movie. Returns false (and leaves the list unchanged) if the id
    /// is already present.
    pub fn add(&mut self, movie: WatchedMovie) -> bool {
        if self.contains(&movie.id) {
            tracing::debug!(id = %movie.id, "movie already on watched list");
            return false;
        }
        self.movies.push(movie);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<WatchedMovie> {
        let index = self.movies.iter().position(|m| m.id == id)?;
        Some(self.movies.remove(index))
    }

    pub fn summary(&self) -> WatchedSummary {
        let imdb: Vec<f64> = self.movies.iter().map(|m| m.imdb_rating).collect();
        let user: Vec<f64> = self.movies.iter().map(|m| f64::from(m.user_rating)).collect();
        let runtime: Vec<f64> = self.movies.iter().map(|m| f64::from(m.runtime_min)).collect();
        WatchedSummary {
            count: self.movies.len(),
            avg_imdb_rating: average(&imdb),
            avg_user_rating: average(&user),
            avg_runtime_min: average(&runtime),
        }
    }
}
