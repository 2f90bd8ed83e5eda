//! # OMDb Client
//!
//! Reqwest-backed implementation of [`MovieApi`] against the OMDb HTTP API.
//! Cancellation races the in-flight request against the caller's token; a
//! cancelled call settles with [`ApiError::Aborted`] without waiting for the
//! transport.

use super::{ApiError, MovieApi, MovieDetail, MovieSummary};
use crate::config::Profile;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// OMDb search response envelope.
///
/// The API reports failure in-band: `Response` is the string `"True"` or
/// `"False"`, with `Error` carrying the message in the latter case.
#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Search", default)]
    search: Vec<SearchHit>,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Poster")]
    poster: String,
}

impl From<SearchHit> for MovieSummary {
    fn from(hit: SearchHit) -> Self {
        Self {
            id: hit.imdb_id,
            title: hit.title,
            year: hit.year,
            poster_url: hit.poster,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl From<DetailEnvelope> for MovieDetail {
    fn from(envelope: DetailEnvelope) -> Self {
        Self {
            id: envelope.imdb_id,
            title: envelope.title,
            year: envelope.year,
            poster_url: envelope.poster,
            runtime: envelope.runtime,
            imdb_rating: envelope.imdb_rating,
            plot: envelope.plot,
            released: envelope.released,
            actors: envelope.actors,
            director: envelope.director,
            genre: envelope.genre,
        }
    }
}

/// HTTP client for the OMDb catalog.
pub struct OmdbClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a client from a connection profile.
    pub fn new(profile: &Profile) -> Result<Self> {
        tracing::debug!("creating OMDb client for {}", profile.endpoint());
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: profile.endpoint().to_string(),
            api_key: profile.api_key().to_string(),
        })
    }

    async fn get_json<T>(&self, params: &[(&str, &str)]) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::Transport(format!(
                "network response was not ok: {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Transport(format!("malformed catalog response: {e}")))
    }
}

#[async_trait]
impl MovieApi for OmdbClient {
    async fn search(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<MovieSummary>, ApiError> {
        tracing::debug!(query, "issuing catalog search");
        let params = [("s", query)];
        let envelope: SearchEnvelope = tokio::select! {
            _ = cancel.cancelled() => return Err(ApiError::Aborted),
            res = self.get_json(&params) => res?,
        };

        if envelope.response != "True" {
            tracing::debug!(
                query,
                error = envelope.error.as_deref().unwrap_or("none"),
                "catalog search returned no matches"
            );
            return Err(ApiError::NoMatches);
        }

        Ok(envelope.search.into_iter().map(MovieSummary::from).collect())
    }

    async fn detail(
        &self,
        id: &str,
        cancel: CancellationToken,
    ) -> Result<MovieDetail, ApiError> {
        tracing::debug!(id, "issuing catalog detail lookup");
        let params = [("i", id)];
        let envelope: DetailEnvelope = tokio::select! {
            _ = cancel.cancelled() => return Err(ApiError::Aborted),
            res = self.get_json(&params) => res?,
        };

        if envelope.response != "True" {
            let message = envelope
                .error
                .unwrap_or_else(|| "unknown catalog error".to_string());
            return Err(ApiError::Transport(message));
        }

        Ok(envelope.into())
    }
}
