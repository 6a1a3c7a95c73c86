//! Batch artist lookups with per-artist fault isolation.
//!
//! Every artist name is resolved and looked up on its own. A failure for
//! one artist is recorded as that artist's entry and never stops the batch.

use crate::catalog::{MAX_TOP_TRACKS, MusicCatalog, TrackTitle};
use crate::error::{RecommenderError, Result};
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// The outcome for one artist: a track list or an error description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArtistOutcome {
    Tracks(Vec<TrackTitle>),
    Error(String),
}

impl ArtistOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ArtistOutcome::Error(_))
    }

    pub fn tracks(&self) -> Option<&[TrackTitle]> {
        match self {
            ArtistOutcome::Tracks(tracks) => Some(tracks),
            ArtistOutcome::Error(_) => None,
        }
    }
}

impl From<Result<Vec<TrackTitle>>> for ArtistOutcome {
    fn from(result: Result<Vec<TrackTitle>>) -> Self {
        match result {
            Ok(tracks) => ArtistOutcome::Tracks(tracks),
            Err(e) => ArtistOutcome::Error(format!("Error: {}", e)),
        }
    }
}

/// Artist name to outcome. Repeated names keep the last outcome.
pub type RecommendationResult = BTreeMap<String, ArtistOutcome>;

/// Options for a recommendation batch.
#[derive(Debug, Clone, Default)]
pub struct RecommendOptions {
    /// Upper bound on one artist's lookups; expiry becomes that artist's error.
    pub lookup_timeout: Option<Duration>,
    /// Run artists concurrently instead of in input order.
    pub concurrent: bool,
}

/// Looks up top tracks for a list of artists.
pub struct RecommendationTool<C> {
    catalog: C,
    options: RecommendOptions,
}

impl<C: MusicCatalog> RecommendationTool<C> {
    /// Create a new tool over `catalog` with default options.
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            options: RecommendOptions::default(),
        }
    }

    /// Create with custom options.
    pub fn with_options(catalog: C, options: RecommendOptions) -> Self {
        Self { catalog, options }
    }

    /// Look up every artist in `names`.
    pub async fn recommend<S: AsRef<str>>(&self, names: &[S]) -> RecommendationResult {
        let names: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();

        let outcomes: Vec<(&str, ArtistOutcome)> = if self.options.concurrent {
            join_all(names.iter().map(|name| async move { (*name, self.outcome_for(name).await) })).await
        } else {
            let mut outcomes = Vec::with_capacity(names.len());
            for name in &names {
                outcomes.push((*name, self.outcome_for(name).await));
            }
            outcomes
        };

        let mut result = RecommendationResult::new();
        for (name, outcome) in outcomes {
            result.insert(name.to_string(), outcome);
        }
        result
    }

    async fn outcome_for(&self, name: &str) -> ArtistOutcome {
        let lookup = self.lookup(name);
        let result = match self.options.lookup_timeout {
            Some(limit) => tokio::time::timeout(limit, lookup)
                .await
                .unwrap_or_else(|_| Err(RecommenderError::Timeout(limit))),
            None => lookup.await,
        };

        if let Err(e) = &result {
            tracing::warn!(artist = name, error = %e, "artist lookup failed");
        }
        result.into()
    }

    async fn lookup(&self, name: &str) -> Result<Vec<TrackTitle>> {
        let id = self
            .catalog
            .resolve_artist_id(name)
            .await?
            .ok_or_else(|| RecommenderError::ArtistNotFound(name.to_string()))?;

        tracing::debug!(artist = name, id = %id, "resolved artist");
        let mut tracks = self.catalog.fetch_top_tracks(&id).await?;
        tracks.truncate(MAX_TOP_TRACKS);
        Ok(tracks)
    }
}
