//! Catalog identifiers and the Spotify Web API response shapes we read.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of top tracks kept per artist.
pub const MAX_TOP_TRACKS: usize = 5;

/// A track title as reported by the catalog.
pub type TrackTitle = String;

/// Opaque catalog identifier for an artist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(String);

impl ArtistId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistSearchResponse {
    pub artists: ArtistPage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistPage {
    #[serde(default)]
    pub items: Vec<ArtistItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistItem {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopTracksResponse {
    #[serde(default)]
    pub tracks: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackItem {
    pub name: String,
}

/// Error body returned by the Web API.
#[derive(Debug, Deserialize)]
pub(crate) struct WebApiError {
    pub error: WebApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebApiErrorDetail {
    pub message: String,
}

/// Error body returned by the accounts service.
#[derive(Debug, Deserialize)]
pub(crate) struct AccountsError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ArtistSearchResponse {
    /// Id of the first-ranked artist, if any.
    pub fn first_artist_id(self) -> Option<ArtistId> {
        self.artists
            .items
            .into_iter()
            .next()
            .map(|item| ArtistId(item.id))
    }
}

impl TopTracksResponse {
    /// Titles in service order, capped at `limit`.
    pub fn titles(self, limit: usize) -> Vec<TrackTitle> {
        self.tracks
            .into_iter()
            .take(limit)
            .map(|track| track.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_artist_id_takes_first_ranked() {
        let body = r#"{"artists":{"items":[{"id":"3TVXtAsR1Inumwj472S9r4","name":"Drake"},{"id":"other"}]}}"#;
        let response: ArtistSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.first_artist_id(),
            Some(ArtistId::new("3TVXtAsR1Inumwj472S9r4"))
        );
    }

    #[test]
    fn test_first_artist_id_empty() {
        let body = r#"{"artists":{"items":[],"total":0}}"#;
        let response: ArtistSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_artist_id(), None);
    }

    #[test]
    fn test_titles_capped_and_ordered() {
        let tracks: Vec<_> = (1..=10)
            .map(|i| serde_json::json!({"name": format!("Track {}", i), "popularity": 90 - i}))
            .collect();
        let body = serde_json::json!({ "tracks": tracks });
        let response: TopTracksResponse = serde_json::from_value(body).unwrap();

        let titles = response.titles(MAX_TOP_TRACKS);
        assert_eq!(
            titles,
            vec!["Track 1", "Track 2", "Track 3", "Track 4", "Track 5"]
        );
    }

    #[test]
    fn test_titles_fewer_than_limit() {
        let body = r#"{"tracks":[{"name":"Only One"}]}"#;
        let response: TopTracksResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.titles(MAX_TOP_TRACKS), vec!["Only One"]);
    }

    #[test]
    fn test_artist_id_serializes_as_string() {
        let id = ArtistId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        assert_eq!(id.to_string(), "abc");
    }
}
