//! Spotify Web API client.
//!
//! Authenticates once with the client-credentials flow and then serves
//! artist search and top-track lookups with the same bearer token.

use super::models::{
    AccountsError, ArtistId, ArtistSearchResponse, MAX_TOP_TRACKS, TokenResponse, TopTracksResponse,
    TrackTitle, WebApiError,
};
use crate::config::CatalogConfig;
use crate::error::{RecommenderError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Read-only lookups against a music catalog.
#[async_trait]
pub trait MusicCatalog: Send + Sync {
    /// Id of the first search hit for `name`, or `None` when nothing matches.
    async fn resolve_artist_id(&self, name: &str) -> Result<Option<ArtistId>>;

    /// Up to [`MAX_TOP_TRACKS`] titles in the catalog's top-tracks order.
    async fn fetch_top_tracks(&self, id: &ArtistId) -> Result<Vec<TrackTitle>>;
}

/// An authenticated session with the Spotify Web API.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    config: CatalogConfig,
    access_token: String,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("api_base", &self.config.api_base)
            .field("market", &self.config.market)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Exchange the client credentials for a token and return a ready client.
    ///
    /// Missing credentials fail before any request is made; rejected
    /// credentials fail here rather than on the first lookup.
    pub async fn connect(config: CatalogConfig) -> Result<Self> {
        let (client_id, client_secret) = config.credentials()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let url = format!("{}/api/token", config.accounts_base.trim_end_matches('/'));
        let response = http
            .post(&url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<AccountsError>(&body)
                .map(|e| e.error_description.unwrap_or(e.error))
                .unwrap_or(body);
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                    RecommenderError::Authentication(message)
                }
                _ => RecommenderError::CatalogApi {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| RecommenderError::CatalogParse(format!("token response: {}", e)))?;

        tracing::info!(expires_in = ?token.expires_in, "authenticated with catalog");

        Ok(Self {
            http,
            config,
            access_token: token.access_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| RecommenderError::CatalogParse(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await?;
        let message = serde_json::from_str::<WebApiError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        if status == StatusCode::UNAUTHORIZED {
            return Err(RecommenderError::Authentication(message));
        }
        Err(RecommenderError::CatalogApi {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MusicCatalog for CatalogClient {
    async fn resolve_artist_id(&self, name: &str) -> Result<Option<ArtistId>> {
        let q = format!("artist:{}", name);
        let response: ArtistSearchResponse = self
            .get_json(&self.url("/v1/search"), &[("q", q.as_str()), ("type", "artist")])
            .await?;
        Ok(response.first_artist_id())
    }

    async fn fetch_top_tracks(&self, id: &ArtistId) -> Result<Vec<TrackTitle>> {
        let url = self.url(&format!("/v1/artists/{}/top-tracks", id));
        let response: TopTracksResponse = self
            .get_json(&url, &[("market", self.config.market.as_str())])
            .await?;
        Ok(response.titles(MAX_TOP_TRACKS))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::{HeaderMap, StatusCode as HttpStatus};
    use axum::routing::{get, post};
    use axum::{Form, Json, Router};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    const TOKEN: &str = "stub-token";

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {}", TOKEN))
    }

    async fn token(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> (HttpStatus, Json<Value>) {
        // base64("id:secret")
        let expected = "Basic aWQ6c2VjcmV0";
        let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
        if auth != Some(expected) || form.get("grant_type").map(String::as_str) != Some("client_credentials") {
            return (
                HttpStatus::BAD_REQUEST,
                Json(json!({"error": "invalid_client", "error_description": "Invalid client"})),
            );
        }
        (
            HttpStatus::OK,
            Json(json!({"access_token": TOKEN, "token_type": "Bearer", "expires_in": 3600})),
        )
    }

    async fn search(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> (HttpStatus, Json<Value>) {
        if !authorized(&headers) {
            return (
                HttpStatus::UNAUTHORIZED,
                Json(json!({"error": {"status": 401, "message": "Invalid access token"}})),
            );
        }
        assert_eq!(params.get("type").map(String::as_str), Some("artist"));
        let items = match params.get("q").map(String::as_str) {
            Some("artist:Drake") => json!([{"id": "drake-id"}, {"id": "drake-tribute"}]),
            Some("artist:Future") => json!([{"id": "future-id"}]),
            _ => json!([]),
        };
        (HttpStatus::OK, Json(json!({"artists": {"items": items}})))
    }

    async fn top_tracks(Path(id): Path<String>, Query(params): Query<HashMap<String, String>>) -> (HttpStatus, Json<Value>) {
        assert_eq!(params.get("market").map(String::as_str), Some("US"));
        if id != "drake-id" {
            return (
                HttpStatus::NOT_FOUND,
                Json(json!({"error": {"status": 404, "message": "Resource not found"}})),
            );
        }
        let tracks: Vec<Value> = (1..=8).map(|i| json!({"name": format!("Drake {}", i)})).collect();
        (HttpStatus::OK, Json(json!({"tracks": tracks})))
    }

    /// Serve a Spotify stub: `Drake` and `Future` resolve, only `drake-id`
    /// has top tracks (8 of them), the client credentials are `id:secret`.
    pub(crate) async fn spawn_catalog() -> String {
        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/search", get(search))
            .route("/v1/artists/{id}/top-tracks", get(top_tracks));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    pub(crate) fn config_for(base: &str, secret: &str) -> CatalogConfig {
        CatalogConfig {
            client_id: "id".to_string(),
            client_secret: secret.to_string(),
            api_base: base.to_string(),
            accounts_base: base.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_and_fetch() {
        let base = spawn_catalog().await;
        let client = CatalogClient::connect(config_for(&base, "secret")).await.unwrap();

        let id = client.resolve_artist_id("Drake").await.unwrap();
        assert_eq!(id, Some(ArtistId::new("drake-id")));

        let titles = client.fetch_top_tracks(&ArtistId::new("drake-id")).await.unwrap();
        assert_eq!(titles.len(), MAX_TOP_TRACKS);
        assert_eq!(titles[0], "Drake 1");
        assert_eq!(titles[4], "Drake 5");
    }

    #[tokio::test]
    async fn test_resolve_no_hits_is_none() {
        let base = spawn_catalog().await;
        let client = CatalogClient::connect(config_for(&base, "secret")).await.unwrap();

        assert_eq!(client.resolve_artist_id("Nobody At All").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unknown_id_is_error() {
        let base = spawn_catalog().await;
        let client = CatalogClient::connect(config_for(&base, "secret")).await.unwrap();

        let err = client.fetch_top_tracks(&ArtistId::new("missing")).await.unwrap_err();
        match err {
            RecommenderError::CatalogApi { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Resource not found");
            }
            other => panic!("expected catalog error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bad_credentials_fail_on_connect() {
        let base = spawn_catalog().await;
        let err = CatalogClient::connect(config_for(&base, "wrong")).await.unwrap_err();
        match err {
            RecommenderError::Authentication(message) => assert_eq!(message, "Invalid client"),
            other => panic!("expected authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_request() {
        let config = CatalogConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            accounts_base: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            CatalogClient::connect(config).await,
            Err(RecommenderError::MissingCredentials(_))
        ));
    }
}
