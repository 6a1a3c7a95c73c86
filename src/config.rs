//! Configuration for the song recommender.
//!
//! Supports a `.env` file, environment variables and a YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{RecommenderError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// LLM configuration.
///
/// The model identifier and sampling temperature are fixed in
/// [`LlmClient`](crate::llm::LlmClient) and are not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for the LLM API (e.g., "https://api.groq.com/openai")
    pub api_base: String,

    /// API key for authentication
    pub api_key: String,

    /// Maximum tokens for response (optional)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai".to_string(),
            api_key: String::new(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Music catalog (Spotify Web API) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Client id for the client-credentials exchange
    pub client_id: String,

    /// Client secret for the client-credentials exchange
    pub client_secret: String,

    /// Market used for top-track lookups (ISO 3166-1 alpha-2)
    pub market: String,

    /// Base URL of the Web API
    pub api_base: String,

    /// Base URL of the accounts service issuing tokens
    pub accounts_base: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            market: "US".to_string(),
            api_base: "https://api.spotify.com".to_string(),
            accounts_base: "https://accounts.spotify.com".to_string(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    /// Return the client id and secret, failing if either is unset.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        if self.client_id.is_empty() {
            return Err(RecommenderError::MissingCredentials("SPOTIFY_CLIENT"));
        }
        if self.client_secret.is_empty() {
            return Err(RecommenderError::MissingCredentials("SPOTIFY_SECRET"));
        }
        Ok((&self.client_id, &self.client_secret))
    }
}

/// Telemetry configuration. Traces are only recorded when a key is set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryConfig {
    pub api_key: Option<String>,
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM settings
    pub llm: LlmConfig,
    /// Catalog settings
    pub catalog: CatalogConfig,
    /// Telemetry settings
    pub telemetry: TelemetryConfig,
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    llm: Option<LlmFileSection>,
    catalog: Option<CatalogFileSection>,
    telemetry: Option<TelemetryFileSection>,
}

#[derive(Debug, Deserialize)]
struct LlmFileSection {
    api_base: Option<String>,
    api_key: Option<String>,
    max_tokens: Option<u32>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CatalogFileSection {
    client_id: Option<String>,
    client_secret: Option<String>,
    market: Option<String>,
    api_base: Option<String>,
    accounts_base: Option<String>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TelemetryFileSection {
    api_key: Option<String>,
}

impl Config {
    /// Load configuration from `.env`, environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (LLM_API_KEY, SPOTIFY_CLIENT, AGENT_OPS_KEY, ...)
    /// 2. Config file (~/.config/song-recommender/config.yaml)
    /// 3. Default values
    ///
    /// A `.env` file in the working directory is read first; it never
    /// overrides variables already present in the environment.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(RecommenderError::Config(format!(
                    "Failed to read .env file: {}",
                    e
                )));
            }
        }

        let mut config = Config::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        config.apply_env(|key| env::var(key).ok());

        Ok(config)
    }

    /// Override values from an environment lookup.
    ///
    /// Empty values are ignored so a blank `KEY=` line does not wipe a
    /// value coming from the config file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(api_base) = var("LLM_API_BASE") {
            self.llm.api_base = api_base;
        }

        if let Some(api_key) = var("LLM_API_KEY").or_else(|| var("GROQ_API_KEY")) {
            self.llm.api_key = api_key;
        }

        if let Some(tokens) = var("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.llm.max_tokens = tokens;
        }

        if let Some(client_id) = var("SPOTIFY_CLIENT") {
            self.catalog.client_id = client_id;
        }

        if let Some(client_secret) = var("SPOTIFY_SECRET") {
            self.catalog.client_secret = client_secret;
        }

        if let Some(market) = var("SPOTIFY_MARKET") {
            self.catalog.market = market;
        }

        if let Some(key) = var("AGENT_OPS_KEY") {
            self.telemetry.api_key = Some(key);
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RecommenderError::io(path, e))?;

        let file_config: ConfigFile = serde_yaml::from_str(&content)
            .map_err(|e| RecommenderError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(llm) = file_config.llm {
            if let Some(api_base) = llm.api_base {
                config.llm.api_base = api_base;
            }
            if let Some(api_key) = llm.api_key {
                config.llm.api_key = api_key;
            }
            if let Some(max_tokens) = llm.max_tokens {
                config.llm.max_tokens = max_tokens;
            }
            if let Some(secs) = llm.request_timeout_secs {
                config.llm.request_timeout_secs = secs;
            }
        }

        if let Some(catalog) = file_config.catalog {
            if let Some(client_id) = catalog.client_id {
                config.catalog.client_id = client_id;
            }
            if let Some(client_secret) = catalog.client_secret {
                config.catalog.client_secret = client_secret;
            }
            if let Some(market) = catalog.market {
                config.catalog.market = market;
            }
            if let Some(api_base) = catalog.api_base {
                config.catalog.api_base = api_base;
            }
            if let Some(accounts_base) = catalog.accounts_base {
                config.catalog.accounts_base = accounts_base;
            }
            if let Some(secs) = catalog.request_timeout_secs {
                config.catalog.request_timeout_secs = secs;
            }
        }

        if let Some(telemetry) = file_config.telemetry {
            config.telemetry.api_key = telemetry.api_key;
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "song-recommender")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that the model settings are usable.
    ///
    /// Catalog credentials are checked separately by
    /// [`CatalogConfig::credentials`] when the catalog client connects.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_base.is_empty() {
            return Err(RecommenderError::Config(
                "LLM API base URL is required. Set LLM_API_BASE environment variable or add to config file.".to_string()
            ));
        }

        if self.llm.api_key.is_empty() {
            return Err(RecommenderError::Config(
                "LLM API key is required. Set LLM_API_KEY (or GROQ_API_KEY) environment variable or add to config file.".to_string()
            ));
        }

        if self.llm.request_timeout_secs == 0 {
            return Err(RecommenderError::InvalidConfig(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
