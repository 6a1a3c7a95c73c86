//! Song Recommender - song suggestions from an LLM and artist top tracks
//! from the Spotify catalog.
//!
//! # Overview
//!
//! Two independent capabilities live in this crate:
//! 1. A prompt chain that asks a hosted model for 5 songs similar to the
//!    artists named in a free-text request
//! 2. A recommendation tool that resolves artist names in the catalog and
//!    returns each artist's top tracks, isolating failures per artist
//!
//! # Quick Start
//!
//! ```no_run
//! use song_recommender::{
//!     catalog::CatalogClient,
//!     chain::PromptChain,
//!     config::Config,
//!     llm::LlmClient,
//!     orchestrator::{Orchestrator, EXAMPLE_QUERY},
//!     recommend::RecommendationTool,
//!     telemetry::TracingTelemetry,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     // Ask the model
//!     let chain = PromptChain::new(LlmClient::new(config.llm.clone())?);
//!     let telemetry = TracingTelemetry::from_config(&config.telemetry);
//!     let completion = Orchestrator::new(chain, telemetry).run(EXAMPLE_QUERY).await?;
//!     println!("{}", completion);
//!
//!     // Look up top tracks
//!     let catalog = CatalogClient::connect(config.catalog.clone()).await?;
//!     let tool = RecommendationTool::new(catalog);
//!     for (artist, outcome) in tool.recommend(&["Drake", "Future"]).await {
//!         println!("{}: {:?}", artist, outcome);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **CatalogClient**: authenticated Spotify Web API session
//! - **RecommendationTool**: per-artist top tracks with fault isolation
//! - **LlmClient**: OpenAI-compatible API client for LLM calls
//! - **PromptChain**: the fixed recommendation prompt bound to a model
//! - **Orchestrator**: one chain run inside a telemetry trace

pub mod catalog;
pub mod chain;
pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod orchestrator;
pub mod recommend;
pub mod telemetry;

// Re-export commonly used types
pub use catalog::{ArtistId, CatalogClient, MusicCatalog};
pub use chain::PromptChain;
pub use config::Config;
pub use error::{RecommenderError, Result};
pub use llm::{Completion, CompletionModel, LlmClient};
pub use orchestrator::Orchestrator;
pub use recommend::{ArtistOutcome, RecommendOptions, RecommendationResult, RecommendationTool};
pub use telemetry::{TelemetrySink, TracingTelemetry};
