//! Song Recommender CLI
//!
//! Asks an LLM for song recommendations, or looks up artists' top tracks.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use song_recommender::{
    catalog::CatalogClient,
    chain::PromptChain,
    config::Config,
    llm::{Completion, LlmClient, MODEL},
    logging::init_logging,
    orchestrator::{EXAMPLE_QUERY, Orchestrator},
    recommend::{ArtistOutcome, RecommendOptions, RecommendationTool},
    telemetry::TracingTelemetry,
};
use std::time::{Duration, Instant};

/// Song Recommender - LLM song suggestions and catalog top tracks
#[derive(Parser)]
#[command(name = "song-recommender")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging for this crate
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the model for 5 songs similar to the artists in a query
    Ask {
        /// Free-text request naming artists you like
        query: Option<String>,
    },

    /// Look up the top tracks of each artist in the catalog
    Tracks {
        /// Artist names
        #[arg(required = true)]
        artists: Vec<String>,

        /// Look artists up concurrently
        #[arg(long)]
        concurrent: bool,

        /// Per-artist timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Output as JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Test LLM connection
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        None => cmd_ask(None).await,
        Some(Commands::Ask { query }) => cmd_ask(query).await,
        Some(Commands::Tracks {
            artists,
            concurrent,
            timeout_secs,
            json,
        }) => cmd_tracks(artists, concurrent, timeout_secs, json).await,
        Some(Commands::Test) => cmd_test().await,
    }
}

async fn cmd_ask(query: Option<String>) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let query = query.unwrap_or_else(|| EXAMPLE_QUERY.to_string());

    let telemetry = TracingTelemetry::from_config(&config.telemetry);
    let client = LlmClient::new(config.llm).context("Failed to create LLM client")?;
    println!("Using model: {}", client.model());

    let orchestrator = Orchestrator::new(PromptChain::new(client), telemetry);

    println!("\nRunning song recommendation chain...\n");
    let completion = orchestrator
        .run(&query)
        .await
        .context("Recommendation request failed")?;

    println!("Final Song Recommendations:");
    println!("{}", "─".repeat(60));
    match &completion {
        Completion::Text(text) => println!("{}", text.trim()),
        Completion::Raw(_) => {
            println!("(model returned no completion text; raw response follows)");
            println!("{}", completion);
        }
    }

    Ok(())
}

async fn cmd_tracks(
    artists: Vec<String>,
    concurrent: bool,
    timeout_secs: Option<u64>,
    json: bool,
) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let catalog = CatalogClient::connect(config.catalog)
        .await
        .context("Failed to connect to the music catalog")?;

    let options = RecommendOptions {
        lookup_timeout: timeout_secs.map(Duration::from_secs),
        concurrent,
    };
    let tool = RecommendationTool::with_options(catalog, options);

    let start = Instant::now();
    let result = tool.recommend(&artists).await;
    let duration = start.elapsed();

    if json {
        let json_str =
            serde_json::to_string_pretty(&result).context("Failed to serialize results")?;
        println!("{}", json_str);
        return Ok(());
    }

    println!("Top Tracks");
    println!("{}", "─".repeat(60));
    for (artist, outcome) in &result {
        println!("{}", artist);
        match outcome {
            ArtistOutcome::Tracks(tracks) if tracks.is_empty() => println!("    (no tracks)"),
            ArtistOutcome::Tracks(tracks) => {
                for (i, title) in tracks.iter().enumerate() {
                    println!("  {:>2}. {}", i + 1, title);
                }
            }
            ArtistOutcome::Error(message) => println!("    {}", message),
        }
        println!();
    }
    println!("{}", "─".repeat(60));

    let failed = result.values().filter(|o| o.is_error()).count();
    println!(
        "Looked up {} artists ({} failed) in {:.2?}",
        result.len(),
        failed,
        duration
    );

    Ok(())
}

async fn cmd_test() -> Result<()> {
    println!("Testing LLM connection...\n");

    let config = Config::load().context("Failed to load configuration")?;

    println!("Configuration:");
    println!("  API Base:  {}", config.llm.api_base);
    println!("  Model:     {}", MODEL);
    println!(
        "  API Key:   {}...",
        config.llm.api_key.chars().take(8).collect::<String>()
    );
    println!();

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Ok(());
    }

    let client = LlmClient::new(config.llm).context("Failed to create LLM client")?;

    println!("Sending test request...");
    match client.test_connection().await {
        Ok(()) => {
            println!("Connection successful!");
        }
        Err(e) => {
            println!("Connection failed: {}", e);
        }
    }

    Ok(())
}
