//! Batch ingestion tool
//!
//! Searches the video service for a list of topics and stores every music
//! video found in the catalog, classified by mood.

use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use moodtunes_server::catalog_store::{CatalogStore, SqliteCatalogStore};
use moodtunes_server::config::{AppConfig, CliConfig, FileConfig};
use moodtunes_server::ingestion::BatchIngestor;
use moodtunes_server::mood::MoodClassifier;
use moodtunes_server::user::{FullUserStore, SqliteUserStore, UserManager};
use moodtunes_server::video::YouTubeClient;

#[derive(Parser, Debug)]
#[command(name = "cli-ingest")]
#[command(about = "Populate the song catalog from video searches")]
struct Args {
    /// Directory holding catalog.db and user.db.
    #[arg(long)]
    db_dir: Option<PathBuf>,

    /// Optional TOML config file. Its values override the command line.
    #[arg(long)]
    config: Option<PathBuf>,

    /// YouTube Data API key.
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    youtube_api_key: Option<String>,

    /// Base URL of the YouTube Data API.
    #[arg(long)]
    youtube_api_base_url: Option<String>,

    /// Topic to search for. Repeat for several; replaces the configured list.
    #[arg(long = "topic", value_name = "TOPIC")]
    topics: Vec<String>,

    /// Maximum number of results per topic.
    #[arg(long)]
    max_results: Option<usize>,

    /// Remove every song, and user references to them, before ingesting.
    #[arg(long, default_value_t = false)]
    clear: bool,
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    let template = "{msg:30} [{elapsed_precise}] [{bar:40}] {pos}/{len}";
    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let file_config = match &args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        db_dir: args.db_dir.clone(),
        youtube_api_key: args.youtube_api_key.clone(),
        youtube_api_base_url: args.youtube_api_base_url.clone(),
        ..Default::default()
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let api_key = match config.youtube_api_key.clone() {
        Some(key) => key,
        None => bail!(
            "A YouTube API key is required, pass --youtube-api-key or set it in the config file"
        ),
    };

    let topics = if args.topics.is_empty() {
        config.ingestion.topics.clone()
    } else {
        args.topics.clone()
    };
    let max_results = args
        .max_results
        .unwrap_or(config.ingestion.max_results_per_topic);
    if max_results == 0 {
        bail!("--max-results must be greater than zero");
    }

    let catalog_store: Arc<dyn CatalogStore> =
        Arc::new(SqliteCatalogStore::new(config.catalog_db_path())?);

    if args.clear {
        let user_store: Arc<dyn FullUserStore> =
            Arc::new(SqliteUserStore::new(config.user_db_path())?);
        let user_manager = UserManager::new(catalog_store.clone(), user_store);
        let references = user_manager.clear_song_references()?;
        let songs = catalog_store.delete_all_songs()?;
        warn!(
            "Cleared {} songs and {} user references to them",
            songs, references
        );
    }

    let provider = Arc::new(YouTubeClient::new(
        &config.youtube_api_base_url,
        api_key,
        config.request_timeout_sec,
    )?);
    let ingestor = BatchIngestor::new(
        provider,
        catalog_store.clone(),
        Arc::new(MoodClassifier::default()),
    );

    info!(
        "Ingesting {} topics, up to {} results each",
        topics.len(),
        max_results
    );
    let bar = progress_bar(topics.len() as u64);
    let summary = ingestor.run(&topics, max_results, Some(&bar)).await;
    bar.finish_with_message("done");

    println!("Topics searched: {}", summary.topics_searched);
    println!("Songs added:     {}", summary.added);
    println!("Duplicates:      {}", summary.skipped);
    println!("Failures:        {}", summary.failed);
    println!("Catalog size:    {}", catalog_store.get_songs_count()?);

    Ok(())
}
