use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodtunes_server::catalog_store::{CatalogStore, SqliteCatalogStore};
use moodtunes_server::config::{AppConfig, CliConfig, FileConfig};
use moodtunes_server::server::{run_server, RequestsLoggingLevel, ServerConfig};
use moodtunes_server::user::{FullUserStore, SqliteUserStore};
use moodtunes_server::video::{VideoProvider, YouTubeClient};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding catalog.db and user.db.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// Optional TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// YouTube Data API key, used to look up submitted videos.
    #[clap(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: Option<String>,

    /// Base URL of the YouTube Data API.
    #[clap(long)]
    pub youtube_api_base_url: Option<String>,

    /// Timeout in seconds for video service requests.
    #[clap(long)]
    pub request_timeout_sec: Option<u64>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_dir: self.db_dir.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            frontend_dir_path: self.frontend_dir_path.clone(),
            youtube_api_key: self.youtube_api_key.clone(),
            youtube_api_base_url: self.youtube_api_base_url.clone(),
            request_timeout_sec: self.request_timeout_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!(
        "Opening SQLite catalog database at {:?}...",
        config.catalog_db_path()
    );
    let catalog_store: Arc<dyn CatalogStore> =
        Arc::new(SqliteCatalogStore::new(config.catalog_db_path())?);
    info!("Catalog holds {} songs", catalog_store.get_songs_count()?);

    info!("Opening user database at {:?}...", config.user_db_path());
    let user_store: Arc<dyn FullUserStore> =
        Arc::new(SqliteUserStore::new(config.user_db_path())?);

    let api_key = match &config.youtube_api_key {
        Some(key) => key.clone(),
        None => {
            warn!("No YouTube API key configured, song uploads will fail");
            String::new()
        }
    };
    let video_provider: Arc<dyn VideoProvider> = Arc::new(YouTubeClient::new(
        &config.youtube_api_base_url,
        api_key,
        config.request_timeout_sec,
    )?);

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
        frontend_dir_path: config.frontend_dir_path.clone(),
    };

    info!("Ready to serve at port {}!", config.port);
    run_server(server_config, catalog_store, user_store, video_provider).await
}
