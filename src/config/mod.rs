mod file_config;

pub use file_config::{FileConfig, IngestionConfig};

use crate::ingestion::{DEFAULT_MAX_RESULTS_PER_TOPIC, DEFAULT_TOPICS};
use crate::server::RequestsLoggingLevel;
use crate::video::DEFAULT_YOUTUBE_API_BASE_URL;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 10;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub youtube_api_key: Option<String>,
    pub youtube_api_base_url: Option<String>,
    pub request_timeout_sec: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,

    pub youtube_api_key: Option<String>,
    pub youtube_api_base_url: String,
    pub request_timeout_sec: u64,

    pub ingestion: IngestionSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionSettings {
    pub topics: Vec<String>,
    pub max_results_per_topic: usize,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
            max_results_per_topic: DEFAULT_MAX_RESULTS_PER_TOPIC,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let youtube_api_key = file
            .youtube_api_key
            .or_else(|| cli.youtube_api_key.clone())
            .filter(|key| !key.trim().is_empty());
        let youtube_api_base_url = file
            .youtube_api_base_url
            .or_else(|| cli.youtube_api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE_URL.to_string());
        let request_timeout_sec = file
            .request_timeout_sec
            .or(cli.request_timeout_sec)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SEC);
        if request_timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than zero");
        }

        let defaults = IngestionSettings::default();
        let ingestion_file = file.ingestion.unwrap_or_default();
        let ingestion = IngestionSettings {
            topics: ingestion_file
                .topics
                .filter(|topics| !topics.is_empty())
                .unwrap_or(defaults.topics),
            max_results_per_topic: ingestion_file
                .max_results_per_topic
                .unwrap_or(defaults.max_results_per_topic),
        };

        Ok(Self {
            db_dir,
            port,
            logging_level,
            frontend_dir_path,
            youtube_api_key,
            youtube_api_base_url,
            request_timeout_sec,
            ingestion,
        })
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.db_dir.join("catalog.db")
    }

    pub fn user_db_path(&self) -> PathBuf {
        self.db_dir.join("user.db")
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli_for(dir: &TempDir) -> CliConfig {
        CliConfig {
            db_dir: Some(dir.path().to_path_buf()),
            port: 3001,
            logging_level: RequestsLoggingLevel::Headers,
            frontend_dir_path: Some("/frontend".to_string()),
            youtube_api_key: Some("cli-key".to_string()),
            youtube_api_base_url: None,
            request_timeout_sec: None,
        }
    }

    #[test]
    fn test_parse_logging_level() {
        assert!(matches!(
            parse_logging_level("none"),
            Some(RequestsLoggingLevel::None)
        ));
        assert!(matches!(
            parse_logging_level("PATH"),
            Some(RequestsLoggingLevel::Path)
        ));
        assert!(matches!(
            parse_logging_level("body"),
            Some(RequestsLoggingLevel::Body)
        ));
        assert!(parse_logging_level("invalid").is_none());
    }

    #[test]
    fn test_resolve_cli_only() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::resolve(&cli_for(&temp_dir), None).unwrap();

        assert_eq!(config.db_dir, temp_dir.path());
        assert_eq!(config.port, 3001);
        assert!(matches!(config.logging_level, RequestsLoggingLevel::Headers));
        assert_eq!(config.frontend_dir_path.as_deref(), Some("/frontend"));
        assert_eq!(config.youtube_api_key.as_deref(), Some("cli-key"));
        assert_eq!(config.youtube_api_base_url, DEFAULT_YOUTUBE_API_BASE_URL);
        assert_eq!(config.request_timeout_sec, DEFAULT_REQUEST_TIMEOUT_SEC);
        assert_eq!(config.ingestion, IngestionSettings::default());
        assert_eq!(config.catalog_db_path(), temp_dir.path().join("catalog.db"));
        assert_eq!(config.user_db_path(), temp_dir.path().join("user.db"));
    }

    #[test]
    fn test_toml_overrides_cli() {
        let temp_dir = TempDir::new().unwrap();
        let file = FileConfig {
            port: Some(4000),
            logging_level: Some("none".to_string()),
            youtube_api_key: Some("file-key".to_string()),
            youtube_api_base_url: Some("http://localhost:9999".to_string()),
            request_timeout_sec: Some(3),
            ingestion: Some(IngestionConfig {
                topics: Some(vec!["lofi".to_string()]),
                max_results_per_topic: Some(2),
            }),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli_for(&temp_dir), Some(file)).unwrap();
        assert_eq!(config.port, 4000);
        assert!(matches!(config.logging_level, RequestsLoggingLevel::None));
        assert_eq!(config.youtube_api_key.as_deref(), Some("file-key"));
        assert_eq!(config.youtube_api_base_url, "http://localhost:9999");
        assert_eq!(config.request_timeout_sec, 3);
        assert_eq!(config.ingestion.topics, vec!["lofi".to_string()]);
        assert_eq!(config.ingestion.max_results_per_topic, 2);
        // untouched by the file
        assert_eq!(config.frontend_dir_path.as_deref(), Some("/frontend"));
    }

    #[test]
    fn test_invalid_logging_level_falls_back_to_cli() {
        let temp_dir = TempDir::new().unwrap();
        let file = FileConfig {
            logging_level: Some("loud".to_string()),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli_for(&temp_dir), Some(file)).unwrap();
        assert!(matches!(config.logging_level, RequestsLoggingLevel::Headers));
    }

    #[test]
    fn test_missing_or_bad_db_dir() {
        let cli = CliConfig::default();
        let err = AppConfig::resolve(&cli, None).unwrap_err();
        assert!(err.to_string().contains("db_dir must be specified"));

        let cli = CliConfig {
            db_dir: Some(PathBuf::from("/nonexistent/path/for/sure")),
            ..Default::default()
        };
        let err = AppConfig::resolve(&cli, None).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_blank_api_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            youtube_api_key: Some("  ".to_string()),
            ..cli_for(&temp_dir)
        };
        let config = AppConfig::resolve(&cli, None).unwrap();
        assert!(config.youtube_api_key.is_none());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            request_timeout_sec: Some(0),
            ..cli_for(&temp_dir)
        };
        assert!(AppConfig::resolve(&cli, None).is_err());
    }
}
