use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_dir: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub frontend_dir_path: Option<String>,

    // Video service
    pub youtube_api_key: Option<String>,
    pub youtube_api_base_url: Option<String>,
    pub request_timeout_sec: Option<u64>,

    pub ingestion: Option<IngestionConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct IngestionConfig {
    pub topics: Option<Vec<String>>,
    pub max_results_per_topic: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_full_file() {
        let toml = r#"
            db_dir = "/data"
            port = 8080
            logging_level = "headers"
            youtube_api_key = "k"
            request_timeout_sec = 5

            [ingestion]
            topics = ["kannada film songs", "lofi"]
            max_results_per_topic = 3
        "#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.db_dir.as_deref(), Some("/data"));
        assert_eq!(config.port, Some(8080));
        let ingestion = config.ingestion.unwrap();
        assert_eq!(ingestion.topics.unwrap().len(), 2);
        assert_eq!(ingestion.max_results_per_topic, Some(3));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.db_dir.is_none());
        assert!(config.ingestion.is_none());
    }

    #[test]
    fn load_reports_bad_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));

        assert!(FileConfig::load(Path::new("/definitely/not/here.toml")).is_err());
    }
}
