//! Dashboard Configuration
//! Settings read from an optional JSON file, with defaults for every field.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CHARTBOARD_CONFIG";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "chartboard.json";

pub const DEFAULT_ROUTES_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/routes.dat";
pub const DEFAULT_AIRPORTS_URL: &str =
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/airports.dat";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Settings shared by all dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Bundled MBTI-by-country CSV
    pub mbti_csv: PathBuf,
    pub routes_url: String,
    pub airports_url: String,
    /// Rows kept in every ranked result
    pub top_n: usize,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Sequential color scheme for the value encoding
    pub color_scheme: String,
    pub http_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            mbti_csv: PathBuf::from("countriesMBTI_16types.csv"),
            routes_url: DEFAULT_ROUTES_URL.to_string(),
            airports_url: DEFAULT_AIRPORTS_URL.to_string(),
            top_n: 10,
            chart_width: 600,
            chart_height: 400,
            color_scheme: "tealblues".to_string(),
            http_timeout_secs: 30,
        }
    }
}

impl DashboardConfig {
    /// Parse a config file. Fields missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the config the way the binary does: `$CHARTBOARD_CONFIG` if set,
    /// else `./chartboard.json` if it exists, else defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            info!(path = %path.display(), "Loading config from {}", CONFIG_ENV);
            return Self::from_file(&path);
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            info!(path = %local.display(), "Loading config");
            return Self::from_file(local);
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "top_n": 5, "color_scheme": "blues" }}"#).unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.color_scheme, "blues");
        assert_eq!(config.chart_width, 600);
        assert_eq!(config.routes_url, DEFAULT_ROUTES_URL);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "top_n = 5").unwrap();

        let err = DashboardConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DashboardConfig::from_file(Path::new("/nonexistent/chartboard.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
