//! adboard Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! An empty file is a valid config - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use adboard_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[dashboard]\npage_size = 50").unwrap();
//! assert_eq!(config.dashboard.page_size, 50);
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [api]
//! url = "http://localhost:8080/api"
//! timeout = "60s"
//!
//! [log]
//! level = "info"
//! format = "console"
//!
//! [dashboard]
//! page_size = 100
//! debounce = "500ms"
//!
//! [import]
//! poll_interval = "1s"
//! start_delay = "1s"
//! max_file_size = 10485760
//! ```

mod api;
mod dashboard;
mod error;
mod import;
mod logging;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use api::{API_URL_ENV, ApiConfig, DEFAULT_API_URL};
pub use dashboard::DashboardConfig;
pub use error::{ConfigError, Result};
pub use import::ImportConfig;
pub use logging::{LogConfig, LogFormat, LogLevel};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report backend connection
    pub api: ApiConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// Table paging and fetch debounce
    pub dashboard: DashboardConfig,

    /// Bulk import limits and polling
    pub import: ImportConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Load from `path` when given, else defaults, then apply the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.override_api_url(std::env::var(API_URL_ENV).ok())?;
        Ok(config)
    }

    /// Replace `api.url` when `url` is set and non-blank, then revalidate
    pub fn override_api_url(&mut self, url: Option<String>) -> Result<()> {
        if let Some(url) = url
            && !url.trim().is_empty()
        {
            self.api.url = url.trim().to_string();
            self.validate()?;
        }
        Ok(())
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;
    use std::time::Duration;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert_eq!(config.dashboard.page_size, 100);
        assert_eq!(config.import.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.log.level, LogLevel::Info);
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[api]
url = "https://reports.example.com/api"
timeout = "30s"

[log]
level = "debug"
format = "json"

[dashboard]
page_size = 25
debounce = "300ms"

[import]
poll_interval = "2s"
start_delay = "500ms"
max_file_size = 1048576
"#;
        let config = Config::from_str(toml).unwrap();

        assert_eq!(config.api.url, "https://reports.example.com/api");
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.dashboard.page_size, 25);
        assert_eq!(config.dashboard.debounce, Duration::from_millis(300));
        assert_eq!(config.import.poll_interval, Duration::from_secs(2));
        assert_eq!(config.import.start_delay, Duration::from_millis(500));
        assert_eq!(config.import.max_file_size, 1_048_576);
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_str("invalid { toml");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\npage_size = 42").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.dashboard.page_size, 42);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/adboard.toml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
        assert!(err.to_string().contains("/nonexistent/adboard.toml"));
    }

    #[test]
    fn test_api_url_override() {
        let mut config = Config::default();
        config
            .override_api_url(Some(" https://other.example.com/api ".into()))
            .unwrap();
        assert_eq!(config.api.url, "https://other.example.com/api");

        config.override_api_url(Some("   ".into())).unwrap();
        config.override_api_url(None).unwrap();
        assert_eq!(config.api.url, "https://other.example.com/api");

        assert!(config.override_api_url(Some("not a url".into())).is_err());
    }
}
