//! API configuration
//!
//! Where the report backend lives and how long to wait for it.

use serde::Deserialize;
use std::time::Duration;

/// Default report backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Environment variable that replaces `api.url`
pub const API_URL_ENV: &str = "ADBOARD_API_URL";

/// API client configuration
///
/// # Example
///
/// ```toml
/// [api]
/// url = "http://localhost:8080/api"
/// timeout = "60s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Report backend base URL
    /// Default: "http://localhost:8080/api"
    pub url: String,

    /// Per-request timeout
    /// Default: 60s
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.url, "http://localhost:8080/api");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_custom_values() {
        let toml = r#"
url = "https://reports.example.com/api"
timeout = "2m"
"#;
        let config: ApiConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.url, "https://reports.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(120));
    }
}
