//! Dashboard configuration

use serde::Deserialize;
use std::time::Duration;

/// Table and fetch behaviour
///
/// ```toml
/// [dashboard]
/// page_size = 100
/// debounce = "500ms"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rows per table page
    pub page_size: usize,

    /// Quiet period before a query edit is fetched
    #[serde(with = "humantime_serde")]
    pub debounce: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            debounce: Duration::from_millis(500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: DashboardConfig = toml::from_str("").unwrap();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.debounce, Duration::from_millis(500));
    }

    #[test]
    fn test_debounce_parsing() {
        for (input, expected) in [
            ("0s", Duration::ZERO),
            ("250ms", Duration::from_millis(250)),
            ("1s", Duration::from_secs(1)),
        ] {
            let config: DashboardConfig =
                toml::from_str(&format!("debounce = \"{input}\"")).unwrap();
            assert_eq!(config.debounce, expected);
        }
    }
}
