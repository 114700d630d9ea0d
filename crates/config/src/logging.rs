//! `[log]` section
//!
//! Diagnostics of the `adboard` commands go to stderr so that report, CSV
//! and JSON output on stdout can be piped. The interactive dashboard draws
//! on the alternate screen and installs no subscriber at all.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Crates of the HTTP stack that flood `debug`/`trace` with connection
/// details; they stay at `info` unless the level is quieter than that
const HTTP_STACK: [&str; 4] = ["hyper", "hyper_util", "h2", "rustls"];

/// Verbosity of the command diagnostics
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Every request body and pager decision
    Trace,
    /// Chunk windows, stale drops, poll ticks
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `EnvFilter` directive for this level
    ///
    /// `debug` and `trace` apply to the adboard crates and reqwest; the
    /// lower HTTP layers are held at `info`.
    pub fn filter_directive(&self) -> String {
        let mut directive = self.as_str().to_string();
        if *self < LogLevel::Info {
            for target in HTTP_STACK {
                directive.push_str(&format!(",{}=info", target));
            }
        }
        directive
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    /// Case-insensitive, as given to `--log-level`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ConfigError::invalid_value(
                "log",
                "level",
                format!("'{}' (use trace, debug, info, warn or error)", other),
            )),
        }
    }
}

/// How log lines are rendered
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain lines for a terminal
    #[default]
    Console,
    /// One JSON object per line, for log shippers
    Json,
}

/// ```toml
/// [log]
/// level = "debug"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl LogConfig {
    /// Level to run with: `--log-level` when given, else this section's
    pub fn effective_level(&self, flag: Option<&str>) -> Result<LogLevel, ConfigError> {
        match flag {
            Some(flag) => flag.parse(),
            None => Ok(self.level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_section_means_info_on_console() {
        let config: LogConfig = toml::from_str("").unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
    }

    #[test]
    fn test_json_debug_section() {
        let config: LogConfig = toml::from_str("level = \"debug\"\nformat = \"json\"").unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!(toml::from_str::<LogConfig>("level = \"loud\"").is_err());
        assert!(toml::from_str::<LogConfig>("format = \"xml\"").is_err());
    }

    #[test]
    fn test_flag_overrides_section() {
        let config = LogConfig {
            level: LogLevel::Warn,
            format: LogFormat::Console,
        };
        assert_eq!(config.effective_level(None).unwrap(), LogLevel::Warn);
        assert_eq!(config.effective_level(Some("TRACE")).unwrap(), LogLevel::Trace);
        assert_eq!(config.effective_level(Some("warning")).unwrap(), LogLevel::Warn);

        let err = config.effective_level(Some("chatty")).unwrap_err();
        assert!(err.to_string().contains("'chatty'"), "{}", err);
    }

    #[test]
    fn test_filter_directive_quiets_http_stack_below_info() {
        assert_eq!(LogLevel::Info.filter_directive(), "info");
        assert_eq!(LogLevel::Error.filter_directive(), "error");
        assert_eq!(
            LogLevel::Debug.filter_directive(),
            "debug,hyper=info,hyper_util=info,h2=info,rustls=info"
        );
        assert!(LogLevel::Trace.filter_directive().starts_with("trace,hyper=info"));
    }
}
