//! `tracing` subscriber setup for hosts embedding libwebui
//!
//! Everything is written to stderr, so tools like `webui-replay` keep stdout
//! for their own output. `RUST_LOG` overrides the configured level.
//!
//! ```no_run
//! use libwebui::config::Config;
//! use libwebui::logging::LoggingConfig;
//!
//! let config = Config::default_config();
//! LoggingConfig::from_section(&config.logging, false).init();
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSection;

/// Output style of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain single-line records
    Text,
    /// One JSON object per record
    Json,
    /// Multi-line, colored
    Pretty,
}

impl LogFormat {
    const ALL: [LogFormat; 3] = [LogFormat::Text, LogFormat::Json, LogFormat::Pretty];

    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown log format '{}'. Valid options: text, json, pretty", s))
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved logging settings for one process
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or
    /// `libwebui::router=trace`
    pub level: String,
    /// Forces `debug` regardless of `level`
    pub verbose: bool,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
        }
    }

    /// Settings from the `[logging]` section of the config file
    pub fn from_section(section: &LoggingSection, verbose: bool) -> Self {
        Self::new(section.format, section.level.clone(), verbose)
    }

    fn filter(&self) -> EnvFilter {
        let fallback = if self.verbose { "debug" } else { self.level.as_str() };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }

    /// Install the global subscriber
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber is already installed.
    pub fn init(&self) {
        if let Err(e) = self.try_init() {
            panic!("failed to initialize logging: {}", e);
        }
    }

    /// Install the global subscriber, failing if one is already installed
    pub fn try_init(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(self.filter())
            .with_writer(std::io::stderr);

        match self.format {
            LogFormat::Text => builder.with_target(false).try_init(),
            LogFormat::Json => builder
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_file(true)
                .with_line_number(true)
                .try_init(),
            LogFormat::Pretty => builder
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .try_init(),
        }
    }
}

/// Install a subscriber configured from `WEBUI_LOG_FORMAT` and
/// `WEBUI_LOG_LEVEL`, defaulting to text at `info`
pub fn init_default() {
    let (format, level) = default_settings();
    LoggingConfig::new(format, level, false).init();
}

fn default_settings() -> (LogFormat, String) {
    let format = std::env::var("WEBUI_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LogFormat::Text);
    let level = std::env::var("WEBUI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    (format, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_log_format_parses_any_case() {
        for (input, expected) in [
            ("text", LogFormat::Text),
            ("JSON", LogFormat::Json),
            ("Pretty", LogFormat::Pretty),
        ] {
            assert_eq!(input.parse::<LogFormat>().unwrap(), expected);
        }
        let err = "yaml".parse::<LogFormat>().unwrap_err();
        assert!(err.contains("unknown log format 'yaml'"));
    }

    #[test]
    fn test_from_section_carries_config_values() {
        let section = LoggingSection {
            format: LogFormat::Json,
            level: "libwebui::store=trace".to_string(),
        };
        let config = LoggingConfig::from_section(&section, true);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "libwebui::store=trace");
        assert!(config.verbose);
    }

    #[test]
    fn test_log_format_display_matches_serde() {
        for format in [LogFormat::Text, LogFormat::Json, LogFormat::Pretty] {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format));
        }
    }

    #[test]
    #[serial]
    fn test_default_settings_from_env() {
        std::env::set_var("WEBUI_LOG_FORMAT", "json");
        std::env::set_var("WEBUI_LOG_LEVEL", "trace");
        let (format, level) = default_settings();
        std::env::remove_var("WEBUI_LOG_FORMAT");
        std::env::remove_var("WEBUI_LOG_LEVEL");

        assert_eq!(format, LogFormat::Json);
        assert_eq!(level, "trace");
    }

    #[test]
    #[serial]
    fn test_default_settings_fallback() {
        std::env::set_var("WEBUI_LOG_FORMAT", "yaml");
        std::env::remove_var("WEBUI_LOG_LEVEL");
        let (format, level) = default_settings();
        std::env::remove_var("WEBUI_LOG_FORMAT");

        assert_eq!(format, LogFormat::Text);
        assert_eq!(level, "info");
    }

    #[test]
    fn test_try_init_twice_does_not_panic() {
        let config = LoggingConfig::new(LogFormat::Text, "warn".to_string(), false);
        let _ = config.try_init();
        assert!(config.try_init().is_err());
    }
}
