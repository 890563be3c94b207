//! Logging setup for the editing engine
//!
//! The engine emits `tracing` events and spans; nothing is printed unless a
//! subscriber is installed. Binaries and tests call [`init_logging`] once.
//!
//! # Usage
//!
//! ```rust,no_run
//! use diagrammer::core::logging::init_logging;
//!
//! init_logging(Some("debug"), Some("pretty")).expect("logging already set up");
//! ```
//!
//! # What gets logged
//!
//! - `info`: undo and redo steps, session-level edits
//! - `debug`: builder operations and rejected connections, naming the
//!   constraint that failed
//! - `trace`: individual operation execution and sequence layout passes
//!
//! # Environment Variables
//!
//! - `DIAGRAMMER_LOG_LEVEL`: log level (trace|debug|info|warn|error|off)
//! - `DIAGRAMMER_LOG_FORMAT`: output format (compact|pretty|json)
//! - `RUST_LOG`: standard `tracing-subscriber` filter, e.g.
//!   `RUST_LOG="info,diagrammer::plugins::sequence=trace"`

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Environment variable holding the log level
pub const LOG_LEVEL_ENV: &str = "DIAGRAMMER_LOG_LEVEL";
/// Environment variable holding the log format
pub const LOG_FORMAT_ENV: &str = "DIAGRAMMER_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact single-line format
    #[default]
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Resolve the effective level: explicit argument, then
/// `DIAGRAMMER_LOG_LEVEL`, then `RUST_LOG`, then `info`
pub fn resolve_level(level: Option<&str>) -> String {
    level
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_LEVEL_ENV).ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string())
}

/// Resolve the effective format: explicit argument, then
/// `DIAGRAMMER_LOG_FORMAT`, then compact
pub fn resolve_format(format: Option<&str>) -> Result<LogFormat, String> {
    match format
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_FORMAT_ENV).ok())
    {
        Some(name) => LogFormat::from_str(&name),
        None => Ok(LogFormat::default()),
    }
}

/// Install a global tracing subscriber writing to stderr
///
/// Fails if the format is unknown or a subscriber is already installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = resolve_level(level);
    let format = resolve_format(format).map_err(|e| format!("Invalid log format: {}", e))?;

    let filter = if log_level == "off" {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_new(&log_level)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let layer = fmt::Layer::default()
        .with_writer(std::io::stderr)
        .with_level(true);

    match format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    layer
                        .with_target(false)
                        .with_span_events(FmtSpan::NONE)
                        .compact(),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    layer
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    layer
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Initialize logging from the environment alone
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_explicit_arguments_win() {
        assert_eq!(resolve_level(Some("trace")), "trace");
        assert_eq!(resolve_format(Some("pretty")).unwrap(), LogFormat::Pretty);
        assert!(resolve_format(Some("plain")).is_err());
    }

    #[test]
    fn test_log_format_variants() {
        let variants = LogFormat::variants();
        assert_eq!(variants.len(), 3);
        assert!(variants.contains(&"json"));
    }
}
