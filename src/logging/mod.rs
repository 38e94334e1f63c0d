//! Logging configuration for embedding tools.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! the embedder's choice. These helpers set one up when the embedding tool
//! has no subscriber of its own.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// One-time initialization flag for logging
static INIT: Once = Once::new();

/// Log levels supported by the logging helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_tracing(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Output format for the logging helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Full,
}

/// Logging configuration structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
        }
    }
}

/// Install a global subscriber with the given configuration
///
/// Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let builder = tracing_subscriber::fmt()
            .with_max_level(config.level.as_tracing())
            .with_writer(std::io::stderr);
        match config.format {
            LogFormat::Compact => builder.compact().init(),
            LogFormat::Full => builder.init(),
        }
    });
}

/// Install a global subscriber with default configuration
pub fn init_default_logging() {
    init_logging(LoggingConfig::default());
}

/// Install a global subscriber filtered through `RUST_LOG`
pub fn init_env_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .compact()
            .init();
    });
}

/// Check if logging has been initialized
pub fn is_logging_initialized() -> bool {
    INIT.is_completed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Trace);
        assert!(LogLevel::Info < LogLevel::Debug);
    }
}
