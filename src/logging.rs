//! Logging setup for member-inject.
//!
//! Structured logging with JSON (production) and pretty (development)
//! output, controlled by the `logging-json` and `logging-pretty` features.
//!
//! # Example
//!
//! ```rust,ignore
//! use member_inject::logging;
//!
//! logging::init();          // format follows enabled features
//! logging::init_pretty();   // or force a format
//!
//! logging::builder()
//!     .with_level(tracing::Level::TRACE)
//!     .engine_only()
//!     .init();
//! ```

#[cfg(feature = "logging")]
use tracing::Level;

/// Logging output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON structured logging (production default)
    #[default]
    Json,
    /// Pretty colorful output (development)
    Pretty,
}

/// Builder for logging configuration.
#[cfg(feature = "logging")]
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    level: Level,
    format: LogFormat,
    target: Option<&'static str>,
}

#[cfg(feature = "logging")]
impl Default for LoggingBuilder {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Json,
            target: None,
        }
    }
}

#[cfg(feature = "logging")]
impl LoggingBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Filter to a specific target.
    pub fn with_target_filter(mut self, target: &'static str) -> Self {
        self.target = Some(target);
        self
    }

    /// Only show member-inject logs.
    pub fn engine_only(self) -> Self {
        self.with_target_filter("member_inject")
    }

    /// Use JSON output.
    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    /// Use pretty output.
    pub fn pretty(mut self) -> Self {
        self.format = LogFormat::Pretty;
        self
    }

    /// Initialize the subscriber with the configured settings.
    ///
    /// Requires the `logging-json` or `logging-pretty` feature.
    #[cfg(any(feature = "logging-json", feature = "logging-pretty"))]
    pub fn init(self) {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter = if let Some(target) = self.target {
            EnvFilter::new(format!("{}={}", target, self.level))
        } else {
            EnvFilter::new(self.level.to_string())
        };

        match self.format {
            LogFormat::Json => {
                #[cfg(feature = "logging-json")]
                {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json().with_target(true))
                        .init();
                }
                #[cfg(not(feature = "logging-json"))]
                {
                    // Fall back to the plain formatter when json is not enabled.
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().with_target(true))
                        .init();
                }
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty().with_target(true))
                    .init();
            }
        }
    }

    /// Initialize (no-op when subscriber features not available).
    #[cfg(not(any(feature = "logging-json", feature = "logging-pretty")))]
    pub fn init(self) {
        // No-op: requires logging-json or logging-pretty
    }
}

/// Create a new logging builder.
#[cfg(feature = "logging")]
pub fn builder() -> LoggingBuilder {
    LoggingBuilder::new()
}

/// Initialize logging with default settings.
#[cfg(feature = "logging")]
pub fn init() {
    builder().init();
}

/// Initialize JSON structured logging.
#[cfg(feature = "logging")]
pub fn init_json() {
    builder().json().init();
}

/// Initialize pretty colorful logging.
#[cfg(feature = "logging")]
pub fn init_pretty() {
    builder().pretty().init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let builder = LoggingBuilder::default();
        assert_eq!(builder.level, Level::DEBUG);
        assert_eq!(builder.format, LogFormat::Json);
        assert!(builder.target.is_none());
    }

    #[test]
    fn builder_chain() {
        let builder = LoggingBuilder::new()
            .with_level(Level::TRACE)
            .pretty()
            .engine_only();

        assert_eq!(builder.level, Level::TRACE);
        assert_eq!(builder.format, LogFormat::Pretty);
        assert_eq!(builder.target, Some("member_inject"));
    }
}
