//! Centralized logging initialization with environment variable support

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::invalid(format!(
                "Invalid log level '{}', must be one of: {}",
                self.level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }

    /// Format after applying the `LOG_FORMAT` override
    pub fn effective_format(&self) -> LogFormat {
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|f| match f.to_lowercase().as_str() {
                "json" => Some(LogFormat::Json),
                "pretty" | "human" => Some(LogFormat::Pretty),
                _ => None,
            })
            .unwrap_or(self.format)
    }
}

/// Initialize the tracing subscriber
///
/// Environment variables (in priority order):
/// - `RUST_LOG`: Standard Rust log filter (takes precedence over the configured level)
/// - `LOG_FORMAT`: Override format (json, pretty)
///
/// ```bash
/// RUST_LOG=restoremill_project=debug my-host
/// ```
///
/// Logs always go to stderr. Calling this twice is harmless; the second call
/// leaves the first subscriber in place.
pub fn initialize(config: &LoggingConfig) {
    let log_level = config.level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::from_default_env().add_directive(log_level.into());

    let result = match config.effective_format() {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already initialized");
    }
}

/// Span carrying the project being checked or restored
///
/// ```rust
/// use restoremill_config::logging::project_span;
///
/// let span = project_span("/repo/App/App.csproj", "needs_restore");
/// let _enter = span.enter();
/// tracing::info!("Checking restore outputs");
/// ```
pub fn project_span(project_path: &str, operation: &str) -> tracing::Span {
    tracing::info_span!(
        "restore_project",
        project = %project_path,
        operation = %operation
    )
}
