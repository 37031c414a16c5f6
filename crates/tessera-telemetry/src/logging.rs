//! Structured logging for Tessera services.
//!
//! The binder emits `tracing` events under the `tessera_bind` target: `warn`
//! for ignored source tokens, `debug` for tolerated body failures and lenient
//! skips, `trace` for every bound field. This module installs a
//! `tracing-subscriber` pipeline for them.
//!
//! # Example
//!
//! ```rust,ignore
//! use tessera_telemetry::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::production().with_bind_level("debug");
//! init_logging(&config)?;
//!
//! tracing::info!(operation = "getUser", "Processing request");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log target of the binder crate.
pub const BIND_TARGET: &str = "tessera_bind";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Base filter directive (e.g., "info", "my_service=debug").
    pub level: String,

    /// Level override for binder events, if any.
    pub bind_level: Option<String>,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include span events (new, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Service name for log fields.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output and
    /// per-field binder tracing.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            bind_level: Some("trace".to_string()),
            json_format: false,
            span_events: true,
            file_line_info: true,
            thread_ids: false,
            include_target: true,
            service_name: "tessera".to_string(),
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            bind_level: None,
            json_format: true,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
            service_name: "tessera".to_string(),
        }
    }

    /// Sets the service name.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Sets the level used for binder events.
    #[must_use]
    pub fn with_bind_level(mut self, level: impl Into<String>) -> Self {
        self.bind_level = Some(level.into());
        self
    }

    /// Returns the full filter directive string.
    #[must_use]
    pub fn directives(&self) -> String {
        match &self.bind_level {
            Some(level) => format!("{},{BIND_TARGET}={level}", self.level),
            None => self.level.clone(),
        }
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::InvalidConfig` for an empty service name or an
    /// unparsable filter.
    pub fn validate(&self) -> TelemetryResult<()> {
        if self.service_name.trim().is_empty() {
            return Err(TelemetryError::InvalidConfig(
                "service name must not be empty".to_string(),
            ));
        }
        create_env_filter(&self.directives())
            .map(drop)
            .map_err(|e| TelemetryError::InvalidConfig(e.to_string()))
    }
}

/// Initializes the logging subsystem.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the filter is invalid or a global
/// subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.directives())?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::debug!(service.name = %config.service_name, "logging initialized");
    Ok(())
}

/// Installs a compact subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
/// The `RUST_LOG` environment variable overrides the default
/// `tessera_bind=trace` directive.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{BIND_TARGET}=trace")));

    let _ = tracing_subscriber::fmt()
        .compact()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
