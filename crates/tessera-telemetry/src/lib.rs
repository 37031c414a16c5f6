//! Logging setup for Tessera services.
//!
//! Binding is synchronous and leaves no state behind, so the only telemetry
//! it needs is structured logs. This crate wires `tracing-subscriber` for
//! them:
//!
//! - **Production**: JSON lines at `info`
//! - **Development**: pretty output at `debug`, binder events at `trace`
//! - **Tests**: a compact subscriber routed through the test harness
//!
//! # Example
//!
//! ```rust,ignore
//! use tessera_telemetry::{init_logging, LogConfig};
//!
//! fn main() -> Result<(), tessera_telemetry::TelemetryError> {
//!     init_logging(&LogConfig::production().with_service_name("users-service"))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, init_test_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
