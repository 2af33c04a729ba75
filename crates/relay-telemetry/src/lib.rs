//! # Relay Telemetry
//!
//! Logging setup shared by Relay binaries and tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relay_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_logging(&config).expect("Failed to init logging");
//!
//!     // Bus handler failures now show up as error-level log lines
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RELAY_SERVICE_NAME` | `relay` | Service name on log lines |
//! | `RELAY_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `RELAY_CONSOLE_OUTPUT` | `true` | Write logs to the console |
//! | `RELAY_JSON_LOGS` | `false` | JSON output (defaults to true in containers) |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}
