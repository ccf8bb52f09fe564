//! Logging setup for Veritas.
//!
//! The extraction crates only emit `tracing` events. Applications that want
//! to see them install a subscriber with [`init_logging`]:
//!
//! | Config | Output |
//! |--------|--------|
//! | [`LogConfig::production`] | JSON lines at `info` |
//! | [`LogConfig::development`] | Pretty, multi-line output at `debug` with file/line |
//!
//! Field names found in extraction log events are listed in [`logging::fields`].
//!
//! # Example
//!
//! ```rust,ignore
//! use veritas_telemetry::{init_logging, LogConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging(&LogConfig::development())?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
