//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted log files
//! - Configurable log levels
//! - Local file logging with rotation
//! - Run outcomes forwarded to Azure Monitor
//!
//! # Example
//!
//! ```no_run
//! use transfer_report::logging::init_logging;
//! use transfer_report::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod azure;
pub mod structured;

pub use azure::RunLogger;
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a report run
///
/// # Example
///
/// ```no_run
/// use transfer_report::log_run_start;
///
/// log_run_start!("reports", 1.0);
/// ```
#[macro_export]
macro_rules! log_run_start {
    ($container:expr, $window_days:expr) => {
        tracing::info!(
            container = %$container,
            window_days = $window_days,
            "Starting transfer report run"
        );
    };
}

/// Log the completion of a report run
///
/// # Example
///
/// ```no_run
/// use transfer_report::log_run_complete;
/// use std::time::Duration;
///
/// log_run_complete!("published", 42, Duration::from_millis(850));
/// ```
#[macro_export]
macro_rules! log_run_complete {
    ($outcome:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            outcome = %$outcome,
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Transfer report run completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use transfer_report::log_error_with_context;
/// use transfer_report::domain::ReporterError;
///
/// let error = ReporterError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
