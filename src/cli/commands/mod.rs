//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod run;
pub mod serve;
pub mod validate;

use crate::cli::EXIT_CONFIG_ERROR;
use crate::config::{load_config, ReporterConfig};

/// Loads the configuration, printing the failure and mapping it to an exit code
pub(crate) fn load_or_exit_code(config_path: &str) -> Result<ReporterConfig, i32> {
    load_config(config_path).map_err(|e| {
        tracing::error!(config_path = %config_path, error = %e, "Failed to load configuration");
        eprintln!("Failed to load configuration from {config_path}: {e}");
        EXIT_CONFIG_ERROR
    })
}
