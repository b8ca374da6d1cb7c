//! Configuration management.
//!
//! The report generator reads a single TOML file, validated once at startup so
//! that an invalid workspace, window or container prevents any run from starting.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use transfer_report::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("transfer-report.toml")?;
//! println!("Workspace: {}", config.telemetry.workspace_id);
//! println!("Container: {}", config.storage.container_name);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [azure]
//! auth_type = "client_secret"
//! tenant_id = "00000000-0000-0000-0000-000000000000"
//! client_id = "11111111-1111-1111-1111-111111111111"
//! client_secret = "${TRANSFER_REPORT_CLIENT_SECRET}"
//!
//! [telemetry]
//! workspace_id = "22222222-2222-2222-2222-222222222222"
//! time_range_days = 1
//!
//! [storage]
//! account_url = "https://account.blob.core.windows.net"
//! container_name = "reports"
//!
//! [schedule]
//! interval_seconds = 86400
//! ```
//!
//! # Environment Variables
//!
//! `${VAR_NAME}` placeholders are substituted before parsing, and any setting
//! can be overridden with `TRANSFER_REPORT_<SECTION>_<KEY>`.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, AuthType, AzureConfig, LoggingConfig, ReporterConfig, ScheduleConfig,
    StorageConfig, TelemetryConfig, validate_window_days,
};
pub use secret::{secret_string, SecretString, SecretValue};
