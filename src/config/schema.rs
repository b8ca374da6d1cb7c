//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Azure AD credential flavour used for both the query and storage APIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// App registration with a client secret
    ClientSecret,
    /// Managed identity of the hosting compute
    #[default]
    ManagedIdentity,
}

/// Main report generator configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Azure AD authentication settings
    #[serde(default)]
    pub azure: AzureConfig,

    /// Telemetry workspace query settings
    pub telemetry: TelemetryConfig,

    /// Blob storage destination
    pub storage: StorageConfig,

    /// Report schedule
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ReporterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.azure.validate()?;
        self.telemetry.validate()?;
        self.storage.validate()?;
        self.schedule.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (render the report but don't upload it)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Azure AD authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AzureConfig {
    /// Credential type
    #[serde(default)]
    pub auth_type: AuthType,

    /// Azure AD tenant ID (client_secret only)
    #[serde(default)]
    pub tenant_id: Option<String>,

    /// Application (client) ID (client_secret only)
    #[serde(default)]
    pub client_id: Option<String>,

    /// Client secret (client_secret only)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub client_secret: Option<SecretString>,
}

impl AzureConfig {
    fn validate(&self) -> Result<(), String> {
        if self.auth_type == AuthType::ClientSecret {
            if is_blank(self.tenant_id.as_deref()) {
                return Err("azure.tenant_id is required when auth_type = 'client_secret'".to_string());
            }
            if is_blank(self.client_id.as_deref()) {
                return Err("azure.client_id is required when auth_type = 'client_secret'".to_string());
            }
            match &self.client_secret {
                Some(secret) if !secret.expose_secret().is_empty() => {}
                _ => {
                    return Err(
                        "azure.client_secret is required when auth_type = 'client_secret'"
                            .to_string(),
                    )
                }
            }
        }
        Ok(())
    }
}

/// Telemetry (Log Analytics workspace) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log Analytics workspace ID backing Application Insights
    #[serde(default)]
    pub workspace_id: String,

    /// Trailing query window in days (fractional values allowed)
    pub time_range_days: f64,

    /// Log Analytics query API endpoint
    #[serde(default = "default_telemetry_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl TelemetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.workspace_id.trim().is_empty() {
            return Err("telemetry.workspace_id cannot be empty".to_string());
        }
        validate_window_days(self.time_range_days)?;
        validate_url("telemetry.endpoint", &self.endpoint)?;
        if self.request_timeout_seconds == 0 {
            return Err("telemetry.request_timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

/// Blob storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage account blob endpoint, e.g. `https://account.blob.core.windows.net`
    #[serde(default)]
    pub account_url: String,

    /// Destination container for the reports
    #[serde(default)]
    pub container_name: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.account_url.trim().is_empty() {
            return Err("storage.account_url cannot be empty".to_string());
        }
        validate_url("storage.account_url", &self.account_url)?;
        if self.container_name.trim().is_empty() {
            return Err("storage.container_name cannot be empty".to_string());
        }
        if self.request_timeout_seconds == 0 {
            return Err("storage.request_timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

/// Report schedule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between report runs
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    /// Run immediately when the scheduler starts instead of waiting one interval
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            run_on_startup: true,
        }
    }
}

impl ScheduleConfig {
    fn validate(&self) -> Result<(), String> {
        if self.interval_seconds == 0 {
            return Err("schedule.interval_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log file directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Forward run outcomes to Azure Log Analytics
    #[serde(default)]
    pub azure_enabled: bool,

    /// Data Collection Rule (DCR) immutable ID
    #[serde(default)]
    pub azure_dcr_immutable_id: Option<String>,

    /// Data Collection Endpoint (DCE) URL
    #[serde(default)]
    pub azure_dce_endpoint: Option<String>,

    /// Stream name for custom logs (e.g., "Custom-TransferReportRuns_CL")
    #[serde(default)]
    pub azure_stream_name: Option<String>,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.azure_enabled {
            if is_blank(self.azure_dcr_immutable_id.as_deref()) {
                return Err("Azure logging enabled but azure_dcr_immutable_id not provided".to_string());
            }
            if is_blank(self.azure_dce_endpoint.as_deref()) {
                return Err("Azure logging enabled but azure_dce_endpoint not provided".to_string());
            }
            if is_blank(self.azure_stream_name.as_deref()) {
                return Err("Azure logging enabled but azure_stream_name not provided".to_string());
            }
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            azure_enabled: false,
            azure_dcr_immutable_id: None,
            azure_dce_endpoint: None,
            azure_stream_name: None,
        }
    }
}

/// Checks that a query window is a finite, strictly positive number of days
pub fn validate_window_days(days: f64) -> Result<(), String> {
    if !days.is_finite() || days <= 0.0 {
        return Err(format!(
            "telemetry.time_range_days must be a finite number > 0 (got {days})"
        ));
    }
    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<(), String> {
    let parsed = url::Url::parse(value).map_err(|e| format!("{field} is not a valid URL: {e}"))?;
    if parsed.scheme() != "https" && parsed.scheme() != "http" {
        return Err(format!("{field} must use http or https"));
    }
    Ok(())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_telemetry_endpoint() -> String {
    "https://api.loganalytics.io".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    60
}

fn default_interval_seconds() -> u64 {
    24 * 60 * 60
}

fn default_local_path() -> String {
    "/var/log/transfer-report".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
