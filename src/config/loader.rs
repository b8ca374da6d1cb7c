//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AuthType, ReporterConfig};
use super::secret::secret_string;
use crate::domain::errors::ReporterError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "TRANSFER_REPORT";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ReporterConfig
/// 4. Applies environment variable overrides (TRANSFER_REPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`ReporterError::Configuration`] if the file is missing or unreadable,
/// the TOML is malformed, a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use transfer_report::config::loader::load_config;
///
/// let config = load_config("transfer-report.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ReporterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ReporterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ReporterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Parses, overrides and validates configuration from TOML text
pub fn load_config_from_str(contents: &str) -> Result<ReporterConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ReporterConfig = toml::from_str(&contents)
        .map_err(|e| ReporterError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ReporterError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ReporterError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ReporterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

fn parse_override<T: std::str::FromStr>(section: &str, key: &str) -> Result<Option<T>> {
    match env_override(section, key) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ReporterError::Configuration(format!(
                "Invalid value '{raw}' for {ENV_PREFIX}_{section}_{key}"
            ))
        }),
        None => Ok(None),
    }
}

/// Applies environment variable overrides using the TRANSFER_REPORT_* prefix
///
/// Variables follow the pattern TRANSFER_REPORT_<SECTION>_<KEY>, for example
/// TRANSFER_REPORT_TELEMETRY_WORKSPACE_ID or TRANSFER_REPORT_STORAGE_CONTAINER_NAME.
/// Unparseable numeric or boolean overrides are configuration errors.
fn apply_env_overrides(config: &mut ReporterConfig) -> Result<()> {
    // Application
    if let Some(val) = env_override("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = parse_override("APPLICATION", "DRY_RUN")? {
        config.application.dry_run = val;
    }

    // Azure AD
    if let Some(val) = env_override("AZURE", "AUTH_TYPE") {
        config.azure.auth_type = match val.to_lowercase().as_str() {
            "client_secret" => AuthType::ClientSecret,
            "managed_identity" => AuthType::ManagedIdentity,
            other => {
                return Err(ReporterError::Configuration(format!(
                    "Invalid auth type '{other}'. Must be one of: client_secret, managed_identity"
                )))
            }
        };
    }
    if let Some(val) = env_override("AZURE", "TENANT_ID") {
        config.azure.tenant_id = Some(val);
    }
    if let Some(val) = env_override("AZURE", "CLIENT_ID") {
        config.azure.client_id = Some(val);
    }
    if let Some(val) = env_override("AZURE", "CLIENT_SECRET") {
        config.azure.client_secret = Some(secret_string(val));
    }

    // Telemetry
    if let Some(val) = env_override("TELEMETRY", "WORKSPACE_ID") {
        config.telemetry.workspace_id = val;
    }
    if let Some(val) = parse_override("TELEMETRY", "TIME_RANGE_DAYS")? {
        config.telemetry.time_range_days = val;
    }
    if let Some(val) = env_override("TELEMETRY", "ENDPOINT") {
        config.telemetry.endpoint = val;
    }

    // Storage
    if let Some(val) = env_override("STORAGE", "ACCOUNT_URL") {
        config.storage.account_url = val;
    }
    if let Some(val) = env_override("STORAGE", "CONTAINER_NAME") {
        config.storage.container_name = val;
    }

    // Schedule
    if let Some(val) = parse_override("SCHEDULE", "INTERVAL_SECONDS")? {
        config.schedule.interval_seconds = val;
    }
    if let Some(val) = parse_override("SCHEDULE", "RUN_ON_STARTUP")? {
        config.schedule.run_on_startup = val;
    }

    // Logging
    if let Some(val) = parse_override("LOGGING", "LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = parse_override("LOGGING", "AZURE_ENABLED")? {
        config.logging.azure_enabled = val;
    }

    Ok(())
}
