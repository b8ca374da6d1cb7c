//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_OK};
use crate::config::{load_config, AuthType};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing and applying overrides
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!(
            "  Auth: {}",
            match config.azure.auth_type {
                AuthType::ClientSecret => "client_secret",
                AuthType::ManagedIdentity => "managed_identity",
            }
        );
        println!("  Workspace: {}", config.telemetry.workspace_id);
        println!("  Window: {} day(s)", config.telemetry.time_range_days);
        println!("  Query Endpoint: {}", config.telemetry.endpoint);
        println!("  Storage Account: {}", config.storage.account_url);
        println!("  Container: {}", config.storage.container_name);
        println!("  Interval: {}s", config.schedule.interval_seconds);
        println!("  Run On Startup: {}", config.schedule.run_on_startup);
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!("  Azure Monitor Logging: {}", config.logging.azure_enabled);
        println!();

        Ok(EXIT_OK)
    }
}
