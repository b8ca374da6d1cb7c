//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "transfer-report.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing transfer report configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set telemetry.workspace_id and storage.account_url");
                println!("  2. Choose azure.auth_type (managed_identity or client_secret)");
                println!("  3. For client_secret, set AZURE_TENANT_ID, AZURE_CLIENT_ID and");
                println!("     AZURE_CLIENT_SECRET in the environment or a .env file");
                println!("  4. Validate configuration: transfer-report validate-config");
                println!("  5. Try a dry run: transfer-report run --dry-run --output report.csv");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Sample configuration with comments
    pub fn sample_config() -> &'static str {
        r#"# Transfer Report Configuration
#
# Queries file-transfer telemetry from a Log Analytics workspace and uploads a
# daily CSV report to Azure Blob Storage.

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Render the report without uploading it
dry_run = false

[azure]
# managed_identity | client_secret
auth_type = "managed_identity"
# tenant_id = "${AZURE_TENANT_ID}"
# client_id = "${AZURE_CLIENT_ID}"
# client_secret = "${AZURE_CLIENT_SECRET}"

[telemetry]
# Log Analytics workspace that receives the Application Insights events
workspace_id = "00000000-0000-0000-0000-000000000000"

# Trailing query window in days (fractions allowed, must be > 0)
time_range_days = 1.0

endpoint = "https://api.loganalytics.io"
request_timeout_seconds = 60

[storage]
account_url = "https://youraccount.blob.core.windows.net"
container_name = "transfer-reports"
request_timeout_seconds = 60

[schedule]
# Seconds between runs for `transfer-report serve`
interval_seconds = 86400
run_on_startup = true

[logging]
local_enabled = true
local_path = "/var/log/transfer-report"
# daily | hourly
local_rotation = "daily"

# Forward run outcomes to Azure Monitor (Logs Ingestion API)
azure_enabled = false
# azure_dcr_immutable_id = "${AZURE_DCR_IMMUTABLE_ID}"
# azure_dce_endpoint = "${AZURE_DCE_ENDPOINT}"
# azure_stream_name = "Custom-TransferReportRuns_CL"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;
    use tempfile::TempDir;

    #[test]
    fn test_sample_config_is_valid() {
        let config = load_config_from_str(InitArgs::sample_config()).unwrap();
        assert_eq!(config.storage.container_name, "transfer-reports");
        assert_eq!(config.telemetry.time_range_days, 1.0);
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transfer-report.toml");
        fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG_ERROR);
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_init_force_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transfer-report.toml");
        fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: true,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_OK);
        assert!(fs::read_to_string(&path).unwrap().contains("[telemetry]"));
    }
}
