//! Run command implementation
//!
//! Generates the report once and exits.

use super::load_or_exit_code;
use crate::cli::{EXIT_CONFIG_ERROR, EXIT_OK, EXIT_RUN_FAILED};
use crate::core::report::{ReportOrchestrator, RunOutcome};
use clap::Args;
use std::time::Instant;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Dry run mode - render the report without uploading it
    #[arg(long)]
    pub dry_run: bool,

    /// Also write the rendered CSV to this local file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match load_or_exit_code(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        let mut orchestrator = match ReportOrchestrator::from_config(&config) {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize report pipeline");
                eprintln!("Failed to initialize report pipeline: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if let Some(output) = &self.output {
            orchestrator = orchestrator.with_local_output(output);
        }

        if orchestrator.is_dry_run() {
            println!("🔍 DRY RUN MODE - the report will not be uploaded");
            println!();
        }

        let started = Instant::now();
        let outcome = match orchestrator.run_once().await {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("Report run failed: {e}");
                return Ok(EXIT_RUN_FAILED);
            }
        };

        println!("📊 Run Summary:");
        match &outcome {
            RunOutcome::NoData => {
                println!(
                    "  No transfers found in the last {} day(s)",
                    config.telemetry.time_range_days
                );
            }
            RunOutcome::Published {
                object_path,
                record_count,
                bytes,
            } => {
                println!("  Transfers: {record_count}");
                println!(
                    "  Uploaded: {}/{object_path} ({bytes} bytes)",
                    orchestrator.container()
                );
            }
            RunOutcome::DryRun {
                object_path,
                record_count,
                bytes,
            } => {
                println!("  Transfers: {record_count}");
                println!(
                    "  Would upload: {}/{object_path} ({bytes} bytes)",
                    orchestrator.container()
                );
            }
        }
        if let Some(output) = &self.output {
            if outcome != RunOutcome::NoData {
                println!("  Local copy: {output}");
            }
        }
        println!("  Duration: {:.2}s", started.elapsed().as_secs_f64());

        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let args = RunArgs {
            dry_run: true,
            output: None,
        };
        let code = args.execute(path.to_str().unwrap()).await.unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }
}
