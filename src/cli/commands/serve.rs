//! Serve command implementation
//!
//! Runs the report on `schedule.interval_seconds` until SIGINT/SIGTERM.

use super::load_or_exit_code;
use crate::cli::{EXIT_CONFIG_ERROR, EXIT_OK};
use crate::core::report::ReportOrchestrator;
use crate::core::schedule::ReportScheduler;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the interval between runs, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Wait for the first interval instead of running immediately
    #[arg(long)]
    pub no_startup_run: bool,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_or_exit_code(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        if let Some(interval) = self.interval {
            tracing::info!(interval_seconds = interval, "Overriding schedule interval from CLI");
            config.schedule.interval_seconds = interval;
        }
        if self.no_startup_run {
            config.schedule.run_on_startup = false;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let orchestrator = match ReportOrchestrator::from_config(&config) {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize report pipeline");
                eprintln!("Failed to initialize report pipeline: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let scheduler = ReportScheduler::new(
            Arc::new(orchestrator),
            Duration::from_secs(config.schedule.interval_seconds),
            config.schedule.run_on_startup,
        );

        println!(
            "🚀 Generating transfer reports every {}s (Ctrl+C to stop)",
            config.schedule.interval_seconds
        );

        let summary = scheduler.run(shutdown_signal).await;

        println!();
        println!("📊 Scheduler Summary:");
        println!("  Runs: {}", summary.runs);
        println!("  Failed: {}", summary.failures);

        Ok(EXIT_OK)
    }
}
