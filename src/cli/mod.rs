//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the report generator using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Process exit code for a successful command
pub const EXIT_OK: i32 = 0;
/// Process exit code when a report run failed
pub const EXIT_RUN_FAILED: i32 = 1;
/// Process exit code for an invalid or missing configuration
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Process exit code for any other fatal error
pub const EXIT_FATAL: i32 = 5;

/// Transfer Report - file transfer telemetry to CSV reports in Blob Storage
#[derive(Parser, Debug)]
#[command(name = "transfer-report")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "transfer-report.toml",
        env = "TRANSFER_REPORT_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TRANSFER_REPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate and upload the report once
    Run(commands::run::RunArgs),

    /// Generate the report on the configured schedule until stopped
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["transfer-report", "run"]);
        assert_eq!(cli.config, "transfer-report.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::parse_from([
            "transfer-report",
            "run",
            "--dry-run",
            "--output",
            "report.csv",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.dry_run);
                assert_eq!(args.output.as_deref(), Some("report.csv"));
            }
            other => panic!("Expected run command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["transfer-report", "--config", "custom.toml", "serve"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Serve(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["transfer-report", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["transfer-report", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["transfer-report", "init", "--force"]);
        match cli.command {
            Commands::Init(args) => assert!(args.force),
            other => panic!("Expected init command, got {other:?}"),
        }
    }
}
