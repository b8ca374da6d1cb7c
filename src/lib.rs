// Transfer Report - file transfer telemetry to CSV reports in Azure Blob Storage
// Licensed under the MIT License

//! # Transfer Report
//!
//! Scheduled generator of file-transfer reports. Each run queries an Azure Log
//! Analytics (Application Insights) workspace for transfer events in a trailing
//! window, joins initiation and completion events per transfer, derives
//! duration, throughput and status, renders the result as CSV and uploads it
//! to Azure Blob Storage under `{yyyy-MM}/LCC_Transfer_Report_{yyyy-MM-dd}.csv`.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Query, assembly, rendering, publishing and scheduling
//! - [`adapters`] - External integrations (Log Analytics, Blob Storage, Azure AD)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use transfer_report::config::load_config;
//! use transfer_report::core::report::ReportOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("transfer-report.toml")?;
//!     let orchestrator = ReportOrchestrator::from_config(&config)?;
//!
//!     let outcome = orchestrator.run_once().await?;
//!     println!("Run finished: {outcome} ({} transfers)", outcome.record_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Status Classification
//!
//! ```rust
//! use transfer_report::domain::TransferStatus;
//!
//! assert_eq!(TransferStatus::classify(Some(0), Some(10)), TransferStatus::Success);
//! assert_eq!(TransferStatus::classify(Some(3), Some(0)), TransferStatus::Failed);
//! assert_eq!(TransferStatus::classify(Some(3), Some(7)), TransferStatus::Partial);
//! ```
//!
//! ## Error Handling
//!
//! All fallible library operations return [`domain::Result`], whose error type is
//! [`domain::ReporterError`]. Telemetry failures carry the backend status so an
//! access-denied response can be told apart from other failures:
//!
//! ```rust
//! use transfer_report::domain::{QueryError, ReporterError};
//!
//! let err: ReporterError = QueryError::Backend { status: 403, message: "Forbidden".into() }.into();
//! assert!(err.is_access_denied());
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
