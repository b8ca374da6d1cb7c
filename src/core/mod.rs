//! Core report pipeline.
//!
//! # Modules
//!
//! - [`query`] - Transfer join definition and time-windowed query execution
//! - [`telemetry`] - Assembly of transfer records and derived metrics
//! - [`report`] - CSV rendering, blob naming, publishing and run orchestration
//! - [`schedule`] - Interval scheduling with graceful shutdown
//!
//! # Run Workflow
//!
//! 1. **Query**: Join initiated and terminal transfer events over the window
//! 2. **Assemble**: Derive duration, throughput and megabytes per transfer
//! 3. **Render**: Serialize the records as CSV
//! 4. **Name**: Compute the `{yyyy-MM}/LCC_Transfer_Report_{yyyy-MM-dd}.csv` path
//! 5. **Publish**: Upload to the configured container, overwriting
//!
//! # Example
//!
//! ```rust,no_run
//! use transfer_report::config::load_config;
//! use transfer_report::core::report::{ReportOrchestrator, RunOutcome};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("transfer-report.toml")?;
//! let orchestrator = ReportOrchestrator::from_config(&config)?;
//!
//! match orchestrator.run_once().await? {
//!     RunOutcome::Published { object_path, record_count, .. } => {
//!         println!("Uploaded {record_count} transfers to {object_path}");
//!     }
//!     other => println!("Run finished: {other}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod query;
pub mod report;
pub mod schedule;
pub mod telemetry;
