//! Domain models and types for the transfer report generator.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TransferId`])
//! - **Domain models** ([`TransferRecord`], [`TransferStatus`])
//! - **Error types** ([`ReporterError`], [`QueryError`], [`PublishError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ReporterError>`]:
//!
//! ```rust
//! use transfer_report::domain::{ReporterError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = transfer_report::config::load_config("transfer-report.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod result;
pub mod transfer;

pub use errors::{PublishError, QueryError, ReporterError, ACCESS_DENIED_STATUS};
pub use ids::TransferId;
pub use result::Result;
pub use transfer::{TransferRecord, TransferRecordBuilder, TransferStatus};
