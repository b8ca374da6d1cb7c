//! Telemetry querying
//!
//! - [`definition`] - the transfer join as a structured, KQL-renderable definition
//! - [`gateway`] - window validation and execution against a [`LogsQueryBackend`]
//!
//! [`LogsQueryBackend`]: crate::adapters::loganalytics::LogsQueryBackend

pub mod definition;
pub mod gateway;

pub use definition::{ExtractedField, FieldKind, TransferQuery, TRANSFER_ID_COLUMN};
pub use gateway::QueryGateway;
