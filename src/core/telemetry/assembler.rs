//! Transfer record assembly
//!
//! Runs the transfer join through the [`QueryGateway`] and turns each joined
//! row into an immutable [`TransferRecord`] with its derived metrics.

use super::metrics::{duration_seconds, format_duration, megabytes, transfer_speed_mbps};
use crate::core::query::{QueryGateway, TransferQuery};
use crate::domain::{Result, TransferId, TransferRecord};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One row of the joined result, as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JoinedTransferRow {
    #[serde(default)]
    pub transfer_id: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub transfer_direction: Option<String>,
    #[serde(default)]
    pub initiated_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_bytes: Option<f64>,
    #[serde(default)]
    pub total_files: Option<i64>,
    #[serde(default)]
    pub transferred_files: Option<i64>,
    #[serde(default)]
    pub error_files: Option<i64>,
}

impl JoinedTransferRow {
    /// Builds the record, or `None` when the row has no usable transfer id
    pub fn into_record(self) -> Option<TransferRecord> {
        let transfer_id = TransferId::new(self.transfer_id?).ok()?;

        let seconds = match (self.initiated_time, self.completed_time) {
            (Some(initiated), Some(completed)) => Some(duration_seconds(initiated, completed)),
            _ => None,
        };

        let record = TransferRecord::builder(transfer_id)
            .maybe(non_empty(self.case_id), |b, v| b.case_id(v))
            .maybe(non_empty(self.username), |b, v| b.username(v))
            .maybe(non_empty(self.transfer_direction), |b, v| {
                b.transfer_direction(v)
            })
            .maybe(self.initiated_time, |b, v| b.initiated_time(v))
            .maybe(self.completed_time, |b, v| b.completed_time(v))
            .maybe(seconds.map(format_duration), |b, v| b.duration_formatted(v))
            .maybe(self.total_files, |b, v| b.total_files(v))
            .maybe(self.transferred_files, |b, v| b.transferred_files(v))
            .maybe(self.error_files, |b, v| b.error_files(v))
            .maybe(self.total_bytes.map(megabytes), |b, v| {
                b.total_megabytes_transferred(v)
            })
            .maybe(
                self.total_bytes
                    .map(|bytes| transfer_speed_mbps(bytes, seconds.unwrap_or(0))),
                |b, v| b.transfer_speed_mbps(v),
            )
            .build();

        Some(record)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Collects the transfers completed or failed within the gateway's window
pub struct TransferAssembler {
    gateway: QueryGateway,
    query: TransferQuery,
}

impl TransferAssembler {
    pub fn new(gateway: QueryGateway) -> Self {
        Self::with_query(gateway, TransferQuery::default())
    }

    pub fn with_query(gateway: QueryGateway, query: TransferQuery) -> Self {
        Self { gateway, query }
    }

    pub fn window_days(&self) -> f64 {
        self.gateway.window_days()
    }

    /// Fetches and assembles transfer records, newest initiation first
    ///
    /// An access-denied response from the backend is propagated. Every other
    /// failure is logged and yields an empty list.
    pub async fn collect_transfers(&self) -> Result<Vec<TransferRecord>> {
        let kql = self.query.to_kql();
        let window_days = self.gateway.window_days();

        let rows = match self
            .gateway
            .execute::<JoinedTransferRow>(&kql, window_days)
            .await
        {
            Ok(rows) => rows,
            Err(e) if e.is_access_denied() => {
                tracing::error!(
                    workspace_id = %self.gateway.workspace_id(),
                    error = %e,
                    "Access denied (403) when querying transfers, check workspace permissions"
                );
                return Err(e);
            }
            Err(e) => {
                tracing::error!(
                    workspace_id = %self.gateway.workspace_id(),
                    error = %e,
                    "Unexpected error while querying transfers"
                );
                return Ok(Vec::new());
            }
        };

        let row_count = rows.len();
        let records: Vec<TransferRecord> = rows
            .into_iter()
            .filter_map(JoinedTransferRow::into_record)
            .collect();

        if records.len() < row_count {
            tracing::warn!(
                skipped = row_count - records.len(),
                "Skipped joined rows without a transfer id"
            );
        }

        tracing::info!(
            transfers = records.len(),
            window_days,
            "Collected transfer records"
        );

        Ok(records)
    }
}
