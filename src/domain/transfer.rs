//! Transfer record domain model
//!
//! A [`TransferRecord`] is one joined row of the transfer report: the
//! initiation of a file transfer correlated with its terminal event.

use super::ids::TransferId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Outcome classification of a transfer
///
/// Derived from the file counters of a record every time it is requested;
/// it is never stored alongside the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferStatus {
    /// No file errors were reported
    Success,
    /// Errors were reported and nothing was transferred
    Failed,
    /// Errors were reported but some files made it across
    Partial,
}

impl TransferStatus {
    /// Classify a transfer from its error and transferred file counts
    ///
    /// Absent counters are treated as zero.
    pub fn classify(error_files: Option<i64>, transferred_files: Option<i64>) -> Self {
        if error_files.unwrap_or(0) == 0 {
            TransferStatus::Success
        } else if transferred_files.unwrap_or(0) == 0 {
            TransferStatus::Failed
        } else {
            TransferStatus::Partial
        }
    }

    /// Returns the report label for the status
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Success => "Success",
            TransferStatus::Failed => "Failed",
            TransferStatus::Partial => "Partial",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file transfer, joined from its initiated and terminal telemetry events
///
/// Records are built once by the assembler and only read afterwards, so the
/// fields are private and exposed through accessors.
///
/// # Examples
///
/// ```
/// use transfer_report::domain::transfer::{TransferRecord, TransferStatus};
/// use transfer_report::domain::ids::TransferId;
///
/// let record = TransferRecord::builder(TransferId::new("t-1").unwrap())
///     .case_id("CASE-001")
///     .total_files(10)
///     .transferred_files(7)
///     .error_files(3)
///     .build();
///
/// assert_eq!(record.status(), TransferStatus::Partial);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRecord {
    transfer_id: TransferId,
    case_id: Option<String>,
    username: Option<String>,
    transfer_direction: Option<String>,
    initiated_time: Option<DateTime<Utc>>,
    completed_time: Option<DateTime<Utc>>,
    duration_formatted: Option<String>,
    total_files: Option<i64>,
    transferred_files: Option<i64>,
    error_files: Option<i64>,
    total_megabytes_transferred: Option<f64>,
    transfer_speed_mbps: Option<f64>,
}

impl TransferRecord {
    /// Creates a builder for a record with the given transfer ID
    pub fn builder(transfer_id: TransferId) -> TransferRecordBuilder {
        TransferRecordBuilder::new(transfer_id)
    }

    pub fn transfer_id(&self) -> &TransferId {
        &self.transfer_id
    }

    pub fn case_id(&self) -> Option<&str> {
        self.case_id.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Direction of the transfer (upload or download)
    pub fn transfer_direction(&self) -> Option<&str> {
        self.transfer_direction.as_deref()
    }

    pub fn initiated_time(&self) -> Option<DateTime<Utc>> {
        self.initiated_time
    }

    pub fn completed_time(&self) -> Option<DateTime<Utc>> {
        self.completed_time
    }

    /// Duration in "Xm Ys" form
    pub fn duration_formatted(&self) -> Option<&str> {
        self.duration_formatted.as_deref()
    }

    pub fn total_files(&self) -> Option<i64> {
        self.total_files
    }

    pub fn transferred_files(&self) -> Option<i64> {
        self.transferred_files
    }

    pub fn error_files(&self) -> Option<i64> {
        self.error_files
    }

    pub fn total_megabytes_transferred(&self) -> Option<f64> {
        self.total_megabytes_transferred
    }

    /// Average throughput in megabytes per second
    pub fn transfer_speed_mbps(&self) -> Option<f64> {
        self.transfer_speed_mbps
    }

    /// Classifies the transfer from the current counters
    pub fn status(&self) -> TransferStatus {
        TransferStatus::classify(self.error_files, self.transferred_files)
    }
}

/// Builder for [`TransferRecord`]
#[derive(Debug)]
pub struct TransferRecordBuilder {
    record: TransferRecord,
}

impl TransferRecordBuilder {
    /// Creates a builder with every optional field absent
    pub fn new(transfer_id: TransferId) -> Self {
        Self {
            record: TransferRecord {
                transfer_id,
                case_id: None,
                username: None,
                transfer_direction: None,
                initiated_time: None,
                completed_time: None,
                duration_formatted: None,
                total_files: None,
                transferred_files: None,
                error_files: None,
                total_megabytes_transferred: None,
                transfer_speed_mbps: None,
            },
        }
    }

    pub fn case_id(mut self, case_id: impl Into<String>) -> Self {
        self.record.case_id = Some(case_id.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.record.username = Some(username.into());
        self
    }

    pub fn transfer_direction(mut self, direction: impl Into<String>) -> Self {
        self.record.transfer_direction = Some(direction.into());
        self
    }

    pub fn initiated_time(mut self, time: DateTime<Utc>) -> Self {
        self.record.initiated_time = Some(time);
        self
    }

    pub fn completed_time(mut self, time: DateTime<Utc>) -> Self {
        self.record.completed_time = Some(time);
        self
    }

    pub fn duration_formatted(mut self, duration: impl Into<String>) -> Self {
        self.record.duration_formatted = Some(duration.into());
        self
    }

    pub fn total_files(mut self, count: i64) -> Self {
        self.record.total_files = Some(count);
        self
    }

    pub fn transferred_files(mut self, count: i64) -> Self {
        self.record.transferred_files = Some(count);
        self
    }

    pub fn error_files(mut self, count: i64) -> Self {
        self.record.error_files = Some(count);
        self
    }

    pub fn total_megabytes_transferred(mut self, megabytes: f64) -> Self {
        self.record.total_megabytes_transferred = Some(megabytes);
        self
    }

    pub fn transfer_speed_mbps(mut self, speed: f64) -> Self {
        self.record.transfer_speed_mbps = Some(speed);
        self
    }

    /// Applies an optional value through one of the setters above
    pub fn maybe<T>(self, value: Option<T>, set: impl FnOnce(Self, T) -> Self) -> Self {
        match value {
            Some(v) => set(self, v),
            None => self,
        }
    }

    pub fn build(self) -> TransferRecord {
        self.record
    }
}
