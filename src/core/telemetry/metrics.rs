//! Derived transfer metrics

use chrono::{DateTime, Utc};

/// Bytes in one megabyte (binary)
pub const BYTES_PER_MEGABYTE: f64 = 1_048_576.0;

/// Rounds to three decimal places, half away from zero
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Number of whole-second boundaries crossed between two instants
///
/// Sub-second parts are dropped from both ends before subtracting, so
/// `10:00:00.900 -> 10:00:02.100` is 2 seconds, matching KQL
/// `datetime_diff('second', ...)`.
pub fn duration_seconds(initiated: DateTime<Utc>, completed: DateTime<Utc>) -> i64 {
    completed.timestamp() - initiated.timestamp()
}

/// `"{minutes}m {seconds}s"`, e.g. `125` -> `"2m 5s"`
pub fn format_duration(seconds: i64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// Average throughput in MB/s; `0.0` when the duration is not positive
pub fn transfer_speed_mbps(total_bytes: f64, seconds: i64) -> f64 {
    if seconds > 0 {
        round3(total_bytes / BYTES_PER_MEGABYTE / seconds as f64)
    } else {
        0.0
    }
}

pub fn megabytes(total_bytes: f64) -> f64 {
    round3(total_bytes / BYTES_PER_MEGABYTE)
}
