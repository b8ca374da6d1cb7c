//! Destination path of the dated report

use chrono::{DateTime, Utc};

/// File name prefix of every report
pub const REPORT_PREFIX: &str = "LCC_Transfer_Report_";

/// Blob path of the report for the UTC date of `as_of`
///
/// `{yyyy-MM}/LCC_Transfer_Report_{yyyy-MM-dd}.csv`, so reports are grouped
/// by month and a second run on the same day overwrites the first.
pub fn object_path(as_of: DateTime<Utc>) -> String {
    format!(
        "{}/{}{}.csv",
        as_of.format("%Y-%m"),
        REPORT_PREFIX,
        as_of.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_object_path() {
        let as_of = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(object_path(as_of), "2024-01/LCC_Transfer_Report_2024-01-15.csv");
    }

    #[test]
    fn test_object_path_end_of_day() {
        let as_of = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(object_path(as_of), "2023-12/LCC_Transfer_Report_2023-12-31.csv");
    }
}
