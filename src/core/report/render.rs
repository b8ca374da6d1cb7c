//! CSV rendering of transfer records

use crate::domain::TransferRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Display;

/// Report columns, in output order
pub const HEADER: [&str; 13] = [
    "TransferId",
    "CaseId",
    "Username",
    "TransferDirection",
    "StartedTime",
    "CompletedTime",
    "Duration",
    "TotalFiles",
    "TransferredFiles",
    "ErrorFiles",
    "TotalMegaBytesTransferred",
    "AverageTransferSpeedMbps",
    "TransferStatus",
];

const SEPARATOR: char = ',';
const LINE_END: &str = "\n";

/// Renders the header and one line per record, in input order
///
/// Output is byte-for-byte deterministic for the same input.
pub fn render_report(records: &[TransferRecord]) -> String {
    let mut out = String::new();
    write_line(&mut out, HEADER.iter().map(|h| h.to_string()));
    for record in records {
        write_line(&mut out, record_cells(record));
    }
    out
}

fn record_cells(record: &TransferRecord) -> [String; 13] {
    [
        record.transfer_id().as_str().to_string(),
        text(record.case_id()),
        text(record.username()),
        text(record.transfer_direction()),
        timestamp(record.initiated_time()),
        timestamp(record.completed_time()),
        text(record.duration_formatted()),
        number(record.total_files()),
        number(record.transferred_files()),
        number(record.error_files()),
        number(record.total_megabytes_transferred()),
        number(record.transfer_speed_mbps()),
        record.status().as_str().to_string(),
    ]
}

fn write_line(out: &mut String, cells: impl IntoIterator<Item = String>) {
    for (i, cell) in cells.into_iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(&escape_cell(&cell));
    }
    out.push_str(LINE_END);
}

/// Quotes a cell containing a separator, quote or line break (RFC 4180)
pub fn escape_cell(cell: &str) -> String {
    if cell.contains([SEPARATOR, '"', '\r', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn number<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransferId;
    use chrono::TimeZone;

    fn record(id: &str) -> TransferRecord {
        TransferRecord::builder(TransferId::new(id).unwrap())
            .case_id("case-1")
            .username("alice")
            .transfer_direction("EgressToNetApp")
            .initiated_time(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap())
            .completed_time(Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap())
            .duration_formatted("120m 0s")
            .total_files(10)
            .transferred_files(10)
            .error_files(0)
            .total_megabytes_transferred(175.095)
            .transfer_speed_mbps(0.024)
            .build()
    }

    #[test]
    fn test_header_only_for_no_records() {
        let csv = render_report(&[]);
        assert_eq!(csv, format!("{}\n", HEADER.join(",")));
    }

    #[test]
    fn test_three_records_four_lines() {
        let records = vec![record("t-1"), record("t-2"), record("t-3")];
        let csv = render_report(&records);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        for column in HEADER {
            assert!(lines[0].contains(column));
        }
        assert!(lines[1].starts_with("t-1,"));
        assert!(lines[2].starts_with("t-2,"));
        assert!(lines[3].starts_with("t-3,"));
    }

    #[test]
    fn test_row_formatting() {
        let csv = render_report(&[record("t-1")]);
        let row = csv.lines().nth(1).unwrap();

        assert_eq!(
            row,
            "t-1,case-1,alice,EgressToNetApp,2024-01-15T10:00:00Z,2024-01-15T12:00:00Z,\
             120m 0s,10,10,0,175.095,0.024,Success"
        );
    }

    #[test]
    fn test_absent_fields_render_empty() {
        let bare = TransferRecord::builder(TransferId::new("t-9").unwrap()).build();
        let csv = render_report(&[bare]);
        assert_eq!(csv.lines().nth(1).unwrap(), "t-9,,,,,,,,,,,,Success");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let records = vec![record("t-1"), record("t-2")];
        assert_eq!(render_report(&records), render_report(&records));
    }

    #[test]
    fn test_cells_with_separators_are_quoted() {
        let tricky = TransferRecord::builder(TransferId::new("t-1").unwrap())
            .case_id("a,b")
            .username("say \"hi\"")
            .transfer_direction("line\nbreak")
            .build();
        let csv = render_report(&[tricky]);

        assert!(csv.contains("t-1,\"a,b\",\"say \"\"hi\"\"\",\"line\nbreak\","));
    }

    #[test]
    fn test_subsecond_timestamps_keep_fraction() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(timestamp(Some(at)), "2024-01-15T10:00:00.250Z");
    }

    #[test]
    fn test_escape_plain_cell_unchanged() {
        assert_eq!(escape_cell("plain"), "plain");
    }
}
