//! Transfer join definition
//!
//! The correlation of initiation and terminal events is described as data
//! ([`TransferQuery`]) and rendered to KQL only at the edge, so the rest of
//! the pipeline never depends on the query language.

use std::fmt::Write as _;

/// Event property extracted from `Properties` (string) or `Measurements` (numeric)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedField {
    /// Name of the column in the joined result
    pub column: &'static str,
    /// Key inside the event's property bag
    pub source_key: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `tostring(Properties.<key>)`
    Text,
    /// `todouble(Measurements.<key>)`
    Real,
    /// `tolong(Measurements.<key>)`
    Count,
}

impl ExtractedField {
    const fn text(column: &'static str, source_key: &'static str) -> Self {
        Self {
            column,
            source_key,
            kind: FieldKind::Text,
        }
    }

    const fn real(column: &'static str, source_key: &'static str) -> Self {
        Self {
            column,
            source_key,
            kind: FieldKind::Real,
        }
    }

    const fn count(column: &'static str, source_key: &'static str) -> Self {
        Self {
            column,
            source_key,
            kind: FieldKind::Count,
        }
    }

    fn expression(&self) -> String {
        match self.kind {
            FieldKind::Text => format!("tostring(Properties.{})", self.source_key),
            FieldKind::Real => format!("todouble(Measurements.{})", self.source_key),
            FieldKind::Count => format!("tolong(Measurements.{})", self.source_key),
        }
    }
}

/// Join of transfer-initiated events with their terminal events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferQuery {
    pub table: &'static str,
    pub event_name: &'static str,
    pub initiated_action: &'static str,
    pub terminal_actions: Vec<&'static str>,
    /// Property both sides are joined on
    pub join_key: &'static str,
    pub initiated_fields: Vec<ExtractedField>,
    pub terminal_fields: Vec<ExtractedField>,
    /// Terminal rows whose value for this column is not positive are dropped
    pub positive_filter: &'static str,
    pub initiated_time_column: &'static str,
    pub completed_time_column: &'static str,
}

/// Column carrying the join key in the result
pub const TRANSFER_ID_COLUMN: &str = "TransferId";

impl Default for TransferQuery {
    fn default() -> Self {
        Self {
            table: "AppEvents",
            event_name: "ActivityLogTelemetry",
            initiated_action: "TRANSFER_INITIATED",
            terminal_actions: vec!["TRANSFER_COMPLETED", "TRANSFER_FAILED"],
            join_key: "transferId",
            initiated_fields: vec![
                ExtractedField::text("CaseId", "caseId"),
                ExtractedField::text("Username", "userName"),
                ExtractedField::text("SourcePath", "sourcePath"),
                ExtractedField::text("DestinationPath", "destinationPath"),
                ExtractedField::text("TransferDirection", "transferDirection"),
            ],
            terminal_fields: vec![
                ExtractedField::text("ActionType", "actionType"),
                ExtractedField::real("TotalBytes", "totalBytes"),
                ExtractedField::count("TotalFiles", "totalFiles"),
                ExtractedField::count("TransferredFiles", "transferredFiles"),
                ExtractedField::count("ErrorFiles", "errorFiles"),
            ],
            positive_filter: "TotalBytes",
            initiated_time_column: "InitiatedTime",
            completed_time_column: "CompletedTime",
        }
    }
}

impl TransferQuery {
    /// Renders the definition as a Kusto query
    ///
    /// The result has one row per transfer with both events, newest initiation
    /// first.
    pub fn to_kql(&self) -> String {
        let mut kql = String::new();

        let _ = writeln!(kql, "let initiated = {}", self.table);
        self.write_event_filter(&mut kql, &format!("== '{}'", self.initiated_action));
        let _ = writeln!(kql, "    | project");
        let _ = writeln!(kql, "        {} = TimeGenerated,", self.initiated_time_column);
        let _ = write!(
            kql,
            "        {TRANSFER_ID_COLUMN} = tostring(Properties.{})",
            self.join_key
        );
        for field in &self.initiated_fields {
            let _ = write!(kql, ",\n        {} = {}", field.column, field.expression());
        }
        let _ = writeln!(kql, ";");

        let actions = self
            .terminal_actions
            .iter()
            .map(|a| format!("'{a}'"))
            .collect::<Vec<_>>()
            .join(", ");

        let _ = writeln!(kql, "let completed = {}", self.table);
        self.write_event_filter(&mut kql, &format!("in ({actions})"));
        let _ = writeln!(kql, "    | project");
        let _ = writeln!(kql, "        {} = TimeGenerated,", self.completed_time_column);
        let _ = write!(
            kql,
            "        {TRANSFER_ID_COLUMN} = tostring(Properties.{})",
            self.join_key
        );
        for field in &self.terminal_fields {
            let _ = write!(kql, ",\n        {} = {}", field.column, field.expression());
        }
        let _ = writeln!(kql);
        let _ = writeln!(kql, "    | where {} > 0;", self.positive_filter);

        let _ = writeln!(kql, "initiated");
        let _ = writeln!(kql, "| join kind=inner completed on {TRANSFER_ID_COLUMN}");
        let _ = writeln!(kql, "| project-away {TRANSFER_ID_COLUMN}1");
        let _ = write!(kql, "| order by {} desc", self.initiated_time_column);

        kql
    }

    fn write_event_filter(&self, kql: &mut String, action_predicate: &str) {
        let _ = writeln!(kql, "    | where Name == '{}'", self.event_name);
        let _ = writeln!(kql, "    | extend actionType = tostring(Properties.actionType)");
        let _ = writeln!(kql, "    | where actionType {action_predicate}");
    }
}
