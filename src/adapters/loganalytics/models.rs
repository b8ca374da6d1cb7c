//! Log Analytics query API wire types

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body of `POST /v1/workspaces/{id}/query`
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    pub timespan: String,
}

/// Closed time interval a query is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTimespan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryTimespan {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// ISO 8601 interval, e.g. `2024-01-14T00:00:00Z/2024-01-15T00:00:00Z`
    pub fn to_iso8601(&self) -> String {
        format!(
            "{}/{}",
            self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Successful query response
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub tables: Vec<QueryTable>,
}

/// Column descriptor of a result table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

/// One tabular result set; rows are positional and aligned with `columns`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryTable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub columns: Vec<QueryColumn>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl QueryTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Converts positional rows into typed rows keyed by column name
    ///
    /// # Errors
    ///
    /// Returns the first row that fails to deserialize into `T`.
    pub fn deserialize_rows<T: DeserializeOwned>(self) -> Result<Vec<T>, serde_json::Error> {
        let names: Vec<String> = self.columns.into_iter().map(|c| c.name).collect();

        self.rows
            .into_iter()
            .map(|row| {
                let object: Map<String, Value> = names.iter().cloned().zip(row).collect();
                serde_json::from_value(Value::Object(object))
            })
            .collect()
    }
}

/// Error payload returned on non-success responses
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
