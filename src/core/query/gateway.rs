//! Time-windowed query execution against the telemetry backend

use crate::adapters::loganalytics::{LogsQueryBackend, QueryTimespan};
use crate::config::validate_window_days;
use crate::domain::{QueryError, ReporterError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Runs queries over the trailing `window_days` of one workspace
pub struct QueryGateway {
    backend: Arc<dyn LogsQueryBackend>,
    workspace_id: String,
    window_days: f64,
}

impl QueryGateway {
    /// Create a gateway for `workspace_id`
    ///
    /// # Errors
    ///
    /// Returns [`ReporterError::Configuration`] if the workspace id is blank,
    /// `window_days` is not a finite positive number, or the window reaches
    /// past the earliest representable date.
    pub fn new(
        backend: Arc<dyn LogsQueryBackend>,
        workspace_id: impl Into<String>,
        window_days: f64,
    ) -> Result<Self> {
        let workspace_id = workspace_id.into();
        if workspace_id.trim().is_empty() {
            return Err(ReporterError::Configuration(
                "telemetry.workspace_id is required".to_string(),
            ));
        }
        validate_window_days(window_days).map_err(ReporterError::Configuration)?;
        window_start(Utc::now(), window_days)?;

        Ok(Self {
            backend,
            workspace_id,
            window_days,
        })
    }

    /// Default window of this gateway, in days
    pub fn window_days(&self) -> f64 {
        self.window_days
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    /// Executes `query_text` over `[now - window_days, now]` and maps the rows to `T`
    ///
    /// # Errors
    ///
    /// - [`ReporterError::Configuration`] for an invalid window, before any request
    /// - [`ReporterError::InvalidArgument`] for an empty query
    /// - [`ReporterError::Query`] for every backend failure
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query_text: &str,
        window_days: f64,
    ) -> Result<Vec<T>> {
        validate_window_days(window_days).map_err(ReporterError::Configuration)?;
        if query_text.trim().is_empty() {
            return Err(ReporterError::InvalidArgument(
                "query text must not be empty".to_string(),
            ));
        }

        let end = Utc::now();
        let start = window_start(end, window_days)?;
        let timespan = QueryTimespan::new(start, end);

        tracing::debug!(
            workspace_id = %self.workspace_id,
            window_days,
            timespan = %timespan.to_iso8601(),
            "Executing telemetry query"
        );

        let result = self
            .backend
            .query_workspace(&self.workspace_id, query_text, &timespan)
            .await
            .and_then(|table| {
                table.deserialize_rows::<T>().map_err(|e| {
                    QueryError::Unknown(format!("Failed to map query rows: {e}")).into()
                })
            });

        match result {
            Ok(rows) => {
                tracing::debug!(rows = rows.len(), "Telemetry query succeeded");
                Ok(rows)
            }
            Err(ReporterError::Query(e)) => {
                tracing::error!(
                    status = ?e.status(),
                    window_days,
                    error = %e,
                    "Telemetry query failed"
                );
                Err(ReporterError::Query(e))
            }
            Err(other) => {
                tracing::error!(
                    window_days,
                    error = %other,
                    "Telemetry query failed"
                );
                Err(QueryError::Unknown(other.to_string()).into())
            }
        }
    }
}

/// Start of a window of `window_days` ending at `end`
fn window_start(end: DateTime<Utc>, window_days: f64) -> Result<DateTime<Utc>> {
    Duration::try_milliseconds((window_days * 86_400_000.0).round() as i64)
        .and_then(|span| end.checked_sub_signed(span))
        .ok_or_else(|| {
            ReporterError::Configuration(format!(
                "telemetry.time_range_days = {window_days} reaches past the earliest supported date"
            ))
        })
}
