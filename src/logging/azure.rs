//! Azure Monitor run logging
//!
//! Forwards one record per report run to a Log Analytics custom table through
//! the Logs Ingestion API, using a Data Collection Rule (DCR) and Data
//! Collection Endpoint (DCE). Enabled with `logging.azure_enabled`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use transfer_report::adapters::credential::AzureTokenSource;
//! use transfer_report::config::load_config;
//! use transfer_report::logging::azure::RunLogger;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("transfer-report.toml")?;
//! let tokens = Arc::new(AzureTokenSource::from_config(&config.azure)?);
//! let logger = RunLogger::new(&config.logging, tokens)?;
//! logger.log_run("published", Some("2024-01/LCC_Transfer_Report_2024-01-15.csv"), 12, None, 850).await?;
//! # Ok(())
//! # }
//! ```

use crate::adapters::credential::{AccessTokenSource, MONITOR_SCOPE};
use crate::adapters::http::build_http_client;
use crate::config::LoggingConfig;
use crate::domain::{ReporterError, Result};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Logs Ingestion API version
const INGESTION_API_VERSION: &str = "2023-01-01";

/// Row of the custom run table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunRecord {
    pub time_generated: String,
    pub status: String,
    pub object_path: String,
    pub record_count: i64,
    pub error_message: String,
    pub duration_ms: i64,
}

/// Sends run outcomes to Azure Monitor
pub struct RunLogger {
    tokens: Arc<dyn AccessTokenSource>,
    dcr_immutable_id: String,
    dce_endpoint: String,
    stream_name: String,
    http_client: reqwest::Client,
}

impl RunLogger {
    /// Create a run logger from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if Azure logging is not enabled or the DCR, DCE or
    /// stream settings are missing.
    pub fn new(config: &LoggingConfig, tokens: Arc<dyn AccessTokenSource>) -> Result<Self> {
        if !config.azure_enabled {
            return Err(ReporterError::Configuration(
                "Azure logging is not enabled".to_string(),
            ));
        }

        let dcr_immutable_id = required(&config.azure_dcr_immutable_id, "azure_dcr_immutable_id")?;
        let dce_endpoint = required(&config.azure_dce_endpoint, "azure_dce_endpoint")?;
        let stream_name = required(&config.azure_stream_name, "azure_stream_name")?;

        let http_client = build_http_client(30)?;

        debug!(
            dcr_id = %dcr_immutable_id,
            stream = %stream_name,
            "Azure run logger initialized"
        );

        Ok(Self {
            tokens,
            dcr_immutable_id,
            dce_endpoint,
            stream_name,
            http_client,
        })
    }

    fn ingestion_url(&self) -> String {
        format!(
            "{}/dataCollectionRules/{}/streams/{}?api-version={INGESTION_API_VERSION}",
            self.dce_endpoint.trim_end_matches('/'),
            self.dcr_immutable_id,
            self.stream_name
        )
    }

    async fn send(&self, records: &[RunRecord]) -> Result<()> {
        let token = self
            .tokens
            .bearer_token(MONITOR_SCOPE)
            .await
            .map_err(|e| ReporterError::AzureLogging(e.to_string()))?;

        let response = self
            .http_client
            .post(self.ingestion_url())
            .bearer_auth(token)
            .json(records)
            .send()
            .await
            .map_err(|e| {
                ReporterError::AzureLogging(format!("Failed to send logs to Azure: {e}"))
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = %status, records = records.len(), "Sent run log to Azure Monitor");
            Ok(())
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %body, "Failed to send run log to Azure Monitor");
            Err(ReporterError::AzureLogging(format!(
                "Logs Ingestion API returned status {status}: {body}"
            )))
        }
    }

    /// Records the outcome of one report run
    ///
    /// `status` is one of `published`, `no_data`, `dry_run` or `failed`.
    pub async fn log_run(
        &self,
        status: &str,
        object_path: Option<&str>,
        record_count: usize,
        error_message: Option<&str>,
        duration_ms: u128,
    ) -> Result<()> {
        let record = RunRecord {
            time_generated: Utc::now().to_rfc3339(),
            status: status.to_string(),
            object_path: object_path.unwrap_or_default().to_string(),
            record_count: i64::try_from(record_count).unwrap_or(i64::MAX),
            error_message: error_message.unwrap_or_default().to_string(),
            duration_ms: i64::try_from(duration_ms).unwrap_or(i64::MAX),
        };

        self.send(std::slice::from_ref(&record)).await
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    value
        .as_ref()
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .ok_or_else(|| {
            ReporterError::Configuration(format!(
                "{name} is required when Azure logging is enabled"
            ))
        })
}
