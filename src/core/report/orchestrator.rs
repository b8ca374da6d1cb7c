//! Report run orchestration
//!
//! One run: collect transfers, render the CSV, compute the dated path and
//! publish. A run that finds no transfers ends early without touching storage.

use super::naming::object_path;
use super::publisher::ArtifactPublisher;
use super::render::render_report;
use crate::adapters::blob::BlobStorageClient;
use crate::adapters::credential::{AccessTokenSource, AzureTokenSource};
use crate::adapters::loganalytics::LogAnalyticsClient;
use crate::config::ReporterConfig;
use crate::core::query::QueryGateway;
use crate::core::telemetry::TransferAssembler;
use crate::domain::{ReporterError, Result};
use crate::logging::RunLogger;
use crate::{log_error_with_context, log_run_complete, log_run_start};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Source of the current time
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No transfers in the window; nothing was written
    NoData,
    /// Report rendered and uploaded
    Published {
        object_path: String,
        record_count: usize,
        bytes: usize,
    },
    /// Report rendered but not uploaded (dry run)
    DryRun {
        object_path: String,
        record_count: usize,
        bytes: usize,
    },
}

impl RunOutcome {
    pub fn record_count(&self) -> usize {
        match self {
            RunOutcome::NoData => 0,
            RunOutcome::Published { record_count, .. } | RunOutcome::DryRun { record_count, .. } => {
                *record_count
            }
        }
    }

    pub fn object_path(&self) -> Option<&str> {
        match self {
            RunOutcome::NoData => None,
            RunOutcome::Published { object_path, .. } | RunOutcome::DryRun { object_path, .. } => {
                Some(object_path)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::NoData => "no_data",
            RunOutcome::Published { .. } => "published",
            RunOutcome::DryRun { .. } => "dry_run",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sequences one report run
pub struct ReportOrchestrator {
    assembler: TransferAssembler,
    publisher: ArtifactPublisher,
    container: String,
    dry_run: bool,
    local_output: Option<PathBuf>,
    run_logger: Option<Arc<RunLogger>>,
    clock: Clock,
}

impl ReportOrchestrator {
    /// Create an orchestrator
    ///
    /// # Errors
    ///
    /// Returns [`ReporterError::Configuration`] if `container` is blank.
    pub fn new(
        assembler: TransferAssembler,
        publisher: ArtifactPublisher,
        container: impl Into<String>,
    ) -> Result<Self> {
        let container = container.into();
        if container.trim().is_empty() {
            return Err(ReporterError::Configuration(
                "storage.container_name is required".to_string(),
            ));
        }

        Ok(Self {
            assembler,
            publisher,
            container,
            dry_run: false,
            local_output: None,
            run_logger: None,
            clock: Arc::new(Utc::now),
        })
    }

    /// Wires the Azure clients described by `config`
    ///
    /// # Errors
    ///
    /// Fails fast on any invalid setting or credential.
    pub fn from_config(config: &ReporterConfig) -> Result<Self> {
        config.validate().map_err(ReporterError::Configuration)?;

        let tokens: Arc<dyn AccessTokenSource> =
            Arc::new(AzureTokenSource::from_config(&config.azure)?);
        Self::from_config_with_tokens(config, tokens)
    }

    /// Like [`from_config`](Self::from_config) with an explicit token source
    pub fn from_config_with_tokens(
        config: &ReporterConfig,
        tokens: Arc<dyn AccessTokenSource>,
    ) -> Result<Self> {
        let backend = Arc::new(LogAnalyticsClient::new(&config.telemetry, tokens.clone())?);
        let store = Arc::new(BlobStorageClient::new(&config.storage, tokens.clone())?);

        let gateway = QueryGateway::new(
            backend,
            config.telemetry.workspace_id.clone(),
            config.telemetry.time_range_days,
        )?;

        let mut orchestrator = Self::new(
            TransferAssembler::new(gateway),
            ArtifactPublisher::new(store),
            config.storage.container_name.clone(),
        )?
        .with_dry_run(config.application.dry_run);

        if config.logging.azure_enabled {
            let run_logger = RunLogger::new(&config.logging, tokens)?;
            orchestrator = orchestrator.with_run_logger(Arc::new(run_logger));
        }

        Ok(orchestrator)
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Also write each rendered report to a local file
    pub fn with_local_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_output = Some(path.into());
        self
    }

    /// Forward each run's outcome to Azure Monitor
    pub fn with_run_logger(mut self, run_logger: Arc<RunLogger>) -> Self {
        self.run_logger = Some(run_logger);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Runs the pipeline once
    ///
    /// # Errors
    ///
    /// Every failure is logged and returned unchanged. Nothing is retried.
    pub async fn run_once(&self) -> Result<RunOutcome> {
        let started = Instant::now();
        log_run_start!(self.container, self.assembler.window_days());

        let result = self.execute().await;

        match &result {
            Ok(outcome) => {
                log_run_complete!(outcome, outcome.record_count(), started.elapsed());
            }
            Err(e) => {
                log_error_with_context!(e, "Transfer report run failed");
            }
        }

        if let Some(run_logger) = &self.run_logger {
            let elapsed_ms = started.elapsed().as_millis();
            let sent = match &result {
                Ok(outcome) => {
                    run_logger
                        .log_run(
                            outcome.as_str(),
                            outcome.object_path(),
                            outcome.record_count(),
                            None,
                            elapsed_ms,
                        )
                        .await
                }
                Err(e) => {
                    run_logger
                        .log_run("failed", None, 0, Some(&e.to_string()), elapsed_ms)
                        .await
                }
            };
            if let Err(e) = sent {
                tracing::warn!(error = %e, "Failed to forward run outcome to Azure Monitor");
            }
        }

        result
    }

    async fn execute(&self) -> Result<RunOutcome> {
        let records = self.assembler.collect_transfers().await?;
        if records.is_empty() {
            tracing::info!("No transfer records found, skipping report");
            return Ok(RunOutcome::NoData);
        }

        let content = render_report(&records);
        let path = object_path((self.clock)());
        let record_count = records.len();
        let bytes = content.len();

        if let Some(local) = &self.local_output {
            tokio::fs::write(local, &content).await.map_err(|e| {
                ReporterError::Io(format!(
                    "Failed to write report to {}: {e}",
                    local.display()
                ))
            })?;
            tracing::info!(path = %local.display(), bytes, "Wrote local report copy");
        }

        if self.dry_run {
            tracing::info!(
                container = %self.container,
                path = %path,
                record_count,
                bytes,
                "Dry run: report not uploaded"
            );
            return Ok(RunOutcome::DryRun {
                object_path: path,
                record_count,
                bytes,
            });
        }

        self.publisher
            .publish(&self.container, &path, &content)
            .await?;

        Ok(RunOutcome::Published {
            object_path: path,
            record_count,
            bytes,
        })
    }
}
