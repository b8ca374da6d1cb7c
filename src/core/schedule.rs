//! Interval scheduling of report runs
//!
//! Runs are awaited one at a time, so a slow run delays the next tick instead
//! of overlapping it. Missed ticks are skipped. A shutdown signal is observed
//! between runs; a run already in flight completes.

use crate::core::report::{ReportOrchestrator, RunOutcome};
use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// A unit of work the scheduler triggers on every tick
#[async_trait]
pub trait ReportRun: Send + Sync {
    async fn run_once(&self) -> Result<RunOutcome>;
}

#[async_trait]
impl ReportRun for ReportOrchestrator {
    async fn run_once(&self) -> Result<RunOutcome> {
        ReportOrchestrator::run_once(self).await
    }
}

/// Counters reported when the scheduler stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerSummary {
    pub runs: u64,
    pub failures: u64,
}

pub struct ReportScheduler {
    runner: Arc<dyn ReportRun>,
    interval: Duration,
    run_on_startup: bool,
}

impl ReportScheduler {
    pub fn new(runner: Arc<dyn ReportRun>, interval: Duration, run_on_startup: bool) -> Self {
        Self {
            runner,
            interval,
            run_on_startup,
        }
    }

    /// Triggers runs every interval until `shutdown` becomes `true`
    ///
    /// A failed run is logged and the loop continues with the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> SchedulerSummary {
        let mut summary = SchedulerSummary::default();
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        if !self.run_on_startup {
            // first tick completes immediately
            interval.tick().await;
        }

        tracing::info!(
            interval_seconds = self.interval.as_secs(),
            run_on_startup = self.run_on_startup,
            "Report scheduler started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = interval.tick() => {
                    self.run_tick(&mut summary).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!(
            runs = summary.runs,
            failures = summary.failures,
            "Report scheduler stopped"
        );

        summary
    }

    async fn run_tick(&self, summary: &mut SchedulerSummary) {
        let started = Instant::now();
        summary.runs += 1;

        match self.runner.run_once().await {
            Ok(outcome) => {
                tracing::info!(
                    outcome = %outcome,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Scheduled report run finished"
                );
            }
            Err(e) => {
                summary.failures += 1;
                tracing::error!(
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Scheduled report run failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReporterError;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingRun {
        calls: AtomicU64,
        fail: bool,
    }

    impl CountingRun {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU64::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl ReportRun for CountingRun {
        async fn run_once(&self) -> Result<RunOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ReporterError::Io("disk full".to_string()))
            } else {
                Ok(RunOutcome::NoData)
            }
        }
    }

    #[tokio::test]
    async fn test_runs_on_startup_and_stops_on_shutdown() {
        let runner = CountingRun::new(false);
        let scheduler = ReportScheduler::new(runner.clone(), Duration::from_millis(20), true);
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { scheduler.run(rx).await });
        tokio::time::sleep(Duration::from_millis(70)).await;
        tx.send(true).unwrap();

        let summary = handle.await.unwrap();
        assert!(summary.runs >= 2);
        assert_eq!(summary.failures, 0);
        assert_eq!(runner.calls.load(Ordering::SeqCst), summary.runs);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_loop() {
        let runner = CountingRun::new(true);
        let scheduler = ReportScheduler::new(runner.clone(), Duration::from_millis(10), true);
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { scheduler.run(rx).await });
        tokio::time::sleep(Duration::from_millis(60)).await;
        tx.send(true).unwrap();

        let summary = handle.await.unwrap();
        assert!(summary.runs >= 2);
        assert_eq!(summary.failures, summary.runs);
    }

    #[tokio::test]
    async fn test_without_startup_run_waits_for_interval() {
        let runner = CountingRun::new(false);
        let scheduler = ReportScheduler::new(runner.clone(), Duration::from_secs(3600), false);
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move { scheduler.run(rx).await });
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).unwrap();

        let summary = handle.await.unwrap();
        assert_eq!(summary.runs, 0);
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shutdown_already_requested() {
        let runner = CountingRun::new(false);
        let scheduler = ReportScheduler::new(runner, Duration::from_millis(10), true);
        let (_tx, rx) = watch::channel(true);

        assert_eq!(scheduler.run(rx).await, SchedulerSummary::default());
    }
}
