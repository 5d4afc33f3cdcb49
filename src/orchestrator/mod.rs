//! Diagnostic orchestration
//!
//! The orchestrator runs one probe sequence at a time on its own tokio task:
//! - probes execute strictly in sequence order, each exactly once
//! - maintenance probes are separated by a settle delay so the OS can apply
//!   each change before the next command runs
//! - every finished probe is published through the [`ProgressTracker`]
//! - the report is built only after the last probe and written once
//!
//! Starting a run never blocks the caller; observers poll or subscribe to a
//! [`ProgressView`].

pub mod progress;

pub use progress::{ProgressSnapshot, ProgressTracker, ProgressView, RunPhase};

use crate::{
    defaults::SETTLE_DELAY,
    error::{AppError, Result},
    logging::Logger,
    models::DiagnosticRun,
    platform::PlatformDetection,
    probe::{ProbeRunner, ProcessRunner},
    report::ReportWriter,
    types::{Platform, ProbeOutcome, RunSequence, TestMode},
};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Result of asking the orchestrator to start a run
#[derive(Debug)]
pub enum RunStart {
    /// The run is executing on the returned task
    Started(JoinHandle<Result<PathBuf>>),
    /// Another run is in progress; nothing was started
    AlreadyRunning,
}

impl RunStart {
    pub fn is_started(&self) -> bool {
        matches!(self, RunStart::Started(_))
    }
}

/// Sequences probes, aggregates their output and persists the report
pub struct DiagnosticOrchestrator {
    probes: ProbeRunner,
    writer: ReportWriter,
    tracker: Arc<ProgressTracker>,
    logger: Arc<Logger>,
    settle_delay: Duration,
    platform: Option<Platform>,
}

impl DiagnosticOrchestrator {
    pub fn new(runner: Arc<dyn ProcessRunner>, writer: ReportWriter, logger: Arc<Logger>) -> Self {
        Self {
            probes: ProbeRunner::new(runner, logger.clone()),
            writer,
            tracker: Arc::new(ProgressTracker::new()),
            logger,
            settle_delay: SETTLE_DELAY,
            platform: None,
        }
    }

    /// Override the pause between state-mutating probes
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Resolve commands for `platform` instead of detecting the host
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Read-only progress handle for observers
    pub fn progress(&self) -> ProgressView {
        self.tracker.view()
    }

    pub fn is_running(&self) -> bool {
        self.tracker.snapshot().is_running()
    }

    /// Start the diagnostic sequence (configuration, latency, path trace).
    ///
    /// Returns immediately. While a run is in progress this is a no-op that
    /// returns [`RunStart::AlreadyRunning`].
    pub fn run(&self, mode: TestMode) -> RunStart {
        self.start(RunSequence::Diagnostic(mode))
    }

    /// Start the maintenance sequence (DHCP release/renew, socket reset, DNS flush/register)
    pub fn run_maintenance(&self) -> RunStart {
        self.start(RunSequence::Maintenance)
    }

    /// Run the diagnostic sequence and wait for the report
    pub async fn run_to_completion(&self, mode: TestMode) -> Result<PathBuf> {
        self.wait(self.run(mode)).await
    }

    /// Run the maintenance sequence and wait for the report
    pub async fn run_maintenance_to_completion(&self) -> Result<PathBuf> {
        self.wait(self.run_maintenance()).await
    }

    /// Wait for a started run to finish
    pub async fn wait(&self, start: RunStart) -> Result<PathBuf> {
        match start {
            RunStart::Started(handle) => match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    // The worker died before latching an outcome
                    self.tracker.fail(e.to_string());
                    Err(e.into())
                }
            },
            RunStart::AlreadyRunning => Err(AppError::validation("a run is already in progress")),
        }
    }

    fn start(&self, sequence: RunSequence) -> RunStart {
        if !self.tracker.try_begin(sequence) {
            return RunStart::AlreadyRunning;
        }

        let worker = RunWorker {
            probes: self.probes.clone(),
            writer: self.writer.clone(),
            tracker: self.tracker.clone(),
            logger: self.logger.clone(),
            settle_delay: self.settle_delay,
            platform: self.platform,
        };
        RunStart::Started(tokio::spawn(worker.execute(sequence)))
    }
}

/// Everything one run needs, moved onto the worker task
struct RunWorker {
    probes: ProbeRunner,
    writer: ReportWriter,
    tracker: Arc<ProgressTracker>,
    logger: Arc<Logger>,
    settle_delay: Duration,
    platform: Option<Platform>,
}

impl RunWorker {
    async fn execute(self, sequence: RunSequence) -> Result<PathBuf> {
        let operation = match sequence {
            RunSequence::Diagnostic(mode) => format!("{} diagnostic run", mode),
            RunSequence::Maintenance => "maintenance run".to_string(),
        };
        let correlation_id = self.logger.start_operation(&operation).await;

        let outcome = self.collect_and_write(sequence).await;
        match &outcome {
            Ok(path) => {
                self.logger
                    .info(&format!("Report saved to {}", path.display()))
                    .field("report_path", path)
                    .log()
                    .await;
                self.tracker.complete(path.clone());
            }
            Err(e) => {
                self.logger
                    .error(&format!("Run finished without a report: {}", e))
                    .error_info(e)
                    .log()
                    .await;
                self.tracker.fail(e.to_string());
            }
        }

        self.logger
            .end_operation(&correlation_id, &operation, outcome.is_ok())
            .await;
        outcome
    }

    async fn collect_and_write(&self, sequence: RunSequence) -> Result<PathBuf> {
        let platform = self.resolve_platform().await;
        let mut run = DiagnosticRun::new(sequence, platform, Local::now());
        let mut previous_executed = false;

        for &kind in sequence.probes() {
            // Skipped probes changed nothing, so there is nothing to settle
            if previous_executed && sequence.settles_before(kind) {
                crate::log_debug!(
                    self.logger,
                    "Settling for {:?} before {}",
                    self.settle_delay,
                    kind
                );
                tokio::time::sleep(self.settle_delay).await;
            }

            let result = self.probes.execute(kind, platform, sequence.mode()).await;
            previous_executed = result.outcome == ProbeOutcome::Executed;

            self.logger
                .debug(&format!("{} complete", kind))
                .probe_result(&result)
                .log()
                .await;

            run.record(result)?;
            self.tracker.mark_done(kind);
        }

        let report = run.into_report()?;
        self.writer.write(&report).await
    }

    async fn resolve_platform(&self) -> Platform {
        let platform = match self.platform {
            Some(platform) => platform,
            None => {
                let detection = PlatformDetection::current();
                if let Some(note) = detection.fallback_note() {
                    self.logger
                        .warn(&note)
                        .field("os", &detection.os_name)
                        .field("platform", detection.platform)
                        .log()
                        .await;
                }
                detection.platform
            }
        };

        // Every later entry of this session carries the command family
        self.logger.add_context_field("platform".to_string(), platform).await;
        platform
    }
}
