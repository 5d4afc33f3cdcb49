//! Progress published by the orchestrator to observers
//!
//! The orchestrator holds the only [`ProgressTracker`]; every observer gets a
//! [`ProgressView`]. Each update replaces the whole [`ProgressSnapshot`]
//! atomically, so readers always see a consistent record and never wait on
//! the writer for longer than a clone.

use crate::types::{ProbeKind, RunSequence};
use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::watch;

/// Lifecycle of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunPhase {
    /// No run has been started yet
    Idle,
    Running,
    /// Every probe finished and the report was written
    Complete,
    /// Every probe finished but the report could not be written
    Failed,
}

/// Point-in-time view of the current (or last) run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub phase: RunPhase,
    pub sequence: Option<RunSequence>,
    /// Finished probes, in execution order
    pub completed: Vec<ProbeKind>,
    /// Where the report was written, once `phase` is `Complete`
    pub report_path: Option<PathBuf>,
    /// Why the report is missing, once `phase` is `Failed`
    pub error: Option<String>,
}

impl ProgressSnapshot {
    fn idle() -> Self {
        Self {
            phase: RunPhase::Idle,
            sequence: None,
            completed: Vec::new(),
            report_path: None,
            error: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// True once a run finished and its report is on disk
    pub fn is_complete(&self) -> bool {
        self.phase == RunPhase::Complete
    }

    /// True once a run finished, whether or not the report was saved
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, RunPhase::Complete | RunPhase::Failed)
    }

    pub fn is_done(&self, kind: ProbeKind) -> bool {
        self.completed.contains(&kind)
    }

    /// Probes of the current sequence with their completion flags
    pub fn probe_flags(&self) -> Vec<(ProbeKind, bool)> {
        self.sequence
            .map(|sequence| {
                sequence
                    .probes()
                    .iter()
                    .map(|kind| (*kind, self.is_done(*kind)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Writer half, owned by the orchestrator
#[derive(Debug)]
pub struct ProgressTracker {
    sender: watch::Sender<ProgressSnapshot>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ProgressSnapshot::idle());
        Self { sender }
    }

    /// Hand out a read-only view
    pub fn view(&self) -> ProgressView {
        ProgressView {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.sender.borrow().clone()
    }

    /// Start a new run unless one is already running.
    ///
    /// The check and the reset happen in one step, so two callers can never
    /// both start a run.
    pub fn try_begin(&self, sequence: RunSequence) -> bool {
        self.sender.send_if_modified(|snapshot| {
            if snapshot.is_running() {
                return false;
            }
            *snapshot = ProgressSnapshot {
                phase: RunPhase::Running,
                sequence: Some(sequence),
                completed: Vec::new(),
                report_path: None,
                error: None,
            };
            true
        })
    }

    /// Mark a probe finished. Ignored outside a run or for a probe already marked.
    pub fn mark_done(&self, kind: ProbeKind) {
        self.sender.send_if_modified(|snapshot| {
            if !snapshot.is_running() || snapshot.completed.contains(&kind) {
                return false;
            }
            snapshot.completed.push(kind);
            true
        });
    }

    /// Latch the completion signal with the saved report path
    pub fn complete(&self, report_path: PathBuf) {
        self.sender.send_modify(|snapshot| {
            snapshot.phase = RunPhase::Complete;
            snapshot.report_path = Some(report_path);
            snapshot.error = None;
        });
    }

    /// Latch a failed run; the report was not saved
    pub fn fail(&self, reason: String) {
        self.sender.send_modify(|snapshot| {
            snapshot.phase = RunPhase::Failed;
            snapshot.report_path = None;
            snapshot.error = Some(reason);
        });
    }
}

/// Reader half, held by the presentation layer
#[derive(Debug, Clone)]
pub struct ProgressView {
    receiver: watch::Receiver<ProgressSnapshot>,
}

impl ProgressView {
    /// Current snapshot; never blocks on the writer
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.receiver.borrow().clone()
    }

    pub fn phase(&self) -> RunPhase {
        self.receiver.borrow().phase
    }

    pub fn is_done(&self, kind: ProbeKind) -> bool {
        self.receiver.borrow().is_done(kind)
    }

    pub fn is_complete(&self) -> bool {
        self.receiver.borrow().is_complete()
    }

    /// Wait for the next published update.
    ///
    /// Resolves immediately if an update arrived since the last call. Never
    /// resolves once the orchestrator is gone.
    pub async fn changed(&mut self) -> ProgressSnapshot {
        if self.receiver.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
        self.receiver.borrow_and_update().clone()
    }
}
