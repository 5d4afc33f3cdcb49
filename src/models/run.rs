//! Run data: probe results, the in-flight run and the finished report

use crate::error::{AppError, Result};
use crate::types::{Platform, ProbeKind, ProbeOutcome, RunSequence};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Timestamp format shared by the report header and the report file name
pub const TIMESTAMP_FORMAT: &str = "%d-%b-%Y_%I.%M.%p";

/// Format a run timestamp the way it appears in reports and file names
pub fn format_run_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Captured output of one probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub kind: ProbeKind,
    /// Console output with carriage returns removed, or the skip marker
    pub text: String,
    pub started_at: DateTime<Local>,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn new(
        kind: ProbeKind,
        text: String,
        started_at: DateTime<Local>,
        outcome: ProbeOutcome,
    ) -> Self {
        Self {
            kind,
            text,
            started_at,
            outcome,
        }
    }
}

/// A run in progress. Owned by the orchestrator's worker until the report is built.
#[derive(Debug)]
pub struct DiagnosticRun {
    sequence: RunSequence,
    platform: Platform,
    started_at: DateTime<Local>,
    results: Vec<ProbeResult>,
}

impl DiagnosticRun {
    pub fn new(sequence: RunSequence, platform: Platform, started_at: DateTime<Local>) -> Self {
        Self {
            sequence,
            platform,
            started_at,
            results: Vec::with_capacity(sequence.probes().len()),
        }
    }

    pub fn sequence(&self) -> RunSequence {
        self.sequence
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    /// Probe the run expects next, if any
    pub fn next_probe(&self) -> Option<ProbeKind> {
        self.sequence.probes().get(self.results.len()).copied()
    }

    /// Append the result of the next expected probe
    pub fn record(&mut self, result: ProbeResult) -> Result<()> {
        match self.next_probe() {
            Some(expected) if expected == result.kind => {
                self.results.push(result);
                Ok(())
            }
            Some(expected) => Err(AppError::internal(format!(
                "expected {} result, got {}",
                expected, result.kind
            ))),
            None => Err(AppError::internal(format!(
                "run already holds every result; unexpected {}",
                result.kind
            ))),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.next_probe().is_none()
    }

    /// Consume the run into its report. Fails while any probe result is missing.
    pub fn into_report(self) -> Result<Report> {
        if let Some(missing) = self.next_probe() {
            return Err(AppError::internal(format!(
                "report requested before {} finished",
                missing
            )));
        }

        let body = self
            .results
            .iter()
            .map(|result| result.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Report {
            sequence: self.sequence,
            started_at: self.started_at,
            body,
        })
    }
}

/// Write-once report text for a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    sequence: RunSequence,
    started_at: DateTime<Local>,
    body: String,
}

impl Report {
    pub fn sequence(&self) -> RunSequence {
        self.sequence
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Timestamp line at the top of the report
    pub fn header(&self) -> String {
        format_run_timestamp(&self.started_at)
    }

    /// Probe output joined in execution order
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Full file content: header, blank line, body
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.header(), self.body)
    }
}
