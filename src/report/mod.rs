//! Report persistence
//!
//! A report is written once, in a single call, to a file named after the
//! run's start time. Two runs started in the same minute produce the same
//! name and the later one replaces the earlier file.

use crate::{
    error::{AppError, Result},
    models::{format_run_timestamp, Report},
    types::RunSequence,
};
use std::path::{Path, PathBuf};

/// File name prefix for diagnostic reports
pub const DIAGNOSTIC_PREFIX: &str = "Uniserve_Diagnostic_";
/// File name prefix for maintenance reports
pub const MAINTENANCE_PREFIX: &str = "Uniserve_Maintenance_";
/// Report file extension
pub const REPORT_EXTENSION: &str = "log";

/// Writes finished reports into a directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File name for a report, derived from its start time
    pub fn file_name(report: &Report) -> String {
        let prefix = match report.sequence() {
            RunSequence::Diagnostic(_) => DIAGNOSTIC_PREFIX,
            RunSequence::Maintenance => MAINTENANCE_PREFIX,
        };
        format!(
            "{}{}.{}",
            prefix,
            format_run_timestamp(&report.started_at()),
            REPORT_EXTENSION
        )
    }

    /// Full path the report will be written to
    pub fn path_for(&self, report: &Report) -> PathBuf {
        self.output_dir.join(Self::file_name(report))
    }

    /// Write the report and return where it landed
    pub async fn write(&self, report: &Report) -> Result<PathBuf> {
        let path = self.path_for(report);
        tokio::fs::write(&path, report.render())
            .await
            .map_err(|e| AppError::persistence_at(&path, &e))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiagnosticRun, ProbeResult};
    use crate::types::{Platform, ProbeKind, ProbeOutcome, TestMode};
    use chrono::{DateTime, Local, TimeZone};
    use tempfile::TempDir;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2023, 11, 21, 9, 42, 0).unwrap()
    }

    fn report(sequence: RunSequence, texts: &[&str]) -> Report {
        let mut run = DiagnosticRun::new(sequence, Platform::Windows, at());
        for (kind, text) in sequence.probes().iter().zip(texts) {
            run.record(ProbeResult::new(*kind, text.to_string(), at(), ProbeOutcome::Executed))
                .unwrap();
        }
        run.into_report().unwrap()
    }

    fn diagnostic_report() -> Report {
        report(RunSequence::Diagnostic(TestMode::Basic), &["cfgText", "pingText", "traceText"])
    }

    #[test]
    fn test_file_name_from_start_time() {
        assert_eq!(
            ReportWriter::file_name(&diagnostic_report()),
            "Uniserve_Diagnostic_21-Nov-2023_09.42.AM.log"
        );

        let maintenance = report(RunSequence::Maintenance, &["a", "b", "c", "d", "e"]);
        assert_eq!(
            ReportWriter::file_name(&maintenance),
            "Uniserve_Maintenance_21-Nov-2023_09.42.AM.log"
        );
    }

    #[tokio::test]
    async fn test_write_produces_header_and_body() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path());

        let path = writer.write(&diagnostic_report()).await.unwrap();

        assert_eq!(path, dir.path().join("Uniserve_Diagnostic_21-Nov-2023_09.42.AM.log"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "21-Nov-2023_09.42.AM\n\ncfgText\npingText\ntraceText");
    }

    #[tokio::test]
    async fn test_same_minute_runs_collide() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path());

        let first = writer.write(&diagnostic_report()).await.unwrap();
        let second = writer
            .write(&report(RunSequence::Diagnostic(TestMode::Comprehensive), &["x", "y", "z"]))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(
            std::fs::read_to_string(&second).unwrap(),
            "21-Nov-2023_09.42.AM\n\nx\ny\nz"
        );
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_a_persistence_error() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path().join("missing").join("nested"));

        let error = writer.write(&diagnostic_report()).await.unwrap_err();

        assert!(matches!(error, AppError::Persistence(_)));
        assert!(error.to_string().contains("missing"));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_probe_kinds_in_maintenance_report_order() {
        let maintenance = report(RunSequence::Maintenance, &["rel", "ren", "rst", "fl", "reg"]);
        assert_eq!(maintenance.body(), "rel\nren\nrst\nfl\nreg");
        assert_eq!(RunSequence::Maintenance.probes()[0], ProbeKind::DhcpRelease);
    }
}
