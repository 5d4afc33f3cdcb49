//! Probe execution: command resolution plus process capture
//!
//! A probe is one diagnostic or maintenance command. [`ProbeRunner`] turns a
//! probe kind into a [`ProbeResult`], either by spawning the resolved command
//! or by reporting the skip marker for probes the platform cannot run.

pub mod process;
pub mod resolver;

pub use process::{ProcessRunner, SystemProcessRunner};
pub use resolver::{resolve, Resolution, SkipMarker};

use crate::{
    logging::Logger,
    models::ProbeResult,
    types::{Platform, ProbeKind, ProbeOutcome, TestMode},
};
use chrono::Local;
use std::sync::Arc;

/// Remove carriage returns so the report reads cleanly as a flat file
pub fn normalize_output(text: &str) -> String {
    text.replace('\r', "")
}

/// Executes single probes through a [`ProcessRunner`]
#[derive(Clone)]
pub struct ProbeRunner {
    runner: Arc<dyn ProcessRunner>,
    logger: Arc<Logger>,
}

impl ProbeRunner {
    pub fn new(runner: Arc<dyn ProcessRunner>, logger: Arc<Logger>) -> Self {
        Self { runner, logger }
    }

    /// Run one probe and capture its output.
    ///
    /// Never fails: a command that cannot be started yields an empty result,
    /// and the failure is only logged.
    pub async fn execute(
        &self,
        kind: ProbeKind,
        platform: Platform,
        mode: TestMode,
    ) -> ProbeResult {
        let started_at = Local::now();

        match resolve(kind, platform, mode) {
            Resolution::Skip(marker) => {
                self.logger
                    .info(&format!("{} skipped on {}", kind, platform))
                    .field("probe", kind)
                    .log()
                    .await;
                ProbeResult::new(kind, marker.text().to_string(), started_at, ProbeOutcome::Skipped)
            }
            Resolution::Command(argv) => {
                self.logger
                    .debug(&format!("Running {}", argv.join(" ")))
                    .field("probe", kind)
                    .log()
                    .await;

                let text = match self.runner.run(&argv).await {
                    Ok(text) => normalize_output(&text),
                    Err(e) => {
                        self.logger
                            .warn(&format!("{} produced no output", kind))
                            .field("probe", kind)
                            .error_info(&e)
                            .field("error", e.to_string())
                            .log()
                            .await;
                        String::new()
                    }
                };
                ProbeResult::new(kind, text, started_at, ProbeOutcome::Executed)
            }
        }
    }
}
