//! Process execution seam
//!
//! The orchestrator never spawns processes itself; it goes through a
//! [`ProcessRunner`] so tests can substitute canned console output.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Runs a command line and returns the text it printed
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Execute `argv` (program followed by arguments) and wait for it to exit.
    ///
    /// Returns whatever the process printed regardless of exit status; an
    /// error means the process could not be started at all.
    async fn run(&self, argv: &[String]) -> Result<String>;
}

/// Spawns real system commands through `tokio::process`
#[derive(Debug, Default, Clone)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, argv: &[String]) -> Result<String> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| AppError::process("empty command line"))?;

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AppError::process(format!("failed to start '{}': {}", program, e)))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            text.push_str(&String::from_utf8_lossy(&output.stderr));
        }
        Ok(text)
    }
}
