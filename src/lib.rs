//! Uniserve Diagnostic Collector
//!
//! Runs a fixed sequence of operating-system network commands (adapter
//! configuration, latency, path trace, and optionally the DHCP/DNS/socket
//! maintenance commands), captures their output and saves it as one
//! timestamped report that a customer can send to support.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod platform;
pub mod probe;
pub mod report;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, DiagnosticRun, ProbeResult, Report};
pub use orchestrator::{DiagnosticOrchestrator, ProgressSnapshot, ProgressView, RunPhase, RunStart};
pub use probe::{ProcessRunner, SystemProcessRunner};
pub use report::ReportWriter;
pub use types::{Platform, ProbeKind, RunSequence, TestMode};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    /// Host every latency and path probe targets
    pub const REFERENCE_HOST: &str = "google.ca";
    /// Largest ICMP payload that fits a 1500-byte MTU unfragmented
    pub const PING_PAYLOAD_BYTES: u32 = 1472;
    pub const HOP_LIMIT: u32 = 20;
    pub const BASIC_PING_COUNT: u32 = 10;
    pub const COMPREHENSIVE_PING_COUNT: u32 = 1000;
    /// Pause after a state-mutating maintenance command
    pub const SETTLE_DELAY: Duration = Duration::from_secs(5);
    pub const DEFAULT_OUTPUT_DIR: &str = ".";
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
