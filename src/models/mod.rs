//! Data models and structures for the diagnostic collector

pub mod config;
pub mod run;

// Re-export main model types
pub use config::Config;
pub use run::{format_run_timestamp, DiagnosticRun, ProbeResult, Report, TIMESTAMP_FORMAT};
