//! Command-line interface

use crate::types::TestMode;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// Uniserve Diagnostic Collector - gathers network evidence into one report for support
#[derive(Parser, Debug, Clone)]
#[command(name = "uniserve-diag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show the interactive test screen instead of the prompt
    #[arg(long)]
    pub ui: bool,

    /// Run the network reset sequence (DHCP, winsock, DNS) and save its report
    #[arg(long)]
    pub maintenance: bool,

    /// Test mode to run without prompting (basic or comprehensive)
    #[arg(short, long, value_parser = parse_mode, value_name = "MODE")]
    pub mode: Option<TestMode>,

    /// Directory the report is written into
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.ui && self.maintenance {
            return Err(
                "--maintenance cannot be combined with --ui; use the Network Reset action instead"
                    .to_string(),
            );
        }

        if self.maintenance && self.mode.is_some() {
            return Err(
                "--mode only applies to the diagnostic tests, not --maintenance".to_string(),
            );
        }

        if self.ui && self.mode.is_some() {
            return Err("--mode cannot be combined with --ui; pick the test on screen".to_string());
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }
}

/// Parse a test mode name
fn parse_mode(s: &str) -> Result<TestMode, String> {
    TestMode::from_str(s)
        .map_err(|_| format!("Invalid mode '{}': expected basic or comprehensive", s))
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    // Legacy Windows consoles need an ANSI shim
    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
