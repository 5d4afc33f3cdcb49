//! Error handling for the diagnostic collector
//!
//! Probe-level failures never surface as errors: whatever a command printed
//! (or nothing, if it never started) becomes part of the report. The only
//! failure escalated out of a run is a report that cannot be written.

use std::path::Path;
use thiserror::Error;

/// Custom error types for the diagnostic collector
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors outside report persistence (stdin, terminal)
    #[error("I/O error: {0}")]
    Io(String),

    /// The report could not be written
    #[error("Report could not be saved: {0}")]
    Persistence(String),

    /// A system command could not be started
    #[error("Process error: {0}")]
    Process(String),

    /// Parsing errors (flag values)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new persistence error
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence(message.into())
    }

    /// Persistence error naming the path that could not be written
    pub fn persistence_at(path: &Path, error: &std::io::Error) -> Self {
        Self::Persistence(format!("{}: {}", path.display(), error))
    }

    /// Create a new process error
    pub fn process<S: Into<String>>(message: S) -> Self {
        Self::Process(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Io(_) => "IO",
            Self::Persistence(_) => "REPORT",
            Self::Process(_) => "PROCESS",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        let (summary, suggestion) = match self {
            Self::Config(_) => (
                "Configuration problem",
                "Suggestion: Check your .env file or command line arguments.",
            ),
            Self::Validation(_) => (
                "Invalid input",
                "Suggestion: Check the output directory and other configuration values.",
            ),
            Self::Io(_) => (
                "Terminal input/output failed",
                "Suggestion: Run the tool from a regular command prompt.",
            ),
            Self::Persistence(_) => (
                "The diagnostic report could not be saved",
                "Suggestion: Run the tool from a folder you can write to, or pass --output-dir.",
            ),
            Self::Process(_) => (
                "A system command could not be started",
                "Suggestion: The command may not be installed on this machine.",
            ),
            Self::Parse(_) => (
                "Failed to parse a value",
                "Suggestion: Check the format of your flags.",
            ),
            Self::Internal(_) => (
                "Internal error",
                "This is likely a bug. Please report this issue with the error details.",
            ),
        };

        format!("{}: {}\n\n{}", summary, self.detail(), suggestion)
    }

    fn detail(&self) -> &str {
        match self {
            Self::Config(msg)
            | Self::Validation(msg)
            | Self::Io(msg)
            | Self::Persistence(msg)
            | Self::Process(msg)
            | Self::Parse(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,
            Self::Io(_) => 2,
            Self::Process(_) => 3,
            Self::Persistence(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Io(_) | Self::Process(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Persistence(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Failed to load .env file: {}", error))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::internal(format!("Diagnostic worker stopped unexpectedly: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error reporter for console feedback
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", error.format_for_console(self.use_color));

        if self.verbose {
            eprintln!();
            eprintln!("{}", error.user_friendly_message());
        }
    }
}
