//! Structured logging for the diagnostic collector
//!
//! Log lines are for whoever runs the tool from a terminal; the technician's
//! evidence lives in the report file. This module provides:
//! - Levelled, named loggers with console and JSON formats
//! - Session and per-run correlation IDs
//! - Builder-style entries with structured fields

use crate::error::AppError;
use crate::models::{Config, ProbeResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Debug level - detailed information for debugging
    Debug = 0,
    /// Info level - general application information
    Info = 1,
    /// Warning level - potentially harmful situations
    Warn = 2,
    /// Error level - the run could not finish
    Error = 3,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
    pub module: Option<String>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
}

/// Shared logging context for correlation and session tracking
#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    current_correlation_id: Option<String>,
    context_fields: HashMap<String, serde_json::Value>,
}

/// Logger implementation with multiple output formats
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    include_location: bool,
    format: LogFormat,
    name: String,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            include_location: false,
            format: LogFormat::Console,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: String, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            include_location: config.debug,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Add context field for all subsequent log entries
    pub async fn add_context_field<T: Serialize>(&self, key: String, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key, json_value);
        }
    }

    /// Start a correlated operation
    pub async fn start_operation(&self, operation_name: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        {
            let mut context = self.context.write().await;
            context.current_correlation_id = Some(correlation_id.clone());
        }

        self.info(&format!("Started operation: {}", operation_name))
            .correlation_id(&correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "start")
            .log()
            .await;

        correlation_id
    }

    /// End a correlated operation
    pub async fn end_operation(&self, correlation_id: &str, operation_name: &str, success: bool) {
        self.info(&format!("Completed operation: {} (success: {})", operation_name, success))
            .correlation_id(correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "end")
            .field("success", success)
            .log()
            .await;

        let mut context = self.context.write().await;
        if context.current_correlation_id.as_deref() == Some(correlation_id) {
            context.current_correlation_id = None;
        }
    }

    #[cfg(test)]
    pub(crate) async fn context_field(&self, key: &str) -> Option<serde_json::Value> {
        self.context.read().await.context_fields.get(key).cloned()
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_entry(&self, mut entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            entry
                .fields
                .insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }
        if entry.correlation_id.is_none() {
            entry.correlation_id = context.current_correlation_id.clone();
        }
        for (key, value) in &context.context_fields {
            entry.fields.insert(key.clone(), value.clone());
        }
        drop(context);

        let output = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
        };

        // Write to stderr for errors/warnings, stdout for others
        if entry.level >= LogLevel::Warn {
            let _ = writeln!(io::stderr(), "{}", output);
        } else {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!(
            "{} {} [{}] {}",
            timestamp, formatted_level, entry.logger, entry.message
        );

        if let Some(correlation_id) = &entry.correlation_id {
            let short = correlation_id.get(..8).unwrap_or(correlation_id);
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let mut fields: Vec<String> =
                entry.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            fields.sort();
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!(
                "{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}",
                entry.message
            ),
        }
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
                location: None,
            },
        }
    }

    fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add location information
    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    /// Summarize a probe result without copying its console output
    pub fn probe_result(self, result: &ProbeResult) -> Self {
        self.field("probe", result.kind)
            .field("outcome", result.outcome)
            .field("output_bytes", result.text.len())
            .field("started_at", result.started_at.to_rfc3339())
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Creates loggers sharing one session ID
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific name
    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }
}

/// Convenience macros for logging with location information
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
            .await
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProbeKind, ProbeOutcome};

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert_eq!(LogLevel::Warn.as_str(), "WARN");
    }

    #[test]
    fn test_logger_with_config() {
        let config = Config {
            debug: true,
            enable_color: false,
            ..Default::default()
        };

        let logger = Logger::with_config("RUN".to_string(), &config);
        assert_eq!(logger.min_level, LogLevel::Debug);
        assert_eq!(logger.format, LogFormat::Json);
        assert!(!logger.use_color);
        assert!(logger.include_location);

        let quiet = Logger::with_config("RUN".to_string(), &Config::default());
        assert_eq!(quiet.min_level, LogLevel::Warn);
        assert_eq!(quiet.format, LogFormat::Console);
    }

    #[tokio::test]
    async fn test_operation_correlation() {
        let logger = Logger::new("RUN".to_string());
        let correlation_id = logger.start_operation("diagnostic run").await;
        assert!(!correlation_id.is_empty());
        assert_eq!(
            logger.context.read().await.current_correlation_id.as_deref(),
            Some(correlation_id.as_str())
        );

        logger.end_operation(&correlation_id, "diagnostic run", true).await;
        assert!(logger.context.read().await.current_correlation_id.is_none());
    }

    #[tokio::test]
    async fn test_session_and_context_fields() {
        let logger = Logger::new("RUN".to_string());
        logger.set_session_id("session-1".to_string()).await;
        logger.add_context_field("platform".to_string(), "windows").await;

        let context = logger.context.read().await;
        assert_eq!(context.session_id.as_deref(), Some("session-1"));
        assert!(context.context_fields.contains_key("platform"));
    }

    #[test]
    fn test_would_log() {
        let mut logger = Logger::new("RUN".to_string());
        logger.set_level(LogLevel::Warn);

        assert!(!logger.would_log(LogLevel::Debug));
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));
        assert!(logger.would_log(LogLevel::Error));
    }

    #[test]
    fn test_probe_result_fields() {
        let logger = Logger::new("RUN".to_string());
        let result = ProbeResult::new(
            ProbeKind::Latency,
            "64 bytes from google.ca".to_string(),
            chrono::Local::now(),
            ProbeOutcome::Executed,
        );

        let builder = logger.info("probe finished").probe_result(&result);
        assert_eq!(builder.entry.fields["probe"], serde_json::json!("Latency"));
        assert_eq!(builder.entry.fields["outcome"], serde_json::json!("Executed"));
        assert_eq!(builder.entry.fields["output_bytes"], serde_json::json!(23));
    }

    #[test]
    fn test_log_formats() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            message: "Test message".to_string(),
            logger: "RUN".to_string(),
            correlation_id: Some("abc".to_string()),
            fields: {
                let mut map = HashMap::new();
                map.insert("key".to_string(), serde_json::Value::String("value".to_string()));
                map
            },
            location: None,
        };

        let logger = Logger::with_config(
            "RUN".to_string(),
            &Config {
                enable_color: false,
                ..Default::default()
            },
        );

        let console_output = logger.format_console(&entry);
        assert!(console_output.contains(" INFO [RUN] Test message [abc]"));
        assert!(console_output.contains("key=\"value\""));

        let json_output = logger.format_json(&entry);
        let parsed: LogEntry = serde_json::from_str(&json_output).unwrap();
        assert_eq!(parsed.message, "Test message");
    }

    #[tokio::test]
    async fn test_logger_factory_shares_session() {
        let factory = LoggerFactory::new(Config::default());
        let first = factory.create_logger("RUN").await;
        let second = factory.create_logger("UI").await;

        assert_eq!(first.name, "RUN");
        assert_eq!(
            first.context.read().await.session_id,
            second.context.read().await.session_id
        );
        assert_eq!(
            first.context.read().await.session_id.as_deref(),
            Some(factory.session_id.as_str())
        );
    }
}
