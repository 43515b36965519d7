//! Structured logging system for the G2G delay recorder
//!
//! This module provides diagnostic logging including:
//! - Structured logging with multiple levels and contexts
//! - Debug mode detailed tracing with source locations
//! - Acquisition event logging (drain, noise, stalls, accepted samples)
//! - Error event logging with correlation IDs
//! - JSON structured output for integration with log aggregators
//!
//! Entries go to stderr so that stdout stays the operator channel.

use crate::error::AppError;
use crate::models::Config;
use crate::types::StallKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - general application information
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - error events but application can continue
    Error = 4,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",    // White
            LogLevel::Debug => "\x1b[36m",    // Cyan
            LogLevel::Info => "\x1b[32m",     // Green
            LogLevel::Warn => "\x1b[33m",     // Yellow
            LogLevel::Error => "\x1b[31m",    // Red
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
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
    /// Thread name if available
    pub thread_id: Option<String>,
    /// File and line information
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    /// Source file name
    pub file: String,
    /// Line number
    pub line: u32,
    /// Module path
    pub module: Option<String>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

/// Where formatted entries end up
#[derive(Debug, Clone)]
pub enum LogSink {
    /// Standard error
    Stderr,
    /// In-memory buffer, used to inspect log output
    Memory(Arc<Mutex<Vec<String>>>),
}

/// Shared logging context for correlation and session tracking
#[derive(Debug, Default)]
struct LogContext {
    /// Global correlation ID for the session
    session_id: Option<String>,
    /// Current operation correlation ID
    current_correlation_id: Option<String>,
    /// Additional context fields
    context_fields: HashMap<String, serde_json::Value>,
}

/// Logger implementation with multiple output formats
#[derive(Debug, Clone)]
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Whether to include location information
    include_location: bool,
    /// Output format
    format: LogFormat,
    /// Logger name
    name: String,
    /// Output destination
    sink: LogSink,
    /// Shared context storage
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
            sink: LogSink::Stderr,
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
            sink: LogSink::Stderr,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger writing into a shared in-memory buffer
    pub fn in_memory(name: String, min_level: LogLevel) -> (Self, Arc<Mutex<Vec<String>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let mut logger = Self::new(name);
        logger.min_level = min_level;
        logger.use_color = false;
        logger.format = LogFormat::Compact;
        logger.sink = LogSink::Memory(buffer.clone());
        (logger, buffer)
    }

    /// Set session correlation ID
    pub fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().unwrap_or_else(PoisonError::into_inner);
        context.session_id = Some(session_id);
    }

    /// Add context field for all subsequent log entries
    pub fn add_context_field<T: Serialize>(&self, key: &str, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().unwrap_or_else(PoisonError::into_inner);
            context.context_fields.insert(key.to_string(), json_value);
        }
    }

    /// Start a correlated operation
    pub fn start_operation(&self, operation_name: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        {
            let mut context = self.context.write().unwrap_or_else(PoisonError::into_inner);
            context.current_correlation_id = Some(correlation_id.clone());
        }

        self.info(&format!("Started operation: {}", operation_name))
            .correlation_id(&correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "start")
            .log();

        correlation_id
    }

    /// End a correlated operation
    pub fn end_operation(&self, correlation_id: &str, operation_name: &str, success: bool) {
        self.info(&format!("Completed operation: {} (success: {})", operation_name, success))
            .correlation_id(correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "end")
            .field("success", success)
            .log();

        let mut context = self.context.write().unwrap_or_else(PoisonError::into_inner);
        if context.current_correlation_id.as_deref() == Some(correlation_id) {
            context.current_correlation_id = None;
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    /// Convenience methods for different log levels
    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
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

    /// Write log entry to output
    fn write_entry(&self, mut entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }

        {
            let context = self.context.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(session_id) = &context.session_id {
                entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
            }
            if entry.correlation_id.is_none() {
                entry.correlation_id = context.current_correlation_id.clone();
            }
            for (key, value) in &context.context_fields {
                entry.fields.insert(key.clone(), value.clone());
            }
        }

        let output = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
            LogFormat::Compact => self.format_compact(&entry),
        };

        match &self.sink {
            LogSink::Stderr => {
                let _ = writeln!(io::stderr(), "{}", output);
            }
            LogSink::Memory(buffer) => {
                buffer.lock().unwrap_or_else(PoisonError::into_inner).push(output);
            }
        }
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}",
            timestamp,
            formatted_level,
            entry.logger,
            entry.message
        );

        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            let mut fields_str: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            fields_str.sort();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }

    /// Format log entry in compact format
    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        format!("{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        )
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
                thread_id: std::thread::current().name().map(String::from),
                location: None,
            },
        }
    }

    /// Add a correlation ID
    pub fn correlation_id(mut self, id: &str) -> Self {
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

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_recoverable", error.is_recoverable())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub fn log(self) {
        self.logger.write_entry(self.entry);
    }
}

/// Logger for acquisition loop events
#[derive(Debug, Clone)]
pub struct AcquisitionLogger {
    logger: Logger,
}

impl AcquisitionLogger {
    /// Wrap an existing logger
    pub fn from_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Underlying logger
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Log the device chosen for the run
    pub fn log_device_selected(&self, port_name: &str, description: &str) {
        self.logger.info(&format!("Using device at {}", port_name))
            .field("port", port_name)
            .field("description", description)
            .log();
    }

    /// Log how much stale output was discarded before counting
    pub fn log_drain(&self, discarded_lines: usize, window: Duration) {
        self.logger.debug(&format!("Discarded {} stale line(s) before counting", discarded_lines))
            .field("discarded_lines", discarded_lines)
            .field("drain_window_ms", window.as_millis() as u64)
            .log();
    }

    /// Log a line that was not a measurement
    pub fn log_noise(&self, line: &str, attempts: u64) {
        self.logger.debug("Ignored device output without a measurement")
            .field("line", line)
            .field("attempts", attempts)
            .log();
    }

    /// Log a read that produced nothing before the timeout
    pub fn log_stall(&self, kind: StallKind, attempts: u64, consecutive: u64) {
        self.logger.info("No measurement before read timeout")
            .field("stall_kind", kind)
            .field("attempts", attempts)
            .field("consecutive_misses", consecutive)
            .log();
    }

    /// Log an accepted measurement
    pub fn log_measurement(&self, index: usize, target: usize, value: f64) {
        self.logger.trace(&format!("Accepted measurement {}/{}", index, target))
            .field("index", index)
            .field("value_ms", value)
            .log();
    }

    /// Log completion of the acquisition loop
    pub fn log_complete(&self, collected: usize, attempts: u64, elapsed: Duration) {
        self.logger.info(&format!("Collected {} measurements in {:.1}s", collected, elapsed.as_secs_f64()))
            .field("collected", collected)
            .field("unproductive_reads", attempts)
            .field("elapsed_ms", elapsed.as_millis() as u64)
            .log();
    }
}

/// Error event logger with enhanced context
#[derive(Debug, Clone)]
pub struct ErrorEventLogger {
    logger: Logger,
}

impl ErrorEventLogger {
    /// Log an error with optional context
    pub fn log_error(&self, error: &AppError, context: Option<&str>, correlation_id: Option<&str>) {
        let mut builder = self.logger.error(&error.to_string()).error_info(error);

        if let Some(context) = context {
            builder = builder.field("context", context);
        }

        if let Some(correlation_id) = correlation_id {
            builder = builder.correlation_id(correlation_id);
        }

        builder.log();
    }
}

/// Factory for loggers sharing one session id
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    /// Create a new logger factory
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific name
    pub fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone());
        logger
    }

    /// Create an acquisition logger
    pub fn create_acquisition_logger(&self) -> AcquisitionLogger {
        AcquisitionLogger::from_logger(self.create_logger("ACQUIRE"))
    }

    /// Create an error event logger
    pub fn create_error_logger(&self) -> ErrorEventLogger {
        ErrorEventLogger {
            logger: self.create_logger("ERROR"),
        }
    }

    /// Get session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Convenience macros for logging with location information.
///
/// The message is only formatted when the logger would write it.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        if $logger.would_log($crate::logging::LogLevel::Debug) {
            $logger.debug(&format!($($arg)*))
                .location(file!(), line!(), Some(module_path!()))
                .log()
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        if $logger.would_log($crate::logging::LogLevel::Warn) {
            $logger.warn(&format!($($arg)*))
                .location(file!(), line!(), Some(module_path!()))
                .log()
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Info < LogLevel::Error);
    }

    #[test]
    fn test_logger_with_config_levels() {
        let mut config = Config::default();
        let logger = Logger::with_config("TEST".to_string(), &config);
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));

        config.verbose = true;
        let logger = Logger::with_config("TEST".to_string(), &config);
        assert!(logger.would_log(LogLevel::Info));
        assert!(!logger.would_log(LogLevel::Debug));

        config.debug = true;
        let logger = Logger::with_config("TEST".to_string(), &config);
        assert!(logger.would_log(LogLevel::Debug));
        assert_eq!(logger.format, LogFormat::Json);
    }

    #[test]
    fn test_entries_below_level_are_dropped() {
        let (logger, buffer) = Logger::in_memory("TEST".to_string(), LogLevel::Info);
        logger.debug("hidden").log();
        logger.info("shown").log();

        let lines = buffer.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("TEST: shown"));
    }

    #[test]
    fn test_session_and_context_fields_in_json() {
        let (mut logger, buffer) = Logger::in_memory("JSON".to_string(), LogLevel::Trace);
        logger.format = LogFormat::Json;
        logger.set_session_id("session-1".to_string());
        logger.add_context_field("port", "/dev/ttyACM0");
        logger.info("hello").field("n", 3).log();

        let lines = buffer.lock().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed["fields"]["session_id"], "session-1");
        assert_eq!(parsed["fields"]["port"], "/dev/ttyACM0");
        assert_eq!(parsed["fields"]["n"], 3);
        assert_eq!(parsed["level"], "Info");
    }

    #[test]
    fn test_operation_correlation() {
        let (mut logger, buffer) = Logger::in_memory("OP".to_string(), LogLevel::Info);
        logger.format = LogFormat::Console;
        let id = logger.start_operation("acquisition");
        assert_eq!(id.len(), 36);
        logger.end_operation(&id, "acquisition", true);

        let lines = buffer.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("Completed operation: acquisition (success: true)"));
    }

    #[test]
    fn test_console_format_includes_location_when_enabled() {
        let mut logger = Logger::new("LOC".to_string());
        logger.include_location = true;
        logger.use_color = false;
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Warn,
            message: "stalled".to_string(),
            logger: "LOC".to_string(),
            correlation_id: None,
            fields: HashMap::new(),
            thread_id: None,
            location: Some(LogLocation { file: "acquire.rs".to_string(), line: 42, module: None }),
        };
        let output = logger.format_console(&entry);
        assert!(output.contains(" WARN [LOC] stalled"));
        assert!(output.ends_with("@ acquire.rs:42"));
    }

    #[test]
    fn test_acquisition_logger_events() {
        let (logger, buffer) = Logger::in_memory("ACQUIRE".to_string(), LogLevel::Trace);
        let acquisition = AcquisitionLogger::from_logger(logger);
        acquisition.log_drain(2, Duration::from_millis(10));
        acquisition.log_noise("ready", 1);
        acquisition.log_stall(StallKind::First, 2, 2);
        acquisition.log_measurement(1, 5, 12.5);
        acquisition.log_complete(5, 2, Duration::from_secs(3));

        let lines = buffer.lock().unwrap();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Discarded 2 stale line(s)"));
        assert!(lines[4].contains("Collected 5 measurements in 3.0s"));
    }

    #[test]
    fn test_error_logging_fields() {
        let (mut logger, buffer) = Logger::in_memory("ERROR".to_string(), LogLevel::Trace);
        logger.format = LogFormat::Json;
        let error_logger = ErrorEventLogger { logger };
        error_logger.log_error(&AppError::device("not found"), Some("discovery"), None);

        let lines = buffer.lock().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed["fields"]["error_category"], "DEVICE");
        assert_eq!(parsed["fields"]["error_exit_code"], 2);
        assert_eq!(parsed["fields"]["context"], "discovery");
    }

    #[test]
    fn test_logger_factory_shares_session() {
        let factory = LoggerFactory::new(Config::default());
        assert_eq!(factory.session_id().len(), 36);
        let logger = factory.create_logger("APP");
        assert_eq!(logger.name, "APP");
        let acquisition = factory.create_acquisition_logger();
        assert_eq!(acquisition.logger().name, "ACQUIRE");
    }

    #[test]
    fn test_macros_attach_location() {
        let (mut logger, buffer) = Logger::in_memory("MACRO".to_string(), LogLevel::Trace);
        logger.format = LogFormat::Json;
        crate::log_debug!(logger, "value {}", 7);

        let lines = buffer.lock().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed["message"], "value 7");
        assert_eq!(parsed["level"], "Debug");
        assert!(parsed["location"]["file"].as_str().unwrap().ends_with("logging.rs"));
    }

    #[test]
    fn test_macros_skip_filtered_levels() {
        let (logger, buffer) = Logger::in_memory("MACRO".to_string(), LogLevel::Warn);
        crate::log_debug!(logger, "hidden {}", 1);
        crate::log_warn!(logger, "shown {}", 2);

        let lines = buffer.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("MACRO: shown 2"));
    }
}
