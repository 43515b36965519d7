//! Error handling for the G2G delay recorder

use thiserror::Error;

/// Custom error types for the G2G delay recorder
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (bad file extension, bad settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Measurement device errors (not found, disconnected, stalled)
    #[error("Device error: {0}")]
    Device(String),

    /// I/O errors (file operations, serial reads)
    #[error("I/O error: {0}")]
    Io(String),

    /// Unexpected content in a measurement line or results file token
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Structurally invalid results file
    #[error("Format error: {0}")]
    Format(String),

    /// Statistics calculation errors
    #[error("Statistics error: {0}")]
    Statistics(String),

    /// Histogram rendering or display errors
    #[error("Render error: {0}")]
    Render(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new device error
    pub fn device<S: Into<String>>(message: S) -> Self {
        Self::Device(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new format error
    pub fn format<S: Into<String>>(message: S) -> Self {
        Self::Format(message.into())
    }

    /// Create a new statistics error
    pub fn statistics<S: Into<String>>(message: S) -> Self {
        Self::Statistics(message.into())
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Device(_) => "DEVICE",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Format(_) => "FORMAT",
            Self::Statistics(_) => "STATS",
            Self::Render(_) => "RENDER",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if rerunning after operator action may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Device(_) | Self::Io(_) => true,
            Self::Config(_) | Self::Parse(_) | Self::Format(_) => false,
            Self::Statistics(_) | Self::Render(_) | Self::Internal(_) => false,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your command line arguments and .env file. The results file must end in .csv.", msg)
            }
            Self::Device(msg) => {
                format!("Measurement device problem: {}\n\nSuggestion: Reconnect the device over USB and run the command again.", msg)
            }
            Self::Io(msg) => {
                format!("File or port operation failed: {}\n\nSuggestion: Check file permissions, disk space and serial port access rights.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check that the device firmware prints one reading per line, or that the results file was written by this tool.", msg)
            }
            Self::Format(msg) => {
                format!("Unexpected results file layout: {}\n\nSuggestion: Results files need a header row, a statistics row and a measurements row, in that order.", msg)
            }
            Self::Statistics(msg) => {
                format!("Statistics calculation failed: {}\n\nSuggestion: This may indicate that no measurements were collected.", msg)
            }
            Self::Render(msg) => {
                format!("Histogram could not be produced: {}\n\nSuggestion: The results file was still written; rerun with --readcsv to plot it again.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 1,  // Invalid configuration/usage
            Self::Device(_) => 2,  // Device missing or unresponsive
            Self::Parse(_) | Self::Format(_) => 3,  // Bad data
            Self::Io(_) => 5,  // I/O issues
            Self::Statistics(_) => 6,
            Self::Render(_) => 7,
            Self::Internal(_) => 99,  // Internal/unexpected errors
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Parse(_) | Self::Format(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Device(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) | Self::Statistics(_) | Self::Render(_) => {
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

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            Self::io(format!("CSV I/O error: {}", error))
        } else {
            Self::format(format!("CSV error: {}", error))
        }
    }
}

impl From<serialport::Error> for AppError {
    fn from(error: serialport::Error) -> Self {
        match error.kind() {
            serialport::ErrorKind::NoDevice => Self::device(error.to_string()),
            serialport::ErrorKind::InvalidInput => Self::config(format!("Serial port setting rejected: {}", error)),
            _ => Self::io(format!("Serial port error: {}", error)),
        }
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::parse(format!("Float parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

// Anyhow integration, keeping the whole context chain
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(format!("{:#}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    // Keeps the variant of the wrapped error so exit codes stay meaningful
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let original_error = e.into();
            let context = f();
            match original_error {
                AppError::Config(msg) => AppError::Config(format!("{}: {}", context, msg)),
                AppError::Device(msg) => AppError::Device(format!("{}: {}", context, msg)),
                AppError::Io(msg) => AppError::Io(format!("{}: {}", context, msg)),
                AppError::Parse(msg) => AppError::Parse(format!("{}: {}", context, msg)),
                AppError::Format(msg) => AppError::Format(format!("{}: {}", context, msg)),
                AppError::Statistics(msg) => AppError::Statistics(format!("{}: {}", context, msg)),
                AppError::Render(msg) => AppError::Render(format!("{}: {}", context, msg)),
                AppError::Internal(msg) => AppError::Internal(format!("{}: {}", context, msg)),
            }
        })
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Error reporter for user feedback
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Render the report that `report_error` prints
    pub fn format_error(&self, error: &AppError) -> String {
        let mut report = error.format_for_console(self.use_color);

        if self.verbose {
            report.push_str("\n\n");
            report.push_str(&error.user_friendly_message());

            if error.is_recoverable() {
                report.push_str("\n\n");
                let hint = "Reconnecting the device and rerunning the command may fix this.";
                if self.use_color {
                    use colored::Colorize;
                    report.push_str(&hint.green().to_string());
                } else {
                    report.push_str(hint);
                }
            }
        }

        report
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.format_error(error));
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}
