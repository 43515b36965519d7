//! Configuration data model and validation

use crate::defaults;
use crate::types::{AppError, EchoMode, Result, RunMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// CSV results file (written in acquire mode, read in replay mode)
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,

    /// Number of measurements to collect
    #[serde(default = "default_sample_count")]
    pub sample_count: u32,

    /// Acquire or replay
    #[serde(default = "default_mode")]
    pub mode: RunMode,

    /// Suppress the per-sample echo
    #[serde(default)]
    pub quiet: bool,

    /// Explicit serial port; skips discovery when set
    #[serde(default)]
    pub port: Option<String>,

    /// Substring matched against the device manufacturer/description
    #[serde(default = "default_vendor")]
    pub vendor: String,

    /// Serial baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Serial read timeout in seconds
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_seconds: u64,

    /// Stale-output drain window in milliseconds
    #[serde(default = "default_drain_window_ms")]
    pub drain_window_ms: u64,

    /// Post-acquisition settle delay in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Give up after this many consecutive unproductive reads
    #[serde(default)]
    pub max_attempts: Option<u64>,

    /// Histogram bin count
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Open the histogram in a viewer after saving it
    #[serde(default = "default_show_plot")]
    pub show_plot: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            results_path: default_results_path(),
            sample_count: default_sample_count(),
            mode: default_mode(),
            quiet: false,
            port: None,
            vendor: default_vendor(),
            baud_rate: default_baud_rate(),
            read_timeout_seconds: default_read_timeout_secs(),
            drain_window_ms: default_drain_window_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            max_attempts: None,
            histogram_bins: default_histogram_bins(),
            show_plot: default_show_plot(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get read timeout as Duration
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_seconds)
    }

    /// Get drain window as Duration
    pub fn drain_window(&self) -> Duration {
        Duration::from_millis(self.drain_window_ms)
    }

    /// Get settle delay as Duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Console echo style for accepted measurements
    pub fn echo_mode(&self) -> EchoMode {
        EchoMode::from_quiet_flag(self.quiet)
    }

    /// Histogram path: same stem as the results file, graphics extension
    pub fn histogram_path(&self) -> PathBuf {
        self.results_path.with_extension(defaults::HISTOGRAM_EXTENSION)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        validate_results_path(&self.results_path)?;

        if self.sample_count == 0 {
            return Err(AppError::config("Number of measurements must be greater than 0"));
        }

        if self.vendor.trim().is_empty() {
            return Err(AppError::config("Vendor substring cannot be empty"));
        }

        if let Some(ref port) = self.port {
            if port.trim().is_empty() {
                return Err(AppError::config("Serial port name cannot be empty"));
            }
        }

        if self.baud_rate == 0 {
            return Err(AppError::config("Baud rate must be greater than 0"));
        }

        if self.read_timeout_seconds == 0 {
            return Err(AppError::config("Read timeout must be greater than 0"));
        }

        if self.read_timeout_seconds > 300 {
            return Err(AppError::config("Read timeout cannot exceed 300 seconds"));
        }

        if self.drain_window_ms > 1000 {
            return Err(AppError::config("Drain window cannot exceed 1000 ms"));
        }

        if self.max_attempts == Some(0) {
            return Err(AppError::config("Maximum attempts must be at least 1 when set"));
        }

        if self.histogram_bins == 0 || self.histogram_bins > 1000 {
            return Err(AppError::config(format!(
                "Histogram bins must be between 1 and 1000, got: {}",
                self.histogram_bins
            )));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("G2G_PORT") {
            let port = port.trim();
            if !port.is_empty() {
                self.port = Some(port.to_string());
            }
        }

        if let Ok(vendor) = std::env::var("G2G_VENDOR") {
            self.vendor = vendor.trim().to_string();
        }

        if let Ok(baud) = std::env::var("G2G_BAUD_RATE") {
            self.baud_rate = baud.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid G2G_BAUD_RATE value '{}': {}", baud, e)))?;
        }

        if let Ok(timeout) = std::env::var("G2G_READ_TIMEOUT") {
            self.read_timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid G2G_READ_TIMEOUT value '{}': {}", timeout, e)))?;
        }

        if let Ok(window) = std::env::var("G2G_DRAIN_WINDOW_MS") {
            self.drain_window_ms = window.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid G2G_DRAIN_WINDOW_MS value '{}': {}", window, e)))?;
        }

        if let Ok(delay) = std::env::var("G2G_SETTLE_DELAY_MS") {
            self.settle_delay_ms = delay.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid G2G_SETTLE_DELAY_MS value '{}': {}", delay, e)))?;
        }

        if let Ok(attempts) = std::env::var("G2G_MAX_ATTEMPTS") {
            let attempts = attempts.trim();
            self.max_attempts = if attempts.is_empty() {
                None
            } else {
                Some(attempts.parse()
                    .map_err(|e| AppError::config(format!("Invalid G2G_MAX_ATTEMPTS value '{}': {}", attempts, e)))?)
            };
        }

        if let Ok(bins) = std::env::var("G2G_HISTOGRAM_BINS") {
            self.histogram_bins = bins.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid G2G_HISTOGRAM_BINS value '{}': {}", bins, e)))?;
        }

        if let Ok(enable_color) = std::env::var("G2G_ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid G2G_ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

/// Check that a results path carries the CSV extension.
///
/// Runs before any file or device access.
pub fn validate_results_path(path: &Path) -> Result<()> {
    let extension_ok = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(defaults::RESULTS_EXTENSION))
        .unwrap_or(false);

    if !extension_ok {
        return Err(AppError::config(format!(
            "Provided filename '{}' is invalid or does not have a .{} extension",
            path.display(),
            defaults::RESULTS_EXTENSION
        )));
    }

    Ok(())
}

// Default value functions for serde
fn default_results_path() -> PathBuf {
    PathBuf::from(defaults::DEFAULT_RESULTS_FILE)
}

fn default_sample_count() -> u32 {
    defaults::DEFAULT_SAMPLE_COUNT
}

fn default_mode() -> RunMode {
    RunMode::Acquire
}

fn default_vendor() -> String {
    defaults::DEFAULT_VENDOR.to_string()
}

fn default_baud_rate() -> u32 {
    defaults::DEFAULT_BAUD_RATE
}

fn default_read_timeout_secs() -> u64 {
    defaults::DEFAULT_READ_TIMEOUT.as_secs()
}

fn default_drain_window_ms() -> u64 {
    defaults::DEFAULT_DRAIN_WINDOW.as_millis() as u64
}

fn default_settle_delay_ms() -> u64 {
    defaults::DEFAULT_SETTLE_DELAY.as_millis() as u64
}

fn default_histogram_bins() -> usize {
    defaults::DEFAULT_HISTOGRAM_BINS
}

fn default_show_plot() -> bool {
    true
}

fn default_enable_color() -> bool {
    defaults::DEFAULT_ENABLE_COLOR
}
