//! Core formatting traits and implementations
//!
//! This module defines the operator-facing message interface and provides
//! the plain text implementation.

use crate::{
    device::DeviceInfo,
    error::{AppError, Result},
    models::Stats,
    stats::RollingStats,
    types::StallKind,
};
use std::fmt::Write as _;
use std::time::Duration;

/// Main trait for output formatting
pub trait OutputFormatter: Send + Sync {
    /// Announce the device that will be used
    fn format_device_found(&self, vendor: &str, device: &DeviceInfo) -> String;

    /// Announce the start of a collection run
    fn format_collection_start(&self, count: usize, quiet: bool) -> String;

    /// One accepted measurement, echoed on its own line as `text`, the
    /// device's own spelling of `value`
    fn format_trial(&self, index: usize, total: usize, value: f64, text: &str) -> String;

    /// Progress text without the value, for the overwritten quiet-mode line
    fn format_trial_progress(&self, index: usize, total: usize) -> String;

    /// Operator guidance after a read produced no measurement
    fn format_stall(&self, kind: StallKind, timeout: Duration) -> String;

    /// Device output that was not a measurement
    fn format_noise(&self, line: &str) -> String;

    /// Running figures shown next to trials in verbose mode
    fn format_running_stats(&self, rolling: &RollingStats) -> String;

    /// The two-line summary of a run
    fn format_stats_summary(&self, stats: &Stats) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> String;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> String;

    /// Format success messages
    fn format_success(&self, message: &str) -> String;

    /// Format informational messages
    fn format_info(&self, message: &str) -> String;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
        }
    }
}

/// Whole seconds without a fraction, otherwise one decimal
pub(crate) fn format_seconds(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if duration.subsec_nanos() == 0 {
        format!("{}", duration.as_secs())
    } else {
        format!("{:.1}", secs)
    }
}

/// Text of the stall guidance, shared by every formatter
pub(crate) fn stall_message(kind: StallKind, timeout: Duration) -> String {
    let secs = format_seconds(timeout);
    match kind {
        StallKind::First => format!(
            "Did not receive measurement data from the device for {} seconds.\n \
             Is the phototransistor sensing the LED on the screen?\n \
             Is the correct side of the phototransistor pointing towards the screen (the flat side with the knob on it)?\n \
             Is the screen brightness high enough (max recommended)?",
            secs
        ),
        StallKind::Repeated => format!(
            "Did not receive measurement data from the device for another {} seconds. \
             Is the phototransistor still sensing the LED?",
            secs
        ),
    }
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_device_found(&self, vendor: &str, device: &DeviceInfo) -> String {
        if self.options.verbose_mode {
            format!("Found {} device at {} ({})", vendor, device.port_name, device.description())
        } else {
            format!("Found {} device at {}", vendor, device.port_name)
        }
    }

    fn format_collection_start(&self, count: usize, quiet: bool) -> String {
        let mut output = format!("Collecting {} measurements from the device", count);
        if quiet {
            output.push_str("\nRunning in quiet mode, won't print the measurements to the terminal");
        }
        output
    }

    fn format_trial(&self, index: usize, total: usize, _value: f64, text: &str) -> String {
        format!("G2G Delay trial {}/{}: {} ms", index, total, text)
    }

    fn format_trial_progress(&self, index: usize, total: usize) -> String {
        format!("G2G Delay trial {}/{}", index, total)
    }

    fn format_stall(&self, kind: StallKind, timeout: Duration) -> String {
        stall_message(kind, timeout)
    }

    fn format_noise(&self, line: &str) -> String {
        format!("  device: {}", line)
    }

    fn format_running_stats(&self, rolling: &RollingStats) -> String {
        format!("(mean {:.2} ms, std_dev {:.2} ms)", rolling.average(), rolling.std_dev())
    }

    fn format_stats_summary(&self, stats: &Stats) -> Result<String> {
        let (extremes, spread) = stats.summary_lines();
        let mut output = String::new();

        writeln!(output, "{}", extremes)
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        write!(output, "{}", spread)
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;

        if self.options.verbose_mode {
            write!(output, "\nsamples: {}", stats.count)
                .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        }

        Ok(output)
    }

    fn format_error(&self, error: &str) -> String {
        format!("ERROR: {}", error)
    }

    fn format_warning(&self, warning: &str) -> String {
        format!("WARNING: {}", warning)
    }

    fn format_success(&self, message: &str) -> String {
        message.to_string()
    }

    fn format_info(&self, message: &str) -> String {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> PlainFormatter {
        PlainFormatter::new(FormattingOptions {
            enable_color: false,
            verbose_mode: false,
        })
    }

    #[test]
    fn test_trial_lines() {
        let formatter = plain();
        assert_eq!(formatter.format_trial(3, 100, 12.34, "12.34"), "G2G Delay trial 3/100: 12.34 ms");
        assert_eq!(formatter.format_trial(4, 100, 5.0, "5.0"), "G2G Delay trial 4/100: 5.0 ms");
        assert_eq!(formatter.format_trial_progress(3, 100), "G2G Delay trial 3/100");
    }

    #[test]
    fn test_device_found() {
        let device = DeviceInfo::from_port_name("/dev/ttyACM0");
        assert_eq!(
            plain().format_device_found("Arduino", &device),
            "Found Arduino device at /dev/ttyACM0"
        );
    }

    #[test]
    fn test_collection_start_quiet_notice() {
        let formatter = plain();
        assert!(!formatter.format_collection_start(5, false).contains("quiet"));
        assert!(formatter.format_collection_start(5, true).contains("quiet mode"));
    }

    #[test]
    fn test_stall_messages() {
        let first = stall_message(StallKind::First, Duration::from_secs(5));
        assert!(first.starts_with("Did not receive measurement data from the device for 5 seconds."));
        assert!(first.contains("flat side with the knob"));
        assert!(first.contains("brightness"));

        let repeated = stall_message(StallKind::Repeated, Duration::from_millis(2500));
        assert!(repeated.contains("for another 2.5 seconds"));
        assert!(!repeated.contains('\n'));
    }

    #[test]
    fn test_summary_uses_two_decimals() {
        let stats = Stats {
            count: 5,
            min: 1.0,
            max: 5.0,
            mean: 3.0,
            median: 3.0,
            std_dev: 2f64.sqrt(),
        };
        let summary = plain().format_stats_summary(&stats).unwrap();
        assert_eq!(
            summary,
            "min: 1.00 ms | max: 5.00 ms | median: 3.00 ms\nmean: 3.00 ms | std_dev: 1.41 ms"
        );
    }

    #[test]
    fn test_plain_messages() {
        let formatter = plain();
        assert_eq!(formatter.format_error("boom"), "ERROR: boom");
        assert_eq!(formatter.format_warning("careful"), "WARNING: careful");
        assert_eq!(formatter.format_success("Saved results to a.csv"), "Saved results to a.csv");
    }
}
