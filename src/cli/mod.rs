//! Command-line interface module with topic help

pub mod help;

pub use help::HelpSystem;

use crate::error::{AppError, Result};
use crate::types::RunMode;
use clap::Parser;
use std::path::PathBuf;

/// G2G Delay Recorder - glass-to-glass latency measurements from a serial device
#[derive(Parser, Debug, Clone)]
#[command(name = "g2g")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// CSV file the results are saved to (or read from with --readcsv); the histogram uses the same name with .svg
    #[arg(default_value = crate::defaults::DEFAULT_RESULTS_FILE)]
    pub filename: PathBuf,

    /// Number of measurements to collect
    #[arg(default_value_t = crate::defaults::DEFAULT_SAMPLE_COUNT, value_parser = parse_sample_count)]
    pub num_measurements: u32,

    /// Do not echo each measurement (a single progress line is still shown)
    #[arg(short, long)]
    pub quiet: bool,

    /// Read a previously saved CSV file and plot it instead of measuring
    #[arg(short = 'r', long)]
    pub readcsv: bool,

    /// Serial port of the device; skips vendor-based discovery
    #[arg(long)]
    pub port: Option<String>,

    /// Substring of the USB manufacturer/description identifying the device
    #[arg(long)]
    pub vendor: Option<String>,

    /// Serial baud rate
    #[arg(long)]
    pub baud: Option<u32>,

    /// Read timeout in seconds before a stall is reported
    #[arg(short, long, value_parser = parse_duration)]
    pub timeout: Option<u64>,

    /// Give up after this many consecutive reads without a measurement
    #[arg(long, value_parser = parse_max_attempts)]
    pub max_attempts: Option<u64>,

    /// Number of histogram bins
    #[arg(long)]
    pub bins: Option<usize>,

    /// Save the histogram without opening it in a viewer
    #[arg(long)]
    pub no_show: bool,

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

    /// Show help for specific topic (setup, format, config, examples)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,

    /// Print an example .env file and exit
    #[arg(long)]
    pub print_env_example: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements.
    ///
    /// The results file extension is checked here, before any file or
    /// device access happens.
    pub fn validate(&self) -> Result<()> {
        crate::models::config::validate_results_path(&self.filename)?;

        if self.color && self.no_color {
            return Err(AppError::config("Cannot specify both --color and --no-color"));
        }

        Ok(())
    }

    /// Acquire or replay, from the --readcsv flag
    pub fn run_mode(&self) -> RunMode {
        RunMode::from_replay_flag(self.readcsv)
    }

    /// Check if help should be displayed for a specific topic
    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Get the help topic if specified
    pub fn get_help_topic(&self) -> Option<&str> {
        self.help_topic.as_deref()
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

    /// Display help for the specified topic or main help
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        if let Some(topic) = &self.help_topic {
            help_system.display_topic_help(topic, use_colors)
                .unwrap_or_else(|| {
                    format!("Unknown help topic: '{}'\n\nAvailable topics: {}\n\n{}",
                        topic, HelpSystem::TOPICS.join(", "), help_system.display_main_help(use_colors))
                })
        } else {
            help_system.display_main_help(use_colors)
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Command Line Summary:\n");
        summary.push_str(&format!("  Results file: {}\n", self.filename.display()));
        summary.push_str(&format!("  Mode: {:?}\n", self.run_mode()));
        summary.push_str(&format!("  Measurements: {}\n", self.num_measurements));
        summary.push_str(&format!("  Quiet: {}\n", self.quiet));
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));

        if let Some(ref port) = self.port {
            summary.push_str(&format!("  Serial port: {}\n", port));
        }

        if let Some(ref vendor) = self.vendor {
            summary.push_str(&format!("  Vendor: {}\n", vendor));
        }

        summary
    }
}

/// Parse the positional sample count
fn parse_sample_count(s: &str) -> std::result::Result<u32, String> {
    s.parse::<u32>()
        .map_err(|_| format!("Invalid number of measurements: {}", s))
        .and_then(|count| {
            if count == 0 {
                Err("Number of measurements must be greater than 0".to_string())
            } else {
                Ok(count)
            }
        })
}

/// Parse duration from seconds string
fn parse_duration(s: &str) -> std::result::Result<u64, String> {
    // Reject strings with leading + sign or other invalid formats
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > 300 {
                Err("Duration cannot exceed 300 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

fn parse_max_attempts(s: &str) -> std::result::Result<u64, String> {
    match s.parse::<u64>() {
        Ok(0) => Err("Maximum attempts must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid attempt count: {}", s)),
    }
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

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    // Default to true on Unix-like systems, false on Windows
    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
