//! Output formatting and display system
//!
//! This module provides the operator-facing console messages, in colored
//! or plain text, live acquisition progress, and the histogram.

mod formatter;
mod colored;
pub mod plot;
pub mod progress;

pub use formatter::{
    OutputFormatter,
    PlainFormatter,
    FormattingOptions,
};
pub use colored::{
    ColoredFormatter,
    ColorScheme,
    DelayLevel,
};
pub use plot::{show_histogram, Histogram, HistogramRenderer};
pub use progress::ConsoleProgress;

use crate::{
    error::Result,
    models::{Config, Stats},
};
use std::io::Write;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a formatter from the application configuration
    pub fn from_config(config: &Config) -> Box<dyn OutputFormatter> {
        Self::create_formatter(
            config.enable_color && ColoredFormatter::supports_color(),
            config.verbose,
        )
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}

/// Main output coordinator that handles all console display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    config: Config,
}

impl OutputCoordinator {
    /// Create a coordinator for `config`
    pub fn new(config: &Config) -> Self {
        Self {
            formatter: OutputFormatterFactory::from_config(config),
            config: config.clone(),
        }
    }

    /// Create a coordinator with an explicit formatter
    pub fn with_formatter(formatter: Box<dyn OutputFormatter>, config: &Config) -> Self {
        Self {
            formatter,
            config: config.clone(),
        }
    }

    /// The formatter used for all messages
    pub fn formatter(&self) -> &dyn OutputFormatter {
        self.formatter.as_ref()
    }

    /// Statistics summary block
    pub fn display_summary(&self, stats: &Stats) -> Result<String> {
        self.formatter.format_stats_summary(stats)
    }

    /// Progress observer for an acquisition run, writing to `out`
    pub fn progress<W: Write>(&self, out: W) -> ConsoleProgress<W> {
        ConsoleProgress::new(
            out,
            OutputFormatterFactory::from_config(&self.config),
            self.config.echo_mode(),
            self.config.read_timeout(),
            self.config.verbose,
        )
    }
}
