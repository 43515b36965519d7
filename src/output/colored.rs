//! Colored formatter implementation with terminal color support
//!
//! Wraps the plain formatter's wording in ANSI colors, and colors each
//! echoed measurement by how large the delay is.

use crate::{
    device::DeviceInfo,
    error::Result,
    models::Stats,
    stats::RollingStats,
    types::StallKind,
};
use super::formatter::{stall_message, FormattingOptions, OutputFormatter, PlainFormatter};
use colored::*;
use std::time::Duration;

/// Delay classification for color coding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DelayLevel {
    Excellent,  // < 50ms
    Good,       // 50-100ms
    Fair,       // 100-200ms
    Poor,       // 200-400ms
    VeryPoor,   // > 400ms
}

impl DelayLevel {
    /// Determine the level of a glass-to-glass delay in milliseconds
    pub fn from_delay(delay_ms: f64) -> Self {
        if delay_ms < 50.0 {
            Self::Excellent
        } else if delay_ms < 100.0 {
            Self::Good
        } else if delay_ms < 200.0 {
            Self::Fair
        } else if delay_ms < 400.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    /// Get color for this level
    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Magenta,
            Self::VeryPoor => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Apply dimmed formatting if colors are enabled
    fn dimmed(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.dimmed()
        } else {
            text.normal()
        }
    }

    /// Format a delay as the device spelled it, colored by level
    fn format_delay_colored(&self, delay_ms: f64, text: &str) -> ColoredString {
        let level = DelayLevel::from_delay(delay_ms);
        self.colorize(&format!("{} ms", text), level.color())
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_device_found(&self, vendor: &str, device: &DeviceInfo) -> String {
        format!(
            "Found {} device at {}",
            self.bold(vendor),
            self.colorize(&device.port_name, self.color_scheme.info)
        ) + &if self.options.verbose_mode {
            format!(" {}", self.dimmed(&format!("({})", device.description())))
        } else {
            String::new()
        }
    }

    fn format_collection_start(&self, count: usize, quiet: bool) -> String {
        let mut output = format!(
            "Collecting {} measurements from the device",
            self.bold(&count.to_string())
        );
        if quiet {
            output.push('\n');
            output.push_str(
                &self
                    .dimmed("Running in quiet mode, won't print the measurements to the terminal")
                    .to_string(),
            );
        }
        output
    }

    fn format_trial(&self, index: usize, total: usize, value: f64, text: &str) -> String {
        format!(
            "G2G Delay trial {}/{}: {}",
            index,
            total,
            self.format_delay_colored(value, text)
        )
    }

    fn format_trial_progress(&self, index: usize, total: usize) -> String {
        self.plain_formatter.format_trial_progress(index, total)
    }

    fn format_stall(&self, kind: StallKind, timeout: Duration) -> String {
        let message = stall_message(kind, timeout);
        match kind {
            StallKind::First => self.colorize(&message, self.color_scheme.warning).to_string(),
            StallKind::Repeated => self.colorize(&message, self.color_scheme.muted).to_string(),
        }
    }

    fn format_noise(&self, line: &str) -> String {
        self.dimmed(&self.plain_formatter.format_noise(line)).to_string()
    }

    fn format_running_stats(&self, rolling: &RollingStats) -> String {
        self.dimmed(&self.plain_formatter.format_running_stats(rolling)).to_string()
    }

    fn format_stats_summary(&self, stats: &Stats) -> Result<String> {
        let summary = self.plain_formatter.format_stats_summary(stats)?;
        Ok(self.colorize(&summary, self.color_scheme.info).to_string())
    }

    fn format_error(&self, error: &str) -> String {
        format!("❌ {}", self.colorize(error, self.color_scheme.error))
    }

    fn format_warning(&self, warning: &str) -> String {
        format!("⚠️  {}", self.colorize(warning, self.color_scheme.warning))
    }

    fn format_success(&self, message: &str) -> String {
        format!("✅ {}", self.colorize(message, self.color_scheme.success))
    }

    fn format_info(&self, message: &str) -> String {
        self.colorize(message, self.color_scheme.info).to_string()
    }
}

/// Helper functions for color management
impl ColoredFormatter {
    /// Check if terminal supports colors
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        std::env::var("TERM").map(|term| term != "dumb").unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(enable_color: bool) -> FormattingOptions {
        FormattingOptions {
            enable_color,
            verbose_mode: false,
        }
    }

    #[test]
    fn test_delay_levels() {
        assert_eq!(DelayLevel::from_delay(16.7), DelayLevel::Excellent);
        assert_eq!(DelayLevel::from_delay(75.0), DelayLevel::Good);
        assert_eq!(DelayLevel::from_delay(150.0), DelayLevel::Fair);
        assert_eq!(DelayLevel::from_delay(250.0), DelayLevel::Poor);
        assert_eq!(DelayLevel::from_delay(1000.0), DelayLevel::VeryPoor);
        assert_eq!(DelayLevel::Excellent.color(), Color::Green);
    }

    #[test]
    fn test_colors_disabled_keeps_wording() {
        let formatter = ColoredFormatter::new(options(false));
        assert_eq!(formatter.format_trial(1, 2, 20.5, "20.50"), "G2G Delay trial 1/2: 20.50 ms");
        assert!(formatter.format_stall(StallKind::First, Duration::from_secs(5)).contains("5 seconds"));
    }

    #[test]
    fn test_colors_enabled_adds_escape_codes() {
        colored::control::set_override(true);
        let formatter = ColoredFormatter::new(options(true));
        let trial = formatter.format_trial(1, 2, 20.5, "20.5");
        colored::control::unset_override();

        assert!(trial.contains("\x1b["));
        assert!(trial.contains("20.5 ms"));
    }

    #[test]
    fn test_quiet_progress_is_uncolored() {
        let formatter = ColoredFormatter::new(options(true));
        assert_eq!(formatter.format_trial_progress(4, 10), "G2G Delay trial 4/10");
    }
}
