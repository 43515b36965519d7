//! Configuration validation utilities and rules

use crate::{
    models::Config,
    error::Result,
    types::RunMode,
};

/// Baud rates commonly configured in device firmware
const STANDARD_BAUD_RATES: &[u32] = &[
    300, 1200, 2400, 4800, 9600, 19_200, 38_400, 57_600, 115_200, 230_400, 250_000, 460_800, 500_000, 921_600, 1_000_000, 2_000_000,
];

/// Configuration validator with advisory rules on top of `Config::validate`
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        // Hard errors first
        config.validate()?;

        warnings.extend(Self::validate_mode_settings(config));
        warnings.extend(Self::validate_serial_settings(config));
        warnings.extend(Self::validate_output_settings(config));

        Ok(warnings)
    }

    /// Settings that only make sense in one of the two modes
    fn validate_mode_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        match config.mode {
            RunMode::Replay => {
                if config.sample_count != crate::defaults::DEFAULT_SAMPLE_COUNT {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("Sample count {} is ignored in replay mode; the file decides", config.sample_count),
                    ));
                }
                if config.port.is_some() {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        "Serial port setting is ignored in replay mode".to_string(),
                    ));
                }
            }
            RunMode::Acquire => {
                if config.sample_count > 10_000 {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!("{} measurements will take a long time to collect", config.sample_count),
                    ));
                }
                if config.results_path.exists() {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!("'{}' already exists and will be overwritten", config.results_path.display()),
                    ));
                }
            }
        }

        warnings
    }

    /// Serial link settings
    fn validate_serial_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if !STANDARD_BAUD_RATES.contains(&config.baud_rate) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Baud rate {} is non-standard; make sure the firmware uses the same value", config.baud_rate),
            ));
        }

        if let Some(max_attempts) = config.max_attempts {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Acquisition gives up after {} consecutive reads without a measurement (about {}s of silence)",
                    max_attempts,
                    max_attempts.saturating_mul(config.read_timeout_seconds)
                ),
            ));
        }

        warnings
    }

    /// Console and plot settings
    fn validate_output_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.quiet && config.verbose {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "--quiet only affects the per-sample echo; verbose diagnostics are still shown".to_string(),
            ));
        }

        if config.histogram_bins as u64 > u64::from(config.sample_count) && config.mode == RunMode::Acquire {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "{} histogram bins for {} measurements will leave most bins empty",
                    config.histogram_bins, config.sample_count
                ),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::Info => "INFO",
            ValidationLevel::Warning => "WARN",
        }
    }
}

/// Validation warning with level and message
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            use colored::Colorize;
            let tag = match self.level {
                ValidationLevel::Info => self.level.as_str().cyan(),
                ValidationLevel::Warning => self.level.as_str().yellow(),
            };
            format!("[{}] {}", tag, self.message)
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
