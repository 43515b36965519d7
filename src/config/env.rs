//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                println!("Loaded configuration from .env file");
            }
        } else if debug {
            println!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# G2G Delay Recorder Configuration
#
# Values here act as defaults and can be overridden by command-line arguments.

# Serial port of the measurement device; leave unset to search by vendor
# G2G_PORT=/dev/ttyACM0

# Substring of the USB manufacturer/description used to find the device
# G2G_VENDOR=Arduino

# Serial baud rate (must match the firmware)
# G2G_BAUD_RATE=115200

# Seconds to wait for a line before reporting a stall
# G2G_READ_TIMEOUT=5

# Milliseconds of stale output discarded before counting starts
# G2G_DRAIN_WINDOW_MS=10

# Milliseconds to wait after the last sample before closing the port
# G2G_SETTLE_DELAY_MS=100

# Give up after this many consecutive reads without a measurement
# (unset = wait until interrupted)
# G2G_MAX_ATTEMPTS=12

# Number of histogram bins
# G2G_HISTOGRAM_BINS=20

# Enable colored output (true/false)
# G2G_ENABLE_COLOR=true
"#.to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "G2G_PORT" | "G2G_VENDOR" => {
                if value.trim().is_empty() {
                    return Err(AppError::config(format!("{} cannot be empty", key)));
                }
            }
            "G2G_BAUD_RATE" => {
                let baud: u32 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid G2G_BAUD_RATE value '{}': {}", value, e)))?;
                if baud == 0 {
                    return Err(AppError::config("G2G_BAUD_RATE must be greater than 0"));
                }
            }
            "G2G_READ_TIMEOUT" => {
                let timeout: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid G2G_READ_TIMEOUT value '{}': {}", value, e)))?;
                if timeout == 0 || timeout > 300 {
                    return Err(AppError::config(format!("G2G_READ_TIMEOUT must be between 1 and 300, got: {}", timeout)));
                }
            }
            "G2G_DRAIN_WINDOW_MS" | "G2G_SETTLE_DELAY_MS" => {
                value.parse::<u64>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            "G2G_MAX_ATTEMPTS" => {
                let attempts: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid G2G_MAX_ATTEMPTS value '{}': {}", value, e)))?;
                if attempts == 0 {
                    return Err(AppError::config("G2G_MAX_ATTEMPTS must be at least 1"));
                }
            }
            "G2G_HISTOGRAM_BINS" => {
                let bins: usize = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid G2G_HISTOGRAM_BINS value '{}': {}", value, e)))?;
                if bins == 0 || bins > 1000 {
                    return Err(AppError::config(format!("G2G_HISTOGRAM_BINS must be between 1 and 1000, got: {}", bins)));
                }
            }
            "G2G_ENABLE_COLOR" => {
                value.parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid G2G_ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("G2G_PORT", "Serial port of the device (skips discovery)", "/dev/ttyACM0"),
            ("G2G_VENDOR", "Vendor substring used for discovery", "Arduino"),
            ("G2G_BAUD_RATE", "Serial baud rate", "115200"),
            ("G2G_READ_TIMEOUT", "Read timeout in seconds (1-300)", "5"),
            ("G2G_DRAIN_WINDOW_MS", "Stale output drain window in ms", "10"),
            ("G2G_SETTLE_DELAY_MS", "Delay before closing the port in ms", "100"),
            ("G2G_MAX_ATTEMPTS", "Consecutive empty reads before giving up", "12"),
            ("G2G_HISTOGRAM_BINS", "Histogram bin count (1-1000)", "20"),
            ("G2G_ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<20} {}\n", var, description));
            help.push_str(&format!("  {:<20} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        let mut warnings = Vec::new();

        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(var_name) {
                if let Err(e) = Self::validate_env_var(var_name, &value) {
                    warnings.push(format!("Warning: {}", e));
                }
            }
        }

        warnings
    }
}
