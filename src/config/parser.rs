//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    models::Config,
    error::Result,
    config::env::EnvManager,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // The results path is checked before any file is touched, .env included
        self.cli.validate()?;

        let mut config = Config::default();

        self.load_env_file()?;

        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Load .env file if it exists
    fn load_env_file(&self) -> Result<()> {
        EnvManager::load_env_file(self.cli.debug)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        config.results_path = self.cli.filename.clone();
        config.sample_count = self.cli.num_measurements;
        config.mode = self.cli.run_mode();
        config.quiet = self.cli.quiet;

        if let Some(ref port) = self.cli.port {
            config.port = Some(port.clone());
        }

        if let Some(ref vendor) = self.cli.vendor {
            config.vendor = vendor.clone();
        }

        if let Some(baud) = self.cli.baud {
            config.baud_rate = baud;
        }

        if let Some(timeout) = self.cli.timeout {
            config.read_timeout_seconds = timeout;
        }

        if let Some(max_attempts) = self.cli.max_attempts {
            config.max_attempts = Some(max_attempts);
        }

        if let Some(bins) = self.cli.bins {
            config.histogram_bins = bins;
        }

        if self.cli.no_show {
            config.show_plot = false;
        }

        if self.cli.color {
            config.enable_color = true;
        } else if self.cli.no_color {
            config.enable_color = false;
        }

        // Verbose and debug are CLI-only
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            println!("Applied CLI overrides to configuration");
            println!("Final config: mode={:?}, samples={}, timeout={}s, enable_color={}",
                    config.mode, config.sample_count, config.read_timeout_seconds, config.enable_color);
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Results file: {}", config.results_path.display()));
    summary.push(format!("Histogram file: {}", config.histogram_path().display()));
    summary.push(format!("Mode: {:?}", config.mode));
    summary.push(format!("Measurements: {}", config.sample_count));
    summary.push(format!(
        "Serial port: {}",
        config.port.as_deref().unwrap_or("auto-detect")
    ));
    summary.push(format!("Vendor: {}", config.vendor));
    summary.push(format!("Baud rate: {}", config.baud_rate));
    summary.push(format!("Read timeout: {}s", config.read_timeout_seconds));
    summary.push(format!(
        "Max attempts: {}",
        config.max_attempts.map(|n| n.to_string()).unwrap_or_else(|| "unlimited".to_string())
    ));
    summary.push(format!("Histogram bins: {}", config.histogram_bins));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
