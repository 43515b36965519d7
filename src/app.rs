//! Main application orchestration and execution

use crate::{
    acquire::{Acquirer, AcquisitionSettings},
    cli::Cli,
    config::{display_config_summary, load_config, validate_config},
    device::{select_device, DeviceBackend, DeviceInfo, SerialBackend},
    error::Result,
    log_debug, log_warn,
    logging::{Logger, LoggerFactory},
    models::{Config, MeasurementSequence, Stats},
    output::{show_histogram, HistogramRenderer, OutputCoordinator},
    stats::StatisticsEngine,
    storage::ResultsRepository,
    types::RunMode,
};
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};

/// What a completed run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Mode the run used
    pub mode: RunMode,
    /// Measurements, in acquisition or file order
    pub measurements: MeasurementSequence,
    /// Computed (acquire) or stored (replay) statistics
    pub stats: Stats,
    /// Results file written or read
    pub results_path: PathBuf,
    /// Histogram file, when drawing it succeeded
    pub histogram_path: Option<PathBuf>,
}

/// Main application struct that coordinates all components
pub struct App<W: Write = Stdout> {
    config: Config,
    coordinator: OutputCoordinator,
    loggers: LoggerFactory,
    logger: Logger,
    out: W,
}

impl App<Stdout> {
    /// Create an application printing to stdout
    pub fn new(config: Config) -> Self {
        Self::with_output(config, io::stdout())
    }

    /// Load and validate the configuration for `cli`, printing any warnings
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let config = load_config(cli)?;
        let warnings = validate_config(&config)?;

        if config.debug {
            println!("{}", crate::build_info());
            println!("\nConfiguration Summary:");
            println!("{}", display_config_summary(&config));
            println!();
        }

        if !warnings.is_empty() && (config.verbose || config.debug) {
            for warning in &warnings {
                println!("{}", warning.format(config.enable_color));
            }
        }

        Ok(Self::new(config))
    }
}

impl<W: Write> App<W> {
    /// Create an application printing operator messages to `out`
    pub fn with_output(config: Config, out: W) -> Self {
        let loggers = LoggerFactory::new(config.clone());
        let logger = loggers.create_logger("APP");
        logger.add_context_field("results_path", config.results_path.display().to_string());
        Self {
            coordinator: OutputCoordinator::new(&config),
            config,
            loggers,
            logger,
            out,
        }
    }

    /// Configuration in effect
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Session id shared by this run's log entries
    pub fn session_id(&self) -> &str {
        self.loggers.session_id()
    }

    /// Give the output writer back
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run the mode selected in the configuration
    pub fn run(&mut self) -> Result<RunSummary> {
        match self.config.mode {
            RunMode::Acquire => self.run_acquire(&SerialBackend),
            RunMode::Replay => self.run_replay(),
        }
    }

    /// Collect measurements from a device, save them and plot them
    pub fn run_acquire<B: DeviceBackend>(&mut self, backend: &B) -> Result<RunSummary> {
        let correlation = self.logger.start_operation("acquire");

        let outcome = self.acquire_measurements(backend).and_then(|measurements| {
            let stats = StatisticsEngine::compute(&measurements)?;
            self.print_summary(&stats)?;

            let repository = ResultsRepository::new(&self.config.results_path);
            repository.write(&measurements, &stats)?;
            let saved = self.coordinator.formatter().format_success(&format!(
                "Saved results to {}",
                repository.path().display()
            ));
            self.say(&saved);

            Ok((measurements, stats))
        });

        self.logger.end_operation(&correlation, "acquire", outcome.is_ok());
        let (measurements, stats) = outcome?;

        let histogram_path = self.present(&measurements, &stats);
        Ok(RunSummary {
            mode: RunMode::Acquire,
            measurements,
            stats,
            results_path: self.config.results_path.clone(),
            histogram_path,
        })
    }

    /// Read a saved results file and plot it
    pub fn run_replay(&mut self) -> Result<RunSummary> {
        let repository = ResultsRepository::new(&self.config.results_path);
        let path = repository.path().display().to_string();

        let reading = self.coordinator.formatter().format_info(&format!("Reading data from {}", path));
        self.say(&reading);

        let (measurements, stats) = repository.read()?;
        self.logger
            .info("Loaded saved results")
            .field("path", &path)
            .field("measurements", measurements.len())
            .log();

        let obtained = self.coordinator.formatter().format_info(&format!("Obtained values from {}", path));
        self.say(&obtained);
        self.print_summary(&stats)?;

        let histogram_path = self.present(&measurements, &stats);
        Ok(RunSummary {
            mode: RunMode::Replay,
            measurements,
            stats,
            results_path: self.config.results_path.clone(),
            histogram_path,
        })
    }

    /// Find the device, open it and collect the configured number of
    /// measurements.
    ///
    /// Nothing is read and nothing is written when no device matches.
    pub fn acquire_measurements<B: DeviceBackend>(&mut self, backend: &B) -> Result<MeasurementSequence> {
        let device = self.find_device(backend)?;
        let acquisition_logger = self.loggers.create_acquisition_logger();
        acquisition_logger.logger().add_context_field("port", &device.port_name);
        acquisition_logger.log_device_selected(&device.port_name, &device.description());

        let source = backend.connect(&device, self.config.baud_rate, self.config.read_timeout())?;

        let settings = AcquisitionSettings::from_config(&self.config);
        let start = self
            .coordinator
            .formatter()
            .format_collection_start(settings.num_measurements, self.config.quiet);
        self.say(&start);

        let mut acquirer = Acquirer::new(source, settings).with_logger(acquisition_logger);
        let mut progress = self.coordinator.progress(&mut self.out);
        let result = acquirer.run(&mut progress);
        drop(progress);

        // Let trailing output settle before the port is closed
        std::thread::sleep(self.config.settle_delay());
        drop(acquirer);

        result
    }

    fn find_device<B: DeviceBackend>(&mut self, backend: &B) -> Result<DeviceInfo> {
        if let Some(port) = &self.config.port {
            log_debug!(self.logger, "Skipping discovery, port {} given explicitly", port);
            let device = DeviceInfo::from_port_name(port.clone());
            let using = self
                .coordinator
                .formatter()
                .format_info(&format!("Using serial port {}", device.port_name));
            self.say(&using);
            return Ok(device);
        }

        let devices = backend.enumerate()?;
        log_debug!(
            self.logger,
            "Found {} serial port(s): {}",
            devices.len(),
            devices.iter().map(|d| d.port_name.as_str()).collect::<Vec<_>>().join(", ")
        );

        let device = select_device(&devices, &self.config.vendor)?.clone();
        let found = self.coordinator.formatter().format_device_found(&self.config.vendor, &device);
        self.say(&found);
        Ok(device)
    }

    /// Draw the histogram and open it.
    ///
    /// Results are already on disk at this point, so failures here are
    /// reported as warnings and the run still succeeds.
    fn present(&mut self, measurements: &[f64], stats: &Stats) -> Option<PathBuf> {
        let path = self.config.histogram_path();
        let renderer = HistogramRenderer::new(self.config.histogram_bins);

        if let Err(e) = renderer.render(&path, measurements, stats) {
            self.loggers.create_error_logger().log_error(&e, Some("histogram"), None);
            let warning = self.coordinator.formatter().format_warning(&e.to_string());
            self.say(&warning);
            return None;
        }

        let saved = self
            .coordinator
            .formatter()
            .format_success(&format!("Saved histogram to {}", path.display()));
        self.say(&saved);

        if self.config.show_plot {
            self.open_histogram(&path);
        }

        Some(path)
    }

    fn open_histogram(&mut self, path: &Path) {
        if let Err(e) = show_histogram(path) {
            log_warn!(self.logger, "Histogram viewer failed for {}: {}", path.display(), e);
            let warning = self.coordinator.formatter().format_warning(&e.to_string());
            self.say(&warning);
        }
    }

    fn print_summary(&mut self, stats: &Stats) -> Result<()> {
        let summary = self.coordinator.display_summary(stats)?;
        self.say(&summary);
        Ok(())
    }

    fn say(&mut self, message: &str) {
        let _ = writeln!(self.out, "{}", message);
    }
}
