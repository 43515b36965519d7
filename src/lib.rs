//! G2G Delay Recorder
//!
//! Collects glass-to-glass delay readings from a phototransistor-based
//! measurement device streaming newline-delimited values over a serial link,
//! computes descriptive statistics, saves them to a CSV results file and
//! renders a histogram. Previously saved results can be replayed for
//! re-plotting.

pub mod acquire;
pub mod app;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod stats;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use acquire::{Acquirer, AcquisitionSettings, AcquisitionObserver, LineClass, classify_line};
pub use app::App;
pub use device::{DeviceBackend, DeviceInfo, LineSource, ReadOutcome, BufferLineSource, SerialBackend};
pub use error::{AppError, Result};
pub use models::{Config, Measurement, MeasurementSequence, Stats};
pub use stats::StatisticsEngine;
pub use storage::ResultsRepository;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information set by build.rs
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");

/// One-line version banner with build details
pub fn build_info() -> String {
    format!("{} v{} ({}, {}, built {})", PKG_NAME, VERSION, GIT_COMMIT, TARGET_TRIPLE, BUILD_TIME)
}

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_RESULTS_FILE: &str = "results.csv";
    pub const DEFAULT_SAMPLE_COUNT: u32 = 100;
    pub const DEFAULT_VENDOR: &str = "Arduino";
    pub const DEFAULT_BAUD_RATE: u32 = 115_200;
    /// Read timeout of the serial line source
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);
    /// Window during which stale device output is discarded before counting
    pub const DEFAULT_DRAIN_WINDOW: Duration = Duration::from_millis(10);
    /// Pause after acquisition so trailing device output settles
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);
    pub const DEFAULT_HISTOGRAM_BINS: usize = 20;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    pub const RESULTS_EXTENSION: &str = "csv";
    pub const HISTOGRAM_EXTENSION: &str = "svg";
}
