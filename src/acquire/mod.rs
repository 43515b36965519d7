//! Measurement acquisition
//!
//! Drives a [`LineSource`] until exactly the requested number of delay
//! readings has been accepted. Stale output is drained first, noise and
//! silence are tolerated, and every step is reported to an
//! [`AcquisitionObserver`] so the console can keep the operator informed.

pub mod classify;
pub mod state;

pub use classify::{classify_line, LineClass};
pub use state::{AcquisitionEvent, AcquisitionState};

use crate::device::LineSource;
use crate::error::{AppError, Result};
use crate::logging::AcquisitionLogger;
use crate::models::{Config, Measurement, MeasurementSequence};
use crate::types::StallKind;
use std::time::{Duration, Instant};

/// Parameters of one acquisition run
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionSettings {
    /// Measurements to collect
    pub num_measurements: usize,
    /// Timeout of each read
    pub read_timeout: Duration,
    /// How long stale output is discarded before counting
    pub drain_window: Duration,
    /// Abort after this many unproductive reads in a row
    pub max_attempts: Option<u64>,
}

impl AcquisitionSettings {
    /// Settings for `num_measurements` with default timings
    pub fn new(num_measurements: usize) -> Self {
        Self {
            num_measurements,
            read_timeout: crate::defaults::DEFAULT_READ_TIMEOUT,
            drain_window: crate::defaults::DEFAULT_DRAIN_WINDOW,
            max_attempts: None,
        }
    }

    /// Settings taken from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            num_measurements: config.sample_count as usize,
            read_timeout: config.read_timeout(),
            drain_window: config.drain_window(),
            max_attempts: config.max_attempts,
        }
    }

    /// Set the attempt ceiling
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

/// Receives progress notifications during acquisition
pub trait AcquisitionObserver {
    /// Called once before the drain phase
    fn on_start(&mut self, _target: usize) {}

    /// Called after stale output was discarded
    fn on_drained(&mut self, _discarded: usize) {}

    /// Called for every accepted measurement; `index` is 1-based and `text`
    /// is the reading as the device printed it
    fn on_measurement(&mut self, index: usize, target: usize, value: Measurement, text: &str);

    /// Called for every read that produced no measurement
    fn on_stall(&mut self, kind: StallKind, noise: Option<&str>);

    /// Called once all measurements are in
    fn on_complete(&mut self, _collected: usize) {}
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl AcquisitionObserver for SilentObserver {
    fn on_measurement(&mut self, _index: usize, _target: usize, _value: Measurement, _text: &str) {}

    fn on_stall(&mut self, _kind: StallKind, _noise: Option<&str>) {}
}

/// Collects measurements from a line source.
///
/// The acquirer owns its source for the duration of the run; dropping it
/// closes the connection.
pub struct Acquirer<S: LineSource> {
    source: S,
    settings: AcquisitionSettings,
    logger: Option<AcquisitionLogger>,
}

impl<S: LineSource> Acquirer<S> {
    /// Create an acquirer over `source`
    pub fn new(source: S, settings: AcquisitionSettings) -> Self {
        Self {
            source,
            settings,
            logger: None,
        }
    }

    /// Attach a diagnostic logger
    pub fn with_logger(mut self, logger: AcquisitionLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Settings of this acquirer
    pub fn settings(&self) -> &AcquisitionSettings {
        &self.settings
    }

    /// Give the source back, e.g. to inspect what was left unread
    pub fn into_source(self) -> S {
        self.source
    }

    /// Run the acquisition to completion.
    ///
    /// Returns exactly `num_measurements` values in the order they were
    /// read. Fails on a dotted line that is not a number, on a closed
    /// source, and when the attempt ceiling is exceeded.
    pub fn run(&mut self, observer: &mut dyn AcquisitionObserver) -> Result<MeasurementSequence> {
        let started = Instant::now();
        let target = self.settings.num_measurements;
        observer.on_start(target);

        let discarded = self.source.discard_pending(self.settings.drain_window)?;
        if let Some(logger) = &self.logger {
            logger.log_drain(discarded, self.settings.drain_window);
        }
        observer.on_drained(discarded);

        let mut state = AcquisitionState::new(target);
        while !state.is_complete() {
            let outcome = self.source.read_line(self.settings.read_timeout)?;

            match state.apply(outcome)? {
                AcquisitionEvent::Accepted { index, value, text } => {
                    if let Some(logger) = &self.logger {
                        logger.log_measurement(index, target, value);
                    }
                    observer.on_measurement(index, target, value, &text);
                }
                AcquisitionEvent::Stall { kind, attempts, noise } => {
                    if let Some(logger) = &self.logger {
                        if let Some(line) = &noise {
                            logger.log_noise(line, attempts);
                        }
                        logger.log_stall(kind, attempts, state.consecutive_misses());
                    }
                    observer.on_stall(kind, noise.as_deref());
                    self.check_attempt_ceiling(&state)?;
                }
            }
        }

        if let Some(logger) = &self.logger {
            logger.log_complete(state.accepted(), state.attempts(), started.elapsed());
        }
        observer.on_complete(state.accepted());

        Ok(state.into_measurements())
    }

    fn check_attempt_ceiling(&self, state: &AcquisitionState) -> Result<()> {
        match self.settings.max_attempts {
            Some(max) if state.consecutive_misses() >= max => Err(AppError::device(format!(
                "No measurement in {} consecutive reads ({} of {} collected); giving up",
                state.consecutive_misses(),
                state.accepted(),
                state.target()
            ))),
            _ => Ok(()),
        }
    }
}
