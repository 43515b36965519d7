//! Acquisition accumulator
//!
//! The read loop folds every [`ReadOutcome`] into an [`AcquisitionState`],
//! which decides what the outcome means and what the operator should see.
//! Nothing here touches a device, so the whole decision logic is testable
//! from scripted outcomes.

use super::classify::{classify_line, LineClass};
use crate::device::ReadOutcome;
use crate::error::{AppError, Result};
use crate::models::{Measurement, MeasurementSequence};
use crate::types::StallKind;

/// What applying one read outcome produced
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionEvent {
    /// A measurement was accepted; `index` is 1-based and `text` is the
    /// reading as the device printed it
    Accepted {
        index: usize,
        value: Measurement,
        text: String,
    },
    /// The read produced no measurement
    Stall {
        kind: StallKind,
        attempts: u64,
        noise: Option<String>,
    },
}

/// Running state of one acquisition
#[derive(Debug, Clone)]
pub struct AcquisitionState {
    target: usize,
    measurements: MeasurementSequence,
    attempts: u64,
    consecutive_misses: u64,
    operator_briefed: bool,
}

impl AcquisitionState {
    /// Start collecting `target` measurements
    pub fn new(target: usize) -> Self {
        Self {
            target,
            measurements: Vec::with_capacity(target),
            attempts: 0,
            consecutive_misses: 0,
            operator_briefed: false,
        }
    }

    /// Fold one read outcome into the state.
    ///
    /// Must not be called once [`is_complete`](Self::is_complete) is true.
    pub fn apply(&mut self, outcome: ReadOutcome) -> Result<AcquisitionEvent> {
        let noise = match outcome {
            ReadOutcome::Closed => {
                return Err(AppError::device(format!(
                    "device disconnected after {} of {} measurements",
                    self.measurements.len(),
                    self.target
                )));
            }
            ReadOutcome::TimedOut => None,
            ReadOutcome::Line(raw) => match classify_line(&raw)? {
                LineClass::Measurement { value, text } => return Ok(self.accept(value, text)),
                LineClass::Noise(text) => Some(text),
                LineClass::Empty => None,
            },
        };

        self.attempts += 1;
        self.consecutive_misses += 1;

        let kind = if self.operator_briefed {
            StallKind::Repeated
        } else {
            StallKind::First
        };
        self.operator_briefed = true;

        Ok(AcquisitionEvent::Stall {
            kind,
            attempts: self.attempts,
            noise,
        })
    }

    fn accept(&mut self, value: Measurement, text: String) -> AcquisitionEvent {
        self.measurements.push(value);
        self.consecutive_misses = 0;
        // Once data has flowed the operator only needs the short reminder
        self.operator_briefed = true;
        AcquisitionEvent::Accepted {
            index: self.measurements.len(),
            value,
            text,
        }
    }

    /// Whether the target count has been reached
    pub fn is_complete(&self) -> bool {
        self.measurements.len() >= self.target
    }

    /// Measurements accepted so far
    pub fn accepted(&self) -> usize {
        self.measurements.len()
    }

    /// Requested measurement count
    pub fn target(&self) -> usize {
        self.target
    }

    /// Unproductive reads over the whole run
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Unproductive reads since the last accepted measurement
    pub fn consecutive_misses(&self) -> u64 {
        self.consecutive_misses
    }

    /// Collected measurements in acquisition order
    pub fn into_measurements(self) -> MeasurementSequence {
        self.measurements
    }
}
