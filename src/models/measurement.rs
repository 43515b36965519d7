//! Measurement and statistics data models

use serde::{Deserialize, Serialize};

/// A single glass-to-glass delay reading in milliseconds
pub type Measurement = f64;

/// Ordered readings, in acquisition or file order
pub type MeasurementSequence = Vec<Measurement>;

/// Summary statistics over a measurement sequence.
///
/// Either derived by [`crate::stats::StatisticsEngine::compute`] or
/// reconstructed verbatim from a results file, in which case the invariants
/// (`min <= median <= max`, `min <= mean <= max`, `std_dev >= 0`) are trusted
/// rather than re-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of measurements
    pub count: usize,
    /// Smallest delay (ms)
    pub min: f64,
    /// Largest delay (ms)
    pub max: f64,
    /// Arithmetic mean (ms)
    pub mean: f64,
    /// Median (ms)
    pub median: f64,
    /// Population standard deviation (ms)
    pub std_dev: f64,
}

impl Stats {
    /// Column names of the statistics row, in file order
    pub const COLUMNS: [&'static str; 6] = ["Samples", "Min", "Max", "Mean", "Median", "stdDev"];

    /// Values in file column order
    pub fn to_row(&self) -> [f64; 6] {
        [
            self.count as f64,
            self.min,
            self.max,
            self.mean,
            self.median,
            self.std_dev,
        ]
    }

    /// Format the two-line summary shown after acquisition or replay
    pub fn summary_lines(&self) -> (String, String) {
        (
            format!(
                "min: {:.2} ms | max: {:.2} ms | median: {:.2} ms",
                self.min, self.max, self.median
            ),
            format!("mean: {:.2} ms | std_dev: {:.2} ms", self.mean, self.std_dev),
        )
    }

    /// Check the ordering invariants of a freshly computed snapshot
    pub fn is_consistent(&self) -> bool {
        self.min <= self.median
            && self.median <= self.max
            && self.min <= self.mean
            && self.mean <= self.max
            && self.std_dev >= 0.0
    }
}
