//! Statistics over delay measurements

pub mod rolling;

pub use rolling::RollingStats;

use crate::error::{AppError, Result};
use crate::models::{Measurement, Stats};
use std::cmp::Ordering;

/// Computes the fixed statistic set of a run
#[derive(Debug, Default, Clone, Copy)]
pub struct StatisticsEngine;

impl StatisticsEngine {
    /// Compute count, min, max, mean, median and population standard
    /// deviation of `measurements`.
    ///
    /// The input must not be empty.
    pub fn compute(measurements: &[Measurement]) -> Result<Stats> {
        if measurements.is_empty() {
            return Err(AppError::statistics("Cannot compute statistics of zero measurements"));
        }
        if measurements.iter().any(|v| !v.is_finite()) {
            return Err(AppError::statistics("Measurements contain NaN or infinite values"));
        }

        let (min, max) = measurements
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        let mean = Self::mean(measurements).clamp(min, max);
        let median = Self::median(measurements);
        let std_dev = Self::population_std_dev(measurements, mean);

        Ok(Stats {
            count: measurements.len(),
            min,
            max,
            mean,
            median,
            std_dev,
        })
    }

    /// Arithmetic mean
    pub fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Middle element, or the mean of the two middle elements
    pub fn median(values: &[f64]) -> f64 {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }

    /// Standard deviation with divisor N
    pub fn population_std_dev(values: &[f64], mean: f64) -> f64 {
        let variance = values
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / values.len() as f64;

        variance.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_example() {
        let stats = StatisticsEngine::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert!((stats.std_dev - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_population_not_sample_deviation() {
        // Sample deviation of [2, 4] would be sqrt(2)
        let stats = StatisticsEngine::compute(&[2.0, 4.0]).unwrap();
        assert_eq!(stats.std_dev, 1.0);
    }

    #[test]
    fn test_even_length_median_averages_middle_pair() {
        let stats = StatisticsEngine::compute(&[40.0, 10.0, 30.0, 20.0]).unwrap();
        assert_eq!(stats.median, 25.0);
    }

    #[test]
    fn test_single_measurement() {
        let stats = StatisticsEngine::compute(&[16.7]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 16.7);
        assert_eq!(stats.max, 16.7);
        assert_eq!(stats.mean, 16.7);
        assert_eq!(stats.median, 16.7);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let a = StatisticsEngine::compute(&[3.0, 1.0, 2.0]).unwrap();
        let b = StatisticsEngine::compute(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input_is_error() {
        let error = StatisticsEngine::compute(&[]).unwrap_err();
        assert!(matches!(error, AppError::Statistics(_)));
    }
}

// Property and edge case tests in separate module
#[cfg(test)]
mod comprehensive_tests;
