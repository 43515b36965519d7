//! Comprehensive tests for statistical calculations
//!
//! This module contains property-based tests and edge case testing
//! for the statistics engine and the rolling tracker.

use super::{RollingStats, StatisticsEngine};
use crate::error::AppError;
use proptest::prelude::*;
use proptest::collection::vec;

/// Property-based test generators
mod generators {
    use super::*;

    /// Plausible glass-to-glass delays in milliseconds
    pub fn delays() -> impl Strategy<Value = f64> {
        0.001f64..10000.0
    }

    /// Non-empty measurement sequences
    pub fn sequences() -> impl Strategy<Value = Vec<f64>> {
        vec(delays(), 1..500)
    }
}

/// Test mathematical properties of statistical calculations
mod property_tests {
    use super::*;

    proptest! {
        /// Count always equals the input length
        #[test]
        fn count_matches_length(numbers in generators::sequences()) {
            let stats = StatisticsEngine::compute(&numbers).unwrap();
            prop_assert_eq!(stats.count, numbers.len());
        }

        /// Every element lies within [min, max]
        #[test]
        fn elements_within_extremes(numbers in generators::sequences()) {
            let stats = StatisticsEngine::compute(&numbers).unwrap();
            for &value in &numbers {
                prop_assert!(stats.min <= value && value <= stats.max);
            }
        }

        /// Mean and median never leave [min, max]
        #[test]
        fn central_values_within_extremes(numbers in generators::sequences()) {
            let stats = StatisticsEngine::compute(&numbers).unwrap();
            prop_assert!(stats.min <= stats.mean && stats.mean <= stats.max);
            prop_assert!(stats.min <= stats.median && stats.median <= stats.max);
            prop_assert!(stats.is_consistent());
        }

        /// Standard deviation is non-negative and finite
        #[test]
        fn standard_deviation_non_negative(numbers in generators::sequences()) {
            let stats = StatisticsEngine::compute(&numbers).unwrap();
            prop_assert!(stats.std_dev >= 0.0);
            prop_assert!(stats.std_dev.is_finite());
        }

        /// Constant input has zero spread and mean equal to the value
        #[test]
        fn constant_sequence(value in generators::delays(), len in 1usize..200) {
            let numbers = vec![value; len];
            let stats = StatisticsEngine::compute(&numbers).unwrap();
            prop_assert_eq!(stats.mean, value);
            prop_assert_eq!(stats.median, value);
            prop_assert_eq!(stats.std_dev, 0.0);
        }

        /// Shuffling the input does not change the result
        #[test]
        fn order_independent(numbers in generators::sequences()) {
            let mut reversed = numbers.clone();
            reversed.reverse();
            let a = StatisticsEngine::compute(&numbers).unwrap();
            let b = StatisticsEngine::compute(&reversed).unwrap();
            prop_assert_eq!(a.min, b.min);
            prop_assert_eq!(a.max, b.max);
            prop_assert_eq!(a.median, b.median);
            prop_assert!((a.mean - b.mean).abs() <= 1e-9 * a.max.max(1.0));
        }

        /// Rolling tracker agrees with the batch computation
        #[test]
        fn rolling_matches_batch(numbers in generators::sequences()) {
            let mut rolling = RollingStats::new();
            for &value in &numbers {
                rolling.add_value(value);
            }
            let stats = StatisticsEngine::compute(&numbers).unwrap();
            prop_assert_eq!(rolling.min(), Some(stats.min));
            prop_assert_eq!(rolling.max(), Some(stats.max));
            prop_assert!((rolling.average() - stats.mean).abs() <= 1e-6 * stats.max.max(1.0));
            prop_assert!((rolling.std_dev() - stats.std_dev).abs() <= 1e-6 * stats.max.max(1.0));
        }
    }
}

/// Edge cases
mod edge_case_tests {
    use super::*;

    #[test]
    fn test_empty_sequence() {
        assert!(matches!(StatisticsEngine::compute(&[]), Err(AppError::Statistics(_))));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(matches!(StatisticsEngine::compute(&[1.0, f64::NAN]), Err(AppError::Statistics(_))));
    }

    #[test]
    fn test_infinity_rejected() {
        let overflowing: f64 = format!("{}.0", "9".repeat(400)).parse().unwrap();
        assert!(overflowing.is_infinite());

        for values in [vec![1.0, overflowing], vec![f64::NEG_INFINITY, 2.0]] {
            let error = StatisticsEngine::compute(&values).unwrap_err();
            assert!(matches!(error, AppError::Statistics(_)));
            assert!(error.to_string().contains("infinite"));
        }
    }

    #[test]
    fn test_repeating_decimal_mean_stays_in_range() {
        // 0.1 * 3 sums to slightly above 0.3
        let stats = StatisticsEngine::compute(&[0.1, 0.1, 0.1]).unwrap();
        assert_eq!(stats.mean, 0.1);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_negative_values_are_accepted() {
        let stats = StatisticsEngine::compute(&[-2.0, 2.0]).unwrap();
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.median, 0.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    fn test_large_sequence() {
        let numbers: Vec<f64> = (1..=10_000).map(f64::from).collect();
        let stats = StatisticsEngine::compute(&numbers).unwrap();
        assert_eq!(stats.count, 10_000);
        assert_eq!(stats.median, 5000.5);
        assert_eq!(stats.mean, 5000.5);
    }
}
