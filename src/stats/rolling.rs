//! Streaming statistics for progress display

/// Running count, extremes, mean and deviation of a stream of values.
///
/// Uses Welford's update so the variance stays accurate over long runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingStats {
    count: usize,
    mean: f64,
    m2: f64,
    min_value: f64,
    max_value: f64,
}

impl RollingStats {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min_value: f64::INFINITY,
            max_value: f64::NEG_INFINITY,
        }
    }

    /// Add a value
    pub fn add_value(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);

        self.min_value = self.min_value.min(value);
        self.max_value = self.max_value.max(value);
    }

    /// Number of values seen
    pub fn count(&self) -> usize {
        self.count
    }

    /// Current mean, 0 when empty
    pub fn average(&self) -> f64 {
        self.mean
    }

    /// Current population variance
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    /// Current population standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Smallest value so far
    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min_value)
    }

    /// Largest value so far
    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max_value)
    }

    /// Reset all values
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for RollingStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatisticsEngine;

    #[test]
    fn test_empty_tracker() {
        let rolling = RollingStats::new();
        assert_eq!(rolling.count(), 0);
        assert_eq!(rolling.average(), 0.0);
        assert_eq!(rolling.std_dev(), 0.0);
        assert_eq!(rolling.min(), None);
        assert_eq!(rolling.max(), None);
    }

    #[test]
    fn test_matches_batch_statistics() {
        let values = [12.0, 15.5, 11.25, 30.0, 18.75, 14.0];
        let mut rolling = RollingStats::new();
        for v in values {
            rolling.add_value(v);
        }

        let batch = StatisticsEngine::compute(&values).unwrap();
        assert_eq!(rolling.count(), batch.count);
        assert_eq!(rolling.min(), Some(batch.min));
        assert_eq!(rolling.max(), Some(batch.max));
        assert!((rolling.average() - batch.mean).abs() < 1e-9);
        assert!((rolling.std_dev() - batch.std_dev).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let mut rolling = RollingStats::new();
        rolling.add_value(3.0);
        rolling.reset();
        assert_eq!(rolling, RollingStats::new());
    }
}
