//! Statistics kernel
//!
//! Pure numeric helpers shared by the analyzers: summary statistics,
//! least-squares trend fitting, and sample-size confidence bucketing.

use serde::{Deserialize, Serialize};

/// Summary statistics for a sample set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    /// Arithmetic mean (0 for an empty sample)
    pub mean: f64,
    /// Population standard deviation (0 for an empty sample)
    pub std_dev: f64,
    /// Smallest sample, absent when the set is empty
    pub min: Option<f64>,
    /// Largest sample, absent when the set is empty
    pub max: Option<f64>,
}

/// Compute mean, population standard deviation, min and max.
pub fn sample_stats(values: &[f64]) -> SampleStats {
    if values.is_empty() {
        return SampleStats {
            mean: 0.0,
            std_dev: 0.0,
            min: None,
            max: None,
        };
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    let mut min = values[0];
    let mut max = values[0];
    for &v in values {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }

    SampleStats {
        mean,
        std_dev: variance.sqrt(),
        min: Some(min),
        max: Some(max),
    }
}

/// Least-squares slope of `y = a + b*x` over `x = 1..=N`.
///
/// Samples are treated as unit-spaced ordinals regardless of the wall-clock
/// gap between them, so the result reads as "change per sample". Projection
/// horizons therefore multiply the slope by a unit count (24 hours, 168
/// hours, 7 days), never by elapsed time. Irregular sampling intervals skew
/// projections accordingly; callers accept that as a known limitation.
///
/// Returns 0 for fewer than two samples.
pub fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let nf = n as f64;
    let sum_x = nf * (nf + 1.0) / 2.0;
    let sum_x2 = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 6.0;
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values
        .iter()
        .enumerate()
        .map(|(i, y)| (i as f64 + 1.0) * y)
        .sum();

    (nf * sum_xy - sum_x * sum_y) / (nf * sum_x2 - sum_x * sum_x)
}

/// Coarse reliability label derived from sample count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Confidence {
    /// Bucket a sample count: <10 low, <50 medium, <100 high, else very high
    pub fn from_sample_size(n: usize) -> Self {
        if n < 10 {
            Confidence::Low
        } else if n < 50 {
            Confidence::Medium
        } else if n < 100 {
            Confidence::High
        } else {
            Confidence::VeryHigh
        }
    }

    /// String representation used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
            Confidence::VeryHigh => "very_high",
        }
    }
}

/// Round to two decimal places, matching the precision of reported values.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stats_empty() {
        let stats = sample_stats(&[]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.min, None);
        assert_eq!(stats.max, None);
    }

    #[test]
    fn test_sample_stats_basic() {
        let stats = sample_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((stats.mean - 5.0).abs() < 1e-9);
        // Population std dev, not sample std dev
        assert!((stats.std_dev - 2.0).abs() < 1e-9);
        assert_eq!(stats.min, Some(2.0));
        assert_eq!(stats.max, Some(9.0));
    }

    #[test]
    fn test_sample_stats_invariants() {
        let sets: [&[f64]; 4] = [
            &[1.0],
            &[3.0, 3.0, 3.0],
            &[-5.0, 0.0, 5.0],
            &[100.0, 100.0, 100.0, 5000.0],
        ];

        for values in sets {
            let stats = sample_stats(values);
            assert!(stats.std_dev >= 0.0);
            let min = stats.min.unwrap();
            let max = stats.max.unwrap();
            assert!(min <= stats.mean && stats.mean <= max);
        }
    }

    #[test]
    fn test_spike_scenario_stats() {
        let mut values = vec![100.0; 9];
        values.push(5000.0);

        let stats = sample_stats(&values);
        assert!((stats.mean - 590.0).abs() < 1e-9);
        // sqrt(mean of squared deviations) for the 9x100 + 1x5000 set
        assert!((stats.std_dev - 1470.0).abs() < 1.0);
    }

    #[test]
    fn test_slope_of_arithmetic_sequence_is_common_difference() {
        let values: Vec<f64> = (0..11).map(|i| 100.0 + 10.0 * i as f64).collect();
        let slope = least_squares_slope(&values);
        assert!((slope - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_slope_of_constant_sequence_is_zero() {
        let slope = least_squares_slope(&[42.0; 20]);
        assert!(slope.abs() < 1e-9);
    }

    #[test]
    fn test_slope_of_short_sequence_is_zero() {
        assert_eq!(least_squares_slope(&[]), 0.0);
        assert_eq!(least_squares_slope(&[7.0]), 0.0);
    }

    #[test]
    fn test_slope_of_decreasing_sequence_is_negative() {
        let values: Vec<f64> = (0..10).map(|i| 100.0 - 3.0 * i as f64).collect();
        assert!(least_squares_slope(&values) < 0.0);
    }

    #[test]
    fn test_confidence_buckets() {
        assert_eq!(Confidence::from_sample_size(0), Confidence::Low);
        assert_eq!(Confidence::from_sample_size(9), Confidence::Low);
        assert_eq!(Confidence::from_sample_size(10), Confidence::Medium);
        assert_eq!(Confidence::from_sample_size(49), Confidence::Medium);
        assert_eq!(Confidence::from_sample_size(50), Confidence::High);
        assert_eq!(Confidence::from_sample_size(99), Confidence::High);
        assert_eq!(Confidence::from_sample_size(100), Confidence::VeryHigh);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(-1.234), -1.23);
        assert_eq!(round2(10.0), 10.0);
    }
}
