// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Latency statistics over recorded per-trial times.

use serde::{Deserialize, Serialize};

/// Summary statistics over a set of simulated trial times (ms).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Minimum time (ms).
    pub min: u64,
    /// Maximum time (ms).
    pub max: u64,
    /// Mean time (ms).
    pub mean: f64,
    /// Median time (ms).
    pub p50: u64,
    /// 95th-percentile time (ms).
    pub p95: u64,
}

impl LatencyStats {
    /// Compute stats from a list of measurements.
    ///
    /// Percentiles use nearest-rank over a sorted copy; an empty input
    /// yields the all-zero default.
    pub fn from_measurements(measurements: &[u64]) -> Self {
        if measurements.is_empty() {
            return Self::default();
        }

        let mut sorted = measurements.to_vec();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean: sum as f64 / sorted.len() as f64,
            p50: percentile(&sorted, 50),
            p95: percentile(&sorted, 95),
        }
    }
}

/// Nearest-rank percentile over an already-sorted slice.
fn percentile(sorted: &[u64], p: u32) -> u64 {
    let idx = (p as f64 / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_measurements() {
        assert_eq!(LatencyStats::from_measurements(&[]), LatencyStats::default());
    }

    #[test]
    fn test_basic_stats() {
        let stats = LatencyStats::from_measurements(&[100, 200, 300, 400, 500]);
        assert_eq!(stats.min, 100);
        assert_eq!(stats.max, 500);
        assert!((stats.mean - 300.0).abs() < f64::EPSILON);
        assert_eq!(stats.p50, 300);
    }

    #[test]
    fn test_percentiles_over_hundred_values() {
        let values: Vec<u64> = (1..=100).collect();
        let stats = LatencyStats::from_measurements(&values);
        // Nearest-rank over indices 0..=99: p50 -> index 50, p95 -> index 94.
        assert_eq!(stats.p50, 51);
        assert_eq!(stats.p95, 95);
    }

    #[test]
    fn test_single_measurement() {
        let stats = LatencyStats::from_measurements(&[42]);
        assert_eq!(stats.min, 42);
        assert_eq!(stats.max, 42);
        assert_eq!(stats.p50, 42);
        assert_eq!(stats.p95, 42);
    }
}
