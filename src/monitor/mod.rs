// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Performance aggregation across (generator, algorithm) pairs.
//!
//! The monitor owns one [`PairMetrics`] per pair, updated as trials
//! complete and read out at the end of a run for rankings and report
//! export. Violations are tallied in a counter array indexed by the
//! [`Violation`] enum.
//!
//! Aggregation is keyed by a `BTreeMap`, so iteration (and therefore
//! every report) comes out in a stable order regardless of completion
//! order.

pub mod metrics;

pub use metrics::LatencyStats;

use crate::algorithms::{AlgorithmKind, CombinationResult};
use crate::budget::BoardProfile;
use crate::generators::GeneratorKind;
use std::collections::BTreeMap;
use strum::EnumCount;
use strum_macros::EnumCount as EnumCountMacro;

/// A (generator, algorithm) pairing under test.
pub type PairKey = (GeneratorKind, AlgorithmKind);

/// Constraint violations a trial can record.
#[derive(EnumCountMacro, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Violation {
    /// The search hit the board's time budget.
    Timeout,
    /// The simulated stack went past the depth ceiling.
    StackOverflow,
    /// At least one allocation was refused by the memory budget.
    MemoryExceeded,
    /// The algorithm panicked; the trial was discarded.
    TrialPanic,
}

/// Per-pair violation tallies.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViolationCounters {
    counts: [u64; Violation::COUNT],
}

impl ViolationCounters {
    /// Increment the given counter by 1.
    fn increment(&mut self, violation: Violation) {
        self.counts[violation as usize] += 1;
    }

    /// Current value of the given counter.
    pub fn get(&self, violation: Violation) -> u64 {
        self.counts[violation as usize]
    }

    /// Whether any violation was recorded.
    pub fn any(&self) -> bool {
        self.counts.iter().any(|&c| c > 0)
    }
}

/// Running aggregates for one (generator, algorithm) pair.
///
/// Created on the pair's first trial, mutated per trial, read at export.
#[derive(Debug, Default, Clone)]
pub struct PairMetrics {
    trials: u64,
    successes: u64,
    error_sum: u64,
    max_error: u32,
    times_ms: Vec<u64>,
    peak_memory_bytes: usize,
    violations: ViolationCounters,
}

impl PairMetrics {
    /// Fold one trial outcome into the aggregates.
    fn record(&mut self, result: &CombinationResult, profile: &BoardProfile) {
        self.trials += 1;
        if result.is_success {
            self.successes += 1;
        }
        self.error_sum += result.error_grams as u64;
        self.max_error = self.max_error.max(result.error_grams);
        self.times_ms.push(result.elapsed_ms);
        self.peak_memory_bytes = self.peak_memory_bytes.max(result.memory_peak_bytes);

        if result.timed_out {
            self.violations.increment(Violation::Timeout);
        }
        if result.stack_depth_peak > profile.max_stack_depth {
            self.violations.increment(Violation::StackOverflow);
        }
        if result.alloc_failures > 0 {
            self.violations.increment(Violation::MemoryExceeded);
        }
    }

    /// Count a panicked trial. Nothing else is known about it.
    fn record_panic(&mut self) {
        self.trials += 1;
        self.violations.increment(Violation::TrialPanic);
    }

    /// Trials recorded for this pair, panics included.
    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Fraction of trials that landed in the tolerance band.
    pub fn success_rate(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.successes as f64 / self.trials as f64
    }

    /// Mean error over all trials (grams).
    pub fn avg_error(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.error_sum as f64 / self.trials as f64
    }

    /// Largest single-trial error (grams).
    pub fn max_error(&self) -> u32 {
        self.max_error
    }

    /// Latency summary over the recorded trial times.
    pub fn time_stats(&self) -> LatencyStats {
        LatencyStats::from_measurements(&self.times_ms)
    }

    /// Highest simulated memory peak across trials (KiB).
    pub fn memory_peak_kb(&self) -> f64 {
        self.peak_memory_bytes as f64 / 1024.0
    }

    /// Violation tallies for this pair.
    pub fn violations(&self) -> &ViolationCounters {
        &self.violations
    }

    /// Whether this pair ran clean on the simulated board: no violations
    /// and a memory peak inside the budget.
    pub fn board_compatible(&self, profile: &BoardProfile) -> bool {
        !self.violations.any() && self.peak_memory_bytes <= profile.available_bytes()
    }
}

/// Aggregates trial outcomes for every pair in a run.
#[derive(Debug)]
pub struct PerformanceMonitor {
    profile: BoardProfile,
    pairs: BTreeMap<PairKey, PairMetrics>,
}

impl PerformanceMonitor {
    /// Create a monitor judging violations against the given board.
    pub fn new(profile: BoardProfile) -> Self {
        Self {
            profile,
            pairs: BTreeMap::new(),
        }
    }

    /// The board the run is simulated on.
    pub fn profile(&self) -> &BoardProfile {
        &self.profile
    }

    /// Record one completed trial.
    pub fn record(
        &mut self,
        generator: GeneratorKind,
        algorithm: AlgorithmKind,
        result: &CombinationResult,
    ) {
        let profile = self.profile.clone();
        self.pairs
            .entry((generator, algorithm))
            .or_default()
            .record(result, &profile);
    }

    /// Record a trial whose algorithm panicked.
    pub fn record_panic(&mut self, generator: GeneratorKind, algorithm: AlgorithmKind) {
        self.pairs
            .entry((generator, algorithm))
            .or_default()
            .record_panic();
    }

    /// Metrics for one pair, if it has recorded any trials.
    pub fn metrics(&self, generator: GeneratorKind, algorithm: AlgorithmKind) -> Option<&PairMetrics> {
        self.pairs.get(&(generator, algorithm))
    }

    /// All pairs in key order.
    pub fn pairs(&self) -> impl Iterator<Item = (&PairKey, &PairMetrics)> {
        self.pairs.iter()
    }

    /// Pairs ranked best-first: success rate descending, then average
    /// error ascending, then key order.
    pub fn rankings(&self) -> Vec<(PairKey, &PairMetrics)> {
        let mut ranked: Vec<_> = self.pairs.iter().map(|(k, m)| (*k, m)).collect();
        ranked.sort_by(|(ka, a), (kb, b)| {
            b.success_rate()
                .total_cmp(&a.success_rate())
                .then(a.avg_error().total_cmp(&b.avg_error()))
                .then(ka.cmp(kb))
        });
        ranked
    }

    /// Total trials recorded across all pairs.
    pub fn total_trials(&self) -> u64 {
        self.pairs.values().map(|m| m.trials()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::ResourceMeter;
    use crate::weights::TargetSpec;

    fn result_with_error(error: u32) -> CombinationResult {
        let meter = ResourceMeter::new(BoardProfile::default());
        let target = TargetSpec::default();
        let weights = [target.target_grams + error];
        CombinationResult::from_selection(&weights, vec![0], &target, &meter, 1, false)
    }

    #[test]
    fn test_record_updates_aggregates() {
        let mut monitor = PerformanceMonitor::new(BoardProfile::default());
        let pair = (GeneratorKind::XorShift32, AlgorithmKind::GreedyLocalSearch);

        monitor.record(pair.0, pair.1, &result_with_error(0));
        monitor.record(pair.0, pair.1, &result_with_error(50));
        monitor.record(pair.0, pair.1, &result_with_error(200));

        let metrics = monitor.metrics(pair.0, pair.1).unwrap();
        assert_eq!(metrics.trials(), 3);
        // 0 and 50 are inside the default 70 g band, 200 is not.
        assert!((metrics.success_rate() - 2.0 / 3.0).abs() < 1e-9);
        assert!((metrics.avg_error() - 250.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.max_error(), 200);
    }

    #[test]
    fn test_violations_from_result_flags() {
        let mut monitor = PerformanceMonitor::new(BoardProfile::default());
        let pair = (GeneratorKind::Expert, AlgorithmKind::DynamicProgramming);

        let mut result = result_with_error(0);
        result.timed_out = true;
        result.alloc_failures = 2;
        monitor.record(pair.0, pair.1, &result);

        let violations = monitor.metrics(pair.0, pair.1).unwrap().violations();
        assert_eq!(violations.get(Violation::Timeout), 1);
        // One violation per trial however many allocations were refused.
        assert_eq!(violations.get(Violation::MemoryExceeded), 1);
        assert_eq!(violations.get(Violation::StackOverflow), 0);
    }

    #[test]
    fn test_panic_counts_as_trial() {
        let mut monitor = PerformanceMonitor::new(BoardProfile::default());
        let pair = (GeneratorKind::Beginner, AlgorithmKind::RandomSampling);
        monitor.record_panic(pair.0, pair.1);
        monitor.record(pair.0, pair.1, &result_with_error(0));

        let metrics = monitor.metrics(pair.0, pair.1).unwrap();
        assert_eq!(metrics.trials(), 2);
        assert!((metrics.success_rate() - 0.5).abs() < 1e-9);
        assert_eq!(metrics.violations().get(Violation::TrialPanic), 1);
        assert!(!metrics.board_compatible(monitor.profile()));
    }

    #[test]
    fn test_rankings_order() {
        let mut monitor = PerformanceMonitor::new(BoardProfile::default());
        let good = (GeneratorKind::XorShift32, AlgorithmKind::DynamicProgramming);
        let poor = (GeneratorKind::ArduinoRandom, AlgorithmKind::RandomSampling);

        monitor.record(good.0, good.1, &result_with_error(0));
        monitor.record(poor.0, poor.1, &result_with_error(500));

        let ranked = monitor.rankings();
        assert_eq!(ranked[0].0, good);
        assert_eq!(ranked[1].0, poor);
    }

    #[test]
    fn test_clean_pair_is_board_compatible() {
        let mut monitor = PerformanceMonitor::new(BoardProfile::default());
        let pair = (GeneratorKind::Hybrid, AlgorithmKind::GreedyLocalSearch);
        monitor.record(pair.0, pair.1, &result_with_error(10));
        assert!(monitor
            .metrics(pair.0, pair.1)
            .unwrap()
            .board_compatible(monitor.profile()));
    }
}
