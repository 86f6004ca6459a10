// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Test orchestration: generator × algorithm pairs, N trials each.
//!
//! The runner owns nothing the trials share: every pair gets its own
//! seeded generator, its own algorithm instance, and its own
//! [`ResourceMeter`], reset between trials. Pairs are therefore fully
//! independent; the sequential loop below could fan out across a worker
//! pool without touching the aggregation, which stays single-writer in
//! the [`PerformanceMonitor`].
//!
//! An algorithm panic is contained with `catch_unwind`, counted as a
//! failed trial, and the run continues. Nothing a trial does can abort
//! the run.

use crate::algorithms::AlgorithmKind;
use crate::budget::{BoardProfile, ResourceMeter};
use crate::generators::GeneratorKind;
use crate::monitor::{PairKey, PerformanceMonitor};
use crate::weights::{TargetSpec, BATCH_SIZE};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

/// Preset run sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSize {
    /// 100 trials per pair.
    Quick,
    /// 1000 trials per pair.
    Standard,
    /// 10_000 trials per pair.
    Full,
    /// Head-to-head of the three algorithms on the xorshift generator,
    /// 1000 trials each.
    Benchmark,
}

impl RunSize {
    /// Default trials per pair for this size.
    pub fn trials_per_pair(&self) -> u64 {
        match self {
            RunSize::Quick => 100,
            RunSize::Standard => 1000,
            RunSize::Full => 10_000,
            RunSize::Benchmark => 1000,
        }
    }

    /// Stable label used in logs and the JSON report.
    pub fn label(&self) -> &'static str {
        match self {
            RunSize::Quick => "quick",
            RunSize::Standard => "standard",
            RunSize::Full => "full",
            RunSize::Benchmark => "benchmark",
        }
    }
}

impl FromStr for RunSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quick" => Ok(RunSize::Quick),
            "standard" => Ok(RunSize::Standard),
            "full" => Ok(RunSize::Full),
            "benchmark" => Ok(RunSize::Benchmark),
            other => Err(format!(
                "unknown run size '{other}' (expected quick, standard, full, or benchmark)"
            )),
        }
    }
}

/// Parameters for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub size: RunSize,
    pub trials_per_pair: u64,
    pub base_seed: u64,
    pub items_per_trial: usize,
    pub target: TargetSpec,
    pub profile: BoardProfile,
}

impl RunConfig {
    /// Defaults for a run size: full batch, default board and target.
    pub fn new(size: RunSize) -> Self {
        Self {
            size,
            trials_per_pair: size.trials_per_pair(),
            base_seed: 42,
            items_per_trial: BATCH_SIZE,
            target: TargetSpec::default(),
            profile: BoardProfile::default(),
        }
    }
}

/// Drives trials across all configured pairs and aggregates outcomes.
#[derive(Debug)]
pub struct TestRunner {
    config: RunConfig,
}

impl TestRunner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// The run's configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The pairs this run covers: the full cross product, or the curated
    /// algorithm head-to-head for [`RunSize::Benchmark`].
    pub fn pairs(&self) -> Vec<PairKey> {
        match self.config.size {
            RunSize::Benchmark => AlgorithmKind::iter()
                .map(|algorithm| (GeneratorKind::XorShift32, algorithm))
                .collect(),
            _ => GeneratorKind::iter()
                .flat_map(|generator| {
                    AlgorithmKind::iter().map(move |algorithm| (generator, algorithm))
                })
                .collect(),
        }
    }

    /// Run every pair for the configured number of trials.
    pub fn run(&self) -> PerformanceMonitor {
        let mut monitor = PerformanceMonitor::new(self.config.profile.clone());
        let pairs = self.pairs();
        info!(
            size = self.config.size.label(),
            pairs = pairs.len(),
            trials_per_pair = self.config.trials_per_pair,
            "starting run"
        );

        for (pair_index, &(generator_kind, algorithm_kind)) in pairs.iter().enumerate() {
            let seed = pair_seed(self.config.base_seed, pair_index);
            let mut generator = generator_kind.create(seed);
            let mut algorithm = algorithm_kind.create(seed ^ 0x5EED);
            let mut meter = ResourceMeter::new(self.config.profile.clone());

            for trial in 0..self.config.trials_per_pair {
                meter.reset();
                let weights = generator.generate(self.config.items_per_trial, &mut meter);
                let target = self.config.target;

                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    algorithm.find_combination(&weights, &target, &mut meter)
                }));
                match outcome {
                    Ok(result) => monitor.record(generator_kind, algorithm_kind, &result),
                    Err(_) => {
                        warn!(
                            generator = generator_kind.id(),
                            algorithm = algorithm_kind.id(),
                            trial,
                            "algorithm panicked; counting trial as failed"
                        );
                        monitor.record_panic(generator_kind, algorithm_kind);
                    }
                }
            }

            let metrics = monitor
                .metrics(generator_kind, algorithm_kind)
                .expect("pair just recorded trials");
            debug!(
                generator = generator_kind.id(),
                algorithm = algorithm_kind.id(),
                success_rate = metrics.success_rate(),
                avg_error = metrics.avg_error(),
                "pair complete"
            );
        }

        info!(total_trials = monitor.total_trials(), "run complete");
        monitor
    }
}

/// Per-pair seed derivation: one splitmix64 round over the base seed and
/// the pair's position, so pairs stay independent and reproducible.
fn pair_seed(base_seed: u64, pair_index: usize) -> u64 {
    let mut z = base_seed
        .wrapping_add((pair_index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
