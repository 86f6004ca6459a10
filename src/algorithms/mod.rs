// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Combination selection algorithms.
//!
//! Each algorithm takes one batch of portion weights and picks the subset
//! whose total lands closest to the target window, under the board budget
//! tracked by the trial's [`ResourceMeter`].
//!
//! # Contract
//!
//! - `find_combination` never fails: resource exhaustion, timeouts, and
//!   empty batches all come back as flags on the [`CombinationResult`].
//! - "Best" always means minimal `|target - total|`. Ties keep whichever
//!   candidate was found first; there is no secondary ordering.
//! - Search loops are iterative with explicit iteration and time budgets;
//!   the timeout is polled, never signalled.
//!
//! The three strategies cover the classic quality/cost trade-off on a
//! small board: [`RandomSampling`] is cheap and erratic,
//! [`GreedyLocalSearch`] is the firmware default, and
//! [`DynamicProgramming`] is near-exact but memory-hungry, degrading to
//! greedy when its table does not fit.

pub mod dynamic;
pub mod greedy;
pub mod random_sampling;

pub use dynamic::DynamicProgramming;
pub use greedy::GreedyLocalSearch;
pub use random_sampling::RandomSampling;

use crate::budget::ResourceMeter;
use crate::weights::{total_at, TargetSpec};
use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// Outcome of one algorithm invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationResult {
    /// Indices into the batch of the chosen portions.
    pub selected_indices: Vec<usize>,
    /// Combined weight of the chosen portions (grams).
    pub total_weight: u32,
    /// Whether the total landed inside the tolerance band.
    pub is_success: bool,
    /// Absolute deviation from the target (grams).
    pub error_grams: u32,
    /// Simulated time the search took (ms).
    pub elapsed_ms: u64,
    /// Peak simulated memory during the search (bytes).
    pub memory_peak_bytes: usize,
    /// Search-loop iterations performed.
    pub iterations: u32,
    /// Whether the search hit the board's time budget.
    pub timed_out: bool,
    /// Deepest simulated call stack reached.
    pub stack_depth_peak: u32,
    /// Allocations the budget refused during the search.
    pub alloc_failures: u32,
}

impl CombinationResult {
    /// Build a result from a selection, deriving every dependent field.
    ///
    /// Computing `total_weight`, `error_grams`, and `is_success` here (and
    /// only here) keeps the result invariants true by construction: the
    /// total always equals the sum at the selected indices, and the success
    /// flag always agrees with the tolerance band.
    pub fn from_selection(
        weights: &[u32],
        selected_indices: Vec<usize>,
        target: &TargetSpec,
        meter: &ResourceMeter,
        iterations: u32,
        timed_out: bool,
    ) -> Self {
        let total_weight = total_at(weights, &selected_indices);
        Self {
            total_weight,
            is_success: target.within_tolerance(total_weight),
            error_grams: target.error(total_weight),
            elapsed_ms: meter.elapsed_ms(),
            memory_peak_bytes: meter.peak_bytes(),
            iterations,
            timed_out,
            stack_depth_peak: meter.peak_stack_depth(),
            alloc_failures: meter.alloc_failures(),
            selected_indices,
        }
    }

    /// Result for a search that found nothing to select.
    pub fn empty(target: &TargetSpec, meter: &ResourceMeter, timed_out: bool) -> Self {
        Self::from_selection(&[], Vec::new(), target, meter, 0, timed_out)
    }
}

/// A subset-selection strategy.
pub trait CombinationAlgorithm {
    /// Pick a subset of `weights` aiming at `target`, within the budget
    /// tracked by `meter`.
    fn find_combination(
        &mut self,
        weights: &[u32],
        target: &TargetSpec,
        meter: &mut ResourceMeter,
    ) -> CombinationResult;

    /// Stable name used in logs and reports.
    fn name(&self) -> &'static str;
}

/// The closed set of selection strategies.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumCountMacro,
    Serialize,
    Deserialize,
)]
pub enum AlgorithmKind {
    RandomSampling,
    GreedyLocalSearch,
    DynamicProgramming,
}

impl AlgorithmKind {
    /// Snake-case identifier used in report keys and CSV columns.
    pub fn id(&self) -> &'static str {
        match self {
            AlgorithmKind::RandomSampling => "random_sampling",
            AlgorithmKind::GreedyLocalSearch => "greedy_local_search",
            AlgorithmKind::DynamicProgramming => "dynamic_programming",
        }
    }

    /// Instantiate this strategy. Only random sampling consumes the seed;
    /// the other two are deterministic.
    pub fn create(&self, seed: u64) -> Box<dyn CombinationAlgorithm> {
        match self {
            AlgorithmKind::RandomSampling => Box::new(RandomSampling::new(seed)),
            AlgorithmKind::GreedyLocalSearch => Box::new(GreedyLocalSearch::new()),
            AlgorithmKind::DynamicProgramming => Box::new(DynamicProgramming::new()),
        }
    }
}
