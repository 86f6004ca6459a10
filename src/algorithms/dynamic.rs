// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Subset-sum dynamic programming over rounded weights.
//!
//! Near-exact but memory-hungry: the table is sized by the top of the
//! tolerance band divided by the rounding unit. Weights are rounded to a
//! 10 g unit, or 20 g when the fine table does not fit the board; if even
//! the coarse table is refused the algorithm degrades to
//! [`GreedyLocalSearch`] and returns its result unchanged.
//!
//! The table keeps one parent cell per reachable rounded sum, written only
//! on first reach. Backtracking the parent chain is therefore a pure
//! function of the finished table: reconstructing the same cell twice
//! always yields the same selection.

use crate::algorithms::{CombinationAlgorithm, CombinationResult, GreedyLocalSearch};
use crate::budget::ResourceMeter;
use crate::weights::TargetSpec;

/// Preferred rounding unit (grams).
const FINE_UNIT: u32 = 10;

/// Fallback rounding unit when the fine table does not fit (grams).
const COARSE_UNIT: u32 = 20;

/// Simulated SRAM cost of one table cell: parent item and parent sum as
/// 16-bit words plus the reachability byte.
const CELL_BYTES: usize = 5;

/// Simulated instruction cost of updating one table cell.
const CELL_COST_INSTRUCTIONS: u64 = 4;

/// Parent link: which item first reached a rounded sum, and from where.
type ParentCell = Option<(u16, u16)>;

/// Subset-sum DP with parent-pointer reconstruction.
#[derive(Debug, Clone, Default)]
pub struct DynamicProgramming;

impl DynamicProgramming {
    pub fn new() -> Self {
        Self
    }

    /// Round a weight to table units, half-up.
    fn to_units(weight: u32, unit: u32) -> usize {
        ((weight + unit / 2) / unit) as usize
    }

    /// Fill the reachability table for one rounding unit.
    ///
    /// Cells are written only on first reach, so the parent of every
    /// reachable sum is the earliest item ordering that produced it.
    /// Returns the table and whether the fill hit the time budget.
    fn fill_table(
        weights: &[u32],
        unit: u32,
        capacity: usize,
        meter: &mut ResourceMeter,
    ) -> (Vec<ParentCell>, bool) {
        let mut parent: Vec<ParentCell> = vec![None; capacity + 1];
        let mut reachable = vec![false; capacity + 1];
        reachable[0] = true;

        let mut timed_out = false;
        for (item, &w) in weights.iter().enumerate() {
            if meter.timed_out() {
                timed_out = true;
                break;
            }
            meter.charge(capacity as u64 * CELL_COST_INSTRUCTIONS);
            let units = Self::to_units(w, unit);
            if units == 0 || units > capacity {
                continue;
            }
            for s in (units..=capacity).rev() {
                if reachable[s - units] && !reachable[s] {
                    reachable[s] = true;
                    parent[s] = Some((item as u16, (s - units) as u16));
                }
            }
        }
        (parent, timed_out)
    }

    /// Reachable rounded sum closest to the target; ties keep the lower sum.
    fn best_sum(parent: &[ParentCell], target: &TargetSpec, unit: u32) -> usize {
        let mut best = 0usize;
        let mut best_error = target.error(0);
        for (s, cell) in parent.iter().enumerate() {
            if s != 0 && cell.is_none() {
                continue;
            }
            let error = target.error(s as u32 * unit);
            if error < best_error {
                best = s;
                best_error = error;
            }
        }
        best
    }

    /// Walk the parent chain from a rounded sum back to zero.
    fn backtrack(parent: &[ParentCell], mut s: usize) -> Vec<usize> {
        let mut selection = Vec::new();
        while s != 0 {
            let (item, prev) = parent[s].expect("parent chain broken below a reachable sum");
            selection.push(item as usize);
            s = prev as usize;
        }
        selection.sort_unstable();
        selection
    }
}

impl CombinationAlgorithm for DynamicProgramming {
    fn find_combination(
        &mut self,
        weights: &[u32],
        target: &TargetSpec,
        meter: &mut ResourceMeter,
    ) -> CombinationResult {
        if weights.is_empty() {
            return CombinationResult::empty(target, meter, false);
        }

        for unit in [FINE_UNIT, COARSE_UNIT] {
            let capacity = (target.upper_bound() / unit) as usize;
            let table_bytes = (capacity + 1) * CELL_BYTES;
            if meter.try_allocate(table_bytes).is_err() {
                continue;
            }

            let (parent, timed_out) = Self::fill_table(weights, unit, capacity, meter);
            let best = Self::best_sum(&parent, target, unit);
            let selection = Self::backtrack(&parent, best);

            // The firmware reconstructs the chain recursively: one frame
            // per selected item. Violations surface via the recorded peak.
            for _ in &selection {
                let _ = meter.enter_frame();
            }
            for _ in &selection {
                meter.leave_frame();
            }
            meter.free(table_bytes);

            let iterations = (weights.len() * capacity) as u32;
            return CombinationResult::from_selection(
                weights, selection, target, meter, iterations, timed_out,
            );
        }

        // Neither table fits the board: degrade to the greedy strategy.
        GreedyLocalSearch::new().find_combination(weights, target, meter)
    }

    fn name(&self) -> &'static str {
        "dynamic_programming"
    }
}
