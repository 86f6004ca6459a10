// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Experienced-operator model: tight Gaussian fills with bin levelling.
//!
//! An experienced operator portions close to the 600 g nominal (sd 40 g)
//! and, when a run of portions clusters in one part of the range, corrects
//! the next fills toward the under-used side. The correction is modeled as
//! a levelling pass over five 40 g-wide bins: surplus portions in an
//! over-represented bin are nudged one bin toward the emptier neighbor.

use crate::budget::ResourceMeter;
use crate::generators::{clamp_weight, WeightGenerator, SAMPLE_COST_INSTRUCTIONS};
use crate::weights::{WEIGHT_MAX, WEIGHT_MIN};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

/// Width of one levelling bin in grams.
const BIN_WIDTH: u32 = 40;

/// Number of levelling bins over the portion range; the inclusive top edge
/// folds into the last bin.
const BIN_COUNT: usize = ((WEIGHT_MAX - WEIGHT_MIN) / BIN_WIDTH) as usize;

const FILL_MEAN: f64 = 600.0;
const FILL_SD: f64 = 40.0;

/// Gaussian portion generator with a bin-equalization pass.
#[derive(Debug, Clone)]
pub struct ExpertGenerator {
    rng: ChaCha8Rng,
    normal: Normal<f64>,
}

impl ExpertGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            normal: Normal::new(FILL_MEAN, FILL_SD).expect("constant distribution parameters"),
        }
    }

    /// Bin index for a weight, with the top edge folded into the last bin.
    fn bin_of(weight: u32) -> usize {
        (((weight - WEIGHT_MIN) / BIN_WIDTH) as usize).min(BIN_COUNT - 1)
    }

    /// Nudge surplus portions out of over-represented bins.
    ///
    /// One pass: any bin holding more than its even share donates its extra
    /// portions to whichever adjacent bin currently holds fewer, moving each
    /// donated portion by one bin width.
    fn equalize(batch: &mut [u32]) {
        let mut counts = [0usize; BIN_COUNT];
        for &w in batch.iter() {
            counts[Self::bin_of(w)] += 1;
        }
        let share = batch.len().div_ceil(BIN_COUNT);

        for bin in 0..BIN_COUNT {
            while counts[bin] > share {
                let left = bin.checked_sub(1).map(|b| counts[b]);
                let right = (bin + 1 < BIN_COUNT).then(|| counts[bin + 1]);
                let toward_left = match (left, right) {
                    (Some(l), Some(r)) => l <= r,
                    (Some(_), None) => true,
                    (None, Some(_)) => false,
                    (None, None) => break,
                };
                let target_bin = if toward_left { bin - 1 } else { bin + 1 };
                if counts[target_bin] >= counts[bin] {
                    break;
                }
                // Move the first portion found in the surplus bin.
                let idx = batch
                    .iter()
                    .position(|&w| Self::bin_of(w) == bin)
                    .expect("count says the bin is non-empty");
                let shifted = if toward_left {
                    batch[idx] as i64 - BIN_WIDTH as i64
                } else {
                    batch[idx] as i64 + BIN_WIDTH as i64
                };
                batch[idx] = clamp_weight(shifted);
                counts[bin] -= 1;
                counts[target_bin] += 1;
            }
        }
    }
}

impl WeightGenerator for ExpertGenerator {
    fn generate(&mut self, count: usize, meter: &mut ResourceMeter) -> Vec<u32> {
        // Gaussian draw plus the levelling pass is noticeably costlier than
        // a bare RNG step.
        meter.charge(count as u64 * 3 * SAMPLE_COST_INSTRUCTIONS);
        let mut batch: Vec<u32> = (0..count)
            .map(|_| clamp_weight(self.normal.sample(&mut self.rng).round() as i64))
            .collect();
        Self::equalize(&mut batch);
        batch
    }

    fn name(&self) -> &'static str {
        "expert"
    }
}
