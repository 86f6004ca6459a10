// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! New-operator model: a preferred band that widens with fatigue.
//!
//! A new operator aims most portions at a narrow comfort band around the
//! nominal fill and scatters the rest across the whole range. As the shift
//! wears on the aim loosens: a fatigue counter ticks up every hundred
//! batches and widens the band on both sides. Portion order is shuffled so
//! the banded fills do not cluster at the front of the batch.

use crate::budget::ResourceMeter;
use crate::generators::{WeightGenerator, SAMPLE_COST_INSTRUCTIONS};
use crate::weights::{WEIGHT_MAX, WEIGHT_MIN};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Initial comfort band in grams.
const BAND_LOW: u32 = 580;
const BAND_HIGH: u32 = 620;

/// Grams of widening per fatigue point, each side.
const FATIGUE_SPREAD: u32 = 5;

/// Batches per fatigue increment.
const BATCHES_PER_FATIGUE: u64 = 100;

/// Fraction of portions aimed at the comfort band.
const BAND_FRACTION: f64 = 0.6;

/// Fatiguing-operator portion generator.
#[derive(Debug, Clone)]
pub struct BeginnerGenerator {
    rng: ChaCha8Rng,
    batches: u64,
}

impl BeginnerGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            batches: 0,
        }
    }

    /// Fatigue level after the batches drawn so far.
    fn fatigue(&self) -> u32 {
        (self.batches / BATCHES_PER_FATIGUE) as u32
    }

    /// Current comfort band, widened by fatigue and clamped to the range.
    fn band(&self) -> (u32, u32) {
        let spread = self.fatigue() * FATIGUE_SPREAD;
        (
            BAND_LOW.saturating_sub(spread).max(WEIGHT_MIN),
            (BAND_HIGH + spread).min(WEIGHT_MAX),
        )
    }
}

impl WeightGenerator for BeginnerGenerator {
    fn generate(&mut self, count: usize, meter: &mut ResourceMeter) -> Vec<u32> {
        meter.charge(count as u64 * SAMPLE_COST_INSTRUCTIONS);
        let (low, high) = self.band();
        let mut batch: Vec<u32> = (0..count)
            .map(|_| {
                if self.rng.gen_bool(BAND_FRACTION) {
                    self.rng.gen_range(low..=high)
                } else {
                    self.rng.gen_range(WEIGHT_MIN..=WEIGHT_MAX)
                }
            })
            .collect();
        batch.shuffle(&mut self.rng);
        self.batches += 1;
        batch
    }

    fn name(&self) -> &'static str {
        "beginner"
    }
}
