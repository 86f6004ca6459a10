// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The stock firmware RNG: a C-library linear congruential generator.
//!
//! The original firmware seeded `random()` from `millis()` XORed with a
//! floating analog pin, then folded the result into the portion range. The
//! fold keeps a mild bias: roughly one draw in ten lands in the bottom of
//! the range and one in ten at the top, which is visible in the real
//! machine's fill histograms.

use crate::budget::ResourceMeter;
use crate::generators::{WeightGenerator, SAMPLE_COST_INSTRUCTIONS};
use crate::weights::{WEIGHT_MIN, WEIGHT_SPAN};

/// glibc `rand()` multiplier and increment, as the AVR libc also uses.
const LCG_MULTIPLIER: u32 = 1103515245;
const LCG_INCREMENT: u32 = 12345;

/// Linear congruential portion generator with the stock firmware bias.
#[derive(Debug, Clone)]
pub struct ArduinoRandomGenerator {
    state: u32,
}

impl ArduinoRandomGenerator {
    /// Create a generator from a 64-bit seed.
    ///
    /// The fold of the two seed halves stands in for the firmware's
    /// `millis() ^ analogRead(A0)` seeding; the result is still fully
    /// deterministic for a given seed.
    pub fn new(seed: u64) -> Self {
        let state = (seed as u32) ^ ((seed >> 32) as u32).rotate_left(16);
        Self { state }
    }

    /// Advance the LCG and return the 15-bit output word, matching the
    /// `rand()` contract on the target libc.
    fn next_raw(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        (self.state >> 16) & 0x7fff
    }
}

impl WeightGenerator for ArduinoRandomGenerator {
    fn generate(&mut self, count: usize, meter: &mut ResourceMeter) -> Vec<u32> {
        meter.charge(count as u64 * SAMPLE_COST_INSTRUCTIONS);
        (0..count)
            .map(|_| {
                let raw = self.next_raw();
                match raw % 10 {
                    // Low-band bias: bottom 50 g of the range.
                    0 => WEIGHT_MIN + raw % 50,
                    // High-band bias: top 50 g of the range.
                    1 => WEIGHT_MIN + WEIGHT_SPAN - 1 - raw % 50,
                    _ => WEIGHT_MIN + raw % WEIGHT_SPAN,
                }
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "arduino_random"
    }
}
