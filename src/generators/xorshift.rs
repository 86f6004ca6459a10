// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Marsaglia's 32-bit xorshift, the smallest usable firmware RNG.
//!
//! Four bytes of state, three shifts per draw. The replacement firmware
//! used this over `random()` to save both SRAM and cycles.

use crate::budget::ResourceMeter;
use crate::generators::{WeightGenerator, SAMPLE_COST_INSTRUCTIONS};
use crate::weights::{WEIGHT_MIN, WEIGHT_SPAN};

/// Fallback seed when the caller passes zero; xorshift is stuck at zero
/// forever otherwise.
const NONZERO_SEED: u32 = 0x9E37_79B9;

/// XorShift32 portion generator.
#[derive(Debug, Clone)]
pub struct XorShift32Generator {
    state: u32,
}

impl XorShift32Generator {
    /// Create a generator; a zero seed is remapped to a fixed constant.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { NONZERO_SEED } else { seed },
        }
    }

    /// One in-range weight without meter accounting, for composition by
    /// generators that do their own charging.
    pub(crate) fn raw_weight(&mut self) -> u32 {
        WEIGHT_MIN + self.next_raw() % WEIGHT_SPAN
    }

    /// One xorshift step (13/17/5 variant).
    fn next_raw(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl WeightGenerator for XorShift32Generator {
    fn generate(&mut self, count: usize, meter: &mut ResourceMeter) -> Vec<u32> {
        meter.charge(count as u64 * SAMPLE_COST_INSTRUCTIONS);
        (0..count)
            .map(|_| WEIGHT_MIN + self.next_raw() % WEIGHT_SPAN)
            .collect()
    }

    fn name(&self) -> &'static str {
        "xorshift32"
    }
}
