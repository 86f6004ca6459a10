// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Rotating-crew model: the fill distribution changes every hundred draws.
//!
//! Models a line where whoever is free takes over the hopper station.
//! Each worker has a distinct fill habit; the model cycles through five of
//! them, switching after every hundred portions drawn.

use crate::budget::ResourceMeter;
use crate::generators::{clamp_weight, WeightGenerator, SAMPLE_COST_INSTRUCTIONS};
use crate::weights::{WEIGHT_MAX, WEIGHT_MIN};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

/// Portions drawn before the next worker takes over.
const SAMPLES_PER_SHIFT: u64 = 100;

/// The five fill habits, in rotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FillHabit {
    Uniform,
    Centered,
    Bimodal,
    SkewLow,
    SkewHigh,
}

const ROTATION: [FillHabit; 5] = [
    FillHabit::Uniform,
    FillHabit::Centered,
    FillHabit::Bimodal,
    FillHabit::SkewLow,
    FillHabit::SkewHigh,
];

/// Portion generator cycling through five fill distributions.
#[derive(Debug, Clone)]
pub struct RandomWorkerGenerator {
    rng: ChaCha8Rng,
    centered: Normal<f64>,
    low_mode: Normal<f64>,
    high_mode: Normal<f64>,
    samples_drawn: u64,
}

impl RandomWorkerGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            centered: Normal::new(600.0, 50.0).expect("constant distribution parameters"),
            low_mode: Normal::new(550.0, 20.0).expect("constant distribution parameters"),
            high_mode: Normal::new(650.0, 20.0).expect("constant distribution parameters"),
            samples_drawn: 0,
        }
    }

    /// Habit of the worker currently on station.
    fn current_habit(&self) -> FillHabit {
        ROTATION[((self.samples_drawn / SAMPLES_PER_SHIFT) % ROTATION.len() as u64) as usize]
    }

    fn draw(&mut self) -> u32 {
        let habit = self.current_habit();
        self.samples_drawn += 1;
        match habit {
            FillHabit::Uniform => self.rng.gen_range(WEIGHT_MIN..=WEIGHT_MAX),
            FillHabit::Centered => clamp_weight(self.centered.sample(&mut self.rng).round() as i64),
            FillHabit::Bimodal => {
                let mode = if self.rng.gen_bool(0.5) {
                    self.low_mode
                } else {
                    self.high_mode
                };
                clamp_weight(mode.sample(&mut self.rng).round() as i64)
            }
            FillHabit::SkewLow => {
                let u: f64 = self.rng.gen();
                clamp_weight((WEIGHT_MIN as f64 + u * u * 200.0).round() as i64)
            }
            FillHabit::SkewHigh => {
                let u: f64 = self.rng.gen();
                clamp_weight((WEIGHT_MAX as f64 - u * u * 200.0).round() as i64)
            }
        }
    }
}

impl WeightGenerator for RandomWorkerGenerator {
    fn generate(&mut self, count: usize, meter: &mut ResourceMeter) -> Vec<u32> {
        meter.charge(count as u64 * 2 * SAMPLE_COST_INSTRUCTIONS);
        (0..count).map(|_| self.draw()).collect()
    }

    fn name(&self) -> &'static str {
        "random_worker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::BoardProfile;

    #[test]
    fn test_deterministic_for_same_seed() {
        let mut meter = ResourceMeter::new(BoardProfile::default());
        let mut a = RandomWorkerGenerator::new(404);
        let mut b = RandomWorkerGenerator::new(404);
        assert_eq!(a.generate(250, &mut meter), b.generate(250, &mut meter));
    }

    #[test]
    fn test_values_in_range() {
        let mut meter = ResourceMeter::new(BoardProfile::default());
        let mut generator = RandomWorkerGenerator::new(8);
        // Long enough to pass through every habit in the rotation.
        for w in generator.generate(600, &mut meter) {
            assert!((WEIGHT_MIN..=WEIGHT_MAX).contains(&w));
        }
    }

    #[test]
    fn test_rotation_advances_per_sample() {
        let mut meter = ResourceMeter::new(BoardProfile::default());
        let mut generator = RandomWorkerGenerator::new(15);
        assert_eq!(generator.current_habit(), FillHabit::Uniform);
        generator.generate(100, &mut meter);
        assert_eq!(generator.current_habit(), FillHabit::Centered);
        generator.generate(100, &mut meter);
        assert_eq!(generator.current_habit(), FillHabit::Bimodal);
        // A full rotation returns to the first habit.
        generator.generate(300, &mut meter);
        assert_eq!(generator.current_habit(), FillHabit::Uniform);
    }

    #[test]
    fn test_skew_low_shift_leans_low() {
        let mut meter = ResourceMeter::new(BoardProfile::default());
        let mut generator = RandomWorkerGenerator::new(16);
        // Skip to the skew-low shift (fourth in the rotation).
        generator.generate(300, &mut meter);
        let batch = generator.generate(100, &mut meter);
        let below_mid = batch.iter().filter(|&&w| w < 600).count();
        assert!(below_mid > batch.len() / 2, "{} below midpoint", below_mid);
    }
}
