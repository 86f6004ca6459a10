// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Weight generators: the six portion-filling models.
//!
//! Each generator simulates one model of how portions land in the hoppers,
//! from raw firmware RNGs ([`ArduinoRandomGenerator`], [`XorShift32Generator`])
//! through sensor-noise hybrids to operator-behavior models
//! ([`ExpertGenerator`], [`BeginnerGenerator`], [`RandomWorkerGenerator`]).
//!
//! All generators:
//! - produce exactly `count` integer gram values in
//!   [[`WEIGHT_MIN`], [`WEIGHT_MAX`]],
//! - are deterministic given their seed,
//! - charge simulated instruction cost on the trial's [`ResourceMeter`],
//! - assume a single caller (one generator per (pair, trial) sequence).
//!
//! The closed [`GeneratorKind`] enum is the registry: iterate it to
//! enumerate the models, call [`GeneratorKind::create`] to instantiate one.

pub mod arduino;
pub mod beginner;
pub mod expert;
pub mod hybrid;
pub mod worker;
pub mod xorshift;

pub use arduino::ArduinoRandomGenerator;
pub use beginner::BeginnerGenerator;
pub use expert::ExpertGenerator;
pub use hybrid::HybridGenerator;
pub use worker::RandomWorkerGenerator;
pub use xorshift::XorShift32Generator;

use crate::budget::ResourceMeter;
use crate::weights::{WEIGHT_MAX, WEIGHT_MIN};
use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// Simulated instruction cost of drawing one portion weight.
///
/// Rough cycle count of one RNG step plus the range fold on the target
/// board; the exact figure only matters relative to the algorithm costs.
pub(crate) const SAMPLE_COST_INSTRUCTIONS: u64 = 48;

/// A source of portion weights for one weighing cycle.
pub trait WeightGenerator {
    /// Produce `count` portion weights, charging the meter for the work.
    fn generate(&mut self, count: usize, meter: &mut ResourceMeter) -> Vec<u32>;

    /// Stable name used in logs and reports.
    fn name(&self) -> &'static str;
}

/// The closed set of generator models.
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
pub enum GeneratorKind {
    ArduinoRandom,
    XorShift32,
    Hybrid,
    Expert,
    Beginner,
    RandomWorker,
}

impl GeneratorKind {
    /// Snake-case identifier used in report keys and CSV columns.
    pub fn id(&self) -> &'static str {
        match self {
            GeneratorKind::ArduinoRandom => "arduino_random",
            GeneratorKind::XorShift32 => "xorshift32",
            GeneratorKind::Hybrid => "hybrid",
            GeneratorKind::Expert => "expert",
            GeneratorKind::Beginner => "beginner",
            GeneratorKind::RandomWorker => "random_worker",
        }
    }

    /// Instantiate this model with the given seed.
    pub fn create(&self, seed: u64) -> Box<dyn WeightGenerator> {
        match self {
            GeneratorKind::ArduinoRandom => Box::new(ArduinoRandomGenerator::new(seed)),
            GeneratorKind::XorShift32 => Box::new(XorShift32Generator::new(seed as u32)),
            GeneratorKind::Hybrid => Box::new(HybridGenerator::new(seed)),
            GeneratorKind::Expert => Box::new(ExpertGenerator::new(seed)),
            GeneratorKind::Beginner => Box::new(BeginnerGenerator::new(seed)),
            GeneratorKind::RandomWorker => Box::new(RandomWorkerGenerator::new(seed)),
        }
    }
}

/// Clamp an arbitrary gram figure into the portion range.
pub(crate) fn clamp_weight(grams: i64) -> u32 {
    grams.clamp(WEIGHT_MIN as i64, WEIGHT_MAX as i64) as u32
}
