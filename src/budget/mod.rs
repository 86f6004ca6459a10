// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Simulated microcontroller resource budget.
//!
//! The target hardware for the weigher firmware is an 8-bit board with a few
//! kilobytes of SRAM, a shallow call stack, and a hard cycle budget per
//! weighing decision. This module models that environment on the host so the
//! selection algorithms can be compared under the constraints they would
//! actually face.
//!
//! # Design
//!
//! All counters live in an explicit [`ResourceMeter`] owned by the trial and
//! passed by `&mut` reference. Nothing is global: two trials (or two worker
//! threads, should pairs ever run in parallel) can never observe each other's
//! counters.
//!
//! The ceilings are advisory. [`ResourceMeter::try_allocate`] refuses an
//! allocation that would cross the memory ceiling, and algorithms poll
//! [`ResourceMeter::timed_out`] to abort long searches, but the meter itself
//! never aborts anything. Every figure it tracks ends up in the trial's
//! [`CombinationResult`](crate::algorithms::CombinationResult) or in the
//! monitor's violation counters.
//!
//! Time is simulated, not measured: algorithms charge instruction counts via
//! [`ResourceMeter::charge`] and the meter converts them to milliseconds
//! through [`BoardProfile::instructions_per_ms`]. Runs are therefore
//! bit-reproducible regardless of host load.

pub mod meter;
pub mod profile;

pub use meter::{BudgetExceeded, ResourceMeter};
pub use profile::BoardProfile;
