// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Board parameters for the simulated environment.

use serde::{Deserialize, Serialize};

/// Resource parameters of the simulated board.
///
/// The defaults approximate the ATmega328-class board the original weigher
/// firmware ran on, but none of them is load-bearing: every figure is plain
/// configuration, and a profile for a larger board is just another value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardProfile {
    /// Total SRAM on the board (bytes).
    pub sram_bytes: usize,

    /// SRAM reserved for the runtime and firmware outside the search
    /// (bytes). Subtracted from `sram_bytes` to get the usable budget.
    pub system_reserve_bytes: usize,

    /// Wall-clock budget for one selection decision (simulated ms).
    pub timeout_ms: u64,

    /// Deepest call stack the board tolerates (simulated frames).
    pub max_stack_depth: u32,

    /// Simulated instructions executed per millisecond. 16_000 models a
    /// 16 MHz core retiring one instruction per cycle.
    pub instructions_per_ms: u64,

    /// Iteration cap for the random-sampling algorithm. Slower boards get
    /// fewer draws inside the same time budget; the supported range in the
    /// original firmware was 500-1000.
    pub sampling_iterations: u32,
}

impl BoardProfile {
    /// SRAM left for the search after the system reserve.
    pub fn available_bytes(&self) -> usize {
        self.sram_bytes.saturating_sub(self.system_reserve_bytes)
    }
}

impl Default for BoardProfile {
    fn default() -> Self {
        Self {
            sram_bytes: 32 * 1024,
            system_reserve_bytes: 2048,
            timeout_ms: 5000,
            max_stack_depth: 100,
            instructions_per_ms: 16_000,
            sampling_iterations: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = BoardProfile::default();
        assert_eq!(profile.available_bytes(), 32 * 1024 - 2048);
        assert_eq!(profile.timeout_ms, 5000);
        assert_eq!(profile.max_stack_depth, 100);
    }

    #[test]
    fn test_reserve_larger_than_sram_saturates() {
        let profile = BoardProfile {
            sram_bytes: 1024,
            system_reserve_bytes: 2048,
            ..Default::default()
        };
        assert_eq!(profile.available_bytes(), 0);
    }
}
