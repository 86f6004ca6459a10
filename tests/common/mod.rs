// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

use weigher_search::{BoardProfile, ResourceMeter};

/// The reference batch from the original machine's acceptance data:
/// twelve portions summing to 6940 g.
pub fn standard_batch() -> Vec<u32> {
    vec![520, 580, 610, 650, 700, 530, 590, 620, 660, 510, 540, 630]
}

/// A fresh meter on the default board.
pub fn default_meter() -> ResourceMeter {
    ResourceMeter::new(BoardProfile::default())
}
