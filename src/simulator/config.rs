//! Batch configuration.

use crate::core::constants::DEFAULT_MATCH_MAX_TICKS;
use serde::{Deserialize, Serialize};

/// Configuration for a batch of independent matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of matches to simulate
    pub rounds: u32,

    /// Base seed; match `i` uses `seed + i`
    pub seed: u64,

    /// Worker threads for parallel runs (0 = rayon default)
    pub workers: usize,

    /// Spread matches across the worker pool
    pub parallel: bool,

    /// Logical ticks per match before it is decided on remaining HP
    pub max_ticks_per_match: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            rounds: 1000,
            seed: 0,
            workers: 0,
            parallel: true,
            max_ticks_per_match: DEFAULT_MATCH_MAX_TICKS,
        }
    }
}

impl BatchConfig {
    pub fn sequential(rounds: u32, seed: u64) -> Self {
        Self {
            rounds,
            seed,
            parallel: false,
            ..Default::default()
        }
    }

    pub fn parallel(rounds: u32, seed: u64) -> Self {
        Self {
            rounds,
            seed,
            parallel: true,
            ..Default::default()
        }
    }
}
