//! Readiness-gauge (ATB) scheduler.
//!
//! Every living combatant's gauge grows by `speed × gauge_per_speed × playback`
//! each tick. A combatant at or above the action threshold may act; acting
//! subtracts the threshold so overflow carries into the next cycle.

use crate::combat::types::{CombatantId, CombatantRuntime, Side};
use crate::core::config::CombatTuning;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which ready combatants get to act in a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerMode {
    /// At most one actor per side per tick: the first ready one in roster
    /// order, allies before enemies. Paces the on-screen battle.
    #[default]
    FirstReady,
    /// Repeated passes over the roster; every ready living combatant acts once
    /// per pass until a pass acts nobody. Same order as the batch simulator.
    DrainAll,
}

/// Gauge gained in one tick.
pub fn gauge_gain(speed: u32, gauge_per_speed: f64, playback: f64) -> f64 {
    speed as f64 * gauge_per_speed * playback
}

/// Gauge left after acting. Never negative.
pub fn consume_gauge(gauge: f64, threshold: f64) -> f64 {
    (gauge - threshold).max(0.0)
}

#[derive(Debug, Clone, Copy)]
pub struct ActionScheduler {
    mode: SchedulerMode,
    threshold: f64,
    gauge_per_speed: f64,
}

impl ActionScheduler {
    pub fn new(mode: SchedulerMode, tuning: &CombatTuning) -> Self {
        Self {
            mode,
            threshold: tuning.action_threshold,
            gauge_per_speed: tuning.gauge_per_speed,
        }
    }

    pub fn mode(&self) -> SchedulerMode {
        self.mode
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Fills every living gauge. Defeated combatants keep their gauge frozen.
    pub fn advance(&self, units: &mut [CombatantRuntime], playback: f64) {
        for unit in units.iter_mut().filter(|u| u.is_alive()) {
            unit.gauge += gauge_gain(unit.stats.speed, self.gauge_per_speed, playback);
        }
    }

    pub fn is_ready(&self, unit: &CombatantRuntime) -> bool {
        unit.is_alive() && unit.gauge >= self.threshold
    }

    /// First ready combatant of `side` in roster order.
    pub fn first_ready(&self, units: &[CombatantRuntime], side: Side) -> Option<CombatantId> {
        units
            .iter()
            .find(|u| u.side == side && self.is_ready(u))
            .map(|u| u.id)
    }

    /// Candidates for one pass, in acting order.
    ///
    /// Callers re-check [`ActionScheduler::is_ready`] right before each actor
    /// acts, since an earlier actor in the same pass may have defeated it.
    pub fn ready_actors(&self, units: &[CombatantRuntime]) -> Vec<CombatantId> {
        let actors: Vec<CombatantId> = match self.mode {
            SchedulerMode::FirstReady => [Side::Allies, Side::Enemies]
                .into_iter()
                .filter_map(|side| self.first_ready(units, side))
                .collect(),
            SchedulerMode::DrainAll => units
                .iter()
                .filter(|u| self.is_ready(u))
                .map(|u| u.id)
                .collect(),
        };
        if !actors.is_empty() {
            debug!(mode = ?self.mode, count = actors.len(), "ready actors");
        }
        actors
    }

    /// Moves a ready combatant into its action by subtracting the threshold.
    pub fn consume(&self, unit: &mut CombatantRuntime) {
        unit.gauge = consume_gauge(unit.gauge, self.threshold);
    }
}
