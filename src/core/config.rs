//! Tunable combat constants.
//!
//! Holds the hit-chance band, the per-job efficiency floors and the scheduler
//! rates, plus per-battle settings.

use crate::character::job::Job;
use crate::combat::scheduler::SchedulerMode;
use crate::core::constants::*;
use crate::core::error::CombatError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-job lowest efficiency factor. Damage rolls are uniform in `[floor, 1.0]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EfficiencyTable {
    pub warrior: f64,
    pub knight: f64,
    pub rogue: f64,
    pub archer: f64,
    pub mage: f64,
    pub priest: f64,
    pub beast: f64,
}

impl Default for EfficiencyTable {
    fn default() -> Self {
        Self {
            warrior: Job::Warrior.default_efficiency_floor(),
            knight: Job::Knight.default_efficiency_floor(),
            rogue: Job::Rogue.default_efficiency_floor(),
            archer: Job::Archer.default_efficiency_floor(),
            mage: Job::Mage.default_efficiency_floor(),
            priest: Job::Priest.default_efficiency_floor(),
            beast: Job::Beast.default_efficiency_floor(),
        }
    }
}

impl EfficiencyTable {
    /// Floor for `job`, clamped into `[0, 1]`.
    pub fn floor(&self, job: Job) -> f64 {
        let raw = match job {
            Job::Warrior => self.warrior,
            Job::Knight => self.knight,
            Job::Rogue => self.rogue,
            Job::Archer => self.archer,
            Job::Mage => self.mage,
            Job::Priest => self.priest,
            Job::Beast => self.beast,
        };
        raw.clamp(0.0, 1.0)
    }

    pub fn set(&mut self, job: Job, floor: f64) {
        let slot = match job {
            Job::Warrior => &mut self.warrior,
            Job::Knight => &mut self.knight,
            Job::Rogue => &mut self.rogue,
            Job::Archer => &mut self.archer,
            Job::Mage => &mut self.mage,
            Job::Priest => &mut self.priest,
            Job::Beast => &mut self.beast,
        };
        *slot = floor;
    }
}

/// Engine-wide tuning shared by the interactive battle and the batch simulator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CombatTuning {
    /// Gauge value a combatant must reach to act.
    pub action_threshold: f64,
    /// Gauge gained per speed point per tick at 1x playback.
    pub gauge_per_speed: f64,
    pub min_hit_chance: f64,
    pub max_hit_chance: f64,
    pub heal_crit_multiplier: f64,
    /// Duration used by buff/debuff skills that don't name one.
    pub default_status_duration: u32,
    pub efficiency: EfficiencyTable,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            action_threshold: ACTION_THRESHOLD,
            gauge_per_speed: GAUGE_PER_SPEED_POINT,
            min_hit_chance: MIN_HIT_CHANCE_PERCENT,
            max_hit_chance: MAX_HIT_CHANCE_PERCENT,
            heal_crit_multiplier: HEAL_CRIT_MULTIPLIER,
            default_status_duration: DEFAULT_STATUS_DURATION,
            efficiency: EfficiencyTable::default(),
        }
    }
}

impl CombatTuning {
    pub fn from_json_str(json: &str) -> Result<Self, CombatError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CombatError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects values that would stall the scheduler or invert the hit band.
    pub fn validate(&self) -> Result<(), CombatError> {
        if !(self.action_threshold > 0.0) {
            return Err(CombatError::Config(
                "action_threshold must be positive".to_string(),
            ));
        }
        if !(self.gauge_per_speed > 0.0) {
            return Err(CombatError::Config(
                "gauge_per_speed must be positive".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.min_hit_chance)
            || !(self.min_hit_chance..=100.0).contains(&self.max_hit_chance)
        {
            return Err(CombatError::Config(format!(
                "hit chance band [{}, {}] is not within [0, 100]",
                self.min_hit_chance, self.max_hit_chance
            )));
        }
        Ok(())
    }

    /// Builder-style override, mostly for tests and what-if batch runs.
    pub fn with_efficiency_floor(mut self, job: Job, floor: f64) -> Self {
        self.efficiency.set(job, floor);
        self
    }
}

/// Settings for one interactive battle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BattleConfig {
    pub scheduler_mode: SchedulerMode,
    /// When false, every ready ally pauses the battle until an action is submitted.
    pub automatic: bool,
    pub playback_speed: f64,
    pub seed: u64,
    /// Logical ticks before the battle is called a draw.
    pub max_ticks: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            scheduler_mode: SchedulerMode::FirstReady,
            automatic: true,
            playback_speed: DEFAULT_PLAYBACK_SPEED,
            seed: 0,
            max_ticks: DEFAULT_BATTLE_MAX_TICKS,
        }
    }
}

impl BattleConfig {
    pub fn manual(seed: u64) -> Self {
        Self {
            automatic: false,
            seed,
            ..Default::default()
        }
    }

    pub fn drain_all(seed: u64) -> Self {
        Self {
            scheduler_mode: SchedulerMode::DrainAll,
            seed,
            ..Default::default()
        }
    }
}
