//! Roster seam: the read model the engine snapshots at battle start and the
//! write-back record it hands back after an explicit finish or retreat.

use super::attributes::PrimaryStats;
use super::derived_stats::DerivedStats;
use super::job::Job;
use crate::combat::skills::SkillId;
use crate::items::Equipment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit-{}", self.0)
    }
}

fn default_level() -> u32 {
    1
}

/// Everything the engine reads about a mercenary or monster at battle start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    pub job: Job,
    #[serde(default)]
    pub base: PrimaryStats,
    #[serde(default)]
    pub allocated: PrimaryStats,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub skills: Vec<SkillId>,
    /// HP carried over from earlier fights; `None` starts at full.
    #[serde(default)]
    pub current_hp: Option<u32>,
    #[serde(default)]
    pub current_mp: Option<u32>,
    #[serde(default)]
    pub has_one_time_revival: bool,
    /// Experience granted to the winners when this unit is on the losing side.
    #[serde(default)]
    pub xp_reward: u64,
}

impl UnitSnapshot {
    pub fn new(id: u32, name: impl Into<String>, job: Job, level: u32, base: PrimaryStats) -> Self {
        Self {
            id: UnitId(id),
            name: name.into(),
            level,
            job,
            base,
            allocated: PrimaryStats::zero(),
            equipment: Equipment::new(),
            skills: Vec::new(),
            current_hp: None,
            current_mp: None,
            has_one_time_revival: false,
            xp_reward: 0,
        }
    }

    /// Merges base, allocated and equipment layers, derives, and applies gear.
    pub fn battle_stats(&self) -> DerivedStats {
        DerivedStats::for_battle(&self.base, &self.allocated, &self.equipment, self.level)
    }

    /// Stats without equipment attribute bonuses (base + allocated only).
    pub fn unequipped_stats(&self) -> DerivedStats {
        let merged = PrimaryStats::merge([&self.base, &self.allocated]);
        DerivedStats::from_primary(&merged, self.level)
    }
}

/// Post-battle condition of a roster unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitStatus {
    Ready,
    /// Downed in battle; recovery is the roster's concern.
    Injured,
}

/// Mutation the engine hands back to the roster after `finish` or `retreat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitWriteBack {
    pub id: UnitId,
    pub hp: u32,
    pub mp: u32,
    pub experience: u64,
    pub status: UnitStatus,
}

/// External roster collaborator.
pub trait Roster {
    fn snapshot(&self, id: UnitId) -> Option<UnitSnapshot>;
    fn write_back(&mut self, record: &UnitWriteBack);
}

/// Roster kept in memory, used by tests and the batch CLI.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoster {
    units: BTreeMap<UnitId, UnitSnapshot>,
    experience: BTreeMap<UnitId, u64>,
    status: BTreeMap<UnitId, UnitStatus>,
}

impl InMemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: UnitSnapshot) {
        self.units.insert(unit.id, unit);
    }

    pub fn experience(&self, id: UnitId) -> u64 {
        self.experience.get(&id).copied().unwrap_or(0)
    }

    pub fn status(&self, id: UnitId) -> UnitStatus {
        self.status.get(&id).copied().unwrap_or(UnitStatus::Ready)
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.units.get(&id)
    }
}

impl Roster for InMemoryRoster {
    fn snapshot(&self, id: UnitId) -> Option<UnitSnapshot> {
        self.units.get(&id).cloned()
    }

    fn write_back(&mut self, record: &UnitWriteBack) {
        if let Some(unit) = self.units.get_mut(&record.id) {
            unit.current_hp = Some(record.hp);
            unit.current_mp = Some(record.mp);
        }
        *self.experience.entry(record.id).or_insert(0) += record.experience;
        self.status.insert(record.id, record.status);
    }
}
