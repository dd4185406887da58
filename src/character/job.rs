use crate::combat::skills::DamageSchool;
use crate::core::constants::*;
use serde::{Deserialize, Serialize};

/// Combat role of a mercenary or monster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Job {
    Warrior,
    Knight,
    Rogue,
    Archer,
    Mage,
    Priest,
    Beast,
}

impl Job {
    pub fn all() -> [Job; 7] {
        [
            Job::Warrior,
            Job::Knight,
            Job::Rogue,
            Job::Archer,
            Job::Mage,
            Job::Priest,
            Job::Beast,
        ]
    }

    /// School used by this job's basic attack.
    pub fn basic_attack_school(&self) -> DamageSchool {
        match self {
            Job::Mage | Job::Priest => DamageSchool::Magical,
            _ => DamageSchool::Physical,
        }
    }

    /// Lowest efficiency factor a damage roll can land on before tuning overrides.
    pub fn default_efficiency_floor(&self) -> f64 {
        match self {
            Job::Warrior => WARRIOR_EFFICIENCY_FLOOR,
            Job::Knight => KNIGHT_EFFICIENCY_FLOOR,
            Job::Rogue => ROGUE_EFFICIENCY_FLOOR,
            Job::Archer => ARCHER_EFFICIENCY_FLOOR,
            Job::Mage => MAGE_EFFICIENCY_FLOOR,
            Job::Priest => PRIEST_EFFICIENCY_FLOOR,
            Job::Beast => BEAST_EFFICIENCY_FLOOR,
        }
    }
}
