//! Error types shared by the battle engine and batch simulator.
//!
//! Stale targets are not represented here: resolving against a defeated
//! target yields an empty effect list instead of an error.

use crate::character::roster::UnitId;
use crate::combat::skills::{ItemId, SkillId};
use crate::combat::types::{CombatantId, Side};

/// Errors surfaced by battle setup, manual control and batch configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CombatError {
    /// A battle or batch was configured with no combatants on one side.
    #[error("{0} side has no combatants")]
    EmptySide(Side),

    /// An action referenced a skill the catalog does not know.
    #[error("unknown skill `{0}`")]
    UnknownSkill(SkillId),

    /// An action referenced a consumable the catalog does not know.
    #[error("unknown item `{0}`")]
    UnknownItem(ItemId),

    /// The actor tried to use a skill outside its own skill list.
    #[error("combatant {unit} has not learned skill `{skill}`")]
    SkillNotLearned { unit: CombatantId, skill: SkillId },

    /// The roster has no record for the requested unit.
    #[error("roster has no unit {0}")]
    UnknownUnit(UnitId),

    /// Batch runs need at least one round.
    #[error("batch rounds must be at least 1")]
    InvalidRounds,

    #[error("combatant {unit} needs {required} MP but has {available}")]
    InsufficientMp {
        unit: CombatantId,
        required: u32,
        available: u32,
    },

    /// Manual input was submitted while no combatant was waiting for it.
    #[error("no combatant is awaiting manual input")]
    NotAwaitingInput,

    #[error("invalid target {target}")]
    InvalidTarget { target: CombatantId },

    #[error("battle has already concluded")]
    BattleOver,

    /// Tuning, team or catalog files could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CombatError {
    fn from(err: serde_json::Error) -> Self {
        CombatError::Config(err.to_string())
    }
}

impl From<std::io::Error> for CombatError {
    fn from(err: std::io::Error) -> Self {
        CombatError::Config(err.to_string())
    }
}
