//! Event records handed to the presentation layer.
//!
//! The engine only emits these; it never reads anything back from the sink.

use crate::combat::skills::{ItemId, SkillId};
use crate::combat::types::{CombatantId, Side};
use serde::Serialize;

/// What an actor did on its turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    BasicAttack,
    Skill(SkillId),
    Item(ItemId),
}

/// Final state of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BattleOutcome {
    Victory(Side),
    /// Safety tick cap reached with both sides standing.
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BattleEvent {
    ActionStarted {
        actor: CombatantId,
        action: ActionKind,
    },
    DamageDealt {
        attacker: CombatantId,
        target: CombatantId,
        amount: u32,
        is_crit: bool,
    },
    Missed {
        attacker: CombatantId,
        target: CombatantId,
    },
    HealApplied {
        healer: CombatantId,
        target: CombatantId,
        amount: u32,
        is_crit: bool,
    },
    ManaRestored {
        target: CombatantId,
        amount: u32,
    },
    StatusApplied {
        source: CombatantId,
        target: CombatantId,
        status: String,
        turns: u32,
        is_debuff: bool,
    },
    UnitRevived {
        unit: CombatantId,
    },
    UnitDefeated {
        unit: CombatantId,
        by: CombatantId,
    },
    /// Transient UI hint, emitted on critical hits.
    ScreenShake {
        intensity: f64,
    },
    /// A player-controlled unit is ready and the battle is paused for input.
    AwaitingInput {
        actor: CombatantId,
    },
    /// A manual action was refused; no state changed.
    ActionRejected {
        actor: CombatantId,
        reason: String,
    },
    BattleConcluded {
        outcome: BattleOutcome,
    },
}
