//! Action and skill resolution against an explicit battle context.
//!
//! [`resolve_action`] validates first and mutates second: any `Err` leaves the
//! context untouched. A target that died between selection and resolution is
//! a stale target and resolves to an empty effect list.

use crate::combat::events::{ActionKind, BattleEvent};
use crate::combat::resolution::{resolve_attack, resolve_heal, AttackOutcome};
use crate::combat::skills::{
    Catalog, ConsumableEffect, DamageSchool, EffectBranch, ItemId, Skill, SkillId, TargetShape,
};
use crate::combat::types::{CombatantId, CombatantRuntime, MatchStatistics, Side};
use crate::core::config::CombatTuning;
use crate::core::constants::AUTO_HEAL_HP_RATIO;
use crate::core::error::CombatError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Screen-shake strength attached to critical hits.
const CRIT_SHAKE_INTENSITY: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    BasicAttack,
    Skill(SkillId),
    Item(ItemId),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::BasicAttack => ActionKind::BasicAttack,
            Action::Skill(id) => ActionKind::Skill(id.clone()),
            Action::Item(id) => ActionKind::Item(id.clone()),
        }
    }
}

/// All combatant runtimes of one battle plus per-side statistics.
///
/// `units[i].id == CombatantId(i)` always holds; allies come first.
#[derive(Debug, Clone)]
pub struct BattleContext {
    pub units: Vec<CombatantRuntime>,
    stats: [MatchStatistics; 2],
}

impl BattleContext {
    /// Takes ownership of the runtimes and renumbers them by position.
    pub fn new(mut units: Vec<CombatantRuntime>) -> Self {
        for (index, unit) in units.iter_mut().enumerate() {
            unit.id = CombatantId(index);
        }
        Self {
            units,
            stats: [MatchStatistics::default(); 2],
        }
    }

    pub fn unit(&self, id: CombatantId) -> Option<&CombatantRuntime> {
        self.units.get(id.0)
    }

    pub fn living(&self, side: Side) -> impl Iterator<Item = &CombatantRuntime> {
        self.units
            .iter()
            .filter(move |u| u.side == side && u.is_alive())
    }

    /// Living combatant ids of `side` in roster order.
    pub fn living_ids(&self, side: Side) -> Vec<CombatantId> {
        self.living(side).map(|u| u.id).collect()
    }

    pub fn side_alive(&self, side: Side) -> bool {
        self.living(side).next().is_some()
    }

    pub fn is_over(&self) -> bool {
        !self.side_alive(Side::Allies) || !self.side_alive(Side::Enemies)
    }

    /// The side left standing, once the battle is over.
    pub fn winner(&self) -> Option<Side> {
        match (self.side_alive(Side::Allies), self.side_alive(Side::Enemies)) {
            (true, false) => Some(Side::Allies),
            (false, true) => Some(Side::Enemies),
            _ => None,
        }
    }

    pub fn statistics(&self, side: Side) -> &MatchStatistics {
        &self.stats[side.index()]
    }

    /// Picks a uniformly random living opponent of `side`.
    pub fn random_opponent(&self, side: Side, rng: &mut impl Rng) -> Option<CombatantId> {
        let living = self.living_ids(side.opponent());
        if living.is_empty() {
            return None;
        }
        Some(living[rng.gen_range(0..living.len())])
    }

    /// Living member of `side` with the lowest HP ratio; ties go to roster order.
    pub fn most_wounded(&self, side: Side) -> Option<CombatantId> {
        let mut best: Option<&CombatantRuntime> = None;
        for unit in self.living(side) {
            if best.map_or(true, |b| unit.hp_ratio() < b.hp_ratio()) {
                best = Some(unit);
            }
        }
        best.map(|u| u.id)
    }

    fn living_target(&self, id: CombatantId, side: Side) -> Option<CombatantId> {
        self.unit(id)
            .filter(|u| u.side == side && u.is_alive())
            .map(|u| u.id)
    }
}

/// Checks an action against the catalog and the actor's resources without
/// touching any state.
pub fn validate_action(
    ctx: &BattleContext,
    actor: CombatantId,
    action: &Action,
    catalog: &Catalog,
) -> Result<(), CombatError> {
    let unit = ctx
        .unit(actor)
        .ok_or(CombatError::InvalidTarget { target: actor })?;

    match action {
        Action::BasicAttack => Ok(()),
        Action::Skill(id) => {
            let skill = catalog.require_skill(id)?;
            if !unit.knows_skill(id) {
                return Err(CombatError::SkillNotLearned {
                    unit: actor,
                    skill: id.clone(),
                });
            }
            if unit.mp < skill.mp_cost {
                return Err(CombatError::InsufficientMp {
                    unit: actor,
                    required: skill.mp_cost,
                    available: unit.mp,
                });
            }
            Ok(())
        }
        Action::Item(id) => catalog.require_consumable(id).map(|_| ()),
    }
}

/// Resolves one action for `actor` and returns the events it produced.
///
/// The caller has already consumed the actor's gauge. The actor's status
/// markers count down even when the action turns out to be a no-op.
pub fn resolve_action(
    ctx: &mut BattleContext,
    actor: CombatantId,
    action: &Action,
    primary_target: Option<CombatantId>,
    catalog: &Catalog,
    tuning: &CombatTuning,
    rng: &mut impl Rng,
) -> Result<Vec<BattleEvent>, CombatError> {
    validate_action(ctx, actor, action, catalog)?;

    let mut events = Vec::new();
    match action {
        Action::BasicAttack => {
            let side = ctx.units[actor.0].side;
            let school = ctx.units[actor.0].job.basic_attack_school();
            let target = primary_target.and_then(|t| ctx.living_target(t, side.opponent()));
            if let Some(target) = target {
                events.push(started(actor, action));
                ctx.units[actor.0].flags.attacking = true;
                attack(ctx, actor, target, school, 1.0, tuning, rng, &mut events);
            }
        }
        Action::Skill(id) => {
            let skill = catalog.require_skill(id)?;
            let targets = skill_targets(ctx, actor, skill, primary_target);
            if !targets.is_empty() {
                events.push(started(actor, action));
                ctx.units[actor.0].mp -= skill.mp_cost;
                apply_skill(ctx, actor, skill, &targets, tuning, rng, &mut events);
            }
        }
        Action::Item(id) => {
            let consumable = catalog.require_consumable(id)?;
            let side = ctx.units[actor.0].side;
            let target = ctx.living_target(primary_target.unwrap_or(actor), side);
            if let Some(target) = target {
                events.push(started(actor, action));
                apply_consumable(ctx, actor, target, consumable.effect, &mut events);
            }
        }
    }

    if events.is_empty() {
        debug!(%actor, ?action, "stale target, action fizzled");
    } else {
        debug!(%actor, ?action, effects = events.len() - 1, "action resolved");
    }
    ctx.units[actor.0].tick_statuses();
    Ok(events)
}

fn started(actor: CombatantId, action: &Action) -> BattleEvent {
    BattleEvent::ActionStarted {
        actor,
        action: action.kind(),
    }
}

/// Expands a skill's target shape into concrete living targets.
///
/// Area skills hit every living member of the side implied by the effect
/// branch: offensive branches the opponents, supportive ones the caster's side.
fn skill_targets(
    ctx: &BattleContext,
    actor: CombatantId,
    skill: &Skill,
    primary_target: Option<CombatantId>,
) -> Vec<CombatantId> {
    let side = ctx.units[actor.0].side;
    let target_side = if skill.is_offensive() {
        side.opponent()
    } else {
        side
    };

    match skill.target {
        TargetShape::AllAllies | TargetShape::AllEnemies => ctx.living_ids(target_side),
        TargetShape::SelfOnly => ctx.living_target(actor, side).into_iter().collect(),
        TargetShape::Single => {
            let wanted = match (primary_target, skill.branch()) {
                (Some(t), _) => Some(t),
                (None, EffectBranch::Heal) => ctx.most_wounded(side),
                (None, EffectBranch::Buff) => Some(actor),
                (None, _) => None,
            };
            wanted
                .and_then(|t| ctx.living_target(t, target_side))
                .into_iter()
                .collect()
        }
    }
}

fn apply_skill(
    ctx: &mut BattleContext,
    actor: CombatantId,
    skill: &Skill,
    targets: &[CombatantId],
    tuning: &CombatTuning,
    rng: &mut impl Rng,
    events: &mut Vec<BattleEvent>,
) {
    match skill.branch() {
        EffectBranch::Damage => {
            ctx.units[actor.0].flags.attacking = true;
            for &target in targets {
                // Earlier hits in the same cast may already have finished this one.
                if !ctx.units[target.0].is_alive() {
                    continue;
                }
                attack(ctx, actor, target, skill.school, skill.multiplier, tuning, rng, events);
            }
        }
        EffectBranch::Heal => {
            let caster = ctx.units[actor.0].stats;
            for &target in targets {
                let (amount, is_crit) = resolve_heal(&caster, skill.multiplier, tuning, rng);
                let restored = ctx.units[target.0].heal(amount);
                if restored > 0 {
                    ctx.units[actor.0].counters.healing_done += restored as u64;
                    events.push(BattleEvent::HealApplied {
                        healer: actor,
                        target,
                        amount: restored,
                        is_crit,
                    });
                }
            }
        }
        EffectBranch::Buff | EffectBranch::Debuff => {
            let is_debuff = skill.branch() == EffectBranch::Debuff;
            let turns = skill.duration.unwrap_or(tuning.default_status_duration);
            let status = skill.status_name().to_string();
            for &target in targets {
                ctx.units[target.0].apply_status(&status, turns, is_debuff);
                events.push(BattleEvent::StatusApplied {
                    source: actor,
                    target,
                    status: status.clone(),
                    turns,
                    is_debuff,
                });
            }
        }
    }
}

fn apply_consumable(
    ctx: &mut BattleContext,
    actor: CombatantId,
    target: CombatantId,
    effect: ConsumableEffect,
    events: &mut Vec<BattleEvent>,
) {
    match effect {
        ConsumableEffect::RestoreHp(amount) => {
            let restored = ctx.units[target.0].heal(amount);
            ctx.units[actor.0].counters.healing_done += restored as u64;
            events.push(BattleEvent::HealApplied {
                healer: actor,
                target,
                amount: restored,
                is_crit: false,
            });
        }
        ConsumableEffect::RestoreMp(amount) => {
            let restored = ctx.units[target.0].restore_mp(amount);
            events.push(BattleEvent::ManaRestored {
                target,
                amount: restored,
            });
        }
    }
}

/// One attack evaluation plus its bookkeeping.
#[allow(clippy::too_many_arguments)]
fn attack(
    ctx: &mut BattleContext,
    attacker: CombatantId,
    target: CombatantId,
    school: DamageSchool,
    multiplier: f64,
    tuning: &CombatTuning,
    rng: &mut impl Rng,
    events: &mut Vec<BattleEvent>,
) {
    let (attacker_stats, job, side) = {
        let unit = &ctx.units[attacker.0];
        (unit.stats, unit.job, unit.side)
    };
    let defender_stats = ctx.units[target.0].stats;
    let floor = tuning.efficiency.floor(job);

    let outcome = resolve_attack(
        &attacker_stats,
        &defender_stats,
        floor,
        school,
        multiplier,
        tuning,
        rng,
    );
    apply_outcome(ctx, attacker, target, side, outcome, events);
}

fn apply_outcome(
    ctx: &mut BattleContext,
    attacker: CombatantId,
    target: CombatantId,
    side: Side,
    outcome: AttackOutcome,
    events: &mut Vec<BattleEvent>,
) {
    if !outcome.is_hit {
        ctx.stats[side.index()].record_miss();
        ctx.stats[side.opponent().index()].record_evasion();
        events.push(BattleEvent::Missed { attacker, target });
        return;
    }

    ctx.stats[side.index()].record_hit(outcome.damage, outcome.is_crit);
    ctx.units[attacker.0].counters.damage_dealt += outcome.damage as u64;
    let applied = ctx.units[target.0].take_damage(outcome.damage);

    events.push(BattleEvent::DamageDealt {
        attacker,
        target,
        amount: outcome.damage,
        is_crit: outcome.is_crit,
    });
    if outcome.is_crit {
        events.push(BattleEvent::ScreenShake {
            intensity: CRIT_SHAKE_INTENSITY,
        });
    }
    if applied.revived {
        events.push(BattleEvent::UnitRevived { unit: target });
    }
    if applied.defeated {
        ctx.units[attacker.0].counters.kills += 1;
        events.push(BattleEvent::UnitDefeated {
            unit: target,
            by: attacker,
        });
    }
}

/// Automatic action policy, used for every enemy and for allies in auto mode.
///
/// Heals when an affordable heal exists and an ally is below half HP, else
/// casts the first affordable offensive skill, else attacks. Single offensive
/// targets are drawn uniformly from the living opponents.
pub fn choose_auto_action(
    ctx: &BattleContext,
    actor: CombatantId,
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> (Action, Option<CombatantId>) {
    let unit = &ctx.units[actor.0];
    let affordable: Vec<&Skill> = unit
        .skills
        .iter()
        .filter_map(|id| catalog.skill(id))
        .filter(|s| s.mp_cost <= unit.mp)
        .collect();

    if let Some(heal) = affordable.iter().find(|s| s.branch() == EffectBranch::Heal) {
        let wounded = ctx
            .most_wounded(unit.side)
            .filter(|&id| ctx.units[id.0].hp_ratio() < AUTO_HEAL_HP_RATIO);
        if let Some(target) = wounded {
            let target = (!heal.target.is_area()).then_some(target);
            return (Action::Skill(heal.id.clone()), target);
        }
    }

    if let Some(skill) = affordable.iter().find(|s| s.is_offensive()) {
        let target = if skill.target.is_area() {
            None
        } else {
            ctx.random_opponent(unit.side, rng)
        };
        return (Action::Skill(skill.id.clone()), target);
    }

    (Action::BasicAttack, ctx.random_opponent(unit.side, rng))
}
