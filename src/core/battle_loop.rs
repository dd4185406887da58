//! Interactive battle driver.
//!
//! Steps the scheduler and resolver once per logical tick and hands the
//! resulting events to the caller. The caller owns the cadence: call
//! [`InteractiveBattle::tick`] every [`TICK_INTERVAL_MS`] milliseconds.
//!
//! In manual mode a ready ally suspends the battle. Until
//! [`InteractiveBattle::submit_action`] succeeds, ticks advance no gauge.

use crate::character::roster::{Roster, UnitId, UnitSnapshot, UnitStatus, UnitWriteBack};
use crate::combat::events::{BattleEvent, BattleOutcome};
use crate::combat::resolver::{
    choose_auto_action, resolve_action, validate_action, Action, BattleContext,
};
use crate::combat::scheduler::{ActionScheduler, SchedulerMode};
use crate::combat::skills::{Catalog, TargetShape};
use crate::combat::types::{CombatantId, CombatantRuntime, Side};
use crate::core::config::{BattleConfig, CombatTuning};
use crate::core::constants::{DEFAULT_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED, TICK_INTERVAL_MS};
use crate::core::error::CombatError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything that happened during one tick.
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    pub events: Vec<BattleEvent>,
    /// Number of combatants that took a turn.
    pub actions: u32,
    /// Set when the tick ended with an ally waiting for manual input.
    pub awaiting_input: Option<CombatantId>,
    pub outcome: Option<BattleOutcome>,
}

enum Turn {
    Taken,
    Paused,
}

pub struct InteractiveBattle {
    ctx: BattleContext,
    catalog: Arc<Catalog>,
    tuning: CombatTuning,
    scheduler: ActionScheduler,
    automatic: bool,
    playback: f64,
    max_ticks: u64,
    ticks: u64,
    rng: ChaCha8Rng,
    pending: Option<CombatantId>,
    outcome: Option<BattleOutcome>,
    /// Events raised outside `tick` (rejections, auto turns), flushed by the next tick.
    queued: Vec<BattleEvent>,
}

impl InteractiveBattle {
    /// Snapshots both sides and starts a battle. Allies occupy the first ids.
    pub fn new(
        allies: &[UnitSnapshot],
        enemies: &[UnitSnapshot],
        catalog: impl Into<Arc<Catalog>>,
        tuning: CombatTuning,
        config: &BattleConfig,
    ) -> Result<Self, CombatError> {
        let units = allies
            .iter()
            .map(|s| (Side::Allies, s))
            .chain(enemies.iter().map(|s| (Side::Enemies, s)))
            .enumerate()
            .map(|(i, (side, snapshot))| {
                CombatantRuntime::from_snapshot(CombatantId(i), side, snapshot)
            })
            .collect();
        Self::from_runtimes(units, catalog, tuning, config)
    }

    /// Reads both sides from the roster collaborator.
    pub fn from_roster(
        roster: &impl Roster,
        allies: &[UnitId],
        enemies: &[UnitId],
        catalog: impl Into<Arc<Catalog>>,
        tuning: CombatTuning,
        config: &BattleConfig,
    ) -> Result<Self, CombatError> {
        let load = |ids: &[UnitId]| -> Result<Vec<UnitSnapshot>, CombatError> {
            ids.iter()
                .map(|&id| roster.snapshot(id).ok_or(CombatError::UnknownUnit(id)))
                .collect()
        };
        Self::new(&load(allies)?, &load(enemies)?, catalog, tuning, config)
    }

    /// Starts a battle from prepared runtimes. Ids are reassigned by position.
    pub fn from_runtimes(
        units: Vec<CombatantRuntime>,
        catalog: impl Into<Arc<Catalog>>,
        tuning: CombatTuning,
        config: &BattleConfig,
    ) -> Result<Self, CombatError> {
        tuning.validate()?;
        for side in [Side::Allies, Side::Enemies] {
            if !units.iter().any(|u| u.side == side && u.is_alive()) {
                return Err(CombatError::EmptySide(side));
            }
        }

        let ctx = BattleContext::new(units);
        info!(
            allies = ctx.living(Side::Allies).count(),
            enemies = ctx.living(Side::Enemies).count(),
            mode = ?config.scheduler_mode,
            automatic = config.automatic,
            seed = config.seed,
            "battle started"
        );

        Ok(Self {
            ctx,
            catalog: catalog.into(),
            scheduler: ActionScheduler::new(config.scheduler_mode, &tuning),
            tuning,
            automatic: config.automatic,
            playback: clamp_playback(config.playback_speed),
            max_ticks: config.max_ticks,
            ticks: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            pending: None,
            outcome: None,
            queued: Vec::new(),
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(TICK_INTERVAL_MS)
    }

    pub fn context(&self) -> &BattleContext {
        &self.ctx
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.ticks
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn pending_actor(&self) -> Option<CombatantId> {
        self.pending
    }

    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    pub fn playback_speed(&self) -> f64 {
        self.playback
    }

    /// Scales gauge gain per tick. Clamped to `[0, MAX_PLAYBACK_SPEED]`.
    pub fn set_playback_speed(&mut self, speed: f64) {
        self.playback = clamp_playback(speed);
    }

    /// Switching to automatic while an ally waits lets it act right away.
    pub fn set_automatic(&mut self, automatic: bool) {
        self.automatic = automatic;
        if automatic {
            if let Some(actor) = self.pending.take() {
                let mut events = Vec::new();
                self.act_automatically(actor, &mut events);
                self.conclude_if_over(&mut events);
                self.queued.extend(events);
            }
        }
    }

    /// Advances the battle by one logical tick.
    pub fn tick(&mut self) -> TickResult {
        let mut result = TickResult {
            events: std::mem::take(&mut self.queued),
            ..Default::default()
        };
        for unit in &mut self.ctx.units {
            unit.clear_transient();
        }

        if self.outcome.is_some() || self.pending.is_some() {
            result.awaiting_input = self.pending;
            result.outcome = self.outcome;
            return result;
        }

        if self.ctx.is_over() {
            self.conclude_if_over(&mut result.events);
            result.outcome = self.outcome;
            return result;
        }

        if self.ticks >= self.max_ticks {
            warn!(ticks = self.ticks, "battle hit the tick cap, calling it a draw");
            self.conclude(BattleOutcome::Draw, &mut result.events);
            result.outcome = self.outcome;
            return result;
        }

        self.ticks += 1;
        self.scheduler.advance(&mut self.ctx.units, self.playback);

        match self.scheduler.mode() {
            SchedulerMode::FirstReady => {
                for side in [Side::Allies, Side::Enemies] {
                    if self.ctx.is_over() {
                        break;
                    }
                    let Some(actor) = self.scheduler.first_ready(&self.ctx.units, side) else {
                        continue;
                    };
                    result.actions += 1;
                    if let Turn::Paused = self.take_turn(actor, &mut result.events) {
                        break;
                    }
                }
            }
            SchedulerMode::DrainAll => 'passes: loop {
                let mut acted = false;
                for actor in self.scheduler.ready_actors(&self.ctx.units) {
                    if self.ctx.is_over() {
                        break 'passes;
                    }
                    if !self.scheduler.is_ready(&self.ctx.units[actor.0]) {
                        continue;
                    }
                    acted = true;
                    result.actions += 1;
                    if let Turn::Paused = self.take_turn(actor, &mut result.events) {
                        break 'passes;
                    }
                }
                if !acted || self.ctx.is_over() {
                    break;
                }
            },
        }

        self.conclude_if_over(&mut result.events);
        result.awaiting_input = self.pending;
        result.outcome = self.outcome;
        result
    }

    /// Resolves the manual action for the waiting ally.
    ///
    /// Validation happens before any mutation; a rejected action leaves the
    /// ally waiting and queues an [`BattleEvent::ActionRejected`] notice.
    pub fn submit_action(
        &mut self,
        action: Action,
        target: Option<CombatantId>,
    ) -> Result<Vec<BattleEvent>, CombatError> {
        if self.outcome.is_some() {
            return Err(CombatError::BattleOver);
        }
        let actor = self.pending.ok_or(CombatError::NotAwaitingInput)?;

        if let Err(err) = self.check_manual(actor, &action, target) {
            warn!(%actor, %err, "manual action rejected");
            self.queued.push(BattleEvent::ActionRejected {
                actor,
                reason: err.to_string(),
            });
            return Err(err);
        }

        let target = match target {
            None if self.picks_random_opponent(&action) => {
                let side = self.ctx.units[actor.0].side;
                self.ctx.random_opponent(side, &mut self.rng)
            }
            _ => target,
        };
        let mut events = resolve_action(
            &mut self.ctx,
            actor,
            &action,
            target,
            &self.catalog,
            &self.tuning,
            &mut self.rng,
        )?;
        self.pending = None;
        self.conclude_if_over(&mut events);
        Ok(events)
    }

    /// Writes every ally's condition back to the roster. Experience is only
    /// awarded on victory, split evenly among the living allies.
    pub fn finish(self, roster: &mut impl Roster) -> Vec<UnitWriteBack> {
        let experience = match self.outcome {
            Some(BattleOutcome::Victory(Side::Allies)) => {
                let pool: u64 = self
                    .ctx
                    .units
                    .iter()
                    .filter(|u| u.side == Side::Enemies)
                    .map(|u| u.xp_reward)
                    .sum();
                let survivors = self.ctx.living(Side::Allies).count() as u64;
                pool / survivors.max(1)
            }
            _ => 0,
        };
        info!(outcome = ?self.outcome, experience, "battle finished");
        self.write_back(roster, experience)
    }

    /// Leaves the battle early. HP, MP and injuries persist; no experience.
    pub fn retreat(self, roster: &mut impl Roster) -> Vec<UnitWriteBack> {
        info!(ticks = self.ticks, "allies retreated");
        self.write_back(roster, 0)
    }

    /// Discards the battle without touching the roster.
    pub fn abort(self) {
        info!(ticks = self.ticks, "battle aborted");
    }

    fn write_back(&self, roster: &mut impl Roster, experience: u64) -> Vec<UnitWriteBack> {
        let records: Vec<UnitWriteBack> = self
            .ctx
            .units
            .iter()
            .filter(|u| u.side == Side::Allies)
            .filter_map(|u| {
                let id = u.unit_id?;
                Some(UnitWriteBack {
                    id,
                    hp: u.hp,
                    mp: u.mp,
                    experience: if u.is_alive() { experience } else { 0 },
                    status: if u.is_alive() {
                        UnitStatus::Ready
                    } else {
                        UnitStatus::Injured
                    },
                })
            })
            .collect();
        for record in &records {
            roster.write_back(record);
        }
        records
    }

    fn check_manual(
        &self,
        actor: CombatantId,
        action: &Action,
        target: Option<CombatantId>,
    ) -> Result<(), CombatError> {
        validate_action(&self.ctx, actor, action, &self.catalog)?;
        let Some(target) = target else {
            return Ok(());
        };

        let side = self.ctx.units[actor.0].side;
        let expected = match action {
            Action::BasicAttack => side.opponent(),
            Action::Skill(id) => match self.catalog.skill(id) {
                Some(skill) if skill.is_offensive() => side.opponent(),
                _ => side,
            },
            Action::Item(_) => side,
        };
        match self.ctx.unit(target) {
            Some(unit) if unit.side == expected && unit.is_alive() => Ok(()),
            _ => Err(CombatError::InvalidTarget { target }),
        }
    }

    /// Untargeted basic attacks and single-target offensive skills hit a random
    /// living opponent, the same draw the automatic policy makes.
    fn picks_random_opponent(&self, action: &Action) -> bool {
        match action {
            Action::BasicAttack => true,
            Action::Skill(id) => self
                .catalog
                .skill(id)
                .is_some_and(|skill| skill.target == TargetShape::Single && skill.is_offensive()),
            Action::Item(_) => false,
        }
    }

    fn take_turn(&mut self, actor: CombatantId, events: &mut Vec<BattleEvent>) -> Turn {
        self.scheduler.consume(&mut self.ctx.units[actor.0]);

        if !self.automatic && self.ctx.units[actor.0].side == Side::Allies {
            debug!(%actor, "waiting for manual input");
            self.pending = Some(actor);
            events.push(BattleEvent::AwaitingInput { actor });
            return Turn::Paused;
        }

        self.act_automatically(actor, events);
        Turn::Taken
    }

    fn act_automatically(&mut self, actor: CombatantId, events: &mut Vec<BattleEvent>) {
        let (action, target) = choose_auto_action(&self.ctx, actor, &self.catalog, &mut self.rng);
        match resolve_action(
            &mut self.ctx,
            actor,
            &action,
            target,
            &self.catalog,
            &self.tuning,
            &mut self.rng,
        ) {
            Ok(produced) => events.extend(produced),
            Err(err) => warn!(%actor, %err, "automatic action failed"),
        }
    }

    fn conclude_if_over(&mut self, events: &mut Vec<BattleEvent>) {
        if self.outcome.is_some() {
            return;
        }
        if let Some(winner) = self.ctx.winner() {
            self.conclude(BattleOutcome::Victory(winner), events);
        } else if self.ctx.is_over() {
            // Nobody left standing on either side.
            self.conclude(BattleOutcome::Draw, events);
        }
    }

    fn conclude(&mut self, outcome: BattleOutcome, events: &mut Vec<BattleEvent>) {
        self.pending = None;
        self.outcome = Some(outcome);
        info!(?outcome, ticks = self.ticks, "battle concluded");
        events.push(BattleEvent::BattleConcluded { outcome });
    }
}

fn clamp_playback(speed: f64) -> f64 {
    if speed.is_nan() {
        DEFAULT_PLAYBACK_SPEED
    } else {
        speed.clamp(0.0, MAX_PLAYBACK_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::PrimaryStats;
    use crate::character::job::Job;
    use crate::character::roster::InMemoryRoster;

    fn snapshot(id: u32, job: Job, xp: u64) -> UnitSnapshot {
        let stats = PrimaryStats::new(6, 4, 5, 2, 1);
        let mut s = UnitSnapshot::new(id, format!("unit{id}"), job, 3, stats);
        s.xp_reward = xp;
        s
    }

    fn battle(config: &BattleConfig) -> InteractiveBattle {
        InteractiveBattle::new(
            &[snapshot(1, Job::Warrior, 0), snapshot(2, Job::Archer, 0)],
            &[snapshot(10, Job::Beast, 30)],
            Catalog::new(),
            CombatTuning::default(),
            config,
        )
        .unwrap()
    }

    fn run_to_end(battle: &mut InteractiveBattle) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        for _ in 0..100_000 {
            let tick = battle.tick();
            events.extend(tick.events);
            if tick.outcome.is_some() {
                break;
            }
        }
        events
    }

    #[test]
    fn test_empty_side_rejected() {
        let result = InteractiveBattle::new(
            &[snapshot(1, Job::Warrior, 0)],
            &[],
            Catalog::new(),
            CombatTuning::default(),
            &BattleConfig::default(),
        );
        assert!(matches!(result, Err(CombatError::EmptySide(Side::Enemies))));
    }

    #[test]
    fn test_automatic_battle_concludes() {
        let mut b = battle(&BattleConfig::default());
        let events = run_to_end(&mut b);
        assert!(b.outcome().is_some());
        assert!(matches!(
            events.last(),
            Some(BattleEvent::BattleConcluded { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_events() {
        let mut a = battle(&BattleConfig::default());
        let mut b = battle(&BattleConfig::default());
        assert_eq!(run_to_end(&mut a), run_to_end(&mut b));
    }

    #[test]
    fn test_manual_mode_freezes_gauges_while_waiting() {
        let mut b = battle(&BattleConfig::manual(3));
        let mut waiting = None;
        for _ in 0..1_000 {
            if let Some(actor) = b.tick().awaiting_input {
                waiting = Some(actor);
                break;
            }
        }
        let actor = waiting.unwrap();
        assert_eq!(b.context().units[actor.0].side, Side::Allies);

        let frozen: Vec<f64> = b.context().units.iter().map(|u| u.gauge).collect();
        let ticks = b.elapsed_ticks();
        for _ in 0..10 {
            let tick = b.tick();
            assert_eq!(tick.awaiting_input, Some(actor));
        }
        let after: Vec<f64> = b.context().units.iter().map(|u| u.gauge).collect();
        assert_eq!(frozen, after);
        assert_eq!(b.elapsed_ticks(), ticks);

        b.submit_action(Action::BasicAttack, Some(CombatantId(2))).unwrap();
        assert_eq!(b.pending_actor(), None);
    }

    #[test]
    fn test_submit_without_pending_is_error() {
        let mut b = battle(&BattleConfig::manual(1));
        assert_eq!(
            b.submit_action(Action::BasicAttack, None),
            Err(CombatError::NotAwaitingInput)
        );
    }

    #[test]
    fn test_friendly_fire_rejected() {
        let mut b = battle(&BattleConfig::manual(1));
        while b.tick().awaiting_input.is_none() {}
        let actor = b.pending_actor().unwrap();
        let ally = CombatantId(1 - actor.0);

        let err = b.submit_action(Action::BasicAttack, Some(ally)).unwrap_err();
        assert_eq!(err, CombatError::InvalidTarget { target: ally });
        assert_eq!(b.pending_actor(), Some(actor));

        let next = b.tick();
        assert!(matches!(
            next.events.first(),
            Some(BattleEvent::ActionRejected { .. })
        ));
    }

    #[test]
    fn test_switching_to_automatic_releases_pending() {
        let mut b = battle(&BattleConfig::manual(5));
        while b.tick().awaiting_input.is_none() {}
        b.set_automatic(true);
        assert_eq!(b.pending_actor(), None);
        let next = b.tick();
        assert!(next
            .events
            .iter()
            .any(|e| matches!(e, BattleEvent::ActionStarted { .. })));
    }

    #[test]
    fn test_playback_speed_clamped() {
        let mut b = battle(&BattleConfig::default());
        b.set_playback_speed(100.0);
        assert_eq!(b.playback_speed(), MAX_PLAYBACK_SPEED);
        b.set_playback_speed(-1.0);
        assert_eq!(b.playback_speed(), 0.0);
        b.set_playback_speed(f64::NAN);
        assert_eq!(b.playback_speed(), DEFAULT_PLAYBACK_SPEED);
    }

    #[test]
    fn test_tick_cap_is_draw() {
        let config = BattleConfig {
            max_ticks: 3,
            ..Default::default()
        };
        let mut b = battle(&config);
        let events = run_to_end(&mut b);
        assert_eq!(b.outcome(), Some(BattleOutcome::Draw));
        assert_eq!(b.elapsed_ticks(), 3);
        assert!(events.contains(&BattleEvent::BattleConcluded {
            outcome: BattleOutcome::Draw
        }));
    }

    #[test]
    fn test_abort_leaves_roster_untouched() {
        let mut roster = InMemoryRoster::new();
        roster.insert(snapshot(1, Job::Warrior, 0));
        roster.insert(snapshot(10, Job::Beast, 30));
        let mut b = InteractiveBattle::from_roster(
            &roster,
            &[UnitId(1)],
            &[UnitId(10)],
            Catalog::new(),
            CombatTuning::default(),
            &BattleConfig::default(),
        )
        .unwrap();
        run_to_end(&mut b);
        b.abort();

        assert_eq!(roster.get(UnitId(1)).unwrap().current_hp, None);
        assert_eq!(roster.experience(UnitId(1)), 0);
    }

    #[test]
    fn test_unknown_roster_unit() {
        let roster = InMemoryRoster::new();
        let result = InteractiveBattle::from_roster(
            &roster,
            &[UnitId(4)],
            &[UnitId(5)],
            Catalog::new(),
            CombatTuning::default(),
            &BattleConfig::default(),
        );
        assert!(matches!(result, Err(CombatError::UnknownUnit(UnitId(4)))));
    }

    #[test]
    fn test_side_with_nobody_standing_is_refused() {
        let mut downed = snapshot(1, Job::Warrior, 0);
        downed.current_hp = Some(0);
        let result = InteractiveBattle::new(
            &[downed],
            &[snapshot(10, Job::Beast, 30)],
            Catalog::new(),
            CombatTuning::default(),
            &BattleConfig::default(),
        );
        assert!(matches!(result, Err(CombatError::EmptySide(Side::Allies))));
    }
}
