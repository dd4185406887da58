//! Numeric-only match loop.
//!
//! Same rules as the interactive battle in drain-all mode with basic attacks,
//! over flat per-side buffers. Attack arithmetic goes through
//! [`resolve_attack`]; nothing here allocates per attack.

use crate::character::derived_stats::DerivedStats;
use crate::character::job::Job;
use crate::character::roster::UnitSnapshot;
use crate::combat::resolution::resolve_attack;
use crate::combat::scheduler::{consume_gauge, gauge_gain};
use crate::combat::skills::DamageSchool;
use crate::combat::types::MatchStatistics;
use crate::core::config::CombatTuning;
use rand::Rng;

/// Static per-unit stat tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchUnit {
    pub stats: DerivedStats,
    pub job: Job,
    pub school: DamageSchool,
    pub starting_hp: u32,
    pub has_one_time_revival: bool,
}

impl BatchUnit {
    pub fn new(job: Job, stats: DerivedStats) -> Self {
        Self {
            stats,
            job,
            school: job.basic_attack_school(),
            starting_hp: stats.max_hp,
            has_one_time_revival: false,
        }
    }

    pub fn from_snapshot(snapshot: &UnitSnapshot) -> Self {
        let stats = snapshot.battle_stats();
        Self {
            starting_hp: snapshot.current_hp.unwrap_or(stats.max_hp).min(stats.max_hp),
            has_one_time_revival: snapshot.has_one_time_revival,
            ..Self::new(snapshot.job, stats)
        }
    }
}

/// One side's static definition, shared read-only by every match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamBuffers {
    pub units: Vec<BatchUnit>,
}

impl TeamBuffers {
    pub fn new(units: Vec<BatchUnit>) -> Self {
        Self { units }
    }

    pub fn from_snapshots(snapshots: &[UnitSnapshot]) -> Self {
        Self::new(snapshots.iter().map(BatchUnit::from_snapshot).collect())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Whether any unit starts the match above 0 HP.
    pub fn has_living(&self) -> bool {
        self.units.iter().any(|u| u.starting_hp > 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchWinner {
    A,
    B,
}

/// Numbers from one finished match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSummary {
    pub winner: MatchWinner,
    pub ticks: u64,
    pub timed_out: bool,
    pub stats_a: MatchStatistics,
    pub stats_b: MatchStatistics,
}

/// Mutable per-match buffers for one side.
struct SideState {
    hp: Vec<u32>,
    gauge: Vec<f64>,
    revival: Vec<bool>,
    alive: usize,
    stats: MatchStatistics,
}

impl SideState {
    fn new(team: &TeamBuffers) -> Self {
        let hp: Vec<u32> = team.units.iter().map(|u| u.starting_hp).collect();
        Self {
            alive: hp.iter().filter(|&&h| h > 0).count(),
            hp,
            gauge: vec![0.0; team.len()],
            revival: team.units.iter().map(|u| u.has_one_time_revival).collect(),
            stats: MatchStatistics::default(),
        }
    }

    fn advance(&mut self, team: &TeamBuffers, gauge_per_speed: f64) {
        for (i, unit) in team.units.iter().enumerate() {
            if self.hp[i] > 0 {
                self.gauge[i] += gauge_gain(unit.stats.speed, gauge_per_speed, 1.0);
            }
        }
    }

    /// Index of the `k`-th living unit in roster order.
    fn nth_alive(&self, k: usize) -> Option<usize> {
        self.hp
            .iter()
            .enumerate()
            .filter(|(_, &h)| h > 0)
            .nth(k)
            .map(|(i, _)| i)
    }

    /// Applies a hit, honouring a one-time revival.
    fn take_damage(&mut self, index: usize, damage: u32, max_hp: u32) {
        let remaining = self.hp[index].saturating_sub(damage);
        if remaining == 0 && self.revival[index] {
            self.revival[index] = false;
            self.hp[index] = max_hp;
            return;
        }
        self.hp[index] = remaining;
        if remaining == 0 {
            self.alive -= 1;
        }
    }

    fn hp_fraction(&self, team: &TeamBuffers) -> f64 {
        let max: u64 = team.units.iter().map(|u| u.stats.max_hp as u64).sum();
        let current: u64 = self.hp.iter().map(|&h| h as u64).sum();
        if max == 0 {
            0.0
        } else {
            current as f64 / max as f64
        }
    }
}

/// Simulates one match. Team A plays the allies' roster slots, B the enemies'.
///
/// Each tick fills every living gauge, then runs passes (A in order, then B)
/// where every ready living unit attacks once, until a pass acts nobody or a
/// side is wiped. At `max_ticks` the side with the larger remaining HP
/// fraction wins; ties go to B.
pub fn simulate_match(
    team_a: &TeamBuffers,
    team_b: &TeamBuffers,
    tuning: &CombatTuning,
    max_ticks: u64,
    rng: &mut impl Rng,
) -> MatchSummary {
    let mut a = SideState::new(team_a);
    let mut b = SideState::new(team_b);
    let mut ticks = 0u64;
    let mut timed_out = false;

    while a.alive > 0 && b.alive > 0 {
        if ticks >= max_ticks {
            timed_out = true;
            break;
        }
        ticks += 1;
        a.advance(team_a, tuning.gauge_per_speed);
        b.advance(team_b, tuning.gauge_per_speed);

        loop {
            let mut acted = drain_pass(team_a, &mut a, team_b, &mut b, tuning, rng);
            if b.alive == 0 {
                break;
            }
            acted |= drain_pass(team_b, &mut b, team_a, &mut a, tuning, rng);
            if !acted || a.alive == 0 {
                break;
            }
        }
    }

    let winner = if b.alive == 0 && a.alive > 0 {
        MatchWinner::A
    } else if a.alive == 0 {
        MatchWinner::B
    } else if a.hp_fraction(team_a) > b.hp_fraction(team_b) {
        MatchWinner::A
    } else {
        MatchWinner::B
    };

    MatchSummary {
        winner,
        ticks,
        timed_out,
        stats_a: a.stats,
        stats_b: b.stats,
    }
}

/// Every ready living unit of `own` attacks once. Returns whether anyone acted.
fn drain_pass(
    own_team: &TeamBuffers,
    own: &mut SideState,
    foe_team: &TeamBuffers,
    foe: &mut SideState,
    tuning: &CombatTuning,
    rng: &mut impl Rng,
) -> bool {
    let mut acted = false;
    for (i, unit) in own_team.units.iter().enumerate() {
        if foe.alive == 0 {
            break;
        }
        if own.hp[i] == 0 || own.gauge[i] < tuning.action_threshold {
            continue;
        }
        own.gauge[i] = consume_gauge(own.gauge[i], tuning.action_threshold);
        acted = true;

        let pick = rng.gen_range(0..foe.alive);
        let Some(target) = foe.nth_alive(pick) else {
            continue;
        };
        let defender = &foe_team.units[target];
        let outcome = resolve_attack(
            &unit.stats,
            &defender.stats,
            tuning.efficiency.floor(unit.job),
            unit.school,
            1.0,
            tuning,
            rng,
        );

        if outcome.is_hit {
            own.stats.record_hit(outcome.damage, outcome.is_crit);
            foe.take_damage(target, outcome.damage, defender.stats.max_hp);
        } else {
            own.stats.record_miss();
            foe.stats.record_evasion();
        }
    }
    acted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::PrimaryStats;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn unit(hp: u32, attack: u32, speed: u32) -> BatchUnit {
        let mut stats = DerivedStats::from_primary(&PrimaryStats::zero(), 1);
        stats.max_hp = hp;
        stats.attack = attack;
        stats.speed = speed;
        stats.accuracy = 100.0;
        stats.evasion = 0.0;
        stats.crit_chance = 0.0;
        stats.physical_reduction = 0.0;
        BatchUnit::new(Job::Warrior, stats)
    }

    fn exact() -> CombatTuning {
        CombatTuning::default().with_efficiency_floor(Job::Warrior, 1.0)
    }

    #[test]
    fn test_stronger_team_wins() {
        let a = TeamBuffers::new(vec![unit(1000, 50, 100)]);
        let b = TeamBuffers::new(vec![unit(200, 10, 50)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let summary = simulate_match(&a, &b, &exact(), 10_000, &mut rng);

        assert_eq!(summary.winner, MatchWinner::A);
        assert!(!summary.timed_out);
        assert_eq!(summary.stats_a.attacks, 4);
        assert_eq!(summary.stats_a.total_damage, 200);
        assert_eq!(summary.stats_b.attacks, 1);
    }

    #[test]
    fn test_revival_absorbs_one_defeat() {
        let a = TeamBuffers::new(vec![unit(1000, 100, 100)]);
        let mut boss = unit(100, 1, 10);
        boss.has_one_time_revival = true;
        let b = TeamBuffers::new(vec![boss]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let summary = simulate_match(&a, &b, &exact(), 10_000, &mut rng);

        assert_eq!(summary.winner, MatchWinner::A);
        assert_eq!(summary.stats_a.attacks, 2);
    }

    #[test]
    fn test_timeout_decided_on_hp_fraction() {
        let a = TeamBuffers::new(vec![unit(100, 5, 0)]);
        let b = TeamBuffers::new(vec![unit(100, 5, 0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let summary = simulate_match(&a, &b, &exact(), 50, &mut rng);

        assert!(summary.timed_out);
        assert_eq!(summary.ticks, 50);
        assert_eq!(summary.winner, MatchWinner::B);
    }

    #[test]
    fn test_downed_side_loses_immediately() {
        let mut fallen = unit(100, 5, 10);
        fallen.starting_hp = 0;
        let a = TeamBuffers::new(vec![fallen]);
        let b = TeamBuffers::new(vec![unit(100, 5, 10)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let summary = simulate_match(&a, &b, &exact(), 50, &mut rng);

        assert_eq!(summary.winner, MatchWinner::B);
        assert_eq!(summary.ticks, 0);
    }
}
