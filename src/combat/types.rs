use crate::character::derived_stats::DerivedStats;
use crate::character::job::Job;
use crate::character::roster::{UnitId, UnitSnapshot};
use crate::combat::skills::SkillId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a combatant inside one battle's roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(pub usize);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Player-side mercenaries.
    Allies,
    /// Monsters.
    Enemies,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Allies => Side::Enemies,
            Side::Enemies => Side::Allies,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Side::Allies => 0,
            Side::Enemies => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Allies => f.write_str("allies"),
            Side::Enemies => f.write_str("enemies"),
        }
    }
}

/// Named buff/debuff marker. Carries no stat change of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTag {
    pub name: String,
    pub remaining_turns: u32,
    pub is_debuff: bool,
}

/// Presentation hints reset at the start of every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransientFlags {
    pub recently_damaged: bool,
    pub recently_healed: bool,
    pub attacking: bool,
}

/// Battle-scoped performance counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCounters {
    pub kills: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub healing_done: u64,
}

/// Outcome of applying one hit to a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageApplied {
    pub defeated: bool,
    pub revived: bool,
}

/// Mutable per-battle record of one combatant.
#[derive(Debug, Clone)]
pub struct CombatantRuntime {
    pub id: CombatantId,
    /// Roster identity, used for post-battle write-back.
    pub unit_id: Option<UnitId>,
    pub name: String,
    pub side: Side,
    pub job: Job,
    pub stats: DerivedStats,
    pub hp: u32,
    pub mp: u32,
    pub gauge: f64,
    pub flags: TransientFlags,
    pub statuses: Vec<StatusTag>,
    pub counters: UnitCounters,
    pub skills: Vec<SkillId>,
    pub has_one_time_revival: bool,
    pub xp_reward: u64,
}

impl CombatantRuntime {
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        side: Side,
        job: Job,
        stats: DerivedStats,
    ) -> Self {
        Self {
            id,
            unit_id: None,
            name: name.into(),
            side,
            job,
            stats,
            hp: stats.max_hp,
            mp: stats.max_mp,
            gauge: 0.0,
            flags: TransientFlags::default(),
            statuses: Vec::new(),
            counters: UnitCounters::default(),
            skills: Vec::new(),
            has_one_time_revival: false,
            xp_reward: 0,
        }
    }

    /// Builds the runtime from a roster snapshot. Starting HP/MP come from the
    /// snapshot when present, clamped to the derived maximums.
    pub fn from_snapshot(id: CombatantId, side: Side, snapshot: &UnitSnapshot) -> Self {
        let stats = snapshot.battle_stats();
        let mut runtime = Self::new(id, snapshot.name.clone(), side, snapshot.job, stats);
        runtime.unit_id = Some(snapshot.id);
        runtime.hp = snapshot.current_hp.unwrap_or(stats.max_hp).min(stats.max_hp);
        runtime.mp = snapshot.current_mp.unwrap_or(stats.max_mp).min(stats.max_mp);
        runtime.skills = snapshot.skills.clone();
        runtime.has_one_time_revival = snapshot.has_one_time_revival;
        runtime.xp_reward = snapshot.xp_reward;
        runtime
    }

    pub fn with_skills(mut self, skills: Vec<SkillId>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_revival(mut self) -> Self {
        self.has_one_time_revival = true;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.stats.max_hp == 0 {
            0.0
        } else {
            self.hp as f64 / self.stats.max_hp as f64
        }
    }

    pub fn knows_skill(&self, skill: &SkillId) -> bool {
        self.skills.contains(skill)
    }

    /// Applies a resolved hit. A hit that would drop a combatant holding its
    /// one-time revival to 0 HP restores it to full instead and spends the flag.
    pub fn take_damage(&mut self, amount: u32) -> DamageApplied {
        self.flags.recently_damaged = true;
        self.counters.damage_taken += amount as u64;
        let remaining = self.hp.saturating_sub(amount);

        if remaining == 0 && self.has_one_time_revival {
            self.has_one_time_revival = false;
            self.hp = self.stats.max_hp;
            return DamageApplied {
                defeated: false,
                revived: true,
            };
        }

        self.hp = remaining;
        DamageApplied {
            defeated: remaining == 0,
            revived: false,
        }
    }

    /// Restores HP without exceeding max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.stats.max_hp.saturating_sub(self.hp));
        if restored > 0 {
            self.hp += restored;
            self.flags.recently_healed = true;
        }
        restored
    }

    pub fn restore_mp(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.stats.max_mp.saturating_sub(self.mp));
        self.mp += restored;
        restored
    }

    /// Adds or refreshes a status marker.
    pub fn apply_status(&mut self, name: &str, turns: u32, is_debuff: bool) {
        if let Some(existing) = self.statuses.iter_mut().find(|s| s.name == name) {
            existing.remaining_turns = turns;
            existing.is_debuff = is_debuff;
        } else {
            self.statuses.push(StatusTag {
                name: name.to_string(),
                remaining_turns: turns,
                is_debuff,
            });
        }
    }

    pub fn has_status(&self, name: &str) -> bool {
        self.statuses.iter().any(|s| s.name == name)
    }

    /// Counts down status markers when their bearer acts, dropping expired ones.
    pub fn tick_statuses(&mut self) {
        for status in &mut self.statuses {
            status.remaining_turns = status.remaining_turns.saturating_sub(1);
        }
        self.statuses.retain(|s| s.remaining_turns > 0);
    }

    pub fn clear_transient(&mut self) {
        self.flags = TransientFlags::default();
    }
}

/// Per-side accumulator for one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub attacks: u64,
    pub misses: u64,
    pub crits: u64,
    /// Attacks against this side that missed.
    pub evasions: u64,
    pub total_damage: u64,
    pub max_hit: u32,
    pub min_hit: Option<u32>,
}

impl MatchStatistics {
    pub fn record_hit(&mut self, damage: u32, is_crit: bool) {
        self.attacks += 1;
        if is_crit {
            self.crits += 1;
        }
        self.total_damage += damage as u64;
        self.max_hit = self.max_hit.max(damage);
        self.min_hit = Some(self.min_hit.map_or(damage, |m| m.min(damage)));
    }

    pub fn record_miss(&mut self) {
        self.attacks += 1;
        self.misses += 1;
    }

    pub fn record_evasion(&mut self) {
        self.evasions += 1;
    }

    pub fn merge(&mut self, other: &MatchStatistics) {
        self.attacks += other.attacks;
        self.misses += other.misses;
        self.crits += other.crits;
        self.evasions += other.evasions;
        self.total_damage += other.total_damage;
        self.max_hit = self.max_hit.max(other.max_hit);
        self.min_hit = match (self.min_hit, other.min_hit) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::PrimaryStats;

    fn unit() -> CombatantRuntime {
        let stats = DerivedStats::from_primary(&PrimaryStats::new(5, 5, 5, 5, 5), 5);
        CombatantRuntime::new(CombatantId(0), "Test", Side::Allies, Job::Warrior, stats)
    }

    #[test]
    fn test_new_starts_full_with_empty_gauge() {
        let u = unit();
        assert_eq!(u.hp, u.stats.max_hp);
        assert_eq!(u.mp, u.stats.max_mp);
        assert_eq!(u.gauge, 0.0);
        assert!(u.is_alive());
    }

    #[test]
    fn test_take_damage_defeats() {
        let mut u = unit();
        let result = u.take_damage(u.stats.max_hp + 10);
        assert!(result.defeated);
        assert!(!result.revived);
        assert_eq!(u.hp, 0);
        assert!(u.flags.recently_damaged);
    }

    #[test]
    fn test_revival_consumed_once() {
        let mut u = unit().with_revival();
        let max = u.stats.max_hp;

        let first = u.take_damage(max);
        assert!(first.revived);
        assert!(!first.defeated);
        assert_eq!(u.hp, max);
        assert!(!u.has_one_time_revival);

        let second = u.take_damage(max);
        assert!(second.defeated);
        assert_eq!(u.hp, 0);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut u = unit();
        u.hp = u.stats.max_hp - 5;
        assert_eq!(u.heal(100), 5);
        assert_eq!(u.hp, u.stats.max_hp);
        assert_eq!(u.heal(100), 0);
    }

    #[test]
    fn test_status_refresh_and_expiry() {
        let mut u = unit();
        u.apply_status("Haste", 2, false);
        u.apply_status("Haste", 3, false);
        assert_eq!(u.statuses.len(), 1);
        assert_eq!(u.statuses[0].remaining_turns, 3);

        u.tick_statuses();
        u.tick_statuses();
        assert!(u.has_status("Haste"));
        u.tick_statuses();
        assert!(!u.has_status("Haste"));
    }

    #[test]
    fn test_match_statistics_min_max() {
        let mut stats = MatchStatistics::default();
        stats.record_hit(10, false);
        stats.record_hit(3, true);
        stats.record_miss();

        assert_eq!(stats.attacks, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.crits, 1);
        assert_eq!(stats.total_damage, 13);
        assert_eq!(stats.max_hit, 10);
        assert_eq!(stats.min_hit, Some(3));
    }

    #[test]
    fn test_match_statistics_merge() {
        let mut a = MatchStatistics::default();
        a.record_hit(7, false);
        let mut b = MatchStatistics::default();
        b.record_hit(2, false);
        b.record_evasion();

        a.merge(&b);
        assert_eq!(a.attacks, 2);
        assert_eq!(a.evasions, 1);
        assert_eq!(a.min_hit, Some(2));
        assert_eq!(a.max_hit, 7);
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Allies.opponent(), Side::Enemies);
        assert_eq!(Side::Enemies.opponent(), Side::Allies);
    }
}
