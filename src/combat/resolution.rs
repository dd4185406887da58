//! Shared attack resolution for the interactive battle and the batch simulator.
//!
//! Both call sites go through [`resolve_attack`]; only the bookkeeping around
//! the call differs. The arithmetic lives in [`resolve_attack_with_rolls`] so it
//! can be tested against fixed draws.

use crate::character::derived_stats::DerivedStats;
use crate::combat::skills::DamageSchool;
use crate::core::config::CombatTuning;
use rand::Rng;

/// Result of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub is_hit: bool,
    pub is_crit: bool,
    /// Zero on a miss, at least 1 on a hit.
    pub damage: u32,
}

impl AttackOutcome {
    pub const MISS: AttackOutcome = AttackOutcome {
        is_hit: false,
        is_crit: false,
        damage: 0,
    };
}

/// Random draws consumed by one attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackRolls {
    /// Uniform in `[0, 100)`.
    pub hit: f64,
    /// Uniform in `[0, 1)`, mapped onto `[floor, 1]`.
    pub efficiency: f64,
    /// Uniform in `[0, 100)`.
    pub crit: f64,
}

/// Chance to hit in percent: `accuracy - evasion`, clamped to the tuning band
/// so very high evasion still leaves the attacker a floor chance.
pub fn hit_chance(attacker: &DerivedStats, defender: &DerivedStats, tuning: &CombatTuning) -> f64 {
    (attacker.accuracy - defender.evasion).clamp(tuning.min_hit_chance, tuning.max_hit_chance)
}

/// Maps a unit draw onto `[floor, 1]`.
pub fn efficiency_factor(floor: f64, unit_roll: f64) -> f64 {
    let floor = floor.clamp(0.0, 1.0);
    floor + (1.0 - floor) * unit_roll.clamp(0.0, 1.0)
}

/// Deterministic core of attack resolution.
///
/// Steps: hit check (a miss short-circuits), raw damage from offense ×
/// efficiency × multiplier, crit scaling, reduction for the school, floor,
/// minimum 1.
pub fn resolve_attack_with_rolls(
    attacker: &DerivedStats,
    defender: &DerivedStats,
    efficiency_floor: f64,
    school: DamageSchool,
    multiplier: f64,
    tuning: &CombatTuning,
    rolls: AttackRolls,
) -> AttackOutcome {
    debug_assert!(!multiplier.is_nan(), "attack multiplier is NaN");

    if rolls.hit >= hit_chance(attacker, defender, tuning) {
        return AttackOutcome::MISS;
    }

    let efficiency = efficiency_factor(efficiency_floor, rolls.efficiency);
    let mut raw = attacker.offense(school) as f64 * efficiency * multiplier.max(0.0);

    let is_crit = rolls.crit < attacker.crit_chance;
    if is_crit {
        raw *= attacker.crit_damage / 100.0;
    }

    let reduction = defender.reduction(school).clamp(0.0, 1.0);
    let reduced = (raw * (1.0 - reduction)).floor();
    let damage = if reduced >= u32::MAX as f64 {
        u32::MAX
    } else {
        (reduced as u32).max(1)
    };

    AttackOutcome {
        is_hit: true,
        is_crit,
        damage,
    }
}

/// Resolves one attack, drawing from `rng`.
///
/// The hit roll is always drawn first; the efficiency and crit rolls are
/// drawn only on a hit, so a miss consumes exactly one draw.
pub fn resolve_attack(
    attacker: &DerivedStats,
    defender: &DerivedStats,
    efficiency_floor: f64,
    school: DamageSchool,
    multiplier: f64,
    tuning: &CombatTuning,
    rng: &mut impl Rng,
) -> AttackOutcome {
    let hit = rng.gen_range(0.0..100.0);
    if hit >= hit_chance(attacker, defender, tuning) {
        return AttackOutcome::MISS;
    }

    let efficiency = rng.gen::<f64>();
    let crit = rng.gen_range(0.0..100.0);
    resolve_attack_with_rolls(
        attacker,
        defender,
        efficiency_floor,
        school,
        multiplier,
        tuning,
        AttackRolls {
            hit,
            efficiency,
            crit,
        },
    )
}

/// Heal amount for one target: magic attack × multiplier, scaled by the heal
/// crit multiplier on a crit. Healing always restores at least 1 before clamping.
pub fn resolve_heal(
    caster: &DerivedStats,
    multiplier: f64,
    tuning: &CombatTuning,
    rng: &mut impl Rng,
) -> (u32, bool) {
    let crit_roll = rng.gen_range(0.0..100.0);
    let is_crit = crit_roll < caster.crit_chance;
    let mut amount = caster.magic_attack as f64 * multiplier.max(0.0);
    if is_crit {
        amount *= tuning.heal_crit_multiplier;
    }
    let amount = if amount >= u32::MAX as f64 {
        u32::MAX
    } else {
        (amount.floor() as u32).max(1)
    };
    (amount, is_crit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attributes::PrimaryStats;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn stats(attack: u32, accuracy: f64, evasion: f64) -> DerivedStats {
        let mut s = DerivedStats::from_primary(&PrimaryStats::zero(), 1);
        s.attack = attack;
        s.magic_attack = attack;
        s.accuracy = accuracy;
        s.evasion = evasion;
        s.crit_chance = 0.0;
        s.crit_damage = 200.0;
        s.physical_reduction = 0.0;
        s.magical_reduction = 0.0;
        s
    }

    fn rolls(hit: f64, efficiency: f64, crit: f64) -> AttackRolls {
        AttackRolls {
            hit,
            efficiency,
            crit,
        }
    }

    #[test]
    fn test_hit_chance_floor_and_cap() {
        let tuning = CombatTuning::default();
        let attacker = stats(10, 50.0, 0.0);
        let dodger = stats(10, 0.0, 500.0);
        assert_eq!(hit_chance(&attacker, &dodger, &tuning), 5.0);

        let sniper = stats(10, 400.0, 0.0);
        assert_eq!(hit_chance(&sniper, &attacker, &tuning), 100.0);
    }

    #[test]
    fn test_miss_short_circuits() {
        let tuning = CombatTuning::default();
        let mut attacker = stats(50, 90.0, 0.0);
        attacker.crit_chance = 100.0;
        let defender = stats(10, 0.0, 0.0);

        let outcome = resolve_attack_with_rolls(
            &attacker,
            &defender,
            1.0,
            DamageSchool::Physical,
            1.0,
            &tuning,
            rolls(95.0, 0.0, 0.0),
        );
        assert_eq!(outcome, AttackOutcome::MISS);
    }

    #[test]
    fn test_full_efficiency_hit() {
        let tuning = CombatTuning::default();
        let attacker = stats(50, 100.0, 0.0);
        let defender = stats(10, 0.0, 0.0);

        let outcome = resolve_attack_with_rolls(
            &attacker,
            &defender,
            1.0,
            DamageSchool::Physical,
            1.0,
            &tuning,
            rolls(0.0, 0.0, 50.0),
        );
        assert!(outcome.is_hit);
        assert!(!outcome.is_crit);
        assert_eq!(outcome.damage, 50);
    }

    #[test]
    fn test_efficiency_floor_applies() {
        let tuning = CombatTuning::default();
        let attacker = stats(100, 100.0, 0.0);
        let defender = stats(10, 0.0, 0.0);

        let low = resolve_attack_with_rolls(
            &attacker,
            &defender,
            0.5,
            DamageSchool::Physical,
            1.0,
            &tuning,
            rolls(0.0, 0.0, 99.0),
        );
        assert_eq!(low.damage, 50);

        let mid = resolve_attack_with_rolls(
            &attacker,
            &defender,
            0.5,
            DamageSchool::Physical,
            1.0,
            &tuning,
            rolls(0.0, 0.5, 99.0),
        );
        assert_eq!(mid.damage, 75);
    }

    #[test]
    fn test_crit_and_reduction() {
        let tuning = CombatTuning::default();
        let mut attacker = stats(40, 100.0, 0.0);
        attacker.crit_chance = 50.0;
        let mut defender = stats(10, 0.0, 0.0);
        defender.physical_reduction = 0.25;

        let outcome = resolve_attack_with_rolls(
            &attacker,
            &defender,
            1.0,
            DamageSchool::Physical,
            1.5,
            &tuning,
            rolls(0.0, 0.0, 10.0),
        );
        // 40 × 1.5 × 2.0 × 0.75
        assert!(outcome.is_crit);
        assert_eq!(outcome.damage, 90);
    }

    #[test]
    fn test_hit_never_below_one() {
        let tuning = CombatTuning::default();
        let attacker = stats(0, 100.0, 0.0);
        let mut defender = stats(10, 0.0, 0.0);
        defender.physical_reduction = 1.0;

        let outcome = resolve_attack_with_rolls(
            &attacker,
            &defender,
            0.5,
            DamageSchool::Physical,
            1.0,
            &tuning,
            rolls(0.0, 0.0, 99.0),
        );
        assert!(outcome.is_hit);
        assert_eq!(outcome.damage, 1);
    }

    #[test]
    fn test_pure_ignores_reduction() {
        let tuning = CombatTuning::default();
        let attacker = stats(30, 100.0, 0.0);
        let mut defender = stats(10, 0.0, 0.0);
        defender.physical_reduction = 0.9;
        defender.magical_reduction = 0.9;

        let outcome = resolve_attack_with_rolls(
            &attacker,
            &defender,
            1.0,
            DamageSchool::Pure,
            1.0,
            &tuning,
            rolls(0.0, 0.0, 99.0),
        );
        assert_eq!(outcome.damage, 30);
    }

    #[test]
    fn test_seeded_resolution_is_reproducible() {
        let tuning = CombatTuning::default();
        let attacker = stats(25, 80.0, 0.0);
        let defender = stats(10, 0.0, 20.0);

        let mut a = ChaCha8Rng::seed_from_u64(11);
        let mut b = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let school = DamageSchool::Physical;
            let x = resolve_attack(&attacker, &defender, 0.7, school, 1.0, &tuning, &mut a);
            let y = resolve_attack(&attacker, &defender, 0.7, school, 1.0, &tuning, &mut b);
            assert_eq!(x, y);
        }
    }

    #[test]
    fn test_heal_crit_uses_tuning_multiplier() {
        let tuning = CombatTuning::default();
        let mut caster = stats(20, 100.0, 0.0);
        caster.crit_chance = 100.0;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (amount, crit) = resolve_heal(&caster, 1.0, &tuning, &mut rng);
        assert!(crit);
        assert_eq!(amount, 30);
    }
}
