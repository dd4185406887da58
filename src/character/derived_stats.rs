use super::attributes::{Attribute, PrimaryStats};
use crate::combat::skills::DamageSchool;
use crate::core::constants::*;
use crate::items::{Equipment, EquipmentBonus};
use serde::{Deserialize, Serialize};

/// Flat, combat-usable numbers derived from primary attributes and level.
///
/// Integer fields are unsigned so they can never go negative; reduction
/// fractions are kept in `[0, 1]` by every constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub max_hp: u32,
    pub max_mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub physical_reduction: f64,
    pub magic_attack: u32,
    pub magic_defense: u32,
    pub magical_reduction: f64,
    /// Percent, 0-100.
    pub crit_chance: f64,
    /// Percent applied on crit, always above 100.
    pub crit_damage: f64,
    /// Percent.
    pub accuracy: f64,
    /// Percent.
    pub evasion: f64,
    pub speed: u32,
}

impl DerivedStats {
    /// Derives stats from merged primary attributes and level.
    ///
    /// Level 0 is a programmer error; release builds treat it as level 1.
    pub fn from_primary(primary: &PrimaryStats, level: u32) -> Self {
        debug_assert!(level >= 1, "level must be at least 1");
        let level = level.max(1);

        let str = primary.get(Attribute::Strength);
        let vit = primary.get(Attribute::Vitality);
        let dex = primary.get(Attribute::Dexterity);
        let int = primary.get(Attribute::Intelligence);
        let luk = primary.get(Attribute::Luck);

        // Max HP = BASE_HP + VIT × HP_PER_VIT + level × HP_PER_LEVEL
        let max_hp = BASE_HP
            .saturating_add(vit.saturating_mul(HP_PER_VIT))
            .saturating_add(level.saturating_mul(HP_PER_LEVEL));

        let max_mp = BASE_MP
            .saturating_add(int.saturating_mul(MP_PER_INT))
            .saturating_add(level.saturating_mul(MP_PER_LEVEL));

        let attack = BASE_ATTACK
            .saturating_add(str.saturating_mul(ATTACK_PER_STR))
            .saturating_add(level);
        let magic_attack = BASE_ATTACK
            .saturating_add(int.saturating_mul(MAGIC_ATTACK_PER_INT))
            .saturating_add(level);

        let defense = vit.saturating_add(level / 2);
        let magic_defense = ((vit as u64 + int as u64) / 2 + (level / 2) as u64)
            .min(u32::MAX as u64) as u32;

        let crit_chance =
            (BASE_CRIT_CHANCE_PERCENT + luk as f64 / 2.0).min(MAX_CRIT_CHANCE_PERCENT);
        let crit_damage = BASE_CRIT_DAMAGE_PERCENT + luk as f64;
        let accuracy = BASE_ACCURACY_PERCENT + dex as f64 / 2.0;
        let evasion = (dex as f64 + luk as f64) / 4.0;
        let speed = BASE_SPEED.saturating_add(dex.saturating_mul(SPEED_PER_DEX));

        Self {
            max_hp,
            max_mp,
            attack,
            defense,
            physical_reduction: reduction_from_defense(defense),
            magic_attack,
            magic_defense,
            magical_reduction: reduction_from_defense(magic_defense),
            crit_chance,
            crit_damage,
            accuracy,
            evasion,
            speed,
        }
    }

    /// Folds per-slot equipment bonuses into attack, defense and reduction.
    ///
    /// Empty slots contribute nothing. Reduction is recomputed from the new
    /// defense totals, then flat reduction bonuses are added and clamped.
    /// HP, MP and speed are left alone: gear affects them only through the
    /// attribute layer merged before derivation.
    pub fn with_equipment(&self, bonuses: &[Option<EquipmentBonus>]) -> Self {
        let mut stats = *self;
        let mut flat_physical = 0.0;
        let mut flat_magical = 0.0;

        for bonus in bonuses.iter().flatten() {
            stats.attack = stats.attack.saturating_add(bonus.attack);
            stats.defense = stats.defense.saturating_add(bonus.defense);
            stats.magic_attack = stats.magic_attack.saturating_add(bonus.magic_attack);
            stats.magic_defense = stats.magic_defense.saturating_add(bonus.magic_defense);
            flat_physical += sanitize(bonus.physical_reduction);
            flat_magical += sanitize(bonus.magical_reduction);
        }

        stats.physical_reduction =
            (reduction_from_defense(stats.defense) + flat_physical).clamp(0.0, 1.0);
        stats.magical_reduction =
            (reduction_from_defense(stats.magic_defense) + flat_magical).clamp(0.0, 1.0);
        stats
    }

    /// Battle-ready stats: merges base, allocated and gear attributes, derives,
    /// then folds in the gear's flat contributions.
    pub fn for_battle(
        base: &PrimaryStats,
        allocated: &PrimaryStats,
        equipment: &Equipment,
        level: u32,
    ) -> Self {
        let gear = equipment.attribute_layer();
        let merged = PrimaryStats::merge([base, allocated, &gear]);
        Self::from_primary(&merged, level).with_equipment(&equipment.bonus_list())
    }

    /// Offense stat used for `school`. Pure damage uses the higher attack.
    pub fn offense(&self, school: DamageSchool) -> u32 {
        match school {
            DamageSchool::Physical => self.attack,
            DamageSchool::Magical => self.magic_attack,
            DamageSchool::Pure => self.attack.max(self.magic_attack),
        }
    }

    /// Damage-reduction fraction against `school`. Pure damage ignores reduction.
    pub fn reduction(&self, school: DamageSchool) -> f64 {
        match school {
            DamageSchool::Physical => self.physical_reduction,
            DamageSchool::Magical => self.magical_reduction,
            DamageSchool::Pure => 0.0,
        }
    }
}

fn reduction_from_defense(defense: u32) -> f64 {
    let defense = defense as f64;
    (defense / (defense + REDUCTION_SOFTCAP)).clamp(0.0, 1.0)
}

fn sanitize(fraction: f64) -> f64 {
    if fraction.is_finite() {
        fraction
    } else {
        0.0
    }
}
