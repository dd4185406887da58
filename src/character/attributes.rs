use crate::core::constants::NUM_ATTRIBUTES;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Attribute {
    Strength,
    Vitality,
    Dexterity,
    Intelligence,
    Luck,
}

impl Attribute {
    pub fn all() -> [Attribute; NUM_ATTRIBUTES] {
        [
            Attribute::Strength,
            Attribute::Vitality,
            Attribute::Dexterity,
            Attribute::Intelligence,
            Attribute::Luck,
        ]
    }

    pub fn abbrev(&self) -> &str {
        match self {
            Attribute::Strength => "STR",
            Attribute::Vitality => "VIT",
            Attribute::Dexterity => "DEX",
            Attribute::Intelligence => "INT",
            Attribute::Luck => "LUK",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Attribute::Strength => 0,
            Attribute::Vitality => 1,
            Attribute::Dexterity => 2,
            Attribute::Intelligence => 3,
            Attribute::Luck => 4,
        }
    }
}

/// One layer of primary attributes: innate base, level-up allocation, or gear.
///
/// Layers are `Copy` and merging always builds a fresh value, so a shared base
/// layer is never mutated by folding bonuses into it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "NamedStats", into = "NamedStats")]
pub struct PrimaryStats {
    values: [u32; NUM_ATTRIBUTES],
}

/// Serialized form of [`PrimaryStats`]: named fields, absent ones read as zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
struct NamedStats {
    strength: u32,
    vitality: u32,
    dexterity: u32,
    intelligence: u32,
    luck: u32,
}

impl From<NamedStats> for PrimaryStats {
    fn from(n: NamedStats) -> Self {
        PrimaryStats::new(n.strength, n.vitality, n.dexterity, n.intelligence, n.luck)
    }
}

impl From<PrimaryStats> for NamedStats {
    fn from(stats: PrimaryStats) -> Self {
        NamedStats {
            strength: stats.get(Attribute::Strength),
            vitality: stats.get(Attribute::Vitality),
            dexterity: stats.get(Attribute::Dexterity),
            intelligence: stats.get(Attribute::Intelligence),
            luck: stats.get(Attribute::Luck),
        }
    }
}

impl PrimaryStats {
    pub fn new(strength: u32, vitality: u32, dexterity: u32, intelligence: u32, luck: u32) -> Self {
        Self {
            values: [strength, vitality, dexterity, intelligence, luck],
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, attr: Attribute) -> u32 {
        self.values[attr.index()]
    }

    pub fn set(&mut self, attr: Attribute, value: u32) {
        self.values[attr.index()] = value;
    }

    /// Field-wise sum of two layers, saturating instead of overflowing.
    pub fn plus(&self, other: &PrimaryStats) -> PrimaryStats {
        let mut values = self.values;
        for (value, extra) in values.iter_mut().zip(other.values) {
            *value = value.saturating_add(extra);
        }
        PrimaryStats { values }
    }

    /// Merges any number of layers field-wise. No layers yields all zeros.
    pub fn merge<'a>(layers: impl IntoIterator<Item = &'a PrimaryStats>) -> PrimaryStats {
        layers
            .into_iter()
            .fold(PrimaryStats::zero(), |acc, layer| acc.plus(layer))
    }

    pub fn total(&self) -> u32 {
        self.values.iter().fold(0u32, |acc, v| acc.saturating_add(*v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let stats = PrimaryStats::default();
        for attr in Attribute::all() {
            assert_eq!(stats.get(attr), 0);
        }
    }

    #[test]
    fn test_get_set() {
        let mut stats = PrimaryStats::zero();
        stats.set(Attribute::Strength, 16);
        assert_eq!(stats.get(Attribute::Strength), 16);
        assert_eq!(stats.get(Attribute::Dexterity), 0);
    }

    #[test]
    fn test_new_orders_fields() {
        let stats = PrimaryStats::new(1, 2, 3, 4, 5);
        assert_eq!(stats.get(Attribute::Strength), 1);
        assert_eq!(stats.get(Attribute::Vitality), 2);
        assert_eq!(stats.get(Attribute::Dexterity), 3);
        assert_eq!(stats.get(Attribute::Intelligence), 4);
        assert_eq!(stats.get(Attribute::Luck), 5);
    }

    #[test]
    fn test_merge_two_layers() {
        let base = PrimaryStats::new(10, 8, 6, 4, 2);
        let allocated = PrimaryStats::new(3, 0, 1, 0, 2);
        let merged = PrimaryStats::merge([&base, &allocated]);

        assert_eq!(merged, PrimaryStats::new(13, 8, 7, 4, 4));
        // Base layer untouched
        assert_eq!(base, PrimaryStats::new(10, 8, 6, 4, 2));
    }

    #[test]
    fn test_merge_three_layers() {
        let base = PrimaryStats::new(5, 5, 5, 5, 5);
        let allocated = PrimaryStats::new(1, 2, 3, 4, 5);
        let gear = PrimaryStats::new(10, 0, 0, 0, 1);
        let merged = PrimaryStats::merge([&base, &allocated, &gear]);
        assert_eq!(merged, PrimaryStats::new(16, 7, 8, 9, 11));
    }

    #[test]
    fn test_merge_no_layers_is_zero() {
        let none: [&PrimaryStats; 0] = [];
        assert_eq!(PrimaryStats::merge(none), PrimaryStats::zero());
    }

    #[test]
    fn test_plus_saturates() {
        let huge = PrimaryStats::new(u32::MAX, 0, 0, 0, 0);
        let one = PrimaryStats::new(1, 0, 0, 0, 0);
        assert_eq!(huge.plus(&one).get(Attribute::Strength), u32::MAX);
    }

    #[test]
    fn test_index_returns_unique_values() {
        for (i, attr) in Attribute::all().iter().enumerate() {
            assert_eq!(attr.index(), i);
        }
    }

    #[test]
    fn test_json_uses_named_fields() {
        let stats: PrimaryStats = serde_json::from_str(r#"{ "strength": 7, "luck": 2 }"#).unwrap();
        assert_eq!(stats, PrimaryStats::new(7, 0, 0, 0, 2));

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"strength\":7"));
    }

    #[test]
    fn test_attribute_abbrev() {
        assert_eq!(Attribute::Strength.abbrev(), "STR");
        assert_eq!(Attribute::Vitality.abbrev(), "VIT");
        assert_eq!(Attribute::Luck.abbrev(), "LUK");
    }
}
