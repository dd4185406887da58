use crate::character::attributes::PrimaryStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Helmet,
    Gloves,
    Boots,
    Accessory,
}

impl EquipmentSlot {
    pub fn all() -> [EquipmentSlot; 6] {
        [
            EquipmentSlot::Weapon,
            EquipmentSlot::Armor,
            EquipmentSlot::Helmet,
            EquipmentSlot::Gloves,
            EquipmentSlot::Boots,
            EquipmentSlot::Accessory,
        ]
    }
}

/// Stat contribution of one equipped item.
///
/// `attributes` is merged into the primary layers before derivation; the flat
/// fields are folded into derived stats afterwards. Equipment never touches
/// HP, MP or speed directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentBonus {
    pub attributes: PrimaryStats,
    pub attack: u32,
    pub defense: u32,
    pub magic_attack: u32,
    pub magic_defense: u32,
    /// Flat physical reduction fraction added after defense-based reduction.
    pub physical_reduction: f64,
    pub magical_reduction: f64,
}

impl EquipmentBonus {
    pub fn weapon(attack: u32) -> Self {
        Self {
            attack,
            ..Default::default()
        }
    }

    pub fn armor(defense: u32, magic_defense: u32) -> Self {
        Self {
            defense,
            magic_defense,
            ..Default::default()
        }
    }
}
