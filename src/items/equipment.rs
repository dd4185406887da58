use super::types::{EquipmentBonus, EquipmentSlot};
use crate::character::attributes::PrimaryStats;
use serde::{Deserialize, Serialize};

/// A unit's equipped items, read from the roster as a snapshot for one battle.
///
/// Missing slots in serialized rosters default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Equipment {
    pub weapon: Option<EquipmentBonus>,
    pub armor: Option<EquipmentBonus>,
    pub helmet: Option<EquipmentBonus>,
    pub gloves: Option<EquipmentBonus>,
    pub boots: Option<EquipmentBonus>,
    pub accessory: Option<EquipmentBonus>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> &Option<EquipmentBonus> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::Armor => &self.armor,
            EquipmentSlot::Helmet => &self.helmet,
            EquipmentSlot::Gloves => &self.gloves,
            EquipmentSlot::Boots => &self.boots,
            EquipmentSlot::Accessory => &self.accessory,
        }
    }

    pub fn set(&mut self, slot: EquipmentSlot, item: Option<EquipmentBonus>) {
        match slot {
            EquipmentSlot::Weapon => self.weapon = item,
            EquipmentSlot::Armor => self.armor = item,
            EquipmentSlot::Helmet => self.helmet = item,
            EquipmentSlot::Gloves => self.gloves = item,
            EquipmentSlot::Boots => self.boots = item,
            EquipmentSlot::Accessory => self.accessory = item,
        }
    }

    /// Per-slot bonus list in slot order; empty slots are `None`.
    pub fn bonus_list(&self) -> [Option<EquipmentBonus>; 6] {
        EquipmentSlot::all().map(|slot| *self.get(slot))
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &EquipmentBonus> {
        [
            &self.weapon,
            &self.armor,
            &self.helmet,
            &self.gloves,
            &self.boots,
            &self.accessory,
        ]
        .into_iter()
        .filter_map(|item| item.as_ref())
    }

    /// Sum of the primary-attribute bonuses of every equipped item.
    pub fn attribute_layer(&self) -> PrimaryStats {
        PrimaryStats::merge(self.iter_equipped().map(|item| &item.attributes))
    }
}
