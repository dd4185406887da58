//! Static skill and consumable definitions plus the catalog that looks them up.

use crate::core::error::CombatError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSchool {
    Physical,
    Magical,
    /// Ignores damage reduction.
    Pure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetShape {
    Single,
    AllAllies,
    AllEnemies,
    SelfOnly,
}

impl TargetShape {
    pub fn is_area(&self) -> bool {
        matches!(self, TargetShape::AllAllies | TargetShape::AllEnemies)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTag {
    Damage,
    Heal,
    Buff,
    Debuff,
}

/// The single branch a skill resolves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectBranch {
    Damage,
    Heal,
    Buff,
    Debuff,
}

impl EffectBranch {
    /// Damage and debuffs land on the opposing side.
    pub fn is_offensive(&self) -> bool {
        matches!(self, EffectBranch::Damage | EffectBranch::Debuff)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_multiplier() -> f64 {
    1.0
}

/// Immutable skill definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    #[serde(default)]
    pub mp_cost: u32,
    pub school: DamageSchool,
    /// Scales the caster's attack (or magic attack for heals).
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    pub target: TargetShape,
    pub tags: Vec<EffectTag>,
    /// Status tag applied by buff/debuff skills.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
}

impl Skill {
    /// Picks the effect branch. Tags are checked heal, buff, debuff, then
    /// damage; a skill with no recognised tag deals damage.
    pub fn branch(&self) -> EffectBranch {
        if self.tags.contains(&EffectTag::Heal) {
            EffectBranch::Heal
        } else if self.tags.contains(&EffectTag::Buff) {
            EffectBranch::Buff
        } else if self.tags.contains(&EffectTag::Debuff) {
            EffectBranch::Debuff
        } else {
            EffectBranch::Damage
        }
    }

    pub fn is_offensive(&self) -> bool {
        self.branch().is_offensive()
    }

    /// Status name applied by buff/debuff branches, defaulting to the skill name.
    pub fn status_name(&self) -> &str {
        self.status.as_deref().unwrap_or(&self.name)
    }

    /// Rejects shape/branch pairs the resolver cannot honour: a caster-only
    /// skill must heal or buff.
    pub fn validate(&self) -> Result<(), CombatError> {
        if self.target == TargetShape::SelfOnly && self.is_offensive() {
            return Err(CombatError::Config(format!(
                "skill `{}` targets its caster but deals damage or a debuff",
                self.id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumableEffect {
    RestoreHp(u32),
    RestoreMp(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumable {
    pub id: ItemId,
    pub name: String,
    pub effect: ConsumableEffect,
}

/// Read-only skill and consumable lookup, shared by every battle.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    skills: HashMap<SkillId, Skill>,
    consumables: HashMap<ItemId, Consumable>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    skills: Vec<Skill>,
    consumables: Vec<Consumable>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skills(skills: impl IntoIterator<Item = Skill>) -> Self {
        let mut catalog = Self::new();
        for skill in skills {
            catalog.add_skill(skill);
        }
        catalog
    }

    /// Inserts without validation; file-loaded catalogs go through [`Skill::validate`].
    pub fn add_skill(&mut self, skill: Skill) {
        self.skills.insert(skill.id.clone(), skill);
    }

    pub fn add_consumable(&mut self, consumable: Consumable) {
        self.consumables.insert(consumable.id.clone(), consumable);
    }

    pub fn skill(&self, id: &SkillId) -> Option<&Skill> {
        self.skills.get(id)
    }

    pub fn consumable(&self, id: &ItemId) -> Option<&Consumable> {
        self.consumables.get(id)
    }

    pub fn require_skill(&self, id: &SkillId) -> Result<&Skill, CombatError> {
        self.skill(id).ok_or_else(|| CombatError::UnknownSkill(id.clone()))
    }

    pub fn require_consumable(&self, id: &ItemId) -> Result<&Consumable, CombatError> {
        self.consumable(id).ok_or_else(|| CombatError::UnknownItem(id.clone()))
    }

    /// Parses `{ "skills": [...], "consumables": [...] }`.
    pub fn from_json_str(json: &str) -> Result<Self, CombatError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        for skill in &file.skills {
            skill.validate()?;
        }
        let mut catalog = Self::with_skills(file.skills);
        for consumable in file.consumables {
            catalog.add_consumable(consumable);
        }
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CombatError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
