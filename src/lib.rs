//! Warband - turn-based party combat engine
//!
//! Stat derivation, gauge-based turn scheduling, attack and skill resolution,
//! an interactive battle loop and a headless batch simulator sharing one
//! attack formula.

pub mod character;
pub mod combat;
pub mod core;
pub mod items;
pub mod simulator;

pub use character::{DerivedStats, Job, PrimaryStats, UnitSnapshot};
pub use combat::{Action, BattleEvent, BattleOutcome, Catalog, SchedulerMode};
pub use crate::core::{BattleConfig, CombatError, CombatTuning, InteractiveBattle};
pub use simulator::{run_batch, BatchConfig, BatchReport};
