// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 100;
pub const DEFAULT_PLAYBACK_SPEED: f64 = 1.0;
pub const MAX_PLAYBACK_SPEED: f64 = 8.0;

// Readiness gauge
pub const ACTION_THRESHOLD: f64 = 100.0;
pub const GAUGE_PER_SPEED_POINT: f64 = 0.05;

// Safety caps (logical ticks) against stalemates such as zero-speed teams
pub const DEFAULT_BATTLE_MAX_TICKS: u64 = 200_000;
pub const DEFAULT_MATCH_MAX_TICKS: u64 = 200_000;

// Hit resolution (percent)
pub const MIN_HIT_CHANCE_PERCENT: f64 = 5.0;
pub const MAX_HIT_CHANCE_PERCENT: f64 = 100.0;

// Healing
pub const HEAL_CRIT_MULTIPLIER: f64 = 1.5;
pub const AUTO_HEAL_HP_RATIO: f64 = 0.5;

// Status markers
pub const DEFAULT_STATUS_DURATION: u32 = 3;

// Primary attributes
pub const NUM_ATTRIBUTES: usize = 5;

// Derivation: max HP = BASE_HP + VIT × HP_PER_VIT + level × HP_PER_LEVEL
pub const BASE_HP: u32 = 40;
pub const HP_PER_VIT: u32 = 10;
pub const HP_PER_LEVEL: u32 = 8;

// Max MP = BASE_MP + INT × MP_PER_INT + level × MP_PER_LEVEL
pub const BASE_MP: u32 = 10;
pub const MP_PER_INT: u32 = 5;
pub const MP_PER_LEVEL: u32 = 2;

// Attack = BASE_ATTACK + STR × ATTACK_PER_STR + level (same shape for INT → magic attack)
pub const BASE_ATTACK: u32 = 4;
pub const ATTACK_PER_STR: u32 = 2;
pub const MAGIC_ATTACK_PER_INT: u32 = 2;

// Reduction = defense / (defense + REDUCTION_SOFTCAP)
pub const REDUCTION_SOFTCAP: f64 = 100.0;

// Crit
pub const BASE_CRIT_CHANCE_PERCENT: f64 = 5.0;
pub const MAX_CRIT_CHANCE_PERCENT: f64 = 100.0;
pub const BASE_CRIT_DAMAGE_PERCENT: f64 = 150.0;

// Accuracy / evasion / speed
pub const BASE_ACCURACY_PERCENT: f64 = 90.0;
pub const BASE_SPEED: u32 = 40;
pub const SPEED_PER_DEX: u32 = 2;

// Job efficiency floors (fraction of full damage at the worst roll)
pub const WARRIOR_EFFICIENCY_FLOOR: f64 = 0.85;
pub const KNIGHT_EFFICIENCY_FLOOR: f64 = 0.80;
pub const ROGUE_EFFICIENCY_FLOOR: f64 = 0.70;
pub const ARCHER_EFFICIENCY_FLOOR: f64 = 0.75;
pub const MAGE_EFFICIENCY_FLOOR: f64 = 0.80;
pub const PRIEST_EFFICIENCY_FLOOR: f64 = 0.60;
pub const BEAST_EFFICIENCY_FLOOR: f64 = 0.75;
