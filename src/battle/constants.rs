//! Battle rule constants - all tunable table values in one place
//!
//! To-hit modifiers are ADDITIVE. Damage multipliers only come from
//! engagement control.

// Dice
pub const DICE_MAX: i32 = 12;
pub const WITHDRAW_REQUIRED_ROLL: i32 = 12;

// Range brackets (to-hit)
pub const SHORT_RANGE_MODIFIER: i32 = 0;
pub const MEDIUM_RANGE_MODIFIER: i32 = 2;
pub const LONG_RANGE_MODIFIER: i32 = 4;
pub const EXTREME_RANGE_MODIFIER: i32 = 6;

// Engagement control choice (to-hit)
pub const FORCED_ENGAGEMENT_MODIFIER: i32 = 1;
pub const EVADE_MODIFIER: i32 = -1;
pub const OVERRUN_SIZE_MODIFIER_CAP: i32 = 2;

// Recovering nerve
pub const NERVE_BASE_MODIFIER: i32 = 2;
pub const NERVE_CRIPPLED_MODIFIER: i32 = 1;
pub const NERVE_HIGH_STRESS_MODIFIER: i32 = 1;

// Standard attack damage
pub const MANEUVER_SUCCESS_BONUS_DAMAGE: f64 = 1.0;
pub const MINIMUM_HIT_DAMAGE: u32 = 1;

// Engagement control damage multipliers (attacker won)
pub const OVERRUN_VICTORY_MULTIPLIER: f64 = 0.25;
pub const FORCED_ENGAGEMENT_VICTORY_MULTIPLIER: f64 = 0.5;
// Engagement control damage multipliers (attacker lost)
pub const EVADE_DEFEAT_MULTIPLIER: f64 = 0.5;

// Critical roll bands (2d6 total, inclusive upper bounds)
pub const CRIT_NO_EFFECT_MAX: i32 = 4;
pub const CRIT_TARGETING_MAX: i32 = 7;
pub const CRIT_DAMAGE_MAX: i32 = 9;
pub const CRIT_BOTH_MAX: i32 = 11;

// Scenario limits on formation ratings (skill, tactics, size, tmm)
pub const MAX_RATING_MAGNITUDE: i32 = 99;
