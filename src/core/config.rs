//! Engine configuration with documented rule knobs
//!
//! Table constants (range brackets, crit bands, multipliers) live in
//! `battle::constants`; the values here are the ones a scenario may override.

use serde::{Deserialize, Serialize};

/// Configuration for the resolution engine
///
/// Loaded from the `[config]` table of a scenario file. Every field has a
/// default, so an empty table is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the dice source. Same seed + same scenario = same report.
    pub seed: u64,

    /// Rounds to play before the battle is declared a draw
    pub max_rounds: u32,

    /// Added to the withdraw target number when the formation is crippled
    pub crippled_withdraw_penalty: i32,

    /// To-hit penalty per targeting crit on the attacking unit
    pub targeting_crit_modifier: i32,

    /// To-hit penalty for firing at a formation other than the engaged one
    pub secondary_target_modifier: i32,

    /// Write the real engagement-control winner into formation memory
    ///
    /// When false both mirrored memory records carry
    /// `won_engagement_control = false`, which keeps victory damage
    /// multipliers dormant.
    pub record_engagement_winner: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_rounds: 20,
            crippled_withdraw_penalty: 3,
            targeting_crit_modifier: 1,
            secondary_target_modifier: 1,
            record_engagement_winner: false,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rounds == 0 {
            return Err("max_rounds must be at least 1".into());
        }

        if self.crippled_withdraw_penalty < 0 {
            return Err(format!(
                "crippled_withdraw_penalty ({}) must not be negative",
                self.crippled_withdraw_penalty
            ));
        }

        if self.targeting_crit_modifier < 0 || self.secondary_target_modifier < 0 {
            return Err("to-hit penalties must not be negative".into());
        }

        Ok(())
    }
}
