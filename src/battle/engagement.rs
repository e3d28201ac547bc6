//! Engagement control modes and their effect on later attacks
//!
//! Engagement control is resolved in the movement phase. Its outcome is
//! remembered by both formations and discounts (or preserves) damage dealt
//! by the attacker in the firing phase.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    EVADE_DEFEAT_MULTIPLIER, FORCED_ENGAGEMENT_VICTORY_MULTIPLIER, OVERRUN_VICTORY_MULTIPLIER,
};
use crate::battle::memory::{EngagementRecord, FormationMemory};
use crate::battle::to_hit::AttackRange;
use crate::core::types::FormationId;

/// How a formation tries to control the engagement with its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementControl {
    #[default]
    None,
    Standard,
    Evade,
    Overrun,
    ForcedEngagement,
}

impl EngagementControl {
    /// Modes that link the pair of formations when won
    pub fn links_on_victory(self) -> bool {
        !matches!(self, EngagementControl::None)
    }

    /// Range the attacker ends up firing at once this mode is in effect
    pub fn preferred_range(self) -> AttackRange {
        match self {
            EngagementControl::Overrun | EngagementControl::ForcedEngagement => AttackRange::Short,
            EngagementControl::Standard | EngagementControl::None => AttackRange::Medium,
            EngagementControl::Evade => AttackRange::Long,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EngagementControl::None => "none",
            EngagementControl::Standard => "standard",
            EngagementControl::Evade => "evade",
            EngagementControl::Overrun => "overrun",
            EngagementControl::ForcedEngagement => "forced engagement",
        }
    }
}

/// Damage multiplier when the attacker won engagement control with `mode`
pub fn victory_multiplier(mode: EngagementControl) -> f64 {
    match mode {
        EngagementControl::Overrun => OVERRUN_VICTORY_MULTIPLIER,
        EngagementControl::ForcedEngagement => FORCED_ENGAGEMENT_VICTORY_MULTIPLIER,
        EngagementControl::Standard | EngagementControl::Evade | EngagementControl::None => 1.0,
    }
}

/// Damage multiplier when the attacker lost engagement control with `mode`
pub fn defeat_multiplier(mode: EngagementControl) -> f64 {
    match mode {
        EngagementControl::Evade => EVADE_DEFEAT_MULTIPLIER,
        _ => 1.0,
    }
}

/// Multiplier for a single remembered engagement
pub fn record_multiplier(record: &EngagementRecord) -> f64 {
    if record.won_engagement_control {
        victory_multiplier(record.engagement_control)
    } else {
        defeat_multiplier(record.engagement_control)
    }
}

/// Multiplier applied to damage the owner of `memory` deals to `target`
///
/// Only records where the owner was the initiating side count. No record
/// means no modification.
pub fn damage_multiplier(memory: &FormationMemory, target: FormationId) -> f64 {
    memory
        .engagement_as_attacker(target)
        .map(record_multiplier)
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(won: bool, mode: EngagementControl) -> EngagementRecord {
        EngagementRecord {
            target_formation_id: FormationId(2),
            attacker: true,
            won_engagement_control: won,
            engagement_control: mode,
        }
    }

    #[test]
    fn test_victory_multipliers() {
        assert_eq!(victory_multiplier(EngagementControl::Overrun), 0.25);
        assert_eq!(victory_multiplier(EngagementControl::ForcedEngagement), 0.5);
        assert_eq!(victory_multiplier(EngagementControl::Standard), 1.0);
        assert_eq!(victory_multiplier(EngagementControl::Evade), 1.0);
        assert_eq!(victory_multiplier(EngagementControl::None), 1.0);
    }

    #[test]
    fn test_defeat_multipliers() {
        assert_eq!(defeat_multiplier(EngagementControl::Evade), 0.5);
        assert_eq!(defeat_multiplier(EngagementControl::Overrun), 1.0);
        assert_eq!(defeat_multiplier(EngagementControl::ForcedEngagement), 1.0);
        assert_eq!(defeat_multiplier(EngagementControl::Standard), 1.0);
    }

    #[test]
    fn test_record_multiplier_uses_outcome() {
        assert_eq!(record_multiplier(&record(true, EngagementControl::Overrun)), 0.25);
        assert_eq!(record_multiplier(&record(false, EngagementControl::Overrun)), 1.0);
        assert_eq!(record_multiplier(&record(false, EngagementControl::Evade)), 0.5);
    }

    #[test]
    fn test_no_memory_means_no_multiplier() {
        let memory = FormationMemory::default();
        assert_eq!(damage_multiplier(&memory, FormationId(2)), 1.0);
    }

    #[test]
    fn test_defender_records_are_ignored() {
        let mut memory = FormationMemory::default();
        memory.remember_engagement(EngagementRecord {
            target_formation_id: FormationId(2),
            attacker: false,
            won_engagement_control: true,
            engagement_control: EngagementControl::Overrun,
        });
        assert_eq!(damage_multiplier(&memory, FormationId(2)), 1.0);
    }

    #[test]
    fn test_multiplier_keyed_by_target() {
        let mut memory = FormationMemory::default();
        memory.remember_engagement(record(true, EngagementControl::Overrun));
        assert_eq!(damage_multiplier(&memory, FormationId(2)), 0.25);
        assert_eq!(damage_multiplier(&memory, FormationId(9)), 1.0);
    }

    #[test]
    fn test_preferred_range() {
        assert_eq!(EngagementControl::Overrun.preferred_range(), AttackRange::Short);
        assert_eq!(EngagementControl::Standard.preferred_range(), AttackRange::Medium);
        assert_eq!(EngagementControl::Evade.preferred_range(), AttackRange::Long);
    }
}
