//! Per-formation memory of resolved facts
//!
//! Append-only within a scenario. Later handlers read it to let an earlier
//! action's outcome shape their own math.

use serde::{Deserialize, Serialize};

use crate::battle::engagement::EngagementControl;
use crate::core::types::FormationId;

/// One side's view of a resolved engagement-control roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementRecord {
    pub target_formation_id: FormationId,
    /// True on the record kept by the formation that issued the action
    pub attacker: bool,
    pub won_engagement_control: bool,
    pub engagement_control: EngagementControl,
}

impl EngagementRecord {
    /// The record the other formation keeps about the same roll
    pub fn mirrored(&self, own_id: FormationId, won: bool) -> Self {
        Self {
            target_formation_id: own_id,
            attacker: !self.attacker,
            won_engagement_control: won,
            engagement_control: self.engagement_control,
        }
    }
}

/// Facts a formation remembers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormationMemory {
    engagements: Vec<EngagementRecord>,
}

impl FormationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember_engagement(&mut self, record: EngagementRecord) {
        self.engagements.push(record);
    }

    pub fn engagements(&self) -> &[EngagementRecord] {
        &self.engagements
    }

    /// Latest record where this formation initiated control against `target`
    ///
    /// A newer roll against the same target supersedes the older ones.
    pub fn engagement_as_attacker(&self, target: FormationId) -> Option<&EngagementRecord> {
        self.engagements
            .iter()
            .rev()
            .find(|r| r.attacker && r.target_formation_id == target)
    }

    pub fn is_empty(&self) -> bool {
        self.engagements.is_empty()
    }
}
