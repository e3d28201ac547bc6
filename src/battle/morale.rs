//! Morale status ladder
//!
//! Failed checks push a formation one step down the ladder. Routed is
//! absorbing: nothing in this engine moves a formation back up.

use serde::{Deserialize, Serialize};

/// Ordered morale levels, best first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MoraleStatus {
    #[default]
    Normal,
    Shaken,
    Unsteady,
    Broken,
    Routed,
}

impl MoraleStatus {
    /// Next level down, saturating at Routed
    pub fn worsened(self) -> Self {
        match self {
            MoraleStatus::Normal => MoraleStatus::Shaken,
            MoraleStatus::Shaken => MoraleStatus::Unsteady,
            MoraleStatus::Unsteady => MoraleStatus::Broken,
            MoraleStatus::Broken | MoraleStatus::Routed => MoraleStatus::Routed,
        }
    }

    pub fn is_routed(self) -> bool {
        matches!(self, MoraleStatus::Routed)
    }

    /// Additive to-hit penalty for acting under this morale
    pub fn to_hit_modifier(self) -> i32 {
        match self {
            MoraleStatus::Normal => 0,
            MoraleStatus::Shaken => 1,
            MoraleStatus::Unsteady => 2,
            MoraleStatus::Broken => 3,
            MoraleStatus::Routed => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MoraleStatus::Normal => "Normal",
            MoraleStatus::Shaken => "Shaken",
            MoraleStatus::Unsteady => "Unsteady",
            MoraleStatus::Broken => "Broken",
            MoraleStatus::Routed => "Routed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worsened_advances_one_step() {
        assert_eq!(MoraleStatus::Normal.worsened(), MoraleStatus::Shaken);
        assert_eq!(MoraleStatus::Shaken.worsened(), MoraleStatus::Unsteady);
        assert_eq!(MoraleStatus::Unsteady.worsened(), MoraleStatus::Broken);
        assert_eq!(MoraleStatus::Broken.worsened(), MoraleStatus::Routed);
    }

    #[test]
    fn test_routed_is_absorbing() {
        assert_eq!(MoraleStatus::Routed.worsened(), MoraleStatus::Routed);
        assert!(MoraleStatus::Routed.is_routed());
    }

    #[test]
    fn test_worsened_never_improves() {
        let mut status = MoraleStatus::Normal;
        for _ in 0..10 {
            let next = status.worsened();
            assert!(next >= status);
            status = next;
        }
        assert_eq!(status, MoraleStatus::Routed);
    }

    #[test]
    fn test_modifier_grows_with_worse_morale() {
        assert_eq!(MoraleStatus::Normal.to_hit_modifier(), 0);
        assert!(MoraleStatus::Broken.to_hit_modifier() > MoraleStatus::Shaken.to_hit_modifier());
    }
}
