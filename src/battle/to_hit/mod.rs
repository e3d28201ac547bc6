//! To-hit target numbers
//!
//! A [`TargetRoll`] is the minimum 2d6 total an action needs, built from a
//! base rating plus labelled ADDITIVE modifiers. The calculators in the
//! submodules are pure functions of the current formation state.

pub mod attack;
pub mod engagement;
pub mod nerve;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    DICE_MAX, EXTREME_RANGE_MODIFIER, LONG_RANGE_MODIFIER, MEDIUM_RANGE_MODIFIER,
    SHORT_RANGE_MODIFIER,
};

pub use attack::standard_attack_to_hit;
pub use engagement::{engagement_control_to_hit, withdraw_to_hit};
pub use nerve::recovering_nerve_to_hit;

/// Range bracket of an attack
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AttackRange {
    Short,
    #[default]
    Medium,
    Long,
    Extreme,
}

impl AttackRange {
    pub fn modifier(self) -> i32 {
        match self {
            AttackRange::Short => SHORT_RANGE_MODIFIER,
            AttackRange::Medium => MEDIUM_RANGE_MODIFIER,
            AttackRange::Long => LONG_RANGE_MODIFIER,
            AttackRange::Extreme => EXTREME_RANGE_MODIFIER,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttackRange::Short => "short",
            AttackRange::Medium => "medium",
            AttackRange::Long => "long",
            AttackRange::Extreme => "extreme",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToHitModifier {
    pub value: i32,
    pub description: String,
}

/// Target number for a 2d6 roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRoll {
    modifiers: Vec<ToHitModifier>,
    impossible: Option<String>,
}

impl TargetRoll {
    pub fn new(base: i32, description: impl Into<String>) -> Self {
        Self {
            modifiers: vec![ToHitModifier {
                value: base,
                description: description.into(),
            }],
            impossible: None,
        }
    }

    /// A roll that cannot succeed regardless of the dice
    pub fn impossible(reason: impl Into<String>) -> Self {
        Self {
            modifiers: Vec::new(),
            impossible: Some(reason.into()),
        }
    }

    pub fn add_modifier(&mut self, value: i32, description: impl Into<String>) {
        if value != 0 {
            self.modifiers.push(ToHitModifier {
                value,
                description: description.into(),
            });
        }
    }

    pub fn modifiers(&self) -> &[ToHitModifier] {
        &self.modifiers
    }

    /// Summed target number
    pub fn value(&self) -> i32 {
        self.modifiers
            .iter()
            .fold(0i32, |total, m| total.saturating_add(m.value))
    }

    pub fn is_impossible(&self) -> bool {
        self.impossible.is_some()
    }

    /// True when some 2d6 total can meet the target
    pub fn is_achievable(&self) -> bool {
        !self.is_impossible() && self.value() <= DICE_MAX
    }

    pub fn succeeds(&self, total: i32) -> bool {
        self.is_achievable() && total >= self.value()
    }

    /// Why the roll cannot succeed, if it cannot
    pub fn failure_reason(&self) -> Option<String> {
        if let Some(reason) = &self.impossible {
            return Some(reason.clone());
        }
        if self.value() > DICE_MAX {
            return Some(format!("target number {} exceeds {}", self.value(), DICE_MAX));
        }
        None
    }

    /// e.g. `4 (Skill) + 2 (medium range) - 1 (Evade)`
    pub fn describe(&self) -> String {
        if let Some(reason) = &self.impossible {
            return format!("impossible: {}", reason);
        }
        let mut out = String::new();
        for (i, m) in self.modifiers.iter().enumerate() {
            if i == 0 {
                out.push_str(&format!("{} ({})", m.value, m.description));
            } else if m.value < 0 {
                out.push_str(&format!(" - {} ({})", m.value.unsigned_abs(), m.description));
            } else {
                out.push_str(&format!(" + {} ({})", m.value, m.description));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_are_additive() {
        let mut roll = TargetRoll::new(4, "Skill");
        roll.add_modifier(2, "medium range");
        roll.add_modifier(-1, "Evade");
        assert_eq!(roll.value(), 5);
        assert_eq!(roll.describe(), "4 (Skill) + 2 (medium range) - 1 (Evade)");
    }

    #[test]
    fn test_zero_modifiers_are_not_listed() {
        let mut roll = TargetRoll::new(4, "Skill");
        roll.add_modifier(0, "short range");
        assert_eq!(roll.modifiers().len(), 1);
    }

    #[test]
    fn test_above_twelve_is_unachievable() {
        let mut roll = TargetRoll::new(8, "Skill");
        roll.add_modifier(6, "extreme range");
        assert!(!roll.is_achievable());
        assert!(!roll.succeeds(12));
        assert!(roll.failure_reason().is_some());
    }

    #[test]
    fn test_twelve_is_achievable() {
        let roll = TargetRoll::new(12, "Skill");
        assert!(roll.is_achievable());
        assert!(roll.succeeds(12));
        assert!(!roll.succeeds(11));
    }

    #[test]
    fn test_impossible_roll() {
        let roll = TargetRoll::impossible("formation is routed");
        assert!(!roll.is_achievable());
        assert_eq!(roll.failure_reason().as_deref(), Some("formation is routed"));
        assert_eq!(roll.describe(), "impossible: formation is routed");
    }

    #[test]
    fn test_range_modifiers() {
        assert_eq!(AttackRange::Short.modifier(), 0);
        assert_eq!(AttackRange::Medium.modifier(), 2);
        assert_eq!(AttackRange::Long.modifier(), 4);
        assert_eq!(AttackRange::Extreme.modifier(), 6);
    }
}
