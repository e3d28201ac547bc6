//! Unit hierarchy: Element → Unit → Formation
//!
//! Elements are individual combatants and carry damage by range.
//! Units group elements and are the level armor and crits are tracked at.
//! Formations organize units and are the level engagement control and
//! morale are tracked at.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::battle::engagement::EngagementControl;
use crate::battle::memory::FormationMemory;
use crate::battle::morale::MoraleStatus;
use crate::battle::to_hit::AttackRange;
use crate::core::types::{ElementId, FormationId, PlayerId};

/// Individual combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub name: String,
    /// Standard damage by range; a missing bracket deals nothing there
    pub damage: BTreeMap<AttackRange, f64>,
    pub deployed: bool,
    /// Elements this one has been credited with destroying
    pub kills: Vec<ElementId>,
}

impl Element {
    pub fn new(id: ElementId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            damage: BTreeMap::new(),
            deployed: true,
            kills: Vec::new(),
        }
    }

    pub fn with_damage(mut self, range: AttackRange, value: f64) -> Self {
        self.damage.insert(range, value);
        self
    }

    pub fn damage_at(&self, range: AttackRange) -> Option<f64> {
        self.damage.get(&range).copied()
    }
}

/// A cluster of elements; the target of attacks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub elements: Vec<Element>,
    pub current_armor: u32,
    pub max_armor: u32,
    pub targeting_crits: u32,
    pub damage_crits: u32,
}

impl Unit {
    pub fn new(name: impl Into<String>, max_armor: u32) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
            current_armor: max_armor,
            max_armor,
            targeting_crits: 0,
            damage_crits: 0,
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn is_destroyed(&self) -> bool {
        self.current_armor == 0
    }

    /// At or below half of max armor
    pub fn is_damaged(&self) -> bool {
        self.current_armor <= self.max_armor / 2
    }

    /// Set armor, clamped to `[0, max_armor]`
    pub fn set_armor(&mut self, armor: u32) {
        self.current_armor = armor.min(self.max_armor);
    }

    /// Summed standard damage of every element that can fire at `range`
    pub fn damage_at(&self, range: AttackRange) -> f64 {
        self.elements.iter().filter_map(|e| e.damage_at(range)).sum()
    }
}

/// A formation (group of units acting together)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub id: FormationId,
    pub name: String,
    pub owner: PlayerId,
    pub units: Vec<Unit>,

    // Ratings
    pub skill: i32,
    pub tactics: i32,
    pub size: i32,
    /// Target movement modifier applied to attacks against this formation
    pub tmm: i32,

    // Engagement state
    pub engagement_control: Option<EngagementControl>,
    pub engagement_control_failed: bool,
    pub target_formation_id: Option<FormationId>,

    // Morale
    pub morale_status: MoraleStatus,
    pub high_stress_episode: bool,

    pub deployed: bool,
    pub memory: FormationMemory,
}

impl Formation {
    pub fn new(id: FormationId, owner: PlayerId) -> Self {
        Self {
            id,
            name: String::new(),
            owner,
            units: Vec::new(),
            skill: 4,
            tactics: 4,
            size: 1,
            tmm: 0,
            engagement_control: None,
            engagement_control_failed: false,
            target_formation_id: None,
            morale_status: MoraleStatus::Normal,
            high_stress_episode: false,
            deployed: true,
            memory: FormationMemory::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    /// Display name, falling back to the id
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            self.id.to_string()
        } else {
            self.name.clone()
        }
    }

    /// Indices of units that can still be targeted
    pub fn live_unit_indices(&self) -> Vec<usize> {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, u)| !u.is_destroyed())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_live_units(&self) -> bool {
        self.units.iter().any(|u| !u.is_destroyed())
    }

    /// Crippled when at least half its units are at or below half armor
    pub fn is_crippled(&self) -> bool {
        if self.units.is_empty() {
            return false;
        }
        let damaged = self.units.iter().filter(|u| u.is_damaged()).count();
        damaged * 2 >= self.units.len()
    }

    /// Advance morale one step; returns the new status
    pub fn worsen_morale(&mut self) -> MoraleStatus {
        self.morale_status = self.morale_status.worsened();
        self.morale_status
    }

    pub fn total_armor(&self) -> u32 {
        self.units
            .iter()
            .fold(0u32, |total, u| total.saturating_add(u.current_armor))
    }
}
