//! Scenario files
//!
//! A scenario is a TOML document with an optional `[config]` table,
//! `[[players]]` and `[[formations]]`. Units and elements nest under their
//! formation:
//!
//! ```toml
//! [[formations]]
//! id = 1
//! owner = 1
//! name = "Alpha Lance"
//!
//! [[formations.units]]
//! name = "Assault"
//! armor = 10
//!
//! [[formations.units.elements]]
//! id = 1
//! name = "Atlas"
//! damage = { short = 5, medium = 5, long = 2 }
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::constants::MAX_RATING_MAGNITUDE;
use crate::battle::context::SimulationContext;
use crate::battle::morale::MoraleStatus;
use crate::battle::to_hit::AttackRange;
use crate::battle::units::{Element, Formation, Unit};
use crate::core::config::EngineConfig;
use crate::core::error::{ResolveError, Result};
use crate::core::types::{ElementId, FormationId, Player, PlayerId, TeamId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDef {
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub players: Vec<PlayerDef>,
    pub formations: Vec<FormationDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDef {
    pub id: u32,
    pub name: String,
    pub team: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormationDef {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub owner: u32,
    #[serde(default = "default_rating")]
    pub skill: i32,
    #[serde(default = "default_rating")]
    pub tactics: i32,
    /// Defaults to the number of units
    #[serde(default)]
    pub size: Option<i32>,
    #[serde(default)]
    pub tmm: i32,
    #[serde(default)]
    pub morale: MoraleStatus,
    #[serde(default)]
    pub units: Vec<UnitDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDef {
    pub name: String,
    pub armor: u32,
    /// Starting armor when the unit enters already damaged
    #[serde(default)]
    pub current_armor: Option<u32>,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementDef {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub damage: DamageDef,
}

/// Damage by range bracket; missing brackets deal nothing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DamageDef {
    pub short: Option<f64>,
    pub medium: Option<f64>,
    pub long: Option<f64>,
    pub extreme: Option<f64>,
}

fn default_rating() -> i32 {
    4
}

/// Load and parse a scenario file
pub fn load_scenario(path: &Path) -> Result<ScenarioDef> {
    ScenarioDef::load_from_toml(path)
}

impl ScenarioDef {
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> Result<Self> {
        let scenario: ScenarioDef = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Structural checks that serde cannot express
    pub fn validate(&self) -> Result<()> {
        self.config.validate().map_err(ResolveError::Config)?;

        if self.formations.is_empty() {
            return Err(ResolveError::Scenario("no formations".into()));
        }

        let players: BTreeSet<u32> = self.players.iter().map(|p| p.id).collect();
        if players.len() != self.players.len() {
            return Err(ResolveError::Scenario("duplicate player id".into()));
        }

        let mut formations = BTreeSet::new();
        let mut elements = BTreeSet::new();
        for formation in &self.formations {
            if !formations.insert(formation.id) {
                return Err(ResolveError::Scenario(format!(
                    "duplicate formation id {}",
                    formation.id
                )));
            }
            if !players.is_empty() && !players.contains(&formation.owner) {
                return Err(ResolveError::Scenario(format!(
                    "formation {} is owned by unknown player {}",
                    formation.id, formation.owner
                )));
            }
            let ratings = [
                ("skill", formation.skill),
                ("tactics", formation.tactics),
                ("size", formation.size.unwrap_or(0)),
                ("tmm", formation.tmm),
            ];
            for (rating, value) in ratings {
                if value.unsigned_abs() > MAX_RATING_MAGNITUDE.unsigned_abs() {
                    return Err(ResolveError::Scenario(format!(
                        "formation {} has out-of-range {} {}",
                        formation.id, rating, value
                    )));
                }
            }
            for unit in &formation.units {
                if unit.current_armor.is_some_and(|armor| armor > unit.armor) {
                    return Err(ResolveError::Scenario(format!(
                        "unit '{}' starts above its max armor",
                        unit.name
                    )));
                }
                for element in &unit.elements {
                    if !elements.insert(element.id) {
                        return Err(ResolveError::Scenario(format!(
                            "duplicate element id {}",
                            element.id
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Build a fresh simulation context seeded from the scenario config
    pub fn build(&self) -> Result<SimulationContext> {
        self.build_with_config(self.config.clone())
    }

    /// Build with a config that overrides the scenario's own
    pub fn build_with_config(&self, config: EngineConfig) -> Result<SimulationContext> {
        config.validate().map_err(ResolveError::Config)?;

        let mut ctx = SimulationContext::new(config);
        for player in &self.players {
            ctx.add_player(Player::new(
                PlayerId(player.id),
                player.name.clone(),
                TeamId(player.team),
            ));
        }
        for formation in &self.formations {
            ctx.add_formation(formation.to_formation())?;
        }

        tracing::debug!(
            players = self.players.len(),
            formations = self.formations.len(),
            "scenario built"
        );
        Ok(ctx)
    }
}

impl FormationDef {
    fn to_formation(&self) -> Formation {
        let mut formation = Formation::new(FormationId(self.id), PlayerId(self.owner));
        formation.name = self.name.clone();
        formation.skill = self.skill;
        formation.tactics = self.tactics;
        formation.size = self.size.unwrap_or(self.units.len().max(1) as i32);
        formation.tmm = self.tmm;
        formation.morale_status = self.morale;
        formation.units = self.units.iter().map(UnitDef::to_unit).collect();
        formation
    }
}

impl UnitDef {
    fn to_unit(&self) -> Unit {
        let mut unit = Unit::new(self.name.clone(), self.armor);
        if let Some(armor) = self.current_armor {
            unit.set_armor(armor);
        }
        unit.elements = self.elements.iter().map(ElementDef::to_element).collect();
        unit
    }
}

impl ElementDef {
    fn to_element(&self) -> Element {
        let brackets = [
            (AttackRange::Short, self.damage.short),
            (AttackRange::Medium, self.damage.medium),
            (AttackRange::Long, self.damage.long),
            (AttackRange::Extreme, self.damage.extreme),
        ];
        brackets
            .into_iter()
            .filter_map(|(range, value)| value.map(|v| (range, v)))
            .fold(
                Element::new(ElementId(self.id), self.name.clone()),
                |element, (range, value)| element.with_damage(range, value),
            )
    }
}
