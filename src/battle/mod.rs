//! Battle system - automated formation combat resolution
//!
//! Formations act through immutable actions; handlers resolve them against
//! a shared context, phase by phase, with every die drawn from one source.
//!
//! Key pieces:
//! - Actions are validated for referential integrity only
//! - Each handler resolves once and is then evicted
//! - Engagement outcomes land in formation memory and scale later damage
//! - Same seed + same scenario = same report

pub mod actions;
pub mod constants;
pub mod context;
pub mod dice;
pub mod engagement;
pub mod execution;
pub mod handlers;
pub mod memory;
pub mod morale;
pub mod phase;
pub mod planner;
pub mod processor;
pub mod report;
pub mod scenario;
pub mod to_hit;
pub mod units;

// Re-exports for convenient access
pub use actions::{Action, ManeuverResult};
pub use constants::*;
pub use context::{DepartedFormation, RemovalCondition, RemovedElement, SimulationContext};
pub use dice::{Dice, Roll, ScriptedDice, SeededDice};
pub use engagement::{damage_multiplier, EngagementControl};
pub use execution::{
    check_battle_end, Battle, BattleOutcome, BattleSummary, FormationFate, FormationSummary,
};
pub use handlers::ActionHandler;
pub use memory::{EngagementRecord, FormationMemory};
pub use morale::MoraleStatus;
pub use phase::SimulationPhase;
pub use planner::{BattlePlanner, IdlePlanner, Planner};
pub use processor::ActionsProcessor;
pub use report::{BattleReport, ReportEntry};
pub use scenario::{load_scenario, ScenarioDef};
pub use to_hit::{AttackRange, TargetRoll};
pub use units::{Element, Formation, Unit};
