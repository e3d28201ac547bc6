//! Simulation phases of a combat round

use serde::{Deserialize, Serialize};

/// Phases in the order a round plays them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationPhase {
    #[default]
    Initiative,
    Movement,
    Firing,
    End,
}

impl SimulationPhase {
    pub const ROUND: [SimulationPhase; 4] = [
        SimulationPhase::Initiative,
        SimulationPhase::Movement,
        SimulationPhase::Firing,
        SimulationPhase::End,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SimulationPhase::Initiative => "Initiative",
            SimulationPhase::Movement => "Movement",
            SimulationPhase::Firing => "Firing",
            SimulationPhase::End => "End",
        }
    }
}
