use thiserror::Error;

use crate::core::types::{ElementId, FormationId};

/// Referential-integrity failures detected before a handler is created
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidAction {
    #[error("acting formation {0} does not exist")]
    UnknownFormation(FormationId),

    #[error("target formation {0} does not exist")]
    UnknownTarget(FormationId),

    #[error("formation {0} cannot target itself")]
    SelfTarget(FormationId),

    #[error("unit {unit} out of range for formation {formation} ({count} units)")]
    UnitIndexOutOfRange {
        formation: FormationId,
        unit: usize,
        count: usize,
    },

    #[error("target formation {0} has no units")]
    TargetHasNoUnits(FormationId),
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Formation not found: {0}")]
    FormationNotFound(FormationId),

    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
