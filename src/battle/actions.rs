//! Action intents
//!
//! An action is an immutable record of what a formation wants to do. It is
//! validated for referential integrity only, then wrapped in a handler that
//! resolves it in the phase it cares about.

use serde::{Deserialize, Serialize};

use crate::battle::context::SimulationContext;
use crate::battle::engagement::EngagementControl;
use crate::battle::handlers::ActionHandler;
use crate::battle::phase::SimulationPhase;
use crate::battle::to_hit::AttackRange;
use crate::battle::units::Formation;
use crate::core::error::InvalidAction;
use crate::core::types::FormationId;

/// Outcome of the attacker's maneuvering before it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverResult {
    Success,
    Failure,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    StandardAttack {
        attacker_formation_id: FormationId,
        unit_number: usize,
        target_formation_id: FormationId,
        range: AttackRange,
        maneuver_result: ManeuverResult,
    },
    EngagementControl {
        formation_id: FormationId,
        target_formation_id: FormationId,
        engagement_control: EngagementControl,
    },
    Withdraw {
        formation_id: FormationId,
    },
    MoraleCheck {
        formation_id: FormationId,
    },
    RecoveringNerve {
        formation_id: FormationId,
    },
}

impl Action {
    pub fn acting_formation_id(&self) -> FormationId {
        match self {
            Action::StandardAttack {
                attacker_formation_id,
                ..
            } => *attacker_formation_id,
            Action::EngagementControl { formation_id, .. }
            | Action::Withdraw { formation_id }
            | Action::MoraleCheck { formation_id }
            | Action::RecoveringNerve { formation_id } => *formation_id,
        }
    }

    /// Phases in which the handler for this action resolves
    pub fn phases(&self) -> &'static [SimulationPhase] {
        match self {
            Action::EngagementControl { .. } => &[SimulationPhase::Movement],
            Action::StandardAttack { .. } => &[SimulationPhase::Firing],
            Action::Withdraw { .. } | Action::MoraleCheck { .. } | Action::RecoveringNerve { .. } => {
                &[SimulationPhase::End]
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::StandardAttack { .. } => "standard attack",
            Action::EngagementControl { .. } => "engagement control",
            Action::Withdraw { .. } => "withdraw",
            Action::MoraleCheck { .. } => "morale check",
            Action::RecoveringNerve { .. } => "recovering nerve",
        }
    }

    /// Referential checks only: ids resolve, indices are in range, no self-targeting
    pub fn validate(&self, ctx: &SimulationContext) -> Result<(), InvalidAction> {
        let actor_id = self.acting_formation_id();
        let actor = ctx
            .formation(actor_id)
            .ok_or(InvalidAction::UnknownFormation(actor_id))?;

        match self {
            Action::StandardAttack {
                unit_number,
                target_formation_id,
                ..
            } => {
                let target = check_target(ctx, actor_id, *target_formation_id)?;
                if *unit_number >= actor.units.len() {
                    return Err(InvalidAction::UnitIndexOutOfRange {
                        formation: actor_id,
                        unit: *unit_number,
                        count: actor.units.len(),
                    });
                }
                if target.units.is_empty() {
                    return Err(InvalidAction::TargetHasNoUnits(target.id));
                }
                Ok(())
            }
            Action::EngagementControl {
                target_formation_id,
                ..
            } => check_target(ctx, actor_id, *target_formation_id).map(|_| ()),
            Action::Withdraw { .. } | Action::MoraleCheck { .. } | Action::RecoveringNerve { .. } => {
                Ok(())
            }
        }
    }

    pub fn is_data_valid(&self, ctx: &SimulationContext) -> bool {
        self.validate(ctx).is_ok()
    }

    pub fn create_handler(self) -> ActionHandler {
        ActionHandler::new(self)
    }
}

fn check_target<'a>(
    ctx: &'a SimulationContext,
    actor: FormationId,
    target: FormationId,
) -> Result<&'a Formation, InvalidAction> {
    if actor == target {
        return Err(InvalidAction::SelfTarget(actor));
    }
    ctx.formation(target)
        .ok_or(InvalidAction::UnknownTarget(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::units::Unit;
    use crate::core::config::EngineConfig;
    use crate::core::types::PlayerId;

    fn context() -> SimulationContext {
        let mut ctx = SimulationContext::new(EngineConfig::default());
        ctx.add_formation(Formation::new(FormationId(1), PlayerId(1)).with_unit(Unit::new("a", 5)))
            .unwrap();
        ctx.add_formation(Formation::new(FormationId(2), PlayerId(2)).with_unit(Unit::new("b", 5)))
            .unwrap();
        ctx.add_formation(Formation::new(FormationId(3), PlayerId(2))).unwrap();
        ctx
    }

    fn attack(attacker: u32, unit: usize, target: u32) -> Action {
        Action::StandardAttack {
            attacker_formation_id: FormationId(attacker),
            unit_number: unit,
            target_formation_id: FormationId(target),
            range: AttackRange::Short,
            maneuver_result: ManeuverResult::Draw,
        }
    }

    #[test]
    fn test_valid_attack() {
        let ctx = context();
        assert!(attack(1, 0, 2).is_data_valid(&ctx));
    }

    #[test]
    fn test_attack_validation_failures() {
        let ctx = context();
        assert_eq!(
            attack(9, 0, 2).validate(&ctx),
            Err(InvalidAction::UnknownFormation(FormationId(9)))
        );
        assert_eq!(
            attack(1, 0, 9).validate(&ctx),
            Err(InvalidAction::UnknownTarget(FormationId(9)))
        );
        assert_eq!(
            attack(1, 0, 1).validate(&ctx),
            Err(InvalidAction::SelfTarget(FormationId(1)))
        );
        assert_eq!(
            attack(1, 1, 2).validate(&ctx),
            Err(InvalidAction::UnitIndexOutOfRange {
                formation: FormationId(1),
                unit: 1,
                count: 1
            })
        );
        assert_eq!(
            attack(1, 0, 3).validate(&ctx),
            Err(InvalidAction::TargetHasNoUnits(FormationId(3)))
        );
    }

    #[test]
    fn test_engagement_control_self_target_invalid() {
        let ctx = context();
        let action = Action::EngagementControl {
            formation_id: FormationId(2),
            target_formation_id: FormationId(2),
            engagement_control: EngagementControl::Standard,
        };
        assert!(!action.is_data_valid(&ctx));
    }

    #[test]
    fn test_engagement_control_against_empty_formation_is_valid() {
        let ctx = context();
        let action = Action::EngagementControl {
            formation_id: FormationId(1),
            target_formation_id: FormationId(3),
            engagement_control: EngagementControl::Evade,
        };
        assert!(action.is_data_valid(&ctx));
    }

    #[test]
    fn test_single_formation_actions() {
        let ctx = context();
        assert!(Action::Withdraw { formation_id: FormationId(3) }.is_data_valid(&ctx));
        assert!(!Action::MoraleCheck { formation_id: FormationId(7) }.is_data_valid(&ctx));
    }

    #[test]
    fn test_phase_interest() {
        assert_eq!(attack(1, 0, 2).phases(), &[SimulationPhase::Firing]);
        assert_eq!(
            Action::RecoveringNerve { formation_id: FormationId(1) }.phases(),
            &[SimulationPhase::End]
        );
        let control = Action::EngagementControl {
            formation_id: FormationId(1),
            target_formation_id: FormationId(2),
            engagement_control: EngagementControl::None,
        };
        assert_eq!(control.phases(), &[SimulationPhase::Movement]);
    }

    #[test]
    fn test_acting_formation() {
        assert_eq!(attack(4, 0, 2).acting_formation_id(), FormationId(4));
        assert_eq!(
            Action::Withdraw { formation_id: FormationId(5) }.acting_formation_id(),
            FormationId(5)
        );
    }
}
