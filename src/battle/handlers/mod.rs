//! Action handlers
//!
//! A handler wraps exactly one action. It resolves the action the first
//! time it is handled in a phase the action cares about, then reports
//! itself finished. Finished never resets.

pub mod engagement_control;
pub mod morale;
pub mod standard_attack;
pub mod withdraw;

use crate::battle::actions::Action;
use crate::battle::context::SimulationContext;
use crate::battle::phase::SimulationPhase;

#[derive(Debug, Clone)]
pub struct ActionHandler {
    action: Action,
    finished: bool,
}

impl ActionHandler {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            finished: false,
        }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn cares_about_phase(&self, phase: SimulationPhase) -> bool {
        self.action.phases().contains(&phase)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Resolve the action against the context
    ///
    /// Formations that vanished since validation make this a silent no-op.
    /// Either way the handler is finished afterwards.
    pub fn handle(&mut self, ctx: &mut SimulationContext) {
        if self.finished {
            return;
        }

        match self.action {
            Action::StandardAttack {
                attacker_formation_id,
                unit_number,
                target_formation_id,
                range,
                maneuver_result,
            } => standard_attack::resolve(
                ctx,
                attacker_formation_id,
                unit_number,
                target_formation_id,
                range,
                maneuver_result,
            ),
            Action::EngagementControl {
                formation_id,
                target_formation_id,
                engagement_control,
            } => engagement_control::resolve(
                ctx,
                formation_id,
                target_formation_id,
                engagement_control,
            ),
            Action::Withdraw { formation_id } => withdraw::resolve(ctx, formation_id),
            Action::MoraleCheck { formation_id } => morale::resolve_morale_check(ctx, formation_id),
            Action::RecoveringNerve { formation_id } => {
                morale::resolve_recovering_nerve(ctx, formation_id)
            }
        }

        self.finished = true;
    }
}
