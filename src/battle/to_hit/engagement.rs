//! To-hit for engagement control and withdrawal

use crate::battle::constants::{
    EVADE_MODIFIER, FORCED_ENGAGEMENT_MODIFIER, OVERRUN_SIZE_MODIFIER_CAP,
};
use crate::battle::engagement::EngagementControl;
use crate::battle::to_hit::TargetRoll;
use crate::battle::units::Formation;
use crate::core::config::EngineConfig;

/// Target number for `actor` trying `mode` against `target`
///
/// The defender's side of a contested roll is the same calculation with
/// the formations swapped.
pub fn engagement_control_to_hit(
    actor: &Formation,
    target: &Formation,
    mode: EngagementControl,
) -> TargetRoll {
    let mut to_hit = TargetRoll::new(actor.tactics, "Tactics");
    to_hit.add_modifier(
        actor.morale_status.to_hit_modifier(),
        actor.morale_status.label(),
    );

    match mode {
        EngagementControl::ForcedEngagement => {
            to_hit.add_modifier(FORCED_ENGAGEMENT_MODIFIER, "Forced engagement")
        }
        EngagementControl::Evade => to_hit.add_modifier(EVADE_MODIFIER, "Evade"),
        EngagementControl::Overrun => {
            let difference = target
                .size
                .saturating_sub(actor.size)
                .clamp(-OVERRUN_SIZE_MODIFIER_CAP, OVERRUN_SIZE_MODIFIER_CAP);
            to_hit.add_modifier(difference, "Overrun size difference");
        }
        EngagementControl::Standard | EngagementControl::None => {}
    }

    to_hit
}

/// Target number for leaving the battle
///
/// Engagement-control roll with no mode chosen, made harder when the
/// formation is crippled. Only an exact 12 succeeds regardless.
pub fn withdraw_to_hit(formation: &Formation, config: &EngineConfig) -> TargetRoll {
    let mut to_hit = engagement_control_to_hit(formation, formation, EngagementControl::None);
    if formation.is_crippled() {
        to_hit.add_modifier(config.crippled_withdraw_penalty, "Crippled");
    }
    to_hit
}
