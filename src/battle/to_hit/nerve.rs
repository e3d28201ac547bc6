//! To-hit for holding or recovering nerve
//!
//! Shared by morale checks and recovering nerve.

use crate::battle::constants::{
    NERVE_BASE_MODIFIER, NERVE_CRIPPLED_MODIFIER, NERVE_HIGH_STRESS_MODIFIER,
};
use crate::battle::to_hit::TargetRoll;
use crate::battle::units::Formation;

pub fn recovering_nerve_to_hit(formation: &Formation) -> TargetRoll {
    let mut to_hit = TargetRoll::new(formation.skill, "Skill");
    to_hit.add_modifier(NERVE_BASE_MODIFIER, "Nerve");
    to_hit.add_modifier(
        formation.morale_status.to_hit_modifier(),
        formation.morale_status.label(),
    );
    if formation.is_crippled() {
        to_hit.add_modifier(NERVE_CRIPPLED_MODIFIER, "Crippled");
    }
    if formation.high_stress_episode {
        to_hit.add_modifier(NERVE_HIGH_STRESS_MODIFIER, "High stress");
    }
    to_hit
}
