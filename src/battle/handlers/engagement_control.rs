//! Engagement control resolution
//!
//! Contested roll: both sides roll 2d6 against their own target number and
//! the initiator wins only with a strictly better margin.

use crate::battle::context::SimulationContext;
use crate::battle::engagement::EngagementControl;
use crate::battle::memory::EngagementRecord;
use crate::battle::report::{codes, ReportEntry};
use crate::battle::to_hit::engagement_control_to_hit;
use crate::core::types::FormationId;

/// Tie-break: the initiator needs a strictly larger margin
pub fn attacker_wins(attacker_delta: i32, defender_delta: i32) -> bool {
    attacker_delta > defender_delta
}

pub fn resolve(
    ctx: &mut SimulationContext,
    formation_id: FormationId,
    target_id: FormationId,
    mode: EngagementControl,
) {
    let (Some(attacker), Some(target)) = (ctx.formation(formation_id), ctx.formation(target_id))
    else {
        tracing::debug!(%formation_id, %target_id, "engagement control skipped, formation gone");
        return;
    };

    if mode == EngagementControl::None {
        let name = attacker.display_name();
        if let Some(attacker) = ctx.formation_mut(formation_id) {
            attacker.engagement_control = Some(EngagementControl::None);
        }
        ctx.report(ReportEntry::new(codes::ENGAGEMENT_RELEASED).add(name));
        return;
    }

    let attacker_to_hit = engagement_control_to_hit(attacker, target, mode);
    let defender_to_hit = engagement_control_to_hit(target, attacker, mode);
    let attacker_name = attacker.display_name();
    let target_name = target.display_name();

    ctx.report(
        ReportEntry::new(codes::ENGAGEMENT_ATTEMPT)
            .add(&attacker_name)
            .add(mode.label())
            .add(&target_name),
    );

    let attacker_roll = ctx.roll_2d6();
    let defender_roll = ctx.roll_2d6();
    let attacker_delta = attacker_roll.total().saturating_sub(attacker_to_hit.value());
    let defender_delta = defender_roll.total().saturating_sub(defender_to_hit.value());
    let won = attacker_wins(attacker_delta, defender_delta);

    tracing::debug!(
        %formation_id,
        %target_id,
        attacker_delta,
        defender_delta,
        won,
        "engagement control resolved"
    );

    ctx.report(
        ReportEntry::new(codes::ENGAGEMENT_ROLLS)
            .add(&attacker_name)
            .add(attacker_to_hit.value())
            .add(attacker_roll.describe())
            .add(&target_name)
            .add(defender_to_hit.value())
            .add(defender_roll.describe()),
    );

    // Literal rules write no winner into memory unless configured to.
    let record_winner = ctx.config.record_engagement_winner;
    let attacker_record = EngagementRecord {
        target_formation_id: target_id,
        attacker: true,
        won_engagement_control: record_winner && won,
        engagement_control: mode,
    };
    let defender_record = attacker_record.mirrored(formation_id, record_winner && !won);

    if let Some(attacker) = ctx.formation_mut(formation_id) {
        attacker.memory.remember_engagement(attacker_record);
        attacker.engagement_control = Some(mode);
        attacker.engagement_control_failed = true;
        if won {
            attacker.engagement_control_failed = false;
            if mode.links_on_victory() {
                attacker.target_formation_id = Some(target_id);
            }
        }
    }

    if let Some(target) = ctx.formation_mut(target_id) {
        target.memory.remember_engagement(defender_record);
        if won && mode.links_on_victory() {
            target.engagement_control = Some(mode);
        }
    }

    let code = if won {
        codes::ENGAGEMENT_WON
    } else {
        codes::ENGAGEMENT_LOST
    };
    ctx.report(ReportEntry::new(code).add(attacker_name).add(target_name));
}
