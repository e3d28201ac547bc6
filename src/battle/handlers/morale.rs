//! Morale check and recovering nerve

use crate::battle::context::SimulationContext;
use crate::battle::report::{codes, ReportEntry};
use crate::battle::to_hit::recovering_nerve_to_hit;
use crate::core::types::FormationId;

/// Roll against the nerve target; a failed roll worsens morale one step
pub fn resolve_morale_check(ctx: &mut SimulationContext, formation_id: FormationId) {
    let Some(formation) = ctx.formation(formation_id) else {
        tracing::debug!(%formation_id, "morale check skipped, formation gone");
        return;
    };
    let to_hit = recovering_nerve_to_hit(formation);
    let name = formation.display_name();

    let roll = ctx.roll_2d6();
    ctx.report(
        ReportEntry::new(codes::MORALE_CHECK)
            .add(&name)
            .add(to_hit.value())
            .add(roll.describe()),
    );

    if roll.total() >= to_hit.value() {
        let label = ctx
            .formation(formation_id)
            .map(|f| f.morale_status.label())
            .unwrap_or_default();
        ctx.report(ReportEntry::new(codes::MORALE_HOLDS).add(name).add(label));
        return;
    }

    let Some(formation) = ctx.formation_mut(formation_id) else {
        return;
    };
    let status = formation.worsen_morale();
    if status.is_routed() {
        tracing::info!(%formation_id, "formation routed");
    }
    ctx.report(
        ReportEntry::new(codes::MORALE_WORSENS)
            .add(name)
            .add(status.label()),
    );
}

/// Nerve recovery is not modelled beyond its target number
pub fn resolve_recovering_nerve(ctx: &mut SimulationContext, formation_id: FormationId) {
    let Some(formation) = ctx.formation(formation_id) else {
        return;
    };
    let to_hit = recovering_nerve_to_hit(formation);
    tracing::debug!(
        %formation_id,
        target = to_hit.value(),
        modifiers = %to_hit.describe(),
        "recovering nerve"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::dice::ScriptedDice;
    use crate::battle::morale::MoraleStatus;
    use crate::battle::units::Formation;
    use crate::core::config::EngineConfig;
    use crate::core::types::PlayerId;

    fn context(rolls: Vec<i32>) -> SimulationContext {
        let mut ctx =
            SimulationContext::with_dice(EngineConfig::default(), Box::new(ScriptedDice::new(rolls)));
        ctx.add_formation(Formation::new(FormationId(1), PlayerId(1)).with_name("Lancers"))
            .unwrap();
        ctx
    }

    fn status(ctx: &SimulationContext) -> MoraleStatus {
        ctx.formation(FormationId(1)).unwrap().morale_status
    }

    #[test]
    fn test_roll_meeting_target_holds() {
        // fresh formation needs 6
        let mut ctx = context(vec![6]);
        resolve_morale_check(&mut ctx, FormationId(1));
        assert_eq!(status(&ctx), MoraleStatus::Normal);
        assert!(ctx.battle_report().contains_code(codes::MORALE_HOLDS));
    }

    #[test]
    fn test_failed_roll_worsens_one_step() {
        let mut ctx = context(vec![5]);
        resolve_morale_check(&mut ctx, FormationId(1));
        assert_eq!(status(&ctx), MoraleStatus::Shaken);
        assert!(ctx.battle_report().contains_code(codes::MORALE_WORSENS));
    }

    #[test]
    fn test_routed_is_terminal() {
        let mut ctx = context(vec![2; 8]);
        for _ in 0..8 {
            resolve_morale_check(&mut ctx, FormationId(1));
        }
        assert_eq!(status(&ctx), MoraleStatus::Routed);
        assert_eq!(ctx.battle_report().count_code(codes::MORALE_CHECK), 8);
    }

    #[test]
    fn test_recovering_nerve_changes_nothing() {
        let mut ctx = context(vec![]);
        ctx.formation_mut(FormationId(1)).unwrap().morale_status = MoraleStatus::Unsteady;
        resolve_recovering_nerve(&mut ctx, FormationId(1));
        assert_eq!(status(&ctx), MoraleStatus::Unsteady);
        assert!(ctx.battle_report().is_empty());
    }

    #[test]
    fn test_missing_formation_is_silent() {
        let mut ctx = context(vec![]);
        resolve_morale_check(&mut ctx, FormationId(4));
        resolve_recovering_nerve(&mut ctx, FormationId(4));
        assert!(ctx.battle_report().is_empty());
    }
}
