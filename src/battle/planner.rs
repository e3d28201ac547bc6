//! Order generation for formations
//!
//! Architecture: Trait + default implementation
//! - BattlePlanner trait lets the round driver take any order source
//! - Planner is the built-in doctrine: close with an enemy, then shoot it
//!
//! Planners only propose actions. Everything they submit still goes
//! through validation in the processor.

use crate::battle::actions::{Action, ManeuverResult};
use crate::battle::context::SimulationContext;
use crate::battle::engagement::EngagementControl;
use crate::battle::phase::SimulationPhase;
use crate::battle::units::Formation;
use crate::core::types::FormationId;

/// Size advantage at which a formation tries to overrun its target
pub const OVERRUN_SIZE_ADVANTAGE: i32 = 2;

/// Trait for order sources
pub trait BattlePlanner: std::fmt::Debug {
    /// Actions to submit before the given phase is processed
    fn plan_phase(&mut self, ctx: &mut SimulationContext, phase: SimulationPhase) -> Vec<Action>;
}

/// Built-in planner
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner;

impl BattlePlanner for Planner {
    fn plan_phase(&mut self, ctx: &mut SimulationContext, phase: SimulationPhase) -> Vec<Action> {
        match phase {
            SimulationPhase::Movement => plan_movement(ctx),
            SimulationPhase::Firing => plan_firing(ctx),
            SimulationPhase::Initiative | SimulationPhase::End => Vec::new(),
        }
    }
}

/// A planner that never acts; rounds then only run end-phase upkeep
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePlanner;

impl BattlePlanner for IdlePlanner {
    fn plan_phase(&mut self, _ctx: &mut SimulationContext, _phase: SimulationPhase) -> Vec<Action> {
        Vec::new()
    }
}

/// Engagement mode a formation attempts against a target
pub fn choose_engagement_mode(formation: &Formation, target: &Formation) -> EngagementControl {
    if formation.is_crippled() {
        EngagementControl::Evade
    } else if formation.size >= target.size.saturating_add(OVERRUN_SIZE_ADVANTAGE) {
        EngagementControl::Overrun
    } else {
        EngagementControl::Standard
    }
}

/// Maneuver result of a formation firing at a target
pub fn maneuver_against(formation: &Formation, target: FormationId) -> ManeuverResult {
    if formation.engagement_control_failed {
        return ManeuverResult::Failure;
    }
    let holds_control = matches!(
        formation.engagement_control,
        Some(mode) if mode != EngagementControl::None
    );
    if holds_control && formation.target_formation_id == Some(target) {
        ManeuverResult::Success
    } else {
        ManeuverResult::Draw
    }
}

/// Linked target if it is still in play with live units
fn engaged_target(ctx: &SimulationContext, formation: &Formation) -> Option<FormationId> {
    let target = formation.target_formation_id?;
    ctx.formation(target)
        .filter(|t| t.deployed && t.has_live_units())
        .map(|t| t.id)
}

/// Enemies that can still be shot at
fn live_enemies(ctx: &SimulationContext, id: FormationId) -> Vec<FormationId> {
    ctx.enemies_of(id)
        .into_iter()
        .filter(|e| ctx.formation(*e).is_some_and(|f| f.has_live_units()))
        .collect()
}

fn random_enemy(ctx: &mut SimulationContext, id: FormationId) -> Option<FormationId> {
    let enemies = live_enemies(ctx, id);
    if enemies.is_empty() {
        return None;
    }
    Some(enemies[ctx.pick(enemies.len())])
}

fn plan_movement(ctx: &mut SimulationContext) -> Vec<Action> {
    let mut actions = Vec::new();

    for id in ctx.formation_ids() {
        let Some(formation) = ctx.formation(id) else {
            continue;
        };
        if !formation.deployed || !formation.has_live_units() {
            continue;
        }
        if engaged_target(ctx, formation).is_some() {
            continue;
        }

        let Some(target_id) = random_enemy(ctx, id) else {
            continue;
        };
        let (Some(formation), Some(target)) = (ctx.formation(id), ctx.formation(target_id)) else {
            continue;
        };
        let mode = choose_engagement_mode(formation, target);
        tracing::debug!(formation = %id, target = %target_id, mode = mode.label(), "planned engagement");

        actions.push(Action::EngagementControl {
            formation_id: id,
            target_formation_id: target_id,
            engagement_control: mode,
        });
    }

    actions
}

fn plan_firing(ctx: &mut SimulationContext) -> Vec<Action> {
    let mut actions = Vec::new();

    for id in ctx.formation_ids() {
        let Some(formation) = ctx.formation(id) else {
            continue;
        };
        if !formation.deployed {
            continue;
        }
        let shooters = formation.live_unit_indices();
        if shooters.is_empty() {
            continue;
        }

        let target_id = match engaged_target(ctx, formation) {
            Some(target) => target,
            None => match random_enemy(ctx, id) {
                Some(target) => target,
                None => continue,
            },
        };

        let Some(formation) = ctx.formation(id) else {
            continue;
        };
        let range = formation
            .engagement_control
            .unwrap_or_default()
            .preferred_range();
        let maneuver_result = maneuver_against(formation, target_id);

        for unit_number in shooters {
            actions.push(Action::StandardAttack {
                attacker_formation_id: id,
                unit_number,
                target_formation_id: target_id,
                range,
                maneuver_result,
            });
        }
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::dice::ScriptedDice;
    use crate::battle::to_hit::AttackRange;
    use crate::battle::units::Unit;
    use crate::core::config::EngineConfig;
    use crate::core::types::PlayerId;

    fn formation(id: u32, owner: u32, units: usize) -> Formation {
        let mut f = Formation::new(FormationId(id), PlayerId(owner));
        for i in 0..units {
            f = f.with_unit(Unit::new(format!("u{}", i), 8));
        }
        f
    }

    fn context(formations: Vec<Formation>, picks: Vec<usize>) -> SimulationContext {
        let dice = ScriptedDice::new(Vec::new()).with_picks(picks);
        let mut ctx = SimulationContext::with_dice(EngineConfig::default(), Box::new(dice));
        for f in formations {
            ctx.add_formation(f).unwrap();
        }
        ctx
    }

    #[test]
    fn test_engagement_mode_choice() {
        let mut big = formation(1, 1, 2);
        big.size = 3;
        let small = formation(2, 2, 2);
        assert_eq!(choose_engagement_mode(&big, &small), EngagementControl::Overrun);
        assert_eq!(choose_engagement_mode(&small, &big), EngagementControl::Standard);

        big.units[0].set_armor(4);
        assert_eq!(choose_engagement_mode(&big, &small), EngagementControl::Evade);
    }

    #[test]
    fn test_maneuver_result() {
        let mut f = formation(1, 1, 1);
        assert_eq!(maneuver_against(&f, FormationId(2)), ManeuverResult::Draw);

        f.engagement_control = Some(EngagementControl::Standard);
        f.target_formation_id = Some(FormationId(2));
        assert_eq!(maneuver_against(&f, FormationId(2)), ManeuverResult::Success);
        assert_eq!(maneuver_against(&f, FormationId(3)), ManeuverResult::Draw);

        f.engagement_control_failed = true;
        assert_eq!(maneuver_against(&f, FormationId(2)), ManeuverResult::Failure);
    }

    #[test]
    fn test_movement_picks_enemy() {
        let mut ctx = context(
            vec![formation(1, 1, 1), formation(2, 2, 1), formation(3, 2, 1)],
            vec![1, 0, 0],
        );
        let actions = Planner.plan_phase(&mut ctx, SimulationPhase::Movement);
        assert_eq!(actions.len(), 3);
        assert_eq!(
            actions[0],
            Action::EngagementControl {
                formation_id: FormationId(1),
                target_formation_id: FormationId(3),
                engagement_control: EngagementControl::Standard,
            }
        );
    }

    #[test]
    fn test_linked_formation_does_not_replan_movement() {
        let mut a = formation(1, 1, 1);
        a.target_formation_id = Some(FormationId(2));
        let mut ctx = context(vec![a, formation(2, 2, 1)], vec![]);
        let actions = Planner.plan_phase(&mut ctx, SimulationPhase::Movement);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].acting_formation_id(), FormationId(2));
    }

    #[test]
    fn test_firing_uses_linked_target_and_mode_range() {
        let mut a = formation(1, 1, 2);
        a.engagement_control = Some(EngagementControl::Overrun);
        a.target_formation_id = Some(FormationId(2));
        let mut ctx = context(vec![a, formation(2, 2, 1)], vec![]);

        let actions = Planner.plan_phase(&mut ctx, SimulationPhase::Firing);
        let from_a: Vec<&Action> = actions
            .iter()
            .filter(|a| a.acting_formation_id() == FormationId(1))
            .collect();
        assert_eq!(from_a.len(), 2);
        for action in from_a {
            match action {
                Action::StandardAttack {
                    target_formation_id,
                    range,
                    maneuver_result,
                    ..
                } => {
                    assert_eq!(*target_formation_id, FormationId(2));
                    assert_eq!(*range, AttackRange::Short);
                    assert_eq!(*maneuver_result, ManeuverResult::Success);
                }
                other => panic!("unexpected action {:?}", other),
            }
        }
    }

    #[test]
    fn test_no_enemies_no_orders() {
        let mut ctx = context(vec![formation(1, 1, 1), formation(2, 1, 1)], vec![]);
        assert!(Planner.plan_phase(&mut ctx, SimulationPhase::Movement).is_empty());
        assert!(Planner.plan_phase(&mut ctx, SimulationPhase::Firing).is_empty());
        assert!(IdlePlanner.plan_phase(&mut ctx, SimulationPhase::Firing).is_empty());
    }
}
