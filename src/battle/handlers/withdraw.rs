//! Withdrawal from the battle
//!
//! Only a natural 12 gets a formation out. The computed target number is
//! reported but does not decide the outcome.

use crate::battle::constants::WITHDRAW_REQUIRED_ROLL;
use crate::battle::context::{RemovalCondition, SimulationContext};
use crate::battle::report::{codes, ReportEntry};
use crate::battle::to_hit::withdraw_to_hit;
use crate::core::types::FormationId;

pub fn withdraw_succeeds(total: i32) -> bool {
    total == WITHDRAW_REQUIRED_ROLL
}

pub fn resolve(ctx: &mut SimulationContext, formation_id: FormationId) {
    let Some(formation) = ctx.formation(formation_id) else {
        tracing::debug!(%formation_id, "withdraw skipped, formation gone");
        return;
    };
    let to_hit = withdraw_to_hit(formation, &ctx.config);
    let name = formation.display_name();

    let roll = ctx.roll_2d6();
    ctx.report(
        ReportEntry::new(codes::WITHDRAW_ATTEMPT)
            .add(&name)
            .add(to_hit.describe())
            .add(roll.describe()),
    );

    if !withdraw_succeeds(roll.total()) {
        ctx.report(ReportEntry::new(codes::WITHDRAW_FAIL).add(name));
        return;
    }

    let Some(formation) = ctx.formation_mut(formation_id) else {
        return;
    };
    formation.deployed = false;
    // Elements of dead units are already on the ledger as destroyed
    let mut elements = Vec::new();
    for element in formation.units.iter_mut().flat_map(|u| u.elements.iter_mut()) {
        if element.deployed {
            element.deployed = false;
            elements.push(element.id);
        }
    }
    for element in elements {
        ctx.mark_element_removed(element, formation_id, RemovalCondition::Retreated);
    }

    ctx.report(ReportEntry::new(codes::WITHDRAW_SUCCESS).add(&name));
    ctx.remove_formation(formation_id, RemovalCondition::Retreated);
    tracing::info!(%formation_id, name = %name, "formation withdrew");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::dice::ScriptedDice;
    use crate::battle::units::{Element, Formation, Unit};
    use crate::core::config::EngineConfig;
    use crate::core::types::{ElementId, PlayerId};

    fn context(rolls: Vec<i32>) -> SimulationContext {
        let mut ctx =
            SimulationContext::with_dice(EngineConfig::default(), Box::new(ScriptedDice::new(rolls)));
        let formation = Formation::new(FormationId(1), PlayerId(1))
            .with_name("Scouts")
            .with_unit(
                Unit::new("recon", 3)
                    .with_element(Element::new(ElementId(1), "Locust"))
                    .with_element(Element::new(ElementId(2), "Wasp")),
            );
        ctx.add_formation(formation).unwrap();
        ctx
    }

    #[test]
    fn test_only_twelve_succeeds() {
        assert!(withdraw_succeeds(12));
        for total in 2..12 {
            assert!(!withdraw_succeeds(total));
        }
    }

    #[test]
    fn test_eleven_fails() {
        let mut ctx = context(vec![11]);
        resolve(&mut ctx, FormationId(1));
        assert!(ctx.formation(FormationId(1)).is_some());
        assert!(ctx.removed_elements().is_empty());
        assert!(ctx.battle_report().contains_code(codes::WITHDRAW_FAIL));
    }

    #[test]
    fn test_twelve_removes_formation_and_elements() {
        let mut ctx = context(vec![12]);
        resolve(&mut ctx, FormationId(1));

        assert!(ctx.formation(FormationId(1)).is_none());
        let departed = &ctx.departed()[0];
        assert_eq!(departed.condition, RemovalCondition::Retreated);
        assert!(!departed.formation.deployed);
        assert!(departed.formation.units[0].elements.iter().all(|e| !e.deployed));

        assert_eq!(ctx.removed_elements().len(), 2);
        assert_eq!(
            ctx.removal_condition(ElementId(2)),
            Some(RemovalCondition::Retreated)
        );
        assert!(ctx.battle_report().contains_code(codes::WITHDRAW_SUCCESS));
    }

    #[test]
    fn test_missing_formation_is_silent() {
        let mut ctx = context(vec![12]);
        resolve(&mut ctx, FormationId(3));
        assert!(ctx.battle_report().is_empty());
    }
}
