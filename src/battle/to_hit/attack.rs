//! To-hit for a unit firing at another formation

use crate::battle::morale::MoraleStatus;
use crate::battle::to_hit::{AttackRange, TargetRoll};
use crate::battle::units::{Formation, Unit};
use crate::core::config::EngineConfig;

/// Target number for `unit` of `attacker` firing at `target` at `range`
pub fn standard_attack_to_hit(
    attacker: &Formation,
    unit: &Unit,
    target: &Formation,
    range: AttackRange,
    config: &EngineConfig,
) -> TargetRoll {
    if attacker.morale_status == MoraleStatus::Routed {
        return TargetRoll::impossible("attacker is routed");
    }

    let mut to_hit = TargetRoll::new(attacker.skill, "Skill");
    to_hit.add_modifier(range.modifier(), format!("{} range", range.label()));
    to_hit.add_modifier(
        attacker.morale_status.to_hit_modifier(),
        attacker.morale_status.label(),
    );

    let crit_penalty = unit.targeting_crits as i32 * config.targeting_crit_modifier;
    to_hit.add_modifier(crit_penalty, "Targeting crits");

    to_hit.add_modifier(target.tmm, "Target movement");

    if let Some(engaged) = attacker.target_formation_id {
        if engaged != target.id {
            to_hit.add_modifier(config.secondary_target_modifier, "Secondary target");
        }
    }

    to_hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FormationId, PlayerId};

    fn formations() -> (Formation, Unit, Formation) {
        let attacker = Formation::new(FormationId(1), PlayerId(1));
        let unit = Unit::new("Battle", 8);
        let target = Formation::new(FormationId(2), PlayerId(2));
        (attacker, unit, target)
    }

    #[test]
    fn test_base_is_skill_plus_range() {
        let (attacker, unit, target) = formations();
        let config = EngineConfig::default();
        let to_hit = standard_attack_to_hit(&attacker, &unit, &target, AttackRange::Short, &config);
        assert_eq!(to_hit.value(), 4);
        let to_hit = standard_attack_to_hit(&attacker, &unit, &target, AttackRange::Long, &config);
        assert_eq!(to_hit.value(), 8);
    }

    #[test]
    fn test_routed_attacker_cannot_hit() {
        let (mut attacker, unit, target) = formations();
        attacker.morale_status = MoraleStatus::Routed;
        let to_hit = standard_attack_to_hit(
            &attacker,
            &unit,
            &target,
            AttackRange::Short,
            &EngineConfig::default(),
        );
        assert!(to_hit.is_impossible());
    }

    #[test]
    fn test_penalties_stack() {
        let (mut attacker, mut unit, mut target) = formations();
        attacker.morale_status = MoraleStatus::Shaken;
        attacker.target_formation_id = Some(FormationId(9));
        unit.targeting_crits = 2;
        target.tmm = 1;

        let to_hit = standard_attack_to_hit(
            &attacker,
            &unit,
            &target,
            AttackRange::Medium,
            &EngineConfig::default(),
        );
        // 4 skill + 2 medium + 1 shaken + 2 crits + 1 tmm + 1 secondary
        assert_eq!(to_hit.value(), 11);
    }

    #[test]
    fn test_engaged_target_is_not_secondary() {
        let (mut attacker, unit, target) = formations();
        attacker.target_formation_id = Some(target.id);
        let to_hit = standard_attack_to_hit(
            &attacker,
            &unit,
            &target,
            AttackRange::Short,
            &EngineConfig::default(),
        );
        assert_eq!(to_hit.value(), 4);
    }

    #[test]
    fn test_extreme_range_can_be_unachievable() {
        let (mut attacker, unit, target) = formations();
        attacker.skill = 7;
        let to_hit = standard_attack_to_hit(
            &attacker,
            &unit,
            &target,
            AttackRange::Extreme,
            &EngineConfig::default(),
        );
        assert_eq!(to_hit.value(), 13);
        assert!(!to_hit.is_achievable());
    }
}
