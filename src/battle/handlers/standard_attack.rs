//! Standard attack resolution
//!
//! One unit fires at a random live unit of the target formation. A hit
//! deals the unit's damage at range, scaled by any remembered engagement
//! control outcome against that target, and may trigger a critical roll.

use serde::{Deserialize, Serialize};

use crate::battle::actions::ManeuverResult;
use crate::battle::constants::{
    CRIT_BOTH_MAX, CRIT_DAMAGE_MAX, CRIT_NO_EFFECT_MAX, CRIT_TARGETING_MAX,
    MANEUVER_SUCCESS_BONUS_DAMAGE, MINIMUM_HIT_DAMAGE,
};
use crate::battle::context::SimulationContext;
use crate::battle::engagement::damage_multiplier;
use crate::battle::report::{codes, ReportEntry};
use crate::battle::to_hit::{standard_attack_to_hit, AttackRange};
use crate::battle::units::Unit;
use crate::core::types::FormationId;

/// Effect of a critical roll on a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriticalEffect {
    None,
    Targeting,
    Damage,
    TargetingAndDamage,
    Destroyed,
}

impl CriticalEffect {
    pub fn from_roll(total: i32) -> Self {
        match total {
            t if t <= CRIT_NO_EFFECT_MAX => CriticalEffect::None,
            t if t <= CRIT_TARGETING_MAX => CriticalEffect::Targeting,
            t if t <= CRIT_DAMAGE_MAX => CriticalEffect::Damage,
            t if t <= CRIT_BOTH_MAX => CriticalEffect::TargetingAndDamage,
            _ => CriticalEffect::Destroyed,
        }
    }

    pub fn apply(self, unit: &mut Unit) {
        match self {
            CriticalEffect::None => {}
            CriticalEffect::Targeting => unit.targeting_crits += 1,
            CriticalEffect::Damage => unit.damage_crits += 1,
            CriticalEffect::TargetingAndDamage => {
                unit.targeting_crits += 1;
                unit.damage_crits += 1;
            }
            CriticalEffect::Destroyed => unit.set_armor(0),
        }
    }

    fn report_code(self) -> u32 {
        match self {
            CriticalEffect::None => codes::CRIT_NONE,
            CriticalEffect::Targeting => codes::CRIT_TARGETING,
            CriticalEffect::Damage => codes::CRIT_DAMAGE,
            CriticalEffect::TargetingAndDamage => codes::CRIT_BOTH,
            CriticalEffect::Destroyed => codes::CRIT_DESTROYED,
        }
    }
}

/// Damage of a landed hit: never below one
pub fn hit_damage(base_damage: f64, maneuver: ManeuverResult, multiplier: f64) -> u32 {
    let mut damage = base_damage;
    if maneuver == ManeuverResult::Success {
        damage += MANEUVER_SUCCESS_BONUS_DAMAGE;
    }
    let scaled = (damage * multiplier).floor().max(0.0) as u32;
    scaled.max(MINIMUM_HIT_DAMAGE)
}

/// A hit that leaves a unit at or below half of what it had, or of its max
pub fn is_high_stress(armor_before: u32, armor_after: u32, max_armor: u32) -> bool {
    armor_after <= armor_before / 2 || armor_after <= max_armor / 2
}

pub fn resolve(
    ctx: &mut SimulationContext,
    attacker_id: FormationId,
    unit_number: usize,
    target_id: FormationId,
    range: AttackRange,
    maneuver: ManeuverResult,
) {
    let live_targets = match ctx.formation(target_id) {
        Some(target) => target.live_unit_indices(),
        None => Vec::new(),
    };
    if live_targets.is_empty() || ctx.formation(attacker_id).is_none() {
        tracing::debug!(%attacker_id, %target_id, "attack skipped, nothing left to shoot");
        return;
    }
    let target_index = live_targets[ctx.pick(live_targets.len())];

    let (Some(attacker), Some(target)) = (ctx.formation(attacker_id), ctx.formation(target_id))
    else {
        return;
    };
    let Some(unit) = attacker.units.get(unit_number) else {
        return;
    };
    let Some(target_unit) = target.units.get(target_index) else {
        return;
    };

    let to_hit = standard_attack_to_hit(attacker, unit, target, range, &ctx.config);
    let base_damage = unit.damage_at(range);
    let multiplier = damage_multiplier(&attacker.memory, target_id);
    let attacker_elements = unit.elements.len();
    let attacker_name = attacker.display_name();
    let target_name = target.display_name();
    let unit_name = unit.name.clone();
    let target_unit_name = target_unit.name.clone();

    ctx.report(
        ReportEntry::new(codes::ATTACK_DECLARED)
            .add(attacker_name)
            .add(&unit_name)
            .add(target_name)
            .add(&target_unit_name)
            .add(range.label()),
    );

    if let Some(reason) = to_hit.failure_reason() {
        ctx.report(ReportEntry::new(codes::ATTACK_IMPOSSIBLE).add(reason));
        return;
    }

    let roll = ctx.roll_2d6();
    ctx.report(
        ReportEntry::new(codes::ATTACK_ROLL)
            .add(to_hit.value())
            .add(to_hit.describe())
            .add(roll.describe()),
    );
    if roll.total() < to_hit.value() {
        ctx.report(ReportEntry::new(codes::ATTACK_MISS));
        return;
    }

    let damage = hit_damage(base_damage, maneuver, multiplier);

    let Some(target) = ctx.formation_mut(target_id) else {
        return;
    };
    let Some(target_unit) = target.units.get_mut(target_index) else {
        return;
    };
    let armor_before = target_unit.current_armor;
    let max_armor = target_unit.max_armor;
    let armor_after = armor_before.saturating_sub(damage);
    target_unit.set_armor(armor_after);
    let target_elements = target_unit.elements.len();
    if is_high_stress(armor_before, armor_after, max_armor) {
        target.high_stress_episode = true;
    }

    ctx.report(
        ReportEntry::new(codes::ATTACK_HIT)
            .add(damage)
            .add(multiplier)
            .add(armor_before)
            .add(armor_after),
    );

    if armor_after == 0 {
        let killer = KillCredit {
            formation: attacker_id,
            unit: unit_number,
            elements: attacker_elements,
        };
        let victim = KillCredit {
            formation: target_id,
            unit: target_index,
            elements: target_elements,
        };
        record_kill(ctx, killer, victim);
        tracing::info!(%attacker_id, %target_id, unit = %target_unit_name, "unit destroyed");
        ctx.report(
            ReportEntry::new(codes::UNIT_DESTROYED)
                .add(unit_name)
                .add(target_unit_name),
        );
        return;
    }

    if armor_after <= max_armor / 2 {
        let crit_roll = ctx.roll_2d6();
        let effect = CriticalEffect::from_roll(crit_roll.total());
        ctx.report(ReportEntry::new(codes::CRIT_ROLL).add(crit_roll.describe()));

        if let Some(target) = ctx.formation_mut(target_id) {
            if let Some(target_unit) = target.units.get_mut(target_index) {
                effect.apply(target_unit);
            }
            if effect == CriticalEffect::Destroyed {
                target.high_stress_episode = true;
            }
        }

        let entry = ReportEntry::new(effect.report_code());
        let entry = if effect == CriticalEffect::None {
            entry
        } else {
            entry.add(target_unit_name)
        };
        ctx.report(entry);
    }
}

struct KillCredit {
    formation: FormationId,
    unit: usize,
    elements: usize,
}

/// Credit a random attacking element with a random element of the dead unit
fn record_kill(ctx: &mut SimulationContext, killer: KillCredit, victim: KillCredit) {
    if killer.elements == 0 || victim.elements == 0 {
        return;
    }
    let killer_index = ctx.pick(killer.elements);
    let victim_index = ctx.pick(victim.elements);

    let Some(victim_id) = ctx
        .formation(victim.formation)
        .and_then(|f| f.units.get(victim.unit))
        .and_then(|u| u.elements.get(victim_index))
        .map(|e| e.id)
    else {
        return;
    };

    if let Some(element) = ctx
        .formation_mut(killer.formation)
        .and_then(|f| f.units.get_mut(killer.unit))
        .and_then(|u| u.elements.get_mut(killer_index))
    {
        element.kills.push(victim_id);
    }
}
