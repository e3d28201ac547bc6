//! Shared simulation context
//!
//! Owns every formation (keyed by stable id), the dice, the report and the
//! pending action list. Handlers borrow it mutably one at a time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::battle::actions::Action;
use crate::battle::dice::{Dice, Roll, SeededDice};
use crate::battle::phase::SimulationPhase;
use crate::battle::report::{BattleReport, ReportEntry};
use crate::battle::units::{Element, Formation};
use crate::core::config::EngineConfig;
use crate::core::error::{ResolveError, Result};
use crate::core::types::{ElementId, FormationId, Player, PlayerId, Round, TeamId};

/// Why an element or formation left the battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalCondition {
    Destroyed,
    Retreated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedElement {
    pub element: ElementId,
    pub formation: FormationId,
    pub condition: RemovalCondition,
    pub round: Round,
}

/// A formation no longer in the active simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartedFormation {
    pub formation: Formation,
    pub condition: RemovalCondition,
    pub round: Round,
}

#[derive(Debug)]
pub struct SimulationContext {
    pub config: EngineConfig,
    round: Round,
    phase: SimulationPhase,
    formations: BTreeMap<FormationId, Formation>,
    players: BTreeMap<PlayerId, Player>,
    pending_actions: Vec<Action>,
    dice: Box<dyn Dice>,
    report: BattleReport,
    removed_elements: Vec<RemovedElement>,
    departed: Vec<DepartedFormation>,
}

impl SimulationContext {
    /// Context with dice seeded from the config
    pub fn new(config: EngineConfig) -> Self {
        let dice = Box::new(SeededDice::new(config.seed));
        Self::with_dice(config, dice)
    }

    pub fn with_dice(config: EngineConfig, dice: Box<dyn Dice>) -> Self {
        Self {
            config,
            round: 0,
            phase: SimulationPhase::default(),
            formations: BTreeMap::new(),
            players: BTreeMap::new(),
            pending_actions: Vec::new(),
            dice,
            report: BattleReport::new(),
            removed_elements: Vec::new(),
            departed: Vec::new(),
        }
    }

    // === Time ===

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn set_round(&mut self, round: Round) {
        self.round = round;
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: SimulationPhase) {
        self.phase = phase;
    }

    // === Players ===

    pub fn add_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Team of a formation's owner; unknown owners fight alone
    pub fn team_of(&self, formation: &Formation) -> TeamId {
        self.player(formation.owner)
            .map(|p| p.team)
            .unwrap_or(TeamId(formation.owner.0))
    }

    // === Formations ===

    pub fn add_formation(&mut self, formation: Formation) -> Result<()> {
        if self.formations.contains_key(&formation.id) {
            return Err(ResolveError::Scenario(format!(
                "duplicate formation id {}",
                formation.id
            )));
        }
        self.formations.insert(formation.id, formation);
        Ok(())
    }

    pub fn formation(&self, id: FormationId) -> Option<&Formation> {
        self.formations.get(&id)
    }

    pub fn formation_mut(&mut self, id: FormationId) -> Option<&mut Formation> {
        self.formations.get_mut(&id)
    }

    pub fn try_formation(&self, id: FormationId) -> Result<&Formation> {
        self.formation(id).ok_or(ResolveError::FormationNotFound(id))
    }

    /// Active formations in id order
    pub fn formations(&self) -> impl Iterator<Item = &Formation> {
        self.formations.values()
    }

    pub fn formation_ids(&self) -> Vec<FormationId> {
        self.formations.keys().copied().collect()
    }

    /// Active formations on a different team than `id`, in id order
    pub fn enemies_of(&self, id: FormationId) -> Vec<FormationId> {
        let Some(formation) = self.formation(id) else {
            return Vec::new();
        };
        let team = self.team_of(formation);
        self.formations
            .values()
            .filter(|f| f.deployed && self.team_of(f) != team)
            .map(|f| f.id)
            .collect()
    }

    /// Teams that still have a deployed formation
    pub fn teams_in_play(&self) -> Vec<TeamId> {
        let mut teams: Vec<TeamId> = self
            .formations
            .values()
            .filter(|f| f.deployed)
            .map(|f| self.team_of(f))
            .collect();
        teams.sort();
        teams.dedup();
        teams
    }

    /// Take a formation out of the active simulation
    pub fn remove_formation(
        &mut self,
        id: FormationId,
        condition: RemovalCondition,
    ) -> Option<&DepartedFormation> {
        let formation = self.formations.remove(&id)?;
        self.departed.push(DepartedFormation {
            formation,
            condition,
            round: self.round,
        });
        self.departed.last()
    }

    pub fn departed(&self) -> &[DepartedFormation] {
        &self.departed
    }

    // === Elements ===

    /// Look up an element among active formations
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.formations
            .values()
            .flat_map(|f| f.units.iter())
            .flat_map(|u| u.elements.iter())
            .find(|e| e.id == id)
    }

    pub fn try_element(&self, id: ElementId) -> Result<&Element> {
        self.element(id).ok_or(ResolveError::ElementNotFound(id))
    }

    pub fn mark_element_removed(
        &mut self,
        element: ElementId,
        formation: FormationId,
        condition: RemovalCondition,
    ) {
        self.removed_elements.push(RemovedElement {
            element,
            formation,
            condition,
            round: self.round,
        });
    }

    pub fn removed_elements(&self) -> &[RemovedElement] {
        &self.removed_elements
    }

    pub fn removal_condition(&self, element: ElementId) -> Option<RemovalCondition> {
        self.removed_elements
            .iter()
            .find(|r| r.element == element)
            .map(|r| r.condition)
    }

    // === Dice ===

    pub fn roll_2d6(&mut self) -> Roll {
        let roll = self.dice.roll_2d6();
        tracing::debug!(round = self.round, total = roll.total(), "2d6");
        roll
    }

    pub fn pick(&mut self, len: usize) -> usize {
        self.dice.pick(len)
    }

    // === Actions ===

    /// Queue an action for the processor's next pass
    pub fn submit(&mut self, action: Action) {
        self.pending_actions.push(action);
    }

    pub fn pending_actions(&self) -> &[Action] {
        &self.pending_actions
    }

    pub fn take_pending_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.pending_actions)
    }

    // === Report ===

    pub fn report(&mut self, entry: ReportEntry) {
        self.report.push(entry, self.round, self.phase);
    }

    pub fn battle_report(&self) -> &BattleReport {
        &self.report
    }

    pub fn into_report(self) -> BattleReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::report::codes;
    use crate::battle::units::Unit;

    fn context() -> SimulationContext {
        let mut ctx = SimulationContext::new(EngineConfig::default());
        ctx.add_player(Player::new(PlayerId(1), "Blue", TeamId(1)));
        ctx.add_player(Player::new(PlayerId(2), "Red", TeamId(2)));
        ctx.add_formation(
            Formation::new(FormationId(1), PlayerId(1)).with_unit(
                Unit::new("a", 4).with_element(Element::new(ElementId(10), "Atlas")),
            ),
        )
        .unwrap();
        ctx.add_formation(Formation::new(FormationId(2), PlayerId(2)))
            .unwrap();
        ctx.add_formation(Formation::new(FormationId(3), PlayerId(2)))
            .unwrap();
        ctx
    }

    #[test]
    fn test_duplicate_formation_rejected() {
        let mut ctx = context();
        let result = ctx.add_formation(Formation::new(FormationId(1), PlayerId(1)));
        assert!(result.is_err());
    }

    #[test]
    fn test_enemies_by_team() {
        let ctx = context();
        assert_eq!(ctx.enemies_of(FormationId(1)), vec![FormationId(2), FormationId(3)]);
        assert_eq!(ctx.enemies_of(FormationId(2)), vec![FormationId(1)]);
        assert!(ctx.enemies_of(FormationId(42)).is_empty());
    }

    #[test]
    fn test_remove_formation_moves_to_departed() {
        let mut ctx = context();
        ctx.set_round(2);
        let departed = ctx.remove_formation(FormationId(2), RemovalCondition::Retreated);
        assert!(departed.is_some());
        assert!(ctx.formation(FormationId(2)).is_none());
        assert_eq!(ctx.departed()[0].round, 2);
        assert!(ctx.remove_formation(FormationId(2), RemovalCondition::Retreated).is_none());
    }

    #[test]
    fn test_teams_in_play() {
        let mut ctx = context();
        assert_eq!(ctx.teams_in_play(), vec![TeamId(1), TeamId(2)]);
        ctx.remove_formation(FormationId(1), RemovalCondition::Destroyed);
        assert_eq!(ctx.teams_in_play(), vec![TeamId(2)]);
    }

    #[test]
    fn test_element_lookup_and_removal_ledger() {
        let mut ctx = context();
        assert_eq!(ctx.element(ElementId(10)).map(|e| e.name.as_str()), Some("Atlas"));
        assert!(ctx.element(ElementId(99)).is_none());
        assert!(matches!(
            ctx.try_element(ElementId(99)),
            Err(ResolveError::ElementNotFound(ElementId(99)))
        ));
        assert!(matches!(
            ctx.try_formation(FormationId(8)),
            Err(ResolveError::FormationNotFound(FormationId(8)))
        ));
        assert!(ctx.try_formation(FormationId(1)).is_ok());

        ctx.mark_element_removed(ElementId(10), FormationId(1), RemovalCondition::Retreated);
        assert_eq!(
            ctx.removal_condition(ElementId(10)),
            Some(RemovalCondition::Retreated)
        );
    }

    #[test]
    fn test_report_stamped_with_current_phase() {
        let mut ctx = context();
        ctx.set_round(4);
        ctx.set_phase(SimulationPhase::End);
        ctx.report(ReportEntry::new(codes::WITHDRAW_FAIL).add("Red"));
        let entry = &ctx.battle_report().entries[0];
        assert_eq!(entry.round, 4);
        assert_eq!(entry.phase, SimulationPhase::End);
    }

    #[test]
    fn test_pending_actions_drained() {
        let mut ctx = context();
        ctx.submit(Action::MoraleCheck {
            formation_id: FormationId(1),
        });
        assert_eq!(ctx.pending_actions().len(), 1);
        let taken = ctx.take_pending_actions();
        assert_eq!(taken.len(), 1);
        assert!(ctx.pending_actions().is_empty());
    }
}
