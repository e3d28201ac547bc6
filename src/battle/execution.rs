//! Battle execution loop
//!
//! Each round: initiative -> movement -> firing -> end
//!
//! Before a phase is processed the planner submits its actions; the end
//! phase also clears out dead units and queues morale, withdraw and nerve
//! actions for the formations that need them.

use serde::{Deserialize, Serialize};

use crate::battle::actions::Action;
use crate::battle::context::{RemovalCondition, SimulationContext};
use crate::battle::morale::MoraleStatus;
use crate::battle::phase::SimulationPhase;
use crate::battle::planner::{BattlePlanner, Planner};
use crate::battle::processor::ActionsProcessor;
use crate::battle::report::{codes, BattleReport, ReportEntry};
use crate::battle::units::Formation;
use crate::core::types::{ElementId, FormationId, Round, TeamId};

/// Battle outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    Victory(TeamId),
    Draw,
}

/// Where a formation ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationFate {
    Active,
    Destroyed,
    Retreated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormationSummary {
    pub id: FormationId,
    pub name: String,
    pub team: TeamId,
    pub fate: FormationFate,
    pub morale: MoraleStatus,
    pub units: usize,
    pub armor: u32,
    pub kills: usize,
}

/// End-of-battle summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSummary {
    pub outcome: Option<BattleOutcome>,
    pub rounds: Round,
    pub formations: Vec<FormationSummary>,
    pub destroyed_elements: Vec<ElementId>,
    pub retreated_elements: Vec<ElementId>,
}

/// Decide whether the battle is over after `round` rounds
pub fn check_battle_end(ctx: &SimulationContext, round: Round) -> Option<BattleOutcome> {
    let teams = ctx.teams_in_play();
    match teams.as_slice() {
        [] => Some(BattleOutcome::Draw),
        [team] => Some(BattleOutcome::Victory(*team)),
        _ if round >= ctx.config.max_rounds => Some(BattleOutcome::Draw),
        _ => None,
    }
}

#[derive(Debug)]
pub struct Battle {
    ctx: SimulationContext,
    processor: ActionsProcessor,
    planner: Box<dyn BattlePlanner>,
    outcome: Option<BattleOutcome>,
}

impl Battle {
    pub fn new(ctx: SimulationContext) -> Self {
        Self::with_planner(ctx, Box::new(Planner))
    }

    pub fn with_planner(ctx: SimulationContext, planner: Box<dyn BattlePlanner>) -> Self {
        Self {
            ctx,
            processor: ActionsProcessor::new(),
            planner,
            outcome: None,
        }
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SimulationContext {
        &mut self.ctx
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn report(&self) -> &BattleReport {
        self.ctx.battle_report()
    }

    pub fn into_report(self) -> BattleReport {
        self.ctx.into_report()
    }

    /// Run rounds until the battle is decided
    pub fn run(&mut self) -> BattleOutcome {
        if let Some(outcome) = check_battle_end(&self.ctx, self.ctx.round()) {
            self.finish(outcome);
        }
        loop {
            if let Some(outcome) = self.outcome {
                return outcome;
            }
            self.run_round();
        }
    }

    /// Play one full round; returns the outcome once decided
    pub fn run_round(&mut self) -> Option<BattleOutcome> {
        if self.is_finished() {
            return self.outcome;
        }

        let round = self.ctx.round() + 1;
        self.ctx.set_round(round);
        tracing::debug!(round, "round start");

        for phase in SimulationPhase::ROUND {
            self.ctx.set_phase(phase);
            if phase == SimulationPhase::Initiative {
                self.ctx.report(ReportEntry::new(codes::ROUND_START).add(round));
            }
            self.ctx
                .report(ReportEntry::new(codes::PHASE_START).add(phase.label()));

            for action in self.planner.plan_phase(&mut self.ctx, phase) {
                self.ctx.submit(action);
            }
            if phase == SimulationPhase::End {
                self.phase_end_upkeep();
            }

            self.processor.handle_actions(&mut self.ctx);

            if phase == SimulationPhase::End {
                self.clear_casualties();
            }
        }

        self.clear_high_stress();

        if let Some(outcome) = check_battle_end(&self.ctx, round) {
            self.finish(outcome);
        }
        self.outcome
    }

    /// Queue end-of-round checks and write off the elements of dead units
    ///
    /// Dead units stay in their formation until the checks have resolved;
    /// they still count towards a crippled formation.
    fn phase_end_upkeep(&mut self) {
        for action in self.upkeep_actions() {
            self.ctx.submit(action);
        }

        for id in self.ctx.formation_ids() {
            let mut lost = Vec::new();
            if let Some(formation) = self.ctx.formation_mut(id) {
                for unit in formation.units.iter_mut().filter(|u| u.is_destroyed()) {
                    for element in unit.elements.iter_mut().filter(|e| e.deployed) {
                        element.deployed = false;
                        lost.push(element.id);
                    }
                }
            }
            for element in lost {
                self.ctx
                    .mark_element_removed(element, id, RemovalCondition::Destroyed);
            }
        }
    }

    fn clear_casualties(&mut self) {
        // ===== DESTROYED UNITS =====
        for id in self.ctx.formation_ids() {
            if let Some(formation) = self.ctx.formation_mut(id) {
                formation.units.retain(|u| !u.is_destroyed());
            }
        }

        // ===== EMPTY FORMATIONS =====
        for id in self.ctx.formation_ids() {
            let Some(formation) = self.ctx.formation(id) else {
                continue;
            };
            if !formation.units.is_empty() {
                continue;
            }
            let name = formation.display_name();
            tracing::info!(formation = %id, name = %name, "formation destroyed");
            self.ctx
                .report(ReportEntry::new(codes::FORMATION_DESTROYED).add(name));
            if let Some(formation) = self.ctx.formation_mut(id) {
                formation.deployed = false;
            }
            self.ctx.remove_formation(id, RemovalCondition::Destroyed);
        }
    }

    /// Morale, withdraw and nerve actions owed at the end of the round
    fn upkeep_actions(&self) -> Vec<Action> {
        let mut queued = Vec::new();
        for formation in self.ctx.formations().filter(|f| f.has_live_units()) {
            let formation_id = formation.id;
            if formation.high_stress_episode {
                queued.push(Action::MoraleCheck { formation_id });
            }
            if formation.morale_status.is_routed() || formation.is_crippled() {
                queued.push(Action::Withdraw { formation_id });
            }
            if formation.morale_status >= MoraleStatus::Shaken
                && !formation.morale_status.is_routed()
            {
                queued.push(Action::RecoveringNerve { formation_id });
            }
        }
        queued
    }

    fn clear_high_stress(&mut self) {
        for id in self.ctx.formation_ids() {
            if let Some(formation) = self.ctx.formation_mut(id) {
                formation.high_stress_episode = false;
            }
        }
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        let rounds = self.ctx.round();
        match outcome {
            BattleOutcome::Victory(team) => {
                tracing::info!(team = team.0, rounds, "battle won");
                self.ctx.report(
                    ReportEntry::new(codes::BATTLE_VICTORY)
                        .add(team.0)
                        .add(rounds),
                );
            }
            BattleOutcome::Draw => {
                tracing::info!(rounds, "battle drawn");
                self.ctx
                    .report(ReportEntry::new(codes::BATTLE_DRAW).add(rounds));
            }
        }
        self.outcome = Some(outcome);
    }

    pub fn summary(&self) -> BattleSummary {
        let mut formations: Vec<FormationSummary> = self
            .ctx
            .formations()
            .map(|f| self.summarize(f, FormationFate::Active))
            .collect();
        for departed in self.ctx.departed() {
            let fate = match departed.condition {
                RemovalCondition::Destroyed => FormationFate::Destroyed,
                RemovalCondition::Retreated => FormationFate::Retreated,
            };
            formations.push(self.summarize(&departed.formation, fate));
        }
        formations.sort_by_key(|f| f.id);

        let removed_with = |condition: RemovalCondition| -> Vec<ElementId> {
            self.ctx
                .removed_elements()
                .iter()
                .filter(|r| r.condition == condition)
                .map(|r| r.element)
                .collect()
        };

        BattleSummary {
            outcome: self.outcome,
            rounds: self.ctx.round(),
            formations,
            destroyed_elements: removed_with(RemovalCondition::Destroyed),
            retreated_elements: removed_with(RemovalCondition::Retreated),
        }
    }

    fn summarize(&self, formation: &Formation, fate: FormationFate) -> FormationSummary {
        FormationSummary {
            id: formation.id,
            name: formation.display_name(),
            team: self.ctx.team_of(formation),
            fate,
            morale: formation.morale_status,
            units: formation.live_unit_indices().len(),
            armor: formation.total_armor(),
            kills: formation
                .units
                .iter()
                .flat_map(|u| u.elements.iter())
                .map(|e| e.kills.len())
                .sum(),
        }
    }
}
