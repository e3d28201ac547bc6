//! Narrative battle report
//!
//! Entries are keyed by numeric codes; each code has a fixed template whose
//! `{}` placeholders are filled with the entry's data in order.

use serde::{Deserialize, Serialize};

use crate::battle::phase::SimulationPhase;
use crate::core::types::Round;

pub mod codes {
    pub const ROUND_START: u32 = 1000;
    pub const PHASE_START: u32 = 1001;

    pub const ENGAGEMENT_ATTEMPT: u32 = 2000;
    pub const ENGAGEMENT_ROLLS: u32 = 2001;
    pub const ENGAGEMENT_WON: u32 = 2002;
    pub const ENGAGEMENT_LOST: u32 = 2003;
    pub const ENGAGEMENT_RELEASED: u32 = 2004;

    pub const ATTACK_DECLARED: u32 = 3000;
    pub const ATTACK_IMPOSSIBLE: u32 = 3001;
    pub const ATTACK_ROLL: u32 = 3002;
    pub const ATTACK_MISS: u32 = 3003;
    pub const ATTACK_HIT: u32 = 3004;
    pub const UNIT_DESTROYED: u32 = 3005;
    pub const CRIT_ROLL: u32 = 3006;
    pub const CRIT_NONE: u32 = 3007;
    pub const CRIT_TARGETING: u32 = 3008;
    pub const CRIT_DAMAGE: u32 = 3009;
    pub const CRIT_BOTH: u32 = 3010;
    pub const CRIT_DESTROYED: u32 = 3011;

    pub const MORALE_CHECK: u32 = 4000;
    pub const MORALE_HOLDS: u32 = 4001;
    pub const MORALE_WORSENS: u32 = 4002;

    pub const WITHDRAW_ATTEMPT: u32 = 5000;
    pub const WITHDRAW_SUCCESS: u32 = 5001;
    pub const WITHDRAW_FAIL: u32 = 5002;

    pub const FORMATION_DESTROYED: u32 = 6000;
    pub const BATTLE_VICTORY: u32 = 6001;
    pub const BATTLE_DRAW: u32 = 6002;
}

/// Template for a report code
pub fn template(code: u32) -> Option<&'static str> {
    let template = match code {
        codes::ROUND_START => "=== Round {} ===",
        codes::PHASE_START => "--- {} phase ---",

        codes::ENGAGEMENT_ATTEMPT => "{} attempts {} engagement control against {}",
        codes::ENGAGEMENT_ROLLS => "  {} needs {}, rolls {}; {} needs {}, rolls {}",
        codes::ENGAGEMENT_WON => "  {} gains engagement control over {}",
        codes::ENGAGEMENT_LOST => "  {} fails to gain engagement control over {}",
        codes::ENGAGEMENT_RELEASED => "{} releases engagement control",

        codes::ATTACK_DECLARED => "{} ({}) fires at {} ({}) at {} range",
        codes::ATTACK_IMPOSSIBLE => "  cannot hit: {}",
        codes::ATTACK_ROLL => "  needs {} [{}], rolls {}",
        codes::ATTACK_MISS => "  the attack misses",
        codes::ATTACK_HIT => "  hit for {} damage (x{}), armor {} -> {}",
        codes::UNIT_DESTROYED => "  {} destroys {}",
        codes::CRIT_ROLL => "  critical roll {}",
        codes::CRIT_NONE => "  no critical effect",
        codes::CRIT_TARGETING => "  {} suffers a targeting critical",
        codes::CRIT_DAMAGE => "  {} suffers a damage critical",
        codes::CRIT_BOTH => "  {} suffers targeting and damage criticals",
        codes::CRIT_DESTROYED => "  {} is destroyed by a critical hit",

        codes::MORALE_CHECK => "{} checks morale: needs {}, rolls {}",
        codes::MORALE_HOLDS => "  {} holds ({})",
        codes::MORALE_WORSENS => "  {} morale drops to {}",

        codes::WITHDRAW_ATTEMPT => "{} attempts to withdraw: needs 12 [{}], rolls {}",
        codes::WITHDRAW_SUCCESS => "  {} withdraws from the battle",
        codes::WITHDRAW_FAIL => "  {} fails to withdraw",

        codes::FORMATION_DESTROYED => "{} has been destroyed",
        codes::BATTLE_VICTORY => "Team {} is victorious after {} rounds",
        codes::BATTLE_DRAW => "The battle ends in a draw after {} rounds",

        _ => return None,
    };
    Some(template)
}

/// A single report line before rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub round: Round,
    pub phase: SimulationPhase,
    pub code: u32,
    pub data: Vec<String>,
}

impl ReportEntry {
    pub fn new(code: u32) -> Self {
        Self {
            round: 0,
            phase: SimulationPhase::default(),
            code,
            data: Vec::new(),
        }
    }

    /// Append the next placeholder value
    pub fn add(mut self, value: impl ToString) -> Self {
        self.data.push(value.to_string());
        self
    }

    pub fn render(&self) -> String {
        let Some(template) = template(self.code) else {
            return format!("<unknown report {}>", self.code);
        };

        let mut out = String::with_capacity(template.len() + 16);
        let mut values = self.data.iter();
        let mut pieces = template.split("{}").peekable();
        while let Some(piece) = pieces.next() {
            out.push_str(piece);
            if pieces.peek().is_some() {
                match values.next() {
                    Some(value) => out.push_str(value),
                    None => out.push('?'),
                }
            }
        }
        out
    }
}

/// Ordered report of a whole battle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleReport {
    pub entries: Vec<ReportEntry>,
}

impl BattleReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut entry: ReportEntry, round: Round, phase: SimulationPhase) {
        entry.round = round;
        entry.phase = phase;
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_code(&self, code: u32) -> bool {
        self.entries.iter().any(|e| e.code == code)
    }

    pub fn count_code(&self, code: u32) -> usize {
        self.entries.iter().filter(|e| e.code == code).count()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ReportEntry::render).collect()
    }

    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}
