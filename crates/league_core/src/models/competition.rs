use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CompetitionId, CountryId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitionKind {
    League,
    Cup,
    SuperCup,
    Continental,
    International,
    Friendly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitionScope {
    Domestic,
    Continental,
    Global,
}

/// Points awarded per full-time outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointRules {
    pub win: u8,
    pub draw: u8,
    pub loss: u8,
}

impl Default for PointRules {
    fn default() -> Self {
        Self { win: 3, draw: 1, loss: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreaker {
    GoalDifference,
    GoalsFor,
    HeadToHead,
    Wins,
    AwayGoals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionFormat {
    pub team_count: usize,
    /// Double round-robin when set; single otherwise.
    pub home_and_away: bool,
    pub points: PointRules,
    /// Declared ranking order. Note that `table::recompute_positions` applies
    /// a fixed points / goal difference / goals-for order regardless; the
    /// richer declared list is kept as data but not consulted.
    pub tie_breakers: Vec<TieBreaker>,
}

/// What finishing at a given rank means for a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    Promotion,
    Relegation,
    PromotionPlayoff,
    RelegationPlayoff,
    Continental,
    Champion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSlot {
    pub kind: SlotKind,
    pub target_competition_id: Option<CompetitionId>,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    pub kind: CompetitionKind,
    pub scope: CompetitionScope,
    /// Set for domestic competitions; drives the followed-country filter
    /// during season rollover.
    pub country_id: Option<CountryId>,
    pub format: CompetitionFormat,
    /// Final rank -> consequence of finishing there.
    pub position_slots: BTreeMap<u32, PositionSlot>,
    /// Which years of the 4-year cycle this competition runs in.
    /// Annual competitions list all four.
    pub active_cycle_years: Vec<u8>,
}

impl Competition {
    pub fn is_league(&self) -> bool {
        self.kind == CompetitionKind::League
    }

    pub fn runs_in_cycle_year(&self, cycle_year: u8) -> bool {
        self.active_cycle_years.contains(&cycle_year)
    }
}
