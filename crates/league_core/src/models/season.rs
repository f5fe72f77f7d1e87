use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CompetitionId, CompetitionSeasonId, SeasonId, StageId, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonStatus {
    NotScheduled,
    Planned,
    Open,
    Closed,
}

/// The global time container. Exactly one season is Open at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: SeasonStatus,
}

/// The per-competition instance of a season: this year's roster and stage
/// progress. The id is regenerated on every rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionSeason {
    pub id: CompetitionSeasonId,
    pub competition_id: CompetitionId,
    pub season_id: SeasonId,
    pub team_ids: Vec<TeamId>,
    pub current_stage_id: Option<StageId>,
    pub status: SeasonStatus,
}

impl CompetitionSeason {
    pub fn contains_team(&self, team_id: &str) -> bool {
        self.team_ids.iter().any(|t| t == team_id)
    }
}
