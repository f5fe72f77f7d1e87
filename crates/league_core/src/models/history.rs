use serde::{Deserialize, Serialize};

use super::{CompetitionId, SeasonId, TeamId};

/// Podium record for one competition season. Written once at season close,
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionHistoryEntry {
    pub competition_id: CompetitionId,
    pub season_id: SeasonId,
    pub season_label: String,
    pub winner: Option<TeamId>,
    pub runner_up: Option<TeamId>,
    pub third: Option<TeamId>,
}

/// How one team fared in one competition over a season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionPerformance {
    pub competition_id: CompetitionId,
    pub competition_name: String,
    /// Final rank for table-based competitions; `None` where no standings
    /// exist (cup participants eliminated before the final).
    pub position: Option<u32>,
    pub promoted: bool,
    pub relegated: bool,
    pub qualified_continental: bool,
    pub champion: bool,
}

/// One archival record per team per season, aggregating every competition
/// the team took part in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSeasonHistory {
    pub team_id: TeamId,
    pub season_id: SeasonId,
    pub season_label: String,
    pub performances: Vec<CompetitionPerformance>,
}
