use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

use super::{CompetitionId, CompetitionSeasonId, MatchDayId, MatchId, TableId, TeamId};

/// One scheduled round of fixtures within a competition season.
///
/// `date` is where the round actually sits in the calendar this season;
/// `standard_date` is the canonical anchor the date is re-projected from on
/// every rollover, so repeated rotations do not drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDay {
    pub id: MatchDayId,
    pub competition_season_id: CompetitionSeasonId,
    pub index: u32,
    pub date: NaiveDate,
    pub standard_date: NaiveDate,
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    League,
    KnockoutSingle,
    FirstLeg,
    SecondLeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    NotScheduled,
    Scheduled,
    Live,
    Played,
    Postponed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}

impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub competition_id: CompetitionId,
    pub match_day_id: MatchDayId,
    /// Present only for matches that feed a league table.
    pub table_id: Option<TableId>,
    /// Slot labels used before a draw resolves identities.
    pub home_alias: String,
    pub away_alias: String,
    pub home_team_id: Option<TeamId>,
    pub away_team_id: Option<TeamId>,
    pub kind: MatchKind,
    /// Required iff `kind == SecondLeg`.
    pub first_leg_id: Option<MatchId>,
    pub score: Option<Score>,
    pub penalty_score: Option<Score>,
    pub extra_time_played: bool,
    pub status: MatchStatus,
}

impl Match {
    /// A drafted fixture with resolved team identities, ready to play.
    pub fn scheduled(
        id: MatchId,
        competition_id: CompetitionId,
        match_day_id: MatchDayId,
        kind: MatchKind,
        home_team_id: TeamId,
        away_team_id: TeamId,
    ) -> Self {
        Self {
            id,
            competition_id,
            match_day_id,
            table_id: None,
            home_alias: home_team_id.clone(),
            away_alias: away_team_id.clone(),
            home_team_id: Some(home_team_id),
            away_team_id: Some(away_team_id),
            kind,
            first_leg_id: None,
            score: None,
            penalty_score: None,
            extra_time_played: false,
            status: MatchStatus::Scheduled,
        }
    }

    pub fn is_played(&self) -> bool {
        self.status == MatchStatus::Played
    }

    /// Resolved identities, or the invariant error if a slot is still an alias.
    pub fn resolved_teams(&self) -> Result<(&TeamId, &TeamId)> {
        match (&self.home_team_id, &self.away_team_id) {
            (Some(h), Some(a)) => Ok((h, a)),
            _ => Err(EngineError::UnresolvedTeams {
                match_id: self.id.clone(),
                home_alias: self.home_alias.clone(),
                away_alias: self.away_alias.clone(),
            }),
        }
    }

    /// Goals scored by a team in this match, attributed by identity rather
    /// than by home/away slot. `None` if the team did not take part or no
    /// score is recorded.
    pub fn goals_of(&self, team_id: &str) -> Option<u8> {
        let score = self.score?;
        if self.home_team_id.as_deref() == Some(team_id) {
            Some(score.home)
        } else if self.away_team_id.as_deref() == Some(team_id) {
            Some(score.away)
        } else {
            None
        }
    }
}
