use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("competition not found: {0}")]
    CompetitionNotFound(String),

    #[error("no current competition season for competition {0}")]
    CompetitionSeasonNotFound(String),

    #[error("season not found: {0}")]
    SeasonNotFound(String),

    #[error("no open season")]
    NoOpenSeason,

    #[error("match not found: {0}")]
    MatchNotFound(String),

    #[error("match day not found: {0}")]
    MatchDayNotFound(String),

    #[error("club not found: {0}")]
    ClubNotFound(String),

    #[error("country not found: {0}")]
    CountryNotFound(String),

    #[error("stadium not found: {0}")]
    StadiumNotFound(String),

    #[error("no table entry for team {team_id} in table {table_id}")]
    TableEntryNotFound { table_id: String, team_id: String },

    #[error("no match day slots configured for competition season {0}")]
    NoMatchDaySlots(String),

    #[error("{rounds} rounds generated but only {slots} match day slots exist for competition season {competition_season_id}")]
    InsufficientMatchDays { competition_season_id: String, rounds: usize, slots: usize },

    #[error("round {round} needs {expected} match day slot(s), found {found}")]
    RoundSlotMismatch { round: String, expected: usize, found: usize },

    #[error("draw pool for round {round} has odd size {size}")]
    OddDrawPool { round: String, size: usize },

    #[error("match {match_id} has unresolved team slots ({home_alias} vs {away_alias})")]
    UnresolvedTeams { match_id: String, home_alias: String, away_alias: String },

    #[error("match {match_id} is not in a simulatable state: {status}")]
    NotSimulatable { match_id: String, status: String },

    #[error("second leg {match_id} has no first leg reference")]
    MissingFirstLeg { match_id: String },

    #[error("first leg {first_leg_id} of {match_id} has not been played")]
    FirstLegNotPlayed { match_id: String, first_leg_id: String },

    #[error("second leg {match_id} teams do not mirror first leg {first_leg_id}")]
    LegsNotMirrored { match_id: String, first_leg_id: String },

    #[error("match {0} ended level with no penalty path to decide it")]
    UndecidedTie(String),

    #[error("rank {rank} slot of competition {competition_id} has no target competition")]
    SlotTargetMissing { competition_id: String, rank: u32 },

    #[error("season pipeline phase '{phase}' precondition failed: {detail}")]
    PhasePrecondition { phase: &'static str, detail: String },
}

impl EngineError {
    /// Configuration problems require data fixes by the caller; everything
    /// else is an invariant violation that aborts the operation that hit it.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::CompetitionNotFound(_)
                | EngineError::CompetitionSeasonNotFound(_)
                | EngineError::SeasonNotFound(_)
                | EngineError::NoOpenSeason
                | EngineError::NoMatchDaySlots(_)
                | EngineError::InsufficientMatchDays { .. }
                | EngineError::RoundSlotMismatch { .. }
                | EngineError::OddDrawPool { .. }
                | EngineError::SlotTargetMissing { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
