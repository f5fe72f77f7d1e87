use serde::{Deserialize, Serialize};

use super::{CompetitionId, SeasonId, StageId, TableId, TeamId};

/// How many results the rolling form buffer keeps.
pub const FORM_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    Win,
    Draw,
    Loss,
}

/// One standings row per (team, competition, season, stage).
///
/// Goal difference is always derived from goals for/against, never stored.
/// `position` is only meaningful after a full `recompute_positions` pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueTableEntry {
    pub id: String,
    pub table_id: TableId,
    pub competition_id: CompetitionId,
    pub season_id: SeasonId,
    pub stage_id: Option<StageId>,
    pub team_id: TeamId,
    pub points: u32,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    /// Last results, oldest first, capped at [`FORM_WINDOW`].
    pub form: Vec<FormResult>,
    pub position: u32,
}

impl LeagueTableEntry {
    pub fn zeroed(
        table_id: TableId,
        competition_id: CompetitionId,
        season_id: SeasonId,
        stage_id: Option<StageId>,
        team_id: TeamId,
    ) -> Self {
        Self {
            id: format!("{}:{}", table_id, team_id),
            table_id,
            competition_id,
            season_id,
            stage_id,
            team_id,
            points: 0,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            form: Vec::new(),
            position: 0,
        }
    }

    pub fn goal_difference(&self) -> i64 {
        self.goals_for as i64 - self.goals_against as i64
    }

    /// Push a result onto the form buffer, evicting the oldest entry.
    pub fn push_form(&mut self, result: FormResult) {
        if self.form.len() == FORM_WINDOW {
            self.form.remove(0);
        }
        self.form.push(result);
    }
}
