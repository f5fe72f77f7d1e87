use serde::{Deserialize, Serialize};

use super::competition::{PointRules, TieBreaker};
use super::{CompetitionId, StageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageKind {
    League,
    Group,
    Knockout,
    Playoff,
}

/// An ordered phase of a competition. Stages chain through `next_stage_id`;
/// the first stage of a competition is the one no other stage points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub competition_id: CompetitionId,
    pub name: String,
    pub kind: StageKind,
    pub points: PointRules,
    pub tie_breakers: Vec<TieBreaker>,
    pub next_stage_id: Option<StageId>,
}
