use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CompetitionId, CountryId, EventId, StadiumId, TeamId};

/// A club. `league_id` is the league membership that promotion and
/// relegation reassign at season rollover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    pub id: TeamId,
    pub name: String,
    pub country_id: CountryId,
    pub stadium_id: Option<StadiumId>,
    pub league_id: CompetitionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    /// Only domestic competitions of followed countries are processed at
    /// season rollover.
    pub followed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stadium {
    pub id: StadiumId,
    pub name: String,
    pub club_id: TeamId,
}

/// A dated entry on the game calendar. Recycled with a fresh id each season
/// so unread indicators reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub date: NaiveDate,
    pub label: String,
    pub competition_id: Option<CompetitionId>,
    pub unread: bool,
}
