pub mod competition;
pub mod fixture;
pub mod history;
pub mod reference;
pub mod season;
pub mod stage;
pub mod table;

pub use competition::{
    Competition, CompetitionFormat, CompetitionKind, CompetitionScope, PointRules, PositionSlot,
    SlotKind, TieBreaker,
};
pub use fixture::{Match, MatchDay, MatchKind, MatchStatus, Score};
pub use history::{CompetitionHistoryEntry, CompetitionPerformance, TeamSeasonHistory};
pub use reference::{CalendarEvent, Club, Country, Stadium};
pub use season::{CompetitionSeason, Season, SeasonStatus};
pub use stage::{Stage, StageKind};
pub use table::{FormResult, LeagueTableEntry, FORM_WINDOW};

pub type CompetitionId = String;
pub type CompetitionSeasonId = String;
pub type SeasonId = String;
pub type StageId = String;
pub type MatchId = String;
pub type MatchDayId = String;
pub type TableId = String;
pub type TeamId = String;
pub type CountryId = String;
pub type StadiumId = String;
pub type EventId = String;
