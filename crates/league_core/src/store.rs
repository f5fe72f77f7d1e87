//! The shared in-memory world store.
//!
//! Every engine component borrows the store explicitly; there is no ambient
//! global instance. Tests build small isolated worlds the same way the
//! driver binary builds the full one. Collections are ordered maps so that
//! iteration order, and with it every seeded simulation, is reproducible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::{
    CalendarEvent, Club, Competition, CompetitionHistoryEntry, CompetitionId, CompetitionSeason,
    CompetitionSeasonId, Country, CountryId, EventId, LeagueTableEntry, Match, MatchDay,
    MatchDayId, MatchId, Season, SeasonId, SeasonStatus, Stadium, StadiumId, Stage, StageId,
    TeamId, TeamSeasonHistory,
};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WorldStore {
    pub competitions: BTreeMap<CompetitionId, Competition>,
    pub stages: BTreeMap<StageId, Stage>,
    pub seasons: BTreeMap<SeasonId, Season>,
    pub competition_seasons: BTreeMap<CompetitionSeasonId, CompetitionSeason>,
    pub match_days: BTreeMap<MatchDayId, MatchDay>,
    pub matches: BTreeMap<MatchId, Match>,
    pub table_entries: BTreeMap<String, LeagueTableEntry>,
    pub competition_history: Vec<CompetitionHistoryEntry>,
    pub team_histories: Vec<TeamSeasonHistory>,
    pub clubs: BTreeMap<TeamId, Club>,
    pub countries: BTreeMap<CountryId, Country>,
    pub stadiums: BTreeMap<StadiumId, Stadium>,
    pub calendar_events: BTreeMap<EventId, CalendarEvent>,
    /// Position within the 4-year cadence gating biennial/quadrennial
    /// competitions, 1..=4.
    pub cycle_year: u8,
    next_id: u64,
    /// How many times the host has been asked to persist. The storage medium
    /// itself lives outside the engine.
    pub flush_count: u64,
}

impl WorldStore {
    pub fn new() -> Self {
        Self { cycle_year: 1, ..Self::default() }
    }

    /// Sequential ids keep the world fully reproducible under a fixed seed;
    /// they survive snapshot/restore through `next_id`.
    pub fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{:06}", prefix, self.next_id)
    }

    /// Edge call asking the host to persist. The engine only records that it
    /// was requested.
    pub fn flush(&mut self) {
        self.flush_count += 1;
        log::debug!("store flush requested (#{})", self.flush_count);
    }

    // ========================
    // Lookups
    // ========================

    pub fn competition(&self, id: &str) -> Result<&Competition> {
        self.competitions.get(id).ok_or_else(|| EngineError::CompetitionNotFound(id.to_string()))
    }

    pub fn club(&self, id: &str) -> Result<&Club> {
        self.clubs.get(id).ok_or_else(|| EngineError::ClubNotFound(id.to_string()))
    }

    pub fn club_mut(&mut self, id: &str) -> Result<&mut Club> {
        self.clubs.get_mut(id).ok_or_else(|| EngineError::ClubNotFound(id.to_string()))
    }

    pub fn country(&self, id: &str) -> Result<&Country> {
        self.countries.get(id).ok_or_else(|| EngineError::CountryNotFound(id.to_string()))
    }

    pub fn stadium(&self, id: &str) -> Result<&Stadium> {
        self.stadiums.get(id).ok_or_else(|| EngineError::StadiumNotFound(id.to_string()))
    }

    pub fn fixture(&self, id: &str) -> Result<&Match> {
        self.matches.get(id).ok_or_else(|| EngineError::MatchNotFound(id.to_string()))
    }

    pub fn fixture_mut(&mut self, id: &str) -> Result<&mut Match> {
        self.matches.get_mut(id).ok_or_else(|| EngineError::MatchNotFound(id.to_string()))
    }

    pub fn match_day(&self, id: &str) -> Result<&MatchDay> {
        self.match_days.get(id).ok_or_else(|| EngineError::MatchDayNotFound(id.to_string()))
    }

    pub fn match_day_mut(&mut self, id: &str) -> Result<&mut MatchDay> {
        self.match_days.get_mut(id).ok_or_else(|| EngineError::MatchDayNotFound(id.to_string()))
    }

    /// The single Open season.
    pub fn open_season(&self) -> Result<&Season> {
        self.seasons
            .values()
            .find(|s| s.status == SeasonStatus::Open)
            .ok_or(EngineError::NoOpenSeason)
    }

    pub fn open_season_mut(&mut self) -> Result<&mut Season> {
        self.seasons
            .values_mut()
            .find(|s| s.status == SeasonStatus::Open)
            .ok_or(EngineError::NoOpenSeason)
    }

    /// The running competition season for a competition, if any.
    pub fn current_competition_season(&self, competition_id: &str) -> Result<&CompetitionSeason> {
        self.competition_seasons
            .values()
            .find(|cs| cs.competition_id == competition_id && cs.status == SeasonStatus::Open)
            .ok_or_else(|| EngineError::CompetitionSeasonNotFound(competition_id.to_string()))
    }

    /// Match days of a competition season, ordered by round index.
    pub fn match_days_of(&self, competition_season_id: &str) -> Vec<&MatchDay> {
        let mut days: Vec<&MatchDay> = self
            .match_days
            .values()
            .filter(|md| md.competition_season_id == competition_season_id)
            .collect();
        days.sort_by_key(|md| md.index);
        days
    }

    pub fn matches_of_day(&self, match_day_id: &str) -> Vec<&Match> {
        self.matches.values().filter(|m| m.match_day_id == match_day_id).collect()
    }

    pub fn table_entries_of(&self, table_id: &str) -> Vec<&LeagueTableEntry> {
        self.table_entries.values().filter(|e| e.table_id == table_id).collect()
    }

    pub fn table_entry_mut(&mut self, table_id: &str, team_id: &str) -> Result<&mut LeagueTableEntry> {
        self.table_entries.get_mut(&format!("{}:{}", table_id, team_id)).ok_or_else(|| {
            EngineError::TableEntryNotFound {
                table_id: table_id.to_string(),
                team_id: team_id.to_string(),
            }
        })
    }

    /// The entry stage of a competition: the stage no other stage chains to.
    pub fn first_stage_of(&self, competition_id: &str) -> Option<&Stage> {
        let stages: Vec<&Stage> =
            self.stages.values().filter(|s| s.competition_id == competition_id).collect();
        stages
            .iter()
            .find(|s| {
                !stages.iter().any(|other| other.next_stage_id.as_deref() == Some(s.id.as_str()))
            })
            .copied()
    }

    /// Clubs whose league membership points at the given competition,
    /// in stable id order.
    pub fn league_members(&self, competition_id: &str) -> Vec<TeamId> {
        self.clubs
            .values()
            .filter(|c| c.league_id == competition_id)
            .map(|c| c.id.clone())
            .collect()
    }

    // ========================
    // Inserts
    // ========================

    pub fn add_competition(&mut self, competition: Competition) {
        self.competitions.insert(competition.id.clone(), competition);
    }

    pub fn add_stage(&mut self, stage: Stage) {
        self.stages.insert(stage.id.clone(), stage);
    }

    pub fn add_season(&mut self, season: Season) {
        self.seasons.insert(season.id.clone(), season);
    }

    pub fn add_competition_season(&mut self, competition_season: CompetitionSeason) {
        self.competition_seasons.insert(competition_season.id.clone(), competition_season);
    }

    pub fn add_match_day(&mut self, match_day: MatchDay) {
        self.match_days.insert(match_day.id.clone(), match_day);
    }

    pub fn add_match(&mut self, m: Match) {
        self.matches.insert(m.id.clone(), m);
    }

    pub fn add_club(&mut self, club: Club) {
        self.clubs.insert(club.id.clone(), club);
    }

    pub fn add_country(&mut self, country: Country) {
        self.countries.insert(country.id.clone(), country);
    }

    pub fn add_stadium(&mut self, stadium: Stadium) {
        self.stadiums.insert(stadium.id.clone(), stadium);
    }

    pub fn add_calendar_event(&mut self, event: CalendarEvent) {
        self.calendar_events.insert(event.id.clone(), event);
    }
}
