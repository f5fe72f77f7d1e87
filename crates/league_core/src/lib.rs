//! # league_core - Season Lifecycle & Competition Scheduling Engine
//!
//! This library drives a multi-competition league world forward one season
//! at a time: deterministic round-robin fixture generation, knockout draws
//! with multi-leg aggregation, seeded match simulation, standings upkeep,
//! and the end-of-season rollover (history archiving, promotion and
//! relegation, calendar re-projection).
//!
//! ## Features
//! - 100% reproducible worlds (same seed + same store = same seasons)
//! - Berger-method fixtures that regenerate identically when recycled
//! - One shared winner-resolution path for draws and simulation
//! - Explicit, owned world store - no global state

pub mod error;
pub mod knockout;
pub mod lifecycle;
pub mod models;
pub mod schedule;
pub mod sim;
pub mod store;
pub mod table;

pub use error::{EngineError, Result};
pub use knockout::{
    draw_round, played_match_winner, resolve_winner, DrawOutcome, LegFormat, RoundConfig,
    RoundEntry, WinnerVerdict,
};
pub use lifecycle::{SeasonLifecycleCoordinator, SeasonRollover};
pub use models::{
    CalendarEvent, Club, Competition, CompetitionFormat, CompetitionHistoryEntry, CompetitionKind,
    CompetitionPerformance, CompetitionScope, CompetitionSeason, Country, FormResult,
    LeagueTableEntry, Match, MatchDay, MatchKind, MatchStatus, PointRules, PositionSlot, Score,
    Season, SeasonStatus, SlotKind, Stadium, Stage, StageKind, TeamSeasonHistory, TieBreaker,
};
pub use schedule::calendar::project_standard_date;
pub use schedule::{double_round_robin, schedule_league_season, single_round_robin};
pub use sim::{MatchFailure, MatchSimulator, SimulationReport};
pub use store::WorldStore;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
