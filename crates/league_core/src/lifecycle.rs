//! End-of-season orchestration.
//!
//! The rollover is an explicit pipeline of named phases run in a fixed
//! order: podium archiving must precede team-history archiving (so cup
//! winners are known), which must precede promotion/relegation, which must
//! precede roster rotation. Each phase checks the preconditions it depends
//! on instead of trusting the caller, and the store is asked to flush after
//! every mutating phase.

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, Result};
use crate::knockout::played_match_winner;
use crate::models::{
    CalendarEvent, CompetitionHistoryEntry, CompetitionId, CompetitionPerformance,
    CompetitionScope, CompetitionSeason, Match, MatchDay, MatchKind, Season, SeasonStatus,
    SlotKind, TeamId, TeamSeasonHistory,
};
use crate::schedule::calendar::project_standard_date;
use crate::store::WorldStore;
use crate::table;

/// Summary of one completed rollover, for the caller to display.
#[derive(Debug, Clone, Default)]
pub struct SeasonRollover {
    pub closed_season_id: String,
    pub opened_season_id: String,
    pub opened_season_label: String,
    pub cycle_year: u8,
    pub archived_competitions: usize,
    pub archived_team_histories: usize,
    pub promotions: usize,
    pub relegations: usize,
    pub rotated_competition_seasons: usize,
    pub recycled_events: usize,
}

struct RolloverCtx<'a> {
    store: &'a mut WorldStore,
    closing_cycle_year: u8,
    next_cycle_year: u8,
    past: Vec<CompetitionId>,
    future: Vec<CompetitionId>,
    competition_history_done: bool,
    team_history_done: bool,
    movements_done: bool,
    summary: SeasonRollover,
}

pub struct SeasonLifecycleCoordinator;

impl SeasonLifecycleCoordinator {
    /// Roll the world forward one season. Invoked once per season boundary
    /// date.
    pub fn roll_season(store: &mut WorldStore) -> Result<SeasonRollover> {
        store.open_season()?;

        let mut ctx = RolloverCtx {
            store,
            closing_cycle_year: 0,
            next_cycle_year: 0,
            past: Vec::new(),
            future: Vec::new(),
            competition_history_done: false,
            team_history_done: false,
            movements_done: false,
            summary: SeasonRollover::default(),
        };

        let phases: &[(&str, fn(&mut RolloverCtx) -> Result<()>)] = &[
            ("advance-cycle-year", phase_advance_cycle_year),
            ("select-competitions", phase_select_competitions),
            ("archive-competition-history", phase_archive_competition_history),
            ("archive-team-histories", phase_archive_team_histories),
            ("promotions-and-relegations", phase_apply_promotions_and_relegations),
            ("rotate-global-season", phase_rotate_global_season),
            ("rotate-competition-seasons", phase_rotate_competition_seasons),
            ("recycle-calendar", phase_recycle_calendar),
        ];

        for (name, phase) in phases {
            log::info!("season rollover phase: {}", name);
            phase(&mut ctx).map_err(|e| {
                log::error!("season rollover phase '{}' failed: {}", name, e);
                e
            })?;
            ctx.store.flush();
        }

        Ok(ctx.summary)
    }
}

fn is_processed(store: &WorldStore, competition_id: &str) -> bool {
    let Some(comp) = store.competitions.get(competition_id) else {
        return false;
    };
    if comp.scope != CompetitionScope::Domestic {
        return true;
    }
    comp.country_id
        .as_deref()
        .and_then(|id| store.countries.get(id))
        .is_some_and(|c| c.followed)
}

fn phase_advance_cycle_year(ctx: &mut RolloverCtx) -> Result<()> {
    ctx.closing_cycle_year = ctx.store.cycle_year;
    ctx.next_cycle_year = ctx.closing_cycle_year % 4 + 1;
    ctx.store.cycle_year = ctx.next_cycle_year;
    ctx.summary.cycle_year = ctx.next_cycle_year;
    log::debug!("cycle year {} -> {}", ctx.closing_cycle_year, ctx.next_cycle_year);
    Ok(())
}

fn phase_select_competitions(ctx: &mut RolloverCtx) -> Result<()> {
    for comp in ctx.store.competitions.values() {
        if comp.runs_in_cycle_year(ctx.closing_cycle_year) && is_processed(ctx.store, &comp.id) {
            ctx.past.push(comp.id.clone());
        }
        if comp.runs_in_cycle_year(ctx.next_cycle_year) {
            ctx.future.push(comp.id.clone());
        }
    }
    log::info!(
        "{} competitions closing, {} starting next season",
        ctx.past.len(),
        ctx.future.len()
    );
    Ok(())
}

/// Winner and runner-up of a knockout competition, read off the deciding
/// match of its last played round.
fn cup_podium(
    store: &WorldStore,
    competition_season_id: &str,
) -> Result<(Option<TeamId>, Option<TeamId>, Option<TeamId>)> {
    let days = store.match_days_of(competition_season_id);
    for day in days.iter().rev() {
        let deciders: Vec<&Match> = store
            .matches_of_day(&day.id)
            .into_iter()
            .filter(|m| {
                matches!(m.kind, MatchKind::KnockoutSingle | MatchKind::SecondLeg) && m.is_played()
            })
            .collect();
        if let Some(final_match) = deciders.first() {
            let winner = played_match_winner(store, final_match)?;
            let (home, away) = final_match.resolved_teams()?;
            let runner_up = if winner == *home { away.clone() } else { home.clone() };
            return Ok((Some(winner), Some(runner_up), None));
        }
    }
    Ok((None, None, None))
}

fn phase_archive_competition_history(ctx: &mut RolloverCtx) -> Result<()> {
    let (season_id, season_label) = {
        let season = ctx.store.open_season()?;
        (season.id.clone(), season.label.clone())
    };

    for competition_id in ctx.past.clone() {
        let comp = ctx.store.competition(&competition_id)?.clone();
        let cs = match ctx.store.current_competition_season(&competition_id) {
            Ok(cs) => cs.clone(),
            Err(_) => {
                log::warn!("{} has no running season to archive", competition_id);
                continue;
            }
        };

        let (winner, runner_up, third) = if comp.is_league() {
            let table_id = format!("tbl-{}", cs.id);
            table::recompute_positions(ctx.store, &table_id);
            let rows = table::standings(ctx.store, &table_id);
            (
                rows.first().map(|e| e.team_id.clone()),
                rows.get(1).map(|e| e.team_id.clone()),
                rows.get(2).map(|e| e.team_id.clone()),
            )
        } else {
            cup_podium(ctx.store, &cs.id)?
        };

        ctx.store.competition_history.push(CompetitionHistoryEntry {
            competition_id,
            season_id: season_id.clone(),
            season_label: season_label.clone(),
            winner,
            runner_up,
            third,
        });
        ctx.summary.archived_competitions += 1;
    }

    ctx.competition_history_done = true;
    Ok(())
}

fn phase_archive_team_histories(ctx: &mut RolloverCtx) -> Result<()> {
    if !ctx.competition_history_done {
        return Err(EngineError::PhasePrecondition {
            phase: "archive-team-histories",
            detail: "competition podiums were not archived first".to_string(),
        });
    }

    let (season_id, season_label) = {
        let season = ctx.store.open_season()?;
        (season.id.clone(), season.label.clone())
    };

    let mut per_team: std::collections::BTreeMap<TeamId, Vec<CompetitionPerformance>> =
        std::collections::BTreeMap::new();

    for competition_id in ctx.past.clone() {
        let comp = ctx.store.competition(&competition_id)?.clone();
        let cs = match ctx.store.current_competition_season(&competition_id) {
            Ok(cs) => cs.clone(),
            Err(_) => continue,
        };
        let podium_winner = ctx
            .store
            .competition_history
            .iter()
            .find(|h| h.competition_id == competition_id && h.season_id == season_id)
            .and_then(|h| h.winner.clone());

        if comp.is_league() {
            let table_id = format!("tbl-{}", cs.id);
            for entry in table::standings(ctx.store, &table_id) {
                let slot = comp.position_slots.get(&entry.position);
                let kind = slot.map(|s| s.kind);
                per_team.entry(entry.team_id.clone()).or_default().push(CompetitionPerformance {
                    competition_id: competition_id.clone(),
                    competition_name: comp.name.clone(),
                    position: Some(entry.position),
                    promoted: kind == Some(SlotKind::Promotion),
                    relegated: kind == Some(SlotKind::Relegation),
                    qualified_continental: kind == Some(SlotKind::Continental),
                    champion: kind == Some(SlotKind::Champion) || entry.position == 1,
                });
            }
        } else {
            for team_id in &cs.team_ids {
                per_team.entry(team_id.clone()).or_default().push(CompetitionPerformance {
                    competition_id: competition_id.clone(),
                    competition_name: comp.name.clone(),
                    position: None,
                    promoted: false,
                    relegated: false,
                    qualified_continental: false,
                    champion: podium_winner.as_deref() == Some(team_id),
                });
            }
        }
    }

    for (team_id, performances) in per_team {
        ctx.store.team_histories.push(TeamSeasonHistory {
            team_id,
            season_id: season_id.clone(),
            season_label: season_label.clone(),
            performances,
        });
        ctx.summary.archived_team_histories += 1;
    }

    ctx.team_history_done = true;
    Ok(())
}

fn phase_apply_promotions_and_relegations(ctx: &mut RolloverCtx) -> Result<()> {
    if !ctx.team_history_done {
        return Err(EngineError::PhasePrecondition {
            phase: "promotions-and-relegations",
            detail: "team histories must be archived before memberships move".to_string(),
        });
    }

    for competition_id in ctx.past.clone() {
        let comp = ctx.store.competition(&competition_id)?.clone();
        if !comp.is_league() {
            continue;
        }
        let cs = match ctx.store.current_competition_season(&competition_id) {
            Ok(cs) => cs.clone(),
            Err(_) => continue,
        };
        let table_id = format!("tbl-{}", cs.id);
        let ranked: Vec<(u32, TeamId)> = table::standings(ctx.store, &table_id)
            .iter()
            .map(|e| (e.position, e.team_id.clone()))
            .collect();

        for (rank, slot) in &comp.position_slots {
            let moving_up = match slot.kind {
                SlotKind::Promotion => true,
                SlotKind::Relegation => false,
                _ => continue,
            };
            let Some((_, team_id)) = ranked.iter().find(|(position, _)| position == rank) else {
                continue;
            };
            let target = slot.target_competition_id.clone().ok_or_else(|| {
                EngineError::SlotTargetMissing { competition_id: competition_id.clone(), rank: *rank }
            })?;
            ctx.store.competition(&target)?;
            ctx.store.club_mut(team_id)?.league_id = target.clone();
            if moving_up {
                ctx.summary.promotions += 1;
                log::info!("{} promoted from {} to {}", team_id, competition_id, target);
            } else {
                ctx.summary.relegations += 1;
                log::info!("{} relegated from {} to {}", team_id, competition_id, target);
            }
        }
    }

    ctx.movements_done = true;
    Ok(())
}

/// (month, day) of a date moved to the following year; Feb 29 falls back to
/// Feb 28.
fn next_year_slot(date: NaiveDate) -> NaiveDate {
    let mut day = date.day();
    loop {
        if let Some(d) = NaiveDate::from_ymd_opt(date.year() + 1, date.month(), day) {
            return d;
        }
        day -= 1;
    }
}

fn season_label(start: NaiveDate, end: NaiveDate) -> String {
    if start.year() == end.year() {
        start.year().to_string()
    } else {
        format!("{}/{:02}", start.year(), end.year() % 100)
    }
}

fn phase_rotate_global_season(ctx: &mut RolloverCtx) -> Result<()> {
    if !ctx.movements_done {
        return Err(EngineError::PhasePrecondition {
            phase: "rotate-global-season",
            detail: "league memberships were not settled first".to_string(),
        });
    }

    let (old_id, old_start, old_end) = {
        let season = ctx.store.open_season()?;
        (season.id.clone(), season.start_date, season.end_date)
    };
    ctx.store.open_season_mut()?.status = SeasonStatus::Closed;

    let start_date = next_year_slot(old_start);
    let end_date = next_year_slot(old_end);
    let label = season_label(start_date, end_date);
    let id = ctx.store.allocate_id("season");
    ctx.store.add_season(Season {
        id: id.clone(),
        label: label.clone(),
        start_date,
        end_date,
        status: SeasonStatus::Open,
    });

    log::info!("closed season {}, opened {}", old_id, label);
    ctx.summary.closed_season_id = old_id;
    ctx.summary.opened_season_id = id;
    ctx.summary.opened_season_label = label;
    Ok(())
}

fn phase_rotate_competition_seasons(ctx: &mut RolloverCtx) -> Result<()> {
    if ctx.summary.opened_season_id.is_empty() {
        return Err(EngineError::PhasePrecondition {
            phase: "rotate-competition-seasons",
            detail: "no new season was opened".to_string(),
        });
    }
    let new_season_id = ctx.summary.opened_season_id.clone();

    for competition_id in ctx.future.clone() {
        let comp = ctx.store.competition(&competition_id)?.clone();
        let old_cs: Option<CompetitionSeason> = ctx
            .store
            .competition_seasons
            .values()
            .filter(|cs| cs.competition_id == competition_id)
            .max_by(|a, b| a.id.cmp(&b.id))
            .cloned();
        let Some(old_cs) = old_cs else {
            log::warn!("competition {} has no season to recycle", competition_id);
            continue;
        };
        if let Some(cs) = ctx.store.competition_seasons.get_mut(&old_cs.id) {
            if cs.status == SeasonStatus::Open {
                cs.status = SeasonStatus::Closed;
            }
        }

        // Roster reflects the membership moves applied earlier in the
        // pipeline; cups re-qualify through their draws instead.
        let roster = if comp.is_league() {
            ctx.store.league_members(&competition_id)
        } else {
            old_cs.team_ids.clone()
        };
        let current_stage_id = ctx.store.first_stage_of(&competition_id).map(|s| s.id.clone());

        let new_cs_id = ctx.store.allocate_id("cseason");
        ctx.store.add_competition_season(CompetitionSeason {
            id: new_cs_id.clone(),
            competition_id: competition_id.clone(),
            season_id: new_season_id.clone(),
            team_ids: roster,
            current_stage_id,
            status: SeasonStatus::Open,
        });

        // Recycle the match day skeleton with projected dates. Matches are
        // not rebuilt here; they await the next scheduling pass or draw.
        let old_days: Vec<MatchDay> =
            ctx.store.match_days_of(&old_cs.id).into_iter().cloned().collect();
        for old in old_days {
            let id = ctx.store.allocate_id("mday");
            let date = project_standard_date(old.standard_date, old.date.year() + 1);
            ctx.store.add_match_day(MatchDay {
                id,
                competition_season_id: new_cs_id.clone(),
                index: old.index,
                date,
                standard_date: old.standard_date,
                finished: false,
            });
        }

        ctx.summary.rotated_competition_seasons += 1;
    }

    Ok(())
}

fn phase_recycle_calendar(ctx: &mut RolloverCtx) -> Result<()> {
    let events: Vec<CalendarEvent> = ctx.store.calendar_events.values().cloned().collect();
    ctx.store.calendar_events.clear();
    for event in events {
        let id = ctx.store.allocate_id("event");
        let date = project_standard_date(event.date, event.date.year() + 1);
        ctx.store.add_calendar_event(CalendarEvent {
            id,
            date,
            label: event.label,
            competition_id: event.competition_id,
            unread: true,
        });
        ctx.summary.recycled_events += 1;
    }
    Ok(())
}
