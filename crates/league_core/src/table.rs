//! Standings mutation and ranking.
//!
//! Ranking order is points, then goal difference, then goals scored, with
//! team id as the final stable tie-break. Competitions declare a richer
//! tie-breaker list (head-to-head, wins) in their format; that list is kept
//! as data but intentionally not consulted here — see DESIGN.md.

use std::cmp::Ordering;

use crate::error::{EngineError, Result};
use crate::models::{FormResult, LeagueTableEntry, TableId};
use crate::store::WorldStore;

/// Create the standings table for a competition season: one zeroed row per
/// roster team. Existing rows are kept, so calling this twice is harmless.
pub fn ensure_table(store: &mut WorldStore, competition_season_id: &str) -> Result<TableId> {
    let (competition_id, season_id, stage_id, team_ids) = {
        let cs = store.competition_seasons.get(competition_season_id).ok_or_else(|| {
            EngineError::CompetitionSeasonNotFound(competition_season_id.to_string())
        })?;
        (cs.competition_id.clone(), cs.season_id.clone(), cs.current_stage_id.clone(), cs.team_ids.clone())
    };

    let table_id = format!("tbl-{}", competition_season_id);
    for team_id in team_ids {
        let row = LeagueTableEntry::zeroed(
            table_id.clone(),
            competition_id.clone(),
            season_id.clone(),
            stage_id.clone(),
            team_id,
        );
        store.table_entries.entry(row.id.clone()).or_insert(row);
    }
    Ok(table_id)
}

/// Fold one full-time result into a team's standings row. Point values come
/// from the owning competition's configured rules.
pub fn record_result(
    store: &mut WorldStore,
    table_id: &str,
    team_id: &str,
    goals_for: u8,
    goals_against: u8,
) -> Result<()> {
    let competition_id = store.table_entry_mut(table_id, team_id)?.competition_id.clone();
    let points = store.competition(&competition_id)?.format.points;

    let entry = store.table_entry_mut(table_id, team_id)?;
    entry.played += 1;
    entry.goals_for += goals_for as u32;
    entry.goals_against += goals_against as u32;
    match goals_for.cmp(&goals_against) {
        Ordering::Greater => {
            entry.won += 1;
            entry.points += points.win as u32;
            entry.push_form(FormResult::Win);
        }
        Ordering::Equal => {
            entry.drawn += 1;
            entry.points += points.draw as u32;
            entry.push_form(FormResult::Draw);
        }
        Ordering::Less => {
            entry.lost += 1;
            entry.points += points.loss as u32;
            entry.push_form(FormResult::Loss);
        }
    }
    Ok(())
}

fn rank_order(a: &LeagueTableEntry, b: &LeagueTableEntry) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.goal_difference().cmp(&a.goal_difference()))
        .then(b.goals_for.cmp(&a.goals_for))
        .then(a.team_id.cmp(&b.team_id))
}

/// Re-sort a whole table and assign 1-based positions.
pub fn recompute_positions(store: &mut WorldStore, table_id: &str) {
    let mut rows: Vec<&LeagueTableEntry> = store.table_entries_of(table_id);
    rows.sort_by(|a, b| rank_order(a, b));
    let ranked: Vec<String> = rows.into_iter().map(|e| e.id.clone()).collect();

    for (i, id) in ranked.iter().enumerate() {
        if let Some(entry) = store.table_entries.get_mut(id) {
            entry.position = (i + 1) as u32;
        }
    }
}

/// The table's rows in rank order. Positions are only trustworthy after
/// [`recompute_positions`].
pub fn standings<'a>(store: &'a WorldStore, table_id: &str) -> Vec<&'a LeagueTableEntry> {
    let mut rows = store.table_entries_of(table_id);
    rows.sort_by(|a, b| rank_order(a, b));
    rows
}
