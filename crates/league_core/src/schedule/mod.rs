//! Round-robin fixture generation, circle (Berger) method.
//!
//! Pairing is fully deterministic and independent of external randomness, so
//! a recycled season regenerates the identical fixture list from the same
//! roster order.

pub mod calendar;

use crate::error::{EngineError, Result};
use crate::models::{Match, MatchDayId, MatchId, MatchKind, TeamId};
use crate::store::WorldStore;
use crate::table;

/// One scheduled pairing, home team first.
pub type Pairing = (TeamId, TeamId);

/// Rounds of a single round-robin: every team meets every other exactly
/// once. `N-1` rounds for even team counts, `N` rounds for odd counts (a
/// synthetic bye fills the ring and its pairings are filtered out).
pub fn single_round_robin(teams: &[TeamId]) -> Vec<Vec<Pairing>> {
    if teams.len() < 2 {
        return Vec::new();
    }

    let mut ring: Vec<Option<TeamId>> = teams.iter().cloned().map(Some).collect();
    if ring.len() % 2 == 1 {
        ring.push(None);
    }
    let n = ring.len();

    let mut rounds = Vec::with_capacity(n - 1);
    for round in 0..n - 1 {
        let mut pairings = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            let (Some(a), Some(b)) = (ring[i].clone(), ring[n - 1 - i].clone()) else {
                continue;
            };
            // The pivot pairing alternates venue with round parity; every
            // other pairing mirrors it.
            let pivot_home_first = round % 2 == 0;
            let home_first = if i == 0 { pivot_home_first } else { !pivot_home_first };
            if home_first {
                pairings.push((a, b));
            } else {
                pairings.push((b, a));
            }
        }
        rounds.push(pairings);

        // Rotate: the pivot stays fixed, the last element moves to position 1.
        if let Some(last) = ring.pop() {
            ring.insert(1, last);
        }
    }
    rounds
}

/// A double round-robin: the second half is the first half with home and
/// away swapped.
pub fn double_round_robin(teams: &[TeamId]) -> Vec<Vec<Pairing>> {
    let mut rounds = single_round_robin(teams);
    let second_half: Vec<Vec<Pairing>> = rounds
        .iter()
        .map(|round| round.iter().map(|(h, a)| (a.clone(), h.clone())).collect())
        .collect();
    rounds.extend(second_half);
    rounds
}

/// Generate the league fixture list for a competition season and assign the
/// rounds, in order, onto its existing match day slots.
///
/// Drafted fixtures from an earlier scheduling pass are dropped first, so
/// re-scheduling an unplayed season is safe. Fewer match day slots than
/// generated rounds is a configuration error, never a silent truncation.
pub fn schedule_league_season(
    store: &mut WorldStore,
    competition_season_id: &str,
) -> Result<usize> {
    let (competition_id, team_ids) = {
        let cs = store.competition_seasons.get(competition_season_id).ok_or_else(|| {
            EngineError::CompetitionSeasonNotFound(competition_season_id.to_string())
        })?;
        (cs.competition_id.clone(), cs.team_ids.clone())
    };
    let home_and_away = store.competition(&competition_id)?.format.home_and_away;

    let rounds =
        if home_and_away { double_round_robin(&team_ids) } else { single_round_robin(&team_ids) };

    let slot_ids: Vec<MatchDayId> =
        store.match_days_of(competition_season_id).iter().map(|md| md.id.clone()).collect();
    if slot_ids.is_empty() {
        return Err(EngineError::NoMatchDaySlots(competition_season_id.to_string()));
    }
    if slot_ids.len() < rounds.len() {
        return Err(EngineError::InsufficientMatchDays {
            competition_season_id: competition_season_id.to_string(),
            rounds: rounds.len(),
            slots: slot_ids.len(),
        });
    }

    let stale: Vec<MatchId> = store
        .matches
        .values()
        .filter(|m| slot_ids.contains(&m.match_day_id) && !m.is_played())
        .map(|m| m.id.clone())
        .collect();
    for id in &stale {
        store.matches.remove(id);
    }

    let table_id = table::ensure_table(store, competition_season_id)?;

    let mut created = 0;
    for (round, slot_id) in rounds.iter().zip(slot_ids.iter()) {
        for (home, away) in round {
            let id = store.allocate_id("match");
            let mut m = Match::scheduled(
                id,
                competition_id.clone(),
                slot_id.clone(),
                MatchKind::League,
                home.clone(),
                away.clone(),
            );
            m.table_id = Some(table_id.clone());
            store.add_match(m);
            created += 1;
        }
    }

    log::info!(
        "scheduled {} fixtures over {} rounds for competition season {}",
        created,
        rounds.len(),
        competition_season_id
    );
    Ok(created)
}
