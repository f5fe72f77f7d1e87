//! Knockout draws and tie resolution.
//!
//! Round behavior (leg count, entry source, target match days) is explicit
//! configuration passed as data; nothing is inferred from round naming
//! conventions. Every "who won" question in the crate funnels through
//! [`resolve_winner`].

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{EngineError, Result};
use crate::models::{
    CompetitionId, Match, MatchDayId, MatchId, MatchKind, Score, TeamId,
};
use crate::store::WorldStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegFormat {
    SingleLeg,
    TwoLegs,
}

/// Where a round's entrants come from.
#[derive(Debug, Clone)]
pub enum RoundEntry {
    /// Union of the current-season rosters of these competitions (opening
    /// round).
    Competitions(Vec<CompetitionId>),
    /// Unique winners of the played matches on these match days (every later
    /// round).
    PreviousRound { match_day_ids: Vec<MatchDayId> },
}

/// Explicit configuration for one knockout round.
#[derive(Debug, Clone)]
pub struct RoundConfig {
    pub name: String,
    pub legs: LegFormat,
    /// Target slots: one match day for a single-leg round, two for a
    /// two-legged one.
    pub match_day_ids: Vec<MatchDayId>,
    pub entry: RoundEntry,
}

/// Result of a draw attempt. An empty qualification pool is a normal
/// "come back later" outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn { created: Vec<MatchId> },
    NothingToDo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinnerVerdict {
    Home,
    Away,
    Tie,
}

/// Decide a knockout participant from the numbers alone.
///
/// `score` is this match's full-time score. `aggregate` carries goals from
/// the other leg attributed to this match's home/away sides. `penalties` is
/// consulted only when goals (and aggregate) are level; without it a level
/// tie is reported as [`WinnerVerdict::Tie`] for the caller to settle.
pub fn resolve_winner(
    score: Score,
    aggregate: Option<Score>,
    penalties: Option<Score>,
) -> WinnerVerdict {
    let home_total = score.home as u32 + aggregate.map_or(0, |s| s.home as u32);
    let away_total = score.away as u32 + aggregate.map_or(0, |s| s.away as u32);
    match home_total.cmp(&away_total) {
        std::cmp::Ordering::Greater => WinnerVerdict::Home,
        std::cmp::Ordering::Less => WinnerVerdict::Away,
        std::cmp::Ordering::Equal => match penalties {
            Some(p) => match p.home.cmp(&p.away) {
                std::cmp::Ordering::Greater => WinnerVerdict::Home,
                std::cmp::Ordering::Less => WinnerVerdict::Away,
                std::cmp::Ordering::Equal => WinnerVerdict::Tie,
            },
            None => WinnerVerdict::Tie,
        },
    }
}

/// First-leg goals re-attributed to the second leg's home/away frame.
///
/// Validates the leg invariants: the reference must exist, be played, and
/// hold the mirrored pairing.
pub fn aggregate_for_second_leg(store: &WorldStore, second_leg: &Match) -> Result<Score> {
    let first_leg_id = second_leg.first_leg_id.as_deref().ok_or_else(|| {
        EngineError::MissingFirstLeg { match_id: second_leg.id.clone() }
    })?;
    let first_leg = store.fixture(first_leg_id)?;

    if !first_leg.is_played() {
        return Err(EngineError::FirstLegNotPlayed {
            match_id: second_leg.id.clone(),
            first_leg_id: first_leg_id.to_string(),
        });
    }
    let mirrored = first_leg.home_team_id == second_leg.away_team_id
        && first_leg.away_team_id == second_leg.home_team_id;
    if !mirrored {
        return Err(EngineError::LegsNotMirrored {
            match_id: second_leg.id.clone(),
            first_leg_id: first_leg_id.to_string(),
        });
    }
    let first_score = first_leg.score.ok_or_else(|| {
        EngineError::FirstLegNotPlayed {
            match_id: second_leg.id.clone(),
            first_leg_id: first_leg_id.to_string(),
        }
    })?;

    // The second leg's home side was away in the first leg.
    Ok(Score::new(first_score.away, first_score.home))
}

/// Winner of an already played knockout match, by team id. Reaching a level
/// tie here means the record was persisted without a penalty decision, which
/// is an invariant violation.
pub fn played_match_winner(store: &WorldStore, m: &Match) -> Result<TeamId> {
    let (home_id, away_id) = m.resolved_teams()?;
    let score = m.score.ok_or_else(|| EngineError::UndecidedTie(m.id.clone()))?;
    let aggregate = match m.kind {
        MatchKind::SecondLeg => Some(aggregate_for_second_leg(store, m)?),
        _ => None,
    };
    match resolve_winner(score, aggregate, m.penalty_score) {
        WinnerVerdict::Home => Ok(home_id.clone()),
        WinnerVerdict::Away => Ok(away_id.clone()),
        WinnerVerdict::Tie => Err(EngineError::UndecidedTie(m.id.clone())),
    }
}

/// The teams entering a round. Empty means the round cannot be drawn yet.
fn qualification_pool(store: &WorldStore, entry: &RoundEntry) -> Result<Vec<TeamId>> {
    match entry {
        RoundEntry::Competitions(competition_ids) => {
            let mut pool = Vec::new();
            for competition_id in competition_ids {
                let cs = store.current_competition_season(competition_id)?;
                for team_id in &cs.team_ids {
                    if !pool.contains(team_id) {
                        pool.push(team_id.clone());
                    }
                }
            }
            Ok(pool)
        }
        RoundEntry::PreviousRound { match_day_ids } => {
            let mut winners = Vec::new();
            for match_day_id in match_day_ids {
                store.match_day(match_day_id)?;
                let day_matches = store.matches_of_day(match_day_id);
                if day_matches.is_empty() || day_matches.iter().any(|m| !m.is_played()) {
                    return Ok(Vec::new());
                }
                for m in day_matches {
                    if matches!(m.kind, MatchKind::KnockoutSingle | MatchKind::SecondLeg) {
                        let winner = played_match_winner(store, m)?;
                        if !winners.contains(&winner) {
                            winners.push(winner);
                        }
                    }
                }
            }
            Ok(winners)
        }
    }
}

/// Draw one knockout round: shuffle the qualified pool, pair consecutive
/// teams, and persist the pairings as match records on the round's slots.
///
/// Re-drawing is supported: drafted (not yet played) matches on the round's
/// match days are deleted before the new draw is inserted.
pub fn draw_round<R: Rng>(
    store: &mut WorldStore,
    rng: &mut R,
    competition_id: &str,
    round: &RoundConfig,
) -> Result<DrawOutcome> {
    store.competition(competition_id)?;

    let expected_slots = match round.legs {
        LegFormat::SingleLeg => 1,
        LegFormat::TwoLegs => 2,
    };
    if round.match_day_ids.len() != expected_slots {
        return Err(EngineError::RoundSlotMismatch {
            round: round.name.clone(),
            expected: expected_slots,
            found: round.match_day_ids.len(),
        });
    }
    for match_day_id in &round.match_day_ids {
        store.match_day(match_day_id)?;
    }

    let mut pool = qualification_pool(store, &round.entry)?;
    if pool.is_empty() {
        log::info!("round {}: no qualified teams yet, nothing to draw", round.name);
        return Ok(DrawOutcome::NothingToDo);
    }
    if pool.len() % 2 == 1 {
        return Err(EngineError::OddDrawPool { round: round.name.clone(), size: pool.len() });
    }

    let stale: Vec<MatchId> = store
        .matches
        .values()
        .filter(|m| round.match_day_ids.contains(&m.match_day_id) && !m.is_played())
        .map(|m| m.id.clone())
        .collect();
    if !stale.is_empty() {
        log::debug!("round {}: discarding {} drafted matches before re-draw", round.name, stale.len());
        for id in &stale {
            store.matches.remove(id);
        }
    }

    pool.shuffle(rng);

    let mut created = Vec::new();
    for pair in pool.chunks(2) {
        let (first, second) = (pair[0].clone(), pair[1].clone());
        match round.legs {
            LegFormat::SingleLeg => {
                let id = store.allocate_id("match");
                created.push(id.clone());
                store.add_match(Match::scheduled(
                    id,
                    competition_id.to_string(),
                    round.match_day_ids[0].clone(),
                    MatchKind::KnockoutSingle,
                    first,
                    second,
                ));
            }
            LegFormat::TwoLegs => {
                let first_leg_id = store.allocate_id("match");
                created.push(first_leg_id.clone());
                store.add_match(Match::scheduled(
                    first_leg_id.clone(),
                    competition_id.to_string(),
                    round.match_day_ids[0].clone(),
                    MatchKind::FirstLeg,
                    first.clone(),
                    second.clone(),
                ));

                let second_leg_id = store.allocate_id("match");
                created.push(second_leg_id.clone());
                let mut second_leg = Match::scheduled(
                    second_leg_id,
                    competition_id.to_string(),
                    round.match_day_ids[1].clone(),
                    MatchKind::SecondLeg,
                    second,
                    first,
                );
                second_leg.first_leg_id = Some(first_leg_id);
                store.add_match(second_leg);
            }
        }
    }

    log::info!("round {}: drew {} pairings", round.name, pool.len() / 2);
    Ok(DrawOutcome::Drawn { created })
}
