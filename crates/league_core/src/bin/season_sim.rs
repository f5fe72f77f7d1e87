//! Runnable end-to-end check: seed a small two-division world with a cup,
//! simulate three full seasons day by day, and print standings and rollover
//! summaries.
//!
//! Usage: `season_sim [seed]` (defaults to 2025). Same seed, same output.

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

use league_core::knockout::played_match_winner;
use league_core::{
    draw_round, schedule_league_season, table, Club, Competition, CompetitionFormat,
    CompetitionKind, CompetitionScope, CompetitionSeason, Country, LegFormat, MatchDay, MatchKind,
    MatchSimulator, PointRules, PositionSlot, RoundConfig, RoundEntry, Season,
    SeasonLifecycleCoordinator, SeasonStatus, SlotKind, Stadium, Stage, StageKind, TieBreaker,
    WorldStore,
};

const PREMIER: &str = "league-premier";
const SECOND: &str = "league-second";
const CUP: &str = "cup-national";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let seed: u64 = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(2025);
    println!("season_sim starting with seed {}", seed);

    let mut store = WorldStore::new();
    seed_world(&mut store);

    for season_index in 0..3u64 {
        let label = store.open_season()?.label.clone();
        println!("\n=== Season {} ===", label);

        play_season(&mut store, seed + season_index)?;

        print_standings(&store, PREMIER)?;
        print_standings(&store, SECOND)?;
        print_cup_winner(&store)?;

        let summary = SeasonLifecycleCoordinator::roll_season(&mut store)?;
        println!(
            "rollover: {} promoted, {} relegated, {} competitions archived, next cycle year {}",
            summary.promotions,
            summary.relegations,
            summary.archived_competitions,
            summary.cycle_year
        );
    }

    println!(
        "\ndone: {} competition podiums, {} team season records archived, {} store flushes",
        store.competition_history.len(),
        store.team_histories.len(),
        store.flush_count
    );
    Ok(())
}

/// Schedule the league fixtures, then walk every match day of the running
/// competition seasons in date order, drawing cup rounds as their slots come
/// up.
fn play_season(store: &mut WorldStore, seed: u64) -> Result<(), Box<dyn std::error::Error>> {
    let mut sim = MatchSimulator::new(seed);
    let mut draw_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_mul(31));

    for league in [PREMIER, SECOND] {
        let cs_id = store.current_competition_season(league)?.id.clone();
        let fixtures = schedule_league_season(store, &cs_id)?;
        println!("{}: {} fixtures scheduled", league, fixtures);
    }

    let mut days: Vec<(NaiveDate, String)> = Vec::new();
    for comp in [PREMIER, SECOND, CUP] {
        let cs_id = store.current_competition_season(comp)?.id.clone();
        for day in store.match_days_of(&cs_id) {
            days.push((day.date, day.id.clone()));
        }
    }
    days.sort();

    for (_, day_id) in days {
        for round in cup_rounds(store)? {
            if round.match_day_ids.first() == Some(&day_id)
                && store.matches_of_day(&day_id).is_empty()
            {
                draw_round(store, &mut draw_rng, CUP, &round)?;
            }
        }

        let report = sim.simulate_match_day(store, &day_id)?;
        for failure in &report.failures {
            println!("!! match {} not played: {}", failure.match_id, failure.error);
        }
    }
    Ok(())
}

/// The cup's round plan for the current season, expressed against its
/// recycled match day slots: quarter finals, two-legged semi finals, final.
fn cup_rounds(store: &WorldStore) -> league_core::Result<Vec<RoundConfig>> {
    let cs = store.current_competition_season(CUP)?;
    let slots: Vec<String> = store.match_days_of(&cs.id).iter().map(|d| d.id.clone()).collect();
    Ok(vec![
        RoundConfig {
            name: "quarter final".to_string(),
            legs: LegFormat::SingleLeg,
            match_day_ids: vec![slots[0].clone()],
            entry: RoundEntry::Competitions(vec![PREMIER.to_string(), SECOND.to_string()]),
        },
        RoundConfig {
            name: "semi final".to_string(),
            legs: LegFormat::TwoLegs,
            match_day_ids: vec![slots[1].clone(), slots[2].clone()],
            entry: RoundEntry::PreviousRound { match_day_ids: vec![slots[0].clone()] },
        },
        RoundConfig {
            name: "final".to_string(),
            legs: LegFormat::SingleLeg,
            match_day_ids: vec![slots[3].clone()],
            entry: RoundEntry::PreviousRound { match_day_ids: vec![slots[2].clone()] },
        },
    ])
}

fn print_standings(store: &WorldStore, competition_id: &str) -> league_core::Result<()> {
    let comp = store.competition(competition_id)?;
    let cs = store.current_competition_season(competition_id)?;
    let table_id = format!("tbl-{}", cs.id);

    println!("\n{}", comp.name);
    println!("{:<4}{:<12}{:>3}{:>3}{:>3}{:>3}{:>4}{:>4}{:>5}", "Pos", "Club", "P", "W", "D", "L", "GF", "GA", "Pts");
    for (i, row) in table::standings(store, &table_id).iter().enumerate() {
        let name = store.club(&row.team_id).map(|c| c.name.clone()).unwrap_or_else(|_| row.team_id.clone());
        println!(
            "{:<4}{:<12}{:>3}{:>3}{:>3}{:>3}{:>4}{:>4}{:>5}",
            i + 1,
            name,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goals_for,
            row.goals_against,
            row.points
        );
    }
    Ok(())
}

fn print_cup_winner(store: &WorldStore) -> league_core::Result<()> {
    let cs = store.current_competition_season(CUP)?;
    let days = store.match_days_of(&cs.id);
    let Some(final_day) = days.last() else {
        return Ok(());
    };
    let final_match = store
        .matches_of_day(&final_day.id)
        .into_iter()
        .find(|m| m.kind == MatchKind::KnockoutSingle && m.is_played());
    if let Some(m) = final_match {
        let winner = played_match_winner(store, m)?;
        let name = store.club(&winner).map(|c| c.name.clone()).unwrap_or(winner);
        println!("\nCup winner: {}", name);
    }
    Ok(())
}

fn league(id: &str, name: &str, slots: BTreeMap<u32, PositionSlot>) -> Competition {
    Competition {
        id: id.to_string(),
        name: name.to_string(),
        kind: CompetitionKind::League,
        scope: CompetitionScope::Domestic,
        country_id: Some("country-1".to_string()),
        format: CompetitionFormat {
            team_count: 4,
            home_and_away: true,
            points: PointRules::default(),
            tie_breakers: vec![TieBreaker::GoalDifference, TieBreaker::GoalsFor, TieBreaker::HeadToHead],
        },
        position_slots: slots,
        active_cycle_years: vec![1, 2, 3, 4],
    }
}

fn seed_world(store: &mut WorldStore) {
    store.add_country(Country {
        id: "country-1".to_string(),
        name: "Testland".to_string(),
        followed: true,
    });

    let mut premier_slots = BTreeMap::new();
    premier_slots.insert(
        1,
        PositionSlot { kind: SlotKind::Champion, target_competition_id: None, label: "Champions".to_string() },
    );
    premier_slots.insert(
        4,
        PositionSlot {
            kind: SlotKind::Relegation,
            target_competition_id: Some(SECOND.to_string()),
            label: "Relegated".to_string(),
        },
    );
    store.add_competition(league(PREMIER, "Premier Division", premier_slots));

    let mut second_slots = BTreeMap::new();
    second_slots.insert(
        1,
        PositionSlot {
            kind: SlotKind::Promotion,
            target_competition_id: Some(PREMIER.to_string()),
            label: "Promoted".to_string(),
        },
    );
    store.add_competition(league(SECOND, "Second Division", second_slots));

    store.add_competition(Competition {
        id: CUP.to_string(),
        name: "National Cup".to_string(),
        kind: CompetitionKind::Cup,
        scope: CompetitionScope::Domestic,
        country_id: Some("country-1".to_string()),
        format: CompetitionFormat {
            team_count: 8,
            home_and_away: false,
            points: PointRules::default(),
            tie_breakers: vec![],
        },
        position_slots: BTreeMap::new(),
        active_cycle_years: vec![1, 2, 3, 4],
    });

    for (comp_id, stage_id, kind) in [
        (PREMIER, "stage-premier", StageKind::League),
        (SECOND, "stage-second", StageKind::League),
        (CUP, "stage-cup", StageKind::Knockout),
    ] {
        store.add_stage(Stage {
            id: stage_id.to_string(),
            competition_id: comp_id.to_string(),
            name: match kind {
                StageKind::Knockout => "Knockout".to_string(),
                _ => "Regular season".to_string(),
            },
            kind,
            points: PointRules::default(),
            tie_breakers: vec![TieBreaker::GoalDifference, TieBreaker::GoalsFor],
            next_stage_id: None,
        });
    }

    let clubs = [
        ("club-albion", "Albion", PREMIER),
        ("club-borough", "Borough", PREMIER),
        ("club-city", "City", PREMIER),
        ("club-dynamo", "Dynamo", PREMIER),
        ("club-eagles", "Eagles", SECOND),
        ("club-forest", "Forest", SECOND),
        ("club-grove", "Grove", SECOND),
        ("club-harbor", "Harbor", SECOND),
    ];
    for (id, name, league_id) in clubs {
        store.add_club(Club {
            id: id.to_string(),
            name: name.to_string(),
            country_id: "country-1".to_string(),
            stadium_id: Some(format!("stadium-{}", id)),
            league_id: league_id.to_string(),
        });
        store.add_stadium(Stadium {
            id: format!("stadium-{}", id),
            name: format!("{} Park", name),
            club_id: id.to_string(),
        });
    }

    store.add_season(Season {
        id: "season-2025".to_string(),
        label: "2025/26".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 8, 1).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2026, 5, 30).expect("valid date"),
        status: SeasonStatus::Open,
    });

    for (cs_id, comp_id, stage_id, members) in [
        ("cs-premier", PREMIER, "stage-premier", vec!["club-albion", "club-borough", "club-city", "club-dynamo"]),
        ("cs-second", SECOND, "stage-second", vec!["club-eagles", "club-forest", "club-grove", "club-harbor"]),
    ] {
        store.add_competition_season(CompetitionSeason {
            id: cs_id.to_string(),
            competition_id: comp_id.to_string(),
            season_id: "season-2025".to_string(),
            team_ids: members.iter().map(|m| m.to_string()).collect(),
            current_stage_id: Some(stage_id.to_string()),
            status: SeasonStatus::Open,
        });
        // Six Saturday rounds from early August. The second division plays
        // Sundays.
        let day_shift = if comp_id == SECOND { 1 } else { 0 };
        for index in 0..6u32 {
            let date = NaiveDate::from_ymd_opt(2025, 8, 9)
                .expect("valid date")
                .checked_add_days(chrono::Days::new((7 * index + day_shift) as u64))
                .expect("in range");
            store.add_match_day(MatchDay {
                id: format!("{}-md-{}", cs_id, index),
                competition_season_id: cs_id.to_string(),
                index,
                date,
                standard_date: date,
                finished: false,
            });
        }
    }

    store.add_competition_season(CompetitionSeason {
        id: "cs-cup".to_string(),
        competition_id: CUP.to_string(),
        season_id: "season-2025".to_string(),
        team_ids: clubs.iter().map(|(id, _, _)| id.to_string()).collect(),
        current_stage_id: Some("stage-cup".to_string()),
        status: SeasonStatus::Open,
    });
    // Quarter finals, two-legged semis, and a spring final.
    let cup_dates = [(2025, 10, 1), (2025, 10, 22), (2025, 11, 5), (2026, 5, 16)];
    for (index, (y, m, d)) in cup_dates.into_iter().enumerate() {
        let date = NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
        store.add_match_day(MatchDay {
            id: format!("cs-cup-md-{}", index),
            competition_season_id: "cs-cup".to_string(),
            index: index as u32,
            date,
            standard_date: date,
            finished: false,
        });
    }

    store.add_calendar_event(league_core::CalendarEvent {
        id: "event-season-opener".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 8, 9).expect("valid date"),
        label: "Season opener".to_string(),
        competition_id: Some(PREMIER.to_string()),
        unread: true,
    });
}
