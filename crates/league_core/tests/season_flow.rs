//! Full multi-season flow: schedule, draw, simulate, roll over, repeat.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

use league_core::{
    draw_round, schedule_league_season, table, Club, Competition, CompetitionFormat,
    CompetitionKind, CompetitionScope, CompetitionSeason, Country, LegFormat, MatchDay,
    MatchSimulator, PointRules, PositionSlot, RoundConfig, RoundEntry, Season,
    SeasonLifecycleCoordinator, SeasonStatus, SlotKind, TieBreaker, WorldStore,
};

const PREMIER: &str = "league-premier";
const SECOND: &str = "league-second";
const CUP: &str = "cup-national";

fn league(id: &str, name: &str, slots: BTreeMap<u32, PositionSlot>) -> Competition {
    Competition {
        id: id.to_string(),
        name: name.to_string(),
        kind: CompetitionKind::League,
        scope: CompetitionScope::Domestic,
        country_id: Some("country-1".to_string()),
        format: CompetitionFormat {
            team_count: 2,
            home_and_away: true,
            points: PointRules::default(),
            tie_breakers: vec![TieBreaker::GoalDifference, TieBreaker::GoalsFor],
        },
        position_slots: slots,
        active_cycle_years: vec![1, 2, 3, 4],
    }
}

fn build_world() -> WorldStore {
    let mut store = WorldStore::new();
    store.add_country(Country {
        id: "country-1".to_string(),
        name: "Testland".to_string(),
        followed: true,
    });

    let mut premier_slots = BTreeMap::new();
    premier_slots.insert(
        2,
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
            team_count: 4,
            home_and_away: false,
            points: PointRules::default(),
            tie_breakers: vec![],
        },
        position_slots: BTreeMap::new(),
        active_cycle_years: vec![1, 2, 3, 4],
    });

    for (club, league_id) in [
        ("club-alpha", PREMIER),
        ("club-beta", PREMIER),
        ("club-gamma", SECOND),
        ("club-delta", SECOND),
    ] {
        store.add_club(Club {
            id: club.to_string(),
            name: club.to_string(),
            country_id: "country-1".to_string(),
            stadium_id: None,
            league_id: league_id.to_string(),
        });
    }

    store.add_season(Season {
        id: "season-2025".to_string(),
        label: "2025/26".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 5, 30).unwrap(),
        status: SeasonStatus::Open,
    });

    for (cs_id, comp_id, members, day_shift) in [
        ("cs-premier", PREMIER, vec!["club-alpha", "club-beta"], 0u64),
        ("cs-second", SECOND, vec!["club-gamma", "club-delta"], 1),
    ] {
        store.add_competition_season(CompetitionSeason {
            id: cs_id.to_string(),
            competition_id: comp_id.to_string(),
            season_id: "season-2025".to_string(),
            team_ids: members.iter().map(|m| m.to_string()).collect(),
            current_stage_id: None,
            status: SeasonStatus::Open,
        });
        for index in 0..2u32 {
            let date = NaiveDate::from_ymd_opt(2025, 8, 9)
                .unwrap()
                .checked_add_days(chrono::Days::new(7 * index as u64 + day_shift))
                .unwrap();
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
        team_ids: vec![
            "club-alpha".to_string(),
            "club-beta".to_string(),
            "club-gamma".to_string(),
            "club-delta".to_string(),
        ],
        current_stage_id: None,
        status: SeasonStatus::Open,
    });
    let cup_dates = [(2025, 9, 3), (2025, 9, 17), (2026, 5, 16)];
    for (index, (y, m, d)) in cup_dates.into_iter().enumerate() {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        store.add_match_day(MatchDay {
            id: format!("cs-cup-md-{}", index),
            competition_season_id: "cs-cup".to_string(),
            index: index as u32,
            date,
            standard_date: date,
            finished: false,
        });
    }

    store
}

/// Two-legged semi finals off both league rosters, then a single-leg final.
fn cup_rounds(store: &WorldStore) -> Vec<RoundConfig> {
    let cs = store.current_competition_season(CUP).unwrap();
    let slots: Vec<String> = store.match_days_of(&cs.id).iter().map(|d| d.id.clone()).collect();
    vec![
        RoundConfig {
            name: "semi final".to_string(),
            legs: LegFormat::TwoLegs,
            match_day_ids: vec![slots[0].clone(), slots[1].clone()],
            entry: RoundEntry::Competitions(vec![PREMIER.to_string(), SECOND.to_string()]),
        },
        RoundConfig {
            name: "final".to_string(),
            legs: LegFormat::SingleLeg,
            match_day_ids: vec![slots[2].clone()],
            entry: RoundEntry::PreviousRound { match_day_ids: vec![slots[1].clone()] },
        },
    ]
}

fn play_season(store: &mut WorldStore, seed: u64) {
    let mut sim = MatchSimulator::new(seed);
    let mut draw_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_mul(31));

    for comp in [PREMIER, SECOND] {
        let cs_id = store.current_competition_season(comp).unwrap().id.clone();
        schedule_league_season(store, &cs_id).unwrap();
    }

    let mut days: Vec<(NaiveDate, String)> = Vec::new();
    for comp in [PREMIER, SECOND, CUP] {
        let cs_id = store.current_competition_season(comp).unwrap().id.clone();
        for day in store.match_days_of(&cs_id) {
            days.push((day.date, day.id.clone()));
        }
    }
    days.sort();

    for (_, day_id) in days {
        for round in cup_rounds(store) {
            if round.match_day_ids.first() == Some(&day_id)
                && store.matches_of_day(&day_id).is_empty()
            {
                draw_round(store, &mut draw_rng, CUP, &round).unwrap();
            }
        }
        let report = sim.simulate_match_day(store, &day_id).unwrap();
        assert!(report.failures.is_empty(), "failures: {:?}", report.failures);
    }
}

fn run_seasons(seasons: u64, seed: u64) -> WorldStore {
    let mut store = build_world();
    for season_index in 0..seasons {
        play_season(&mut store, seed + season_index);
        SeasonLifecycleCoordinator::roll_season(&mut store).unwrap();
    }
    store
}

#[test]
fn test_one_season_plays_out_completely() {
    let mut store = build_world();
    play_season(&mut store, 42);

    for day in store.match_days.values() {
        assert!(day.finished, "match day {} still open", day.id);
    }

    let cs = store.current_competition_season(PREMIER).unwrap();
    let rows = table::standings(&store, &format!("tbl-{}", cs.id));
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row.played, 2);
        assert_eq!(row.played, row.won + row.drawn + row.lost);
        assert!(row.position > 0);
    }
}

#[test]
fn test_relegated_team_joins_target_roster() {
    let mut store = build_world();
    play_season(&mut store, 42);

    let cs = store.current_competition_season(PREMIER).unwrap();
    let rows = table::standings(&store, &format!("tbl-{}", cs.id));
    let relegated = rows[1].team_id.clone();
    let second_cs = store.current_competition_season(SECOND).unwrap();
    let second_rows = table::standings(&store, &format!("tbl-{}", second_cs.id));
    let promoted = second_rows[0].team_id.clone();

    SeasonLifecycleCoordinator::roll_season(&mut store).unwrap();

    assert_eq!(store.club(&relegated).unwrap().league_id, SECOND);
    assert_eq!(store.club(&promoted).unwrap().league_id, PREMIER);
    assert!(store.current_competition_season(SECOND).unwrap().contains_team(&relegated));
    assert!(store.current_competition_season(PREMIER).unwrap().contains_team(&promoted));
}

#[test]
fn test_recycled_match_days_keep_their_weekday() {
    let store = run_seasons(1, 42);

    let cs = store.current_competition_season(PREMIER).unwrap();
    let days = store.match_days_of(&cs.id);
    assert_eq!(days.len(), 2);
    for day in days {
        assert_eq!(day.date.year(), 2026);
        assert_eq!(day.date.weekday(), Weekday::Sat);
        assert_eq!(day.standard_date.year(), 2025, "anchor stays canonical");
        assert!(store.matches_of_day(&day.id).is_empty(), "fixtures await rescheduling");
    }
}

#[test]
fn test_next_season_plays_on_recycled_days() {
    let mut store = run_seasons(1, 42);
    play_season(&mut store, 43);

    let cs = store.current_competition_season(PREMIER).unwrap();
    let rows = table::standings(&store, &format!("tbl-{}", cs.id));
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.played == 2));
}

#[test]
fn test_one_history_record_per_team_per_season() {
    let store = run_seasons(2, 42);

    assert_eq!(store.team_histories.len(), 8);
    for club in ["club-alpha", "club-beta", "club-gamma", "club-delta"] {
        let records: Vec<_> =
            store.team_histories.iter().filter(|h| h.team_id == club).collect();
        assert_eq!(records.len(), 2, "{} should have one record per season", club);
        for record in records {
            // League placing plus cup participation.
            assert_eq!(record.performances.len(), 2);
        }
    }
    assert_eq!(store.competition_history.len(), 6);
}

#[test]
fn test_whole_world_is_reproducible_under_one_seed() {
    let a = serde_json::to_string(&run_seasons(2, 7)).unwrap();
    let b = serde_json::to_string(&run_seasons(2, 7)).unwrap();
    assert_eq!(a, b);
}
