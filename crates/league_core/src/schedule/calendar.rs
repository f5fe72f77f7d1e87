//! Date-anchored calendar projection.
//!
//! A naive "same date next year" shifts the weekday by one (two across a
//! leap day), so recurring rounds would drift through the week over long
//! simulations. Projection instead snaps to the anchor's weekday nearest to
//! the anchor's calendar slot.

use chrono::{Datelike, Duration, NaiveDate};

/// Project a canonical anchor date onto a target year: take the anchor's
/// (month, day) in that year, then shift by the signed weekday difference to
/// the anchor, normalized into [-3, +3]. The result is on the anchor's
/// weekday, at most three days from its calendar slot.
pub fn project_standard_date(standard_date: NaiveDate, target_year: i32) -> NaiveDate {
    // Feb 29 anchors land on Feb 28 in common years.
    let mut day = standard_date.day();
    let projected = loop {
        match NaiveDate::from_ymd_opt(target_year, standard_date.month(), day) {
            Some(d) => break d,
            None => day -= 1,
        }
    };

    let anchor_weekday = standard_date.weekday().num_days_from_monday() as i64;
    let projected_weekday = projected.weekday().num_days_from_monday() as i64;
    let mut offset = anchor_weekday - projected_weekday;
    if offset > 3 {
        offset -= 7;
    } else if offset < -3 {
        offset += 7;
    }

    projected + Duration::days(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_projection_keeps_weekday_and_stays_close() {
        // Saturday 19 July 2025.
        let anchor = NaiveDate::from_ymd_opt(2025, 7, 19).unwrap();
        assert_eq!(anchor.weekday(), Weekday::Sat);

        let projected = project_standard_date(anchor, 2026);
        assert_eq!(projected.weekday(), Weekday::Sat);

        let slot = NaiveDate::from_ymd_opt(2026, 7, 19).unwrap();
        let distance = (projected - slot).num_days().abs();
        assert!(distance <= 3, "drifted {} days", distance);
    }

    #[test]
    fn test_projection_does_not_drift_over_many_years() {
        let anchor = NaiveDate::from_ymd_opt(2025, 7, 19).unwrap();
        for year in 2026..2045 {
            let projected = project_standard_date(anchor, year);
            assert_eq!(projected.weekday(), anchor.weekday());
            let slot = NaiveDate::from_ymd_opt(year, 7, 19).unwrap();
            assert!((projected - slot).num_days().abs() <= 3);
        }
    }

    #[test]
    fn test_projection_to_same_year_is_identity() {
        let anchor = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        assert_eq!(project_standard_date(anchor, 2025), anchor);
    }

    #[test]
    fn test_leap_day_anchor_falls_back_to_feb_28_slot() {
        let anchor = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let projected = project_standard_date(anchor, 2025);
        assert_eq!(projected.weekday(), anchor.weekday());
        let slot = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        assert!((projected - slot).num_days().abs() <= 3);
    }
}
