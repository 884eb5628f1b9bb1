use chrono::{Datelike, NaiveDate, Weekday};
use std::cmp::Ordering;
use weekplan_core::{
    add_weeks, compare_week_ids, current_week_id, date_to_week_id, is_past_week,
    week_id_to_monday, week_label, FixedClock, WeekId,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn week(text: &str) -> WeekId {
    WeekId::parse(text).unwrap()
}

#[test]
fn year_boundary_dates_map_to_iso_week_year() {
    assert_eq!(date_to_week_id(date(2024, 1, 1)).to_string(), "2024-W01");
    // Sunday Jan 1st 2023 still belongs to the last week of ISO year 2022.
    assert_eq!(date_to_week_id(date(2023, 1, 1)).to_string(), "2022-W52");
    // Monday Dec 30th 2024 already belongs to ISO week 1 of 2025.
    assert_eq!(date_to_week_id(date(2024, 12, 30)).to_string(), "2025-W01");
    assert_eq!(date_to_week_id(date(2021, 1, 3)).to_string(), "2020-W53");
}

#[test]
fn monday_of_week_is_inverse_of_date_to_week_id() {
    assert_eq!(week_id_to_monday(week("2024-W01")), date(2024, 1, 1));
    assert_eq!(week_id_to_monday(week("2022-W52")), date(2022, 12, 26));
    assert_eq!(week_id_to_monday(week("2020-W53")), date(2020, 12, 28));
    assert_eq!(week_id_to_monday(week("2025-W01")), date(2024, 12, 30));

    for text in ["2019-W01", "2023-W27", "2026-W53", "2027-W10"] {
        let id = week(text);
        let monday = week_id_to_monday(id);
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(date_to_week_id(monday), id);
    }
}

#[test]
fn add_weeks_round_trips_for_every_week_and_offset() {
    let mut id = week("2019-W40");
    let last = week("2027-W05");
    while id <= last {
        for delta in [-105_i64, -53, -52, -1, 0, 1, 2, 52, 53, 260] {
            assert_eq!(add_weeks(add_weeks(id, delta), -delta), id, "{id} {delta}");
        }
        id = add_weeks(id, 1);
    }
}

#[test]
fn add_weeks_crosses_year_boundaries() {
    assert_eq!(add_weeks(week("2020-W53"), 1), week("2021-W01"));
    assert_eq!(add_weeks(week("2021-W01"), -1), week("2020-W53"));
    assert_eq!(add_weeks(week("2022-W52"), 1), week("2023-W01"));
    assert_eq!(add_weeks(week("2024-W10"), 52), week("2025-W10"));
}

#[test]
fn add_weeks_refuses_to_leave_four_digit_years() {
    let last = week("9999-W52");
    assert_eq!(add_weeks(last, 10), last);
    assert_eq!(add_weeks(last, i64::MAX), last);
}

#[test]
fn compare_week_ids_follows_monday_order_within_a_year() {
    let ids: Vec<WeekId> = (1..=52).map(|n| WeekId::new(2023, n).unwrap()).collect();
    for a in &ids {
        for b in &ids {
            let by_monday = week_id_to_monday(*a).cmp(&week_id_to_monday(*b));
            assert_eq!(compare_week_ids(*a, *b), by_monday, "{a} vs {b}");
        }
    }
}

#[test]
fn compare_week_ids_is_chronological_across_year_boundaries() {
    // The last ISO week of a year sorts before week 1 of the next, including
    // weeks whose Monday falls in the previous calendar year.
    assert_eq!(
        compare_week_ids(week("2020-W53"), week("2021-W01")),
        Ordering::Less
    );
    assert_eq!(
        compare_week_ids(week("2025-W01"), week("2024-W52")),
        Ordering::Greater
    );
    assert_eq!(
        compare_week_ids(
            date_to_week_id(date(2023, 1, 1)),
            date_to_week_id(date(2023, 1, 2))
        ),
        Ordering::Less
    );
    assert_eq!(compare_week_ids(week("2024-W10"), week("2024-W10")), Ordering::Equal);
    assert!(is_past_week(week("2024-W52"), week("2025-W01")));
    assert!(!is_past_week(week("2025-W01"), week("2025-W01")));
}

#[test]
fn week_53_exists_only_in_long_iso_years() {
    assert!(WeekId::new(2020, 53).is_ok());
    assert!(WeekId::new(2026, 53).is_ok());
    assert!(WeekId::new(2021, 53).is_err());
    assert!(WeekId::parse("2021-W53").is_err());
    assert!(WeekId::parse("2024-W00").is_err());
}

#[test]
fn week_label_spans_monday_to_sunday() {
    assert_eq!(week_label(week("2024-W01")), "Jan 1 – Jan 7");
    assert_eq!(week_label(week("2025-W01")), "Dec 30 – Jan 5");
    assert_eq!(week_label(week("2024-W09")), "Feb 26 – Mar 3");
}

#[test]
fn week_id_serializes_as_plain_string() {
    let id = week("2024-W05");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"2024-W05\"");
    let parsed: WeekId = serde_json::from_str("\"2024-W05\"").unwrap();
    assert_eq!(parsed, id);
    assert!(serde_json::from_str::<WeekId>("\"2024-5\"").is_err());
}

#[test]
fn current_week_id_follows_the_clock() {
    let clock = FixedClock::at_date(date(2024, 12, 31));
    assert_eq!(current_week_id(&clock), week("2025-W01"));

    clock.advance(chrono::TimeDelta::days(-2));
    assert_eq!(current_week_id(&clock), week("2024-W52"));
}
