use chrono::NaiveDate;
use kira_pdc::adherence::AdherenceError;
use kira_pdc::adherence::calendar::{
    days_left_in_measurement_year, days_to_year_end, in_q4_window, year_end,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn days_to_year_end_counts_days_after_as_of() {
    assert_eq!(days_to_year_end(d(2025, 12, 31)), 0);
    assert_eq!(days_to_year_end(d(2025, 11, 16)), 45);
    assert_eq!(days_to_year_end(d(2024, 1, 1)), 365);
}

#[test]
fn measurement_year_remaining_never_negative() {
    assert_eq!(days_left_in_measurement_year(d(2026, 1, 10), 2025).unwrap(), 0);
    assert_eq!(days_left_in_measurement_year(d(2025, 11, 1), 2025).unwrap(), 60);
}

#[test]
fn q4_window_starts_october_first() {
    assert!(!in_q4_window(d(2025, 9, 30), 2025));
    assert!(in_q4_window(d(2025, 10, 1), 2025));
    assert!(in_q4_window(d(2025, 12, 31), 2025));
    assert!(!in_q4_window(d(2026, 1, 1), 2025));
}

#[test]
fn q4_window_requires_the_measurement_year() {
    assert!(!in_q4_window(d(2026, 11, 1), 2025));
    assert!(!in_q4_window(d(2024, 12, 1), 2025));
    assert_eq!(days_left_in_measurement_year(d(2026, 11, 1), 2025).unwrap(), 0);
}

#[test]
fn out_of_range_year_is_an_error() {
    assert_eq!(year_end(i32::MAX), Err(AdherenceError::InvalidYear(i32::MAX)));
}
