use chrono::{Datelike, NaiveDate};

use crate::adherence::AdherenceError;

const Q4_FIRST_MONTH: u32 = 10;

pub fn year_start(year: i32) -> Result<NaiveDate, AdherenceError> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or(AdherenceError::InvalidYear(year))
}

pub fn year_end(year: i32) -> Result<NaiveDate, AdherenceError> {
    NaiveDate::from_ymd_opt(year, 12, 31).ok_or(AdherenceError::InvalidYear(year))
}

/// Days left after `as_of` until December 31 of its own year; 0 on Dec 31.
pub fn days_to_year_end(as_of: NaiveDate) -> i64 {
    match NaiveDate::from_ymd_opt(as_of.year(), 12, 31) {
        Some(end) => (end - as_of).num_days(),
        None => 0,
    }
}

/// Days left after `as_of` until the end of `measurement_year`, never negative.
pub fn days_left_in_measurement_year(
    as_of: NaiveDate,
    measurement_year: i32,
) -> Result<i64, AdherenceError> {
    let end = year_end(measurement_year)?;
    Ok((end - as_of).num_days().max(0))
}

/// True from October 1 through December 31 of `measurement_year`.
pub fn in_q4_window(as_of: NaiveDate, measurement_year: i32) -> bool {
    as_of.year() == measurement_year && as_of.month() >= Q4_FIRST_MONTH
}
