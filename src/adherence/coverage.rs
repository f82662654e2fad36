//! Coverage merging.
//!
//! A single cursor tracks the last covered day. Overlapping fills only add
//! the days they extend past the cursor, so stockpiled supply is never
//! counted twice, and nothing past the period end is ever counted.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::adherence::FillRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoverageInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CoverageInterval {
    pub fn days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Coverage {
    pub covered_days: u32,
    pub intervals: Vec<CoverageInterval>,
}

/// Covered days for fills sorted by date, truncated at `period_end`.
pub fn covered_days(fills: &[FillRecord], period_end: NaiveDate) -> u32 {
    merge_coverage(fills, period_end).covered_days
}

/// Same walk as [`covered_days`], also returning the maximal covered spans.
/// Adjacent spans are joined; the interval lengths sum to `covered_days`.
pub fn merge_coverage(fills: &[FillRecord], period_end: NaiveDate) -> Coverage {
    let mut cursor: Option<NaiveDate> = None;
    let mut covered: u64 = 0;
    let mut intervals: Vec<CoverageInterval> = Vec::new();

    for fill in fills {
        if fill.days_supply == 0 || fill.fill_date > period_end {
            continue;
        }
        let end = fill.last_covered_day().min(period_end);

        match cursor {
            Some(c) if fill.fill_date <= c => {
                let extension = (end - c).num_days();
                if extension > 0 {
                    covered += extension as u64;
                    cursor = Some(end);
                    if let Some(last) = intervals.last_mut() {
                        last.end = end;
                    }
                }
            }
            _ => {
                covered += ((end - fill.fill_date).num_days() + 1) as u64;
                cursor = Some(end);
                let adjacent = intervals
                    .last()
                    .and_then(|last| last.end.checked_add_days(Days::new(1)))
                    .is_some_and(|next| next == fill.fill_date);
                match intervals.last_mut() {
                    Some(last) if adjacent => last.end = end,
                    _ => intervals.push(CoverageInterval {
                        start: fill.fill_date,
                        end,
                    }),
                }
            }
        }
    }

    Coverage {
        covered_days: covered.min(u64::from(u32::MAX)) as u32,
        intervals,
    }
}
