use chrono::NaiveDate;

use crate::adherence::calendar::{year_end, year_start};
use crate::adherence::coverage::covered_days;
use crate::adherence::normalize::normalize_fills;
use crate::adherence::{
    AdherenceError, FillRecord, GAP_ALLOWANCE_PERCENT, PdcBasis, PdcResult, SupplyContext,
    TreatmentPeriod, non_negative,
};
use crate::math::percent::{div_ceil, floor_share, round_percent};

const MIN_FILLS: usize = 2;

/// PDC for one patient and one medication key within `measurement_year`.
///
/// Only fills dated inside the measurement year and not after `as_of` are
/// considered. The treatment period runs from the first of them to
/// `min(as_of, Dec 31)`. Projections and the gap allowance use the full
/// horizon through Dec 31, which equals the treatment period once the year
/// is over.
pub fn compute_adherence(
    fills: &[FillRecord],
    measurement_year: i32,
    as_of: NaiveDate,
    current_supply_on_hand: i64,
    remaining_refills: i64,
) -> Result<PdcResult, AdherenceError> {
    let current_supply = non_negative("current_supply_on_hand", current_supply_on_hand)?;
    let remaining_refills = non_negative("remaining_refills", remaining_refills)?;
    let first_day = year_start(measurement_year)?;
    let last_day = year_end(measurement_year)?;
    let period_end = as_of.min(last_day);

    let scoped: Vec<FillRecord> = normalize_fills(fills)
        .into_iter()
        .filter(|f| f.fill_date >= first_day && f.fill_date <= period_end)
        .collect();

    let (first, last) = match (scoped.first(), scoped.last()) {
        (Some(first), Some(last)) if scoped.len() >= MIN_FILLS => (first, last),
        _ => return Ok(PdcResult::insufficient(scoped.len())),
    };

    let period = TreatmentPeriod {
        start: first.fill_date,
        end: period_end,
    };
    let treatment_days = period.length_days();
    let covered = covered_days(&scoped, period.end).min(treatment_days);
    let days_remaining = (last_day - period.end).num_days().max(0) as u32;
    let measurement_days = treatment_days + days_remaining;

    let covered64 = u64::from(covered);
    let horizon = u64::from(measurement_days);
    let supply_used = u64::from(current_supply.min(days_remaining));

    let pdc = round_percent(covered64, u64::from(treatment_days));
    let pdc_status_quo = round_percent(covered64 + supply_used, horizon);
    let pdc_perfect = round_percent(covered64 + u64::from(days_remaining), horizon);

    let gap_days_used = treatment_days - covered;
    let gap_days_allowed = floor_share(horizon, GAP_ALLOWANCE_PERCENT) as u32;
    let gap_days_remaining = i64::from(gap_days_allowed) - i64::from(gap_days_used);

    let runout = (last.fill_date - as_of).num_days() + i64::from(last.days_supply);
    let uncovered_ahead = u64::from(days_remaining.saturating_sub(current_supply));
    let refills_needed = div_ceil(uncovered_ahead, u64::from(last.days_supply)) as u32;

    Ok(PdcResult {
        basis: PdcBasis::Measured,
        period: Some(period),
        pdc,
        covered_days: covered,
        treatment_days,
        measurement_days,
        days_remaining_in_period: days_remaining,
        gap_days_used,
        gap_days_allowed,
        gap_days_remaining,
        pdc_status_quo,
        pdc_perfect,
        supply: SupplyContext {
            days_to_runout: runout.clamp(0, i64::from(u32::MAX)) as u32,
            current_supply,
            refills_needed,
            remaining_refills,
            is_out_of_meds: runout <= 0,
        },
    })
}
