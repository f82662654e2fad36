//! Deterministic adherence engine.
//!
//! Fills flow through normalization, coverage merging, the PDC calculator,
//! the fragility classifier and the priority scorer. Every stage is a pure
//! function of its arguments; the only notion of "today" is the `as_of` date
//! handed in by the caller.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use thiserror::Error;

pub mod calendar;
pub mod coverage;
pub mod fragility;
pub mod normalize;
pub mod pdc;
pub mod priority;

use fragility::{FragilityInput, FragilityResult, classify_fragility};
use priority::{ContextFlags, PriorityScoreResult, score_priority};

/// PDC percentage a measure must reach to count as adherent.
pub const COMPLIANCE_THRESHOLD: f64 = 80.0;
/// Share of the measurement period that may go uncovered, in percent.
pub const GAP_ALLOWANCE_PERCENT: u32 = 20;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdherenceError {
    #[error("invalid argument {name}: {value}")]
    InvalidArgument { name: &'static str, value: i64 },
    #[error("invalid measurement year {0}")]
    InvalidYear(i32),
    #[error("non-finite value for {name}")]
    NonFinite { name: &'static str },
    #[error("{name} out of range: {value} (expected 0..=100)")]
    PercentOutOfRange { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillRecord {
    pub fill_date: NaiveDate,
    pub days_supply: u32,
    pub medication_key: String,
}

impl FillRecord {
    pub fn new(fill_date: NaiveDate, days_supply: u32, medication_key: impl Into<String>) -> Self {
        Self {
            fill_date,
            days_supply,
            medication_key: medication_key.into(),
        }
    }

    /// Last calendar day this fill covers, inclusive.
    pub fn last_covered_day(&self) -> NaiveDate {
        let span = u64::from(self.days_supply.saturating_sub(1));
        self.fill_date
            .checked_add_days(Days::new(span))
            .unwrap_or(NaiveDate::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreatmentPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TreatmentPeriod {
    pub fn length_days(&self) -> u32 {
        let days = (self.end - self.start).num_days() + 1;
        days.clamp(1, i64::from(u32::MAX)) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PdcBasis {
    Measured,
    InsufficientFills { valid_fills: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SupplyContext {
    pub days_to_runout: u32,
    pub current_supply: u32,
    pub refills_needed: u32,
    pub remaining_refills: u32,
    pub is_out_of_meds: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdcResult {
    pub basis: PdcBasis,
    pub period: Option<TreatmentPeriod>,
    pub pdc: f64,
    pub covered_days: u32,
    pub treatment_days: u32,
    pub measurement_days: u32,
    pub days_remaining_in_period: u32,
    pub gap_days_used: u32,
    pub gap_days_allowed: u32,
    pub gap_days_remaining: i64,
    pub pdc_status_quo: f64,
    pub pdc_perfect: f64,
    pub supply: SupplyContext,
}

impl PdcResult {
    pub fn insufficient(valid_fills: usize) -> Self {
        Self {
            basis: PdcBasis::InsufficientFills { valid_fills },
            period: None,
            pdc: 0.0,
            covered_days: 0,
            treatment_days: 0,
            measurement_days: 0,
            days_remaining_in_period: 0,
            gap_days_used: 0,
            gap_days_allowed: 0,
            gap_days_remaining: 0,
            pdc_status_quo: 0.0,
            pdc_perfect: 0.0,
            supply: SupplyContext::default(),
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self.basis, PdcBasis::Measured)
    }
}

pub use pdc::compute_adherence;

/// Runs the fragility classifier and the priority scorer over one PDC result.
///
/// Negative counts and PDC values outside 0..=100 are rejected before any
/// tier is produced.
pub fn classify(
    pdc: &PdcResult,
    remaining_refills: i64,
    days_to_year_end: i64,
    flags: &ContextFlags,
) -> Result<(FragilityResult, PriorityScoreResult), AdherenceError> {
    let remaining_refills = non_negative("remaining_refills", remaining_refills)?;
    let days_to_year_end = non_negative("days_to_year_end", days_to_year_end)?;
    check_percent("pdc_status_quo", pdc.pdc_status_quo)?;
    check_percent("pdc_perfect", pdc.pdc_perfect)?;

    let input = FragilityInput {
        pdc_status_quo: pdc.pdc_status_quo,
        pdc_perfect: pdc.pdc_perfect,
        gap_days_remaining: pdc.gap_days_remaining,
        remaining_refills,
        days_to_year_end,
        is_out_of_meds: flags.is_out_of_meds,
    };
    let fragility = classify_fragility(&input);
    let priority = score_priority(fragility.tier, flags);
    Ok((fragility, priority))
}

pub(crate) fn non_negative(name: &'static str, value: i64) -> Result<u32, AdherenceError> {
    if value < 0 {
        return Err(AdherenceError::InvalidArgument { name, value });
    }
    u32::try_from(value).map_err(|_| AdherenceError::InvalidArgument { name, value })
}

fn check_percent(name: &'static str, value: f64) -> Result<(), AdherenceError> {
    if !value.is_finite() {
        return Err(AdherenceError::NonFinite { name });
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(AdherenceError::PercentOutOfRange { name, value });
    }
    Ok(())
}
