//! Fixed-point percentage helpers.
//!
//! Percentages are computed in tenths on integers and only converted to
//! `f64` at the end, so the same day counts always yield the same bits.

/// `numerator / denominator * 100`, rounded half-up to tenths of a percent.
pub fn percent_tenths(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (numerator * 2000 + denominator) / (denominator * 2)
}

/// Percentage with one decimal place, capped at 100.0.
pub fn round_percent(numerator: u64, denominator: u64) -> f64 {
    let tenths = percent_tenths(numerator, denominator).min(1000);
    tenths as f64 / 10.0
}

/// `floor(value * percent / 100)` on integers.
pub fn floor_share(value: u64, percent: u32) -> u64 {
    value * u64::from(percent) / 100
}

pub fn div_ceil(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    numerator.div_ceil(denominator)
}
