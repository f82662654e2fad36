//! Fragility tiers.
//!
//! Classification walks [`EVALUATION_ORDER`] and stops at the first rule that
//! fires. The order is part of the contract: a patient on track to comply is
//! never reported as urgent, however small their remaining slack.

use serde::Serialize;

use crate::adherence::COMPLIANCE_THRESHOLD;

/// Upper bounds (inclusive) on the delay budget per refill for each tier.
pub const DELAY_BUDGET_TIERS: [(f64, FragilityTier); 4] = [
    (2.0, FragilityTier::F1Imminent),
    (5.0, FragilityTier::F2Fragile),
    (10.0, FragilityTier::F3Moderate),
    (20.0, FragilityTier::F4Comfortable),
];

pub const Q4_TIGHTENING_DAYS: u32 = 60;
pub const Q4_TIGHTENING_GAP_DAYS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FragilityTier {
    Compliant,
    F1Imminent,
    F2Fragile,
    F3Moderate,
    F4Comfortable,
    F5Safe,
    T5Unsalvageable,
}

impl FragilityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compliant => "COMPLIANT",
            Self::F1Imminent => "F1_IMMINENT",
            Self::F2Fragile => "F2_FRAGILE",
            Self::F3Moderate => "F3_MODERATE",
            Self::F4Comfortable => "F4_COMFORTABLE",
            Self::F5Safe => "F5_SAFE",
            Self::T5Unsalvageable => "T5_UNSALVAGEABLE",
        }
    }

    pub fn contact_window(self) -> ContactWindow {
        match self {
            Self::Compliant => ContactWindow::Routine,
            Self::F1Imminent => ContactWindow::Within24Hours,
            Self::F2Fragile => ContactWindow::Within48Hours,
            Self::F3Moderate => ContactWindow::Within1Week,
            Self::F4Comfortable => ContactWindow::Within2Weeks,
            Self::F5Safe => ContactWindow::Monthly,
            Self::T5Unsalvageable => ContactWindow::ClinicalReview,
        }
    }

    /// One step more urgent, if the tier can be promoted at all.
    pub fn promoted(self) -> Option<Self> {
        match self {
            Self::F5Safe => Some(Self::F4Comfortable),
            Self::F4Comfortable => Some(Self::F3Moderate),
            Self::F3Moderate => Some(Self::F2Fragile),
            Self::F2Fragile => Some(Self::F1Imminent),
            Self::F1Imminent | Self::Compliant | Self::T5Unsalvageable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContactWindow {
    #[serde(rename = "routine")]
    Routine,
    #[serde(rename = "within_24_hours")]
    Within24Hours,
    #[serde(rename = "within_48_hours")]
    Within48Hours,
    #[serde(rename = "within_1_week")]
    Within1Week,
    #[serde(rename = "within_2_weeks")]
    Within2Weeks,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "clinical_review")]
    ClinicalReview,
}

impl ContactWindow {
    pub fn label(self) -> &'static str {
        match self {
            Self::Routine => "Routine monitoring",
            Self::Within24Hours => "Contact within 24 hours",
            Self::Within48Hours => "Contact within 48 hours",
            Self::Within1Week => "Contact within 1 week",
            Self::Within2Weeks => "Contact within 2 weeks",
            Self::Monthly => "Monthly check-in",
            Self::ClinicalReview => "Clinical review",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationRule {
    Compliant,
    Unsalvageable,
    NoRefillsRemaining,
    DelayBudget,
}

pub const EVALUATION_ORDER: [ClassificationRule; 4] = [
    ClassificationRule::Compliant,
    ClassificationRule::Unsalvageable,
    ClassificationRule::NoRefillsRemaining,
    ClassificationRule::DelayBudget,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragilityInput {
    pub pdc_status_quo: f64,
    pub pdc_perfect: f64,
    pub gap_days_remaining: i64,
    pub remaining_refills: u32,
    pub days_to_year_end: u32,
    pub is_out_of_meds: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FragilityFlags {
    pub is_compliant: bool,
    pub is_unsalvageable: bool,
    pub is_out_of_meds: bool,
    pub is_q4_tightened: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragilityResult {
    pub tier: FragilityTier,
    pub rule: ClassificationRule,
    pub delay_budget_per_refill: Option<f64>,
    pub contact_window: ContactWindow,
    pub flags: FragilityFlags,
}

impl ClassificationRule {
    /// Tier and delay budget if this rule decides the input.
    pub fn evaluate(self, input: &FragilityInput) -> Option<(FragilityTier, Option<f64>)> {
        match self {
            Self::Compliant => (input.pdc_status_quo >= COMPLIANCE_THRESHOLD)
                .then_some((FragilityTier::Compliant, None)),
            Self::Unsalvageable => (input.pdc_perfect < COMPLIANCE_THRESHOLD
                || input.gap_days_remaining < 0)
                .then_some((FragilityTier::T5Unsalvageable, None)),
            Self::NoRefillsRemaining => {
                (input.remaining_refills == 0).then_some((FragilityTier::F5Safe, None))
            }
            Self::DelayBudget => {
                let budget = delay_budget(input.gap_days_remaining, input.remaining_refills);
                Some((tier_for_delay_budget(budget), Some(budget)))
            }
        }
    }
}

pub fn delay_budget(gap_days_remaining: i64, remaining_refills: u32) -> f64 {
    if remaining_refills == 0 {
        return gap_days_remaining as f64;
    }
    gap_days_remaining as f64 / f64::from(remaining_refills)
}

pub fn tier_for_delay_budget(budget: f64) -> FragilityTier {
    DELAY_BUDGET_TIERS
        .iter()
        .find(|(bound, _)| budget <= *bound)
        .map(|(_, tier)| *tier)
        .unwrap_or(FragilityTier::F5Safe)
}

pub fn classify_fragility(input: &FragilityInput) -> FragilityResult {
    let base = classify_base(input);
    apply_q4_tightening(base, input)
}

fn classify_base(input: &FragilityInput) -> FragilityResult {
    // DelayBudget always yields a tier, so the fallback is unreachable.
    let (rule, tier, budget) = EVALUATION_ORDER
        .iter()
        .find_map(|rule| rule.evaluate(input).map(|(tier, budget)| (*rule, tier, budget)))
        .unwrap_or((ClassificationRule::DelayBudget, FragilityTier::F5Safe, None));

    FragilityResult {
        tier,
        rule,
        delay_budget_per_refill: budget,
        contact_window: tier.contact_window(),
        flags: FragilityFlags {
            is_compliant: tier == FragilityTier::Compliant,
            is_unsalvageable: tier == FragilityTier::T5Unsalvageable,
            is_out_of_meds: input.is_out_of_meds,
            is_q4_tightened: false,
        },
    }
}

/// Year-end promotion by exactly one tier when little calendar time and
/// little gap budget remain.
pub fn apply_q4_tightening(base: FragilityResult, input: &FragilityInput) -> FragilityResult {
    if input.days_to_year_end >= Q4_TIGHTENING_DAYS
        || input.gap_days_remaining > Q4_TIGHTENING_GAP_DAYS
    {
        return base;
    }
    match base.tier.promoted() {
        Some(tier) => FragilityResult {
            tier,
            contact_window: tier.contact_window(),
            flags: FragilityFlags {
                is_q4_tightened: true,
                ..base.flags
            },
            ..base
        },
        None => base,
    }
}
