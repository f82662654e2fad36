use serde::Serialize;

use crate::adherence::fragility::FragilityTier;

pub const MULTI_MEASURE_MIN: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContextFlags {
    pub is_out_of_meds: bool,
    pub is_q4: bool,
    pub measure_count: u32,
    pub is_new_patient: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bonus {
    OutOfMeds,
    Q4Window,
    MultipleMeasures,
    NewPatient,
}

impl Bonus {
    pub const ALL: [Bonus; 4] = [
        Bonus::OutOfMeds,
        Bonus::Q4Window,
        Bonus::MultipleMeasures,
        Bonus::NewPatient,
    ];

    pub fn points(self) -> u32 {
        match self {
            Self::OutOfMeds => 30,
            Self::Q4Window => 25,
            Self::MultipleMeasures => 15,
            Self::NewPatient => 10,
        }
    }

    pub fn applies(self, flags: &ContextFlags) -> bool {
        match self {
            Self::OutOfMeds => flags.is_out_of_meds,
            Self::Q4Window => flags.is_q4,
            Self::MultipleMeasures => flags.measure_count >= MULTI_MEASURE_MIN,
            Self::NewPatient => flags.is_new_patient,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppliedBonus {
    pub bonus: Bonus,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl UrgencyLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= 150 {
            Self::Extreme
        } else if score >= 100 {
            Self::High
        } else if score >= 50 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extreme => "EXTREME",
            Self::High => "HIGH",
            Self::Moderate => "MODERATE",
            Self::Low => "LOW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityScoreResult {
    pub base_score: u32,
    pub priority_score: u32,
    pub urgency_level: UrgencyLevel,
    pub applied_bonuses: Vec<AppliedBonus>,
}

pub fn base_score(tier: FragilityTier) -> u32 {
    match tier {
        FragilityTier::F1Imminent => 100,
        FragilityTier::F2Fragile => 80,
        FragilityTier::F3Moderate => 60,
        FragilityTier::F4Comfortable => 40,
        FragilityTier::F5Safe => 20,
        FragilityTier::Compliant | FragilityTier::T5Unsalvageable => 0,
    }
}

pub fn score_priority(tier: FragilityTier, flags: &ContextFlags) -> PriorityScoreResult {
    let base = base_score(tier);
    let applied_bonuses: Vec<AppliedBonus> = Bonus::ALL
        .iter()
        .filter(|b| b.applies(flags))
        .map(|b| AppliedBonus {
            bonus: *b,
            points: b.points(),
        })
        .collect();
    let priority_score = base + applied_bonuses.iter().map(|b| b.points).sum::<u32>();
    PriorityScoreResult {
        base_score: base,
        priority_score,
        urgency_level: UrgencyLevel::from_score(priority_score),
        applied_bonuses,
    }
}
