use serde::Serialize;

use crate::adherence::PdcResult;
use crate::adherence::coverage::CoverageInterval;
use crate::adherence::fragility::FragilityResult;
use crate::adherence::normalize::NormalizeReport;
use crate::adherence::priority::PriorityScoreResult;

#[derive(Debug, Clone, Serialize)]
pub struct InputMeta {
    pub patient_id: Option<String>,
    pub measurement_year: Option<i32>,
    pub as_of: String,
    pub new_patient: bool,
    pub dispenses: usize,
    pub normalization: NormalizeReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeasureReport {
    pub medication_key: String,
    pub fills: usize,
    pub pdc: Option<PdcResult>,
    pub coverage: Vec<CoverageInterval>,
    pub fragility: Option<FragilityResult>,
    pub priority: Option<PriorityScoreResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdherenceReportV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input_meta: InputMeta,
    pub measures: Vec<MeasureReport>,
    pub warnings: Vec<String>,
}
