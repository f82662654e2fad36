use std::path::PathBuf;

use chrono::NaiveDate;

use crate::adherence::coverage::CoverageInterval;
use crate::adherence::fragility::FragilityResult;
use crate::adherence::normalize::NormalizeReport;
use crate::adherence::priority::PriorityScoreResult;
use crate::adherence::{FillRecord, PdcResult};
use crate::io::patient::{PatientInput, SupplyInput};

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub tsv_path: PathBuf,
}

/// State for one medication key as it moves through the stages.
///
/// A key without supply context is carried through unevaluated: `pdc`,
/// `fragility` and `priority` stay `None`.
#[derive(Debug, Clone)]
pub struct MeasureEval {
    pub medication_key: String,
    pub fills: Vec<FillRecord>,
    pub supply: Option<SupplyInput>,
    pub pdc: Option<PdcResult>,
    pub coverage: Vec<CoverageInterval>,
    pub fragility: Option<FragilityResult>,
    pub priority: Option<PriorityScoreResult>,
}

impl MeasureEval {
    pub fn new(medication_key: String, fills: Vec<FillRecord>) -> Self {
        Self {
            medication_key,
            fills,
            supply: None,
            pdc: None,
            coverage: Vec::new(),
            fragility: None,
            priority: None,
        }
    }
}

#[derive(Debug)]
pub struct Ctx {
    pub input: PathBuf,
    pub as_of: Option<NaiveDate>,
    pub write_json: bool,
    pub write_tsv: bool,
    pub patient: Option<PatientInput>,
    pub normalize_report: NormalizeReport,
    pub measures: Vec<MeasureEval>,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
}

impl Ctx {
    pub fn new(
        input: PathBuf,
        out_dir: PathBuf,
        as_of: Option<NaiveDate>,
        write_json: bool,
        write_tsv: bool,
    ) -> Self {
        let json_path = out_dir.join("adherence.json");
        let tsv_path = out_dir.join("adherence.tsv");
        Self {
            input,
            as_of,
            write_json,
            write_tsv,
            patient: None,
            normalize_report: NormalizeReport::default(),
            measures: Vec::new(),
            warnings: Vec::new(),
            output: OutputPaths {
                out_dir,
                json_path,
                tsv_path,
            },
        }
    }

    pub fn as_of(&self) -> anyhow::Result<NaiveDate> {
        self.as_of
            .ok_or_else(|| anyhow::anyhow!("as_of date is required for evaluation"))
    }

    pub fn measurement_year(&self) -> anyhow::Result<i32> {
        self.patient
            .as_ref()
            .map(|p| p.measurement_year)
            .ok_or_else(|| anyhow::anyhow!("patient input missing"))
    }
}
