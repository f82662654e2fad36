use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::adherence::normalize::RawDispense;
use crate::io::open_maybe_gz;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyInput {
    pub on_hand: i64,
    pub remaining_refills: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientInput {
    pub patient_id: String,
    pub measurement_year: i32,
    #[serde(default)]
    pub new_patient: bool,
    #[serde(default)]
    pub dispenses: Vec<RawDispense>,
    #[serde(default)]
    pub supply: BTreeMap<String, SupplyInput>,
}

pub fn read_patient(path: &Path) -> Result<PatientInput> {
    let reader = open_maybe_gz(path)
        .with_context(|| format!("failed to open patient input {}", path.display()))?;
    let patient: PatientInput = serde_json::from_reader(BufReader::new(reader))
        .with_context(|| format!("failed to parse patient input {}", path.display()))?;
    if patient.patient_id.trim().is_empty() {
        bail!("{}: patient_id is empty", path.display());
    }
    Ok(patient)
}
