use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::patient::read_patient;
use crate::pipeline::Stage;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let patient = read_patient(&ctx.input)?;
        info!(
            patient = %patient.patient_id,
            measurement_year = patient.measurement_year,
            dispenses = patient.dispenses.len(),
            "patient_input_loaded"
        );

        ctx.patient = Some(patient);
        Ok(())
    }
}
