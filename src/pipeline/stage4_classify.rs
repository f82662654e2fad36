use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adherence::calendar::{days_left_in_measurement_year, in_q4_window};
use crate::adherence::classify;
use crate::adherence::priority::ContextFlags;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage4Classify;

impl Stage4Classify {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Classify {
    fn name(&self) -> &'static str {
        "stage4_classify"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let as_of = ctx.as_of()?;
        let patient = ctx.patient.as_ref().context("patient input missing")?;
        let days_to_year_end = days_left_in_measurement_year(as_of, patient.measurement_year)?;
        let is_q4 = in_q4_window(as_of, patient.measurement_year);
        let measure_count = ctx.measures.len() as u32;
        let is_new_patient = patient.new_patient;

        for m in ctx.measures.iter_mut() {
            let (Some(pdc), Some(supply)) = (m.pdc.as_ref(), m.supply) else {
                continue;
            };
            if !pdc.is_measured() {
                warn!(key = %m.medication_key, "fewer than two fills; classification skipped");
                ctx.warnings.push(format!(
                    "'{}' has fewer than two fills in the measurement year; not classified",
                    m.medication_key
                ));
                continue;
            }

            let flags = ContextFlags {
                is_out_of_meds: pdc.supply.is_out_of_meds,
                is_q4,
                measure_count,
                is_new_patient,
            };
            let (fragility, priority) =
                classify(pdc, supply.remaining_refills, days_to_year_end, &flags)
                    .with_context(|| format!("classification failed for {}", m.medication_key))?;

            info!(
                key = %m.medication_key,
                tier = fragility.tier.as_str(),
                score = priority.priority_score,
                q4_tightened = fragility.flags.is_q4_tightened,
                "classified"
            );
            m.fragility = Some(fragility);
            m.priority = Some(priority);
        }
        Ok(())
    }
}
