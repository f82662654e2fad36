use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adherence::calendar::year_end;
use crate::adherence::compute_adherence;
use crate::adherence::coverage::merge_coverage;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage3Pdc;

impl Stage3Pdc {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Pdc {
    fn name(&self) -> &'static str {
        "stage3_pdc"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let year = ctx.measurement_year()?;
        let as_of = ctx.as_of()?;
        let period_end = as_of.min(year_end(year)?);

        for m in ctx.measures.iter_mut() {
            let Some(supply) = m.supply else {
                debug!(key = %m.medication_key, "pdc skipped: no supply context");
                continue;
            };
            let pdc = compute_adherence(
                &m.fills,
                year,
                as_of,
                supply.on_hand,
                supply.remaining_refills,
            )
            .with_context(|| format!("PDC failed for {}", m.medication_key))?;

            m.coverage = match pdc.period {
                Some(period) => {
                    let scoped: Vec<_> = m
                        .fills
                        .iter()
                        .filter(|f| f.fill_date >= period.start)
                        .cloned()
                        .collect();
                    merge_coverage(&scoped, period_end).intervals
                }
                None => Vec::new(),
            };

            info!(
                key = %m.medication_key,
                pdc = pdc.pdc,
                covered_days = pdc.covered_days,
                treatment_days = pdc.treatment_days,
                "pdc_ready"
            );
            m.pdc = Some(pdc);
        }
        Ok(())
    }
}
