use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adherence::normalize::{parse_dispenses, partition_by_key};
use crate::ctx::{Ctx, MeasureEval};
use crate::pipeline::Stage;

pub struct Stage2Normalize;

impl Stage2Normalize {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Normalize {
    fn name(&self) -> &'static str {
        "stage2_normalize"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let patient = ctx.patient.as_ref().context("patient input missing")?;
        let (fills, report) = parse_dispenses(&patient.dispenses);

        if report.dropped() > 0 {
            warn!(
                invalid_supply = report.invalid_supply,
                unparseable_date = report.unparseable_date,
                voided = report.voided,
                "dispenses dropped"
            );
            ctx.warnings.push(format!(
                "dropped {} dispense(s): {} invalid supply, {} unparseable date, {} voided/reversed",
                report.dropped(),
                report.invalid_supply,
                report.unparseable_date,
                report.voided
            ));
        }

        let mut measures = Vec::new();
        for (key, group) in partition_by_key(fills) {
            let mut eval = MeasureEval::new(key, group);
            eval.supply = patient.supply.get(&eval.medication_key).copied();
            if eval.supply.is_none() {
                warn!(key = %eval.medication_key, "no supply context");
                ctx.warnings.push(format!(
                    "no supply context for '{}'; not evaluated",
                    eval.medication_key
                ));
            }
            measures.push(eval);
        }

        for key in patient.supply.keys() {
            if !measures.iter().any(|m| &m.medication_key == key) {
                ctx.warnings
                    .push(format!("supply context for '{}' has no valid dispenses", key));
            }
        }

        ctx.normalize_report = report;
        ctx.measures = measures;
        info!(
            accepted = report.accepted,
            measures = ctx.measures.len(),
            "fills_normalized"
        );
        Ok(())
    }
}
