use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::schema::v1::{AdherenceReportV1, InputMeta, MeasureReport};

pub fn build_report(ctx: &Ctx) -> Result<AdherenceReportV1> {
    let patient = ctx.patient.as_ref().context("patient input missing")?;

    let input_meta = InputMeta {
        patient_id: Some(patient.patient_id.clone()),
        measurement_year: Some(patient.measurement_year),
        as_of: ctx.as_of()?.to_string(),
        new_patient: patient.new_patient,
        dispenses: patient.dispenses.len(),
        normalization: ctx.normalize_report,
    };

    let mut measures = Vec::with_capacity(ctx.measures.len());
    for m in &ctx.measures {
        measures.push(MeasureReport {
            medication_key: m.medication_key.clone(),
            fills: m.fills.len(),
            pdc: m.pdc.clone(),
            coverage: m.coverage.clone(),
            fragility: m.fragility.clone(),
            priority: m.priority.clone(),
        });
    }

    Ok(AdherenceReportV1 {
        tool: "kira-pdc".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: "v1".to_string(),
        input_meta,
        measures,
        warnings: ctx.warnings.clone(),
    })
}

pub fn write_json(path: &Path, ctx: &Ctx) -> Result<()> {
    let report = build_report(ctx)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}
