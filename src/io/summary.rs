use anyhow::{Context, Result};

use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let patient = ctx.patient.as_ref().context("patient input missing")?;

    let mut out = String::new();
    out.push_str(&format!("kira-pdc v{}\n", version));
    out.push_str(&format!(
        "Patient: {}, year={}, as_of={}\n",
        patient.patient_id,
        patient.measurement_year,
        ctx.as_of()?
    ));
    out.push_str(&format!(
        "Dispenses: {} accepted, {} dropped\n",
        ctx.normalize_report.accepted,
        ctx.normalize_report.dropped()
    ));

    for m in &ctx.measures {
        let Some(pdc) = m.pdc.as_ref() else {
            out.push_str(&format!(
                "{}: PDC NA tier=NA (no supply context)\n",
                m.medication_key
            ));
            continue;
        };
        match (&m.fragility, &m.priority) {
            (Some(f), Some(p)) => out.push_str(&format!(
                "{}: PDC {:.1}% tier={} score={} urgency={}\n",
                m.medication_key,
                pdc.pdc,
                f.tier.as_str(),
                p.priority_score,
                p.urgency_level.as_str()
            )),
            _ => out.push_str(&format!(
                "{}: PDC {:.1}% tier=NA (insufficient fills)\n",
                m.medication_key, pdc.pdc
            )),
        }
    }

    Ok(out)
}
