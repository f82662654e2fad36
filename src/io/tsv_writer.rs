use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;

pub const TSV_HEADER: &str = "medication_key\tfills\tpdc\tcovered_days\ttreatment_days\tgap_days_remaining\tpdc_status_quo\tpdc_perfect\tdays_to_runout\ttier\tdelay_budget\tcontact_window\tq4_tightened\tpriority_score\turgency";

pub fn write_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "{}", TSV_HEADER)?;
    for m in &ctx.measures {
        let Some(pdc) = m.pdc.as_ref() else {
            writeln!(w, "{}\t{}{}", m.medication_key, m.fills.len(), "\tNA".repeat(13))?;
            continue;
        };
        let (tier, budget, window, tightened) = match &m.fragility {
            Some(f) => (
                f.tier.as_str(),
                f.delay_budget_per_refill
                    .map(|b| format!("{:.2}", b))
                    .unwrap_or_else(|| "NA".to_string()),
                f.contact_window.label(),
                f.flags.is_q4_tightened.to_string(),
            ),
            None => ("NA", "NA".to_string(), "NA", "NA".to_string()),
        };
        let (score, urgency) = match &m.priority {
            Some(p) => (p.priority_score.to_string(), p.urgency_level.as_str()),
            None => ("NA".to_string(), "NA"),
        };
        writeln!(
            w,
            "{}\t{}\t{:.1}\t{}\t{}\t{}\t{:.1}\t{:.1}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            m.medication_key,
            m.fills.len(),
            pdc.pdc,
            pdc.covered_days,
            pdc.treatment_days,
            pdc.gap_days_remaining,
            pdc.pdc_status_quo,
            pdc.pdc_perfect,
            pdc.supply.days_to_runout,
            tier,
            budget,
            window,
            tightened,
            score,
            urgency
        )?;
    }
    w.flush()?;
    Ok(())
}
