use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adherence::FillRecord;

const DATE_FORMAT: &str = "%Y-%m-%d";
const VOID_MARKERS: [&str; 4] = ["voided", "reversed", "cancelled", "entered-in-error"];

/// Dispense record as handed over by the data-access layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDispense {
    pub medication_key: String,
    pub fill_date: String,
    pub days_supply: i64,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NormalizeReport {
    pub accepted: usize,
    pub invalid_supply: usize,
    pub unparseable_date: usize,
    pub voided: usize,
}

impl NormalizeReport {
    pub fn dropped(&self) -> usize {
        self.invalid_supply + self.unparseable_date + self.voided
    }
}

/// Parses raw dispenses into fills, dropping the ones that must never be
/// merged. The result is sorted by fill date; ties keep input order.
pub fn parse_dispenses(raw: &[RawDispense]) -> (Vec<FillRecord>, NormalizeReport) {
    let mut report = NormalizeReport::default();
    let mut fills = Vec::with_capacity(raw.len());

    for (idx, rec) in raw.iter().enumerate() {
        if is_voided(rec.status.as_deref()) {
            debug!(row = idx, key = %rec.medication_key, "dispense dropped: voided");
            report.voided += 1;
            continue;
        }
        let days_supply = match u32::try_from(rec.days_supply) {
            Ok(s) if s > 0 => s,
            _ => {
                debug!(
                    row = idx,
                    key = %rec.medication_key,
                    days_supply = rec.days_supply,
                    "dispense dropped: invalid supply"
                );
                report.invalid_supply += 1;
                continue;
            }
        };
        let fill_date = match NaiveDate::parse_from_str(rec.fill_date.trim(), DATE_FORMAT) {
            Ok(d) => d,
            Err(_) => {
                debug!(row = idx, key = %rec.medication_key, "dispense dropped: unparseable date");
                report.unparseable_date += 1;
                continue;
            }
        };
        fills.push(FillRecord::new(fill_date, days_supply, rec.medication_key.clone()));
    }

    fills.sort_by_key(|f| f.fill_date);
    report.accepted = fills.len();
    (fills, report)
}

/// Drops zero-supply fills and sorts the rest stably by date.
pub fn normalize_fills(fills: &[FillRecord]) -> Vec<FillRecord> {
    let mut out: Vec<FillRecord> = fills.iter().filter(|f| f.days_supply > 0).cloned().collect();
    out.sort_by_key(|f| f.fill_date);
    out
}

/// Groups fills per medication key. Each group keeps the incoming order.
pub fn partition_by_key(fills: Vec<FillRecord>) -> BTreeMap<String, Vec<FillRecord>> {
    let mut groups: BTreeMap<String, Vec<FillRecord>> = BTreeMap::new();
    for fill in fills {
        groups.entry(fill.medication_key.clone()).or_default().push(fill);
    }
    groups
}

fn is_voided(status: Option<&str>) -> bool {
    match status {
        Some(s) => {
            let s = s.trim();
            VOID_MARKERS.iter().any(|m| m.eq_ignore_ascii_case(s))
        }
        None => false,
    }
}
