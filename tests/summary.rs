use std::collections::BTreeMap;

use chrono::NaiveDate;
use kira_pdc::adherence::normalize::RawDispense;
use kira_pdc::ctx::Ctx;
use kira_pdc::io::patient::{PatientInput, SupplyInput};
use kira_pdc::io::summary::format_summary;
use kira_pdc::pipeline::Pipeline;
use kira_pdc::pipeline::stage2_normalize::Stage2Normalize;
use kira_pdc::pipeline::stage3_pdc::Stage3Pdc;
use kira_pdc::pipeline::stage4_classify::Stage4Classify;

fn dispense(key: &str, date: &str, supply: i64, status: Option<&str>) -> RawDispense {
    RawDispense {
        medication_key: key.to_string(),
        fill_date: date.to_string(),
        days_supply: supply,
        status: status.map(|s| s.to_string()),
    }
}

#[test]
fn summary_format() {
    let mut ctx = Ctx::new(
        std::path::PathBuf::from("input.json"),
        std::path::PathBuf::from("out"),
        Some(NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()),
        false,
        false,
    );
    ctx.patient = Some(PatientInput {
        patient_id: "P042".to_string(),
        measurement_year: 2025,
        new_patient: true,
        dispenses: vec![
            dispense("statin", "2025-01-01", 90, None),
            dispense("statin", "2025-04-01", 90, None),
            dispense("statin", "2025-07-01", 90, None),
            dispense("statin", "2025-10-01", 90, None),
            dispense("statin", "2025-11-01", 90, Some("reversed")),
        ],
        supply: BTreeMap::from([(
            "statin".to_string(),
            SupplyInput {
                on_hand: 0,
                remaining_refills: 0,
            },
        )]),
    });
    let pipeline = Pipeline::new(vec![
        Box::new(Stage2Normalize::new()),
        Box::new(Stage3Pdc::new()),
        Box::new(Stage4Classify::new()),
    ]);
    pipeline.run(&mut ctx).unwrap();

    let s = format_summary(&ctx).unwrap();
    assert!(s.contains("kira-pdc v"));
    assert!(s.contains("Patient: P042, year=2025, as_of=2026-01-10"));
    assert!(s.contains("Dispenses: 4 accepted, 1 dropped"));
    assert!(s.contains("statin: PDC 98.6% tier=COMPLIANT score=40 urgency=LOW"));
    assert!(!ctx.warnings.iter().any(|w| w.contains("no supply context")));
}

#[test]
fn summary_marks_measure_without_supply_context() {
    let mut ctx = Ctx::new(
        std::path::PathBuf::from("input.json"),
        std::path::PathBuf::from("out"),
        Some(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()),
        false,
        false,
    );
    ctx.patient = Some(PatientInput {
        patient_id: "P043".to_string(),
        measurement_year: 2025,
        new_patient: false,
        dispenses: vec![
            dispense("statin", "2025-01-01", 90, None),
            dispense("statin", "2025-04-01", 90, None),
        ],
        supply: BTreeMap::new(),
    });
    let pipeline = Pipeline::new(vec![
        Box::new(Stage2Normalize::new()),
        Box::new(Stage3Pdc::new()),
        Box::new(Stage4Classify::new()),
    ]);
    pipeline.run(&mut ctx).unwrap();

    let s = format_summary(&ctx).unwrap();
    assert!(s.contains("statin: PDC NA tier=NA (no supply context)"));
    assert!(!s.contains("F5_SAFE"));
    assert!(ctx.warnings.iter().any(|w| w.contains("no supply context")));
}
