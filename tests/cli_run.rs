use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

const PATIENT: &str = r#"{
  "patient_id": "P001",
  "measurement_year": 2025,
  "new_patient": false,
  "dispenses": [
    {"medication_key": "statin", "fill_date": "2025-07-01", "days_supply": 90},
    {"medication_key": "statin", "fill_date": "2025-01-01", "days_supply": 90},
    {"medication_key": "statin", "fill_date": "2025-04-01", "days_supply": 90},
    {"medication_key": "statin", "fill_date": "2025-08-01", "days_supply": 90, "status": "reversed"},
    {"medication_key": "metformin", "fill_date": "2025-01-05", "days_supply": 30}
  ],
  "supply": {
    "statin": {"on_hand": 0, "remaining_refills": 2},
    "metformin": {"on_hand": 10, "remaining_refills": 5}
  }
}"#;

fn write_patient(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("patient.json");
    fs::write(&path, PATIENT).unwrap();
    path
}

fn run_pipeline(input: &Path, out: &Path) -> String {
    let mut cmd = Command::cargo_bin("kira-pdc").unwrap();
    cmd.arg("run")
        .arg("--input")
        .arg(input)
        .arg("--as-of")
        .arg("2025-11-16")
        .arg("--out")
        .arg(out)
        .arg("--json")
        .arg("--tsv");
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn run_writes_json_report() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let input = write_patient(tmp.path());
    run_pipeline(&input, &out);

    let v: Value = serde_json::from_slice(&fs::read(out.join("adherence.json")).unwrap()).unwrap();
    assert_eq!(v["tool"], "kira-pdc");
    assert_eq!(v["schema_version"], "v1");
    assert_eq!(v["input_meta"]["patient_id"], "P001");
    assert_eq!(v["input_meta"]["as_of"], "2025-11-16");
    assert_eq!(v["input_meta"]["dispenses"], 5);
    assert_eq!(v["input_meta"]["normalization"]["voided"], 1);

    let measures = v["measures"].as_array().unwrap();
    assert_eq!(measures.len(), 2);
    assert_eq!(measures[0]["medication_key"], "metformin");
    assert!(measures[0]["fragility"].is_null());

    let statin = &measures[1];
    assert_eq!(statin["medication_key"], "statin");
    assert_eq!(statin["fills"], 3);
    assert_eq!(statin["pdc"]["covered_days"], 270);
    assert_eq!(statin["pdc"]["gap_days_remaining"], 23);
    assert_eq!(statin["fragility"]["tier"], "F4_COMFORTABLE");
    assert_eq!(statin["priority"]["priority_score"], 110);
    assert_eq!(statin["priority"]["urgency_level"], "HIGH");
}

#[test]
fn run_writes_tsv_and_summary() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let input = write_patient(tmp.path());
    let stdout = run_pipeline(&input, &out);

    let tsv = fs::read_to_string(out.join("adherence.tsv")).unwrap();
    assert_eq!(tsv.lines().count(), 3);
    assert!(tsv.lines().nth(2).unwrap().starts_with("statin\t3\t84.4\t"));

    assert!(stdout.contains("Patient: P001, year=2025, as_of=2025-11-16"));
    assert!(stdout.contains("Dispenses: 4 accepted, 1 dropped"));
    assert!(stdout.contains("statin: PDC 84.4% tier=F4_COMFORTABLE score=110 urgency=HIGH"));
    assert!(stdout.contains("metformin: PDC 0.0% tier=NA (insufficient fills)"));
}

#[test]
fn run_outputs_are_deterministic() {
    let tmp = TempDir::new().unwrap();
    let input = write_patient(tmp.path());
    let out_a = tmp.path().join("a");
    let out_b = tmp.path().join("b");
    run_pipeline(&input, &out_a);
    run_pipeline(&input, &out_b);

    assert_eq!(
        fs::read(out_a.join("adherence.json")).unwrap(),
        fs::read(out_b.join("adherence.json")).unwrap()
    );
    assert_eq!(
        fs::read(out_a.join("adherence.tsv")).unwrap(),
        fs::read(out_b.join("adherence.tsv")).unwrap()
    );
}

#[test]
fn run_without_output_flags_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let input = write_patient(tmp.path());

    let mut cmd = Command::cargo_bin("kira-pdc").unwrap();
    cmd.arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--as-of")
        .arg("2025-11-16")
        .arg("--out")
        .arg(&out);
    cmd.assert().success();
    assert!(!out.exists());
}

#[test]
fn run_leaves_measure_without_supply_context_unclassified() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let input = tmp.path().join("patient.json");
    fs::write(
        &input,
        r#"{
  "patient_id": "P002",
  "measurement_year": 2025,
  "dispenses": [
    {"medication_key": "statin", "fill_date": "2025-01-01", "days_supply": 90},
    {"medication_key": "statin", "fill_date": "2025-04-01", "days_supply": 90}
  ]
}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("kira-pdc").unwrap();
    cmd.arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--as-of")
        .arg("2025-08-01")
        .arg("--out")
        .arg(&out)
        .arg("--json");
    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    assert!(stdout.contains("statin: PDC NA tier=NA (no supply context)"));
    assert!(!stdout.contains("F5_SAFE"));

    let v: Value = serde_json::from_slice(&fs::read(out.join("adherence.json")).unwrap()).unwrap();
    let statin = &v["measures"][0];
    assert_eq!(statin["medication_key"], "statin");
    assert!(statin["pdc"].is_null());
    assert!(statin["fragility"].is_null());
    assert!(statin["priority"].is_null());
}
