use chrono::NaiveDate;
use clap::Parser;
use kira_pdc::cli::{Cli, Commands};

#[test]
fn run_parses_as_of_date() {
    let cli = Cli::parse_from([
        "kira-pdc",
        "run",
        "--input",
        "patient.json",
        "--as-of",
        "2025-11-16",
        "--out",
        "out",
    ]);
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.as_of, NaiveDate::from_ymd_opt(2025, 11, 16).unwrap());
            assert!(!args.json);
            assert!(!args.tsv);
        }
        _ => panic!("expected run command"),
    }
}

#[test]
fn run_rejects_malformed_date() {
    let res = Cli::try_parse_from([
        "kira-pdc",
        "run",
        "--input",
        "patient.json",
        "--as-of",
        "16/11/2025",
        "--out",
        "out",
    ]);
    assert!(res.is_err());
}

#[test]
fn run_requires_as_of() {
    let res = Cli::try_parse_from(["kira-pdc", "run", "--input", "patient.json", "--out", "out"]);
    assert!(res.is_err());
}
