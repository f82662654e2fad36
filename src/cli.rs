use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kira-pdc",
    version,
    about = "Medication adherence (PDC) fragility and outreach priority"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "Patient dispense file (.json or .json.gz)")]
    pub input: PathBuf,

    #[arg(long, help = "Evaluation date, YYYY-MM-DD")]
    pub as_of: NaiveDate,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Patient dispense file (.json or .json.gz)")]
    pub input: PathBuf,
}
