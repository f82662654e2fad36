use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kira_pdc::cli::{Cli, Commands};
use kira_pdc::ctx::Ctx;
use kira_pdc::io;
use kira_pdc::pipeline::Pipeline;
use kira_pdc::pipeline::stage0_scaffold::Stage0Scaffold;
use kira_pdc::pipeline::stage1_input::Stage1Input;
use kira_pdc::pipeline::stage2_normalize::Stage2Normalize;
use kira_pdc::pipeline::stage3_pdc::Stage3Pdc;
use kira_pdc::pipeline::stage4_classify::Stage4Classify;
use kira_pdc::pipeline::stage5_output::Stage5Output;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let mut ctx = Ctx::new(args.input, args.out, Some(args.as_of), args.json, args.tsv);

            let pipeline = Pipeline::new(vec![
                Box::new(Stage0Scaffold::new()),
                Box::new(Stage1Input::new()),
                Box::new(Stage2Normalize::new()),
                Box::new(Stage3Pdc::new()),
                Box::new(Stage4Classify::new()),
                Box::new(Stage5Output::new()),
            ]);
            pipeline.run(&mut ctx)?;

            print_summary(&ctx)?;
        }
        Commands::Validate(args) => {
            let mut ctx = Ctx::new(args.input, PathBuf::from("."), None, false, false);

            let pipeline = Pipeline::new(vec![
                Box::new(Stage1Input::new()),
                Box::new(Stage2Normalize::new()),
            ]);
            pipeline.run(&mut ctx)?;

            print_validate_summary(&ctx);
        }
    }

    Ok(())
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    print_warnings(ctx);
    Ok(())
}

fn print_validate_summary(ctx: &Ctx) {
    println!("kira-pdc validate ok");
    println!("accepted: {}", ctx.normalize_report.accepted);
    println!("dropped: {}", ctx.normalize_report.dropped());
    println!("measures: {}", ctx.measures.len());
    print_warnings(ctx);
}

fn print_warnings(ctx: &Ctx) {
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
