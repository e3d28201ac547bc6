//! Autoresolve - Entry Point
//!
//! Loads a scenario, fights it out without player input and prints the
//! narrative report with a summary.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use formation_autoresolve::battle::{load_scenario, Battle, BattleOutcome, BattleSummary};
use formation_autoresolve::core::error::Result;

/// Automated formation combat resolver
#[derive(Parser, Debug)]
#[command(name = "autoresolve")]
#[command(about = "Resolve a formation battle scenario and print the report")]
struct Args {
    /// Scenario TOML file
    scenario: PathBuf,

    /// Dice seed (overrides the scenario's config)
    #[arg(long)]
    seed: Option<u64>,

    /// Rounds before the battle is called a draw (overrides the scenario's config)
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Debug-level logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// JSON output structure
#[derive(Serialize)]
struct ResolveOutput {
    seed: u64,
    outcome: Option<BattleOutcome>,
    rounds: u32,
    summary: BattleSummary,
    report: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let directive = if args.verbose {
        "formation_autoresolve=debug"
    } else {
        "formation_autoresolve=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("autoresolve: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let scenario = load_scenario(&args.scenario)?;

    let mut config = scenario.config.clone();
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(max_rounds) = args.max_rounds {
        config.max_rounds = max_rounds;
    }
    let seed = config.seed;

    tracing::info!(
        scenario = %args.scenario.display(),
        seed,
        max_rounds = config.max_rounds,
        "resolving battle"
    );

    let ctx = scenario.build_with_config(config)?;
    let mut battle = Battle::new(ctx);
    let outcome = battle.run();
    let summary = battle.summary();

    match args.format {
        OutputFormat::Json => {
            let output = ResolveOutput {
                seed,
                outcome: Some(outcome),
                rounds: summary.rounds,
                summary,
                report: battle.report().lines(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("{}", battle.report().render());
            println!();
            print_summary(&summary);
        }
    }

    Ok(())
}

fn print_summary(summary: &BattleSummary) {
    println!("Battle Result");
    println!("=============");
    match summary.outcome {
        Some(BattleOutcome::Victory(team)) => println!("Outcome: victory for team {}", team.0),
        Some(BattleOutcome::Draw) => println!("Outcome: draw"),
        None => println!("Outcome: undecided"),
    }
    println!("Rounds: {}", summary.rounds);
    println!();
    for f in &summary.formations {
        println!(
            "  {:<20} team {:<3} {:<10} morale {:<9} units {:<3} armor {:<4} kills {}",
            f.name,
            f.team.0,
            format!("{:?}", f.fate).to_lowercase(),
            f.morale.label(),
            f.units,
            f.armor,
            f.kills
        );
    }
    println!(
        "Elements destroyed: {}, retreated: {}",
        summary.destroyed_elements.len(),
        summary.retreated_elements.len()
    );
}
