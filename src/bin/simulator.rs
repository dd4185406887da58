//! Warband headless batch simulator.
//!
//! Plays two teams against each other many times and prints win rates and
//! per-match averages.
//!
//! Usage:
//!   cargo run --bin warband-sim -- --team-a a.json --team-b b.json [OPTIONS]

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use warband::character::UnitSnapshot;
use warband::core::{CombatError, CombatTuning};
use warband::simulator::{run_batch, BatchConfig};

/// Batch-simulate two teams and report win rates.
#[derive(Parser, Debug)]
#[command(name = "warband-sim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Team A roster (JSON array of units)
    #[arg(long)]
    team_a: PathBuf,

    /// Team B roster (JSON array of units)
    #[arg(long)]
    team_b: PathBuf,

    /// Number of matches
    #[arg(short, long, default_value = "1000")]
    rounds: u32,

    /// Base seed; match i uses seed + i
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Worker threads (0 = all cores)
    #[arg(short, long, default_value = "0")]
    workers: usize,

    /// Run matches on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Combat tuning overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn load_team(path: &Path) -> Result<Vec<UnitSnapshot>, CombatError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CombatError::Config(format!("{}: {e}", path.display())))?;
    Ok(serde_json::from_str(&text)?)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CombatError> {
    let tuning = match &args.tuning {
        Some(path) => CombatTuning::load(path)?,
        None => CombatTuning::default(),
    };
    let team_a = load_team(&args.team_a)?;
    let team_b = load_team(&args.team_b)?;

    let config = BatchConfig {
        rounds: args.rounds,
        seed: args.seed,
        workers: args.workers,
        parallel: !args.sequential,
        ..Default::default()
    };
    tracing::info!(
        team_a = team_a.len(),
        team_b = team_b.len(),
        rounds = config.rounds,
        "starting batch"
    );

    let report = run_batch(&team_a, &team_b, &tuning, &config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}
