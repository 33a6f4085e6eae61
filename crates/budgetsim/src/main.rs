use std::path::PathBuf;

use budgetsim::{RunOptions, init_logging, load_budget_file, run};
use budgetsim_core::PeriodCount;
use clap::Parser;
use color_eyre::eyre::WrapErr;

#[derive(Parser, Debug)]
#[command(name = "budgetsim")]
#[command(about = "Monte Carlo simulator for monthly budgets")]
struct Args {
    /// Path to the budget file (YAML)
    #[arg(short, long)]
    config: PathBuf,

    /// Number of periods per run (overrides the file)
    #[arg(short, long, allow_negative_numbers = true)]
    periods: Option<i64>,

    /// Number of Monte Carlo runs (overrides the file)
    #[arg(short, long)]
    runs: Option<usize>,

    /// Master seed (overrides the file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Runs per independently seeded batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    let options = RunOptions {
        periods: args.periods.map(PeriodCount::try_from).transpose()?,
        runs: args.runs,
        seed: args.seed,
        batch_size: args.batch_size,
    };

    let data = load_budget_file(&args.config)
        .wrap_err_with(|| format!("failed to load {}", args.config.display()))?;
    let report = run(&data, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    tracing::info!("done");
    Ok(())
}
