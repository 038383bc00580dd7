//! Batch runner: loads rules and an initial status, steps the society until
//! extinction or the step limit, and saves the final status.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use society_core::{run_batch, Engine, RulesConfig, Status};
use society_records::{DiscardSink, KpiCsvWriter, StatusSnapshot};
use tracing_subscriber::EnvFilter;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "society_sim")]
#[command(about = "Stochastic simulation of a small closed society")]
struct Args {
    /// Rule parameters (TOML)
    #[arg(long, default_value = "rules.toml")]
    rules: PathBuf,

    /// Initial status (JSON)
    #[arg(long, default_value = "status.json")]
    status: PathBuf,

    /// Per-step KPI output (CSV)
    #[arg(long)]
    kpis: Option<PathBuf>,

    /// Final status (JSON)
    #[arg(long, default_value = "output.json")]
    output: PathBuf,

    /// Maximum number of steps
    #[arg(long, default_value_t = 10000)]
    number: u64,

    /// Random seed, overriding the one in the rules file
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = RulesConfig::from_file(&args.rules)?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    tracing::info!("Loaded rules from {}", args.rules.display());

    let snapshot = StatusSnapshot::load(&args.status)?;
    let initial = Status::from(&snapshot);
    tracing::info!(
        "Initial status: population {}, technology {}",
        initial.population(),
        initial.technology()
    );

    let mut engine = Engine::seeded_from_config(&config)?;

    let summary = match &args.kpis {
        Some(path) => {
            let columns = engine.kpi_columns();
            let mut writer = KpiCsvWriter::create(path, columns.as_slice())?;
            let summary = run_batch(&mut engine, initial, args.number, &mut writer)?;
            writer.flush()?;
            tracing::info!("Wrote {} KPI rows to {}", writer.rows_written(), path.display());
            summary
        }
        None => run_batch(&mut engine, initial, args.number, &mut DiscardSink)?,
    };

    summary.status.to_snapshot().save(&args.output)?;
    tracing::info!(
        "Finished after {} steps: population {}, technology {}{}",
        summary.steps,
        summary.status.population(),
        summary.status.technology(),
        if summary.extinct { " (extinct)" } else { "" }
    );
    tracing::info!("Saved final status to {}", args.output.display());
    Ok(())
}
