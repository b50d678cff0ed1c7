//! Fulfillment Simulator CLI
//!
//! File-driven front end for the simulation engine: reads a JSON arrival
//! schedule (and optionally a JSON configuration), runs the simulation, and
//! writes the three report artifacts plus a capped console trace.

use clap::Parser;
use fulfillment_simulator_core_rs::report::{
    write_departures_csv, write_samples_csv, write_summary, ReportError, TraceWriter,
};
use fulfillment_simulator_core_rs::{
    Collector, FanoutSink, ScheduledArrival, Simulation, SimulationConfig, SimulationError,
};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "fulfillment-sim")]
#[command(about = "Discrete-event simulator of an order-fulfillment pipeline")]
#[command(version)]
struct Cli {
    /// JSON schedule file: an array of {"arrival_time": f64, "express": bool}
    #[arg(short, long)]
    schedule: PathBuf,

    /// Optional JSON configuration file; defaults apply for omitted fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the RNG seed from the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Override the simulation horizon from the configuration
    #[arg(long)]
    horizon: Option<f64>,

    /// Per-order lifecycle CSV output path
    #[arg(long, default_value = "orders_detailed.csv")]
    orders_csv: PathBuf,

    /// Queue-size sample CSV output path
    #[arg(long, default_value = "orders_log.csv")]
    samples_csv: PathBuf,

    /// Human-readable summary output path
    #[arg(long, default_value = "simulation_summary.txt")]
    summary: PathBuf,

    /// Suppress the console event trace
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write { path: String, source: ReportError },

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) => load_json::<SimulationConfig>(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.rng_seed = seed;
    }
    if let Some(horizon) = cli.horizon {
        config.horizon = horizon;
    }

    let arrivals: Vec<ScheduledArrival> = load_json(&cli.schedule)?;

    let mut sim = Simulation::new(config.clone(), arrivals)?;
    let mut collector = Collector::new(config.warmup);
    let mut trace = TraceWriter::new(std::io::stdout(), config.max_trace_events);

    {
        let mut fanout = FanoutSink::new();
        fanout.push(&mut collector);
        if !cli.quiet {
            fanout.push(&mut trace);
        }
        sim.run(&mut fanout)?;
    }

    // Departures CSV and summary are the primary artifacts; failure to
    // write them fails the run. The sample series degrades to a warning.
    write_artifact(&cli.orders_csv, |out| {
        write_departures_csv(out, collector.departures())
    })?;
    write_artifact(&cli.summary, |out| {
        write_summary(out, &config, collector.stats())
    })?;
    if let Err(err) = write_artifact(&cli.samples_csv, |out| {
        write_samples_csv(out, collector.samples())
    }) {
        eprintln!("warning: {}", err);
    }

    let stats = collector.stats();
    println!();
    println!("===== SIMULATION COMPLETE =====");
    println!(
        "Delivered = {}, Cancelled = {}",
        stats.delivered, stats.cancelled
    );
    println!("Files generated:");
    println!("  {} (per-order details)", cli.orders_csv.display());
    println!("  {} (queue size over time)", cli.samples_csv.display());
    println!("  {} (human-readable summary)", cli.summary.display());
    if !cli.quiet {
        println!(
            "Showing {} of the total events on console.",
            trace.events_written()
        );
    }
    Ok(())
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn write_artifact<F>(path: &Path, write: F) -> Result<(), CliError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), ReportError>,
{
    let wrap = |source: ReportError| CliError::Write {
        path: path.display().to_string(),
        source,
    };
    let file = File::create(path).map_err(|e| wrap(ReportError::Io(e)))?;
    let mut out = BufWriter::new(file);
    write(&mut out).map_err(wrap)?;
    use std::io::Write;
    out.flush().map_err(|e| wrap(ReportError::Io(e)))?;
    Ok(())
}
