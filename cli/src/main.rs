//! Fire Station Call Centre driver
//!
//! Runs the dispatch center one simulated second at a time:
//! 1. Reviews active calls and the backlog
//! 2. Dispatches a generated call when one is due
//! 3. Prints the status board
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` to see every
//! assignment and escalation.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use dispatch_center_core_rs::{ArrivalConfig, CenterConfig, DispatchCenter, Placement};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fire Station Call Centre dispatch simulator", long_about = None)]
struct Args {
    /// JSON config file (defaults to a standard fire station with generated calls)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of seconds to simulate (runs until interrupted if omitted)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Sleep one wall-clock second per simulated second
    #[arg(long)]
    realtime: bool,

    /// Override the RNG seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn load_config(args: &Args) -> Result<CenterConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => CenterConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => CenterConfig {
            arrivals: Some(ArrivalConfig::default()),
            ..CenterConfig::default()
        },
    };

    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }

    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if config.arrivals.is_none() {
        info!("no arrivals configured; the center will stay idle");
    }

    let mut center = DispatchCenter::new(config)?;
    let mut elapsed = 0u64;

    while args.ticks.map_or(true, |limit| elapsed < limit) {
        let result = center.tick()?;

        if let Some(receipt) = &result.arrival {
            let call = center.state().get_call(&receipt.call_id);
            let priority = call.map(|c| c.priority().as_str()).unwrap_or("?");
            println!("Received new call (priority {}) from caller {}", priority, receipt.caller_uid);
            match receipt.placement {
                Placement::Assigned {
                    employee_uid,
                    seniority,
                } => println!("  -> picked up by {} #{}", seniority, employee_uid),
                Placement::Backlogged { backlog_len } => {
                    println!("  -> added to backlog ({} waiting)", backlog_len)
                }
            }
        }

        println!("{}", center.status());
        println!();

        elapsed += 1;
        if args.realtime {
            thread::sleep(Duration::from_secs(1));
        }
    }

    info!(
        seconds = elapsed,
        events = center.event_log().len(),
        "simulation finished"
    );

    Ok(())
}
