// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line entry point for the weigher benchmark suite.
//!
//! Usage:
//!     weigher --size quick
//!     weigher --size standard --csv results.csv --json results.json
//!     weigher --size benchmark --seed 7
//!     weigher --size full --trials 2000

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use weigher_search::report::{self, JsonReport, TestConfig};
use weigher_search::{RunConfig, RunSize, TestRunner};

#[derive(Parser, Debug)]
#[command(name = "weigher")]
#[command(about = "Benchmark combination-weigher selection algorithms under a simulated board budget")]
struct Args {
    /// Run size: quick (100 trials/pair), standard (1000), full (10000),
    /// or benchmark (algorithm head-to-head).
    #[arg(short, long, default_value = "quick")]
    size: String,

    /// Override the trials-per-pair count of the chosen size.
    #[arg(long)]
    trials: Option<u64>,

    /// Base random seed; every pair derives its own seed from it.
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Path to write the CSV report.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Path to write the JSON report.
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let size: RunSize = args.size.parse().map_err(anyhow::Error::msg)?;

    let mut config = RunConfig::new(size);
    config.base_seed = args.seed;
    if let Some(trials) = args.trials {
        config.trials_per_pair = trials;
    }

    let runner = TestRunner::new(config.clone());
    let monitor = runner.run();

    println!(
        "{:<34} {:>9} {:>10} {:>11} {:>10}",
        "combination", "success", "avg_error", "p95_time_ms", "compatible"
    );
    for ((generator, algorithm), metrics) in monitor.rankings() {
        println!(
            "{:<34} {:>8.1}% {:>10.1} {:>11} {:>10}",
            format!("{}_{}", generator.id(), algorithm.id()),
            metrics.success_rate() * 100.0,
            metrics.avg_error(),
            metrics.time_stats().p95,
            metrics.board_compatible(monitor.profile()),
        );
    }

    if let Some(path) = &args.csv {
        report::write_csv(&monitor, path)
            .with_context(|| format!("writing CSV report to {}", path.display()))?;
        println!("CSV report written to {}", path.display());
    }

    if let Some(path) = &args.json {
        let test_config = TestConfig {
            run_size: config.size.label().to_string(),
            trials_per_pair: config.trials_per_pair,
            base_seed: config.base_seed,
            items_per_trial: config.items_per_trial,
            target: config.target,
        };
        JsonReport::build(&monitor, test_config)
            .write(path)
            .with_context(|| format!("writing JSON report to {}", path.display()))?;
        println!("JSON report written to {}", path.display());
    }

    Ok(())
}
