use std::path::PathBuf;

use clap::Parser;

use insulin_wave::engine::WaveConfig;
use insulin_wave::error::Result;
use insulin_wave::logging;
use insulin_wave::scenario::load_scenarios;
use insulin_wave::sweep::{
    SweepConfig, evaluate_all, print_summary, print_topk, run_sweep, write_csv, write_summary_json,
};

#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(about = "Random scenario sweep for reviewing insulin wave calibration")]
struct Args {
    /// Number of random scenarios to sample
    #[arg(long, default_value = "500")]
    samples: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value = "123")]
    seed: u64,

    /// Evaluate the scenarios in this JSON file instead of sampling
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// Output CSV file for all rows
    #[arg(long, default_value = "sweep_results.csv")]
    csv: PathBuf,

    /// Output JSON file for the summary and top rows
    #[arg(long, default_value = "sweep_summary.json")]
    json: PathBuf,

    /// Number of top rows to display
    #[arg(long, default_value = "10")]
    topk: usize,

    /// Curve resolution
    #[arg(long, default_value = "100")]
    sample_points: usize,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let wave = WaveConfig {
        sample_points: args.sample_points.max(1),
        ..Default::default()
    };

    let results = match &args.scenarios {
        Some(path) => {
            let scenarios = load_scenarios(path)?;
            println!("Loaded {} scenarios from {:?}", scenarios.len(), path);
            evaluate_all(&scenarios, &wave)
        }
        None => {
            println!("Sampling {} scenarios (seed {})", args.samples, args.seed);
            run_sweep(&SweepConfig {
                samples: args.samples,
                seed: args.seed,
                wave,
                ..Default::default()
            })
        }
    };

    print_summary(&results.summary);
    print_topk(&results.rows, args.topk);

    write_csv(&results.rows, &args.csv)?;
    println!("Wrote all rows to {:?}", args.csv);
    write_summary_json(&results, args.topk, &args.json)?;
    println!("Wrote summary to {:?}", args.json);

    Ok(())
}
