use clap::Parser;
use std::path::Path;

use insulin_wave::cli::{Cli, Command};
use insulin_wave::engine::predictor::{level_at, threshold_crossings};
use insulin_wave::engine::{KeywordClassifier, WaveConfig, compute_insulin_wave_with};
use insulin_wave::error::Result;
use insulin_wave::interface::{
    collect_scenario, display_prediction, display_wave_result, prompt_yes_no, write_curve_csv,
};
use insulin_wave::logging;
use insulin_wave::models::WaveResult;
use insulin_wave::scenario::{Scenario, load_catalog, load_scenario, save_scenario};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Compute { json } => cmd_compute(&cli.file, json, cli.verbose),
        Command::Curve { output, points } => cmd_curve(&cli.file, &output, points),
        Command::Predict { minutes } => cmd_predict(&cli.file, &minutes),
        Command::Enter { catalog, save } => cmd_enter(&cli.file, &catalog, save, cli.verbose),
    }
}

/// Resolve the scenario's meal and run the engine.
fn compute(scenario: &Scenario, config: &WaveConfig) -> Result<WaveResult> {
    let nutrients = scenario.resolve_nutrients(&KeywordClassifier::default())?;
    Ok(compute_insulin_wave_with(
        &nutrients,
        &scenario.context,
        &scenario.profile,
        config,
    ))
}

/// Compute and print the wave for a scenario file.
fn cmd_compute(file_path: &str, json: bool, verbose: bool) -> Result<()> {
    let scenario = load_scenario(file_path)?;
    let result = compute(&scenario, &WaveConfig::default())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_wave_result(&result, verbose);
    }
    Ok(())
}

/// Export the sampled curve of a scenario to CSV.
fn cmd_curve(file_path: &str, output: &str, points: usize) -> Result<()> {
    let scenario = load_scenario(file_path)?;
    let config = WaveConfig {
        sample_points: points.max(1),
        ..Default::default()
    };
    let result = compute(&scenario, &config)?;

    write_curve_csv(&result.curve.points, Path::new(output))?;
    println!(
        "Wrote {} curve points ({} min wave) to {}",
        result.curve.len(),
        result.wave_minutes,
        output
    );
    Ok(())
}

/// Print insulin levels at the requested minutes.
fn cmd_predict(file_path: &str, minutes: &[f64]) -> Result<()> {
    let scenario = load_scenario(file_path)?;
    let result = compute(&scenario, &WaveConfig::default())?;

    let readings: Vec<_> = minutes
        .iter()
        .map(|&m| level_at(&result.curve.points, m))
        .collect();
    display_prediction(&readings, &threshold_crossings(&result.curve.points));
    Ok(())
}

/// Enter a meal interactively, compute it and optionally save the scenario.
fn cmd_enter(file_path: &str, catalog_path: &str, save: bool, verbose: bool) -> Result<()> {
    let path = Path::new(catalog_path);

    if !path.exists() {
        eprintln!("Product catalog not found: {}", catalog_path);
        eprintln!("Pass --catalog with a JSON array of products (per-100 g nutrients).");
        return Ok(());
    }

    let catalog = load_catalog(path)?;
    println!("Loaded {} products", catalog.len());
    println!();

    let scenario = collect_scenario(&catalog)?;
    let result = compute(&scenario, &WaveConfig::default())?;
    display_wave_result(&result, verbose);

    if save || prompt_yes_no("Save this scenario?", false)? {
        save_scenario(file_path, &scenario)?;
        println!("Scenario saved to {}", file_path);
    }
    Ok(())
}
