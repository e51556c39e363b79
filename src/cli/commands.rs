//! CLI command handlers.
//!
//! Each command has an `execute_*` function returning a `CleanupResult` and a
//! thin wrapper that prints and maps the outcome to an exit code.

use std::path::Path;
use std::process::ExitCode;
use std::thread;

use serde::Serialize;
use tracing::{debug, error, warn};

use super::args::{Args, Command, EstimateArgs, RoadInput, RunArgs};
use super::output::{print_help, print_json, print_outcomes, print_report, print_version};
use crate::config::CleanupConfig;
use crate::domains::area::CleanupAreaBounds;
use crate::domains::exposure::ExposureAreas;
use crate::domains::thickness::ThicknessRange;
use crate::error::CleanupResult;
use crate::export::ReportWriter;
use crate::rng::ScenarioRng;
use crate::scenarios::{run_scenario_with_bounds, ScenarioOutcome, VolumeReport};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Run(run) => run_plan(&run),
        Command::Estimate(estimate) => run_estimate(&estimate),
        Command::Validate { plan_path } => validate_plan(&plan_path),
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
        Command::Invalid { message } => {
            eprintln!("Error: {message}");
            eprintln!("Run 'tephra help' for usage.");
            ExitCode::from(2)
        }
    }
}

/// Load a plan, apply overrides, run it and export the results.
///
/// # Errors
///
/// Returns error if the plan cannot be loaded, a run fails or export fails.
pub fn execute_run(run: &RunArgs) -> CleanupResult<Vec<ScenarioOutcome>> {
    let mut config = CleanupConfig::load(&run.plan_path)?;
    if let Some(seed) = run.seed_override {
        config.reproducibility.seed = seed;
    }
    if let Some(samples) = run.samples_override {
        config.monte_carlo.samples = samples;
    }
    if let Some(dir) = &run.output_override {
        config.output.directory.clone_from(dir);
    }
    config.check()?;

    let plan = config.to_plan()?;
    let outcomes = if run.parallel {
        let workers = thread::available_parallelism().map_or(1, usize::from);
        debug!(workers, "Using parallel scenario runner");
        plan.run_parallel(workers)?
    } else {
        plan.run()?
    };

    ReportWriter::from_config(&config.output).write_all(&plan.place_slug(), &outcomes)?;
    Ok(outcomes)
}

/// Estimate one scenario from command-line values.
///
/// # Errors
///
/// Returns error if any value is invalid.
pub fn execute_estimate(
    estimate: &EstimateArgs,
) -> CleanupResult<(CleanupAreaBounds, VolumeReport)> {
    let exposure = match estimate.road {
        RoadInput::Area(area) => ExposureAreas::from_surfaces(area, estimate.footprint_area_m2)?,
        RoadInput::Length { length_m, width_m } => {
            ExposureAreas::from_road_length(length_m, width_m, estimate.footprint_area_m2)?
        }
    };
    let thickness = ThicknessRange::new(estimate.min_mm, estimate.max_mm)?;
    let mut rng = ScenarioRng::new(estimate.seed);

    run_scenario_with_bounds(
        &exposure,
        &thickness,
        estimate.surfaces,
        &estimate.place,
        estimate.samples,
        &mut rng,
    )
}

/// Load and validate a plan file.
///
/// # Errors
///
/// Returns the first load or validation failure.
pub fn execute_validate(path: &Path) -> CleanupResult<CleanupConfig> {
    let config = CleanupConfig::load(path)?;
    config.to_plan()?;
    Ok(config)
}

/// Run a plan file.
#[must_use]
pub fn run_plan(run: &RunArgs) -> ExitCode {
    match execute_run(run) {
        Ok(outcomes) => {
            if run.json {
                return emit_json(&outcomes);
            }
            print_outcomes(&outcomes, run.verbose);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Estimate a single scenario.
#[must_use]
pub fn run_estimate(estimate: &EstimateArgs) -> ExitCode {
    match execute_estimate(estimate) {
        Ok((bounds, report)) => {
            if estimate.json {
                #[derive(Serialize)]
                struct Estimate<'a> {
                    bounds: &'a CleanupAreaBounds,
                    report: &'a VolumeReport,
                }
                return emit_json(&Estimate {
                    bounds: &bounds,
                    report: &report,
                });
            }
            print_report(&bounds, &report, estimate.verbose);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Validate a plan file.
#[must_use]
pub fn validate_plan(path: &Path) -> ExitCode {
    println!("Validating: {}\n", path.display());
    match execute_validate(path) {
        Ok(config) => {
            let runs = config.exposure.len() * config.scenarios.len() * config.surfaces.len();
            println!("✓ Plan is valid");
            println!("  Place:     {}", config.place);
            println!("  Seed:      {}", config.reproducibility.seed);
            println!("  Samples:   {}", config.monte_carlo.samples);
            println!("  Runs:      {runs}");
            println!("\nNext step:");
            println!("  • Run: tephra run {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("✗ Plan validation FAILED");
            println!("  {e}");
            ExitCode::from(1)
        }
    }
}

fn emit_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match print_json(value) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(e: &crate::error::CleanupError) -> ExitCode {
    if e.is_input_error() {
        warn!(error = %e, "Rejected input");
    } else {
        error!(error = %e, "Command failed");
    }
    eprintln!("Error: {e}");
    ExitCode::from(1)
}
