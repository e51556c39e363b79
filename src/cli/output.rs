//! CLI output formatting.
//!
//! Formatting functions return strings so tests can inspect them; the
//! `print_*` wrappers write to stdout.

use std::fmt::Write;

use serde::Serialize;

use crate::domains::area::CleanupAreaBounds;
use crate::domains::monte_carlo::SampleStatistics;
use crate::error::{CleanupError, CleanupResult};
use crate::scenarios::{ScenarioOutcome, VolumeReport};

/// Print version information.
pub fn print_version() {
    println!("tephra {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message.
pub fn print_help() {
    println!(
        r"tephra - Monte Carlo estimation of volcanic ash clean-up volumes

USAGE:
    tephra <COMMAND> [OPTIONS]

COMMANDS:
    run <plan.yaml>             Run every scenario of a plan
        --seed <N>              Override the plan seed
        --samples <N>           Override the sample count
        --out <DIR>             Override the results directory
        --parallel              Run scenarios on all available cores
        --json                  Print outcomes as JSON
        -v, --verbose           Debug logging and sample statistics

    estimate                    Estimate a single scenario
        --road-area <M2>        Total road area
        --road-length <M>       Total road length (instead of --road-area)
        --road-width <M>        Carriageway width (default: 3)
        --footprint-area <M2>   Total building footprint area
        --min <MM>              Minimum deposit thickness
        --max <MM>              Maximum deposit thickness
        --surfaces <S>          all, roads or roofs (default: all)
        --place <NAME>          Place name for the report
        --seed <N>              Random seed (default: 42)
        --samples <N>           Sample count (default: 10000)
        --json                  Print the report as JSON
        -v, --verbose           Debug logging and sample statistics

    validate <plan.yaml>        Validate a plan file

    help                        Show this help message
    version                     Show version information

EXAMPLES:
    tephra run plans/tongatapu.yaml
    tephra run plans/tongatapu.yaml --seed 7 --parallel
    tephra estimate --road-area 100000 --footprint-area 50000 --min 1 --max 10 --surfaces roads

LOGGING:
    Set RUST_LOG to control log output (default: info).
"
    );
}

/// Format the clean-up bounds and percentiles of one report.
#[must_use]
pub fn format_report(bounds: &CleanupAreaBounds, report: &VolumeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Place:          {}", report.place);
    let _ = writeln!(
        out,
        "Clean-up area:  {:.1} - {:.1} m2",
        bounds.area_min(),
        bounds.area_max()
    );
    let _ = writeln!(out, "Samples:        {}", report.raw_samples.len());
    let _ = writeln!(out, "Volume p10:     {:.2} m3", report.p10);
    let _ = writeln!(out, "Volume p50:     {:.2} m3", report.p50);
    let _ = writeln!(out, "Volume p90:     {:.2} m3", report.p90);
    out
}

/// Format descriptive statistics of the raw samples.
#[must_use]
pub fn format_statistics(stats: &SampleStatistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "count  {}", stats.count);
    for (name, value) in [
        ("mean", stats.mean),
        ("std", stats.std),
        ("min", stats.min),
        ("25%", stats.p25),
        ("50%", stats.p50),
        ("75%", stats.p75),
        ("max", stats.max),
    ] {
        let _ = writeln!(out, "{name:<6} {value:.4}");
    }
    out
}

/// Format one row per outcome.
#[must_use]
pub fn format_outcome_table(outcomes: &[ScenarioOutcome]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28} {:>14} {:>14} {:>14}",
        "Scenario", "p10 (m3)", "p50 (m3)", "p90 (m3)"
    );
    for outcome in outcomes {
        let _ = writeln!(
            out,
            "{:<28} {:>14.2} {:>14.2} {:>14.2}",
            outcome.name, outcome.report.p10, outcome.report.p50, outcome.report.p90
        );
    }
    out
}

/// Print a single-scenario estimate.
pub fn print_report(bounds: &CleanupAreaBounds, report: &VolumeReport, verbose: bool) {
    print!("{}", format_report(bounds, report));
    if verbose {
        if let Some(stats) = report.statistics() {
            println!();
            print!("{}", format_statistics(&stats));
        }
    }
}

/// Print plan outcomes.
pub fn print_outcomes(outcomes: &[ScenarioOutcome], verbose: bool) {
    print!("{}", format_outcome_table(outcomes));
    if verbose {
        for outcome in outcomes {
            if let Some(stats) = outcome.report.statistics() {
                println!("\n{}", outcome.name);
                print!("{}", format_statistics(&stats));
            }
        }
    }
}

/// Print any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CleanupResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CleanupError::serialization(format!("JSON output failed: {e}")))?;
    println!("{text}");
    Ok(())
}
