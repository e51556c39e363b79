//! Scenario execution.
//!
//! - Runner: one exposure × thickness × surface run producing a report
//! - Plan: ordered enumeration of runs with per-run generators

pub mod plan;
pub mod runner;

pub use plan::{
    place_slug, scenario_name, ExposureSource, Scenario, ScenarioOutcome, ScenarioPlan,
    DEFAULT_SEED,
};
pub use runner::{run_scenario, run_scenario_with_bounds, VolumeReport};
