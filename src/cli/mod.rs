//! Command-line interface for tephra.
//!
//! All CLI logic lives here rather than in `main.rs` so it can be tested.
//! `main.rs` parses arguments, installs logging and calls [`run_cli`].

mod args;
mod commands;
mod output;

pub use args::{Args, Command, EstimateArgs, RoadInput, RunArgs, DEFAULT_PLACE};
pub use commands::{
    execute_estimate, execute_run, execute_validate, run_cli, run_estimate, run_plan,
    validate_plan,
};
pub use output::{
    format_outcome_table, format_report, format_statistics, print_help, print_json,
    print_outcomes, print_report, print_version,
};
