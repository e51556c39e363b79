//! CLI argument parsing.
//!
//! Parsing works on any iterator of strings so it can be tested without
//! touching the process environment.

use std::path::PathBuf;
use std::str::FromStr;

use crate::domains::area::SurfaceSelector;
use crate::domains::exposure::DEFAULT_ROAD_WIDTH_M;
use crate::domains::monte_carlo::DEFAULT_SAMPLE_COUNT;
use crate::scenarios::DEFAULT_SEED;

/// Place name used by `estimate` when `--place` is absent.
pub const DEFAULT_PLACE: &str = "Unnamed";

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run every scenario of a plan file
    Run(RunArgs),
    /// Estimate one scenario from command-line values
    Estimate(EstimateArgs),
    /// Validate a plan file
    Validate {
        /// Path to the plan YAML file.
        plan_path: PathBuf,
    },
    /// Show help
    Help,
    /// Show version
    Version,
    /// Arguments could not be parsed
    Invalid {
        /// What was wrong.
        message: String,
    },
}

/// Options of the `run` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Path to the plan YAML file.
    pub plan_path: PathBuf,
    /// Optional seed override.
    pub seed_override: Option<u64>,
    /// Optional sample count override.
    pub samples_override: Option<usize>,
    /// Optional results directory override.
    pub output_override: Option<PathBuf>,
    /// Run scenarios on several threads.
    pub parallel: bool,
    /// Print outcomes as JSON.
    pub json: bool,
    /// Enable verbose output.
    pub verbose: bool,
}

/// How the road surface is measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoadInput {
    /// Total road area (m²).
    Area(f64),
    /// Total road length (m) and carriageway width (m).
    Length {
        /// Road length (m).
        length_m: f64,
        /// Carriageway width (m).
        width_m: f64,
    },
}

/// Options of the `estimate` command.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateArgs {
    /// Road measurement.
    pub road: RoadInput,
    /// Total building footprint area (m²).
    pub footprint_area_m2: f64,
    /// Minimum deposit thickness (mm).
    pub min_mm: f64,
    /// Maximum deposit thickness (mm).
    pub max_mm: f64,
    /// Surfaces to clean.
    pub surfaces: SurfaceSelector,
    /// Place name for the report.
    pub place: String,
    /// Random seed.
    pub seed: u64,
    /// Monte Carlo sample count.
    pub samples: usize,
    /// Print the report as JSON.
    pub json: bool,
    /// Enable verbose output.
    pub verbose: bool,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// The first item is the program name.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Whether debug logging was requested.
    #[must_use]
    pub fn verbose(&self) -> bool {
        match &self.command {
            Command::Run(run) => run.verbose,
            Command::Estimate(estimate) => estimate.verbose,
            _ => false,
        }
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let rest = &args[2..];
        let parsed = match args[1].as_str() {
            "run" => parse_run(rest),
            "estimate" => parse_estimate(rest),
            "validate" => rest
                .first()
                .map(|path| Command::Validate {
                    plan_path: PathBuf::from(path),
                })
                .ok_or_else(|| "'validate' requires a plan path".to_string()),
            "-h" | "--help" | "help" => Ok(Command::Help),
            "-V" | "--version" | "version" => Ok(Command::Version),
            unknown => Err(format!("Unknown command: {unknown}")),
        };

        Self {
            command: parsed.unwrap_or_else(|message| Command::Invalid { message }),
        }
    }
}

fn parse_run(rest: &[String]) -> Result<Command, String> {
    let Some(path) = rest.first() else {
        return Err("'run' requires a plan path".to_string());
    };

    let mut run = RunArgs {
        plan_path: PathBuf::from(path),
        seed_override: None,
        samples_override: None,
        output_override: None,
        parallel: false,
        json: false,
        verbose: false,
    };

    let mut flags = FlagReader::new(&rest[1..]);
    while let Some(flag) = flags.next_flag() {
        match flag {
            "--seed" => run.seed_override = Some(flags.value(flag)?),
            "--samples" => run.samples_override = Some(flags.value(flag)?),
            "--out" => run.output_override = Some(flags.value(flag)?),
            "--parallel" => run.parallel = true,
            "--json" => run.json = true,
            "-v" | "--verbose" => run.verbose = true,
            other => return Err(format!("Unknown option for 'run': {other}")),
        }
    }

    Ok(Command::Run(run))
}

fn parse_estimate(rest: &[String]) -> Result<Command, String> {
    let mut road_area = None;
    let mut road_length = None;
    let mut road_width = DEFAULT_ROAD_WIDTH_M;
    let mut footprint = None;
    let mut min_mm = None;
    let mut max_mm = None;
    let mut surfaces = SurfaceSelector::default();
    let mut place = DEFAULT_PLACE.to_string();
    let mut seed = DEFAULT_SEED;
    let mut samples = DEFAULT_SAMPLE_COUNT;
    let mut json = false;
    let mut verbose = false;

    let mut flags = FlagReader::new(rest);
    while let Some(flag) = flags.next_flag() {
        match flag {
            "--road-area" => road_area = Some(flags.value(flag)?),
            "--road-length" => road_length = Some(flags.value(flag)?),
            "--road-width" => road_width = flags.value(flag)?,
            "--footprint-area" => footprint = Some(flags.value(flag)?),
            "--min" => min_mm = Some(flags.value(flag)?),
            "--max" => max_mm = Some(flags.value(flag)?),
            "--surfaces" => surfaces = flags.value(flag)?,
            "--place" => place = flags.value(flag)?,
            "--seed" => seed = flags.value(flag)?,
            "--samples" => samples = flags.value(flag)?,
            "--json" => json = true,
            "-v" | "--verbose" => verbose = true,
            other => return Err(format!("Unknown option for 'estimate': {other}")),
        }
    }

    let road = match (road_area, road_length) {
        (Some(area), None) => RoadInput::Area(area),
        (None, Some(length_m)) => RoadInput::Length {
            length_m,
            width_m: road_width,
        },
        (Some(_), Some(_)) => {
            return Err("Give either --road-area or --road-length, not both".to_string())
        }
        (None, None) => return Err("'estimate' requires --road-area or --road-length".to_string()),
    };

    Ok(Command::Estimate(EstimateArgs {
        road,
        footprint_area_m2: footprint.ok_or("'estimate' requires --footprint-area")?,
        min_mm: min_mm.ok_or("'estimate' requires --min")?,
        max_mm: max_mm.ok_or("'estimate' requires --max")?,
        surfaces,
        place,
        seed,
        samples,
        json,
        verbose,
    }))
}

/// Walks `--flag value` pairs.
struct FlagReader<'a> {
    args: &'a [String],
    pos: usize,
}

impl<'a> FlagReader<'a> {
    fn new(args: &'a [String]) -> Self {
        Self { args, pos: 0 }
    }

    fn next_flag(&mut self) -> Option<&'a str> {
        let flag = self.args.get(self.pos)?;
        self.pos += 1;
        Some(flag.as_str())
    }

    fn value<T: FromStr>(&mut self, flag: &str) -> Result<T, String> {
        let raw = self
            .args
            .get(self.pos)
            .ok_or_else(|| format!("{flag} requires a value"))?;
        self.pos += 1;
        raw.parse()
            .map_err(|_| format!("Invalid value for {flag}: {raw}"))
    }
}
