//! Plan configuration with YAML schema and validation.
//!
//! Mistake-proofing happens in three layers:
//! - Type-safe configuration structs (`deny_unknown_fields`)
//! - Declarative field checks via `validator`
//! - Semantic validation before a [`ScenarioPlan`] is built

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::domains::area::SurfaceSelector;
use crate::domains::exposure::{ExposureAreas, DEFAULT_ROAD_WIDTH_M};
use crate::domains::monte_carlo::DEFAULT_SAMPLE_COUNT;
use crate::domains::thickness::ThicknessRange;
use crate::error::{CleanupError, CleanupResult};
use crate::scenarios::{ExposureSource, Scenario, ScenarioPlan, DEFAULT_SEED};

/// Top-level clean-up plan configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CleanupConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Name of the modelled place.
    #[validate(length(min = 1))]
    pub place: String,

    /// Reproducibility settings.
    #[validate(nested)]
    #[serde(default)]
    pub reproducibility: ReproducibilityConfig,

    /// Monte Carlo settings.
    #[validate(nested)]
    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,

    /// Exposure datasets, in run order.
    #[validate(length(min = 1))]
    pub exposure: Vec<ExposureConfig>,

    /// Thickness scenarios, in run order.
    #[validate(length(min = 1))]
    pub scenarios: Vec<ScenarioConfig>,

    /// Surface selectors, in run order.
    #[validate(length(min = 1))]
    #[serde(default = "default_surfaces")]
    pub surfaces: Vec<SurfaceSelector>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

fn default_surfaces() -> Vec<SurfaceSelector> {
    SurfaceSelector::ALL.to_vec()
}

impl CleanupConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> CleanupResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> CleanupResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> CleanupResult<String> {
        serde_yaml::to_string(self).map_err(|e| CleanupError::serialization(e.to_string()))
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder(place: impl Into<String>) -> CleanupConfigBuilder {
        CleanupConfigBuilder::new(place)
    }

    /// Run declarative and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn check(&self) -> CleanupResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> CleanupResult<()> {
        for source in &self.exposure {
            source.validate()?;
            source.areas()?;
        }

        for scenario in &self.scenarios {
            scenario.validate()?;
            scenario.thickness()?;
        }

        let mut names: Vec<&str> = self.exposure.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(CleanupError::config(format!(
                "Exposure dataset '{}' is listed more than once",
                pair[0]
            )));
        }

        Ok(())
    }

    /// Build the scenario plan this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns error if any exposure or scenario is invalid.
    pub fn to_plan(&self) -> CleanupResult<ScenarioPlan> {
        let exposures = self
            .exposure
            .iter()
            .map(|e| Ok(ExposureSource::new(e.name.clone(), e.areas()?)))
            .collect::<CleanupResult<Vec<_>>>()?;

        let scenarios = self
            .scenarios
            .iter()
            .map(ScenarioConfig::scenario)
            .collect::<CleanupResult<Vec<_>>>()?;

        Ok(ScenarioPlan::new(self.place.clone(), exposures, scenarios)
            .with_seed(self.reproducibility.seed)
            .with_sample_count(self.monte_carlo.samples)
            .with_surfaces(self.surfaces.clone()))
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug)]
pub struct CleanupConfigBuilder {
    place: String,
    seed: Option<u64>,
    samples: Option<usize>,
    exposure: Vec<ExposureConfig>,
    scenarios: Vec<ScenarioConfig>,
    surfaces: Option<Vec<SurfaceSelector>>,
    output: Option<OutputConfig>,
}

impl CleanupConfigBuilder {
    fn new(place: impl Into<String>) -> Self {
        Self {
            place: place.into(),
            seed: None,
            samples: None,
            exposure: Vec::new(),
            scenarios: Vec::new(),
            surfaces: None,
            output: None,
        }
    }

    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the Monte Carlo sample count.
    #[must_use]
    pub const fn samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Add an exposure dataset given by road and footprint area.
    #[must_use]
    pub fn exposure_areas(mut self, name: impl Into<String>, road_area_m2: f64, footprint_area_m2: f64) -> Self {
        self.exposure.push(ExposureConfig {
            name: name.into(),
            road_length_m: None,
            road_area_m2: Some(road_area_m2),
            road_width_m: None,
            footprint_area_m2,
        });
        self
    }

    /// Add an exposure dataset given by road length and footprint area.
    #[must_use]
    pub fn exposure_length(mut self, name: impl Into<String>, road_length_m: f64, footprint_area_m2: f64) -> Self {
        self.exposure.push(ExposureConfig {
            name: name.into(),
            road_length_m: Some(road_length_m),
            road_area_m2: None,
            road_width_m: None,
            footprint_area_m2,
        });
        self
    }

    /// Add a thickness scenario.
    #[must_use]
    pub fn scenario(mut self, min_mm: f64, max_mm: f64) -> Self {
        self.scenarios.push(ScenarioConfig {
            min_mm,
            max_mm,
            label: None,
        });
        self
    }

    /// Restrict surface selectors.
    #[must_use]
    pub fn surfaces(mut self, surfaces: Vec<SurfaceSelector>) -> Self {
        self.surfaces = Some(surfaces);
        self
    }

    /// Set output configuration.
    #[must_use]
    pub fn output(mut self, output: OutputConfig) -> Self {
        self.output = Some(output);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> CleanupConfig {
        CleanupConfig {
            schema_version: default_schema_version(),
            place: self.place,
            reproducibility: ReproducibilityConfig {
                seed: self.seed.unwrap_or(DEFAULT_SEED),
            },
            monte_carlo: MonteCarloConfig {
                samples: self.samples.unwrap_or(DEFAULT_SAMPLE_COUNT),
            },
            exposure: self.exposure,
            scenarios: self.scenarios,
            surfaces: self.surfaces.unwrap_or_else(default_surfaces),
            output: self.output.unwrap_or_default(),
        }
    }
}

/// Reproducibility settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ReproducibilityConfig {
    /// Master seed for all RNG.
    pub seed: u64,
}

impl Default for ReproducibilityConfig {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED }
    }
}

/// Monte Carlo configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct MonteCarloConfig {
    /// Number of samples per scenario run.
    #[validate(range(min = 1))]
    #[serde(default = "default_samples")]
    pub samples: usize,
}

const fn default_samples() -> usize {
    DEFAULT_SAMPLE_COUNT
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
        }
    }
}

/// One exposure dataset, summarised to totals.
///
/// Exactly one of `road_length_m` and `road_area_m2` must be given.
/// `road_width_m` only applies to `road_length_m` and defaults to 3 m.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ExposureConfig {
    /// Dataset name, e.g. `OSM`.
    #[validate(length(min = 1))]
    pub name: String,
    /// Total road length (m).
    #[validate(range(min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_length_m: Option<f64>,
    /// Total road area (m²).
    #[validate(range(min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_area_m2: Option<f64>,
    /// Carriageway width applied to road length (m).
    #[validate(range(min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_width_m: Option<f64>,
    /// Total building footprint area (m²).
    #[validate(range(min = 0.0))]
    pub footprint_area_m2: f64,
}

impl ExposureConfig {
    /// Validated exposure areas.
    ///
    /// # Errors
    ///
    /// Returns error unless exactly one road measurement is given, if a
    /// width accompanies a road area, or if any value is negative or non-finite.
    pub fn areas(&self) -> CleanupResult<ExposureAreas> {
        match (self.road_length_m, self.road_area_m2) {
            (Some(length), None) => ExposureAreas::from_road_length(
                length,
                self.road_width_m.unwrap_or(DEFAULT_ROAD_WIDTH_M),
                self.footprint_area_m2,
            ),
            (None, Some(_)) if self.road_width_m.is_some() => Err(CleanupError::config(format!(
                "Exposure '{}': road_width_m only applies to road_length_m",
                self.name
            ))),
            (None, Some(area)) => ExposureAreas::from_surfaces(area, self.footprint_area_m2),
            (Some(_), Some(_)) => Err(CleanupError::config(format!(
                "Exposure '{}' gives both road_length_m and road_area_m2",
                self.name
            ))),
            (None, None) => Err(CleanupError::config(format!(
                "Exposure '{}' needs road_length_m or road_area_m2",
                self.name
            ))),
        }
    }
}

/// One thickness scenario.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Minimum deposit thickness (mm).
    #[validate(range(min = 0.0))]
    pub min_mm: f64,
    /// Maximum deposit thickness (mm).
    #[validate(range(min = 0.0))]
    pub max_mm: f64,
    /// Optional label; defaults to `"{min}-{max}mm"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ScenarioConfig {
    /// Validated thickness range.
    ///
    /// # Errors
    ///
    /// Returns error if the range is invalid.
    pub fn thickness(&self) -> CleanupResult<ThicknessRange> {
        ThicknessRange::new(self.min_mm, self.max_mm)
    }

    /// Scenario with its label.
    ///
    /// # Errors
    ///
    /// Returns error if the range is invalid.
    pub fn scenario(&self) -> CleanupResult<Scenario> {
        let thickness = self.thickness()?;
        Ok(match &self.label {
            Some(label) => Scenario::labelled(thickness, label.clone()),
            None => Scenario::new(thickness),
        })
    }
}

/// Result file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Results directory.
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    /// Write per-scenario and combined summary CSVs.
    #[serde(default = "default_true")]
    pub summary_csv: bool,
    /// Write raw sample CSVs.
    #[serde(default = "default_true")]
    pub raw_csv: bool,
    /// Write all outcomes to `<slug>_outcomes.json`.
    #[serde(default)]
    pub json: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("Results")
}

const fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            summary_csv: true,
            raw_csv: true,
            json: false,
        }
    }
}
