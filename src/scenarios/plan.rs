//! Scenario plans: exposure sources × thickness scenarios × surfaces.
//!
//! Every enumerated run receives its own partition of the master RNG, so a
//! plan produces bit-identical outcomes whether it runs sequentially or on
//! several threads.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::runner::{run_scenario_with_bounds, VolumeReport};
use crate::domains::area::{CleanupAreaBounds, SurfaceSelector};
use crate::domains::exposure::ExposureAreas;
use crate::domains::monte_carlo::DEFAULT_SAMPLE_COUNT;
use crate::domains::thickness::ThicknessRange;
use crate::error::{CleanupError, CleanupResult};
use crate::rng::ScenarioRng;

/// Default master seed for plans.
pub const DEFAULT_SEED: u64 = 42;

/// A thickness scenario with its display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Modelled deposit thickness range.
    pub thickness: ThicknessRange,
    /// Human-readable label, e.g. `"1-10mm"`.
    pub label: String,
}

impl Scenario {
    /// Scenario labelled by its thickness range.
    #[must_use]
    pub fn new(thickness: ThicknessRange) -> Self {
        Self {
            label: thickness.to_string(),
            thickness,
        }
    }

    /// Scenario with an explicit label.
    #[must_use]
    pub fn labelled(thickness: ThicknessRange, label: impl Into<String>) -> Self {
        Self {
            thickness,
            label: label.into(),
        }
    }
}

/// Named exposure dataset (e.g. `OSM`, `ABD`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureSource {
    /// Dataset name used in scenario names.
    pub name: String,
    /// Areas derived from the dataset.
    pub areas: ExposureAreas,
}

impl ExposureSource {
    /// Create a named exposure source.
    #[must_use]
    pub fn new(name: impl Into<String>, areas: ExposureAreas) -> Self {
        Self {
            name: name.into(),
            areas,
        }
    }
}

/// Result of one enumerated run of a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    /// Scenario name, `"{min}-{max}mm_{surfaces}_{exposure}"`.
    pub name: String,
    /// Exposure dataset name.
    pub exposure: String,
    /// Thickness scenario.
    pub scenario: Scenario,
    /// Surfaces cleaned.
    pub surfaces: SurfaceSelector,
    /// Clean-up area bounds used for sampling.
    pub bounds: CleanupAreaBounds,
    /// Volume report.
    pub report: VolumeReport,
}

/// Ordered enumeration of scenario runs for one place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioPlan {
    /// Place name, as given by the user.
    pub place: String,
    /// Master seed; each run gets its own partition.
    pub seed: u64,
    /// Monte Carlo draws per run.
    pub sample_count: usize,
    /// Exposure datasets, outermost loop.
    pub exposures: Vec<ExposureSource>,
    /// Thickness scenarios, middle loop.
    pub scenarios: Vec<Scenario>,
    /// Surface selectors, innermost loop.
    pub surfaces: Vec<SurfaceSelector>,
}

/// One enumerated run with its owned generator.
struct RunJob<'a> {
    exposure: &'a ExposureSource,
    scenario: &'a Scenario,
    surfaces: SurfaceSelector,
    rng: ScenarioRng,
}

impl ScenarioPlan {
    /// Create a plan over all three surface selectors with the default
    /// seed and sample count.
    #[must_use]
    pub fn new(
        place: impl Into<String>,
        exposures: Vec<ExposureSource>,
        scenarios: Vec<Scenario>,
    ) -> Self {
        Self {
            place: place.into(),
            seed: DEFAULT_SEED,
            sample_count: DEFAULT_SAMPLE_COUNT,
            exposures,
            scenarios,
            surfaces: SurfaceSelector::ALL.to_vec(),
        }
    }

    /// The Tongatapu study: 1-10, 20-30 and 30-60 mm deposits over all,
    /// roads and roofs, for the `OSM` and `ABD` exposure datasets.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in thickness ranges; the `Result` carries
    /// range validation.
    pub fn tongatapu(osm: ExposureAreas, abd: ExposureAreas) -> CleanupResult<Self> {
        let scenarios = [(1.0, 10.0), (20.0, 30.0), (30.0, 60.0)]
            .into_iter()
            .map(|(min, max)| ThicknessRange::new(min, max).map(Scenario::new))
            .collect::<CleanupResult<Vec<_>>>()?;

        Ok(Self::new(
            "Tongatapu",
            vec![ExposureSource::new("OSM", osm), ExposureSource::new("ABD", abd)],
            scenarios,
        ))
    }

    /// Set the master seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the Monte Carlo sample count.
    #[must_use]
    pub const fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Restrict the surface selectors.
    #[must_use]
    pub fn with_surfaces(mut self, surfaces: Vec<SurfaceSelector>) -> Self {
        self.surfaces = surfaces;
        self
    }

    /// Number of enumerated runs.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.exposures.len() * self.scenarios.len() * self.surfaces.len()
    }

    /// File-name slug for the place: text before the first comma with spaces
    /// removed, or the whole name with spaces replaced by underscores.
    #[must_use]
    pub fn place_slug(&self) -> String {
        place_slug(&self.place)
    }

    /// Run every scenario on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns the first run error (e.g. zero sample count).
    pub fn run(&self) -> CleanupResult<Vec<ScenarioOutcome>> {
        info!(place = %self.place, runs = self.run_count(), seed = self.seed, "Running scenario plan");
        self.jobs().into_iter().map(|job| self.execute(job)).collect()
    }

    /// Run scenarios on up to `workers` scoped threads.
    ///
    /// Outcomes are returned in enumeration order and equal those of
    /// [`ScenarioPlan::run`] for the same seed.
    ///
    /// # Errors
    ///
    /// Returns the first run error, or a configuration error if a worker
    /// thread panicked.
    pub fn run_parallel(&self, workers: usize) -> CleanupResult<Vec<ScenarioOutcome>> {
        let jobs = self.jobs();
        if jobs.is_empty() {
            return Ok(Vec::new());
        }
        let workers = workers.clamp(1, jobs.len());
        let chunk_size = jobs.len().div_ceil(workers);
        info!(
            place = %self.place,
            runs = jobs.len(),
            workers,
            seed = self.seed,
            "Running scenario plan in parallel"
        );

        let mut chunks: Vec<Vec<RunJob<'_>>> = Vec::with_capacity(workers);
        let mut remaining = jobs.into_iter().peekable();
        while remaining.peek().is_some() {
            chunks.push(remaining.by_ref().take(chunk_size).collect());
        }

        let chunk_results: Vec<CleanupResult<Vec<ScenarioOutcome>>> = std::thread::scope(|s| {
            let handles: Vec<_> = chunks
                .into_iter()
                .map(|chunk| {
                    s.spawn(move || {
                        chunk
                            .into_iter()
                            .map(|job| self.execute(job))
                            .collect::<CleanupResult<Vec<_>>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(CleanupError::config("scenario worker panicked")))
                })
                .collect()
        });

        let mut outcomes = Vec::with_capacity(self.run_count());
        for chunk in chunk_results {
            outcomes.extend(chunk?);
        }
        Ok(outcomes)
    }

    fn jobs(&self) -> Vec<RunJob<'_>> {
        let mut master = ScenarioRng::new(self.seed);
        let mut rngs = master.partition(self.run_count()).into_iter();

        let mut jobs = Vec::with_capacity(self.run_count());
        for exposure in &self.exposures {
            for scenario in &self.scenarios {
                for &surfaces in &self.surfaces {
                    if let Some(rng) = rngs.next() {
                        jobs.push(RunJob {
                            exposure,
                            scenario,
                            surfaces,
                            rng,
                        });
                    }
                }
            }
        }
        jobs
    }

    fn execute(&self, job: RunJob<'_>) -> CleanupResult<ScenarioOutcome> {
        let RunJob {
            exposure,
            scenario,
            surfaces,
            mut rng,
        } = job;
        let name = scenario_name(&scenario.thickness, surfaces, &exposure.name);
        info!(scenario = %name, "Running scenario");

        let (bounds, report) = run_scenario_with_bounds(
            &exposure.areas,
            &scenario.thickness,
            surfaces,
            &self.place,
            self.sample_count,
            &mut rng,
        )?;

        Ok(ScenarioOutcome {
            name,
            exposure: exposure.name.clone(),
            scenario: scenario.clone(),
            surfaces,
            bounds,
            report,
        })
    }
}

/// Scenario name in the form `"{min}-{max}mm_{surfaces}_{exposure}"`.
#[must_use]
pub fn scenario_name(thickness: &ThicknessRange, surfaces: SurfaceSelector, exposure: &str) -> String {
    format!("{thickness}_{surfaces}_{exposure}")
}

/// File-name slug for a place name.
#[must_use]
pub fn place_slug(place: &str) -> String {
    match place.split_once(',') {
        Some((head, _)) => head.replace(' ', ""),
        None => place.replace(' ', "_"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_plan() -> ScenarioPlan {
        let osm = ExposureAreas::from_surfaces(100_000.0, 50_000.0).unwrap();
        let abd = ExposureAreas::from_surfaces(80_000.0, 70_000.0).unwrap();
        ScenarioPlan::tongatapu(osm, abd).unwrap().with_sample_count(200)
    }

    #[test]
    fn test_tongatapu_plan_shape() {
        let plan = small_plan();
        assert_eq!(plan.place, "Tongatapu");
        assert_eq!(plan.exposures.len(), 2);
        assert_eq!(plan.scenarios.len(), 3);
        assert_eq!(plan.surfaces, SurfaceSelector::ALL.to_vec());
        assert_eq!(plan.run_count(), 18);
        assert_eq!(plan.scenarios[1].label, "20-30mm");
    }

    #[test]
    fn test_enumeration_order_and_names() {
        let outcomes = small_plan().run().unwrap();
        assert_eq!(outcomes.len(), 18);
        assert_eq!(outcomes[0].name, "1-10mm_all_OSM");
        assert_eq!(outcomes[1].name, "1-10mm_roads_OSM");
        assert_eq!(outcomes[2].name, "1-10mm_roofs_OSM");
        assert_eq!(outcomes[3].name, "20-30mm_all_OSM");
        assert_eq!(outcomes[17].name, "30-60mm_roofs_ABD");
        assert!(outcomes.iter().all(|o| o.report.raw_samples.len() == 200));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let plan = small_plan();
        let sequential = plan.run().unwrap();
        for workers in [1, 3, 8, 64] {
            let parallel = plan.run_parallel(workers).unwrap();
            assert_eq!(parallel, sequential, "workers = {workers}");
        }
    }

    #[test]
    fn test_seed_changes_samples() {
        let a = small_plan().with_seed(1).run().unwrap();
        let b = small_plan().with_seed(2).run().unwrap();
        assert_ne!(a[0].report.raw_samples, b[0].report.raw_samples);
    }

    #[test]
    fn test_runs_use_independent_streams() {
        let outcomes = small_plan().run().unwrap();
        // Same exposure and surfaces, different scenarios: independent draws
        assert_ne!(outcomes[1].report.raw_samples, outcomes[4].report.raw_samples);
    }

    #[test]
    fn test_zero_samples_fails_plan() {
        let plan = small_plan().with_sample_count(0);
        assert!(plan.run().is_err());
        assert!(plan.run_parallel(4).is_err());
    }

    #[test]
    fn test_empty_plan() {
        let plan = ScenarioPlan::new("Nowhere", Vec::new(), Vec::new());
        assert!(plan.run().unwrap().is_empty());
        assert!(plan.run_parallel(4).unwrap().is_empty());
    }

    #[test]
    fn test_with_surfaces() {
        let plan = small_plan().with_surfaces(vec![SurfaceSelector::Roofs]);
        assert_eq!(plan.run_count(), 6);
        let outcomes = plan.run().unwrap();
        assert!(outcomes.iter().all(|o| o.surfaces == SurfaceSelector::Roofs));
    }

    #[test]
    fn test_scenario_labels() {
        let range = ThicknessRange::new(1.0, 10.0).unwrap();
        assert_eq!(Scenario::new(range).label, "1-10mm");
        assert_eq!(Scenario::labelled(range, "light").label, "light");
    }

    #[test]
    fn test_place_slug() {
        assert_eq!(place_slug("Tongatapu"), "Tongatapu");
        assert_eq!(place_slug("Nuku'alofa, Tonga"), "Nuku'alofa");
        assert_eq!(place_slug("Port Vila, Vanuatu"), "PortVila");
        assert_eq!(place_slug("Port Vila"), "Port_Vila");
    }
}
