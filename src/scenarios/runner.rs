//! Single scenario execution: area bounds, then volume sampling.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domains::area::{bounds_for_exposure, CleanupAreaBounds, SurfaceSelector};
use crate::domains::exposure::ExposureAreas;
use crate::domains::monte_carlo::{SampleStatistics, VolumeSampler};
use crate::domains::thickness::ThicknessRange;
use crate::error::CleanupResult;
use crate::rng::ScenarioRng;

/// Outcome of one scenario run. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeReport {
    /// Place the exposure describes.
    pub place: String,
    /// 10th percentile volume (m³).
    pub p10: f64,
    /// 50th percentile volume (m³).
    pub p50: f64,
    /// 90th percentile volume (m³).
    pub p90: f64,
    /// Every sampled volume (m³), in generation order.
    pub raw_samples: Vec<f64>,
}

impl VolumeReport {
    /// Descriptive statistics of the raw samples.
    #[must_use]
    pub fn statistics(&self) -> Option<SampleStatistics> {
        SampleStatistics::from_samples(&self.raw_samples)
    }
}

/// Run one scenario.
///
/// Bounds come from `thickness.max_mm()`; volumes are drawn from `rng`,
/// which the caller owns so runs can be seeded and parallelised.
///
/// # Example
///
/// ```rust
/// use tephra_cleanup::prelude::*;
///
/// let exposure = ExposureAreas::from_surfaces(100_000.0, 50_000.0).unwrap();
/// let thickness = ThicknessRange::new(1.0, 10.0).unwrap();
/// let mut rng = ScenarioRng::new(42);
///
/// let report = run_scenario(
///     &exposure, &thickness, SurfaceSelector::Roads, "Tongatapu", 10_000, &mut rng,
/// ).unwrap();
/// assert_eq!(report.raw_samples.len(), 10_000);
/// assert!(report.p10 <= report.p50 && report.p50 <= report.p90);
/// ```
///
/// # Errors
///
/// Returns `InvalidSampleCount` if `sample_count` is zero.
pub fn run_scenario(
    exposure: &ExposureAreas,
    thickness: &ThicknessRange,
    surfaces: SurfaceSelector,
    place_name: &str,
    sample_count: usize,
    rng: &mut ScenarioRng,
) -> CleanupResult<VolumeReport> {
    run_scenario_with_bounds(exposure, thickness, surfaces, place_name, sample_count, rng)
        .map(|(_, report)| report)
}

/// Run one scenario and also return the clean-up area bounds it used.
///
/// # Errors
///
/// Returns `InvalidSampleCount` if `sample_count` is zero.
pub fn run_scenario_with_bounds(
    exposure: &ExposureAreas,
    thickness: &ThicknessRange,
    surfaces: SurfaceSelector,
    place_name: &str,
    sample_count: usize,
    rng: &mut ScenarioRng,
) -> CleanupResult<(CleanupAreaBounds, VolumeReport)> {
    let sampler = VolumeSampler::new(sample_count)?;

    debug!(
        place = place_name,
        max_mm = thickness.max_mm(),
        regime = ?thickness.regime(),
        %surfaces,
        "Determining clean-up threshold"
    );
    let bounds = bounds_for_exposure(exposure, thickness.max_mm(), surfaces);
    if bounds.is_zero() {
        info!(place = place_name, "No ash expected to require removal");
    }

    let volumes = sampler.sample(thickness, &bounds, rng);
    info!(
        place = place_name,
        %thickness,
        %surfaces,
        area_min = bounds.area_min(),
        area_max = bounds.area_max(),
        p50 = volumes.p50,
        "Estimated clean-up volume"
    );

    Ok((
        bounds,
        VolumeReport {
            place: place_name.to_string(),
            p10: volumes.p10,
            p50: volumes.p50,
            p90: volumes.p90,
            raw_samples: volumes.samples,
        },
    ))
}
