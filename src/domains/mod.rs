//! Clean-up volume model.
//!
//! - Exposure: planar areas of roads, roofs and impervious surfaces
//! - Thickness: deposit depth ranges and their clean-up regimes
//! - Area: thickness- and surface-dependent clean-up area bounds
//! - Monte Carlo: volume sampling and percentile summaries

pub mod area;
pub mod exposure;
pub mod monte_carlo;
pub mod thickness;

pub use area::{bounds_for_exposure, compute_bounds, CleanupAreaBounds, SurfaceSelector};
pub use exposure::{ExposureAreas, DEFAULT_ROAD_WIDTH_M};
pub use monte_carlo::{
    percentile, SampleStatistics, SampledVolumes, VolumeSampler, DEFAULT_SAMPLE_COUNT,
};
pub use thickness::{ThicknessRange, ThicknessRegime};
