//! # tephra-cleanup
//!
//! Monte Carlo estimation of the volume of volcanic ash (tephra) that must be
//! removed from an urban area after an eruption.
//!
//! Given the planar areas of roads, impervious surfaces and building
//! footprints, a deposit thickness range and the surfaces to be cleaned, the
//! crate derives clean-up area bounds from thickness regimes and samples
//! `volume = thickness × area` to report the 10th, 50th and 90th percentiles.
//!
//! ## Example
//!
//! ```rust
//! use tephra_cleanup::prelude::*;
//!
//! let exposure = ExposureAreas::from_surfaces(100_000.0, 50_000.0)?;
//! let thickness = ThicknessRange::new(1.0, 10.0)?;
//! let mut rng = ScenarioRng::new(42);
//!
//! let report = run_scenario(&exposure, &thickness, SurfaceSelector::Roads, "Tongatapu", 1_000, &mut rng)?;
//! assert!(report.p10 <= report.p50);
//! # Ok::<(), CleanupError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,
    clippy::missing_const_for_fn,
)]

pub mod cli;
pub mod config;
pub mod domains;
pub mod error;
pub mod export;
pub mod rng;
pub mod scenarios;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{CleanupConfig, CleanupConfigBuilder};
    pub use crate::domains::{
        bounds_for_exposure, compute_bounds, percentile, CleanupAreaBounds, ExposureAreas,
        SampleStatistics, SampledVolumes, SurfaceSelector, ThicknessRange, ThicknessRegime,
        VolumeSampler,
    };
    pub use crate::error::{CleanupError, CleanupResult};
    pub use crate::export::ReportWriter;
    pub use crate::rng::ScenarioRng;
    pub use crate::scenarios::{
        run_scenario, ExposureSource, Scenario, ScenarioOutcome, ScenarioPlan, VolumeReport,
    };
}

/// Re-export for public API
pub use error::{CleanupError, CleanupResult};
