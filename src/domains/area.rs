//! Clean-up area model.
//!
//! Bounds the area subject to clean-up from the exposure, the maximum
//! deposit thickness and the selected surfaces. The ∓10% band models
//! uncertainty in the exposure data, not variance in the deposit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::exposure::ExposureAreas;
use super::thickness::ThicknessRegime;
use crate::error::{CleanupError, CleanupResult};

/// Multiplier applied to an area to obtain its lower bound.
pub const AREA_LOWER_FACTOR: f64 = 0.9;
/// Multiplier applied to an area to obtain its upper bound.
pub const AREA_UPPER_FACTOR: f64 = 1.1;

/// Which exposure contributes to the clean-up area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceSelector {
    /// Every exposed surface, gated by thickness regime.
    #[default]
    All,
    /// Roads only, regardless of thickness.
    Roads,
    /// Building roofs only, regardless of thickness.
    Roofs,
}

impl SurfaceSelector {
    /// All selectors in the order scenarios enumerate them.
    pub const ALL: [Self; 3] = [Self::All, Self::Roads, Self::Roofs];

    /// Lowercase name used in scenario labels and file names.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Roads => "roads",
            Self::Roofs => "roofs",
        }
    }
}

impl fmt::Display for SurfaceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurfaceSelector {
    type Err = CleanupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "roads" => Ok(Self::Roads),
            "roofs" => Ok(Self::Roofs),
            other => Err(CleanupError::UnknownSurface(other.to_string())),
        }
    }
}

/// Lower and upper bound on the area requiring clean-up (m²).
///
/// Always `0 <= area_min <= area_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CleanupAreaBounds {
    area_min: f64,
    area_max: f64,
}

impl CleanupAreaBounds {
    /// No clean-up.
    pub const ZERO: Self = Self {
        area_min: 0.0,
        area_max: 0.0,
    };

    /// Create validated bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is negative or non-finite, or if
    /// `area_min > area_max`.
    pub fn new(area_min: f64, area_max: f64) -> CleanupResult<Self> {
        let area_min = CleanupError::check_non_negative("area_min", area_min)?;
        let area_max = CleanupError::check_non_negative("area_max", area_max)?;
        if area_min > area_max {
            return Err(CleanupError::invalid_range("clean-up area (m2)", area_min, area_max));
        }
        Ok(Self { area_min, area_max })
    }

    /// The ∓10% band around a single validated area.
    fn banded(area: f64) -> Self {
        Self {
            area_min: area * AREA_LOWER_FACTOR,
            area_max: area * AREA_UPPER_FACTOR,
        }
    }

    /// Lower bound (m²).
    #[must_use]
    pub const fn area_min(&self) -> f64 {
        self.area_min
    }

    /// Upper bound (m²).
    #[must_use]
    pub const fn area_max(&self) -> f64 {
        self.area_max
    }

    /// True when no area is subject to clean-up.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.area_max == 0.0
    }
}

/// Compute clean-up area bounds from the individual exposure areas.
///
/// `Roads` and `Roofs` ignore thickness; `All` is decided by the thickness
/// regime of `max_thickness_mm`.
///
/// # Errors
///
/// Returns `NegativeValue` or `NonFiniteValue` if any area or the thickness
/// is negative, NaN or infinite.
pub fn compute_bounds(
    roads: f64,
    impervious: f64,
    footprints: f64,
    max_thickness_mm: f64,
    surfaces: SurfaceSelector,
) -> CleanupResult<CleanupAreaBounds> {
    Ok(bounds_table(
        CleanupError::check_non_negative("road_area", roads)?,
        CleanupError::check_non_negative("impervious_area", impervious)?,
        CleanupError::check_non_negative("footprint_area", footprints)?,
        CleanupError::check_non_negative("max thickness (mm)", max_thickness_mm)?,
        surfaces,
    ))
}

/// Compute clean-up area bounds for an exposure.
///
/// `max_thickness_mm` comes from a validated [`ThicknessRange`](super::thickness::ThicknessRange);
/// a negative or non-finite value falls into the no-clean-up regime.
#[must_use]
pub fn bounds_for_exposure(
    exposure: &ExposureAreas,
    max_thickness_mm: f64,
    surfaces: SurfaceSelector,
) -> CleanupAreaBounds {
    bounds_table(
        exposure.road_area(),
        exposure.impervious_area(),
        exposure.footprint_area(),
        max_thickness_mm,
        surfaces,
    )
}

/// Decision table over validated, non-negative areas.
fn bounds_table(
    roads: f64,
    impervious: f64,
    footprints: f64,
    max_thickness_mm: f64,
    surfaces: SurfaceSelector,
) -> CleanupAreaBounds {
    let regime = ThicknessRegime::from_max_thickness(max_thickness_mm);

    match (surfaces, regime) {
        (SurfaceSelector::Roads, _) | (SurfaceSelector::All, ThicknessRegime::RoadsOnly) => {
            CleanupAreaBounds::banded(roads)
        }
        (SurfaceSelector::Roofs, _) => CleanupAreaBounds::banded(footprints),
        (SurfaceSelector::All, ThicknessRegime::Total) => {
            CleanupAreaBounds::banded(roads + footprints + impervious)
        }
        (SurfaceSelector::All, ThicknessRegime::AllSurfaces) => CleanupAreaBounds {
            area_min: roads * AREA_LOWER_FACTOR
                + impervious * AREA_LOWER_FACTOR
                + footprints * AREA_LOWER_FACTOR,
            area_max: roads * AREA_UPPER_FACTOR
                + impervious * AREA_UPPER_FACTOR
                + footprints * AREA_UPPER_FACTOR,
        },
        (SurfaceSelector::All, ThicknessRegime::NoCleanup) => CleanupAreaBounds::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ROAD: f64 = 100_000.0;
    const FOOTPRINT: f64 = 50_000.0;
    const IMPERVIOUS: f64 = 100_000.0;

    fn bounds(max_mm: f64, surfaces: SurfaceSelector) -> CleanupAreaBounds {
        compute_bounds(ROAD, IMPERVIOUS, FOOTPRINT, max_mm, surfaces).unwrap()
    }

    #[test]
    fn test_all_total_regime() {
        let b = bounds(1500.0, SurfaceSelector::All);
        assert_relative_eq!(b.area_min(), 225_000.0, max_relative = 1e-12);
        assert_relative_eq!(b.area_max(), 275_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_all_surfaces_regime_sums_each_band() {
        let b = bounds(30.0, SurfaceSelector::All);
        assert_relative_eq!(b.area_min(), 225_000.0, max_relative = 1e-12);
        assert_relative_eq!(b.area_max(), 275_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_all_roads_only_regime() {
        let b = bounds(5.0, SurfaceSelector::All);
        assert_relative_eq!(b.area_min(), 90_000.0, max_relative = 1e-12);
        assert_relative_eq!(b.area_max(), 110_000.0, max_relative = 1e-12);

        let edge = bounds(0.5, SurfaceSelector::All);
        assert_relative_eq!(edge.area_min(), 90_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_all_below_half_millimetre_is_zero() {
        assert_eq!(bounds(0.49, SurfaceSelector::All), CleanupAreaBounds::ZERO);
        assert_eq!(bounds(0.0, SurfaceSelector::All), CleanupAreaBounds::ZERO);
        assert!(bounds(0.2, SurfaceSelector::All).is_zero());
    }

    #[test]
    fn test_roads_ignore_thickness() {
        for max_mm in [0.0, 0.3, 5.0, 50.0, 5000.0] {
            let b = bounds(max_mm, SurfaceSelector::Roads);
            assert_relative_eq!(b.area_min(), 90_000.0, max_relative = 1e-12);
            assert_relative_eq!(b.area_max(), 110_000.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_roofs_ignore_thickness() {
        for max_mm in [0.0, 0.3, 5.0, 50.0, 5000.0] {
            let b = bounds(max_mm, SurfaceSelector::Roofs);
            assert_relative_eq!(b.area_min(), 45_000.0, max_relative = 1e-12);
            assert_relative_eq!(b.area_max(), 55_000.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_bounds_for_exposure_uses_impervious_copy() {
        let exposure = ExposureAreas::from_surfaces(ROAD, FOOTPRINT).unwrap();
        let b = bounds_for_exposure(&exposure, 1000.0, SurfaceSelector::All);
        assert_relative_eq!(b.area_max() - b.area_min(), 0.2 * 250_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_compute_bounds_rejects_bad_areas() {
        assert!(matches!(
            compute_bounds(-1000.0, -1000.0, 0.0, 50.0, SurfaceSelector::Roads),
            Err(CleanupError::NegativeValue { .. })
        ));
        assert!(matches!(
            compute_bounds(f64::NAN, 0.0, 0.0, 50.0, SurfaceSelector::Roads),
            Err(CleanupError::NonFiniteValue { .. })
        ));
        assert!(matches!(
            compute_bounds(1.0, 1.0, f64::INFINITY, 50.0, SurfaceSelector::Roofs),
            Err(CleanupError::NonFiniteValue { .. })
        ));
        assert!(matches!(
            compute_bounds(1.0, 1.0, 1.0, -5.0, SurfaceSelector::All),
            Err(CleanupError::NegativeValue { .. })
        ));
        assert!(matches!(
            compute_bounds(1.0, 1.0, 1.0, f64::NAN, SurfaceSelector::All),
            Err(CleanupError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn test_bounds_new_validates() {
        assert!(CleanupAreaBounds::new(1.0, 2.0).is_ok());
        assert!(CleanupAreaBounds::new(0.0, 0.0).is_ok());
        assert!(matches!(
            CleanupAreaBounds::new(2.0, 1.0),
            Err(CleanupError::InvalidRange { .. })
        ));
        assert!(CleanupAreaBounds::new(-1.0, 1.0).is_err());
    }

    #[test]
    fn test_surface_selector_parse() {
        assert_eq!("all".parse::<SurfaceSelector>().unwrap(), SurfaceSelector::All);
        assert_eq!("Roads".parse::<SurfaceSelector>().unwrap(), SurfaceSelector::Roads);
        assert_eq!(" roofs ".parse::<SurfaceSelector>().unwrap(), SurfaceSelector::Roofs);
        assert!(matches!(
            "walls".parse::<SurfaceSelector>(),
            Err(CleanupError::UnknownSurface(_))
        ));
    }

    #[test]
    fn test_surface_selector_serde() {
        let s: SurfaceSelector = serde_yaml::from_str("roofs").unwrap();
        assert_eq!(s, SurfaceSelector::Roofs);
        assert_eq!(serde_json::to_string(&SurfaceSelector::All).unwrap(), "\"all\"");
        assert!(serde_yaml::from_str::<SurfaceSelector>("walls").is_err());
    }
}
