//! Exposure areas subject to ash accumulation.
//!
//! Geometry acquisition happens elsewhere; this module only turns summed
//! road and footprint measurements into validated planar areas (m²).

use serde::Serialize;

use crate::error::{CleanupError, CleanupResult};

/// Assumed carriageway width used to turn road length into road area (m).
pub const DEFAULT_ROAD_WIDTH_M: f64 = 3.0;

/// Planar areas of the built features exposed to ashfall.
///
/// Immutable once constructed. The surface constructors set
/// `impervious_area` equal to `road_area`: other impervious surfaces are
/// approximated by the road network, not measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExposureAreas {
    road_area: f64,
    footprint_area: f64,
    impervious_area: f64,
}

impl ExposureAreas {
    /// Build from explicit road, footprint and impervious areas.
    ///
    /// # Errors
    ///
    /// Returns an error if any area is negative or non-finite.
    pub fn new(road_area: f64, footprint_area: f64, impervious_area: f64) -> CleanupResult<Self> {
        Ok(Self {
            road_area: CleanupError::check_non_negative("road_area", road_area)?,
            footprint_area: CleanupError::check_non_negative("footprint_area", footprint_area)?,
            impervious_area: CleanupError::check_non_negative("impervious_area", impervious_area)?,
        })
    }

    /// Build from road and footprint areas, approximating impervious area
    /// by road area.
    ///
    /// # Errors
    ///
    /// Returns an error if either area is negative or non-finite.
    pub fn from_surfaces(road_area: f64, footprint_area: f64) -> CleanupResult<Self> {
        Self::new(road_area, footprint_area, road_area)
    }

    /// Build from total road length and an assumed carriageway width.
    ///
    /// # Errors
    ///
    /// Returns an error if any input is negative or non-finite.
    pub fn from_road_length(
        road_length: f64,
        road_width: f64,
        footprint_area: f64,
    ) -> CleanupResult<Self> {
        let length = CleanupError::check_non_negative("road_length", road_length)?;
        let width = CleanupError::check_non_negative("road_width", road_width)?;
        Self::from_surfaces(length * width, footprint_area)
    }

    /// Build by summing per-feature road segment lengths and building
    /// footprint areas.
    ///
    /// # Errors
    ///
    /// Returns an error if any feature value is negative or non-finite.
    pub fn from_features(
        road_lengths: &[f64],
        footprint_areas: &[f64],
        road_width: f64,
    ) -> CleanupResult<Self> {
        let road_length = sum_checked("road segment length", road_lengths)?;
        let footprint_area = sum_checked("building footprint area", footprint_areas)?;
        Self::from_road_length(road_length, road_width, footprint_area)
    }

    /// Total road surface area.
    #[must_use]
    pub const fn road_area(&self) -> f64 {
        self.road_area
    }

    /// Total building footprint (roof) area.
    #[must_use]
    pub const fn footprint_area(&self) -> f64 {
        self.footprint_area
    }

    /// Impervious surface area other than roads and roofs.
    #[must_use]
    pub const fn impervious_area(&self) -> f64 {
        self.impervious_area
    }

    /// Sum of road, footprint and impervious areas.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.road_area + self.footprint_area + self.impervious_area
    }
}

fn sum_checked(quantity: &str, values: &[f64]) -> CleanupResult<f64> {
    values.iter().try_fold(0.0, |acc, &v| {
        CleanupError::check_non_negative(quantity, v).map(|v| acc + v)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_surfaces_copies_road_area() {
        let exposure = ExposureAreas::from_surfaces(100_000.0, 50_000.0).unwrap();

        assert_eq!(exposure.road_area(), 100_000.0);
        assert_eq!(exposure.footprint_area(), 50_000.0);
        assert_eq!(exposure.impervious_area(), 100_000.0);
        assert_eq!(exposure.total_area(), 250_000.0);
    }

    #[test]
    fn test_from_road_length_uses_width() {
        let exposure =
            ExposureAreas::from_road_length(1_000.0, DEFAULT_ROAD_WIDTH_M, 2_500.0).unwrap();

        assert_eq!(exposure.road_area(), 3_000.0);
        assert_eq!(exposure.impervious_area(), 3_000.0);
        assert_eq!(exposure.footprint_area(), 2_500.0);
    }

    #[test]
    fn test_from_features_sums() {
        let exposure = ExposureAreas::from_features(
            &[120.5, 300.0, 79.5],
            &[80.0, 120.0, 45.25],
            DEFAULT_ROAD_WIDTH_M,
        )
        .unwrap();

        assert_relative_eq!(exposure.road_area(), 1_500.0);
        assert_relative_eq!(exposure.footprint_area(), 245.25);
    }

    #[test]
    fn test_from_features_empty_is_zero() {
        let exposure = ExposureAreas::from_features(&[], &[], DEFAULT_ROAD_WIDTH_M).unwrap();
        assert_eq!(exposure.total_area(), 0.0);
    }

    #[test]
    fn test_rejects_negative_area() {
        let err = ExposureAreas::from_surfaces(-1.0, 10.0).unwrap_err();
        assert!(matches!(err, CleanupError::NegativeValue { .. }));
        assert!(err.to_string().contains("road_area"));

        let err = ExposureAreas::new(1.0, 1.0, -0.5).unwrap_err();
        assert!(err.to_string().contains("impervious_area"));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(ExposureAreas::from_surfaces(f64::NAN, 10.0).is_err());
        assert!(ExposureAreas::from_road_length(10.0, f64::INFINITY, 10.0).is_err());
        assert!(ExposureAreas::from_features(&[1.0, f64::NAN], &[], 3.0).is_err());
    }

    #[test]
    fn test_serializes_all_fields() {
        let exposure = ExposureAreas::new(1.0, 2.0, 3.0).unwrap();
        let json = serde_json::to_string(&exposure).unwrap();
        assert!(json.contains("\"impervious_area\":3.0"));
    }
}
