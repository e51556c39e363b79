//! Ash deposit thickness ranges and the clean-up regimes they fall into.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CleanupError, CleanupResult};

/// Modelled deposit depth range for one scenario, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThicknessRange {
    min_mm: f64,
    max_mm: f64,
}

impl ThicknessRange {
    /// Create a validated thickness range.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is negative or non-finite, or if
    /// `min_mm > max_mm`. Bounds are never silently reordered.
    pub fn new(min_mm: f64, max_mm: f64) -> CleanupResult<Self> {
        let min_mm = CleanupError::check_non_negative("min thickness (mm)", min_mm)?;
        let max_mm = CleanupError::check_non_negative("max thickness (mm)", max_mm)?;
        if min_mm > max_mm {
            return Err(CleanupError::invalid_range("thickness (mm)", min_mm, max_mm));
        }
        Ok(Self { min_mm, max_mm })
    }

    /// Lower bound (mm).
    #[must_use]
    pub const fn min_mm(&self) -> f64 {
        self.min_mm
    }

    /// Upper bound (mm).
    #[must_use]
    pub const fn max_mm(&self) -> f64 {
        self.max_mm
    }

    /// Regime selected by the upper bound.
    #[must_use]
    pub fn regime(&self) -> ThicknessRegime {
        ThicknessRegime::from_max_thickness(self.max_mm)
    }

    /// Scale both bounds by `factor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaled range is invalid (negative factor).
    pub fn scaled(&self, factor: f64) -> CleanupResult<Self> {
        Self::new(self.min_mm * factor, self.max_mm * factor)
    }
}

impl fmt::Display for ThicknessRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}mm", self.min_mm, self.max_mm)
    }
}

impl<'de> Deserialize<'de> for ThicknessRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Raw {
            min_mm: f64,
            max_mm: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.min_mm, raw.max_mm).map_err(serde::de::Error::custom)
    }
}

/// Thickness bucket deciding which surfaces are assumed to be cleaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThicknessRegime {
    /// ≥ 1000 mm: the combined exposure area is cleaned as a whole.
    Total,
    /// ≥ 10 mm: roads, impervious surfaces and roofs are each cleaned.
    AllSurfaces,
    /// ≥ 0.5 mm: only roads are cleaned.
    RoadsOnly,
    /// < 0.5 mm: no clean-up.
    NoCleanup,
}

impl ThicknessRegime {
    /// Threshold (mm) at and above which the whole exposure is cleaned.
    pub const TOTAL_MM: f64 = 1000.0;
    /// Threshold (mm) at and above which every surface is cleaned.
    pub const ALL_SURFACES_MM: f64 = 10.0;
    /// Threshold (mm) at and above which roads are cleaned.
    pub const ROADS_MM: f64 = 0.5;

    /// Classify a maximum thickness.
    #[must_use]
    pub fn from_max_thickness(max_mm: f64) -> Self {
        if max_mm >= Self::TOTAL_MM {
            Self::Total
        } else if max_mm >= Self::ALL_SURFACES_MM {
            Self::AllSurfaces
        } else if max_mm >= Self::ROADS_MM {
            Self::RoadsOnly
        } else {
            Self::NoCleanup
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let range = ThicknessRange::new(1.0, 10.0).unwrap();
        assert_eq!(range.min_mm(), 1.0);
        assert_eq!(range.max_mm(), 10.0);

        assert!(ThicknessRange::new(0.0, 0.0).is_ok());
        assert!(ThicknessRange::new(5.0, 5.0).is_ok());
    }

    #[test]
    fn test_rejects_reversed_bounds() {
        let err = ThicknessRange::new(30.0, 20.0).unwrap_err();
        assert!(matches!(err, CleanupError::InvalidRange { .. }));
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(matches!(
            ThicknessRange::new(-1.0, 10.0),
            Err(CleanupError::NegativeValue { .. })
        ));
        assert!(matches!(
            ThicknessRange::new(1.0, f64::NAN),
            Err(CleanupError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn test_display_matches_scenario_label() {
        assert_eq!(ThicknessRange::new(1.0, 10.0).unwrap().to_string(), "1-10mm");
        assert_eq!(ThicknessRange::new(0.5, 2.5).unwrap().to_string(), "0.5-2.5mm");
    }

    #[test]
    fn test_regime_boundaries() {
        assert_eq!(ThicknessRegime::from_max_thickness(5000.0), ThicknessRegime::Total);
        assert_eq!(ThicknessRegime::from_max_thickness(1000.0), ThicknessRegime::Total);
        assert_eq!(ThicknessRegime::from_max_thickness(999.9), ThicknessRegime::AllSurfaces);
        assert_eq!(ThicknessRegime::from_max_thickness(10.0), ThicknessRegime::AllSurfaces);
        assert_eq!(ThicknessRegime::from_max_thickness(9.99), ThicknessRegime::RoadsOnly);
        assert_eq!(ThicknessRegime::from_max_thickness(0.5), ThicknessRegime::RoadsOnly);
        assert_eq!(ThicknessRegime::from_max_thickness(0.49), ThicknessRegime::NoCleanup);
        assert_eq!(ThicknessRegime::from_max_thickness(0.0), ThicknessRegime::NoCleanup);
    }

    #[test]
    fn test_regime_uses_max_bound() {
        let range = ThicknessRange::new(1.0, 10.0).unwrap();
        assert_eq!(range.regime(), ThicknessRegime::AllSurfaces);
    }

    #[test]
    fn test_scaled() {
        let range = ThicknessRange::new(1.0, 10.0).unwrap().scaled(3.0).unwrap();
        assert_eq!(range.min_mm(), 3.0);
        assert_eq!(range.max_mm(), 30.0);
        assert!(ThicknessRange::new(1.0, 10.0).unwrap().scaled(-1.0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: ThicknessRange = serde_yaml::from_str("min_mm: 20\nmax_mm: 30\n").unwrap();
        assert_eq!(ok.max_mm(), 30.0);

        let bad: Result<ThicknessRange, _> = serde_yaml::from_str("min_mm: 30\nmax_mm: 20\n");
        assert!(bad.is_err());
    }
}
