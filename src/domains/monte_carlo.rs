//! Monte Carlo sampling of clean-up volume.
//!
//! Each draw multiplies an independent uniform thickness (converted from
//! millimetres to metres) by an independent uniform clean-up area, giving a
//! volume in cubic metres. The sample sequence is summarised by linearly
//! interpolated percentiles.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::area::CleanupAreaBounds;
use super::thickness::ThicknessRange;
use crate::error::{CleanupError, CleanupResult};
use crate::rng::ScenarioRng;

/// Default number of Monte Carlo draws per scenario.
pub const DEFAULT_SAMPLE_COUNT: usize = 10_000;

/// Millimetres per metre.
const MM_PER_M: f64 = 1000.0;

/// Volume samples and their 10/50/90 percentiles (m³).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledVolumes {
    /// 10th percentile.
    pub p10: f64,
    /// 50th percentile.
    pub p50: f64,
    /// 90th percentile.
    pub p90: f64,
    /// Every draw, in generation order.
    pub samples: Vec<f64>,
}

/// Descriptive statistics of a sample sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleStatistics {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator; 0 for a single sample).
    pub std: f64,
    /// Smallest sample.
    pub min: f64,
    /// 25th percentile.
    pub p25: f64,
    /// Median.
    pub p50: f64,
    /// 75th percentile.
    pub p75: f64,
    /// Largest sample.
    pub max: f64,
}

impl SampleStatistics {
    /// Summarise a non-empty sample sequence. Returns `None` when empty.
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let sorted = sorted_copy(samples);
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let std = if samples.len() > 1 {
            let ss: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        Some(Self {
            count: samples.len(),
            mean,
            std,
            min: sorted[0],
            p25: percentile_sorted(&sorted, 25.0),
            p50: percentile_sorted(&sorted, 50.0),
            p75: percentile_sorted(&sorted, 75.0),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Monte Carlo sampler for clean-up volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeSampler {
    sample_count: usize,
}

impl Default for VolumeSampler {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl VolumeSampler {
    /// Create a sampler drawing `sample_count` volumes per run.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSampleCount` when `sample_count` is zero.
    pub fn new(sample_count: usize) -> CleanupResult<Self> {
        if sample_count == 0 {
            return Err(CleanupError::InvalidSampleCount);
        }
        Ok(Self { sample_count })
    }

    /// Configured number of draws.
    #[must_use]
    pub const fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Draw volumes for a thickness range over clean-up area bounds.
    ///
    /// Thickness is drawn before area on every iteration. Zero-width
    /// intervals yield their single value exactly, so degenerate inputs give
    /// deterministic samples.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tephra_cleanup::domains::area::CleanupAreaBounds;
    /// use tephra_cleanup::domains::monte_carlo::VolumeSampler;
    /// use tephra_cleanup::domains::thickness::ThicknessRange;
    /// use tephra_cleanup::rng::ScenarioRng;
    ///
    /// let sampler = VolumeSampler::new(1000).unwrap();
    /// let thickness = ThicknessRange::new(10.0, 10.0).unwrap();
    /// let bounds = CleanupAreaBounds::new(500.0, 500.0).unwrap();
    /// let volumes = sampler.sample(&thickness, &bounds, &mut ScenarioRng::new(1));
    /// assert_eq!(volumes.p50, 5.0);
    /// ```
    #[must_use]
    pub fn sample(
        &self,
        thickness: &ThicknessRange,
        bounds: &CleanupAreaBounds,
        rng: &mut ScenarioRng,
    ) -> SampledVolumes {
        let samples: Vec<f64> = (0..self.sample_count)
            .map(|_| {
                let t = rng.gen_uniform(thickness.min_mm(), thickness.max_mm()) / MM_PER_M;
                let a = rng.gen_uniform(bounds.area_min(), bounds.area_max());
                t * a
            })
            .collect();

        let sorted = sorted_copy(&samples);
        let volumes = SampledVolumes {
            p10: percentile_sorted(&sorted, 10.0),
            p50: percentile_sorted(&sorted, 50.0),
            p90: percentile_sorted(&sorted, 90.0),
            samples,
        };

        debug!(
            samples = self.sample_count,
            p10 = volumes.p10,
            p50 = volumes.p50,
            p90 = volumes.p90,
            "Sampled clean-up volumes"
        );

        volumes
    }
}

/// Percentile of an unsorted sequence by linear interpolation between order
/// statistics. Returns `None` for an empty sequence or `p` outside [0, 100].
#[must_use]
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    if samples.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }
    Some(percentile_sorted(&sorted_copy(samples), p))
}

fn sorted_copy(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// `sorted` must be non-empty and ascending; `p` in [0, 100].
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let lower = sorted[lo];
    if hi == lo {
        return lower;
    }
    lower + (sorted[hi] - lower) * (rank - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn range(min: f64, max: f64) -> ThicknessRange {
        ThicknessRange::new(min, max).unwrap()
    }

    fn area(min: f64, max: f64) -> CleanupAreaBounds {
        CleanupAreaBounds::new(min, max).unwrap()
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(percentile(&xs, 50.0).unwrap(), 2.5);
        assert_relative_eq!(percentile(&xs, 10.0).unwrap(), 1.3, max_relative = 1e-12);
        assert_relative_eq!(percentile(&xs, 90.0).unwrap(), 3.7, max_relative = 1e-12);
        assert_eq!(percentile(&xs, 0.0), Some(1.0));
        assert_eq!(percentile(&xs, 100.0), Some(4.0));
    }

    #[test]
    fn test_percentile_unsorted_input() {
        let xs = [10.0, 0.0, 5.0];
        assert_eq!(percentile(&xs, 50.0), Some(5.0));
    }

    #[test]
    fn test_percentile_rejects_bad_input() {
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[1.0], -1.0), None);
        assert_eq!(percentile(&[1.0], 101.0), None);
        assert_eq!(percentile(&[7.0], 90.0), Some(7.0));
    }

    #[test]
    fn test_zero_samples_rejected() {
        assert!(matches!(
            VolumeSampler::new(0),
            Err(CleanupError::InvalidSampleCount)
        ));
    }

    #[test]
    fn test_default_sample_count() {
        assert_eq!(VolumeSampler::default().sample_count(), 10_000);
    }

    #[test]
    fn test_sample_count_invariant() {
        let mut rng = ScenarioRng::new(42);
        for n in [1, 7, 1000] {
            let sampler = VolumeSampler::new(n).unwrap();
            let v = sampler.sample(&range(1.0, 10.0), &area(9.0, 11.0), &mut rng);
            assert_eq!(v.samples.len(), n);
        }
    }

    #[test]
    fn test_zero_area_gives_zero_volumes() {
        let sampler = VolumeSampler::new(500).unwrap();
        let v = sampler.sample(
            &range(1.0, 10.0),
            &CleanupAreaBounds::ZERO,
            &mut ScenarioRng::new(3),
        );
        assert!(v.samples.iter().all(|&x| x == 0.0));
        assert_eq!((v.p10, v.p50, v.p90), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_zero_thickness_gives_zero_volumes() {
        let sampler = VolumeSampler::new(500).unwrap();
        let v = sampler.sample(&range(0.0, 0.0), &area(100.0, 200.0), &mut ScenarioRng::new(3));
        assert!(v.samples.iter().all(|&x| x == 0.0));
        assert_eq!(v.p90, 0.0);
    }

    #[test]
    fn test_degenerate_area_factor_is_exact() {
        let sampler = VolumeSampler::new(1000).unwrap();
        let v = sampler.sample(
            &range(1.0, 10.0),
            &area(50_000.0, 50_000.0),
            &mut ScenarioRng::new(9),
        );
        for &x in &v.samples {
            let t = x / 50_000.0;
            assert!((0.001 - 1e-12..=0.01 + 1e-12).contains(&t), "thickness factor {t} outside range");
        }
    }

    #[test]
    fn test_fully_degenerate_percentiles_equal() {
        let sampler = VolumeSampler::new(100).unwrap();
        let v = sampler.sample(&range(20.0, 20.0), &area(1_000.0, 1_000.0), &mut ScenarioRng::new(1));
        assert_eq!(v.p10, v.p50);
        assert_eq!(v.p50, v.p90);
        assert_relative_eq!(v.p50, 20.0, max_relative = 1e-12);
    }

    #[test]
    fn test_percentiles_monotonic() {
        let sampler = VolumeSampler::new(5000).unwrap();
        let v = sampler.sample(&range(20.0, 30.0), &area(1e5, 2e5), &mut ScenarioRng::new(11));
        assert!(v.p10 <= v.p50);
        assert!(v.p50 <= v.p90);
        assert!(v.p10 < v.p90);
    }

    #[test]
    fn test_same_seed_bit_identical() {
        let sampler = VolumeSampler::new(2000).unwrap();
        let a = sampler.sample(&range(1.0, 10.0), &area(9e4, 1.1e5), &mut ScenarioRng::new(42));
        let b = sampler.sample(&range(1.0, 10.0), &area(9e4, 1.1e5), &mut ScenarioRng::new(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_statistics() {
        let stats = SampleStatistics::from_samples(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert_relative_eq!(stats.mean, 2.5);
        assert_relative_eq!(stats.std, (5.0f64 / 3.0).sqrt(), max_relative = 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_relative_eq!(stats.p25, 1.75);
        assert_relative_eq!(stats.p50, 2.5);
        assert_relative_eq!(stats.p75, 3.25);

        let single = SampleStatistics::from_samples(&[3.0]).unwrap();
        assert_eq!(single.std, 0.0);
        assert!(SampleStatistics::from_samples(&[]).is_none());
    }
}
