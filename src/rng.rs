//! Seeded random streams for scenario runs.
//!
//! A plan owns one master seed. Each run draws from its own PCG64 stream,
//! derived from the master seed and the run's stream index, so volumes do not
//! depend on run order or on how runs are spread across threads.

use rand::prelude::*;
use rand_pcg::Pcg64;

/// Golden-ratio multiplier spreading stream indices across the seed space.
const STREAM_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Random source owned by exactly one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioRng {
    master_seed: u64,
    stream: u64,
    rng: Pcg64,
}

impl ScenarioRng {
    /// Stream 0 of `master_seed`.
    #[must_use]
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            stream: 0,
            rng: Pcg64::seed_from_u64(master_seed),
        }
    }

    /// Seed the plan was created with.
    #[must_use]
    pub const fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Stream index of this generator (or, for a parent, the next free index).
    #[must_use]
    pub const fn stream(&self) -> u64 {
        self.stream
    }

    /// Split off `n` generators with consecutive stream indices.
    ///
    /// Calling this again continues from the next unused index.
    ///
    /// ```rust
    /// use tephra_cleanup::rng::ScenarioRng;
    ///
    /// let mut master = ScenarioRng::new(42);
    /// let runs = master.partition(18);
    /// assert_eq!(runs[17].stream(), 17);
    /// assert_eq!(master.stream(), 18);
    /// ```
    #[must_use]
    pub fn partition(&mut self, n: usize) -> Vec<Self> {
        let first = self.stream;
        self.stream += n as u64;

        (first..self.stream)
            .map(|stream| Self {
                master_seed: self.master_seed,
                stream,
                rng: Pcg64::seed_from_u64(
                    self.master_seed
                        .wrapping_add(stream.wrapping_mul(STREAM_SPREAD)),
                ),
            })
            .collect()
    }

    /// Next value in `[0, 1)`.
    pub fn gen_f64(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Draw from `Uniform(min, max)`; `min == max` yields `min` exactly.
    pub fn gen_uniform(&mut self, min: f64, max: f64) -> f64 {
        debug_assert!(min <= max, "uniform bounds out of order: {min} > {max}");
        min + (max - min) * self.gen_f64()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_partition_is_deterministic(seed in any::<u64>(), n in 1usize..40) {
            let mut all = ScenarioRng::new(seed).partition(n);
            let mut last = ScenarioRng::new(seed).partition(n).pop();

            if let (Some(a), Some(b)) = (all.last_mut(), last.as_mut()) {
                prop_assert_eq!(a.gen_f64().to_bits(), b.gen_f64().to_bits());
            }
        }

        #[test]
        fn prop_uniform_in_bounds(seed in any::<u64>(), min in 0.0f64..1e6, width in 0.0f64..1e6) {
            let mut rng = ScenarioRng::new(seed);
            let max = min + width;
            for _ in 0..50 {
                let v = rng.gen_uniform(min, max);
                prop_assert!(v >= min && v <= max * (1.0 + 1e-12), "{} not in [{}, {}]", v, min, max);
            }
        }
    }
}
