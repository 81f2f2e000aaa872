use crate::rrt::error::PlanningError;
use crate::rrt::state::RealVectorState;
use num_traits::Float;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of random configurations for tree growth.
pub trait SamplingDistribution<F: Float, const N: usize> {
    /// Draws a new configuration.
    fn sample(&mut self) -> RealVectorState<F, N>;

    /// Resets the internal random number generator so that the following draws are reproducible.
    fn seed(&mut self, seed: u64);
}

/// Samples each joint independently and uniformly within its limits.
pub struct UniformDistribution<F: Float, const N: usize> {
    /// The (min, max) limits of each dimension.
    ranges: [(F, F); N],
    rng: StdRng,
}

impl<F: Float, const N: usize> UniformDistribution<F, N> {
    /// Constructs a new uniform distribution seeded from system entropy.
    ///
    /// Parameters:
    /// - `ranges`: The (min, max) limits of each dimension. `min` must not exceed `max`.
    pub fn new(ranges: [(F, F); N]) -> Result<Self, PlanningError> {
        Self::with_rng(ranges, StdRng::from_entropy())
    }

    /// Constructs a new uniform distribution with a fixed seed.
    pub fn with_seed(ranges: [(F, F); N], seed: u64) -> Result<Self, PlanningError> {
        Self::with_rng(ranges, StdRng::seed_from_u64(seed))
    }

    fn with_rng(ranges: [(F, F); N], rng: StdRng) -> Result<Self, PlanningError> {
        for (i, &(min, max)) in ranges.iter().enumerate() {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(PlanningError::InvalidParameter(format!(
                    "sampling range of dimension {} must be finite with min <= max",
                    i
                )));
            }
        }
        Ok(Self { ranges, rng })
    }

    pub fn ranges(&self) -> &[(F, F); N] {
        &self.ranges
    }
}

impl<F: Float, const N: usize> SamplingDistribution<F, N> for UniformDistribution<F, N> {
    fn sample(&mut self) -> RealVectorState<F, N> {
        let mut values = [F::zero(); N];
        for (value, &(min, max)) in values.iter_mut().zip(self.ranges.iter()) {
            let t = F::from(self.rng.gen::<f64>()).unwrap_or_else(F::zero);
            *value = min + (max - min) * t;
        }
        RealVectorState::new(values)
    }

    fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}
