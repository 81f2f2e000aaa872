use crate::rrt::state::RealVectorState;
use crate::rrt::validity_checker::ValidityChecker;
use num_traits::Float;
use std::marker::PhantomData;

/// A region of joint space with closed-form geometry.
pub trait AnalyticObstacle<F: Float, const N: usize> {
    /// Whether `state` lies inside the region.
    fn contains(&self, state: &RealVectorState<F, N>) -> bool;
    /// Whether the straight segment `start -> end` touches the region.
    fn intersects_edge(&self, start: &RealVectorState<F, N>, end: &RealVectorState<F, N>) -> bool;
}

/// A collision oracle over a set of analytic obstacles.
///
/// Paths are checked exactly: every straight piece between consecutive
/// configurations is tested for intersection, not only the samples themselves.
pub struct AnalyticValidityChecker<F: Float, const N: usize, O: AnalyticObstacle<F, N>> {
    obstacles: Vec<O>,
    scalar: PhantomData<F>,
}

impl<F: Float, const N: usize, O: AnalyticObstacle<F, N>> AnalyticValidityChecker<F, N, O> {
    pub fn new(obstacles: Vec<O>) -> Self {
        Self {
            obstacles,
            scalar: PhantomData,
        }
    }

    pub fn obstacles(&self) -> &[O] {
        &self.obstacles
    }
}

impl<F: Float, const N: usize, O: AnalyticObstacle<F, N>> ValidityChecker<F, N>
    for AnalyticValidityChecker<F, N, O>
{
    fn is_state_valid(&self, state: &RealVectorState<F, N>) -> bool {
        !self.obstacles.iter().any(|obstacle| obstacle.contains(state))
    }

    fn is_path_valid(&self, path: &[RealVectorState<F, N>]) -> bool {
        if path.len() == 1 {
            return self.is_state_valid(&path[0]);
        }
        path.windows(2).all(|pair| {
            self.obstacles
                .iter()
                .all(|obstacle| !obstacle.intersects_edge(&pair[0], &pair[1]))
        })
    }
}
