use crate::obstacles::AnalyticObstacle;
use crate::rrt::state::RealVectorState;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// A ball of forbidden configurations around a center.
pub trait SphericalObstacle<F: Float, const N: usize>: AnalyticObstacle<F, N> {
    fn center(&self) -> &RealVectorState<F, N>;
    fn radius(&self) -> F;

    /// Checks if a configuration is strictly inside the ball.
    fn contains(&self, state: &RealVectorState<F, N>) -> bool {
        self.center().euclidean_distance_squared(state) < self.radius().powi(2)
    }

    /// Checks if the segment `start -> end` passes through the ball.
    ///
    /// Projects the center onto the segment and compares the closest point's
    /// distance with the radius.
    fn intersects_edge(&self, start: &RealVectorState<F, N>, end: &RealVectorState<F, N>) -> bool {
        let direction = *end - *start;
        let length_squared = direction.dot(&direction);
        let t = if length_squared > F::zero() {
            ((*self.center() - *start).dot(&direction) / length_squared)
                .max(F::zero())
                .min(F::one())
        } else {
            F::zero()
        };
        let closest = *start + direction * t;
        SphericalObstacle::contains(self, &closest)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticSphericalObstacle<F: Float, const N: usize> {
    center: RealVectorState<F, N>,
    radius: F,
}

impl<F: Float, const N: usize> StaticSphericalObstacle<F, N> {
    pub fn new(center: RealVectorState<F, N>, radius: F) -> Self {
        Self { center, radius }
    }
}

impl<F: Float, const N: usize> SphericalObstacle<F, N> for StaticSphericalObstacle<F, N> {
    fn center(&self) -> &RealVectorState<F, N> {
        &self.center
    }

    fn radius(&self) -> F {
        self.radius
    }
}

impl<F: Float, const N: usize> AnalyticObstacle<F, N> for StaticSphericalObstacle<F, N> {
    fn contains(&self, state: &RealVectorState<F, N>) -> bool {
        SphericalObstacle::contains(self, state)
    }

    fn intersects_edge(&self, start: &RealVectorState<F, N>, end: &RealVectorState<F, N>) -> bool {
        SphericalObstacle::intersects_edge(self, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_through_and_past_ball() {
        let ball = StaticSphericalObstacle::new(RealVectorState::new([1.0, 1.0]), 0.5);
        let s = |x, y| RealVectorState::new([x, y]);
        assert!(AnalyticObstacle::intersects_edge(&ball, &s(0.0, 0.0), &s(2.0, 2.0)));
        assert!(AnalyticObstacle::intersects_edge(&ball, &s(1.0, 1.2), &s(1.0, 1.2)));
        assert!(!AnalyticObstacle::intersects_edge(&ball, &s(0.0, 0.0), &s(2.0, 0.0)));
        // The infinite line hits the ball, the segment stops short.
        assert!(!AnalyticObstacle::intersects_edge(&ball, &s(0.0, 0.0), &s(0.4, 0.4)));
    }

    #[test]
    fn test_boundary_is_free() {
        let ball = StaticSphericalObstacle::new(RealVectorState::new([0.0, 0.0]), 1.0);
        assert!(!AnalyticObstacle::contains(&ball, &RealVectorState::new([1.0, 0.0])));
        assert!(AnalyticObstacle::contains(&ball, &RealVectorState::new([0.5, 0.5])));
    }
}
