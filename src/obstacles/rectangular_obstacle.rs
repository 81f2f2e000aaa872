use crate::obstacles::AnalyticObstacle;
use crate::rrt::state::RealVectorState;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in joint space: every joint inside its own forbidden interval.
///
/// Bounds are inclusive, so a configuration on the boundary is in collision.
pub trait RectangularObstacle<F: Float, const N: usize>: AnalyticObstacle<F, N> {
    /// The smallest value of each joint inside the box.
    fn min_corner(&self) -> &RealVectorState<F, N>;
    /// The largest value of each joint inside the box.
    fn max_corner(&self) -> &RealVectorState<F, N>;

    fn contains(&self, state: &RealVectorState<F, N>) -> bool {
        let (min, max) = (self.min_corner(), self.max_corner());
        (0..N).all(|i| state[i] >= min[i] && state[i] <= max[i])
    }

    /// Checks if the straight segment `start -> end` touches the box.
    ///
    /// Clips the segment parameter range [0, 1] against each joint's interval
    /// (slab test); the segment hits the box if the range stays non-empty.
    fn intersects_edge(&self, start: &RealVectorState<F, N>, end: &RealVectorState<F, N>) -> bool {
        let (min, max) = (self.min_corner(), self.max_corner());
        let direction = *end - *start;
        let mut enter = F::zero();
        let mut exit = F::one();

        for i in 0..N {
            if direction[i] == F::zero() {
                // This joint does not move along the segment.
                if start[i] < min[i] || start[i] > max[i] {
                    return false;
                }
                continue;
            }
            let t_min = (min[i] - start[i]) / direction[i];
            let t_max = (max[i] - start[i]) / direction[i];
            enter = enter.max(t_min.min(t_max));
            exit = exit.min(t_min.max(t_max));
            if enter > exit {
                return false;
            }
        }
        true
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaticRectangularObstacle<F: Float, const N: usize> {
    min_corner: RealVectorState<F, N>,
    max_corner: RealVectorState<F, N>,
}

impl<F: Float, const N: usize> StaticRectangularObstacle<F, N> {
    /// Creates a box from its two corners. Each joint's bounds are sorted, so the
    /// corners may be given in any order.
    pub fn new(a: RealVectorState<F, N>, b: RealVectorState<F, N>) -> Self {
        let mut min_corner = a;
        let mut max_corner = b;
        for i in 0..N {
            min_corner[i] = a[i].min(b[i]);
            max_corner[i] = a[i].max(b[i]);
        }
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Creates a box spanning `center ± half_extents`.
    pub fn from_center(center: RealVectorState<F, N>, half_extents: RealVectorState<F, N>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }
}

impl<F: Float, const N: usize> RectangularObstacle<F, N> for StaticRectangularObstacle<F, N> {
    fn min_corner(&self) -> &RealVectorState<F, N> {
        &self.min_corner
    }

    fn max_corner(&self) -> &RealVectorState<F, N> {
        &self.max_corner
    }
}

impl<F: Float, const N: usize> AnalyticObstacle<F, N> for StaticRectangularObstacle<F, N> {
    fn contains(&self, state: &RealVectorState<F, N>) -> bool {
        RectangularObstacle::contains(self, state)
    }

    fn intersects_edge(&self, start: &RealVectorState<F, N>, end: &RealVectorState<F, N>) -> bool {
        RectangularObstacle::intersects_edge(self, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> StaticRectangularObstacle<f64, 2> {
        StaticRectangularObstacle::new(
            RealVectorState::new([0.4, -0.5]),
            RealVectorState::new([0.6, 0.5]),
        )
    }

    #[test]
    fn test_contains_is_inclusive() {
        let band = band();
        assert!(AnalyticObstacle::contains(&band, &RealVectorState::new([0.4, 0.0])));
        assert!(AnalyticObstacle::contains(&band, &RealVectorState::new([0.6, 0.5])));
        assert!(!AnalyticObstacle::contains(&band, &RealVectorState::new([0.61, 0.0])));
    }

    #[test]
    fn test_corners_are_sorted() {
        let swapped = StaticRectangularObstacle::new(
            RealVectorState::new([0.6, 0.5]),
            RealVectorState::new([0.4, -0.5]),
        );
        assert_eq!(swapped.min_corner(), band().min_corner());
        assert_eq!(swapped.max_corner(), band().max_corner());

        let centered = StaticRectangularObstacle::from_center(
            RealVectorState::new([0.5, 1.0]),
            RealVectorState::new([0.25, 0.5]),
        );
        assert_eq!(centered.min_corner(), &RealVectorState::new([0.25, 0.5]));
        assert_eq!(centered.max_corner(), &RealVectorState::new([0.75, 1.5]));
    }

    #[test]
    fn test_edge_intersection() {
        let band = band();
        let s = |x, y| RealVectorState::new([x, y]);
        assert!(AnalyticObstacle::intersects_edge(&band, &s(0.0, 0.0), &s(1.0, 0.0)));
        assert!(AnalyticObstacle::intersects_edge(&band, &s(0.0, -1.0), &s(1.0, 1.0)));
        assert!(!AnalyticObstacle::intersects_edge(&band, &s(0.0, 0.6), &s(1.0, 0.6)));
        assert!(!AnalyticObstacle::intersects_edge(&band, &s(0.0, 0.0), &s(0.3, 0.0)));
        assert!(!AnalyticObstacle::intersects_edge(&band, &s(0.0, 0.0), &s(0.5, 2.0)));
    }
}
