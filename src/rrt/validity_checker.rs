use crate::rrt::discretize::discretize;
use crate::rrt::state::RealVectorState;
use num_traits::Float;
use std::marker::PhantomData;

/// Collision oracle for joint configurations.
///
/// A configuration is valid when it is not in collision. Paths are checked as
/// ordered, already discretized sequences of configurations.
pub trait ValidityChecker<F: Float, const N: usize> {
    /// Whether `state` is collision free.
    fn is_state_valid(&self, state: &RealVectorState<F, N>) -> bool;

    /// Whether every configuration of `path` is collision free. An empty path is.
    ///
    /// Checkers with exact geometry may override this to test the straight
    /// pieces between consecutive configurations as well.
    fn is_path_valid(&self, path: &[RealVectorState<F, N>]) -> bool {
        path.iter().all(|state| self.is_state_valid(state))
    }

    /// Discretizes the segment `a -> b` with `max_angle_step` and checks the result.
    fn is_segment_valid(
        &self,
        a: &RealVectorState<F, N>,
        b: &RealVectorState<F, N>,
        max_angle_step: F,
    ) -> bool {
        self.is_path_valid(&discretize(a, b, max_angle_step))
    }
}

/// Free space everywhere. Useful for unobstructed joint spaces and for tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysValid<F: Float, const N: usize>(PhantomData<F>);

impl<F: Float, const N: usize> AlwaysValid<F, N> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<F: Float, const N: usize> ValidityChecker<F, N> for AlwaysValid<F, N> {
    fn is_state_valid(&self, _: &RealVectorState<F, N>) -> bool {
        true
    }

    fn is_path_valid(&self, _: &[RealVectorState<F, N>]) -> bool {
        true
    }
}

/// Conjunction of several oracles: valid only where every member agrees.
///
/// Lets a robot self-collision check and an environment check be combined.
pub struct UnionValidityChecker<F: Float, const N: usize> {
    members: Vec<Box<dyn ValidityChecker<F, N>>>,
}

impl<F: Float, const N: usize> UnionValidityChecker<F, N> {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    pub fn add_checker(&mut self, checker: Box<dyn ValidityChecker<F, N>>) {
        self.members.push(checker);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<F: Float, const N: usize> Default for UnionValidityChecker<F, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, const N: usize> ValidityChecker<F, N> for UnionValidityChecker<F, N> {
    fn is_state_valid(&self, state: &RealVectorState<F, N>) -> bool {
        self.members.iter().all(|member| member.is_state_valid(state))
    }

    fn is_path_valid(&self, path: &[RealVectorState<F, N>]) -> bool {
        self.members.iter().all(|member| member.is_path_valid(path))
    }
}
