use std::time::{Duration, Instant};

/// Decides when a planning loop has to stop.
///
/// `evaluate` is called once at the top of every iteration and returns true once
/// the loop must terminate.
pub trait TerminationCondition {
    fn evaluate(&mut self) -> bool;

    /// Restarts the condition (e.g. restarts the clock or the iteration count).
    fn reset(&mut self);
}

/// Terminates once a fixed wall-clock budget has elapsed.
///
/// The deadline is computed when the condition is constructed or reset.
pub struct MaxTimeTermination {
    max_duration: Duration,
    /// None when the budget does not fit in an `Instant`, i.e. never expires.
    deadline: Option<Instant>,
}

impl MaxTimeTermination {
    pub fn new(max_duration: Duration) -> Self {
        Self {
            max_duration,
            deadline: Instant::now().checked_add(max_duration),
        }
    }

    /// Time left before the deadline.
    pub fn remaining(&self) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => Duration::MAX,
        }
    }
}

impl TerminationCondition for MaxTimeTermination {
    fn evaluate(&mut self) -> bool {
        match self.deadline {
            Some(deadline) => Instant::now() > deadline,
            None => false,
        }
    }

    fn reset(&mut self) {
        self.deadline = Instant::now().checked_add(self.max_duration);
    }
}

/// Terminates after a fixed number of evaluations.
pub struct MaxIterationsTermination {
    max_iterations: usize,
    iterations: usize,
}

impl MaxIterationsTermination {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            iterations: 0,
        }
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl TerminationCondition for MaxIterationsTermination {
    fn evaluate(&mut self) -> bool {
        if self.iterations >= self.max_iterations {
            return true;
        }
        self.iterations += 1;
        false
    }

    fn reset(&mut self) {
        self.iterations = 0;
    }
}
