/// Reasons a planning call can end without a path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanningError {
    /// The start configuration is in collision.
    #[error("start configuration in collision")]
    StartInCollision,

    /// The goal configuration is in collision.
    #[error("goal configuration in collision")]
    GoalInCollision,

    /// The termination condition was met before the trees were bridged.
    #[error("planning terminated after {iterations} iterations without a path")]
    Timeout { iterations: usize },

    /// The planner options violate their documented ranges.
    #[error("invalid planner options: {0}")]
    InvalidOptions(String),

    /// A constructor argument is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
