//! Sampling-based motion planning in the joint space of articulated mechanisms.
//!
//! [`rrt::RRTPlanner`] grows one or two Rapidly-exploring Random Trees between a
//! start and a goal configuration, with optional RRTConnect extension and RRT*
//! rewiring. Collision checking and sampling are supplied by the caller through
//! [`rrt::ValidityChecker`] and [`rrt::SamplingDistribution`]; [`obstacles`]
//! provides analytic joint-space obstacles for both.

pub mod obstacles;
pub mod rrt;
pub mod util;
