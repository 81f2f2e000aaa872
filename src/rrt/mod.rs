pub mod discretize;
pub mod error;
pub mod graph;
pub mod neighbors;
pub mod options;
pub mod rrt;
pub mod rrt_star;
pub mod sampling;
pub mod state;
pub mod termination;
pub mod validity_checker;

pub use discretize::discretize;
pub use error::PlanningError;
pub use graph::{Edge, Graph, Node, NodeId};
pub use neighbors::{KdTreeNearestNeighbors, LinearNearestNeighbors, NearestNeighbors};
pub use options::{ExtensionStrategy, PlannerOptions};
pub use rrt::{extend_or_connect, Bridge, RRTPlanner};
pub use rrt_star::{insert_node, rewire_to_best_parent, Rewiring};
pub use sampling::{SamplingDistribution, UniformDistribution};
pub use state::RealVectorState;
pub use termination::{MaxIterationsTermination, MaxTimeTermination, TerminationCondition};
pub use validity_checker::{AlwaysValid, UnionValidityChecker, ValidityChecker};
