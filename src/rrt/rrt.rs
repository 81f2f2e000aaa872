use crate::rrt::discretize::discretize;
use crate::rrt::error::PlanningError;
use crate::rrt::graph::{Graph, NodeId};
use crate::rrt::neighbors::{LinearNearestNeighbors, NearestNeighbors};
use crate::rrt::options::{ExtensionStrategy, PlannerOptions};
use crate::rrt::rrt_star::{insert_node, Rewiring};
use crate::rrt::sampling::SamplingDistribution;
use crate::rrt::state::RealVectorState;
use crate::rrt::termination::{MaxTimeTermination, TerminationCondition};
use crate::rrt::validity_checker::ValidityChecker;
use log::{debug, info, warn};
use num_traits::Float;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where the start tree and the goal tree were joined.
///
/// The endpoints are the two nodes whose connecting segment closed the gap.
/// When the trees were joined by growth, the endpoint of the growing tree is a
/// copy of the other tree's endpoint configuration.
///
/// The path is the start tree walk from `start_terminal` (reversed) followed by
/// the goal tree walk from `goal_terminal`. A terminal skips the duplicated
/// configuration, so it may differ from the endpoint, and None means an empty walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bridge {
    pub start_endpoint: NodeId,
    pub goal_endpoint: NodeId,
    pub start_terminal: Option<NodeId>,
    pub goal_terminal: Option<NodeId>,
}

/// What a single growth iteration did to the active tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Growth {
    /// No configuration could be added.
    Blocked,
    /// A node was added but the trees stay apart.
    Extended,
    /// A node was added and joined to the other tree.
    Bridged(Bridge),
}

/// Option values converted to the planner's float type.
#[derive(Clone, Copy)]
struct Thresholds<F: Float> {
    max_angle_step: F,
    max_connection_dist: F,
    rewiring: Rewiring<F>,
}

impl<F: Float> Thresholds<F> {
    fn from_options(options: &PlannerOptions) -> Result<Self, PlanningError> {
        let convert = |value: f64, name: &str| {
            F::from(value).ok_or_else(|| {
                PlanningError::InvalidOptions(format!("{} is not representable: {}", name, value))
            })
        };
        let max_angle_step = convert(options.max_angle_step, "max_angle_step")?;
        let rewiring = if options.rrt_star {
            Rewiring::NewNode {
                max_rewire_dist: convert(options.max_rewire_dist, "max_rewire_dist")?,
                max_angle_step,
            }
        } else {
            Rewiring::Disabled
        };
        Ok(Self {
            max_angle_step,
            max_connection_dist: convert(options.max_connection_dist, "max_connection_dist")?,
            rewiring,
        })
    }
}

/// Grows from `from` towards `target` in steps of at most `max_connection_dist`.
///
/// Each proposed configuration must be valid and reachable from the previous one
/// along a collision-free discretized segment. With [`ExtensionStrategy::Extend`]
/// at most one step is taken; with [`ExtensionStrategy::Connect`] steps repeat
/// until the target is reached or a step is blocked.
///
/// Returns the farthest accepted configuration, or None if the first step was
/// blocked or `target` coincides with `from`.
pub fn extend_or_connect<F: Float, const N: usize>(
    from: &RealVectorState<F, N>,
    target: &RealVectorState<F, N>,
    strategy: ExtensionStrategy,
    max_connection_dist: F,
    max_angle_step: F,
    validity_checker: &dyn ValidityChecker<F, N>,
) -> Option<RealVectorState<F, N>> {
    let direction = *target - *from;
    let distance = direction.norm();
    if distance == F::zero() {
        debug!("Sample coincides with its nearest node, skipping extension");
        return None;
    }
    let increment = direction / distance * max_connection_dist;

    let mut current = *from;
    let mut accepted = None;
    loop {
        let (candidate, reached) = if current.euclidean_distance(target) > max_connection_dist {
            (current + increment, false)
        } else {
            (*target, true)
        };

        if !validity_checker.is_state_valid(&candidate)
            || !validity_checker.is_segment_valid(&current, &candidate, max_angle_step)
        {
            break;
        }
        current = candidate;
        accepted = Some(candidate);

        if reached || strategy == ExtensionStrategy::Extend {
            break;
        }
    }
    accepted
}

/// A bidirectional Rapidly-exploring Random Tree planner in joint space.
///
/// Supports single-step extension or RRTConnect, one or two trees, and RRT*
/// rewiring of inserted nodes.
///
/// Template Parameters:
/// - `F`: The floating-point type.
/// - `N`: The number of joints.
/// - `NN`: The nearest neighbors data structure of both trees.
pub struct RRTPlanner<F: Float, const N: usize, NN = LinearNearestNeighbors<F, N>>
where
    NN: NearestNeighbors<F, N>,
{
    validity_checker: Box<dyn ValidityChecker<F, N>>,
    sampling_distribution: Box<dyn SamplingDistribution<F, N>>,
    /// Drives the goal biasing draws.
    rng: StdRng,
    options: PlannerOptions,
    start_tree: Graph<F, N, NN>,
    goal_tree: Graph<F, N, NN>,
    /// The most recently grown node of the start and goal tree.
    latest_nodes: (Option<NodeId>, Option<NodeId>),
    bridge: Option<Bridge>,
    latest_path: Vec<RealVectorState<F, N>>,
    iterations: usize,
}

impl<F: Float, const N: usize, NN: NearestNeighbors<F, N>> RRTPlanner<F, N, NN> {
    /// Constructs a new planner.
    ///
    /// Parameters:
    /// - `validity_checker`: Checks if configurations and paths are collision free.
    /// - `sampling_distribution`: Draws random configurations.
    pub fn new(
        validity_checker: Box<dyn ValidityChecker<F, N>>,
        sampling_distribution: Box<dyn SamplingDistribution<F, N>>,
    ) -> Self {
        Self {
            validity_checker,
            sampling_distribution,
            rng: StdRng::from_entropy(),
            options: PlannerOptions::default(),
            start_tree: Graph::new(),
            goal_tree: Graph::new(),
            latest_nodes: (None, None),
            bridge: None,
            latest_path: Vec::new(),
            iterations: 0,
        }
    }

    /// Seeds the planner and its sampling distribution, see [`RRTPlanner::seed`].
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed(seed);
        self
    }

    /// Reseeds the goal biasing draws and the sampling distribution.
    ///
    /// Two plans started right after seeding with the same value grow identical trees.
    pub fn seed(&mut self, seed: u64) {
        self.sampling_distribution.seed(seed);
        // Offset so the biasing draws do not replay the sampler's stream.
        self.rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    }

    /// Clears both trees, the latest path and the iteration count.
    pub fn reset(&mut self) {
        self.start_tree = Graph::new();
        self.goal_tree = Graph::new();
        self.latest_nodes = (None, None);
        self.bridge = None;
        self.latest_path.clear();
        self.iterations = 0;
    }

    /// Plans a path from `q_start` to `q_goal` within `options.max_planning_time`.
    ///
    /// Returns the waypoints from start to goal, inclusive. On failure the latest
    /// path is left empty.
    pub fn plan(
        &mut self,
        q_start: RealVectorState<F, N>,
        q_goal: RealVectorState<F, N>,
        options: &PlannerOptions,
    ) -> Result<Vec<RealVectorState<F, N>>, PlanningError> {
        self.reset();
        let mut termination = MaxTimeTermination::new(options.planning_duration()?);
        self.plan_until_solved_or(q_start, q_goal, options, &mut termination)
    }

    /// Plans a path, stopping once `termination` is met.
    ///
    /// The termination condition is evaluated once at the top of every growth
    /// iteration; `options.max_planning_time` is ignored.
    pub fn plan_until_solved_or<T: TerminationCondition>(
        &mut self,
        q_start: RealVectorState<F, N>,
        q_goal: RealVectorState<F, N>,
        options: &PlannerOptions,
        termination: &mut T,
    ) -> Result<Vec<RealVectorState<F, N>>, PlanningError> {
        self.reset();
        options.validate()?;
        let thresholds = Thresholds::from_options(options)?;
        self.options = options.clone();

        let start_root = self.start_tree.add_root(q_start);
        let goal_root = self.goal_tree.add_root(q_goal);
        self.latest_nodes = (Some(start_root), Some(goal_root));

        if !self.validity_checker.is_state_valid(&q_start) {
            info!("Start configuration in collision.");
            return Err(PlanningError::StartInCollision);
        }
        if !self.validity_checker.is_state_valid(&q_goal) {
            info!("Goal configuration in collision.");
            return Err(PlanningError::GoalInCollision);
        }

        let mut bridge = None;
        if self
            .validity_checker
            .is_segment_valid(&q_start, &q_goal, thresholds.max_angle_step)
        {
            info!("Start and goal can be directly connected!");
            bridge = Some(Bridge {
                start_endpoint: start_root,
                goal_endpoint: goal_root,
                start_terminal: Some(start_root),
                goal_terminal: Some(goal_root),
            });
        }

        let mut start_tree_phase = true;
        while bridge.is_none() {
            if termination.evaluate() {
                warn!(
                    "Planning terminated after {} iterations without a path.",
                    self.iterations
                );
                return Err(PlanningError::Timeout {
                    iterations: self.iterations,
                });
            }
            self.iterations += 1;
            match self.iteration(start_tree_phase, &thresholds) {
                Growth::Blocked => {}
                Growth::Extended => {
                    // Only a tree that grew hands over to the other one.
                    if options.bidirectional_rrt {
                        start_tree_phase = !start_tree_phase;
                    }
                }
                Growth::Bridged(joined) => bridge = Some(joined),
            }
        }

        let Some(bridge) = bridge else {
            return Err(PlanningError::Timeout {
                iterations: self.iterations,
            });
        };
        self.bridge = Some(bridge);
        self.latest_path = self.extract_path_from_trees(bridge.start_terminal, bridge.goal_terminal);
        info!(
            "Found a path with {} waypoints after {} iterations ({} start tree nodes, {} goal tree nodes).",
            self.latest_path.len(),
            self.iterations,
            self.start_tree.len(),
            self.goal_tree.len()
        );
        Ok(self.latest_path.clone())
    }

    /// Grows the active tree by one iteration.
    ///
    /// Each iteration consists of the following steps:
    /// 1. Sample a configuration (or the other tree's root, with the goal biasing probability).
    /// 2. Find the nearest node in the active tree.
    /// 3. Extend or connect from that node towards the sample.
    /// 4. Insert the reached configuration, rewiring it if RRT* is enabled.
    /// 5. Try to join the new node to its nearest node in the other tree.
    ///
    /// Reports whether the active tree grew and whether it reached the other tree.
    fn iteration(&mut self, start_tree_phase: bool, thresholds: &Thresholds<F>) -> Growth {
        let target = if self.rng.gen::<f64>() < self.options.goal_biasing_probability {
            let other_tree = if start_tree_phase {
                &self.goal_tree
            } else {
                &self.start_tree
            };
            match other_tree.root() {
                Some(root) => *other_tree.node(root).state(),
                None => return Growth::Blocked,
            }
        } else {
            self.sampling_distribution.sample()
        };

        let validity_checker = self.validity_checker.as_ref();
        let (tree, other_tree) = if start_tree_phase {
            (&mut self.start_tree, &self.goal_tree)
        } else {
            (&mut self.goal_tree, &self.start_tree)
        };

        let Some(nearest) = tree.nearest(&target) else {
            return Growth::Blocked;
        };
        let Some(new_state) = extend_or_connect(
            tree.node(nearest).state(),
            &target,
            self.options.extension_strategy(),
            thresholds.max_connection_dist,
            thresholds.max_angle_step,
            validity_checker,
        ) else {
            return Growth::Blocked;
        };
        let new_node = insert_node(
            tree,
            new_state,
            nearest,
            validity_checker,
            thresholds.rewiring,
        );
        if start_tree_phase {
            self.latest_nodes.0 = Some(new_node);
        } else {
            self.latest_nodes.1 = Some(new_node);
        }

        // Check if the new node connects directly to the other tree.
        let Some(other_nearest) = other_tree.nearest(&new_state) else {
            return Growth::Extended;
        };
        let other_state = *other_tree.node(other_nearest).state();
        if !validity_checker.is_segment_valid(&new_state, &other_state, thresholds.max_angle_step)
        {
            return Growth::Extended;
        }

        // The joining configuration is copied into the active tree. The other tree
        // continues from its parent so that the configuration appears only once.
        let terminal = if new_state == other_state {
            new_node
        } else {
            insert_node(
                tree,
                other_state,
                new_node,
                validity_checker,
                thresholds.rewiring,
            )
        };
        let other_terminal = other_tree.node(other_nearest).parent();
        debug!(
            "Bridged node {} of the {} tree to node {} of the other tree.",
            terminal,
            if start_tree_phase { "start" } else { "goal" },
            other_nearest
        );

        if start_tree_phase {
            self.latest_nodes.0 = Some(terminal);
            Growth::Bridged(Bridge {
                start_endpoint: terminal,
                goal_endpoint: other_nearest,
                start_terminal: Some(terminal),
                goal_terminal: other_terminal,
            })
        } else {
            self.latest_nodes.1 = Some(terminal);
            Growth::Bridged(Bridge {
                start_endpoint: other_nearest,
                goal_endpoint: terminal,
                start_terminal: other_terminal,
                goal_terminal: Some(terminal),
            })
        }
    }

    /// Extracts a path from the two trees.
    ///
    /// Walks from `start_terminal` to the start root and reverses that sequence, then
    /// appends the walk from `goal_terminal` to the goal root.
    ///
    /// Parameters:
    /// - `start_terminal`: The last node of the start tree, or None to skip the start tree.
    /// - `goal_terminal`: The last node of the goal tree, or None to skip the goal tree.
    pub fn extract_path_from_trees(
        &self,
        start_terminal: Option<NodeId>,
        goal_terminal: Option<NodeId>,
    ) -> Vec<RealVectorState<F, N>> {
        let mut path = match start_terminal {
            Some(node) => self.start_tree.path_to_root(node),
            None => Vec::new(),
        };
        path.reverse();
        if let Some(node) = goal_terminal {
            path.extend(self.goal_tree.path_to_root(node));
        }
        path
    }

    /// The latest path, densely discretized with the planning `max_angle_step`.
    ///
    /// This is the sequence a visualizer or trajectory follower consumes.
    pub fn discretized_path(&self) -> Vec<RealVectorState<F, N>> {
        let max_angle_step = F::from(self.options.max_angle_step).unwrap_or_else(F::nan);
        let mut dense = Vec::new();
        for pair in self.latest_path.windows(2) {
            let segment = discretize(&pair[0], &pair[1], max_angle_step);
            let skip = if dense.is_empty() { 0 } else { 1 };
            dense.extend(segment.into_iter().skip(skip));
        }
        if dense.is_empty() {
            dense.extend(self.latest_path.first().copied());
        }
        dense
    }

    /// The path found by the last successful plan, empty otherwise.
    pub fn latest_path(&self) -> &[RealVectorState<F, N>] {
        &self.latest_path
    }

    pub fn start_tree(&self) -> &Graph<F, N, NN> {
        &self.start_tree
    }

    /// The goal tree. Holds only the goal root unless bidirectional planning is enabled.
    pub fn goal_tree(&self) -> &Graph<F, N, NN> {
        &self.goal_tree
    }

    /// The most recently grown node of the start tree and the goal tree.
    pub fn latest_nodes(&self) -> (Option<NodeId>, Option<NodeId>) {
        self.latest_nodes
    }

    /// Where the trees were joined in the last successful plan.
    pub fn bridge(&self) -> Option<Bridge> {
        self.bridge
    }

    /// Number of growth iterations run by the last plan.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The options of the last plan.
    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    pub fn validity_checker(&self) -> &dyn ValidityChecker<F, N> {
        self.validity_checker.as_ref()
    }
}
