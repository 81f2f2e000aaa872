use crate::rrt::graph::{Graph, NodeId};
use crate::rrt::neighbors::NearestNeighbors;
use crate::rrt::state::RealVectorState;
use crate::rrt::validity_checker::ValidityChecker;
use num_traits::Float;

/// Whether, and how far, newly inserted nodes look for a cheaper parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rewiring<F: Float> {
    /// Keep the parent chosen by the extension.
    Disabled,
    /// RRT*-style rewiring of the inserted node only.
    NewNode {
        /// Nodes farther away than this are not considered.
        max_rewire_dist: F,
        /// Discretization step used to validate the replacement edge.
        max_angle_step: F,
    },
}

/// Inserts `state` into `tree` as a child of `parent`, then rewires it if enabled.
///
/// Returns the index of the new node.
pub fn insert_node<F: Float, const N: usize, NN: NearestNeighbors<F, N>>(
    tree: &mut Graph<F, N, NN>,
    state: RealVectorState<F, N>,
    parent: NodeId,
    validity_checker: &dyn ValidityChecker<F, N>,
    rewiring: Rewiring<F>,
) -> NodeId {
    let node = tree.add_child(state, parent);
    if let Rewiring::NewNode {
        max_rewire_dist,
        max_angle_step,
    } = rewiring
    {
        rewire_to_best_parent(tree, node, validity_checker, max_rewire_dist, max_angle_step);
    }
    node
}

/// Finds a cheaper parent for `node` among the other nodes of its tree.
///
/// Candidates are visited in node order. The node's original parent and the node
/// itself are skipped, as is every candidate farther than `max_rewire_dist`. A
/// candidate is taken when going through it is strictly cheaper than the node's
/// current cost and the connecting segment is collision free; later candidates
/// are compared against the improved cost. Only `node` is rewired, never the
/// existing nodes around it.
///
/// Returns the number of times the parent was replaced.
pub fn rewire_to_best_parent<F: Float, const N: usize, NN: NearestNeighbors<F, N>>(
    tree: &mut Graph<F, N, NN>,
    node: NodeId,
    validity_checker: &dyn ValidityChecker<F, N>,
    max_rewire_dist: F,
    max_angle_step: F,
) -> usize {
    let state = *tree.node(node).state();
    let original_parent = tree.node(node).parent();
    let candidates: Vec<NodeId> = if max_rewire_dist.is_finite() {
        tree.within_radius(&state, max_rewire_dist)
    } else {
        (0..tree.len()).collect()
    };

    let mut rewires = 0;
    for candidate in candidates {
        if candidate == node || Some(candidate) == original_parent {
            continue;
        }
        let candidate_state = *tree.node(candidate).state();
        let distance = candidate_state.euclidean_distance(&state);
        if distance > max_rewire_dist {
            continue;
        }
        let new_cost = tree.node(candidate).cost() + distance;
        if new_cost >= tree.node(node).cost() {
            continue;
        }
        if validity_checker.is_segment_valid(&state, &candidate_state, max_angle_step)
            && tree.reparent(node, candidate)
        {
            log::trace!(
                "Rewired node {} to parent {} (cost {:?})",
                node,
                candidate,
                new_cost.to_f64()
            );
            rewires += 1;
        }
    }
    rewires
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rrt::validity_checker::AlwaysValid;

    fn state(x: f64, y: f64) -> RealVectorState<f64, 2> {
        RealVectorState::new([x, y])
    }

    /// Blocks every configuration with 0.4 < x < 0.6 and y < 0.5.
    struct Wall;

    impl ValidityChecker<f64, 2> for Wall {
        fn is_state_valid(&self, state: &RealVectorState<f64, 2>) -> bool {
            !(state[0] > 0.4 && state[0] < 0.6 && state[1] < 0.5)
        }
    }

    /// root (0,0) -> a (0,1) -> b (1,1), plus a direct neighbour c (1,0) of the root.
    fn detour_tree() -> Graph<f64, 2> {
        let mut tree = Graph::new();
        let root = tree.add_root(state(0.0, 0.0));
        let a = tree.add_child(state(0.0, 1.0), root);
        tree.add_child(state(1.0, 1.0), a);
        tree.add_child(state(1.0, 0.0), root);
        tree
    }

    #[test]
    fn test_disabled_keeps_chosen_parent() {
        let mut tree = detour_tree();
        let node = insert_node(
            &mut tree,
            state(1.0, 0.5),
            2,
            &AlwaysValid::new(),
            Rewiring::Disabled,
        );
        assert_eq!(tree.node(node).parent(), Some(2));
        assert!((tree.node(node).cost() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_rewires_new_node_to_cheaper_parent() {
        let mut tree = detour_tree();
        let node = insert_node(
            &mut tree,
            state(1.0, 0.5),
            2,
            &AlwaysValid::new(),
            Rewiring::NewNode {
                max_rewire_dist: f64::INFINITY,
                max_angle_step: 0.05,
            },
        );
        // Through the root directly: sqrt(1.25) < 1.5 via c, < 2.5 via b.
        assert_eq!(tree.node(node).parent(), Some(0));
        assert!((tree.node(node).cost() - 1.25_f64.sqrt()).abs() < 1e-12);
        assert!(tree.is_tree());
        assert!(tree.check_costs(1e-12));
        assert_eq!(tree.edges().len(), tree.len() - 1);
    }

    #[test]
    fn test_rewire_distance_limits_candidates() {
        let mut tree = detour_tree();
        let node = insert_node(
            &mut tree,
            state(1.0, 0.5),
            2,
            &AlwaysValid::new(),
            Rewiring::NewNode {
                max_rewire_dist: 0.6,
                max_angle_step: 0.05,
            },
        );
        // Only c (1,0) is in range.
        assert_eq!(tree.node(node).parent(), Some(3));
        assert!((tree.node(node).cost() - 1.5).abs() < 1e-12);
        assert!(tree.check_costs(1e-12));
    }

    #[test]
    fn test_rewire_skips_blocked_segments() {
        let mut tree: Graph<f64, 2> = Graph::new();
        let root = tree.add_root(state(0.0, 0.0));
        let up = tree.add_child(state(0.0, 1.0), root);
        let over = tree.add_child(state(1.0, 1.0), up);

        // The straight segment back to the root crosses the wall.
        let node = insert_node(
            &mut tree,
            state(1.0, 0.0),
            over,
            &Wall,
            Rewiring::NewNode {
                max_rewire_dist: f64::INFINITY,
                max_angle_step: 0.01,
            },
        );
        assert_eq!(tree.node(node).parent(), Some(over));
        assert!((tree.node(node).cost() - 3.0).abs() < 1e-12);

        assert_eq!(rewire_to_best_parent(&mut tree, node, &Wall, f64::INFINITY, 0.01), 0);
    }
}
