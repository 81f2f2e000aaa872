use crate::rrt::neighbors::{LinearNearestNeighbors, NearestNeighbors};
use crate::rrt::state::RealVectorState;
use crate::util::json::{float_to_json, real_vector_to_json_array};
use json::JsonValue;
use num_traits::Float;

/// Handle of a node inside one [`Graph`]. Only meaningful for the graph that issued it.
pub type NodeId = usize;

/// A node in a planning tree.
#[derive(Clone, Debug)]
pub struct Node<F: Float, const N: usize> {
    /// The configuration.
    state: RealVectorState<F, N>,
    /// The index of the parent node (None if the node is the root).
    parent: Option<NodeId>,
    /// The indices of the children nodes.
    children: Vec<NodeId>,
    /// Cost of the path from the root to this node.
    cost: F,
}

impl<F: Float, const N: usize> Node<F, N> {
    fn new(state: RealVectorState<F, N>, parent: Option<NodeId>, cost: F) -> Self {
        Self {
            state,
            parent,
            children: Vec::new(),
            cost,
        }
    }

    pub fn state(&self) -> &RealVectorState<F, N> {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn cost(&self) -> F {
        self.cost
    }

    fn add_child(&mut self, child: NodeId) {
        debug_assert!(!self.children.contains(&child));
        self.children.push(child);
    }

    fn remove_child(&mut self, child: NodeId) {
        if let Some(index) = self.children.iter().position(|&x| x == child) {
            self.children.remove(index);
        } else {
            debug_assert!(false, "node {} is not a child of this node", child);
        }
    }
}

/// An undirected edge between two nodes of the same graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge<F: Float> {
    node_a: NodeId,
    node_b: NodeId,
    /// Distance between the two configurations.
    cost: F,
}

impl<F: Float> Edge<F> {
    pub fn node_a(&self) -> NodeId {
        self.node_a
    }

    pub fn node_b(&self) -> NodeId {
        self.node_b
    }

    pub fn cost(&self) -> F {
        self.cost
    }

    /// Whether this edge joins `a` and `b`, in either order.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.node_a == a && self.node_b == b) || (self.node_a == b && self.node_b == a)
    }
}

/// A rooted tree over configurations.
///
/// Parent links are the authoritative structure; the edge list mirrors them so
/// that external tools can draw the tree. The first node added is the root.
pub struct Graph<F: Float, const N: usize, NN = LinearNearestNeighbors<F, N>>
where
    NN: NearestNeighbors<F, N>,
{
    nodes: Vec<Node<F, N>>,
    edges: Vec<Edge<F>>,
    nearest_neighbors: NN,
}

impl<F: Float, const N: usize, NN: NearestNeighbors<F, N>> Graph<F, N, NN> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            nearest_neighbors: NN::new(),
        }
    }

    /// Adds a parentless node with zero cost.
    pub fn add_root(&mut self, state: RealVectorState<F, N>) -> NodeId {
        self.add_node(Node::new(state, None, F::zero()))
    }

    /// Adds a node as a child of `parent`, together with the connecting edge.
    ///
    /// The cost of the new node is the parent's cost plus the edge cost.
    pub fn add_child(&mut self, state: RealVectorState<F, N>, parent: NodeId) -> NodeId {
        let parent_cost = self.nodes[parent].cost;
        let index = self.add_node(Node::new(state, Some(parent), parent_cost));
        let edge = self.add_edge(parent, index);
        self.nodes[index].cost = parent_cost + edge.cost;
        self.nodes[parent].add_child(index);
        index
    }

    /// Adds an edge between two existing nodes. The cost is the distance between them.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Edge<F> {
        let cost = self.nodes[a]
            .state
            .euclidean_distance(&self.nodes[b].state);
        let edge = Edge {
            node_a: a,
            node_b: b,
            cost,
        };
        self.edges.push(edge);
        edge
    }

    /// Removes the edge joining `a` and `b`. The nodes themselves are kept.
    ///
    /// Returns the removed edge, or None if there was no such edge.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Option<Edge<F>> {
        let position = self.edges.iter().position(|edge| edge.connects(a, b))?;
        Some(self.edges.remove(position))
    }

    /// Replaces the parent of `node` with `new_parent`.
    ///
    /// The old edge is swapped for the new one and the costs of `node` and all of
    /// its descendants are updated before returning, so parent, edge and cost
    /// always agree when observed from outside.
    ///
    /// Returns false (and leaves the graph untouched) if `node` is a root or if
    /// `new_parent` lies in the subtree of `node`.
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) -> bool {
        let old_parent = match self.nodes[node].parent {
            Some(parent) => parent,
            None => return false,
        };
        if self.is_in_subtree(new_parent, node) {
            return false;
        }

        self.remove_edge(node, old_parent);
        self.nodes[old_parent].remove_child(node);
        let edge = self.add_edge(new_parent, node);
        self.nodes[new_parent].add_child(node);
        self.nodes[node].parent = Some(new_parent);
        self.nodes[node].cost = self.nodes[new_parent].cost + edge.cost;
        self.propagate_cost(node);
        true
    }

    /// Finds the node closest to `state`, if the graph is not empty.
    pub fn nearest(&self, state: &RealVectorState<F, N>) -> Option<NodeId> {
        self.nearest_neighbors.nearest(state)
    }

    /// Finds all nodes within `radius` of `state`, ordered by node id.
    pub fn within_radius(&self, state: &RealVectorState<F, N>, radius: F) -> Vec<NodeId> {
        let mut within = self.nearest_neighbors.within_radius(state, radius);
        within.sort_unstable();
        within
    }

    pub fn node(&self, id: NodeId) -> &Node<F, N> {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<F, N>> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[Node<F, N>] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge<F>] {
        &self.edges
    }

    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the configurations from `id` up to the root, `id` first.
    pub fn path_to_root(&self, id: NodeId) -> Vec<RealVectorState<F, N>> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(index) = current {
            path.push(self.nodes[index].state);
            current = self.nodes[index].parent;
        }
        path
    }

    /// Checks that every node's cost equals the summed edge distances to the root.
    pub fn check_costs(&self, tolerance: F) -> bool {
        for (index, node) in self.nodes.iter().enumerate() {
            let expected = match node.parent {
                Some(parent) => {
                    self.nodes[parent].cost
                        + node.state.euclidean_distance(&self.nodes[parent].state)
                }
                None => F::zero(),
            };
            if (expected - node.cost).abs() > tolerance {
                log::debug!(
                    "Cost mismatch for node {}: expected {:?}, stored {:?}",
                    index,
                    expected.to_f64(),
                    node.cost.to_f64()
                );
                return false;
            }
        }
        true
    }

    /// Checks the tree invariants: a single root, no cycles, child lists that match
    /// the parent links and exactly one edge per parent link.
    pub fn is_tree(&self) -> bool {
        if self.nodes.is_empty() {
            return self.edges.is_empty();
        }
        if self.edges.len() != self.nodes.len() - 1 {
            return false;
        }
        for (index, node) in self.nodes.iter().enumerate() {
            match node.parent {
                None if index != 0 => return false,
                None => {}
                Some(parent) => {
                    if parent >= self.nodes.len()
                        || !self.nodes[parent].children.contains(&index)
                        || !self.edges.iter().any(|edge| edge.connects(index, parent))
                    {
                        return false;
                    }
                }
            }
            if node
                .children
                .iter()
                .any(|&child| self.nodes.get(child).and_then(|c| c.parent) != Some(index))
            {
                return false;
            }
            // Walking up must reach the root within `len` steps.
            let mut steps = 0;
            let mut current = node.parent;
            while let Some(parent) = current {
                steps += 1;
                if steps > self.nodes.len() {
                    return false;
                }
                current = self.nodes[parent].parent;
            }
        }
        true
    }

    /// Exports the nodes and edges for external visualization.
    pub fn to_json(&self) -> JsonValue {
        let nodes = self
            .nodes
            .iter()
            .map(|node| {
                let parent = match node.parent {
                    Some(parent) => JsonValue::from(parent),
                    None => JsonValue::Null,
                };
                json::object! {
                    state: real_vector_to_json_array(&node.state),
                    parent: parent,
                    cost: float_to_json(node.cost),
                }
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|edge| {
                json::object! {
                    a: edge.node_a,
                    b: edge.node_b,
                    cost: float_to_json(edge.cost),
                }
            })
            .collect();
        json::object! {
            nodes: JsonValue::Array(nodes),
            edges: JsonValue::Array(edges),
        }
    }

    /// Adds a node to the node list and the nearest neighbors data structure.
    fn add_node(&mut self, node: Node<F, N>) -> NodeId {
        let index = self.nodes.len();
        self.nearest_neighbors.insert(index, node.state);
        self.nodes.push(node);
        index
    }

    /// Whether `id` is `ancestor` or one of its descendants.
    fn is_in_subtree(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(index) = current {
            if index == ancestor {
                return true;
            }
            current = self.nodes[index].parent;
        }
        false
    }

    /// Recomputes the costs of all descendants of `id` from their parents.
    fn propagate_cost(&mut self, id: NodeId) {
        let mut stack = self.nodes[id].children.clone();
        while let Some(child) = stack.pop() {
            if let Some(parent) = self.nodes[child].parent {
                let edge_cost = self.nodes[child]
                    .state
                    .euclidean_distance(&self.nodes[parent].state);
                self.nodes[child].cost = self.nodes[parent].cost + edge_cost;
            }
            stack.extend_from_slice(&self.nodes[child].children);
        }
    }
}

impl<F: Float, const N: usize, NN: NearestNeighbors<F, N>> Default for Graph<F, N, NN> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rrt::neighbors::KdTreeNearestNeighbors;

    fn state(x: f64, y: f64) -> RealVectorState<f64, 2> {
        RealVectorState::new([x, y])
    }

    #[test]
    fn test_add_child_sets_cost_and_edge() {
        let mut graph: Graph<f64, 2> = Graph::new();
        let root = graph.add_root(state(0.0, 0.0));
        let a = graph.add_child(state(3.0, 4.0), root);
        let b = graph.add_child(state(3.0, 5.0), a);

        assert_eq!(graph.root(), Some(root));
        assert_eq!(graph.node(root).cost(), 0.0);
        assert_eq!(graph.node(a).cost(), 5.0);
        assert_eq!(graph.node(b).cost(), 6.0);
        assert_eq!(graph.node(b).parent(), Some(a));
        assert_eq!(graph.node(root).children(), &[a]);
        assert_eq!(graph.edges().len(), 2);
        assert!(graph.is_tree());
        assert!(graph.check_costs(1e-12));
        assert_eq!(
            graph.path_to_root(b),
            vec![state(3.0, 5.0), state(3.0, 4.0), state(0.0, 0.0)]
        );
    }

    #[test]
    fn test_remove_edge_keeps_nodes() {
        let mut graph: Graph<f64, 2> = Graph::new();
        let root = graph.add_root(state(0.0, 0.0));
        let a = graph.add_child(state(1.0, 0.0), root);

        let removed = graph.remove_edge(a, root).unwrap();
        assert_eq!(removed.cost(), 1.0);
        assert!(graph.edges().is_empty());
        assert_eq!(graph.len(), 2);
        assert!(graph.remove_edge(a, root).is_none());
        assert!(!graph.is_tree());
    }

    #[test]
    fn test_reparent_updates_subtree_costs() {
        let mut graph: Graph<f64, 2> = Graph::new();
        let root = graph.add_root(state(0.0, 0.0));
        let detour = graph.add_child(state(0.0, 2.0), root);
        let a = graph.add_child(state(1.0, 2.0), detour);
        let b = graph.add_child(state(2.0, 2.0), a);
        let shortcut = graph.add_child(state(1.0, 1.0), root);

        assert!(graph.reparent(a, shortcut));
        assert_eq!(graph.node(a).parent(), Some(shortcut));
        assert!((graph.node(a).cost() - (2.0_f64.sqrt() + 1.0)).abs() < 1e-12);
        assert!((graph.node(b).cost() - (2.0_f64.sqrt() + 2.0)).abs() < 1e-12);
        assert!(graph.node(detour).children().is_empty());
        assert!(graph.is_tree());
        assert!(graph.check_costs(1e-12));
    }

    #[test]
    fn test_reparent_rejects_cycles_and_roots() {
        let mut graph: Graph<f64, 2> = Graph::new();
        let root = graph.add_root(state(0.0, 0.0));
        let a = graph.add_child(state(1.0, 0.0), root);
        let b = graph.add_child(state(2.0, 0.0), a);

        assert!(!graph.reparent(a, b));
        assert!(!graph.reparent(a, a));
        assert!(!graph.reparent(root, b));
        assert_eq!(graph.node(a).parent(), Some(root));
        assert!(graph.is_tree());
    }

    #[test]
    fn test_nearest_with_both_indices() {
        let mut linear: Graph<f64, 2> = Graph::new();
        let mut kdtree: Graph<f64, 2, KdTreeNearestNeighbors<f64, 2>> = Graph::new();
        assert_eq!(linear.nearest(&state(0.0, 0.0)), None);

        let linear_root = linear.add_root(state(0.0, 0.0));
        let kdtree_root = kdtree.add_root(state(0.0, 0.0));
        linear.add_child(state(1.0, 1.0), linear_root);
        kdtree.add_child(state(1.0, 1.0), kdtree_root);

        assert_eq!(linear.nearest(&state(0.9, 0.8)), Some(1));
        assert_eq!(kdtree.nearest(&state(0.9, 0.8)), Some(1));
        assert_eq!(linear.within_radius(&state(0.0, 0.0), 2.0), vec![0, 1]);
        assert_eq!(kdtree.within_radius(&state(0.0, 0.0), 2.0), vec![0, 1]);
    }

    #[test]
    fn test_to_json() {
        let mut graph: Graph<f64, 2> = Graph::new();
        let root = graph.add_root(state(0.0, 0.0));
        graph.add_child(state(0.0, 1.0), root);

        let exported = graph.to_json();
        assert_eq!(exported["nodes"].len(), 2);
        assert!(exported["nodes"][0]["parent"].is_null());
        assert_eq!(exported["nodes"][1]["parent"], 0);
        assert_eq!(exported["nodes"][1]["state"][1], 1.0);
        assert_eq!(exported["edges"][0]["cost"], 1.0);
    }
}
