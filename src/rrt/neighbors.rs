use crate::rrt::graph::NodeId;
use crate::rrt::state::RealVectorState;
use kiddo::float::{distance::SquaredEuclidean, kdtree::Axis, kdtree::KdTree};
use num_traits::Float;

/// Spatial index over the configurations of one tree.
///
/// Nodes are only ever inserted; a tree never forgets a configuration.
pub trait NearestNeighbors<F: Float, const N: usize> {
    fn new() -> Self;

    /// Indexes `state` under the handle `node`.
    fn insert(&mut self, node: NodeId, state: RealVectorState<F, N>);

    /// The node closest to `state`, or None when nothing is indexed.
    fn nearest(&self, state: &RealVectorState<F, N>) -> Option<NodeId>;

    /// Every node within `radius` of `state`, bounds included, in no particular order.
    fn within_radius(&self, state: &RealVectorState<F, N>, radius: F) -> Vec<NodeId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Brute-force index. Ties in [`NearestNeighbors::nearest`] go to the earliest insertion.
pub struct LinearNearestNeighbors<F: Float, const N: usize> {
    entries: Vec<(NodeId, RealVectorState<F, N>)>,
}

impl<F: Float, const N: usize> NearestNeighbors<F, N> for LinearNearestNeighbors<F, N> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn insert(&mut self, node: NodeId, state: RealVectorState<F, N>) {
        self.entries.push((node, state));
    }

    fn nearest(&self, state: &RealVectorState<F, N>) -> Option<NodeId> {
        let mut best: Option<(NodeId, F)> = None;
        for (node, candidate) in &self.entries {
            let distance = state.euclidean_distance_squared(candidate);
            match best {
                Some((_, best_distance)) if !(distance < best_distance) => {}
                _ => best = Some((*node, distance)),
            }
        }
        best.map(|(node, _)| node)
    }

    fn within_radius(&self, state: &RealVectorState<F, N>, radius: F) -> Vec<NodeId> {
        let radius_squared = radius * radius;
        self.entries
            .iter()
            .filter(|(_, candidate)| state.euclidean_distance_squared(candidate) <= radius_squared)
            .map(|(node, _)| *node)
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Kd-tree index, worthwhile once trees grow to thousands of nodes.
pub struct KdTreeNearestNeighbors<F: Float + Axis, const N: usize> {
    kdtree: KdTree<F, NodeId, N, 32, u32>,
    count: usize,
}

impl<F: Float + Axis, const N: usize> NearestNeighbors<F, N> for KdTreeNearestNeighbors<F, N> {
    fn new() -> Self {
        Self {
            kdtree: KdTree::new(),
            count: 0,
        }
    }

    fn insert(&mut self, node: NodeId, state: RealVectorState<F, N>) {
        self.kdtree.add(state.values(), node);
        self.count += 1;
    }

    fn nearest(&self, state: &RealVectorState<F, N>) -> Option<NodeId> {
        // kiddo answers queries on an empty tree with a default item.
        if self.count == 0 {
            return None;
        }
        Some(
            self.kdtree
                .nearest_one::<SquaredEuclidean>(state.values())
                .item,
        )
    }

    fn within_radius(&self, state: &RealVectorState<F, N>, radius: F) -> Vec<NodeId> {
        self.kdtree
            .within_unsorted::<SquaredEuclidean>(state.values(), radius * radius)
            .into_iter()
            .map(|neighbour| neighbour.item)
            .collect()
    }

    fn len(&self) -> usize {
        self.count
    }
}
