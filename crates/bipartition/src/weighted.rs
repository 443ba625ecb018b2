use petgraph::graphmap::UnGraphMap;
use tracing::{info, instrument};

use crate::partition::{Bipartition, PartitionError, Side, Vertex};

/// An undirected graph with `f64` edge weights over a fixed vertex set.
///
/// Adjacency is symmetric: an edge `(x, y, w)` is visible from both endpoints with weight `w`.
#[derive(Clone, Debug)]
pub struct WeightedGraph<V: Vertex> {
    graph: UnGraphMap<V, f64>,
}

impl<V: Vertex> WeightedGraph<V> {
    /// Create a graph on `vertices` without edges.
    pub fn new(vertices: impl IntoIterator<Item = V>) -> Self {
        let mut graph = UnGraphMap::new();
        for v in vertices {
            graph.add_node(v);
        }
        Self { graph }
    }

    /// Create a graph on `vertices` with the given weighted edges.
    ///
    /// If an edge is given more than once, the last weight is kept.
    ///
    /// # Errors
    ///
    /// Returns [PartitionError::UnknownVertex] if an edge has an endpoint that is not in
    /// `vertices`.
    #[instrument(skip_all)]
    pub fn from_edges(
        vertices: impl IntoIterator<Item = V>,
        edges: impl IntoIterator<Item = (V, V, f64)>,
    ) -> Result<Self, PartitionError<V>> {
        let mut graph = Self::new(vertices);
        for (x, y, w) in edges {
            graph.add_edge(x, y, w)?;
        }
        info!(n = graph.vertex_count(), m = graph.edge_count());
        Ok(graph)
    }

    /// Add the edge `{x, y}` with weight `w` and return the previous weight, if any.
    ///
    /// # Errors
    ///
    /// Returns [PartitionError::UnknownVertex] if `x` or `y` is not a vertex of the graph.
    pub fn add_edge(&mut self, x: V, y: V, w: f64) -> Result<Option<f64>, PartitionError<V>> {
        for v in [x, y] {
            if !self.graph.contains_node(v) {
                return Err(PartitionError::UnknownVertex(v));
            }
        }
        Ok(self.graph.add_edge(x, y, w))
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if `v` is a vertex of the graph.
    pub fn contains_vertex(&self, v: V) -> bool {
        self.graph.contains_node(v)
    }

    /// Iterate over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = V> + '_ {
        self.graph.nodes()
    }

    /// The weight of the edge `{x, y}`, or `0.0` if there is no such edge.
    pub fn weight(&self, x: V, y: V) -> f64 {
        self.graph.edge_weight(x, y).copied().unwrap_or(0.0)
    }

    /// Sum of the weights of the edges from `x` to vertices on `side`.
    fn weight_to(&self, partition: &Bipartition<V>, x: V, side: Side) -> f64 {
        let side = partition.side(side);
        self.graph.edges(x).filter(|(_, v, _)| side.contains(v)).map(|(_, _, w)| *w).sum()
    }

    /// The gain of exchanging `x` and `y`, where `y` is on the side opposite to `x`.
    ///
    /// With `E` the external and `I` the internal weight of a vertex and `c` the weight of the
    /// edge `{x, y}`, the gain is `(E(x) - I(x)) + (E(y) - I(y)) - 2c`. Returns `None` if `x` or
    /// `y` is not in `partition`.
    pub fn gain(&self, partition: &Bipartition<V>, x: V, y: V) -> Option<f64> {
        let own = partition.side_of(x)?;
        partition.side_of(y)?;
        let other = own.opposite();
        let ex = self.weight_to(partition, x, other);
        let ix = self.weight_to(partition, x, own);
        let ey = self.weight_to(partition, y, own);
        let iy = self.weight_to(partition, y, other);
        Some((ex - ix) + (ey - iy) - 2.0 * self.weight(x, y))
    }

    /// The total weight of the edges between the two sides of `partition`.
    pub fn cutsize(&self, partition: &Bipartition<V>) -> f64 {
        partition.left().iter().map(|&x| self.weight_to(partition, x, Side::Right)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{kl_example, partition};

    #[test]
    fn symmetric_weights() {
        let graph = kl_example();
        assert_eq!(graph.weight('a', 'd'), 2.0);
        assert_eq!(graph.weight('d', 'a'), 2.0);
        assert_eq!(graph.weight('a', 'b'), 0.0);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn repeated_edge_keeps_last_weight() {
        let graph = WeightedGraph::from_edges("ab".chars(), [('a', 'b', 1.0), ('b', 'a', 4.5)]).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight('a', 'b'), 4.5);
    }

    #[test]
    fn unknown_endpoint() {
        let err = WeightedGraph::from_edges("ab".chars(), [('a', 'z', 1.0)]).unwrap_err();
        assert_eq!(err, PartitionError::UnknownVertex('z'));
    }

    #[test]
    fn initial_cutsize_counts_all_cross_edges() {
        let graph = kl_example();
        let p = partition("ab", "cd");
        assert_eq!(graph.cutsize(&p), 7.0);
        assert_eq!(graph.cutsize(&partition("bc", "ad")), 2.0);
        assert_eq!(graph.cutsize(&partition("abcd", "")), 0.0);
    }

    #[test]
    fn pair_gains() {
        let graph = kl_example();
        let p = partition("ab", "cd");
        assert_eq!(graph.gain(&p, 'a', 'c'), Some(5.0));
        assert_eq!(graph.gain(&p, 'a', 'd'), Some(2.0));
        assert_eq!(graph.gain(&p, 'b', 'c'), Some(2.0));
        assert_eq!(graph.gain(&p, 'b', 'd'), Some(5.0));
        assert_eq!(graph.gain(&p, 'a', 'z'), None);

        let p = partition("bc", "ad");
        assert_eq!(graph.gain(&p, 'b', 'd'), Some(-5.0));
    }
}
