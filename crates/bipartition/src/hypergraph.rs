use std::collections::{BTreeSet, HashMap};

use petgraph::graphmap::UnGraphMap;
use tracing::{info, instrument};

use crate::partition::{Bipartition, PartitionError, Vertex};

/// An unweighted hypergraph over a fixed vertex set.
///
/// Besides the hyperedges it stores, for every vertex, the hyperedges containing it and a neighbor
/// graph connecting two vertices iff they share a hyperedge. Both are derived once on
/// construction.
#[derive(Clone, Debug)]
pub struct Hypergraph<V: Vertex> {
    hyperedges: Vec<BTreeSet<V>>,
    incidence: HashMap<V, Vec<usize>>,
    neighbors: UnGraphMap<V, ()>,
}

impl<V: Vertex> Hypergraph<V> {
    /// Create a hypergraph on `vertices` without hyperedges.
    pub fn new(vertices: impl IntoIterator<Item = V>) -> Self {
        let mut incidence: HashMap<V, Vec<usize>> = HashMap::new();
        let mut neighbors = UnGraphMap::new();
        for v in vertices {
            incidence.entry(v).or_default();
            neighbors.add_node(v);
        }
        Self { hyperedges: vec![], incidence, neighbors }
    }

    /// Create a hypergraph on `vertices` with the given hyperedges.
    ///
    /// # Errors
    ///
    /// Returns [PartitionError::UnknownVertex] if a hyperedge contains a vertex that is not in
    /// `vertices`.
    #[instrument(skip_all)]
    pub fn from_hyperedges<I, E>(
        vertices: impl IntoIterator<Item = V>,
        hyperedges: I,
    ) -> Result<Self, PartitionError<V>>
    where
        I: IntoIterator<Item = E>,
        E: IntoIterator<Item = V>,
    {
        let mut hypergraph = Self::new(vertices);
        for hyperedge in hyperedges {
            hypergraph.add_hyperedge(hyperedge)?;
        }
        let neighbor_pairs = hypergraph.neighbors.edge_count();
        info!(n = hypergraph.vertex_count(), m = hypergraph.hyperedge_count(), neighbor_pairs);
        Ok(hypergraph)
    }

    /// Add a hyperedge and return its index.
    ///
    /// Repeated vertices within the hyperedge are collapsed.
    ///
    /// # Errors
    ///
    /// Returns [PartitionError::UnknownVertex] if the hyperedge contains a vertex that is not in
    /// the hypergraph. The hypergraph is left unchanged in that case.
    pub fn add_hyperedge(&mut self, hyperedge: impl IntoIterator<Item = V>) -> Result<usize, PartitionError<V>> {
        let hyperedge: BTreeSet<V> = hyperedge.into_iter().collect();
        if let Some(&v) = hyperedge.iter().find(|v| !self.incidence.contains_key(v)) {
            return Err(PartitionError::UnknownVertex(v));
        }

        let e = self.hyperedges.len();
        for &v in &hyperedge {
            self.incidence.entry(v).or_default().push(e);
        }
        for (i, &u) in hyperedge.iter().enumerate() {
            for &v in hyperedge.iter().skip(i + 1) {
                self.neighbors.add_edge(u, v, ());
            }
        }
        self.hyperedges.push(hyperedge);
        Ok(e)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.incidence.len()
    }

    /// Number of hyperedges.
    pub fn hyperedge_count(&self) -> usize {
        self.hyperedges.len()
    }

    /// Returns `true` if `v` is a vertex of the hypergraph.
    pub fn contains_vertex(&self, v: V) -> bool {
        self.incidence.contains_key(&v)
    }

    /// Iterate over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = V> + '_ {
        self.neighbors.nodes()
    }

    /// All hyperedges in input order.
    pub fn hyperedges(&self) -> &[BTreeSet<V>] {
        &self.hyperedges
    }

    /// The hyperedges containing `v`.
    pub fn incident(&self, v: V) -> impl Iterator<Item = &BTreeSet<V>> + '_ {
        self.incidence.get(&v).into_iter().flatten().map(|&e| &self.hyperedges[e])
    }

    /// The vertices sharing at least one hyperedge with `v`, excluding `v` itself.
    pub fn neighbors(&self, v: V) -> impl Iterator<Item = V> + '_ {
        self.neighbors.neighbors(v)
    }

    /// The gain of moving `x` to the other side of `partition`.
    ///
    /// Counts the hyperedges containing `x` whose other vertices all lie on the opposite side
    /// (each one becomes uncut) minus the hyperedges lying entirely on the side of `x` (each one
    /// becomes cut). Returns `None` if `x` is not in `partition`.
    pub fn gain(&self, partition: &Bipartition<V>, x: V) -> Option<i64> {
        let (cur, opp) = partition.sides(partition.side_of(x)?);
        let mut gain = 0;
        for hyperedge in self.incident(x) {
            if hyperedge.is_subset(cur) {
                gain -= 1;
            }
            if hyperedge.iter().all(|v| *v == x || opp.contains(v)) {
                gain += 1;
            }
        }
        Some(gain)
    }

    /// The number of hyperedges with vertices on both sides of `partition`.
    pub fn cutsize(&self, partition: &Bipartition<V>) -> usize {
        let (left, right) = (partition.left(), partition.right());
        self.hyperedges
            .iter()
            .filter(|e| e.iter().any(|v| left.contains(v)) && e.iter().any(|v| right.contains(v)))
            .count()
    }
}
