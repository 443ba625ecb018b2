//! Single-pass two-way partitioning of graphs and hypergraphs.
//!
//! Two iterative-improvement heuristics are provided. Both start from a given bipartition, lock
//! every vertex after it was moved once, and record the partition and its cutsize after each step.
//!
//! + [fiduccia_mattheyses] moves one vertex at a time on a [Hypergraph], subject to a
//!   [BalanceConstraint]. The best candidate is kept in a [GainBucket], a max-heap with an item
//!   index, and only the gains of the neighbors of a moved vertex are recomputed.
//! + [kernighan_lin] exchanges one pair of vertices at a time on a [WeightedGraph], scanning all
//!   unlocked pairs on opposite sides.
//!
//! Ties between equally good moves are broken by the order of the vertex identifiers, so a pass
//! is deterministic.
//!
//! # Examples
//!
//! ```rust
//! # use std::error::Error;
//! #
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use bipartition::{kernighan_lin, Bipartition, WeightedGraph};
//!
//! let partition = Bipartition::new("ab".chars(), "cd".chars())?;
//! let edges = [('a', 'c', 1.0), ('a', 'd', 2.0), ('b', 'c', 3.0), ('b', 'd', 1.0)];
//! let graph = WeightedGraph::from_edges(partition.vertices(), edges)?;
//! let history = kernighan_lin(&graph, partition)?;
//!
//! assert_eq!(history.initial().cutsize, 7.0);
//! assert_eq!(history.records()[0].pair, ('a', 'c'));
//! assert_eq!(history.snapshots().nth(history.best()).map(|s| s.cutsize), Some(2.0));
//! # Ok(())
//! # }
//! ```
//!
//! # References
//! + \[KL70\]: B. W. Kernighan and S. Lin. “An Efficient Heuristic Procedure for Partitioning
//!   Graphs”. <https://doi.org/10.1002/j.1538-7305.1970.tb01770.x>.
//! + \[FM82\]: C. M. Fiduccia and R. M. Mattheyses. “A Linear-Time Heuristic for Improving Network
//!   Partitions”. <https://doi.org/10.1109/DAC.1982.1585498>.

#![forbid(unsafe_code)]
#![doc(test(attr(deny(warnings, rust_2018_idioms), allow(dead_code))))]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

mod bucket;
/// The Fiduccia-Mattheyses pass.
pub mod fm;
mod hypergraph;
/// The Kernighan-Lin pass.
pub mod kl;
mod partition;
mod pass;
mod weighted;


pub use bucket::{BucketError, GainBucket};
pub use fm::{fiduccia_mattheyses, FmEngine};
pub use hypergraph::Hypergraph;
pub use kl::{kernighan_lin, KlEngine};
pub use partition::{BalanceConstraint, Bipartition, PartitionError, Side, Vertex};
pub use pass::{MoveRecord, PassError, PassHistory, Record, Snapshot, Step, SwapRecord, Termination};
pub use weighted::WeightedGraph;
