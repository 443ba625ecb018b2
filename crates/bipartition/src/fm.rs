use std::collections::BTreeSet;

use tracing::{debug, info, instrument, trace, warn};

use crate::bucket::{BucketError, GainBucket};
use crate::hypergraph::Hypergraph;
use crate::partition::{BalanceConstraint, Bipartition, PartitionError, Vertex};
use crate::pass::{MoveRecord, PassError, PassHistory, Snapshot, Step, Termination};

/// Runs a single Fiduccia-Mattheyses pass starting from `partition`.
///
/// Every step moves the unlocked vertex with the highest gain whose move satisfies `constraint`
/// and locks it. Ties are broken towards the smaller vertex. The pass ends when every vertex is
/// locked or when no unlocked vertex can be moved, see [Termination].
///
/// # Errors
///
/// Returns a [PassError] if `partition` and `hypergraph` do not share the same vertex set.
///
/// # Examples
///
/// ```rust
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use bipartition::{fiduccia_mattheyses, BalanceConstraint, Bipartition, Hypergraph, Termination};
///
/// let partition = Bipartition::new("ab".chars(), "cd".chars())?;
/// let hypergraph = Hypergraph::from_hyperedges(partition.vertices(), ["ac", "bd", "abc"].map(|e| e.chars()))?;
/// let history = fiduccia_mattheyses(&hypergraph, partition, BalanceConstraint::new(1, 3))?;
///
/// assert_eq!(history.records()[0].vertex, 'c');
/// assert_eq!(history.records()[0].gain, 2);
/// assert_eq!(history.termination(), Termination::Complete);
/// # Ok(())
/// # }
/// ```
#[instrument(skip_all)]
pub fn fiduccia_mattheyses<V: Vertex>(
    hypergraph: &Hypergraph<V>,
    partition: Bipartition<V>,
    constraint: BalanceConstraint,
) -> Result<PassHistory<MoveRecord<V>>, PassError<V>> {
    FmEngine::new(hypergraph, partition, constraint)?.run()
}

/// The state of a Fiduccia-Mattheyses pass.
///
/// The bucket holds exactly the unlocked vertices, keyed by their current gain. A moved vertex is
/// locked and never inserted again.
#[derive(Debug)]
pub struct FmEngine<'a, V: Vertex> {
    hypergraph: &'a Hypergraph<V>,
    constraint: BalanceConstraint,
    partition: Bipartition<V>,
    bucket: GainBucket<V, i64>,
    unlocked: BTreeSet<V>,
    initial: Snapshot<V, usize>,
    records: Vec<MoveRecord<V>>,
    termination: Option<Termination>,
}

impl<'a, V: Vertex> FmEngine<'a, V> {
    /// Prepare a pass and compute the initial gain of every vertex.
    ///
    /// # Errors
    ///
    /// Returns [PassError::Partition] if a vertex is in only one of `hypergraph` and `partition`.
    #[instrument(skip_all)]
    pub fn new(
        hypergraph: &'a Hypergraph<V>,
        partition: Bipartition<V>,
        constraint: BalanceConstraint,
    ) -> Result<Self, PassError<V>> {
        if let Some(v) = partition.vertices().find(|&v| !hypergraph.contains_vertex(v)) {
            return Err(PartitionError::UnknownVertex(v).into());
        }
        if let Some(v) = hypergraph.vertices().find(|&v| !partition.contains(v)) {
            return Err(PartitionError::UnknownVertex(v).into());
        }

        let mut bucket = GainBucket::with_capacity(partition.vertex_count());
        for v in partition.vertices() {
            let gain = hypergraph.gain(&partition, v).ok_or(PartitionError::UnknownVertex(v))?;
            bucket.insert(v, gain)?;
        }

        let cutsize = hypergraph.cutsize(&partition);
        if !constraint.is_satisfied_by(&partition) {
            warn!(low = constraint.low, high = constraint.high, "initial partition violates the balance constraint");
        }
        info!(n = partition.vertex_count(), m = hypergraph.hyperedge_count(), cutsize);

        let unlocked = partition.vertices().collect();
        let initial = Snapshot { partition: partition.clone(), cutsize };
        Ok(Self { hypergraph, constraint, partition, bucket, unlocked, initial, records: vec![], termination: None })
    }

    /// The current partition.
    pub fn partition(&self) -> &Bipartition<V> {
        &self.partition
    }

    /// The vertices that have not been moved yet.
    pub fn unlocked(&self) -> &BTreeSet<V> {
        &self.unlocked
    }

    /// The current gain of an unlocked vertex.
    pub fn gain_of(&self, v: V) -> Option<i64> {
        self.bucket.priority(v)
    }

    /// The moves applied so far.
    pub fn records(&self) -> &[MoveRecord<V>] {
        &self.records
    }

    /// Move the best feasible vertex and update the gains of its unlocked neighbors.
    ///
    /// Candidates that violate the balance constraint are set aside while searching and put back
    /// with unchanged gains afterwards.
    ///
    /// # Errors
    ///
    /// Returns a [PassError] if the bucket and the unlocked vertices disagree.
    pub fn step(&mut self) -> Result<Step<'_, MoveRecord<V>>, PassError<V>> {
        if let Some(termination) = self.termination {
            return Ok(Step::Finished(termination));
        }
        if self.unlocked.is_empty() {
            return Ok(Step::Finished(*self.termination.insert(Termination::Complete)));
        }
        debug_assert_eq!(self.bucket.len(), self.unlocked.len());

        let mut rejected = vec![];
        let selected = loop {
            match self.bucket.pop() {
                Ok((gain, v)) if self.constraint.allows_move(&self.partition, v) => break Some((gain, v)),
                Ok((gain, v)) => {
                    trace!(?v, gain, "infeasible");
                    rejected.push((gain, v));
                }
                Err(BucketError::Empty) => break None,
                Err(err) => return Err(err.into()),
            }
        };
        for (gain, v) in rejected {
            self.bucket.insert(v, gain)?;
        }

        let Some((gain, v)) = selected else {
            let termination = Termination::NoFeasibleMove { unlocked: self.unlocked.len() };
            warn!(unlocked = self.unlocked.len(), "no feasible move");
            return Ok(Step::Finished(*self.termination.insert(termination)));
        };

        let to = self.partition.move_vertex(v)?;
        self.unlocked.remove(&v);

        for u in self.hypergraph.neighbors(v) {
            if self.unlocked.contains(&u) {
                let gain = self.hypergraph.gain(&self.partition, u).ok_or(PartitionError::UnknownVertex(u))?;
                self.bucket.update_priority(u, gain)?;
            }
        }

        let cutsize = self.hypergraph.cutsize(&self.partition);
        debug!(?v, gain, cutsize, "move");
        let i = self.records.len();
        let snapshot = Snapshot { partition: self.partition.clone(), cutsize };
        self.records.push(MoveRecord { gain, vertex: v, to, snapshot });
        Ok(Step::Moved(&self.records[i]))
    }

    /// Apply steps until the pass ends and return its history.
    ///
    /// # Errors
    ///
    /// Returns the first [PassError] raised by [FmEngine::step].
    pub fn run(mut self) -> Result<PassHistory<MoveRecord<V>>, PassError<V>> {
        let termination = loop {
            if let Step::Finished(termination) = self.step()? {
                break termination;
            }
        };
        let history = PassHistory::new(self.initial, self.records, termination);
        info!(moves = history.len(), cutsize = history.last().cutsize, best = history.best(), %termination);
        Ok(history)
    }
}
