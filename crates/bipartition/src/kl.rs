use std::collections::BTreeSet;

use tracing::{debug, info, instrument};

use crate::partition::{Bipartition, PartitionError, Side, Vertex};
use crate::pass::{PassError, PassHistory, Snapshot, Step, SwapRecord, Termination};
use crate::weighted::WeightedGraph;

/// Runs a single Kernighan-Lin pass starting from `partition`.
///
/// Every step swaps the pair of unlocked vertices on opposite sides with the highest gain and
/// locks both. Ties are broken towards the lexicographically smallest pair. The pass ends when one
/// side has no unlocked vertices left.
///
/// # Errors
///
/// Returns a [PassError] if `partition` and `graph` do not share the same vertex set.
#[instrument(skip_all)]
pub fn kernighan_lin<V: Vertex>(
    graph: &WeightedGraph<V>,
    partition: Bipartition<V>,
) -> Result<PassHistory<SwapRecord<V>>, PassError<V>> {
    KlEngine::new(graph, partition)?.run()
}

/// The state of a Kernighan-Lin pass.
#[derive(Debug)]
pub struct KlEngine<'a, V: Vertex> {
    graph: &'a WeightedGraph<V>,
    partition: Bipartition<V>,
    unlocked: BTreeSet<V>,
    initial: Snapshot<V, f64>,
    records: Vec<SwapRecord<V>>,
    termination: Option<Termination>,
}

impl<'a, V: Vertex> KlEngine<'a, V> {
    /// Prepare a pass.
    ///
    /// # Errors
    ///
    /// Returns [PassError::Partition] if a vertex is in only one of `graph` and `partition`.
    #[instrument(skip_all)]
    pub fn new(graph: &'a WeightedGraph<V>, partition: Bipartition<V>) -> Result<Self, PassError<V>> {
        if let Some(v) = partition.vertices().find(|&v| !graph.contains_vertex(v)) {
            return Err(PartitionError::UnknownVertex(v).into());
        }
        if let Some(v) = graph.vertices().find(|&v| !partition.contains(v)) {
            return Err(PartitionError::UnknownVertex(v).into());
        }

        let cutsize = graph.cutsize(&partition);
        info!(n = graph.vertex_count(), m = graph.edge_count(), cutsize);

        let unlocked = partition.vertices().collect();
        let initial = Snapshot { partition: partition.clone(), cutsize };
        Ok(Self { graph, partition, unlocked, initial, records: vec![], termination: None })
    }

    /// The current partition.
    pub fn partition(&self) -> &Bipartition<V> {
        &self.partition
    }

    /// The vertices that have not been swapped yet.
    pub fn unlocked(&self) -> &BTreeSet<V> {
        &self.unlocked
    }

    /// The swaps applied so far.
    pub fn records(&self) -> &[SwapRecord<V>] {
        &self.records
    }

    fn unlocked_on(&self, side: Side) -> impl Iterator<Item = V> + '_ {
        self.partition.side(side).iter().copied().filter(|v| self.unlocked.contains(v))
    }

    /// The unlocked pair with the highest gain, scanning all pairs in lexicographic order.
    fn best_pair(&self) -> Result<Option<(f64, (V, V))>, PassError<V>> {
        let mut best: Option<(f64, (V, V))> = None;
        for x in self.unlocked_on(Side::Left) {
            for y in self.unlocked_on(Side::Right) {
                let gain = self.graph.gain(&self.partition, x, y).ok_or(PartitionError::UnknownVertex(x))?;
                if best.map_or(true, |(g, _)| gain > g) {
                    best = Some((gain, (x, y)));
                }
            }
        }
        Ok(best)
    }

    /// Swap the best unlocked pair and lock both vertices.
    ///
    /// # Errors
    ///
    /// Returns a [PassError] if a vertex of the pair vanished from the partition.
    pub fn step(&mut self) -> Result<Step<'_, SwapRecord<V>>, PassError<V>> {
        if let Some(termination) = self.termination {
            return Ok(Step::Finished(termination));
        }
        let Some((gain, (x, y))) = self.best_pair()? else {
            let termination = match self.unlocked.len() {
                0 => Termination::Complete,
                unlocked => Termination::Unpaired { unlocked },
            };
            return Ok(Step::Finished(*self.termination.insert(termination)));
        };

        self.partition.swap(x, y)?;
        self.unlocked.remove(&x);
        self.unlocked.remove(&y);

        let cutsize = self.graph.cutsize(&self.partition);
        debug!(?x, ?y, gain, cutsize, "swap");
        let i = self.records.len();
        let snapshot = Snapshot { partition: self.partition.clone(), cutsize };
        self.records.push(SwapRecord { gain, pair: (x, y), snapshot });
        Ok(Step::Moved(&self.records[i]))
    }

    /// Apply steps until the pass ends and return its history.
    ///
    /// # Errors
    ///
    /// Returns the first [PassError] raised by [KlEngine::step].
    pub fn run(mut self) -> Result<PassHistory<SwapRecord<V>>, PassError<V>> {
        let termination = loop {
            if let Step::Finished(termination) = self.step()? {
                break termination;
            }
        };
        let history = PassHistory::new(self.initial, self.records, termination);
        info!(swaps = history.len(), cutsize = history.last().cutsize, best = history.best(), %termination);
        Ok(history)
    }
}
