use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;

use thiserror::Error;

use crate::bucket::BucketError;
use crate::partition::{Bipartition, PartitionError, Side, Vertex};

/// A partition together with its cutsize.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot<V: Ord, C> {
    /// An independent copy of the partition.
    pub partition: Bipartition<V>,
    /// The cutsize of `partition`.
    pub cutsize: C,
}

/// A vertex moved by a Fiduccia-Mattheyses pass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MoveRecord<V: Ord> {
    /// The gain of the move when it was selected.
    pub gain: i64,
    /// The moved vertex.
    pub vertex: V,
    /// The side the vertex was moved to.
    pub to: Side,
    /// The state after the move.
    pub snapshot: Snapshot<V, usize>,
}

/// A vertex pair exchanged by a Kernighan-Lin pass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SwapRecord<V: Ord> {
    /// The gain of the swap when it was selected.
    pub gain: f64,
    /// The exchanged vertices, the one from the first side first.
    pub pair: (V, V),
    /// The state after the swap.
    pub snapshot: Snapshot<V, f64>,
}

/// Common access to the entries of a [PassHistory].
pub trait Record {
    /// Vertex identifier.
    type Vertex: Vertex;
    /// Gain of a single step.
    type Gain: Copy + Sum;
    /// Cutsize of a partition.
    type Cut: Copy + PartialOrd;

    /// The gain of the step.
    fn gain(&self) -> Self::Gain;

    /// The state after the step.
    fn snapshot(&self) -> &Snapshot<Self::Vertex, Self::Cut>;
}

impl<V: Vertex> Record for MoveRecord<V> {
    type Vertex = V;
    type Gain = i64;
    type Cut = usize;

    fn gain(&self) -> i64 {
        self.gain
    }

    fn snapshot(&self) -> &Snapshot<V, usize> {
        &self.snapshot
    }
}

impl<V: Vertex> Record for SwapRecord<V> {
    type Vertex = V;
    type Gain = f64;
    type Cut = f64;

    fn gain(&self) -> f64 {
        self.gain
    }

    fn snapshot(&self) -> &Snapshot<V, f64> {
        &self.snapshot
    }
}

/// Why a pass ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Termination {
    /// Every vertex was locked.
    Complete,
    /// Unlocked vertices remain on one side only and cannot be paired.
    Unpaired {
        /// Number of vertices left unlocked.
        unlocked: usize,
    },
    /// Every unlocked vertex violates the balance constraint when moved.
    NoFeasibleMove {
        /// Number of vertices left unlocked.
        unlocked: usize,
    },
}

impl Display for Termination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Complete => f.write_str("all vertices locked"),
            Termination::Unpaired { unlocked } => write!(f, "{unlocked} unlocked vertices cannot be paired"),
            Termination::NoFeasibleMove { unlocked } => {
                write!(f, "no feasible move for the remaining {unlocked} unlocked vertices")
            }
        }
    }
}

/// The outcome of advancing a pass by one step.
#[derive(Debug)]
pub enum Step<'a, R> {
    /// A move or swap was applied and recorded.
    Moved(&'a R),
    /// The pass has ended. Further steps do nothing.
    Finished(Termination),
}

/// An error that aborts a pass.
///
/// These indicate inconsistent input or a broken internal invariant. The pass state must not be
/// used after one was returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PassError<V: Debug> {
    /// The gain bucket was misused.
    #[error(transparent)]
    Bucket(#[from] BucketError),
    /// A vertex is missing from the partition or the instance.
    #[error(transparent)]
    Partition(#[from] PartitionError<V>),
}

/// The append-only record of a single pass.
///
/// Snapshot `0` is the initial state and snapshot `i` the state after record `i - 1`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(serialize = "R: serde::Serialize, R::Vertex: serde::Serialize, R::Cut: serde::Serialize"))
)]
pub struct PassHistory<R: Record> {
    initial: Snapshot<R::Vertex, R::Cut>,
    records: Vec<R>,
    termination: Termination,
}

impl<R: Record> PassHistory<R> {
    pub(crate) fn new(initial: Snapshot<R::Vertex, R::Cut>, records: Vec<R>, termination: Termination) -> Self {
        Self { initial, records, termination }
    }

    /// The state before the first step.
    pub fn initial(&self) -> &Snapshot<R::Vertex, R::Cut> {
        &self.initial
    }

    /// One record per applied step, in order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Why the pass ended.
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Number of applied steps.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no step was applied.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All snapshots, starting with the initial one.
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot<R::Vertex, R::Cut>> + '_ {
        std::iter::once(&self.initial).chain(self.records.iter().map(Record::snapshot))
    }

    /// The state after the last step.
    pub fn last(&self) -> &Snapshot<R::Vertex, R::Cut> {
        self.records.last().map_or(&self.initial, Record::snapshot)
    }

    /// Index of the earliest snapshot with the smallest cutsize.
    pub fn best(&self) -> usize {
        let mut best = (0, self.initial.cutsize);
        for (i, snapshot) in self.snapshots().enumerate().skip(1) {
            if snapshot.cutsize < best.1 {
                best = (i, snapshot.cutsize);
            }
        }
        best.0
    }

    /// Sum of the gains of all steps.
    pub fn total_gain(&self) -> R::Gain {
        self.records.iter().map(Record::gain).sum()
    }
}
