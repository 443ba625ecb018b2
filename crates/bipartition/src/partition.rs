use std::collections::BTreeSet;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use thiserror::Error;

/// Vertex identifiers usable by the partitioning passes.
///
/// The total order of the identifiers decides ties between equally good moves.
pub trait Vertex: Copy + Ord + Hash + Debug {}

impl<T: Copy + Ord + Hash + Debug> Vertex for T {}

/// One of the two sides of a [Bipartition].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Side {
    /// The first side.
    Left,
    /// The second side.
    Right,
}

impl Side {
    /// The other side.
    #[inline(always)]
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Invalid use of a [Bipartition].
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum PartitionError<V: Debug> {
    /// The vertex was assigned twice.
    #[error("vertex {0:?} is assigned more than once")]
    DuplicateVertex(V),
    /// The vertex is on neither side.
    #[error("unknown vertex {0:?}")]
    UnknownVertex(V),
    /// Both vertices of a swap are on the same side.
    #[error("vertices {0:?} and {1:?} are on the same side")]
    SameSide(V, V),
}

/// A split of a vertex set into two disjoint sides.
///
/// Cloning produces an independent copy.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bipartition<V: Ord> {
    left: BTreeSet<V>,
    right: BTreeSet<V>,
}

impl<V: Vertex> Bipartition<V> {
    /// Create a bipartition from the vertices of both sides.
    ///
    /// # Errors
    ///
    /// Returns [PartitionError::DuplicateVertex] if a vertex occurs twice, on the same side or on
    /// both sides.
    pub fn new<L, R>(left: L, right: R) -> Result<Self, PartitionError<V>>
    where
        L: IntoIterator<Item = V>,
        R: IntoIterator<Item = V>,
    {
        let mut partition = Self { left: BTreeSet::new(), right: BTreeSet::new() };
        let left = left.into_iter().map(|v| (Side::Left, v));
        let right = right.into_iter().map(|v| (Side::Right, v));
        for (side, v) in left.chain(right) {
            if partition.contains(v) {
                return Err(PartitionError::DuplicateVertex(v));
            }
            partition.side_mut(side).insert(v);
        }
        Ok(partition)
    }

    /// The vertices on `side`.
    #[inline(always)]
    pub fn side(&self, side: Side) -> &BTreeSet<V> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BTreeSet<V> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// The vertices of the first side.
    pub fn left(&self) -> &BTreeSet<V> {
        &self.left
    }

    /// The vertices of the second side.
    pub fn right(&self) -> &BTreeSet<V> {
        &self.right
    }

    /// Number of vertices on `side`.
    #[inline(always)]
    pub fn len(&self, side: Side) -> usize {
        self.side(side).len()
    }

    /// Number of vertices on both sides.
    pub fn vertex_count(&self) -> usize {
        self.left.len() + self.right.len()
    }

    /// Returns `true` if `v` is on either side.
    pub fn contains(&self, v: V) -> bool {
        self.left.contains(&v) || self.right.contains(&v)
    }

    /// The side containing `v`.
    #[inline(always)]
    pub fn side_of(&self, v: V) -> Option<Side> {
        if self.left.contains(&v) {
            Some(Side::Left)
        } else if self.right.contains(&v) {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Iterate over all vertices, the first side before the second, each in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = V> + '_ {
        self.left.iter().chain(self.right.iter()).copied()
    }

    /// Move `v` to the other side and return its new side.
    ///
    /// # Errors
    ///
    /// Returns [PartitionError::UnknownVertex] if `v` is on neither side.
    pub fn move_vertex(&mut self, v: V) -> Result<Side, PartitionError<V>> {
        let from = self.side_of(v).ok_or(PartitionError::UnknownVertex(v))?;
        let to = from.opposite();
        self.side_mut(from).remove(&v);
        self.side_mut(to).insert(v);
        Ok(to)
    }

    /// Exchange `x` and `y` between the sides.
    ///
    /// # Errors
    ///
    /// Returns [PartitionError::UnknownVertex] if either vertex is on neither side and
    /// [PartitionError::SameSide] if both are on the same side. The partition is unchanged then.
    pub fn swap(&mut self, x: V, y: V) -> Result<(), PartitionError<V>> {
        let sx = self.side_of(x).ok_or(PartitionError::UnknownVertex(x))?;
        let sy = self.side_of(y).ok_or(PartitionError::UnknownVertex(y))?;
        if sx == sy {
            return Err(PartitionError::SameSide(x, y));
        }
        self.move_vertex(x)?;
        self.move_vertex(y)?;
        Ok(())
    }

    pub(crate) fn sides(&self, side: Side) -> (&BTreeSet<V>, &BTreeSet<V>) {
        (self.side(side), self.side(side.opposite()))
    }
}

impl<V: Vertex + Display> Display for Bipartition<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fmt_side = |f: &mut Formatter<'_>, side: &BTreeSet<V>| -> std::fmt::Result {
            f.write_str("{")?;
            for (i, v) in side.iter().enumerate() {
                if i != 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{v}")?;
            }
            f.write_str("}")
        };
        f.write_str("(")?;
        fmt_side(f, &self.left)?;
        f.write_str(", ")?;
        fmt_side(f, &self.right)?;
        f.write_str(")")
    }
}

/// Bounds on the number of vertices per side.
///
/// Moving a vertex from side `S` is feasible iff `low < |S|` and `high > |other side|`, both
/// evaluated on the sizes before the move. Bounds may be negative: a negative `low` never rejects
/// a move and a negative `high` rejects every move.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BalanceConstraint {
    /// Lower bound on the size of a side.
    pub low: i64,
    /// Upper bound on the size of a side.
    pub high: i64,
}

/// Side sizes as signed values, saturating at `i64::MAX`.
fn signed_len<V: Vertex>(partition: &Bipartition<V>, side: Side) -> i64 {
    i64::try_from(partition.len(side)).unwrap_or(i64::MAX)
}

impl BalanceConstraint {
    /// Create a constraint with bounds `low` and `high`.
    pub fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// Returns `true` if moving `v` to the other side is allowed.
    pub fn allows_move<V: Vertex>(&self, partition: &Bipartition<V>, v: V) -> bool {
        let Some(from) = partition.side_of(v) else {
            return false;
        };
        self.low < signed_len(partition, from) && self.high > signed_len(partition, from.opposite())
    }

    /// Returns `true` if both sides have between `low` and `high` vertices.
    pub fn is_satisfied_by<V: Vertex>(&self, partition: &Bipartition<V>) -> bool {
        [Side::Left, Side::Right].into_iter().all(|s| (self.low..=self.high).contains(&signed_len(partition, s)))
    }
}
