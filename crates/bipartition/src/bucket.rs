use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

/// Misuse of a [GainBucket].
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BucketError {
    /// The item is already stored in the bucket.
    #[error("item is already in the bucket")]
    DuplicateItem,
    /// The item is not stored in the bucket.
    #[error("item is not in the bucket")]
    ItemNotFound,
    /// The bucket does not contain any items.
    #[error("bucket is empty")]
    Empty,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Entry<T, P> {
    priority: P,
    item: T,
}

impl<T: Ord, P: Ord> Ord for Entry<T, P> {
    /// Higher priority is greater. Equal priorities are ordered by the reversed item order, so the
    /// smaller item is the greater entry.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority).then_with(|| other.item.cmp(&self.item))
    }
}

impl<T: Ord, P: Ord> PartialOrd for Entry<T, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An array-backed max-heap of `(priority, item)` entries with an item to slot index.
///
/// The greatest entry has the highest priority. Among entries with equal priority the smallest
/// item is the greatest. Every item is stored at most once.
///
/// | operation           | cost     |
/// |---------------------|----------|
/// | `peek`, `contains`, `priority` | O(1) |
/// | `insert`, `pop`, `update_priority` | O(log n) |
#[derive(Clone, Debug)]
pub struct GainBucket<T, P> {
    heap: Vec<Entry<T, P>>,
    position: HashMap<T, usize>,
}

impl<T, P> Default for GainBucket<T, P> {
    fn default() -> Self {
        Self { heap: Vec::new(), position: HashMap::new() }
    }
}

impl<T: Copy + Ord + Hash, P: Copy + Ord> GainBucket<T, P> {
    /// Create an empty bucket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bucket with space for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { heap: Vec::with_capacity(capacity), position: HashMap::with_capacity(capacity) }
    }

    /// Number of stored items.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if no items are stored.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` if `item` is stored.
    #[inline(always)]
    pub fn contains(&self, item: T) -> bool {
        self.position.contains_key(&item)
    }

    /// The stored priority of `item`.
    pub fn priority(&self, item: T) -> Option<P> {
        self.position.get(&item).map(|&i| self.heap[i].priority)
    }

    /// The greatest entry as `(priority, item)` without removing it.
    pub fn peek(&self) -> Option<(P, T)> {
        self.heap.first().map(|e| (e.priority, e.item))
    }

    /// Insert `item` with `priority`.
    ///
    /// # Errors
    ///
    /// Returns [BucketError::DuplicateItem] if `item` is already stored. The bucket is left
    /// unchanged in that case.
    pub fn insert(&mut self, item: T, priority: P) -> Result<(), BucketError> {
        if self.position.contains_key(&item) {
            return Err(BucketError::DuplicateItem);
        }
        let i = self.heap.len();
        self.heap.push(Entry { priority, item });
        self.position.insert(item, i);
        self.sift_up(i);
        debug_assert!(self.check());
        Ok(())
    }

    /// Remove and return the greatest entry as `(priority, item)`.
    ///
    /// # Errors
    ///
    /// Returns [BucketError::Empty] if no items are stored.
    pub fn pop(&mut self) -> Result<(P, T), BucketError> {
        if self.heap.is_empty() {
            return Err(BucketError::Empty);
        }
        let top = self.heap.swap_remove(0);
        self.position.remove(&top.item);
        if let Some(first) = self.heap.first() {
            self.position.insert(first.item, 0);
            self.sift_down(0);
        }
        debug_assert!(self.check());
        Ok((top.priority, top.item))
    }

    /// Replace the priority of `item`.
    ///
    /// The entry moves up if the priority increased and down otherwise.
    ///
    /// # Errors
    ///
    /// Returns [BucketError::ItemNotFound] if `item` is not stored.
    pub fn update_priority(&mut self, item: T, priority: P) -> Result<(), BucketError> {
        let &i = self.position.get(&item).ok_or(BucketError::ItemNotFound)?;
        let old = std::mem::replace(&mut self.heap[i].priority, priority);
        if priority > old {
            self.sift_up(i);
        } else {
            self.sift_down(i);
        }
        debug_assert!(self.check());
        Ok(())
    }

    /// Iterate over all stored `(priority, item)` entries in heap order.
    pub fn iter(&self) -> impl Iterator<Item = (P, T)> + '_ {
        self.heap.iter().map(|e| (e.priority, e.item))
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i] > self.heap[parent] {
                self.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n && self.heap[right] > self.heap[left] { right } else { left };
            if self.heap[child] > self.heap[i] {
                self.swap(i, child);
                i = child;
            } else {
                break;
            }
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.position.insert(self.heap[i].item, i);
        self.position.insert(self.heap[j].item, j);
    }

    /// Checks the heap order and the consistency of the slot index.
    pub(crate) fn check(&self) -> bool {
        let ordered = (1..self.heap.len()).all(|i| self.heap[(i - 1) / 2] >= self.heap[i]);
        let indexed = self.position.len() == self.heap.len()
            && self.heap.iter().enumerate().all(|(i, e)| self.position.get(&e.item) == Some(&i));
        ordered && indexed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{BTreeSet, HashMap};

    #[test]
    fn pop_order_breaks_ties_by_smaller_item() {
        let mut bucket = GainBucket::new();
        bucket.insert("b", 5).unwrap();
        bucket.insert("a", 5).unwrap();
        bucket.insert("z", 3).unwrap();
        assert_eq!(bucket.pop(), Ok((5, "a")));
        assert_eq!(bucket.pop(), Ok((5, "b")));
        assert_eq!(bucket.pop(), Ok((3, "z")));
        assert_eq!(bucket.pop(), Err(BucketError::Empty));
    }

    #[test]
    fn duplicate_insert_leaves_bucket_unchanged() {
        let mut bucket = GainBucket::new();
        bucket.insert('a', 1).unwrap();
        bucket.insert('b', 2).unwrap();
        assert_eq!(bucket.insert('a', 7), Err(BucketError::DuplicateItem));
        assert_eq!(bucket.len(), 2);
        assert_eq!(bucket.priority('a'), Some(1));
        assert_eq!(bucket.peek(), Some((2, 'b')));
        assert!(bucket.check());
    }

    #[test]
    fn update_missing_item() {
        let mut bucket: GainBucket<char, i64> = GainBucket::new();
        assert_eq!(bucket.update_priority('x', 3), Err(BucketError::ItemNotFound));
        bucket.insert('y', 0).unwrap();
        bucket.pop().unwrap();
        assert_eq!(bucket.update_priority('y', 3), Err(BucketError::ItemNotFound));
        assert!(!bucket.contains('y'));
    }

    #[test]
    fn update_moves_entries_both_ways() {
        let mut bucket = GainBucket::new();
        for (i, c) in ('a'..='h').enumerate() {
            bucket.insert(c, i as i64).unwrap();
        }
        assert_eq!(bucket.peek(), Some((7, 'h')));

        bucket.update_priority('a', 10).unwrap();
        assert_eq!(bucket.peek(), Some((10, 'a')));
        assert_eq!(bucket.priority('a'), Some(10));

        bucket.update_priority('a', -1).unwrap();
        assert_eq!(bucket.peek(), Some((7, 'h')));
        assert_eq!(bucket.priority('a'), Some(-1));

        bucket.update_priority('h', 6).unwrap();
        assert_eq!(bucket.peek(), Some((6, 'g')));
        assert!(bucket.check());
    }

    #[test]
    fn unchanged_priority_keeps_invariant() {
        let mut bucket = GainBucket::new();
        for c in ['d', 'c', 'b', 'a'] {
            bucket.insert(c, 0).unwrap();
        }
        bucket.update_priority('a', 0).unwrap();
        assert!(bucket.check());
        let order: Vec<_> = std::iter::from_fn(|| bucket.pop().ok()).map(|(_, c)| c).collect();
        assert_eq!(order, ['a', 'b', 'c', 'd']);
    }

    #[test]
    fn same_as_ordered_set_pseudorandom() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut bucket: GainBucket<u32, i32> = GainBucket::new();
        let mut model: BTreeSet<(i32, std::cmp::Reverse<u32>)> = BTreeSet::new();
        let mut priorities: HashMap<u32, i32> = HashMap::new();

        for _ in 0..5000 {
            match rng.gen_range(0..4) {
                0 | 1 => {
                    let item = rng.gen_range(0..64);
                    let priority = rng.gen_range(-8..8);
                    let result = bucket.insert(item, priority);
                    if priorities.contains_key(&item) {
                        assert_eq!(result, Err(BucketError::DuplicateItem));
                    } else {
                        assert_eq!(result, Ok(()));
                        priorities.insert(item, priority);
                        model.insert((priority, std::cmp::Reverse(item)));
                    }
                }
                2 => {
                    let expected = model.pop_last().map(|(p, std::cmp::Reverse(item))| (p, item));
                    match expected {
                        Some((p, item)) => {
                            priorities.remove(&item);
                            assert_eq!(bucket.pop(), Ok((p, item)));
                        }
                        None => assert_eq!(bucket.pop(), Err(BucketError::Empty)),
                    }
                }
                _ => {
                    let item = rng.gen_range(0..64);
                    let priority = rng.gen_range(-8..8);
                    let result = bucket.update_priority(item, priority);
                    match priorities.get_mut(&item) {
                        Some(old) => {
                            assert_eq!(result, Ok(()));
                            model.remove(&(*old, std::cmp::Reverse(item)));
                            model.insert((priority, std::cmp::Reverse(item)));
                            *old = priority;
                            assert_eq!(bucket.priority(item), Some(priority));
                        }
                        None => assert_eq!(result, Err(BucketError::ItemNotFound)),
                    }
                }
            }
            assert!(bucket.check());
            assert_eq!(bucket.len(), model.len());
        }
    }
}
