//! Bounded best-K ranking.
//!
//! [`BestK`] keeps the `K` highest-scoring distinct items offered to it.
//! A binary heap holds the retained items with the *worst* one on top, so
//! the acceptance test for a new item is a single peek.
//!
//! # Ordering
//!
//! Items are ranked by score descending. Among equal scores the item offered
//! first ranks higher: a newcomer must beat the current worst strictly, and
//! when several retained items share the lowest score the latest arrival is
//! evicted first. The resulting order is therefore identical to a stable sort
//! of every distinct item by score descending, truncated to `K`.
//!
//! # Example
//!
//! ```
//! use teamforge_scoring::{BestK, Ranked};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Entry(&'static str, f64);
//!
//! impl Ranked for Entry {
//!     type Key = &'static str;
//!     fn score(&self) -> f64 { self.1 }
//!     fn key(&self) -> &'static str { self.0 }
//! }
//!
//! let mut best = BestK::new(2);
//! best.offer(Entry("a", 1.0));
//! best.offer(Entry("b", 3.0));
//! best.offer(Entry("c", 2.0));
//! best.offer(Entry("b", 3.0)); // already retained
//!
//! let ranked = best.into_sorted_vec();
//! assert_eq!(ranked, vec![Entry("b", 3.0), Entry("c", 2.0)]);
//! ```

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::hash::Hash;

/// An item that can be ranked by [`BestK`].
pub trait Ranked {
    /// Identity used to reject duplicates.
    type Key: Eq + Hash + Clone;

    fn score(&self) -> f64;

    fn key(&self) -> Self::Key;
}

const PREALLOCATE: usize = 1024;

struct Slot<T: Ranked> {
    item: T,
    key: T::Key,
    score: f64,
    arrival: u64,
}

// Greater means worse: lower score, or later arrival at equal score.
impl<T: Ranked> Ord for Slot<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then(self.arrival.cmp(&other.arrival))
    }
}

impl<T: Ranked> PartialOrd for Slot<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ranked> PartialEq for Slot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Ranked> Eq for Slot<T> {}

/// The `K` best distinct items seen so far.
pub struct BestK<T: Ranked> {
    capacity: usize,
    heap: BinaryHeap<Slot<T>>,
    keys: HashSet<T::Key>,
    arrivals: u64,
}

impl<T: Ranked> BestK<T> {
    /// Creates an empty ranking holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.min(PREALLOCATE)),
            keys: HashSet::with_capacity(capacity.min(PREALLOCATE)),
            arrivals: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Lowest retained score.
    pub fn min_score(&self) -> Option<f64> {
        self.heap.peek().map(|slot| slot.score)
    }

    /// Score a new item has to beat strictly to be retained, if any.
    pub fn threshold(&self) -> Option<f64> {
        if self.is_full() {
            self.min_score().or(Some(f64::INFINITY))
        } else {
            None
        }
    }

    /// Offers an item, returning whether it was retained.
    ///
    /// Items whose key is already retained are ignored.
    pub fn offer(&mut self, item: T) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let key = item.key();
        if self.keys.contains(&key) {
            return false;
        }
        let score = item.score();

        if self.heap.len() >= self.capacity {
            let beats_worst = self
                .heap
                .peek()
                .is_some_and(|worst| score.total_cmp(&worst.score) == Ordering::Greater);
            if !beats_worst {
                return false;
            }
            if let Some(evicted) = self.heap.pop() {
                self.keys.remove(&evicted.key);
            }
        }

        let arrival = self.arrivals;
        self.arrivals += 1;
        self.keys.insert(key.clone());
        self.heap.push(Slot {
            item,
            key,
            score,
            arrival,
        });
        true
    }

    /// Consumes the ranking, best first.
    pub fn into_sorted_vec(self) -> Vec<T> {
        // BinaryHeap::into_sorted_vec is ascending by Ord, i.e. best first here.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|slot| slot.item)
            .collect()
    }
}

impl<T: Ranked> Extend<T> for BestK<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.offer(item);
        }
    }
}

impl<T: Ranked> std::fmt::Debug for BestK<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestK")
            .field("capacity", &self.capacity)
            .field("len", &self.heap.len())
            .field("min_score", &self.min_score())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: u32,
        score: f64,
    }

    impl Ranked for Entry {
        type Key = u32;

        fn score(&self) -> f64 {
            self.score
        }

        fn key(&self) -> u32 {
            self.id
        }
    }

    fn entry(id: u32, score: f64) -> Entry {
        Entry { id, score }
    }

    fn ids(entries: &[Entry]) -> Vec<u32> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_keeps_best_in_order() {
        let mut best = BestK::new(3);
        for (id, score) in [(1, 5.0), (2, 9.0), (3, 1.0), (4, 7.0), (5, 3.0)] {
            best.offer(entry(id, score));
        }
        assert_eq!(best.len(), 3);
        assert_eq!(best.min_score(), Some(5.0));
        assert_eq!(ids(&best.into_sorted_vec()), vec![2, 4, 1]);
    }

    #[test]
    fn test_fills_unconditionally() {
        let mut best = BestK::new(3);
        assert!(best.offer(entry(1, -4.0)));
        assert!(best.offer(entry(2, -9.0)));
        assert!(!best.is_full());
        assert_eq!(best.threshold(), None);
        assert!(best.offer(entry(3, -1.0)));
        assert!(best.is_full());
        assert_eq!(best.threshold(), Some(-9.0));
    }

    #[test]
    fn test_ties_first_seen_wins() {
        let mut best = BestK::new(2);
        assert!(best.offer(entry(1, 2.0)));
        assert!(best.offer(entry(2, 2.0)));
        assert!(!best.offer(entry(3, 2.0)));
        assert_eq!(ids(&best.into_sorted_vec()), vec![1, 2]);
    }

    #[test]
    fn test_latest_tie_evicted_first() {
        let mut best = BestK::new(2);
        best.offer(entry(1, 2.0));
        best.offer(entry(2, 2.0));
        assert!(best.offer(entry(3, 4.0)));
        assert_eq!(ids(&best.into_sorted_vec()), vec![3, 1]);
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut best = BestK::new(4);
        assert!(best.offer(entry(1, 2.0)));
        assert!(!best.offer(entry(1, 8.0)));
        assert_eq!(best.len(), 1);
        assert_eq!(best.min_score(), Some(2.0));
    }

    #[test]
    fn test_zero_capacity() {
        let mut best = BestK::new(0);
        assert!(!best.offer(entry(1, 1.0)));
        assert!(best.is_empty());
        assert!(best.into_sorted_vec().is_empty());
    }

    #[test]
    fn test_extend() {
        let mut best = BestK::new(2);
        best.extend([entry(1, 1.0), entry(2, 3.0), entry(3, 2.0)]);
        assert_eq!(ids(&best.into_sorted_vec()), vec![2, 3]);
    }

    fn entries() -> impl Strategy<Value = Vec<Entry>> {
        // Score is a function of the id, as for teams.
        prop::collection::vec(0u32..40, 0..60).prop_map(|ids| {
            ids.into_iter()
                .map(|id| entry(id, f64::from(id % 7) - 3.0))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_matches_stable_sort(items in entries(), k in 0usize..12) {
            let mut best = BestK::new(k);
            best.extend(items.iter().cloned());

            let mut seen = HashSet::new();
            let mut expected: Vec<Entry> = items
                .into_iter()
                .filter(|e| seen.insert(e.id))
                .collect();
            expected.sort_by(|a, b| b.score.total_cmp(&a.score));
            expected.truncate(k);

            prop_assert_eq!(best.into_sorted_vec(), expected);
        }

        #[test]
        fn prop_min_score_never_decreases(items in entries(), k in 1usize..12) {
            let mut best = BestK::new(k);
            let mut floor = f64::NEG_INFINITY;
            for item in items {
                best.offer(item);
                prop_assert!(best.len() <= k);
                if best.is_full() {
                    let min = best.min_score().unwrap();
                    prop_assert!(min >= floor);
                    floor = min;
                }
            }
        }
    }
}
