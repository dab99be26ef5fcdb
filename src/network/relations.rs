//! Multi-valued map from junction key to cables.

use std::collections::HashMap;

use super::index::CableId;
use super::key::CoordKey;

/// Cables grouped by the key of one of their endpoints.
///
/// Buckets keep the order in which their key was first seen, and cables keep
/// insertion order within a bucket, so scans and tie-breaks are a pure
/// function of the input. A bucket emptied by [`remove`](Self::remove) keeps
/// its slot.
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    slots: HashMap<CoordKey, usize>,
    buckets: Vec<Bucket>,
}

#[derive(Debug, Clone)]
struct Bucket {
    key: CoordKey,
    cables: Vec<CableId>,
}

impl RelationIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `cable` to the bucket of `key`.
    pub fn insert(&mut self, key: CoordKey, cable: CableId) {
        let slot = match self.slots.get(&key) {
            Some(&slot) => slot,
            None => {
                self.buckets.push(Bucket {
                    key,
                    cables: Vec::new(),
                });
                self.slots.insert(key, self.buckets.len() - 1);
                self.buckets.len() - 1
            }
        };
        self.buckets[slot].cables.push(cable);
    }

    /// Remove the first occurrence of `cable` under `key`.
    ///
    /// Returns `false` if it was not there.
    pub fn remove(&mut self, key: CoordKey, cable: CableId) -> bool {
        let Some(&slot) = self.slots.get(&key) else {
            return false;
        };
        let cables = &mut self.buckets[slot].cables;
        match cables.iter().position(|&c| c == cable) {
            Some(pos) => {
                cables.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Cables under `key`, in insertion order.
    pub fn get(&self, key: &CoordKey) -> &[CableId] {
        self.slots
            .get(key)
            .map(|&slot| self.buckets[slot].cables.as_slice())
            .unwrap_or(&[])
    }

    /// The first cable past the first `limit` entries of the first bucket
    /// holding more than `limit` cables, scanning buckets in order.
    pub fn first_overflow(&self, limit: usize) -> Option<(CoordKey, CableId)> {
        self.buckets
            .iter()
            .find(|b| b.cables.len() > limit)
            .map(|b| (b.key, b.cables[limit]))
    }

    /// All buckets holding more than `limit` cables.
    pub fn overflowing(&self, limit: usize) -> impl Iterator<Item = (CoordKey, &[CableId])> + '_ {
        self.buckets
            .iter()
            .filter(move |b| b.cables.len() > limit)
            .map(|b| (b.key, b.cables.as_slice()))
    }

    /// Total number of entries beyond `limit`, summed over buckets.
    pub fn excess(&self, limit: usize) -> usize {
        self.buckets
            .iter()
            .map(|b| b.cables.len().saturating_sub(limit))
            .sum()
    }

    /// Number of keys that currently hold at least one cable.
    pub fn num_keys(&self) -> usize {
        self.buckets.iter().filter(|b| !b.cables.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::KeyMode;
    use nalgebra::Point3;

    fn key(x: f64) -> CoordKey {
        KeyMode::Exact.key(&Point3::new(x, 0.0, 0.0))
    }

    fn c(i: usize) -> CableId {
        CableId::new(i)
    }

    #[test]
    fn test_insert_and_get() {
        let mut index = RelationIndex::new();
        index.insert(key(1.0), c(0));
        index.insert(key(1.0), c(3));
        index.insert(key(2.0), c(1));

        assert_eq!(index.get(&key(1.0)), &[c(0), c(3)]);
        assert_eq!(index.get(&key(2.0)), &[c(1)]);
        assert!(index.get(&key(9.0)).is_empty());
        assert_eq!(index.num_keys(), 2);
    }

    #[test]
    fn test_remove_first_occurrence() {
        let mut index = RelationIndex::new();
        index.insert(key(1.0), c(0));
        index.insert(key(1.0), c(1));
        index.insert(key(1.0), c(0));

        assert!(index.remove(key(1.0), c(0)));
        assert_eq!(index.get(&key(1.0)), &[c(1), c(0)]);
        assert!(!index.remove(key(1.0), c(5)));
        assert!(!index.remove(key(7.0), c(0)));
    }

    #[test]
    fn test_first_overflow_in_bucket_order() {
        let mut index = RelationIndex::new();
        index.insert(key(5.0), c(0));
        index.insert(key(1.0), c(1));
        index.insert(key(1.0), c(2));
        index.insert(key(1.0), c(3));
        index.insert(key(5.0), c(4));
        index.insert(key(5.0), c(5));

        // Key 5.0 was seen first, so it is scanned first; its third entry is c(5).
        assert_eq!(index.first_overflow(2), Some((key(5.0), c(5))));
        assert_eq!(index.excess(2), 2);
        assert_eq!(index.overflowing(2).count(), 2);

        index.remove(key(5.0), c(5));
        assert_eq!(index.first_overflow(2), Some((key(1.0), c(3))));
    }

    #[test]
    fn test_emptied_bucket_keeps_slot() {
        let mut index = RelationIndex::new();
        index.insert(key(1.0), c(0));
        index.remove(key(1.0), c(0));
        assert_eq!(index.num_keys(), 0);

        index.insert(key(2.0), c(1));
        index.insert(key(1.0), c(2));
        index.insert(key(1.0), c(3));
        index.insert(key(1.0), c(4));
        index.insert(key(2.0), c(5));
        index.insert(key(2.0), c(6));

        // Key 1.0 still scans before 2.0.
        assert_eq!(index.first_overflow(2), Some((key(1.0), c(4))));
    }

    #[test]
    fn test_no_overflow() {
        let mut index = RelationIndex::new();
        index.insert(key(1.0), c(0));
        index.insert(key(1.0), c(1));
        assert_eq!(index.first_overflow(2), None);
        assert_eq!(index.excess(2), 0);
    }
}
