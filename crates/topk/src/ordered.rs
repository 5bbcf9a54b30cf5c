use std::collections::btree_map::{self, BTreeMap};

/// Traversal order for flattening an [`OrderedTopK`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// What happened to an inserted entry.
#[derive(Debug, PartialEq, Eq)]
pub enum InsertOutcome<K, V> {
    /// Stored without displacing anything
    Retained,

    /// An equal key is already stored; the incoming value is handed back
    Collided(V),

    /// Stored, then the minimum entry was evicted to stay within capacity.
    /// The evicted entry may be the one just inserted.
    Evicted { key: K, value: V },
}

/// Ordered set keyed by `K` with optional capacity.
///
/// Keys are unique and inserts never replace: a value whose key is already
/// present is rejected. The structure is single-owner; callers that feed it
/// from several threads funnel values through one consumer.
#[derive(Debug, Clone)]
pub struct OrderedTopK<K, V> {
    entries: BTreeMap<K, V>,
    capacity: Option<usize>,
}

impl<K: Ord, V> OrderedTopK<K, V> {
    /// Keeps at most `capacity` entries.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity: Some(capacity),
        }
    }

    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity: None,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts without replacement, then evicts the minimum if over capacity.
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome<K, V> {
        match self.entries.entry(key) {
            btree_map::Entry::Occupied(_) => return InsertOutcome::Collided(value),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }

        match self.capacity {
            Some(capacity) if self.entries.len() > capacity => match self.entries.pop_first() {
                Some((key, value)) => InsertOutcome::Evicted { key, value },
                None => InsertOutcome::Retained,
            },
            _ => InsertOutcome::Retained,
        }
    }

    pub fn pop_min(&mut self) -> Option<(K, V)> {
        self.entries.pop_first()
    }

    #[must_use]
    pub fn min_key(&self) -> Option<&K> {
        self.entries.keys().next()
    }

    #[must_use]
    pub fn max_key(&self) -> Option<&K> {
        self.entries.keys().next_back()
    }

    /// Entries in ascending key order; use `.rev()` for descending.
    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    /// Flattens the set into its values in the requested key order.
    #[must_use]
    pub fn into_sorted_vec(self, direction: Direction) -> Vec<V> {
        match direction {
            Direction::Ascending => self.entries.into_values().collect(),
            Direction::Descending => self.entries.into_values().rev().collect(),
        }
    }
}

impl<K: Ord, V> Default for OrderedTopK<K, V> {
    fn default() -> Self {
        Self::unbounded()
    }
}
