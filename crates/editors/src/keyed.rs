//! Keyed list mirror and reindexing utilities
//!
//! Every editor mirrors the externally owned list in a `KeyedList`, which
//! pairs each value with a stable `ItemId`. Auxiliary per-item state
//! (errors, expansion flags, text buffers) is stored in maps keyed by that
//! id, so removing or moving an item never leaves state pointing at the
//! wrong logical entry.
//!
//! The index-keyed reindexing functions are kept for callers that still
//! hold per-index state (for example a renderer caching row heights).

use pickers_core::{Identifiable, ItemId, new_item_id};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// Keyed
// ============================================================================

/// A value paired with its stable identifier
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    id: ItemId,
    value: T,
}

impl<T> Keyed<T> {
    /// Get the value
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T> Identifiable for Keyed<T> {
    fn id(&self) -> ItemId {
        self.id
    }
}

// ============================================================================
// KeyedList
// ============================================================================

/// Ordered mirror of an owned list with stable item identifiers
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedList<T> {
    items: Vec<Keyed<T>>,
}

impl<T> Default for KeyedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Clone + PartialEq> KeyedList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mirror of `values`, minting an id for each
    pub fn from_values(values: &[T]) -> Self {
        Self {
            items: values
                .iter()
                .cloned()
                .map(|value| Keyed {
                    id: new_item_id(),
                    value,
                })
                .collect(),
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Value at a position
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index).map(|item| &item.value)
    }

    /// Mutable value at a position
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index).map(|item| &mut item.value)
    }

    /// Identifier of the item at a position
    pub fn id_at(&self, index: usize) -> Option<ItemId> {
        self.items.get(index).map(|item| item.id)
    }

    /// Current position of an item
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.matches_id(id))
    }

    /// Value of an item by identifier
    pub fn by_id(&self, id: ItemId) -> Option<&T> {
        self.items
            .iter()
            .find(|item| item.matches_id(id))
            .map(|item| &item.value)
    }

    /// Append a value and return its new identifier
    pub fn push(&mut self, value: T) -> ItemId {
        let id = new_item_id();
        self.items.push(Keyed { id, value });
        id
    }

    /// Replace the value at a position, keeping its identifier
    pub fn replace(&mut self, index: usize, value: T) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.value = value;
                true
            }
            None => false,
        }
    }

    /// Remove the item at a position
    pub fn remove(&mut self, index: usize) -> Option<Keyed<T>> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Swap two positions; identifiers travel with their values
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a < self.items.len() && b < self.items.len() && a != b {
            self.items.swap(a, b);
            true
        } else {
            false
        }
    }

    /// Iterate over items with their identifiers
    pub fn iter(&self) -> impl Iterator<Item = &Keyed<T>> {
        self.items.iter()
    }

    /// Snapshot of the values, ready to hand to the owner
    pub fn values(&self) -> Vec<T> {
        self.items.iter().map(|item| item.value.clone()).collect()
    }

    /// Rebuild the mirror from a value supplied by the owner
    ///
    /// Items whose value is unchanged keep their identifier (same position
    /// first, then the first equal unused item). Remaining positions reuse
    /// the identifier previously at that position if it is still unused,
    /// which keeps state attached to an item edited in place. Returns the
    /// identifiers that no longer exist.
    pub fn resync(&mut self, values: &[T]) -> Vec<ItemId> {
        let mut old: Vec<Option<Keyed<T>>> =
            std::mem::take(&mut self.items).into_iter().map(Some).collect();
        let mut ids: Vec<Option<ItemId>> = vec![None; values.len()];

        for (pos, value) in values.iter().enumerate() {
            let same_position = old
                .get(pos)
                .and_then(Option::as_ref)
                .is_some_and(|item| &item.value == value);
            let slot = if same_position {
                Some(pos)
            } else {
                old.iter()
                    .position(|item| item.as_ref().is_some_and(|item| &item.value == value))
            };
            if let Some(slot) = slot {
                ids[pos] = old[slot].take().map(|item| item.id);
            }
        }

        for (pos, id) in ids.iter_mut().enumerate() {
            if id.is_none() {
                *id = old.get_mut(pos).and_then(Option::take).map(|item| item.id);
            }
        }

        self.items = values
            .iter()
            .cloned()
            .zip(ids)
            .map(|(value, id)| Keyed {
                id: id.unwrap_or_else(new_item_id),
                value,
            })
            .collect();

        old.into_iter().flatten().map(|item| item.id).collect()
    }

    /// Project id-keyed auxiliary state onto current positions
    pub fn index_view<V: Clone>(&self, aux: &HashMap<ItemId, V>) -> BTreeMap<usize, V> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| aux.get(&item.id).map(|v| (index, v.clone())))
            .collect()
    }
}

// ============================================================================
// Index Reindexing
// ============================================================================

/// Re-derive an index-keyed map after the item at `removed` was deleted
///
/// Keys below `removed` are preserved, the key at `removed` is dropped and
/// keys above it shift down by one.
pub fn reindex_after_remove<V: Clone>(map: &BTreeMap<usize, V>, removed: usize) -> BTreeMap<usize, V> {
    map.iter()
        .filter(|(k, _)| **k != removed)
        .map(|(k, v)| {
            let key = if *k > removed { k - 1 } else { *k };
            (key, v.clone())
        })
        .collect()
}

/// Re-derive an index-keyed map after an item was inserted at `at`
pub fn reindex_after_insert<V: Clone>(map: &BTreeMap<usize, V>, at: usize) -> BTreeMap<usize, V> {
    map.iter()
        .map(|(k, v)| {
            let key = if *k >= at { k + 1 } else { *k };
            (key, v.clone())
        })
        .collect()
}

/// Re-derive an index-keyed map after positions `a` and `b` were swapped
pub fn reindex_after_swap<V: Clone>(map: &BTreeMap<usize, V>, a: usize, b: usize) -> BTreeMap<usize, V> {
    map.iter()
        .map(|(k, v)| {
            let key = if *k == a {
                b
            } else if *k == b {
                a
            } else {
                *k
            };
            (key, v.clone())
        })
        .collect()
}

/// Drop auxiliary state for identifiers that left the list
pub fn prune<V>(aux: &mut HashMap<ItemId, V>, removed: &[ItemId]) {
    for id in removed {
        aux.remove(id);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(entries: &[(usize, &'static str)]) -> BTreeMap<usize, &'static str> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_reindex_after_remove_every_position() {
        let len = 5;
        let original: BTreeMap<usize, usize> = (0..len).map(|k| (k, k * 10)).collect();

        for removed in 0..len {
            let next = reindex_after_remove(&original, removed);
            assert_eq!(next.len(), len - 1);
            for k in 0..removed {
                assert_eq!(next.get(&k), original.get(&k));
            }
            for k in removed + 1..len {
                assert_eq!(next.get(&(k - 1)), original.get(&k));
            }
            assert!(!next.values().any(|v| *v == removed * 10));
        }
    }

    #[test]
    fn test_reindex_sparse_maps() {
        let errors = map(&[(0, "a"), (3, "d")]);
        assert_eq!(reindex_after_remove(&errors, 1), map(&[(0, "a"), (2, "d")]));
        assert_eq!(reindex_after_remove(&errors, 3), map(&[(0, "a")]));
        assert_eq!(reindex_after_insert(&errors, 1), map(&[(0, "a"), (4, "d")]));
        assert_eq!(reindex_after_swap(&errors, 0, 1), map(&[(1, "a"), (3, "d")]));
    }

    #[test]
    fn test_ids_follow_values() {
        let mut list = KeyedList::from_values(&["a", "b", "c"]);
        let b = list.id_at(1).unwrap();

        list.remove(0);
        assert_eq!(list.position(b), Some(0));

        list.swap(0, 1);
        assert_eq!(list.position(b), Some(1));
        assert_eq!(list.by_id(b), Some(&"b"));
        assert_eq!(list.values(), vec!["c", "b"]);
    }

    #[test]
    fn test_resync_keeps_ids_of_echoed_value() {
        let mut list = KeyedList::from_values(&["a", "b"]);
        let ids: Vec<_> = list.iter().map(|k| k.id()).collect();

        let removed = list.resync(&["a", "b"]);
        assert!(removed.is_empty());
        assert_eq!(list.iter().map(|k| k.id()).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_resync_tracks_external_remove_and_edit() {
        let mut list = KeyedList::from_values(&["a", "b", "c"]);
        let a = list.id_at(0).unwrap();
        let b = list.id_at(1).unwrap();
        let c = list.id_at(2).unwrap();

        // Owner dropped "a" and rewrote "c"; position 1's old id went to "b"
        let removed = list.resync(&["b", "c2"]);
        assert_eq!(list.position(b), Some(0));
        assert_eq!(list.position(c), None);
        assert_eq!(removed.len(), 2);
        assert!(removed.contains(&a) && removed.contains(&c));
        assert_eq!(list.values(), vec!["b", "c2"]);
    }

    #[test]
    fn test_resync_edit_in_place_keeps_id() {
        let mut list = KeyedList::from_values(&["a", "b"]);
        let b = list.id_at(1).unwrap();

        let removed = list.resync(&["a", "bee"]);
        assert!(removed.is_empty());
        assert_eq!(list.id_at(1), Some(b));
    }

    #[test]
    fn test_index_view() {
        let list = KeyedList::from_values(&["a", "b", "c"]);
        let mut aux = HashMap::new();
        aux.insert(list.id_at(2).unwrap(), "err");

        assert_eq!(list.index_view(&aux), map(&[(2, "err")]));
    }

    #[test]
    fn test_prune() {
        let list = KeyedList::from_values(&["a", "b"]);
        let mut aux = HashMap::new();
        let a = list.id_at(0).unwrap();
        aux.insert(a, 1);
        aux.insert(list.id_at(1).unwrap(), 2);

        prune(&mut aux, &[a]);
        assert_eq!(aux.len(), 1);
    }
}
