// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear-scan reference backend. Not a real R-tree: kept as a small,
//! obviously-correct baseline to check [`RTree`](crate::RTree) behavior
//! against in tests, and as a benchmarking floor ("is the real tree
//! actually paying for its complexity").

use std::collections::HashMap;

use crate::{Backend, Box, EntryId, Flow};

struct Slot<T> {
    bounds: Box,
    data: T,
}

/// A spatial index backed by an unsorted `Vec`; every query is a linear
/// scan. `O(1)` insert, `O(n)` everything else.
pub struct FlatVec<T> {
    slots: Vec<Option<Slot<T>>>,
    index_of: HashMap<EntryId, usize>,
    free: Vec<usize>,
    next_id: EntryId,
}

impl<T> std::fmt::Debug for FlatVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlatVec")
            .field("total_slots", &self.slots.len())
            .field("alive", &self.index_of.len())
            .finish_non_exhaustive()
    }
}

impl<T> Default for FlatVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FlatVec<T> {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index_of: HashMap::new(),
            free: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Backend<T> for FlatVec<T> {
    fn len(&self) -> usize {
        self.index_of.len()
    }

    fn insert(&mut self, bounds: Box, data: T) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        let slot = Slot { bounds, data };
        let index = if let Some(free_index) = self.free.pop() {
            self.slots[free_index] = Some(slot);
            free_index
        } else {
            self.slots.push(Some(slot));
            self.slots.len() - 1
        };
        self.index_of.insert(id, index);
        id
    }

    fn remove(&mut self, id: EntryId) -> Option<T> {
        let index = self.index_of.remove(&id)?;
        let slot = self.slots[index].take()?;
        self.free.push(index);
        Some(slot.data)
    }

    fn update(&mut self, id: EntryId, bounds: Box) {
        if let Some(&index) = self.index_of.get(&id)
            && let Some(slot) = self.slots[index].as_mut()
        {
            slot.bounds = bounds;
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.index_of.clear();
        self.free.clear();
    }

    fn search(
        &self,
        prune: &mut dyn FnMut(&Box) -> Flow,
        visit: &mut dyn FnMut(EntryId, &Box, &T) -> Flow,
    ) {
        // A flat scan has no internal nodes to prune; the whole backend is
        // conceptually one subtree, so `prune` is offered the overall
        // extent once up front for parity with a real tree's protocol.
        let Some(extent) = self.extent() else {
            return;
        };
        if prune(&extent) == Flow::PruneSubtree {
            return;
        }
        for (&id, &index) in &self.index_of {
            let slot = self.slots[index]
                .as_ref()
                .expect("index_of only maps to occupied slots");
            if visit(id, &slot.bounds, &slot.data) == Flow::Stop {
                return;
            }
        }
    }
}

impl<T> FlatVec<T> {
    fn extent(&self) -> Option<Box> {
        self.slots
            .iter()
            .flatten()
            .map(|slot| slot.bounds)
            .reduce(|a, b| a.union(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_query_remove_round_trip() {
        let mut backend = FlatVec::new();
        let a = backend.insert(Box::new(0, 0, 10, 10), "a");
        let b = backend.insert(Box::new(20, 20, 30, 30), "b");
        assert_eq!(backend.len(), 2);

        let hits = backend.query_region(Box::new(5, 5, 25, 25));
        assert!(hits.contains(&a));
        assert!(hits.contains(&b));

        assert_eq!(backend.remove(a), Some("a"));
        assert_eq!(backend.len(), 1);
        let hits = backend.query_region(Box::new(5, 5, 25, 25));
        assert_eq!(hits, std::vec::Vec::from([b]));
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut backend: FlatVec<i32> = FlatVec::new();
        let a = backend.insert(Box::new(0, 0, 1, 1), 1);
        backend.remove(a);
        let b = backend.insert(Box::new(0, 0, 1, 1), 2);
        assert_eq!(backend.slots.len(), 1);
        assert_ne!(a, b);
    }
}
