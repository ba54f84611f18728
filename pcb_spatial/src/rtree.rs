// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A from-scratch R-tree (Guttman's quadratic-split algorithm, 1984), the
//! real spatial index behind every per-layer-group object index and
//! per-contour edge index in this workspace.
//!
//! Node removal uses a simplified `CondenseTree`: an underflowing node is
//! detached and *all* of its leaf-level descendants are collected for
//! reinsertion from the root, rather than Guttman's reinsert-at-original-
//! level refinement. This keeps removal a single well-tested code path at
//! the cost of a few extra `choose_leaf` descents on the rare underflow;
//! query and insert performance are unaffected.

use std::collections::HashMap;
use std::fmt;

use crate::{Backend, Box, EntryId, Flow};

const DEFAULT_MAX_ENTRIES: usize = 8;

type NodeId = usize;

struct Leaf<T> {
    id: EntryId,
    bounds: Box,
    data: T,
}

struct Child {
    bounds: Box,
    node: NodeId,
}

enum Kind<T> {
    Leaf(Vec<Leaf<T>>),
    Internal(Vec<Child>),
}

struct Node<T> {
    kind: Kind<T>,
    parent: Option<NodeId>,
}

/// A spatial index of axis-aligned boxes, built on Guttman's R-tree
/// insertion and quadratic-split algorithm. Fan-out is configurable; a node
/// splits once it holds more than `max_entries` children, and a non-root
/// node is never allowed to hold fewer than `min_entries`.
pub struct RTree<T> {
    nodes: Vec<Node<T>>,
    root: NodeId,
    leaf_of: HashMap<EntryId, NodeId>,
    next_id: EntryId,
    max_entries: usize,
    min_entries: usize,
    len: usize,
}

impl<T> fmt::Debug for RTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RTree")
            .field("len", &self.len)
            .field("nodes", &self.nodes.len())
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RTree<T> {
    /// Create an empty tree with the default fan-out (8 entries per node).
    #[must_use]
    pub fn new() -> Self {
        Self::with_fan_out(DEFAULT_MAX_ENTRIES)
    }

    /// Create an empty tree with a custom maximum fan-out. `min_entries` is
    /// derived as `max_entries / 2` (at least 2), the usual R-tree choice.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries < 4` (too small a fan-out makes quadratic
    /// split degenerate).
    #[must_use]
    pub fn with_fan_out(max_entries: usize) -> Self {
        assert!(max_entries >= 4, "R-tree fan-out must be at least 4");
        Self {
            nodes: std::vec::Vec::from([Node {
                kind: Kind::Leaf(Vec::new()),
                parent: None,
            }]),
            root: 0,
            leaf_of: HashMap::new(),
            next_id: 0,
            max_entries,
            min_entries: (max_entries / 2).max(2),
            len: 0,
        }
    }

    fn node_bounds(&self, node: NodeId) -> Option<Box> {
        match &self.nodes[node].kind {
            Kind::Leaf(entries) => entries.iter().map(|e| e.bounds).reduce(Box::union),
            Kind::Internal(children) => children.iter().map(|c| c.bounds).reduce(Box::union),
        }
    }

    /// Descend choosing, at each internal level, the child whose box needs
    /// the least enlargement to cover `bounds` (ties broken by smaller
    /// existing area), until a leaf is reached.
    fn choose_leaf(&self, bounds: Box) -> NodeId {
        let mut current = self.root;
        loop {
            match &self.nodes[current].kind {
                Kind::Leaf(_) => return current,
                Kind::Internal(children) => {
                    let mut best = 0usize;
                    let mut best_enlargement = i64::MAX;
                    let mut best_area = i64::MAX;
                    for (i, child) in children.iter().enumerate() {
                        let enlargement = child.bounds.union(bounds).area() - child.bounds.area();
                        let area = child.bounds.area();
                        if enlargement < best_enlargement
                            || (enlargement == best_enlargement && area < best_area)
                        {
                            best = i;
                            best_enlargement = enlargement;
                            best_area = area;
                        }
                    }
                    current = children[best].node;
                }
            }
        }
    }

    /// Walk up from `node`, recomputing each ancestor's recorded child box
    /// from that child's actual current contents.
    fn adjust_bounds_upward(&mut self, mut node: NodeId) {
        while let Some(parent) = self.nodes[node].parent {
            let new_bounds = self
                .node_bounds(node)
                .expect("a node on the path to an insert always has at least one entry");
            if let Kind::Internal(children) = &mut self.nodes[parent].kind
                && let Some(child) = children.iter_mut().find(|c| c.node == node)
            {
                child.bounds = new_bounds;
            }
            node = parent;
        }
    }

    /// `PickSeeds`: the pair of entries that would waste the most area if
    /// forced into the same group.
    fn pick_seeds<B>(entries: &[(Box, B)]) -> (usize, usize) {
        let mut best = (0, 1.min(entries.len().saturating_sub(1)));
        let mut worst_waste = i64::MIN;
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                let combined = entries[i].0.union(entries[j].0);
                let waste = combined.area() - entries[i].0.area() - entries[j].0.area();
                if waste > worst_waste {
                    worst_waste = waste;
                    best = (i, j);
                }
            }
        }
        best
    }

    /// Quadratic split (`QS2`/`QS3`): seed two groups with the worst-waste
    /// pair, then repeatedly assign whichever remaining entry has the
    /// strongest group preference to the group it prefers, dumping all
    /// remaining entries into whichever group would otherwise underflow.
    fn split_entries<B>(mut entries: Vec<(Box, B)>, min_entries: usize) -> (Vec<(Box, B)>, Vec<(Box, B)>) {
        let (seed_lo, seed_hi) = {
            let (a, b) = Self::pick_seeds(&entries);
            (a.min(b), a.max(b))
        };
        let seed_b_entry = entries.remove(seed_hi);
        let seed_a_entry = entries.remove(seed_lo);
        let mut group_a = std::vec::Vec::from([seed_a_entry]);
        let mut group_b = std::vec::Vec::from([seed_b_entry]);
        let mut remaining = entries;

        while !remaining.is_empty() {
            let left = remaining.len();
            if group_a.len() + left == min_entries {
                group_a.extend(remaining.drain(..));
                break;
            }
            if group_b.len() + left == min_entries {
                group_b.extend(remaining.drain(..));
                break;
            }

            let box_a = group_a.iter().map(|e| e.0).reduce(Box::union).expect("non-empty");
            let box_b = group_b.iter().map(|e| e.0).reduce(Box::union).expect("non-empty");

            let mut pick_index = 0;
            let mut pick_to_a = true;
            let mut best_preference = i64::MIN;
            for (i, (bounds, _)) in remaining.iter().enumerate() {
                let enlarge_a = box_a.union(*bounds).area() - box_a.area();
                let enlarge_b = box_b.union(*bounds).area() - box_b.area();
                let preference = (enlarge_a - enlarge_b).abs();
                if preference > best_preference {
                    best_preference = preference;
                    pick_index = i;
                    pick_to_a = enlarge_a < enlarge_b
                        || (enlarge_a == enlarge_b && box_a.area() < box_b.area())
                        || (enlarge_a == enlarge_b
                            && box_a.area() == box_b.area()
                            && group_a.len() <= group_b.len());
                }
            }
            let entry = remaining.remove(pick_index);
            if pick_to_a {
                group_a.push(entry);
            } else {
                group_b.push(entry);
            }
        }
        (group_a, group_b)
    }

    fn split_leaf(&mut self, node: NodeId, entries: Vec<Leaf<T>>) -> NodeId {
        let items: Vec<(Box, (EntryId, T))> =
            entries.into_iter().map(|l| (l.bounds, (l.id, l.data))).collect();
        let (group_a, group_b) = Self::split_entries(items, self.min_entries);
        let leaves_a: Vec<Leaf<T>> = group_a
            .into_iter()
            .map(|(bounds, (id, data))| Leaf { id, bounds, data })
            .collect();
        let leaves_b: Vec<Leaf<T>> = group_b
            .into_iter()
            .map(|(bounds, (id, data))| Leaf { id, bounds, data })
            .collect();

        for leaf in &leaves_a {
            self.leaf_of.insert(leaf.id, node);
        }
        let parent = self.nodes[node].parent;
        self.nodes[node].kind = Kind::Leaf(leaves_a);

        let sibling = self.nodes.len();
        for leaf in &leaves_b {
            self.leaf_of.insert(leaf.id, sibling);
        }
        self.nodes.push(Node {
            kind: Kind::Leaf(leaves_b),
            parent,
        });
        sibling
    }

    fn split_internal(&mut self, node: NodeId, entries: Vec<Child>) -> NodeId {
        let items: Vec<(Box, NodeId)> = entries.into_iter().map(|c| (c.bounds, c.node)).collect();
        let (group_a, group_b) = Self::split_entries(items, self.min_entries);
        let children_a: Vec<Child> = group_a
            .into_iter()
            .map(|(bounds, n)| Child { bounds, node: n })
            .collect();
        let children_b: Vec<Child> = group_b
            .into_iter()
            .map(|(bounds, n)| Child { bounds, node: n })
            .collect();

        let parent = self.nodes[node].parent;
        self.nodes[node].kind = Kind::Internal(children_a);

        let sibling = self.nodes.len();
        for child in &children_b {
            self.nodes[child.node].parent = Some(sibling);
        }
        self.nodes.push(Node {
            kind: Kind::Internal(children_b),
            parent,
        });
        sibling
    }

    /// Split `node` (already overflowing) and propagate the new sibling
    /// into its parent, splitting parents in turn as needed, growing the
    /// tree by a level if the root itself splits.
    fn split_and_propagate(&mut self, mut node: NodeId) {
        loop {
            let taken = std::mem::replace(&mut self.nodes[node].kind, Kind::Leaf(Vec::new()));
            let sibling = match taken {
                Kind::Leaf(entries) => self.split_leaf(node, entries),
                Kind::Internal(children) => self.split_internal(node, children),
            };
            let node_bounds = self.node_bounds(node).expect("split halves are non-empty");
            let sibling_bounds = self.node_bounds(sibling).expect("split halves are non-empty");

            match self.nodes[node].parent {
                Some(parent) => {
                    if let Kind::Internal(children) = &mut self.nodes[parent].kind {
                        if let Some(child) = children.iter_mut().find(|c| c.node == node) {
                            child.bounds = node_bounds;
                        }
                        children.push(Child {
                            bounds: sibling_bounds,
                            node: sibling,
                        });
                    }
                    let overflow = matches!(&self.nodes[parent].kind, Kind::Internal(c) if c.len() > self.max_entries);
                    if overflow {
                        node = parent;
                        continue;
                    }
                    self.adjust_bounds_upward(parent);
                    return;
                }
                None => {
                    let new_root = self.nodes.len();
                    self.nodes.push(Node {
                        kind: Kind::Internal(std::vec::Vec::from([
                            Child {
                                bounds: node_bounds,
                                node,
                            },
                            Child {
                                bounds: sibling_bounds,
                                node: sibling,
                            },
                        ])),
                        parent: None,
                    });
                    self.nodes[node].parent = Some(new_root);
                    self.nodes[sibling].parent = Some(new_root);
                    self.root = new_root;
                    return;
                }
            }
        }
    }

    fn insert_with_id(&mut self, id: EntryId, bounds: Box, data: T) {
        let leaf = self.choose_leaf(bounds);
        let overflow = if let Kind::Leaf(entries) = &mut self.nodes[leaf].kind {
            entries.push(Leaf { id, bounds, data });
            entries.len() > self.max_entries
        } else {
            unreachable!("choose_leaf always returns a leaf node")
        };
        self.leaf_of.insert(id, leaf);
        self.len += 1;

        if overflow {
            self.split_and_propagate(leaf);
        } else {
            self.adjust_bounds_upward(leaf);
        }
    }

    fn remove_by_id(&mut self, id: EntryId) -> Option<T> {
        let leaf = self.leaf_of.remove(&id)?;
        let data = if let Kind::Leaf(entries) = &mut self.nodes[leaf].kind {
            let pos = entries.iter().position(|e| e.id == id)?;
            entries.remove(pos).data
        } else {
            unreachable!("leaf_of only ever maps to leaf nodes")
        };
        self.len -= 1;
        self.condense_tree(leaf);
        Some(data)
    }

    /// Collect every leaf entry reachable from `node` into `out`, leaving
    /// behind emptied (and now-unreferenced) nodes.
    fn collect_leaves_from(&mut self, node: NodeId, out: &mut Vec<Leaf<T>>) {
        let kind = std::mem::replace(&mut self.nodes[node].kind, Kind::Leaf(Vec::new()));
        match kind {
            Kind::Leaf(entries) => out.extend(entries),
            Kind::Internal(children) => {
                for child in children {
                    self.collect_leaves_from(child.node, out);
                }
            }
        }
    }

    fn condense_tree(&mut self, start: NodeId) {
        let mut reinsert: Vec<Leaf<T>> = Vec::new();
        let mut node = start;
        while let Some(parent) = self.nodes[node].parent {
            let underflow = match &self.nodes[node].kind {
                Kind::Leaf(entries) => entries.len() < self.min_entries,
                Kind::Internal(children) => children.len() < self.min_entries,
            };
            if underflow {
                if let Kind::Internal(children) = &mut self.nodes[parent].kind {
                    children.retain(|c| c.node != node);
                }
                self.collect_leaves_from(node, &mut reinsert);
            } else {
                let bounds = self
                    .node_bounds(node)
                    .expect("non-underflowing node is non-empty");
                if let Kind::Internal(children) = &mut self.nodes[parent].kind
                    && let Some(child) = children.iter_mut().find(|c| c.node == node)
                {
                    child.bounds = bounds;
                }
            }
            node = parent;
        }

        if let Kind::Internal(children) = &self.nodes[self.root].kind
            && children.len() == 1
        {
            let only = children[0].node;
            self.nodes[only].parent = None;
            self.root = only;
        }

        for leaf in reinsert {
            self.insert_with_id(leaf.id, leaf.bounds, leaf.data);
        }
    }

    fn search_node(
        &self,
        node: NodeId,
        prune: &mut dyn FnMut(&Box) -> Flow,
        visit: &mut dyn FnMut(EntryId, &Box, &T) -> Flow,
    ) -> Flow {
        match &self.nodes[node].kind {
            Kind::Leaf(entries) => {
                for entry in entries {
                    if visit(entry.id, &entry.bounds, &entry.data) == Flow::Stop {
                        return Flow::Stop;
                    }
                }
                Flow::Continue
            }
            Kind::Internal(children) => {
                for child in children {
                    match prune(&child.bounds) {
                        Flow::Stop => return Flow::Stop,
                        Flow::PruneSubtree => continue,
                        Flow::Continue => {
                            if self.search_node(child.node, prune, visit) == Flow::Stop {
                                return Flow::Stop;
                            }
                        }
                    }
                }
                Flow::Continue
            }
        }
    }
}

impl<T> Backend<T> for RTree<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn insert(&mut self, bounds: Box, data: T) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        self.insert_with_id(id, bounds, data);
        id
    }

    fn remove(&mut self, id: EntryId) -> Option<T> {
        self.remove_by_id(id)
    }

    fn update(&mut self, id: EntryId, bounds: Box) {
        if let Some(data) = self.remove_by_id(id) {
            self.insert_with_id(id, bounds, data);
        }
    }

    fn clear(&mut self) {
        *self = Self::with_fan_out(self.max_entries);
    }

    fn search(
        &self,
        prune: &mut dyn FnMut(&Box) -> Flow,
        visit: &mut dyn FnMut(EntryId, &Box, &T) -> Flow,
    ) {
        self.search_node(self.root, prune, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }

        fn range(&mut self, upper_exclusive: i32) -> i32 {
            (self.next() % upper_exclusive as u64) as i32
        }
    }

    fn linear_hits<T>(entries: &[(EntryId, Box, T)], region: Box) -> Vec<EntryId> {
        entries
            .iter()
            .filter(|(_, b, _)| b.intersects(region))
            .map(|(id, _, _)| *id)
            .collect()
    }

    #[test]
    fn insert_remove_round_trip_keeps_len_consistent() {
        let mut tree = RTree::new();
        let a = tree.insert(Box::new(0, 0, 10, 10), "a");
        let b = tree.insert(Box::new(100, 100, 110, 110), "b");
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.remove(a), Some("a"));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.remove(b), Some("b"));
        assert!(tree.is_empty());
        assert_eq!(tree.remove(a), None);
    }

    #[test]
    fn search_completeness_against_linear_scan() {
        // spec.md 8.1 property 3: search with always-accept predicates
        // visits exactly the boxes intersecting the query.
        let mut rng = Lcg(0x5EED_5EED_5EED_5EED);
        let mut tree: RTree<u32> = RTree::with_fan_out(4);
        let mut reference = Vec::new();
        for i in 0..500u32 {
            let x1 = rng.range(1000);
            let y1 = rng.range(1000);
            let bounds = Box::new(x1, y1, x1 + rng.range(50) + 1, y1 + rng.range(50) + 1);
            let id = tree.insert(bounds, i);
            reference.push((id, bounds, i));
        }

        for _ in 0..20 {
            let x1 = rng.range(1000);
            let y1 = rng.range(1000);
            let region = Box::new(x1, y1, x1 + rng.range(200) + 1, y1 + rng.range(200) + 1);

            let mut got = tree.query_region(region);
            let mut expected = linear_hits(&reference, region);
            got.sort_unstable();
            expected.sort_unstable();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn remove_half_then_search_still_matches_linear_scan() {
        let mut rng = Lcg(0xC0FFEE);
        let mut tree: RTree<u32> = RTree::with_fan_out(4);
        let mut reference = Vec::new();
        for i in 0..300u32 {
            let x1 = rng.range(500);
            let y1 = rng.range(500);
            let bounds = Box::new(x1, y1, x1 + 5, y1 + 5);
            let id = tree.insert(bounds, i);
            reference.push((id, bounds, i));
        }
        reference.retain(|(id, _, _)| {
            if id % 2 == 0 {
                tree.remove(*id);
                false
            } else {
                true
            }
        });

        let region = Box::new(0, 0, 500, 500);
        let mut got = tree.query_region(region);
        let mut expected = linear_hits(&reference, region);
        got.sort_unstable();
        expected.sort_unstable();
        assert_eq!(got, expected);
        assert_eq!(tree.len(), reference.len());
    }

    #[test]
    fn any_intersects_short_circuits() {
        let mut tree = RTree::new();
        tree.insert(Box::new(0, 0, 10, 10), ());
        assert!(tree.any_intersects(Box::new(5, 5, 20, 20)));
        assert!(!tree.any_intersects(Box::new(100, 100, 110, 110)));
    }

    #[test]
    fn update_moves_an_entry() {
        let mut tree = RTree::new();
        let id = tree.insert(Box::new(0, 0, 10, 10), "moved");
        tree.update(id, Box::new(1000, 1000, 1010, 1010));
        assert!(!tree.any_intersects(Box::new(0, 0, 10, 10)));
        assert!(tree.any_intersects(Box::new(1000, 1000, 1010, 1010)));
    }
}
