// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PCB Spatial: an R-tree index of axis-aligned [`pcb_geom::Box`]es, ported
//! from the `r_tree`/`rtree.c` pairing used by both the autorouter's
//! per-layer-group object index and the polygon engine's per-contour edge
//! index.
//!
//! The original's R-tree offers exactly two predicates at search time: one
//! that decides whether a whole subtree's bounding region is worth
//! descending into (`region_in_search`), and one that decides whether an
//! individual leaf box should be reported (`rectangle_in_region`). Either
//! may halt the walk early via a `longjmp` back past the search call. Here
//! both predicates are ordinary closures returning [`Flow`], and `search`
//! unwinds by ordinary return values — no panics, no non-local control
//! transfer.
//!
//! [`Backend`] generalizes the storage side of a spatial index (insert,
//! remove, update, and the two-predicate search) so more than one
//! implementation can sit behind it: [`RTree`] is the real, hand-rolled
//! Guttman-style tree used everywhere in this workspace, and [`FlatVec`] is
//! a linear-scan reference backend kept around for tests and as a
//! benchmarking baseline — the same "pluggable backend, plus a trivial
//! from-scratch one" shape this crate's spatial-index ancestor used.

mod flatvec;
mod rtree;

pub use flatvec::FlatVec;
pub use pcb_geom::Box;
pub use rtree::RTree;

/// Stable identifier for an entry inserted into a [`Backend`].
///
/// Backends assign these on insert; callers hold on to them to `update` or
/// `remove` the entry later. Ids are never reused while an entry is live,
/// but may be recycled once an entry has been removed.
pub type EntryId = u64;

/// Outcome of a search predicate, replacing the original's `longjmp`-based
/// early-termination signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Keep walking (descend into this subtree, or move on to the next
    /// sibling/leaf).
    Continue,
    /// Skip this subtree entirely without visiting any of its leaves.
    /// Meaningless when returned from a leaf visitor; treated as
    /// [`Flow::Continue`] there.
    PruneSubtree,
    /// Abandon the search immediately; no further predicates are called.
    Stop,
}

/// A spatial index mapping [`EntryId`]s to axis-aligned boxes, queryable via
/// the two-predicate, early-terminating `search` protocol.
pub trait Backend<T> {
    /// Number of live entries.
    fn len(&self) -> usize;

    /// True if the index holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `data` with bounding box `bounds`, returning its id.
    fn insert(&mut self, bounds: Box, data: T) -> EntryId;

    /// Remove the entry with the given id, returning its payload.
    fn remove(&mut self, id: EntryId) -> Option<T>;

    /// Replace the bounding box of an existing entry, leaving its id and
    /// payload unchanged. A no-op if `id` is not present.
    fn update(&mut self, id: EntryId, bounds: Box);

    /// Remove every entry.
    fn clear(&mut self);

    /// Walk the index, pruning whole subtrees with `prune` and visiting
    /// individual entries with `visit`. Either callback may return
    /// [`Flow::Stop`] to abandon the walk early.
    ///
    /// `prune` is called once per internal node with that node's aggregate
    /// bounding box (`region_in_search`); returning
    /// [`Flow::PruneSubtree`] skips every entry under it without visiting
    /// them. `visit` is called once per leaf entry (`rectangle_in_region`);
    /// its return value does not affect sibling entries except via
    /// [`Flow::Stop`].
    fn search(
        &self,
        prune: &mut dyn FnMut(&Box) -> Flow,
        visit: &mut dyn FnMut(EntryId, &Box, &T) -> Flow,
    );

    /// Convenience wrapper over [`Backend::search`]: report every entry
    /// whose box intersects `region`, in no particular order.
    fn query_region(&self, region: Box) -> std::vec::Vec<EntryId> {
        let mut out = std::vec::Vec::new();
        self.search(
            &mut |node_box| {
                if node_box.intersects(region) {
                    Flow::Continue
                } else {
                    Flow::PruneSubtree
                }
            },
            &mut |id, leaf_box, _data| {
                if leaf_box.intersects(region) {
                    out.push(id);
                }
                Flow::Continue
            },
        );
        out
    }

    /// True if any entry's box intersects `region` (`R-tree search
    /// completeness`'s early-termination use case — stops at the first
    /// hit instead of visiting the rest).
    fn any_intersects(&self, region: Box) -> bool {
        let mut found = false;
        self.search(
            &mut |node_box| {
                if node_box.intersects(region) {
                    Flow::Continue
                } else {
                    Flow::PruneSubtree
                }
            },
            &mut |_id, leaf_box, _data| {
                if leaf_box.intersects(region) {
                    found = true;
                    Flow::Stop
                } else {
                    Flow::Continue
                }
            },
        );
        found
    }
}
