// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PCB MTS ("maze/free-space"): a parity-tagged free-space index the
//! autorouter queries to find room for a via, ported from `mtspace.c`.
//!
//! The original keeps three R-trees of keepaway-tagged obstacle boxes, one
//! each for fixed geometry and for the two routing-pass parities
//! (`FIXED`/`ODD`/`EVEN`), and answers "is there room for a via of this
//! radius near this point" by repeatedly splitting a candidate search box
//! around whatever it overlaps until a piece survives three tree checks in
//! a row (fixed, then the current pass's parity tree, then the other
//! parity's tree) or is deemed too small to bother with. See [`query`] for
//! the resumable search itself.

mod query;

pub use query::{ConflictClass, FreeRegion, VettingHandle};

use pcb_geom::{Box, Coord};
use pcb_spatial::{Backend, RTree};

/// Which obstacle generation a box belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Parity {
    /// Board geometry that predates routing (pins, pads, fixed traces).
    Fixed,
    /// Geometry emitted on an odd-numbered routing pass.
    Odd,
    /// Geometry emitted on an even-numbered routing pass.
    Even,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Obstacle {
    bounds: Box,
    keepaway: Coord,
}

/// The parity-tagged free-space index itself: three independent R-trees of
/// [`Obstacle`]s, one per [`Parity`].
#[derive(Debug)]
pub struct Mts {
    fixed: RTree<Obstacle>,
    odd: RTree<Obstacle>,
    even: RTree<Obstacle>,
}

impl Default for Mts {
    fn default() -> Self {
        Self::new()
    }
}

impl Mts {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fixed: RTree::new(),
            odd: RTree::new(),
            even: RTree::new(),
        }
    }

    fn tree(&self, which: Parity) -> &RTree<Obstacle> {
        match which {
            Parity::Fixed => &self.fixed,
            Parity::Odd => &self.odd,
            Parity::Even => &self.even,
        }
    }

    fn tree_mut(&mut self, which: Parity) -> &mut RTree<Obstacle> {
        match which {
            Parity::Fixed => &mut self.fixed,
            Parity::Odd => &mut self.odd,
            Parity::Even => &mut self.even,
        }
    }

    /// Register a space-filler: `bounds` fills at least a `keepaway`-radius
    /// of empty space around it in the index for `which`'s parity
    /// (`mtspace_add`). `bounds` should already include the object's own
    /// bloat; `keepaway` is recorded separately so a later query can take
    /// the larger of its own keepaway and this one, exactly as
    /// `query_one`'s `shrink` computation does.
    pub fn add(&mut self, bounds: Box, which: Parity, keepaway: Coord) {
        self.tree_mut(which).insert(bounds, Obstacle { bounds, keepaway });
    }

    /// Drop every odd- and even-parity space-filler, leaving `Fixed`
    /// untouched. Called once per routing pass rather than retracting each
    /// ripped-up box's entry individually: the pass driver rebuilds both
    /// parity trees from that pass's emitted geometry as it goes, so stale
    /// entries from ripped-up boxes never carry over.
    pub fn reset_passes(&mut self) {
        self.odd.clear();
        self.even.clear();
    }

    /// Remove a space-filler previously added with the same `bounds`,
    /// `which`, and `keepaway` (`mtspace_remove`). A no-op if no matching
    /// entry is found.
    pub fn remove(&mut self, bounds: Box, which: Parity, keepaway: Coord) {
        let tree = self.tree_mut(which);
        let mut found = None;
        tree.search(
            &mut |node_box| {
                if node_box.intersects(bounds) {
                    pcb_spatial::Flow::Continue
                } else {
                    pcb_spatial::Flow::PruneSubtree
                }
            },
            &mut |id, leaf_box, data| {
                if *leaf_box == bounds && data.keepaway == keepaway {
                    found = Some(id);
                    pcb_spatial::Flow::Stop
                } else {
                    pcb_spatial::Flow::Continue
                }
            },
        );
        if let Some(id) = found {
            tree.remove(id);
        }
    }

    /// Start (or resume) a search for empty rectangular space of radius
    /// `radius` plus `keepaway` near `region`, under the routing pass
    /// parity `is_odd` (`mtspace_query_rect`). See [`VettingHandle`] for
    /// how to drive the returned handle.
    #[must_use]
    pub fn find_free_space(
        &self,
        region: Box,
        radius: Coord,
        keepaway: Coord,
        is_odd: bool,
        with_conflicts: bool,
    ) -> VettingHandle {
        VettingHandle::new(region, radius, keepaway, is_odd, with_conflicts)
    }

    /// Query a tree for any obstacle overlapping `candidate` once the
    /// caller's own keepaway is taken into account, returning the
    /// effective shrink (`min(caller_keepaway, obstacle.keepaway)`) and the
    /// obstacle's bounds if one is found close enough to matter.
    fn probe(&self, which: Parity, candidate: Box, caller_keepaway: Coord) -> Option<(Box, Coord)> {
        let tree = self.tree(which);
        let mut hit = None;
        tree.search(
            &mut |node_box| {
                if node_box.intersects(candidate) {
                    pcb_spatial::Flow::Continue
                } else {
                    pcb_spatial::Flow::PruneSubtree
                }
            },
            &mut |_id, leaf_box, data| {
                let shrink = caller_keepaway.min(data.keepaway);
                // Mirrors query_one: shrinking candidate by `shrink` must
                // still actually touch the obstacle for it to count.
                if candidate.x1 + shrink < leaf_box.x2
                    && candidate.x2 - shrink > leaf_box.x1
                    && candidate.y1 + shrink < leaf_box.y2
                    && candidate.y2 - shrink > leaf_box.y1
                {
                    hit = Some((*leaf_box, shrink));
                    pcb_spatial::Flow::Stop
                } else {
                    pcb_spatial::Flow::Continue
                }
            },
        );
        hit
    }
}
