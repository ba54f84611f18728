// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Net and subnet membership, `autoroute.c`'s four intrusive circular lists
//! (`same_net`, `same_subnet`, `original_subnet`, `different_net`), §3.4.
//!
//! The original threads these through `RB_up`/`RB_down`-style ring pointers
//! on each `RouteBox`. A ring only ever answers "is X connected to Y yet",
//! never "list every member in order" (the pass driver iterates *subnets*,
//! not the ring itself), so a union-find forest over stable
//! [`RouteBoxId`] slot indices gives the same answers with no pointer
//! bookkeeping: two boxes are in the same ring iff `find` returns the same
//! representative.
//!
//! `same_net` and `original_subnet` persist for the life of a
//! [`crate::model::RouteModel`] (original_subnet freezes the subnet grouping
//! read at data-preparation time and is never updated again); `same_subnet`
//! is reset at the start of every pass as connections are discovered.
//! `different_net` only ever needs one representative per net, so it is a
//! plain map rather than a third union-find.

use hashbrown::HashMap;

use crate::route_box::RouteBoxId;
use pcb_geom::NetId;

struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(capacity: usize) -> Self {
        Self { parent: (0..capacity as u32).collect(), rank: vec![0; capacity] }
    }

    fn ensure(&mut self, slot: usize) {
        while self.parent.len() <= slot {
            self.parent.push(self.parent.len() as u32);
            self.rank.push(0);
        }
    }

    fn find(&mut self, x: u32) -> u32 {
        self.ensure(x as usize);
        if self.parent[x as usize] != x {
            let root = self.find(self.parent[x as usize]);
            self.parent[x as usize] = root;
        }
        self.parent[x as usize]
    }

    fn union(&mut self, a: u32, b: u32) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra as usize].cmp(&self.rank[rb as usize]) {
            std::cmp::Ordering::Less => self.parent[ra as usize] = rb,
            std::cmp::Ordering::Greater => self.parent[rb as usize] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb as usize] = ra;
                self.rank[ra as usize] += 1;
            }
        }
    }

    fn same(&mut self, a: u32, b: u32) -> bool {
        self.find(a) == self.find(b)
    }
}

fn slot(id: RouteBoxId) -> u32 {
    id.slot() as u32
}

/// Net and subnet connectivity for one [`crate::model::RouteModel`].
#[derive(Default)]
pub struct NetRings {
    same_net: UnionFind,
    original_subnet: UnionFind,
    same_subnet: UnionFind,
    different_net: HashMap<NetId, RouteBoxId>,
}

impl Default for UnionFind {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NetRings {
    /// An empty connectivity table sized for `capacity` route boxes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            same_net: UnionFind::new(capacity),
            original_subnet: UnionFind::new(capacity),
            same_subnet: UnionFind::new(capacity),
            different_net: HashMap::new(),
        }
    }

    /// Join `a` and `b` into the same net (persists for the model's life).
    pub fn join_same_net(&mut self, a: RouteBoxId, b: RouteBoxId) {
        self.same_net.union(slot(a), slot(b));
    }

    /// True if `a` and `b` have ever been joined into the same net.
    pub fn same_net(&mut self, a: RouteBoxId, b: RouteBoxId) -> bool {
        self.same_net.same(slot(a), slot(b))
    }

    /// Join `a` and `b` into the same original (data-preparation-time)
    /// subnet grouping.
    pub fn join_original_subnet(&mut self, a: RouteBoxId, b: RouteBoxId) {
        self.original_subnet.union(slot(a), slot(b));
    }

    /// True if `a` and `b` started in the same original subnet.
    pub fn same_original_subnet(&mut self, a: RouteBoxId, b: RouteBoxId) -> bool {
        self.original_subnet.same(slot(a), slot(b))
    }

    /// Join `a` and `b` into the same already-routed subnet this pass.
    pub fn join_same_subnet(&mut self, a: RouteBoxId, b: RouteBoxId) {
        self.same_subnet.union(slot(a), slot(b));
    }

    /// True if `a` and `b` are already connected by routed geometry this
    /// pass.
    pub fn same_subnet(&mut self, a: RouteBoxId, b: RouteBoxId) -> bool {
        self.same_subnet.same(slot(a), slot(b))
    }

    /// Drop all `same_subnet` connectivity, at the start of a new pass.
    /// `original_subnet` groupings are re-seeded so `route_one` starts each
    /// pass knowing which boxes were connected by construction, exactly as
    /// `same_subnet` did before any routing happened this pass.
    pub fn reset_same_subnet(&mut self, capacity: usize, seed_from_original: bool) {
        self.same_subnet = UnionFind::new(capacity);
        if seed_from_original {
            for slot_idx in 0..capacity as u32 {
                let root = self.original_subnet.find(slot_idx);
                if root != slot_idx {
                    self.same_subnet.union(slot_idx, root);
                }
            }
        }
    }

    /// Record `rb` as (one of) the representative box(es) for `net`. A
    /// no-op if `net` already has a representative.
    pub fn register_net_representative(&mut self, net: NetId, rb: RouteBoxId) {
        self.different_net.entry(net).or_insert(rb);
    }

    /// The representative box for `net`, if any has been registered.
    #[must_use]
    pub fn net_representative(&self, net: NetId) -> Option<RouteBoxId> {
        self.different_net.get(&net).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcb_geom::Handle;

    fn id(slot: u32) -> RouteBoxId {
        Handle::new(slot, 1)
    }

    #[test]
    fn union_find_transitively_joins() {
        let mut rings = NetRings::new(8);
        rings.join_same_net(id(0), id(1));
        rings.join_same_net(id(1), id(2));
        assert!(rings.same_net(id(0), id(2)));
        assert!(!rings.same_net(id(0), id(3)));
    }

    #[test]
    fn reset_same_subnet_clears_but_keeps_original() {
        let mut rings = NetRings::new(8);
        rings.join_original_subnet(id(0), id(1));
        rings.join_same_subnet(id(0), id(1));
        rings.join_same_subnet(id(2), id(3));
        assert!(rings.same_subnet(id(2), id(3)));
        rings.reset_same_subnet(8, true);
        assert!(rings.same_subnet(id(0), id(1)), "original grouping should reseed");
        assert!(!rings.same_subnet(id(2), id(3)), "routed-only connectivity should not survive a reset");
    }

    #[test]
    fn different_net_keeps_one_representative() {
        let mut rings = NetRings::new(4);
        rings.register_net_representative(NetId(1), id(0));
        rings.register_net_representative(NetId(1), id(1));
        assert_eq!(rings.net_representative(NetId(1)), Some(id(0)));
    }
}
