// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The route box model, `RouteBox` in `autoroute.c`, §3.4.
//!
//! A `RouteBox` unifies every board object the router cares about (pads,
//! pins, vias, lines, planes, thermal stubs) plus the permanent geometry it
//! emits, into one record type indexed per layer group. Fixed and emitted
//! boxes live in a [`RouteBoxArena`], a generation-tagged slot arena so
//! stale [`RouteBoxId`]s (a box that was removed and rip-up next pass)
//! are detected rather than silently aliasing a reused slot -- the same
//! role `Handle`'s generation counter plays for the polygon engine's
//! contour nodes.

use bitflags::bitflags;
use pcb_geom::{Box, Handle, NetId};

/// What a route box represents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RouteBoxKind {
    /// A surface-mount pad.
    Pad,
    /// A through-hole pin.
    Pin,
    /// A router-placed via.
    Via,
    /// The copy of a via's box dropped onto a layer group it doesn't occupy,
    /// so same-position vias on other layers still see it as an obstacle.
    ViaShadow,
    /// A straight copper segment (a diced sub-segment, for non-orthogonal
    /// lines).
    Line,
    /// Anything else fixed (arcs, text outlines).
    Other,
    /// A transient rectangle grown during [`crate::route_one`]'s search,
    /// not yet (and possibly never) turned into permanent geometry.
    ExpansionArea,
    /// A copper plane or pour.
    Plane,
    /// A thermal-relief stub connecting a pin/via to a plane.
    Thermal,
}

bitflags! {
    /// Per-box state bits, `autoroute.c`'s `RB_flags`. `INITED` has no
    /// counterpart here: there is no way to observe an uninitialized
    /// `RouteBox` through this API, so the bit the original checked with a
    /// debug assert is represented by construction instead.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct RouteBoxFlags: u16 {
        /// Never moved or rip-up (board geometry, not router output).
        const FIXED             = 1 << 0;
        /// Marked as a search source for the current `route_one` call.
        const SOURCE            = 1 << 1;
        /// Marked as a search target for the current `route_one` call.
        const TARGET            = 1 << 2;
        /// Exempt from its own net's keepaway bloat (same-net boxes may
        /// touch).
        const NOBLOAT           = 1 << 3;
        /// Round via rather than a rectangle.
        const CIRCULAR          = 1 << 4;
        /// Not yet inserted into any layer-group tree (a transient
        /// expansion area).
        const HOMELESS          = 1 << 5;
        /// Emitted on an odd-numbered routing pass.
        const IS_ODD             = 1 << 6;
        /// Visited already during the current search.
        const TOUCHED           = 1 << 7;
        /// Subnet membership already folded into `same_subnet` this pass.
        const SUBNET_PROCESSED  = 1 << 8;
        /// A via (rather than a pad/pin/line).
        const IS_VIA            = 1 << 9;
        /// Diagonal line runs bottom-left to upper-right.
        const BL_TO_UR          = 1 << 10;
        /// Clears intruding polygons (has a keepaway against planes too).
        const CLEAR_POLY        = 1 << 11;
        /// Conflicts with another net; rip up next pass.
        const IS_BAD            = 1 << 12;
        /// Connects through a thermal relief rather than flooding directly.
        const IS_THERMAL        = 1 << 13;
    }
}

/// A stable reference to a [`RouteBox`] in a [`RouteBoxArena`].
pub type RouteBoxId = Handle<RouteBox>;

/// One unified board-object-or-routed-geometry record, §3.4.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteBox {
    /// The object's true extent.
    pub inner: Box,
    /// `inner` bloated by the owning style's bloat (or left equal to
    /// `inner` when [`RouteBoxFlags::NOBLOAT`] applies).
    pub outer: Box,
    /// Copper layer group this box occupies.
    pub layer_group: u16,
    /// What kind of object this is.
    pub kind: RouteBoxKind,
    /// Owning net, or `None` for an unclaimed expansion area.
    pub net: Option<NetId>,
    /// The box this one grew from (expansion areas only) or was emitted
    /// from (permanent router output), for back-trace and provenance.
    pub parent: Option<RouteBoxId>,
    /// State bits.
    pub flags: RouteBoxFlags,
}

impl RouteBox {
    /// A fixed board object: pad, pin, via, line, plane, or other.
    #[must_use]
    pub fn fixed(inner: Box, outer: Box, layer_group: u16, kind: RouteBoxKind, net: NetId) -> Self {
        Self {
            inner,
            outer,
            layer_group,
            kind,
            net: Some(net),
            parent: None,
            flags: RouteBoxFlags::FIXED,
        }
    }

    /// Permanent geometry the router itself emitted (a line or via from a
    /// successful `route_one` call): unlike [`RouteBox::fixed`], this does
    /// *not* set [`RouteBoxFlags::FIXED`], so [`RouteBoxArena`] callers that
    /// rip up a net's non-fixed boxes (`model::RouteModel::rip_up_net`) can
    /// remove it again on a later pass.
    #[must_use]
    pub fn routed(inner: Box, outer: Box, layer_group: u16, kind: RouteBoxKind, net: NetId) -> Self {
        Self {
            inner,
            outer,
            layer_group,
            kind,
            net: Some(net),
            parent: None,
            flags: RouteBoxFlags::empty(),
        }
    }

    /// True if this box should not bloat against same-net neighbors
    /// (`NOBLOAT`).
    #[must_use]
    pub const fn is_nobloat(&self) -> bool {
        self.flags.contains(RouteBoxFlags::NOBLOAT)
    }

    /// The box blockers see: `outer` unless `NOBLOAT` is set, in which case
    /// callers compare against `inner` instead.
    #[must_use]
    pub fn blocking_box(&self) -> Box {
        if self.is_nobloat() {
            self.inner
        } else {
            self.outer
        }
    }
}

const DEFAULT_GENERATION: u32 = 1;

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A generation-tagged slot arena of [`RouteBox`]es: fixed board geometry
/// plus every permanent segment/via the router has emitted so far. Expansion
/// areas live in a separate, call-scoped arena (see
/// [`crate::expand::ExpansionId`]) rather than here.
#[derive(Default)]
pub struct RouteBoxArena {
    slots: Vec<Slot<RouteBox>>,
    free: Vec<u32>,
}

impl RouteBoxArena {
    /// An empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// True if the arena holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a box, returning a handle to it.
    pub fn insert(&mut self, rb: RouteBox) -> RouteBoxId {
        if let Some(slot_idx) = self.free.pop() {
            let slot = &mut self.slots[slot_idx as usize];
            slot.generation += 1;
            slot.value = Some(rb);
            RouteBoxId::new(slot_idx, slot.generation)
        } else {
            let slot_idx = self.slots.len() as u32;
            self.slots.push(Slot { generation: DEFAULT_GENERATION, value: Some(rb) });
            RouteBoxId::new(slot_idx, DEFAULT_GENERATION)
        }
    }

    /// Remove a box, returning its value if `id` was still live.
    pub fn remove(&mut self, id: RouteBoxId) -> Option<RouteBox> {
        let slot = self.slots.get_mut(id.slot())?;
        if slot.generation != id.generation() {
            return None;
        }
        let value = slot.value.take();
        if value.is_some() {
            self.free.push(id.slot() as u32);
        }
        value
    }

    /// Borrow a box, or `None` if `id` is stale or was removed.
    #[must_use]
    pub fn get(&self, id: RouteBoxId) -> Option<&RouteBox> {
        let slot = self.slots.get(id.slot())?;
        (slot.generation == id.generation()).then_some(slot.value.as_ref()).flatten()
    }

    /// Mutably borrow a box, or `None` if `id` is stale or was removed.
    pub fn get_mut(&mut self, id: RouteBoxId) -> Option<&mut RouteBox> {
        let slot = self.slots.get_mut(id.slot())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.value.as_mut()
    }

    /// Iterate over every live `(id, box)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (RouteBoxId, &RouteBox)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.value.as_ref().map(|rb| (RouteBoxId::new(i as u32, slot.generation), rb))
        })
    }

    /// An upper bound on live slot indices, for sizing a union-find forest.
    #[must_use]
    pub fn slot_capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcb_geom::Point;

    fn sample(net: u32) -> RouteBox {
        RouteBox::fixed(
            Box::from_point(Point::new(0, 0)),
            Box::new(-10, -10, 10, 10),
            0,
            RouteBoxKind::Pad,
            NetId(net),
        )
    }

    #[test]
    fn insert_then_get_round_trips() {
        let mut arena = RouteBoxArena::new();
        let id = arena.insert(sample(1));
        assert_eq!(arena.get(id).unwrap().net, Some(NetId(1)));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn stale_handle_after_reuse_is_rejected() {
        let mut arena = RouteBoxArena::new();
        let a = arena.insert(sample(1));
        arena.remove(a);
        let b = arena.insert(sample(2));
        assert_eq!(a.slot(), b.slot());
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(b).unwrap().net, Some(NetId(2)));
    }

    #[test]
    fn blocking_box_respects_nobloat() {
        let mut rb = sample(1);
        rb.inner = Box::new(0, 0, 10, 10);
        rb.outer = Box::new(-5, -5, 15, 15);
        assert_eq!(rb.blocking_box(), rb.outer);
        rb.flags |= RouteBoxFlags::NOBLOAT;
        assert_eq!(rb.blocking_box(), rb.inner);
    }
}
