// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Board element records, §3.2. These are plain data; the spatial indexing,
//! clearance, and routing crates build their own derived records (route
//! boxes, MTS obstacles, clipped regions) on top of them rather than
//! extending them in place.

use crate::bbox::{Box, Point};
use crate::Coord;
use std::vec::Vec;

/// Identifies an electrical net. Opaque outside this workspace; callers
/// assign these however their board model likes (index into a net table,
/// hash of a net name, etc).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(pub u32);

/// Which physical side of the board a surface-mount element sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The top (component) side.
    Top,
    /// The bottom (solder) side.
    Bottom,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Pin copper shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PinShape {
    /// Circular copper annulus.
    Round,
    /// Square copper pad.
    Square,
    /// Octagonal copper pad.
    Octagon,
}

/// A through-hole pin, present on all copper layers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pin {
    /// Board-space center.
    pub center: Point,
    /// Copper annulus outer diameter.
    pub copper_dia: Coord,
    /// Drill diameter.
    pub drill_dia: Coord,
    /// Minimum spacing to objects of a different net.
    pub keepaway: Coord,
    /// Copper shape.
    pub shape: PinShape,
    /// Owning net.
    pub net: NetId,
    /// Whether this pin should receive a thermal relief when embedded in a
    /// connected plane, rather than being directly flooded.
    pub thermal: bool,
}

impl Pin {
    /// The pin's bounding box (unbloated).
    #[must_use]
    pub fn bbox(self) -> Box {
        let r = self.copper_dia / 2;
        Box::new_unchecked(
            self.center.x - r,
            self.center.y - r,
            self.center.x + r,
            self.center.y + r,
        )
    }
}

/// A surface-mount pad: a capsule (thick line segment) on one side of the
/// board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pad {
    /// First capsule endpoint.
    pub p1: Point,
    /// Second capsule endpoint.
    pub p2: Point,
    /// Capsule thickness.
    pub thickness: Coord,
    /// If true, the pad's ends are square rather than rounded.
    pub square_ends: bool,
    /// Physical side.
    pub side: Side,
    /// Owning net.
    pub net: NetId,
    /// Minimum spacing to objects of a different net.
    pub keepaway: Coord,
}

impl Pad {
    /// The pad's bounding box (unbloated).
    #[must_use]
    pub fn bbox(self) -> Box {
        let r = self.thickness / 2;
        Box::new_unchecked(
            self.p1.x.min(self.p2.x) - r,
            self.p1.y.min(self.p2.y) - r,
            self.p1.x.max(self.p2.x) + r,
            self.p1.y.max(self.p2.y) + r,
        )
    }
}

/// A router-placed via: pin-shaped, always round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Via {
    /// Board-space center.
    pub center: Point,
    /// Copper annulus outer diameter.
    pub copper_dia: Coord,
    /// Drill diameter.
    pub drill_dia: Coord,
    /// Minimum spacing to objects of a different net.
    pub keepaway: Coord,
    /// Owning net.
    pub net: NetId,
}

impl Via {
    /// The via's bounding box (unbloated).
    #[must_use]
    pub fn bbox(self) -> Box {
        let r = self.copper_dia / 2;
        Box::new_unchecked(
            self.center.x - r,
            self.center.y - r,
            self.center.x + r,
            self.center.y + r,
        )
    }
}

/// A straight copper segment on one layer group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LineSeg {
    /// First endpoint.
    pub p1: Point,
    /// Second endpoint.
    pub p2: Point,
    /// Line thickness.
    pub thickness: Coord,
    /// Owning net.
    pub net: NetId,
    /// Layer group this segment lives on.
    pub layer_group: u16,
}

impl LineSeg {
    /// The line's bounding box (unbloated).
    #[must_use]
    pub fn bbox(self) -> Box {
        let r = self.thickness / 2;
        Box::new_unchecked(
            self.p1.x.min(self.p2.x) - r,
            self.p1.y.min(self.p2.y) - r,
            self.p1.x.max(self.p2.x) + r,
            self.p1.y.max(self.p2.y) + r,
        )
    }

    /// True if the segment is axis-aligned (horizontal or vertical).
    #[must_use]
    pub const fn is_orthogonal(self) -> bool {
        self.p1.x == self.p2.x || self.p1.y == self.p2.y
    }

    /// True if the segment runs bottom-left to upper-right (used to set the
    /// router's `bl_to_ur` diagonal-orientation flag for 45 degree lines).
    #[must_use]
    pub const fn is_bl_to_ur(self) -> bool {
        (self.p2.x > self.p1.x) == (self.p2.y > self.p1.y)
    }
}

/// A circular arc segment on one layer group.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Arc {
    /// Center point.
    pub center: Point,
    /// X radius.
    pub radius_x: Coord,
    /// Y radius.
    pub radius_y: Coord,
    /// Start angle, degrees.
    pub start_angle_deg: f64,
    /// Sweep, degrees (signed; negative sweeps clockwise).
    pub sweep_deg: f64,
    /// Arc thickness.
    pub thickness: Coord,
    /// Owning net.
    pub net: NetId,
    /// Layer group this arc lives on.
    pub layer_group: u16,
}

impl Arc {
    /// A conservative bounding box: the full circumscribing ellipse's box,
    /// bloated by half the arc thickness. Cheap and always a superset of the
    /// true swept bounds, which is all the spatial index needs.
    #[must_use]
    pub fn bbox(&self) -> Box {
        let r = self.thickness / 2;
        Box::new_unchecked(
            self.center.x - self.radius_x - r,
            self.center.y - self.radius_y - r,
            self.center.x + self.radius_x + r,
            self.center.y + self.radius_y + r,
        )
    }
}

/// A user-drawn copper plane or pour, possibly with holes. The polygon's
/// *clipped* region (original minus intruding-object clearances) is not
/// stored here: it is expensive to keep current and owned instead by
/// `pcb_clearance`'s clip cache, keyed by a handle into a board's polygon
/// table. This avoids the C original's coupling of "is this the first
/// clip" with the region's own representation.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonPlane {
    /// Outer contour, CCW winding, closed (first point not repeated at the
    /// end).
    pub outer: Vec<Point>,
    /// Hole contours, CW winding.
    pub holes: Vec<Vec<Point>>,
    /// Layer group this polygon lives on.
    pub layer_group: u16,
    /// Owning net, for planes electrically tied to one net.
    pub net: NetId,
    /// True if this polygon should be treated as an infinite-area copper
    /// plane (thermal stubs at connected pins) rather than ordinary copper.
    pub is_plane: bool,
}

impl PolygonPlane {
    /// The outer contour's bounding box.
    #[must_use]
    pub fn bbox(&self) -> Box {
        let mut iter = self.outer.iter();
        let Some(first) = iter.next() else {
            return Box::default();
        };
        let mut b = Box::from_point(*first);
        for p in iter {
            b = b.union(Box::from_point(*p));
        }
        b
    }
}
