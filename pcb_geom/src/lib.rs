// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PCB Geom: integer board-space geometric primitives.
//!
//! Board coordinates are 32-bit signed integers in a unit of roughly
//! 1/100 000 of an inch, matching the resolution the rest of the workspace
//! assumes. This crate defines the vocabulary every other crate in the
//! workspace builds on:
//!
//! - [`Box`]: the half-open axis-aligned rectangle used everywhere a
//!   bounding box is needed (R-tree entries, route box outer/inner boxes,
//!   MTS obstacles).
//! - [`Point`]: a single board-space coordinate pair.
//! - [`Direction`]: the eight compass directions plus [`Direction::All`],
//!   used by the router's expansion engine and the placer's neighbor search.
//! - [`RouteStyle`]: the per-net `{ thick, via_diameter, via_hole, keepaway }`
//!   tuple and its derived `bloat`.
//! - [`Handle`]: a small generational handle (slot + generation), the same
//!   shape as a scene-graph node id, reused here for route boxes and
//!   polygon-engine contour nodes so neither needs raw pointers or
//!   reference counting.
//!
//! Floating-point conversions to/from [`kurbo`] are provided for the handful
//! of places that need real trigonometry or affine transforms (45°
//! expansion unit vectors, CVC angle ordering proxies); the authoritative
//! coordinates everywhere else stay integers.

mod bbox;
mod direction;
mod elements;
mod handle;
mod style;

pub use bbox::{Box, Point};
pub use direction::Direction;
pub use elements::{Arc, LineSeg, NetId, Pad, Pin, PinShape, PolygonPlane, Side, Via};
pub use handle::Handle;
pub use style::RouteStyle;

/// Board-space coordinate: a 32-bit signed integer, ~1/100 000 inch.
pub type Coord = i32;

/// Convert mils (1/1000 inch) to board coordinate units.
#[must_use]
pub const fn mil_to_coord(mils: i64) -> Coord {
    (mils * 100) as Coord
}

/// Convert board coordinate units to mils (1/1000 inch), truncating.
#[must_use]
pub const fn coord_to_mil(coord: Coord) -> i64 {
    coord as i64 / 100
}
