// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Route styles: `{ thick, via_diameter, via_hole, keepaway }`, §3.3.

use crate::Coord;

/// A named tuple attached to each net describing trace thickness, via
/// geometry, and clearance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RouteStyle {
    /// Trace (line) thickness.
    pub thick: Coord,
    /// Via copper diameter.
    pub via_diameter: Coord,
    /// Via drill diameter.
    pub via_hole: Coord,
    /// Minimum spacing to objects of a different net.
    pub keepaway: Coord,
}

impl RouteStyle {
    /// The router's per-net bloat: `keepaway + ceil(thick / 2)`.
    #[must_use]
    pub const fn bloat(self) -> Coord {
        self.keepaway + self.thick.div_ceil(2)
    }

    /// Half the via diameter plus keepaway: the radius MTS must find free
    /// space within to place a via of this style.
    #[must_use]
    pub const fn via_radius_with_keepaway(self) -> Coord {
        self.via_diameter / 2 + self.keepaway
    }
}

impl Default for RouteStyle {
    /// A reasonable default matching the scenario used throughout `spec.md`
    /// §8.4: 10 mil trace, 20 mil via with 8 mil hole, 5 mil keepaway.
    fn default() -> Self {
        Self {
            thick: crate::mil_to_coord(10),
            via_diameter: crate::mil_to_coord(20),
            via_hole: crate::mil_to_coord(8),
            keepaway: crate::mil_to_coord(5),
        }
    }
}
