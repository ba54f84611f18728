// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The placer's own view of a board component: a rigid group of pads/pins
//! that the annealer moves, rotates, or flips as one unit. This is
//! deliberately a separate, smaller type than `pcb_geom`'s board elements —
//! `autoplace.c`'s `ElementType` carries a whole footprint's silkscreen and
//! text along with its pins/pads, none of which the cost function or
//! perturbation generator ever reads.

use pcb_geom::{Box, Coord, NetId, Point, Side};
use std::vec::Vec;

/// Stable index of a [`Component`] within a [`super::PlacementSet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u32);

/// 0/90/180/270 degree rotation, matching `RotateElementLowLevel`'s `b`
/// parameter (1-3; 0 is reserved for "flip" in the original, modeled here as
/// the separate [`Component::side`] field instead of overloading rotation).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    /// No rotation.
    #[default]
    Deg0,
    /// 90 degrees clockwise.
    Deg90,
    /// 180 degrees.
    Deg180,
    /// 270 degrees clockwise.
    Deg270,
}

impl Rotation {
    /// The rotation obtained by turning `steps` quarter-turns clockwise from
    /// this one (`steps` taken mod 4), matching the `(4 - b) & 3` undo
    /// arithmetic in `doPerturb`.
    #[must_use]
    pub const fn add_steps(self, steps: u8) -> Self {
        let start = match self {
            Self::Deg0 => 0,
            Self::Deg90 => 1,
            Self::Deg180 => 2,
            Self::Deg270 => 3,
        };
        match (start + steps) & 3 {
            0 => Self::Deg0,
            1 => Self::Deg90,
            2 => Self::Deg180,
            _ => Self::Deg270,
        }
    }

    /// The quarter-turn count (0-3) that separates `self` from `Deg0`.
    #[must_use]
    pub const fn steps(self) -> u8 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 1,
            Self::Deg180 => 2,
            Self::Deg270 => 3,
        }
    }
}

/// One pad or pin belonging to a component, in the component's own local
/// frame (origin at the component's placement anchor, unrotated, as drawn on
/// the top side).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalPad {
    /// Offset from the component anchor, before rotation/flip/translation.
    pub offset: Point,
    /// Net this pad/pin belongs to.
    pub net: NetId,
    /// True if this is a surface-mount pad (affects flip eligibility and the
    /// "all-SMD, both sides" via-cost rule in `W`).
    pub is_smd: bool,
}

/// A placeable rigid group of pads/pins.
#[derive(Clone, Debug)]
pub struct Component {
    /// Identity, stable across perturbations within one annealing run.
    pub id: ComponentId,
    /// Name used for the alignment bonus's "matching name prefix" test
    /// (`autoplace.c` compares `element->Name`; this workspace stores just
    /// the prefix the caller cares to compare, e.g. "R" for resistors).
    pub name_prefix: std::string::String,
    /// Placement anchor (arbitrary but fixed point in the local frame that
    /// `position` tracks).
    pub position: Point,
    /// Current rotation.
    pub rotation: Rotation,
    /// Current side.
    pub side: Side,
    /// Local-frame outline used to derive `vbox` (typically the footprint's
    /// silkscreen/courtyard box).
    pub local_outline: Box,
    /// Local-frame pads/pins.
    pub pads: Vec<LocalPad>,
    /// Fixed components never move (they still occupy space and participate
    /// in neighbor/overlap tests, matching `autoplace.c`'s treatment of
    /// unselected elements).
    pub fixed: bool,
}

impl Component {
    /// True if every pad is SMD (an all-SMD component is eligible for the
    /// flip perturbation and for the `via_cost` term in `W`).
    #[must_use]
    pub fn is_all_smd(&self) -> bool {
        !self.pads.is_empty() && self.pads.iter().all(|p| p.is_smd)
    }

    /// Rotate a local offset by the component's current rotation, then
    /// mirror across X for the bottom side (matching `MirrorElementCoordinates`
    /// flipping X while leaving Y alone, the source's solder-side convention).
    fn place_offset(&self, offset: Point) -> Point {
        let (mut x, mut y) = (offset.x, offset.y);
        for _ in 0..self.rotation.steps() {
            let (nx, ny) = (-y, x);
            x = nx;
            y = ny;
        }
        if self.side == Side::Bottom {
            x = -x;
        }
        Point::new(x, y)
    }

    /// World-space position of one local pad.
    #[must_use]
    pub fn pad_world(&self, pad: &LocalPad) -> Point {
        let rel = self.place_offset(pad.offset);
        Point::new(self.position.x + rel.x, self.position.y + rel.y)
    }

    /// World-space "visual" bounding box (`VBox` in the source): the rotated
    /// and translated local outline.
    #[must_use]
    pub fn vbox(&self) -> Box {
        let corners = [
            Point::new(self.local_outline.x1, self.local_outline.y1),
            Point::new(self.local_outline.x2, self.local_outline.y1),
            Point::new(self.local_outline.x2, self.local_outline.y2),
            Point::new(self.local_outline.x1, self.local_outline.y2),
        ];
        let mut iter = corners.into_iter().map(|c| {
            let rel = self.place_offset(c);
            Point::new(self.position.x + rel.x, self.position.y + rel.y)
        });
        let first = iter.next().expect("four corners");
        let mut b = Box::from_point(first);
        for p in iter {
            b = b.union(Box::from_point(p));
        }
        b
    }
}
