// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The eight compass directions plus "all", ported from `direction_t` in
//! `box.h`. Used by the router's expansion engine (which grows a rectangle
//! outward in one of these directions) and by the placer's neighbor search
//! (which looks for the nearest component in a 45 degree trapezoid on each
//! side).

/// A cardinal, ordinal, or omnidirectional expansion direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// +Y.
    North,
    /// +X.
    East,
    /// -Y.
    South,
    /// -X.
    West,
    /// Northeast corner.
    Ne,
    /// Southeast corner.
    Se,
    /// Southwest corner.
    Sw,
    /// Northwest corner.
    Nw,
    /// Every direction at once (used by via-candidate edges, which may
    /// continue on any side once they land).
    All,
}

impl Direction {
    /// The four cardinal directions, in a fixed deterministic order.
    pub const CARDINALS: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The four corner directions, in a fixed deterministic order.
    pub const CORNERS: [Self; 4] = [Self::Ne, Self::Se, Self::Sw, Self::Nw];

    /// True if this is one of the four cardinal (non-corner, non-`All`)
    /// directions.
    #[must_use]
    pub const fn is_cardinal(self) -> bool {
        matches!(self, Self::North | Self::East | Self::South | Self::West)
    }

    /// True if this is one of the four corner directions.
    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }

    /// The two cardinal directions that compose a corner direction, in
    /// `(horizontal, vertical)` order. Panics for `North`/`East`/`South`/
    /// `West`/`All`, which have no decomposition.
    #[must_use]
    pub const fn corner_components(self) -> (Self, Self) {
        match self {
            Self::Ne => (Self::East, Self::North),
            Self::Se => (Self::East, Self::South),
            Self::Sw => (Self::West, Self::South),
            Self::Nw => (Self::West, Self::North),
            _ => panic!("corner_components called on a non-corner direction"),
        }
    }

    /// A unit offset `(dx, dy)` for cardinal directions, usable to probe one
    /// coordinate step outward. `All` and corners return `(0, 0)`; callers
    /// that need corner offsets should use [`Direction::corner_components`].
    #[must_use]
    pub const fn unit_offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
            _ => (0, 0),
        }
    }

    /// The opposite direction. Corners reflect through the center; `All`
    /// maps to itself.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::Ne => Self::Sw,
            Self::Se => Self::Nw,
            Self::Sw => Self::Ne,
            Self::Nw => Self::Se,
            Self::All => Self::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for d in Direction::CARDINALS.into_iter().chain(Direction::CORNERS) {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn corner_components_match_name() {
        assert_eq!(
            Direction::Ne.corner_components(),
            (Direction::East, Direction::North)
        );
        assert_eq!(
            Direction::Sw.corner_components(),
            (Direction::West, Direction::South)
        );
    }
}
