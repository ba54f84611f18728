// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The no-holes dicer: split a [`PolyArea`] with holes into a set of
//! simple, hole-free outer contours, for consumers (board export, the
//! autorouter's obstacle rasterization) that can't represent a hole
//! directly.
//!
//! Ported from `NoHolesPolygonDicer`/`r_NoHolesPolygonDicer` in
//! `polygon.c`. The technique is smaller than it looks: build a vertical
//! splitting rectangle spanning the outer ring's full height, from the
//! outer's left edge to the horizontal midpoint of the *first* hole's
//! bounding box, then run it through [`and_subtract_ref`] and recurse into
//! both halves. Because the splitter always passes straight through the
//! middle of that hole, the hole's ring gets opened into the cut boundary
//! on one side or the other rather than surviving as a separate ring --
//! every recursive step strictly reduces the total hole count across its
//! two children, so the recursion terminates.

use crate::boolean::{and_subtract_ref, PolyArea};
use crate::geometry::contour_bbox;

/// Depth guard against runaway recursion if a malformed or self-touching
/// input defeats the hole-count argument above. Never hit by
/// non-pathological input; not present in the original, which trusts its
/// exact CVC-based Boolean engine completely. This implementation's
/// Boolean engine is a simplification (see `boolean` module docs), so a
/// bail-out here is an honest addition rather than a silent behavior match.
const MAX_DICE_DEPTH: u32 = 4096;

/// Split `region` into hole-free outer contours.
#[must_use]
pub fn dice(region: &PolyArea) -> std::vec::Vec<crate::geometry::Contour> {
    let mut out = std::vec::Vec::new();
    dice_one(region.clone(), 0, &mut out);
    out
}

/// Dice every region in `regions`, concatenating the results.
#[must_use]
pub fn dice_all(regions: &[PolyArea]) -> std::vec::Vec<crate::geometry::Contour> {
    let mut out = std::vec::Vec::new();
    for region in regions {
        out.extend(dice(region));
    }
    out
}

fn dice_one(area: PolyArea, depth: u32, out: &mut std::vec::Vec<crate::geometry::Contour>) {
    if area.holes.is_empty() {
        out.push(area.outer);
        return;
    }
    if depth >= MAX_DICE_DEPTH {
        log::warn!(
            "no_holes_dicer: giving up after {MAX_DICE_DEPTH} splits, dropping {} remaining hole(s)",
            area.holes.len()
        );
        out.push(area.outer);
        return;
    }

    let hole_bbox = contour_bbox(&area.holes[0]);
    let outer_bbox = contour_bbox(&area.outer);
    let mid_x = hole_bbox.x1 + (hole_bbox.x2 - hole_bbox.x1) / 2;

    let splitter = rect_contour(outer_bbox.x1, outer_bbox.y1, mid_x, outer_bbox.y2);
    let whole = std::vec::Vec::from([area]);
    let splitter_region = std::vec::Vec::from([PolyArea::simple(splitter)]);

    let split = and_subtract_ref(&whole, &splitter_region);
    for piece in split.outside {
        dice_one(piece, depth + 1, out);
    }
    for piece in split.inside {
        dice_one(piece, depth + 1, out);
    }
}

fn rect_contour(x1: i32, y1: i32, x2: i32, y2: i32) -> crate::geometry::Contour {
    std::vec::Vec::from([
        pcb_geom::Point::new(x1, y1),
        pcb_geom::Point::new(x2, y1),
        pcb_geom::Point::new(x2, y2),
        pcb_geom::Point::new(x1, y2),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::signed_area2;
    use pcb_geom::Point;

    fn square(x1: i32, y1: i32, x2: i32, y2: i32) -> crate::geometry::Contour {
        std::vec::Vec::from([
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ])
    }

    #[test]
    fn hole_free_region_passes_through_unchanged() {
        let region = PolyArea::simple(square(0, 0, 10, 10));
        let pieces = dice(&region);
        assert_eq!(pieces.len(), 1);
    }

    #[test]
    fn region_with_one_hole_dices_into_hole_free_pieces() {
        let mut hole = square(3, 3, 7, 7);
        hole.reverse();
        let region = PolyArea {
            outer: square(0, 0, 10, 10),
            holes: std::vec::Vec::from([hole]),
        };
        let pieces = dice(&region);
        assert!(pieces.len() >= 2);
        let total_area: i64 = pieces.iter().map(|c| signed_area2(c).abs() / 2).sum();
        assert_eq!(total_area, 100 - 16);
    }
}
