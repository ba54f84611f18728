// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contour-level geometry: signed area, the even-odd point-in-region test,
//! and bounding boxes. Ported from the `PLINE`/`VNODE` vertex-ring
//! primitives in `polygon1.c`, minus the linked-list plumbing -- a contour
//! here is just its vertex ring, `Vec<Point>`, implicitly closed from the
//! last point back to the first.

use pcb_geom::{Box, Point};

/// A single closed ring of vertices. The edge from the last point back to
/// the first is implicit; no point is repeated.
pub type Contour = std::vec::Vec<Point>;

/// Twice the signed area of `contour` (shoelace formula). Positive for a
/// counter-clockwise ring, negative for clockwise -- used directly to tell
/// an outer boundary from a hole without a separate orientation flag, the
/// same convention `polygon1.c`'s `node_label` relies on via `GetRect`'s
/// ordering of its `PLINE`s.
#[must_use]
pub fn signed_area2(contour: &[Point]) -> i64 {
    let n = contour.len();
    if n < 3 {
        return 0;
    }
    let mut sum: i64 = 0;
    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + 1) % n];
        sum += i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y);
    }
    sum
}

/// True if `contour` winds counter-clockwise.
#[must_use]
pub fn is_ccw(contour: &[Point]) -> bool {
    signed_area2(contour) > 0
}

/// Axis-aligned bounding box of a contour's vertices.
#[must_use]
pub fn contour_bbox(contour: &[Point]) -> Box {
    let mut iter = contour.iter();
    let first = iter.next().copied().unwrap_or_default();
    let mut bbox = Box::new_unchecked(first.x, first.y, first.x, first.y);
    for p in iter {
        bbox = bbox.union(Box::new_unchecked(p.x, p.y, p.x, p.y));
    }
    bbox
}

/// Even-odd ("crossing number") point-in-region test against every edge of
/// every contour in `contours` at once. Because the even-odd rule doesn't
/// care about winding direction, this single pass already accounts for
/// holes (a hole's ring just flips parity inside it) without needing to
/// separate outer rings from holes first.
#[must_use]
pub fn point_in_contours(point: Point, contours: &[Contour]) -> bool {
    let mut inside = false;
    for contour in contours {
        let n = contour.len();
        for i in 0..n {
            let a = contour[i];
            let b = contour[(i + 1) % n];
            if (a.y > point.y) != (b.y > point.y) {
                let x_at_y = f64::from(a.x)
                    + f64::from(point.y - a.y) * f64::from(b.x - a.x) / f64::from(b.y - a.y);
                if f64::from(point.x) < x_at_y {
                    inside = !inside;
                }
            }
        }
    }
    inside
}

/// Integer midpoint of a directed edge, biased toward truncation like
/// [`Box::center`](pcb_geom::Box::center) -- good enough to land an
/// inside/outside probe a safe distance from either endpoint.
#[must_use]
pub fn edge_midpoint(a: Point, b: Point) -> Point {
    Point::new(a.x + (b.x - a.x) / 2, a.y + (b.y - a.y) / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x1: i32, y1: i32, x2: i32, y2: i32) -> Contour {
        std::vec::Vec::from([
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ])
    }

    #[test]
    fn ccw_square_has_positive_area() {
        let c = square(0, 0, 10, 10);
        assert!(signed_area2(&c) > 0);
        assert!(is_ccw(&c));
    }

    #[test]
    fn reversed_square_has_negative_area() {
        let mut c = square(0, 0, 10, 10);
        c.reverse();
        assert!(signed_area2(&c) < 0);
        assert!(!is_ccw(&c));
    }

    #[test]
    fn point_in_contours_accounts_for_hole() {
        let outer = square(0, 0, 20, 20);
        let hole = square(5, 5, 15, 15);
        let contours = std::vec::Vec::from([outer, hole]);
        assert!(point_in_contours(Point::new(1, 1), &contours));
        assert!(!point_in_contours(Point::new(10, 10), &contours));
        assert!(!point_in_contours(Point::new(100, 100), &contours));
    }
}
