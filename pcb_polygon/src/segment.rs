// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exact segment-segment intersection with snap-rounding to the integer
//! board grid. Ported from the cross-product line-intersection arithmetic
//! `polygon1.c`'s CVC machinery builds on, minus the CVC descriptors
//! themselves -- the topological "which side" decision here comes from
//! [`crate::geometry::point_in_contours`] rather than from a sorted
//! descriptor ring at each vertex.

use pcb_geom::Point;

/// Squared distance between two points, as `i64` to avoid overflow.
#[must_use]
pub fn dist2(a: Point, b: Point) -> i64 {
    let dx = i64::from(a.x) - i64::from(b.x);
    let dy = i64::from(a.y) - i64::from(b.y);
    dx * dx + dy * dy
}

/// Intersection point of closed segments `p1`-`p2` and `p3`-`p4`, or `None`
/// if they don't meet at a single point.
///
/// The topological test (is the crossing parameter within `[0, 1]` on both
/// segments) is done with exact `i64` cross products, so it can't be fooled
/// by floating-point error; only the final reported point is rounded to the
/// nearest grid coordinate. Parallel segments (including collinear
/// overlapping ones) report no intersection here -- collinear overlap is
/// handled separately by [`collinear_overlap`], since it has no single
/// crossing point to report.
#[must_use]
pub fn segment_intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let d1x = i64::from(p2.x - p1.x);
    let d1y = i64::from(p2.y - p1.y);
    let d2x = i64::from(p4.x - p3.x);
    let d2y = i64::from(p4.y - p3.y);

    let denom = d1x * d2y - d1y * d2x;
    if denom == 0 {
        return None;
    }

    let ex = i64::from(p3.x - p1.x);
    let ey = i64::from(p3.y - p1.y);
    let t_num = ex * d2y - ey * d2x;
    let u_num = ex * d1y - ey * d1x;

    let in_unit_range = |num: i64, den: i64| {
        if den > 0 {
            num >= 0 && num <= den
        } else {
            num <= 0 && num >= den
        }
    };
    if !in_unit_range(t_num, denom) || !in_unit_range(u_num, denom) {
        return None;
    }

    let t = t_num as f64 / denom as f64;
    let x = f64::from(p1.x) + t * d1x as f64;
    let y = f64::from(p1.y) + t * d1y as f64;
    Some(Point::new(x.round() as i32, y.round() as i32))
}

/// If segments `p1`-`p2` and `p3`-`p4` are collinear and overlap over a
/// nonzero length, return the two endpoints of the shared sub-segment
/// (ordered along the line, nearer endpoint first). Otherwise `None`.
///
/// This is the piece `segment_intersection` deliberately leaves out: two
/// collinear overlapping edges have a shared *range*, not a single crossing
/// point. Splicing these two endpoints into both operands' contours (the
/// same way an ordinary crossing point is spliced in) gives the coincident
/// sub-segment matching vertices on both sides, so the Boolean engine's
/// exact-coincidence check (`boolean::label_edge`'s SHARED/SHARED2 case)
/// can find it instead of relying on a boundary-ambiguous inside/outside
/// probe.
#[must_use]
pub fn collinear_overlap(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<(Point, Point)> {
    let d1x = i64::from(p2.x - p1.x);
    let d1y = i64::from(p2.y - p1.y);
    let d2x = i64::from(p4.x - p3.x);
    let d2y = i64::from(p4.y - p3.y);

    // Parallel?
    if d1x * d2y - d1y * d2x != 0 {
        return None;
    }
    // On the same infinite line?
    let ex = i64::from(p3.x - p1.x);
    let ey = i64::from(p3.y - p1.y);
    if ex * d1y - ey * d1x != 0 {
        return None;
    }

    // Parametrize both segments along whichever axis segment 1 varies more
    // in, so a horizontal or vertical edge (the common case on a board) is
    // handled exactly in integers; the other axis is recovered by
    // interpolation when reporting the endpoints.
    let horizontal = d1x.unsigned_abs() as i64 >= d1y.unsigned_abs() as i64;
    let (a0, a1, b0, b1) = if horizontal {
        (p1.x, p2.x, p3.x, p4.x)
    } else {
        (p1.y, p2.y, p3.y, p4.y)
    };
    let lo = a0.min(a1).max(b0.min(b1));
    let hi = a0.max(a1).min(b0.max(b1));
    if lo >= hi {
        return None;
    }

    let point_at = |v: i32| -> Point {
        if horizontal {
            if d1x == 0 {
                Point::new(v, p1.y)
            } else {
                let t = f64::from(v - p1.x) / f64::from(d1x);
                Point::new(v, (f64::from(p1.y) + t * d1y as f64).round() as i32)
            }
        } else if d1y == 0 {
            Point::new(p1.x, v)
        } else {
            let t = f64::from(v - p1.y) / f64::from(d1y);
            Point::new((f64::from(p1.x) + t * d1x as f64).round() as i32, v)
        }
    };
    Some((point_at(lo), point_at(hi)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments_intersect_at_center() {
        let p = segment_intersection(
            Point::new(0, 0),
            Point::new(10, 10),
            Point::new(0, 10),
            Point::new(10, 0),
        );
        assert_eq!(p, Some(Point::new(5, 5)));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let p = segment_intersection(
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(0, 5),
            Point::new(10, 5),
        );
        assert_eq!(p, None);
    }

    #[test]
    fn disjoint_segments_do_not_intersect() {
        let p = segment_intersection(
            Point::new(0, 0),
            Point::new(1, 1),
            Point::new(10, 0),
            Point::new(10, 10),
        );
        assert_eq!(p, None);
    }

    #[test]
    fn touching_at_endpoint_reports_the_shared_point() {
        let p = segment_intersection(
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 0),
            Point::new(10, 10),
        );
        assert_eq!(p, Some(Point::new(10, 0)));
    }

    #[test]
    fn identical_horizontal_edges_overlap_fully() {
        let overlap = collinear_overlap(
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(0, 0),
            Point::new(10, 0),
        );
        assert_eq!(overlap, Some((Point::new(0, 0), Point::new(10, 0))));
    }

    #[test]
    fn partially_overlapping_vertical_edges_report_the_shared_range() {
        let overlap = collinear_overlap(
            Point::new(5, 0),
            Point::new(5, 10),
            Point::new(5, 5),
            Point::new(5, 15),
        );
        assert_eq!(overlap, Some((Point::new(5, 5), Point::new(5, 10))));
    }

    #[test]
    fn collinear_but_disjoint_edges_do_not_overlap() {
        let overlap = collinear_overlap(
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(20, 0),
            Point::new(30, 0),
        );
        assert_eq!(overlap, None);
    }

    #[test]
    fn parallel_but_offset_edges_do_not_overlap() {
        let overlap = collinear_overlap(
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(0, 5),
            Point::new(10, 5),
        );
        assert_eq!(overlap, None);
    }

    #[test]
    fn crossing_edges_are_not_collinear_overlap() {
        let overlap = collinear_overlap(
            Point::new(0, 0),
            Point::new(10, 10),
            Point::new(0, 10),
            Point::new(10, 0),
        );
        assert_eq!(overlap, None);
    }
}
