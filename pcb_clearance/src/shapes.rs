// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Buffered-shape contour builders, ported from `polygon.c`'s
//! `PinPoly`/`LinePoly`/`ArcPoly`/`SquarePadPoly`/`OctagonPoly`/
//! `CirclePoly`/`BoxPolyBloated`/`RoundRect` family. Each object's clearance
//! shape is its copper outline grown by half the requested extra clearance
//! on every side, matching the original's `(thick + clear + 1) / 2` integer
//! rounding.

use pcb_geom::{Arc, Box, Coord, LineSeg, Pad, Pin, PinShape, Point, Via};
use pcb_polygon::PolyArea;

/// Segment count for a full circle. The original (`frac_circle`,
/// `POLY_CIRC_SEGS`) also approximates circles with a fixed segment count
/// baked into `polygon.h`; that constant isn't present in the kept source
/// files, so this is a reasonable stand-in rather than a literal port.
const CIRCLE_SEGMENTS: usize = 36;

fn circle_contour(center: Point, radius: Coord) -> std::vec::Vec<Point> {
    let mut out = std::vec::Vec::with_capacity(CIRCLE_SEGMENTS);
    let r = f64::from(radius);
    for i in 0..CIRCLE_SEGMENTS {
        let theta = 2.0 * core::f64::consts::PI * (i as f64) / (CIRCLE_SEGMENTS as f64);
        out.push(Point::new(
            center.x + (r * theta.cos()).round() as Coord,
            center.y + (r * theta.sin()).round() as Coord,
        ));
    }
    out
}

/// `OctagonPoly`: an eight-sided approximation with flats facing the four
/// cardinal directions, `radius` measured the same way the original's pin
/// size/2 is (half the flat-to-flat width).
fn octagon_contour(center: Point, radius: Coord) -> std::vec::Vec<Point> {
    let half = f64::from(radius) * 0.5;
    let tan22 = f64::from(radius) * (22.5f64.to_radians()).tan();
    let pts = [
        (half, tan22),
        (tan22, half),
        (-tan22, half),
        (-half, tan22),
        (-half, -tan22),
        (-tan22, -half),
        (tan22, -half),
        (half, -tan22),
    ];
    pts.iter()
        .map(|&(dx, dy)| Point::new(center.x + dx.round() as Coord, center.y + dy.round() as Coord))
        .collect()
}

/// `RoundRect`: a rectangle grown by `radius` on every side, corners
/// rounded by a quarter circle.
fn round_rect_contour(inner: Box, radius: Coord) -> std::vec::Vec<Point> {
    if radius <= 0 {
        return rect_points(inner);
    }
    let quarter = CIRCLE_SEGMENTS / 4;
    let mut out = std::vec::Vec::with_capacity(4 * (quarter + 1));
    let corners = [
        (inner.x2, inner.y1, 0.0),
        (inner.x2, inner.y2, 90.0),
        (inner.x1, inner.y2, 180.0),
        (inner.x1, inner.y1, 270.0),
    ];
    let r = f64::from(radius);
    for &(cx, cy, start_deg) in &corners {
        for i in 0..=quarter {
            let theta = (start_deg + 90.0 * (i as f64) / (quarter as f64)).to_radians();
            out.push(Point::new(cx + (r * theta.cos()).round() as Coord, cy + (r * theta.sin()).round() as Coord));
        }
    }
    out
}

fn rect_points(b: Box) -> std::vec::Vec<Point> {
    std::vec::Vec::from([
        Point::new(b.x1, b.y1),
        Point::new(b.x2, b.y1),
        Point::new(b.x2, b.y2),
        Point::new(b.x1, b.y2),
    ])
}

/// `LinePoly`/`SquarePadPoly`: a capsule (or, with square ends, a
/// rectangle) of half-thickness `half` around the segment `p1`-`p2`.
fn capsule_contour(p1: Point, p2: Point, half: Coord, square_ends: bool) -> std::vec::Vec<Point> {
    if p1 == p2 {
        return circle_contour(p1, half);
    }
    let dx = f64::from(p2.x - p1.x);
    let dy = f64::from(p2.y - p1.y);
    let len = dx.hypot(dy);
    let ux = dx / len;
    let uy = dy / len;
    // Perpendicular, scaled to `half`.
    let px = -uy * f64::from(half);
    let py = ux * f64::from(half);

    if square_ends {
        let ex = ux * f64::from(half);
        let ey = uy * f64::from(half);
        return std::vec::Vec::from([
            Point::new(
                (f64::from(p1.x) - ex + px).round() as Coord,
                (f64::from(p1.y) - ey + py).round() as Coord,
            ),
            Point::new(
                (f64::from(p2.x) + ex + px).round() as Coord,
                (f64::from(p2.y) + ey + py).round() as Coord,
            ),
            Point::new(
                (f64::from(p2.x) + ex - px).round() as Coord,
                (f64::from(p2.y) + ey - py).round() as Coord,
            ),
            Point::new(
                (f64::from(p1.x) - ex - px).round() as Coord,
                (f64::from(p1.y) - ey - py).round() as Coord,
            ),
        ]);
    }

    let mut out = std::vec::Vec::new();
    out.push(Point::new(
        (f64::from(p1.x) + px).round() as Coord,
        (f64::from(p1.y) + py).round() as Coord,
    ));
    out.extend(half_circle(p2, half, ux, uy));
    out.push(Point::new(
        (f64::from(p2.x) - px).round() as Coord,
        (f64::from(p2.y) - py).round() as Coord,
    ));
    out.extend(half_circle(p1, half, -ux, -uy));
    out
}

/// Half the circle-segment ring, swept from the `+perp` side of the
/// capsule, around the direction `(ux, uy)` points away from the segment,
/// to the `-perp` side -- a rounded cap at one end of the capsule.
fn half_circle(center: Point, radius: Coord, ux: f64, uy: f64) -> std::vec::Vec<Point> {
    let start = uy.atan2(ux) - core::f64::consts::FRAC_PI_2;
    let steps = CIRCLE_SEGMENTS / 2;
    let r = f64::from(radius);
    (1..steps)
        .map(|i| {
            let theta = start + core::f64::consts::PI * (i as f64) / (steps as f64);
            Point::new(center.x + (r * theta.cos()).round() as Coord, center.y + (r * theta.sin()).round() as Coord)
        })
        .collect()
}

/// `PinPoly`: a pin's clearance shape, `thick = pin.copper_dia`,
/// `clear = extra_clearance` (the keepaway requested by the caller, already
/// folded with the pin's own keepaway per `polygon.c`'s `min` convention at
/// the call site).
#[must_use]
pub fn pin_poly(pin: Pin, extra_clearance: Coord) -> PolyArea {
    match pin.shape {
        PinShape::Square => {
            let size = (pin.copper_dia + 1) / 2;
            let inner = Box::new_unchecked(pin.center.x - size, pin.center.y - size, pin.center.x + size, pin.center.y + size);
            PolyArea::simple(round_rect_contour(inner, (extra_clearance + 1) / 2))
        }
        PinShape::Octagon => {
            let size = (pin.copper_dia + extra_clearance + 1) / 2;
            PolyArea::simple(octagon_contour(pin.center, size + size))
        }
        PinShape::Round => {
            let size = (pin.copper_dia + extra_clearance + 1) / 2;
            PolyArea::simple(circle_contour(pin.center, size))
        }
    }
}

/// A via's clearance shape: always round, same radius formula as a round
/// pin (`PinPoly`'s non-square, non-octagon branch).
#[must_use]
pub fn via_poly(via: Via, extra_clearance: Coord) -> PolyArea {
    let size = (via.copper_dia + extra_clearance + 1) / 2;
    PolyArea::simple(circle_contour(via.center, size))
}

/// `LinePoly`: a line's clearance shape, `thick = line.thickness + extra_clearance`.
#[must_use]
pub fn line_poly(line: LineSeg, extra_clearance: Coord) -> PolyArea {
    let half = (line.thickness + extra_clearance + 1) / 2;
    PolyArea::simple(capsule_contour(line.p1, line.p2, half, false))
}

/// `SquarePadPoly`/`LinePoly`: a pad's clearance shape.
#[must_use]
pub fn pad_poly(pad: Pad, extra_clearance: Coord) -> PolyArea {
    let half = (pad.thickness + extra_clearance + 1) / 2;
    PolyArea::simple(capsule_contour(pad.p1, pad.p2, half, pad.square_ends))
}

/// `ArcPoly`, simplified: the swept capsule around the arc's centerline,
/// sampled at the same angular resolution as a full circle rather than the
/// original's self-intersection bisection for very wide, thin arcs (noted
/// as a known gap -- a near-360-degree arc thinner than its own width can
/// produce a locally self-overlapping contour here that the Boolean
/// engine's snap-rounding will usually still resolve sanely, just not
/// identically to `ArcPolyNoIntersect`'s exact two-segment split).
#[must_use]
pub fn arc_poly(arc: &Arc, extra_clearance: Coord) -> PolyArea {
    let half = (arc.thickness + extra_clearance + 1) / 2;
    let steps = CIRCLE_SEGMENTS.max(8);
    let sweep = arc.sweep_deg.abs().max(1.0);
    let n = ((sweep / 360.0) * steps as f64).ceil().max(2.0) as usize;

    let sample = |t: f64| {
        let deg = arc.start_angle_deg + arc.sweep_deg * t;
        let theta = deg.to_radians();
        Point::new(
            arc.center.x + (f64::from(arc.radius_x) * theta.cos()).round() as Coord,
            arc.center.y + (f64::from(arc.radius_y) * theta.sin()).round() as Coord,
        )
    };

    let mut outer = std::vec::Vec::with_capacity(n + 1);
    let mut inner = std::vec::Vec::with_capacity(n + 1);
    for i in 0..=n {
        let t = i as f64 / n as f64;
        let p = sample(t);
        let next = sample((t + 0.001).min(1.0));
        let dx = f64::from(next.x - p.x);
        let dy = f64::from(next.y - p.y);
        let len = dx.hypot(dy).max(1e-9);
        let nx = -dy / len * f64::from(half);
        let ny = dx / len * f64::from(half);
        outer.push(Point::new(p.x + nx.round() as Coord, p.y + ny.round() as Coord));
        inner.push(Point::new(p.x - nx.round() as Coord, p.y - ny.round() as Coord));
    }
    inner.reverse();
    outer.extend(inner);
    PolyArea::simple(outer)
}

/// `BoxPolyBloated`: a plain rectangle, `box` grown by `bloat` on every
/// side, no rounding. Used by the plow's "add back" step, which works
/// against an object's bounding box rather than its true clearance shape.
#[must_use]
pub fn box_poly_bloated(b: Box, bloat: Coord) -> PolyArea {
    PolyArea::simple(rect_points(b.inflate(bloat)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcb_geom::NetId;

    #[test]
    fn round_pin_poly_matches_hand_clearance_scenario() {
        // A 2000-diameter via with a 500 keepaway clears to a 1250 radius
        // circle, matching the polygon-clearance-around-a-via scenario.
        let via = Via {
            center: Point::new(0, 0),
            copper_dia: 2000,
            drill_dia: 800,
            keepaway: 500,
            net: NetId(0),
        };
        let poly = via_poly(via, 500);
        let b = pcb_polygon::contour_bbox(&poly.outer);
        assert!((b.width() - 2500).abs() <= 2);
        assert!((b.height() - 2500).abs() <= 2);
    }

    #[test]
    fn capsule_contour_is_centered_on_the_segment() {
        let c = capsule_contour(Point::new(0, 0), Point::new(100, 0), 10, false);
        let b = pcb_polygon::contour_bbox(&c);
        assert_eq!(b.y1, -10);
        assert_eq!(b.y2, 10);
        assert_eq!(b.x1, -10);
        assert_eq!(b.x2, 110);
    }

    #[test]
    fn box_poly_bloated_grows_every_side() {
        let poly = box_poly_bloated(Box::new_unchecked(0, 0, 100, 100), 10);
        let b = pcb_polygon::contour_bbox(&poly.outer);
        assert_eq!(b, Box::new_unchecked(-10, -10, 110, 110));
    }
}
