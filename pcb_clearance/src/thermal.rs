// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thermal relief contour generation.
//!
//! `thermal.h` only declares `ThermPoly`/`ThermPolyPad`; the `.c`
//! implementation wasn't among the kept source files, so this is built from
//! `spec.md` §4.3/§9's prose description (a cross-or-diagonal stub pattern
//! connecting a pin to a plane, leaving four narrow gaps for thermal
//! isolation) rather than a line-for-line port. The shape: four spoke
//! rectangles running from the pin's copper edge out to the clearance
//! boundary, at 0/90/180/270 degrees (`Pattern::Cross`) or 45/135/225/315
//! (`Pattern::Diagonal`); the gaps between spokes are exactly where the
//! plane's clearance hole (cut by the ordinary pin/via clearance shape) is
//! left open. Unioning this contour back into a polygon's clipped region
//! after the clearance cut reconnects the pin to the plane through the
//! spokes only.

use pcb_geom::{Coord, Point};
use pcb_polygon::PolyArea;

/// Which four compass directions the relief's spokes point along.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Spokes at 0/90/180/270 degrees.
    Cross,
    /// Spokes at 45/135/225/315 degrees.
    Diagonal,
}

/// Build a thermal-relief contour: four spoke rectangles of half-width
/// `spoke_half_width` running from `inner_radius` (the pin/via copper edge)
/// out to `outer_radius` (the plane's clearance boundary), centered on
/// `center`.
#[must_use]
pub fn thermal_relief(
    center: Point,
    inner_radius: Coord,
    outer_radius: Coord,
    spoke_half_width: Coord,
    pattern: Pattern,
) -> std::vec::Vec<PolyArea> {
    let base_deg = match pattern {
        Pattern::Cross => 0.0,
        Pattern::Diagonal => 45.0,
    };
    (0..4)
        .map(|k| {
            let theta = (base_deg + 90.0 * f64::from(k)).to_radians();
            let ux = theta.cos();
            let uy = theta.sin();
            let px = -uy * f64::from(spoke_half_width);
            let py = ux * f64::from(spoke_half_width);
            let inner = (f64::from(center.x) + ux * f64::from(inner_radius), f64::from(center.y) + uy * f64::from(inner_radius));
            let outer = (f64::from(center.x) + ux * f64::from(outer_radius), f64::from(center.y) + uy * f64::from(outer_radius));
            PolyArea::simple(std::vec::Vec::from([
                Point::new((inner.0 + px).round() as Coord, (inner.1 + py).round() as Coord),
                Point::new((outer.0 + px).round() as Coord, (outer.1 + py).round() as Coord),
                Point::new((outer.0 - px).round() as Coord, (outer.1 - py).round() as Coord),
                Point::new((inner.0 - px).round() as Coord, (inner.1 - py).round() as Coord),
            ]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_pattern_yields_four_spokes() {
        let spokes = thermal_relief(Point::new(0, 0), 500, 1000, 100, Pattern::Cross);
        assert_eq!(spokes.len(), 4);
        for spoke in &spokes {
            assert_eq!(spoke.outer.len(), 4);
        }
    }

    #[test]
    fn diagonal_spokes_point_away_from_cross_spokes() {
        let cross = thermal_relief(Point::new(0, 0), 500, 1000, 100, Pattern::Cross);
        let diag = thermal_relief(Point::new(0, 0), 500, 1000, 100, Pattern::Diagonal);
        // The first spoke of each pattern starts on a different ray.
        assert_ne!(cross[0].outer[0], diag[0].outer[0]);
    }
}
