// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pass cost parameters, `autoroute.c`'s `BestParams`/cost-constant
//! table, §4.5.3.

use pcb_geom::{mil_to_coord, Coord};

/// A quarter-inch-ish unit the original expresses several constants in
/// directly (`3.5 * INCH_TO_COORD(1)` and friends).
const INCH: Coord = mil_to_coord(1_000);
const EXPENSIVE: f64 = 1.0e8;

/// Cost weights for one routing pass, recomputed at the start of every pass
/// from `pass` / `total_passes` / `smoothing`, §4.5.3.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassCost {
    /// `keepaway + thick/2`, the per-style outward bloat applied when
    /// building route boxes for this pass (style-dependent; stored here as
    /// a convenience default for styles that don't override it).
    pub bloat: Coord,
    /// Cost of inserting a via.
    pub via_cost: f64,
    /// Penalty for passing through a box that conflicted on the *previous*
    /// pass.
    pub last_conflict_penalty: f64,
    /// Penalty for passing through a box that conflicts on *this* pass
    /// (`4 * last_conflict_penalty`).
    pub conflict_penalty: f64,
    /// Penalty per direction change ("jog") in the back-traced path.
    pub jog_penalty: f64,
    /// Penalty applied per unit length through already-congested space.
    pub congestion_penalty: f64,
    /// Penalty for using a layer group not already in use by this net.
    pub new_layer_penalty: f64,
    /// Boxes with more than this many recorded conflicts are treated as
    /// "hard" blockers rather than passable-with-penalty.
    pub hi_conflict_threshold: u32,
}

impl PassCost {
    /// Compute the cost weights for `pass` (1-based) of `total_passes`,
    /// `smoothing` true on smoothing rounds.
    #[must_use]
    pub fn for_pass(pass: u32, total_passes: u32, smoothing: bool) -> Self {
        let last_conflict_penalty =
            (400.0 * f64::from(pass) / f64::from(total_passes.max(1)) + 2.0) / f64::from(pass + 1);
        let via_cost = 3.5 * f64::from(INCH) + f64::from(mil_to_coord(20)) * if smoothing { 80.0 } else { 30.0 };
        let jog_penalty = 1_000.0 * if smoothing { 20.0 } else { 4.0 };
        let new_layer_penalty = if smoothing { 0.5 * EXPENSIVE } else { 10.0 * via_cost };
        let hi_conflict_threshold = (8 * (total_passes.saturating_sub(pass) + 1)).max(6);
        Self {
            bloat: 0,
            via_cost,
            last_conflict_penalty,
            conflict_penalty: 4.0 * last_conflict_penalty,
            jog_penalty,
            congestion_penalty: 1_000_000.0,
            new_layer_penalty,
            hi_conflict_threshold,
        }
    }
}

/// Per-layer-group Manhattan-metric bias, `autoroute.c`'s `x_cost`/`y_cost`
/// tables: odd inner layer groups are cheaper to route horizontally, even
/// inner groups cheaper vertically, and the outermost (top/bottom) groups
/// are made more expensive across the board to encourage inner-layer use.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerCost {
    x_cost: std::vec::Vec<f64>,
    y_cost: std::vec::Vec<f64>,
}

impl LayerCost {
    /// Build the bias table for `layer_groups` copper layer groups, indices
    /// `0..layer_groups` with `0` and `layer_groups - 1` treated as the
    /// outer (top/bottom) groups.
    #[must_use]
    pub fn new(layer_groups: u16) -> Self {
        let n = layer_groups.max(1) as usize;
        let mut x_cost = std::vec::Vec::with_capacity(n);
        let mut y_cost = std::vec::Vec::with_capacity(n);
        for group in 0..n {
            let outer = group == 0 || group == n - 1;
            let (x, y) = if group % 2 == 1 { (1.0, 2.0) } else { (2.0, 1.0) };
            let outer_penalty = if outer { 2.0 } else { 1.0 };
            x_cost.push(x * outer_penalty);
            y_cost.push(y * outer_penalty);
        }
        Self { x_cost, y_cost }
    }

    /// Cost bias for moving one unit horizontally on `layer_group`.
    #[must_use]
    pub fn x(&self, layer_group: u16) -> f64 {
        self.x_cost.get(layer_group as usize).copied().unwrap_or(1.0)
    }

    /// Cost bias for moving one unit vertically on `layer_group`.
    #[must_use]
    pub fn y(&self, layer_group: u16) -> f64 {
        self.y_cost.get(layer_group as usize).copied().unwrap_or(1.0)
    }

    /// Manhattan-distance estimate from `a` to `b` on `layer_group`, biased
    /// by this table -- the router's A* heuristic term.
    #[must_use]
    pub fn manhattan(&self, layer_group: u16, dx: i64, dy: i64) -> f64 {
        self.x(layer_group) * (dx.unsigned_abs() as f64) + self.y(layer_group) * (dy.unsigned_abs() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_penalty_is_four_times_last_conflict() {
        let cost = PassCost::for_pass(3, 12, false);
        assert!((cost.conflict_penalty - 4.0 * cost.last_conflict_penalty).abs() < 1e-9);
    }

    #[test]
    fn smoothing_passes_cost_more_for_new_layers_and_jogs() {
        let refine = PassCost::for_pass(12, 12, false);
        let smooth = PassCost::for_pass(1, 1, true);
        assert!(smooth.jog_penalty > refine.jog_penalty);
        assert!(smooth.new_layer_penalty > 0.0);
    }

    #[test]
    fn layer_cost_penalizes_outer_groups() {
        let table = LayerCost::new(4);
        assert!(table.x(0) > table.x(1));
    }
}
