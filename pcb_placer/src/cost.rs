// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The composite placement cost function, `ComputeCost` in `autoplace.c`,
//! §4.4.1.

use crate::component::{Component, ComponentId};
use crate::netlist::NetList;
use pcb_geom::{mil_to_coord, Box, Coord, Direction, Side};
use pcb_spatial::{Backend, Flow, RTree};
use std::vec::Vec;

/// Tunable weights for [`compute_cost`], §4.4.1. Defaults match the spec's
/// stated values verbatim.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostParameters {
    /// Extra wire-length cost charged to an all-SMD net that spans both
    /// sides of the board (it will need a via even though every endpoint is
    /// surface-mount).
    pub via_cost: f64,
    /// Weight on `delta1`, the net-bounding-box congestion term.
    pub congestion_penalty: f64,
    /// Minimum weight on `delta2`, the module-overlap term (applied even at
    /// `T == T0`).
    pub overlap_penalty_min: f64,
    /// Additional weight on `delta2` that fades in as `T` drops (at `T = 0`
    /// the full `overlap_penalty_min + overlap_penalty_max` applies).
    pub overlap_penalty_max: f64,
    /// Flat penalty per component whose `vbox` leaves the board.
    pub out_of_bounds_penalty: f64,
    /// Weight on `delta5`, the total bounding-area term.
    pub overall_area_penalty: f64,
    /// Bonus for a neighbor whose name prefix matches (e.g. both "R").
    pub matching_neighbor_bonus: f64,
    /// Bonus for a neighbor with the same rotation.
    pub oriented_neighbor_bonus: f64,
    /// Bonus for a neighbor sharing an edge coordinate (aligned placement).
    pub aligned_neighbor_bonus: f64,
    /// Grid snap size used above 10 mil of temperature.
    pub large_grid_size: Coord,
    /// Grid snap size used at or below 10 mil of temperature.
    pub small_grid_size: Coord,
    /// Stage length multiplier: a stage runs until `good_moves >= m *
    /// |selected|` or `moves >= 2m * |selected|`.
    pub m: u32,
    /// Halt once `good_moves < moves / good_ratio`.
    pub good_ratio: u32,
    /// Geometric cooling factor applied at the end of each stage.
    pub gamma: f64,
    /// `autoplace.c`'s "fast" flag: when set, opposite-side SMD/pin overlap
    /// conflicts are not charged in `delta2`, trading quality for speed on
    /// large boards.
    pub ignore_smd_pin_conflicts: bool,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            via_cost: 3_000.0,
            congestion_penalty: 0.02,
            overlap_penalty_min: 0.01,
            overlap_penalty_max: 100.0,
            out_of_bounds_penalty: 1_000.0,
            overall_area_penalty: 1.0,
            matching_neighbor_bonus: 1.0,
            oriented_neighbor_bonus: 1.0,
            aligned_neighbor_bonus: 1.0,
            large_grid_size: mil_to_coord(100),
            small_grid_size: mil_to_coord(10),
            m: 20,
            good_ratio: 40,
            gamma: 0.75,
            ignore_smd_pin_conflicts: false,
        }
    }
}

/// Sum, over every pair of boxes in `boxes`, of their (possibly zero)
/// intersection area. `ComputeIntersectionArea` in the original is an
/// external helper (defined in `misc.c`, not part of this crate's retrieval
/// pack); this is the natural reading of spec.md §4.4.1's "intersection
/// area of net bounding boxes"/"module-rect overlap area" language: total
/// pairwise overlap, not just the overlap of the full union.
fn sum_pairwise_intersection_area(boxes: &[Box]) -> f64 {
    let mut total = 0i64;
    for i in 0..boxes.len() {
        for j in (i + 1)..boxes.len() {
            if let Some(overlap) = boxes[i].intersection(boxes[j]) {
                total += overlap.area();
            }
        }
    }
    total as f64
}

/// Find the nearest neighbor of `origin` among `candidates` lying within the
/// 45 degree trapezoid emanating from `origin`'s side in direction `dir`
/// (`r_find_neighbor` in `autoplace.c`). A candidate box's center must be at
/// least as far along the cardinal axis as it is offset across it.
fn find_neighbor(
    tree: &RTree<ComponentId>,
    boxes: &[(ComponentId, Box)],
    origin: ComponentId,
    origin_box: Box,
    dir: Direction,
    board: Box,
) -> Option<ComponentId> {
    let center = origin_box.center();
    let search_region = match dir {
        Direction::North => Box::new(board.x1, origin_box.y2, board.x2, board.y2),
        Direction::South => Box::new(board.x1, board.y1, board.x2, origin_box.y1),
        Direction::East => Box::new(origin_box.x2, board.y1, board.x2, board.y2),
        Direction::West => Box::new(board.x1, board.y1, origin_box.x1, board.y2),
        _ => return None,
    };
    let mut best: Option<(i64, ComponentId)> = None;
    tree.search(
        &mut |node_box| {
            if node_box.intersects(search_region) {
                Flow::Continue
            } else {
                Flow::PruneSubtree
            }
        },
        &mut |_id, leaf_box, data| {
            if *data != origin && leaf_box.intersects(search_region) {
                let other = boxes.iter().find(|(id, _)| id == data).map(|(_, b)| *b);
                if let Some(other_box) = other {
                    let oc = other_box.center();
                    let (along, across) = match dir {
                        Direction::North | Direction::South => {
                            (i64::from((oc.y - center.y).abs()), i64::from((oc.x - center.x).abs()))
                        }
                        _ => (i64::from((oc.x - center.x).abs()), i64::from((oc.y - center.y).abs())),
                    };
                    if across <= along {
                        let better = best.is_none_or(|(d, _)| along < d);
                        if better {
                            best = Some((along, *data));
                        }
                    }
                }
            }
            Flow::Continue
        },
    );
    best.map(|(_, id)| id)
}

fn module_side_box(component: &Component) -> Box {
    // Full per-pad clearance shapes live in `pcb_clearance`, not in this
    // crate's lightweight `Component` (see `DESIGN.md`): the visual outline
    // (`vbox`) stands in for `ComputeCost`'s pin/pad-derived module box.
    component.vbox()
}

/// Compute the composite placement cost, §4.4.1. `T == 5.0` does not trigger
/// the original's debug cost-component printout (that was a `printf` aimed
/// at an interactive console; callers wanting the breakdown should call
/// [`cost_breakdown`] directly).
#[must_use]
pub fn compute_cost(
    components: &[Component],
    nets: &mut NetList,
    board: Box,
    params: &CostParameters,
    t0: f64,
    t: f64,
) -> f64 {
    let b = cost_breakdown(components, nets, board, params, t0, t);
    b.total()
}

/// The individual cost terms, for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CostBreakdown {
    /// Net wire-length term.
    pub w: f64,
    /// Net-bounding-box congestion term.
    pub delta1: f64,
    /// Module overlap term.
    pub delta2: f64,
    /// Out-of-bounds term.
    pub delta3: f64,
    /// Alignment bonus (subtracted from the total).
    pub delta4: f64,
    /// Overall bounding-area term.
    pub delta5: f64,
}

impl CostBreakdown {
    /// `W + delta1 + delta2 + delta3 - delta4 + delta5`.
    #[must_use]
    pub fn total(self) -> f64 {
        self.w + self.delta1 + self.delta2 + self.delta3 - self.delta4 + self.delta5
    }
}

/// As [`compute_cost`], but returns the individual terms.
#[must_use]
pub fn cost_breakdown(
    components: &[Component],
    nets: &mut NetList,
    board: Box,
    params: &CostParameters,
    t0: f64,
    t: f64,
) -> CostBreakdown {
    nets.update_xy(components);

    let mut w = 0.0;
    let mut net_boxes = Vec::with_capacity(nets.nets.len());
    for (i, net) in nets.nets.iter().enumerate() {
        if net.pins.len() < 2 {
            continue;
        }
        let Some(bbox) = nets.net_bbox(i) else { continue };
        let mut all_smd = true;
        let mut sides_seen: (bool, bool) = (false, false); // (top, bottom)
        for pin in &net.pins {
            match *pin {
                crate::netlist::PinRef::Component { component, pad_index } => {
                    let comp = &components[component.0 as usize];
                    let pad = &comp.pads[pad_index];
                    if !pad.is_smd {
                        all_smd = false;
                    }
                    match comp.side {
                        Side::Top => sides_seen.0 = true,
                        Side::Bottom => sides_seen.1 = true,
                    }
                }
                crate::netlist::PinRef::Fixed(_) => all_smd = false,
            }
        }
        let spans_both_sides = sides_seen.0 && sides_seen.1;
        w += (pcb_geom::coord_to_mil(bbox.width()) as f64)
            + (pcb_geom::coord_to_mil(bbox.height()) as f64)
            + if all_smd && spans_both_sides { params.via_cost } else { 0.0 };
        net_boxes.push(bbox);
    }

    let delta1 = params.congestion_penalty * sum_pairwise_intersection_area(&net_boxes).abs().sqrt();

    let mut solder_boxes = Vec::new();
    let mut component_boxes = Vec::new();
    let mut out_of_bounds = 0usize;
    for comp in components {
        if comp.pads.is_empty() {
            continue;
        }
        let module_box = module_side_box(comp);
        match comp.side {
            Side::Bottom => solder_boxes.push(module_box),
            Side::Top => component_boxes.push(module_box),
        }
        if !params.ignore_smd_pin_conflicts && comp.pads.iter().any(|p| !p.is_smd) {
            match comp.side {
                Side::Bottom => component_boxes.push(module_box),
                Side::Top => solder_boxes.push(module_box),
            }
        }
        if !comp.vbox().within(board) {
            out_of_bounds += 1;
        }
    }
    let delta2 = (sum_pairwise_intersection_area(&solder_boxes) + sum_pairwise_intersection_area(&component_boxes))
        .abs()
        .sqrt()
        * (params.overlap_penalty_min + (1.0 - t / t0) * params.overlap_penalty_max);

    let delta3 = params.out_of_bounds_penalty * out_of_bounds as f64;

    let delta4 = {
        let mut solder_tree = RTree::new();
        let mut component_tree = RTree::new();
        let mut solder_entries = Vec::new();
        let mut component_entries = Vec::new();
        for comp in components {
            let vb = comp.vbox();
            match comp.side {
                Side::Bottom => {
                    solder_tree.insert(vb, comp.id);
                    solder_entries.push((comp.id, vb));
                }
                Side::Top => {
                    component_tree.insert(vb, comp.id);
                    component_entries.push((comp.id, vb));
                }
            }
        }
        let mut bonus = 0.0;
        for comp in components {
            let (tree, entries) = match comp.side {
                Side::Bottom => (&solder_tree, &solder_entries),
                Side::Top => (&component_tree, &component_entries),
            };
            let vb = comp.vbox();
            for dir in Direction::CARDINALS {
                let Some(neighbor) = find_neighbor(tree, entries, comp.id, vb, dir, board) else {
                    continue;
                };
                let other = &components[neighbor.0 as usize];
                let mut factor = 1.0;
                if !comp.name_prefix.is_empty() && comp.name_prefix == other.name_prefix {
                    bonus += params.matching_neighbor_bonus;
                    factor += 1.0;
                }
                if comp.rotation == other.rotation {
                    bonus += factor * params.oriented_neighbor_bonus;
                }
                let ob = other.vbox();
                if vb.x1 == ob.x1
                    || vb.x1 == ob.x2
                    || vb.x2 == ob.x1
                    || vb.x2 == ob.x2
                    || vb.y1 == ob.y1
                    || vb.y1 == ob.y2
                    || vb.y2 == ob.y1
                    || vb.y2 == ob.y2
                {
                    bonus += params.aligned_neighbor_bonus;
                }
            }
        }
        bonus
    };

    let delta5 = {
        let mut overall: Option<Box> = None;
        for comp in components {
            let vb = comp.vbox();
            overall = Some(match overall {
                Some(acc) => acc.union(vb),
                None => vb,
            });
        }
        match overall {
            Some(b) if b.is_good() => {
                params.overall_area_penalty
                    * ((pcb_geom::coord_to_mil(b.width()) as f64)
                        * (pcb_geom::coord_to_mil(b.height()) as f64))
                        .sqrt()
            }
            _ => 0.0,
        }
    };

    CostBreakdown { w, delta1, delta2, delta3, delta4, delta5 }
}
