// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `route_one`: search from one source to the nearest of a set of targets
//! and, on success, emit the winning path as permanent copper,
//! `autoroute.c`'s `Route`/`TracePath` pair, §4.5.2-§4.5.4.

use pcb_geom::{Box, NetId, Point, RouteStyle};
use pcb_heap::Heap;
use pcb_mts::Parity;

use crate::cost::{LayerCost, PassCost};
use crate::expand::{closest_point, expand_cardinals, try_via, Edge, ExpansionArena, ExpansionAreaRecord, ExpansionId};
use crate::model::RouteModel;
use crate::route_box::{RouteBox, RouteBoxFlags, RouteBoxId, RouteBoxKind};
use pcb_geom::Direction;

/// The result of one [`route_one`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RouteOutcome {
    /// A path was found and emitted.
    Routed {
        /// Total routing cost of the winning path (length plus via/jog/
        /// conflict penalties).
        cost: f64,
        /// Number of vias placed.
        vias: usize,
    },
    /// The search budget was exhausted before any target was reached.
    NoPathFound,
}

/// One source-to-targets search request.
#[derive(Clone, Copy, Debug)]
pub struct RouteRequest<'a> {
    /// Net being routed.
    pub net: NetId,
    /// Trace/via geometry for this net.
    pub style: RouteStyle,
    /// The box to grow outward from.
    pub source: RouteBoxId,
    /// Acceptable destinations; the search stops at whichever is reached
    /// first.
    pub targets: &'a [RouteBoxId],
    /// Which pass this call belongs to (1-based).
    pub pass_number: u32,
    /// Total passes the pass driver will run.
    pub total_passes: u32,
    /// Whether this is a smoothing pass.
    pub smoothing: bool,
    /// Whether layer-change (via) edges may be offered, `Config::via_on`.
    pub via_on: bool,
}

/// Search-heap iterations allowed before giving up, scaled with pass number
/// and layer count so later, more expensive passes get more budget
/// (`autoroute.c`'s `mtsStepsBound`, reinterpreted per call rather than
/// globally).
fn search_budget(pass_number: u32, layer_groups: u16) -> usize {
    800usize.saturating_mul(pass_number.max(1) as usize).saturating_mul(usize::from(layer_groups.max(1))).max(400)
}

fn nearest_target_point(source_center: Point, targets: &[RouteBox]) -> Point {
    targets
        .iter()
        .min_by_key(|rb| source_center.manhattan(rb.inner.center()))
        .map(|rb| rb.inner.center())
        .unwrap_or(source_center)
}

fn reached_target(area: &ExpansionAreaRecord, targets: &[(RouteBoxId, RouteBox)]) -> Option<RouteBoxId> {
    targets
        .iter()
        .find(|(_, rb)| rb.layer_group == area.layer_group && rb.blocking_box().intersects(area.rect))
        .map(|(id, _)| *id)
}

/// Split a two-point hop into at most two orthogonal segments via a single
/// corner (`autoroute.c`'s Manhattan-knee back-trace). Already-orthogonal
/// hops are returned as one segment.
fn manhattan_knee(p1: Point, p2: Point) -> std::vec::Vec<(Point, Point)> {
    if p1.x == p2.x || p1.y == p2.y {
        return std::vec::Vec::from([(p1, p2)]);
    }
    let corner = Point::new(p2.x, p1.y);
    std::vec::Vec::from([(p1, corner), (corner, p2)])
}

/// Search outward from `request.source` for the nearest of `request.targets`
/// on `model`, emitting the winning path as permanent line/via boxes on
/// success.
pub fn route_one(model: &mut RouteModel, layer_cost: &LayerCost, request: &RouteRequest<'_>) -> RouteOutcome {
    let pass_cost = PassCost::for_pass(request.pass_number, request.total_passes, request.smoothing);
    let budget = search_budget(request.pass_number, model.layer_groups);

    let Some(source_rb) = model.arena.get(request.source).copied() else {
        return RouteOutcome::NoPathFound;
    };
    let targets: std::vec::Vec<(RouteBoxId, RouteBox)> =
        request.targets.iter().filter_map(|id| model.arena.get(*id).map(|rb| (*id, *rb))).collect();
    if targets.is_empty() {
        return RouteOutcome::NoPathFound;
    }
    let target_rbs: std::vec::Vec<RouteBox> = targets.iter().map(|(_, rb)| *rb).collect();
    let target_point = nearest_target_point(source_rb.inner.center(), &target_rbs);

    let mut arena = ExpansionArena::new();
    let waypoint0 = closest_point(source_rb.outer, target_point);
    let source_id = arena.push(ExpansionAreaRecord {
        rect: source_rb.outer,
        layer_group: source_rb.layer_group,
        net: request.net,
        parent: None,
        direction_from_parent: Direction::All,
        reached_target: false,
        waypoint: waypoint0,
    });
    let dx = i64::from(target_point.x - waypoint0.x);
    let dy = i64::from(target_point.y - waypoint0.y);
    let source_edge = Edge { area: source_id, cost_to_point: 0.0, min_cost_to_target: layer_cost.manhattan(source_rb.layer_group, dx, dy) };

    let mut heap: Heap<Edge> = Heap::new();
    heap.insert(source_edge.total_cost(), source_edge);

    let mut winner: Option<(ExpansionId, RouteBoxId)> = None;
    let mut steps = 0usize;

    while let Some(edge) = heap.remove_smallest() {
        steps += 1;
        if steps > budget {
            break;
        }
        let area = *arena.get(edge.area);
        if let Some(target_id) = reached_target(&area, &targets) {
            winner = Some((edge.area, target_id));
            break;
        }

        for (_, child) in expand_cardinals(
            model,
            &mut arena,
            edge.area,
            &edge,
            layer_cost,
            pass_cost.jog_penalty,
            pass_cost.conflict_penalty,
            target_point,
        ) {
            heap.insert(child.total_cost(), child);
        }

        if request.via_on && model.layer_groups > 1 {
            let is_odd = request.pass_number % 2 == 1;
            for layer in 0..model.layer_groups {
                if layer == area.layer_group {
                    continue;
                }
                let radius = request.style.via_diameter / 2;
                let Some(region) = try_via(&model.mts, area.waypoint, radius, request.style.keepaway, is_odd, false) else {
                    continue;
                };
                let waypoint = closest_point(region, target_point);
                let via_area = ExpansionAreaRecord {
                    rect: region,
                    layer_group: layer,
                    net: request.net,
                    parent: Some(edge.area),
                    direction_from_parent: Direction::All,
                    reached_target: false,
                    waypoint,
                };
                let id = arena.push(via_area);
                let tdx = i64::from(target_point.x - waypoint.x);
                let tdy = i64::from(target_point.y - waypoint.y);
                let child = Edge {
                    area: id,
                    cost_to_point: edge.cost_to_point + pass_cost.via_cost + pass_cost.new_layer_penalty,
                    min_cost_to_target: layer_cost.manhattan(layer, tdx, tdy),
                };
                heap.insert(child.total_cost(), child);
            }
        }
    }

    let Some((winner_id, target_id)) = winner else {
        return RouteOutcome::NoPathFound;
    };
    let (cost, vias) = emit_path(model, &arena, winner_id, request, target_id, layer_cost);
    RouteOutcome::Routed { cost, vias }
}

fn emit_path(
    model: &mut RouteModel,
    arena: &ExpansionArena,
    winner_id: ExpansionId,
    request: &RouteRequest<'_>,
    target_id: RouteBoxId,
    layer_cost: &LayerCost,
) -> (f64, usize) {
    let mut chain = std::vec::Vec::new();
    let mut cursor = Some(winner_id);
    while let Some(id) = cursor {
        let area = *arena.get(id);
        cursor = area.parent;
        chain.push(area);
    }
    chain.reverse();

    let is_odd = request.pass_number % 2 == 1;
    let parity = if is_odd { Parity::Odd } else { Parity::Even };
    let mut prev_box = request.source;
    let mut total_cost = 0.0;
    let mut via_count = 0usize;
    let half_thick = request.style.thick / 2;

    let mut i = 1;
    while i < chain.len() {
        let run_layer = chain[i].layer_group;
        let start = chain[i - 1].waypoint;
        let mut j = i;
        while j + 1 < chain.len() && chain[j + 1].layer_group == run_layer {
            j += 1;
        }
        let end = chain[j].waypoint;

        for (a, b) in manhattan_knee(start, end) {
            let inner = Box::new(a.x.min(b.x) - half_thick, a.y.min(b.y) - half_thick, a.x.max(b.x) + half_thick, a.y.max(b.y) + half_thick);
            let outer = inner.inflate(request.style.keepaway);
            let mut rb = RouteBox::routed(inner, outer, run_layer, RouteBoxKind::Line, request.net);
            if is_odd {
                rb.flags |= RouteBoxFlags::IS_ODD;
            }
            let id = model.insert_box(rb);
            model.mts.add(outer, parity, request.style.keepaway);
            model.rings.join_same_subnet(prev_box, id);
            prev_box = id;
            let dx = i64::from(b.x - a.x);
            let dy = i64::from(b.y - a.y);
            total_cost += layer_cost.manhattan(run_layer, dx, dy);
        }

        if j + 1 < chain.len() {
            let via_point = chain[j].waypoint;
            let r = request.style.via_diameter / 2;
            let inner = Box::new(via_point.x - r, via_point.y - r, via_point.x + r, via_point.y + r);
            let outer = inner.inflate(request.style.keepaway);
            for layer in 0..model.layer_groups {
                let kind = if layer == run_layer { RouteBoxKind::Via } else { RouteBoxKind::ViaShadow };
                let mut rb = RouteBox::routed(inner, outer, layer, kind, request.net);
                rb.flags |= RouteBoxFlags::IS_VIA;
                if is_odd {
                    rb.flags |= RouteBoxFlags::IS_ODD;
                }
                let id = model.insert_box(rb);
                model.rings.join_same_subnet(prev_box, id);
                if layer == run_layer {
                    prev_box = id;
                }
            }
            model.mts.add(outer, parity, request.style.keepaway);
            via_count += 1;
        }
        i = j + 1;
    }

    model.rings.join_same_subnet(prev_box, target_id);
    (total_cost, via_count)
}
