// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pass driver: net ordering, rip-up, and escalating conflict penalties
//! across refinement and smoothing passes, `autoroute.c`'s `AutoRoute`
//! top-level loop, §4.5.4.

use pcb_geom::{NetId, RouteStyle};

use crate::cost::LayerCost;
use crate::model::RouteModel;
use crate::route_box::RouteBoxFlags;
use crate::route_one::{route_one, RouteOutcome, RouteRequest};

/// Driver configuration: how many refinement passes to run before
/// smoothing, how many smoothing passes follow, and whether layer changes
/// (vias) are permitted at all.
#[derive(Clone, Copy, Debug)]
pub struct RouterConfig {
    /// Refinement passes with escalating conflict penalties.
    pub passes: u32,
    /// Smoothing passes after refinement: every net is ripped up and
    /// re-routed regardless of conflict state (`rip_always`).
    pub smoothes: u32,
    /// Whether the search may offer layer-change (via) edges. When `false`,
    /// a net whose subnets sit on different layer groups is hopeless and is
    /// marked bad without spending search budget on it (§4.5's routability
    /// pre-check).
    pub via_on: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self { passes: 12, smoothes: 1, via_on: true }
    }
}

/// Per-pass outcome, surfaced through [`RouteProgress`] as a status line
/// (`autoroute.c`'s "N of M routed").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassReport {
    /// 1-based pass number just completed.
    pub pass_number: u32,
    /// Total passes (refinement + smoothing) this run will attempt.
    pub total_passes: u32,
    /// Whether this was a smoothing pass.
    pub smoothing: bool,
    /// Subnets successfully connected this pass.
    pub subnets_routed: usize,
    /// Subnets that needed connecting this pass.
    pub subnets_total: usize,
}

/// What happened to one net during a pass.
#[derive(Clone, Copy, Debug, PartialEq)]
enum PassOutcome {
    /// Every subnet pair is connected.
    Routed { cost: f64 },
    /// At least one subnet pair could not be connected this pass.
    Bad,
}

/// Receives a [`PassReport`] after each pass; returning `false` cancels the
/// remaining passes (mirrors [`pcb_placer::AnnealProgress`]'s cancellation
/// shape).
pub trait RouteProgress {
    /// Called once per completed pass. Return `false` to stop early.
    fn pass_complete(&mut self, report: PassReport) -> bool;
}

impl<F: FnMut(PassReport) -> bool> RouteProgress for F {
    fn pass_complete(&mut self, report: PassReport) -> bool {
        self(report)
    }
}

/// Run every configured pass over `nets`, returning the report for the last
/// pass actually run. `style_for_net` supplies the trace/via geometry for
/// each net (the same lookup [`crate::model::RouteSource::style_for_net`]
/// provides during data preparation).
pub fn run_passes(
    model: &mut RouteModel,
    nets: &[NetId],
    layer_cost: &LayerCost,
    config: &RouterConfig,
    style_for_net: &dyn Fn(NetId) -> RouteStyle,
    mut progress: Option<&mut dyn RouteProgress>,
) -> PassReport {
    let total_passes = config.passes.max(1) + config.smoothes;
    let mut order: std::vec::Vec<NetId> = nets.to_vec();
    order.sort_by_key(|&net| net_bbox_area(model, net));

    let mut last_report = PassReport { pass_number: 0, total_passes, smoothing: false, subnets_routed: 0, subnets_total: 0 };
    let mut smoothing_costs: std::vec::Vec<f64> = std::vec::Vec::new();

    for pass_number in 1..=total_passes {
        let smoothing = pass_number > config.passes.max(1);
        let capacity = model.arena.slot_capacity();
        model.rings.reset_same_subnet(capacity, true);

        for &net in &order {
            model.rip_up_net(net, smoothing);
        }

        let mut subnets_routed = 0usize;
        let mut subnets_total = 0usize;
        let mut pass_cost_total = 0.0;
        let mut next_order: std::vec::Vec<(NetId, f64)> = std::vec::Vec::with_capacity(order.len());

        for &net in &order {
            let (outcome, routed_here, total_here) =
                route_net(model, layer_cost, net, pass_number, total_passes, smoothing, config.via_on, style_for_net);
            subnets_routed += routed_here;
            subnets_total += total_here;
            match outcome {
                PassOutcome::Routed { cost } => {
                    pass_cost_total += cost;
                    next_order.push((net, cost));
                }
                PassOutcome::Bad => {
                    mark_bad(model, net);
                    next_order.push((net, f64::MAX));
                }
            }
        }

        next_order.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        order = next_order.into_iter().map(|(net, _)| net).collect();

        let report = PassReport { pass_number, total_passes, smoothing, subnets_routed, subnets_total };
        last_report = report;
        log::info!("pass {pass_number}/{total_passes}: {subnets_routed} of {subnets_total} subnets routed");

        let keep_going = progress.as_deref_mut().is_none_or(|cb| cb.pass_complete(report));
        if !keep_going {
            break;
        }
        if subnets_routed == subnets_total && !smoothing {
            break;
        }
        if smoothing {
            smoothing_costs.push(pass_cost_total);
            if smoothing_costs.len() >= 2 {
                let n = smoothing_costs.len();
                if (smoothing_costs[n - 1] - smoothing_costs[n - 2]).abs() < f64::EPSILON {
                    break;
                }
            }
        }
    }

    last_report
}

fn net_bbox_area(model: &RouteModel, net: NetId) -> i64 {
    let boxes = model.net_route_boxes(net);
    let Some(first) = boxes.first().and_then(|&id| model.arena.get(id)) else {
        return 0;
    };
    let mut area = first.inner;
    for &id in &boxes[1..] {
        if let Some(rb) = model.arena.get(id) {
            area = area.union(rb.inner);
        }
    }
    area.area()
}

fn route_net(
    model: &mut RouteModel,
    layer_cost: &LayerCost,
    net: NetId,
    pass_number: u32,
    total_passes: u32,
    smoothing: bool,
    via_on: bool,
    style_for_net: &dyn Fn(NetId) -> RouteStyle,
) -> (PassOutcome, usize, usize) {
    let boxes = model.net_route_boxes(net);
    if boxes.is_empty() {
        return (PassOutcome::Routed { cost: 0.0 }, 0, 0);
    }
    let reps = model.subnet_representatives(&boxes);
    let subnets_total = reps.len().saturating_sub(1);
    if reps.len() <= 1 {
        return (PassOutcome::Routed { cost: 0.0 }, 0, 0);
    }

    let source = reps[0];
    let style = style_for_net(net);
    let mut total_cost = 0.0;
    let mut routed = 0usize;

    loop {
        let targets: std::vec::Vec<_> = reps[1..].iter().copied().filter(|&t| !model.rings.same_subnet(source, t)).collect();
        if targets.is_empty() {
            break;
        }
        let request = RouteRequest { net, style, source, targets: &targets, pass_number, total_passes, smoothing, via_on };
        match route_one(model, layer_cost, &request) {
            RouteOutcome::Routed { cost, .. } => {
                total_cost += cost;
                routed += 1;
            }
            RouteOutcome::NoPathFound => {
                return (PassOutcome::Bad, routed, subnets_total);
            }
        }
    }
    (PassOutcome::Routed { cost: total_cost }, routed, subnets_total)
}

fn mark_bad(model: &mut RouteModel, net: NetId) {
    for id in model.net_route_boxes(net) {
        if let Some(rb) = model.arena.get_mut(id)
            && !rb.flags.contains(RouteBoxFlags::FIXED)
        {
            rb.flags |= RouteBoxFlags::IS_BAD;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route_box::{RouteBox, RouteBoxKind};
    use pcb_geom::{mil_to_coord, Box};

    fn style(_net: NetId) -> RouteStyle {
        RouteStyle::default()
    }

    #[test]
    fn single_net_routes_in_one_pass() {
        let mut model = RouteModel::new(Box::new(0, 0, mil_to_coord(2_000), mil_to_coord(2_000)), 1);
        let a = model.insert_box(RouteBox::fixed(
            Box::new(0, 0, mil_to_coord(20), mil_to_coord(20)),
            Box::new(-mil_to_coord(5), -mil_to_coord(5), mil_to_coord(25), mil_to_coord(25)),
            0,
            RouteBoxKind::Pin,
            NetId(1),
        ));
        let b = model.insert_box(RouteBox::fixed(
            Box::new(mil_to_coord(500), mil_to_coord(500), mil_to_coord(520), mil_to_coord(520)),
            Box::new(mil_to_coord(495), mil_to_coord(495), mil_to_coord(525), mil_to_coord(525)),
            0,
            RouteBoxKind::Pin,
            NetId(1),
        ));
        seed_net(&mut model, a, b);

        let layer_cost = LayerCost::new(1);
        let config = RouterConfig { passes: 3, smoothes: 1, via_on: true };
        let report = run_passes(&mut model, &[NetId(1)], &layer_cost, &config, &style, None);
        assert_eq!(report.subnets_routed, report.subnets_total);
        assert!(model.rings.same_subnet(a, b));
    }

    #[test]
    fn unreachable_net_is_marked_bad() {
        let mut model = RouteModel::new(Box::new(0, 0, mil_to_coord(200), mil_to_coord(200)), 1);
        let a = model.insert_box(RouteBox::fixed(Box::new(0, 0, 10, 10), Box::new(0, 0, 10, 10), 0, RouteBoxKind::Pin, NetId(1)));
        let b = model.insert_box(RouteBox::fixed(Box::new(20, 20, 30, 30), Box::new(20, 20, 30, 30), 1, RouteBoxKind::Pin, NetId(1)));
        seed_net(&mut model, a, b);

        let layer_cost = LayerCost::new(1);
        let config = RouterConfig { passes: 2, smoothes: 0, via_on: false };
        let report = run_passes(&mut model, &[NetId(1)], &layer_cost, &config, &style, None);
        assert!(report.subnets_routed < report.subnets_total);
    }

    // `RouteModel::build` is the normal way to seed `NetRings`; these two
    // tests insert boxes directly (no `RouteSource`), so subnet grouping
    // needs to be registered by hand.
    fn seed_net(model: &mut RouteModel, a: crate::route_box::RouteBoxId, b: crate::route_box::RouteBoxId) {
        model.rings = crate::net_rings::NetRings::new(model.arena.slot_capacity());
        model.rings.join_same_net(a, b);
        model.rings.register_net_representative(NetId(1), a);
    }
}
