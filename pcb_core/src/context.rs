// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `Context`: the one piece of state threaded through every entry point,
//! replacing the original's board-global `PCB`/`Settings` statics (DESIGN
//! NOTES: "Global mutable state → thread a Context struct").

use pcb_geom::NetId;
use pcb_placer::{AnnealProgress, ComponentId};
use pcb_router::{PassReport, RouteModel, RouteProgress, RouterConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::Board;
use crate::config::Config;

/// Outcome of [`Context::auto_place_selected`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaceResult {
    /// True if any selected component moved.
    pub changed: bool,
    /// Final placement cost (0.0 if nothing was selected).
    pub final_cost: f64,
    /// Messages the host should show (mirrors the original's `Message(...)`
    /// calls — also emitted through `log`, see §6).
    pub messages: std::vec::Vec<std::string::String>,
}

/// Outcome of [`Context::auto_route`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteResult {
    /// True if any new copper (line or via) was emitted.
    pub changed: bool,
    /// Subnets successfully connected across every pass run.
    pub subnets_routed: usize,
    /// Subnets that needed connecting.
    pub subnets_total: usize,
    /// Messages the host should show.
    pub messages: std::vec::Vec<std::string::String>,
}

/// The state every entry point needs: configuration and the RNG the
/// annealer draws from. Owns no board data itself — `Board` is a separate
/// collaborator passed in by reference, per `spec.md` §6's "Persisted
/// state: the core itself is stateless between invocations".
pub struct Context {
    /// Run configuration (route styles, pass counts, cost parameters).
    pub config: Config,
    rng: StdRng,
}

impl Context {
    /// A context seeded from OS entropy.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config, rng: StdRng::from_entropy() }
    }

    /// A context with a fixed RNG seed, for reproducible placement runs.
    #[must_use]
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self { config, rng: StdRng::seed_from_u64(seed) }
    }

    /// Run the simulated-annealing placer over `board.selected`, §6
    /// "`auto_place_selected`".
    pub fn auto_place_selected(&mut self, board: &mut Board) -> PlaceResult {
        if board.selected.is_empty() {
            return PlaceResult {
                changed: false,
                final_cost: 0.0,
                messages: std::vec::Vec::from([std::string::String::from("auto_place_selected: nothing selected")]),
            };
        }
        let selected: std::vec::Vec<ComponentId> = board.selected.iter().map(|&i| board.components[i].id).collect();
        let mut messages = std::vec::Vec::new();
        let mut progress = |stage: u32, cost: f64, temp: f64| {
            messages.push(std::format!("autoplace: stage {stage} cost {cost:.0} T {temp:.1}"));
            false
        };
        let board_box = board.geometry.board_box;
        let result = pcb_placer::auto_place_selected(
            &mut board.components,
            &selected,
            &mut board.nets,
            board_box,
            &self.config.cost_parameters,
            &mut self.rng,
            Some(&mut progress as &mut dyn AnnealProgress),
        );
        messages.push(std::format!("autoplace: {} moves accepted, final cost {:.0}", result.steps, result.final_cost));
        PlaceResult { changed: result.changed, final_cost: result.final_cost, messages }
    }

    /// Run the autorouter over `board`'s nets, §6 "`auto_route`". When
    /// `selected_only` is set, only nets with at least one endpoint on a
    /// selected component are routed (the "rat-line list... filtered by
    /// selected flag" `spec.md` §6 describes).
    pub fn auto_route(&mut self, board: &mut Board, selected_only: bool) -> RouteResult {
        let mut model = RouteModel::build(&*board as &dyn pcb_router::RouteSource);
        let nets = self.nets_to_route(board, selected_only);
        if nets.is_empty() {
            return RouteResult {
                changed: false,
                subnets_routed: 0,
                subnets_total: 0,
                messages: std::vec::Vec::from([std::string::String::from("auto_route: no nets to route")]),
            };
        }

        let layer_cost = pcb_router::LayerCost::new(model.layer_groups);
        let router_config = RouterConfig { passes: self.config.passes, smoothes: self.config.smoothes, via_on: self.config.via_on };
        let style_for_net = |net: NetId| board.geometry.net_style.get(&net).copied().unwrap_or(self.config.route_styles[0]);

        let mut messages = std::vec::Vec::new();
        let mut progress = |report: PassReport| {
            messages.push(std::format!(
                "autoroute: pass {}/{} ({}): {} of {} subnets routed",
                report.pass_number,
                report.total_passes,
                if report.smoothing { "smoothing" } else { "refinement" },
                report.subnets_routed,
                report.subnets_total
            ));
            true
        };
        let report = pcb_router::run_passes(
            &mut model,
            &nets,
            &layer_cost,
            &router_config,
            &style_for_net,
            Some(&mut progress as &mut dyn RouteProgress),
        );

        let changed = write_back(&mut model, board);
        messages.push(std::format!("autoroute: {} of {} subnets routed", report.subnets_routed, report.subnets_total));
        RouteResult { changed, subnets_routed: report.subnets_routed, subnets_total: report.subnets_total, messages }
    }

    fn nets_to_route(&self, board: &Board, selected_only: bool) -> std::vec::Vec<NetId> {
        if !selected_only {
            return board.all_nets();
        }
        board
            .nets
            .nets
            .iter()
            .filter(|net| {
                net.pins.iter().any(|pin| match pin {
                    pcb_placer::PinRef::Component { component, .. } => {
                        board.selected.iter().any(|&i| board.components[i].id == *component)
                    }
                    pcb_placer::PinRef::Fixed(_) => false,
                })
            })
            .map(|net| net.id)
            .collect()
    }
}

/// Copy every router-emitted (non-fixed) line/via back onto `board` as
/// permanent geometry, and report whether anything new was emitted.
fn write_back(model: &mut RouteModel, board: &mut Board) -> bool {
    use pcb_router::{RouteBoxFlags, RouteBoxKind};

    let before_lines = board.geometry.lines.len();
    let before_vias = board.geometry.vias.len();
    for (_, rb) in model.arena.iter() {
        if rb.flags.contains(RouteBoxFlags::FIXED) {
            continue;
        }
        let Some(net) = rb.net else { continue };
        match rb.kind {
            RouteBoxKind::Line => {
                // A diced orthogonal segment: `inner` is its bbox, so the
                // long axis is the run direction and the short axis gives
                // the thickness. Diagonal geometry was already diced flat
                // by `model::RouteModel::build`, so only the two axis-
                // aligned cases arise here.
                let thickness = rb.inner.width().min(rb.inner.height());
                let center = rb.inner.center();
                let (p1, p2) = if rb.inner.width() >= rb.inner.height() {
                    (pcb_geom::Point::new(rb.inner.x1, center.y), pcb_geom::Point::new(rb.inner.x2, center.y))
                } else {
                    (pcb_geom::Point::new(center.x, rb.inner.y1), pcb_geom::Point::new(center.x, rb.inner.y2))
                };
                board.geometry.lines.push(pcb_geom::LineSeg { p1, p2, thickness, net, layer_group: rb.layer_group });
            }
            RouteBoxKind::Via => {
                board.geometry.vias.push(pcb_geom::Via {
                    center: rb.inner.center(),
                    copper_dia: rb.inner.width(),
                    drill_dia: rb.inner.width() / 2,
                    keepaway: (rb.outer.width() - rb.inner.width()) / 2,
                    net,
                });
            }
            _ => {}
        }
    }
    board.geometry.lines.len() != before_lines || board.geometry.vias.len() != before_vias
}
