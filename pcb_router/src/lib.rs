// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PCB Router: the gridless rectangle-expansion autorouter (§4.5), ported
//! from `autoroute.c`.
//!
//! Four pieces compose into the public entry point, [`pass::run_passes`]:
//!
//! - [`route_box`]: the unified [`route_box::RouteBox`] record (§3.4) and its
//!   generation-tagged [`route_box::RouteBoxArena`].
//! - [`net_rings`]: net/subnet connectivity, the union-find replacement for
//!   the original's four intrusive circular lists.
//! - [`model`]: data preparation — building a [`model::RouteModel`] (the
//!   per-layer-group R-trees, the MTS, and net/subnet stitching) from board
//!   objects, §4.5.1.
//! - [`cost`]: per-pass cost weights and the layer-group Manhattan-metric
//!   bias table, §4.5.3.
//! - [`expand`]: the rectangle-expansion engine, §4.5.2 steps 4-5.
//! - [`route_one`]: one source-to-targets search plus back-trace/emit,
//!   §4.5.2 steps 1-3 and 6-9.
//! - [`pass`]: the pass driver — net ordering, rip-up, and escalating
//!   conflict penalties across refinement and smoothing passes, §4.5.4.

pub mod cost;
pub mod expand;
pub mod model;
pub mod net_rings;
pub mod pass;
pub mod route_box;
pub mod route_one;

pub use cost::{LayerCost, PassCost};
pub use expand::{ExpansionArena, ExpansionAreaRecord, ExpansionId};
pub use model::{dice_diagonal_line, RouteModel, RouteSource, MAX_DICE_SEGMENTS};
pub use net_rings::NetRings;
pub use pass::{run_passes, PassReport, RouteProgress, RouterConfig};
pub use route_box::{RouteBox, RouteBoxArena, RouteBoxFlags, RouteBoxId, RouteBoxKind};
pub use route_one::{route_one, RouteOutcome, RouteRequest};
