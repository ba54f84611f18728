// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PCB Placer: the simulated-annealing autoplacer (§4.4), built from
//! `autoplace.c`.
//!
//! Three pieces compose into the public entry point,
//! [`auto_place_selected`]:
//!
//! - [`component`]: the placer's own lightweight component/pad model and
//!   the rotate/flip/translate geometry that derives a component's world
//!   position and bounding box from it.
//! - [`netlist`]: the net list the cost function scores against, plus the
//!   `UpdateXY` position cache that keeps per-net bounding boxes cheap to
//!   recompute after every trial move.
//! - [`cost`]: the composite cost function (`W + delta1..delta5`) and its
//!   tunable [`cost::CostParameters`].
//! - [`perturb`]: shift/rotate/flip/exchange perturbation generation and
//!   (un)application.
//! - [`anneal`]: the outer annealing loop tying the above together.

pub mod anneal;
pub mod component;
pub mod cost;
pub mod netlist;
pub mod perturb;

pub use anneal::{auto_place_selected, AnnealProgress, AnnealResult};
pub use component::{Component, ComponentId, LocalPad, Rotation};
pub use cost::{compute_cost, cost_breakdown, CostBreakdown, CostParameters};
pub use netlist::{Net, NetList, PinRef};
pub use perturb::{affected_components, apply_perturbation, create_perturbation, Perturbation};
