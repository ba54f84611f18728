// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The autoplace/autoroute core: a `Board` collaborator, a `Context` entry
//! point, run configuration, and the error taxonomy, §6-§7. Everything
//! below this crate (`pcb_geom`, `pcb_spatial`, `pcb_heap`, `pcb_polygon`,
//! `pcb_clearance`, `pcb_mts`, `pcb_placer`, `pcb_router`) is a standalone
//! algorithm library; `pcb_core` is the only crate that wires them together
//! into something a host application calls.

mod board;
mod clearance_ops;
mod config;
mod context;
mod error;

pub use board::{Board, Geometry};
pub use clearance_ops::{clear_from_polygon, init_clip, plows_polygon, restore_to_polygon};
pub use config::{Config, CostParameters, MAX_ROUTE_STYLES};
pub use context::{Context, PlaceResult, RouteResult};
pub use error::CoreError;
pub use pcb_clearance::{ClearedObject, PolygonHandle};

/// This crate's `Result` alias.
pub type Result<T> = std::result::Result<T, CoreError>;
