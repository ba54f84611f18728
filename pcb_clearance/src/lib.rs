// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PCB Clearance: the polygon-clearance manager ("plow"), ported from
//! `polygon.c`'s `InitClip`/`clearPoly`/`ClearFromPolygon`/
//! `RestoreToPolygon`/`PlowsPolygon`/`Unsubtract*` family.
//!
//! A copper-plane polygon's *clipped* region is its own outline minus the
//! union of every intruding pin, pad, via, line, and arc's clearance
//! shape. Building that from scratch is expensive (a full Boolean pass per
//! intrusion), so the original batches same-kind intrusions into one
//! union before a single subtract -- up to 100 pins/vias, or 20 lines, per
//! flush. This crate keeps that batching exactly (see [`manager`]) and adds
//! the same incremental "plow" the original supports for single-object
//! moves: `clear_from_polygon` subtracts one object immediately from every
//! polygon it intrudes, and `restore_to_polygon` adds it back (a bloated
//! bounding box intersected with the polygon's untouched original shape,
//! unioned back in) then re-clips a tight region around it so the seam
//! heals without a visible gap.
//!
//! [`thermal`] builds the cross/diagonal stub pattern that reconnects a
//! thermally-relieved pin to a plane through its clearance hole.

mod manager;
mod shapes;
mod thermal;

pub use manager::{ClearanceManager, ClearanceSource, ClearedObject, LayerGroupFilter, PolygonHandle};
pub use shapes::{arc_poly, box_poly_bloated, line_poly, pad_poly, pin_poly, via_poly};
pub use thermal::{thermal_relief, Pattern};
