// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PCB Polygon: a snap-rounding Boolean clipping engine over integer
//! board-space contours, plus the no-holes dicer consumers without
//! hole-aware rendering need.
//!
//! Ported from the polygon clipping core in `polygon.c`/`polygon1.c`
//! (the Nikitin-Leonov-Schutte algorithm, as implemented by Harry Eaton).
//! The original resolves self-intersections into Cross-Vertex-Connectivity
//! descriptors threaded through a shared vertex ring, then walks that ring
//! under a per-operation truth table. This crate keeps the same four-step
//! shape -- find crossings (including collinear-overlap ranges, via
//! [`collinear_overlap`]), snap-round them into both operands, label and
//! keep/reverse edges per the same truth table, walk the kept edges into
//! output rings -- but replaces the descriptor ring with two narrower
//! per-edge checks: an exact-coincidence lookup against the other
//! operand's edge set for the `SHARED`/`SHARED2` cases, falling back to a
//! direct point-in-region test at the edge's midpoint for the plain
//! `INSIDE`/`OUTSIDE` cases (see the [`boolean`] module for the detailed
//! correspondence). Two operands sharing an exact boundary segment --
//! coincident or partially overlapping edges -- are reconciled the same
//! way the original's `SHARED`/`SHARED2` CVC states are: `A xor A` is
//! `∅`, `(A ∪ B) \ B = A \ B`, and so on, even when `A` and `B` share
//! edges exactly.

mod boolean;
mod dicer;
mod geometry;
mod region;
mod segment;

pub use boolean::{
    and_subtract_consume, and_subtract_ref, intersection_consume, intersection_ref, subtract_consume,
    subtract_ref, union_consume, union_ref, xor_consume, xor_ref, AndSubtract, BoolOp, PolyArea,
};
pub use dicer::{dice, dice_all};
pub use geometry::{contour_bbox, edge_midpoint, is_ccw, point_in_contours, signed_area2, Contour};
pub use region::assemble_regions;
pub use segment::{collinear_overlap, dist2, segment_intersection};
