// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thin free-function wrappers over [`pcb_clearance::ClearanceManager`],
//! §6. Each takes the whole [`Board`] rather than a manager-plus-source
//! pair, so callers don't need to know the manager lives inside the board
//! at all -- `board.clearance` and `board.geometry` are disjoint fields,
//! so borrowing one mutably and the other immutably in the same call is
//! just ordinary field-level borrow splitting, no interior mutability
//! required.

use pcb_clearance::{ClearedObject, PolygonHandle};

use crate::board::Board;

/// (Re)build `board`'s clip cache for the polygon at `handle` from
/// scratch, optionally also clearing against other planes
/// (`clear_poly`).
pub fn init_clip(board: &mut Board, handle: PolygonHandle, clear_poly: bool) {
    board.clearance.init_clip(&board.geometry, handle, clear_poly);
}

/// Subtract `object`'s clearance shape from every polygon it intrudes on.
pub fn clear_from_polygon(board: &mut Board, object: &ClearedObject) {
    board.clearance.clear_from_polygon(&board.geometry, object);
}

/// Undo a prior [`clear_from_polygon`] for `object`.
pub fn restore_to_polygon(board: &mut Board, object: &ClearedObject) {
    board.clearance.restore_to_polygon(&board.geometry, object);
}

/// Invoke `callback` once per polygon `object` intrudes on.
pub fn plows_polygon(board: &Board, object: &ClearedObject, callback: impl FnMut(PolygonHandle)) {
    board.clearance.plows_polygon(&board.geometry, object, callback);
}
