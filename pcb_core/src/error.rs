// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The error taxonomy, §7. Each variant is a *kind*, not a single call
//! site's failure: several different checks across the workspace can
//! surface the same [`CoreError`] variant.

use pcb_geom::NetId;

/// Everything that can go wrong at the `pcb_core` entry-point boundary.
///
/// `NoPathFound` is deliberately not how `pcb_router::route_one` reports an
/// unreachable target in its own internal search loop — there,
/// [`pcb_router::RouteOutcome::NoPathFound`] is the expected "mark net bad,
/// continue" case, not an error (§7: "No path found … Mark net bad;
/// continue next pass"). This variant exists for the boundary where that
/// fact becomes user-visible: a whole `auto_route` run that ends with one
/// or more nets still bad is reported through `RouteResult`, not `Err`,
/// but a caller that wants a hard failure on "any net unroutable" can
/// construct this from the result.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Caller passed impossible geometry or a null/empty region.
    #[error("bad parameter")]
    BadParameter,
    /// The polygon engine or an R-tree's growth failed to allocate.
    #[error("out of memory")]
    OutOfMemory,
    /// The router could not connect `net` under the current pass budget.
    #[error("no path found for net {net:?}")]
    NoPathFound {
        /// The net that could not be fully connected.
        net: NetId,
    },
    /// Degenerate input: zero-length line, zero-thickness polygon,
    /// impossible route style.
    #[error("degenerate input: {reason}")]
    DegenerateInput {
        /// Human-readable description of what made the input degenerate.
        reason: std::string::String,
    },
    /// The progress callback returned a cancel.
    #[error("operation cancelled")]
    UserCancel,
}
