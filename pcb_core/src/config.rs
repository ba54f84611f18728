// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run configuration, §6 "Configuration". Replaces the original's
//! board-global `Settings` fields with plain, explicitly-threaded data —
//! the DESIGN NOTES row "Global mutable state → thread a Context struct".

use pcb_geom::RouteStyle;

pub use pcb_placer::CostParameters;

/// At most four named route styles, matching the PCB editor convention of
/// a small fixed palette rather than one style per net.
pub const MAX_ROUTE_STYLES: usize = 4;

/// Run-wide settings for both the autoplacer and the autorouter.
#[derive(Clone, Debug)]
pub struct Config {
    /// Named route styles, index 0 used unless a net specifies otherwise.
    pub route_styles: [RouteStyle; MAX_ROUTE_STYLES],
    /// Refinement passes the router runs before smoothing (default 12).
    pub passes: u32,
    /// Smoothing passes after refinement (default 1).
    pub smoothes: u32,
    /// Whether to re-render routed geometry incrementally as it is placed,
    /// rather than only once at the end (a display hint the core itself
    /// does not act on; carried through so a caller wiring up a live view
    /// can read it from one place).
    pub live_route: bool,
    /// Whether the router may offer layer-change (via) edges at all.
    pub via_on: bool,
    /// Whether the bottom side of the board should be treated as the
    /// "primary" viewing side when resolving SMD layer groups (a display
    /// convention carried through unchanged, not acted on by the core).
    pub view_bottom: bool,
    /// Autoplacer cost-function weights (§4.4.1).
    pub cost_parameters: CostParameters,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            route_styles: [RouteStyle::default(); MAX_ROUTE_STYLES],
            passes: 12,
            smoothes: 1,
            live_route: false,
            via_on: true,
            view_bottom: false,
            cost_parameters: CostParameters::default(),
        }
    }
}
