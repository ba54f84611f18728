// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The board model: the one collaborator `pcb_router` and `pcb_clearance`
//! both want, implementing their `RouteSource`/`ClearanceSource` traits
//! over one shared store of board objects. `spec.md` §6 calls this "a
//! separate collaborator with its own file format (out of scope)" — this
//! type is the in-memory shape that file format would deserialize into,
//! not a persistence layer.

use hashbrown::HashMap;

use pcb_clearance::{ClearanceSource, ClearedObject, LayerGroupFilter, PolygonHandle};
use pcb_geom::{Arc, Box, Handle, LineSeg, NetId, Pad, Pin, PolygonPlane, RouteStyle, Via};
use pcb_placer::{Component, NetList};
use pcb_router::RouteSource;

/// The board-object fields [`RouteSource`] and [`ClearanceSource`] read.
/// Split out of [`Board`] so `board.clearance.init_clip(&board.geometry,
/// ...)` can borrow the clearance cache mutably and the geometry
/// immutably at the same time -- `clearance_ops` relies on this split.
#[derive(Clone, Debug)]
pub struct Geometry {
    /// The routable area.
    pub board_box: Box,
    /// Number of copper layer groups.
    pub layer_groups: u16,
    /// Through-hole pins.
    pub pins: std::vec::Vec<Pin>,
    /// Surface-mount pads.
    pub pads: std::vec::Vec<Pad>,
    /// Already-placed vias.
    pub vias: std::vec::Vec<Via>,
    /// Fixed straight copper segments.
    pub lines: std::vec::Vec<LineSeg>,
    /// Fixed arc segments.
    pub arcs: std::vec::Vec<Arc>,
    /// Copper planes/pours, indexed by slot for [`PolygonHandle`].
    pub polygons: std::vec::Vec<PolygonPlane>,
    /// Per-net route style override; nets absent from this map use
    /// `route_styles[0]`.
    pub net_style: HashMap<NetId, RouteStyle>,
}

/// Every board object the core's entry points operate on, plus the
/// placer's component/net view of the same board.
#[derive(Clone, Debug)]
pub struct Board {
    /// Pins/pads/vias/lines/arcs/planes.
    pub geometry: Geometry,
    /// Incremental polygon-clearance cache, keyed by `geometry.polygons`
    /// slot.
    pub clearance: pcb_clearance::ClearanceManager,
    /// Placeable components, for the autoplacer.
    pub components: std::vec::Vec<Component>,
    /// The net list the autoplacer costs against.
    pub nets: NetList,
    /// Which components are selected (eligible to move/route), by index
    /// into `components`.
    pub selected: std::vec::Vec<usize>,
}

impl Board {
    /// An empty board over `board_box` with `layer_groups` copper layers.
    #[must_use]
    pub fn new(board_box: Box, layer_groups: u16) -> Self {
        Self {
            geometry: Geometry {
                board_box,
                layer_groups: layer_groups.max(1),
                pins: std::vec::Vec::new(),
                pads: std::vec::Vec::new(),
                vias: std::vec::Vec::new(),
                lines: std::vec::Vec::new(),
                arcs: std::vec::Vec::new(),
                polygons: std::vec::Vec::new(),
                net_style: HashMap::new(),
            },
            clearance: pcb_clearance::ClearanceManager::new(),
            components: std::vec::Vec::new(),
            nets: NetList::default(),
            selected: std::vec::Vec::new(),
        }
    }

    /// Add a copper plane, returning a stable handle to it.
    pub fn push_polygon(&mut self, plane: PolygonPlane) -> PolygonHandle {
        let slot = self.geometry.polygons.len() as u32;
        self.geometry.polygons.push(plane);
        Handle::new(slot, 1)
    }

    /// Every distinct net referenced by any pin, pad, via, or line on the
    /// board, in first-seen order (deterministic, not hash-order-dependent).
    #[must_use]
    pub fn all_nets(&self) -> std::vec::Vec<NetId> {
        let mut seen = hashbrown::HashSet::new();
        let mut out = std::vec::Vec::new();
        let mut push = |net: NetId| {
            if seen.insert(net) {
                out.push(net);
            }
        };
        for p in &self.geometry.pins {
            push(p.net);
        }
        for p in &self.geometry.pads {
            push(p.net);
        }
        for v in &self.geometry.vias {
            push(v.net);
        }
        for l in &self.geometry.lines {
            push(l.net);
        }
        out
    }
}

impl RouteSource for Board {
    fn board_box(&self) -> Box {
        self.geometry.board_box()
    }

    fn layer_groups(&self) -> u16 {
        self.geometry.layer_groups()
    }

    fn style_for_net(&self, net: NetId) -> RouteStyle {
        self.geometry.style_for_net(net)
    }

    fn pins(&self) -> &[Pin] {
        self.geometry.pins()
    }

    fn pads(&self) -> &[Pad] {
        self.geometry.pads()
    }

    fn vias(&self) -> &[Via] {
        self.geometry.vias()
    }

    fn lines(&self) -> &[LineSeg] {
        self.geometry.lines()
    }

    fn arcs(&self) -> &[Arc] {
        self.geometry.arcs()
    }

    fn planes(&self) -> &[PolygonPlane] {
        self.geometry.planes()
    }
}

impl ClearanceSource for Board {
    fn polygon(&self, handle: PolygonHandle) -> &PolygonPlane {
        self.geometry.polygon(handle)
    }

    fn polygons_in(&self, region: Box, filter: LayerGroupFilter) -> std::vec::Vec<PolygonHandle> {
        self.geometry.polygons_in(region, filter)
    }

    fn intruders_in(&self, region: Box, filter: LayerGroupFilter, exclude: Option<&ClearedObject>) -> std::vec::Vec<ClearedObject> {
        self.geometry.intruders_in(region, filter, exclude)
    }
}

impl RouteSource for Geometry {
    fn board_box(&self) -> Box {
        self.board_box
    }

    fn layer_groups(&self) -> u16 {
        self.layer_groups
    }

    fn style_for_net(&self, net: NetId) -> RouteStyle {
        self.net_style.get(&net).copied().unwrap_or_default()
    }

    fn pins(&self) -> &[Pin] {
        &self.pins
    }

    fn pads(&self) -> &[Pad] {
        &self.pads
    }

    fn vias(&self) -> &[Via] {
        &self.vias
    }

    fn lines(&self) -> &[LineSeg] {
        &self.lines
    }

    fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    fn planes(&self) -> &[PolygonPlane] {
        &self.polygons
    }
}

fn matches_filter(layer_group: u16, filter: LayerGroupFilter) -> bool {
    match filter {
        LayerGroupFilter::All => true,
        LayerGroupFilter::One(group) => group == layer_group,
    }
}

impl ClearanceSource for Geometry {
    fn polygon(&self, handle: PolygonHandle) -> &PolygonPlane {
        &self.polygons[handle.slot()]
    }

    fn polygons_in(&self, region: Box, filter: LayerGroupFilter) -> std::vec::Vec<PolygonHandle> {
        self.polygons
            .iter()
            .enumerate()
            .filter(|(_, plane)| matches_filter(plane.layer_group, filter) && plane.bbox().intersects(region))
            .map(|(i, _)| Handle::new(i as u32, 1))
            .collect()
    }

    fn intruders_in(&self, region: Box, filter: LayerGroupFilter, exclude: Option<&ClearedObject>) -> std::vec::Vec<ClearedObject> {
        let mut out = std::vec::Vec::new();
        for p in &self.pins {
            let obj = ClearedObject::Pin(*p);
            if matches_filter(0, filter) && p.bbox().intersects(region) && Some(&obj) != exclude {
                out.push(obj);
            }
        }
        for p in &self.pads {
            let group = self.layer_group_for_side(p.side);
            let obj = ClearedObject::Pad(*p);
            if matches_filter(group, filter) && p.bbox().intersects(region) && Some(&obj) != exclude {
                out.push(obj);
            }
        }
        for v in &self.vias {
            let obj = ClearedObject::Via(*v);
            if matches_filter(0, filter) && v.bbox().intersects(region) && Some(&obj) != exclude {
                out.push(obj);
            }
        }
        for l in &self.lines {
            let obj = ClearedObject::Line(*l);
            if matches_filter(l.layer_group, filter) && l.bbox().intersects(region) && Some(&obj) != exclude {
                out.push(obj);
            }
        }
        for a in &self.arcs {
            let obj = ClearedObject::Arc(*a);
            if matches_filter(a.layer_group, filter) && a.bbox().intersects(region) && Some(&obj) != exclude {
                out.push(obj);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcb_geom::{mil_to_coord, PinShape};

    fn sample_board() -> Board {
        let mut board = Board::new(Box::new(0, 0, mil_to_coord(1_000), mil_to_coord(1_000)), 1);
        board.geometry.pins.push(Pin {
            center: pcb_geom::Point::new(100, 100),
            copper_dia: 2000,
            drill_dia: 800,
            keepaway: 500,
            shape: PinShape::Round,
            net: NetId(1),
            thermal: false,
        });
        board
    }

    #[test]
    fn all_nets_deduplicates() {
        let mut board = sample_board();
        let p = board.geometry.pins[0];
        board.geometry.pins.push(p);
        assert_eq!(board.all_nets(), std::vec::Vec::from([NetId(1)]));
    }

    #[test]
    fn intruders_in_excludes_the_named_object() {
        let board = sample_board();
        let region = Box::new(0, 0, mil_to_coord(200), mil_to_coord(200));
        let all = board.intruders_in(region, LayerGroupFilter::All, None);
        assert_eq!(all.len(), 1);
        let excluded = board.intruders_in(region, LayerGroupFilter::All, Some(&all[0]));
        assert!(excluded.is_empty());
    }
}
