// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data preparation: building a [`RouteModel`] from board objects,
//! `autoroute.c`'s `Assign*`/`LoadRouteBox` family, §4.5.1.

use hashbrown::HashMap;

use pcb_geom::{Arc, Box, LineSeg, NetId, Pad, Pin, Point, PolygonPlane, RouteStyle, Side, Via};
use pcb_mts::{Mts, Parity};
use pcb_spatial::{Backend, EntryId, RTree};

use crate::net_rings::NetRings;
use crate::route_box::{RouteBox, RouteBoxArena, RouteBoxId, RouteBoxKind};

/// The longest a non-orthogonal line is diced into before its individual
/// pieces stop shrinking the AABB slack any further, §4.5.1.
pub const MAX_DICE_SEGMENTS: usize = 32;

/// What a board model must supply so `pcb_router` can build a
/// [`RouteModel`] without knowing how boards are actually stored --
/// the same "generalize the collaborator" shape `pcb_clearance::ClearanceSource`
/// uses.
pub trait RouteSource {
    /// The routable area.
    fn board_box(&self) -> Box;
    /// Number of copper layer groups (at least 1).
    fn layer_groups(&self) -> u16;
    /// The route style (thickness/via/keepaway) governing `net`.
    fn style_for_net(&self, net: NetId) -> RouteStyle;
    /// Every through-hole pin on the board.
    fn pins(&self) -> &[Pin];
    /// Every surface-mount pad.
    fn pads(&self) -> &[Pad];
    /// Every already-placed via.
    fn vias(&self) -> &[Via];
    /// Every fixed straight copper segment.
    fn lines(&self) -> &[LineSeg];
    /// Every fixed arc segment.
    fn arcs(&self) -> &[Arc];
    /// Every copper plane/pour.
    fn planes(&self) -> &[PolygonPlane];

    /// Which layer group a surface-mount object on `side` occupies
    /// (top = group 0, bottom = the last group).
    fn layer_group_for_side(&self, side: Side) -> u16 {
        match side {
            Side::Top => 0,
            Side::Bottom => self.layer_groups().saturating_sub(1),
        }
    }
}

/// Split a non-orthogonal line into at most [`MAX_DICE_SEGMENTS`] shorter
/// pieces so each piece's bounding box stays close to the line itself
/// (`autoroute.c`'s non-orthogonal-line dicing, §4.5.1). Orthogonal lines
/// are returned unchanged, as a single-element vector.
#[must_use]
pub fn dice_diagonal_line(line: LineSeg) -> std::vec::Vec<LineSeg> {
    if line.is_orthogonal() {
        return std::vec::Vec::from([line]);
    }
    let steps = MAX_DICE_SEGMENTS;
    let mut out = std::vec::Vec::with_capacity(steps);
    let mut prev = line.p1;
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let x = line.p1.x + ((f64::from(line.p2.x) - f64::from(line.p1.x)) * t).round() as i32;
        let y = line.p1.y + ((f64::from(line.p2.y) - f64::from(line.p1.y)) * t).round() as i32;
        let next = Point::new(x, y);
        if next != prev {
            out.push(LineSeg { p1: prev, p2: next, thickness: line.thickness, net: line.net, layer_group: line.layer_group });
            prev = next;
        }
    }
    if prev != line.p2 {
        out.push(LineSeg { p1: prev, p2: line.p2, thickness: line.thickness, net: line.net, layer_group: line.layer_group });
    }
    out
}

/// Owns the per-layer-group R-trees of [`RouteBox`]es, the route box arena,
/// the MTS free-space index, and net/subnet connectivity -- everything
/// `route_one` needs to search, and everything the pass driver mutates
/// between passes.
pub struct RouteModel {
    /// Fixed board geometry plus every permanent segment/via emitted so far.
    pub arena: RouteBoxArena,
    trees: HashMap<u16, RTree<RouteBoxId>>,
    tree_entries: HashMap<RouteBoxId, EntryId>,
    /// The parity-tagged free-space index for via placement.
    pub mts: Mts,
    /// Net and subnet connectivity.
    pub rings: NetRings,
    /// The routable area.
    pub board: Box,
    /// Number of copper layer groups.
    pub layer_groups: u16,
}

impl RouteModel {
    /// An empty model over `board` with `layer_groups` copper layers.
    #[must_use]
    pub fn new(board: Box, layer_groups: u16) -> Self {
        Self {
            arena: RouteBoxArena::new(),
            trees: HashMap::new(),
            tree_entries: HashMap::new(),
            mts: Mts::new(),
            rings: NetRings::new(0),
            board,
            layer_groups: layer_groups.max(1),
        }
    }

    /// The R-tree for `layer_group`, or `None` if nothing has ever been
    /// inserted on it.
    #[must_use]
    pub fn tree(&self, layer_group: u16) -> Option<&RTree<RouteBoxId>> {
        self.trees.get(&layer_group)
    }

    /// Insert a box into the arena and its layer group's tree, returning its
    /// handle.
    pub fn insert_box(&mut self, rb: RouteBox) -> RouteBoxId {
        let bounds = rb.blocking_box();
        let layer_group = rb.layer_group;
        let id = self.arena.insert(rb);
        let entry = self.trees.entry(layer_group).or_insert_with(RTree::new).insert(bounds, id);
        self.tree_entries.insert(id, entry);
        id
    }

    /// Remove a box from the arena and its tree, returning its former value.
    pub fn remove_box(&mut self, id: RouteBoxId) -> Option<RouteBox> {
        let rb = self.arena.remove(id)?;
        if let Some(entry) = self.tree_entries.remove(&id)
            && let Some(tree) = self.trees.get_mut(&rb.layer_group)
        {
            tree.remove(entry);
        }
        Some(rb)
    }

    fn insert_through_all_layers(
        &mut self,
        inner: Box,
        outer: Box,
        net: NetId,
        primary: RouteBoxKind,
        shadow: RouteBoxKind,
        net_boxes: &mut std::vec::Vec<RouteBoxId>,
    ) {
        let layer_groups = self.layer_groups;
        for group in 0..layer_groups {
            let kind = if group == 0 { primary } else { shadow };
            let id = self.insert_box(RouteBox::fixed(inner, outer, group, kind, net));
            net_boxes.push(id);
        }
    }

    /// Build a full model from `source`: §4.5.1's data preparation step.
    #[must_use]
    pub fn build(source: &dyn RouteSource) -> Self {
        let board = source.board_box();
        let layer_groups = source.layer_groups();
        let mut model = Self::new(board, layer_groups);
        let mut net_boxes: HashMap<NetId, std::vec::Vec<RouteBoxId>> = HashMap::new();

        for pin in source.pins() {
            let style = source.style_for_net(pin.net);
            let inner = pin.bbox();
            let outer = inner.inflate(style.bloat());
            model.mts.add(outer, Parity::Fixed, style.keepaway);
            let entry = net_boxes.entry(pin.net).or_default();
            model.insert_through_all_layers(inner, outer, pin.net, RouteBoxKind::Pin, RouteBoxKind::Pin, entry);
        }

        for via in source.vias() {
            let style = source.style_for_net(via.net);
            let inner = via.bbox();
            let outer = inner.inflate(style.keepaway);
            model.mts.add(outer, Parity::Fixed, style.keepaway);
            let entry = net_boxes.entry(via.net).or_default();
            model.insert_through_all_layers(inner, outer, via.net, RouteBoxKind::Via, RouteBoxKind::ViaShadow, entry);
        }

        for pad in source.pads() {
            let style = source.style_for_net(pad.net);
            let inner = pad.bbox();
            let outer = inner.inflate(style.bloat());
            let layer_group = source.layer_group_for_side(pad.side);
            model.mts.add(outer, Parity::Fixed, style.keepaway);
            let id = model.insert_box(RouteBox::fixed(inner, outer, layer_group, RouteBoxKind::Pad, pad.net));
            net_boxes.entry(pad.net).or_default().push(id);
        }

        for line in source.lines() {
            let style = source.style_for_net(line.net);
            for piece in dice_diagonal_line(*line) {
                let inner = piece.bbox();
                let outer = inner.inflate(style.keepaway);
                let mut rb = RouteBox::fixed(inner, outer, piece.layer_group, RouteBoxKind::Line, piece.net);
                if piece.is_bl_to_ur() {
                    rb.flags |= crate::route_box::RouteBoxFlags::BL_TO_UR;
                }
                model.mts.add(outer, Parity::Fixed, style.keepaway);
                let id = model.insert_box(rb);
                net_boxes.entry(piece.net).or_default().push(id);
            }
        }

        for arc in source.arcs() {
            let style = source.style_for_net(arc.net);
            let inner = arc.bbox();
            let outer = inner.inflate(style.keepaway);
            model.mts.add(outer, Parity::Fixed, style.keepaway);
            let id = model.insert_box(RouteBox::fixed(inner, outer, arc.layer_group, RouteBoxKind::Other, arc.net));
            net_boxes.entry(arc.net).or_default().push(id);
        }

        for plane in source.planes() {
            let inner = plane.bbox();
            let mut rb = RouteBox::fixed(inner, inner, plane.layer_group, RouteBoxKind::Plane, plane.net);
            rb.flags |= crate::route_box::RouteBoxFlags::CLEAR_POLY;
            let id = model.insert_box(rb);
            net_boxes.entry(plane.net).or_default().push(id);
        }

        model.stitch_nets(&net_boxes);
        model
    }

    /// Every live route box belonging to `net`.
    #[must_use]
    pub fn net_route_boxes(&self, net: NetId) -> std::vec::Vec<RouteBoxId> {
        self.arena.iter().filter(|(_, rb)| rb.net == Some(net)).map(|(id, _)| id).collect()
    }

    /// One representative box per distinct original subnet grouping among
    /// `boxes` -- the terminals the pass driver must connect, §4.5.4.
    pub fn subnet_representatives(&mut self, boxes: &[RouteBoxId]) -> std::vec::Vec<RouteBoxId> {
        let mut reps: std::vec::Vec<RouteBoxId> = std::vec::Vec::new();
        for &id in boxes {
            let already_known = reps.iter().any(|&rep| self.rings.same_original_subnet(rep, id));
            if !already_known {
                reps.push(id);
            }
        }
        reps
    }

    /// Remove every non-fixed (router-emitted) box belonging to `net`:
    /// `force` rips up unconditionally (a smoothing pass's `rip_always`),
    /// otherwise only boxes flagged [`crate::route_box::RouteBoxFlags::IS_BAD`]
    /// are ripped.
    pub fn rip_up_net(&mut self, net: NetId, force: bool) {
        let doomed: std::vec::Vec<RouteBoxId> = self
            .arena
            .iter()
            .filter(|(_, rb)| {
                rb.net == Some(net)
                    && !rb.flags.contains(crate::route_box::RouteBoxFlags::FIXED)
                    && (force || rb.flags.contains(crate::route_box::RouteBoxFlags::IS_BAD))
            })
            .map(|(id, _)| id)
            .collect();
        for id in doomed {
            self.remove_box(id);
        }
    }

    fn stitch_nets(&mut self, net_boxes: &HashMap<NetId, std::vec::Vec<RouteBoxId>>) {
        self.rings = NetRings::new(self.arena.slot_capacity());
        for (net, ids) in net_boxes {
            if ids.is_empty() {
                continue;
            }
            self.rings.register_net_representative(*net, ids[0]);
            for pair in ids.windows(2) {
                self.rings.join_same_net(pair[0], pair[1]);
            }
            for i in 0..ids.len() {
                for j in (i + 1)..ids.len() {
                    let (a, b) = (ids[i], ids[j]);
                    let touching = match (self.arena.get(a), self.arena.get(b)) {
                        (Some(ra), Some(rb)) => ra.layer_group == rb.layer_group && ra.inner.intersects(rb.inner),
                        _ => false,
                    };
                    if touching {
                        self.rings.join_original_subnet(a, b);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcb_geom::{mil_to_coord, PinShape};

    struct FakeBoard {
        pins: std::vec::Vec<Pin>,
        pads: std::vec::Vec<Pad>,
        style: RouteStyle,
    }

    impl RouteSource for FakeBoard {
        fn board_box(&self) -> Box {
            Box::new(0, 0, mil_to_coord(1_000), mil_to_coord(1_000))
        }
        fn layer_groups(&self) -> u16 {
            2
        }
        fn style_for_net(&self, _net: NetId) -> RouteStyle {
            self.style
        }
        fn pins(&self) -> &[Pin] {
            &self.pins
        }
        fn pads(&self) -> &[Pad] {
            &self.pads
        }
        fn vias(&self) -> &[Via] {
            &[]
        }
        fn lines(&self) -> &[LineSeg] {
            &[]
        }
        fn arcs(&self) -> &[Arc] {
            &[]
        }
        fn planes(&self) -> &[PolygonPlane] {
            &[]
        }
    }

    #[test]
    fn pins_land_on_every_layer_group_and_join_same_net() {
        let board = FakeBoard {
            pins: std::vec::Vec::from([
                Pin { center: Point::new(100, 100), copper_dia: 2000, drill_dia: 800, keepaway: 500, shape: PinShape::Round, net: NetId(1), thermal: false },
                Pin { center: Point::new(9000, 100), copper_dia: 2000, drill_dia: 800, keepaway: 500, shape: PinShape::Round, net: NetId(1), thermal: false },
            ]),
            pads: std::vec::Vec::new(),
            style: RouteStyle::default(),
        };
        let mut model = RouteModel::build(&board);
        assert_eq!(model.arena.len(), 4, "two pins x two layer groups");
        assert!(model.tree(0).is_some());
        assert!(model.tree(1).is_some());

        let ids: std::vec::Vec<RouteBoxId> = model.arena.iter().map(|(id, _)| id).collect();
        assert!(model.rings.same_net(ids[0], ids[ids.len() - 1]));
    }

    #[test]
    fn diagonal_line_dices_into_multiple_pieces() {
        let line = LineSeg { p1: Point::new(0, 0), p2: Point::new(1000, 1000), thickness: 100, net: NetId(0), layer_group: 0 };
        let pieces = dice_diagonal_line(line);
        assert!(pieces.len() > 1);
        assert!(pieces.len() <= MAX_DICE_SEGMENTS);
        assert_eq!(pieces[0].p1, line.p1);
        assert_eq!(pieces.last().unwrap().p2, line.p2);
    }

    #[test]
    fn orthogonal_line_is_not_diced() {
        let line = LineSeg { p1: Point::new(0, 0), p2: Point::new(1000, 0), thickness: 100, net: NetId(0), layer_group: 0 };
        assert_eq!(dice_diagonal_line(line), std::vec::Vec::from([line]));
    }
}
