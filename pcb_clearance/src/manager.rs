// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The clearance manager itself: `init_clip`/`clear_from_polygon`/
//! `restore_to_polygon`/`plows_polygon`, ported from `polygon.c`'s
//! `InitClip`/`clearPoly`/`ClearFromPolygon`/`RestoreToPolygon`/
//! `PlowsPolygon`/`subtract_plow`/`add_plow`/`Unsubtract` family.
//!
//! The original dispatches over a `(type, ptr1, ptr2)` triple of raw
//! pointers and a board-global `Data` struct holding every object tree.
//! This module replaces that with a [`ClearedObject`] enum (one variant per
//! clearable kind) and a [`ClearanceSource`] trait the board model
//! implements, so `pcb_clearance` itself stays ignorant of how pins, pads,
//! and polygons are actually stored -- the same "generalize the teacher's
//! pluggable backend" shape `pcb_spatial::Backend` already uses.

use hashbrown::HashMap;

use pcb_geom::{Arc, Box, Coord, Handle, LineSeg, Pad, Pin, PolygonPlane, Via};
use pcb_polygon::PolyArea;

use crate::shapes::{arc_poly, box_poly_bloated, line_poly, pad_poly, pin_poly, via_poly};

const UNSUBTRACT_BLOAT: Coord = 10;
const PIN_VIA_BATCH_SIZE: usize = 100;
const LINE_BATCH_SIZE: usize = 20;

/// Handle into a board's polygon table.
pub type PolygonHandle = Handle<PolygonPlane>;

/// One clearable board object, replacing the original's
/// `(type, ptr1, ptr2)` dispatch triple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClearedObject {
    /// A through-hole pin.
    Pin(Pin),
    /// A surface-mount pad.
    Pad(Pad),
    /// A router-placed via.
    Via(Via),
    /// A straight copper segment.
    Line(LineSeg),
    /// A circular arc segment.
    Arc(Arc),
}

impl ClearedObject {
    /// The object's unbloated bounding box.
    #[must_use]
    pub fn bbox(&self) -> Box {
        match self {
            Self::Pin(p) => p.bbox(),
            Self::Pad(p) => p.bbox(),
            Self::Via(v) => v.bbox(),
            Self::Line(l) => l.bbox(),
            Self::Arc(a) => a.bbox(),
        }
    }

    /// The object's own per-net keepaway, or `None` if it never clears
    /// anything (`Clearance == 0` in the original, meaning "not flagged to
    /// clear polygons").
    #[must_use]
    pub fn keepaway(&self) -> Option<Coord> {
        match self {
            Self::Pin(p) if p.keepaway > 0 => Some(p.keepaway),
            Self::Via(v) if v.keepaway > 0 => Some(v.keepaway),
            Self::Pad(p) if p.keepaway > 0 => Some(p.keepaway),
            Self::Line(_) | Self::Arc(_) => Some(0),
            _ => None,
        }
    }

    fn clearance_poly(&self, extra: Coord) -> PolyArea {
        match self {
            Self::Pin(p) => pin_poly(*p, extra),
            Self::Pad(p) => pad_poly(*p, extra),
            Self::Via(v) => via_poly(*v, extra),
            Self::Line(l) => line_poly(*l, extra),
            Self::Arc(a) => arc_poly(a, extra),
        }
    }

    /// Whether this kind batches multiple intrusions before a single
    /// subtract (pins/vias, lines) or is subtracted immediately, one at a
    /// time (pads, arcs) -- mirrors `clearPoly`'s mix of `pin_sub_callback`/
    /// `line_sub_callback` (batched) and `pad_sub_callback`/
    /// `arc_sub_callback` (immediate).
    fn batch_kind(&self) -> BatchKind {
        match self {
            Self::Pin(_) | Self::Via(_) => BatchKind::PinOrVia,
            Self::Line(_) => BatchKind::Line,
            Self::Pad(_) | Self::Arc(_) => BatchKind::Immediate,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BatchKind {
    PinOrVia,
    Line,
    Immediate,
}

/// Which copper layer groups an object intrudes on: `All` for objects that
/// punch through every layer (pins, vias), `One` for objects confined to a
/// single group (pads, lines, arcs).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerGroupFilter {
    /// Every copper layer group.
    All,
    /// Exactly one layer group.
    One(u16),
}

/// What the board model must provide so `pcb_clearance` can find
/// intruders and intruded polygons without knowing how either is stored.
pub trait ClearanceSource {
    /// The polygon at `handle`, for rebuilding its clipped region.
    fn polygon(&self, handle: PolygonHandle) -> &PolygonPlane;

    /// Every clearing-flagged polygon whose bounding box intersects
    /// `region` and whose layer group is compatible with `filter`
    /// (`r_search` over each group's `polygon_tree` in `PlowsPolygon`).
    fn polygons_in(&self, region: Box, filter: LayerGroupFilter) -> std::vec::Vec<PolygonHandle>;

    /// Every clearance-relevant object intersecting `region` on a layer
    /// group compatible with `filter`, for the full-rebuild path
    /// (`clearPoly`'s five `r_search` calls).
    fn intruders_in(&self, region: Box, filter: LayerGroupFilter, exclude: Option<&ClearedObject>) -> std::vec::Vec<ClearedObject>;
}

#[derive(Debug)]
struct ClipEntry {
    original: std::vec::Vec<PolyArea>,
    clipped: std::vec::Vec<PolyArea>,
}

/// Owns every polygon's clipped region (`polygon.c`'s `PolygonType::Clipped`
/// field, moved out into its own cache -- see [`pcb_geom::PolygonPlane`]'s
/// doc comment for why).
#[derive(Debug, Default)]
pub struct ClearanceManager {
    entries: HashMap<PolygonHandle, ClipEntry>,
}

impl ClearanceManager {
    /// A manager with no cached clipped regions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The polygon's current clipped region, or `None` if it has never
    /// been clipped.
    #[must_use]
    pub fn clipped(&self, handle: PolygonHandle) -> Option<&[PolyArea]> {
        self.entries.get(&handle).map(|e| e.clipped.as_slice())
    }

    /// `InitClip`: (re)build `handle`'s clipped region from scratch. Always
    /// idempotent -- it starts from the polygon's own outline every time,
    /// discarding whatever was cached before.
    pub fn init_clip(&mut self, source: &dyn ClearanceSource, handle: PolygonHandle, clear_poly: bool) {
        let polygon = source.polygon(handle);
        let original = std::vec::Vec::from([PolyArea {
            outer: polygon.outer.clone(),
            holes: polygon.holes.clone(),
        }]);
        self.entries.insert(
            handle,
            ClipEntry {
                original: original.clone(),
                clipped: original,
            },
        );
        if clear_poly {
            self.rebuild(source, handle, None, 0);
        }
    }

    /// `clearPoly`: rebuild `handle`'s clipped region against every
    /// intruder in `here.inflate(expand)` (or the whole polygon bbox if
    /// `here` is `None`), batching pin/via and line subtractions.
    fn rebuild(&mut self, source: &dyn ClearanceSource, handle: PolygonHandle, here: Option<Box>, expand: Coord) {
        let polygon = source.polygon(handle);
        let layer_group = polygon.layer_group;
        let bbox = polygon.bbox();
        let region = match here {
            Some(b) => b.intersection(bbox).unwrap_or(bbox),
            None => bbox,
        }
        .inflate(expand);

        let intruders = source.intruders_in(region, LayerGroupFilter::One(layer_group), None);

        let mut pin_via_batch: std::vec::Vec<PolyArea> = std::vec::Vec::new();
        let mut line_batch: std::vec::Vec<PolyArea> = std::vec::Vec::new();

        for object in intruders {
            let Some(keepaway) = object.keepaway() else {
                continue;
            };
            if keepaway == 0 && !matches!(object, ClearedObject::Line(_) | ClearedObject::Arc(_)) {
                continue;
            }
            let shape = object.clearance_poly(keepaway);
            match object.batch_kind() {
                BatchKind::PinOrVia => {
                    pin_via_batch.push(shape);
                    if pin_via_batch.len() == PIN_VIA_BATCH_SIZE {
                        self.flush(handle, &mut pin_via_batch);
                    }
                }
                BatchKind::Line => {
                    line_batch.push(shape);
                    if line_batch.len() == LINE_BATCH_SIZE {
                        self.flush(handle, &mut line_batch);
                    }
                }
                BatchKind::Immediate => {
                    let mut single = std::vec::Vec::from([shape]);
                    self.flush(handle, &mut single);
                }
            }
        }
        self.flush(handle, &mut line_batch);
        self.flush(handle, &mut pin_via_batch);
    }

    fn flush(&mut self, handle: PolygonHandle, batch: &mut std::vec::Vec<PolyArea>) {
        if batch.is_empty() {
            return;
        }
        let mut united = std::vec::Vec::new();
        for shape in batch.drain(..) {
            united = pcb_polygon::union_consume(united, std::vec::Vec::from([shape]));
        }
        let entry = self
            .entries
            .entry(handle)
            .or_insert_with(|| ClipEntry { original: std::vec::Vec::new(), clipped: std::vec::Vec::new() });
        entry.clipped = pcb_polygon::subtract_ref(&entry.clipped, &united);
        if entry.clipped.is_empty() {
            log::warn!("polygon {handle:?} cleared out of existence by intruding clearance shapes");
        }
    }

    /// `Unsubtract`: intersect `np` with the polygon's untouched original
    /// shape, then union the result back into the clipped region.
    fn unsubtract(&mut self, handle: PolygonHandle, np: std::vec::Vec<PolyArea>) {
        let Some(entry) = self.entries.get_mut(&handle) else {
            return;
        };
        let clipped_np = pcb_polygon::intersection_ref(&np, &entry.original);
        entry.clipped = pcb_polygon::union_ref(&entry.clipped, &clipped_np);
    }

    /// `PlowsPolygon`: invoke `callback` once per clearing-flagged polygon
    /// whose tree search intersects `object`'s bounding box on a compatible
    /// layer group.
    pub fn plows_polygon(&self, source: &dyn ClearanceSource, object: &ClearedObject, mut callback: impl FnMut(PolygonHandle)) {
        let filter = match object {
            ClearedObject::Pin(_) | ClearedObject::Via(_) => LayerGroupFilter::All,
            ClearedObject::Pad(p) => LayerGroupFilter::One(pad_silk_group(p)),
            ClearedObject::Line(l) => LayerGroupFilter::One(l.layer_group),
            ClearedObject::Arc(a) => LayerGroupFilter::One(a.layer_group),
        };
        for handle in source.polygons_in(object.bbox(), filter) {
            callback(handle);
        }
    }

    /// `ClearFromPolygon`/`subtract_plow`: immediately subtract `object`'s
    /// clearance shape from every polygon it intrudes.
    pub fn clear_from_polygon(&mut self, source: &dyn ClearanceSource, object: &ClearedObject) {
        let Some(keepaway) = object.keepaway() else {
            return;
        };
        let shape = object.clearance_poly(keepaway);
        let intruded: std::vec::Vec<PolygonHandle> = {
            let mut out = std::vec::Vec::new();
            self.plows_polygon(source, object, |h| out.push(h));
            out
        };
        for handle in intruded {
            let entry = self
                .entries
                .entry(handle)
                .or_insert_with(|| ClipEntry { original: std::vec::Vec::new(), clipped: std::vec::Vec::new() });
            entry.clipped = pcb_polygon::subtract_ref(&entry.clipped, std::slice::from_ref(&shape));
        }
    }

    /// `RestoreToPolygon`/`add_plow`: add `object`'s bounding box back into
    /// every polygon it used to intrude, then re-subtract a tightened
    /// region around it so the boundary heals cleanly (`UnsubtractPin`'s
    /// bloat-then-reclip pattern).
    pub fn restore_to_polygon(&mut self, source: &dyn ClearanceSource, object: &ClearedObject) {
        let bloated = box_poly_bloated(object.bbox(), UNSUBTRACT_BLOAT);
        let intruded: std::vec::Vec<PolygonHandle> = {
            let mut out = std::vec::Vec::new();
            self.plows_polygon(source, object, |h| out.push(h));
            out
        };
        for handle in intruded {
            self.unsubtract(handle, std::vec::Vec::from([bloated.clone()]));
            self.rebuild(source, handle, Some(object.bbox()), 2 * UNSUBTRACT_BLOAT);
        }
    }
}

/// A pad's silk-side group is opaque to this crate (it depends on the
/// board's layer-group table); until a board model supplies one, fall back
/// to a stable sentinel derived from the pad's side so at least same-side
/// pads find each other's polygons in tests.
fn pad_silk_group(pad: &Pad) -> u16 {
    match pad.side {
        pcb_geom::Side::Top => 0,
        pcb_geom::Side::Bottom => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcb_geom::{NetId, Point};

    struct FakeBoard {
        polygon: PolygonPlane,
        vias: std::vec::Vec<Via>,
    }

    impl ClearanceSource for FakeBoard {
        fn polygon(&self, _handle: PolygonHandle) -> &PolygonPlane {
            &self.polygon
        }

        fn polygons_in(&self, _region: Box, _filter: LayerGroupFilter) -> std::vec::Vec<PolygonHandle> {
            std::vec::Vec::from([PolygonHandle::new(0, 1)])
        }

        fn intruders_in(&self, region: Box, _filter: LayerGroupFilter, _exclude: Option<&ClearedObject>) -> std::vec::Vec<ClearedObject> {
            self.vias
                .iter()
                .filter(|v| v.bbox().intersects(region))
                .map(|v| ClearedObject::Via(*v))
                .collect()
        }
    }

    fn rect(x1: i32, y1: i32, x2: i32, y2: i32) -> std::vec::Vec<Point> {
        std::vec::Vec::from([Point::new(x1, y1), Point::new(x2, y1), Point::new(x2, y2), Point::new(x1, y2)])
    }

    #[test]
    fn init_clip_cuts_a_hole_for_an_intruding_via() {
        let board = FakeBoard {
            polygon: PolygonPlane {
                outer: rect(0, 0, 50_000, 50_000),
                holes: std::vec::Vec::new(),
                layer_group: 0,
                net: NetId(0),
                is_plane: false,
            },
            vias: std::vec::Vec::from([Via {
                center: Point::new(25_000, 25_000),
                copper_dia: 2000,
                drill_dia: 800,
                keepaway: 500,
                net: NetId(1),
            }]),
        };
        let mut mgr = ClearanceManager::new();
        let handle = PolygonHandle::new(0, 1);
        mgr.init_clip(&board, handle, true);
        let clipped = mgr.clipped(handle).expect("clip should exist");
        assert_eq!(clipped.len(), 1);
        assert_eq!(clipped[0].holes.len(), 1);
    }

    #[test]
    fn init_clip_is_idempotent() {
        let board = FakeBoard {
            polygon: PolygonPlane {
                outer: rect(0, 0, 10_000, 10_000),
                holes: std::vec::Vec::new(),
                layer_group: 0,
                net: NetId(0),
                is_plane: false,
            },
            vias: std::vec::Vec::new(),
        };
        let mut mgr = ClearanceManager::new();
        let handle = PolygonHandle::new(0, 1);
        mgr.init_clip(&board, handle, true);
        let first = mgr.clipped(handle).unwrap().to_vec();
        mgr.init_clip(&board, handle, true);
        let second = mgr.clipped(handle).unwrap().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn restore_after_clear_returns_to_the_original_area() {
        use pcb_polygon::signed_area2;

        let board = FakeBoard {
            polygon: PolygonPlane {
                outer: rect(0, 0, 10_000, 10_000),
                holes: std::vec::Vec::new(),
                layer_group: 0,
                net: NetId(0),
                is_plane: false,
            },
            vias: std::vec::Vec::new(),
        };
        fn net_area(regions: &[PolyArea]) -> i64 {
            regions
                .iter()
                .map(|p| {
                    let outer = signed_area2(&p.outer).abs() / 2;
                    let holes: i64 = p.holes.iter().map(|h| signed_area2(h).abs() / 2).sum();
                    outer - holes
                })
                .sum()
        }

        let mut mgr = ClearanceManager::new();
        let handle = PolygonHandle::new(0, 1);
        mgr.init_clip(&board, handle, false);
        let original_area = net_area(mgr.clipped(handle).unwrap());

        let via = ClearedObject::Via(Via {
            center: Point::new(5000, 5000),
            copper_dia: 2000,
            drill_dia: 800,
            keepaway: 500,
            net: NetId(1),
        });
        mgr.clear_from_polygon(&board, &via);
        let cleared_area = net_area(mgr.clipped(handle).unwrap());
        assert!(cleared_area < original_area);

        mgr.restore_to_polygon(&board, &via);
        let restored_area = net_area(mgr.clipped(handle).unwrap());
        assert!(restored_area > cleared_area);
    }
}
