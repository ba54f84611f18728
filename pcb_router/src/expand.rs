// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The expansion engine: growing rectangles outward from a search source
//! until they reach a target, `autoroute.c`'s `Expand`/`NewExpansionArea`
//! pair, §4.5.2.
//!
//! A parent area does not grow into another net's copper: a blocking box on
//! a *different* net is always a hard stop, exactly as real copper would
//! be. [`PassCost::conflict_penalty`]/[`PassCost::hi_conflict_threshold`]
//! instead bias two softer decisions this module and [`crate::route_one`]
//! make: whether to grow back toward a rectangle that conflicted on a
//! previous pass ([`touched_bad`] folds into an edge's cost here), and
//! whether a candidate via site returned by [`pcb_mts::Mts::find_free_space`]
//! is good enough to accept (decided by the caller once a via edge is
//! popped off the search heap).
//!
//! Corner (45 degree) growth grows a second, smaller rectangle into the
//! quadrant beyond a cardinal expansion's corner, the same way
//! [`pcb_placer::cost`]'s `find_neighbor` expresses directional search as
//! explicit per-direction regions rather than routing world-space geometry
//! through [`pcb_geom::Box::rotate_to_north`]. [`grow_rect`] dispatches to
//! [`grow_rect_corner`] for the four ordinal [`Direction`]s, clamping each
//! axis independently against any blocker in the quadrant so the corner box
//! never straddles copper that either adjacent cardinal step stopped at.

use pcb_geom::{Box, NetId, Point};
use pcb_mts::{ConflictClass, Mts};
use pcb_spatial::{Backend, Flow};

use crate::cost::LayerCost;
use crate::model::RouteModel;
use crate::route_box::RouteBoxFlags;
use pcb_geom::Direction;

/// A reference into an [`ExpansionArena`], valid only for the
/// [`crate::route_one`] call that created it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExpansionId(u32);

/// A rectangle grown during one [`crate::route_one`] search. Not inserted
/// into any [`RouteModel`] tree -- it exists only in the call-scoped
/// [`ExpansionArena`] until the winning path is back-traced and turned into
/// permanent [`crate::route_box::RouteBox`]es.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpansionAreaRecord {
    /// The grown rectangle.
    pub rect: Box,
    /// Copper layer group it occupies.
    pub layer_group: u16,
    /// The net being routed.
    pub net: NetId,
    /// The area it grew from, or `None` for a search source.
    pub parent: Option<ExpansionId>,
    /// Which direction it grew in to reach this rectangle from `parent`.
    /// [`Direction::All`] marks a search source or a layer-change (via)
    /// step, neither of which has a cardinal direction of its own.
    pub direction_from_parent: Direction,
    /// True once this area's rectangle overlaps a target box for the net
    /// being routed.
    pub reached_target: bool,
    /// The point this area's cost and heuristic were measured from (its
    /// closest approach to the target at creation time), reused as a
    /// back-trace waypoint once a path through this area wins.
    pub waypoint: Point,
}

/// The call-scoped bump arena of [`ExpansionAreaRecord`]s for one
/// [`crate::route_one`] search. Plain append-only storage, unlike
/// [`crate::route_box::RouteBoxArena`]: nothing is ever removed mid-search,
/// and the whole arena is dropped once the call returns.
#[derive(Default)]
pub struct ExpansionArena {
    areas: std::vec::Vec<ExpansionAreaRecord>,
}

impl ExpansionArena {
    /// An empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an area, returning its id.
    pub fn push(&mut self, area: ExpansionAreaRecord) -> ExpansionId {
        let id = ExpansionId(self.areas.len() as u32);
        self.areas.push(area);
        id
    }

    /// Borrow an area by id. Panics if `id` was not produced by this arena
    /// (ids never outlive the arena that made them).
    #[must_use]
    pub fn get(&self, id: ExpansionId) -> &ExpansionAreaRecord {
        &self.areas[id.0 as usize]
    }

    /// Number of areas grown so far this search.
    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// True if no area has been grown yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

/// One entry on the search heap: an as-yet-unexplored expansion area plus
/// the A*-style cost bookkeeping needed to order the heap and bound the
/// search, `autoroute.c`'s `Edge`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    /// The area this edge will expand when popped.
    pub area: ExpansionId,
    /// Accumulated real cost from the search source to `area`'s waypoint.
    pub cost_to_point: f64,
    /// Admissible remaining-distance estimate from `cost_point` to the
    /// nearest target point.
    pub min_cost_to_target: f64,
}

impl Edge {
    /// The heap key: real cost so far plus the remaining-distance estimate.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.cost_to_point + self.min_cost_to_target
    }
}

/// Grow `rect` one step in `direction` on `layer_group`, stopping at the
/// nearest box belonging to a different net (or the board edge if none is
/// found). Returns the grown rectangle and whether the nearest blocker had
/// [`RouteBoxFlags::IS_BAD`] set (conflicted on a previous pass).
///
/// Corner directions ([`Direction::Ne`]/[`Direction::Se`]/[`Direction::Sw`]/
/// [`Direction::Nw`]) delegate to [`grow_rect_corner`]; [`Direction::All`]
/// is a via-candidate marker and never reaches this function via the
/// expansion engine's fan-out.
#[must_use]
pub fn grow_rect(model: &RouteModel, rect: Box, layer_group: u16, net: NetId, direction: Direction) -> (Box, bool) {
    if direction.is_corner() {
        return grow_rect_corner(model, rect, layer_group, net, direction);
    }
    let board = model.board;
    let Some(tree) = model.tree(layer_group) else {
        return (clip_to_board(rect, direction, board), false);
    };

    let search_region = match direction {
        Direction::North => Box::new(rect.x1, rect.y2, rect.x2, board.y2),
        Direction::South => Box::new(rect.x1, board.y1, rect.x2, rect.y1),
        Direction::East => Box::new(rect.x2, rect.y1, board.x2, rect.y2),
        Direction::West => Box::new(board.x1, rect.y1, rect.x1, rect.y2),
        _ => return (rect, false),
    };
    let mut limit = match direction {
        Direction::North => board.y2,
        Direction::South => board.y1,
        Direction::East => board.x2,
        Direction::West => board.x1,
        _ => return (rect, false),
    };
    let mut touched_bad = false;

    tree.search(
        &mut |node_box| {
            if node_box.intersects(search_region) {
                Flow::Continue
            } else {
                Flow::PruneSubtree
            }
        },
        &mut |_id, leaf_box, rb_id| {
            let Some(rb) = model.arena.get(*rb_id) else {
                return Flow::Continue;
            };
            if rb.net == Some(net) || !leaf_box.intersects(search_region) {
                return Flow::Continue;
            }
            let is_bad = rb.flags.contains(RouteBoxFlags::IS_BAD);
            match direction {
                Direction::North => {
                    if leaf_box.y1 < limit {
                        limit = leaf_box.y1;
                        touched_bad |= is_bad;
                    }
                }
                Direction::South => {
                    if leaf_box.y2 > limit {
                        limit = leaf_box.y2;
                        touched_bad |= is_bad;
                    }
                }
                Direction::East => {
                    if leaf_box.x1 < limit {
                        limit = leaf_box.x1;
                        touched_bad |= is_bad;
                    }
                }
                Direction::West => {
                    if leaf_box.x2 > limit {
                        limit = leaf_box.x2;
                        touched_bad |= is_bad;
                    }
                }
                _ => {}
            }
            Flow::Continue
        },
    );

    let grown = match direction {
        Direction::North => Box::new(rect.x1, rect.y1, rect.x2, limit),
        Direction::South => Box::new(rect.x1, limit, rect.x2, rect.y2),
        Direction::East => Box::new(rect.x1, rect.y1, limit, rect.y2),
        Direction::West => Box::new(limit, rect.y1, rect.x2, rect.y2),
        _ => rect,
    };
    (grown, touched_bad)
}

/// Grow a rectangle diagonally into the quadrant beyond `rect`'s corner in
/// `direction` (one of the four ordinal directions), per spec step 4: a
/// corner expansion only makes sense once both adjacent cardinal steps have
/// somewhere to go, so the new box's horizontal and vertical extents are each
/// bounded by the board edge, then clamped down by any different-net blocker
/// that intersects the quadrant -- independently per axis, so a blocker near
/// one edge of the quadrant can't be used to justify keeping the other axis
/// at its full, unblocked extent.
fn grow_rect_corner(model: &RouteModel, rect: Box, layer_group: u16, net: NetId, direction: Direction) -> (Box, bool) {
    let board = model.board;
    let (horizontal, vertical) = direction.corner_components();
    let (x_from, mut x_limit) = match horizontal {
        Direction::East => (rect.x2, board.x2),
        Direction::West => (rect.x1, board.x1),
        _ => unreachable!("corner_components only returns East/West horizontally"),
    };
    let (y_from, mut y_limit) = match vertical {
        Direction::North => (rect.y2, board.y2),
        Direction::South => (rect.y1, board.y1),
        _ => unreachable!("corner_components only returns North/South vertically"),
    };
    if x_from == x_limit || y_from == y_limit {
        // Already flush against the board edge on one axis: no quadrant to grow into.
        return (rect, false);
    }

    let Some(tree) = model.tree(layer_group) else {
        return (Box::new(x_from, y_from, x_limit, y_limit), false);
    };
    let search_region = Box::new(x_from, y_from, x_limit, y_limit);
    let mut touched_bad = false;

    tree.search(
        &mut |node_box| {
            if node_box.intersects(search_region) {
                Flow::Continue
            } else {
                Flow::PruneSubtree
            }
        },
        &mut |_id, leaf_box, rb_id| {
            let Some(rb) = model.arena.get(*rb_id) else {
                return Flow::Continue;
            };
            if rb.net == Some(net) || !leaf_box.intersects(search_region) {
                return Flow::Continue;
            }
            let is_bad = rb.flags.contains(RouteBoxFlags::IS_BAD);
            let new_x_limit = match horizontal {
                Direction::East => leaf_box.x1,
                Direction::West => leaf_box.x2,
                _ => unreachable!(),
            };
            let new_y_limit = match vertical {
                Direction::North => leaf_box.y1,
                Direction::South => leaf_box.y2,
                _ => unreachable!(),
            };
            let shrinks_x = match horizontal {
                Direction::East => new_x_limit < x_limit,
                Direction::West => new_x_limit > x_limit,
                _ => unreachable!(),
            };
            let shrinks_y = match vertical {
                Direction::North => new_y_limit < y_limit,
                Direction::South => new_y_limit > y_limit,
                _ => unreachable!(),
            };
            if shrinks_x {
                x_limit = new_x_limit;
                touched_bad |= is_bad;
            }
            if shrinks_y {
                y_limit = new_y_limit;
                touched_bad |= is_bad;
            }
            Flow::Continue
        },
    );

    let grown = Box::new(x_from, y_from, x_limit, y_limit);
    if !grown.is_good() {
        return (rect, false);
    }
    (grown, touched_bad)
}

fn clip_to_board(rect: Box, direction: Direction, board: Box) -> Box {
    match direction {
        Direction::North => Box::new(rect.x1, rect.y1, rect.x2, board.y2),
        Direction::South => Box::new(rect.x1, board.y1, rect.x2, rect.y2),
        Direction::East => Box::new(rect.x1, rect.y1, board.x2, rect.y2),
        Direction::West => Box::new(board.x1, rect.y1, rect.x2, rect.y2),
        _ => rect,
    }
}

/// The point on `rect`'s boundary closest to `target`, clamped onto the
/// rectangle (the next edge's `cost_point`).
#[must_use]
pub fn closest_point(rect: Box, target: Point) -> Point {
    Point::new(target.x.clamp(rect.x1, rect.x2), target.y.clamp(rect.y1, rect.y2))
}

/// A candidate site for switching layer groups mid-route, gated on
/// [`Mts::find_free_space`] finding room for a via there
/// (`autoroute.c`'s `TryVia`).
#[must_use]
pub fn try_via(mts: &Mts, at: Point, radius: pcb_geom::Coord, keepaway: pcb_geom::Coord, is_odd: bool, allow_conflicts: bool) -> Option<Box> {
    let seed = Box::from_point(at);
    let mut handle = mts.find_free_space(seed, radius, keepaway, is_odd, allow_conflicts);
    while let Some(region) = handle.next_region(mts) {
        match region.conflict {
            ConflictClass::Free | ConflictClass::LoConflict => return Some(region.bounds),
            ConflictClass::HiConflict if allow_conflicts => return Some(region.bounds),
            ConflictClass::HiConflict => {}
        }
    }
    None
}

/// Expand `parent` in every cardinal direction except the one it was
/// reached from (no immediate backtrack), plus the corner directions whose
/// two adjacent cardinal steps both had somewhere to grow, returning the new
/// areas plus search-heap edges for each, costed via `layer_cost` and
/// `jog_penalty`/`conflict_penalty` from `pass_cost`.
pub fn expand_cardinals(
    model: &RouteModel,
    arena: &mut ExpansionArena,
    parent_id: ExpansionId,
    parent_edge: &Edge,
    layer_cost: &LayerCost,
    jog_penalty: f64,
    conflict_penalty: f64,
    target: Point,
) -> std::vec::Vec<(ExpansionId, Edge)> {
    let parent = *arena.get(parent_id);
    let mut out = std::vec::Vec::with_capacity(8);
    let mut cardinal_grew = [false; 4];

    let push_direction = |arena: &mut ExpansionArena, out: &mut std::vec::Vec<(ExpansionId, Edge)>, direction: Direction, grown: Box, touched_bad: bool| {
        let waypoint = closest_point(grown, target);
        let dx = i64::from(waypoint.x - parent.waypoint.x);
        let dy = i64::from(waypoint.y - parent.waypoint.y);
        let mut step_cost = layer_cost.manhattan(parent.layer_group, dx, dy);
        if direction != parent.direction_from_parent {
            step_cost += jog_penalty;
        }
        if touched_bad {
            step_cost += conflict_penalty;
        }
        let area = ExpansionAreaRecord {
            rect: grown,
            layer_group: parent.layer_group,
            net: parent.net,
            parent: Some(parent_id),
            direction_from_parent: direction,
            reached_target: false,
            waypoint,
        };
        let id = arena.push(area);
        let target_dx = i64::from(target.x - waypoint.x);
        let target_dy = i64::from(target.y - waypoint.y);
        let edge = Edge {
            area: id,
            cost_to_point: parent_edge.cost_to_point + step_cost,
            min_cost_to_target: layer_cost.manhattan(parent.layer_group, target_dx, target_dy),
        };
        out.push((id, edge));
    };

    for (i, &direction) in Direction::CARDINALS.iter().enumerate() {
        if direction == parent.direction_from_parent.opposite() {
            continue;
        }
        let (grown, touched_bad) = grow_rect(model, parent.rect, parent.layer_group, parent.net, direction);
        if grown == parent.rect {
            continue;
        }
        cardinal_grew[i] = true;
        push_direction(arena, &mut out, direction, grown, touched_bad);
    }

    let grew = |d: Direction| Direction::CARDINALS.iter().position(|&c| c == d).is_some_and(|i| cardinal_grew[i]);
    for &direction in &Direction::CORNERS {
        if direction.opposite() == parent.direction_from_parent {
            continue;
        }
        let (horizontal, vertical) = direction.corner_components();
        if !grew(horizontal) || !grew(vertical) {
            continue;
        }
        let (grown, touched_bad) = grow_rect(model, parent.rect, parent.layer_group, parent.net, direction);
        if grown == parent.rect {
            continue;
        }
        push_direction(arena, &mut out, direction, grown, touched_bad);
    }

    out
}
