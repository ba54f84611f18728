// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Perturbation generation and application, `createPerturbation`/`doPerturb`
//! in `autoplace.c`, §4.4.2.

use crate::component::{Component, ComponentId, Rotation};
use crate::cost::CostParameters;
use pcb_geom::{mil_to_coord, Box, Coord, Side};
use rand::Rng;
use std::vec::Vec;

/// A single perturbation applied to the selected-component set, recording
/// everything needed to [`Perturbation::undo`] it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Perturbation {
    /// Shift `component` by `(dx, dy)`.
    Shift { component: ComponentId, dx: Coord, dy: Coord },
    /// Rotate `component` by `steps` quarter-turns clockwise, or flip to the
    /// other side if `steps == 0` (matching the source's `0 = flip, 1-3 =
    /// rotate` overload of a single field).
    RotateOrFlip { component: ComponentId, steps: u8 },
    /// Swap the positions (and, if they differ, the sides) of two
    /// components.
    Exchange { a: ComponentId, b: ComponentId },
}

fn clamp_shift(comp: &Component, dx: Coord, dy: Coord, board: Box) -> (Coord, Coord) {
    let vb = comp.vbox();
    let dx = dx.max(board.x1 - vb.x1).min(board.x2 - vb.x2);
    let dy = dy.max(board.y1 - vb.y1).min(board.y2 - vb.y2);
    (dx, dy)
}

fn round_away_from_zero(value: f64, grid: Coord) -> Coord {
    if grid == 0 {
        return value.round() as Coord;
    }
    let q = value / f64::from(grid);
    let rounded = if q >= 0.0 { q.trunc() + 1.0 } else { q.trunc() - 1.0 };
    (rounded * f64::from(grid)) as Coord
}

/// Generate one perturbation against the selected set, following
/// `createPerturbation`. `rng` drives every random choice, so runs with the
/// same seed reproduce the same sequence of trial moves.
pub fn create_perturbation(
    components: &[Component],
    selected: &[ComponentId],
    board: Box,
    params: &CostParameters,
    t: f64,
    rng: &mut impl Rng,
) -> Perturbation {
    assert!(!selected.is_empty(), "create_perturbation requires a non-empty selection");
    let pick = selected[rng.gen_range(0..selected.len())];
    let comp = &components[pick.0 as usize];
    let choices = if selected.len() > 1 { 3 } else { 2 };
    match rng.gen_range(0..choices) {
        0 => {
            const MIN_SHIFT_SCALE: f64 = 250.0; // 2.5 mil, in board coordinate units
            let scale_x = t.sqrt().clamp(MIN_SHIFT_SCALE, (f64::from(board.width()) / 3.0).max(MIN_SHIFT_SCALE));
            let scale_y = t.sqrt().clamp(MIN_SHIFT_SCALE, (f64::from(board.height()) / 3.0).max(MIN_SHIFT_SCALE));
            let raw_dx = scale_x * 2.0 * (rng.gen::<f64>() - 0.5);
            let raw_dy = scale_y * 2.0 * (rng.gen::<f64>() - 0.5);
            let grid = if t > f64::from(mil_to_coord(10)) { params.large_grid_size } else { params.small_grid_size };
            let dx = round_away_from_zero(raw_dx, grid);
            let dy = round_away_from_zero(raw_dy, grid);
            let (dx, dy) = clamp_shift(comp, dx, dy, board);
            Perturbation::Shift { component: pick, dx, dy }
        }
        1 => {
            let is_smd = comp.is_all_smd();
            let steps = if is_smd { rng.gen_range(0..4) } else { 1 + rng.gen_range(0..3) };
            Perturbation::RotateOrFlip { component: pick, steps }
        }
        _ => loop {
            let mut other = selected[rng.gen_range(0..selected.len())];
            if other == pick {
                other = selected[selected.len() - 1];
            }
            let other_comp = &components[other.0 as usize];
            let pick_through_hole = comp.pads.iter().any(|p| !p.is_smd);
            let other_through_hole = other_comp.pads.iter().any(|p| !p.is_smd);
            let forbidden = (pick_through_hole && other_comp.side == Side::Bottom)
                || (other_through_hole && comp.side == Side::Bottom);
            if !forbidden {
                break Perturbation::Exchange { a: pick, b: other };
            }
        },
    }
}

fn apply_rotate_or_flip(comp: &mut Component, steps: u8, undo: bool) {
    let steps = if undo { (4 - steps) & 3 } else { steps };
    if steps == 0 {
        comp.side = comp.side.flipped();
    } else {
        comp.rotation = comp.rotation.add_steps(steps);
    }
}

/// Apply (or, if `undo` is true, reverse) a perturbation to `components`.
pub fn apply_perturbation(components: &mut [Component], pt: Perturbation, undo: bool) {
    match pt {
        Perturbation::Shift { component, dx, dy } => {
            let (dx, dy) = if undo { (-dx, -dy) } else { (dx, dy) };
            let c = &mut components[component.0 as usize];
            c.position.x += dx;
            c.position.y += dy;
        }
        Perturbation::RotateOrFlip { component, steps } => {
            apply_rotate_or_flip(&mut components[component.0 as usize], steps, undo);
        }
        Perturbation::Exchange { a, b } => {
            let (pa, pb) = (components[a.0 as usize].position, components[b.0 as usize].position);
            components[a.0 as usize].position = pb;
            components[b.0 as usize].position = pa;
            let (side_a, side_b) = (components[a.0 as usize].side, components[b.0 as usize].side);
            if side_a != side_b {
                apply_rotate_or_flip(&mut components[a.0 as usize], 0, undo);
                apply_rotate_or_flip(&mut components[b.0 as usize], 0, undo);
            }
        }
    }
}

/// Components touched by a perturbation, used by callers that want to
/// invalidate caches narrower than "recompute everything".
#[must_use]
pub fn affected_components(pt: Perturbation) -> Vec<ComponentId> {
    match pt {
        Perturbation::Shift { component, .. } | Perturbation::RotateOrFlip { component, .. } => vec![component],
        Perturbation::Exchange { a, b } => vec![a, b],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::LocalPad;
    use pcb_geom::{NetId, Point};
    use rand::SeedableRng;

    fn comp(id: u32, x: Coord) -> Component {
        Component {
            id: ComponentId(id),
            name_prefix: "R".into(),
            position: Point::new(x, 500),
            rotation: Rotation::Deg0,
            side: Side::Top,
            local_outline: Box::new(-10, -10, 10, 10),
            pads: vec![LocalPad { offset: Point::new(0, 0), net: NetId(id), is_smd: true }],
            fixed: false,
        }
    }

    #[test]
    fn shift_and_undo_round_trips() {
        let mut comps = vec![comp(0, 500)];
        let pt = Perturbation::Shift { component: ComponentId(0), dx: 37, dy: -11 };
        let before = comps[0].position;
        apply_perturbation(&mut comps, pt, false);
        assert_ne!(comps[0].position, before);
        apply_perturbation(&mut comps, pt, true);
        assert_eq!(comps[0].position, before);
    }

    #[test]
    fn rotate_then_undo_round_trips() {
        let mut comps = vec![comp(0, 500)];
        let pt = Perturbation::RotateOrFlip { component: ComponentId(0), steps: 2 };
        apply_perturbation(&mut comps, pt, false);
        assert_eq!(comps[0].rotation, Rotation::Deg180);
        apply_perturbation(&mut comps, pt, true);
        assert_eq!(comps[0].rotation, Rotation::Deg0);
    }

    #[test]
    fn flip_then_undo_round_trips() {
        let mut comps = vec![comp(0, 500)];
        let pt = Perturbation::RotateOrFlip { component: ComponentId(0), steps: 0 };
        apply_perturbation(&mut comps, pt, false);
        assert_eq!(comps[0].side, Side::Bottom);
        apply_perturbation(&mut comps, pt, true);
        assert_eq!(comps[0].side, Side::Top);
    }

    #[test]
    fn exchange_swaps_positions() {
        let mut comps = vec![comp(0, 100), comp(1, 900)];
        let pt = Perturbation::Exchange { a: ComponentId(0), b: ComponentId(1) };
        apply_perturbation(&mut comps, pt, false);
        assert_eq!(comps[0].position.x, 900);
        assert_eq!(comps[1].position.x, 100);
    }

    #[test]
    fn shift_is_clamped_to_board() {
        let comps = vec![comp(0, 5)];
        let board = Box::new(0, 0, 1000, 1000);
        let params = CostParameters::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let pt = create_perturbation(&comps, &[ComponentId(0)], board, &params, 900.0, &mut rng);
            if let Perturbation::Shift { dx, dy, .. } = pt {
                let mut c2 = comps.clone();
                apply_perturbation(&mut c2, Perturbation::Shift { component: ComponentId(0), dx, dy }, false);
                assert!(c2[0].vbox().within(board));
            }
        }
    }

    #[test]
    fn deterministic_given_fixed_seed() {
        let comps = vec![comp(0, 500), comp(1, 600)];
        let board = Box::new(0, 0, 10_000, 10_000);
        let params = CostParameters::default();
        let sel = [ComponentId(0), ComponentId(1)];
        let mut rng_a = rand::rngs::StdRng::seed_from_u64(42);
        let mut rng_b = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let a = create_perturbation(&comps, &sel, board, &params, 300.0, &mut rng_a);
            let b = create_perturbation(&comps, &sel, board, &params, 300.0, &mut rng_b);
            assert_eq!(a, b);
        }
    }
}
