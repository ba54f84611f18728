// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The simulated-annealing driver, `AutoPlaceSelected` in `autoplace.c`,
//! §4.4.3.

use crate::component::{Component, ComponentId};
use crate::cost::{compute_cost, CostParameters};
use crate::netlist::NetList;
use crate::perturb::{apply_perturbation, create_perturbation};
use pcb_geom::{mil_to_coord, Box};
use rand::Rng;

const T0_ESTIMATE_TRIALS: u32 = 10;
const T0_ESTIMATE_ACCEPT_PROB: f64 = 0.95;
/// Reference temperature `ComputeCost` is evaluated at while estimating the
/// initial annealing temperature (`Tx` in the source).
const T0_COST_REFERENCE_TEMP: i32 = mil_to_coord(300);
/// Perturbation magnitude used for the T0-estimation trial moves
/// (`INCH_TO_COORD(1)` in the source: a full inch, larger than any real move,
/// so the trials carry a representative signal of the cost landscape's
/// scale).
const T0_ESTIMATE_PERTURB_TEMP: i32 = mil_to_coord(1_000);
const ANNEAL_FLOOR: f64 = 5.0;

/// Outcome of one [`auto_place_selected`] run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnealResult {
    /// True if any accepted move changed the placement (`steps > 0` in the
    /// source — this is what gates "delete and re-add rat-lines").
    pub changed: bool,
    /// Total accepted moves across every stage (good moves plus
    /// kept-anyway moves).
    pub steps: u64,
    /// Cost of the final placement.
    pub final_cost: f64,
    /// Number of cooling stages completed.
    pub stages: u32,
}

/// Reports progress between annealing stages. Returning `true` cancels the
/// run after the current stage, leaving whatever placement has been reached
/// so far (`spec.md` §5's cooperative-cancellation model).
pub trait AnnealProgress {
    /// Called once per completed cooling stage.
    fn stage_complete(&mut self, stage: u32, cost: f64, temperature: f64) -> bool;
}

impl<F: FnMut(u32, f64, f64) -> bool> AnnealProgress for F {
    fn stage_complete(&mut self, stage: u32, cost: f64, temperature: f64) -> bool {
        self(stage, cost, temperature)
    }
}

/// Estimate the initial annealing temperature `T0` by running a handful of
/// large, representative perturbations at a fixed reference temperature and
/// measuring the mean absolute cost swing (`T0 = -mean(|dC|) / ln(P)`,
/// `P = 0.95`).
fn estimate_t0(
    components: &mut [Component],
    selected: &[ComponentId],
    nets: &mut NetList,
    board: Box,
    params: &CostParameters,
    rng: &mut impl Rng,
) -> f64 {
    let tx = f64::from(T0_COST_REFERENCE_TEMP);
    let c0 = compute_cost(components, nets, board, params, tx, tx);
    let mut total_abs_delta = 0.0;
    for _ in 0..T0_ESTIMATE_TRIALS {
        let pt = create_perturbation(components, selected, board, params, f64::from(T0_ESTIMATE_PERTURB_TEMP), rng);
        apply_perturbation(components, pt, false);
        let cprime = compute_cost(components, nets, board, params, tx, tx);
        total_abs_delta += (cprime - c0).abs();
        apply_perturbation(components, pt, true);
    }
    let mean_delta = total_abs_delta / f64::from(T0_ESTIMATE_TRIALS);
    -mean_delta / T0_ESTIMATE_ACCEPT_PROB.ln()
}

/// Run the simulated-annealing placer over `selected`, mutating
/// `components` in place. Mirrors `AutoPlaceSelected`: estimate `T0`, anneal
/// in stages of `m * |selected|` good moves (or `2m * |selected|` total
/// moves) per stage, cool geometrically by `gamma`, and stop once `T` drops
/// below 5 board units or the stage's good-move ratio falls below
/// `1 / good_ratio`.
pub fn auto_place_selected(
    components: &mut [Component],
    selected: &[ComponentId],
    nets: &mut NetList,
    board: Box,
    params: &CostParameters,
    rng: &mut impl Rng,
    mut progress: Option<&mut dyn AnnealProgress>,
) -> AnnealResult {
    if selected.is_empty() {
        log::warn!("auto_place_selected: no elements selected to autoplace");
        return AnnealResult { changed: false, steps: 0, final_cost: 0.0, stages: 0 };
    }

    let t0 = estimate_t0(components, selected, nets, board, params, rng);
    log::info!("autoplace: initial temperature T0 = {t0:.1}");

    let mut t = t0;
    let mut steps: u64 = 0;
    let mut good_moves: u32 = 0;
    let mut moves: u32 = 0;
    let mut stages: u32 = 0;
    let good_move_cutoff = params.m * selected.len() as u32;
    let move_cutoff = 2 * good_move_cutoff;
    let mut c0 = compute_cost(components, nets, board, params, t0, t);

    loop {
        let pt = create_perturbation(components, selected, board, params, t, rng);
        apply_perturbation(components, pt, false);
        let cprime = compute_cost(components, nets, board, params, t0, t);
        if cprime < c0 {
            c0 = cprime;
            good_moves += 1;
            steps += 1;
        } else if rng.gen::<f64>() < ((c0 - cprime) / t).clamp(-20.0, 20.0).exp() {
            c0 = cprime;
            steps += 1;
        } else {
            apply_perturbation(components, pt, true);
        }
        moves += 1;

        if good_moves >= good_move_cutoff || moves >= move_cutoff {
            stages += 1;
            log::info!(
                "autoplace: end of stage {stages}: cost {c0:.0}, good_moves {good_moves}, moves {moves}, T {t:.1}"
            );
            let cancelled = progress.as_deref_mut().is_some_and(|p| p.stage_complete(stages, c0, t));
            if cancelled || t < ANNEAL_FLOOR || good_moves < moves / params.good_ratio {
                break;
            }
            moves = 0;
            good_moves = 0;
            t *= params.gamma;
            c0 = compute_cost(components, nets, board, params, t0, t);
        }
    }

    AnnealResult { changed: steps > 0, steps, final_cost: c0, stages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentId, LocalPad, Rotation};
    use crate::netlist::{Net, PinRef};
    use pcb_geom::{NetId, Point, Side};
    use rand::SeedableRng;

    fn floating_component(x: Coord) -> Component {
        Component {
            id: ComponentId(0),
            name_prefix: "U".into(),
            position: Point::new(x, 5_000),
            rotation: Rotation::Deg0,
            side: Side::Top,
            local_outline: Box::new(-200, -200, 200, 200),
            pads: vec![LocalPad { offset: Point::new(0, 0), net: NetId(1), is_smd: true }],
            fixed: false,
        }
    }

    use pcb_geom::Coord;

    #[test]
    fn single_element_converges_near_fixed_pin() {
        let board = Box::new(0, 0, 1_000_000, 1_000_000);
        let mut components = vec![floating_component(900_000)];
        let mut nets = NetList::new(vec![Net {
            id: NetId(1),
            pins: vec![
                PinRef::Component { component: ComponentId(0), pad_index: 0 },
                PinRef::Fixed(Point::new(100_000, 5_000)),
            ],
        }]);
        let params = CostParameters::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let result = auto_place_selected(&mut components, &[ComponentId(0)], &mut nets, board, &params, &mut rng, None);
        assert!(result.changed);
        // Converges toward the fixed pin; not necessarily exact due to
        // discrete grid snapping, but should land far closer than the start.
        let final_distance = (components[0].position.x - 100_000).abs();
        assert!(final_distance < 900_000 - 100_000);
    }

    #[test]
    fn empty_selection_is_a_no_op() {
        let board = Box::new(0, 0, 1_000_000, 1_000_000);
        let mut components = vec![floating_component(500_000)];
        let mut nets = NetList::new(vec![]);
        let params = CostParameters::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let result = auto_place_selected(&mut components, &[], &mut nets, board, &params, &mut rng, None);
        assert!(!result.changed);
        assert_eq!(result.stages, 0);
    }

    #[test]
    fn progress_callback_can_cancel() {
        let board = Box::new(0, 0, 1_000_000, 1_000_000);
        let mut components = vec![floating_component(900_000)];
        let mut nets = NetList::new(vec![Net {
            id: NetId(1),
            pins: vec![
                PinRef::Component { component: ComponentId(0), pad_index: 0 },
                PinRef::Fixed(Point::new(100_000, 5_000)),
            ],
        }]);
        let params = CostParameters::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let mut cancel_now = |_stage: u32, _cost: f64, _temp: f64| true;
        let result =
            auto_place_selected(&mut components, &[ComponentId(0)], &mut nets, board, &params, &mut rng, Some(&mut cancel_now));
        assert_eq!(result.stages, 1);
    }
}
