// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dev tooling for pcb-core. Currently a single `check-scenarios` command
//! that runs the end-to-end fixtures described in `spec.md` §8.4 through
//! the public `pcb_core` entry points and prints a pass/fail table, for
//! quick manual sanity-checking outside of `cargo test`.

use clap::{Parser, Subcommand};
use pcb_core::{init_clip, Board, Config, Context};
use pcb_geom::{mil_to_coord, Box, NetId, Pad, Pin, PinShape, Point, PolygonPlane, RouteStyle, Side, Via};
use pcb_placer::{Component, ComponentId, LocalPad, Net, NetList, PinRef, Rotation};

#[derive(Parser)]
#[command(about = "Dev tooling for pcb-core")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the `spec.md` §8.4 end-to-end scenarios and print a pass/fail table.
    CheckScenarios,
}

struct ScenarioOutcome {
    name: &'static str,
    passed: bool,
    detail: String,
}

fn scenario_style() -> RouteStyle {
    RouteStyle {
        thick: mil_to_coord(10),
        via_diameter: mil_to_coord(20),
        via_hole: mil_to_coord(8),
        keepaway: mil_to_coord(5),
    }
}

fn scenario_config() -> Config {
    Config { route_styles: [scenario_style(); 4], ..Config::default() }
}

fn scenario_direct_route() -> ScenarioOutcome {
    let mut board = Board::new(Box::new(0, 0, mil_to_coord(1_000), mil_to_coord(1_000)), 2);
    let net = NetId(1);
    for x in [mil_to_coord(100), mil_to_coord(900)] {
        board.geometry.pins.push(Pin {
            center: Point::new(x, mil_to_coord(100)),
            copper_dia: mil_to_coord(20),
            drill_dia: mil_to_coord(10),
            keepaway: mil_to_coord(5),
            shape: PinShape::Round,
            net,
            thermal: false,
        });
    }
    let mut ctx = Context::with_seed(scenario_config(), 1);
    let result = ctx.auto_route(&mut board, false);
    let passed = result.subnets_routed == result.subnets_total && board.geometry.vias.is_empty();
    ScenarioOutcome {
        name: "two-pin net, one layer, direct route",
        passed,
        detail: format!("{}/{} subnets routed, {} vias", result.subnets_routed, result.subnets_total, board.geometry.vias.len()),
    }
}

fn scenario_via_required() -> ScenarioOutcome {
    let mut board = Board::new(Box::new(0, 0, mil_to_coord(1_000), mil_to_coord(1_000)), 2);
    let net = NetId(1);
    board.geometry.pads.push(Pad {
        p1: Point::new(mil_to_coord(100), mil_to_coord(100)),
        p2: Point::new(mil_to_coord(100), mil_to_coord(100)),
        thickness: mil_to_coord(20),
        square_ends: false,
        side: Side::Top,
        net,
        keepaway: mil_to_coord(5),
    });
    board.geometry.pads.push(Pad {
        p1: Point::new(mil_to_coord(900), mil_to_coord(900)),
        p2: Point::new(mil_to_coord(900), mil_to_coord(900)),
        thickness: mil_to_coord(20),
        square_ends: false,
        side: Side::Bottom,
        net,
        keepaway: mil_to_coord(5),
    });
    let mut ctx = Context::with_seed(scenario_config(), 2);
    let result = ctx.auto_route(&mut board, false);
    let passed = result.subnets_routed == result.subnets_total && !board.geometry.vias.is_empty();
    ScenarioOutcome {
        name: "two-pin net across layer groups needs a via",
        passed,
        detail: format!("{}/{} subnets routed, {} vias", result.subnets_routed, result.subnets_total, board.geometry.vias.len()),
    }
}

fn scenario_clearance_hole() -> ScenarioOutcome {
    let mut board = Board::new(Box::new(0, 0, 50_000, 50_000), 1);
    let handle = board.push_polygon(PolygonPlane {
        outer: std::vec::Vec::from([
            Point::new(0, 0),
            Point::new(50_000, 0),
            Point::new(50_000, 50_000),
            Point::new(0, 50_000),
        ]),
        holes: std::vec::Vec::new(),
        layer_group: 0,
        net: NetId(99),
        is_plane: true,
    });
    board.geometry.vias.push(Via { center: Point::new(25_000, 25_000), copper_dia: 2_000, drill_dia: 800, keepaway: 500, net: NetId(1) });
    init_clip(&mut board, handle, true);
    let clipped = board.clearance.clipped(handle);
    let passed = clipped.map(|c| c.len() == 1 && c[0].holes.len() == 1).unwrap_or(false);
    ScenarioOutcome {
        name: "plane clearance leaves one circular hole around a via",
        passed,
        detail: match clipped {
            Some(c) => format!("{} piece(s), {} hole(s) on first piece", c.len(), c.first().map(|p| p.holes.len()).unwrap_or(0)),
            None => "no clip entry".into(),
        },
    }
}

fn scenario_anneal_converges() -> ScenarioOutcome {
    let mut board = Board::new(Box::new(0, 0, mil_to_coord(4_000), mil_to_coord(4_000)), 1);
    let fixed_point = Point::new(mil_to_coord(3_000), mil_to_coord(3_000));
    board.components.push(Component {
        id: ComponentId(0),
        name_prefix: "R".into(),
        position: Point::new(mil_to_coord(200), mil_to_coord(200)),
        rotation: Rotation::Deg0,
        side: Side::Top,
        local_outline: Box::new(-mil_to_coord(20), -mil_to_coord(20), mil_to_coord(20), mil_to_coord(20)),
        pads: std::vec::Vec::from([LocalPad { offset: Point::new(0, 0), net: NetId(1), is_smd: true }]),
        fixed: false,
    });
    board.selected.push(0);
    board.nets = NetList::new(std::vec::Vec::from([Net {
        id: NetId(1),
        pins: std::vec::Vec::from([
            PinRef::Component { component: ComponentId(0), pad_index: 0 },
            PinRef::Fixed(fixed_point),
        ]),
    }]));
    board.nets.update_xy(&board.components);
    let initial = board.components[0].position.manhattan(fixed_point);

    let mut ctx = Context::with_seed(Config::default(), 3);
    ctx.auto_place_selected(&mut board);

    let final_distance = board.components[0].position.manhattan(fixed_point);
    let passed = final_distance < initial && final_distance <= mil_to_coord(20) as i64;
    ScenarioOutcome {
        name: "annealer pulls one component toward its fixed pin",
        passed,
        detail: format!("distance {initial} -> {final_distance}"),
    }
}

fn scenario_rip_up() -> ScenarioOutcome {
    let mut board = Board::new(Box::new(0, 0, mil_to_coord(2_000), mil_to_coord(2_000)), 1);
    let endpoints = [
        (mil_to_coord(100), mil_to_coord(100), mil_to_coord(1_900), mil_to_coord(1_900)),
        (mil_to_coord(1_900), mil_to_coord(100), mil_to_coord(100), mil_to_coord(1_900)),
        (mil_to_coord(100), mil_to_coord(1_000), mil_to_coord(1_900), mil_to_coord(1_000)),
        (mil_to_coord(1_000), mil_to_coord(100), mil_to_coord(1_000), mil_to_coord(1_900)),
    ];
    for (i, &(x1, y1, x2, y2)) in endpoints.iter().enumerate() {
        let net = NetId(i as u32 + 1);
        for (x, y) in [(x1, y1), (x2, y2)] {
            board.geometry.pins.push(Pin {
                center: Point::new(x, y),
                copper_dia: mil_to_coord(20),
                drill_dia: mil_to_coord(10),
                keepaway: mil_to_coord(5),
                shape: PinShape::Round,
                net,
                thermal: false,
            });
        }
    }
    let mut ctx = Context::with_seed(scenario_config(), 4);
    let result = ctx.auto_route(&mut board, false);
    ScenarioOutcome {
        name: "rip-up resolves conflicting nets",
        passed: result.subnets_routed == result.subnets_total,
        detail: format!("{}/{} subnets routed", result.subnets_routed, result.subnets_total),
    }
}

fn scenario_xor_empty() -> ScenarioOutcome {
    use pcb_polygon::{xor_ref, PolyArea};
    let square = PolyArea::simple(std::vec::Vec::from([
        Point::new(0, 0),
        Point::new(10_000, 0),
        Point::new(10_000, 10_000),
        Point::new(0, 10_000),
    ]));
    let a = std::vec::Vec::from([square.clone()]);
    let b = std::vec::Vec::from([square]);
    let result = xor_ref(&a, &b);
    ScenarioOutcome {
        name: "xor of identical squares is empty",
        passed: result.is_empty(),
        detail: format!("{} piece(s) remaining", result.len()),
    }
}

fn run_check_scenarios() -> bool {
    let outcomes = [
        scenario_direct_route(),
        scenario_via_required(),
        scenario_clearance_hole(),
        scenario_anneal_converges(),
        scenario_rip_up(),
        scenario_xor_empty(),
    ];
    let mut all_passed = true;
    println!("{:<50} {:<6} detail", "scenario", "status");
    for outcome in &outcomes {
        all_passed &= outcome.passed;
        let status = if outcome.passed { "ok" } else { "FAIL" };
        println!("{:<50} {:<6} {}", outcome.name, status, outcome.detail);
    }
    all_passed
}

fn main() {
    let args = Args::parse();
    match args.command {
        Command::CheckScenarios => {
            if !run_check_scenarios() {
                std::process::exit(1);
            }
        }
    }
}
