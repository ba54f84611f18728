// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end fixtures at the entry-point level (`Context::auto_route` /
//! `Context::auto_place_selected` over a `Board`), one per `spec.md` §8.4
//! scenario. Unit-level equivalents of several of these already live next
//! to the code they exercise (`pcb_placer::anneal`'s
//! `single_element_converges_near_fixed_pin`, `pcb_router::pass`'s
//! `single_net_routes_in_one_pass`); these tests check the same properties
//! survive the `Board`/`Context` wiring the host application actually
//! calls, not just the lower-level APIs.

use pcb_core::{init_clip, Board, Config, Context};
use pcb_geom::{mil_to_coord, Box, NetId, Pad, Pin, PinShape, Point, RouteStyle, Side};
use pcb_placer::{Component, ComponentId, LocalPad, Net, NetList, PinRef, Rotation};
use pcb_polygon::{signed_area2, xor_ref, PolyArea};

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

/// Scenario 1: a two-pin net on one layer with no obstacles routes as one
/// straight segment at the style's thickness, with no vias.
#[test]
fn two_pin_net_one_layer_routes_direct() {
    let mut board = Board::new(Box::new(0, 0, mil_to_coord(1_000), mil_to_coord(1_000)), 2);
    let net = NetId(1);
    board.geometry.pins.push(Pin {
        center: Point::new(mil_to_coord(100), mil_to_coord(100)),
        copper_dia: mil_to_coord(20),
        drill_dia: mil_to_coord(10),
        keepaway: mil_to_coord(5),
        shape: PinShape::Round,
        net,
        thermal: false,
    });
    board.geometry.pins.push(Pin {
        center: Point::new(mil_to_coord(900), mil_to_coord(100)),
        copper_dia: mil_to_coord(20),
        drill_dia: mil_to_coord(10),
        keepaway: mil_to_coord(5),
        shape: PinShape::Round,
        net,
        thermal: false,
    });

    let mut ctx = Context::with_seed(scenario_config(), 1);
    let result = ctx.auto_route(&mut board, false);

    assert!(result.changed);
    assert_eq!(result.subnets_routed, result.subnets_total);
    assert_eq!(board.geometry.vias.len(), 0);
    assert_eq!(board.geometry.lines.len(), 1);
    let line = board.geometry.lines[0];
    assert_eq!(line.net, net);
    assert_eq!(line.thickness, scenario_style().thick);
    // Unobstructed and collinear: the back-traced path is one straight run
    // with no knees, so it lands exactly on the two pin centers.
    let endpoints_cover_pins = (line.p1.x.min(line.p2.x) <= mil_to_coord(100))
        && (line.p1.x.max(line.p2.x) >= mil_to_coord(900))
        && line.p1.y == mil_to_coord(100)
        && line.p2.y == mil_to_coord(100);
    assert!(endpoints_cover_pins, "expected a horizontal run spanning both pins, got {line:?}");
}

/// Scenario 2: a two-pin net whose endpoints sit on different layer groups
/// requires exactly one layer change, i.e. at least one via, to connect.
#[test]
fn two_pin_net_across_layers_requires_a_via() {
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

    assert!(result.changed);
    assert_eq!(result.subnets_routed, result.subnets_total);
    assert!(!board.geometry.vias.is_empty(), "a cross-layer net needs at least one via");
    let via = board.geometry.vias[0];
    assert!(via.center.x >= mil_to_coord(100) && via.center.x <= mil_to_coord(900));
    assert!(via.center.y >= mil_to_coord(100) && via.center.y <= mil_to_coord(900));
}

/// Scenario 3: `init_clip` on a plane with one intruding via leaves a
/// single clipped piece, one outer contour plus one circular hole, whose
/// area matches `original - pi * (via_radius + clearance)^2` (the via's
/// clearance circle is a `CIRCLE_SEGMENTS`-gon approximation of that
/// circle, so the match is within a small relative tolerance rather than
/// exact).
#[test]
fn polygon_clearance_around_a_via_leaves_one_circular_hole() {
    let mut board = Board::new(Box::new(0, 0, 50_000, 50_000), 1);
    let handle = board.push_polygon(pcb_geom::PolygonPlane {
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
    board.geometry.vias.push(pcb_geom::Via {
        center: Point::new(25_000, 25_000),
        copper_dia: 2_000,
        drill_dia: 800,
        keepaway: 500,
        net: NetId(1),
    });

    init_clip(&mut board, handle, true);

    let clipped = board.clearance.clipped(handle).expect("clip entry present");
    assert_eq!(clipped.len(), 1);
    assert_eq!(clipped[0].holes.len(), 1);

    let outer_area = signed_area2(&clipped[0].outer).abs() / 2;
    let hole_area: i64 = clipped[0].holes.iter().map(|h| signed_area2(h).abs() / 2).sum();
    let actual = outer_area - hole_area;
    let radius = 1_250.0_f64; // (2000 + 500 + 1) / 2, per `pcb_clearance::shapes::via_poly`.
    let expected = 50_000.0_f64 * 50_000.0 - core::f64::consts::PI * radius * radius;
    let relative_error = ((actual as f64) - expected).abs() / expected;
    assert!(relative_error < 0.01, "actual {actual}, expected ~{expected}, relative error {relative_error}");
}

/// Scenario 4: one placeable component with a single two-pin net to a fixed
/// point converges so the component ends up near that fixed point.
#[test]
fn annealer_pulls_single_component_toward_fixed_pin() {
    let mut board = Board::new(Box::new(0, 0, mil_to_coord(4_000), mil_to_coord(4_000)), 1);
    let fixed_point = Point::new(mil_to_coord(3_000), mil_to_coord(3_000));
    let component = Component {
        id: ComponentId(0),
        name_prefix: "R".into(),
        position: Point::new(mil_to_coord(200), mil_to_coord(200)),
        rotation: Rotation::Deg0,
        side: Side::Top,
        local_outline: Box::new(-mil_to_coord(20), -mil_to_coord(20), mil_to_coord(20), mil_to_coord(20)),
        pads: std::vec::Vec::from([LocalPad { offset: Point::new(0, 0), net: NetId(1), is_smd: true }]),
        fixed: false,
    };
    board.components.push(component);
    board.selected.push(0);
    board.nets = NetList::new(std::vec::Vec::from([Net {
        id: NetId(1),
        pins: std::vec::Vec::from([
            PinRef::Component { component: ComponentId(0), pad_index: 0 },
            PinRef::Fixed(fixed_point),
        ]),
    }]));
    board.nets.update_xy(&board.components);

    let initial_distance = board.components[0].position.manhattan(fixed_point);

    let mut ctx = Context::with_seed(Config::default(), 3);
    let result = ctx.auto_place_selected(&mut board);

    let final_distance = board.components[0].position.manhattan(fixed_point);
    assert!(result.changed);
    assert!(
        final_distance < initial_distance,
        "expected the component to move toward the fixed pin: {initial_distance} -> {final_distance}"
    );
    assert!(final_distance <= mil_to_coord(20) as i64, "expected convergence near the fixed pin, got {final_distance}");
}

/// Scenario 5: four nets that would conflict under naive ordering all route
/// cleanly after the pass driver's rip-up-and-retry.
#[test]
fn rip_up_resolves_conflicting_nets() {
    let mut board = Board::new(Box::new(0, 0, mil_to_coord(2_000), mil_to_coord(2_000)), 1);
    // Two crossing diagonals of pin pairs: naive net-by-net routing of
    // these on one layer forces at least one rip-up-and-retry cycle before
    // every subnet is connected.
    let endpoints = [
        (mil_to_coord(100), mil_to_coord(100), mil_to_coord(1_900), mil_to_coord(1_900)),
        (mil_to_coord(1_900), mil_to_coord(100), mil_to_coord(100), mil_to_coord(1_900)),
        (mil_to_coord(100), mil_to_coord(1_000), mil_to_coord(1_900), mil_to_coord(1_000)),
        (mil_to_coord(1_000), mil_to_coord(100), mil_to_coord(1_000), mil_to_coord(1_900)),
    ];
    for (i, &(x1, y1, x2, y2)) in endpoints.iter().enumerate() {
        let net = NetId(i as u32 + 1);
        board.geometry.pins.push(Pin {
            center: Point::new(x1, y1),
            copper_dia: mil_to_coord(20),
            drill_dia: mil_to_coord(10),
            keepaway: mil_to_coord(5),
            shape: PinShape::Round,
            net,
            thermal: false,
        });
        board.geometry.pins.push(Pin {
            center: Point::new(x2, y2),
            copper_dia: mil_to_coord(20),
            drill_dia: mil_to_coord(10),
            keepaway: mil_to_coord(5),
            shape: PinShape::Round,
            net,
            thermal: false,
        });
    }

    let mut ctx = Context::with_seed(scenario_config(), 4);
    let result = ctx.auto_route(&mut board, false);

    assert_eq!(
        result.subnets_routed, result.subnets_total,
        "expected every subnet routed after rip-up across refinement passes"
    );
}

/// Scenario 6: the symmetric difference of a square with itself is empty.
#[test]
fn xor_of_identical_squares_is_empty() {
    let square = PolyArea::simple(std::vec::Vec::from([
        Point::new(0, 0),
        Point::new(10_000, 0),
        Point::new(10_000, 10_000),
        Point::new(0, 10_000),
    ]));
    let a = std::vec::Vec::from([square.clone()]);
    let b = std::vec::Vec::from([square]);
    let result = xor_ref(&a, &b);
    assert!(result.is_empty(), "A xor A should be empty, got {result:?}");
}
