// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end autorouter benchmark: builds a board of unobstructed two-pin
//! nets (the `spec.md` §8.4 scenario 1 shape, scaled to `n` nets on a grid)
//! and times a full [`pcb_core::Context::auto_route`] run across all
//! configured passes.

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pcb_core::{Config, Context};
use pcb_geom::{mil_to_coord, Box, NetId, Pin, PinShape, Point};

fn build_board(n: usize) -> pcb_core::Board {
    let pitch = mil_to_coord(400);
    let width = mil_to_coord(200) + (n as i32 + 1) * pitch;
    let mut board = pcb_core::Board::new(Box::new(0, 0, width, mil_to_coord(2_000)), 1);
    for i in 0..n {
        let x = mil_to_coord(100) + i as i32 * pitch;
        let net = NetId(i as u32 + 1);
        board.geometry.pins.push(Pin {
            center: Point::new(x, mil_to_coord(500)),
            copper_dia: mil_to_coord(60),
            drill_dia: mil_to_coord(30),
            keepaway: mil_to_coord(5),
            shape: PinShape::Round,
            net,
            thermal: false,
        });
        board.geometry.pins.push(Pin {
            center: Point::new(x, mil_to_coord(1_500)),
            copper_dia: mil_to_coord(60),
            drill_dia: mil_to_coord(30),
            keepaway: mil_to_coord(5),
            shape: PinShape::Round,
            net,
            thermal: false,
        });
    }
    board
}

fn bench_auto_route(c: &mut Criterion) {
    let mut group = c.benchmark_group("router_auto_route");
    group.sample_size(10);
    for &n in &[4usize, 16] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter_batched(
                || (build_board(n), Context::with_seed(Config { passes: 4, smoothes: 1, ..Config::default() }, 7)),
                |(mut board, mut ctx)| {
                    ctx.auto_route(&mut board, false);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_auto_route);
criterion_main!(benches);
