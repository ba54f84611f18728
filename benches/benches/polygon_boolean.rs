// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks the Boolean engine on the shape `pcb_clearance`'s plow batches
//! actually drive: one large plane polygon with a grid of intruding pin/via
//! squares subtracted from it, plus a single union/intersection/xor pair at
//! increasing vertex count.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pcb_geom::Point;
use pcb_polygon::{intersection_ref, subtract_ref, union_ref, xor_ref, PolyArea};

fn square(x1: i32, y1: i32, x2: i32, y2: i32) -> PolyArea {
    PolyArea::simple(std::vec::Vec::from([
        Point::new(x1, y1),
        Point::new(x2, y1),
        Point::new(x2, y2),
        Point::new(x1, y2),
    ]))
}

fn bench_union_intersect_xor_overlapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("polygon_boolean_overlapping_squares");
    let a = std::vec::Vec::from([square(0, 0, 10_000, 10_000)]);
    let b = std::vec::Vec::from([square(5_000, 5_000, 15_000, 15_000)]);

    group.bench_function("union", |bch| bch.iter(|| black_box(union_ref(&a, &b))));
    group.bench_function("intersection", |bch| bch.iter(|| black_box(intersection_ref(&a, &b))));
    group.bench_function("subtract", |bch| bch.iter(|| black_box(subtract_ref(&a, &b))));
    group.bench_function("xor", |bch| bch.iter(|| black_box(xor_ref(&a, &b))));
    group.finish();
}

/// A plane polygon with `n` pin-sized squares subtracted in a single batch,
/// the shape `pcb_clearance::manager`'s batch flush actually performs (up
/// to 100 pin/via subtractions per flush, per `spec.md` §4.3).
fn bench_plow_batch_subtract(c: &mut Criterion) {
    let mut group = c.benchmark_group("polygon_plow_batch_subtract");
    for &n in &[8usize, 32, 100] {
        let side = (n as f64).sqrt().ceil() as i32;
        let plane = std::vec::Vec::from([square(0, 0, side * 2_000 + 2_000, side * 2_000 + 2_000)]);
        let mut intruders = std::vec::Vec::with_capacity(n);
        for i in 0..n {
            let row = i as i32 / side;
            let col = i as i32 % side;
            let cx = col * 2_000 + 1_000;
            let cy = row * 2_000 + 1_000;
            intruders.push(square(cx - 500, cy - 500, cx + 500, cy + 500).outer);
        }
        let intruder_areas: std::vec::Vec<PolyArea> = intruders.into_iter().map(PolyArea::simple).collect();
        // Union the batch first, exactly like `clear_from_polygon`'s batching.
        let mut merged = std::vec::Vec::from([intruder_areas[0].clone()]);
        for area in &intruder_areas[1..] {
            merged = union_ref(&merged, &std::vec::Vec::from([area.clone()]));
        }

        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::from_parameter(n), |bch| {
            bch.iter(|| black_box(subtract_ref(&plane, &merged)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_union_intersect_xor_overlapping, bench_plow_batch_subtract);
criterion_main!(benches);
