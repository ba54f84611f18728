// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compares the hand-rolled [`RTree`] against the [`FlatVec`] linear-scan
//! baseline over the insert/commit/query shapes `pcb_router`'s data
//! preparation and `pcb_mts` actually drive: a grid of same-size boxes (one
//! pin per footprint pad site) and an overlapping grid (pads bloated past
//! their neighbors, as `RouteStyle::bloat` produces on a dense board).

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pcb_geom::Box;
use pcb_spatial::{Backend, FlatVec, RTree};

fn gen_grid_boxes(n: usize, cell: i32) -> Vec<Box> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n as i32 {
        for x in 0..n as i32 {
            let x0 = x * cell;
            let y0 = y * cell;
            out.push(Box::new(x0, y0, x0 + cell, y0 + cell));
        }
    }
    out
}

fn gen_overlap_grid_boxes(n: usize, cell: i32, bloat: i32) -> Vec<Box> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n as i32 {
        for x in 0..n as i32 {
            let x0 = x * cell;
            let y0 = y * cell;
            out.push(Box::new(x0 - bloat, y0 - bloat, x0 + cell + bloat, y0 + cell + bloat));
        }
    }
    out
}

fn bench_insert<B: Backend<u32> + Default>(b: &mut criterion::Bencher, boxes: &[Box]) {
    b.iter_batched(
        B::default,
        |mut idx| {
            for (i, bx) in boxes.iter().copied().enumerate() {
                idx.insert(bx, i as u32);
            }
            idx
        },
        BatchSize::SmallInput,
    );
}

fn bench_insert_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_grid");
    for &n in &[32usize, 64, 128] {
        let boxes = gen_grid_boxes(n, 100);
        group.throughput(Throughput::Elements(boxes.len() as u64));
        group.bench_function(BenchmarkId::new("RTree", n), |b| bench_insert::<RTree<u32>>(b, &boxes));
        group.bench_function(BenchmarkId::new("FlatVec", n), |b| bench_insert::<FlatVec<u32>>(b, &boxes));
    }
    group.finish();
}

fn bench_query_region<B: Backend<u32> + Default>(b: &mut criterion::Bencher, boxes: &[Box], queries: &[Box]) {
    let mut idx = B::default();
    for (i, bx) in boxes.iter().copied().enumerate() {
        idx.insert(bx, i as u32);
    }
    b.iter(|| {
        let mut total = 0usize;
        for &q in queries {
            total += idx.query_region(q).len();
        }
        black_box(total)
    });
}

fn bench_query_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_region_grid");
    for &n in &[32usize, 64, 128] {
        let boxes = gen_grid_boxes(n, 100);
        let extent = n as i32 * 100;
        let queries: Vec<Box> = (0..200)
            .map(|i| {
                let x0 = (i * 37) % extent;
                let y0 = (i * 53) % extent;
                Box::new(x0, y0, x0 + 500, y0 + 500)
            })
            .collect();
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(BenchmarkId::new("RTree", n), |b| bench_query_region::<RTree<u32>>(b, &boxes, &queries));
        group.bench_function(BenchmarkId::new("FlatVec", n), |b| bench_query_region::<FlatVec<u32>>(b, &boxes, &queries));
    }
    group.finish();
}

fn bench_insert_overlap(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_overlap_grid");
    for &n in &[32usize, 64, 128] {
        let boxes = gen_overlap_grid_boxes(n, 100, 30);
        group.throughput(Throughput::Elements(boxes.len() as u64));
        group.bench_function(BenchmarkId::new("RTree", n), |b| bench_insert::<RTree<u32>>(b, &boxes));
        group.bench_function(BenchmarkId::new("FlatVec", n), |b| bench_insert::<FlatVec<u32>>(b, &boxes));
    }
    group.finish();
}

fn bench_any_intersects(c: &mut Criterion) {
    let mut group = c.benchmark_group("any_intersects_grid");
    let boxes = gen_grid_boxes(96, 100);
    let mut rtree = RTree::<u32>::new();
    let mut flat = FlatVec::<u32>::new();
    for (i, bx) in boxes.iter().copied().enumerate() {
        rtree.insert(bx, i as u32);
        flat.insert(bx, i as u32);
    }
    let miss = Box::new(-5_000, -5_000, -4_000, -4_000);
    group.bench_function("RTree_miss", |b| b.iter(|| black_box(rtree.any_intersects(miss))));
    group.bench_function("FlatVec_miss", |b| b.iter(|| black_box(flat.any_intersects(miss))));
    group.finish();
}

criterion_group!(benches, bench_insert_grid, bench_insert_overlap, bench_query_grid, bench_any_intersects);
criterion_main!(benches);
