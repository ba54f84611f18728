// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sanity-checks the hand-rolled [`RTree`] against `rstar`'s bulk-loaded
//! tree on the same grid workload. `spec.md` §9's design notes call for a
//! from-scratch Guttman-style tree (no generic external dependency sits at
//! the object-identity seam an R-tree entry needs), but a from-scratch
//! implementation is only worth keeping if it isn't dramatically slower
//! than the ecosystem's own answer.

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pcb_geom::Box;
use pcb_spatial::{Backend, RTree};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree as ExternalRTree};

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

fn to_rstar_rects(boxes: &[Box]) -> Vec<Rectangle<[i32; 2]>> {
    boxes.iter().map(|b| Rectangle::from_corners([b.x1, b.y1], [b.x2, b.y2])).collect()
}

fn bench_build_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare");
    for &n in &[64usize, 128] {
        let boxes = gen_grid_boxes(n, 100);
        let query = Box::new(1_000, 1_000, 5_000, 5_000);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("pcb_spatial_build_query_n{n}"), |b| {
            b.iter_batched(
                || boxes.clone(),
                |boxes| {
                    let mut idx = RTree::<u32>::new();
                    for (i, bx) in boxes.into_iter().enumerate() {
                        idx.insert(bx, i as u32);
                    }
                    let hits = idx.query_region(query).len();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("rstar_bulk_build_query_n{n}"), |b| {
            b.iter_batched(
                || to_rstar_rects(&boxes),
                |rects| {
                    let tree = ExternalRTree::bulk_load(rects);
                    let envelope = AABB::from_corners([query.x1, query.y1], [query.x2, query.y2]);
                    let hits: usize = tree.locate_in_envelope_intersecting(&envelope).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_query);
criterion_main!(benches);
