// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for [`pcb_heap::Heap`], the A*-style open-set priority queue
//! `pcb_router::route_one` drains one edge at a time. The workload shapes
//! (insert-then-drain, and interleaved insert/extract as the router's
//! expansion loop actually does it) mirror one call to `route_one`'s heap
//! usage rather than a synthetic heap-sort.

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pcb_heap::Heap;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn next_f64(&mut self) -> f64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn gen_costs(n: usize) -> Vec<f64> {
    let mut rng = Rng(0x5EED_1234_9988_7766);
    (0..n).map(|_| rng.next_f64() * 1.0e6).collect()
}

fn bench_insert_then_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap_insert_then_drain");
    for &n in &[256usize, 1_024, 4_096] {
        let costs = gen_costs(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter_batched(
                Heap::<u32>::new,
                |mut heap| {
                    for (i, &cost) in costs.iter().enumerate() {
                        heap.insert(cost, i as u32);
                    }
                    let mut total = 0usize;
                    while heap.remove_smallest().is_some() {
                        total += 1;
                    }
                    black_box(total)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// One open-set cycle from `route_one`: pop the cheapest edge, expand it
/// into a handful of successor edges, push those back.
fn bench_expand_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap_expand_cycle");
    let fan_out = 4usize;
    for &steps in &[256usize, 1_024] {
        group.throughput(Throughput::Elements(steps as u64));
        group.bench_function(BenchmarkId::from_parameter(steps), |b| {
            b.iter_batched(
                || {
                    let mut heap = Heap::<u32>::new();
                    heap.insert(0.0, 0);
                    heap
                },
                |mut heap| {
                    let mut rng = Rng(0xABCD_EF01_2345_6789);
                    let mut next_id = 1u32;
                    for _ in 0..steps {
                        let Some(popped) = heap.remove_smallest() else { break };
                        for _ in 0..fan_out {
                            heap.insert(rng.next_f64() * 1.0e6, next_id);
                            next_id += 1;
                        }
                        black_box(popped);
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert_then_drain, bench_expand_cycle);
criterion_main!(benches);
