// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks the simulated-annealing driver end to end on a small grid of
//! two-pad components daisy-chained net to net, the same fixture shape
//! `pcb_placer::netlist`'s own tests build, scaled up to a board-sized
//! component count.

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pcb_geom::{mil_to_coord, Box, NetId, Point, Side};
use pcb_placer::{
    auto_place_selected, Component, ComponentId, CostParameters, LocalPad, Net, NetList, Rotation,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn build_fixture(n: usize) -> (Vec<Component>, Vec<ComponentId>, NetList, Box) {
    let pitch = mil_to_coord(200);
    let mut components = Vec::with_capacity(n);
    let mut selected = Vec::with_capacity(n);
    let mut nets = Vec::with_capacity(n);

    for i in 0..n {
        let id = ComponentId(i as u32);
        components.push(Component {
            id,
            name_prefix: "R".into(),
            position: Point::new((i as i32 % 20) * pitch, (i as i32 / 20) * pitch),
            rotation: Rotation::Deg0,
            side: Side::Top,
            local_outline: Box::new(-mil_to_coord(30), -mil_to_coord(15), mil_to_coord(30), mil_to_coord(15)),
            pads: vec![
                LocalPad { offset: Point::new(-mil_to_coord(25), 0), net: NetId(i as u32), is_smd: true },
                LocalPad { offset: Point::new(mil_to_coord(25), 0), net: NetId(i as u32 + 1), is_smd: true },
            ],
            fixed: false,
        });
        selected.push(id);
    }
    // Chain nets: pad 1 of component i ties to pad 0 of component i+1, plus
    // a fixed anchor at each end so the net list has real endpoints.
    for i in 0..n {
        use pcb_placer::PinRef;
        let mut pins = vec![PinRef::Component { component: ComponentId(i as u32), pad_index: 1 }];
        if i + 1 < n {
            pins.push(PinRef::Component { component: ComponentId((i + 1) as u32), pad_index: 0 });
        } else {
            pins.push(PinRef::Fixed(Point::new(mil_to_coord(4_000), mil_to_coord(4_000))));
        }
        nets.push(Net { id: NetId(i as u32 + 1), pins });
    }

    let board = Box::new(0, 0, mil_to_coord(5_000), mil_to_coord(5_000));
    (components, selected, NetList::new(nets), board)
}

fn bench_auto_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("placer_auto_place_selected");
    group.sample_size(20);
    for &n in &[8usize, 32] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter_batched(
                || {
                    let (components, selected, mut nets, board) = build_fixture(n);
                    nets.update_xy(&components);
                    (components, selected, nets, board, StdRng::seed_from_u64(42))
                },
                |(mut components, selected, mut nets, board, mut rng)| {
                    let params = CostParameters::default();
                    auto_place_selected(&mut components, &selected, &mut nets, board, &params, &mut rng, None);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_auto_place);
criterion_main!(benches);
