// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Step 4 of a Boolean operation (spec §4.2): classify the raw output rings
//! from the edge walk as outer boundaries or holes, then assign each hole
//! to the smallest containing outer. `polygon1.c` gets this for free from
//! its `PLINE` chain structure (a polygon's holes are already linked under
//! its outer); the walk here produces a flat list of rings instead, so
//! reassembly is an explicit pass.

use crate::boolean::PolyArea;
use crate::geometry::{point_in_contours, signed_area2, Contour};

/// Group raw output rings into [`PolyArea`]s: positive-area rings become
/// outer boundaries, negative-area rings become holes, and each hole is
/// assigned to the smallest-area outer ring whose region contains it.
/// Smallest-first ordering (via [`pcb_heap::Heap`], keyed by outer area) is
/// what keeps a hole from being mis-assigned to an enclosing outer when a
/// smaller, more specific outer also contains it.
#[must_use]
pub fn assemble_regions(raw: std::vec::Vec<Contour>) -> std::vec::Vec<PolyArea> {
    let mut outers: std::vec::Vec<Option<Contour>> = std::vec::Vec::new();
    let mut outer_areas: std::vec::Vec<i64> = std::vec::Vec::new();
    let mut holes: std::vec::Vec<Contour> = std::vec::Vec::new();

    for contour in raw {
        if contour.len() < 3 {
            continue;
        }
        let area2 = signed_area2(&contour);
        if area2 > 0 {
            outer_areas.push(area2);
            outers.push(Some(contour));
        } else if area2 < 0 {
            holes.push(contour);
        }
        // Zero-area (degenerate) rings are dropped.
    }

    let mut heap: pcb_heap::Heap<usize> = pcb_heap::Heap::new();
    for (i, &area2) in outer_areas.iter().enumerate() {
        heap.insert(area2 as f64, i);
    }

    let mut order = std::vec::Vec::with_capacity(outers.len());
    while let Some(i) = heap.remove_smallest() {
        order.push(i);
    }

    let mut regions: std::vec::Vec<PolyArea> = order
        .into_iter()
        .map(|i| PolyArea {
            outer: outers[i].take().expect("each outer index is used once"),
            holes: std::vec::Vec::new(),
        })
        .collect();

    'assign: for hole in holes {
        let Some(&probe) = hole.first() else {
            continue;
        };
        for region in &mut regions {
            if point_in_contours(probe, std::slice::from_ref(&region.outer)) {
                region.holes.push(hole);
                continue 'assign;
            }
        }
        // No containing outer: degenerate input, drop the orphaned hole.
    }

    regions
}
