// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PCB Heap: a binary min-priority queue keyed by floating-point cost,
//! ported from `heap.c`.
//!
//! The original is a 1-indexed implicit binary heap (`element[0]` reserved
//! as a sentinel) over `(cost: f64, data: void*)` pairs, with the invariant
//! `parent.cost <= child.cost`, grown by `realloc` doubling. This port
//! keeps that invariant and the same operation set (`insert`,
//! `remove_smallest`, `replace`, bulk `free`) over a plain 0-indexed `Vec`;
//! the original's sentinel-slot trick for `heap_replace` (overwrite slot 0
//! as scratch space, then sift down from there) was a `malloc`-avoidance
//! measure that has no equivalent benefit over a `Vec`, so `replace` here
//! is expressed directly as "overwrite the root, then sift down" without
//! a parallel unused slot.
//!
//! Costs are wrapped in [`ordered_float::OrderedFloat`] so the heap gets a
//! real `Ord` bound instead of hand-rolling `f64` comparisons at every call
//! site, the same role `ordered-float` plays elsewhere in the Rust PCB/EDA
//! ecosystem this crate draws on.

use ordered_float::OrderedFloat;

type Cost = OrderedFloat<f64>;

struct Entry<T> {
    cost: Cost,
    data: T,
}

/// A binary min-heap keyed by `f64` cost, carrying an arbitrary payload.
///
/// Lower cost is "smaller" and comes out first. Ties break in arbitrary
/// order (the heap is not stable); callers that need deterministic
/// tie-breaking should fold a secondary key into `cost` (e.g.
/// `cost + tiny_epsilon * insertion_index`), exactly as the router does for
/// its edge ordering.
pub struct Heap<T> {
    elements: std::vec::Vec<Entry<T>>,
}

impl<T> Default for Heap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Heap<T> {
    /// Create an empty heap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: std::vec::Vec::new(),
        }
    }

    /// Number of entries in the heap (`heap_size`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the heap holds no entries (`heap_is_empty`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Insert `data` with the given `cost` (`heap_insert`).
    pub fn insert(&mut self, cost: f64, data: T) {
        self.elements.push(Entry {
            cost: OrderedFloat(cost),
            data,
        });
        self.upheap(self.elements.len() - 1);
    }

    /// Peek at the smallest entry's cost without removing it.
    #[must_use]
    pub fn peek_cost(&self) -> Option<f64> {
        self.elements.first().map(|e| e.cost.into_inner())
    }

    /// Remove and return the smallest entry's data (`heap_remove_smallest`).
    /// Returns `None` if the heap is empty.
    pub fn remove_smallest(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.elements.len() - 1;
        self.elements.swap(0, last);
        let smallest = self.elements.pop().expect("checked non-empty above");
        if !self.elements.is_empty() {
            self.downheap(0);
        }
        Some(smallest.data)
    }

    /// Replace the smallest entry with a new `(cost, data)` pair and return
    /// the data that used to be smallest, or `data` itself if the heap was
    /// empty (`heap_replace`). Equivalent to `remove_smallest` immediately
    /// followed by `insert`, but does one sift-down instead of a sift-down
    /// followed by a sift-up.
    pub fn replace(&mut self, cost: f64, data: T) -> T {
        if self.elements.is_empty() {
            return data;
        }
        let old = std::mem::replace(
            &mut self.elements[0],
            Entry {
                cost: OrderedFloat(cost),
                data,
            },
        );
        self.downheap(0);
        old.data
    }

    /// Drop every entry, running `freefunc` on each payload in heap (not
    /// sorted) order (`heap_free`).
    pub fn free_with<F: FnMut(T)>(&mut self, mut freefunc: F) {
        for entry in self.elements.drain(..) {
            freefunc(entry.data);
        }
    }

    /// `__upheap`: sift the entry at `k` up until its parent is no larger.
    fn upheap(&mut self, mut k: usize) {
        while k > 0 {
            let parent = (k - 1) / 2;
            if self.elements[parent].cost <= self.elements[k].cost {
                break;
            }
            self.elements.swap(parent, k);
            k = parent;
        }
    }

    /// `__downheap`: sift the entry at `k` down until both children are no
    /// smaller.
    fn downheap(&mut self, k: usize) {
        let len = self.elements.len();
        let mut k = k;
        loop {
            let left = 2 * k + 1;
            let right = left + 1;
            let mut smallest = k;
            if left < len && self.elements[left].cost < self.elements[smallest].cost {
                smallest = left;
            }
            if right < len && self.elements[right].cost < self.elements[smallest].cost {
                smallest = right;
            }
            if smallest == k {
                break;
            }
            self.elements.swap(k, smallest);
            k = smallest;
        }
    }
}
