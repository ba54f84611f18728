// Copyright 2026 the PCB Core Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The resumable "vetting" search, ported from `mtspace_query_rect`'s
//! `qloop`/`query_one` pair.
//!
//! The original threads a candidate box through three R-trees in sequence
//! (fixed obstacles, the current pass's parity, the other parity) via a
//! chain of work vectors (`untested` -> `no_fix` -> `no_hi` -> an answer
//! vector), splitting a candidate into up to four sub-rectangles around
//! whichever single obstacle it first overlaps and requeuing the pieces,
//! one `longjmp`-terminated `r_search` call at a time. This module keeps
//! the same three-stage, split-and-requeue shape over plain `Vec` stacks
//! (LIFO, matching the original's `vector_remove_last`) instead of the
//! `setjmp`/`longjmp` early-exit.

use pcb_geom::{Box, Coord};

use crate::{Mts, Parity};

/// Which tier of "free enough" a returned region falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictClass {
    /// Touches no obstacle at all.
    Free,
    /// Touches only obstacles from the *other* (non-current) pass parity.
    LoConflict,
    /// Touches an obstacle from the *current* pass parity -- harder to
    /// accept, offered only when routing-with-conflicts is enabled.
    HiConflict,
}

/// One candidate region returned by [`VettingHandle::next_region`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeRegion {
    /// The region's bounds.
    pub bounds: Box,
    /// Which conflict tier it was found in.
    pub conflict: ConflictClass,
}

/// A resumable search for empty rectangular space, returned by
/// [`Mts::find_free_space`].
///
/// Call [`VettingHandle::next_region`] repeatedly; each call does some
/// work and returns at most one candidate region, so a caller that only
/// needs one good via site can stop as soon as it likes without paying for
/// the rest of the search. Calling it again after it returns `None`
/// resumes nothing further (the search is exhausted); this mirrors the
/// original's `mtsFreeWork` call once `mtspace_query_rect` itself returns
/// `NULL`.
#[derive(Debug)]
pub struct VettingHandle {
    radius: Coord,
    keepaway: Coord,
    is_odd: bool,
    with_conflicts: bool,
    untested: Vec<Box>,
    no_fix: Vec<Box>,
    no_hi: Vec<Box>,
    hi_candidates: Vec<Box>,
    exhausted: bool,
}

impl VettingHandle {
    pub(crate) fn new(region: Box, radius: Coord, keepaway: Coord, is_odd: bool, with_conflicts: bool) -> Self {
        let seed = region.inflate(radius + keepaway);
        Self {
            radius,
            keepaway,
            is_odd,
            with_conflicts,
            untested: std::vec::Vec::from([seed]),
            no_fix: std::vec::Vec::new(),
            no_hi: std::vec::Vec::new(),
            hi_candidates: std::vec::Vec::new(),
            exhausted: false,
        }
    }

    fn min_dimension(&self) -> Coord {
        2 * (self.radius + self.keepaway)
    }

    fn current_pass_tree(&self) -> Parity {
        if self.is_odd {
            Parity::Odd
        } else {
            Parity::Even
        }
    }

    fn other_pass_tree(&self) -> Parity {
        if self.is_odd {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    /// Split `candidate` around one obstacle it overlaps (`shrink` already
    /// computed as the effective keepaway), producing up to four
    /// non-overlapping sub-rectangles that avoid it, dropping any that
    /// would end up thinner than `min_dimension` on the axis being split
    /// (`query_one`'s four `if` blocks).
    fn split(&self, candidate: Box, obstacle: Box, shrink: Coord) -> std::vec::Vec<Box> {
        let min_dim = self.min_dimension();
        let mut out = std::vec::Vec::new();
        if obstacle.y1 > candidate.y1 + shrink {
            let y2 = obstacle.y1 + shrink;
            if y2 - candidate.y1 >= min_dim {
                out.push(Box::new_unchecked(candidate.x1, candidate.y1, candidate.x2, y2));
            }
        }
        if obstacle.y2 < candidate.y2 - shrink {
            let y1 = obstacle.y2 - shrink;
            if candidate.y2 - y1 >= min_dim {
                out.push(Box::new_unchecked(candidate.x1, y1, candidate.x2, candidate.y2));
            }
        }
        if obstacle.x1 > candidate.x1 + shrink {
            let x2 = obstacle.x1 + shrink;
            if x2 - candidate.x1 >= min_dim {
                out.push(Box::new_unchecked(candidate.x1, candidate.y1, x2, candidate.y2));
            }
        }
        if obstacle.x2 < candidate.x2 - shrink {
            let x1 = obstacle.x2 - shrink;
            if candidate.x2 - x1 >= min_dim {
                out.push(Box::new_unchecked(x1, candidate.y1, candidate.x2, candidate.y2));
            }
        }
        out
    }

    /// Run one step of the pipeline, returning the next free/conflicted
    /// region, or `None` once every candidate has been either resolved or
    /// pruned away.
    pub fn next_region(&mut self, mts: &Mts) -> Option<FreeRegion> {
        if self.exhausted {
            return None;
        }
        loop {
            if let Some(candidate) = self.untested.pop() {
                match mts.probe(Parity::Fixed, candidate, self.keepaway) {
                    None => self.no_fix.push(candidate),
                    Some((obstacle, shrink)) => {
                        self.untested.extend(self.split(candidate, obstacle, shrink));
                    }
                }
                continue;
            }

            if let Some(candidate) = self.no_fix.pop() {
                match mts.probe(self.current_pass_tree(), candidate, self.keepaway) {
                    None => self.no_hi.push(candidate),
                    Some((obstacle, shrink)) => {
                        if self.with_conflicts {
                            self.hi_candidates.push(candidate);
                        }
                        self.no_fix.extend(self.split(candidate, obstacle, shrink));
                    }
                }
                continue;
            }

            if let Some(candidate) = self.no_hi.pop() {
                match mts.probe(self.other_pass_tree(), candidate, self.keepaway) {
                    None => {
                        return Some(FreeRegion {
                            bounds: candidate,
                            conflict: ConflictClass::Free,
                        });
                    }
                    Some((obstacle, shrink)) => {
                        if self.with_conflicts {
                            return Some(FreeRegion {
                                bounds: candidate,
                                conflict: ConflictClass::LoConflict,
                            });
                        }
                        self.no_hi.extend(self.split(candidate, obstacle, shrink));
                    }
                }
                continue;
            }

            if self.with_conflicts
                && let Some(candidate) = self.hi_candidates.pop()
            {
                match mts.probe(self.other_pass_tree(), candidate, self.keepaway) {
                    None => {
                        return Some(FreeRegion {
                            bounds: candidate,
                            conflict: ConflictClass::HiConflict,
                        });
                    }
                    Some((obstacle, shrink)) => {
                        self.hi_candidates.extend(self.split(candidate, obstacle, shrink));
                    }
                }
                continue;
            }

            self.exhausted = true;
            return None;
        }
    }
}
