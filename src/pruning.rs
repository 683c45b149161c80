//! Search-space pruning for the burrow solver.
//!
//! Two mechanisms keep the branch-and-bound search tractable: the global
//! best-completed-energy bound (candidates already at or above it can never
//! improve the answer, since every move costs energy) and a dedup index of
//! previously generated placements. The index is keyed by placement alone and
//! records the minimum energy at which each placement was reached; a candidate
//! is admitted only when it beats that minimum. Neither mechanism changes the
//! final answer, only how much of the tree gets explored.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::burrow::{Placement, State};

/// Dedup index over previously seen placements.
pub struct SeenStates {
    best_by_placement: FxHashMap<Placement, u32>,
    enabled: bool,
    recorded: usize,
}

impl SeenStates {
    pub fn new(enabled: bool) -> SeenStates {
        SeenStates {
            best_by_placement: FxHashMap::default(),
            enabled,
            recorded: 0,
        }
    }

    /// Admit a placement reached at the given energy, recording it if it is
    /// new or strictly cheaper than every earlier visit. Returns `false` when
    /// an equal-or-better visit already exists. Always admits when disabled.
    pub fn admit(&mut self, placement: Placement, energy: u32) -> bool {
        if !self.enabled {
            return true;
        }
        match self.best_by_placement.entry(placement) {
            Entry::Occupied(mut entry) => {
                if energy < *entry.get() {
                    *entry.get_mut() = energy;
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(energy);
                self.recorded += 1;
                true
            }
        }
    }

    /// Number of distinct placements recorded.
    pub fn recorded(&self) -> usize {
        self.recorded
    }
}

/// Combined admission check for a candidate successor state: inside the global
/// best bound, and not a repeat visit of an already-cheaper placement.
pub fn admit_candidate(seen: &mut SeenStates, best_energy: u32, candidate: &State) -> bool {
    candidate.energy_used <= best_energy && seen.admit(candidate.placement(), candidate.energy_used)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(positions: &[u8]) -> Placement {
        positions.iter().copied().collect()
    }

    #[test]
    fn first_visit_is_admitted() {
        let mut seen = SeenStates::new(true);
        assert!(seen.admit(placement(&[1, 2, 3]), 100));
        assert_eq!(seen.recorded(), 1);
    }

    #[test]
    fn equal_or_worse_revisits_are_rejected() {
        let mut seen = SeenStates::new(true);
        assert!(seen.admit(placement(&[1, 2, 3]), 100));
        assert!(!seen.admit(placement(&[1, 2, 3]), 100));
        assert!(!seen.admit(placement(&[1, 2, 3]), 150));
    }

    #[test]
    fn cheaper_revisit_is_admitted_and_tightens_the_record() {
        let mut seen = SeenStates::new(true);
        assert!(seen.admit(placement(&[1, 2, 3]), 100));
        assert!(seen.admit(placement(&[1, 2, 3]), 60));
        assert!(!seen.admit(placement(&[1, 2, 3]), 80));
        // Still a single distinct placement.
        assert_eq!(seen.recorded(), 1);
    }

    #[test]
    fn distinct_placements_do_not_collide() {
        let mut seen = SeenStates::new(true);
        assert!(seen.admit(placement(&[1, 2, 3]), 100));
        assert!(seen.admit(placement(&[3, 2, 1]), 100));
        assert_eq!(seen.recorded(), 2);
    }

    #[test]
    fn disabled_index_admits_everything() {
        let mut seen = SeenStates::new(false);
        assert!(seen.admit(placement(&[1, 2, 3]), 100));
        assert!(seen.admit(placement(&[1, 2, 3]), 100));
        assert!(seen.admit(placement(&[1, 2, 3]), 500));
    }

    #[test]
    fn candidates_above_the_bound_are_rejected() {
        let mut seen = SeenStates::new(true);
        let cheap = State::new([1usize, 2], 10);
        let expensive = State::new([2usize, 1], 500);
        assert!(admit_candidate(&mut seen, 100, &cheap));
        assert!(!admit_candidate(&mut seen, 100, &expensive));
    }
}
