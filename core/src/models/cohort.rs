//! Cohort state
//!
//! The mutable per-cohort counts of a running simulation, indexed in the
//! config's cohort order.
//!
//! # Critical Invariants
//!
//! 1. **Non-negativity**: every count is finite and >= 0 at every
//!    observable point (the engine clamps rounding dust and treats a real
//!    negative as a defect)
//! 2. **Conservation**: the total only changes through mortality and
//!    birth transitions; advancement moves individuals without changing
//!    the total

use crate::models::trajectory::Snapshot;

/// Current count of individuals in each cohort category.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortState {
    /// Counts in config cohort order
    counts: Vec<f64>,
}

impl CohortState {
    /// Create a state from initial counts.
    pub fn new(counts: Vec<f64>) -> Self {
        Self { counts }
    }

    /// Number of cohort categories.
    pub fn num_cohorts(&self) -> usize {
        self.counts.len()
    }

    /// Count for a single cohort.
    pub fn count(&self, idx: usize) -> f64 {
        self.counts[idx]
    }

    /// All counts, in cohort order.
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Mutable counts, for the engine's step application.
    pub(crate) fn counts_mut(&mut self) -> &mut [f64] {
        &mut self.counts
    }

    /// Total population across all cohorts.
    pub fn total_population(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// Snapshot the counts into a name → count map (sorted by name, so
    /// serialization is byte-stable).
    ///
    /// # Panics
    ///
    /// Panics if `names` does not match the cohort count; the config and
    /// state are always constructed together, so a mismatch is a defect.
    pub fn snapshot(&self, names: &[String]) -> Snapshot {
        assert_eq!(
            names.len(),
            self.counts.len(),
            "cohort name list does not match state width"
        );
        names
            .iter()
            .cloned()
            .zip(self.counts.iter().copied())
            .collect()
    }
}
