//! # Candidate
//!
//! A `Candidate` is one solution known to the selector: the objective vector
//! reported by the variator and a counter of how often it has been chosen as a
//! parent. Candidates are addressed by an [`Identity`] that the variator
//! assigns; the selector never invents identities.
//!
//! ## Example
//!
//! ```rust
//! use femo::candidate::Candidate;
//!
//! let a = Candidate::new(vec![1.0, 3.0]);
//! let b = Candidate::new(vec![2.0, 3.0]);
//!
//! assert!(a.dominates(&b));
//! assert!(!b.dominates(&a));
//! assert_eq!(a.selection_count(), 0);
//! ```

use crate::selection::dominance;

/// Identity of a candidate, as written in the shared exchange files.
pub type Identity = usize;

/// One member of the population.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    objectives: Vec<f64>,
    selection_count: u32,
}

impl Candidate {
    /// Creates a candidate that has never been selected.
    pub fn new(objectives: Vec<f64>) -> Self {
        Self {
            objectives,
            selection_count: 0,
        }
    }

    /// The objective values, one per objective, all minimized.
    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    /// How many times this candidate has been chosen as a parent.
    pub fn selection_count(&self) -> u32 {
        self.selection_count
    }

    /// Records one more selection and returns the updated count.
    pub fn record_selection(&mut self) -> u32 {
        self.selection_count = self.selection_count.saturating_add(1);
        self.selection_count
    }

    /// Pareto dominance under minimization. See [`dominance::dominates`].
    pub fn dominates(&self, other: &Candidate) -> bool {
        dominance::dominates(&self.objectives, &other.objectives)
    }

    /// True when both candidates have identical objective values.
    pub fn is_equal(&self, other: &Candidate) -> bool {
        dominance::is_equal(&self.objectives, &other.objectives)
    }
}
