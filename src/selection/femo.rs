//! # FEMO selection
//!
//! Fair Evolutionary Multiobjective Optimizer. The population is kept as a
//! Pareto archive: every round, newly ingested candidates evict what they
//! dominate and are themselves dropped if anything live dominates or equals
//! them. Parents are then drawn from the archive, always among the candidates
//! selected least often so far, with ties broken uniformly at random.

use tracing::debug;

use crate::candidate::Identity;
use crate::error::{OptionExt, Result, SelectorError};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::SelectionStrategy;

/// The FEMO archive update and fairness selection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct FemoSelection;

impl FemoSelection {
    pub fn new() -> Self {
        Self
    }

    /// Updates the archive with respect to the new candidates.
    ///
    /// First, in input order, each still-live new candidate removes every
    /// other live candidate it dominates. Then, in reverse input order, each
    /// still-live new candidate is removed if another live candidate
    /// dominates it or has identical objectives. The reverse order decides
    /// which of several identical new candidates survives: the one listed
    /// first.
    ///
    /// Identities in `new_identities` that are not live are skipped.
    pub fn prune(&self, population: &mut Population, new_identities: &[Identity]) -> Result<()> {
        for &new_identity in new_identities {
            let Some(new_candidate) = population.get(new_identity) else {
                continue;
            };
            let dominated: Vec<Identity> = population
                .iter()
                .filter(|&(identity, candidate)| {
                    identity != new_identity && new_candidate.dominates(candidate)
                })
                .map(|(identity, _)| identity)
                .collect();

            for identity in dominated {
                population.remove(identity)?;
            }
        }

        for &new_identity in new_identities.iter().rev() {
            let Some(new_candidate) = population.get(new_identity) else {
                continue;
            };
            let beaten = population.iter().any(|(identity, candidate)| {
                identity != new_identity
                    && (candidate.dominates(new_candidate) || candidate.is_equal(new_candidate))
            });

            if beaten {
                population.remove(new_identity)?;
            }
        }

        Ok(())
    }

    /// Chooses one parent among the live candidates with the lowest selection
    /// count and increments its count.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::SelectionFailed`] if the population is empty.
    pub fn choose(
        &self,
        population: &mut Population,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Identity> {
        let mut lowest = u32::MAX;
        let mut ties = Vec::new();
        for (identity, candidate) in population.iter() {
            let count = candidate.selection_count();
            if count < lowest {
                lowest = count;
                ties.clear();
            }
            if count == lowest {
                ties.push(identity);
            }
        }

        let pick = rng.pick_index(ties.len()).ok_or_else_selector(|| {
            SelectorError::SelectionFailed("no live candidate to choose from".to_string())
        })?;
        let chosen = ties[pick];
        population.record_selection(chosen)?;
        Ok(chosen)
    }
}

impl SelectionStrategy for FemoSelection {
    fn select(
        &self,
        population: &mut Population,
        new_identities: &[Identity],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Identity>> {
        let before = population.size();
        self.prune(population, new_identities)?;
        debug!(
            before,
            after = population.size(),
            new = new_identities.len(),
            "archive updated"
        );

        if population.is_empty() {
            return Err(SelectorError::SelectionFailed(format!(
                "population is empty, {} parents requested",
                num_to_select
            )));
        }

        (0..num_to_select)
            .map(|_| self.choose(population, rng))
            .collect()
    }
}
