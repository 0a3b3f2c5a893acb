use std::fmt::Debug;

use crate::candidate::Identity;
use crate::error::Result;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

/// Trait for parent selection strategies run by the selector.
///
/// A strategy receives the population after new candidates have been
/// inserted, may remove candidates from it, and returns the identities of the
/// parents to hand back to the variator.
///
/// # Examples
///
/// ```
/// use femo::population::Population;
/// use femo::rng::RandomNumberGenerator;
/// use femo::selection::{FemoSelection, SelectionStrategy};
///
/// let mut population = Population::with_capacity(8);
/// population.insert(0, vec![1.0, 5.0]).unwrap();
/// population.insert(1, vec![2.0, 3.0]).unwrap();
/// population.insert(2, vec![5.0, 5.0]).unwrap();
///
/// let mut rng = RandomNumberGenerator::from_seed(1);
/// let parents = FemoSelection::new()
///     .select(&mut population, &[0, 1, 2], 2, &mut rng)
///     .unwrap();
///
/// assert_eq!(parents.len(), 2);
/// assert!(!population.contains(2));
/// ```
pub trait SelectionStrategy: Debug {
    /// Updates the population with respect to `new_identities` and selects
    /// parents from it.
    ///
    /// # Arguments
    ///
    /// * `population` - The live population, already holding the new candidates.
    /// * `new_identities` - Identities ingested this round, in file order.
    /// * `num_to_select` - The number of parents to select.
    /// * `rng` - The random number generator used for tie-breaking.
    ///
    /// # Returns
    ///
    /// The identities of the selected parents, possibly with repetitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the population runs empty before `num_to_select`
    /// parents were chosen, or if the population rejects an update.
    fn select(
        &self,
        population: &mut Population,
        new_identities: &[Identity],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Identity>>;
}
