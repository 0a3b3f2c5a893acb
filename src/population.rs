//! # Population
//!
//! The `Population` is the selector's registry of live candidates, keyed by
//! the identities the variator hands out. Identities double as slot indices in
//! a growable arena: inserting is amortized O(1), lookups are O(1), and
//! traversal walks the slots in ascending identity order up to the highest
//! occupied identity.
//!
//! ## Example
//!
//! ```rust
//! use femo::population::Population;
//!
//! let mut population = Population::with_capacity(4);
//! population.insert(2, vec![1.0, 5.0]).unwrap();
//! population.insert(9, vec![2.0, 3.0]).unwrap();
//!
//! assert_eq!(population.size(), 2);
//! assert_eq!(population.capacity(), 16);
//! assert_eq!(population.identities().collect::<Vec<_>>(), vec![2, 9]);
//!
//! population.remove(9).unwrap();
//! assert_eq!(population.max_identity(), Some(2));
//! ```

use crate::candidate::{Candidate, Identity};
use crate::error::{Result, SelectorError};

/// Number of slots allocated on the first insertion.
pub const DEFAULT_CAPACITY: usize = 32_200;

/// Identity-indexed store of live candidates.
#[derive(Debug, Clone)]
pub struct Population {
    slots: Vec<Option<Candidate>>,
    initial_capacity: usize,
    size: usize,
    max_identity: Option<Identity>,
}

impl Population {
    /// Creates an empty population that allocates [`DEFAULT_CAPACITY`] slots
    /// on first use.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty population with a custom initial slot count.
    ///
    /// Nothing is allocated until the first insertion. A capacity of zero is
    /// raised to one so that doubling always makes progress.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            initial_capacity: initial_capacity.max(1),
            size: 0,
            max_identity: None,
        }
    }

    /// Inserts a fresh candidate with a selection count of zero.
    ///
    /// # Errors
    ///
    /// - [`SelectorError::DuplicateIdentity`] if `identity` is already live.
    /// - [`SelectorError::ResourceExhausted`] if the arena cannot grow.
    pub fn insert(&mut self, identity: Identity, objectives: Vec<f64>) -> Result<()> {
        if self.slots.is_empty() {
            self.grow_to(self.initial_capacity)?;
        }

        if identity >= self.slots.len() {
            let mut target = self.slots.len();
            while identity >= target {
                target = target.checked_mul(2).ok_or_else(|| {
                    SelectorError::ResourceExhausted(format!(
                        "identity {} exceeds the addressable population size",
                        identity
                    ))
                })?;
            }
            self.grow_to(target)?;
        }

        let slot = &mut self.slots[identity];
        if slot.is_some() {
            return Err(SelectorError::DuplicateIdentity(identity));
        }
        *slot = Some(Candidate::new(objectives));

        self.max_identity = Some(self.max_identity.map_or(identity, |max| max.max(identity)));
        self.size += 1;
        Ok(())
    }

    /// Removes a live candidate and returns it.
    ///
    /// When the highest identity is removed, `max_identity` walks down past
    /// every empty slot below it.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::InvalidIdentity`] if `identity` is above
    /// `max_identity` or its slot is empty.
    pub fn remove(&mut self, identity: Identity) -> Result<Candidate> {
        let max = match self.max_identity {
            Some(max) if identity <= max => max,
            _ => return Err(SelectorError::InvalidIdentity(identity)),
        };

        let removed = self.slots[identity]
            .take()
            .ok_or(SelectorError::InvalidIdentity(identity))?;
        self.size -= 1;

        if identity == max {
            self.max_identity = self.slots[..identity].iter().rposition(Option::is_some);
        }

        Ok(removed)
    }

    /// Returns the candidate stored under `identity`, if it is live.
    pub fn get(&self, identity: Identity) -> Option<&Candidate> {
        self.slots.get(identity).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, identity: Identity) -> Option<&mut Candidate> {
        self.slots.get_mut(identity).and_then(Option::as_mut)
    }

    pub fn contains(&self, identity: Identity) -> bool {
        self.get(identity).is_some()
    }

    /// Increments the selection count of a live candidate.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::InvalidIdentity`] if `identity` is not live.
    pub fn record_selection(&mut self, identity: Identity) -> Result<u32> {
        self.get_mut(identity)
            .map(Candidate::record_selection)
            .ok_or(SelectorError::InvalidIdentity(identity))
    }

    /// Lowest live identity.
    pub fn first(&self) -> Option<Identity> {
        self.identities().next()
    }

    /// Lowest live identity strictly greater than `identity`.
    pub fn next_after(&self, identity: Identity) -> Option<Identity> {
        let max = self.max_identity?;
        let start = identity.checked_add(1)?;
        (start..=max).find(|&candidate| self.slots[candidate].is_some())
    }

    /// Live identities in ascending order.
    ///
    /// Each call starts a fresh traversal.
    pub fn identities(&self) -> Identities<'_> {
        Identities {
            slots: self.live_slots(),
            next: 0,
        }
    }

    /// Live candidates with their identities, in ascending identity order.
    pub fn iter(&self) -> impl Iterator<Item = (Identity, &Candidate)> + '_ {
        self.live_slots()
            .iter()
            .enumerate()
            .filter_map(|(identity, slot)| slot.as_ref().map(|candidate| (identity, candidate)))
    }

    /// Number of live candidates.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Highest live identity, or `None` for an empty population.
    pub fn max_identity(&self) -> Option<Identity> {
        self.max_identity
    }

    /// Number of allocated slots. Zero until the first insertion.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Drops every candidate and releases the arena.
    ///
    /// The next insertion allocates the initial capacity again.
    pub fn clear(&mut self) {
        self.slots = Vec::new();
        self.size = 0;
        self.max_identity = None;
    }

    fn live_slots(&self) -> &[Option<Candidate>] {
        match self.max_identity {
            Some(max) => &self.slots[..=max],
            None => &[],
        }
    }

    fn grow_to(&mut self, capacity: usize) -> Result<()> {
        let additional = capacity - self.slots.len();
        self.slots.try_reserve_exact(additional).map_err(|e| {
            SelectorError::ResourceExhausted(format!(
                "cannot grow population to {} slots: {}",
                capacity, e
            ))
        })?;
        self.slots.resize_with(capacity, || None);
        Ok(())
    }
}

impl Default for Population {
    fn default() -> Self {
        Self::new()
    }
}

/// Ascending traversal over the live identities of a [`Population`].
#[derive(Debug, Clone)]
pub struct Identities<'a> {
    slots: &'a [Option<Candidate>],
    next: usize,
}

impl Iterator for Identities<'_> {
    type Item = Identity;

    fn next(&mut self) -> Option<Identity> {
        while self.next < self.slots.len() {
            let identity = self.next;
            self.next += 1;
            if self.slots[identity].is_some() {
                return Some(identity);
            }
        }
        None
    }
}
