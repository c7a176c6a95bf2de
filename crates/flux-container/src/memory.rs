//! Field-backed quantity store for tests, embedding and simple owners.
//!
//! [`SimpleStore`] keeps the amount, capacity and facet limits in `Cell`s.
//! Its post-commit hook raises a dirty flag the owner can poll and clear,
//! which stands in for "schedule a save".

use std::cell::Cell;

use flux_types::{Amount, Facet, FacetLimits, QuantityState};

use crate::config::ContainerConfig;
use crate::error::Result;
use crate::traits::QuantityStore;

/// An in-memory implementation of [`QuantityStore`].
#[derive(Debug)]
pub struct SimpleStore {
    amount: Cell<Amount>,
    capacity: Cell<Amount>,
    limits: Cell<[FacetLimits; Facet::COUNT]>,
    dirty: Cell<bool>,
    final_commits: Cell<u64>,
}

impl SimpleStore {
    /// An empty store with `capacity` and the same limits on every facet.
    pub fn new(capacity: Amount, limits: FacetLimits) -> Self {
        Self {
            amount: Cell::new(0),
            capacity: Cell::new(capacity),
            limits: Cell::new([limits; Facet::COUNT]),
            dirty: Cell::new(false),
            final_commits: Cell::new(0),
        }
    }

    /// An empty store with no per-operation limits.
    pub fn unlimited(capacity: Amount) -> Self {
        Self::new(capacity, FacetLimits::UNLIMITED)
    }

    /// Build a store from a validated config.
    pub fn from_config(config: &ContainerConfig) -> Result<Self> {
        config.validate()?;
        let store = Self::new(config.capacity, config.default_limits);
        for facet in Facet::ALL {
            store.set_limits(facet, config.limits_for(facet));
        }
        store.amount.set(config.initial_amount);
        Ok(store)
    }

    /// Start with `amount` stored. Not clamped; pick a value within capacity.
    pub fn with_amount(self, amount: Amount) -> Self {
        self.amount.set(amount);
        self
    }

    /// Start with different limits on one facet.
    pub fn with_limits(self, facet: Facet, limits: FacetLimits) -> Self {
        self.set_limits(facet, limits);
        self
    }

    /// Change the capacity. Takes effect on the next operation.
    pub fn set_capacity(&self, capacity: Amount) {
        self.capacity.set(capacity);
    }

    /// Change the limits of one facet. Takes effect on the next operation.
    pub fn set_limits(&self, facet: Facet, limits: FacetLimits) {
        let mut table = self.limits.get();
        table[facet.index()] = limits;
        self.limits.set(table);
    }

    pub fn state(&self) -> QuantityState {
        QuantityState::new(self.amount.get(), self.capacity.get())
    }

    /// Whether a transaction committed since the flag was last cleared.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Read and clear the dirty flag.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    /// How many outermost commits this store has seen.
    pub fn final_commits(&self) -> u64 {
        self.final_commits.get()
    }
}

impl QuantityStore for SimpleStore {
    fn amount(&self) -> Amount {
        self.amount.get()
    }

    fn set_amount(&self, amount: Amount) {
        self.amount.set(amount);
    }

    fn capacity(&self) -> Amount {
        self.capacity.get()
    }

    fn max_insert(&self, facet: Facet) -> Amount {
        self.limits.get()[facet.index()].max_insert
    }

    fn max_extract(&self, facet: Facet) -> Amount {
        self.limits.get()[facet.index()].max_extract
    }

    fn limits(&self, facet: Facet) -> FacetLimits {
        self.limits.get()[facet.index()]
    }

    fn on_final_commit(&self) {
        self.dirty.set(true);
        self.final_commits.set(self.final_commits.get() + 1);
    }
}
