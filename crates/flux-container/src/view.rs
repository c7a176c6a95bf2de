//! Per-facet access to a container.

use std::fmt;

use flux_transaction::{SnapshotParticipant, Transaction};
use flux_types::{Amount, Facet, FacetLimits, QuantityState};
use tracing::trace;

use crate::container::SidedContainer;
use crate::error::{ensure_not_negative, Result};
use crate::traits::{QuantityStore, Storage};

/// A restricted lens on a [`SidedContainer`] through one facet.
///
/// Holds nothing but a borrow of the container and the facet identity, so
/// it is `Copy` and cannot outlive the container it was taken from.
pub struct FacetView<'c, S> {
    container: &'c SidedContainer<S>,
    facet: Facet,
}

impl<'c, S: QuantityStore> FacetView<'c, S> {
    pub(crate) fn new(container: &'c SidedContainer<S>, facet: Facet) -> Self {
        Self { container, facet }
    }

    pub fn facet(&self) -> Facet {
        self.facet
    }

    /// The limits this facet applies right now.
    pub fn limits(&self) -> FacetLimits {
        self.container.store().limits(self.facet)
    }

    pub fn container(&self) -> &'c SidedContainer<S> {
        self.container
    }
}

impl<'c, S: QuantityStore> Storage<'c> for FacetView<'c, S> {
    fn supports_insertion(&self) -> bool {
        self.container.store().max_insert(self.facet) > 0
    }

    fn insert(&self, max_amount: Amount, tx: &mut Transaction<'c>) -> Result<Amount> {
        ensure_not_negative(max_amount)?;

        let store = self.container.store();
        let amount = store.amount();
        let room = QuantityState::new(amount, store.capacity()).room();
        let inserted = store.max_insert(self.facet).min(max_amount).min(room);
        if inserted <= 0 {
            return Ok(0);
        }

        self.container.update_snapshots(tx)?;
        store.set_amount(amount + inserted);
        trace!(facet = %self.facet, inserted, amount = amount + inserted, "inserted");
        Ok(inserted)
    }

    fn supports_extraction(&self) -> bool {
        self.container.store().max_extract(self.facet) > 0
    }

    fn extract(&self, max_amount: Amount, tx: &mut Transaction<'c>) -> Result<Amount> {
        ensure_not_negative(max_amount)?;

        let store = self.container.store();
        let amount = store.amount();
        let extracted = store.max_extract(self.facet).min(max_amount).min(amount);
        if extracted <= 0 {
            return Ok(0);
        }

        self.container.update_snapshots(tx)?;
        store.set_amount(amount - extracted);
        trace!(facet = %self.facet, extracted, amount = amount - extracted, "extracted");
        Ok(extracted)
    }

    fn amount(&self) -> Amount {
        self.container.amount()
    }

    fn capacity(&self) -> Amount {
        self.container.capacity()
    }
}

impl<S> Clone for FacetView<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for FacetView<'_, S> {}

impl<S> fmt::Debug for FacetView<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetView")
            .field("facet", &self.facet)
            .finish_non_exhaustive()
    }
}
