//! The [`QuantityStore`] and [`Storage`] traits.
//!
//! [`QuantityStore`] is what an owning object supplies: backing storage for
//! the amount, the current capacity, and per-facet policy. [`Storage`] is
//! what the container hands out: the insert/extract contract of one facet.

use flux_transaction::Transaction;
use flux_types::{Amount, Facet, FacetLimits};

use crate::error::Result;

/// Backing state and policy for a [`SidedContainer`](crate::SidedContainer).
///
/// Implementations use interior mutability; containers are single-threaded
/// and only ever write through `&self`.
///
/// Every query must be answered from current state. Capacity and limits are
/// re-read on each operation, so a change takes effect immediately.
pub trait QuantityStore {
    /// Current stored amount.
    fn amount(&self) -> Amount;

    /// Overwrite the stored amount.
    ///
    /// Callers keep `0 <= amount <= capacity`; the store does not
    /// re-validate. Use [`SidedContainer::set_amount`] for a checked write.
    ///
    /// [`SidedContainer::set_amount`]: crate::SidedContainer::set_amount
    fn set_amount(&self, amount: Amount);

    /// Current capacity. May change between calls.
    fn capacity(&self) -> Amount;

    /// Largest amount a single insert through `facet` may move. Zero disables it.
    fn max_insert(&self, facet: Facet) -> Amount;

    /// Largest amount a single extract through `facet` may move. Zero disables it.
    fn max_extract(&self, facet: Facet) -> Amount;

    /// Both limits of `facet`.
    fn limits(&self, facet: Facet) -> FacetLimits {
        FacetLimits::new(self.max_insert(facet), self.max_extract(facet))
    }

    /// Called once after an outermost transaction that touched this store
    /// commits. Owners mark themselves dirty for persistence here.
    fn on_final_commit(&self) {}
}

/// Transactional insert/extract access to a quantity.
///
/// `'p` is the lifetime participants are borrowed for by the transaction.
pub trait Storage<'p> {
    /// Whether inserting could ever succeed. Advisory only.
    fn supports_insertion(&self) -> bool;

    /// Insert up to `max_amount`, returning what was actually inserted.
    fn insert(&self, max_amount: Amount, tx: &mut Transaction<'p>) -> Result<Amount>;

    /// Whether extracting could ever succeed. Advisory only.
    fn supports_extraction(&self) -> bool;

    /// Extract up to `max_amount`, returning what was actually extracted.
    fn extract(&self, max_amount: Amount, tx: &mut Transaction<'p>) -> Result<Amount>;

    fn amount(&self) -> Amount;

    fn capacity(&self) -> Amount;

    /// How much [`insert`](Storage::insert) would move, without keeping it.
    fn simulate_insert(&self, max_amount: Amount, tx: &mut Transaction<'p>) -> Result<Amount> {
        tx.open_nested()?;
        let inserted = self.insert(max_amount, tx);
        tx.abort()?;
        inserted
    }

    /// How much [`extract`](Storage::extract) would move, without keeping it.
    fn simulate_extract(&self, max_amount: Amount, tx: &mut Transaction<'p>) -> Result<Amount> {
        tx.open_nested()?;
        let extracted = self.extract(max_amount, tx);
        tx.abort()?;
        extracted
    }
}
