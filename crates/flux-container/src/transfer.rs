//! Moving quantity between two storages.

use flux_transaction::Transaction;
use flux_types::Amount;
use tracing::debug;

use crate::error::{ensure_not_negative, Result};
use crate::traits::Storage;

/// Move up to `max_amount` from `from` to `to`, returning what was moved.
///
/// The move runs in its own nested scope: first the extractable amount is
/// probed in a scope that is always aborted, then that much is offered to
/// `to`, and finally whatever `to` accepted is extracted from `from`. If the
/// source cannot give up exactly the accepted amount the nested scope is
/// aborted and nothing moves. The caller's scope decides whether the move
/// is kept.
pub fn transfer<'p, F, T>(
    from: &F,
    to: &T,
    max_amount: Amount,
    tx: &mut Transaction<'p>,
) -> Result<Amount>
where
    F: Storage<'p> + ?Sized,
    T: Storage<'p> + ?Sized,
{
    ensure_not_negative(max_amount)?;

    let available = from.simulate_extract(max_amount, tx)?;
    if available == 0 {
        return Ok(0);
    }

    let scope = tx.open_nested()?;
    let moved = match move_within(from, to, available, tx) {
        Ok(moved) => moved,
        Err(e) => {
            tx.abort()?;
            return Err(e);
        }
    };
    if moved > 0 {
        tx.commit()?;
    } else {
        tx.abort()?;
    }
    debug!(%scope, requested = max_amount, moved, "transfer");
    Ok(moved)
}

fn move_within<'p, F, T>(from: &F, to: &T, available: Amount, tx: &mut Transaction<'p>) -> Result<Amount>
where
    F: Storage<'p> + ?Sized,
    T: Storage<'p> + ?Sized,
{
    let accepted = to.insert(available, tx)?;
    if accepted == 0 {
        return Ok(0);
    }
    let extracted = from.extract(accepted, tx)?;
    Ok(if extracted == accepted { accepted } else { 0 })
}

#[cfg(test)]
mod tests {
    use flux_types::{Facet, FacetLimits};

    use super::*;
    use crate::container::SidedContainer;
    use crate::error::ContainerError;
    use crate::memory::SimpleStore;
    use crate::view::FacetView;

    #[derive(Clone, Copy)]
    enum Fault {
        /// Extract one less than asked.
        ShortExtract,
        /// Insert, then report an error.
        FailingInsert,
    }

    /// A facet that misbehaves in one specific way.
    struct Faulty<'c> {
        inner: FacetView<'c, SimpleStore>,
        fault: Fault,
    }

    impl<'c> Storage<'c> for Faulty<'c> {
        fn supports_insertion(&self) -> bool {
            self.inner.supports_insertion()
        }

        fn insert(&self, max_amount: Amount, tx: &mut Transaction<'c>) -> Result<Amount> {
            let inserted = self.inner.insert(max_amount, tx)?;
            match self.fault {
                Fault::FailingInsert => Err(ContainerError::PolicyViolation {
                    amount: inserted,
                    capacity: self.inner.capacity(),
                }),
                Fault::ShortExtract => Ok(inserted),
            }
        }

        fn supports_extraction(&self) -> bool {
            self.inner.supports_extraction()
        }

        fn extract(&self, max_amount: Amount, tx: &mut Transaction<'c>) -> Result<Amount> {
            match self.fault {
                Fault::ShortExtract => self.inner.extract((max_amount - 1).max(0), tx),
                Fault::FailingInsert => self.inner.extract(max_amount, tx),
            }
        }

        fn amount(&self) -> Amount {
            self.inner.amount()
        }

        fn capacity(&self) -> Amount {
            self.inner.capacity()
        }
    }

    fn container(capacity: Amount, amount: Amount, limits: FacetLimits) -> SidedContainer<SimpleStore> {
        SidedContainer::new(SimpleStore::new(capacity, limits).with_amount(amount))
    }

    #[test]
    fn moves_the_smallest_bottleneck() {
        let source = container(100, 50, FacetLimits::symmetric(20));
        let sink = container(30, 25, FacetLimits::UNLIMITED);
        let mut tx = Transaction::open_outer().unwrap();

        let moved = transfer(&source.facet(Facet::East), &sink.facet(Facet::West), 40, &mut tx).unwrap();
        assert_eq!(moved, 5);
        tx.commit().unwrap();

        assert_eq!(source.amount(), 45);
        assert_eq!(sink.amount(), 30);
        assert_eq!(source.store().final_commits(), 1);
        assert_eq!(sink.store().final_commits(), 1);
    }

    #[test]
    fn outer_abort_undoes_the_move() {
        let source = container(100, 50, FacetLimits::UNLIMITED);
        let sink = container(100, 0, FacetLimits::UNLIMITED);
        let mut tx = Transaction::open_outer().unwrap();

        assert_eq!(transfer(&source.unsided(), &sink.unsided(), 10, &mut tx).unwrap(), 10);
        tx.abort().unwrap();

        assert_eq!(source.amount(), 50);
        assert_eq!(sink.amount(), 0);
        assert!(!source.has_pending_snapshots());
        assert!(!sink.has_pending_snapshots());
    }

    #[test]
    fn empty_source_moves_nothing() {
        let source = container(100, 0, FacetLimits::UNLIMITED);
        let sink = container(100, 0, FacetLimits::UNLIMITED);
        let mut tx = Transaction::open_outer().unwrap();
        let scope = tx.current_scope().unwrap();

        assert_eq!(transfer(&source.unsided(), &sink.unsided(), 10, &mut tx).unwrap(), 0);
        assert!(!source.is_dirty_in(scope));
        assert!(!sink.is_dirty_in(scope));
    }

    #[test]
    fn full_sink_leaves_source_untouched() {
        let source = container(100, 50, FacetLimits::UNLIMITED);
        let sink = container(10, 10, FacetLimits::UNLIMITED);
        let mut tx = Transaction::open_outer().unwrap();

        assert_eq!(transfer(&source.unsided(), &sink.unsided(), 10, &mut tx).unwrap(), 0);
        tx.commit().unwrap();
        assert_eq!(source.amount(), 50);
        assert!(!source.store().is_dirty());
    }

    #[test]
    fn transfer_within_one_container_between_facets() {
        let c = container(10, 5, FacetLimits::symmetric(3));
        let mut tx = Transaction::open_outer().unwrap();
        assert_eq!(transfer(&c.facet(Facet::Up), &c.facet(Facet::Down), 10, &mut tx).unwrap(), 3);
        assert_eq!(c.amount(), 5);
    }

    #[test]
    fn negative_request_is_rejected() {
        let source = container(100, 50, FacetLimits::UNLIMITED);
        let sink = container(100, 0, FacetLimits::UNLIMITED);
        let mut tx = Transaction::open_outer().unwrap();
        let err = transfer(&source.unsided(), &sink.unsided(), -5, &mut tx).unwrap_err();
        assert!(matches!(err, ContainerError::InvalidArgument { amount: -5 }));
    }

    #[test]
    fn short_extraction_aborts_the_move() {
        let source = container(100, 50, FacetLimits::UNLIMITED);
        let sink = container(100, 0, FacetLimits::UNLIMITED);
        let faulty = Faulty {
            inner: source.unsided(),
            fault: Fault::ShortExtract,
        };
        let mut tx = Transaction::open_outer().unwrap();

        assert_eq!(transfer(&faulty, &sink.unsided(), 10, &mut tx).unwrap(), 0);
        assert_eq!(tx.nesting_depth().unwrap(), 0);
        assert_eq!(source.amount(), 50);
        assert_eq!(sink.amount(), 0);
        assert!(!source.has_pending_snapshots());
        assert!(!sink.has_pending_snapshots());
    }

    #[test]
    fn failed_insert_rolls_back_and_propagates() {
        let source = container(100, 50, FacetLimits::UNLIMITED);
        let sink = container(100, 0, FacetLimits::UNLIMITED);
        let faulty = Faulty {
            inner: sink.unsided(),
            fault: Fault::FailingInsert,
        };
        let mut tx = Transaction::open_outer().unwrap();
        let scope = tx.current_scope().unwrap();

        let err = transfer(&source.unsided(), &faulty, 10, &mut tx).unwrap_err();
        assert!(matches!(err, ContainerError::PolicyViolation { amount: 10, .. }));
        assert_eq!(tx.nesting_depth().unwrap(), 0);
        assert_eq!(sink.amount(), 0);
        assert_eq!(source.amount(), 50);
        assert!(!sink.has_pending_snapshots());
        assert!(!source.is_dirty_in(scope));
        tx.commit().unwrap();
    }
}
