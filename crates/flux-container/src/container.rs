use flux_transaction::{ScopeId, SnapshotParticipant, TransactionalCell};
use flux_types::{Amount, Facet, FacetLimits, QuantityState};
use tracing::warn;

use crate::config::{BoundsPolicy, ContainerConfig, RestorePolicy};
use crate::error::{ContainerError, Result};
use crate::memory::SimpleStore;
use crate::traits::QuantityStore;
use crate::view::FacetView;

/// A bounded quantity with one [`FacetView`] per facet.
///
/// The container owns the store and the snapshot stack that lets
/// transactions roll the amount back. All facets share the same amount and
/// capacity; they differ only in the limits the store reports for them.
///
/// ```rust
/// use flux_container::{SidedContainer, SimpleStore, Storage};
/// use flux_transaction::Transaction;
/// use flux_types::{Facet, FacetLimits};
///
/// let container = SidedContainer::new(SimpleStore::new(100, FacetLimits::symmetric(30)));
/// let mut tx = Transaction::open_outer().unwrap();
/// assert_eq!(container.facet(Facet::Up).insert(50, &mut tx).unwrap(), 30);
/// tx.commit().unwrap();
/// assert_eq!(container.amount(), 30);
/// ```
#[derive(Debug)]
pub struct SidedContainer<S> {
    store: S,
    journal: TransactionalCell<Amount>,
    restore: RestorePolicy,
    bounds: BoundsPolicy,
}

impl<S: QuantityStore> SidedContainer<S> {
    /// Wrap `store` with the default policies.
    pub fn new(store: S) -> Self {
        Self::with_policies(store, RestorePolicy::default(), BoundsPolicy::default())
    }

    pub fn with_policies(store: S, restore: RestorePolicy, bounds: BoundsPolicy) -> Self {
        Self {
            store,
            journal: TransactionalCell::new(),
            restore,
            bounds,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn restore_policy(&self) -> RestorePolicy {
        self.restore
    }

    pub fn bounds_policy(&self) -> BoundsPolicy {
        self.bounds
    }

    pub fn amount(&self) -> Amount {
        self.store.amount()
    }

    pub fn capacity(&self) -> Amount {
        self.store.capacity()
    }

    pub fn state(&self) -> QuantityState {
        QuantityState::new(self.store.amount(), self.store.capacity())
    }

    pub fn limits(&self, facet: Facet) -> FacetLimits {
        self.store.limits(facet)
    }

    /// The view for `facet`.
    pub fn facet(&self, facet: Facet) -> FacetView<'_, S> {
        FacetView::new(self, facet)
    }

    /// The view for callers not acting through a particular facet.
    pub fn unsided(&self) -> FacetView<'_, S> {
        self.facet(Facet::Unsided)
    }

    /// Every view, indexed by [`Facet::index`].
    pub fn views(&self) -> [FacetView<'_, S>; Facet::COUNT] {
        Facet::ALL.map(|facet| self.facet(facet))
    }

    /// Overwrite the amount outside any transaction.
    ///
    /// Values outside `[0, capacity]` are rejected or clamped according to
    /// the container's [`BoundsPolicy`]. The write is not recorded in any
    /// open transaction and will not be rolled back.
    pub fn set_amount(&self, amount: Amount) -> Result<()> {
        let state = QuantityState::new(amount, self.store.capacity());
        if state.is_within_bounds() {
            self.store.set_amount(amount);
            return Ok(());
        }
        match self.bounds {
            BoundsPolicy::Strict => Err(ContainerError::PolicyViolation {
                amount,
                capacity: state.capacity,
            }),
            BoundsPolicy::Clamp => {
                let clamped = state.clamp_amount(amount);
                warn!(
                    requested = amount,
                    clamped,
                    capacity = state.capacity,
                    "amount outside container bounds; clamping"
                );
                self.store.set_amount(clamped);
                Ok(())
            }
        }
    }

    /// Whether `scope` has recorded a snapshot of this container.
    pub fn is_dirty_in(&self, scope: ScopeId) -> bool {
        self.journal.is_dirty(scope)
    }

    /// Whether any open scope still holds a snapshot of this container.
    pub fn has_pending_snapshots(&self) -> bool {
        !self.journal.is_clean()
    }
}

impl SidedContainer<SimpleStore> {
    /// Build a field-backed container from a config.
    pub fn from_config(config: &ContainerConfig) -> Result<Self> {
        Ok(Self::with_policies(
            SimpleStore::from_config(config)?,
            config.restore,
            config.bounds,
        ))
    }
}

impl<S: QuantityStore> SnapshotParticipant for SidedContainer<S> {
    type Snapshot = Amount;

    fn journal(&self) -> &TransactionalCell<Amount> {
        &self.journal
    }

    fn create_snapshot(&self) -> Amount {
        self.store.amount()
    }

    fn read_snapshot(&self, snapshot: Amount) {
        let state = QuantityState::new(snapshot, self.store.capacity());
        let restored = match self.restore {
            RestorePolicy::TrustHistory => {
                if !state.is_within_bounds() {
                    warn!(
                        restored = snapshot,
                        capacity = state.capacity,
                        "restored amount exceeds current capacity"
                    );
                }
                snapshot
            }
            RestorePolicy::Reclamp => state.clamp_amount(snapshot),
        };
        self.store.set_amount(restored);
    }

    fn on_final_commit(&self) {
        self.store.on_final_commit();
    }
}
