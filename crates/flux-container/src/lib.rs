//! Transactional bounded quantity containers for Flux.
//!
//! A [`SidedContainer`] holds a single non-negative amount bounded by a
//! capacity, and hands out one [`FacetView`] per [`Facet`](flux_types::Facet).
//! Every view shares the amount but applies its own per-operation insertion
//! and extraction limits. Mutations go through a
//! [`Transaction`](flux_transaction::Transaction): the container snapshots
//! its amount the first time a scope touches it and restores that snapshot
//! if the scope aborts.
//!
//! # Quick Start
//!
//! ```rust
//! use flux_container::{SidedContainer, SimpleStore, Storage};
//! use flux_transaction::Transaction;
//! use flux_types::{Facet, FacetLimits};
//!
//! let store = SimpleStore::new(10, FacetLimits::insert_only(100))
//!     .with_limits(Facet::North, FacetLimits::insert_only(3));
//! let container = SidedContainer::new(store);
//!
//! let mut tx = Transaction::open_outer().unwrap();
//! assert_eq!(container.facet(Facet::North).insert(100, &mut tx).unwrap(), 3);
//! assert_eq!(container.facet(Facet::South).insert(100, &mut tx).unwrap(), 7);
//! tx.abort().unwrap();
//! assert_eq!(container.amount(), 0);
//! ```
//!
//! # Design Rules
//!
//! 1. `0 <= amount <= capacity` after every completed operation; transfers
//!    are clamped before the store is written.
//! 2. A transfer that moves nothing is a complete no-op and never snapshots.
//! 3. Capacity and limits are queried fresh on every operation.
//! 4. Persistence belongs to the owner, via [`QuantityStore::on_final_commit`].

pub mod config;
pub mod container;
pub mod error;
pub mod memory;
pub mod traits;
pub mod transfer;
pub mod view;

pub use config::{BoundsPolicy, ContainerConfig, RestorePolicy};
pub use container::SidedContainer;
pub use error::{ContainerError, Result};
pub use memory::SimpleStore;
pub use traits::{QuantityStore, Storage};
pub use transfer::transfer;
pub use view::FacetView;
