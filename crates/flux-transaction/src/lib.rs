//! Nested, rollback-capable transactions for Flux containers.
//!
//! A [`Transaction`] is a stack of scopes opened inside one another. Each
//! scope is either committed, handing its effects to the enclosing scope, or
//! aborted, rolling its effects back to the state it was entered with. The
//! model is single-threaded and cooperative: one logical thread of work
//! composes sub-operations that must succeed or fail together.
//!
//! # Architecture
//!
//! - **Scopes** are identified by [`ScopeId`] and closed innermost-first.
//! - **Participants** ([`Participant`]) enlist with the innermost scope on
//!   their first mutation and are told how it closed.
//! - **Snapshot participants** ([`SnapshotParticipant`]) keep their rollback
//!   state in a [`TransactionalCell`]: one prior value per dirty scope,
//!   captured lazily before the first write.
//!
//! # Modules
//!
//! - [`error`] — Error types for transaction operations
//! - [`scope`] — Scope identifiers, outcomes and close notifications
//! - [`cell`] — The generic snapshot stack
//! - [`participant`] — Participant traits
//! - [`transaction`] — The scope stack itself

pub mod cell;
pub mod error;
pub mod participant;
pub mod scope;
pub mod transaction;

pub use cell::{SnapshotEntry, TransactionalCell};
pub use error::{Result, TransactionError};
pub use participant::{Participant, SnapshotParticipant};
pub use scope::{Disposition, Outcome, ScopeClose, ScopeId};
pub use transaction::Transaction;
