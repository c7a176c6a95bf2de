//! Error types for transaction operations.

use thiserror::Error;

use crate::scope::ScopeId;

/// Errors that can occur while driving a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// Every scope of the transaction has already been closed.
    #[error("transaction {id} is closed")]
    Closed { id: u64 },

    /// Another transaction is already open on this thread.
    #[error("transaction {open} is already open on this thread")]
    AlreadyOpen { open: u64 },

    /// A close was requested for a scope that is not the innermost open one.
    #[error("scope {requested} is not the innermost open scope ({innermost})")]
    ScopeMismatch {
        requested: ScopeId,
        innermost: ScopeId,
    },
}

/// Convenience type alias for transaction operations.
pub type Result<T> = std::result::Result<T, TransactionError>;
