//! Error types for container operations.

use flux_types::Amount;
use thiserror::Error;

/// Errors produced by container operations.
///
/// Asking for more than a facet can move is never an error; the operation
/// transfers what it can, possibly zero.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// A transfer was requested with a negative amount.
    #[error("transfer amount must not be negative, got {amount}")]
    InvalidArgument { amount: Amount },

    /// A direct write would leave the amount outside `[0, capacity]`.
    #[error("amount {amount} is outside the valid range 0..={capacity}")]
    PolicyViolation { amount: Amount, capacity: Amount },

    /// The transaction driving the operation could not record it.
    #[error("transaction error: {0}")]
    Transaction(#[from] flux_transaction::TransactionError),

    #[error("type error: {0}")]
    Type(#[from] flux_types::TypeError),

    /// The configuration parsed but describes an impossible container.
    #[error("invalid container config: {0}")]
    InvalidConfig(String),

    /// The configuration could not be parsed or rendered.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;

/// Reject negative transfer requests.
pub(crate) fn ensure_not_negative(amount: Amount) -> Result<()> {
    if amount < 0 {
        return Err(ContainerError::InvalidArgument { amount });
    }
    Ok(())
}
