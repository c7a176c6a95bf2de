use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown facet name: {0}")]
    UnknownFacet(String),

    #[error("facet index out of range: expected 0..{expected}, got {actual}")]
    FacetIndexOutOfRange { expected: usize, actual: usize },
}
