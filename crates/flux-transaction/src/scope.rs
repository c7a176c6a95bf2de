use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);
static NEXT_TRANSACTION: AtomicU64 = AtomicU64::new(1);

/// Identifier of one open scope.
///
/// Identifiers are unique for the lifetime of the process, so a snapshot
/// recorded for a closed scope can never be mistaken for one belonging to a
/// scope opened later at the same depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

impl ScopeId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SCOPE.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

pub(crate) fn next_transaction_id() -> u64 {
    NEXT_TRANSACTION.fetch_add(1, Ordering::Relaxed)
}

/// How a scope was closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Effects are kept (handed to the parent scope, if any).
    Committed,
    /// Effects are rolled back to the scope's entry state.
    Aborted,
}

impl Outcome {
    pub fn was_committed(&self) -> bool {
        matches!(self, Outcome::Committed)
    }

    pub fn was_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Committed => write!(f, "committed"),
            Outcome::Aborted => write!(f, "aborted"),
        }
    }
}

/// Notification delivered to a participant when a scope it enlisted in closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeClose {
    /// The scope being closed.
    pub scope: ScopeId,
    /// The enclosing scope, or `None` when the outermost scope closes.
    pub parent: Option<ScopeId>,
    pub outcome: Outcome,
}

impl ScopeClose {
    pub fn is_outermost(&self) -> bool {
        self.parent.is_none()
    }
}

/// What a participant asks of the transaction after a scope closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Nothing further is needed for this scope.
    Released,
    /// The participant's snapshot moved to the parent scope; enlist it there.
    Promoted,
}
