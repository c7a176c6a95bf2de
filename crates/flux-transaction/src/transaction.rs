//! Nested transaction scopes.

use std::cell::Cell;
use std::fmt;

use tracing::debug;

use crate::error::{Result, TransactionError};
use crate::participant::Participant;
use crate::scope::{next_transaction_id, Disposition, Outcome, ScopeClose, ScopeId};

type Callback<'p> = Box<dyn FnOnce(Outcome) + 'p>;

thread_local! {
    /// Id of the transaction whose outermost scope is open on this thread.
    static OPEN_OUTER: Cell<Option<u64>> = const { Cell::new(None) };
}

struct Frame<'p> {
    scope: ScopeId,
    participants: Vec<&'p dyn Participant>,
    callbacks: Vec<Callback<'p>>,
}

impl<'p> Frame<'p> {
    fn new(scope: ScopeId) -> Self {
        Self {
            scope,
            participants: Vec::new(),
            callbacks: Vec::new(),
        }
    }
}

/// A stack of nested scopes sharing one outermost scope.
///
/// Opening a transaction opens its outermost scope. [`open_nested`] pushes
/// a scope; [`commit`] and [`abort`] close the innermost one. Once the
/// outermost scope is closed the transaction is finished and every further
/// operation fails with [`TransactionError::Closed`].
///
/// At most one transaction is open per thread. Snapshot records are kept
/// as a stack, so two interleaved transactions would close each other's
/// entries out of order.
///
/// Participants are borrowed for `'p`, so nothing that enlisted can be
/// dropped or moved while the transaction is alive. Dropping a transaction
/// with scopes still open aborts them, innermost first.
///
/// ```rust
/// use flux_transaction::{Outcome, Transaction};
///
/// let mut tx = Transaction::open_outer().unwrap();
/// tx.open_nested().unwrap();
/// assert_eq!(tx.nesting_depth().unwrap(), 1);
/// tx.abort().unwrap();
/// tx.add_outer_close_callback(|outcome| assert_eq!(outcome, Outcome::Committed)).unwrap();
/// tx.commit().unwrap();
/// assert!(!tx.is_open());
/// ```
///
/// [`open_nested`]: Transaction::open_nested
/// [`commit`]: Transaction::commit
/// [`abort`]: Transaction::abort
pub struct Transaction<'p> {
    id: u64,
    frames: Vec<Frame<'p>>,
    outer_callbacks: Vec<Callback<'p>>,
}

impl<'p> Transaction<'p> {
    /// Open a new transaction and its outermost scope.
    ///
    /// Fails with [`TransactionError::AlreadyOpen`] while another
    /// transaction on this thread still has its outermost scope open.
    pub fn open_outer() -> Result<Self> {
        if let Some(open) = OPEN_OUTER.with(Cell::get) {
            return Err(TransactionError::AlreadyOpen { open });
        }
        let id = next_transaction_id();
        let scope = ScopeId::next();
        OPEN_OUTER.with(|slot| slot.set(Some(id)));
        debug!(transaction = id, %scope, "opened outer scope");
        Ok(Self {
            id,
            frames: vec![Frame::new(scope)],
            outer_callbacks: Vec::new(),
        })
    }

    /// Returns `true` if a transaction is open on the calling thread.
    pub fn is_open_on_thread() -> bool {
        OPEN_OUTER.with(Cell::get).is_some()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns `true` while the outermost scope is still open.
    pub fn is_open(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Depth of the innermost open scope; the outermost scope is depth 0.
    pub fn nesting_depth(&self) -> Result<usize> {
        self.frames
            .len()
            .checked_sub(1)
            .ok_or(TransactionError::Closed { id: self.id })
    }

    /// The innermost open scope, which is the one mutations are recorded in.
    pub fn current_scope(&self) -> Result<ScopeId> {
        Ok(self.innermost()?.scope)
    }

    /// Open a scope nested inside the current innermost one.
    pub fn open_nested(&mut self) -> Result<ScopeId> {
        let parent = self.current_scope()?;
        let scope = ScopeId::next();
        self.frames.push(Frame::new(scope));
        debug!(
            transaction = self.id,
            %scope,
            %parent,
            depth = self.frames.len() - 1,
            "opened nested scope"
        );
        Ok(scope)
    }

    /// Enlist `participant` with the innermost open scope.
    pub fn enlist(&mut self, participant: &'p dyn Participant) -> Result<()> {
        self.innermost_mut()?.participants.push(participant);
        Ok(())
    }

    /// Run `callback` when the innermost open scope closes.
    pub fn add_close_callback(&mut self, callback: impl FnOnce(Outcome) + 'p) -> Result<()> {
        self.innermost_mut()?.callbacks.push(Box::new(callback));
        Ok(())
    }

    /// Run `callback` when the outermost scope closes.
    pub fn add_outer_close_callback(
        &mut self,
        callback: impl FnOnce(Outcome) + 'p,
    ) -> Result<()> {
        if !self.is_open() {
            return Err(TransactionError::Closed { id: self.id });
        }
        self.outer_callbacks.push(Box::new(callback));
        Ok(())
    }

    /// Commit the innermost open scope.
    pub fn commit(&mut self) -> Result<()> {
        self.close_innermost(Outcome::Committed)
    }

    /// Abort the innermost open scope, rolling back its effects.
    pub fn abort(&mut self) -> Result<()> {
        self.close_innermost(Outcome::Aborted)
    }

    /// Close `scope`, which must be the innermost open scope.
    pub fn close(&mut self, scope: ScopeId, outcome: Outcome) -> Result<()> {
        let innermost = self.current_scope()?;
        if innermost != scope {
            return Err(TransactionError::ScopeMismatch {
                requested: scope,
                innermost,
            });
        }
        self.close_innermost(outcome)
    }

    fn innermost(&self) -> Result<&Frame<'p>> {
        self.frames
            .last()
            .ok_or(TransactionError::Closed { id: self.id })
    }

    fn innermost_mut(&mut self) -> Result<&mut Frame<'p>> {
        let id = self.id;
        self.frames
            .last_mut()
            .ok_or(TransactionError::Closed { id })
    }

    fn close_innermost(&mut self, outcome: Outcome) -> Result<()> {
        let Frame {
            scope,
            participants,
            callbacks,
        } = self
            .frames
            .pop()
            .ok_or(TransactionError::Closed { id: self.id })?;
        let parent = self.frames.last().map(|f| f.scope);
        let close = ScopeClose {
            scope,
            parent,
            outcome,
        };

        let mut promoted: Vec<&'p dyn Participant> = Vec::new();
        for &participant in participants.iter().rev() {
            if participant.on_close(close) == Disposition::Promoted {
                promoted.push(participant);
            }
        }
        for callback in callbacks.into_iter().rev() {
            callback(outcome);
        }

        debug!(
            transaction = self.id,
            %scope,
            %outcome,
            participants = participants.len(),
            promoted = promoted.len(),
            "closed scope"
        );

        match self.frames.last_mut() {
            Some(parent) => {
                promoted.reverse();
                parent.participants.extend(promoted);
            }
            None => {
                OPEN_OUTER.with(|slot| {
                    if slot.get() == Some(self.id) {
                        slot.set(None);
                    }
                });
                if outcome.was_committed() {
                    for participant in &participants {
                        participant.on_outer_commit();
                    }
                }
                for callback in self.outer_callbacks.drain(..) {
                    callback(outcome);
                }
            }
        }
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.is_open() {
            debug!(
                transaction = self.id,
                open_scopes = self.frames.len(),
                "transaction dropped while open; aborting"
            );
        }
        while self.is_open() {
            let _ = self.abort();
        }
    }
}

impl fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field(
                "scopes",
                &self.frames.iter().map(|fr| fr.scope).collect::<Vec<_>>(),
            )
            .finish()
    }
}
