//! Lazy, per-scope snapshot stack.
//!
//! [`TransactionalCell`] records the prior value of some piece of state the
//! first time a scope mutates it, and hands that value back if the scope is
//! aborted. It knows nothing about what the value means, so any participant
//! can reuse it.
//!
//! The entries form a stack whose scopes are always a subsequence of the
//! transaction's open scopes, outermost first. Because only the innermost
//! open scope can mutate, a scope is dirty exactly when the top entry
//! belongs to it.

use std::cell::RefCell;

use crate::scope::{Disposition, ScopeId};

/// A prior value recorded for one scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotEntry<T> {
    pub scope: ScopeId,
    pub prior: T,
}

/// Snapshot stack for one participant.
#[derive(Debug)]
pub struct TransactionalCell<T> {
    entries: RefCell<Vec<SnapshotEntry<T>>>,
}

impl<T> TransactionalCell<T> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Record a snapshot for `scope` if it does not have one yet.
    ///
    /// `capture` is only called on the clean → dirty transition. Returns
    /// `true` when a new entry was recorded, in which case the caller must
    /// enlist with the scope so the entry is resolved when it closes.
    pub fn snapshot_for(&self, scope: ScopeId, capture: impl FnOnce() -> T) -> bool {
        if self.entries.borrow().last().is_some_and(|e| e.scope == scope) {
            return false;
        }
        let prior = capture();
        self.entries.borrow_mut().push(SnapshotEntry { scope, prior });
        true
    }

    /// Resolve `scope`'s entry after a commit.
    ///
    /// If the parent scope is clean the entry is re-keyed to it, so the
    /// parent can still roll back what this scope committed. If the parent
    /// already has an older entry, or this was the outermost scope, the
    /// entry is dropped.
    pub fn commit_scope(&self, scope: ScopeId, parent: Option<ScopeId>) -> Disposition {
        let mut entries = self.entries.borrow_mut();
        let Some(entry) = pop_if(&mut entries, scope) else {
            return Disposition::Released;
        };
        match parent {
            Some(parent) if !entries.last().is_some_and(|e| e.scope == parent) => {
                entries.push(SnapshotEntry {
                    scope: parent,
                    prior: entry.prior,
                });
                Disposition::Promoted
            }
            _ => Disposition::Released,
        }
    }

    /// Resolve `scope`'s entry after an abort, returning the value to restore.
    pub fn abort_scope(&self, scope: ScopeId) -> Option<T> {
        pop_if(&mut self.entries.borrow_mut(), scope).map(|e| e.prior)
    }

    /// Returns `true` if `scope` has recorded a snapshot.
    pub fn is_dirty(&self, scope: ScopeId) -> bool {
        self.entries.borrow().iter().any(|e| e.scope == scope)
    }

    /// Returns `true` if no scope holds a snapshot.
    pub fn is_clean(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Number of scopes currently holding a snapshot.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_clean()
    }
}

impl<T: Clone> TransactionalCell<T> {
    /// The prior value recorded for `scope`, if any.
    pub fn prior(&self, scope: ScopeId) -> Option<T> {
        self.entries
            .borrow()
            .iter()
            .find(|e| e.scope == scope)
            .map(|e| e.prior.clone())
    }
}

impl<T> Default for TransactionalCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn pop_if<T>(entries: &mut Vec<SnapshotEntry<T>>, scope: ScopeId) -> Option<SnapshotEntry<T>> {
    if entries.last().is_some_and(|e| e.scope == scope) {
        entries.pop()
    } else {
        None
    }
}
