//! The [`Participant`] protocol and the snapshot-based participant helper.

use crate::cell::TransactionalCell;
use crate::error::Result;
use crate::scope::{Disposition, Outcome, ScopeClose};
use crate::transaction::Transaction;

/// Anything that wants to hear about the scopes it enlisted in.
///
/// A participant is enlisted with at most one scope at a time per snapshot
/// it holds. When that scope closes the transaction calls [`on_close`]; if
/// the participant answers [`Disposition::Promoted`] it is enlisted with the
/// parent scope.
///
/// [`on_close`]: Participant::on_close
pub trait Participant {
    /// Resolve this participant's state for a closing scope.
    fn on_close(&self, close: ScopeClose) -> Disposition;

    /// Called once after the outermost scope commits, if this participant
    /// was enlisted with it.
    fn on_outer_commit(&self) {}
}

/// A participant whose rollback state is a snapshot of some value.
///
/// Implementors provide how to take and restore a snapshot plus the
/// [`TransactionalCell`] holding them; the scope bookkeeping is shared.
/// Call [`update_snapshots`] before every mutation.
///
/// [`update_snapshots`]: SnapshotParticipant::update_snapshots
pub trait SnapshotParticipant {
    type Snapshot;

    /// The snapshot stack owned by this participant.
    fn journal(&self) -> &TransactionalCell<Self::Snapshot>;

    /// Capture the current state.
    fn create_snapshot(&self) -> Self::Snapshot;

    /// Restore a previously captured state.
    fn read_snapshot(&self, snapshot: Self::Snapshot);

    /// Post-commit hook, run once per outermost commit this participant
    /// took part in. Owners typically mark themselves dirty here.
    fn on_final_commit(&self) {}

    /// Record a snapshot for the innermost open scope if it has none yet.
    ///
    /// Must be called before the state is mutated. Fails only if the
    /// transaction is already closed, in which case nothing is recorded.
    fn update_snapshots<'p>(&'p self, tx: &mut Transaction<'p>) -> Result<()>
    where
        Self: Sized,
    {
        let scope = tx.current_scope()?;
        if self.journal().snapshot_for(scope, || self.create_snapshot()) {
            tx.enlist(self)?;
        }
        Ok(())
    }
}

impl<P: SnapshotParticipant> Participant for P {
    fn on_close(&self, close: ScopeClose) -> Disposition {
        match close.outcome {
            Outcome::Committed => self.journal().commit_scope(close.scope, close.parent),
            Outcome::Aborted => {
                if let Some(snapshot) = self.journal().abort_scope(close.scope) {
                    self.read_snapshot(snapshot);
                }
                Disposition::Released
            }
        }
    }

    fn on_outer_commit(&self) {
        self.on_final_commit();
    }
}
