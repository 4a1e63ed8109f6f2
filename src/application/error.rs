use thiserror::Error;

use crate::domain::{EntryId, UndoError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Nothing to undo")]
    NothingToUndo,

    /// The undo history pointed at an entry the ledger no longer holds.
    /// The ledger is left as it was.
    #[error("Undo history is out of sync with the ledger: entry {0} not found")]
    RemovalNotFound(EntryId),
}

impl From<UndoError> for TrackerError {
    fn from(err: UndoError) -> Self {
        match err {
            UndoError::NothingToUndo => TrackerError::NothingToUndo,
            UndoError::RemovalNotFound(id) => TrackerError::RemovalNotFound(id),
        }
    }
}
