use super::{EntryId, Ledger, TransactionRecord};

/// Stack of handles to ledger entries, newest on top.
///
/// Only additions are recorded here; scheduled records never are. Popping a
/// handle is final: it is never pushed again.
#[derive(Debug, Clone, Default)]
pub struct UndoHistory {
    stack: Vec<EntryId>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Push the handle of an entry that was just inserted into the ledger.
    pub fn record(&mut self, id: EntryId) {
        self.stack.push(id);
    }

    /// Handles from the top of the stack down.
    pub fn iter(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.stack.iter().rev().copied()
    }

    /// Pop the newest handle and remove that entry from `ledger`.
    ///
    /// An empty history leaves everything untouched. A handle the ledger no
    /// longer holds is still consumed, but the ledger is not modified.
    pub fn undo_last(&mut self, ledger: &mut Ledger) -> Result<TransactionRecord, UndoError> {
        let id = self.stack.pop().ok_or(UndoError::NothingToUndo)?;
        ledger
            .remove_exact(id)
            .ok_or(UndoError::RemovalNotFound(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoError {
    NothingToUndo,
    RemovalNotFound(EntryId),
}

impl std::fmt::Display for UndoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UndoError::NothingToUndo => write!(f, "Nothing to undo"),
            UndoError::RemovalNotFound(id) => {
                write!(f, "Undo history refers to entry {} which is not in the ledger", id)
            }
        }
    }
}

impl std::error::Error for UndoError {}
