use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, error, warn};

use crate::domain::{
    BalanceSummary, Cents, EntryId, Ledger, ScheduleQueue, TransactionKind, TransactionRecord,
    UndoError, UndoHistory,
};

use super::{CategoryReport, TrackerError};

/// Application service owning the ledger, its undo history and the schedule.
/// This is the only interface the shell talks to.
#[derive(Debug, Clone, Default)]
pub struct TrackerService {
    ledger: Ledger,
    history: UndoHistory,
    schedule: ScheduleQueue,
}

/// Result of checking that the undo history still mirrors the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub ledger_entries: usize,
    pub history_entries: usize,
    pub scheduled_entries: usize,
    /// History handles with no matching ledger entry
    pub dangling: Vec<EntryId>,
    /// Ledger entries that no history handle points at
    pub untracked: Vec<EntryId>,
    /// History (top first) lists the same handles as the ledger (head first)
    pub order_matches: bool,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.dangling.is_empty() && self.untracked.is_empty() && self.order_matches
    }
}

impl TrackerService {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Commands
    // ========================

    /// Commit a transaction to the ledger and make it undoable.
    pub fn add_transaction(
        &mut self,
        kind: TransactionKind,
        category: impl Into<String>,
        amount_cents: Cents,
        date: impl Into<String>,
    ) -> TransactionRecord {
        let record = TransactionRecord::new(kind, category, amount_cents, date);
        let id = self.ledger.insert_front(record.clone());
        self.history.record(id);

        debug!(
            entry = %id,
            kind = %record.kind,
            category = %record.category,
            amount_cents = record.amount_cents,
            "transaction added"
        );
        record
    }

    /// Queue a transaction for later. The ledger and undo history are untouched.
    pub fn schedule_transaction(
        &mut self,
        kind: TransactionKind,
        category: impl Into<String>,
        amount_cents: Cents,
        date: impl Into<String>,
    ) -> TransactionRecord {
        let record = TransactionRecord::new(kind, category, amount_cents, date);
        self.schedule.enqueue(record.clone());

        debug!(
            kind = %record.kind,
            category = %record.category,
            date = %record.date,
            pending = self.schedule.len(),
            "transaction scheduled"
        );
        record
    }

    /// Remove the most recently added transaction.
    pub fn undo(&mut self) -> Result<TransactionRecord, TrackerError> {
        match self.history.undo_last(&mut self.ledger) {
            Ok(record) => {
                debug!(category = %record.category, remaining = self.ledger.len(), "transaction undone");
                Ok(record)
            }
            Err(UndoError::NothingToUndo) => {
                warn!("undo requested with empty history");
                Err(TrackerError::NothingToUndo)
            }
            Err(err @ UndoError::RemovalNotFound(_)) => {
                error!(%err, "undo history out of sync; ledger left unchanged");
                Err(err.into())
            }
        }
    }

    // ========================
    // Queries
    // ========================

    /// Committed transactions, most recently added first.
    pub fn list_transactions(&self) -> impl Iterator<Item = &TransactionRecord> + '_ {
        self.ledger.iter()
    }

    /// The `limit` most recently added transactions, newest first.
    /// A limit of 0 means no limit.
    pub fn recent_transactions(&self, limit: usize) -> impl Iterator<Item = &TransactionRecord> + '_ {
        let limit = if limit == 0 { usize::MAX } else { limit };
        self.ledger.iter().take(limit)
    }

    /// Scheduled transactions, oldest first.
    pub fn list_scheduled(&self) -> impl Iterator<Item = &TransactionRecord> + '_ {
        self.schedule.peek_all()
    }

    pub fn compute_balance(&self) -> BalanceSummary {
        self.ledger.aggregate_balance()
    }

    pub fn category_report(&self) -> CategoryReport {
        CategoryReport::from_totals(self.ledger.category_totals())
    }

    pub fn transaction_count(&self) -> usize {
        self.ledger.len()
    }

    pub fn scheduled_count(&self) -> usize {
        self.schedule.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Compare the undo history against the ledger entry by entry.
    pub fn check_consistency(&self) -> ConsistencyReport {
        let history: Vec<EntryId> = self.history.iter().collect();
        let ledger: Vec<EntryId> = self.ledger.iter_entries().map(|(id, _)| id).collect();

        let in_history: HashSet<EntryId> = history.iter().copied().collect();
        let in_ledger: HashSet<EntryId> = ledger.iter().copied().collect();

        let dangling = history
            .iter()
            .filter(|id| !in_ledger.contains(*id))
            .copied()
            .collect();
        let untracked = ledger
            .iter()
            .filter(|id| !in_history.contains(*id))
            .copied()
            .collect();

        ConsistencyReport {
            ledger_entries: ledger.len(),
            history_entries: history.len(),
            scheduled_entries: self.schedule.len(),
            dangling,
            untracked,
            order_matches: history == ledger,
        }
    }
}

#[cfg(test)]
impl TrackerService {
    /// Drop an entry from the ledger behind the undo history's back.
    pub(crate) fn remove_head_untracked(&mut self) -> Option<EntryId> {
        let head = self.ledger.head_id()?;
        self.ledger.remove_exact(head)?;
        Some(head)
    }
}
