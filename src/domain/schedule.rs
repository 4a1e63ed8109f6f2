use std::collections::VecDeque;

use super::TransactionRecord;

/// Transactions planned for later, oldest first.
///
/// Nothing here is ever moved into the ledger; the queue is append-only
/// and read through [`ScheduleQueue::peek_all`].
#[derive(Debug, Clone, Default)]
pub struct ScheduleQueue {
    pending: VecDeque<TransactionRecord>,
}

impl ScheduleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn enqueue(&mut self, record: TransactionRecord) {
        self.pending.push_back(record);
    }

    /// Borrowing FIFO view; the queue itself is not consumed.
    pub fn peek_all(&self) -> impl Iterator<Item = &TransactionRecord> + '_ {
        self.pending.iter()
    }
}
