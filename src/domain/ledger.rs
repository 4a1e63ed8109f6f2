use serde::{Deserialize, Serialize};

use super::{clamp_cents, Cents, TransactionKind, TransactionRecord};

/// Opaque handle to a ledger entry. Handles are issued in increasing order
/// and never reused, even after the entry is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Income and expense totals over the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub income: Cents,
    pub expense: Cents,
    /// income - expense
    pub balance: Cents,
}

/// Running total for one (kind, category) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub kind: TransactionKind,
    pub category: String,
    pub total: Cents,
    pub count: usize,
}

#[derive(Debug, Clone)]
struct Node {
    id: EntryId,
    record: TransactionRecord,
    next: Option<usize>,
}

/// Committed transactions, most recently added first.
///
/// Entries live in an arena of slots chained by index, so removing one never
/// invalidates the handles of the others. Freed slots are recycled.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    len: usize,
    last_id: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Prepend a record and return its handle. O(1).
    pub fn insert_front(&mut self, record: TransactionRecord) -> EntryId {
        self.last_id += 1;
        let id = EntryId(self.last_id);
        let node = Node {
            id,
            record,
            next: self.head,
        };

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.head = Some(slot);
        self.len += 1;
        id
    }

    /// Unlink the entry with the given handle wherever it sits.
    /// Returns `None` and leaves the ledger untouched if the handle is unknown.
    pub fn remove_exact(&mut self, id: EntryId) -> Option<TransactionRecord> {
        let mut prev: Option<usize> = None;
        let mut cursor = self.head;

        while let Some(slot) = cursor {
            let (node_id, next) = match &self.slots[slot] {
                Some(node) => (node.id, node.next),
                None => return None,
            };

            if node_id == id {
                match prev {
                    None => self.head = next,
                    Some(prev_slot) => {
                        if let Some(prev_node) = self.slots[prev_slot].as_mut() {
                            prev_node.next = next;
                        }
                    }
                }
                let removed = self.slots[slot].take()?;
                self.free.push(slot);
                self.len -= 1;
                return Some(removed.record);
            }

            prev = Some(slot);
            cursor = next;
        }

        None
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, id: EntryId) -> bool {
        self.iter_entries().any(|(entry_id, _)| entry_id == id)
    }

    #[cfg(test)]
    pub(crate) fn head_id(&self) -> Option<EntryId> {
        self.iter_entries().next().map(|(id, _)| id)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: EntryId) -> Option<&TransactionRecord> {
        self.iter_entries()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, record)| record)
    }

    /// Walk entries head to tail together with their handles.
    pub fn iter_entries(&self) -> Entries<'_> {
        Entries {
            ledger: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Walk records head to tail (most recent first). Each call starts over.
    pub fn iter(&self) -> impl Iterator<Item = &TransactionRecord> + '_ {
        self.iter_entries().map(|(_, record)| record)
    }

    /// Sum incomes and expenses in a single pass.
    ///
    /// Totals are accumulated wide and clamped to the `Cents` range, so the
    /// result never depends on insertion order and never overflows.
    pub fn aggregate_balance(&self) -> BalanceSummary {
        let (income, expense) = self.iter().fold((0i128, 0i128), |(income, expense), record| {
            let amount = i128::from(record.amount_cents);
            if record.is_income() {
                (income + amount, expense)
            } else {
                (income, expense + amount)
            }
        });

        BalanceSummary {
            income: clamp_cents(income),
            expense: clamp_cents(expense),
            balance: clamp_cents(income - expense),
        }
    }

    /// Totals per (kind, category), in the order categories are first seen
    /// walking from the head.
    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();

        for record in self.iter() {
            match totals
                .iter_mut()
                .find(|t| t.kind == record.kind && t.category == record.category)
            {
                Some(total) => {
                    total.total = total.total.saturating_add(record.amount_cents);
                    total.count += 1;
                }
                None => totals.push(CategoryTotal {
                    kind: record.kind,
                    category: record.category.clone(),
                    total: record.amount_cents,
                    count: 1,
                }),
            }
        }

        totals
    }
}

/// Iterator over ledger entries, head first.
pub struct Entries<'a> {
    ledger: &'a Ledger,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (EntryId, &'a TransactionRecord);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.ledger.slots.get(slot)?.as_ref()?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((node.id, &node.record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn income(category: &str, amount: Cents) -> TransactionRecord {
        TransactionRecord::new(TransactionKind::Income, category, amount, "2024-01-01")
    }

    fn expense(category: &str, amount: Cents) -> TransactionRecord {
        TransactionRecord::new(TransactionKind::Expense, category, amount, "2024-01-02")
    }

    fn categories(ledger: &Ledger) -> Vec<&str> {
        ledger.iter().map(|r| r.category.as_str()).collect()
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.iter().count(), 0);
        assert_eq!(ledger.head_id(), None);
        assert_eq!(ledger.aggregate_balance(), BalanceSummary::default());
    }

    #[test]
    fn test_insert_front_orders_newest_first() {
        let mut ledger = Ledger::new();
        ledger.insert_front(income("Salary", 500000));
        ledger.insert_front(expense("Rent", 150000));
        ledger.insert_front(expense("Food", 20000));

        assert_eq!(ledger.len(), 3);
        assert_eq!(categories(&ledger), vec!["Food", "Rent", "Salary"]);
    }

    #[test]
    fn test_handles_are_distinct_for_equal_records() {
        let mut ledger = Ledger::new();
        let first = ledger.insert_front(expense("Coffee", 300));
        let second = ledger.insert_front(expense("Coffee", 300));

        assert_ne!(first, second);
        assert!(first < second);
    }

    #[test]
    fn test_remove_head() {
        let mut ledger = Ledger::new();
        ledger.insert_front(income("Salary", 500000));
        let rent = ledger.insert_front(expense("Rent", 150000));

        let removed = ledger.remove_exact(rent).unwrap();
        assert_eq!(removed.category, "Rent");
        assert_eq!(categories(&ledger), vec!["Salary"]);
    }

    #[test]
    fn test_remove_from_middle_and_tail() {
        let mut ledger = Ledger::new();
        let salary = ledger.insert_front(income("Salary", 500000));
        let rent = ledger.insert_front(expense("Rent", 150000));
        ledger.insert_front(expense("Food", 20000));

        assert!(ledger.remove_exact(rent).is_some());
        assert_eq!(categories(&ledger), vec!["Food", "Salary"]);

        assert!(ledger.remove_exact(salary).is_some());
        assert_eq!(categories(&ledger), vec!["Food"]);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_only_the_exact_entry_among_equal_records() {
        let mut ledger = Ledger::new();
        let older = ledger.insert_front(expense("Coffee", 300));
        let newer = ledger.insert_front(expense("Coffee", 300));

        ledger.remove_exact(older);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.head_id(), Some(newer));
        assert!(!ledger.contains(older));
    }

    #[test]
    fn test_remove_unknown_handle_is_noop() {
        let mut ledger = Ledger::new();
        let salary = ledger.insert_front(income("Salary", 500000));
        ledger.remove_exact(salary);

        assert_eq!(ledger.remove_exact(salary), None);

        ledger.insert_front(expense("Rent", 150000));
        assert_eq!(ledger.remove_exact(salary), None);
        assert_eq!(categories(&ledger), vec!["Rent"]);
    }

    #[test]
    fn test_slots_are_recycled_but_handles_are_not() {
        let mut ledger = Ledger::new();
        let first = ledger.insert_front(income("Salary", 500000));
        ledger.remove_exact(first);
        let second = ledger.insert_front(income("Bonus", 10000));

        assert_ne!(first, second);
        assert_eq!(ledger.slots.len(), 1);
        assert_eq!(ledger.get(second).map(|r| r.category.as_str()), Some("Bonus"));
        assert_eq!(ledger.get(first), None);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let mut ledger = Ledger::new();
        ledger.insert_front(income("Salary", 500000));
        ledger.insert_front(expense("Rent", 150000));

        let first_pass: Vec<_> = ledger.iter().cloned().collect();
        let second_pass: Vec<_> = ledger.iter().cloned().collect();
        assert_eq!(first_pass, second_pass);
        assert_eq!(ledger.iter_entries().size_hint(), (2, Some(2)));
    }

    #[test]
    fn test_aggregate_balance() {
        let mut ledger = Ledger::new();
        ledger.insert_front(income("Salary", 500000));
        ledger.insert_front(expense("Rent", 150000));
        ledger.insert_front(income("Refund", 2500));
        ledger.insert_front(expense("Food", 20000));

        let summary = ledger.aggregate_balance();
        assert_eq!(summary.income, 502500);
        assert_eq!(summary.expense, 170000);
        assert_eq!(summary.balance, 332500);
    }

    #[test]
    fn test_aggregate_allows_negative_balance() {
        let mut ledger = Ledger::new();
        ledger.insert_front(expense("Rent", 150000));

        assert_eq!(ledger.aggregate_balance().balance, -150000);
    }

    #[test]
    fn test_aggregate_clamps_instead_of_overflowing() {
        let mut ledger = Ledger::new();
        ledger.insert_front(income("A", Cents::MAX));
        ledger.insert_front(income("B", Cents::MAX));
        ledger.insert_front(expense("C", Cents::MAX));
        ledger.insert_front(expense("D", Cents::MAX));

        let summary = ledger.aggregate_balance();
        assert_eq!(summary.income, Cents::MAX);
        assert_eq!(summary.expense, Cents::MAX);
        // Computed from the unclamped totals
        assert_eq!(summary.balance, 0);
    }

    #[test]
    fn test_aggregate_clamps_negative_balance() {
        let mut ledger = Ledger::new();
        ledger.insert_front(income("Debt", Cents::MIN));
        ledger.insert_front(expense("Rent", Cents::MAX));

        assert_eq!(ledger.aggregate_balance().balance, Cents::MIN);
    }

    #[test]
    fn test_category_totals_saturate() {
        let mut ledger = Ledger::new();
        ledger.insert_front(income("Salary", Cents::MAX));
        ledger.insert_front(income("Salary", Cents::MAX));

        assert_eq!(ledger.category_totals()[0].total, Cents::MAX);
    }

    #[test]
    fn test_category_totals() {
        let mut ledger = Ledger::new();
        ledger.insert_front(expense("Food", 1000));
        ledger.insert_front(income("Food", 500));
        ledger.insert_front(expense("Rent", 150000));
        ledger.insert_front(expense("Food", 2000));

        let totals = ledger.category_totals();
        assert_eq!(totals.len(), 3);

        assert_eq!(totals[0].category, "Food");
        assert_eq!(totals[0].kind, TransactionKind::Expense);
        assert_eq!(totals[0].total, 3000);
        assert_eq!(totals[0].count, 2);

        assert_eq!(totals[1].category, "Rent");
        assert_eq!(totals[2].kind, TransactionKind::Income);
        assert_eq!(totals[2].total, 500);
    }
}
