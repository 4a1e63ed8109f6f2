use serde::{Deserialize, Serialize};

use super::Cents;

/// Direction of a transaction relative to the tracker's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (salary, refunds, interest)
    Income,
    /// Money going out (rent, groceries, travel)
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Display label used in listings, e.g. "Income".
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "i" => Some(TransactionKind::Income),
            "expense" | "e" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single income or expense entry.
///
/// Records carry no identity of their own: two records with the same content
/// compare equal. The ledger tells entries apart through [`super::EntryId`].
/// The date is kept exactly as entered and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub kind: TransactionKind,
    pub category: String,
    pub amount_cents: Cents,
    pub date: String,
}

impl TransactionRecord {
    /// Build a record. Never fails; amount sign and date format are the
    /// caller's business.
    pub fn new(
        kind: TransactionKind,
        category: impl Into<String>,
        amount_cents: Cents,
        date: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category: category.into(),
            amount_cents,
            date: date.into(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }
}
