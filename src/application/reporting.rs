use serde::{Deserialize, Serialize};

use crate::domain::{sum_cents, CategoryTotal, Cents, TransactionKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub total_income: Cents,
    pub total_expense: Cents,
    pub income_categories: Vec<CategorySummary>,
    pub expense_categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: usize,
    /// Share of the total for this kind, 0.0 - 100.0
    pub percentage: f64,
}

impl CategoryReport {
    /// Split per-category totals by kind, largest first within each kind.
    pub fn from_totals(totals: Vec<CategoryTotal>) -> Self {
        let (income, expense): (Vec<_>, Vec<_>) = totals
            .into_iter()
            .partition(|t| t.kind == TransactionKind::Income);

        let total_income = sum_cents(income.iter().map(|t| t.total));
        let total_expense = sum_cents(expense.iter().map(|t| t.total));

        Self {
            total_income,
            total_expense,
            income_categories: summarize(income, total_income),
            expense_categories: summarize(expense, total_expense),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.income_categories.is_empty() && self.expense_categories.is_empty()
    }
}

fn summarize(totals: Vec<CategoryTotal>, kind_total: Cents) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = totals
        .into_iter()
        .map(|t| CategorySummary {
            percentage: if kind_total != 0 {
                (t.total as f64 / kind_total as f64) * 100.0
            } else {
                0.0
            },
            category: t.category,
            total: t.total,
            count: t.count,
        })
        .collect();

    // Stable sort keeps first-seen order for ties
    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(kind: TransactionKind, category: &str, total: Cents, count: usize) -> CategoryTotal {
        CategoryTotal {
            kind,
            category: category.to_string(),
            total,
            count,
        }
    }

    #[test]
    fn test_report_splits_and_sorts() {
        let report = CategoryReport::from_totals(vec![
            total(TransactionKind::Expense, "Food", 25000, 3),
            total(TransactionKind::Income, "Salary", 500000, 1),
            total(TransactionKind::Expense, "Rent", 75000, 1),
        ]);

        assert_eq!(report.total_income, 500000);
        assert_eq!(report.total_expense, 100000);
        assert_eq!(report.expense_categories[0].category, "Rent");
        assert_eq!(report.expense_categories[0].percentage, 75.0);
        assert_eq!(report.expense_categories[1].percentage, 25.0);
        assert_eq!(report.income_categories[0].percentage, 100.0);
    }

    #[test]
    fn test_report_totals_saturate() {
        let report = CategoryReport::from_totals(vec![
            total(TransactionKind::Income, "A", Cents::MAX, 1),
            total(TransactionKind::Income, "B", Cents::MAX, 1),
        ]);

        assert_eq!(report.total_income, Cents::MAX);
        assert_eq!(report.income_categories.len(), 2);
    }

    #[test]
    fn test_zero_totals_do_not_divide_by_zero() {
        let report = CategoryReport::from_totals(vec![total(TransactionKind::Expense, "Free", 0, 1)]);
        assert_eq!(report.expense_categories[0].percentage, 0.0);
        assert!(!report.is_empty());
    }
}
