// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use fintrack::application::TrackerService;
use fintrack::cli::{Session, SessionConfig};
use fintrack::domain::{Cents, TransactionKind, TransactionRecord};

/// Helper to build a record the way the service would
pub fn record(kind: TransactionKind, category: &str, amount: Cents, date: &str) -> TransactionRecord {
    TransactionRecord::new(kind, category, amount, date)
}

/// Helper to run a script through a fresh, non-interactive session
pub fn run_script(script: &str) -> Result<String> {
    let mut service = TrackerService::new();
    run_script_on(&mut service, script)
}

/// Helper to run a script against an existing tracker
pub fn run_script_on(service: &mut TrackerService, script: &str) -> Result<String> {
    let mut out = Vec::new();
    Session::new(service, SessionConfig::default()).run(script.as_bytes(), &mut out)?;
    Ok(String::from_utf8(out)?)
}

/// Test fixture: the salary / rent / trip example
pub struct MonthlyBudget;

impl MonthlyBudget {
    /// Salary 5000 and rent 1500 committed, a 2000 trip scheduled
    pub fn create(service: &mut TrackerService) {
        service.add_transaction(TransactionKind::Income, "Salary", 500000, "2024-01-01");
        service.add_transaction(TransactionKind::Expense, "Rent", 150000, "2024-01-02");
        service.schedule_transaction(TransactionKind::Expense, "Trip", 200000, "2024-06-01");
    }

    pub fn trip() -> TransactionRecord {
        record(TransactionKind::Expense, "Trip", 200000, "2024-06-01")
    }
}

/// Collect the ledger in listing order
pub fn ledger_of(service: &TrackerService) -> Vec<TransactionRecord> {
    service.list_transactions().cloned().collect()
}

/// Collect the schedule in queue order
pub fn scheduled_of(service: &TrackerService) -> Vec<TransactionRecord> {
    service.list_scheduled().cloned().collect()
}
