use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::TrackerService;
use crate::domain::{BalanceSummary, TransactionRecord};

/// Point-in-time copy of everything the tracker holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub balance: BalanceSummary,
    /// Most recently added first
    pub transactions: Vec<TransactionRecord>,
    /// Oldest scheduled first
    pub scheduled: Vec<TransactionRecord>,
}

/// Output formats understood by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// Writes tracker contents to any writer. Nothing is ever read back.
pub struct Exporter<'a> {
    service: &'a TrackerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a TrackerService) -> Self {
        Self { service }
    }

    /// Export committed transactions, newest first.
    pub fn export_transactions<W: Write>(&self, writer: W, format: ExportFormat) -> Result<usize> {
        let records: Vec<&TransactionRecord> = self.service.list_transactions().collect();
        write_records(writer, &records, format)
    }

    /// Export scheduled transactions in queue order.
    pub fn export_scheduled<W: Write>(&self, writer: W, format: ExportFormat) -> Result<usize> {
        let records: Vec<&TransactionRecord> = self.service.list_scheduled().collect();
        write_records(writer, &records, format)
    }

    pub fn export_balance<W: Write>(&self, mut writer: W, format: ExportFormat) -> Result<()> {
        let summary = self.service.compute_balance();
        match format {
            ExportFormat::Csv => {
                let mut csv_writer = csv::Writer::from_writer(writer);
                csv_writer.write_record(["income_cents", "expense_cents", "balance_cents"])?;
                csv_writer.write_record([
                    summary.income.to_string(),
                    summary.expense.to_string(),
                    summary.balance.to_string(),
                ])?;
                csv_writer.flush()?;
            }
            ExportFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, &summary)?;
                writeln!(writer)?;
                writer.flush()?;
            }
        }
        Ok(())
    }

    /// Export the whole tracker as one JSON document.
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<TrackerSnapshot> {
        let snapshot = TrackerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            balance: self.service.compute_balance(),
            transactions: self.service.list_transactions().cloned().collect(),
            scheduled: self.service.list_scheduled().cloned().collect(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(snapshot)
    }
}

fn write_records<W: Write>(
    mut writer: W,
    records: &[&TransactionRecord],
    format: ExportFormat,
) -> Result<usize> {
    match format {
        ExportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            csv_writer.write_record(["kind", "category", "amount_cents", "date"])?;
            for record in records {
                let amount = record.amount_cents.to_string();
                csv_writer.write_record([
                    record.kind.as_str(),
                    record.category.as_str(),
                    amount.as_str(),
                    record.date.as_str(),
                ])?;
            }
            csv_writer.flush()?;
        }
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, records)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(records.len())
}
