use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::application::{TrackerError, TrackerService};
use crate::domain::{
    format_amount, format_cents, parse_cents, Cents, TransactionKind, TransactionRecord,
};
use crate::io::{ExportFormat, Exporter};

const PROMPT: &str = "> ";

const MENU: &str = "\
--- Finance Tracker ---
1. add <income|expense> <category> <amount> <date>
2. list [--limit N]
3. balance
4. undo
5. schedule <income|expense> <category> <amount> <date>
6. scheduled
   report | check | export <transactions|scheduled|balance|full> [--format csv|json]
0. exit
Type 'help' for details.";

/// fintrack - Personal Finance Tracker
#[derive(Parser, Debug)]
#[command(name = "fintrack")]
#[command(about = "Track income and expenses in memory, with undo and scheduled transactions")]
#[command(version)]
pub struct Cli {
    /// Prefix printed before amounts in balances and reports
    #[arg(short, long, default_value = "rs")]
    pub currency: String,

    /// Read commands from a file instead of standard input
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Do not print the menu and prompt
    #[arg(long)]
    pub no_prompt: bool,

    /// Enable verbose logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Presentation settings for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub currency: String,
    pub interactive: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            currency: "rs".to_string(),
            interactive: false,
        }
    }
}

impl Cli {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            currency: self.currency.clone(),
            interactive: !self.no_prompt && self.script.is_none(),
        }
    }

    pub fn run(self) -> Result<()> {
        let stdout = io::stdout();
        self.run_to(stdout.lock())
    }

    /// Run a whole session, writing every response to `out`.
    pub fn run_to<W: Write>(self, out: W) -> Result<()> {
        let config = self.session_config();
        let mut service = TrackerService::new();
        let mut session = Session::new(&mut service, config);

        match &self.script {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open script: {}", path.display()))?;
                session.run(BufReader::new(file), out)
            }
            None => {
                let stdin = io::stdin();
                session.run(stdin.lock(), out)
            }
        }
    }
}

/// One input line, parsed as a command.
#[derive(Parser, Debug)]
#[command(name = "command", no_binary_name = true)]
#[command(disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Record a transaction in the ledger
    #[command(visible_alias = "1")]
    Add(EntryArgs),

    /// List transactions, most recent first
    #[command(visible_alias = "2")]
    List {
        /// Show only the N most recent transactions (0 shows all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show total income, expenses and balance
    #[command(visible_alias = "3")]
    Balance,

    /// Remove the most recently added transaction
    #[command(visible_alias = "4")]
    Undo,

    /// Schedule a future transaction (never added to the ledger)
    #[command(visible_alias = "5")]
    Schedule(EntryArgs),

    /// List scheduled transactions, oldest first
    #[command(visible_alias = "6")]
    Scheduled,

    /// Show totals per category
    Report,

    /// Verify the undo history matches the ledger
    Check,

    /// Write data in CSV or JSON
    Export {
        /// What to export: transactions, scheduled, balance, full
        what: String,

        /// Format: csv, json (full is always json)
        #[arg(short, long, default_value = "csv")]
        format: String,
    },

    /// End the session
    #[command(visible_aliases = ["0", "quit"])]
    Exit,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct EntryArgs {
    /// income or expense
    pub kind: String,

    /// Free-form label, e.g. "Rent"
    pub category: String,

    /// Amount, e.g. "50.00" or "50"
    #[arg(allow_hyphen_values = true)]
    pub amount: String,

    /// Date as YYYY-MM-DD (stored as given)
    pub date: String,
}

impl EntryArgs {
    fn parse(&self) -> Result<(TransactionKind, Cents)> {
        let kind = TransactionKind::from_str(&self.kind).with_context(|| {
            format!("Invalid type '{}'. Use 'income' or 'expense'", self.kind)
        })?;
        let amount =
            parse_cents(&self.amount).context("Invalid amount format. Use '50.00' or '50'")?;
        Ok((kind, amount))
    }
}

/// Whether the session should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A line-oriented session over a tracker the caller owns.
pub struct Session<'a> {
    service: &'a mut TrackerService,
    config: SessionConfig,
}

impl<'a> Session<'a> {
    pub fn new(service: &'a mut TrackerService, config: SessionConfig) -> Self {
        Self { service, config }
    }

    /// Read commands until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<()> {
        if self.config.interactive {
            writeln!(out, "{}", MENU)?;
        }

        let mut buf = Vec::new();
        let mut line_number = 0usize;
        loop {
            if self.config.interactive {
                write!(out, "{}", PROMPT)?;
                out.flush()?;
            }

            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .context("Failed to read command")?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let flow = match std::str::from_utf8(&buf) {
                Ok(line) => self.execute_line(line, &mut out)?,
                Err(_) => {
                    writeln!(out, "Error: line {} is not valid UTF-8, skipped", line_number)?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Parse and run one line. Blank lines and `#` comments are skipped.
    /// Only output failures are returned as errors.
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        match SessionLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => self.execute(parsed.command, out),
            Err(err) => {
                write!(out, "{}", err.render())?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> Result<Flow> {
        match command {
            SessionCommand::Add(args) => match args.parse() {
                Ok((kind, amount)) => {
                    self.service
                        .add_transaction(kind, args.category, amount, args.date);
                    writeln!(out, "Transaction added successfully.")?;
                }
                Err(err) => writeln!(out, "Error: {:#}", err)?,
            },

            SessionCommand::Schedule(args) => match args.parse() {
                Ok((kind, amount)) => {
                    self.service
                        .schedule_transaction(kind, args.category, amount, args.date);
                    writeln!(out, "Transaction scheduled successfully.")?;
                }
                Err(err) => writeln!(out, "Error: {:#}", err)?,
            },

            SessionCommand::List { limit } => run_list_command(self.service, limit, out)?,
            SessionCommand::Balance => run_balance_command(self.service, &self.config, out)?,
            SessionCommand::Undo => run_undo_command(self.service, out)?,
            SessionCommand::Scheduled => run_scheduled_command(self.service, out)?,
            SessionCommand::Report => run_report_command(self.service, &self.config, out)?,
            SessionCommand::Check => run_check_command(self.service, out)?,

            SessionCommand::Export { what, format } => {
                if let Err(err) = run_export_command(self.service, &what, &format, out) {
                    writeln!(out, "Error: {:#}", err)?;
                }
            }

            SessionCommand::Exit => {
                writeln!(out, "Exiting...")?;
                return Ok(Flow::Exit);
            }
        }

        Ok(Flow::Continue)
    }
}

fn run_list_command<W: Write>(
    service: &TrackerService,
    limit: Option<usize>,
    out: &mut W,
) -> Result<()> {
    if service.transaction_count() == 0 {
        writeln!(out, "No transactions available.")?;
        return Ok(());
    }

    writeln!(out, "{:<10}{:<15}{:>12}  {}", "Type", "Category", "Amount", "Date")?;
    writeln!(out, "{}", "-".repeat(51))?;
    for record in service.recent_transactions(limit.unwrap_or(0)) {
        writeln!(
            out,
            "{:<10}{:<15}{:>12}  {}",
            record.kind.label(),
            truncate(&record.category, 14),
            format_cents(record.amount_cents),
            record.date
        )?;
    }
    Ok(())
}

fn run_balance_command<W: Write>(
    service: &TrackerService,
    config: &SessionConfig,
    out: &mut W,
) -> Result<()> {
    let summary = service.compute_balance();
    writeln!(out, "Total Income: {}", format_amount(&config.currency, summary.income))?;
    writeln!(out, "Total Expenses: {}", format_amount(&config.currency, summary.expense))?;
    writeln!(out, "Balance: {}", format_amount(&config.currency, summary.balance))?;
    Ok(())
}

fn run_undo_command<W: Write>(service: &mut TrackerService, out: &mut W) -> Result<()> {
    match service.undo() {
        Ok(record) => {
            writeln!(out, "Last transaction undone: {}", describe(&record))?;
        }
        Err(TrackerError::NothingToUndo) => {
            writeln!(out, "Nothing to undo.")?;
        }
        Err(err) => {
            writeln!(out, "Error: {}", err)?;
        }
    }
    Ok(())
}

fn run_scheduled_command<W: Write>(service: &TrackerService, out: &mut W) -> Result<()> {
    if service.scheduled_count() == 0 {
        writeln!(out, "No scheduled transactions.")?;
        return Ok(());
    }

    writeln!(out, "Scheduled Transactions:")?;
    for record in service.list_scheduled() {
        writeln!(out, "{}", describe(record))?;
    }
    Ok(())
}

fn run_report_command<W: Write>(
    service: &TrackerService,
    config: &SessionConfig,
    out: &mut W,
) -> Result<()> {
    let report = service.category_report();
    if report.is_empty() {
        writeln!(out, "No transactions available.")?;
        return Ok(());
    }

    let sections = [
        ("Income", report.total_income, &report.income_categories),
        ("Expenses", report.total_expense, &report.expense_categories),
    ];

    for (title, total, categories) in sections {
        if categories.is_empty() {
            continue;
        }
        writeln!(out, "{} ({})", title, format_amount(&config.currency, total))?;
        writeln!(out, "{:<15} {:>12} {:>6} {:>7}", "CATEGORY", "TOTAL", "COUNT", "SHARE")?;
        for summary in categories.iter() {
            writeln!(
                out,
                "{:<15} {:>12} {:>6} {:>6.1}%",
                truncate(&summary.category, 15),
                format_cents(summary.total),
                summary.count,
                summary.percentage
            )?;
        }
    }
    Ok(())
}

fn run_check_command<W: Write>(service: &TrackerService, out: &mut W) -> Result<()> {
    let report = service.check_consistency();

    writeln!(out, "Ledger entries:  {}", report.ledger_entries)?;
    writeln!(out, "Undo history:    {}", report.history_entries)?;
    writeln!(out, "Scheduled:       {}", report.scheduled_entries)?;

    if report.is_consistent() {
        writeln!(out, "Status: OK")?;
    } else {
        writeln!(out, "Status: INCONSISTENT")?;
        for id in &report.dangling {
            writeln!(out, "  history entry {} missing from ledger", id)?;
        }
        for id in &report.untracked {
            writeln!(out, "  ledger entry {} not in history", id)?;
        }
        if !report.order_matches {
            writeln!(out, "  history order differs from ledger order")?;
        }
    }
    Ok(())
}

fn run_export_command<W: Write>(
    service: &TrackerService,
    what: &str,
    format: &str,
    out: &mut W,
) -> Result<()> {
    let format = ExportFormat::from_str(format).with_context(|| {
        format!("Invalid export format '{}'. Valid formats: csv, json", format)
    })?;
    let exporter = Exporter::new(service);

    match what {
        "transactions" => {
            exporter.export_transactions(out, format)?;
        }
        "scheduled" => {
            exporter.export_scheduled(out, format)?;
        }
        "balance" => exporter.export_balance(out, format)?,
        "full" => {
            exporter.export_full_json(out)?;
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: transactions, scheduled, balance, full",
                what
            );
        }
    }
    Ok(())
}

fn describe(record: &TransactionRecord) -> String {
    format!(
        "{} | {} | {} | {}",
        record.kind.label(),
        record.category,
        format_cents(record.amount_cents),
        record.date
    )
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
