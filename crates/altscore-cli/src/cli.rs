use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

/// Extended help shown after `altscore import create --help`.
/// Contains workflow guidance, schema, and next-step instructions.
pub const IMPORT_CREATE_AFTER_HELP: &str = "\
How import works:
  Altscore does not parse raw bank PDFs or provider-specific CSVs.
  You parse each statement into a normalized file, then import it.

  Accepted formats:
    JSON: one top-level array of transaction objects
    CSV:  one header row with schema field names

  <path> is a local file path.
  To read stdin explicitly, use `-` as the path.
  Example: cat rows.json | altscore import create --dry-run -
  One import call takes one file. For multiple files, combine
  first or run multiple import commands.

What to do next:
  1. Parse your source into normalized JSON or schema-matching CSV.
  2. Run `altscore import create --dry-run <path>` and fix any reported issues.
  3. Run `altscore import create <path>` once dry-run passes.
  4. Run `altscore score` to compute a credit score from the ledger.

Import schema:
  JSON example (one top-level array):
  [
    {
      \"posted_at\": \"2026-01-15\",
      \"merchant\": \"City Power & Light\",
      \"amount\": -84.50,
      \"txn_type\": \"expense\",
      \"category\": \"Utilities\",
      \"status\": \"cleared\"
    }
  ]

  CSV example (header + rows):
  posted_at,merchant,amount,txn_type,category,status
  2026-01-15,City Power & Light,-84.50,expense,Utilities,cleared
  2026-01-31,Acme Consulting,2500.00,income,Freelance,cleared

Field rules (very explicit):
  posted_at (required):
    Date only, exactly `YYYY-MM-DD`.
    Example: `2026-01-15`

  merchant (required):
    The counterparty name. For income rows this is the payer.

  amount (required):
    A non-zero number, not text.
    Expenses are conventionally negative and income positive,
    but scoring uses `txn_type` plus magnitudes, so either sign works.

  txn_type (required):
    Exactly `income` or `expense`.

  category (required):
    A category label. Bill-like categories (Utilities, Rent, Phone,
    Internet, Subscription) drive the bill payment history factor, so
    keep category labels consistent across imports.

  status (optional):
    Exactly `cleared` or `pending`. Defaults to `cleared`.
";

#[derive(Debug, Parser)]
#[command(
    name = "altscore",
    version,
    about = "alternative credit scoring from transaction history",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute the credit score, generate its narrative, and save a report
    Score {
        /// Start date filter (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        from: Option<IsoDate>,
        /// End date filter (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        to: Option<IsoDate>,
        /// Skip narrative generation (no model calls)
        #[arg(long)]
        no_narrative: bool,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Preview the five factor scores and aggregate grade without saving a report
    Factors {
        /// Start date filter (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        from: Option<IsoDate>,
        /// End date filter (YYYY-MM-DD)
        #[arg(long, value_parser = parse_iso_date)]
        to: Option<IsoDate>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Manage transaction imports
    #[command(arg_required_else_help = true)]
    Import {
        #[command(subcommand)]
        command: ImportCommand,
    },
    /// Inspect saved credit reports
    #[command(arg_required_else_help = true)]
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
    /// Database discovery commands
    #[command(arg_required_else_help = true)]
    Db {
        #[command(subcommand)]
        command: DbCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum DbCommand {
    /// Show your local database path, connection URI, and public view contracts
    Schema {
        #[command(subcommand)]
        command: Option<SchemaCommand>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum SchemaCommand {
    /// Show column details for a specific public view
    View {
        /// Name of the view to inspect (e.g. v1_transactions)
        view_name: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ImportCommand {
    /// Import normalized transaction data into your local altscore ledger
    #[command(after_long_help = IMPORT_CREATE_AFTER_HELP)]
    Create {
        /// Validate import data without writing to the ledger
        #[arg(long)]
        dry_run: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
        /// Path to a normalized JSON or CSV file (use `-` for stdin)
        path: Option<String>,
    },
    /// List all past imports with their status and row counts
    List {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ReportCommand {
    /// List saved credit reports, newest first
    List {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
