use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use rusqlite::params;
use ulid::Ulid;

use crate::ClientResult;
use crate::error::ClientError;
use crate::ledger::date::format_iso_date;
use crate::ledger::types::Transaction;
use crate::scoring::aggregate::{Grade, ScoreResult};
use crate::scoring::factors::{BillSignal, CreditFactors, FactorAnalysis};
use crate::scoring::policy::SCORING_POLICY_VERSION;
use crate::state::{map_sqlite_error, open_connection, open_readonly_connection};

/// One persisted scoring run. Narrative text is deliberately excluded: the
/// report is the auditable deterministic record, and narratives are
/// regenerable from it.
#[derive(Debug, Clone)]
pub struct CreditReport {
    pub report_id: String,
    pub generated_at: String,
    pub score: i64,
    pub grade: Grade,
    pub factors: CreditFactors,
    pub bill_signal: BillSignal,
    pub transaction_count: i64,
    pub period_start: String,
    pub period_end: String,
    pub scoring_policy_version: String,
}

/// Builds a report from a completed scoring run. Period bounds come from the
/// actual snapshot dates rather than the requested filter, and are empty
/// strings when the snapshot is empty.
pub fn assemble(
    result: &ScoreResult,
    analysis: &FactorAnalysis,
    transactions: &[Transaction],
) -> CreditReport {
    let period_start = transactions
        .iter()
        .map(|txn| txn.posted_at)
        .min()
        .map(|date| format_iso_date(&date))
        .unwrap_or_default();
    let period_end = transactions
        .iter()
        .map(|txn| txn.posted_at)
        .max()
        .map(|date| format_iso_date(&date))
        .unwrap_or_default();

    CreditReport {
        report_id: format!("rpt_{}", Ulid::new()),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        score: result.score,
        grade: result.grade,
        factors: analysis.factors,
        bill_signal: analysis.bill_signal,
        transaction_count: transactions.len() as i64,
        period_start,
        period_end,
        scoring_policy_version: SCORING_POLICY_VERSION.to_string(),
    }
}

pub trait ReportStore {
    fn save(&self, report: &CreditReport) -> ClientResult<String>;
}

pub struct SqliteReportStore {
    db_path: PathBuf,
}

impl SqliteReportStore {
    pub fn new(db_path: &Path) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
        }
    }
}

impl ReportStore for SqliteReportStore {
    fn save(&self, report: &CreditReport) -> ClientResult<String> {
        let connection = open_connection(&self.db_path)
            .map_err(|error| ClientError::report_save_failed(&error.message))?;

        connection
            .execute(
                "INSERT INTO internal_credit_reports (
                    report_id,
                    generated_at,
                    score,
                    grade,
                    bill_payment_history,
                    income_consistency,
                    expense_management,
                    financial_growth,
                    transaction_diversity,
                    bill_signal,
                    transaction_count,
                    period_start,
                    period_end,
                    scoring_policy_version
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    report.report_id,
                    report.generated_at,
                    report.score,
                    report.grade.as_str(),
                    report.factors.bill_payment_history,
                    report.factors.income_consistency,
                    report.factors.expense_management,
                    report.factors.financial_growth,
                    report.factors.transaction_diversity,
                    report.bill_signal.as_str(),
                    report.transaction_count,
                    report.period_start,
                    report.period_end,
                    report.scoring_policy_version,
                ],
            )
            .map_err(|error| {
                let mapped = map_sqlite_error(&self.db_path, &error);
                ClientError::report_save_failed(&mapped.message)
            })?;

        Ok(report.report_id.clone())
    }
}

#[derive(Debug, Clone)]
pub struct StoredReport {
    pub report_id: String,
    pub generated_at: String,
    pub score: i64,
    pub grade: String,
    pub bill_signal: String,
    pub transaction_count: i64,
    pub period_start: String,
    pub period_end: String,
    pub scoring_policy_version: String,
}

pub fn load_reports(db_path: &Path) -> ClientResult<Vec<StoredReport>> {
    let connection = open_readonly_connection(db_path)?;
    let mut statement = connection
        .prepare(
            "SELECT
                report_id,
                generated_at,
                score,
                grade,
                bill_signal,
                transaction_count,
                period_start,
                period_end,
                scoring_policy_version
             FROM internal_credit_reports
             ORDER BY generated_at DESC, report_id DESC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map([], |row| {
            Ok(StoredReport {
                report_id: row.get(0)?,
                generated_at: row.get(1)?,
                score: row.get(2)?,
                grade: row.get(3)?,
                bill_signal: row.get(4)?,
                transaction_count: row.get(5)?,
                period_start: row.get(6)?,
                period_end: row.get(7)?,
                scoring_policy_version: row.get(8)?,
            })
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut rows: Vec<StoredReport> = Vec::new();
    for row in rows_iter {
        rows.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }

    Ok(rows)
}
