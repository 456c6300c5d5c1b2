use std::collections::HashSet;

use crate::contracts::types::{ImportIssue, ImportSummary};
use crate::import::CanonicalTransaction;
use crate::import::parse::ParsedRow;
use crate::ledger::date::parse_transaction_date;
use crate::ledger::types::{TxnStatus, TxnType};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) struct ValidatedRows {
    pub(crate) rows: Vec<CanonicalTransaction>,
    pub(crate) summary: ImportSummary,
}

/// Validates every parsed row and rejects the batch if any row fails. The
/// error carries the full issue list so one dry-run round trip surfaces all
/// fixes at once.
pub(crate) fn validate_rows(parsed_rows: Vec<ParsedRow>) -> ClientResult<ValidatedRows> {
    let total_rows = parsed_rows.len();
    let mut rows = Vec::new();
    let mut issues = Vec::new();

    for raw in parsed_rows {
        let mut row_issues = Vec::new();

        let posted_at = validate_posted_at(raw.row, raw.posted_at, &mut row_issues);
        let merchant = validate_required_string(
            raw.row,
            "merchant",
            raw.merchant,
            &mut row_issues,
            "merchant must be present and non-empty.",
        );
        let amount = validate_amount(raw.row, raw.amount, &mut row_issues);
        let txn_type = validate_txn_type(raw.row, raw.txn_type, &mut row_issues);
        let category = validate_required_string(
            raw.row,
            "category",
            raw.category,
            &mut row_issues,
            "category must be present and non-empty.",
        );
        let status = validate_status(raw.row, raw.status, &mut row_issues);

        if row_issues.is_empty() {
            rows.push(CanonicalTransaction {
                posted_at: posted_at.unwrap_or_default(),
                merchant: merchant.unwrap_or_default(),
                amount: amount.unwrap_or_default(),
                txn_type: txn_type.unwrap_or(TxnType::Expense),
                category: category.unwrap_or_default(),
                status,
            });
        } else {
            issues.extend(row_issues);
        }
    }

    let summary = ImportSummary {
        rows_read: total_rows as i64,
        rows_valid: rows.len() as i64,
        rows_invalid: issues
            .iter()
            .map(|issue| issue.row)
            .collect::<HashSet<i64>>()
            .len() as i64,
        inserted: 0,
    };

    if !issues.is_empty() {
        return Err(ClientError::import_validation_failed(summary, issues));
    }

    Ok(ValidatedRows { rows, summary })
}

fn validate_required_string(
    row: i64,
    field: &str,
    value: Option<String>,
    issues: &mut Vec<ImportIssue>,
    description: &str,
) -> Option<String> {
    let normalized = normalize_optional(value);
    if normalized.is_none() {
        issues.push(ImportIssue {
            row,
            field: field.to_string(),
            code: "missing_required_field".to_string(),
            description: description.to_string(),
            expected: Some("non-empty string".to_string()),
            received: Some(String::new()),
        });
    }
    normalized
}

fn validate_posted_at(
    row: i64,
    value: Option<String>,
    issues: &mut Vec<ImportIssue>,
) -> Option<String> {
    let normalized = normalize_optional(value);
    let Some(candidate) = normalized else {
        issues.push(ImportIssue {
            row,
            field: "posted_at".to_string(),
            code: "missing_required_field".to_string(),
            description: "posted_at must be present and non-empty.".to_string(),
            expected: Some("YYYY-MM-DD".to_string()),
            received: Some(String::new()),
        });
        return None;
    };

    if parse_transaction_date(&candidate).is_none() {
        issues.push(ImportIssue {
            row,
            field: "posted_at".to_string(),
            code: "invalid_date".to_string(),
            description: format!("posted_at must be a real YYYY-MM-DD date; got \"{candidate}\""),
            expected: Some("YYYY-MM-DD".to_string()),
            received: Some(candidate),
        });
        return None;
    }

    Some(candidate)
}

fn validate_amount(row: i64, value: Option<String>, issues: &mut Vec<ImportIssue>) -> Option<f64> {
    let normalized = normalize_optional(value);
    let Some(candidate) = normalized else {
        issues.push(ImportIssue {
            row,
            field: "amount".to_string(),
            code: "missing_required_field".to_string(),
            description: "amount must be present and non-empty.".to_string(),
            expected: Some("non-zero number (e.g. -42.15)".to_string()),
            received: Some(String::new()),
        });
        return None;
    };

    match candidate.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount != 0.0 => Some(amount),
        Ok(amount) if amount == 0.0 => {
            issues.push(ImportIssue {
                row,
                field: "amount".to_string(),
                code: "zero_amount".to_string(),
                description: "amount must be non-zero.".to_string(),
                expected: Some("non-zero number (e.g. -42.15)".to_string()),
                received: Some(candidate),
            });
            None
        }
        _ => {
            issues.push(ImportIssue {
                row,
                field: "amount".to_string(),
                code: "invalid_number".to_string(),
                description: format!("amount must be a finite number; got \"{candidate}\""),
                expected: Some("non-zero number (e.g. -42.15)".to_string()),
                received: Some(candidate),
            });
            None
        }
    }
}

fn validate_txn_type(
    row: i64,
    value: Option<String>,
    issues: &mut Vec<ImportIssue>,
) -> Option<TxnType> {
    let normalized = normalize_optional(value);
    let Some(candidate) = normalized else {
        issues.push(ImportIssue {
            row,
            field: "txn_type".to_string(),
            code: "missing_required_field".to_string(),
            description: "txn_type must be present and non-empty.".to_string(),
            expected: Some("income | expense".to_string()),
            received: Some(String::new()),
        });
        return None;
    };

    let parsed = TxnType::parse(&candidate.to_lowercase());
    if parsed.is_none() {
        issues.push(ImportIssue {
            row,
            field: "txn_type".to_string(),
            code: "invalid_txn_type".to_string(),
            description: format!("txn_type must be income or expense; got \"{candidate}\""),
            expected: Some("income | expense".to_string()),
            received: Some(candidate),
        });
    }
    parsed
}

fn validate_status(row: i64, value: Option<String>, issues: &mut Vec<ImportIssue>) -> TxnStatus {
    let Some(candidate) = normalize_optional(value) else {
        return TxnStatus::Cleared;
    };

    match TxnStatus::parse(&candidate.to_lowercase()) {
        Some(status) => status,
        None => {
            issues.push(ImportIssue {
                row,
                field: "status".to_string(),
                code: "invalid_status".to_string(),
                description: format!("status must be cleared or pending; got \"{candidate}\""),
                expected: Some("cleared | pending".to_string()),
                received: Some(candidate),
            });
            TxnStatus::Cleared
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}
