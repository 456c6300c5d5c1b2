pub(crate) mod input;
pub(crate) mod list;
pub(crate) mod parse;
pub(crate) mod persist;
pub(crate) mod validate;

use std::path::PathBuf;

use crate::contracts::types::{ImportIssue, ImportSummary};
use crate::ledger::types::{TxnStatus, TxnType};
use crate::setup::SetupContext;
use crate::state::open_connection;
use crate::{ClientError, ClientResult};

/// A fully validated row ready for insertion.
#[derive(Debug, Clone)]
pub(crate) struct CanonicalTransaction {
    pub posted_at: String,
    pub merchant: String,
    pub amount: f64,
    pub txn_type: TxnType,
    pub category: String,
    pub status: TxnStatus,
}

#[derive(Debug, Clone)]
pub(crate) struct ImportExecutionResult {
    pub dry_run: bool,
    pub import_id: Option<String>,
    pub message: String,
    pub summary: ImportSummary,
    pub issues: Vec<ImportIssue>,
    pub source_kind: String,
    pub source_ref: Option<String>,
}

/// Runs the import pipeline: resolve the source, parse it, validate every
/// row, then persist all-or-nothing. Validation failures reject the whole
/// batch so a partial ledger never skews a later score.
pub(crate) fn execute(
    setup: &SetupContext,
    path: Option<String>,
    dry_run: bool,
    stdin_override: Option<String>,
) -> ClientResult<ImportExecutionResult> {
    let resolved_source = input::resolve_source(path, stdin_override)?;
    let parsed_rows = parse::parse_source(&resolved_source.content)?;
    let validated = validate::validate_rows(parsed_rows)?;

    if dry_run {
        return Ok(ImportExecutionResult {
            dry_run: true,
            import_id: None,
            message: "Validation passed. No rows were written.".to_string(),
            summary: validated.summary,
            issues: Vec::new(),
            source_kind: resolved_source.source_kind,
            source_ref: resolved_source.source_ref,
        });
    }

    let db_path = PathBuf::from(&setup.db_path);
    let mut connection = open_connection(&db_path)?;

    let persisted = persist::persist_import(
        &mut connection,
        &db_path,
        persist::PersistInput {
            rows: &validated.rows,
            rows_read: validated.summary.rows_read,
            rows_valid: validated.summary.rows_valid,
            rows_invalid: validated.summary.rows_invalid,
            source_kind: &resolved_source.source_kind,
            source_ref: resolved_source.source_ref.as_deref(),
        },
    )?;

    Ok(ImportExecutionResult {
        dry_run: false,
        import_id: Some(persisted.import_id),
        message: "Import completed successfully.".to_string(),
        summary: ImportSummary {
            inserted: persisted.inserted,
            ..validated.summary
        },
        issues: Vec::new(),
        source_kind: resolved_source.source_kind,
        source_ref: resolved_source.source_ref,
    })
}

pub(crate) fn invalid_input_error(message: &str) -> ClientError {
    ClientError::invalid_argument_with_recovery(
        message,
        vec![
            "Provide JSON array or CSV input via path or stdin.".to_string(),
            "Run `altscore import create --help` to confirm import field requirements.".to_string(),
        ],
    )
    .with_import_help()
}
