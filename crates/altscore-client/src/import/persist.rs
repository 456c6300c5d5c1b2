use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, TransactionBehavior, params};
use ulid::Ulid;

use crate::ClientResult;
use crate::import::CanonicalTransaction;
use crate::state::map_sqlite_error;

#[derive(Debug, Clone)]
pub(crate) struct PersistResult {
    pub(crate) import_id: String,
    pub(crate) inserted: i64,
}

pub(crate) struct PersistInput<'a> {
    pub(crate) rows: &'a [CanonicalTransaction],
    pub(crate) rows_read: i64,
    pub(crate) rows_valid: i64,
    pub(crate) rows_invalid: i64,
    pub(crate) source_kind: &'a str,
    pub(crate) source_ref: Option<&'a str>,
}

/// Writes the batch and its run record in one immediate transaction. Either
/// every row lands or none do.
pub(crate) fn persist_import(
    connection: &mut Connection,
    db_path: &Path,
    input: PersistInput<'_>,
) -> ClientResult<PersistResult> {
    let import_id = format!("imp_{}", Ulid::new());
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut inserted = 0_i64;
    for row in input.rows {
        insert_canonical_row(&transaction, db_path, &import_id, row)?;
        inserted += 1;
    }

    transaction
        .execute(
            "INSERT INTO internal_import_runs (
                import_id,
                status,
                created_at,
                committed_at,
                rows_read,
                rows_valid,
                rows_invalid,
                inserted,
                source_kind,
                source_ref
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                &import_id,
                "committed",
                &timestamp,
                &timestamp,
                input.rows_read,
                input.rows_valid,
                input.rows_invalid,
                inserted,
                input.source_kind,
                input.source_ref
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    transaction
        .commit()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    Ok(PersistResult {
        import_id,
        inserted,
    })
}

fn insert_canonical_row(
    transaction: &rusqlite::Transaction<'_>,
    db_path: &Path,
    import_id: &str,
    row: &CanonicalTransaction,
) -> ClientResult<()> {
    let txn_id = format!("txn_{}", Ulid::new());
    transaction
        .execute(
            "INSERT INTO internal_transactions (
                txn_id,
                import_id,
                posted_at,
                merchant,
                amount,
                txn_type,
                category,
                status
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &txn_id,
                import_id,
                &row.posted_at,
                &row.merchant,
                row.amount,
                row.txn_type.as_str(),
                &row.category,
                row.status.as_str()
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(())
}
