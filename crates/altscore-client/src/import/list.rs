use std::path::Path;

use crate::ClientResult;
use crate::contracts::types::ImportListItem;
use crate::state::{map_sqlite_error, open_readonly_connection};

pub(crate) fn load_import_runs(db_path: &Path) -> ClientResult<Vec<ImportListItem>> {
    let connection = open_readonly_connection(db_path)?;
    let mut statement = connection
        .prepare(
            "SELECT
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
             FROM internal_import_runs
             ORDER BY created_at DESC, import_id DESC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows_iter = statement
        .query_map([], |row| {
            Ok(ImportListItem {
                import_id: row.get(0)?,
                status: row.get(1)?,
                created_at: row.get(2)?,
                committed_at: row.get(3)?,
                rows_read: row.get(4)?,
                rows_valid: row.get(5)?,
                rows_invalid: row.get(6)?,
                inserted: row.get(7)?,
                source_kind: row.get(8)?,
                source_ref: row.get(9)?,
            })
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut rows: Vec<ImportListItem> = Vec::new();
    for row in rows_iter {
        rows.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }

    Ok(rows)
}
