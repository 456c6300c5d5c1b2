use std::path::Path;

use rusqlite::params;

use crate::ClientResult;
use crate::ledger::date::{format_iso_date, parse_transaction_date};
use crate::ledger::types::{LedgerFilter, Transaction, TxnStatus, TxnType};
use crate::state::{map_sqlite_error, open_readonly_connection};

pub fn load_transactions(
    db_path: &Path,
    filter: &LedgerFilter,
) -> ClientResult<Vec<Transaction>> {
    let connection = open_readonly_connection(db_path)?;
    let mut statement = connection
        .prepare(
            "SELECT
                txn_id,
                posted_at,
                merchant,
                amount,
                txn_type,
                category,
                status
             FROM internal_transactions
             WHERE (?1 IS NULL OR posted_at >= ?1)
               AND (?2 IS NULL OR posted_at <= ?2)
             ORDER BY posted_at ASC, txn_id ASC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let from_bound = filter.from.as_ref().map(format_iso_date);
    let to_bound = filter.to.as_ref().map(format_iso_date);

    let rows_iter = statement
        .query_map(params![from_bound, to_bound], |row| {
            let txn_id: String = row.get(0)?;
            let posted_at: String = row.get(1)?;
            let merchant: String = row.get(2)?;
            let amount: f64 = row.get(3)?;
            let txn_type: String = row.get(4)?;
            let category: String = row.get(5)?;
            let status: String = row.get(6)?;
            Ok((txn_id, posted_at, merchant, amount, txn_type, category, status))
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut rows: Vec<Transaction> = Vec::new();
    for row in rows_iter {
        let (txn_id, posted_at, merchant, amount, txn_type, category, status) =
            row.map_err(|error| map_sqlite_error(db_path, &error))?;

        // Rows that fail the shape contract are skipped rather than failing the
        // whole snapshot; the CHECK constraints make these unreachable for rows
        // written through the import path.
        let Some(parsed_date) = parse_transaction_date(&posted_at) else {
            continue;
        };
        let Some(parsed_type) = TxnType::parse(&txn_type) else {
            continue;
        };
        let parsed_status = TxnStatus::parse(&status).unwrap_or(TxnStatus::Cleared);

        rows.push(Transaction {
            txn_id,
            posted_at: parsed_date,
            merchant: merchant.trim().to_string(),
            amount,
            txn_type: parsed_type,
            category: category.trim().to_string(),
            status: parsed_status,
        });
    }

    Ok(rows)
}
