use std::fs;
use std::path::{Path, PathBuf};

use altscore_client::commands::import;
use altscore_client::commands::import::ImportRunOptions;
use altscore_client::contracts::envelope::failure_from_error;
use rusqlite::Connection;
use serde_json::Value;
use tempfile::tempdir;

fn write_file(path: &Path, body: &str) {
    let result = fs::write(path, body);
    assert!(result.is_ok());
}

fn temp_home() -> std::io::Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempdir()?;
    let home = dir.path().join("ledger-home");
    Ok((dir, home))
}

fn run_import(
    home: &Path,
    path: Option<&Path>,
    dry_run: bool,
    stdin_override: Option<&str>,
) -> altscore_client::ClientResult<altscore_client::SuccessEnvelope> {
    run_import_with_raw_path(
        home,
        path.map(|value| value.display().to_string()),
        dry_run,
        stdin_override,
    )
}

fn run_import_with_raw_path(
    home: &Path,
    path: Option<String>,
    dry_run: bool,
    stdin_override: Option<&str>,
) -> altscore_client::ClientResult<altscore_client::SuccessEnvelope> {
    import::run_with_options(ImportRunOptions {
        path,
        dry_run,
        home_override: Some(home),
        stdin_override: stdin_override.map(std::string::ToString::to_string),
    })
}

fn query_count(db_path: &Path, sql: &str) -> i64 {
    let connection = Connection::open(db_path);
    assert!(connection.is_ok());
    if let Ok(conn) = connection {
        let value = conn.query_row(sql, [], |row| row.get::<_, i64>(0));
        assert!(value.is_ok());
        if let Ok(count) = value {
            return count;
        }
    }
    0
}

fn query_optional_string(db_path: &Path, sql: &str) -> Option<String> {
    let connection = Connection::open(db_path).ok()?;
    connection
        .query_row(sql, [], |row| row.get::<_, String>(0))
        .ok()
}

const VALID_JSON_ROWS: &str = r#"[
  {"posted_at":"2026-01-05","merchant":"City Power & Light","amount":-84.50,"txn_type":"expense","category":"Utilities"},
  {"posted_at":"2026-01-31","merchant":"Acme Consulting","amount":2500.00,"txn_type":"income","category":"Freelance","status":"cleared"}
]"#;

#[test]
fn file_json_import_success_writes_rows() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let source_path = home.join("transactions.json");
        let create_home = fs::create_dir_all(&home);
        assert!(create_home.is_ok());
        write_file(&source_path, VALID_JSON_ROWS);

        let result = run_import(&home, Some(&source_path), false, None);
        assert!(result.is_ok());
        if let Ok(success) = result {
            let payload = serde_json::to_value(success);
            assert!(payload.is_ok());
            if let Ok(value) = payload {
                assert_eq!(value["ok"], Value::Bool(true));
                assert_eq!(value["command"], Value::String("import create".to_string()));
                assert!(value["data"]["import_id"].is_string());
                assert_eq!(value["data"]["summary"]["rows_read"], Value::from(2));
                assert_eq!(value["data"]["summary"]["rows_valid"], Value::from(2));
                assert_eq!(value["data"]["summary"]["rows_invalid"], Value::from(0));
                assert_eq!(value["data"]["summary"]["inserted"], Value::from(2));
                assert_eq!(
                    value["data"]["data_range"]["earliest"],
                    Value::String("2026-01-05".to_string())
                );
                assert_eq!(
                    value["data"]["data_range"]["latest"],
                    Value::String("2026-01-31".to_string())
                );
            }
        }

        let db_path = home.join("ledger.db");
        let txn_count = query_count(&db_path, "SELECT COUNT(*) FROM internal_transactions");
        let import_count = query_count(&db_path, "SELECT COUNT(*) FROM internal_import_runs");
        assert_eq!(txn_count, 2);
        assert_eq!(import_count, 1);
    }
}

#[test]
fn dry_run_does_not_write_import_or_transactions() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let source_path = home.join("transactions.csv");
        let create_home = fs::create_dir_all(&home);
        assert!(create_home.is_ok());
        write_file(
            &source_path,
            "posted_at,merchant,amount,txn_type,category,status\n2026-01-03,Corner Cafe,-9.99,expense,Dining,cleared\n",
        );

        let result = run_import(&home, Some(&source_path), true, None);
        assert!(result.is_ok());
        if let Ok(success) = result {
            let payload = serde_json::to_value(success);
            assert!(payload.is_ok());
            if let Ok(value) = payload {
                assert_eq!(value["data"]["dry_run"], Value::Bool(true));
                assert!(value["data"].get("import_id").is_none());
                assert_eq!(value["data"]["summary"]["rows_valid"], Value::from(1));
                assert_eq!(value["data"]["summary"]["inserted"], Value::from(0));
            }
        }

        let db_path = home.join("ledger.db");
        let txn_count = query_count(&db_path, "SELECT COUNT(*) FROM internal_transactions");
        let import_count = query_count(&db_path, "SELECT COUNT(*) FROM internal_import_runs");
        assert_eq!(txn_count, 0);
        assert_eq!(import_count, 0);
    }
}

#[test]
fn status_defaults_to_cleared_when_omitted() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let source_path = home.join("no-status.json");
        let create_home = fs::create_dir_all(&home);
        assert!(create_home.is_ok());
        write_file(
            &source_path,
            r#"[
  {"posted_at":"2026-02-01","merchant":"DEFAULT-STATUS","amount":-5.00,"txn_type":"expense","category":"Dining"}
]"#,
        );

        let result = run_import(&home, Some(&source_path), false, None);
        assert!(result.is_ok());

        let db_path = home.join("ledger.db");
        let status = query_optional_string(
            &db_path,
            "SELECT status FROM internal_transactions WHERE merchant = 'DEFAULT-STATUS' LIMIT 1",
        );
        assert_eq!(status, Some("cleared".to_string()));
    }
}

#[test]
fn stdin_dash_alias_uses_stdin_source() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let create_home = fs::create_dir_all(&home);
        assert!(create_home.is_ok());

        let stdin_body = r#"[
  {"posted_at":"2026-03-01","merchant":"STDIN-ROW","amount":-4.50,"txn_type":"expense","category":"Dining"}
]"#;

        let result = run_import_with_raw_path(&home, Some("-".to_string()), false, Some(stdin_body));
        assert!(result.is_ok());

        let db_path = home.join("ledger.db");
        let source_kind = query_optional_string(
            &db_path,
            "SELECT source_kind FROM internal_import_runs LIMIT 1",
        );
        assert_eq!(source_kind, Some("stdin".to_string()));
        let source_ref = query_optional_string(
            &db_path,
            "SELECT source_ref FROM internal_import_runs LIMIT 1",
        );
        assert!(source_ref.is_none());
    }
}

#[test]
fn no_input_fails_with_invalid_argument() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let result = run_import(&home, None, true, None);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_argument");
        }
    }
}

#[test]
fn csv_header_mismatch_returns_import_schema_mismatch_with_data() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let source_path = home.join("transactions.csv");
        let create_home = fs::create_dir_all(&home);
        assert!(create_home.is_ok());
        write_file(
            &source_path,
            "date,payee,value,kind\n2026-01-01,Test,-1.00,expense\n",
        );

        let result = run_import(&home, Some(&source_path), true, None);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "import_schema_mismatch");
            let envelope = failure_from_error(&error);
            let as_json = serde_json::to_value(envelope);
            assert!(as_json.is_ok());
            if let Ok(value) = as_json {
                assert!(value.get("data").is_none());
                assert!(value["error"]["data"]["expected_headers"].is_array());
                assert!(value["error"]["data"]["actual_headers"].is_array());
                assert!(
                    value["error"]["data"]["required_headers"]
                        .as_array()
                        .map(|headers| headers
                            .iter()
                            .any(|header| header == &Value::String("posted_at".to_string())))
                        .unwrap_or(false)
                );
            }
        }
    }
}

#[test]
fn row_validation_failures_are_all_or_nothing() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let source_path = home.join("invalid.json");
        let create_home = fs::create_dir_all(&home);
        assert!(create_home.is_ok());
        write_file(
            &source_path,
            r#"[
  {"posted_at":"01/12/26","merchant":"Bad Row","amount":"forty two","txn_type":"transfer","category":"Misc"},
  {"posted_at":"2026-01-06","merchant":"Valid Row","amount":-9.10,"txn_type":"expense","category":"Dining"}
]"#,
        );

        let result = run_import(&home, Some(&source_path), false, None);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "import_validation_failed");
            let envelope = failure_from_error(&error);
            let as_json = serde_json::to_value(envelope);
            assert!(as_json.is_ok());
            if let Ok(value) = as_json {
                assert_eq!(
                    value["error"]["data"]["summary"]["rows_read"],
                    Value::from(2)
                );
                assert_eq!(
                    value["error"]["data"]["summary"]["rows_invalid"],
                    Value::from(1)
                );
                assert!(value["error"]["data"]["issues"].is_array());
                assert!(value["error"]["data"]["issues"][0]["row"].is_i64());
                assert!(value["error"]["data"]["issues"][0]["field"].is_string());
                assert!(value["error"]["data"]["issues"][0]["code"].is_string());
            }
        }

        let db_path = home.join("ledger.db");
        let txn_count = query_count(&db_path, "SELECT COUNT(*) FROM internal_transactions");
        let import_count = query_count(&db_path, "SELECT COUNT(*) FROM internal_import_runs");
        assert_eq!(txn_count, 0);
        assert_eq!(import_count, 0);
    }
}

#[test]
fn zero_amount_fails_validation() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let source_path = home.join("zero-amount.csv");
        let create_home = fs::create_dir_all(&home);
        assert!(create_home.is_ok());
        write_file(
            &source_path,
            "posted_at,merchant,amount,txn_type,category\n2026-01-10,ZERO,0.00,expense,Misc\n",
        );

        let result = run_import(&home, Some(&source_path), true, None);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "import_validation_failed");
            let envelope = failure_from_error(&error);
            let as_json = serde_json::to_value(envelope);
            assert!(as_json.is_ok());
            if let Ok(value) = as_json {
                assert_eq!(
                    value["error"]["data"]["issues"][0]["field"],
                    Value::String("amount".to_string())
                );
                assert_eq!(
                    value["error"]["data"]["issues"][0]["code"],
                    Value::String("zero_amount".to_string())
                );
            }
        }
    }
}

#[test]
fn ndjson_source_is_rejected_as_unsupported_format() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let source_path = home.join("transactions.ndjson");
        let create_home = fs::create_dir_all(&home);
        assert!(create_home.is_ok());
        write_file(
            &source_path,
            "{\"posted_at\":\"2026-01-01\",\"merchant\":\"a\",\"amount\":1,\"txn_type\":\"income\",\"category\":\"x\"}\n{\"posted_at\":\"2026-01-02\",\"merchant\":\"b\",\"amount\":2,\"txn_type\":\"income\",\"category\":\"y\"}\n",
        );

        let result = run_import(&home, Some(&source_path), true, None);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_argument");
            assert!(!error.recovery_steps.is_empty());
        }
    }
}

#[test]
fn import_list_returns_committed_runs_newest_first() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let first_path = home.join("first.json");
        let second_path = home.join("second.json");
        let create_home = fs::create_dir_all(&home);
        assert!(create_home.is_ok());

        write_file(
            &first_path,
            r#"[
  {"posted_at":"2026-02-01","merchant":"FIRST","amount":-10.00,"txn_type":"expense","category":"Misc"}
]"#,
        );
        write_file(
            &second_path,
            r#"[
  {"posted_at":"2026-02-02","merchant":"SECOND","amount":-20.00,"txn_type":"expense","category":"Misc"}
]"#,
        );

        let first_import = run_import(&home, Some(&first_path), false, None);
        assert!(first_import.is_ok());
        let second_import = run_import(&home, Some(&second_path), false, None);
        assert!(second_import.is_ok());

        let listed = import::list_with_options(Some(home.as_path()));
        assert!(listed.is_ok());
        if let Ok(success) = listed {
            let payload = serde_json::to_value(success);
            assert!(payload.is_ok());
            if let Ok(value) = payload {
                assert_eq!(value["command"], Value::String("import list".to_string()));
                assert!(value["data"]["rows"].is_array());
                if let Some(rows) = value["data"]["rows"].as_array() {
                    assert_eq!(rows.len(), 2);
                    for row in rows {
                        assert!(row["import_id"].is_string());
                        assert_eq!(row["status"], Value::String("committed".to_string()));
                        assert!(row["created_at"].is_string());
                        assert!(row["rows_read"].is_i64());
                        assert!(row["inserted"].is_i64());
                        assert_eq!(row["source_kind"], Value::String("file".to_string()));
                    }
                }
            }
        }
    }
}
