use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Error as SqliteError, OpenFlags, ffi::ErrorCode};

use crate::{ClientError, ClientResult};

const LEDGER_DB_FILE: &str = "ledger.db";
const BUSY_TIMEOUT: Duration = Duration::from_millis(250);

pub fn resolve_ledger_home(home_override: Option<&Path>) -> ClientResult<PathBuf> {
    if let Some(path) = home_override {
        return absolute(path);
    }

    if let Some(env_home) = std::env::var_os("ALTSCORE_HOME") {
        return absolute(Path::new(&env_home));
    }

    match home::home_dir() {
        Some(home_path) => absolute(&home_path.join(".altscore")),
        None => Err(ClientError::ledger_init_failed(
            Path::new("."),
            "Could not resolve a home directory for ledger initialization.",
        )),
    }
}

pub fn ensure_ledger_directory(path: &Path) -> ClientResult<()> {
    fs::create_dir_all(path).map_err(|error| map_io_error(path, &error))?;
    set_private_permissions_best_effort(path);
    Ok(())
}

pub fn ledger_db_path(home: &Path) -> PathBuf {
    home.join(LEDGER_DB_FILE)
}

/// Read-write connection. Used by setup, import commits, and report saves.
pub fn open_connection(db_path: &Path) -> ClientResult<Connection> {
    let connection =
        Connection::open(db_path).map_err(|error| map_sqlite_error(db_path, &error))?;
    with_busy_timeout(connection, db_path)
}

/// Read-only connection. Used by the score, factors, and list loaders,
/// which never write after setup has run.
pub fn open_readonly_connection(db_path: &Path) -> ClientResult<Connection> {
    let connection = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
    )
    .map_err(|error| map_sqlite_error(db_path, &error))?;
    with_busy_timeout(connection, db_path)
}

fn with_busy_timeout(connection: Connection, db_path: &Path) -> ClientResult<Connection> {
    connection
        .busy_timeout(BUSY_TIMEOUT)
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    Ok(connection)
}

pub fn map_io_error(path: &Path, error: &std::io::Error) -> ClientError {
    match error.kind() {
        std::io::ErrorKind::PermissionDenied => {
            ClientError::ledger_init_permission_denied(path, &error.to_string())
        }
        _ => ClientError::ledger_init_failed(path, &error.to_string()),
    }
}

pub fn map_sqlite_error(path: &Path, error: &SqliteError) -> ClientError {
    match error.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
            ClientError::ledger_locked(path)
        }
        Some(ErrorCode::NotADatabase) => ClientError::ledger_corrupt(path),
        Some(ErrorCode::CannotOpen | ErrorCode::ReadOnly) => {
            ClientError::ledger_init_permission_denied(path, &error.to_string())
        }
        _ => ClientError::ledger_init_failed(path, &error.to_string()),
    }
}

fn absolute(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| ClientError::ledger_init_failed(path, &error.to_string()))
}

#[cfg(unix)]
fn set_private_permissions_best_effort(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o700));
}

#[cfg(not(unix))]
fn set_private_permissions_best_effort(_path: &Path) {}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{ledger_db_path, map_io_error, resolve_ledger_home};

    #[test]
    fn explicit_home_override_wins_and_stays_absolute() {
        let override_home = std::env::temp_dir().join("altscore-state-test");
        let resolved = resolve_ledger_home(Some(&override_home));
        assert!(resolved.is_ok());
        if let Ok(path) = resolved {
            assert_eq!(path, override_home);
            assert!(path.is_absolute());
        }
    }

    #[test]
    fn db_path_lives_inside_the_ledger_home() {
        let path = ledger_db_path(Path::new("/tmp/altscore-home"));
        assert!(path.ends_with("ledger.db"));
        assert!(path.starts_with("/tmp/altscore-home"));
    }

    #[test]
    fn permission_denied_io_errors_map_to_dedicated_code() {
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no access");
        let mapped = map_io_error(Path::new("/tmp/altscore-home"), &denied);
        assert_eq!(mapped.code, "ledger_init_permission_denied");

        let other = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let mapped_other = map_io_error(Path::new("/tmp/altscore-home"), &other);
        assert_eq!(mapped_other.code, "ledger_init_failed");
    }
}
