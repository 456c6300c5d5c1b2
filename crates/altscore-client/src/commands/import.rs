use std::path::{Path, PathBuf};

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ImportData, ImportListData};
use crate::import;
use crate::setup::{SetupContext, ensure_initialized, ensure_initialized_at};

#[derive(Debug, Default)]
pub struct ImportRunOptions<'a> {
    pub path: Option<String>,
    pub dry_run: bool,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(path: Option<&str>, dry_run: bool) -> ClientResult<SuccessEnvelope> {
    run_with_options(ImportRunOptions {
        path: path.map(std::string::ToString::to_string),
        dry_run,
        home_override: None,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ImportRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let execution = import::execute(&setup, options.path, options.dry_run, options.stdin_override)?;

    // Data range is re-read after the write so the hint reflects this import.
    let refreshed = load_setup(options.home_override)?;

    let data = ImportData {
        dry_run: execution.dry_run,
        path: execution.source_ref.clone(),
        import_id: execution.import_id,
        message: execution.message,
        summary: execution.summary,
        issues: execution.issues,
        data_range: refreshed.data_range,
    };

    success("import create", data)
}

pub fn list() -> ClientResult<SuccessEnvelope> {
    list_with_options(None)
}

#[doc(hidden)]
pub fn list_with_options(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let rows = import::list::load_import_runs(&db_path)?;
    success("import list", ImportListData { rows })
}

fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    if let Some(home) = home_override {
        return ensure_initialized_at(home);
    }
    ensure_initialized()
}
