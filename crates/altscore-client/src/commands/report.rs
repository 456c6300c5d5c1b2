use std::path::{Path, PathBuf};

use crate::ClientResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ReportListData, ReportListItem};
use crate::report::load_reports;
use crate::setup::{SetupContext, ensure_initialized, ensure_initialized_at};

pub fn list() -> ClientResult<SuccessEnvelope> {
    list_with_options(None)
}

#[doc(hidden)]
pub fn list_with_options(home_override: Option<&Path>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(home_override)?;
    let db_path = PathBuf::from(&setup.db_path);

    let rows = load_reports(&db_path)?
        .into_iter()
        .map(|stored| ReportListItem {
            report_id: stored.report_id,
            generated_at: stored.generated_at,
            score: stored.score,
            grade: stored.grade,
            bill_signal: stored.bill_signal,
            transaction_count: stored.transaction_count,
            period_start: stored.period_start,
            period_end: stored.period_end,
            scoring_policy_version: stored.scoring_policy_version,
        })
        .collect::<Vec<ReportListItem>>();

    success("report list", ReportListData { rows })
}

fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    if let Some(home) = home_override {
        return ensure_initialized_at(home);
    }
    ensure_initialized()
}
