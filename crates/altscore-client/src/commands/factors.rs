use std::path::{Path, PathBuf};

use crate::ClientResult;
use crate::commands::common::data_range_hint;
use crate::commands::score::factor_scores;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::FactorsData;
use crate::ledger::date::{build_filter, format_iso_date};
use crate::ledger::query::load_transactions;
use crate::scoring::aggregate::aggregate;
use crate::scoring::factors::analyze;
use crate::setup::{SetupContext, ensure_initialized, ensure_initialized_at};

#[derive(Debug, Default)]
pub struct FactorsRunOptions<'a> {
    pub from: Option<String>,
    pub to: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn run(from: Option<&str>, to: Option<&str>) -> ClientResult<SuccessEnvelope> {
    run_with_options(FactorsRunOptions {
        from: from.map(std::string::ToString::to_string),
        to: to.map(std::string::ToString::to_string),
        home_override: None,
    })
}

/// The pure pipeline: factor analysis plus the aggregate score preview.
/// No narrative call and no report save.
#[doc(hidden)]
pub fn run_with_options(options: FactorsRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let filter = build_filter(options.from.as_deref(), options.to.as_deref(), "factors")?;
    let db_path = PathBuf::from(&setup.db_path);
    let transactions = load_transactions(&db_path, &filter)?;
    let analysis = analyze(&transactions);
    let result = aggregate(&analysis.factors);

    let data = FactorsData {
        score: result.score,
        grade: result.grade.as_str().to_string(),
        factors: factor_scores(&analysis),
        bill_signal: analysis.bill_signal.as_str().to_string(),
        transaction_count: transactions.len() as i64,
        from: filter.from.as_ref().map(format_iso_date),
        to: filter.to.as_ref().map(format_iso_date),
        data_range_hint: data_range_hint(&setup.data_range),
    };

    success("factors", data)
}

fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    if let Some(home) = home_override {
        return ensure_initialized_at(home);
    }
    ensure_initialized()
}
