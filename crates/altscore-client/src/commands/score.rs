use std::path::{Path, PathBuf};

use crate::ClientResult;
use crate::commands::common::data_range_hint;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    FactorScores, NarrativeData, NarrativeErrorData, ScoreData,
};
use crate::explain::chain::{ExplainError, NarrativeOutcome, run_chain};
use crate::explain::prompt::build_prompt;
use crate::explain::provider::{GenerativeBackend, HttpBackend};
use crate::ledger::date::{build_filter, format_iso_date};
use crate::ledger::query::load_transactions;
use crate::ledger::types::Transaction;
use crate::report::{ReportStore, SqliteReportStore, assemble};
use crate::scoring::aggregate::{ScoreResult, aggregate};
use crate::scoring::factors::{FactorAnalysis, analyze};
use crate::setup::{SetupContext, ensure_initialized, ensure_initialized_at};

#[derive(Default)]
pub struct ScoreRunOptions<'a> {
    pub from: Option<String>,
    pub to: Option<String>,
    pub no_narrative: bool,
    pub home_override: Option<&'a Path>,
    pub backend_override: Option<&'a dyn GenerativeBackend>,
}

pub fn run(from: Option<&str>, to: Option<&str>, no_narrative: bool) -> ClientResult<SuccessEnvelope> {
    run_with_options(ScoreRunOptions {
        from: from.map(std::string::ToString::to_string),
        to: to.map(std::string::ToString::to_string),
        no_narrative,
        home_override: None,
        backend_override: None,
    })
}

/// Full scoring pipeline: load the filtered snapshot, derive factors,
/// aggregate the score, generate the narrative, persist the report.
///
/// Narrative and persistence failures degrade into data fields instead of
/// failing the command; the score itself is always computed locally.
#[doc(hidden)]
pub fn run_with_options(options: ScoreRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let filter = build_filter(options.from.as_deref(), options.to.as_deref(), "score")?;
    let db_path = PathBuf::from(&setup.db_path);
    let transactions = load_transactions(&db_path, &filter)?;

    let analysis = analyze(&transactions);
    let result = aggregate(&analysis.factors);

    let (narrative, narrative_error) = if options.no_narrative {
        (None, None)
    } else {
        match generate_narrative(&options, &result, &analysis, &transactions) {
            Ok(outcome) => (
                Some(NarrativeData {
                    score_breakdown: outcome.payload.score_breakdown,
                    recommendations: outcome.payload.recommendations,
                    score_type: outcome.payload.score_type,
                    model: outcome.model,
                    attempts: outcome.attempts,
                }),
                None,
            ),
            Err(error) => (
                None,
                Some(NarrativeErrorData {
                    code: error.code().to_string(),
                    message: error.to_string(),
                    attempts: error.attempts(),
                }),
            ),
        }
    };

    let report = assemble(&result, &analysis, &transactions);
    let store = SqliteReportStore::new(&db_path);
    let (report_id, report_error) = match store.save(&report) {
        Ok(saved_id) => (Some(saved_id), None),
        Err(error) => (None, Some(error.message)),
    };

    let data = ScoreData {
        score: result.score,
        grade: result.grade.as_str().to_string(),
        factors: factor_scores(&analysis),
        bill_signal: analysis.bill_signal.as_str().to_string(),
        transaction_count: transactions.len() as i64,
        period_start: report.period_start.clone(),
        period_end: report.period_end.clone(),
        narrative,
        narrative_error,
        report_id,
        report_error,
        from: filter.from.as_ref().map(format_iso_date),
        to: filter.to.as_ref().map(format_iso_date),
        data_range_hint: data_range_hint(&setup.data_range),
    };

    success("score", data)
}

fn generate_narrative(
    options: &ScoreRunOptions<'_>,
    result: &ScoreResult,
    analysis: &FactorAnalysis,
    transactions: &[Transaction],
) -> Result<NarrativeOutcome, ExplainError> {
    let prompt = build_prompt(
        result,
        &analysis.factors,
        analysis.bill_signal,
        transactions.len(),
    );

    if let Some(backend) = options.backend_override {
        return run_chain(backend, &prompt);
    }

    let Some(backend) = HttpBackend::from_env() else {
        return Err(ExplainError::NotConfigured);
    };
    run_chain(&backend, &prompt)
}

pub(crate) fn factor_scores(analysis: &FactorAnalysis) -> FactorScores {
    FactorScores {
        bill_payment_history: analysis.factors.bill_payment_history,
        income_consistency: analysis.factors.income_consistency,
        expense_management: analysis.factors.expense_management,
        financial_growth: analysis.factors.financial_growth,
        transaction_diversity: analysis.factors.transaction_diversity,
    }
}

fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    if let Some(home) = home_override {
        return ensure_initialized_at(home);
    }
    ensure_initialized()
}
