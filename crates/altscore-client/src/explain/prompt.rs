use crate::explain::payload::EXPECTED_SCORE_TYPE;
use crate::scoring::aggregate::ScoreResult;
use crate::scoring::factors::{BillSignal, CreditFactors};
use crate::scoring::policy::SCORING_WEIGHTS_V1;

/// Builds the narrative prompt for one scored snapshot.
///
/// The score and grade are computed locally and handed to the model as fixed
/// inputs; the model's job is explanation and advice, never arithmetic.
pub fn build_prompt(
    result: &ScoreResult,
    factors: &CreditFactors,
    bill_signal: BillSignal,
    transaction_count: usize,
) -> String {
    let weights = SCORING_WEIGHTS_V1;
    let bill_signal_note = match bill_signal {
        BillSignal::BillCategories => {
            "The bill payment factor is based on recognized bill categories."
        }
        BillSignal::ExpenseRegularity => {
            "No bill categories were found; the bill payment factor is based on general expense regularity instead."
        }
        BillSignal::NoExpenseHistory => {
            "No expense history was available; the bill payment factor is a default."
        }
    };

    format!(
        "You are a credit analyst for an alternative credit scoring system that evaluates \
people without traditional credit files, using their transaction history.\n\
\n\
The score below was already computed deterministically. Do not recompute or adjust it. \
Your task is to explain it and to recommend concrete next steps.\n\
\n\
Computed result:\n\
- creditScore: {score} (scale 0-1000)\n\
- riskGrade: {grade}\n\
- transactions analyzed: {transaction_count}\n\
\n\
Factor scores (0-100) and their weights:\n\
- Bill Payment History: {bill:.0} (weight {bill_weight:.0}%)\n\
- Income Consistency: {income:.0} (weight {income_weight:.0}%)\n\
- Expense Management: {expense:.0} (weight {expense_weight:.0}%)\n\
- Financial Growth: {growth:.0} (weight {growth_weight:.0}%)\n\
- Transaction Diversity: {diversity:.0} (weight {diversity_weight:.0}%)\n\
\n\
{bill_signal_note}\n\
\n\
Respond with a single JSON object and nothing else, using exactly these keys:\n\
{{\n\
  \"creditScore\": {score},\n\
  \"riskGrade\": \"{grade}\",\n\
  \"scoreBreakdown\": \"<2-4 sentences explaining how the factor scores produced this result>\",\n\
  \"recommendations\": \"<2-4 sentences of specific, actionable advice to improve the weakest factors>\",\n\
  \"scoreType\": \"{score_type}\"\n\
}}",
        score = result.score,
        grade = result.grade.as_str(),
        transaction_count = transaction_count,
        bill = factors.bill_payment_history,
        bill_weight = weights.bill_payment_history * 100.0,
        income = factors.income_consistency,
        income_weight = weights.income_consistency * 100.0,
        expense = factors.expense_management,
        expense_weight = weights.expense_management * 100.0,
        growth = factors.financial_growth,
        growth_weight = weights.financial_growth * 100.0,
        diversity = factors.transaction_diversity,
        diversity_weight = weights.transaction_diversity * 100.0,
        bill_signal_note = bill_signal_note,
        score_type = EXPECTED_SCORE_TYPE,
    )
}
