use std::collections::{BTreeMap, BTreeSet};

use crate::ledger::types::Transaction;
use crate::scoring::policy::{BILL_CATEGORY_VOCABULARY, NEUTRAL_FACTOR, clamp_factor};

/// The five behavioral factors, each clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditFactors {
    pub bill_payment_history: f64,
    pub income_consistency: f64,
    pub expense_management: f64,
    pub financial_growth: f64,
    pub transaction_diversity: f64,
}

impl CreditFactors {
    pub const fn neutral() -> Self {
        Self {
            bill_payment_history: NEUTRAL_FACTOR,
            income_consistency: NEUTRAL_FACTOR,
            expense_management: NEUTRAL_FACTOR,
            financial_growth: NEUTRAL_FACTOR,
            transaction_diversity: NEUTRAL_FACTOR,
        }
    }
}

/// Which signal produced the bill payment factor. The factor silently falls
/// back to generic expense regularity when no bill category matches, so the
/// substitution is surfaced instead of hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillSignal {
    BillCategories,
    ExpenseRegularity,
    NoExpenseHistory,
}

impl BillSignal {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BillCategories => "bill_categories",
            Self::ExpenseRegularity => "expense_regularity",
            Self::NoExpenseHistory => "no_expense_history",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bill_categories" => Some(Self::BillCategories),
            "expense_regularity" => Some(Self::ExpenseRegularity),
            "no_expense_history" => Some(Self::NoExpenseHistory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FactorAnalysis {
    pub factors: CreditFactors,
    pub bill_signal: BillSignal,
}

/// Derives the five factors from a transaction snapshot.
///
/// An empty snapshot carries no signal and no penalty: every factor is the
/// neutral 50. All sub-scores degrade to documented fallbacks instead of
/// erroring, so this function is total over arbitrary input.
pub fn analyze(transactions: &[Transaction]) -> FactorAnalysis {
    if transactions.is_empty() {
        return FactorAnalysis {
            factors: CreditFactors::neutral(),
            bill_signal: BillSignal::NoExpenseHistory,
        };
    }

    let (bill_payment_history, bill_signal) = bill_payment_history(transactions);

    FactorAnalysis {
        factors: CreditFactors {
            bill_payment_history,
            income_consistency: income_consistency(transactions),
            expense_management: expense_management(transactions),
            financial_growth: financial_growth(transactions),
            transaction_diversity: transaction_diversity(transactions),
        },
        bill_signal,
    }
}

/// Bill payment history, weighted heaviest in aggregation.
///
/// Scores the count of distinct calendar months containing recognized bill
/// payments. When no category matches the bill vocabulary the factor falls
/// back to generic expense regularity with a lower ceiling (75).
fn bill_payment_history(transactions: &[Transaction]) -> (f64, BillSignal) {
    let bill_rows: Vec<&Transaction> = transactions
        .iter()
        .filter(|txn| txn.is_expense() && matches_bill_vocabulary(&txn.category))
        .collect();

    if bill_rows.is_empty() {
        let expense_rows: Vec<&Transaction> =
            transactions.iter().filter(|txn| txn.is_expense()).collect();
        if expense_rows.is_empty() {
            return (60.0, BillSignal::NoExpenseHistory);
        }

        let months_with_expenses = distinct_months(expense_rows.iter().copied());
        let score = match months_with_expenses {
            months if months >= 3 => 75.0,
            months if months >= 2 => 65.0,
            _ => 60.0,
        };
        return (clamp_factor(score), BillSignal::ExpenseRegularity);
    }

    let months_with_bills = distinct_months(bill_rows.iter().copied());
    let score = match months_with_bills {
        months if months >= 6 => 95.0,
        months if months >= 4 => 85.0,
        months if months >= 3 => 75.0,
        months if months >= 2 => 65.0,
        _ => 55.0,
    };

    (clamp_factor(score), BillSignal::BillCategories)
}

/// Income consistency via coefficient of variation of per-month income
/// totals, plus a capped longevity bonus of +3 per income month.
fn income_consistency(transactions: &[Transaction]) -> f64 {
    let monthly_totals = monthly_income_totals(transactions);

    if monthly_totals.is_empty() {
        return 30.0;
    }
    if monthly_totals.len() == 1 {
        return 70.0;
    }

    let count = monthly_totals.len() as f64;
    let mean = monthly_totals.iter().sum::<f64>() / count;
    let variance = monthly_totals
        .iter()
        .map(|total| (total - mean).powi(2))
        .sum::<f64>()
        / count;
    let std_dev = variance.sqrt();
    let cv = if mean > 0.0 { std_dev / mean } else { 1.0 };

    let base = if cv <= 0.1 {
        100.0
    } else if cv <= 0.3 {
        90.0 - (cv * 100.0)
    } else if cv <= 0.5 {
        80.0 - (cv * 80.0)
    } else if cv <= 1.0 {
        60.0 - (cv * 40.0)
    } else {
        (40.0 - (cv * 20.0)).max(30.0)
    };

    let month_bonus = (count * 3.0).min(20.0);
    clamp_factor(base + month_bonus).round()
}

/// Expense management: total expense over total income, mapped piecewise so
/// high savers score near 100 and overspenders bottom out near 20.
fn expense_management(transactions: &[Transaction]) -> f64 {
    let income: f64 = transactions
        .iter()
        .filter(|txn| txn.is_income())
        .map(Transaction::abs_amount)
        .sum();
    let expenses: f64 = transactions
        .iter()
        .filter(|txn| txn.is_expense())
        .map(Transaction::abs_amount)
        .sum();

    if income == 0.0 {
        return 40.0;
    }

    let ratio = expenses / income;
    let score = if ratio <= 0.1 {
        100.0
    } else if ratio <= 0.3 {
        95.0 - (ratio * 50.0)
    } else if ratio <= 0.5 {
        85.0 - (ratio * 40.0)
    } else if ratio <= 0.7 {
        75.0 - (ratio * 30.0)
    } else if ratio <= 0.9 {
        60.0 - ((ratio - 0.7) * 100.0)
    } else {
        (40.0 - ((ratio - 0.9) * 100.0)).max(20.0)
    };

    clamp_factor(score).round()
}

/// Financial growth: first vs. last income month. Needs at least two income
/// months to measure a trend; anything less is the neutral 50.
fn financial_growth(transactions: &[Transaction]) -> f64 {
    let income_rows: Vec<&Transaction> =
        transactions.iter().filter(|txn| txn.is_income()).collect();
    if income_rows.len() < 2 {
        return NEUTRAL_FACTOR;
    }

    let by_month = group_by_month(income_rows.iter().copied());
    if by_month.len() < 2 {
        return NEUTRAL_FACTOR;
    }

    // BTreeMap iteration is already in calendar order.
    let first_month_income: f64 = by_month
        .values()
        .next()
        .map(|rows| rows.iter().map(|txn| txn.amount).sum())
        .unwrap_or(0.0);
    let last_month_income: f64 = by_month
        .values()
        .next_back()
        .map(|rows| rows.iter().map(|txn| txn.amount).sum())
        .unwrap_or(0.0);

    if first_month_income == 0.0 {
        return NEUTRAL_FACTOR;
    }

    let growth_rate = (last_month_income - first_month_income) / first_month_income;
    let score = if growth_rate > 0.1 {
        60.0 + (growth_rate * 200.0)
    } else {
        50.0 + (growth_rate * 100.0)
    };

    clamp_factor(score).round()
}

/// Transaction diversity: distinct income categories and merchants, scored
/// with tiered bonuses above a base of 50 and a floor of 30.
fn transaction_diversity(transactions: &[Transaction]) -> f64 {
    let income_rows: Vec<&Transaction> =
        transactions.iter().filter(|txn| txn.is_income()).collect();
    if income_rows.is_empty() {
        return 30.0;
    }

    let categories: BTreeSet<&str> = income_rows
        .iter()
        .map(|txn| txn.category.as_str())
        .filter(|value| !value.is_empty())
        .collect();
    let merchants: BTreeSet<&str> = income_rows
        .iter()
        .map(|txn| txn.merchant.as_str())
        .filter(|value| !value.is_empty())
        .collect();

    let mut score: f64 = 50.0;

    score += match categories.len() {
        count if count >= 5 => 25.0,
        count if count >= 3 => 20.0,
        count if count >= 2 => 15.0,
        count if count >= 1 => 10.0,
        _ => 0.0,
    };

    score += match merchants.len() {
        count if count >= 10 => 25.0,
        count if count >= 5 => 20.0,
        count if count >= 3 => 15.0,
        count if count >= 2 => 10.0,
        count if count >= 1 => 5.0,
        _ => 0.0,
    };

    score.clamp(30.0, 100.0).round()
}

fn matches_bill_vocabulary(category: &str) -> bool {
    let lowered = category.to_lowercase();
    BILL_CATEGORY_VOCABULARY
        .iter()
        .any(|token| lowered.contains(token))
}

fn monthly_income_totals(transactions: &[Transaction]) -> Vec<f64> {
    let income_rows = transactions.iter().filter(|txn| txn.is_income());
    group_by_month(income_rows)
        .values()
        .map(|rows| rows.iter().map(|txn| txn.abs_amount()).sum())
        .collect()
}

fn group_by_month<'a>(
    rows: impl Iterator<Item = &'a Transaction>,
) -> BTreeMap<String, Vec<&'a Transaction>> {
    let mut groups: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for txn in rows {
        groups.entry(txn.month_key()).or_default().push(txn);
    }
    groups
}

fn distinct_months<'a>(rows: impl Iterator<Item = &'a Transaction>) -> usize {
    rows.map(Transaction::month_key)
        .collect::<BTreeSet<String>>()
        .len()
}
