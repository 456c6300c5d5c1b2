/// Deterministic scoring policy identifier.
///
/// Persisted with every credit report so future weight or threshold changes
/// remain auditable and easy to reason about in diffs and support sessions.
pub const SCORING_POLICY_VERSION: &str = "scoring/v1";

/// Factor weights for the v1 alternative credit score.
///
/// Notes:
/// - Weights are frozen for v1 and sum to exactly 1.0.
/// - Bill payment history dominates because on-time recurring payments are
///   the strongest repayment signal available without a credit file.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub bill_payment_history: f64,
    pub income_consistency: f64,
    pub expense_management: f64,
    pub financial_growth: f64,
    pub transaction_diversity: f64,
}

impl ScoringWeights {
    pub fn weighted_sum(
        self,
        bill_payment_history: f64,
        income_consistency: f64,
        expense_management: f64,
        financial_growth: f64,
        transaction_diversity: f64,
    ) -> f64 {
        (self.bill_payment_history * bill_payment_history)
            + (self.income_consistency * income_consistency)
            + (self.expense_management * expense_management)
            + (self.financial_growth * financial_growth)
            + (self.transaction_diversity * transaction_diversity)
    }
}

pub const SCORING_WEIGHTS_V1: ScoringWeights = ScoringWeights {
    bill_payment_history: 0.30,
    income_consistency: 0.25,
    expense_management: 0.20,
    financial_growth: 0.15,
    transaction_diversity: 0.10,
};

/// Recurring-bill category vocabulary. A transaction counts as a bill when
/// its lowercased category contains any of these tokens.
pub const BILL_CATEGORY_VOCABULARY: [&str; 7] = [
    "utilities",
    "rent",
    "phone",
    "internet",
    "subscription",
    "bill",
    "payment",
];

/// Neutral factor value used when a signal carries no information at all.
pub const NEUTRAL_FACTOR: f64 = 50.0;

pub fn clamp_factor(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::{SCORING_WEIGHTS_V1, clamp_factor};

    #[test]
    fn policy_weights_sum_to_one() {
        let sum = SCORING_WEIGHTS_V1.bill_payment_history
            + SCORING_WEIGHTS_V1.income_consistency
            + SCORING_WEIGHTS_V1.expense_management
            + SCORING_WEIGHTS_V1.financial_growth
            + SCORING_WEIGHTS_V1.transaction_diversity;
        assert!((sum - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn weighted_sum_of_bounded_factors_stays_bounded() {
        let max = SCORING_WEIGHTS_V1.weighted_sum(100.0, 100.0, 100.0, 100.0, 100.0);
        let min = SCORING_WEIGHTS_V1.weighted_sum(0.0, 0.0, 0.0, 0.0, 0.0);
        assert!((max - 100.0).abs() < 1e-9);
        assert!(min.abs() < 1e-9);
    }

    #[test]
    fn clamp_factor_pins_out_of_range_values() {
        assert_eq!(clamp_factor(-4.0), 0.0);
        assert_eq!(clamp_factor(104.0), 100.0);
        assert_eq!(clamp_factor(61.5), 61.5);
    }
}
