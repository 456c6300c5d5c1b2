use crate::scoring::factors::CreditFactors;
use crate::scoring::policy::SCORING_WEIGHTS_V1;

/// Risk grade bands over the 0..=1000 score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    A,
    BPlus,
    B,
    C,
    D,
}

impl Grade {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "A" => Some(Self::A),
            "B+" => Some(Self::BPlus),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            _ => None,
        }
    }

    pub fn from_score(score: i64) -> Self {
        match score {
            score if score >= 800 => Self::A,
            score if score >= 700 => Self::BPlus,
            score if score >= 600 => Self::B,
            score if score >= 500 => Self::C,
            _ => Self::D,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: i64,
    pub grade: Grade,
}

/// Collapses the factor vector into the final score and grade.
///
/// Factors live on a 0..=100 scale; the weighted sum is multiplied by 10 to
/// land on the 0..=1000 score range, rounded, then clamped. With frozen
/// weights summing to 1.0 and bounded factors the clamp never fires, but the
/// contract is enforced here rather than assumed.
pub fn aggregate(factors: &CreditFactors) -> ScoreResult {
    let weighted = SCORING_WEIGHTS_V1.weighted_sum(
        factors.bill_payment_history,
        factors.income_consistency,
        factors.expense_management,
        factors.financial_growth,
        factors.transaction_diversity,
    );

    let score = ((weighted * 10.0).round() as i64).clamp(0, 1000);
    ScoreResult {
        score,
        grade: Grade::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use crate::scoring::factors::CreditFactors;

    use super::{Grade, ScoreResult, aggregate};

    #[test]
    fn worked_example_lands_in_the_b_band() {
        let factors = CreditFactors {
            bill_payment_history: 85.0,
            income_consistency: 70.0,
            expense_management: 60.0,
            financial_growth: 55.0,
            transaction_diversity: 65.0,
        };
        // 0.30*85 + 0.25*70 + 0.20*60 + 0.15*55 + 0.10*65 = 69.75 -> 698
        assert_eq!(
            aggregate(&factors),
            ScoreResult {
                score: 698,
                grade: Grade::B,
            }
        );
    }

    #[test]
    fn neutral_factors_score_exactly_five_hundred() {
        let result = aggregate(&CreditFactors::neutral());
        assert_eq!(result.score, 500);
        assert_eq!(result.grade, Grade::C);
    }

    #[test]
    fn grade_band_boundaries_are_inclusive_at_the_bottom() {
        assert_eq!(Grade::from_score(1000), Grade::A);
        assert_eq!(Grade::from_score(800), Grade::A);
        assert_eq!(Grade::from_score(799), Grade::BPlus);
        assert_eq!(Grade::from_score(700), Grade::BPlus);
        assert_eq!(Grade::from_score(699), Grade::B);
        assert_eq!(Grade::from_score(600), Grade::B);
        assert_eq!(Grade::from_score(599), Grade::C);
        assert_eq!(Grade::from_score(500), Grade::C);
        assert_eq!(Grade::from_score(499), Grade::D);
        assert_eq!(Grade::from_score(0), Grade::D);
    }

    #[test]
    fn grade_tokens_round_trip() {
        for grade in [Grade::A, Grade::BPlus, Grade::B, Grade::C, Grade::D] {
            assert_eq!(Grade::parse(grade.as_str()), Some(grade));
        }
        assert_eq!(Grade::parse("F"), None);
    }

    #[test]
    fn aggregate_saturates_at_the_range_edges() {
        let maxed = CreditFactors {
            bill_payment_history: 100.0,
            income_consistency: 100.0,
            expense_management: 100.0,
            financial_growth: 100.0,
            transaction_diversity: 100.0,
        };
        assert_eq!(aggregate(&maxed).score, 1000);

        let floored = CreditFactors {
            bill_payment_history: 0.0,
            income_consistency: 0.0,
            expense_management: 0.0,
            financial_growth: 0.0,
            transaction_diversity: 0.0,
        };
        let result = aggregate(&floored);
        assert_eq!(result.score, 0);
        assert_eq!(result.grade, Grade::D);
    }
}
