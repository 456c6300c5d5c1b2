use serde::Deserialize;

use crate::explain::provider::AttemptError;
use crate::scoring::aggregate::Grade;

pub const EXPECTED_SCORE_TYPE: &str = "Alternative Credit Score";

/// Model output contract. The model also echoes a score and grade; both are
/// validated for plausibility but the locally computed values stay
/// authoritative, so only the narrative fields survive into the payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModelOutput {
    credit_score: f64,
    risk_grade: String,
    score_breakdown: String,
    recommendations: String,
    score_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationPayload {
    pub score_breakdown: String,
    pub recommendations: String,
    pub score_type: String,
}

pub fn parse_and_validate(text: &str) -> Result<ExplanationPayload, AttemptError> {
    let raw: RawModelOutput =
        serde_json::from_str(text).map_err(|error| AttemptError::Parse(error.to_string()))?;

    if !raw.credit_score.is_finite() || !(0.0..=1000.0).contains(&raw.credit_score) {
        return Err(AttemptError::Validation(format!(
            "creditScore {} is outside the 0..=1000 range",
            raw.credit_score
        )));
    }

    let grade_token = raw.risk_grade.trim();
    if Grade::parse(grade_token).is_none() {
        return Err(AttemptError::Validation(format!(
            "riskGrade `{grade_token}` is not a recognized grade"
        )));
    }

    if raw.score_breakdown.trim().is_empty() {
        return Err(AttemptError::Validation(
            "scoreBreakdown is empty".to_string(),
        ));
    }
    if raw.recommendations.trim().is_empty() {
        return Err(AttemptError::Validation(
            "recommendations is empty".to_string(),
        ));
    }

    if raw.score_type != EXPECTED_SCORE_TYPE {
        return Err(AttemptError::Validation(format!(
            "scoreType `{}` does not match `{EXPECTED_SCORE_TYPE}`",
            raw.score_type
        )));
    }

    Ok(ExplanationPayload {
        score_breakdown: raw.score_breakdown.trim().to_string(),
        recommendations: raw.recommendations.trim().to_string(),
        score_type: raw.score_type,
    })
}
