use std::io;

use serde_json::Value;

use super::format;

const FACTOR_LABELS: [(&str, &str); 5] = [
    ("bill_payment_history", "Bill payment history (30%):"),
    ("income_consistency", "Income consistency (25%):"),
    ("expense_management", "Expense management (20%):"),
    ("financial_growth", "Financial growth (15%):"),
    ("transaction_diversity", "Transaction diversity (10%):"),
];

pub fn render_score(data: &Value) -> io::Result<String> {
    let score = data
        .get("score")
        .and_then(Value::as_i64)
        .ok_or_else(|| io::Error::other("score output requires score"))?;
    let grade = get_string(data, "grade").unwrap_or("unknown");
    let transaction_count = data
        .get("transaction_count")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if transaction_count == 0 {
        let mut lines = vec![
            format!("Credit score: {score} (grade {grade})"),
            String::new(),
            "No transactions matched, so every factor sits at its neutral baseline.".to_string(),
            String::new(),
            "What to do next:".to_string(),
            "  1. Run `altscore import create --dry-run <path>` with your transactions."
                .to_string(),
            "  2. Run `altscore import create <path>` once validation passes.".to_string(),
            "  3. Rerun `altscore score`.".to_string(),
        ];
        lines.extend(render_persistence_lines(data));
        return Ok(lines.join("\n"));
    }

    let mut lines = vec![format!("Credit score: {score} (grade {grade})"), String::new()];
    lines.extend(render_scope_lines(data, transaction_count));

    lines.push(String::new());
    lines.push("Factor scores:".to_string());
    lines.extend(render_factor_rows(data)?);

    if let Some(signal) = bill_signal_note(data) {
        lines.push(String::new());
        lines.push(signal);
    }

    lines.extend(render_narrative_section(data));
    lines.extend(render_persistence_lines(data));

    Ok(lines.join("\n"))
}

pub fn render_factors(data: &Value) -> io::Result<String> {
    let score = data
        .get("score")
        .and_then(Value::as_i64)
        .ok_or_else(|| io::Error::other("factors output requires score"))?;
    let grade = get_string(data, "grade").unwrap_or("unknown");
    let transaction_count = data
        .get("transaction_count")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if transaction_count == 0 {
        return Ok([
            format!("Score preview: {score} (grade {grade})"),
            String::new(),
            "No transactions matched, so every factor sits at its neutral baseline.".to_string(),
            String::new(),
            "What to do next:".to_string(),
            "  1. Run `altscore import create --dry-run <path>` with your transactions."
                .to_string(),
            "  2. Run `altscore import create <path>` once validation passes.".to_string(),
            "  3. Rerun `altscore factors`.".to_string(),
        ]
        .join("\n"));
    }

    let mut lines = vec![
        format!("Score preview: {score} (grade {grade})"),
        String::new(),
    ];
    lines.extend(render_scope_lines(data, transaction_count));
    lines.push(String::new());
    lines.push("Factor scores:".to_string());
    lines.extend(render_factor_rows(data)?);

    if let Some(signal) = bill_signal_note(data) {
        lines.push(String::new());
        lines.push(signal);
    }

    lines.push(String::new());
    lines.push("Run `altscore score` to aggregate these into a saved credit report.".to_string());

    Ok(lines.join("\n"))
}

fn render_factor_rows(data: &Value) -> io::Result<Vec<String>> {
    let factors = data
        .get("factors")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("score output requires factors"))?;

    let entries = FACTOR_LABELS
        .iter()
        .map(|(key, label)| {
            let value = factors.get(*key).and_then(Value::as_f64).unwrap_or(0.0);
            (*label, format!("{value:.1}"))
        })
        .collect::<Vec<(&str, String)>>();

    Ok(format::key_value_rows(&entries, 2))
}

fn render_scope_lines(data: &Value, transaction_count: i64) -> Vec<String> {
    let from = get_string(data, "from");
    let to = get_string(data, "to");

    let scope = match (from, to) {
        (Some(from), Some(to)) => {
            format!("Analyzed {transaction_count} transactions from {from} to {to}.")
        }
        (Some(from), None) => format!("Analyzed {transaction_count} transactions from {from}."),
        (None, Some(to)) => format!("Analyzed {transaction_count} transactions through {to}."),
        (None, None) => format!("Analyzed {transaction_count} transactions."),
    };

    let mut lines = vec![scope];
    if let Some(range) = data.get("data_range_hint") {
        let earliest = range.get("earliest").and_then(Value::as_str);
        let latest = range.get("latest").and_then(Value::as_str);
        if let (Some(earliest), Some(latest)) = (earliest, latest) {
            lines.push(format!("Ledger covers {earliest} to {latest}."));
        }
    }

    lines
}

fn bill_signal_note(data: &Value) -> Option<String> {
    match get_string(data, "bill_signal") {
        Some("expense_regularity") => Some(
            "Note: no bill-like categories were found, so bill payment history was estimated from expense regularity."
                .to_string(),
        ),
        Some("no_expense_history") => Some(
            "Note: no expense history was found, so bill payment history uses a conservative default."
                .to_string(),
        ),
        _ => None,
    }
}

fn render_narrative_section(data: &Value) -> Vec<String> {
    if let Some(narrative) = data.get("narrative").filter(|value| !value.is_null()) {
        let model = get_string(narrative, "model").unwrap_or("unknown");
        let attempts = narrative.get("attempts").and_then(Value::as_i64).unwrap_or(0);
        let breakdown = get_string(narrative, "score_breakdown").unwrap_or("");
        let recommendations = get_string(narrative, "recommendations").unwrap_or("");

        let mut lines = vec![
            String::new(),
            "Score breakdown:".to_string(),
            format!("  {breakdown}"),
            String::new(),
            "Recommendations:".to_string(),
            format!("  {recommendations}"),
            String::new(),
            format!("Narrative generated by {model} (attempt {attempts})."),
        ];
        lines.push(
            "The numeric score above is computed locally; the narrative only explains it."
                .to_string(),
        );
        return lines;
    }

    if let Some(error) = data.get("narrative_error").filter(|value| !value.is_null()) {
        let code = get_string(error, "code").unwrap_or("unknown");
        let message = get_string(error, "message").unwrap_or("narrative unavailable");
        let mut lines = vec![
            String::new(),
            format!("Narrative unavailable ({code}): {message}"),
        ];
        if code == "narrative_not_configured" {
            lines.push(
                "Set GOOGLE_GENAI_API_KEY and rerun, or use --no-narrative to silence this."
                    .to_string(),
            );
        } else {
            lines.push("The score and report above are complete without it.".to_string());
        }
        return lines;
    }

    Vec::new()
}

fn render_persistence_lines(data: &Value) -> Vec<String> {
    if let Some(report_id) = get_string(data, "report_id") {
        return vec![
            String::new(),
            format!("Saved credit report {report_id}."),
            "Run `altscore report list` to see all saved reports.".to_string(),
        ];
    }

    if let Some(report_error) = get_string(data, "report_error") {
        return vec![
            String::new(),
            format!("Report was not saved: {report_error}"),
        ];
    }

    Vec::new()
}

fn get_string<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{render_factors, render_score};

    fn score_payload() -> Value {
        json!({
            "score": 698,
            "grade": "B",
            "factors": {
                "bill_payment_history": 85.0,
                "income_consistency": 70.0,
                "expense_management": 60.0,
                "financial_growth": 55.0,
                "transaction_diversity": 65.0
            },
            "bill_signal": "bill_categories",
            "transaction_count": 42,
            "period_start": "2026-01-02",
            "period_end": "2026-06-28",
            "report_id": "rpt_01HZX4",
            "from": null,
            "to": null,
            "data_range_hint": { "earliest": "2026-01-02", "latest": "2026-06-28" }
        })
    }

    #[test]
    fn score_text_shows_headline_factors_and_report_id() {
        let rendered = render_score(&score_payload());
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Credit score: 698 (grade B)"));
            assert!(text.contains("Analyzed 42 transactions."));
            assert!(text.contains("Bill payment history (30%):"));
            assert!(text.contains("85.0"));
            assert!(text.contains("Saved credit report rpt_01HZX4."));
        }
    }

    #[test]
    fn score_text_renders_narrative_when_present() {
        let mut payload = score_payload();
        payload["narrative"] = json!({
            "score_breakdown": "Your score reflects steady income.",
            "recommendations": "Keep paying bills on time.",
            "score_type": "Alternative Credit Score",
            "model": "gemini-2.5-flash",
            "attempts": 2
        });

        let rendered = render_score(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Score breakdown:"));
            assert!(text.contains("Your score reflects steady income."));
            assert!(text.contains("Recommendations:"));
            assert!(text.contains("Narrative generated by gemini-2.5-flash (attempt 2)."));
        }
    }

    #[test]
    fn score_text_explains_missing_key() {
        let mut payload = score_payload();
        payload["narrative_error"] = json!({
            "code": "narrative_not_configured",
            "message": "GOOGLE_GENAI_API_KEY is not set.",
            "attempts": 0
        });

        let rendered = render_score(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Narrative unavailable (narrative_not_configured)"));
            assert!(text.contains("Set GOOGLE_GENAI_API_KEY"));
        }
    }

    #[test]
    fn score_text_reports_save_failure() {
        let mut payload = score_payload();
        payload["report_id"] = Value::Null;
        payload["report_error"] = json!("database is locked");

        let rendered = render_score(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Report was not saved: database is locked"));
        }
    }

    #[test]
    fn empty_ledger_score_guides_first_import() {
        let payload = json!({
            "score": 500,
            "grade": "C",
            "factors": {
                "bill_payment_history": 50.0,
                "income_consistency": 50.0,
                "expense_management": 50.0,
                "financial_growth": 50.0,
                "transaction_diversity": 50.0
            },
            "bill_signal": "no_expense_history",
            "transaction_count": 0,
            "period_start": "",
            "period_end": "",
            "from": null,
            "to": null,
            "data_range_hint": { "earliest": null, "latest": null }
        });

        let rendered = render_score(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Credit score: 500 (grade C)"));
            assert!(text.contains("neutral baseline"));
            assert!(text.contains("altscore import create"));
        }
    }

    #[test]
    fn factors_text_notes_fallback_signal() {
        let payload = json!({
            "score": 612,
            "grade": "B",
            "factors": {
                "bill_payment_history": 65.0,
                "income_consistency": 70.0,
                "expense_management": 60.0,
                "financial_growth": 55.0,
                "transaction_diversity": 45.0
            },
            "bill_signal": "expense_regularity",
            "transaction_count": 9,
            "from": "2026-01-01",
            "to": "2026-06-30",
            "data_range_hint": { "earliest": "2026-01-02", "latest": "2026-06-28" }
        });

        let rendered = render_factors(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Score preview: 612 (grade B)"));
            assert!(text.contains("Analyzed 9 transactions from 2026-01-01 to 2026-06-30."));
            assert!(text.contains("estimated from expense regularity"));
            assert!(text.contains("Run `altscore score`"));
        }
    }
}
