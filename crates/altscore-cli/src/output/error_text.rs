use altscore_client::ClientError;
use serde_json::Value;

const MAX_ISSUE_LINES: usize = 10;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "Something went wrong, but it's easy to fix.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    lines.extend(render_header_guidance(error.data.as_ref()));
    lines.extend(render_issue_list(error.data.as_ref()));

    lines.push(String::new());
    lines.push("What to do next:".to_string());

    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

/// CSV schema mismatches carry header inventories in the error data.
/// Surfacing them inline saves a round trip to `import create --help`.
fn render_header_guidance(data: Option<&Value>) -> Vec<String> {
    let Some(data) = data else {
        return Vec::new();
    };
    let Some(required) = join_str_array(data.get("required_headers")) else {
        return Vec::new();
    };
    let optional = join_str_array(data.get("optional_headers")).unwrap_or_default();
    let actual = join_str_array(data.get("actual_headers")).unwrap_or_default();

    vec![
        String::new(),
        format!("  Required headers:  {required}"),
        format!("  Optional headers:  {optional}"),
        format!("  Your CSV headers:  {actual}"),
    ]
}

fn render_issue_list(data: Option<&Value>) -> Vec<String> {
    let issues = data
        .and_then(|value| value.get("issues"))
        .and_then(Value::as_array);
    let Some(issues) = issues else {
        return Vec::new();
    };
    if issues.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![String::new(), "Row issues:".to_string()];
    for issue in issues.iter().take(MAX_ISSUE_LINES) {
        let row = issue.get("row").and_then(Value::as_i64).unwrap_or(0);
        let field = issue
            .get("field")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let description = issue
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("invalid value");
        lines.push(format!("  Row {row}: {field}: {description}"));
    }
    if issues.len() > MAX_ISSUE_LINES {
        lines.push(format!("  ...and {} more.", issues.len() - MAX_ISSUE_LINES));
    }

    lines
}

fn join_str_array(value: Option<&Value>) -> Option<String> {
    let array = value?.as_array()?;
    let parts = array
        .iter()
        .filter_map(Value::as_str)
        .collect::<Vec<&str>>();
    Some(parts.join(", "))
}

#[cfg(test)]
mod tests {
    use altscore_client::ClientError;
    use altscore_client::contracts::types::{ImportIssue, ImportSummary};

    use super::render_error;

    #[test]
    fn renders_standard_error_layout() {
        let error = ClientError::invalid_argument_with_recovery(
            "bad input",
            vec!["run altscore --help".to_string()],
        );

        let rendered = render_error(&error);
        assert!(rendered.starts_with("Something went wrong, but it's easy to fix."));
        assert!(rendered.contains("  Error:    invalid_argument"));
        assert!(rendered.contains("  Details:  bad input"));
        assert!(rendered.contains("What to do next:"));
        assert!(rendered.contains("  1. run altscore --help"));
    }

    #[test]
    fn missing_recovery_steps_fall_back_to_retry() {
        let error = ClientError::new("ledger_locked", "database is locked", Vec::new());
        let rendered = render_error(&error);
        assert!(rendered.contains("  1. Retry the command."));
    }

    #[test]
    fn schema_mismatch_shows_header_inventories() {
        let error = ClientError::import_schema_mismatch(
            vec!["posted_at".to_string(), "merchant".to_string()],
            vec!["status".to_string()],
            vec!["date".to_string(), "payee".to_string()],
        );

        let rendered = render_error(&error);
        assert!(rendered.contains("  Required headers:  posted_at, merchant"));
        assert!(rendered.contains("  Optional headers:  status"));
        assert!(rendered.contains("  Your CSV headers:  date, payee"));
    }

    #[test]
    fn validation_failure_lists_row_issues() {
        let summary = ImportSummary {
            rows_read: 2,
            rows_valid: 1,
            rows_invalid: 1,
            inserted: 0,
        };
        let issues = vec![ImportIssue {
            row: 2,
            field: "amount".to_string(),
            code: "zero_amount".to_string(),
            description: "amount must be non-zero".to_string(),
            expected: None,
            received: Some("0".to_string()),
        }];

        let rendered = render_error(&ClientError::import_validation_failed(summary, issues));
        assert!(rendered.contains("Row issues:"));
        assert!(rendered.contains("  Row 2: amount: amount must be non-zero"));
    }
}
