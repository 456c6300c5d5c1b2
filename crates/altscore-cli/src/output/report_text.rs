use std::io;

use serde_json::Value;

use super::format::{self, Align, Column};

pub fn render_report_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("report list output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No credit reports found yet.",
            "",
            "Generate your first report:",
            "  1. altscore import create <path>",
            "  2. altscore score",
        ]
        .join("\n"));
    }

    let count_label = if rows.len() == 1 {
        "1 report found.".to_string()
    } else {
        format!("{} reports found.", rows.len())
    };

    let columns = [
        Column {
            name: "Report ID",
            align: Align::Left,
        },
        Column {
            name: "Generated",
            align: Align::Left,
        },
        Column {
            name: "Score",
            align: Align::Right,
        },
        Column {
            name: "Grade",
            align: Align::Left,
        },
        Column {
            name: "Txns",
            align: Align::Right,
        },
        Column {
            name: "Period",
            align: Align::Left,
        },
    ];

    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                get_str(row, "report_id"),
                get_str(row, "generated_at"),
                row.get("score")
                    .and_then(Value::as_i64)
                    .unwrap_or(0)
                    .to_string(),
                get_str(row, "grade"),
                row.get("transaction_count")
                    .and_then(Value::as_i64)
                    .unwrap_or(0)
                    .to_string(),
                format_period(row),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![count_label, String::new(), "Reports:".to_string()];
    lines.extend(format::render_table(&columns, &table_rows));

    Ok(lines.join("\n"))
}

fn format_period(row: &Value) -> String {
    let start = row
        .get("period_start")
        .and_then(Value::as_str)
        .unwrap_or("");
    let end = row.get("period_end").and_then(Value::as_str).unwrap_or("");

    if start.is_empty() && end.is_empty() {
        return "(empty ledger)".to_string();
    }
    format!("{start} to {end}")
}

fn get_str(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}
