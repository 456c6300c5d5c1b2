use std::io;

use serde_json::Value;

use super::format::{self, Align, Column};

pub fn render_import_run(data: &Value) -> io::Result<String> {
    let dry_run = data
        .get("dry_run")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let summary = data
        .get("summary")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("import output requires summary"))?;

    let mut lines = Vec::new();
    if dry_run {
        lines.push("Dry-run validation completed successfully.".to_string());
    } else {
        lines.push("Import completed successfully.".to_string());
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());

    let mut entries = Vec::new();
    if !dry_run {
        let import_id = data
            .get("import_id")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        entries.push(("Import ID:", import_id.to_string()));
    }

    entries.push(("Rows read:", get_i64(summary, "rows_read").to_string()));
    entries.push(("Rows valid:", get_i64(summary, "rows_valid").to_string()));
    entries.push((
        "Rows invalid:",
        get_i64(summary, "rows_invalid").to_string(),
    ));
    entries.push(("Inserted:", get_i64(summary, "inserted").to_string()));

    lines.extend(format::key_value_rows(&entries, 2));

    let range_lines = render_data_range(data);
    if !range_lines.is_empty() {
        lines.push(String::new());
        lines.extend(range_lines);
    }

    if dry_run {
        lines.push(String::new());
        lines.push("No rows were written because this was a dry run.".to_string());
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if dry_run {
        lines.push("  1. Rerun without --dry-run to write these rows.".to_string());
        lines.push("  2. Run `altscore score` once the data is committed.".to_string());
    } else {
        lines.push("  1. Run `altscore factors` to preview the factor scores.".to_string());
        lines.push("  2. Run `altscore score` to compute and save a credit report.".to_string());
    }

    Ok(lines.join("\n"))
}

pub fn render_import_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("import list output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No imports found yet.",
            "",
            "Run your first import:",
            "  1. altscore import create --help",
            "  2. altscore import create --dry-run <path>",
            "  3. altscore import create <path>",
        ]
        .join("\n"));
    }

    let count_label = if rows.len() == 1 {
        "1 import found.".to_string()
    } else {
        format!("{} imports found.", rows.len())
    };

    let columns = [
        Column {
            name: "Import ID",
            align: Align::Left,
        },
        Column {
            name: "Status",
            align: Align::Left,
        },
        Column {
            name: "Created",
            align: Align::Left,
        },
        Column {
            name: "Rows Read",
            align: Align::Right,
        },
        Column {
            name: "Inserted",
            align: Align::Right,
        },
    ];

    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                get_str(row, "import_id"),
                get_str(row, "status"),
                get_str(row, "created_at"),
                row.get("rows_read")
                    .and_then(Value::as_i64)
                    .unwrap_or(0)
                    .to_string(),
                row.get("inserted")
                    .and_then(Value::as_i64)
                    .unwrap_or(0)
                    .to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![count_label, String::new(), "Imports:".to_string()];
    lines.extend(format::render_table(&columns, &table_rows));

    Ok(lines.join("\n"))
}

fn render_data_range(data: &Value) -> Vec<String> {
    let Some(range) = data.get("data_range") else {
        return Vec::new();
    };
    let earliest = range.get("earliest").and_then(Value::as_str);
    let latest = range.get("latest").and_then(Value::as_str);

    match (earliest, latest) {
        (Some(earliest), Some(latest)) => {
            vec![format!("Ledger now covers {earliest} to {latest}.")]
        }
        _ => Vec::new(),
    }
}

fn get_i64(map: &serde_json::Map<String, Value>, key: &str) -> i64 {
    map.get(key).and_then(Value::as_i64).unwrap_or(0)
}

fn get_str(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}
