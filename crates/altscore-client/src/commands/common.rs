use crate::contracts::types::{DataRange, PublicView, ViewColumn};

const REQUIRED_IMPORT_FIELDS: [(&str, &str); 5] = [
    ("posted_at", "date"),
    ("merchant", "string"),
    ("amount", "number"),
    ("txn_type", "income|expense"),
    ("category", "string"),
];

const OPTIONAL_IMPORT_FIELDS: [(&str, &str); 1] = [("status", "cleared|pending")];

pub(crate) fn required_import_field_names() -> Vec<&'static str> {
    REQUIRED_IMPORT_FIELDS
        .iter()
        .map(|(name, _)| *name)
        .collect()
}

pub(crate) fn optional_import_field_names() -> Vec<&'static str> {
    OPTIONAL_IMPORT_FIELDS
        .iter()
        .map(|(name, _)| *name)
        .collect()
}

pub fn public_view_contracts() -> Vec<PublicView> {
    vec![
        PublicView {
            name: "v1_transactions".to_string(),
            columns: vec![
                view_column("txn_id", "text"),
                view_column("posted_at", "date"),
                view_column("merchant", "text"),
                view_column("amount", "real"),
                view_column("txn_type", "text"),
                view_column("category", "text"),
                view_column("status", "text"),
            ],
        },
        PublicView {
            name: "v1_imports".to_string(),
            columns: vec![
                view_column("import_id", "text"),
                view_column("status", "text"),
                view_column("created_at", "text"),
                view_column("committed_at", "text|null"),
                view_column("rows_read", "integer"),
                view_column("rows_valid", "integer"),
                view_column("rows_invalid", "integer"),
                view_column("inserted", "integer"),
                view_column("source_kind", "text|null"),
                view_column("source_ref", "text|null"),
            ],
        },
        PublicView {
            name: "v1_reports".to_string(),
            columns: vec![
                view_column("report_id", "text"),
                view_column("generated_at", "text"),
                view_column("score", "integer"),
                view_column("grade", "text"),
                view_column("bill_payment_history", "real"),
                view_column("income_consistency", "real"),
                view_column("expense_management", "real"),
                view_column("financial_growth", "real"),
                view_column("transaction_diversity", "real"),
                view_column("bill_signal", "text"),
                view_column("transaction_count", "integer"),
                view_column("period_start", "text"),
                view_column("period_end", "text"),
                view_column("scoring_policy_version", "text"),
            ],
        },
    ]
}

pub fn data_range_hint(data_range: &DataRange) -> DataRange {
    DataRange {
        earliest: data_range.earliest.clone(),
        latest: data_range.latest.clone(),
    }
}

fn view_column(name: &str, column_type: &str) -> ViewColumn {
    ViewColumn {
        name: name.to_string(),
        column_type: column_type.to_string(),
        nullable: column_type.ends_with("|null"),
    }
}
