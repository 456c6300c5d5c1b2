use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ViewColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub nullable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicView {
    pub name: String,
    pub columns: Vec<ViewColumn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaSummaryData {
    pub db_path: String,
    pub readonly_uri: String,
    pub public_views: Vec<PublicView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaViewData {
    pub view_name: String,
    pub columns: Vec<ViewColumn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub rows_read: i64,
    pub rows_valid: i64,
    pub rows_invalid: i64,
    pub inserted: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportIssue {
    pub row: i64,
    pub field: String,
    pub code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportData {
    pub dry_run: bool,
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,
    pub message: String,
    pub summary: ImportSummary,
    pub issues: Vec<ImportIssue>,
    pub data_range: DataRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportListItem {
    pub import_id: String,
    pub status: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed_at: Option<String>,
    pub rows_read: i64,
    pub rows_valid: i64,
    pub rows_invalid: i64,
    pub inserted: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportListData {
    pub rows: Vec<ImportListItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FactorScores {
    pub bill_payment_history: f64,
    pub income_consistency: f64,
    pub expense_management: f64,
    pub financial_growth: f64,
    pub transaction_diversity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NarrativeData {
    pub score_breakdown: String,
    pub recommendations: String,
    pub score_type: String,
    pub model: String,
    pub attempts: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NarrativeErrorData {
    pub code: String,
    pub message: String,
    pub attempts: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreData {
    pub score: i64,
    pub grade: String,
    pub factors: FactorScores,
    pub bill_signal: String,
    pub transaction_count: i64,
    pub period_start: String,
    pub period_end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<NarrativeData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_error: Option<NarrativeErrorData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_error: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub data_range_hint: DataRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct FactorsData {
    pub score: i64,
    pub grade: String,
    pub factors: FactorScores,
    pub bill_signal: String,
    pub transaction_count: i64,
    pub from: Option<String>,
    pub to: Option<String>,
    pub data_range_hint: DataRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportListItem {
    pub report_id: String,
    pub generated_at: String,
    pub score: i64,
    pub grade: String,
    pub bill_signal: String,
    pub transaction_count: i64,
    pub period_start: String,
    pub period_end: String,
    pub scoring_policy_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportListData {
    pub rows: Vec<ReportListItem>,
}
