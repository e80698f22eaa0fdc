//! Decoded `reports:batchGet` response.
//!
//! The service omits empty collections, so every field defaults. Values stay
//! as the strings the service sends; nothing here reinterprets them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetReportsResponse {
    pub reports: Vec<Report>,
    pub query_cost: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Report {
    pub column_header: ColumnHeader,
    pub data: ReportData,
    /// Present when more rows exist; never followed.
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnHeader {
    pub dimensions: Vec<String>,
    pub metric_header: MetricHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricHeader {
    pub metric_header_entries: Vec<MetricHeaderEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricHeaderEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub metric_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportData {
    pub rows: Vec<ReportRow>,
    pub totals: Vec<DateRangeValues>,
    pub row_count: Option<i64>,
    pub is_data_golden: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportRow {
    pub dimensions: Vec<String>,
    /// One entry per requested date range.
    pub metrics: Vec<DateRangeValues>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRangeValues {
    pub values: Vec<String>,
}

impl ColumnHeader {
    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metric_header
            .metric_header_entries
            .iter()
            .map(|m| m.name.as_str())
    }
}

impl GetReportsResponse {
    pub fn row_count(&self) -> usize {
        self.reports.iter().map(|r| r.data.rows.len()).sum()
    }
}
