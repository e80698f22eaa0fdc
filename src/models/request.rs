use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;

/// Body of a `reports:batchGet` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetReportsRequest {
    pub report_requests: Vec<ReportRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub view_id: String,
    pub date_ranges: Vec<DateRange>,
    pub metrics: Vec<Metric>,
    pub dimensions: Vec<Dimension>,
}

/// Either `YYYY-MM-DD` or a relative token such as `30daysAgo`, `yesterday`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
}

impl From<&ReportConfig> for ReportRequest {
    fn from(config: &ReportConfig) -> Self {
        ReportRequest {
            view_id: config.view_id.clone(),
            date_ranges: vec![DateRange {
                start_date: config.start_date.clone(),
                end_date: config.end_date.clone(),
            }],
            metrics: config
                .metrics
                .iter()
                .map(|expression| Metric {
                    expression: expression.clone(),
                    alias: None,
                })
                .collect(),
            dimensions: config
                .dimensions
                .iter()
                .map(|name| Dimension { name: name.clone() })
                .collect(),
        }
    }
}

impl From<&ReportConfig> for GetReportsRequest {
    fn from(config: &ReportConfig) -> Self {
        GetReportsRequest {
            report_requests: vec![ReportRequest::from(config)],
        }
    }
}
