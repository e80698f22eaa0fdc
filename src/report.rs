//! The single `reports:batchGet` call.

use log::{debug, info, trace};
use serde::Deserialize;

use crate::auth::AuthenticatedClient;
use crate::config::ReportConfig;
use crate::error::ReportFetchError;
use crate::models::{GetReportsRequest, GetReportsResponse};
use crate::transport::HttpRequest;

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Best-effort message from a Google API error body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(ApiErrorEnvelope {
            error:
                ApiErrorBody {
                    message: Some(message),
                    status: Some(status),
                },
        }) => format!("{}: {}", status, message),
        Ok(ApiErrorEnvelope {
            error: ApiErrorBody {
                message: Some(message),
                ..
            },
        }) => message,
        _ => body.trim().to_string(),
    }
}

/// Fetch the report described by `config` with one authorized POST.
///
/// The decoded response is checked with [`validate_response`] and otherwise
/// returned untouched.
pub fn fetch_report(
    client: &AuthenticatedClient,
    config: &ReportConfig,
) -> Result<GetReportsResponse, ReportFetchError> {
    let request = GetReportsRequest::from(config);
    let body = serde_json::to_string(&request).map_err(ReportFetchError::Encode)?;
    trace!("Report request body: {}", body);

    debug!(
        "Requesting {} metrics by {} dimensions for view {} ({} .. {})",
        config.metrics.len(),
        config.dimensions.len(),
        config.view_id,
        config.start_date,
        config.end_date
    );
    let response = client.send(HttpRequest::json(config.endpoint.as_str(), body))?;
    if !response.is_success() {
        return Err(ReportFetchError::Api {
            status: response.status,
            message: api_error_message(&response.body),
        });
    }

    let reports: GetReportsResponse =
        serde_json::from_str(&response.body).map_err(ReportFetchError::Decode)?;
    validate_response(&reports)?;

    info!(
        "Fetched {} report(s) with {} row(s)",
        reports.reports.len(),
        reports.row_count()
    );
    Ok(reports)
}

/// Check that every row lines up with its report's column header: one value
/// per dimension name, and one value per metric name in each date range.
pub fn validate_response(response: &GetReportsResponse) -> Result<(), ReportFetchError> {
    for (report_idx, report) in response.reports.iter().enumerate() {
        let dimension_count = report.column_header.dimensions.len();
        let metric_count = report.column_header.metric_header.metric_header_entries.len();

        for (row_idx, row) in report.data.rows.iter().enumerate() {
            if row.dimensions.len() != dimension_count {
                return Err(ReportFetchError::MalformedResponse {
                    report: report_idx,
                    row: row_idx,
                    detail: format!(
                        "{} dimension value(s) for {} dimension header(s)",
                        row.dimensions.len(),
                        dimension_count
                    ),
                });
            }
            for (range_idx, values) in row.metrics.iter().enumerate() {
                if values.values.len() != metric_count {
                    return Err(ReportFetchError::MalformedResponse {
                        report: report_idx,
                        row: row_idx,
                        detail: format!(
                            "date range {} has {} metric value(s) for {} metric header(s)",
                            range_idx,
                            values.values.len(),
                            metric_count
                        ),
                    });
                }
            }
        }
    }
    Ok(())
}
