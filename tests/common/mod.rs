#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;

use analytics_report::error::TransportError;
use analytics_report::models::{
    ColumnHeader, DateRangeValues, GetReportsResponse, MetricHeader, MetricHeaderEntry, Report,
    ReportData, ReportRow,
};
use analytics_report::transport::{HttpRequest, HttpResponse, HttpTransport};

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Replays queued outcomes in order and records every request it sees.
#[derive(Default)]
pub struct RecordingTransport {
    outcomes: RefCell<VecDeque<Result<HttpResponse, String>>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.outcomes.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.outcomes
            .borrow_mut()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn request(&self, idx: usize) -> HttpRequest {
        self.requests.borrow()[idx].clone()
    }
}

impl HttpTransport for RecordingTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        match self.outcomes.borrow_mut().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::new(&request.url, message)),
            None => Err(TransportError::new(&request.url, "no response queued")),
        }
    }
}

pub fn report(dimensions: &[&str], metrics: &[&str], rows: Vec<ReportRow>) -> Report {
    Report {
        column_header: ColumnHeader {
            dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
            metric_header: MetricHeader {
                metric_header_entries: metrics
                    .iter()
                    .map(|m| MetricHeaderEntry {
                        name: m.to_string(),
                        metric_type: None,
                    })
                    .collect(),
            },
        },
        data: ReportData {
            rows,
            ..Default::default()
        },
        next_page_token: None,
    }
}

pub fn row(dimensions: &[&str], ranges: &[&[&str]]) -> ReportRow {
    ReportRow {
        dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
        metrics: ranges
            .iter()
            .map(|values| DateRangeValues {
                values: values.iter().map(|v| v.to_string()).collect(),
            })
            .collect(),
    }
}

pub fn response(reports: Vec<Report>) -> GetReportsResponse {
    GetReportsResponse {
        reports,
        query_cost: None,
    }
}
