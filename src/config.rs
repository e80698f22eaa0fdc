//! Fixed query parameters and service endpoints.
//!
//! Everything the report query needs lives in [`ReportConfig`]. The `Default`
//! impl carries the values the tool has always queried with; callers that need
//! a different target (tests, the `--view-id` flag) start from the default and
//! override fields.

/// Read-only Analytics scope requested for the service account token.
pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

/// Analytics Reporting API v4 batch endpoint.
pub const BATCH_GET_ENDPOINT: &str = "https://analyticsreporting.googleapis.com/v4/reports:batchGet";

/// Token endpoint used when the key file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Key file read when `--key-file` is not given.
pub const DEFAULT_KEY_FILE: &str = "service-account.json";

// Replace with the Analytics view to query, or pass --view-id.
pub const DEFAULT_VIEW_ID: &str = "000000000";

pub const DATE_RANGE_START: &str = "30daysAgo";
pub const DATE_RANGE_END: &str = "yesterday";

pub const METRIC_SESSIONS: &str = "ga:sessions";
pub const METRIC_USERS: &str = "ga:users";
pub const METRIC_GOAL_CONVERSION_RATE: &str = "ga:goal8ConversionRate";
pub const METRIC_GOAL_VALUE: &str = "ga:goal8Value";
pub const METRIC_GOAL_COMPLETIONS: &str = "ga:goal8Completions";

pub const DIMENSION_DATE: &str = "ga:date";
pub const DIMENSION_CHANNEL: &str = "ga:channelGrouping";

/// Parameters of the single report query issued per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub view_id: String,
    pub start_date: String,
    pub end_date: String,
    /// Metric expressions, in the order their values come back.
    pub metrics: Vec<String>,
    /// Dimension names, in the order their values come back.
    pub dimensions: Vec<String>,
    pub endpoint: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            view_id: DEFAULT_VIEW_ID.to_string(),
            start_date: DATE_RANGE_START.to_string(),
            end_date: DATE_RANGE_END.to_string(),
            metrics: [
                METRIC_SESSIONS,
                METRIC_USERS,
                METRIC_GOAL_CONVERSION_RATE,
                METRIC_GOAL_VALUE,
                METRIC_GOAL_COMPLETIONS,
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
            dimensions: [DIMENSION_DATE, DIMENSION_CHANNEL]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            endpoint: BATCH_GET_ENDPOINT.to_string(),
        }
    }
}

impl ReportConfig {
    pub fn with_view_id(mut self, view_id: impl Into<String>) -> Self {
        self.view_id = view_id.into();
        self
    }
}
