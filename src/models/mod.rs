pub mod request;
pub mod response;

pub use request::{DateRange, Dimension, GetReportsRequest, Metric, ReportRequest};
pub use response::{
    ColumnHeader, DateRangeValues, GetReportsResponse, MetricHeader, MetricHeaderEntry, Report,
    ReportData, ReportRow,
};
