//! Console rendering of a fetched report.

use std::io::{self, Write};

use log::warn;

use crate::models::{GetReportsResponse, Report};

/// Write every row of every report as `name: value` lines.
///
/// Per row: one line per dimension, then for each date range a
/// `Date range: <n>` header followed by one line per metric. Rows keep the
/// order the service returned them in. Values are paired with headers by
/// position; run [`crate::report::validate_response`] first if the response
/// did not come from [`crate::report::fetch_report`].
pub fn write_report<W: Write>(response: &GetReportsResponse, out: &mut W) -> io::Result<()> {
    for report in &response.reports {
        write_single_report(report, out)?;
    }
    Ok(())
}

fn write_single_report<W: Write>(report: &Report, out: &mut W) -> io::Result<()> {
    let dimension_headers = &report.column_header.dimensions;

    for row in &report.data.rows {
        for (name, value) in dimension_headers.iter().zip(&row.dimensions) {
            writeln!(out, "{}: {}", name, value)?;
        }

        for (i, date_range) in row.metrics.iter().enumerate() {
            writeln!(out, "Date range: {}", i)?;
            let metric_names = report.column_header.metric_names();
            for (name, value) in metric_names.zip(&date_range.values) {
                writeln!(out, "{}: {}", name, value)?;
            }
        }
    }
    Ok(())
}

/// Render the report into a string.
pub fn render_report(response: &GetReportsResponse) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_report(response, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Print the report to stdout. A closed pipe ends output quietly.
pub fn print_report(response: &GetReportsResponse) {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let result = write_report(response, &mut out).and_then(|_| out.flush());
    if let Err(e) = result {
        if e.kind() != io::ErrorKind::BrokenPipe {
            warn!("Failed to write report to stdout: {}", e);
        }
    }
}
