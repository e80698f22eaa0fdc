mod common;

use analytics_report::auth::{AuthenticatedClient, StaticToken};
use analytics_report::config::BATCH_GET_ENDPOINT;
use analytics_report::credentials::load_token_source;
use analytics_report::error::{AuthError, ReportFetchError};
use analytics_report::models::GetReportsRequest;
use analytics_report::{ReportConfig, fetch_report};
use std::rc::Rc;

use common::{RecordingTransport, fixture};

const REPORT_BODY: &str = r#"{
  "reports": [{
    "columnHeader": {
      "dimensions": ["ga:date", "ga:channelGrouping"],
      "metricHeader": {"metricHeaderEntries": [
        {"name": "ga:sessions", "type": "INTEGER"},
        {"name": "ga:users", "type": "INTEGER"},
        {"name": "ga:goal8ConversionRate", "type": "PERCENT"},
        {"name": "ga:goal8Value", "type": "CURRENCY"},
        {"name": "ga:goal8Completions", "type": "INTEGER"}
      ]}
    },
    "data": {
      "rows": [{
        "dimensions": ["20230101", "Organic Search"],
        "metrics": [{"values": ["120", "95", "2.5", "30.0", "3"]}]
      }],
      "rowCount": 1
    }
  }]
}"#;

fn client_with(transport: &Rc<RecordingTransport>) -> AuthenticatedClient {
    AuthenticatedClient::new(transport.clone(), StaticToken("test-token".to_string()))
}

#[test]
fn test_single_call_with_fixed_parameters() {
    let transport = Rc::new(RecordingTransport::new().respond(200, REPORT_BODY));
    let config = ReportConfig::default().with_view_id("123456");

    let response = fetch_report(&client_with(&transport), &config).unwrap();
    assert_eq!(response.reports.len(), 1);
    assert_eq!(response.reports[0].data.rows[0].dimensions[1], "Organic Search");

    assert_eq!(transport.calls(), 1);
    let sent = transport.request(0);
    assert_eq!(sent.url, BATCH_GET_ENDPOINT);
    assert_eq!(sent.content_type, "application/json");
    assert_eq!(sent.header("Authorization"), Some("Bearer test-token"));

    let body: GetReportsRequest = serde_json::from_str(&sent.body).unwrap();
    assert_eq!(body.report_requests.len(), 1);
    let request = &body.report_requests[0];
    assert_eq!(request.view_id, "123456");
    assert_eq!(request.date_ranges.len(), 1);
    assert_eq!(request.date_ranges[0].start_date, "30daysAgo");
    assert_eq!(request.date_ranges[0].end_date, "yesterday");
    let metrics: Vec<&str> = request.metrics.iter().map(|m| m.expression.as_str()).collect();
    assert_eq!(
        metrics,
        vec![
            "ga:sessions",
            "ga:users",
            "ga:goal8ConversionRate",
            "ga:goal8Value",
            "ga:goal8Completions",
        ]
    );
    let dimensions: Vec<&str> = request.dimensions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(dimensions, vec!["ga:date", "ga:channelGrouping"]);
}

#[test]
fn test_alternate_parameter_set() {
    let transport = Rc::new(RecordingTransport::new().respond(200, r#"{"reports": []}"#));
    let config = ReportConfig {
        metrics: vec!["ga:pageviews".to_string()],
        dimensions: vec!["ga:country".to_string()],
        start_date: "2023-01-01".to_string(),
        end_date: "2023-01-31".to_string(),
        ..ReportConfig::default()
    };

    fetch_report(&client_with(&transport), &config).unwrap();
    let body: serde_json::Value = serde_json::from_str(&transport.request(0).body).unwrap();
    let request = &body["reportRequests"][0];
    assert_eq!(request["metrics"][0]["expression"], "ga:pageviews");
    assert_eq!(request["dimensions"][0]["name"], "ga:country");
    assert_eq!(request["dateRanges"][0]["startDate"], "2023-01-01");
}

#[test]
fn test_authorization_failure_is_fetch_error() {
    let transport = Rc::new(RecordingTransport::new().respond(
        401,
        r#"{"error":{"code":401,"message":"Request had invalid authentication credentials.","status":"UNAUTHENTICATED"}}"#,
    ));

    let err = fetch_report(&client_with(&transport), &ReportConfig::default()).unwrap_err();
    match &err {
        ReportFetchError::Api { status, message } => {
            assert_eq!(*status, 401);
            assert!(message.starts_with("UNAUTHENTICATED"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transport.calls(), 1);
}

#[test]
fn test_transport_failure_is_fetch_error() {
    let transport = Rc::new(RecordingTransport::new().fail("connection refused"));
    let err = fetch_report(&client_with(&transport), &ReportConfig::default()).unwrap_err();
    assert!(matches!(err, ReportFetchError::Transport(_)));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_undecodable_body_is_fetch_error() {
    let transport = Rc::new(RecordingTransport::new().respond(200, "<html>oops</html>"));
    let err = fetch_report(&client_with(&transport), &ReportConfig::default()).unwrap_err();
    assert!(matches!(err, ReportFetchError::Decode(_)));
}

#[test]
fn test_misaligned_rows_are_rejected() {
    let body = r#"{"reports":[{
        "columnHeader":{"dimensions":["ga:date","ga:channelGrouping"],
                        "metricHeader":{"metricHeaderEntries":[{"name":"ga:sessions"}]}},
        "data":{"rows":[{"dimensions":["20230101"],"metrics":[{"values":["1"]}]}]}}]}"#;
    let transport = Rc::new(RecordingTransport::new().respond(200, body));
    let err = fetch_report(&client_with(&transport), &ReportConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ReportFetchError::MalformedResponse {
            report: 0,
            row: 0,
            ..
        }
    ));
}

#[test]
fn test_jwt_flow_exchanges_token_then_fetches() {
    let tokens = load_token_source(&fixture("service_account.json")).unwrap();
    let transport = Rc::new(
        RecordingTransport::new()
            .respond(
                200,
                r#"{"access_token":"ya29.from-exchange","expires_in":3599,"token_type":"Bearer"}"#,
            )
            .respond(200, REPORT_BODY),
    );
    let client = AuthenticatedClient::new(transport.clone(), tokens);

    fetch_report(&client, &ReportConfig::default()).unwrap();

    assert_eq!(transport.calls(), 2);
    let exchange = transport.request(0);
    assert_eq!(exchange.url, "https://oauth2.googleapis.com/token");
    assert_eq!(exchange.content_type, "application/x-www-form-urlencoded");
    assert!(exchange.header("Authorization").is_none());

    let report_call = transport.request(1);
    assert_eq!(report_call.url, BATCH_GET_ENDPOINT);
    assert_eq!(
        report_call.header("Authorization"),
        Some("Bearer ya29.from-exchange")
    );
}

#[test]
fn test_token_rejection_skips_report_call() {
    let tokens = load_token_source(&fixture("service_account.json")).unwrap();
    let transport = Rc::new(RecordingTransport::new().respond(
        400,
        r#"{"error":"invalid_grant","error_description":"Invalid JWT Signature."}"#,
    ));
    let client = AuthenticatedClient::new(transport.clone(), tokens);

    let err = fetch_report(&client, &ReportConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ReportFetchError::Auth(AuthError::Rejected { status: 400, .. })
    ));
    assert_eq!(transport.calls(), 1);
}

#[test]
fn test_fatal_message_names_cause_once() {
    use anyhow::Context;

    let transport = Rc::new(RecordingTransport::new().fail("connection refused"));
    let err = fetch_report(&client_with(&transport), &ReportConfig::default())
        .context("Error getting Analytics report")
        .unwrap_err();

    let rendered = format!("{:#}", err);
    assert_eq!(rendered.matches("connection refused").count(), 1);
    assert_eq!(rendered.matches("Analytics report").count(), 1);
    assert!(rendered.starts_with("Error getting Analytics report: "));
    let expected_tail = format!("request to {} failed: connection refused", BATCH_GET_ENDPOINT);
    assert!(rendered.ends_with(&expected_tail), "rendered: {rendered}");
}
