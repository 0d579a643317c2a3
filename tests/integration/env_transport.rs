use std::sync::Arc;

use chrono::{TimeZone, Utc};
use dashboards_reporting::dispatch::{build_transport, DispatchTarget, Dispatcher};
use dashboards_reporting::errors::DispatchError;
use dashboards_reporting::model::ReportFormat;
use dashboards_reporting::notify::RecordingNotifier;
use dashboards_reporting::params::{build_report_request, ReportContext};
use dashboards_reporting::time_range::TimeRange;
use serial_test::serial;

fn request() -> dashboards_reporting::model::ReportRequest {
  let to = Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).single().unwrap();
  let range = TimeRange::new(to - chrono::TimeDelta::hours(1), to).unwrap();
  build_report_request(&range, "/app/visualize#/edit/v1?_g=()", ReportFormat::Png, &ReportContext::named("env"))
}

#[tokio::test]
#[serial]
async fn env_fixture_status_drives_the_outcome() {
  let _clean = test_support::without_fixture_env();
  let _env = test_support::with_env(&[("DR_TEST_GENERATE_STATUS", "403")]);
  let td = test_support::tempdir();
  let dispatcher = Dispatcher::new(
    build_transport(),
    Arc::new(RecordingNotifier::new()),
    DispatchTarget::new("http://unused.invalid"),
    td.path(),
  );

  let err = dispatcher.send(&request()).await.unwrap_err();
  assert!(matches!(err, DispatchError::PermissionDenied));
}

#[tokio::test]
#[serial]
async fn env_fixture_body_is_delivered() {
  let _clean = test_support::without_fixture_env();
  let _env = test_support::with_env(&[(
    "DR_TEST_GENERATE_RESPONSE",
    r#"{"data":"iVBORw0KGgo=","filename":"chart"}"#,
  )]);
  let td = test_support::tempdir();
  let dispatcher = Dispatcher::new(
    build_transport(),
    Arc::new(RecordingNotifier::new()),
    DispatchTarget::new("http://unused.invalid"),
    td.path(),
  );

  let file = dispatcher.send(&request()).await.unwrap();
  assert_eq!(file.filename, "chart.png");
  assert_eq!(std::fs::read(td.path().join("chart.png")).unwrap(), b"\x89PNG\r\n\x1a\n");
}
