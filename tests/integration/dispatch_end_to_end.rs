use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
use dashboards_reporting::dispatch::{DispatchTarget, Dispatcher, StaticTransport};
use dashboards_reporting::errors::DispatchError;
use dashboards_reporting::model::{ReportFormat, SourceKind};
use dashboards_reporting::notify::{Notification, RecordingNotifier, UiEvent};
use dashboards_reporting::params::{build_report_request, ReportContext};
use dashboards_reporting::time_range;

const ADDRESS: &str = "/app/dashboards#/view/abc?_g=(time:(from:now-15m,to:now))";

fn now() -> chrono::DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).single().unwrap()
}

fn build(format: ReportFormat) -> dashboards_reporting::model::ReportRequest {
  let resolved = time_range::resolve(ADDRESS, now()).unwrap();
  build_report_request(&resolved.time_range, &resolved.canonical_url, format, &ReportContext::named("e2e"))
}

#[test]
fn dashboard_address_builds_a_fifteen_minute_pdf_request() {
  let request = build(ReportFormat::Pdf);
  let params = &request.report_definition.report_params;

  assert_eq!(request.time_range.duration(), TimeDelta::minutes(15));
  assert_eq!(params.report_source, Some(SourceKind::Dashboard));
  assert_eq!(params.core_params.report_format, ReportFormat::Pdf);
  assert_eq!(params.core_params.base_url, "/app/dashboards#/view/abc");
}

#[tokio::test]
async fn ok_response_delivers_report_pdf() {
  test_support::init_tracing();
  let td = test_support::tempdir();
  let notifier = Arc::new(RecordingNotifier::new());
  let transport = Arc::new(StaticTransport::new(200, r#"{"data":"JVBERi0=","filename":"report.pdf"}"#));
  let dispatcher = Dispatcher::new(transport, notifier.clone(), DispatchTarget::new("http://localhost:5601"), td.path());

  let file = dispatcher.send(&build(ReportFormat::Pdf)).await.unwrap();

  assert_eq!(file.filename, "report.pdf");
  assert!(td.path().join("report.pdf").exists());
  assert_eq!(
    notifier.notifications(),
    vec![Notification::Success {
      filename: "report.pdf".into()
    }]
  );
}

#[tokio::test]
async fn forbidden_response_notifies_once_and_writes_nothing() {
  let td = test_support::tempdir();
  let notifier = Arc::new(RecordingNotifier::new());
  let transport = Arc::new(StaticTransport::new(403, r#"{"data":"JVBERi0=","filename":"report.pdf"}"#));
  let dispatcher = Dispatcher::new(transport, notifier.clone(), DispatchTarget::new("http://localhost:5601"), td.path());

  let err = dispatcher.send(&build(ReportFormat::Pdf)).await.unwrap_err();

  assert!(matches!(err, DispatchError::PermissionDenied));
  assert!(!td.path().join("report.pdf").exists());
  assert_eq!(
    notifier.events(),
    vec![
      UiEvent::ProgressShown,
      UiEvent::ProgressCleared,
      UiEvent::Notified(Notification::PermissionDenied)
    ]
  );
}

#[tokio::test]
async fn concurrent_sends_are_independent() {
  let td = test_support::tempdir();
  let notifier = Arc::new(RecordingNotifier::new());
  let transport = Arc::new(StaticTransport::new(200, r#"{"data":"a,b\n","filename":"rows.csv"}"#));
  let dispatcher = Dispatcher::new(transport.clone(), notifier.clone(), DispatchTarget::new("http://h"), td.path());

  let first = build(ReportFormat::Csv);
  let second = build(ReportFormat::Csv);
  let (a, b) = tokio::join!(dispatcher.send(&first), dispatcher.send(&second));

  assert!(a.is_ok() && b.is_ok());
  assert_eq!(transport.requests().len(), 2);
  assert_eq!(notifier.notifications().len(), 2);
}
