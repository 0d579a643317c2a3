use predicates::prelude::*;
use serial_test::serial;
use test_support;

const DASHBOARD_URL: &str = "/app/dashboards#/view/abc?_g=(time:(from:now-15m,to:now))";

fn generate(status: &str, body: &str, out_dir: &std::path::Path) -> assert_cmd::Command {
  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  cmd
    .env("DR_TEST_GENERATE_STATUS", status)
    .env("DR_TEST_GENERATE_RESPONSE", body)
    .env_remove("DR_TEST_TRANSPORT_ERROR")
    .args([
      "generate",
      "--url",
      DASHBOARD_URL,
      "--out-dir",
      out_dir.to_str().unwrap(),
      "--now-override",
      "2025-08-15T12:00:00Z",
    ]);
  cmd
}

#[test]
#[serial]
fn ok_writes_report_and_prints_pointer() {
  let td = test_support::tempdir();
  let out = generate("200", r#"{"data":"JVBERi0=","filename":"report.pdf"}"#, td.path())
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["filename"], "report.pdf");
  assert_eq!(std::fs::read(td.path().join("report.pdf")).unwrap(), b"%PDF-");

  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("Generating report"));
  assert!(stderr.contains("Successfully generated report"));
}

#[test]
#[serial]
fn forbidden_reports_permission_denied_and_writes_nothing() {
  let td = test_support::tempdir();
  generate("403", "", td.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("Permission denied"));

  assert_eq!(std::fs::read_dir(td.path()).unwrap().count(), 0);
}

#[test]
#[serial]
fn server_error_is_a_generic_failure() {
  let td = test_support::tempdir();
  generate("500", "oops", td.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("Download error").and(predicate::str::contains("status 500")));
}

#[test]
#[serial]
fn transport_error_is_a_generic_failure() {
  let td = test_support::tempdir();
  let mut cmd = generate("200", "", td.path());
  cmd
    .env("DR_TEST_TRANSPORT_ERROR", "connection refused")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Download error").and(predicate::str::contains("connection refused")));
}

#[test]
#[serial]
fn malformed_address_fails_before_any_request() {
  let td = test_support::tempdir();
  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  cmd
    .env("DR_TEST_GENERATE_STATUS", "200")
    .args([
      "generate",
      "--url",
      "/app/dashboards#/view/abc",
      "--out-dir",
      td.path().to_str().unwrap(),
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("malformed address").and(predicate::str::contains("Generating report").not()));
}

#[test]
fn csv_preview_of_a_saved_search_carries_its_id() {
  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  let out = cmd
    .args([
      "preview",
      "--format",
      "csv",
      "--url",
      "/app/discover#/view/571aaf70-4c88-11e8-b3d7-01146121b73d?_g=(time:(from:now-1d/d,to:now-1d/d))&_a=(columns:!(_source))",
      "--now-override",
      "2025-08-15T12:00:00Z",
    ])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  let params = &v["report_definition"]["report_params"];
  assert_eq!(params["report_source"], "Saved search");
  assert_eq!(params["core_params"]["saved_search_id"], "571aaf70-4c88-11e8-b3d7-01146121b73d");
  assert_eq!(params["core_params"]["time_duration"], "PT23H59M59.999S");
}
