use chrono::{TimeZone, Utc};
use dashboards_reporting::model::ReportFormat;
use dashboards_reporting::params::{build_report_request, ReportContext, SAVED_SEARCH_ID};
use dashboards_reporting::time_range;
use jsonschema::validator_for;

fn read_schema(name: &str) -> serde_json::Value {
  let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
  let path = manifest_dir.join("tests").join("schemas").join(name);
  let data = std::fs::read(&path).expect("schema file");
  serde_json::from_slice(&data).expect("valid schema JSON")
}

fn compile_schema(name: &str) -> jsonschema::Validator {
  let schema = read_schema(name);
  validator_for(&schema).expect("compile schema")
}

#[test]
fn request_bodies_conform_to_schema() {
  let compiled = compile_schema("generate-report.request.schema.json");
  let now = Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).single().unwrap();

  let cases = [
    ("/app/dashboards#/view/abc?_g=(time:(from:now-15m,to:now))", ReportFormat::Pdf),
    ("/app/visualize#/edit/v1?_g=(time:(from:now-7d,to:now))&_a=(vis:(type:line))", ReportFormat::Png),
    (
      "/app/discover#/view/571aaf70-4c88-11e8-b3d7-01146121b73d?_g=(time:(from:now/w,to:now/w))&_a=(q:(a:b))",
      ReportFormat::Csv,
    ),
    ("/app/home?_g=(time:(from:'2025-08-01T00:00:00.000Z',to:'2025-08-02T00:00:00.000Z'))", ReportFormat::Pdf),
  ];

  for (address, format) in cases {
    let resolved = time_range::resolve(address, now).unwrap();
    let context = ReportContext::named("schema").with_extra(SAVED_SEARCH_ID, "571aaf70-4c88-11e8-b3d7-01146121b73d");
    let request = build_report_request(&resolved.time_range, &resolved.canonical_url, format, &context);
    let v = serde_json::to_value(&request).unwrap();

    compiled
      .validate(&v)
      .unwrap_or_else(|e| panic!("schema validation failed for {address}: {e}"));
  }
}

#[test]
fn cli_preview_conforms_to_schema() {
  let compiled = compile_schema("generate-report.request.schema.json");
  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  let out = cmd
    .args([
      "preview",
      "--url",
      "/app/dashboards#/view/abc?_g=(time:(from:now-1M/M,to:now-1M/M))",
      "--name",
      "monthly",
    ])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  compiled.validate(&v).expect("schema validation failed for preview");
  assert_eq!(v["report_definition"]["report_params"]["report_name"], "monthly");
}
