use serial_test::serial;
use test_support;

#[test]
#[serial]
fn cli_generate_snapshot() {
  test_support::init_insta();
  let out_dir = test_support::tempdir();
  let body = test_support::read_fixture_text("generate-report.ok.json");

  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  let out = cmd
    .env("DR_TEST_GENERATE_STATUS", "200")
    .env("DR_TEST_GENERATE_RESPONSE", body)
    .env_remove("DR_TEST_TRANSPORT_ERROR")
    .args([
      "generate",
      "--url",
      "/app/dashboards#/view/abc?_g=(time:(from:now-15m,to:now))",
      "--out-dir",
      out_dir.path().to_str().unwrap(),
      "--now-override",
      "2025-08-15T12:00:00Z",
    ])
    .output()
    .unwrap();

  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

  insta::with_settings!({ sort_maps => true }, {
    insta::assert_json_snapshot!(v, { ".file" => "[file]" }, @r###"
    {
      "bytes": 54,
      "file": "[file]",
      "filename": "On_demand_report_2025-08-15T12_00_00.000Z.pdf",
      "format": "pdf",
      "time_from": "2025-08-15T11:45:00.000Z",
      "time_to": "2025-08-15T12:00:00.000Z"
    }
    "###);
  });
}
