use test_support;

#[test]
fn cli_preview_snapshot() {
  test_support::init_insta();
  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  let out = cmd
    .args([
      "preview",
      "--url",
      "/app/dashboards#/view/abc?_g=(time:(from:now-15m,to:now))",
      "--format",
      "pdf",
      "--now-override",
      "2025-08-15T12:00:00Z",
    ])
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

  insta::with_settings!({ sort_maps => true }, {
    insta::assert_json_snapshot!(v, @r###"
    {
      "query_url": "/app/dashboards#/view/abc?_g=(time:(from:'2025-08-15T11:45:00.000Z',to:'2025-08-15T12:00:00.000Z'))",
      "report_definition": {
        "delivery": {
          "delivery_params": {
            "kibana_recipients": []
          },
          "delivery_type": "Kibana user"
        },
        "report_params": {
          "core_params": {
            "base_url": "/app/dashboards#/view/abc",
            "report_format": "pdf",
            "time_duration": "PT15M"
          },
          "description": "In-context report download",
          "report_name": "On_demand_report",
          "report_source": "Dashboard"
        },
        "trigger": {
          "trigger_type": "On demand"
        }
      },
      "time_from": 1755258300000,
      "time_to": 1755259200000
    }
    "###);
  });
}
