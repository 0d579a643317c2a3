use predicates::prelude::*;
use test_support;

#[test]
fn delete_document_is_normalized_and_reencoded() {
  let doc = test_support::fixtures_dir().join("delete-report-definition.document.json");
  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  let out = cmd
    .args(["action", "delete", "--document", doc.to_str().unwrap()])
    .output()
    .unwrap();

  assert!(out.status.success());
  let fixture: serde_json::Value = test_support::read_fixture_json("delete-report-definition.document.json");
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["document"]["reportDefinitionId"], fixture["reportDefinitionId"]);
  assert_eq!(v["document"].as_object().unwrap().len(), 1);
  assert_eq!(v["state"], "Validated");

  // The binary form decodes back to the same document.
  let binary = v["binary"].as_str().unwrap().to_string();
  let mut again = test_support::cmd_bin("dashboards-reporting");
  let out = again.args(["action", "delete", "--binary", &binary]).output().unwrap();
  assert!(out.status.success());
  let w: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(w["document"], v["document"]);
}

#[test]
fn document_from_stdin_with_fallback_id() {
  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  let out = cmd
    .args(["action", "get", "--document", "-", "--id", "from-route"])
    .write_stdin(r#"{"unrelated":{"nested":[1,2,3]}}"#)
    .output()
    .unwrap();

  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["document"]["reportDefinitionId"], "from-route");
}

#[test]
fn missing_id_is_reported() {
  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  cmd
    .args(["action", "delete", "--document", "-"])
    .write_stdin("{}")
    .assert()
    .failure()
    .stderr(predicate::str::contains("reportDefinitionId field absent"));
}

#[test]
fn non_object_document_is_structural() {
  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  cmd
    .args(["action", "delete", "--document", "-"])
    .write_stdin("[\"abc\"]")
    .assert()
    .failure()
    .stderr(predicate::str::contains("structural parse failure"));
}

#[test]
fn truncated_binary_is_rejected() {
  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  // length 5, only two bytes follow
  cmd
    .args(["action", "get", "--binary", "BWFi"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("stream io"));
}
