use test_support;

#[test]
fn gen_man_outputs_troff() {
  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  let out = cmd.args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let text = String::from_utf8_lossy(&out.stdout);
  // clap_mangen emits a roff manpage (Aq preamble, then .TH) that mentions the binary name
  assert!(text.contains(".TH") || text.contains(".Nm"), "expected troff man header");
  assert!(text.contains("dashboards\\-reporting") || text.contains("dashboards-reporting"));
}

#[test]
fn missing_subcommand_is_an_error() {
  let mut cmd = test_support::cmd_bin("dashboards-reporting");
  let out = cmd.output().unwrap();
  assert!(!out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("Provide a subcommand"));
}
