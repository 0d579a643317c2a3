// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate the CLI subcommands: resolve -> build -> dispatch for reports; decode -> validate -> re-encode for actions
// role: processing/orchestrator
// inputs: EffectiveConfig or ActionArgs; a Transport and Notifier for dispatch
// outputs: JSON values printed by main (file pointer, request body, action summary)
// side_effects: Network call and one file write for generate; reads --document files or stdin for action
// invariants:
// - address errors abort before any network call
// - preview never touches the transport
// errors: Propagates typed errors wrapped with anyhow context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Read;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};

use crate::address;
use crate::cli::{ActionArgs, ActionKind, EffectiveConfig};
use crate::datemath::format_iso;
use crate::dispatch::{DispatchTarget, Dispatcher, Transport};
use crate::model::{ReportFormat, ReportRequest};
use crate::notify::Notifier;
use crate::params::{build_report_request, ReportContext, SAVED_SEARCH_ID};
use crate::scheduler::lifecycle::ActionEnvelope;
use crate::scheduler::{encode_binary, ActionRequest, DeleteReportDefinitionRequest, GetReportDefinitionRequest};
use crate::time_range;
use crate::util;

/// Resolve the configured address and build its request body.
pub fn prepare_request(cfg: &EffectiveConfig) -> Result<ReportRequest> {
  let now = util::effective_now(cfg.now);
  let resolved = time_range::resolve(&cfg.url, now).with_context(|| format!("resolving {}", cfg.url))?;

  let mut context = ReportContext::named(&cfg.report_name);
  if cfg.format == ReportFormat::Csv {
    if let Some(id) = address::saved_search_id_from_address(&cfg.url) {
      context = context.with_extra(SAVED_SEARCH_ID, id);
    }
  }

  Ok(build_report_request(
    &resolved.time_range,
    &resolved.canonical_url,
    cfg.format,
    &context,
  ))
}

pub fn preview(cfg: &EffectiveConfig) -> Result<Value> {
  let request = prepare_request(cfg)?;

  Ok(serde_json::to_value(&request)?)
}

/// Build, send and save one report; returns the pointer printed on stdout.
pub async fn generate(cfg: &EffectiveConfig, transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Result<Value> {
  let request = prepare_request(cfg)?;

  let target = DispatchTarget {
    host: cfg.host.clone(),
    kbn_version: cfg.kbn_version.clone(),
    authorization: cfg.authorization.clone(),
  };
  let dispatcher = Dispatcher::new(transport, notifier, target, cfg.out_dir.clone());
  let file = dispatcher.send(&request).await.context("generating report")?;

  Ok(json!({
    "file": file.path,
    "filename": file.filename,
    "format": file.format,
    "bytes": file.bytes,
    "time_from": format_iso(request.time_range.from),
    "time_to": format_iso(request.time_range.to),
  }))
}

/// Decode, validate and re-encode a scheduler action request.
pub fn action<I: Read>(args: &ActionArgs, stdin: I) -> Result<Value> {
  let source = ActionSource::from_args(args, stdin)?;

  match args.kind {
    ActionKind::Delete => summarize::<DeleteReportDefinitionRequest>(source, args.id.as_deref()),
    ActionKind::Get => summarize::<GetReportDefinitionRequest>(source, args.id.as_deref()),
  }
}

enum ActionSource {
  Document(Vec<u8>),
  Binary(Vec<u8>),
}

impl ActionSource {
  fn from_args<I: Read>(args: &ActionArgs, mut stdin: I) -> Result<ActionSource> {
    if let Some(b64) = &args.binary {
      let bytes = STANDARD.decode(b64.trim()).context("--binary is not base64")?;
      return Ok(ActionSource::Binary(bytes));
    }

    match args.document.as_deref() {
      Some("-") => {
        let mut buf = Vec::new();
        stdin.read_to_end(&mut buf).context("reading document from stdin")?;
        Ok(ActionSource::Document(buf))
      }
      Some(path) => {
        let buf = std::fs::read(path).with_context(|| format!("reading document {path}"))?;
        Ok(ActionSource::Document(buf))
      }
      None if args.id.is_some() => Ok(ActionSource::Document(b"{}".to_vec())),
      None => bail!("Provide --document, --binary or --id"),
    }
  }
}

fn summarize<R: ActionRequest>(source: ActionSource, fallback_id: Option<&str>) -> Result<Value> {
  let mut envelope = ActionEnvelope::<R>::new();

  let request = match &source {
    ActionSource::Document(bytes) => envelope.parse_document(bytes, fallback_id),
    ActionSource::Binary(bytes) => envelope.read_binary(bytes),
  }
  .with_context(|| format!("decoding {}", R::ACTION_NAME))?
  .clone();

  envelope.validate().with_context(|| format!("validating {}", R::ACTION_NAME))?;

  Ok(json!({
    "action": R::ACTION_NAME,
    "state": format!("{:?}", envelope.state()),
    "document": request.to_document(),
    "binary": STANDARD.encode(encode_binary(&request)?),
  }))
}
