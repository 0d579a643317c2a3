use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::dispatch::DEFAULT_KBN_VERSION;
use crate::model::ReportFormat;
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "dashboards-reporting",
    version,
    about = "Generate on-demand dashboard reports and decode scheduler action requests",
    long_about = None
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Command>,

  /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
  #[arg(short, long, action = ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Resolve the view's time range, request the report and save it
  Generate(ReportArgs),
  /// Print the generateReport request body without sending it
  Preview(ReportArgs),
  /// Decode, validate and re-encode a scheduler action request
  Action(ActionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
  /// Address of the view as shown by the host, e.g. /app/dashboards#/view/<id>?_g=(time:(from:now-15m,to:now))
  #[arg(long)]
  pub url: String,

  /// Report format
  #[arg(long, value_enum, default_value_t = ReportFormat::Pdf)]
  pub format: ReportFormat,

  /// Report name (defaults to "On_demand_report")
  #[arg(long)]
  pub name: Option<String>,

  /// Base URL of the dashboards host
  #[arg(long, default_value = "http://localhost:5601")]
  pub host: String,

  /// Value of the kbn-version header
  #[arg(long, default_value = DEFAULT_KBN_VERSION)]
  pub kbn_version: String,

  /// Directory the report file is written to
  #[arg(long, default_value = ".")]
  pub out_dir: PathBuf,

  /// Override the "now" instant for relative time expressions (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
  Delete,
  Get,
}

#[derive(Args, Debug, Clone)]
pub struct ActionArgs {
  /// Which scheduler action to decode
  #[arg(value_enum)]
  pub kind: ActionKind,

  /// JSON document to parse ("-" reads stdin)
  #[arg(long, conflicts_with = "binary")]
  pub document: Option<String>,

  /// Base64 of the binary stream form
  #[arg(long)]
  pub binary: Option<String>,

  /// Report definition id used when the document has none
  #[arg(long)]
  pub id: Option<String>,
}

pub const DEFAULT_REPORT_NAME: &str = "On_demand_report";

/// Normalized settings for one generate/preview run.
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
  pub url: String,
  pub format: ReportFormat,
  pub report_name: String,
  pub host: String,
  pub kbn_version: String,
  pub out_dir: PathBuf, // absolute path for stability
  #[serde(skip)]
  pub authorization: Option<String>,
  pub now: Option<DateTime<Utc>>,
}

pub fn normalize(args: ReportArgs) -> Result<EffectiveConfig> {
  let url = args.url.trim().to_string();
  if url.is_empty() {
    bail!("--url must not be empty");
  }

  let host = args.host.trim().trim_end_matches('/').to_string();
  if !(host.starts_with("http://") || host.starts_with("https://")) {
    bail!("--host must be an http(s) URL, got {:?}", args.host);
  }

  let now = util::parse_now_override(args.now_override.as_deref()).context("parsing --now-override")?;
  let report_name = args
    .name
    .filter(|n| !n.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string());

  Ok(EffectiveConfig {
    url,
    format: args.format,
    report_name,
    host,
    kbn_version: args.kbn_version,
    out_dir: util::canonicalize_lossy(&args.out_dir),
    authorization: util::basic_auth_header(),
    now,
  })
}
