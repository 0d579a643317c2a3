// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for paths, the effective clock, basic credentials and man page rendering
// role: utilities/helpers
// inputs: Various primitives; DateTime; paths; clap CommandFactory
// outputs: Canonicalized paths, the effective UTC now, Authorization header values, man page text
// invariants:
// - effective_now never consults the wall clock when an override is given
// - basic_auth_header is None unless a username is set
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::CommandFactory;

pub const USERNAME_ENV: &str = "DASHBOARDS_USERNAME";
pub const PASSWORD_ENV: &str = "DASHBOARDS_PASSWORD";

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> PathBuf {
  let p = p.as_ref();
  match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  }
}

/// Parse the hidden `--now-override` value (RFC3339, or a naive timestamp read as UTC).
pub fn parse_now_override(raw: Option<&str>) -> anyhow::Result<Option<DateTime<Utc>>> {
  let Some(raw) = raw else { return Ok(None) };

  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(Some(dt.with_timezone(&Utc)));
  }
  match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
    Ok(ndt) => Ok(Some(ndt.and_utc())),
    Err(_) => anyhow::bail!("--now-override must be RFC3339, got {raw:?}"),
  }
}

/// Returns the effective "now": the override when given, otherwise the current UTC time.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}

/// Basic credentials from `DASHBOARDS_USERNAME` / `DASHBOARDS_PASSWORD`.
pub fn basic_auth_header() -> Option<String> {
  let user = std::env::var(USERNAME_ENV).ok().filter(|u| !u.trim().is_empty())?;
  let pass = std::env::var(PASSWORD_ENV).unwrap_or_default();

  Some(format!("Basic {}", STANDARD.encode(format!("{user}:{pass}"))))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
