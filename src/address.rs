// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Tokenize the host application's address: locate the rison `time:(from:..,to:..)` group and rewrite its values
// role: address/tokenizer
// inputs: address string (path + fragment as shown by the host)
// outputs: TimeSegment with byte spans of the from/to values; rewritten canonical address; base URL; saved search id
// invariants:
// - the last `time:` marker is used
// - discover/visualize views close the group at the first `))` after the marker, all other views at the last `))`
// - spans always point into the original address, so rewriting never shifts unrelated text
// errors: MalformedAddress when the marker, the closing bound, or either member is missing
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ResolveError;

const TIME_MARKER: &str = "time:";
const GROUP_CLOSE: &str = "))";
const FROM_KEY: &str = "from";
const TO_KEY: &str = "to";

/// Address families that disagree on where the time group ends.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ViewKind {
  Dashboard,
  DiscoverOrVisualize,
}

impl ViewKind {
  pub fn of(address: &str) -> ViewKind {
    if address.contains("visualize") || address.contains("discover") {
      ViewKind::DiscoverOrVisualize
    } else {
      ViewKind::Dashboard
    }
  }
}

/// One `key:value` member of the time group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeMember {
  /// Byte range of the raw value inside the address.
  pub span: Range<usize>,
  /// Percent-decoded value with quote characters stripped.
  pub text: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeSegment {
  pub view: ViewKind,
  pub from: TimeMember,
  pub to: TimeMember,
}

/// Find the `from`/`to` members of the time group in `address`.
pub fn locate_time_segment(address: &str) -> Result<TimeSegment, ResolveError> {
  let marker = address
    .rfind(TIME_MARKER)
    .ok_or_else(|| ResolveError::MalformedAddress("no time: marker in address".into()))?;
  let body_start = marker + TIME_MARKER.len();
  let view = ViewKind::of(address);

  let close = match view {
    ViewKind::Dashboard => address.rfind(GROUP_CLOSE).filter(|&idx| idx >= body_start),
    ViewKind::DiscoverOrVisualize => address[body_start..].find(GROUP_CLOSE).map(|idx| idx + body_start),
  }
  .ok_or_else(|| ResolveError::MalformedAddress("time group is never closed".into()))?;

  // Keep the first `)` of the closing pair: it is the time group's own closing paren.
  let window = &address[body_start..=close];
  let group = window
    .strip_prefix('(')
    .ok_or_else(|| ResolveError::MalformedAddress("time: is not followed by a group".into()))?;

  let members = scan_members(group, body_start + 1);
  let find = |key: &str| -> Result<TimeMember, ResolveError> {
    members
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, span)| TimeMember {
        span: span.clone(),
        text: unquote(&address[span.clone()]),
      })
      .ok_or_else(|| ResolveError::MalformedAddress(format!("time group has no {key}: member")))
  };

  Ok(TimeSegment {
    view,
    from: find(FROM_KEY)?,
    to: find(TO_KEY)?,
  })
}

/// Replace the from/to values with quoted absolute instants.
pub fn rewrite_time_values(address: &str, segment: &TimeSegment, from_iso: &str, to_iso: &str) -> String {
  let mut edits = [(&segment.from.span, from_iso), (&segment.to.span, to_iso)];
  edits.sort_by_key(|(span, _)| span.start);

  let mut out = String::with_capacity(address.len() + from_iso.len() + to_iso.len());
  let mut cursor = 0;

  for (span, value) in edits {
    out.push_str(&address[cursor..span.start]);
    out.push('\'');
    out.push_str(value);
    out.push('\'');
    cursor = span.end;
  }
  out.push_str(&address[cursor..]);

  out
}

/// The address up to (not including) its query-string separator.
pub fn base_url(address: &str) -> &str {
  match address.find('?') {
    Some(idx) => &address[..idx],
    None => address,
  }
}

/// The saved search id of a discover address: the UUID immediately followed by `?`.
pub fn saved_search_id_from_address(address: &str) -> Option<String> {
  static RE_SAVED_SEARCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})\?").unwrap()
  });

  RE_SAVED_SEARCH
    .captures(address)
    .and_then(|c| c.get(1))
    .map(|m| m.as_str().to_string())
}

/// Split a rison group body into `(key, value span)` pairs, stopping at the group's own `)`.
fn scan_members(group: &str, offset: usize) -> Vec<(String, Range<usize>)> {
  let mut members = Vec::new();
  let mut depth = 0usize;
  let mut in_quote = false;
  let mut escaped = false;
  let mut start = 0;
  let mut end = group.len();

  for (idx, ch) in group.char_indices() {
    if in_quote {
      if escaped {
        escaped = false;
      } else if ch == '!' {
        escaped = true;
      } else if ch == '\'' {
        in_quote = false;
      }
      continue;
    }

    match ch {
      '\'' => in_quote = true,
      '(' => depth += 1,
      ')' if depth == 0 => {
        end = idx;
        break;
      }
      ')' => depth -= 1,
      ',' if depth == 0 => {
        push_member(&mut members, group, start..idx, offset);
        start = idx + 1;
      }
      _ => {}
    }
  }
  push_member(&mut members, group, start..end, offset);

  members
}

fn push_member(members: &mut Vec<(String, Range<usize>)>, group: &str, raw: Range<usize>, offset: usize) {
  let text = &group[raw.clone()];

  if let Some(colon) = text.find(':') {
    let key = text[..colon].trim().to_string();
    let value_start = raw.start + colon + 1;
    members.push((key, offset + value_start..offset + raw.end));
  }
}

fn unquote(raw: &str) -> String {
  let decoded = urlencoding::decode(raw)
    .map(|cow| cow.into_owned())
    .unwrap_or_else(|_| raw.to_string());

  decoded.replace('\'', "")
}
