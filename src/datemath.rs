// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Parse relative date expressions (now-15m, now/d, 2020-01-01||+1M, ISO literals) into absolute UTC instants
// role: time/grammar
// inputs: expression text, explicit `now`, rounding direction
// outputs: DateTime<Utc> truncated to millisecond precision
// invariants:
// - `now` is always an explicit input; nothing reads the wall clock here
// - output precision is milliseconds so ISO rendering and re-parsing are lossless
// - rounding down snaps to the start of the unit, rounding up to the last millisecond of the unit
// errors: InvalidTimeExpression naming the offending expression
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{
  DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, TimeDelta, TimeZone,
  Timelike, Utc,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ResolveError;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Unit {
  Year,
  Month,
  Week,
  Day,
  Hour,
  Minute,
  Second,
  Millisecond,
}

impl Unit {
  fn parse(token: &str) -> Option<Unit> {
    match token {
      "y" => Some(Unit::Year),
      "M" => Some(Unit::Month),
      "w" => Some(Unit::Week),
      "d" => Some(Unit::Day),
      "h" | "H" => Some(Unit::Hour),
      "m" => Some(Unit::Minute),
      "s" => Some(Unit::Second),
      "ms" => Some(Unit::Millisecond),
      _ => None,
    }
  }
}

/// Which end of a unit `/unit` snaps to.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Rounding {
  Down,
  Up,
}

const ANCHOR_NOW: &str = "now";
const ANCHOR_SEPARATOR: &str = "||";

/// Parse `expression` relative to `now`.
pub fn parse(expression: &str, now: DateTime<Utc>, rounding: Rounding) -> Result<DateTime<Utc>, ResolveError> {
  let text = expression.trim();

  if text.is_empty() {
    return Err(ResolveError::invalid(expression, "empty expression"));
  }

  let (anchor, math) = if let Some(rest) = text.strip_prefix(ANCHOR_NOW) {
    (now, rest)
  } else if let Some(idx) = text.find(ANCHOR_SEPARATOR) {
    (parse_literal(&text[..idx])?, &text[idx + ANCHOR_SEPARATOR.len()..])
  } else {
    return parse_literal(text).map(|dt| dt.trunc_subsecs(3));
  };

  apply_math(anchor, math, rounding, expression).map(|dt| dt.trunc_subsecs(3))
}

/// Render an instant the way browsers render `Date#toISOString`.
pub fn format_iso(instant: DateTime<Utc>) -> String {
  instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn apply_math(
  anchor: DateTime<Utc>,
  math: &str,
  rounding: Rounding,
  expression: &str,
) -> Result<DateTime<Utc>, ResolveError> {
  static RE_OP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?P<round>/)|(?P<sign>[+-])(?P<num>\d*))(?P<unit>ms|[yMwdhHms])").unwrap());

  let mut current = anchor;
  let mut rest = math;

  while !rest.is_empty() {
    let caps = RE_OP
      .captures(rest)
      .ok_or_else(|| ResolveError::invalid(expression, format!("unexpected date math at {rest:?}")))?;

    let unit = caps
      .name("unit")
      .and_then(|m| Unit::parse(m.as_str()))
      .ok_or_else(|| ResolveError::invalid(expression, "unknown unit"))?;

    current = if caps.name("round").is_some() {
      match rounding {
        Rounding::Down => start_of(current, unit),
        Rounding::Up => end_of(current, unit),
      }
      .ok_or_else(|| ResolveError::invalid(expression, "rounding out of range"))?
    } else {
      let digits = caps.name("num").map(|m| m.as_str()).unwrap_or("");
      let magnitude: i64 = if digits.is_empty() {
        1
      } else {
        digits
          .parse()
          .map_err(|_| ResolveError::invalid(expression, "offset is too large"))?
      };
      let amount = if caps.name("sign").map(|m| m.as_str()) == Some("-") {
        -magnitude
      } else {
        magnitude
      };

      shift(current, amount, unit).ok_or_else(|| ResolveError::invalid(expression, "offset out of range"))?
    };

    rest = &rest[caps.get(0).map(|m| m.end()).unwrap_or(rest.len())..];
  }

  Ok(current)
}

fn parse_literal(text: &str) -> Result<DateTime<Utc>, ResolveError> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
    return Ok(dt.with_timezone(&Utc));
  }

  for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
      return Ok(Utc.from_utc_datetime(&naive));
    }
  }

  if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
    if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
      return Ok(Utc.from_utc_datetime(&midnight));
    }
  }

  // Bare digits are epoch milliseconds.
  if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
    if let Some(dt) = text.parse::<i64>().ok().and_then(|ms| Utc.timestamp_millis_opt(ms).single()) {
      return Ok(dt);
    }
  }

  Err(ResolveError::invalid(text, "unrecognized date literal"))
}

fn shift(instant: DateTime<Utc>, amount: i64, unit: Unit) -> Option<DateTime<Utc>> {
  let delta = match unit {
    Unit::Year => return add_months(instant, amount.checked_mul(12)?),
    Unit::Month => return add_months(instant, amount),
    Unit::Week => TimeDelta::try_weeks(amount)?,
    Unit::Day => TimeDelta::try_days(amount)?,
    Unit::Hour => TimeDelta::try_hours(amount)?,
    Unit::Minute => TimeDelta::try_minutes(amount)?,
    Unit::Second => TimeDelta::try_seconds(amount)?,
    Unit::Millisecond => TimeDelta::try_milliseconds(amount)?,
  };

  instant.checked_add_signed(delta)
}

fn add_months(instant: DateTime<Utc>, months: i64) -> Option<DateTime<Utc>> {
  let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);

  if months >= 0 {
    instant.checked_add_months(magnitude)
  } else {
    instant.checked_sub_months(magnitude)
  }
}

/// Start of the unit containing `instant`. Weeks start on Monday.
fn start_of(instant: DateTime<Utc>, unit: Unit) -> Option<DateTime<Utc>> {
  let naive = instant.naive_utc();
  let date = naive.date();
  let (h, m, s) = (naive.hour(), naive.minute(), naive.second());

  let floored = match unit {
    Unit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_hms_opt(0, 0, 0)?,
    Unit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.and_hms_opt(0, 0, 0)?,
    Unit::Week => {
      let back = u64::from(date.weekday().num_days_from_monday());
      date.checked_sub_days(Days::new(back))?.and_hms_opt(0, 0, 0)?
    }
    Unit::Day => date.and_hms_opt(0, 0, 0)?,
    Unit::Hour => date.and_hms_opt(h, 0, 0)?,
    Unit::Minute => date.and_hms_opt(h, m, 0)?,
    Unit::Second => date.and_hms_opt(h, m, s)?,
    Unit::Millisecond => date.and_hms_milli_opt(h, m, s, (naive.nanosecond() / 1_000_000).min(999))?,
  };

  Some(Utc.from_utc_datetime(&floored))
}

/// Last millisecond of the unit containing `instant`.
fn end_of(instant: DateTime<Utc>, unit: Unit) -> Option<DateTime<Utc>> {
  let next = shift(start_of(instant, unit)?, 1, unit)?;
  next.checked_sub_signed(TimeDelta::try_milliseconds(1)?)
}
