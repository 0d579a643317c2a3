use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::address;
use crate::datemath::{self, Rounding};
use crate::errors::ResolveError;

// Time-range types and resolution live here; the tokenizer and grammar are in `address` and `datemath`.

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct TimeRange {
  #[serde(rename = "time_from", with = "chrono::serde::ts_milliseconds")]
  pub from: DateTime<Utc>,
  #[serde(rename = "time_to", with = "chrono::serde::ts_milliseconds")]
  pub to: DateTime<Utc>,
  /// Display-only ISO-8601 duration, e.g. `PT15M`.
  #[serde(skip)]
  pub duration_label: String,
}

impl TimeRange {
  pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<TimeRange, ResolveError> {
    if from > to {
      return Err(ResolveError::invalid(
        &format!("{}..{}", datemath::format_iso(from), datemath::format_iso(to)),
        "range starts after it ends",
      ));
    }

    Ok(TimeRange {
      from,
      to,
      duration_label: iso_duration(to - from),
    })
  }

  pub fn duration(&self) -> TimeDelta {
    self.to - self.from
  }
}

/// A resolved host address: the absolute range plus the address rewritten to carry it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedAddress {
  pub time_range: TimeRange,
  pub canonical_url: String,
}

/// Resolve the relative time group embedded in `address` against `now`.
///
/// `from` rounds down and `to` rounds up, so `now/d` on both ends covers the whole day.
pub fn resolve(address: &str, now: DateTime<Utc>) -> Result<ResolvedAddress, ResolveError> {
  let segment = address::locate_time_segment(address)?;

  let from = datemath::parse(&segment.from.text, now, Rounding::Down)?;
  let to = datemath::parse(&segment.to.text, now, Rounding::Up)?;
  let time_range = TimeRange::new(from, to)?;

  let canonical_url =
    address::rewrite_time_values(address, &segment, &datemath::format_iso(from), &datemath::format_iso(to));

  tracing::debug!(
    from = %segment.from.text,
    to = %segment.to.text,
    view = ?segment.view,
    duration = %time_range.duration_label,
    "resolved time range"
  );

  Ok(ResolvedAddress {
    time_range,
    canonical_url,
  })
}

/// Render a non-negative duration as ISO-8601 (`P1DT2H`, `PT15M`, `PT0.5S`, `PT0S`).
pub fn iso_duration(delta: TimeDelta) -> String {
  let total_ms = delta.num_milliseconds().unsigned_abs();

  if total_ms == 0 {
    return "PT0S".to_string();
  }

  let days = total_ms / 86_400_000;
  let hours = total_ms / 3_600_000 % 24;
  let minutes = total_ms / 60_000 % 60;
  let seconds = total_ms / 1_000 % 60;
  let millis = total_ms % 1_000;

  let mut out = String::from("P");
  if days > 0 {
    out.push_str(&format!("{days}D"));
  }

  if hours > 0 || minutes > 0 || seconds > 0 || millis > 0 {
    out.push('T');
    if hours > 0 {
      out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
      out.push_str(&format!("{minutes}M"));
    }
    if millis > 0 {
      let fraction = format!("{millis:03}");
      out.push_str(&format!("{seconds}.{}S", fraction.trim_end_matches('0')));
    } else if seconds > 0 {
      out.push_str(&format!("{seconds}S"));
    }
  }

  out
}
