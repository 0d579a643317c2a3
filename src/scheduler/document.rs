// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Forward-compatible JSON document decoding for scheduler action requests
// role: scheduler/document
// inputs: raw JSON bytes; the recognized field name; optional fallback value
// outputs: the recognized field's value as text
// invariants:
// - the document must be a JSON object; anything else is a structural failure
// - unknown members are skipped whole and logged, never rejected
// - an empty value counts as absent
// errors: Structural for malformed documents; MissingRequiredField when neither document nor fallback supply the field
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

use crate::errors::CodecError;
use crate::metrics::Metric;

/// Walks one JSON object, keeping the value of `field` and skipping everything else.
struct FieldSeed {
  field: &'static str,
}

impl<'de> DeserializeSeed<'de> for FieldSeed {
  type Value = Option<String>;

  fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
    deserializer.deserialize_map(FieldVisitor { field: self.field })
  }
}

struct FieldVisitor {
  field: &'static str,
}

impl<'de> Visitor<'de> for FieldVisitor {
  type Value = Option<String>;

  fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("a JSON object")
  }

  fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
    let mut found = None;

    while let Some(key) = map.next_key::<String>()? {
      if key == self.field {
        found = map.next_value::<ScalarText>()?.0;
      } else {
        map.next_value::<IgnoredAny>()?;
        tracing::info!(field = %key, "Skipping unknown field");
      }
    }

    Ok(found)
  }
}

/// A scalar member read as text; `null` reads as absent.
struct ScalarText(Option<String>);

impl<'de> Deserialize<'de> for ScalarText {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
      type Value = ScalarText;

      fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number or boolean")
      }

      fn visit_str<E: de::Error>(self, v: &str) -> Result<ScalarText, E> {
        Ok(ScalarText(Some(v.to_string())))
      }

      fn visit_string<E: de::Error>(self, v: String) -> Result<ScalarText, E> {
        Ok(ScalarText(Some(v)))
      }

      fn visit_i64<E: de::Error>(self, v: i64) -> Result<ScalarText, E> {
        Ok(ScalarText(Some(v.to_string())))
      }

      fn visit_u64<E: de::Error>(self, v: u64) -> Result<ScalarText, E> {
        Ok(ScalarText(Some(v.to_string())))
      }

      fn visit_f64<E: de::Error>(self, v: f64) -> Result<ScalarText, E> {
        Ok(ScalarText(Some(v.to_string())))
      }

      fn visit_bool<E: de::Error>(self, v: bool) -> Result<ScalarText, E> {
        Ok(ScalarText(Some(v.to_string())))
      }

      fn visit_unit<E: de::Error>(self) -> Result<ScalarText, E> {
        Ok(ScalarText(None))
      }
    }

    deserializer.deserialize_any(TextVisitor)
  }
}

/// Read the single required id member of an action document.
///
/// The document's value wins when present and non-empty, then `fallback`. When both are
/// missing, `metric` is incremented before `MissingRequiredField` is returned.
pub fn parse_id_field(
  document: &[u8],
  field: &'static str,
  fallback: Option<&str>,
  metric: Metric,
) -> Result<String, CodecError> {
  let mut de = serde_json::Deserializer::from_slice(document);
  let parsed = FieldSeed { field }
    .deserialize(&mut de)
    .and_then(|v| de.end().map(|_| v))
    .map_err(|e| CodecError::Structural(e.to_string()))?;

  match parsed.filter(|s| !s.is_empty()) {
    Some(v) => Ok(v),
    None => match fallback.filter(|s| !s.is_empty()) {
      Some(v) => Ok(v.to_string()),
      None => {
        metric.increment();
        tracing::debug!(field, metric = metric.name(), "required field absent");
        Err(CodecError::MissingRequiredField(field))
      }
    },
  }
}
