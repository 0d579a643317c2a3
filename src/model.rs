// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the JSON model of the on-demand report request, the generation response and the delivered file
// role: model/types
// outputs: Serializable structs with the backend's wire field names
// invariants: Field names match the generateReport endpoint; report_source serializes "" when unknown; extras never shadow reserved core params
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::time_range::TimeRange;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum ReportFormat {
  Pdf,
  Png,
  Csv,
}

impl ReportFormat {
  pub fn extension(&self) -> &'static str {
    match self {
      ReportFormat::Pdf => "pdf",
      ReportFormat::Png => "png",
      ReportFormat::Csv => "csv",
    }
  }

  /// Binary formats travel base64-encoded; csv travels as text.
  pub fn is_binary(&self) -> bool {
    !matches!(self, ReportFormat::Csv)
  }
}

impl fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.extension())
  }
}

/// Kind of view a report was generated from.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SourceKind {
  Dashboard,
  Visualization,
  SavedSearch,
}

impl SourceKind {
  pub fn label(&self) -> &'static str {
    match self {
      SourceKind::Dashboard => "Dashboard",
      SourceKind::Visualization => "Visualization",
      SourceKind::SavedSearch => "Saved search",
    }
  }

  pub fn from_label(label: &str) -> Option<SourceKind> {
    [SourceKind::Dashboard, SourceKind::Visualization, SourceKind::SavedSearch]
      .into_iter()
      .find(|k| k.label() == label)
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportRequest {
  pub query_url: String,
  #[serde(flatten)]
  pub time_range: TimeRange,
  pub report_definition: ReportDefinition,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportDefinition {
  pub report_params: ReportParams,
  pub delivery: Delivery,
  pub trigger: Trigger,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportParams {
  pub report_name: String,
  #[serde(with = "source_kind_label")]
  pub report_source: Option<SourceKind>,
  pub description: String,
  pub core_params: CoreParams,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CoreParams {
  pub base_url: String,
  pub report_format: ReportFormat,
  pub time_duration: String,
  #[serde(flatten)]
  pub extras: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Delivery {
  pub delivery_type: DeliveryType,
  pub delivery_params: DeliveryParams,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum DeliveryType {
  #[serde(rename = "Kibana user")]
  KibanaUser,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct DeliveryParams {
  pub kibana_recipients: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Trigger {
  pub trigger_type: TriggerType,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum TriggerType {
  #[serde(rename = "On demand")]
  OnDemand,
}

/// Success body of the generateReport endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerateReportResponse {
  pub data: String,
  pub filename: String,
}

/// A report written to local storage.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DeliveredFile {
  pub path: PathBuf,
  pub filename: String,
  pub format: ReportFormat,
  pub bytes: usize,
}

mod source_kind_label {
  use serde::{Deserialize, Deserializer, Serializer};

  use super::SourceKind;

  pub fn serialize<S: Serializer>(kind: &Option<SourceKind>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(kind.map(|k| k.label()).unwrap_or(""))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<SourceKind>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(SourceKind::from_label(&raw))
  }
}
