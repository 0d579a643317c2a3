use std::collections::BTreeMap;

use serde_json::Value;

use crate::address;
use crate::model::{
  CoreParams, Delivery, DeliveryParams, DeliveryType, ReportDefinition, ReportFormat, ReportParams, ReportRequest,
  SourceKind, Trigger, TriggerType,
};
use crate::time_range::TimeRange;

pub const REPORT_DESCRIPTION: &str = "In-context report download";
pub const SAVED_SEARCH_ID: &str = "saved_search_id";

const RESERVED_CORE_KEYS: [&str; 3] = ["base_url", "report_format", "time_duration"];

/// Caller-supplied context for one on-demand report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportContext {
  pub report_name: String,
  pub extras: BTreeMap<String, Value>,
}

impl ReportContext {
  pub fn named(name: impl Into<String>) -> Self {
    ReportContext {
      report_name: name.into(),
      extras: BTreeMap::new(),
    }
  }

  pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.extras.insert(key.into(), value.into());
    self
  }
}

/// Classify a base URL; the first matching fragment wins.
pub fn source_kind_for(base_url: &str) -> Option<SourceKind> {
  if base_url.contains("dashboard") {
    Some(SourceKind::Dashboard)
  } else if base_url.contains("visualize") || base_url.contains("visualization") {
    Some(SourceKind::Visualization)
  } else if base_url.contains("discover") {
    Some(SourceKind::SavedSearch)
  } else {
    None
  }
}

/// Assemble the on-demand request body. Pure: same inputs, same request.
pub fn build_report_request(
  time_range: &TimeRange,
  query_url: &str,
  format: ReportFormat,
  context: &ReportContext,
) -> ReportRequest {
  let base_url = address::base_url(query_url).to_string();
  let report_source = source_kind_for(&base_url);

  let keep_saved_search = format == ReportFormat::Csv && report_source == Some(SourceKind::SavedSearch);
  let extras: BTreeMap<String, Value> = context
    .extras
    .iter()
    .filter(|(k, _)| !RESERVED_CORE_KEYS.contains(&k.as_str()))
    .filter(|(k, _)| keep_saved_search || k.as_str() != SAVED_SEARCH_ID)
    .map(|(k, v)| (k.clone(), v.clone()))
    .collect();

  tracing::debug!(
    base_url = %base_url,
    source = report_source.map(|s| s.label()).unwrap_or(""),
    format = %format,
    extras = extras.len(),
    "built report request"
  );

  ReportRequest {
    query_url: query_url.to_string(),
    time_range: time_range.clone(),
    report_definition: ReportDefinition {
      report_params: ReportParams {
        report_name: context.report_name.clone(),
        report_source,
        description: REPORT_DESCRIPTION.to_string(),
        core_params: CoreParams {
          base_url,
          report_format: format,
          time_duration: time_range.duration_label.clone(),
          extras,
        },
      },
      delivery: Delivery {
        delivery_type: DeliveryType::KibanaUser,
        delivery_params: DeliveryParams::default(),
      },
      trigger: Trigger {
        trigger_type: TriggerType::OnDemand,
      },
    },
  }
}
