use std::io::{Read, Write};

use serde_json::json;
use validator::Validate;

use super::document::parse_id_field;
use super::stream::{StreamInput, StreamOutput, Writeable};
use super::{ActionRequest, REPORT_DEFINITION_ID_FIELD};
use crate::errors::CodecError;
use crate::metrics::Metric;

/// Request to delete one stored report definition.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct DeleteReportDefinitionRequest {
  #[validate(length(min = 1))]
  pub report_definition_id: String,
}

impl DeleteReportDefinitionRequest {
  pub fn new(report_definition_id: impl Into<String>) -> Self {
    Self {
      report_definition_id: report_definition_id.into(),
    }
  }
}

impl Writeable for DeleteReportDefinitionRequest {
  fn write_to<W: Write>(&self, out: &mut StreamOutput<W>) -> Result<(), CodecError> {
    out.write_string(&self.report_definition_id)
  }
}

impl ActionRequest for DeleteReportDefinitionRequest {
  const ACTION_NAME: &'static str = "cluster:admin/opendistro/reports/definition/delete";

  fn read_from<R: Read>(input: &mut StreamInput<R>) -> Result<Self, CodecError> {
    Ok(Self::new(input.read_string()?))
  }

  fn parse(document: &[u8], fallback_id: Option<&str>) -> Result<Self, CodecError> {
    let id = parse_id_field(
      document,
      REPORT_DEFINITION_ID_FIELD,
      fallback_id,
      Metric::ReportDefinitionDeleteUserErrorInvalidReportDefId,
    )?;

    Ok(Self::new(id))
  }

  fn to_document(&self) -> serde_json::Value {
    json!({ REPORT_DEFINITION_ID_FIELD: self.report_definition_id })
  }
}
