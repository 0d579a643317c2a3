// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Scheduler action requests: shared codec contract, concrete actions and their lifecycle
// role: scheduler/facade
// outputs: ActionRequest trait; encode_binary/decode_binary helpers; re-exported actions
// invariants: decode(encode(r)) == r and parse(to_document(r)) == r for every valid request
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod delete_report_definition;
pub mod document;
pub mod get_report_definition;
pub mod lifecycle;
pub mod stream;

use std::fmt::Debug;
use std::io::Read;

use validator::Validate;

use crate::errors::CodecError;
use stream::{StreamInput, StreamOutput, Writeable};

pub use delete_report_definition::DeleteReportDefinitionRequest;
pub use get_report_definition::GetReportDefinitionRequest;

/// Document member carrying the report definition id.
pub const REPORT_DEFINITION_ID_FIELD: &str = "reportDefinitionId";

/// A named scheduler action payload with a binary and a document form.
pub trait ActionRequest: Writeable + Validate + Debug + Clone + PartialEq + Sized {
  const ACTION_NAME: &'static str;

  fn read_from<R: Read>(input: &mut StreamInput<R>) -> Result<Self, CodecError>;

  /// Parse the document form; `fallback_id` stands in for an absent or empty id.
  fn parse(document: &[u8], fallback_id: Option<&str>) -> Result<Self, CodecError>;

  fn to_document(&self) -> serde_json::Value;
}

pub fn encode_binary<R: ActionRequest>(request: &R) -> Result<Vec<u8>, CodecError> {
  let mut out = StreamOutput::new(Vec::new());
  request.write_to(&mut out)?;

  Ok(out.into_inner())
}

/// Decode a whole buffer; bytes left after the request are an error.
pub fn decode_binary<R: ActionRequest>(bytes: &[u8]) -> Result<R, CodecError> {
  let mut input = StreamInput::new(bytes);
  let request = R::read_from(&mut input)?;

  match input.remaining()? {
    0 => Ok(request),
    n => Err(CodecError::TrailingBytes(n)),
  }
}
