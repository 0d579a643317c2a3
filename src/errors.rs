// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed error taxonomy for address resolution, dispatch, action codecs and the action lifecycle
// role: errors
// outputs: ResolveError, DispatchError, CodecError, ActionError
// invariants: PermissionDenied is never folded into GenerationFailed; Structural is distinct from MissingRequiredField
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

use crate::scheduler::lifecycle::RequestState;

/// Failures while turning a host address into an absolute time range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
  #[error("malformed address: {0}")]
  MalformedAddress(String),

  #[error("invalid time expression {expression:?}: {reason}")]
  InvalidTimeExpression { expression: String, reason: String },
}

impl ResolveError {
  pub(crate) fn invalid(expression: &str, reason: impl Into<String>) -> Self {
    ResolveError::InvalidTimeExpression {
      expression: expression.to_string(),
      reason: reason.into(),
    }
  }
}

/// Terminal failures of one report-generation dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
  #[error("permission denied by the reporting backend")]
  PermissionDenied,

  #[error("report generation failed with status {status}")]
  GenerationFailed { status: u16 },

  #[error("transport error: {0}")]
  Transport(String),

  #[error("encoding request body: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("invalid generation response: {0}")]
  InvalidResponse(String),

  #[error("writing report file: {0}")]
  Delivery(#[from] std::io::Error),
}

/// Failures of the binary and document codecs for scheduler action requests.
#[derive(Debug, Error)]
pub enum CodecError {
  /// The document is not shaped like a request at all (e.g. not a JSON object).
  #[error("structural parse failure: {0}")]
  Structural(String),

  #[error("{0} field absent")]
  MissingRequiredField(&'static str),

  #[error("variable-length integer exceeds 32 bits")]
  VIntOverflow,

  #[error("stream string is not valid UTF-8")]
  InvalidUtf8,

  #[error("{0} trailing bytes after request")]
  TrailingBytes(usize),

  #[error("stream io: {0}")]
  Io(#[from] std::io::Error),
}

/// Failures surfaced while driving an action request through its lifecycle.
#[derive(Debug, Error)]
pub enum ActionError {
  #[error(transparent)]
  Codec(#[from] CodecError),

  #[error("validation failed: {0}")]
  Validation(#[from] validator::ValidationErrors),

  #[error("illegal lifecycle transition {from:?} -> {to:?}")]
  IllegalTransition { from: RequestState, to: RequestState },

  #[error("command execution failed: {0}")]
  Execution(anyhow::Error),
}
