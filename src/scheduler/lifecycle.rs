// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drive one scheduler action request through decode, validation and execution
// role: scheduler/lifecycle
// inputs: document or binary bytes; a CommandExecutor for the action
// outputs: the executor's output
// invariants:
// - Unparsed -> Parsed -> Validated -> Executed, or -> Rejected from any non-terminal state
// - states never move backwards; Executed and Rejected are terminal
// errors: Codec/Validation (the request becomes Rejected), IllegalTransition, Execution
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use validator::Validate;

use super::{decode_binary, ActionRequest};
use crate::errors::{ActionError, CodecError};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RequestState {
  Unparsed,
  Parsed,
  Validated,
  Executed,
  Rejected,
}

impl RequestState {
  fn allows(self, next: RequestState) -> bool {
    use RequestState::*;

    matches!(
      (self, next),
      (Unparsed, Parsed) | (Parsed, Validated) | (Validated, Executed) | (Unparsed | Parsed | Validated, Rejected)
    )
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, RequestState::Executed | RequestState::Rejected)
  }
}

/// Persistence side of an action; implemented by the host service.
pub trait CommandExecutor<R: ActionRequest> {
  type Output;

  fn execute(&self, request: &R) -> anyhow::Result<Self::Output>;
}

/// One request and the lifecycle state it has reached.
#[derive(Debug)]
pub struct ActionEnvelope<R: ActionRequest> {
  state: RequestState,
  request: Option<R>,
}

impl<R: ActionRequest> Default for ActionEnvelope<R> {
  fn default() -> Self {
    Self::new()
  }
}

impl<R: ActionRequest> ActionEnvelope<R> {
  pub fn new() -> Self {
    Self {
      state: RequestState::Unparsed,
      request: None,
    }
  }

  pub fn state(&self) -> RequestState {
    self.state
  }

  pub fn request(&self) -> Option<&R> {
    self.request.as_ref()
  }

  pub fn parse_document(&mut self, document: &[u8], fallback_id: Option<&str>) -> Result<&R, ActionError> {
    self.decode_with(|| R::parse(document, fallback_id))
  }

  pub fn read_binary(&mut self, bytes: &[u8]) -> Result<&R, ActionError> {
    self.decode_with(|| decode_binary::<R>(bytes))
  }

  pub fn validate(&mut self) -> Result<(), ActionError> {
    self.check(RequestState::Validated)?;
    let outcome = match &self.request {
      Some(request) => request.validate(),
      None => Ok(()),
    };

    match outcome {
      Ok(()) => {
        self.state = RequestState::Validated;
        Ok(())
      }
      Err(errors) => {
        self.state = RequestState::Rejected;
        tracing::info!(action = R::ACTION_NAME, %errors, "request rejected by validation");
        Err(errors.into())
      }
    }
  }

  pub fn execute<E: CommandExecutor<R>>(&mut self, executor: &E) -> Result<E::Output, ActionError> {
    self.check(RequestState::Executed)?;
    self.state = RequestState::Executed;

    let request = self.request.as_ref().ok_or(ActionError::IllegalTransition {
      from: RequestState::Unparsed,
      to: RequestState::Executed,
    })?;

    tracing::debug!(action = R::ACTION_NAME, "executing request");
    executor.execute(request).map_err(ActionError::Execution)
  }

  fn decode_with<F>(&mut self, decode: F) -> Result<&R, ActionError>
  where
    F: FnOnce() -> Result<R, CodecError>,
  {
    self.check(RequestState::Parsed)?;

    match decode() {
      Ok(request) => {
        self.state = RequestState::Parsed;
        Ok(&*self.request.insert(request))
      }
      Err(e) => {
        self.state = RequestState::Rejected;
        Err(e.into())
      }
    }
  }

  fn check(&self, next: RequestState) -> Result<(), ActionError> {
    if self.state.allows(next) {
      Ok(())
    } else {
      Err(ActionError::IllegalTransition {
        from: self.state,
        to: next,
      })
    }
  }
}
