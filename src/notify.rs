// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Host UI touchpoints of a dispatch: the progress indicator and the one terminal notification
// role: notify/seam
// outputs: Notification values; console and recording Notifier implementations
// invariants: implementations are Send + Sync so concurrent dispatches can share one notifier
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::sync::Mutex;

use crate::errors::DispatchError;
use crate::model::DeliveredFile;

/// Terminal outcome shown to the user once a dispatch settles.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notification {
  Success { filename: String },
  PermissionDenied,
  Failure { reason: String },
}

impl Notification {
  pub fn from_outcome(outcome: &Result<DeliveredFile, DispatchError>) -> Notification {
    match outcome {
      Ok(file) => Notification::Success {
        filename: file.filename.clone(),
      },
      Err(DispatchError::PermissionDenied) => Notification::PermissionDenied,
      Err(e) => Notification::Failure { reason: e.to_string() },
    }
  }

  pub fn title(&self) -> &'static str {
    match self {
      Notification::Success { .. } => "Successfully generated report",
      Notification::PermissionDenied => "Permission denied",
      Notification::Failure { .. } => "Download error",
    }
  }

  pub fn message(&self) -> String {
    match self {
      Notification::Success { filename } => format!("{filename} is ready in the output directory."),
      Notification::PermissionDenied => "You do not have permission to generate reports for this view.".to_string(),
      Notification::Failure { .. } => "There was an error generating this report.".to_string(),
    }
  }
}

pub trait Notifier: Send + Sync {
  fn show_progress(&self);
  fn clear_progress(&self);
  fn notify(&self, notification: Notification);
}

/// Writes progress and notifications to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
  pub quiet: bool,
}

impl Notifier for ConsoleNotifier {
  fn show_progress(&self) {
    if !self.quiet {
      let _ = writeln!(std::io::stderr(), "Generating report...");
    }
  }

  fn clear_progress(&self) {}

  fn notify(&self, notification: Notification) {
    let mut err = std::io::stderr();
    let _ = writeln!(err, "{}: {}", notification.title(), notification.message());

    if let Notification::Failure { reason } = &notification {
      tracing::warn!(%reason, "report generation failed");
    }
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UiEvent {
  ProgressShown,
  ProgressCleared,
  Notified(Notification),
}

/// Records every UI event in order; used by tests and headless hosts.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
  events: Mutex<Vec<UiEvent>>,
}

impl RecordingNotifier {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn events(&self) -> Vec<UiEvent> {
    self.events.lock().map(|e| e.clone()).unwrap_or_default()
  }

  pub fn notifications(&self) -> Vec<Notification> {
    self
      .events()
      .into_iter()
      .filter_map(|e| match e {
        UiEvent::Notified(n) => Some(n),
        _ => None,
      })
      .collect()
  }

  fn push(&self, event: UiEvent) {
    if let Ok(mut events) = self.events.lock() {
      events.push(event);
    }
  }
}

impl Notifier for RecordingNotifier {
  fn show_progress(&self) {
    self.push(UiEvent::ProgressShown);
  }

  fn clear_progress(&self) {
    self.push(UiEvent::ProgressCleared);
  }

  fn notify(&self, notification: Notification) {
    self.push(UiEvent::Notified(notification));
  }
}
