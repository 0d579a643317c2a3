use metrics::counter;

/// Named user-error counters for scheduler actions, recorded through the `metrics` facade.
/// Installing a recorder and exporting is the host's job.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Metric {
  ReportDefinitionDeleteUserErrorInvalidReportDefId,
  ReportDefinitionDetailsUserErrorInvalidReportDefId,
}

impl Metric {
  pub fn name(&self) -> &'static str {
    match self {
      Metric::ReportDefinitionDeleteUserErrorInvalidReportDefId => {
        "report_definition.delete.user_error.invalid_report_def_id"
      }
      Metric::ReportDefinitionDetailsUserErrorInvalidReportDefId => {
        "report_definition.details.user_error.invalid_report_def_id"
      }
    }
  }

  pub fn increment(&self) {
    counter!(self.name()).increment(1);
  }
}

/// Run `f` under a thread-local debugging recorder and return its result with the
/// value each counter reached, keyed by name.
#[cfg(test)]
pub(crate) fn recorded<T>(f: impl FnOnce() -> T) -> (T, std::collections::HashMap<String, u64>) {
  use metrics_util::debugging::{DebugValue, DebuggingRecorder};

  let recorder = DebuggingRecorder::new();
  let snapshotter = recorder.snapshotter();
  let out = metrics::with_local_recorder(&recorder, f);

  let counters = snapshotter
    .snapshot()
    .into_vec()
    .into_iter()
    .filter_map(|(key, _, _, value)| match value {
      DebugValue::Counter(n) => Some((key.key().name().to_string(), n)),
      _ => None,
    })
    .collect();
  (out, counters)
}
