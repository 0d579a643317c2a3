// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Send an on-demand report request to the reporting backend and deliver the result as a file
// role: dispatch/orchestration
// inputs: ReportRequest; DispatchTarget (host, kbn-version, credentials); output directory
// outputs: DeliveredFile on success; DispatchError otherwise
// side_effects: HTTP POST via the Transport seam; one file write on success; notifier events
// invariants:
// - progress is shown when send() is called, before the returned future is polled
// - every outcome clears progress and then emits exactly one notification
// - 403 maps to PermissionDenied and never writes a file
// errors: PermissionDenied, GenerationFailed{status}, Transport, InvalidResponse, Delivery
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::future::Future;
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::delivery;
use crate::errors::DispatchError;
use crate::model::{DeliveredFile, GenerateReportResponse, ReportRequest};
use crate::notify::{Notification, Notifier};

pub const GENERATE_REPORT_PATH: &str = "/api/reporting/generateReport";
pub const DEFAULT_KBN_VERSION: &str = "7.9.1";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportRequest {
  pub url: String,
  pub headers: Vec<(String, String)>,
  pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
  pub status: u16,
  pub body: Vec<u8>,
}

// --- Trait seam for the reporting backend ---
#[async_trait]
pub trait Transport: Send + Sync {
  async fn post(&self, request: TransportRequest) -> Result<TransportResponse, DispatchError>;
}

/// Blocking ureq client driven from the tokio blocking pool.
#[derive(Debug, Default)]
pub struct HttpTransport;

#[async_trait]
impl Transport for HttpTransport {
  async fn post(&self, request: TransportRequest) -> Result<TransportResponse, DispatchError> {
    tokio::task::spawn_blocking(move || post_blocking(&request))
      .await
      .map_err(|e| DispatchError::Transport(format!("request task failed: {e}")))?
  }
}

fn post_blocking(request: &TransportRequest) -> Result<TransportResponse, DispatchError> {
  let agent = ureq::AgentBuilder::new().build();
  let mut call = agent.post(&request.url);

  for (name, value) in &request.headers {
    call = call.set(name, value);
  }

  let response = match call.send_string(&request.body) {
    Ok(r) => r,
    Err(ureq::Error::Status(_, r)) => r,
    Err(ureq::Error::Transport(t)) => return Err(DispatchError::Transport(t.to_string())),
  };

  let status = response.status();
  let mut body = Vec::new();
  response
    .into_reader()
    .read_to_end(&mut body)
    .map_err(|e| DispatchError::Transport(format!("reading response body: {e}")))?;

  Ok(TransportResponse { status, body })
}

/// Answers every request with one canned response and records what it was sent.
#[derive(Debug)]
pub struct StaticTransport {
  status: u16,
  body: Vec<u8>,
  seen: Mutex<Vec<TransportRequest>>,
}

impl StaticTransport {
  pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
    Self {
      status,
      body: body.into(),
      seen: Mutex::new(Vec::new()),
    }
  }

  pub fn requests(&self) -> Vec<TransportRequest> {
    self.seen.lock().map(|s| s.clone()).unwrap_or_default()
  }
}

#[async_trait]
impl Transport for StaticTransport {
  async fn post(&self, request: TransportRequest) -> Result<TransportResponse, DispatchError> {
    if let Ok(mut seen) = self.seen.lock() {
      seen.push(request);
    }

    Ok(TransportResponse {
      status: self.status,
      body: self.body.clone(),
    })
  }
}

/// Fixture transport driven by `DR_TEST_*` environment variables.
struct EnvTransport;

#[async_trait]
impl Transport for EnvTransport {
  async fn post(&self, _request: TransportRequest) -> Result<TransportResponse, DispatchError> {
    if let Ok(reason) = std::env::var("DR_TEST_TRANSPORT_ERROR") {
      return Err(DispatchError::Transport(reason));
    }

    let status = std::env::var("DR_TEST_GENERATE_STATUS")
      .ok()
      .and_then(|s| s.trim().parse::<u16>().ok())
      .unwrap_or(200);
    let body = std::env::var("DR_TEST_GENERATE_RESPONSE").unwrap_or_default();

    Ok(TransportResponse {
      status,
      body: body.into_bytes(),
    })
  }
}

fn env_wants_mock() -> bool {
  ["DR_TEST_GENERATE_STATUS", "DR_TEST_GENERATE_RESPONSE", "DR_TEST_TRANSPORT_ERROR"]
    .iter()
    .any(|k| std::env::var(k).is_ok())
}

/// The fixture transport when `DR_TEST_*` variables are set, otherwise HTTP.
pub fn build_transport() -> Arc<dyn Transport> {
  if env_wants_mock() {
    tracing::debug!("using env fixture transport");
    Arc::new(EnvTransport)
  } else {
    Arc::new(HttpTransport)
  }
}

/// Where and as whom reports are generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchTarget {
  pub host: String,
  pub kbn_version: String,
  pub authorization: Option<String>,
}

impl DispatchTarget {
  pub fn new(host: impl Into<String>) -> Self {
    Self {
      host: host.into(),
      kbn_version: DEFAULT_KBN_VERSION.to_string(),
      authorization: None,
    }
  }

  pub fn endpoint(&self) -> String {
    format!("{}{}", self.host.trim_end_matches('/'), GENERATE_REPORT_PATH)
  }

  fn headers(&self) -> Vec<(String, String)> {
    let mut headers = vec![
      ("Content-Type".to_string(), "application/json".to_string()),
      ("kbn-version".to_string(), self.kbn_version.clone()),
      ("accept".to_string(), "*/*".to_string()),
    ];
    if let Some(auth) = &self.authorization {
      headers.push(("Authorization".to_string(), auth.clone()));
    }

    headers
  }
}

pub struct Dispatcher {
  transport: Arc<dyn Transport>,
  notifier: Arc<dyn Notifier>,
  target: DispatchTarget,
  out_dir: PathBuf,
}

impl Dispatcher {
  pub fn new(
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    target: DispatchTarget,
    out_dir: impl Into<PathBuf>,
  ) -> Self {
    Self {
      transport,
      notifier,
      target,
      out_dir: out_dir.into(),
    }
  }

  /// Start generating `request`. The progress indicator is raised immediately; the
  /// returned future clears it and emits the outcome notification when it settles.
  pub fn send<'a>(
    &'a self,
    request: &'a ReportRequest,
  ) -> impl Future<Output = Result<DeliveredFile, DispatchError>> + Send + 'a {
    self.notifier.show_progress();

    async move {
      let outcome = self.generate(request).await;

      self.notifier.clear_progress();
      self.notifier.notify(Notification::from_outcome(&outcome));

      outcome
    }
  }

  async fn generate(&self, request: &ReportRequest) -> Result<DeliveredFile, DispatchError> {
    let format = request.report_definition.report_params.core_params.report_format;
    let body = serde_json::to_string(request)?;

    let response = self
      .transport
      .post(TransportRequest {
        url: self.target.endpoint(),
        headers: self.target.headers(),
        body,
      })
      .await?;

    match response.status {
      200 => {
        let parsed: GenerateReportResponse = serde_json::from_slice(&response.body)
          .map_err(|e| DispatchError::InvalidResponse(format!("generation body: {e}")))?;
        delivery::deliver(&parsed, format, &self.out_dir).await
      }
      403 => {
        tracing::warn!(endpoint = %self.target.endpoint(), "report generation refused");
        Err(DispatchError::PermissionDenied)
      }
      status => {
        tracing::warn!(status, "report generation failed");
        Err(DispatchError::GenerationFailed { status })
      }
    }
  }
}
