// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Decode a generation payload and write it to the output directory as a downloadable file
// role: delivery/io
// inputs: GenerateReportResponse, ReportFormat, output directory
// outputs: DeliveredFile describing what was written
// side_effects: creates the output directory and writes one file
// invariants: file names never contain ':' or path separators; the format extension is always present
// errors: InvalidResponse for undecodable base64; Delivery for IO failures
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::errors::DispatchError;
use crate::model::{DeliveredFile, GenerateReportResponse, ReportFormat};

/// Make a backend-supplied name safe to use as a local file name.
pub fn sanitize_filename(raw: &str, format: ReportFormat) -> String {
  let cleaned: String = raw
    .trim()
    .chars()
    .map(|c| match c {
      ':' | '/' | '\\' => '_',
      c if c.is_control() => '_',
      c => c,
    })
    .collect();

  let ext = format.extension();
  if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
    return format!("report.{ext}");
  }

  let suffix = format!(".{ext}");
  if cleaned.to_ascii_lowercase().ends_with(&suffix) {
    cleaned
  } else {
    format!("{cleaned}{suffix}")
  }
}

/// Turn the response `data` into file bytes.
pub fn decode_payload(data: &str, format: ReportFormat) -> Result<Vec<u8>, DispatchError> {
  if !format.is_binary() {
    return Ok(data.as_bytes().to_vec());
  }

  let encoded = match data.find(";base64,") {
    Some(idx) if data.starts_with("data:") => &data[idx + ";base64,".len()..],
    _ => data,
  };
  let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();

  STANDARD
    .decode(compact.as_bytes())
    .map_err(|e| DispatchError::InvalidResponse(format!("payload is not base64: {e}")))
}

/// Write a successful generation response under `out_dir`.
pub async fn deliver(
  response: &GenerateReportResponse,
  format: ReportFormat,
  out_dir: &Path,
) -> Result<DeliveredFile, DispatchError> {
  let bytes = decode_payload(&response.data, format)?;
  let filename = sanitize_filename(&response.filename, format);
  let path = out_dir.join(&filename);

  tokio::fs::create_dir_all(out_dir).await?;
  tokio::fs::write(&path, &bytes).await?;

  tracing::info!(path = %path.display(), bytes = bytes.len(), "report delivered");

  Ok(DeliveredFile {
    path,
    filename,
    format,
    bytes: bytes.len(),
  })
}
