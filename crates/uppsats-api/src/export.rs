//! `POST /export-docx` — the server-side export path.
//!
//! Takes the rendered document markup from the client, re-sanitizes it (the
//! sanitizer runs on every path that handles user-authored HTML), wraps it
//! in a full document, and hands it to the conversion backend. A backend
//! failure surfaces as a failed export with no partial payload.

use axum::{
  Json,
  extract::State,
  http::header,
  response::IntoResponse,
};
use serde::Deserialize;
use uppsats_core::store::ThesisStore;
use uppsats_render::{
  docx::{wrap_document, DocxConvert, DocxOptions, DOCX_CONTENT_TYPE, DOCX_FILENAME},
  sanitize::Sanitizer,
};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ExportBody {
  #[serde(default)]
  pub html: String,
}

/// `POST /export-docx` — body: `{"html": "<h2>…</h2>…"}`
pub async fn handler<S, C>(
  State(state): State<ApiState<S, C>>,
  Json(body): Json<ExportBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ThesisStore,
  C: DocxConvert,
  C::Error: std::error::Error + Send + Sync + 'static,
{
  if body.html.is_empty() {
    return Err(ApiError::BadRequest("HTML content is required".to_string()));
  }

  let clean = Sanitizer::new().clean(&body.html);
  let document = wrap_document(&clean);

  let bytes = state
    .converter
    .convert(&document, &DocxOptions::default())
    .await
    .map_err(|e| ApiError::Convert(Box::new(e)))?;

  let headers = [
    (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
    (
      header::CONTENT_DISPOSITION,
      format!("attachment; filename=\"{DOCX_FILENAME}\""),
    ),
  ];

  Ok((headers, bytes))
}
