//! `GET /preview` — the assembled document as JSON.
//!
//! Runs the full pipeline (load → process) and returns the structured
//! result: sanitized per-section bodies, footnote lists, and the generated
//! reference entries. The HTML print page built from the same result lives
//! in the server crate.

use axum::{Json, extract::State};
use uppsats_core::store::ThesisStore;
use uppsats_render::{docx::DocxConvert, document::{render_document, RenderedDocument}};

use crate::{ApiState, error::ApiError};

/// `GET /preview`
pub async fn handler<S, C>(
  State(state): State<ApiState<S, C>>,
) -> Result<Json<RenderedDocument>, ApiError>
where
  S: ThesisStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert,
{
  let sections = state
    .store
    .sections_with_research()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let document = render_document(&sections)?;
  Ok(Json(document))
}
