//! Handlers for `/sections` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/sections` | Ordered, with research-link counts |
//! | `GET`   | `/sections/:slug` | 404 if unknown |
//! | `PATCH` | `/sections/:slug` | Body: `{"content"?, "status"?}` |
//!
//! A PATCH with an unrecognised status string silently drops that field, the
//! same way the section editor's autosave does; if nothing valid remains the
//! request is a 400.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use uppsats_core::{
  section::{Section, SectionPatch, SectionStatus, SectionSummary},
  store::ThesisStore,
};
use uppsats_render::docx::DocxConvert;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /sections`
pub async fn list<S, C>(
  State(state): State<ApiState<S, C>>,
) -> Result<Json<Vec<SectionSummary>>, ApiError>
where
  S: ThesisStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert,
{
  let sections = state
    .store
    .list_sections_with_counts()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(sections))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /sections/:slug`
pub async fn get_one<S, C>(
  State(state): State<ApiState<S, C>>,
  Path(slug): Path<String>,
) -> Result<Json<Section>, ApiError>
where
  S: ThesisStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert,
{
  let section = state
    .store
    .get_section(&slug)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("section {slug:?} not found")))?;
  Ok(Json(section))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub content: Option<String>,
  pub status:  Option<String>,
}

/// `PATCH /sections/:slug` — body: `{"content"?, "status"?}`
pub async fn update<S, C>(
  State(state): State<ApiState<S, C>>,
  Path(slug): Path<String>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Section>, ApiError>
where
  S: ThesisStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert,
{
  let patch = SectionPatch {
    content: body.content,
    status:  body
      .status
      .as_deref()
      .and_then(|s| s.parse::<SectionStatus>().ok()),
  };

  if patch.is_empty() {
    return Err(ApiError::BadRequest("no valid fields".to_string()));
  }

  let section = state
    .store
    .update_section(&slug, patch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("section {slug:?} not found")))?;
  Ok(Json(section))
}
