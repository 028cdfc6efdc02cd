//! Handlers for `/research-links` — the section↔item join.
//!
//! Both endpoints take the pair in the JSON body, like the original surface:
//! `{"section_slug": "...", "research_item_id": "..."}`. Creation is an
//! upsert; removal of an absent link still answers ok.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use uppsats_core::{research::ResearchLink, store::ThesisStore};
use uppsats_render::docx::DocxConvert;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct LinkBody {
  pub section_slug:     Option<String>,
  pub research_item_id: Option<Uuid>,
}

impl LinkBody {
  fn into_pair(self) -> Result<(String, Uuid), ApiError> {
    match (self.section_slug, self.research_item_id) {
      (Some(slug), Some(id)) => Ok((slug, id)),
      _ => Err(ApiError::BadRequest(
        "missing section_slug or research_item_id".to_string(),
      )),
    }
  }
}

/// `POST /research-links`
pub async fn create<S, C>(
  State(state): State<ApiState<S, C>>,
  Json(body): Json<LinkBody>,
) -> Result<(StatusCode, Json<ResearchLink>), ApiError>
where
  S: ThesisStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert,
{
  let (slug, id) = body.into_pair()?;

  let link = state
    .store
    .link_research(&slug, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("section {slug:?} or research item {id} not found"))
    })?;

  Ok((StatusCode::CREATED, Json(link)))
}

/// `DELETE /research-links`
pub async fn remove<S, C>(
  State(state): State<ApiState<S, C>>,
  Json(body): Json<LinkBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ThesisStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert,
{
  let (slug, id) = body.into_pair()?;

  state
    .store
    .unlink_research(&slug, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(json!({ "ok": true })))
}
