//! Handlers for `/research` endpoints — the source library.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/research` | Optional `?section=<slug>` filter |
//! | `POST`   | `/research` | 201 with the created item |
//! | `GET`    | `/research/:id` | 404 if unknown |
//! | `PATCH`  | `/research/:id` | Nullable fields clear on explicit `null` |
//! | `DELETE` | `/research/:id` | Cascades the item's links |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use uppsats_core::{
  research::{NewResearchItem, Provenance, ResearchItem, ResearchPatch},
  store::ThesisStore,
};
use uppsats_render::docx::DocxConvert;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// Distinguishes an absent field from an explicit `null` in a PATCH body:
/// absent deserializes to `None` via `#[serde(default)]`, `null` to
/// `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Deserialize::deserialize(deserializer).map(Some)
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub section: Option<String>,
}

/// `GET /research[?section=<slug>]`
pub async fn list<S, C>(
  State(state): State<ApiState<S, C>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ResearchItem>>, ApiError>
where
  S: ThesisStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert,
{
  let items = state
    .store
    .list_research_items(params.section.as_deref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(items))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(default)]
  pub title:    String,
  #[serde(default)]
  pub authors:  String,
  pub year:     Option<i32>,
  pub url:      Option<String>,
  pub doi:      Option<String>,
  #[serde(default, rename = "abstract")]
  pub abstract_text: String,
  #[serde(default)]
  pub keywords: String,
  #[serde(default)]
  pub notes:    String,
  /// "manual" (default) or a search-provider identifier.
  pub source:   Option<String>,
}

/// `POST /research`
pub async fn create<S, C>(
  State(state): State<ApiState<S, C>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ThesisStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert,
{
  if body.title.is_empty() {
    return Err(ApiError::BadRequest("title is required".to_string()));
  }

  let provenance = match body.source.as_deref() {
    None | Some("manual") => Provenance::Manual,
    Some(provider) => Provenance::Imported { provider: provider.to_string() },
  };

  let item = state
    .store
    .add_research_item(NewResearchItem {
      title:         body.title,
      authors:       body.authors,
      year:          body.year,
      url:           body.url,
      doi:           body.doi,
      abstract_text: body.abstract_text,
      keywords:      body.keywords,
      notes:         body.notes,
      provenance,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(item)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /research/:id`
pub async fn get_one<S, C>(
  State(state): State<ApiState<S, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ResearchItem>, ApiError>
where
  S: ThesisStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert,
{
  let item = state
    .store
    .get_research_item(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("research item {id} not found")))?;
  Ok(Json(item))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  pub title:    Option<String>,
  pub authors:  Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub year:     Option<Option<i32>>,
  #[serde(default, deserialize_with = "double_option")]
  pub url:      Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub doi:      Option<Option<String>>,
  #[serde(rename = "abstract")]
  pub abstract_text: Option<String>,
  pub summary:  Option<String>,
  pub keywords: Option<String>,
  pub notes:    Option<String>,
}

/// `PATCH /research/:id`
pub async fn update<S, C>(
  State(state): State<ApiState<S, C>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<ResearchItem>, ApiError>
where
  S: ThesisStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert,
{
  let patch = ResearchPatch {
    title:         body.title,
    authors:       body.authors,
    year:          body.year,
    url:           body.url,
    doi:           body.doi,
    abstract_text: body.abstract_text,
    summary:       body.summary,
    keywords:      body.keywords,
    notes:         body.notes,
  };

  let item = state
    .store
    .update_research_item(id, patch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("research item {id} not found")))?;
  Ok(Json(item))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /research/:id`
pub async fn delete_one<S, C>(
  State(state): State<ApiState<S, C>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ThesisStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert,
{
  let deleted = state
    .store
    .delete_research_item(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if !deleted {
    return Err(ApiError::NotFound(format!("research item {id} not found")));
  }

  Ok(Json(json!({ "ok": true })))
}
