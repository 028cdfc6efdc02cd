//! `GET /overview` — the dashboard aggregate.
//!
//! Sections and the library count are independent reads with no shared
//! state, so they are fetched in parallel. A failure in one fetch is logged
//! and replaced by an empty default instead of aborting the other.

use axum::{Json, extract::State};
use serde::Serialize;
use uppsats_core::{section::SectionSummary, store::ThesisStore};
use uppsats_render::docx::DocxConvert;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct Overview {
  pub sections:       Vec<SectionSummary>,
  pub total_research: u64,
  /// Mean of the section status weights, in `[0, 1]`.
  pub progress:       f64,
}

/// `GET /overview`
pub async fn handler<S, C>(
  State(state): State<ApiState<S, C>>,
) -> Result<Json<Overview>, ApiError>
where
  S: ThesisStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert,
{
  let (sections_result, count_result) = tokio::join!(
    state.store.list_sections_with_counts(),
    state.store.count_research_items(),
  );

  let sections = sections_result.unwrap_or_else(|e| {
    tracing::warn!(error = %e, "overview: section fetch failed");
    Vec::new()
  });
  let total_research = count_result.unwrap_or_else(|e| {
    tracing::warn!(error = %e, "overview: research count failed");
    0
  });

  let progress = if sections.is_empty() {
    0.0
  } else {
    sections
      .iter()
      .map(|summary| summary.section.status.weight())
      .sum::<f64>()
      / sections.len() as f64
  };

  Ok(Json(Overview { sections, total_research, progress }))
}
