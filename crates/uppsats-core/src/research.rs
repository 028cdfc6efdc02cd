//! Research items — bibliographic source records.
//!
//! Items are linked to sections through a join entity with at most one link
//! per (section, item) pair. The reference list is derived from these links
//! at render time; nothing about the bibliography is stored pre-formatted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Provenance ──────────────────────────────────────────────────────────────

/// How a research item entered the library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
  /// Typed in by the user directly.
  #[default]
  Manual,
  /// Imported from an external literature-search provider.
  Imported {
    /// Provider identifier, e.g. "semantic-scholar" or "openalex".
    provider: String,
  },
}

// ─── ResearchItem ────────────────────────────────────────────────────────────

/// A bibliographic source record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchItem {
  pub item_id:    Uuid,
  pub title:      String,
  /// Free-text authors string, e.g. "Andersson, E. & Berg, L.".
  pub authors:    String,
  pub year:       Option<i32>,
  pub url:        Option<String>,
  pub doi:        Option<String>,
  #[serde(rename = "abstract")]
  pub abstract_text: String,
  /// Cached AI summary, if one has been generated.
  pub summary:    Option<String>,
  /// Free-text keyword list.
  pub keywords:   String,
  pub notes:      String,
  pub provenance: Provenance,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::ThesisStore::add_research_item`].
/// `item_id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewResearchItem {
  pub title:         String,
  pub authors:       String,
  pub year:          Option<i32>,
  pub url:           Option<String>,
  pub doi:           Option<String>,
  pub abstract_text: String,
  pub keywords:      String,
  pub notes:         String,
  pub provenance:    Provenance,
}

impl NewResearchItem {
  /// Convenience constructor with everything but the title defaulted.
  pub fn new(title: impl Into<String>) -> Self {
    Self {
      title:         title.into(),
      authors:       String::new(),
      year:          None,
      url:           None,
      doi:           None,
      abstract_text: String::new(),
      keywords:      String::new(),
      notes:         String::new(),
      provenance:    Provenance::Manual,
    }
  }
}

/// Partial update to a research item. Outer `None` leaves the field
/// unchanged; for the nullable fields, `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct ResearchPatch {
  pub title:         Option<String>,
  pub authors:       Option<String>,
  pub year:          Option<Option<i32>>,
  pub url:           Option<Option<String>>,
  pub doi:           Option<Option<String>>,
  pub abstract_text: Option<String>,
  pub summary:       Option<String>,
  pub keywords:      Option<String>,
  pub notes:         Option<String>,
}

// ─── Links ───────────────────────────────────────────────────────────────────

/// Join entity between a section and a research item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchLink {
  pub section_slug:     String,
  pub research_item_id: Uuid,
  pub created_at:       DateTime<Utc>,
}

// ─── Render-time projections ─────────────────────────────────────────────────

/// The subset of a research item the export pipeline reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRef {
  pub item_id: Uuid,
  pub title:   String,
  pub authors: String,
  pub year:    Option<i32>,
  pub url:     Option<String>,
  pub doi:     Option<String>,
}

impl From<&ResearchItem> for ResearchRef {
  fn from(item: &ResearchItem) -> Self {
    Self {
      item_id: item.item_id,
      title:   item.title.clone(),
      authors: item.authors.clone(),
      year:    item.year,
      url:     item.url.clone(),
      doi:     item.doi.clone(),
    }
  }
}

/// A section together with the research items linked to it, in the shape the
/// content loader hands to the export pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionWithResearch {
  pub section:  crate::section::Section,
  pub research: Vec<ResearchRef>,
}
