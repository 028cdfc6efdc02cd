//! Section — one fixed chapter of the thesis document.
//!
//! Sections are seeded once from [`THESIS_OUTLINE`] and are never created or
//! deleted at runtime. Only their content and status change, driven by the
//! section editor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a section, ordered from untouched to finished.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SectionStatus {
  #[default]
  NotStarted,
  InProgress,
  Draft,
  Review,
  Done,
}

impl SectionStatus {
  /// Progress weight used by the overview aggregation.
  pub fn weight(self) -> f64 {
    match self {
      Self::NotStarted => 0.0,
      Self::InProgress => 0.25,
      Self::Draft => 0.5,
      Self::Review => 0.75,
      Self::Done => 1.0,
    }
  }
}

/// A thesis section. The slug is the primary key; `sort_order` is a total
/// order with no ties and defines document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
  pub slug:       String,
  pub title:      String,
  pub sort_order: u32,
  pub status:     SectionStatus,
  /// Rich-text HTML body. May embed footnote markers and is sanitized
  /// before every render.
  pub content:    String,
  pub updated_at: DateTime<Utc>,
}

/// Partial update to a section. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct SectionPatch {
  pub content: Option<String>,
  pub status:  Option<SectionStatus>,
}

impl SectionPatch {
  pub fn is_empty(&self) -> bool {
    self.content.is_none() && self.status.is_none()
  }
}

/// A section together with its research-link count, as listed on the
/// dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSummary {
  pub section:             Section,
  pub research_link_count: u64,
}

// ─── Seed outline ────────────────────────────────────────────────────────────

/// The fixed thesis outline, seeded into the store on first open.
/// Sort order is the slice position plus one.
pub const THESIS_OUTLINE: &[(&str, &str)] = &[
  ("inledning", "Inledning"),
  ("bakgrund", "Bakgrund / Tidigare forskning"),
  ("teoretisk-referensram", "Teoretisk referensram"),
  ("syfte-fragestallningar", "Syfte och frågeställningar"),
  ("metod", "Metod"),
  ("resultat", "Resultat"),
  ("analys", "Analys"),
  ("diskussion", "Diskussion"),
  ("slutsats", "Slutsats"),
  ("referenslista", "Referenslista"),
];

/// Slug of the auto-generated reference list. Excluded from the body loop
/// at render time and regenerated from the linked research items.
pub const REFERENCE_SECTION_SLUG: &str = "referenslista";

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_round_trips_through_strings() {
    for status in [
      SectionStatus::NotStarted,
      SectionStatus::InProgress,
      SectionStatus::Draft,
      SectionStatus::Review,
      SectionStatus::Done,
    ] {
      let s = status.to_string();
      assert_eq!(s.parse::<SectionStatus>().unwrap(), status);
    }
  }

  #[test]
  fn unknown_status_string_fails_to_parse() {
    assert!("finished".parse::<SectionStatus>().is_err());
  }

  #[test]
  fn weights_are_monotonic() {
    let weights: Vec<f64> = [
      SectionStatus::NotStarted,
      SectionStatus::InProgress,
      SectionStatus::Draft,
      SectionStatus::Review,
      SectionStatus::Done,
    ]
    .iter()
    .map(|s| s.weight())
    .collect();
    assert!(weights.windows(2).all(|w| w[0] < w[1]));
  }

  #[test]
  fn outline_has_unique_slugs_and_ends_with_references() {
    let slugs: std::collections::HashSet<_> =
      THESIS_OUTLINE.iter().map(|(slug, _)| slug).collect();
    assert_eq!(slugs.len(), THESIS_OUTLINE.len());
    assert_eq!(THESIS_OUTLINE.last().unwrap().0, REFERENCE_SECTION_SLUG);
  }
}
