//! Reference-list builder.
//!
//! Collects every research item linked to any section, deduplicated by item
//! id, and orders the result the way a Swedish reference list reads: authors
//! under sv collation, then publication year ascending. An item with no year
//! sorts after every dated item by the same authors; two undated items keep
//! their encounter order (the sort is stable, nothing stronger is promised).

use std::cmp::Ordering;
use std::collections::HashSet;

use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;

use uppsats_core::research::{ResearchRef, SectionWithResearch};

use crate::{Error, Result};

/// Sorts and formats reference entries. Holds the sv collator.
pub struct ReferenceSorter {
  collator: Collator,
}

impl ReferenceSorter {
  pub fn new() -> Result<Self> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);

    let collator = Collator::try_new(&locale!("sv").into(), options)
      .map_err(|e| Error::Collator(e.to_string()))?;

    Ok(Self { collator })
  }

  /// One entry per distinct linked item, ordered for the reference list.
  ///
  /// Deduplication keeps the first encounter (document order), which is what
  /// makes the subsequent stable sort idempotent across runs.
  pub fn collect_references(
    &self,
    sections: &[SectionWithResearch],
  ) -> Vec<ResearchRef> {
    let mut seen = HashSet::new();
    let mut references = Vec::new();

    for with_research in sections {
      for reference in &with_research.research {
        if seen.insert(reference.item_id) {
          references.push(reference.clone());
        }
      }
    }

    references.sort_by(|a, b| {
      self
        .collator
        .compare(&a.authors, &b.authors)
        .then_with(|| year_order(a.year, b.year))
    });

    references
  }
}

/// Year ascending; a missing year never outranks a present one.
fn year_order(a: Option<i32>, b: Option<i32>) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => a.cmp(&b),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

/// Format one Harvard-style citation: non-empty fields joined by single
/// spaces, in the order authors, "(year)", emphasized title. The DOI is
/// appended separately by the assembler.
pub fn format_harvard(reference: &ResearchRef) -> String {
  let mut parts: Vec<String> = Vec::new();

  if !reference.authors.is_empty() {
    parts.push(reference.authors.clone());
  }
  if let Some(year) = reference.year {
    parts.push(format!("({year})"));
  }
  if !reference.title.is_empty() {
    parts.push(format!("<em>{}</em>", reference.title));
  }

  parts.join(" ")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use uppsats_core::section::{Section, SectionStatus};
  use uuid::Uuid;

  fn reference(authors: &str, year: Option<i32>) -> ResearchRef {
    ResearchRef {
      item_id: Uuid::new_v4(),
      title:   "Titel".to_string(),
      authors: authors.to_string(),
      year,
      url:     None,
      doi:     None,
    }
  }

  fn section_with(slug: &str, sort_order: u32, research: Vec<ResearchRef>) -> SectionWithResearch {
    SectionWithResearch {
      section: Section {
        slug:       slug.to_string(),
        title:      slug.to_string(),
        sort_order,
        status:     SectionStatus::NotStarted,
        content:    String::new(),
        updated_at: Utc::now(),
      },
      research,
    }
  }

  #[test]
  fn deduplicates_by_item_id_across_sections() {
    let shared = reference("Andersson, E.", Some(2020));
    let sections = vec![
      section_with("a", 1, vec![shared.clone()]),
      section_with("b", 2, vec![shared.clone()]),
      section_with("c", 3, vec![shared.clone()]),
    ];

    let sorter = ReferenceSorter::new().unwrap();
    let refs   = sorter.collect_references(&sections);
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].item_id, shared.item_id);
  }

  #[test]
  fn same_title_different_items_are_both_kept() {
    let a = reference("Andersson, E.", Some(2020));
    let b = reference("Andersson, E.", Some(2021));
    let sections = vec![section_with("a", 1, vec![a, b])];

    let sorter = ReferenceSorter::new().unwrap();
    assert_eq!(sorter.collect_references(&sections).len(), 2);
  }

  #[test]
  fn orders_by_authors_with_swedish_collation() {
    let sections = vec![section_with(
      "a",
      1,
      vec![
        reference("Öberg, L.", Some(2019)),
        reference("Zetterberg, K.", Some(2018)),
        reference("Andersson, E.", Some(2020)),
      ],
    )];

    let sorter = ReferenceSorter::new().unwrap();
    let refs   = sorter.collect_references(&sections);
    let authors: Vec<&str> = refs.iter().map(|r| r.authors.as_str()).collect();

    // Swedish alphabet: … x y z å ä ö.
    assert_eq!(authors, ["Andersson, E.", "Zetterberg, K.", "Öberg, L."]);
  }

  #[test]
  fn years_sort_ascending_within_author() {
    let sections = vec![section_with(
      "a",
      1,
      vec![
        reference("Andersson, E.", Some(2021)),
        reference("Andersson, E.", Some(2018)),
      ],
    )];

    let sorter = ReferenceSorter::new().unwrap();
    let refs   = sorter.collect_references(&sections);
    assert_eq!(refs[0].year, Some(2018));
    assert_eq!(refs[1].year, Some(2021));
  }

  #[test]
  fn missing_year_sorts_after_dated_entries() {
    let sections = vec![section_with(
      "a",
      1,
      vec![
        reference("Andersson, E.", None),
        reference("Andersson, E.", Some(2020)),
      ],
    )];

    let sorter = ReferenceSorter::new().unwrap();
    let refs   = sorter.collect_references(&sections);
    assert_eq!(refs[0].year, Some(2020));
    assert_eq!(refs[1].year, None);
  }

  #[test]
  fn ordering_is_idempotent() {
    let sections = vec![section_with(
      "a",
      1,
      vec![
        reference("Berg, L.", None),
        reference("Berg, L.", None),
        reference("Andersson, E.", Some(1999)),
      ],
    )];

    let sorter = ReferenceSorter::new().unwrap();
    let first  = sorter.collect_references(&sections);
    let second = sorter.collect_references(&sections);
    let first_ids:  Vec<_> = first.iter().map(|r| r.item_id).collect();
    let second_ids: Vec<_> = second.iter().map(|r| r.item_id).collect();
    assert_eq!(first_ids, second_ids);
  }

  // ── Formatting ──────────────────────────────────────────────────────────────

  #[test]
  fn full_reference_formats_all_parts() {
    let mut r = reference("Andersson, E.", Some(2020));
    r.title = "Skolans digitalisering".to_string();
    assert_eq!(
      format_harvard(&r),
      "Andersson, E. (2020) <em>Skolans digitalisering</em>"
    );
  }

  #[test]
  fn missing_fields_leave_no_double_spaces() {
    let mut r = reference("", None);
    r.title = "Anonym rapport".to_string();
    assert_eq!(format_harvard(&r), "<em>Anonym rapport</em>");

    let r = ResearchRef {
      item_id: Uuid::new_v4(),
      title:   String::new(),
      authors: "Berg, L.".to_string(),
      year:    Some(2001),
      url:     None,
      doi:     None,
    };
    assert_eq!(format_harvard(&r), "Berg, L. (2001)");
  }
}
