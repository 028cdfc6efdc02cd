//! Document assembly — one pass that feeds every output form.
//!
//! Takes the loader's ordered sections, renumbers footnotes continuously
//! across section boundaries, sanitizes every body, and appends the generated
//! reference list. The resulting [`RenderedDocument`] carries both the
//! structured pieces (for JSON clients) and the combined body markup (for the
//! print page and the DOCX export).

use serde::Serialize;
use uuid::Uuid;

use uppsats_core::{
  research::SectionWithResearch,
  section::REFERENCE_SECTION_SLUG,
};

use crate::{
  footnote::{renumber, Footnote},
  reference::{format_harvard, ReferenceSorter},
  sanitize::Sanitizer,
  Result,
};

/// Placeholder shown for a section that has no content yet.
const EMPTY_SECTION_PLACEHOLDER: &str = "Inget innehåll ännu.";

/// Heading title of the generated reference section.
const REFERENCE_SECTION_TITLE: &str = "Referenslista";

// ─── Output types ────────────────────────────────────────────────────────────

/// One rendered body section.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedSection {
  pub slug:           String,
  pub title:          String,
  /// The number shown in the heading; identical to the stored sort order.
  pub heading_number: u32,
  /// Sanitized body with footnote markers replaced by sequential numbers.
  /// Empty when the section has no content yet.
  pub body_html:      String,
  /// Footnotes for this section, in marker order.
  pub footnotes:      Vec<Footnote>,
  /// The sequence number of this section's first footnote.
  pub footnote_start: u32,
}

/// One formatted entry in the generated reference list.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceEntry {
  pub item_id:       Uuid,
  /// Sanitized citation markup, e.g. `Andersson, E. (2020) <em>…</em>`.
  pub citation_html: String,
  pub doi:           Option<String>,
}

/// The fully assembled document.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocument {
  pub sections:                 Vec<RenderedSection>,
  pub references:               Vec<ReferenceEntry>,
  /// One past the last real section's heading number.
  pub reference_heading_number: u32,
  /// The combined `<article>` markup all output forms share.
  pub body_html:                String,
}

// ─── Assembly ────────────────────────────────────────────────────────────────

/// Run the full processing stage over loader output.
///
/// `sections` must already be in ascending sort order (the loader guarantees
/// this); the assembler never reorders them. The stored reference-list
/// section is skipped and regenerated from the linked research items.
pub fn render_document(
  sections: &[SectionWithResearch],
) -> Result<RenderedDocument> {
  let sanitizer = Sanitizer::new();
  let sorter    = ReferenceSorter::new()?;

  let collected = sorter.collect_references(sections);

  let mut rendered       = Vec::new();
  let mut counter        = 1u32;
  let mut last_real_sort = 0u32;

  for with_research in sections {
    let section = &with_research.section;
    if section.slug == REFERENCE_SECTION_SLUG {
      continue;
    }
    last_real_sort = last_real_sort.max(section.sort_order);

    let footnote_start = counter;
    let (body_html, footnotes) = if section.content.is_empty() {
      (String::new(), Vec::new())
    } else {
      let out = renumber(&section.content, counter)?;
      counter = out.next_number;
      (sanitizer.clean(&out.html), out.footnotes)
    };

    rendered.push(RenderedSection {
      slug: section.slug.clone(),
      title: section.title.clone(),
      heading_number: section.sort_order,
      body_html,
      footnotes,
      footnote_start,
    });
  }

  let references: Vec<ReferenceEntry> = collected
    .iter()
    .map(|reference| ReferenceEntry {
      item_id:       reference.item_id,
      citation_html: sanitizer.clean(&format_harvard(reference)),
      doi:           reference.doi.clone(),
    })
    .collect();

  let reference_heading_number = last_real_sort + 1;
  let body_html = write_body(&rendered, &references, reference_heading_number);

  Ok(RenderedDocument {
    sections: rendered,
    references,
    reference_heading_number,
    body_html,
  })
}

/// Serialize the assembled document as one `<article>` body.
fn write_body(
  sections: &[RenderedSection],
  references: &[ReferenceEntry],
  reference_heading_number: u32,
) -> String {
  let mut out = String::new();

  for (idx, section) in sections.iter().enumerate() {
    if idx > 0 {
      out.push_str("<hr class=\"section-divider\">");
    }

    out.push_str(&format!(
      "<h2>{}. {}</h2>",
      section.heading_number,
      escape_text(&section.title)
    ));

    if section.body_html.is_empty() {
      out.push_str(&format!(
        "<p class=\"empty-section\">{EMPTY_SECTION_PLACEHOLDER}</p>"
      ));
    } else {
      out.push_str(&section.body_html);
    }

    if !section.footnotes.is_empty() {
      out.push_str("<div class=\"footnotes-section\">");
      out.push_str(&format!("<ol start=\"{}\">", section.footnote_start));
      for (offset, footnote) in section.footnotes.iter().enumerate() {
        out.push_str(&format!(
          "<li value=\"{}\">{}</li>",
          section.footnote_start + offset as u32,
          escape_text(&footnote.text)
        ));
      }
      out.push_str("</ol></div>");
    }
  }

  if !references.is_empty() {
    out.push_str("<hr class=\"section-divider\">");
    out.push_str(&format!(
      "<h2>{reference_heading_number}. {REFERENCE_SECTION_TITLE}</h2>"
    ));
    out.push_str("<ol class=\"reference-list\">");
    for entry in references {
      out.push_str("<li>");
      out.push_str(&entry.citation_html);
      if let Some(doi) = &entry.doi {
        out.push_str(&format!(
          "<span class=\"doi\"> doi:{}</span>",
          escape_text(doi)
        ));
      }
      out.push_str("</li>");
    }
    out.push_str("</ol>");
  }

  out
}

/// Minimal text-to-markup escape for strings we emit outside the sanitizer
/// (headings, footnote text, DOI annotations).
fn escape_text(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use uppsats_core::{
    research::ResearchRef,
    section::{Section, SectionStatus},
  };

  fn section(
    slug: &str,
    title: &str,
    sort_order: u32,
    content: &str,
  ) -> SectionWithResearch {
    SectionWithResearch {
      section: Section {
        slug:       slug.to_string(),
        title:      title.to_string(),
        sort_order,
        status:     SectionStatus::Draft,
        content:    content.to_string(),
        updated_at: Utc::now(),
      },
      research: Vec::new(),
    }
  }

  fn marker(id: &str, text: &str) -> String {
    format!(
      r#"<sup class="footnote-ref" data-footnote-id="{id}" data-footnote-text="{text}">[*]</sup>"#
    )
  }

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

  #[test]
  fn footnote_numbers_continue_across_sections() {
    let sections = vec![
      section(
        "inledning",
        "Inledning",
        1,
        &format!("<p>A{}</p>", marker("a", "F%C3%B6rsta")),
      ),
      section(
        "metod",
        "Metod",
        2,
        &format!("<p>B{}{}</p>", marker("b", "Andra"), marker("c", "Tredje")),
      ),
    ];

    let doc = render_document(&sections).unwrap();

    assert_eq!(doc.sections[0].footnote_start, 1);
    assert_eq!(doc.sections[1].footnote_start, 2);
    assert!(doc.sections[1].body_html.contains(">2</sup>"));
    assert!(doc.sections[1].body_html.contains(">3</sup>"));

    // 1..=3, strictly increasing, no restart.
    let numbers: Vec<u32> = doc
      .sections
      .iter()
      .flat_map(|s| {
        (0..s.footnotes.len()).map(move |i| s.footnote_start + i as u32)
      })
      .collect();
    assert_eq!(numbers, [1, 2, 3]);
  }

  #[test]
  fn first_section_without_footnotes_does_not_shift_numbering() {
    // Two sections, "Inledning" without markers and "Metod" with two:
    // Metod's footnotes are numbered 1 and 2 and its list starts at 1.
    let sections = vec![
      section("inledning", "Inledning", 1, "<p>Ingen fotnot.</p>"),
      section(
        "metod",
        "Metod",
        2,
        &format!("<p>{}{}</p>", marker("a", "Ett"), marker("b", "Tv%C3%A5")),
      ),
    ];

    let doc = render_document(&sections).unwrap();
    assert!(doc.sections[0].footnotes.is_empty());
    assert_eq!(doc.sections[1].footnote_start, 1);
    assert!(doc.sections[1].body_html.contains(">1</sup>"));
    assert!(doc.sections[1].body_html.contains(">2</sup>"));
    assert!(doc.body_html.contains("<ol start=\"1\">"));
  }

  #[test]
  fn reference_section_is_regenerated_not_rendered() {
    let stored_reference_section =
      section("referenslista", "Referenslista", 10, "<p>Gammalt innehåll</p>");

    let mut metod = section("metod", "Metod", 5, "<p>Text</p>");
    metod.research = vec![reference("Andersson, E.", Some(2020))];

    let doc = render_document(&[metod, stored_reference_section]).unwrap();

    // The stored body never appears; the generated list does.
    assert!(!doc.body_html.contains("Gammalt innehåll"));
    assert!(doc.body_html.contains("Referenslista"));
    assert_eq!(doc.references.len(), 1);
    // One past the last real section (sort order 5).
    assert_eq!(doc.reference_heading_number, 6);
    assert!(doc.body_html.contains("<h2>6. Referenslista</h2>"));
  }

  #[test]
  fn duplicate_links_render_one_reference_entry() {
    let shared = reference("Andersson, E.", Some(2020));
    let mut a = section("inledning", "Inledning", 1, "");
    a.research = vec![shared.clone()];
    let mut b = section("metod", "Metod", 2, "");
    b.research = vec![shared.clone()];
    let mut c = section("analys", "Analys", 3, "");
    c.research = vec![shared.clone()];

    let doc = render_document(&[a, b, c]).unwrap();
    assert_eq!(doc.references.len(), 1);
  }

  #[test]
  fn doi_is_appended_after_citation() {
    let mut metod = section("metod", "Metod", 1, "");
    let mut linked = reference("Andersson, E.", Some(2020));
    linked.doi = Some("10.1000/xyz".to_string());
    metod.research = vec![linked];

    let doc = render_document(&[metod]).unwrap();
    assert_eq!(doc.references[0].doi.as_deref(), Some("10.1000/xyz"));
    assert!(doc.body_html.contains("<span class=\"doi\"> doi:10.1000/xyz</span>"));
  }

  #[test]
  fn section_bodies_are_sanitized() {
    let sections = vec![section(
      "metod",
      "Metod",
      1,
      "<script>alert(1)</script><p>text</p>",
    )];

    let doc = render_document(&sections).unwrap();
    assert_eq!(doc.sections[0].body_html, "<p>text</p>");
    assert!(!doc.body_html.contains("script"));
  }

  #[test]
  fn empty_section_gets_placeholder() {
    let doc = render_document(&[section("metod", "Metod", 1, "")]).unwrap();
    assert!(doc.body_html.contains(EMPTY_SECTION_PLACEHOLDER));
    assert!(doc.sections[0].body_html.is_empty());
  }

  #[test]
  fn headings_follow_stored_sort_order() {
    let sections = vec![
      section("inledning", "Inledning", 1, ""),
      section("metod", "Metod", 5, ""),
    ];
    let doc = render_document(&sections).unwrap();
    assert!(doc.body_html.contains("<h2>1. Inledning</h2>"));
    assert!(doc.body_html.contains("<h2>5. Metod</h2>"));
  }

  #[test]
  fn heading_titles_are_escaped() {
    let doc =
      render_document(&[section("metod", "Metod <i> & co", 1, "")]).unwrap();
    assert!(doc.body_html.contains("Metod &lt;i&gt; &amp; co"));
  }

  #[test]
  fn no_references_means_no_reference_section() {
    let doc = render_document(&[section("metod", "Metod", 1, "")]).unwrap();
    assert!(doc.references.is_empty());
    assert!(!doc.body_html.contains("Referenslista"));
  }
}
