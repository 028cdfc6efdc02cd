//! Footnote extraction and renumbering.
//!
//! The rich-text editor stores footnotes inline as
//! `<sup class="footnote-ref" data-footnote-id="…" data-footnote-text="…">`
//! where the text attribute is percent-encoded. At render time each marker is
//! replaced by a plain sequential number and the decoded text is collected in
//! encounter order. Numbering is global across the whole document: the
//! counter is threaded through section after section and never restarts.
//!
//! Markers are matched structurally with a streaming rewriter rather than by
//! pattern matching over the serialized markup, so attribute order and
//! whitespace inside the tag do not matter. An element missing either data
//! attribute is simply not matched and passes through untouched.

use std::{cell::RefCell, rc::Rc};

use lol_html::{element, html_content::ContentType, rewrite_str, RewriteStrSettings};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// CSS selector for a well-formed footnote marker. Requiring both data
/// attributes in the selector is what makes malformed markers fall through
/// unprocessed.
const MARKER_SELECTOR: &str =
  "sup.footnote-ref[data-footnote-id][data-footnote-text]";

/// A footnote extracted from a section body. Never persisted; the sequence
/// number exists only in the rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
  /// The opaque identifier the editor assigned to the marker.
  pub marker_id: String,
  /// The decoded display text.
  pub text:      String,
}

/// Result of renumbering one section body.
#[derive(Debug, Clone)]
pub struct RenumberedSection {
  /// The body with every marker replaced by its sequential number.
  pub html:        String,
  /// Footnotes in the order their markers appeared.
  pub footnotes:   Vec<Footnote>,
  /// The number the next section's first footnote should receive.
  pub next_number: u32,
}

/// Replace every footnote marker in `html` with sequential numbers starting
/// at `start`, collecting the footnote text in encounter order.
///
/// A body with no markers comes back byte-identical with `next_number ==
/// start` and an empty footnote list.
pub fn renumber(html: &str, start: u32) -> Result<RenumberedSection> {
  let state = Rc::new(RefCell::new((start, Vec::<Footnote>::new())));
  let handler_state = Rc::clone(&state);

  let html = rewrite_str(
    html,
    RewriteStrSettings {
      element_content_handlers: vec![element!(MARKER_SELECTOR, move |el| {
        // The selector guarantees both attributes are present.
        let marker_id = el.get_attribute("data-footnote-id").unwrap_or_default();
        let raw       = el.get_attribute("data-footnote-text").unwrap_or_default();

        // Undecodable text is kept verbatim so broken user content never
        // blocks the export.
        let text = match urlencoding::decode(&raw) {
          Ok(decoded) => decoded.into_owned(),
          Err(_) => raw,
        };

        let mut state = handler_state.borrow_mut();
        let number = state.0;
        state.0 += 1;
        state.1.push(Footnote { marker_id, text });

        el.replace(
          &format!(r#"<sup class="footnote-ref">{number}</sup>"#),
          ContentType::Html,
        );
        Ok(())
      })],
      ..RewriteStrSettings::default()
    },
  )
  .map_err(|e| Error::Rewrite(e.to_string()))?;

  // The settings (and the handler's clone of the state) are dropped once
  // `rewrite_str` returns.
  let (next_number, footnotes) = Rc::try_unwrap(state)
    .map_err(|_| Error::Rewrite("rewriter retained state".to_string()))?
    .into_inner();

  Ok(RenumberedSection { html, footnotes, next_number })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn marker(id: &str, encoded_text: &str) -> String {
    format!(
      r#"<sup class="footnote-ref" data-footnote-id="{id}" data-footnote-text="{encoded_text}">[*]</sup>"#
    )
  }

  #[test]
  fn no_markers_leaves_html_and_counter_untouched() {
    let html = "<p>En vanlig paragraf.</p>";
    let out  = renumber(html, 5).unwrap();
    assert_eq!(out.html, html);
    assert!(out.footnotes.is_empty());
    assert_eq!(out.next_number, 5);
  }

  #[test]
  fn single_marker_is_replaced_and_collected() {
    let html = format!("<p>Text{}</p>", marker("fn-a", "Se%20Andersson%202020"));
    let out  = renumber(&html, 1).unwrap();

    assert_eq!(
      out.html,
      r#"<p>Text<sup class="footnote-ref">1</sup></p>"#
    );
    assert_eq!(out.footnotes.len(), 1);
    assert_eq!(out.footnotes[0].marker_id, "fn-a");
    assert_eq!(out.footnotes[0].text, "Se Andersson 2020");
    assert_eq!(out.next_number, 2);
  }

  #[test]
  fn numbering_continues_from_start() {
    let html = format!(
      "<p>{}{}</p>",
      marker("fn-a", "F%C3%B6rsta"),
      marker("fn-b", "Andra")
    );
    let out = renumber(&html, 3).unwrap();

    assert!(out.html.contains(r#"<sup class="footnote-ref">3</sup>"#));
    assert!(out.html.contains(r#"<sup class="footnote-ref">4</sup>"#));
    assert_eq!(out.next_number, 5);
    assert_eq!(out.footnotes[0].text, "Första");
    assert_eq!(out.footnotes[1].text, "Andra");
  }

  #[test]
  fn markers_are_collected_in_encounter_order() {
    let html = format!(
      "<p>{}</p><p>{}</p><p>{}</p>",
      marker("z", "sist%20i%20alfabetet"),
      marker("a", "mitten"),
      marker("m", "f%C3%B6rst")
    );
    let out = renumber(&html, 1).unwrap();
    let ids: Vec<&str> =
      out.footnotes.iter().map(|f| f.marker_id.as_str()).collect();
    assert_eq!(ids, ["z", "a", "m"]);
  }

  #[test]
  fn attribute_order_does_not_matter() {
    let html = r#"<p><sup data-footnote-text="Text" class="footnote-ref" data-footnote-id="x">*</sup></p>"#;
    let out  = renumber(html, 1).unwrap();
    assert_eq!(out.footnotes.len(), 1);
    assert_eq!(out.html, r#"<p><sup class="footnote-ref">1</sup></p>"#);
  }

  #[test]
  fn marker_missing_text_attribute_passes_through() {
    let html = r#"<p><sup class="footnote-ref" data-footnote-id="only-id">[*]</sup></p>"#;
    let out  = renumber(html, 1).unwrap();
    assert_eq!(out.html, html);
    assert!(out.footnotes.is_empty());
    assert_eq!(out.next_number, 1);
  }

  #[test]
  fn marker_missing_id_attribute_passes_through() {
    let html = r#"<p><sup class="footnote-ref" data-footnote-text="Text">[*]</sup></p>"#;
    let out  = renumber(html, 1).unwrap();
    assert_eq!(out.html, html);
    assert!(out.footnotes.is_empty());
  }

  #[test]
  fn plain_sup_without_class_passes_through() {
    let html = r#"<p>x<sup data-footnote-id="a" data-footnote-text="b">2</sup></p>"#;
    let out  = renumber(html, 1).unwrap();
    assert_eq!(out.html, html);
    assert!(out.footnotes.is_empty());
  }

  #[test]
  fn undecodable_text_is_kept_verbatim() {
    let html = format!("<p>{}</p>", marker("fn-a", "%FF%FE"));
    let out  = renumber(&html, 1).unwrap();
    assert_eq!(out.footnotes[0].text, "%FF%FE");
  }
}
