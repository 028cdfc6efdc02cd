//! Allow-list HTML sanitizer — the trust boundary of the pipeline.
//!
//! Section bodies and reconstructed reference markup originate in a rich-text
//! editor and are later injected as raw markup, so every such string passes
//! through here on every render path (live preview and export alike).
//!
//! Only the fixed allow-list below survives. Disallowed tags and attributes
//! are stripped entirely, not escaped. Data attributes are denied globally;
//! the two footnote marker attributes on `sup` are the single, deliberate
//! exception — widening this to all `data-*` would reopen the injection
//! surface the allow-list closes.

use std::collections::{HashMap, HashSet};

use ammonia::Builder;

const ALLOWED_TAGS: &[&str] = &[
  "h1", "h2", "h3", "h4", "h5", "h6",
  "p", "br", "hr",
  "ul", "ol", "li",
  "blockquote", "pre", "code",
  "strong", "em", "u", "s", "sub", "sup",
  "a", "img",
  "table", "thead", "tbody", "tr", "th", "td",
  "span", "div",
];

/// Attributes allowed on any allowed tag.
const GENERIC_ATTRIBUTES: &[&str] = &["class", "id"];

/// A configured sanitizer. Construction is cheap enough to do once per
/// render pass.
pub struct Sanitizer {
  builder: Builder<'static>,
}

impl Sanitizer {
  pub fn new() -> Self {
    let mut tag_attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    tag_attributes.insert("a", HashSet::from(["href", "target", "rel"]));
    tag_attributes.insert("img", HashSet::from(["src", "alt", "width", "height"]));
    tag_attributes.insert("ol", HashSet::from(["start"]));
    tag_attributes.insert("li", HashSet::from(["value"]));
    tag_attributes.insert("th", HashSet::from(["colspan", "rowspan"]));
    tag_attributes.insert("td", HashSet::from(["colspan", "rowspan"]));
    // The footnote-marker exception to the global data-* deny.
    tag_attributes
      .insert("sup", HashSet::from(["data-footnote-id", "data-footnote-text"]));

    let mut builder = Builder::default();
    builder
      .tags(HashSet::from_iter(ALLOWED_TAGS.iter().copied()))
      .generic_attributes(HashSet::from_iter(GENERIC_ATTRIBUTES.iter().copied()))
      .tag_attributes(tag_attributes)
      // `rel` is author-controlled here, not injected.
      .link_rel(None);

    Self { builder }
  }

  /// Sanitize one fragment of untrusted markup.
  pub fn clean(&self, dirty: &str) -> String {
    self.builder.clean(dirty).to_string()
  }
}

impl Default for Sanitizer {
  fn default() -> Self {
    Self::new()
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
