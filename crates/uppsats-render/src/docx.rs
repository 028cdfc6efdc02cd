//! The DOCX conversion boundary.
//!
//! Conversion itself is an external concern (a service or library that turns
//! structured HTML into an Office Open XML document). The pipeline only needs
//! one synchronous call: full document in, bytes out. This is the
//! higher-fidelity export path — it operates on markup, not on rasterized
//! pixels — so a failure here is surfaced loudly rather than degraded.

use std::future::Future;

/// MIME type of the produced document.
pub const DOCX_CONTENT_TYPE: &str =
  "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Fixed download filename; not parameterized by thesis title.
pub const DOCX_FILENAME: &str = "uppsats.docx";

/// Options passed to the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocxOptions {
  /// Keep table rows on one page.
  pub table_row_cant_split: bool,
  /// Emit a document footer.
  pub footer:               bool,
  /// Emit page numbers in the footer.
  pub page_number:          bool,
}

impl Default for DocxOptions {
  fn default() -> Self {
    Self { table_row_cant_split: true, footer: true, page_number: true }
  }
}

/// Abstraction over the HTML→DOCX converter.
///
/// Implemented by the server's HTTP client against the conversion service;
/// tests use an in-memory fake.
pub trait DocxConvert: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Convert a full HTML document string into DOCX bytes.
  fn convert<'a>(
    &'a self,
    html: &'a str,
    options: &'a DocxOptions,
  ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send + 'a;
}

/// Wrap a body fragment in the full document the converter expects.
pub fn wrap_document(body_html: &str) -> String {
  format!("<!DOCTYPE html><html><body>{body_html}</body></html>")
}
