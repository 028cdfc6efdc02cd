//! The self-contained preview/print page.
//!
//! Serves the assembled document with the fixed serif print stylesheet and a
//! small toolbar: print, client-side PDF, and server-side DOCX download. The
//! PDF path is a progressive enhancement — if the rasterizer script cannot be
//! loaded the button simply returns to idle.

use crate::document::RenderedDocument;

const THESIS_CSS: &str = r#"
  body {
    margin: 0;
    background: #f3f4f6;
  }
  .toolbar {
    max-width: 48rem;
    margin: 0 auto;
    padding: 1rem 0;
    display: flex;
    gap: 0.5rem;
    justify-content: flex-end;
    font-family: system-ui, sans-serif;
  }
  .toolbar button {
    padding: 0.4rem 0.9rem;
    cursor: pointer;
  }
  .toolbar button:disabled {
    opacity: 0.5;
    cursor: wait;
  }
  .thesis-preview {
    max-width: 48rem;
    margin: 0 auto 3rem;
    padding: 3rem;
    background: #fff;
    border: 1px solid #e5e7eb;
    border-radius: 0.5rem;
    font-family: 'Georgia', 'Times New Roman', serif;
    font-size: 12pt;
    line-height: 1.75;
    color: #1a1a1a;
  }
  .thesis-preview h2 {
    font-size: 16pt;
    font-weight: 700;
    margin-top: 2.5em;
    margin-bottom: 0.75em;
    page-break-after: avoid;
  }
  .thesis-preview h2:first-child {
    margin-top: 0;
  }
  .thesis-preview h3 {
    font-size: 13pt;
    font-weight: 600;
    margin-top: 1.5em;
    margin-bottom: 0.5em;
    page-break-after: avoid;
  }
  .thesis-preview h4 {
    font-size: 12pt;
    font-weight: 600;
    margin-top: 1.25em;
    margin-bottom: 0.5em;
  }
  .thesis-preview p {
    margin-bottom: 0.75em;
    text-align: left;
  }
  .thesis-preview blockquote {
    margin: 1em 0 1em 2em;
    padding-left: 1em;
    border-left: 3px solid #d1d5db;
    font-style: italic;
  }
  .thesis-preview ul, .thesis-preview ol {
    margin: 0.75em 0;
    padding-left: 2em;
  }
  .thesis-preview li {
    margin-bottom: 0.25em;
  }
  .thesis-preview .empty-section {
    font-style: italic;
    color: #9ca3af;
  }
  .thesis-preview .section-divider {
    border: none;
    border-top: 1px solid #e5e7eb;
    margin: 2em 0;
  }
  .thesis-preview .reference-list {
    margin-top: 0.5em;
    list-style: none;
  }
  .thesis-preview .reference-list li {
    margin-bottom: 0.5em;
    text-indent: -2em;
    padding-left: 2em;
  }
  .thesis-preview .reference-list .doi {
    color: #6b7280;
  }
  .thesis-preview sup.footnote-ref {
    color: #2563eb;
    font-weight: 500;
  }
  .thesis-preview .footnotes-section {
    margin-top: 2em;
    padding-top: 1em;
    border-top: 1px solid #d1d5db;
    font-size: 10pt;
  }
  .thesis-preview .footnotes-section li {
    margin-bottom: 0.25em;
  }
  @media print {
    body { background: #fff; }
    .toolbar { display: none; }
    .thesis-preview {
      border: none;
      border-radius: 0;
      padding: 0;
      margin: 0;
    }
    .thesis-preview h2 {
      page-break-before: always;
    }
    .thesis-preview h2:first-child {
      page-break-before: avoid;
    }
  }
"#;

const EXPORT_JS: &str = r#"
  const pdfButton  = document.getElementById("download-pdf");
  const docxButton = document.getElementById("download-docx");
  const content    = document.getElementById("thesis-content");

  function loadScript(src) {
    return new Promise((resolve, reject) => {
      const el = document.createElement("script");
      el.src = src;
      el.onload = resolve;
      el.onerror = reject;
      document.head.appendChild(el);
    });
  }

  pdfButton.addEventListener("click", async () => {
    pdfButton.disabled = true;
    try {
      if (!window.html2pdf) {
        await loadScript("https://cdn.jsdelivr.net/npm/html2pdf.js@0.10.2/dist/html2pdf.bundle.min.js");
      }
      if (!window.html2pdf) return;
      await window.html2pdf()
        .set({
          margin: [15, 15, 15, 15],
          filename: "uppsats.pdf",
          image: { type: "jpeg", quality: 0.98 },
          html2canvas: { scale: 2, useCORS: true },
          jsPDF: { unit: "mm", format: "a4", orientation: "portrait" },
        })
        .from(content)
        .save();
    } catch (_) {
      // Rasterization is best-effort; fall back to an idle button.
    } finally {
      pdfButton.disabled = false;
    }
  });

  docxButton.addEventListener("click", async () => {
    docxButton.disabled = true;
    try {
      const response = await fetch("/api/export-docx", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ html: content.innerHTML }),
      });
      if (!response.ok) return;
      const blob = await response.blob();
      const url = URL.createObjectURL(blob);
      const a = document.createElement("a");
      a.href = url;
      a.download = "uppsats.docx";
      a.click();
      URL.revokeObjectURL(url);
    } finally {
      docxButton.disabled = false;
    }
  });
"#;

/// Render the full preview page around an assembled document.
pub fn render_preview_page(document: &RenderedDocument) -> String {
  format!(
    "<!DOCTYPE html>\
     <html lang=\"sv\">\
     <head>\
     <meta charset=\"utf-8\">\
     <title>Förhandsgranska uppsats</title>\
     <style>{css}</style>\
     </head>\
     <body>\
     <div class=\"toolbar\">\
     <button onclick=\"window.print()\">Skriv ut</button>\
     <button id=\"download-pdf\">Ladda ner PDF</button>\
     <button id=\"download-docx\">Ladda ner DOCX</button>\
     </div>\
     <article id=\"thesis-content\" class=\"thesis-preview\">{body}</article>\
     <script>{js}</script>\
     </body>\
     </html>",
    css = THESIS_CSS,
    body = document.body_html,
    js = EXPORT_JS,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::document::render_document;

  #[test]
  fn page_embeds_body_and_stylesheet() {
    let doc  = render_document(&[]).unwrap();
    let page = render_preview_page(&doc);

    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("thesis-preview"));
    assert!(page.contains("page-break-before: always"));
    assert!(page.contains("id=\"download-pdf\""));
    assert!(page.contains("/api/export-docx"));
  }
}
