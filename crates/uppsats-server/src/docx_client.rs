//! HTTP client for the external HTML→DOCX conversion service.
//!
//! The service takes the full document and the option set in one JSON body
//! and answers with the binary document. Any non-success status is surfaced
//! as a failed conversion; the caller never receives a partial file.

use reqwest::Client;
use thiserror::Error;
use uppsats_render::docx::{DocxConvert, DocxOptions};

#[derive(Debug, Error)]
pub enum ConvertError {
  #[error("conversion request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("conversion service returned status {0}")]
  Status(u16),
}

pub struct HttpDocxConverter {
  client:   Client,
  endpoint: String,
}

impl HttpDocxConverter {
  pub fn new(endpoint: impl Into<String>) -> Self {
    Self {
      client:   Client::new(),
      endpoint: endpoint.into(),
    }
  }
}

impl DocxConvert for HttpDocxConverter {
  type Error = ConvertError;

  async fn convert(
    &self,
    html: &str,
    options: &DocxOptions,
  ) -> Result<Vec<u8>, ConvertError> {
    let response = self
      .client
      .post(&self.endpoint)
      .json(&serde_json::json!({
        "html": html,
        "table": { "row": { "cantSplit": options.table_row_cant_split } },
        "footer": options.footer,
        "pageNumber": options.page_number,
      }))
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      return Err(ConvertError::Status(status.as_u16()));
    }

    Ok(response.bytes().await?.to_vec())
  }
}
