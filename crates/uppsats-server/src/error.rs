//! Server error type and axum `IntoResponse` implementation.

use std::time::Duration;

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,

  #[error("too many requests")]
  RateLimited { retry_after: Duration },

  #[error("render error: {0}")]
  Render(#[from] uppsats_render::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "Unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"uppsats\""),
        );
        res
      }
      Error::RateLimited { retry_after } => {
        let mut res = (
          StatusCode::TOO_MANY_REQUESTS,
          Json(json!({ "error": "Too many requests" })),
        )
          .into_response();
        let secs = retry_after.as_secs().max(1).to_string();
        if let Ok(value) = HeaderValue::from_str(&secs) {
          res.headers_mut().insert(header::RETRY_AFTER, value);
        }
        res
      }
      Error::Render(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
      Error::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
    }
  }
}
