//! Error type for `uppsats-render`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The streaming HTML rewriter rejected the input. In practice this only
  /// happens on pathological markup (e.g. absurd nesting depth), never on
  /// ordinary editor output.
  #[error("html rewrite error: {0}")]
  Rewrite(String),

  /// The Swedish collation data could not be loaded.
  #[error("collator error: {0}")]
  Collator(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
