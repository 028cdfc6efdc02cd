//! JSON REST API for Uppsats.
//!
//! Exposes an axum [`Router`] backed by any
//! [`uppsats_core::store::ThesisStore`] and any
//! [`uppsats_render::docx::DocxConvert`]. Auth, rate limiting, TLS, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", uppsats_api::api_router(store.clone(), converter.clone()))
//! ```

pub mod error;
pub mod export;
pub mod links;
pub mod overview;
pub mod preview;
pub mod research;
pub mod sections;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use uppsats_core::store::ThesisStore;
use uppsats_render::docx::DocxConvert;

pub use error::ApiError;

/// Shared state threaded through all API handlers.
pub struct ApiState<S, C> {
  pub store:     Arc<S>,
  pub converter: Arc<C>,
}

// Derived `Clone` would demand `S: Clone` and `C: Clone`; the `Arc`s make
// that unnecessary.
impl<S, C> Clone for ApiState<S, C> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      converter: Arc::clone(&self.converter),
    }
  }
}

/// Build a fully-materialised API router for `store` and `converter`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, C>(store: Arc<S>, converter: Arc<C>) -> Router<()>
where
  S: ThesisStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert + 'static,
  C::Error: std::error::Error + Send + Sync + 'static,
{
  let state = ApiState { store, converter };

  Router::new()
    // Sections
    .route(
      "/sections",
      get(sections::list::<S, C>),
    )
    .route(
      "/sections/{slug}",
      get(sections::get_one::<S, C>).patch(sections::update::<S, C>),
    )
    // Research items
    .route(
      "/research",
      get(research::list::<S, C>).post(research::create::<S, C>),
    )
    .route(
      "/research/{id}",
      get(research::get_one::<S, C>)
        .patch(research::update::<S, C>)
        .delete(research::delete_one::<S, C>),
    )
    // Links
    .route(
      "/research-links",
      post(links::create::<S, C>).delete(links::remove::<S, C>),
    )
    // Aggregates and the export pipeline
    .route("/overview", get(overview::handler::<S, C>))
    .route("/preview", get(preview::handler::<S, C>))
    .route("/export-docx", post(export::handler::<S, C>))
    .with_state(state)
}
