//! HTTP layer for Uppsats.
//!
//! Assembles the JSON API, the preview/print page, HTTP Basic auth, and the
//! injected rate limiter into one axum [`Router`] backed by any
//! [`ThesisStore`] and any [`DocxConvert`] implementation.

pub mod auth;
pub mod docx_client;
pub mod error;
pub mod ratelimit;

pub use error::Error;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  extract::{Request, State},
  middleware::{self, Next},
  response::{Html, IntoResponse, Response},
  routing::get,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uppsats_core::store::ThesisStore;
use uppsats_render::{
  docx::DocxConvert, document::render_document, page::render_preview_page,
};

use auth::{verify_basic, AuthConfig, UserCredential};
use ratelimit::RateLimiter;

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_rate_limit_max() -> u32 { 60 }

fn default_rate_limit_window_secs() -> u64 { 60 }

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  /// Endpoint of the external HTML→DOCX conversion service.
  pub docx_converter_url: String,
  /// The student and supervisor credentials.
  pub users:              Vec<UserCredential>,
  #[serde(default = "default_rate_limit_max")]
  pub rate_limit_max:         u32,
  #[serde(default = "default_rate_limit_window_secs")]
  pub rate_limit_window_secs: u64,
}

impl ServerConfig {
  pub fn rate_limiter(&self) -> RateLimiter {
    RateLimiter::new(
      self.rate_limit_max,
      Duration::from_secs(self.rate_limit_window_secs),
    )
  }

  pub fn auth(&self) -> AuthConfig {
    AuthConfig { users: self.users.clone() }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the guard middleware and page handlers.
pub struct AppState<S, C> {
  pub store:     Arc<S>,
  pub converter: Arc<C>,
  pub auth:      Arc<AuthConfig>,
  pub limiter:   Arc<RateLimiter>,
}

impl<S, C> Clone for AppState<S, C> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      converter: Arc::clone(&self.converter),
      auth:      Arc::clone(&self.auth),
      limiter:   Arc::clone(&self.limiter),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: `/api/*` plus the `/preview` page,
/// everything behind Basic auth and the rate limiter.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: ThesisStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert + 'static,
  C::Error: std::error::Error + Send + Sync + 'static,
{
  let api = uppsats_api::api_router(
    Arc::clone(&state.store),
    Arc::clone(&state.converter),
  );

  Router::new()
    .route("/preview", get(preview_page::<S, C>))
    .with_state(state.clone())
    .nest("/api", api)
    .layer(middleware::from_fn_with_state(state, guard::<S, C>))
    .layer(TraceLayer::new_for_http())
}

/// Auth + rate-limit gate in front of every route.
///
/// Runs before any body extraction, so an unauthenticated request performs
/// no processing at all.
async fn guard<S, C>(
  State(state): State<AppState<S, C>>,
  request: Request,
  next: Next,
) -> Response
where
  S: ThesisStore + 'static,
  C: DocxConvert + 'static,
{
  let username = match verify_basic(request.headers(), &state.auth) {
    Ok(username) => username,
    Err(e) => return e.into_response(),
  };

  let decision = state.limiter.check(&username);
  if !decision.allowed {
    return Error::RateLimited { retry_after: decision.reset_in }.into_response();
  }

  next.run(request).await
}

/// `GET /preview` — the self-contained print view.
async fn preview_page<S, C>(
  State(state): State<AppState<S, C>>,
) -> Result<Html<String>, Error>
where
  S: ThesisStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  C: DocxConvert + 'static,
{
  let sections = state
    .store
    .sections_with_research()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let document = render_document(&sections)?;
  Ok(Html(render_preview_page(&document)))
}

// ─── Integration tests ────────────────────────────────────────────────────────
