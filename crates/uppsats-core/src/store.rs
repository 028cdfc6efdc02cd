//! The `ThesisStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `uppsats-store-sqlite`).
//! Higher layers (`uppsats-api`, `uppsats-server`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  research::{
    NewResearchItem, ResearchItem, ResearchLink, ResearchPatch,
    SectionWithResearch,
  },
  section::{Section, SectionPatch, SectionSummary},
};

/// Abstraction over an Uppsats storage backend.
///
/// Sections are a fixed set seeded at store creation; they are only ever
/// mutated, never created or deleted through this trait. Research items have
/// full CRUD; links between the two are idempotent upserts.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ThesisStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Sections ──────────────────────────────────────────────────────────

  /// All sections in ascending sort order.
  fn list_sections(
    &self,
  ) -> impl Future<Output = Result<Vec<Section>, Self::Error>> + Send + '_;

  /// All sections in ascending sort order, each with its research-link
  /// count.
  fn list_sections_with_counts(
    &self,
  ) -> impl Future<Output = Result<Vec<SectionSummary>, Self::Error>> + Send + '_;

  /// Retrieve a section by slug. Returns `None` if the slug is unknown.
  fn get_section<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Section>, Self::Error>> + Send + 'a;

  /// Apply a partial update to a section and bump its `updated_at`.
  /// Returns `None` if the slug is unknown. An empty patch is a no-op that
  /// still returns the current row.
  fn update_section<'a>(
    &'a self,
    slug: &'a str,
    patch: SectionPatch,
  ) -> impl Future<Output = Result<Option<Section>, Self::Error>> + Send + 'a;

  /// The content loader: all sections in ascending sort order, each with the
  /// [`crate::research::ResearchRef`] projection of its linked items.
  fn sections_with_research(
    &self,
  ) -> impl Future<Output = Result<Vec<SectionWithResearch>, Self::Error>> + Send + '_;

  // ── Research items ────────────────────────────────────────────────────

  /// Create a research item. `item_id` and `created_at` are assigned by the
  /// store.
  fn add_research_item(
    &self,
    input: NewResearchItem,
  ) -> impl Future<Output = Result<ResearchItem, Self::Error>> + Send + '_;

  fn get_research_item(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ResearchItem>, Self::Error>> + Send + '_;

  /// All research items, newest first. With `section`, only items linked to
  /// that section.
  fn list_research_items<'a>(
    &'a self,
    section: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<ResearchItem>, Self::Error>> + Send + 'a;

  /// Apply a partial update. Returns `None` if the item does not exist.
  fn update_research_item(
    &self,
    id: Uuid,
    patch: ResearchPatch,
  ) -> impl Future<Output = Result<Option<ResearchItem>, Self::Error>> + Send + '_;

  /// Delete an item and (by cascade) its links. Returns `false` if the item
  /// did not exist.
  fn delete_research_item(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Total number of research items in the library.
  fn count_research_items(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Links ─────────────────────────────────────────────────────────────

  /// Link an item to a section. Idempotent: linking an already-linked pair
  /// returns the existing link. Returns `None` if either side is unknown.
  fn link_research<'a>(
    &'a self,
    section_slug: &'a str,
    item_id: Uuid,
  ) -> impl Future<Output = Result<Option<ResearchLink>, Self::Error>> + Send + 'a;

  /// Remove a link. Removing an absent link is not an error.
  fn unlink_research<'a>(
    &'a self,
    section_slug: &'a str,
    item_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
