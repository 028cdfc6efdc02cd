//! Integration tests for `SqliteStore` against an in-memory database.

use uppsats_core::{
  research::{NewResearchItem, Provenance},
  section::{SectionPatch, SectionStatus, THESIS_OUTLINE},
  store::ThesisStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn item(title: &str) -> NewResearchItem {
  NewResearchItem::new(title)
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seeds_full_outline_in_order() {
  let s = store().await;
  let sections = s.list_sections().await.unwrap();

  assert_eq!(sections.len(), THESIS_OUTLINE.len());
  for (idx, section) in sections.iter().enumerate() {
    assert_eq!(section.slug, THESIS_OUTLINE[idx].0);
    assert_eq!(section.title, THESIS_OUTLINE[idx].1);
    assert_eq!(section.sort_order, (idx + 1) as u32);
    assert_eq!(section.status, SectionStatus::NotStarted);
    assert!(section.content.is_empty());
  }
}

#[tokio::test]
async fn reopening_does_not_duplicate_or_reset_sections() {
  let dir  = tempfile::tempdir().unwrap();
  let path = dir.path().join("uppsats.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.update_section(
      "metod",
      SectionPatch {
        content: Some("<p>Metodtext</p>".to_string()),
        status:  Some(SectionStatus::Draft),
      },
    )
    .await
    .unwrap()
    .unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let sections = s.list_sections().await.unwrap();
  assert_eq!(sections.len(), THESIS_OUTLINE.len());

  let metod = s.get_section("metod").await.unwrap().unwrap();
  assert_eq!(metod.content, "<p>Metodtext</p>");
  assert_eq!(metod.status, SectionStatus::Draft);
}

// ─── Section updates ─────────────────────────────────────────────────────────

#[tokio::test]
async fn get_section_unknown_slug_returns_none() {
  let s = store().await;
  assert!(s.get_section("saknas").await.unwrap().is_none());
}

#[tokio::test]
async fn update_section_applies_partial_patch() {
  let s = store().await;

  let updated = s
    .update_section(
      "inledning",
      SectionPatch {
        content: Some("<p>Hej</p>".to_string()),
        status:  None,
      },
    )
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.content, "<p>Hej</p>");
  assert_eq!(updated.status, SectionStatus::NotStarted);

  let updated = s
    .update_section(
      "inledning",
      SectionPatch {
        content: None,
        status:  Some(SectionStatus::Review),
      },
    )
    .await
    .unwrap()
    .unwrap();

  // Earlier content survives a status-only patch.
  assert_eq!(updated.content, "<p>Hej</p>");
  assert_eq!(updated.status, SectionStatus::Review);
}

#[tokio::test]
async fn update_section_unknown_slug_returns_none() {
  let s = store().await;
  let result = s
    .update_section("saknas", SectionPatch::default())
    .await
    .unwrap();
  assert!(result.is_none());
}

// ─── Research items ──────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_research_item() {
  let s = store().await;

  let mut input = item("Skolans digitalisering");
  input.authors = "Andersson, E.".to_string();
  input.year = Some(2020);
  input.doi = Some("10.1000/xyz".to_string());
  input.provenance = Provenance::Imported {
    provider: "openalex".to_string(),
  };

  let created = s.add_research_item(input).await.unwrap();
  let fetched = s
    .get_research_item(created.item_id)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(fetched.title, "Skolans digitalisering");
  assert_eq!(fetched.authors, "Andersson, E.");
  assert_eq!(fetched.year, Some(2020));
  assert_eq!(fetched.doi.as_deref(), Some("10.1000/xyz"));
  assert_eq!(
    fetched.provenance,
    Provenance::Imported { provider: "openalex".to_string() }
  );
  assert!(fetched.summary.is_none());
}

#[tokio::test]
async fn update_research_item_clears_nullable_fields() {
  let s = store().await;

  let mut input = item("Titel");
  input.year = Some(2019);
  input.url = Some("https://example.com".to_string());
  let created = s.add_research_item(input).await.unwrap();

  let patch = uppsats_core::research::ResearchPatch {
    year: Some(None),
    url: Some(None),
    summary: Some("Sammanfattning.".to_string()),
    ..Default::default()
  };
  let updated = s
    .update_research_item(created.item_id, patch)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.year, None);
  assert_eq!(updated.url, None);
  assert_eq!(updated.summary.as_deref(), Some("Sammanfattning."));
  assert_eq!(updated.title, "Titel");
}

#[tokio::test]
async fn update_missing_item_returns_none() {
  let s = store().await;
  let result = s
    .update_research_item(Uuid::new_v4(), Default::default())
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_research_item_reports_existence() {
  let s = store().await;
  let created = s.add_research_item(item("Att tas bort")).await.unwrap();

  assert!(s.delete_research_item(created.item_id).await.unwrap());
  assert!(!s.delete_research_item(created.item_id).await.unwrap());
  assert!(s.get_research_item(created.item_id).await.unwrap().is_none());
}

#[tokio::test]
async fn count_research_items_tracks_library_size() {
  let s = store().await;
  assert_eq!(s.count_research_items().await.unwrap(), 0);

  s.add_research_item(item("A")).await.unwrap();
  s.add_research_item(item("B")).await.unwrap();
  assert_eq!(s.count_research_items().await.unwrap(), 2);
}

// ─── Links ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn link_is_idempotent() {
  let s = store().await;
  let created = s.add_research_item(item("Källa")).await.unwrap();

  let first = s
    .link_research("metod", created.item_id)
    .await
    .unwrap()
    .unwrap();
  let second = s
    .link_research("metod", created.item_id)
    .await
    .unwrap()
    .unwrap();

  assert_eq!(first.created_at, second.created_at);

  let linked = s.list_research_items(Some("metod")).await.unwrap();
  assert_eq!(linked.len(), 1);
}

#[tokio::test]
async fn link_unknown_section_or_item_returns_none() {
  let s = store().await;
  let created = s.add_research_item(item("Källa")).await.unwrap();

  assert!(
    s.link_research("saknas", created.item_id)
      .await
      .unwrap()
      .is_none()
  );
  assert!(
    s.link_research("metod", Uuid::new_v4())
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn deleting_item_cascades_links() {
  let s = store().await;
  let created = s.add_research_item(item("Källa")).await.unwrap();
  s.link_research("metod", created.item_id)
    .await
    .unwrap()
    .unwrap();

  s.delete_research_item(created.item_id).await.unwrap();

  let linked = s.list_research_items(Some("metod")).await.unwrap();
  assert!(linked.is_empty());

  let summaries = s.list_sections_with_counts().await.unwrap();
  let metod = summaries
    .iter()
    .find(|sm| sm.section.slug == "metod")
    .unwrap();
  assert_eq!(metod.research_link_count, 0);
}

#[tokio::test]
async fn unlink_is_not_an_error_when_absent() {
  let s = store().await;
  s.unlink_research("metod", Uuid::new_v4()).await.unwrap();
}

// ─── Loader projection ───────────────────────────────────────────────────────

#[tokio::test]
async fn sections_with_research_groups_links_per_section() {
  let s = store().await;

  let a = s.add_research_item(item("Källa A")).await.unwrap();
  let b = s.add_research_item(item("Källa B")).await.unwrap();

  s.link_research("metod", a.item_id).await.unwrap().unwrap();
  s.link_research("metod", b.item_id).await.unwrap().unwrap();
  s.link_research("analys", a.item_id).await.unwrap().unwrap();

  let all = s.sections_with_research().await.unwrap();
  assert_eq!(all.len(), THESIS_OUTLINE.len());

  // Still in document order.
  let orders: Vec<u32> = all.iter().map(|sw| sw.section.sort_order).collect();
  assert!(orders.windows(2).all(|w| w[0] < w[1]));

  let metod = all.iter().find(|sw| sw.section.slug == "metod").unwrap();
  assert_eq!(metod.research.len(), 2);

  let analys = all.iter().find(|sw| sw.section.slug == "analys").unwrap();
  assert_eq!(analys.research.len(), 1);
  assert_eq!(analys.research[0].item_id, a.item_id);

  let inledning = all
    .iter()
    .find(|sw| sw.section.slug == "inledning")
    .unwrap();
  assert!(inledning.research.is_empty());
}

#[tokio::test]
async fn list_sections_with_counts_reports_links() {
  let s = store().await;
  let a = s.add_research_item(item("Källa A")).await.unwrap();
  s.link_research("metod", a.item_id).await.unwrap().unwrap();

  let summaries = s.list_sections_with_counts().await.unwrap();
  assert_eq!(summaries.len(), THESIS_OUTLINE.len());

  let metod = summaries
    .iter()
    .find(|sm| sm.section.slug == "metod")
    .unwrap();
  assert_eq!(metod.research_link_count, 1);
}
