//! [`SqliteStore`] — the SQLite implementation of [`ThesisStore`].

use std::{collections::HashMap, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use uppsats_core::{
  research::{
    NewResearchItem, ResearchItem, ResearchLink, ResearchPatch, ResearchRef,
    SectionWithResearch,
  },
  section::{Section, SectionPatch, SectionSummary, THESIS_OUTLINE},
  store::ThesisStore,
};

use crate::{
  encode::{
    encode_dt, encode_provenance, encode_status, encode_uuid, RawResearchItem,
    RawSection,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Row helpers ─────────────────────────────────────────────────────────────

const SECTION_COLUMNS: &str =
  "slug, title, sort_order, status, content, updated_at";

const ITEM_COLUMNS: &str = "item_id, title, authors, year, url, doi, \
                            abstract, summary, keywords, notes, provenance, created_at";

// Qualified variant for queries that join `research_links`, where the
// unqualified `created_at` would be ambiguous.
const ITEM_COLUMNS_QUALIFIED: &str =
  "r.item_id, r.title, r.authors, r.year, r.url, r.doi, \
   r.abstract, r.summary, r.keywords, r.notes, r.provenance, r.created_at";

fn section_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSection> {
  Ok(RawSection {
    slug:       row.get(0)?,
    title:      row.get(1)?,
    sort_order: row.get(2)?,
    status:     row.get(3)?,
    content:    row.get(4)?,
    updated_at: row.get(5)?,
  })
}

fn item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawResearchItem> {
  Ok(RawResearchItem {
    item_id:       row.get(0)?,
    title:         row.get(1)?,
    authors:       row.get(2)?,
    year:          row.get(3)?,
    url:           row.get(4)?,
    doi:           row.get(5)?,
    abstract_text: row.get(6)?,
    summary:       row.get(7)?,
    keywords:      row.get(8)?,
    notes:         row.get(9)?,
    provenance:    row.get(10)?,
    created_at:    row.get(11)?,
  })
}

/// Raw strings read from the link join used by the content loader.
struct RawLinkedRef {
  section_slug: String,
  item_id:      String,
  title:        String,
  authors:      String,
  year:         Option<i64>,
  url:          Option<String>,
  doi:          Option<String>,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Uppsats store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, run schema initialisation, and seed
  /// the fixed section outline if it is not already present.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let now_str = encode_dt(Utc::now());
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(SCHEMA)?;
        // Seed the outline. ON CONFLICT keeps reopening idempotent.
        let mut stmt = conn.prepare(
          "INSERT INTO sections (slug, title, sort_order, updated_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(slug) DO NOTHING",
        )?;
        for (idx, (slug, title)) in THESIS_OUTLINE.iter().enumerate() {
          stmt.execute(rusqlite::params![
            slug,
            title,
            (idx + 1) as i64,
            now_str
          ])?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ThesisStore impl ────────────────────────────────────────────────────────

impl ThesisStore for SqliteStore {
  type Error = Error;

  // ── Sections ──────────────────────────────────────────────────────────────

  async fn list_sections(&self) -> Result<Vec<Section>> {
    let raws: Vec<RawSection> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SECTION_COLUMNS} FROM sections ORDER BY sort_order"
        ))?;
        let rows = stmt
          .query_map([], section_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSection::into_section).collect()
  }

  async fn list_sections_with_counts(&self) -> Result<Vec<SectionSummary>> {
    let raws: Vec<(RawSection, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT s.slug, s.title, s.sort_order, s.status, s.content, s.updated_at,
                  COUNT(l.research_item_id) AS link_count
           FROM sections s
           LEFT JOIN research_links l ON l.section_slug = s.slug
           GROUP BY s.slug
           ORDER BY s.sort_order",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((section_from_row(row)?, row.get(6)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(raw, count)| {
        Ok(SectionSummary {
          section:             raw.into_section()?,
          research_link_count: count as u64,
        })
      })
      .collect()
  }

  async fn get_section(&self, slug: &str) -> Result<Option<Section>> {
    let slug_str = slug.to_owned();

    let raw: Option<RawSection> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SECTION_COLUMNS} FROM sections WHERE slug = ?1"),
              rusqlite::params![slug_str],
              section_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSection::into_section).transpose()
  }

  async fn update_section(
    &self,
    slug: &str,
    patch: SectionPatch,
  ) -> Result<Option<Section>> {
    let slug_str   = slug.to_owned();
    let content    = patch.content;
    let status_str = patch.status.map(encode_status).map(str::to_owned);
    let now_str    = encode_dt(Utc::now());

    let raw: Option<RawSection> = self
      .conn
      .call(move |conn| {
        let existing = conn
          .query_row(
            &format!("SELECT {SECTION_COLUMNS} FROM sections WHERE slug = ?1"),
            rusqlite::params![slug_str],
            section_from_row,
          )
          .optional()?;

        let Some(mut raw) = existing else {
          return Ok(None);
        };

        if let Some(c) = content {
          raw.content = c;
        }
        if let Some(s) = status_str {
          raw.status = s;
        }
        raw.updated_at = now_str;

        conn.execute(
          "UPDATE sections SET status = ?1, content = ?2, updated_at = ?3
           WHERE slug = ?4",
          rusqlite::params![raw.status, raw.content, raw.updated_at, raw.slug],
        )?;

        Ok(Some(raw))
      })
      .await?;

    raw.map(RawSection::into_section).transpose()
  }

  async fn sections_with_research(&self) -> Result<Vec<SectionWithResearch>> {
    let (raw_sections, raw_links): (Vec<RawSection>, Vec<RawLinkedRef>) = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SECTION_COLUMNS} FROM sections ORDER BY sort_order"
        ))?;
        let sections = stmt
          .query_map([], section_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT l.section_slug, r.item_id, r.title, r.authors, r.year, r.url, r.doi
           FROM research_links l
           JOIN research_items r ON r.item_id = l.research_item_id
           ORDER BY l.section_slug, l.created_at, r.item_id",
        )?;
        let links = stmt
          .query_map([], |row| {
            Ok(RawLinkedRef {
              section_slug: row.get(0)?,
              item_id:      row.get(1)?,
              title:        row.get(2)?,
              authors:      row.get(3)?,
              year:         row.get(4)?,
              url:          row.get(5)?,
              doi:          row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((sections, links))
      })
      .await?;

    let mut by_slug: HashMap<String, Vec<ResearchRef>> = HashMap::new();
    for link in raw_links {
      let reference = ResearchRef {
        item_id: crate::encode::decode_uuid(&link.item_id)?,
        title:   link.title,
        authors: link.authors,
        year:    link.year.map(|y| y as i32),
        url:     link.url,
        doi:     link.doi,
      };
      by_slug.entry(link.section_slug).or_default().push(reference);
    }

    raw_sections
      .into_iter()
      .map(|raw| {
        let section  = raw.into_section()?;
        let research = by_slug.remove(&section.slug).unwrap_or_default();
        Ok(SectionWithResearch { section, research })
      })
      .collect()
  }

  // ── Research items ────────────────────────────────────────────────────────

  async fn add_research_item(
    &self,
    input: NewResearchItem,
  ) -> Result<ResearchItem> {
    let item = ResearchItem {
      item_id:       Uuid::new_v4(),
      title:         input.title,
      authors:       input.authors,
      year:          input.year,
      url:           input.url,
      doi:           input.doi,
      abstract_text: input.abstract_text,
      summary:       None,
      keywords:      input.keywords,
      notes:         input.notes,
      provenance:    input.provenance,
      created_at:    Utc::now(),
    };

    let id_str         = encode_uuid(item.item_id);
    let title          = item.title.clone();
    let authors        = item.authors.clone();
    let year           = item.year.map(i64::from);
    let url            = item.url.clone();
    let doi            = item.doi.clone();
    let abstract_text  = item.abstract_text.clone();
    let keywords       = item.keywords.clone();
    let notes          = item.notes.clone();
    let provenance_str = encode_provenance(&item.provenance)?;
    let at_str         = encode_dt(item.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO research_items (
             item_id, title, authors, year, url, doi,
             abstract, summary, keywords, notes, provenance, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            title,
            authors,
            year,
            url,
            doi,
            abstract_text,
            keywords,
            notes,
            provenance_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(item)
  }

  async fn get_research_item(&self, id: Uuid) -> Result<Option<ResearchItem>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawResearchItem> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ITEM_COLUMNS} FROM research_items WHERE item_id = ?1"
              ),
              rusqlite::params![id_str],
              item_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawResearchItem::into_item).transpose()
  }

  async fn list_research_items(
    &self,
    section: Option<&str>,
  ) -> Result<Vec<ResearchItem>> {
    let slug_str = section.map(str::to_owned);

    let raws: Vec<RawResearchItem> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(slug) = slug_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS_QUALIFIED} FROM research_items r
             JOIN research_links l
               ON l.research_item_id = r.item_id AND l.section_slug = ?1
             ORDER BY r.created_at DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![slug], item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM research_items ORDER BY created_at DESC"
          ))?;
          stmt
            .query_map([], item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawResearchItem::into_item).collect()
  }

  async fn update_research_item(
    &self,
    id: Uuid,
    patch: ResearchPatch,
  ) -> Result<Option<ResearchItem>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawResearchItem> = self
      .conn
      .call(move |conn| {
        let existing = conn
          .query_row(
            &format!(
              "SELECT {ITEM_COLUMNS} FROM research_items WHERE item_id = ?1"
            ),
            rusqlite::params![id_str],
            item_from_row,
          )
          .optional()?;

        let Some(mut raw) = existing else {
          return Ok(None);
        };

        if let Some(title) = patch.title {
          raw.title = title;
        }
        if let Some(authors) = patch.authors {
          raw.authors = authors;
        }
        if let Some(year) = patch.year {
          raw.year = year.map(i64::from);
        }
        if let Some(url) = patch.url {
          raw.url = url;
        }
        if let Some(doi) = patch.doi {
          raw.doi = doi;
        }
        if let Some(abstract_text) = patch.abstract_text {
          raw.abstract_text = abstract_text;
        }
        if let Some(summary) = patch.summary {
          raw.summary = Some(summary);
        }
        if let Some(keywords) = patch.keywords {
          raw.keywords = keywords;
        }
        if let Some(notes) = patch.notes {
          raw.notes = notes;
        }

        conn.execute(
          "UPDATE research_items SET
             title = ?1, authors = ?2, year = ?3, url = ?4, doi = ?5,
             abstract = ?6, summary = ?7, keywords = ?8, notes = ?9
           WHERE item_id = ?10",
          rusqlite::params![
            raw.title,
            raw.authors,
            raw.year,
            raw.url,
            raw.doi,
            raw.abstract_text,
            raw.summary,
            raw.keywords,
            raw.notes,
            raw.item_id,
          ],
        )?;

        Ok(Some(raw))
      })
      .await?;

    raw.map(RawResearchItem::into_item).transpose()
  }

  async fn delete_research_item(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM research_items WHERE item_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(deleted)
  }

  async fn count_research_items(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM research_items", [], |row| {
          row.get(0)
        })?)
      })
      .await?;

    Ok(count as u64)
  }

  // ── Links ─────────────────────────────────────────────────────────────────

  async fn link_research(
    &self,
    section_slug: &str,
    item_id: Uuid,
  ) -> Result<Option<ResearchLink>> {
    let slug_str = section_slug.to_owned();
    let id_str   = encode_uuid(item_id);
    let now_str  = encode_dt(Utc::now());

    let created_at: Option<String> = self
      .conn
      .call(move |conn| {
        let section_exists: bool = conn
          .query_row(
            "SELECT 1 FROM sections WHERE slug = ?1",
            rusqlite::params![slug_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        let item_exists: bool = conn
          .query_row(
            "SELECT 1 FROM research_items WHERE item_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !section_exists || !item_exists {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO research_links (section_slug, research_item_id, created_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(section_slug, research_item_id) DO NOTHING",
          rusqlite::params![slug_str, id_str, now_str],
        )?;

        let created_at: String = conn.query_row(
          "SELECT created_at FROM research_links
           WHERE section_slug = ?1 AND research_item_id = ?2",
          rusqlite::params![slug_str, id_str],
          |row| row.get(0),
        )?;

        Ok(Some(created_at))
      })
      .await?;

    created_at
      .map(|at| {
        Ok(ResearchLink {
          section_slug:     section_slug.to_owned(),
          research_item_id: item_id,
          created_at:       crate::encode::decode_dt(&at)?,
        })
      })
      .transpose()
  }

  async fn unlink_research(
    &self,
    section_slug: &str,
    item_id: Uuid,
  ) -> Result<()> {
    let slug_str = section_slug.to_owned();
    let id_str   = encode_uuid(item_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM research_links
           WHERE section_slug = ?1 AND research_item_id = ?2",
          rusqlite::params![slug_str, id_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}
