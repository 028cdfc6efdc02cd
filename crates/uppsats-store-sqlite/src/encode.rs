//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Provenance is stored as
//! compact JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use uppsats_core::{
  research::{Provenance, ResearchItem},
  section::{Section, SectionStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── SectionStatus ────────────────────────────────────────────────────────────

pub fn encode_status(status: SectionStatus) -> &'static str {
  match status {
    SectionStatus::NotStarted => "not_started",
    SectionStatus::InProgress => "in_progress",
    SectionStatus::Draft => "draft",
    SectionStatus::Review => "review",
    SectionStatus::Done => "done",
  }
}

pub fn decode_status(s: &str) -> Result<SectionStatus> {
  match s {
    "not_started" => Ok(SectionStatus::NotStarted),
    "in_progress" => Ok(SectionStatus::InProgress),
    "draft" => Ok(SectionStatus::Draft),
    "review" => Ok(SectionStatus::Review),
    "done" => Ok(SectionStatus::Done),
    other => Err(Error::Core(uppsats_core::Error::UnknownStatus(
      other.to_string(),
    ))),
  }
}

// ─── Provenance ───────────────────────────────────────────────────────────────

pub fn encode_provenance(p: &Provenance) -> Result<String> {
  Ok(serde_json::to_string(p)?)
}

pub fn decode_provenance(s: &str) -> Result<Provenance> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `sections` row.
pub struct RawSection {
  pub slug:       String,
  pub title:      String,
  pub sort_order: i64,
  pub status:     String,
  pub content:    String,
  pub updated_at: String,
}

impl RawSection {
  pub fn into_section(self) -> Result<Section> {
    Ok(Section {
      slug:       self.slug,
      title:      self.title,
      sort_order: self.sort_order as u32,
      status:     decode_status(&self.status)?,
      content:    self.content,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `research_items` row.
pub struct RawResearchItem {
  pub item_id:    String,
  pub title:      String,
  pub authors:    String,
  pub year:       Option<i64>,
  pub url:        Option<String>,
  pub doi:        Option<String>,
  pub abstract_text: String,
  pub summary:    Option<String>,
  pub keywords:   String,
  pub notes:      String,
  pub provenance: String,
  pub created_at: String,
}

impl RawResearchItem {
  pub fn into_item(self) -> Result<ResearchItem> {
    Ok(ResearchItem {
      item_id:       decode_uuid(&self.item_id)?,
      title:         self.title,
      authors:       self.authors,
      year:          self.year.map(|y| y as i32),
      url:           self.url,
      doi:           self.doi,
      abstract_text: self.abstract_text,
      summary:       self.summary,
      keywords:      self.keywords,
      notes:         self.notes,
      provenance:    decode_provenance(&self.provenance)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
