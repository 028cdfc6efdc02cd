//! SQL schema for the Uppsats SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The fixed thesis outline. Rows are seeded at first open and only ever
-- mutated (content, status), never inserted or deleted at runtime.
CREATE TABLE IF NOT EXISTS sections (
    slug        TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    sort_order  INTEGER NOT NULL UNIQUE,
    status      TEXT NOT NULL DEFAULT 'not_started',
    content     TEXT NOT NULL DEFAULT '',
    updated_at  TEXT NOT NULL    -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS research_items (
    item_id    TEXT PRIMARY KEY,
    title      TEXT NOT NULL,
    authors    TEXT NOT NULL DEFAULT '',
    year       INTEGER,
    url        TEXT,
    doi        TEXT,
    abstract   TEXT NOT NULL DEFAULT '',
    summary    TEXT,
    keywords   TEXT NOT NULL DEFAULT '',
    notes      TEXT NOT NULL DEFAULT '',
    provenance TEXT NOT NULL DEFAULT '{\"kind\":\"manual\"}',
    created_at TEXT NOT NULL
);

-- At most one link per (section, item) pair. A section cannot be deleted
-- while linked; deleting a research item removes its links.
CREATE TABLE IF NOT EXISTS research_links (
    section_slug     TEXT NOT NULL REFERENCES sections(slug) ON DELETE RESTRICT,
    research_item_id TEXT NOT NULL REFERENCES research_items(item_id) ON DELETE CASCADE,
    created_at       TEXT NOT NULL,
    PRIMARY KEY (section_slug, research_item_id)
);

CREATE INDEX IF NOT EXISTS research_links_item_idx ON research_links(research_item_id);
CREATE INDEX IF NOT EXISTS research_items_created_idx ON research_items(created_at);

PRAGMA user_version = 1;
";
