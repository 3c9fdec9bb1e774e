//! SQL schema for the MathSwitch SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- name_key is the case-folded name, computed by the store on insert.
-- NULL keys never conflict, so unnamed concepts are always distinct.
CREATE TABLE IF NOT EXISTS concepts (
    concept_id  TEXT PRIMARY KEY,
    name        TEXT,
    name_key    TEXT UNIQUE,
    description TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS items (
    item_id     TEXT PRIMARY KEY,
    source      TEXT NOT NULL,   -- short source code, e.g. 'Wd', 'nL'
    identifier  TEXT NOT NULL,
    url         TEXT NOT NULL,
    name        TEXT,
    description TEXT,
    concept_id  TEXT REFERENCES concepts(concept_id) ON DELETE SET NULL,
    UNIQUE (source, identifier)
);

-- Links are immutable evidence; they only disappear with their items.
CREATE TABLE IF NOT EXISTS links (
    source_item      TEXT NOT NULL REFERENCES items(item_id) ON DELETE CASCADE,
    destination_item TEXT NOT NULL REFERENCES items(item_id) ON DELETE CASCADE,
    label            TEXT NOT NULL,
    UNIQUE (source_item, destination_item, label)
);

CREATE INDEX IF NOT EXISTS items_concept_idx     ON items(concept_id);
CREATE INDEX IF NOT EXISTS links_destination_idx ON links(destination_item);

PRAGMA user_version = 1;
";
