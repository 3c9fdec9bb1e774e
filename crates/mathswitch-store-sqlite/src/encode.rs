//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! sources and link labels their short codes.

use chrono::{DateTime, Utc};
use mathswitch_core::{
  concept::Concept,
  item::Item,
  link::{Link, LinkLabel},
  source::Source,
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

// ─── Source / LinkLabel ───────────────────────────────────────────────────────

pub fn decode_source(s: &str) -> Result<Source> {
  s.parse::<Source>().map_err(|_| Error::UnknownSource(s.to_owned()))
}

pub fn decode_label(s: &str) -> Result<LinkLabel> {
  s.parse::<LinkLabel>().map_err(|_| Error::UnknownLabel(s.to_owned()))
}

// ─── Names ───────────────────────────────────────────────────────────────────

/// The case-folded form concept names are unique under.
pub fn name_key(name: &str) -> String { name.to_lowercase() }

// ─── Row types ───────────────────────────────────────────────────────────────

pub const ITEM_COLUMNS: &str =
  "item_id, source, identifier, url, name, description, concept_id";

/// Raw strings read directly from an `items` row.
pub struct RawItem {
  pub item_id:     String,
  pub source:      String,
  pub identifier:  String,
  pub url:         String,
  pub name:        Option<String>,
  pub description: Option<String>,
  pub concept_id:  Option<String>,
}

impl RawItem {
  /// Read a row selected with [`ITEM_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_id:     row.get(0)?,
      source:      row.get(1)?,
      identifier:  row.get(2)?,
      url:         row.get(3)?,
      name:        row.get(4)?,
      description: row.get(5)?,
      concept_id:  row.get(6)?,
    })
  }

  pub fn into_item(self) -> Result<Item> {
    Ok(Item {
      item_id:     decode_uuid(&self.item_id)?,
      source:      decode_source(&self.source)?,
      identifier:  self.identifier,
      url:         self.url,
      name:        self.name,
      description: self.description,
      concept_id:  self.concept_id.as_deref().map(decode_uuid).transpose()?,
    })
  }
}

pub const CONCEPT_COLUMNS: &str = "concept_id, name, description, created_at";

/// Raw strings read directly from a `concepts` row.
pub struct RawConcept {
  pub concept_id:  String,
  pub name:        Option<String>,
  pub description: Option<String>,
  pub created_at:  String,
}

impl RawConcept {
  /// Read a row selected with [`CONCEPT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      concept_id:  row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      created_at:  row.get(3)?,
    })
  }

  pub fn into_concept(self) -> Result<Concept> {
    Ok(Concept {
      concept_id:  decode_uuid(&self.concept_id)?,
      name:        self.name,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `links` row.
pub struct RawLink {
  pub source_item:      String,
  pub destination_item: String,
  pub label:            String,
}

impl RawLink {
  pub fn into_link(self) -> Result<Link> {
    Ok(Link {
      source_item:      decode_uuid(&self.source_item)?,
      destination_item: decode_uuid(&self.destination_item)?,
      label:            decode_label(&self.label)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_key_folds_unicode() {
    assert_eq!(name_key("Ring"), "ring");
    assert_eq!(name_key("ÉQUATION"), "équation");
  }

  #[test]
  fn unknown_codes_are_errors() {
    assert!(matches!(decode_source("xx"), Err(Error::UnknownSource(_))));
    assert!(matches!(decode_label("same"), Err(Error::UnknownLabel(_))));
  }
}
