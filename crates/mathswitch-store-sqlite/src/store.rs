//! [`SqliteStore`] — the SQLite implementation of [`ConceptStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use mathswitch_core::{
  concept::{Concept, NewConcept},
  item::{Item, ItemKey, NewItem},
  link::Link,
  source::Source,
  store::{ConceptStore, Upsert},
};

use crate::{
  Error, Result,
  encode::{
    CONCEPT_COLUMNS, ITEM_COLUMNS, RawConcept, RawItem, RawLink, decode_source, encode_dt,
    encode_uuid, name_key,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A MathSwitch store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
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
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT {ITEM_COLUMNS} ...` query and decode every row.
  async fn query_items(&self, sql: String, param: Option<String>) -> Result<Vec<Item>> {
    let raws: Vec<RawItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
          Some(p) => stmt
            .query_map(rusqlite::params![p], RawItem::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawItem::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawItem::into_item).collect()
  }

  /// Run a query returning at most one concept row.
  async fn query_concept(&self, sql: String, param: String) -> Result<Option<Concept>> {
    let raw: Option<RawConcept> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![param], RawConcept::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawConcept::into_concept).transpose()
  }
}

// ─── ConceptStore impl ───────────────────────────────────────────────────────

impl ConceptStore for SqliteStore {
  type Error = Error;

  // ── Items ─────────────────────────────────────────────────────────────────

  async fn insert_item(&self, input: NewItem) -> Result<Upsert<Item>> {
    let item = input.into_item();

    let id_str      = encode_uuid(item.item_id);
    let source      = item.source.code().to_owned();
    let identifier  = item.identifier.clone();
    let url         = item.url.clone();
    let name        = item.name.clone();
    let description = item.description.clone();

    let (inserted, existing): (bool, Option<RawItem>) = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO items (item_id, source, identifier, url, name, description)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (source, identifier) DO NOTHING",
          rusqlite::params![id_str, source, identifier, url, name, description],
        )?;
        if changed > 0 {
          return Ok((true, None));
        }
        let existing = conn
          .query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM items WHERE source = ?1 AND identifier = ?2"),
            rusqlite::params![source, identifier],
            RawItem::from_row,
          )
          .optional()?;
        Ok((false, existing))
      })
      .await?;

    if inserted {
      return Ok(Upsert::Inserted(item));
    }
    let existing = existing.ok_or(Error::ConflictVanished)?.into_item()?;
    Ok(Upsert::Existing(existing))
  }

  async fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
    let mut items = self
      .query_items(
        format!("SELECT {ITEM_COLUMNS} FROM items WHERE item_id = ?1"),
        Some(encode_uuid(id)),
      )
      .await?;
    Ok(items.pop())
  }

  async fn get_item_by_key(&self, key: ItemKey) -> Result<Option<Item>> {
    let source     = key.source.code().to_owned();
    let identifier = key.identifier;

    let raw: Option<RawItem> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ITEM_COLUMNS} FROM items WHERE source = ?1 AND identifier = ?2"),
              rusqlite::params![source, identifier],
              RawItem::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawItem::into_item).transpose()
  }

  async fn list_items(&self) -> Result<Vec<Item>> {
    self
      .query_items(format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY rowid"), None)
      .await
  }

  async fn count_by_source(&self) -> Result<Vec<(Source, u64)>> {
    let rows: Vec<(String, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT source, COUNT(*) FROM items GROUP BY source ORDER BY source")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(code, n)| Ok((decode_source(&code)?, n.max(0) as u64)))
      .collect()
  }

  async fn clear_source(&self, source: Source) -> Result<u64> {
    let code = source.code().to_owned();
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM items WHERE source = ?1", rusqlite::params![code])?)
      })
      .await?;
    tracing::info!(%source, deleted, "cleared source");
    Ok(deleted as u64)
  }

  // ── Links ─────────────────────────────────────────────────────────────────

  async fn insert_link(&self, link: Link) -> Result<Upsert<Link>> {
    let src_str = encode_uuid(link.source_item);
    let dst_str = encode_uuid(link.destination_item);
    let label   = link.label.as_ref().to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO links (source_item, destination_item, label)
           VALUES (?1, ?2, ?3)
           ON CONFLICT (source_item, destination_item, label) DO NOTHING",
          rusqlite::params![src_str, dst_str, label],
        )?)
      })
      .await?;

    Ok(if changed > 0 { Upsert::Inserted(link) } else { Upsert::Existing(link) })
  }

  async fn list_links(&self) -> Result<Vec<Link>> {
    let raws: Vec<RawLink> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT source_item, destination_item, label FROM links ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawLink {
              source_item:      row.get(0)?,
              destination_item: row.get(1)?,
              label:            row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLink::into_link).collect()
  }

  // ── Concepts ──────────────────────────────────────────────────────────────

  async fn insert_or_get_concept(&self, input: NewConcept) -> Result<Upsert<Concept>> {
    let concept = input.into_concept();

    let id_str      = encode_uuid(concept.concept_id);
    let name        = concept.name.clone();
    let key         = concept.name.as_deref().map(name_key);
    let description = concept.description.clone();
    let at_str      = encode_dt(concept.created_at);

    let (inserted, existing): (bool, Option<RawConcept>) = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO concepts (concept_id, name, name_key, description, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (name_key) DO NOTHING",
          rusqlite::params![id_str, name, key, description, at_str],
        )?;
        if changed > 0 {
          return Ok((true, None));
        }
        let existing = conn
          .query_row(
            &format!("SELECT {CONCEPT_COLUMNS} FROM concepts WHERE name_key = ?1"),
            rusqlite::params![key],
            RawConcept::from_row,
          )
          .optional()?;
        Ok((false, existing))
      })
      .await?;

    if inserted {
      return Ok(Upsert::Inserted(concept));
    }
    let existing = existing.ok_or(Error::ConflictVanished)?.into_concept()?;
    Ok(Upsert::Existing(existing))
  }

  async fn get_concept(&self, id: Uuid) -> Result<Option<Concept>> {
    self
      .query_concept(
        format!("SELECT {CONCEPT_COLUMNS} FROM concepts WHERE concept_id = ?1"),
        encode_uuid(id),
      )
      .await
  }

  async fn get_concept_by_name(&self, name: &str) -> Result<Option<Concept>> {
    self
      .query_concept(
        format!("SELECT {CONCEPT_COLUMNS} FROM concepts WHERE name_key = ?1"),
        name_key(name),
      )
      .await
  }

  async fn search_concepts(&self, text: &str, limit: usize) -> Result<Vec<Concept>> {
    let needle    = name_key(text);
    let limit_val = limit as i64;

    let raws: Vec<RawConcept> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CONCEPT_COLUMNS} FROM concepts
           WHERE name_key IS NOT NULL AND instr(name_key, ?1) > 0
           ORDER BY name_key
           LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![needle, limit_val], RawConcept::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawConcept::into_concept).collect()
  }

  async fn list_concepts(&self) -> Result<Vec<Concept>> {
    let raws: Vec<RawConcept> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CONCEPT_COLUMNS} FROM concepts ORDER BY name_key, rowid"
        ))?;
        let rows = stmt
          .query_map([], RawConcept::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawConcept::into_concept).collect()
  }

  async fn assign_concept(&self, item_id: Uuid, concept_id: Uuid) -> Result<()> {
    let item_str    = encode_uuid(item_id);
    let concept_str = encode_uuid(concept_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE items SET concept_id = ?2 WHERE item_id = ?1",
          rusqlite::params![item_str, concept_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::ItemNotFound(item_id));
    }
    Ok(())
  }

  async fn concept_items(&self, concept_id: Uuid) -> Result<Vec<Item>> {
    self
      .query_items(
        format!("SELECT {ITEM_COLUMNS} FROM items WHERE concept_id = ?1 ORDER BY rowid"),
        Some(encode_uuid(concept_id)),
      )
      .await
  }
}
