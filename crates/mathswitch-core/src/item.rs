//! Item — one source's record of one concept.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::source::Source;

/// The natural key of an item: unique per store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
  pub source:     Source,
  pub identifier: String,
}

impl ItemKey {
  pub fn new(source: Source, identifier: impl Into<String>) -> Self {
    Self { source, identifier: identifier.into() }
  }
}

impl std::fmt::Display for ItemKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} {}", self.source, self.identifier)
  }
}

/// A persisted item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
  pub item_id:     Uuid,
  pub source:      Source,
  /// Source-local identifier, e.g. `Q83478` for Wikidata.
  pub identifier:  String,
  pub url:         String,
  pub name:        Option<String>,
  pub description: Option<String>,
  /// The concept this item was merged into by the last resolution run.
  pub concept_id:  Option<Uuid>,
}

impl Item {
  pub fn key(&self) -> ItemKey { ItemKey::new(self.source, self.identifier.clone()) }
}

/// Input for [`ConceptStore::insert_item`](crate::store::ConceptStore::insert_item).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
  pub source:      Source,
  pub identifier:  String,
  pub url:         String,
  pub name:        Option<String>,
  pub description: Option<String>,
}

impl NewItem {
  pub fn key(&self) -> ItemKey { ItemKey::new(self.source, self.identifier.clone()) }

  /// Assign a fresh id; the concept is unset until resolution runs.
  pub fn into_item(self) -> Item {
    Item {
      item_id:     Uuid::new_v4(),
      source:      self.source,
      identifier:  self.identifier,
      url:         self.url,
      name:        self.name,
      description: self.description,
      concept_id:  None,
    }
  }
}
