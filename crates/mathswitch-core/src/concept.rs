//! Concept — the canonical, deduplicated entity items are merged into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::Item;

/// A persisted concept. Non-null names are unique under case-insensitive
/// comparison; a concept without a name is legal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
  pub concept_id:  Uuid,
  pub name:        Option<String>,
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// Input for
/// [`ConceptStore::insert_or_get_concept`](crate::store::ConceptStore::insert_or_get_concept).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConcept {
  pub name:        Option<String>,
  pub description: Option<String>,
}

impl NewConcept {
  pub fn into_concept(self) -> Concept {
    Concept {
      concept_id:  Uuid::new_v4(),
      name:        self.name,
      description: self.description,
      created_at:  Utc::now(),
    }
  }
}

/// A concept together with every item assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptView {
  pub concept: Concept,
  pub items:   Vec<Item>,
}
