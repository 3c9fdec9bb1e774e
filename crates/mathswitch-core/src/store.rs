//! The `ConceptStore` trait and the insert-or-get result type.
//!
//! The trait is implemented by storage backends (e.g.
//! `mathswitch-store-sqlite`). The pipeline, the API and the CLI depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  concept::{Concept, NewConcept},
  item::{Item, ItemKey, NewItem},
  link::Link,
  source::Source,
};

// ─── Upsert ──────────────────────────────────────────────────────────────────

/// Outcome of an insert-or-get: either the row was written, or a row with the
/// same unique key already existed and is returned instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Upsert<T> {
  Inserted(T),
  Existing(T),
}

impl<T> Upsert<T> {
  pub fn is_inserted(&self) -> bool { matches!(self, Self::Inserted(_)) }

  pub fn get(&self) -> &T {
    match self {
      Self::Inserted(t) | Self::Existing(t) => t,
    }
  }

  pub fn into_inner(self) -> T {
    match self {
      Self::Inserted(t) | Self::Existing(t) => t,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a MathSwitch store backend.
///
/// Every insert is an insert-or-get keyed on the row's natural unique key:
/// `(source, identifier)` for items, `(source_item, destination_item, label)`
/// for links and `lower(name)` for named concepts. A repeated insert is never
/// an error.
pub trait ConceptStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Items ─────────────────────────────────────────────────────────────

  /// Insert an item, or return the existing item with the same key.
  fn insert_item(
    &self,
    input: NewItem,
  ) -> impl Future<Output = Result<Upsert<Item>, Self::Error>> + Send + '_;

  fn get_item(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  fn get_item_by_key(
    &self,
    key: ItemKey,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  /// All items in insertion order.
  fn list_items(&self) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + '_;

  /// Number of items per source; sources without items are omitted.
  fn count_by_source(
    &self,
  ) -> impl Future<Output = Result<Vec<(Source, u64)>, Self::Error>> + Send + '_;

  /// Delete every item of `source` together with its links. Returns the
  /// number of items removed.
  fn clear_source(
    &self,
    source: Source,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Links ─────────────────────────────────────────────────────────────

  /// Record a link, or report that the identical link already exists.
  fn insert_link(
    &self,
    link: Link,
  ) -> impl Future<Output = Result<Upsert<Link>, Self::Error>> + Send + '_;

  /// All links in insertion order.
  fn list_links(&self) -> impl Future<Output = Result<Vec<Link>, Self::Error>> + Send + '_;

  // ── Concepts ──────────────────────────────────────────────────────────

  /// Create a concept, or return the existing concept whose name matches
  /// case-insensitively. Unnamed concepts are always created.
  fn insert_or_get_concept(
    &self,
    input: NewConcept,
  ) -> impl Future<Output = Result<Upsert<Concept>, Self::Error>> + Send + '_;

  fn get_concept(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Concept>, Self::Error>> + Send + '_;

  /// Look up a concept by name, ignoring case.
  fn get_concept_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Concept>, Self::Error>> + Send + 'a;

  /// Named concepts whose name contains `text`, ignoring case, ordered by
  /// name.
  fn search_concepts<'a>(
    &'a self,
    text: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Concept>, Self::Error>> + Send + 'a;

  fn list_concepts(&self) -> impl Future<Output = Result<Vec<Concept>, Self::Error>> + Send + '_;

  /// Point `item_id` at `concept_id`.
  fn assign_concept(
    &self,
    item_id: Uuid,
    concept_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Items currently assigned to `concept_id`.
  fn concept_items(
    &self,
    concept_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + '_;
}
