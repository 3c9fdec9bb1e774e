//! The resolution pipeline, one step per function:
//!
//! 1. [`ingest_records`] — store the items raw records describe.
//! 2. [`record_cross_links`] — derive and store cross-source links.
//! 3. [`link_same_names`] — derive and store same-name links.
//! 4. [`resolve`] — group items by link connectivity and materialise one
//!    concept per group.
//!
//! Each step reads a full snapshot from the store and runs to completion.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  component::item_components,
  link::{ItemIndex, Link, cross_source_links, same_name_links},
  materialize::{ResolutionReport, SourcePriority, materialize},
  record::RawRecord,
  store::ConceptStore,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
  pub inserted: usize,
  /// Items already present under the same `(source, identifier)`.
  pub existing: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
  pub inserted:   usize,
  pub duplicates: usize,
  /// Cross references whose target (or source) item does not exist.
  pub missing:    usize,
}

/// Store every item each record describes, including implied items.
pub async fn ingest_records<S>(store: &S, records: &[RawRecord]) -> Result<IngestReport>
where
  S: ConceptStore,
{
  let mut report = IngestReport::default();
  for record in records {
    for new_item in record.implied_items()? {
      let key = new_item.key();
      let upsert = store.insert_item(new_item).await.map_err(Error::store)?;
      if upsert.is_inserted() {
        report.inserted += 1;
      } else {
        tracing::info!(item = %key, "item is already in the database");
        report.existing += 1;
      }
    }
  }
  tracing::info!(inserted = report.inserted, existing = report.existing, "ingested records");
  Ok(report)
}

async fn store_links<S>(store: &S, links: Vec<Link>, report: &mut LinkReport) -> Result<()>
where
  S: ConceptStore,
{
  for link in links {
    let upsert = store.insert_link(link).await.map_err(Error::store)?;
    if upsert.is_inserted() {
      report.inserted += 1;
    } else {
      tracing::info!(
        source_item = %link.source_item,
        destination_item = %link.destination_item,
        label = %link.label,
        "repeated link"
      );
      report.duplicates += 1;
    }
  }
  Ok(())
}

/// Resolve the cross references in `records` against the stored items and
/// store the resulting links. Unresolvable references are counted, not fatal.
pub async fn record_cross_links<S>(store: &S, records: &[RawRecord]) -> Result<LinkReport>
where
  S: ConceptStore,
{
  let items = store.list_items().await.map_err(Error::store)?;
  let index = ItemIndex::from_items(&items);

  let mut references = Vec::new();
  for record in records {
    references.extend(record.cross_references()?);
  }
  let extraction = cross_source_links(references, &index);

  let mut report = LinkReport { missing: extraction.missing.len(), ..Default::default() };
  store_links(store, extraction.links, &mut report).await?;
  tracing::info!(
    inserted = report.inserted,
    duplicates = report.duplicates,
    missing = report.missing,
    "recorded cross-source links"
  );
  Ok(report)
}

/// Link every pair of stored items whose names agree ignoring case.
pub async fn link_same_names<S>(store: &S) -> Result<LinkReport>
where
  S: ConceptStore,
{
  let items = store.list_items().await.map_err(Error::store)?;
  let mut report = LinkReport::default();
  store_links(store, same_name_links(&items), &mut report).await?;
  tracing::info!(
    inserted = report.inserted,
    duplicates = report.duplicates,
    "recorded same-name links"
  );
  Ok(report)
}

/// Merge all stored items into concepts.
pub async fn resolve<S>(store: &S, priority: &SourcePriority) -> Result<ResolutionReport>
where
  S: ConceptStore,
{
  let items = store.list_items().await.map_err(Error::store)?;
  let links = store.list_links().await.map_err(Error::store)?;
  tracing::info!(items = items.len(), links = links.len(), "computing components");

  let components = item_components(items, &links)?;
  let report = materialize(store, priority, components).await?;
  tracing::info!(
    components = report.components,
    singletons = report.singletons,
    created = report.concepts_created,
    reused = report.concepts_reused,
    "resolution complete"
  );
  Ok(report)
}
