//! One function per subcommand. Each reads and writes the store directly and
//! prints a short JSON report on stdout.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use mathswitch_core::{
  concept::ConceptView,
  pipeline::{self, LinkReport},
  record::RawRecord,
  source::Source,
  store::ConceptStore,
};
use mathswitch_store_sqlite::SqliteStore;
use serde::Serialize;

use crate::settings::AppConfig;

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
  std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// A `SOURCE=FILE` pair naming a SPARQL result file and the source to read
/// its rows as.
#[derive(Debug, Clone)]
pub struct WikidataInput {
  pub source: Source,
  pub file:   PathBuf,
}

impl std::str::FromStr for WikidataInput {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (code, file) = s
      .split_once('=')
      .ok_or_else(|| format!("expected SOURCE=FILE, got {s:?}"))?;
    let source = code
      .parse::<Source>()
      .map_err(|_| format!("unknown source code {code:?}"))?;
    Ok(Self { source, file: PathBuf::from(file) })
  }
}

fn wikidata_records(input: &WikidataInput) -> anyhow::Result<Vec<RawRecord>> {
  RawRecord::from_sparql_json(input.source, &read(&input.file)?)
    .with_context(|| format!("parsing SPARQL results in {}", input.file.display()))
}

fn agda_unimath_records(file: &Path) -> anyhow::Result<Vec<RawRecord>> {
  RawRecord::from_agda_unimath_json(&read(file)?)
    .with_context(|| format!("parsing Agda Unimath index {}", file.display()))
}

async fn import(store: &SqliteStore, records: &[RawRecord]) -> anyhow::Result<()> {
  let items = pipeline::ingest_records(store, records).await?;
  let links = pipeline::record_cross_links(store, records).await?;
  print_json(&serde_json::json!({ "items": items, "links": links }))
}

pub async fn import_wikidata(store: &SqliteStore, input: &WikidataInput) -> anyhow::Result<()> {
  import(store, &wikidata_records(input)?).await
}

pub async fn import_agda_unimath(store: &SqliteStore, file: &Path) -> anyhow::Result<()> {
  import(store, &agda_unimath_records(file)?).await
}

pub async fn link_same(store: &SqliteStore) -> anyhow::Result<()> {
  print_json(&pipeline::link_same_names(store).await?)
}

pub async fn resolve(store: &SqliteStore, cfg: &AppConfig) -> anyhow::Result<()> {
  print_json(&pipeline::resolve(store, &cfg.source_priority).await?)
}

pub async fn clear(store: &SqliteStore, source: Source) -> anyhow::Result<()> {
  let deleted = store.clear_source(source).await?;
  print_json(&serde_json::json!({ "source": source, "deleted": deleted }))
}

/// Clear every source fed by the inputs, re-import them, derive all links
/// and resolve. Items are imported before any links so that cross
/// references between input files resolve regardless of order.
pub async fn rebuild(
  store: &SqliteStore,
  cfg: &AppConfig,
  wikidata: &[WikidataInput],
  agda_unimath: Option<&Path>,
) -> anyhow::Result<()> {
  let mut batches = Vec::new();
  for input in wikidata {
    batches.push(wikidata_records(input)?);
  }
  if let Some(file) = agda_unimath {
    batches.push(agda_unimath_records(file)?);
  }

  let mut cleared: Vec<Source> = Vec::new();
  for records in &batches {
    for record in records {
      for item in record.implied_items()? {
        if !cleared.contains(&item.source) {
          cleared.push(item.source);
        }
      }
    }
  }
  for source in &cleared {
    store.clear_source(*source).await?;
  }

  for records in &batches {
    pipeline::ingest_records(store, records).await?;
  }
  let mut links = LinkReport::default();
  for records in &batches {
    let r = pipeline::record_cross_links(store, records).await?;
    links.inserted += r.inserted;
    links.duplicates += r.duplicates;
    links.missing += r.missing;
  }
  let same = pipeline::link_same_names(store).await?;
  let report = pipeline::resolve(store, &cfg.source_priority).await?;

  print_json(&serde_json::json!({
    "cleared": cleared,
    "cross_links": links,
    "same_name_links": same,
    "resolution": report,
  }))
}

pub async fn concept(store: &SqliteStore, name: &str) -> anyhow::Result<()> {
  let concept = store
    .get_concept_by_name(name)
    .await?
    .with_context(|| format!("no concept named {name:?}"))?;
  let items = store.concept_items(concept.concept_id).await?;
  print_json(&ConceptView { concept, items })
}

pub async fn search(store: &SqliteStore, text: &str, limit: usize) -> anyhow::Result<()> {
  for concept in store.search_concepts(text, limit).await? {
    if let Some(name) = concept.name {
      println!("{name}");
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wikidata_input_parses_source_and_file() {
    let input: WikidataInput = "nL=data/nlab.json".parse().unwrap();
    assert_eq!(input.source, Source::NLab);
    assert_eq!(input.file, PathBuf::from("data/nlab.json"));
  }

  #[test]
  fn wikidata_input_rejects_bad_forms() {
    assert!("data/nlab.json".parse::<WikidataInput>().is_err());
    assert!("xx=data/nlab.json".parse::<WikidataInput>().is_err());
  }
}
