//! Raw per-source records and how each source derives an item from them.
//!
//! Two raw shapes are understood:
//!
//! - a row of a Wikidata SPARQL result (`results.bindings[*]`), which can be
//!   read as any of the sources Wikidata publishes identifiers for;
//! - an entry of the Agda Unimath `concept_index.json`.
//!
//! [`RawRecord`] is the single dispatch point over both.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  item::{ItemKey, NewItem},
  link::{CrossReference, LinkLabel},
  source::Source,
};

// ─── Wikidata properties ─────────────────────────────────────────────────────

/// A source Wikidata publishes identifiers for, and where to find them.
#[derive(Debug, Clone, Copy)]
pub struct WikidataProperty {
  pub source:      Source,
  /// The `wdt:` property holding the identifier.
  pub property:    &'static str,
  /// The SPARQL variable the identifier is bound to.
  pub binding_key: &'static str,
}

/// Sources identified through a Wikidata property. Wikipedia-EN is bound
/// separately through the sitelink (`wp_en`).
pub const WIKIDATA_PROPERTIES: [WikidataProperty; 4] = [
  WikidataProperty {
    source:      Source::NLab,
    property:    "wdt:P4215",
    binding_key: "nlabID",
  },
  WikidataProperty {
    source:      Source::MathWorld,
    property:    "wdt:P2812",
    binding_key: "mwID",
  },
  WikidataProperty {
    source:      Source::ProofWiki,
    property:    "wdt:P6781",
    binding_key: "pwID",
  },
  WikidataProperty {
    source:      Source::EncyclopediaOfMathematics,
    property:    "wdt:P7554",
    binding_key: "eomID",
  },
];

const ITEM_KEY: &str = "item";
const LABEL_KEY: &str = "itemLabel";
const DESCRIPTION_KEY: &str = "itemDescription";
const WIKIPEDIA_KEY: &str = "wp_en";

const AGDA_UNIMATH_BASE: &str = "https://unimath.github.io/agda-unimath/";

fn binding_key(source: Source) -> Option<&'static str> {
  match source {
    Source::WikipediaEn => Some(WIKIPEDIA_KEY),
    _ => WIKIDATA_PROPERTIES
      .iter()
      .find(|p| p.source == source)
      .map(|p| p.binding_key),
  }
}

fn last_segment(s: &str) -> &str { s.rsplit('/').next().unwrap_or(s) }

// ─── SPARQL JSON ─────────────────────────────────────────────────────────────

/// One bound variable in a SPARQL JSON result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparqlValue {
  pub value: String,
}

/// One row of a SPARQL JSON result: variable name → bound value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SparqlBinding {
  pub vars: HashMap<String, SparqlValue>,
}

impl SparqlBinding {
  pub fn get(&self, key: &str) -> Option<&str> {
    self.vars.get(key).map(|v| v.value.as_str())
  }

  pub fn contains(&self, key: &str) -> bool { self.vars.contains_key(key) }
}

#[derive(Deserialize)]
struct SparqlResults {
  results: SparqlBindings,
}

#[derive(Deserialize)]
struct SparqlBindings {
  bindings: Vec<SparqlBinding>,
}

/// Parse a SPARQL JSON result document into its rows.
pub fn parse_sparql_results(json: &str) -> Result<Vec<SparqlBinding>> {
  let doc: SparqlResults = serde_json::from_str(json)?;
  Ok(doc.results.bindings)
}

// ─── Agda Unimath ────────────────────────────────────────────────────────────

/// One entry of the Agda Unimath concept index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgdaUnimathEntry {
  pub id:       String,
  pub name:     String,
  /// Page path relative to the Agda Unimath site root.
  pub link:     String,
  /// Wikidata Q-id, if the entry is annotated with one.
  #[serde(default)]
  pub wikidata: Option<String>,
}

/// Parse the Agda Unimath `concept_index.json`.
pub fn parse_agda_unimath_index(json: &str) -> Result<Vec<AgdaUnimathEntry>> {
  Ok(serde_json::from_str(json)?)
}

// ─── Wikidata-derived view ───────────────────────────────────────────────────

/// A SPARQL row read as the item of one particular source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikidataView {
  source:     Source,
  binding:    SparqlBinding,
  identifier: String,
  url:        String,
}

impl WikidataView {
  /// Read `binding` as an item of `source`. Fails if the row carries no
  /// identifier for that source.
  pub fn new(source: Source, binding: SparqlBinding) -> Result<Self> {
    let entity = binding.get(ITEM_KEY).ok_or(Error::MissingField {
      origin: source,
      field:  ITEM_KEY,
    })?;

    let (identifier, url) = match source {
      Source::Wikidata => (last_segment(entity).to_owned(), entity.to_owned()),
      Source::WikipediaEn => {
        let url = binding.get(WIKIPEDIA_KEY).ok_or(Error::MissingField {
          origin: source,
          field:  WIKIPEDIA_KEY,
        })?;
        (last_segment(url).to_owned(), url.to_owned())
      }
      Source::AgdaUnimath => return Err(Error::UnsupportedSource(source)),
      other => {
        let key = binding_key(other).ok_or(Error::UnsupportedSource(other))?;
        let id = binding
          .get(key)
          .ok_or(Error::MissingField { origin: other, field: key })?
          .to_owned();
        let url = match other {
          Source::NLab => format!("https://ncatlab.org/nlab/show/{id}"),
          Source::MathWorld => format!("https://mathworld.wolfram.com/{id}.html"),
          Source::ProofWiki => format!("https://proofwiki.org/wiki/{id}"),
          _ => format!("https://encyclopediaofmath.org/wiki/{id}"),
        };
        (id, url)
      }
    };

    Ok(Self { source, binding, identifier, url })
  }

  /// The same row read as `source`.
  pub fn switch_to(&self, source: Source) -> Result<Self> {
    Self::new(source, self.binding.clone())
  }

  fn name(&self) -> Option<&str> {
    match self.source {
      Source::Wikidata => self.binding.get(LABEL_KEY),
      _ => Some(&self.identifier),
    }
  }

  fn description(&self) -> Option<&str> {
    match self.source {
      Source::Wikidata => self.binding.get(DESCRIPTION_KEY),
      _ => None,
    }
  }

  fn has_source(&self, source: Source) -> bool {
    match source {
      Source::Wikidata => true,
      Source::AgdaUnimath => false,
      other => binding_key(other).is_some_and(|k| self.binding.contains(k)),
    }
  }
}

// ─── RawRecord ───────────────────────────────────────────────────────────────

/// A raw record from any supported source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord {
  Wikidata(WikidataView),
  AgdaUnimath(AgdaUnimathEntry),
}

impl RawRecord {
  /// Read a SPARQL row as `source`.
  pub fn from_binding(source: Source, binding: SparqlBinding) -> Result<Self> {
    WikidataView::new(source, binding).map(Self::Wikidata)
  }

  /// Parse a whole SPARQL JSON document, reading every row as `source`.
  pub fn from_sparql_json(source: Source, json: &str) -> Result<Vec<Self>> {
    parse_sparql_results(json)?
      .into_iter()
      .map(|b| Self::from_binding(source, b))
      .collect()
  }

  /// Parse a whole Agda Unimath concept index.
  pub fn from_agda_unimath_json(json: &str) -> Result<Vec<Self>> {
    Ok(
      parse_agda_unimath_index(json)?
        .into_iter()
        .map(Self::AgdaUnimath)
        .collect(),
    )
  }

  pub fn source(&self) -> Source {
    match self {
      Self::Wikidata(v) => v.source,
      Self::AgdaUnimath(_) => Source::AgdaUnimath,
    }
  }

  pub fn identifier(&self) -> &str {
    match self {
      Self::Wikidata(v) => &v.identifier,
      Self::AgdaUnimath(e) => &e.id,
    }
  }

  pub fn url(&self) -> String {
    match self {
      Self::Wikidata(v) => v.url.clone(),
      Self::AgdaUnimath(e) => format!("{AGDA_UNIMATH_BASE}{}", e.link),
    }
  }

  pub fn name(&self) -> Option<&str> {
    match self {
      Self::Wikidata(v) => v.name(),
      Self::AgdaUnimath(e) => Some(&e.name),
    }
  }

  pub fn description(&self) -> Option<&str> {
    match self {
      Self::Wikidata(v) => v.description(),
      Self::AgdaUnimath(_) => None,
    }
  }

  /// Whether the record names an identifier in `other`.
  pub fn has_cross_reference(&self, other: Source) -> bool {
    if other == self.source() {
      return false;
    }
    match self {
      Self::Wikidata(v) if v.source == Source::Wikidata => v.has_source(other),
      Self::Wikidata(v) => {
        matches!(other, Source::Wikidata | Source::WikipediaEn) && v.has_source(other)
      }
      Self::AgdaUnimath(e) => other == Source::Wikidata && e.wikidata.is_some(),
    }
  }

  pub fn key(&self) -> ItemKey { ItemKey::new(self.source(), self.identifier()) }

  pub fn to_new_item(&self) -> NewItem {
    NewItem {
      source:      self.source(),
      identifier:  self.identifier().to_owned(),
      url:         self.url(),
      name:        self.name().map(str::to_owned),
      description: self.description().map(str::to_owned),
    }
  }

  /// This record's item followed by the items the record implies for other
  /// sources: a row fetched for nLab also describes the Wikidata entity, and
  /// any row with a sitelink describes the English Wikipedia article.
  pub fn implied_items(&self) -> Result<Vec<NewItem>> {
    let mut out = vec![self.to_new_item()];
    if let Self::Wikidata(view) = self {
      if view.source != Source::Wikidata {
        out.push(Self::Wikidata(view.switch_to(Source::Wikidata)?).to_new_item());
      }
      if view.source != Source::WikipediaEn && view.has_source(Source::WikipediaEn) {
        out.push(Self::Wikidata(view.switch_to(Source::WikipediaEn)?).to_new_item());
      }
    }
    Ok(out)
  }

  /// Targets this record publishes an identifier for.
  ///
  /// A Wikidata row read as Wikidata points at every other source it binds;
  /// read as any other source it points at Wikipedia-EN (when bound) and back
  /// at Wikidata. Agda Unimath entries point at their Wikidata entity.
  pub fn cross_references(&self) -> Result<Vec<CrossReference>> {
    let from = self.key();
    let mut out = Vec::new();
    match self {
      Self::Wikidata(view) => {
        let mut targets = vec![Source::WikipediaEn];
        if view.source == Source::Wikidata {
          targets.extend(WIKIDATA_PROPERTIES.iter().map(|p| p.source));
        } else {
          targets.push(Source::Wikidata);
        }
        for target in targets {
          if !self.has_cross_reference(target) {
            continue;
          }
          let to = view.switch_to(target)?;
          out.push(CrossReference {
            from:  from.clone(),
            to:    ItemKey::new(target, to.identifier),
            label: LinkLabel::Wikidata,
          });
        }
      }
      Self::AgdaUnimath(entry) => {
        if let Some(wd) = &entry.wikidata {
          out.push(CrossReference {
            from,
            to: ItemKey::new(Source::Wikidata, wd.clone()),
            label: LinkLabel::AgdaUnimath,
          });
        }
      }
    }
    Ok(out)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SPARQL: &str = r#"{
    "head": { "vars": ["item", "itemLabel"] },
    "results": { "bindings": [
      {
        "item":            { "type": "uri", "value": "http://www.wikidata.org/entity/Q83478" },
        "itemLabel":       { "type": "literal", "value": "group" },
        "itemDescription": { "type": "literal", "value": "algebraic structure" },
        "wp_en":           { "type": "uri", "value": "https://en.wikipedia.org/wiki/Group_(mathematics)" },
        "nlabID":          { "type": "literal", "value": "group" },
        "mwID":            { "type": "literal", "value": "Group" }
      },
      {
        "item":      { "type": "uri", "value": "http://www.wikidata.org/entity/Q1" },
        "itemLabel": { "type": "literal", "value": "universe" }
      }
    ] }
  }"#;

  fn first_binding() -> SparqlBinding {
    parse_sparql_results(SPARQL).unwrap().remove(0)
  }

  #[test]
  fn wikidata_view_fields() {
    let r = RawRecord::from_binding(Source::Wikidata, first_binding()).unwrap();
    assert_eq!(r.identifier(), "Q83478");
    assert_eq!(r.url(), "http://www.wikidata.org/entity/Q83478");
    assert_eq!(r.name(), Some("group"));
    assert_eq!(r.description(), Some("algebraic structure"));
  }

  #[test]
  fn other_source_views_derive_urls() {
    let b = first_binding();
    let nlab = RawRecord::from_binding(Source::NLab, b.clone()).unwrap();
    assert_eq!(nlab.identifier(), "group");
    assert_eq!(nlab.url(), "https://ncatlab.org/nlab/show/group");
    assert_eq!(nlab.name(), Some("group"));
    assert_eq!(nlab.description(), None);

    let mw = RawRecord::from_binding(Source::MathWorld, b.clone()).unwrap();
    assert_eq!(mw.url(), "https://mathworld.wolfram.com/Group.html");

    let wp = RawRecord::from_binding(Source::WikipediaEn, b).unwrap();
    assert_eq!(wp.identifier(), "Group_(mathematics)");
    assert_eq!(wp.name(), Some("Group_(mathematics)"));
  }

  #[test]
  fn view_without_identifier_is_rejected() {
    let b = parse_sparql_results(SPARQL).unwrap().remove(1);
    let err = RawRecord::from_binding(Source::ProofWiki, b).unwrap_err();
    assert!(matches!(err, Error::MissingField { origin: Source::ProofWiki, field: "pwID" }));
  }

  #[test]
  fn agda_unimath_source_is_not_a_sparql_view() {
    let err = RawRecord::from_binding(Source::AgdaUnimath, first_binding()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedSource(Source::AgdaUnimath)));
  }

  #[test]
  fn wikidata_view_references_every_bound_source() {
    let r = RawRecord::from_binding(Source::Wikidata, first_binding()).unwrap();
    assert!(r.has_cross_reference(Source::NLab));
    assert!(!r.has_cross_reference(Source::ProofWiki));
    assert!(!r.has_cross_reference(Source::Wikidata));

    let targets: Vec<ItemKey> =
      r.cross_references().unwrap().into_iter().map(|c| c.to).collect();
    assert_eq!(targets, vec![
      ItemKey::new(Source::WikipediaEn, "Group_(mathematics)"),
      ItemKey::new(Source::NLab, "group"),
      ItemKey::new(Source::MathWorld, "Group"),
    ]);
  }

  #[test]
  fn other_view_references_back_to_wikidata() {
    let r = RawRecord::from_binding(Source::NLab, first_binding()).unwrap();
    let refs = r.cross_references().unwrap();
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[1].to, ItemKey::new(Source::Wikidata, "Q83478"));
    assert!(refs.iter().all(|c| c.label == LinkLabel::Wikidata));
  }

  #[test]
  fn non_wikidata_view_only_refers_to_wikidata_and_wikipedia() {
    let r = RawRecord::from_binding(Source::NLab, first_binding()).unwrap();
    assert!(r.has_cross_reference(Source::Wikidata));
    assert!(r.has_cross_reference(Source::WikipediaEn));
    assert!(!r.has_cross_reference(Source::MathWorld));

    let targets: Vec<Source> =
      r.cross_references().unwrap().into_iter().map(|c| c.to.source).collect();
    for source in [Source::MathWorld, Source::ProofWiki, Source::EncyclopediaOfMathematics] {
      assert_eq!(r.has_cross_reference(source), targets.contains(&source));
    }
  }

  #[test]
  fn implied_items_include_wikidata_and_wikipedia() {
    let r = RawRecord::from_binding(Source::NLab, first_binding()).unwrap();
    let sources: Vec<Source> =
      r.implied_items().unwrap().into_iter().map(|i| i.source).collect();
    assert_eq!(sources, vec![Source::NLab, Source::Wikidata, Source::WikipediaEn]);
  }

  #[test]
  fn agda_unimath_entries() {
    let json = r#"[
      {"id": "functor", "name": "Functor", "link": "category-theory.functors.html"},
      {"id": "group", "name": "Group", "link": "group-theory.groups.html", "wikidata": "Q83478"}
    ]"#;
    let records = RawRecord::from_agda_unimath_json(json).unwrap();
    assert_eq!(records.len(), 2);

    let functor = &records[0];
    assert_eq!(functor.source(), Source::AgdaUnimath);
    assert_eq!(
      functor.url(),
      "https://unimath.github.io/agda-unimath/category-theory.functors.html"
    );
    assert!(functor.cross_references().unwrap().is_empty());

    let group = &records[1];
    assert!(group.has_cross_reference(Source::Wikidata));
    let refs = group.cross_references().unwrap();
    assert_eq!(refs, vec![CrossReference {
      from:  ItemKey::new(Source::AgdaUnimath, "group"),
      to:    ItemKey::new(Source::Wikidata, "Q83478"),
      label: LinkLabel::AgdaUnimath,
    }]);
  }
}
