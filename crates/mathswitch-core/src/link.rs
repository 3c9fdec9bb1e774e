//! Links — evidence that two items denote the same concept — and the two
//! channels that derive them.
//!
//! - The same-name channel pairs up items whose names agree case-insensitively.
//! - The cross-source channel resolves identifiers that one source publishes
//!   for another (e.g. a Wikidata entity's nLab page) against the item set.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::item::{Item, ItemKey};

// ─── Types ───────────────────────────────────────────────────────────────────

/// Names the evidence a link was derived from.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LinkLabel {
  /// Cross reference published in a Wikidata statement.
  Wikidata,
  /// Cross reference published in the Agda Unimath concept index.
  AgdaUnimath,
  /// The two items have the same name, ignoring case.
  NameEq,
}

/// A directed, labelled link. `(source_item, destination_item, label)` is
/// unique in any store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
  pub source_item:      Uuid,
  pub destination_item: Uuid,
  pub label:            LinkLabel,
}

/// A cross reference read from a raw record, not yet resolved to items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReference {
  pub from:  ItemKey,
  pub to:    ItemKey,
  pub label: LinkLabel,
}

/// A cross reference with at least one endpoint missing from the item set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReference {
  pub reference: CrossReference,
  /// The key that could not be found.
  pub missing:   ItemKey,
}

/// Output of the cross-source channel.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
  pub links:   Vec<Link>,
  pub missing: Vec<MissingReference>,
}

// ─── Item index ──────────────────────────────────────────────────────────────

/// Lookup from `(source, identifier)` to item id.
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
  ids: HashMap<ItemKey, Uuid>,
}

impl ItemIndex {
  pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
    let ids = items.into_iter().map(|item| (item.key(), item.item_id)).collect();
    Self { ids }
  }

  pub fn get(&self, key: &ItemKey) -> Option<Uuid> { self.ids.get(key).copied() }

  pub fn len(&self) -> usize { self.ids.len() }

  pub fn is_empty(&self) -> bool { self.ids.is_empty() }
}

// ─── Same-name channel ───────────────────────────────────────────────────────

/// One [`LinkLabel::NameEq`] link for every unordered pair of items whose
/// names are equal ignoring case. Within a group the earlier item (in input
/// order) is the link source. Unnamed items are skipped.
pub fn same_name_links(items: &[Item]) -> Vec<Link> {
  let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
  let mut order: Vec<String> = Vec::new();
  for (i, item) in items.iter().enumerate() {
    let Some(name) = item.name.as_deref() else { continue };
    let folded = name.to_lowercase();
    let group = groups.entry(folded.clone()).or_default();
    if group.is_empty() {
      order.push(folded);
    }
    group.push(i);
  }

  let mut links = Vec::new();
  for name in order {
    let members = &groups[&name];
    // Quadratic per group; groups are small in practice.
    for (a, &i) in members.iter().enumerate() {
      for &j in &members[a + 1..] {
        links.push(Link {
          source_item:      items[i].item_id,
          destination_item: items[j].item_id,
          label:            LinkLabel::NameEq,
        });
      }
    }
  }
  links
}

// ─── Cross-source channel ────────────────────────────────────────────────────

/// Resolve cross references against `index`. References whose endpoints are
/// not both present are reported in [`Extraction::missing`] and skipped.
pub fn cross_source_links(
  references: impl IntoIterator<Item = CrossReference>,
  index: &ItemIndex,
) -> Extraction {
  let mut out = Extraction::default();
  for reference in references {
    let from = index.get(&reference.from);
    let to = index.get(&reference.to);
    match (from, to) {
      (Some(source_item), Some(destination_item)) => out.links.push(Link {
        source_item,
        destination_item,
        label: reference.label,
      }),
      (None, _) => {
        tracing::warn!(from = %reference.from, to = %reference.to, "link source item does not exist");
        let missing = reference.from.clone();
        out.missing.push(MissingReference { reference, missing });
      }
      (Some(_), None) => {
        tracing::warn!(from = %reference.from, to = %reference.to, "referenced item does not exist");
        let missing = reference.to.clone();
        out.missing.push(MissingReference { reference, missing });
      }
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::source::Source;

  fn item(source: Source, identifier: &str, name: Option<&str>) -> Item {
    Item {
      item_id:     Uuid::new_v4(),
      source,
      identifier:  identifier.into(),
      url:         format!("https://example.org/{identifier}"),
      name:        name.map(Into::into),
      description: None,
      concept_id:  None,
    }
  }

  #[test]
  fn same_name_pairs_ignore_case() {
    let c = item(Source::MathWorld, "Ring", Some("Ring"));
    let d = item(Source::ProofWiki, "Definition:Ring", Some("ring"));
    let e = item(Source::NLab, "group", Some("group"));

    let links = same_name_links(&[c.clone(), d.clone(), e]);
    assert_eq!(links, vec![Link {
      source_item:      c.item_id,
      destination_item: d.item_id,
      label:            LinkLabel::NameEq,
    }]);
  }

  #[test]
  fn same_name_emits_every_pair_in_a_group() {
    let items: Vec<Item> = ["A", "a", "A"]
      .iter()
      .enumerate()
      .map(|(i, n)| item(Source::Wikidata, &format!("Q{i}"), Some(n)))
      .collect();
    let links = same_name_links(&items);
    assert_eq!(links.len(), 3);
    let pairs: Vec<(Uuid, Uuid)> =
      links.iter().map(|l| (l.source_item, l.destination_item)).collect();
    assert_eq!(pairs, vec![
      (items[0].item_id, items[1].item_id),
      (items[0].item_id, items[2].item_id),
      (items[1].item_id, items[2].item_id),
    ]);
  }

  #[test]
  fn unnamed_items_are_never_paired() {
    let items = vec![
      item(Source::Wikidata, "Q1", None),
      item(Source::Wikidata, "Q2", None),
    ];
    assert!(same_name_links(&items).is_empty());
  }

  #[test]
  fn cross_reference_resolves_to_link() {
    let a = item(Source::Wikidata, "Q83478", Some("Group"));
    let b = item(Source::NLab, "group", Some("group"));
    let index = ItemIndex::from_items([&a, &b]);

    let extraction = cross_source_links(
      [CrossReference {
        from:  a.key(),
        to:    b.key(),
        label: LinkLabel::Wikidata,
      }],
      &index,
    );
    assert!(extraction.missing.is_empty());
    assert_eq!(extraction.links, vec![Link {
      source_item:      a.item_id,
      destination_item: b.item_id,
      label:            LinkLabel::Wikidata,
    }]);
  }

  #[test]
  fn missing_target_is_reported_not_linked() {
    let e = item(Source::AgdaUnimath, "functor", Some("Functor"));
    let index = ItemIndex::from_items([&e]);
    let missing_key = ItemKey::new(Source::Wikidata, "Q99999");

    let extraction = cross_source_links(
      [CrossReference {
        from:  e.key(),
        to:    missing_key.clone(),
        label: LinkLabel::AgdaUnimath,
      }],
      &index,
    );
    assert!(extraction.links.is_empty());
    assert_eq!(extraction.missing.len(), 1);
    assert_eq!(extraction.missing[0].missing, missing_key);
  }

  #[test]
  fn label_codes_are_snake_case() {
    assert_eq!(LinkLabel::NameEq.as_ref(), "name_eq");
    assert_eq!("agda_unimath".parse::<LinkLabel>().unwrap(), LinkLabel::AgdaUnimath);
  }
}
