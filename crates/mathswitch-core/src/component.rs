//! Groups items into connected components over their links.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{Error, Result, item::Item, link::Link, union_find::DisjointSet};

/// Partition `items` into the connected components of `links`, treating
/// links as undirected edges.
///
/// Items are indexed in input order. Components are returned ordered by their
/// first member; members keep input order. Items with no link form singleton
/// components. A link naming an item absent from `items` is an error.
pub fn item_components(items: Vec<Item>, links: &[Link]) -> Result<Vec<Vec<Item>>> {
  let index: HashMap<Uuid, usize> = items
    .iter()
    .enumerate()
    .map(|(i, item)| (item.item_id, i))
    .collect();

  let mut sets = DisjointSet::new(items.len());
  for link in links {
    let a = *index
      .get(&link.source_item)
      .ok_or(Error::UnknownItem(link.source_item))?;
    let b = *index
      .get(&link.destination_item)
      .ok_or(Error::UnknownItem(link.destination_item))?;
    sets.union(a, b);
  }

  let mut groups: Vec<Vec<usize>> = sets.components().into_values().collect();
  groups.sort_by_key(|members| members[0]);

  let mut slots: Vec<Option<Item>> = items.into_iter().map(Some).collect();
  let components = groups
    .into_iter()
    .map(|members| {
      members
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect::<Vec<_>>()
    })
    .collect();
  Ok(components)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{link::LinkLabel, source::Source};

  fn item(source: Source, identifier: &str) -> Item {
    Item {
      item_id:     Uuid::new_v4(),
      source,
      identifier:  identifier.into(),
      url:         String::new(),
      name:        Some(identifier.into()),
      description: None,
      concept_id:  None,
    }
  }

  fn link(a: &Item, b: &Item) -> Link {
    Link {
      source_item:      a.item_id,
      destination_item: b.item_id,
      label:            LinkLabel::Wikidata,
    }
  }

  fn ids(components: &[Vec<Item>]) -> Vec<Vec<&str>> {
    components
      .iter()
      .map(|c| c.iter().map(|i| i.identifier.as_str()).collect())
      .collect()
  }

  #[test]
  fn components_partition_the_items() {
    let items: Vec<Item> = (0..6).map(|i| item(Source::Wikidata, &format!("Q{i}"))).collect();
    let links = vec![
      link(&items[4], &items[1]),
      link(&items[1], &items[0]),
      link(&items[3], &items[5]),
    ];

    let components = item_components(items.clone(), &links).unwrap();
    assert_eq!(ids(&components), vec![
      vec!["Q0", "Q1", "Q4"],
      vec!["Q2"],
      vec!["Q3", "Q5"],
    ]);

    let total: usize = components.iter().map(Vec::len).sum();
    assert_eq!(total, items.len());
  }

  #[test]
  fn link_direction_does_not_matter() {
    let a = item(Source::Wikidata, "Q1");
    let b = item(Source::NLab, "group");
    let forward = item_components(vec![a.clone(), b.clone()], &[link(&a, &b)]).unwrap();
    let backward = item_components(vec![a.clone(), b.clone()], &[link(&b, &a)]).unwrap();
    assert_eq!(ids(&forward), ids(&backward));
    assert_eq!(forward.len(), 1);
  }

  #[test]
  fn unlinked_item_is_a_singleton() {
    let e = item(Source::AgdaUnimath, "functor");
    let components = item_components(vec![e.clone()], &[]).unwrap();
    assert_eq!(components, vec![vec![e]]);
  }

  #[test]
  fn duplicate_links_do_not_change_the_partition() {
    let a = item(Source::Wikidata, "Q1");
    let b = item(Source::NLab, "x");
    let c = item(Source::MathWorld, "y");
    let items = vec![a.clone(), b.clone(), c];
    let once = item_components(items.clone(), &[link(&a, &b)]).unwrap();
    let twice = item_components(items, &[link(&a, &b), link(&a, &b)]).unwrap();
    assert_eq!(ids(&once), ids(&twice));
  }

  #[test]
  fn unknown_endpoint_is_fatal() {
    let a = item(Source::Wikidata, "Q1");
    let stranger = item(Source::NLab, "stranger");
    let err = item_components(vec![a.clone()], &[link(&a, &stranger)]).unwrap_err();
    assert!(matches!(err, Error::UnknownItem(id) if id == stranger.item_id));
  }

  #[test]
  fn empty_input_yields_no_components() {
    assert!(item_components(Vec::new(), &[]).unwrap().is_empty());
  }
}
