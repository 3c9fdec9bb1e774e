//! Turns components into concepts and assigns every member item.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::{
  Error, Result,
  concept::{Concept, NewConcept},
  item::Item,
  source::Source,
  store::{ConceptStore, Upsert},
};

// ─── Source priority ─────────────────────────────────────────────────────────

/// Ordering used to pick a component's canonical name and description. The
/// earlier a source appears, the more it is trusted. Sources missing from the
/// list rank after every listed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourcePriority(Vec<Source>);

impl Default for SourcePriority {
  fn default() -> Self {
    Self(vec![
      Source::Wikidata,
      Source::WikipediaEn,
      Source::NLab,
      Source::MathWorld,
      Source::ProofWiki,
      Source::EncyclopediaOfMathematics,
      Source::AgdaUnimath,
    ])
  }
}

impl SourcePriority {
  pub fn new(order: Vec<Source>) -> Self { Self(order) }

  pub fn rank(&self, source: Source) -> usize {
    self
      .0
      .iter()
      .position(|s| *s == source)
      .unwrap_or(self.0.len())
  }

  pub fn sources(&self) -> &[Source] { &self.0 }
}

/// Stable sort of `items` by source priority; the first item is the
/// component's primary representative.
pub fn canonical_order(items: &mut [Item], priority: &SourcePriority) {
  items.sort_by_key(|item| priority.rank(item.source));
}

/// Pick the concept fields for a component already in canonical order.
///
/// Both fields come from one member: the first one with a name, or the
/// primary when no member is named.
pub fn select_canonical(items: &[Item]) -> NewConcept {
  let Some(chosen) = items
    .iter()
    .find(|i| i.name.is_some())
    .or_else(|| items.first())
  else {
    return NewConcept::default();
  };
  NewConcept {
    name:        chosen.name.clone(),
    description: chosen.description.clone(),
  }
}

// ─── Materialisation ─────────────────────────────────────────────────────────

/// Counters reported at the end of a resolution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
  pub components:       usize,
  pub singletons:       usize,
  pub concepts_created: usize,
  /// Components whose name collided with an existing concept, or unnamed
  /// components that kept the concept from an earlier run.
  pub concepts_reused:  usize,
  pub items_assigned:   usize,
}

/// Create (or reuse) one concept per component and assign all members to it.
///
/// Name collisions are recovered by reusing the existing concept. An unnamed
/// component keeps its primary's previous concept while that concept is
/// still unnamed and unclaimed in this run. Store failures abort the run.
pub async fn materialize<S>(
  store: &S,
  priority: &SourcePriority,
  components: Vec<Vec<Item>>,
) -> Result<ResolutionReport>
where
  S: ConceptStore,
{
  let mut report = ResolutionReport::default();
  let mut claimed: HashSet<Uuid> = HashSet::new();

  for mut members in components {
    if members.is_empty() {
      continue;
    }
    report.components += 1;
    if members.len() == 1 {
      report.singletons += 1;
    }

    canonical_order(&mut members, priority);
    let fields = select_canonical(&members);

    let previous = match (fields.name.is_none(), members[0].concept_id) {
      (true, Some(id)) if !claimed.contains(&id) => {
        previous_unnamed(store, id).await?
      }
      _ => None,
    };

    let concept = if let Some(c) = previous {
      report.concepts_reused += 1;
      c
    } else {
      match store
        .insert_or_get_concept(fields)
        .await
        .map_err(Error::store)?
      {
        Upsert::Inserted(c) => {
          report.concepts_created += 1;
          c
        }
        Upsert::Existing(c) => {
          tracing::warn!(
            name = c.name.as_deref().unwrap_or_default(),
            primary = %members[0].key(),
            "concept name already taken; reusing existing concept"
          );
          report.concepts_reused += 1;
          c
        }
      }
    };
    claimed.insert(concept.concept_id);

    for item in &members {
      store
        .assign_concept(item.item_id, concept.concept_id)
        .await
        .map_err(Error::store)?;
      report.items_assigned += 1;
    }
  }

  Ok(report)
}

async fn previous_unnamed<S: ConceptStore>(store: &S, id: Uuid) -> Result<Option<Concept>> {
  let concept = store.get_concept(id).await.map_err(Error::store)?;
  Ok(concept.filter(|c| c.name.is_none()))
}
