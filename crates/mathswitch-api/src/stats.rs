//! Handler for `GET /stats`: item counts per source and the concept total.

use std::{collections::BTreeMap, sync::Arc};

use axum::{Json, extract::State};
use mathswitch_core::store::ConceptStore;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct Stats {
  /// Keyed by source short code.
  pub items_by_source: BTreeMap<String, u64>,
  pub concepts:        usize,
}

pub async fn handler<S>(State(store): State<Arc<S>>) -> Result<Json<Stats>, ApiError>
where
  S: ConceptStore,
{
  let items_by_source = store
    .count_by_source()
    .await
    .map_err(ApiError::store)?
    .into_iter()
    .map(|(source, n)| (source.code().to_owned(), n))
    .collect();
  let concepts = store.list_concepts().await.map_err(ApiError::store)?.len();
  Ok(Json(Stats { items_by_source, concepts }))
}
