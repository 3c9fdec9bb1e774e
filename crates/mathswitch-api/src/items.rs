//! Handler for `GET /items/:source/:identifier`.
//!
//! Redirects an item to the concept it was merged into, so that external
//! pages can link by source identifier (e.g. `/items/Wd/Q83478`).

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  response::Redirect,
};
use mathswitch_core::{item::ItemKey, source::Source, store::ConceptStore};

use crate::error::ApiError;

pub async fn redirect_to_concept<S>(
  State(store): State<Arc<S>>,
  Path((source, identifier)): Path<(Source, String)>,
) -> Result<Redirect, ApiError>
where
  S: ConceptStore,
{
  let key = ItemKey::new(source, identifier);
  let item = store
    .get_item_by_key(key.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("item {key} not found")))?;

  let concept_id = item
    .concept_id
    .ok_or_else(|| ApiError::NotFound(format!("item {key} is not assigned to a concept")))?;

  // Relative, so the redirect works wherever the router is nested.
  Ok(Redirect::temporary(&format!("../../concepts/id/{concept_id}")))
}
