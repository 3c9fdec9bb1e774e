//! Handlers for `/concepts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/concepts` | Optional `?q=<substring>&limit=<n>` |
//! | `GET`  | `/concepts/:name` | Case-insensitive; 404 if not found |
//! | `GET`  | `/concepts/id/:id` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use mathswitch_core::{
  concept::{Concept, ConceptView},
  store::ConceptStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

const DEFAULT_LIMIT: usize = 50;

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Case-insensitive substring of the concept name.
  pub q:     Option<String>,
  pub limit: Option<usize>,
}

/// `GET /concepts[?q=...][&limit=...]`
///
/// Without `q`, lists every concept.
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Concept>>, ApiError>
where
  S: ConceptStore,
{
  let concepts = match params.q.as_deref() {
    Some(q) => store
      .search_concepts(q, params.limit.unwrap_or(DEFAULT_LIMIT))
      .await
      .map_err(ApiError::store)?,
    None => store.list_concepts().await.map_err(ApiError::store)?,
  };
  Ok(Json(concepts))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

async fn view<S>(store: &S, concept: Concept) -> Result<ConceptView, ApiError>
where
  S: ConceptStore,
{
  let items = store
    .concept_items(concept.concept_id)
    .await
    .map_err(ApiError::store)?;
  Ok(ConceptView { concept, items })
}

/// `GET /concepts/:name`
pub async fn get_by_name<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<ConceptView>, ApiError>
where
  S: ConceptStore,
{
  let concept = store
    .get_concept_by_name(&name)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("concept {name:?} not found")))?;
  Ok(Json(view(store.as_ref(), concept).await?))
}

/// `GET /concepts/id/:id`
pub async fn get_by_id<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ConceptView>, ApiError>
where
  S: ConceptStore,
{
  let concept = store
    .get_concept(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("concept {id} not found")))?;
  Ok(Json(view(store.as_ref(), concept).await?))
}
