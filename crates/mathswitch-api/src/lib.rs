//! JSON API for MathSwitch.
//!
//! Exposes an axum [`Router`] backed by any [`ConceptStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", mathswitch_api::api_router(store.clone()))
//! ```

pub mod concepts;
pub mod error;
pub mod items;
pub mod stats;

use std::sync::Arc;

use axum::{Router, routing::get};
use mathswitch_core::store::ConceptStore;

pub use error::ApiError;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ConceptStore + 'static,
{
  Router::new()
    .route("/concepts", get(concepts::search::<S>))
    .route("/concepts/id/{id}", get(concepts::get_by_id::<S>))
    .route("/concepts/{name}", get(concepts::get_by_name::<S>))
    .route("/items/{source}/{identifier}", get(items::redirect_to_concept::<S>))
    .route("/stats", get(stats::handler::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
