//! Error types for `mathswitch-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::source::Source;

#[derive(Debug, Error)]
pub enum Error {
  /// A link refers to an item that is not part of the resolution snapshot.
  #[error("link endpoint {0} is not in the item set")]
  UnknownItem(Uuid),

  #[error("record has no {field} for source {origin}")]
  MissingField {
    origin: Source,
    field:  &'static str,
  },

  #[error("source {0} cannot be read from this record")]
  UnsupportedSource(Source),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
