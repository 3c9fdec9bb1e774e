//! Error type for `mathswitch-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown source code in database: {0:?}")]
  UnknownSource(String),

  #[error("unknown link label in database: {0:?}")]
  UnknownLabel(String),

  #[error("item not found: {0}")]
  ItemNotFound(uuid::Uuid),

  /// An insert reported a conflict but the conflicting row could not be read
  /// back.
  #[error("conflicting row vanished during insert-or-get")]
  ConflictVanished,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
