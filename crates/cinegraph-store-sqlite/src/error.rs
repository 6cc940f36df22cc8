//! Error type for `cinegraph-store-sqlite`.

use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored value could not be turned back into a domain type.
  #[error("undecodable column value: {0}")]
  Decode(String),
}

impl Error {
  /// The extended SQLite result code and message of a failed statement.
  fn failure(&self) -> Option<(i32, Option<&str>)> {
    match self {
      Error::Database(tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
        failure,
        message,
      ))) => Some((failure.extended_code, message.as_deref())),
      _ => None,
    }
  }
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self { Error::Database(tokio_rusqlite::Error::Rusqlite(e)) }
}

impl From<Error> for cinegraph_core::Error {
  fn from(e: Error) -> Self {
    match e.failure() {
      Some((ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY, message)) => {
        cinegraph_core::Error::Conflict(
          message.unwrap_or("uniqueness constraint failed").to_owned(),
        )
      }
      // A referenced row was deleted after the caller checked for it.
      Some((ffi::SQLITE_CONSTRAINT_FOREIGNKEY, _)) => {
        cinegraph_core::Error::Conflict("referenced record no longer exists".to_owned())
      }
      _ => cinegraph_core::Error::store(e),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
