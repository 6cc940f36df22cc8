//! Error types for `cinegraph-core`.

use thiserror::Error;

use crate::id::{DirectorId, EventId, FilmId, GenreId, MpaId, ReviewId, UserId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(UserId),

  #[error("film not found: {0}")]
  FilmNotFound(FilmId),

  #[error("genre not found: {0}")]
  GenreNotFound(GenreId),

  #[error("mpa rating not found: {0}")]
  MpaNotFound(MpaId),

  #[error("director not found: {0}")]
  DirectorNotFound(DirectorId),

  #[error("review not found: {0}")]
  ReviewNotFound(ReviewId),

  #[error("event not found: {0}")]
  EventNotFound(EventId),

  #[error("user {0} cannot befriend or unfriend themselves")]
  SelfFriendship(UserId),

  #[error("user {0} cannot vote on their own review")]
  SelfVote(UserId),

  #[error("user {user} already likes film {film}")]
  AlreadyLiked { user: UserId, film: FilmId },

  /// A uniqueness constraint was violated by the backing store.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("validation failed: {0}")]
  Validation(String),

  /// The backing store failed. Never retried.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification of [`Error`], used by the HTTP layer to pick a
/// status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  InvalidOperation,
  Conflict,
  InvalidArgument,
  Store,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::UserNotFound(_)
      | Error::FilmNotFound(_)
      | Error::GenreNotFound(_)
      | Error::MpaNotFound(_)
      | Error::DirectorNotFound(_)
      | Error::ReviewNotFound(_)
      | Error::EventNotFound(_) => ErrorKind::NotFound,
      Error::SelfFriendship(_) | Error::SelfVote(_) => ErrorKind::InvalidOperation,
      Error::AlreadyLiked { .. } | Error::Conflict(_) => ErrorKind::Conflict,
      Error::InvalidArgument(_) | Error::Validation(_) => ErrorKind::InvalidArgument,
      Error::Store(_) => ErrorKind::Store,
    }
  }

  /// Wrap an arbitrary backend failure.
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
