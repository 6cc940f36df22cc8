//! The engagement ledger: which users like which films.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Outcome, Result,
  event::{EventType, NewEvent, Operation},
  id::{FilmId, UserId},
  store::{FilmStore, StoreResultExt as _, require_film, require_user},
};

/// One `(user, film)` like edge. Unique per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Like {
  pub user_id: UserId,
  pub film_id: FilmId,
}

/// Record that `user` likes `film`.
///
/// Fails with [`Error::AlreadyLiked`] when the edge exists. The decision is
/// taken from the result of the single insert, so of two racing requests
/// exactly one succeeds.
pub async fn like<S: FilmStore>(store: &S, user: UserId, film: FilmId) -> Result<Outcome<()>> {
  require_user(store, user).await?;
  require_film(store, film).await?;
  if !store.insert_like(user, film).await.lift()? {
    return Err(Error::AlreadyLiked { user, film });
  }
  Ok(Outcome::with_effect((), NewEvent::new(user, film, EventType::Like, Operation::Add)))
}

/// Withdraw `user`'s like of `film`. A missing like is a silent no-op.
pub async fn unlike<S: FilmStore>(
  store: &S,
  user: UserId,
  film: FilmId,
) -> Result<Outcome<bool>> {
  require_user(store, user).await?;
  require_film(store, film).await?;
  if store.delete_like(user, film).await.lift()? {
    Ok(Outcome::with_effect(
      true,
      NewEvent::new(user, film, EventType::Like, Operation::Remove),
    ))
  } else {
    Ok(Outcome::quiet(false))
  }
}

pub async fn likes_of<S: FilmStore>(store: &S, film: FilmId) -> Result<BTreeSet<UserId>> {
  Ok(require_film(store, film).await?.likes)
}

pub async fn like_count_of<S: FilmStore>(store: &S, film: FilmId) -> Result<usize> {
  Ok(likes_of(store, film).await?.len())
}
