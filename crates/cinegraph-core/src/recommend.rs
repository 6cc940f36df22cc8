//! Single-neighbour collaborative filtering.
//!
//! For a target user U, the neighbour is the other user sharing the most
//! liked films with U (lowest id on a tie). U is recommended everything the
//! neighbour likes that U does not. Recomputed from the live like ledger on
//! every call; nothing is trained or cached.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
  Result,
  engagement::Like,
  film::Film,
  id::{FilmId, UserId},
  store::{FilmStore, StoreResultExt as _, require_user},
};

fn likes_by_user(likes: &[Like]) -> BTreeMap<UserId, BTreeSet<FilmId>> {
  let mut by_user: BTreeMap<UserId, BTreeSet<FilmId>> = BTreeMap::new();
  for like in likes {
    by_user.entry(like.user_id).or_default().insert(like.film_id);
  }
  by_user
}

/// The user with the largest positive co-like overlap with `user`.
pub fn nearest_neighbor(likes: &[Like], user: UserId) -> Option<UserId> {
  let by_user = likes_by_user(likes);
  let mine = by_user.get(&user)?;
  neighbor_in(&by_user, user, mine)
}

fn neighbor_in(
  by_user: &BTreeMap<UserId, BTreeSet<FilmId>>,
  user: UserId,
  mine: &BTreeSet<FilmId>,
) -> Option<UserId> {
  let mut best: Option<(UserId, usize)> = None;
  // Ascending ids, strict improvement only: the lowest id wins a tie.
  for (&other, theirs) in by_user {
    if other == user {
      continue;
    }
    let overlap = mine.intersection(theirs).count();
    if overlap > 0 && best.is_none_or(|(_, n)| overlap > n) {
      best = Some((other, overlap));
    }
  }
  best.map(|(id, _)| id)
}

/// Ids of the films recommended to `user`, ascending.
pub fn recommended_film_ids(likes: &[Like], user: UserId) -> BTreeSet<FilmId> {
  let by_user = likes_by_user(likes);
  let Some(mine) = by_user.get(&user) else {
    return BTreeSet::new();
  };
  match neighbor_in(&by_user, user, mine) {
    Some(neighbor) => by_user[&neighbor].difference(mine).copied().collect(),
    None => BTreeSet::new(),
  }
}

/// Films recommended to `user`, by film id.
pub async fn recommendations<S: FilmStore>(store: &S, user: UserId) -> Result<Vec<Film>> {
  require_user(store, user).await?;
  let likes = store.list_likes().await.lift()?;
  let ids = recommended_film_ids(&likes, user);
  if ids.is_empty() {
    return Ok(Vec::new());
  }
  let films = store.list_films().await.lift()?;
  Ok(films.into_iter().filter(|f| ids.contains(&f.id)).collect())
}
