//! The social graph: directed friendship edges.
//!
//! `a → b` means `a` has added `b`. Nothing is implied about `b → a`, and
//! common friends are the intersection of the two users' *outbound* sets.

use std::collections::BTreeSet;

use tracing::debug;

use crate::{
  Error, Outcome, Result,
  event::{EventType, NewEvent, Operation},
  id::UserId,
  store::{FilmStore, StoreResultExt as _, require_user},
  user::User,
};

/// Add the edge `user → other`.
///
/// The value is `true` when this call created the edge. Adding an existing
/// edge leaves the graph unchanged but still records `FRIEND/ADD`.
pub async fn add_friend<S: FilmStore>(
  store: &S,
  user: UserId,
  other: UserId,
) -> Result<Outcome<bool>> {
  check_pair(store, user, other).await?;
  let inserted = store.insert_friend(user, other).await.lift()?;
  if !inserted {
    debug!(%user, %other, "friend edge already present");
  }
  Ok(Outcome::with_effect(
    inserted,
    NewEvent::new(user, other, EventType::Friend, Operation::Add),
  ))
}

/// Remove the edge `user → other`.
///
/// The value is `true` when an edge was removed. Removing a missing edge is
/// a silent no-op and emits nothing.
pub async fn remove_friend<S: FilmStore>(
  store: &S,
  user: UserId,
  other: UserId,
) -> Result<Outcome<bool>> {
  check_pair(store, user, other).await?;
  if store.delete_friend(user, other).await.lift()? {
    Ok(Outcome::with_effect(
      true,
      NewEvent::new(user, other, EventType::Friend, Operation::Remove),
    ))
  } else {
    Ok(Outcome::quiet(false))
  }
}

/// The users `user` has added, by id.
pub async fn friends_of<S: FilmStore>(store: &S, user: UserId) -> Result<Vec<User>> {
  let user = require_user(store, user).await?;
  resolve(store, &user.friends).await
}

/// Users both `user` and `other` have added, by id.
pub async fn common_friends<S: FilmStore>(
  store: &S,
  user: UserId,
  other: UserId,
) -> Result<Vec<User>> {
  let a = require_user(store, user).await?;
  let b = require_user(store, other).await?;
  resolve(store, &common_friend_ids(&a.friends, &b.friends)).await
}

/// Intersection of two outbound friend sets.
pub fn common_friend_ids(a: &BTreeSet<UserId>, b: &BTreeSet<UserId>) -> BTreeSet<UserId> {
  a.intersection(b).copied().collect()
}

async fn check_pair<S: FilmStore>(store: &S, user: UserId, other: UserId) -> Result<()> {
  if user == other {
    return Err(Error::SelfFriendship(user));
  }
  require_user(store, user).await?;
  require_user(store, other).await?;
  Ok(())
}

async fn resolve<S: FilmStore>(store: &S, ids: &BTreeSet<UserId>) -> Result<Vec<User>> {
  if ids.is_empty() {
    return Ok(Vec::new());
  }
  let users = store.list_users().await.lift()?;
  Ok(users.into_iter().filter(|u| ids.contains(&u.id)).collect())
}
