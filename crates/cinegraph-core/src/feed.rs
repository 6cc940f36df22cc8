//! The activity feed: an append-only log of social actions.

use crate::{
  Result,
  event::{Event, NewEvent, sort_chronologically},
  id::UserId,
  store::{FilmStore, StoreResultExt as _, require_user},
};

/// Append one event. Store failures propagate unretried.
pub async fn record<S: FilmStore>(store: &S, event: NewEvent) -> Result<Event> {
  store.append_event(event).await.lift()
}

/// Append every effect of a mutation, in order.
pub async fn publish<S: FilmStore>(store: &S, effects: Vec<NewEvent>) -> Result<Vec<Event>> {
  let mut recorded = Vec::with_capacity(effects.len());
  for effect in effects {
    recorded.push(record(store, effect).await?);
  }
  Ok(recorded)
}

/// Events acted by `user`, oldest first.
pub async fn feed_for<S: FilmStore>(store: &S, user: UserId) -> Result<Vec<Event>> {
  require_user(store, user).await?;
  let mut events = store.events_for(user).await.lift()?;
  sort_chronologically(&mut events);
  Ok(events)
}
