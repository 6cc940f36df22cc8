//! Activity-feed events and the effect type that carries them out of a
//! mutation.
//!
//! Events are immutable and append-only. A mutation never writes to the feed
//! itself; it returns an [`Outcome`] whose `effects` the caller publishes.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::id::{EventId, UserId};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum EventType {
  Like,
  Friend,
  Review,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Operation {
  Add,
  Remove,
  Update,
}

/// A recorded social action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub event_id:   EventId,
  /// The acting user.
  pub user_id:    UserId,
  /// The affected entity: a user for `FRIEND`, a film for `LIKE`, a review
  /// for `REVIEW`.
  pub entity_id:  i64,
  pub event_type: EventType,
  pub operation:  Operation,
  /// Milliseconds since the Unix epoch; never decreases in insertion order.
  pub timestamp:  i64,
}

/// An event that has not been stored yet. The store assigns id and
/// timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
  pub user_id:    UserId,
  pub entity_id:  i64,
  pub event_type: EventType,
  pub operation:  Operation,
}

impl NewEvent {
  pub fn new(
    user_id: UserId,
    entity_id: impl Into<i64>,
    event_type: EventType,
    operation: Operation,
  ) -> Self {
    Self { user_id, entity_id: entity_id.into(), event_type, operation }
  }
}

/// Feed ordering: timestamp ascending, then id (insertion order).
pub fn sort_chronologically(events: &mut [Event]) {
  events.sort_by_key(|e| (e.timestamp, e.event_id));
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// The result of a mutation plus the feed events it wants published.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the effects of an outcome must be published"]
pub struct Outcome<T> {
  pub value:   T,
  pub effects: Vec<NewEvent>,
}

impl<T> Outcome<T> {
  /// An outcome with nothing to publish.
  pub fn quiet(value: T) -> Self { Self { value, effects: Vec::new() } }

  pub fn with_effect(value: T, effect: NewEvent) -> Self {
    Self { value, effects: vec![effect] }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::str::FromStr as _;

  #[test]
  fn kinds_encode_in_upper_case() {
    assert_eq!(EventType::Friend.to_string(), "FRIEND");
    assert_eq!(Operation::Remove.to_string(), "REMOVE");
    assert_eq!(EventType::from_str("LIKE").unwrap(), EventType::Like);
    assert_eq!(serde_json::to_string(&Operation::Update).unwrap(), "\"UPDATE\"");
  }

  #[test]
  fn equal_timestamps_fall_back_to_insertion_order() {
    let ev = |id, ts| Event {
      event_id:   EventId(id),
      user_id:    UserId(1),
      entity_id:  2,
      event_type: EventType::Like,
      operation:  Operation::Add,
      timestamp:  ts,
    };
    let mut events = vec![ev(3, 100), ev(1, 100), ev(2, 50)];
    sort_chronologically(&mut events);
    let ids: Vec<_> = events.iter().map(|e| e.event_id.0).collect();
    assert_eq!(ids, [2, 1, 3]);
  }
}
