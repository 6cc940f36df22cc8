//! Strongly-typed integer identifiers.
//!
//! Every entity is keyed by a store-assigned `i64`. Wrapping each in its own
//! newtype keeps a `UserId` from being passed where a `FilmId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Define a transparent `i64` identifier newtype.
///
/// The generated type serialises as a bare number, orders numerically, and
/// displays as its inner value.
macro_rules! id_type {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
    }

    impl From<i64> for $name {
      fn from(raw: i64) -> Self { Self(raw) }
    }

    impl From<$name> for i64 {
      fn from(id: $name) -> Self { id.0 }
    }
  };
}

id_type!(
  /// Identifies a registered user.
  UserId
);
id_type!(
  /// Identifies a film.
  FilmId
);
id_type!(
  /// Identifies a genre from the seeded reference list.
  GenreId
);
id_type!(
  /// Identifies an MPA rating from the seeded reference list.
  MpaId
);
id_type!(
  /// Identifies a director.
  DirectorId
);
id_type!(
  /// Identifies a review.
  ReviewId
);
id_type!(
  /// Identifies an activity-feed event.
  EventId
);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ids_serialise_as_bare_numbers() {
    let json = serde_json::to_string(&UserId(42)).unwrap();
    assert_eq!(json, "42");

    let back: FilmId = serde_json::from_str("7").unwrap();
    assert_eq!(back, FilmId(7));
  }

  #[test]
  fn ids_display_their_value() {
    assert_eq!(DirectorId(3).to_string(), "3");
  }
}
