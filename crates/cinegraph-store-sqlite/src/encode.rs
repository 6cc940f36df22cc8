//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text, event kinds as their upper-case
//! names, booleans as integers. Rows are first read into `Raw*` structs
//! inside the connection thread and decoded on the async side.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use cinegraph_core::{
  event::{Event, EventType, Operation},
  film::{Director, Film, Genre, Mpa},
  id::{DirectorId, EventId, FilmId, GenreId, MpaId, ReviewId, UserId},
  review::Review,
  user::User,
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── Event kinds ─────────────────────────────────────────────────────────────

fn decode_event_type(s: &str) -> Result<EventType> {
  s.parse().map_err(|_| Error::Decode(format!("unknown event type: {s:?}")))
}

fn decode_operation(s: &str) -> Result<Operation> {
  s.parse().map_err(|_| Error::Decode(format!("unknown operation: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// A `users` row plus its outbound friend ids.
pub struct RawUser {
  pub user_id:  i64,
  pub email:    String,
  pub login:    String,
  pub name:     String,
  pub birthday: String,
  pub friends:  Vec<i64>,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:       UserId(self.user_id),
      email:    self.email,
      login:    self.login,
      name:     self.name,
      birthday: decode_date(&self.birthday)?,
      friends:  self.friends.into_iter().map(UserId).collect(),
    })
  }
}

/// A `films` row joined with its rating, plus its genre, director and like
/// rows.
pub struct RawFilm {
  pub film_id:      i64,
  pub title:        String,
  pub description:  String,
  pub release_date: String,
  pub duration:     u32,
  pub mpa_id:       i64,
  pub mpa_name:     String,
  pub genres:       Vec<(i64, String)>,
  pub directors:    Vec<(i64, String)>,
  pub likes:        Vec<i64>,
}

impl RawFilm {
  pub fn into_film(self) -> Result<Film> {
    Ok(Film {
      id:           FilmId(self.film_id),
      title:        self.title,
      description:  self.description,
      release_date: decode_date(&self.release_date)?,
      duration:     self.duration,
      mpa:          Mpa { id: MpaId(self.mpa_id), name: self.mpa_name },
      genres:       self
        .genres
        .into_iter()
        .map(|(id, name)| Genre { id: GenreId(id), name })
        .collect(),
      directors:    self
        .directors
        .into_iter()
        .map(|(id, name)| Director { id: DirectorId(id), name })
        .collect(),
      likes:        self.likes.into_iter().map(UserId).collect::<BTreeSet<_>>(),
    })
  }
}

/// Distribute `(owner_id, item)` pairs onto their owners.
pub fn group_by_owner<T>(pairs: Vec<(i64, T)>) -> BTreeMap<i64, Vec<T>> {
  let mut grouped: BTreeMap<i64, Vec<T>> = BTreeMap::new();
  for (owner, item) in pairs {
    grouped.entry(owner).or_default().push(item);
  }
  grouped
}

pub struct RawReview {
  pub review_id:   i64,
  pub content:     String,
  pub is_positive: bool,
  pub user_id:     i64,
  pub film_id:     i64,
  pub useful:      i64,
}

impl RawReview {
  pub fn into_review(self) -> Review {
    Review {
      review_id:   ReviewId(self.review_id),
      content:     self.content,
      is_positive: self.is_positive,
      user_id:     UserId(self.user_id),
      film_id:     FilmId(self.film_id),
      useful:      self.useful,
    }
  }
}

pub struct RawEvent {
  pub event_id:   i64,
  pub user_id:    i64,
  pub entity_id:  i64,
  pub event_type: String,
  pub operation:  String,
  pub timestamp:  i64,
}

impl RawEvent {
  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      event_id:   EventId(self.event_id),
      user_id:    UserId(self.user_id),
      entity_id:  self.entity_id,
      event_type: decode_event_type(&self.event_type)?,
      operation:  decode_operation(&self.operation)?,
      timestamp:  self.timestamp,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_use_iso_calendar_form() {
    let d = NaiveDate::from_ymd_opt(1895, 12, 28).unwrap();
    assert_eq!(encode_date(d), "1895-12-28");
    assert_eq!(decode_date("1895-12-28").unwrap(), d);
    assert!(decode_date("28/12/1895").is_err());
  }

  #[test]
  fn unknown_event_kinds_fail_to_decode() {
    let raw = RawEvent {
      event_id:   1,
      user_id:    1,
      entity_id:  2,
      event_type: "POKE".into(),
      operation:  "ADD".into(),
      timestamp:  0,
    };
    assert!(matches!(raw.into_event(), Err(Error::Decode(_))));
  }
}
