//! Films and the reference data attached to them (genres, MPA ratings,
//! directors).

use std::collections::BTreeSet;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  id::{DirectorId, FilmId, GenreId, MpaId, UserId},
};

/// Longest accepted film description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Nothing can be released before the first public film screening.
pub fn earliest_release_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(1895, 12, 28).unwrap_or(NaiveDate::MIN)
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Genre {
  pub id:   GenreId,
  pub name: String,
}

/// A Motion Picture Association rating (G, PG, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mpa {
  pub id:   MpaId,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Director {
  pub id:   DirectorId,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDirector {
  pub name: String,
}

impl NewDirector {
  pub fn validate(self) -> Result<Self> {
    if self.name.trim().is_empty() {
      return Err(Error::Validation("director name must not be blank".to_owned()));
    }
    Ok(self)
  }
}

/// Genres every store starts with.
pub const SEED_GENRES: &[(i64, &str)] = &[
  (1, "Comedy"),
  (2, "Drama"),
  (3, "Cartoon"),
  (4, "Thriller"),
  (5, "Documentary"),
  (6, "Action"),
];

/// MPA ratings every store starts with.
pub const SEED_MPA: &[(i64, &str)] =
  &[(1, "G"), (2, "PG"), (3, "PG-13"), (4, "R"), (5, "NC-17")];

// ─── Film ────────────────────────────────────────────────────────────────────

/// A film with its reference data and like set resolved.
///
/// `genres` and `directors` are kept sorted by id so two reads of the same
/// film compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
  pub id:           FilmId,
  pub title:        String,
  pub description:  String,
  pub release_date: NaiveDate,
  /// Running time in minutes.
  pub duration:     u32,
  pub mpa:          Mpa,
  pub genres:       Vec<Genre>,
  pub directors:    Vec<Director>,
  pub likes:        BTreeSet<UserId>,
}

impl Film {
  pub fn like_count(&self) -> usize { self.likes.len() }

  pub fn release_year(&self) -> i32 { self.release_date.year() }

  pub fn has_genre(&self, genre: GenreId) -> bool {
    self.genres.iter().any(|g| g.id == genre)
  }

  pub fn has_director(&self, director: DirectorId) -> bool {
    self.directors.iter().any(|d| d.id == director)
  }
}

/// Input for creating or replacing a film. References are by id; the store
/// resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFilm {
  pub title:        String,
  #[serde(default)]
  pub description:  String,
  pub release_date: NaiveDate,
  pub duration:     u32,
  pub mpa:          MpaId,
  #[serde(default)]
  pub genres:       BTreeSet<GenreId>,
  #[serde(default)]
  pub directors:    BTreeSet<DirectorId>,
}

impl NewFilm {
  /// Check the field-level constraints. Reference existence is checked by
  /// the service against the store.
  pub fn validate(self) -> Result<Self> {
    if self.title.trim().is_empty() {
      return Err(Error::Validation("film title must not be empty".to_owned()));
    }
    let len = self.description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
      return Err(Error::Validation(format!(
        "description is {len} characters; at most {MAX_DESCRIPTION_LEN} allowed"
      )));
    }
    if self.release_date < earliest_release_date() {
      return Err(Error::Validation(format!(
        "release date {} is before {}",
        self.release_date,
        earliest_release_date()
      )));
    }
    Ok(self)
  }
}
