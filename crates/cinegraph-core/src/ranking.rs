//! Popularity ranking over a snapshot of films.
//!
//! Everything here is pure: the service loads the films from the store and
//! hands them in. Every ranking is by like count descending with ties broken
//! by film id ascending, so repeated calls over the same data agree.

use std::{cmp::Reverse, collections::BTreeSet, str::FromStr as _};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  Error, Result,
  film::Film,
  id::{DirectorId, GenreId, UserId},
};

/// Size of the list returned by an unfiltered search.
pub const DEFAULT_TOP_COUNT: usize = 10;

/// Sort films by popularity.
pub fn rank_by_likes(films: &mut [Film]) {
  films.sort_by_key(|f| (Reverse(f.like_count()), f.id));
}

// ─── Top films ───────────────────────────────────────────────────────────────

/// Optional filters applied before ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopFilter {
  pub genre: Option<GenreId>,
  pub year:  Option<i32>,
}

impl TopFilter {
  fn admits(&self, film: &Film) -> bool {
    self.genre.is_none_or(|g| film.has_genre(g))
      && self.year.is_none_or(|y| film.release_year() == y)
  }
}

/// The `count` most-liked films admitted by `filter`.
pub fn top_films(films: Vec<Film>, count: usize, filter: TopFilter) -> Result<Vec<Film>> {
  if count < 1 {
    return Err(Error::InvalidArgument("count must be at least 1".to_owned()));
  }
  let mut films: Vec<Film> = films.into_iter().filter(|f| filter.admits(f)).collect();
  rank_by_likes(&mut films);
  films.truncate(count);
  Ok(films)
}

/// Films liked by both `a` and `b`.
pub fn common_films(films: Vec<Film>, a: UserId, b: UserId) -> Vec<Film> {
  let mut films: Vec<Film> = films
    .into_iter()
    .filter(|f| f.likes.contains(&a) && f.likes.contains(&b))
    .collect();
  rank_by_likes(&mut films);
  films
}

// ─── By director ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortKey {
  /// Release year ascending.
  Year,
  /// Like count descending.
  Likes,
}

impl SortKey {
  pub fn parse(raw: &str) -> Result<Self> {
    SortKey::from_str(raw.trim()).map_err(|_| {
      Error::InvalidArgument(format!("unknown sort key {raw:?}; expected year or likes"))
    })
  }
}

/// The films `director` directed, ordered by `key`. Ties go to the lower id.
pub fn films_by_director(films: Vec<Film>, director: DirectorId, key: SortKey) -> Vec<Film> {
  let mut films: Vec<Film> = films.into_iter().filter(|f| f.has_director(director)).collect();
  match key {
    SortKey::Year => films.sort_by_key(|f| (f.release_year(), f.id)),
    SortKey::Likes => rank_by_likes(&mut films),
  }
  films
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SearchField {
  Title,
  Director,
}

/// Parse a comma-separated field list such as `"title,director"`. Empty
/// segments are skipped.
pub fn parse_fields(raw: &str) -> Result<BTreeSet<SearchField>> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(|s| {
      SearchField::from_str(s)
        .map_err(|_| Error::InvalidArgument(format!("unknown search field {s:?}")))
    })
    .collect()
}

/// Case-insensitive substring search over the selected fields, most liked
/// first.
///
/// With neither a query nor fields this is [`top_films`] with
/// [`DEFAULT_TOP_COUNT`]. A query needs at least one field and fields need a
/// query. A blank query counts as absent.
pub fn search(
  films: Vec<Film>,
  query: Option<&str>,
  fields: &BTreeSet<SearchField>,
) -> Result<Vec<Film>> {
  let query = query.map(str::trim).filter(|q| !q.is_empty());
  let needle = match (query, fields.is_empty()) {
    (None, true) => return top_films(films, DEFAULT_TOP_COUNT, TopFilter::default()),
    (Some(_), true) => {
      return Err(Error::InvalidArgument("a search query needs at least one field".to_owned()));
    }
    (None, false) => {
      return Err(Error::InvalidArgument("search fields given without a query".to_owned()));
    }
    (Some(q), false) => q.to_lowercase(),
  };

  let matches = |film: &Film| {
    fields.iter().any(|field| match field {
      SearchField::Title => film.title.to_lowercase().contains(&needle),
      SearchField::Director => {
        film.directors.iter().any(|d| d.name.to_lowercase().contains(&needle))
      }
    })
  };
  let mut films: Vec<Film> = films.into_iter().filter(|f| matches(f)).collect();
  rank_by_likes(&mut films);
  Ok(films)
}
