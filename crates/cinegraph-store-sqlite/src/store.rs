//! [`SqliteStore`]: the SQLite implementation of [`FilmStore`].

use std::{collections::BTreeSet, path::Path};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, params};
use tracing::debug;

use cinegraph_core::{
  engagement::Like,
  event::{Event, NewEvent},
  film::{self, Director, Film, Genre, Mpa, NewDirector, NewFilm},
  id::{DirectorId, EventId, FilmId, GenreId, MpaId, ReviewId, UserId},
  review::{NewReview, Review, ReviewUpdate, Vote},
  store::FilmStore,
  user::{NewUser, User},
};

use crate::{
  Result,
  encode::{RawEvent, RawFilm, RawReview, RawUser, encode_date, group_by_owner},
  schema::{SCHEMA, SEED_GENRE, SEED_MPA},
};

// ─── Row loaders ─────────────────────────────────────────────────────────────
//
// These run on the connection thread. `None` filters mean "all rows".

fn load_users(conn: &Connection, only: Option<i64>) -> rusqlite::Result<Vec<RawUser>> {
  let mut friends = {
    let mut stmt = conn.prepare(
      "SELECT user_id, friend_id FROM friends
       WHERE ?1 IS NULL OR user_id = ?1
       ORDER BY friend_id",
    )?;
    let pairs = stmt
      .query_map(params![only], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    group_by_owner(pairs)
  };

  let mut stmt = conn.prepare(
    "SELECT user_id, email, login, name, birthday FROM users
     WHERE ?1 IS NULL OR user_id = ?1
     ORDER BY user_id",
  )?;
  let mut users = stmt
    .query_map(params![only], |row| {
      Ok(RawUser {
        user_id:  row.get(0)?,
        email:    row.get(1)?,
        login:    row.get(2)?,
        name:     row.get(3)?,
        birthday: row.get(4)?,
        friends:  Vec::new(),
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  for user in &mut users {
    user.friends = friends.remove(&user.user_id).unwrap_or_default();
  }
  Ok(users)
}

fn load_films(conn: &Connection, only: Option<i64>) -> rusqlite::Result<Vec<RawFilm>> {
  let named_pairs = |sql: &str| -> rusqlite::Result<Vec<(i64, (i64, String))>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
      .query_map(params![only], |row| Ok((row.get(0)?, (row.get(1)?, row.get(2)?))))?
      .collect();
    rows
  };
  let mut genres = group_by_owner(named_pairs(
    "SELECT fg.film_id, g.genre_id, g.name
     FROM film_genres fg JOIN genres g ON g.genre_id = fg.genre_id
     WHERE ?1 IS NULL OR fg.film_id = ?1
     ORDER BY g.genre_id",
  )?);
  let mut directors = group_by_owner(named_pairs(
    "SELECT fd.film_id, d.director_id, d.name
     FROM film_directors fd JOIN directors d ON d.director_id = fd.director_id
     WHERE ?1 IS NULL OR fd.film_id = ?1
     ORDER BY d.director_id",
  )?);
  let mut likes = {
    let mut stmt = conn.prepare(
      "SELECT film_id, user_id FROM likes
       WHERE ?1 IS NULL OR film_id = ?1
       ORDER BY user_id",
    )?;
    let pairs = stmt
      .query_map(params![only], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    group_by_owner(pairs)
  };

  let mut stmt = conn.prepare(
    "SELECT f.film_id, f.title, f.description, f.release_date, f.duration,
            m.mpa_id, m.name
     FROM films f JOIN mpa m ON m.mpa_id = f.mpa_id
     WHERE ?1 IS NULL OR f.film_id = ?1
     ORDER BY f.film_id",
  )?;
  let mut films = stmt
    .query_map(params![only], |row| {
      Ok(RawFilm {
        film_id:      row.get(0)?,
        title:        row.get(1)?,
        description:  row.get(2)?,
        release_date: row.get(3)?,
        duration:     row.get(4)?,
        mpa_id:       row.get(5)?,
        mpa_name:     row.get(6)?,
        genres:       Vec::new(),
        directors:    Vec::new(),
        likes:        Vec::new(),
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  for film in &mut films {
    film.genres = genres.remove(&film.film_id).unwrap_or_default();
    film.directors = directors.remove(&film.film_id).unwrap_or_default();
    film.likes = likes.remove(&film.film_id).unwrap_or_default();
  }
  Ok(films)
}

/// Replace a film's genre and director links.
fn link_film(conn: &Connection, film_id: i64, input: &NewFilm) -> rusqlite::Result<()> {
  conn.execute("DELETE FROM film_genres WHERE film_id = ?1", params![film_id])?;
  conn.execute("DELETE FROM film_directors WHERE film_id = ?1", params![film_id])?;
  let mut genre = conn.prepare("INSERT INTO film_genres (film_id, genre_id) VALUES (?1, ?2)")?;
  for g in &input.genres {
    genre.execute(params![film_id, g.0])?;
  }
  let mut director =
    conn.prepare("INSERT INTO film_directors (film_id, director_id) VALUES (?1, ?2)")?;
  for d in &input.directors {
    director.execute(params![film_id, d.0])?;
  }
  Ok(())
}

fn load_reviews(
  conn: &Connection,
  only: Option<i64>,
  film: Option<i64>,
  limit: i64,
) -> rusqlite::Result<Vec<RawReview>> {
  let mut stmt = conn.prepare(
    "SELECT r.review_id, r.content, r.is_positive, r.user_id, r.film_id,
            COALESCE(SUM(CASE v.is_helpful WHEN 1 THEN 1 WHEN 0 THEN -1 ELSE 0 END), 0) AS useful
     FROM reviews r LEFT JOIN review_votes v ON v.review_id = r.review_id
     WHERE (?1 IS NULL OR r.review_id = ?1) AND (?2 IS NULL OR r.film_id = ?2)
     GROUP BY r.review_id
     ORDER BY useful DESC, r.review_id ASC
     LIMIT ?3",
  )?;
  let reviews = stmt
    .query_map(params![only, film, limit], |row| {
      Ok(RawReview {
        review_id:   row.get(0)?,
        content:     row.get(1)?,
        is_positive: row.get(2)?,
        user_id:     row.get(3)?,
        film_id:     row.get(4)?,
        useful:      row.get(5)?,
      })
    })?
    .collect();
  reviews
}

fn load_events(
  conn: &Connection,
  only: Option<i64>,
  user: Option<i64>,
) -> rusqlite::Result<Vec<RawEvent>> {
  let mut stmt = conn.prepare(
    "SELECT event_id, user_id, entity_id, event_type, operation, timestamp
     FROM events
     WHERE (?1 IS NULL OR event_id = ?1) AND (?2 IS NULL OR user_id = ?2)
     ORDER BY event_id",
  )?;
  let events = stmt
    .query_map(params![only, user], |row| {
      Ok(RawEvent {
        event_id:   row.get(0)?,
        user_id:    row.get(1)?,
        entity_id:  row.get(2)?,
        event_type: row.get(3)?,
        operation:  row.get(4)?,
        timestamp:  row.get(5)?,
      })
    })?
    .collect();
  events
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Cinegraph store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, run schema initialisation and seed
  /// the reference data.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    debug!(path = %path.as_ref().display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        let tx = conn.transaction()?;
        {
          let mut genre = tx.prepare(SEED_GENRE)?;
          for (id, name) in film::SEED_GENRES {
            genre.execute(params![id, name])?;
          }
          let mut mpa = tx.prepare(SEED_MPA)?;
          for (id, name) in film::SEED_MPA {
            mpa.execute(params![id, name])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn film(&self, id: i64) -> Result<Option<Film>> {
    let raw = self
      .conn
      .call(move |conn| Ok(load_films(conn, Some(id))?.pop()))
      .await?;
    raw.map(RawFilm::into_film).transpose()
  }

  async fn review(&self, id: i64) -> Result<Option<Review>> {
    let raw = self
      .conn
      .call(move |conn| Ok(load_reviews(conn, Some(id), None, 1)?.pop()))
      .await?;
    Ok(raw.map(RawReview::into_review))
  }
}

// ─── FilmStore impl ──────────────────────────────────────────────────────────

impl FilmStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let name = input.display_name().to_owned();
    let birthday = encode_date(input.birthday);
    let (email, login) = (input.email.clone(), input.login.clone());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (email, login, name, birthday) VALUES (?1, ?2, ?3, ?4)",
          params![email, login, name, birthday],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(User {
      id:       UserId(id),
      name:     input.display_name().to_owned(),
      email:    input.email,
      login:    input.login,
      birthday: input.birthday,
      friends:  BTreeSet::new(),
    })
  }

  async fn update_user(&self, id: UserId, input: NewUser) -> Result<Option<User>> {
    let name = input.display_name().to_owned();
    let birthday = encode_date(input.birthday);

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE users SET email = ?2, login = ?3, name = ?4, birthday = ?5
           WHERE user_id = ?1",
          params![id.0, input.email, input.login, name, birthday],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(load_users(conn, Some(id.0))?.pop())
      })
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    let raw = self
      .conn
      .call(move |conn| Ok(load_users(conn, Some(id.0))?.pop()))
      .await?;
    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws = self.conn.call(|conn| Ok(load_users(conn, None)?)).await?;
    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn delete_user(&self, id: UserId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM users WHERE user_id = ?1", params![id.0])?))
      .await?;
    Ok(deleted > 0)
  }

  // ── Friend edges ──────────────────────────────────────────────────────

  async fn insert_friend(&self, user: UserId, friend: UserId) -> Result<bool> {
    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO friends (user_id, friend_id) VALUES (?1, ?2)",
          params![user.0, friend.0],
        )?)
      })
      .await?;
    Ok(inserted > 0)
  }

  async fn delete_friend(&self, user: UserId, friend: UserId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM friends WHERE user_id = ?1 AND friend_id = ?2",
          params![user.0, friend.0],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Reference data ────────────────────────────────────────────────────

  async fn list_genres(&self) -> Result<Vec<Genre>> {
    let rows: Vec<(i64, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT genre_id, name FROM genres ORDER BY genre_id")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows.into_iter().map(|(id, name)| Genre { id: GenreId(id), name }).collect())
  }

  async fn get_genre(&self, id: GenreId) -> Result<Option<Genre>> {
    let name: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row("SELECT name FROM genres WHERE genre_id = ?1", params![id.0], |r| r.get(0))
            .optional()?,
        )
      })
      .await?;
    Ok(name.map(|name| Genre { id, name }))
  }

  async fn list_mpa(&self) -> Result<Vec<Mpa>> {
    let rows: Vec<(i64, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT mpa_id, name FROM mpa ORDER BY mpa_id")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows.into_iter().map(|(id, name)| Mpa { id: MpaId(id), name }).collect())
  }

  async fn get_mpa(&self, id: MpaId) -> Result<Option<Mpa>> {
    let name: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row("SELECT name FROM mpa WHERE mpa_id = ?1", params![id.0], |r| r.get(0))
            .optional()?,
        )
      })
      .await?;
    Ok(name.map(|name| Mpa { id, name }))
  }

  // ── Directors ─────────────────────────────────────────────────────────

  async fn create_director(&self, input: NewDirector) -> Result<Director> {
    let name = input.name.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute("INSERT INTO directors (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(Director { id: DirectorId(id), name: input.name })
  }

  async fn update_director(&self, id: DirectorId, input: NewDirector) -> Result<Option<Director>> {
    let name = input.name.clone();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE directors SET name = ?2 WHERE director_id = ?1",
          params![id.0, name],
        )?)
      })
      .await?;
    Ok((changed > 0).then(|| Director { id, name: input.name }))
  }

  async fn get_director(&self, id: DirectorId) -> Result<Option<Director>> {
    let name: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row("SELECT name FROM directors WHERE director_id = ?1", params![id.0], |r| {
              r.get(0)
            })
            .optional()?,
        )
      })
      .await?;
    Ok(name.map(|name| Director { id, name }))
  }

  async fn list_directors(&self) -> Result<Vec<Director>> {
    let rows: Vec<(i64, String)> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT director_id, name FROM directors ORDER BY director_id")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows.into_iter().map(|(id, name)| Director { id: DirectorId(id), name }).collect())
  }

  async fn delete_director(&self, id: DirectorId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM directors WHERE director_id = ?1", params![id.0])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Films ─────────────────────────────────────────────────────────────

  async fn create_film(&self, input: NewFilm) -> Result<Film> {
    let release_date = encode_date(input.release_date);
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO films (title, description, release_date, duration, mpa_id)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![input.title, input.description, release_date, input.duration, input.mpa.0],
        )?;
        let id = tx.last_insert_rowid();
        link_film(&tx, id, &input)?;
        let film = load_films(&tx, Some(id))?.pop();
        tx.commit()?;
        Ok(film)
      })
      .await?;
    match raw {
      Some(raw) => raw.into_film(),
      None => Err(crate::Error::Decode("inserted film row was not readable".to_owned())),
    }
  }

  async fn update_film(&self, id: FilmId, input: NewFilm) -> Result<Option<Film>> {
    let release_date = encode_date(input.release_date);
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE films
           SET title = ?2, description = ?3, release_date = ?4, duration = ?5, mpa_id = ?6
           WHERE film_id = ?1",
          params![id.0, input.title, input.description, release_date, input.duration, input.mpa.0],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        link_film(&tx, id.0, &input)?;
        let film = load_films(&tx, Some(id.0))?.pop();
        tx.commit()?;
        Ok(film)
      })
      .await?;
    raw.map(RawFilm::into_film).transpose()
  }

  async fn get_film(&self, id: FilmId) -> Result<Option<Film>> { self.film(id.0).await }

  async fn list_films(&self) -> Result<Vec<Film>> {
    let raws = self.conn.call(|conn| Ok(load_films(conn, None)?)).await?;
    raws.into_iter().map(RawFilm::into_film).collect()
  }

  async fn delete_film(&self, id: FilmId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM films WHERE film_id = ?1", params![id.0])?))
      .await?;
    Ok(deleted > 0)
  }

  // ── Like edges ────────────────────────────────────────────────────────

  async fn insert_like(&self, user: UserId, film: FilmId) -> Result<bool> {
    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO likes (film_id, user_id) VALUES (?1, ?2)",
          params![film.0, user.0],
        )?)
      })
      .await?;
    Ok(inserted > 0)
  }

  async fn delete_like(&self, user: UserId, film: FilmId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM likes WHERE film_id = ?1 AND user_id = ?2",
          params![film.0, user.0],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn list_likes(&self) -> Result<Vec<Like>> {
    let pairs: Vec<(i64, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT user_id, film_id FROM likes ORDER BY user_id, film_id")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(
      pairs
        .into_iter()
        .map(|(user, film)| Like { user_id: UserId(user), film_id: FilmId(film) })
        .collect(),
    )
  }

  // ── Reviews ───────────────────────────────────────────────────────────

  async fn create_review(&self, input: NewReview) -> Result<Review> {
    let content = input.content.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reviews (content, is_positive, user_id, film_id) VALUES (?1, ?2, ?3, ?4)",
          params![content, input.is_positive, input.user_id.0, input.film_id.0],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(Review {
      review_id:   ReviewId(id),
      content:     input.content,
      is_positive: input.is_positive,
      user_id:     input.user_id,
      film_id:     input.film_id,
      useful:      0,
    })
  }

  async fn update_review(&self, id: ReviewId, input: ReviewUpdate) -> Result<Option<Review>> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE reviews SET content = ?2, is_positive = ?3 WHERE review_id = ?1",
          params![id.0, input.content, input.is_positive],
        )?)
      })
      .await?;
    if changed == 0 {
      return Ok(None);
    }
    self.review(id.0).await
  }

  async fn get_review(&self, id: ReviewId) -> Result<Option<Review>> { self.review(id.0).await }

  async fn list_reviews(&self, film: Option<FilmId>, limit: usize) -> Result<Vec<Review>> {
    let film = film.map(|f| f.0);
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let raws = self
      .conn
      .call(move |conn| Ok(load_reviews(conn, None, film, limit)?))
      .await?;
    Ok(raws.into_iter().map(RawReview::into_review).collect())
  }

  async fn delete_review(&self, id: ReviewId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM reviews WHERE review_id = ?1", params![id.0])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn upsert_vote(&self, review: ReviewId, voter: UserId, vote: Vote) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO review_votes (review_id, user_id, is_helpful) VALUES (?1, ?2, ?3)
           ON CONFLICT (review_id, user_id) DO UPDATE SET is_helpful = excluded.is_helpful",
          params![review.0, voter.0, vote.is_helpful()],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_vote(&self, review: ReviewId, voter: UserId, vote: Vote) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM review_votes WHERE review_id = ?1 AND user_id = ?2 AND is_helpful = ?3",
          params![review.0, voter.0, vote.is_helpful()],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Events ────────────────────────────────────────────────────────────

  async fn append_event(&self, input: NewEvent) -> Result<Event> {
    let now = Utc::now().timestamp_millis();
    let event_type = input.event_type.to_string();
    let operation = input.operation.to_string();

    let (event_id, timestamp) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let latest: i64 =
          tx.query_row("SELECT COALESCE(MAX(timestamp), 0) FROM events", [], |r| r.get(0))?;
        let timestamp = now.max(latest);
        tx.execute(
          "INSERT INTO events (user_id, entity_id, event_type, operation, timestamp)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![input.user_id.0, input.entity_id, event_type, operation, timestamp],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok((id, timestamp))
      })
      .await?;

    Ok(Event {
      event_id: EventId(event_id),
      user_id: input.user_id,
      entity_id: input.entity_id,
      event_type: input.event_type,
      operation: input.operation,
      timestamp,
    })
  }

  async fn get_event(&self, id: EventId) -> Result<Option<Event>> {
    let raw = self
      .conn
      .call(move |conn| Ok(load_events(conn, Some(id.0), None)?.pop()))
      .await?;
    raw.map(RawEvent::into_event).transpose()
  }

  async fn events_for(&self, user: UserId) -> Result<Vec<Event>> {
    let raws = self
      .conn
      .call(move |conn| Ok(load_events(conn, None, Some(user.0))?))
      .await?;
    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn list_events(&self) -> Result<Vec<Event>> {
    let raws = self.conn.call(|conn| Ok(load_events(conn, None, None)?)).await?;
    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn delete_event(&self, id: EventId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM events WHERE event_id = ?1", params![id.0])?)
      })
      .await?;
    Ok(deleted > 0)
  }
}
