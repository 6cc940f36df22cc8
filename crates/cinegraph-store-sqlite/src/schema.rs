//! SQL schema for the Cinegraph SQLite store.
//!
//! Executed at connection startup. `PRAGMA user_version` records the layout
//! so a later migration can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `AUTOINCREMENT` keeps ids from being reused after a delete. Deleting a
/// user or film cascades to everything that references it except `events`,
/// which carries no foreign keys and outlives its subjects.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    email    TEXT NOT NULL UNIQUE,
    login    TEXT NOT NULL UNIQUE,
    name     TEXT NOT NULL,
    birthday TEXT NOT NULL           -- YYYY-MM-DD
);

-- Directed: (user_id, friend_id) means user_id added friend_id.
CREATE TABLE IF NOT EXISTS friends (
    user_id   INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    friend_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    PRIMARY KEY (user_id, friend_id),
    CHECK (user_id != friend_id)
);

CREATE TABLE IF NOT EXISTS genres (
    genre_id INTEGER PRIMARY KEY,
    name     TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS mpa (
    mpa_id INTEGER PRIMARY KEY,
    name   TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS directors (
    director_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS films (
    film_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL,
    description  TEXT NOT NULL DEFAULT '',
    release_date TEXT NOT NULL,      -- YYYY-MM-DD
    duration     INTEGER NOT NULL CHECK (duration >= 0),
    mpa_id       INTEGER NOT NULL REFERENCES mpa(mpa_id)
);

CREATE TABLE IF NOT EXISTS film_genres (
    film_id  INTEGER NOT NULL REFERENCES films(film_id) ON DELETE CASCADE,
    genre_id INTEGER NOT NULL REFERENCES genres(genre_id),
    PRIMARY KEY (film_id, genre_id)
);

CREATE TABLE IF NOT EXISTS film_directors (
    film_id     INTEGER NOT NULL REFERENCES films(film_id) ON DELETE CASCADE,
    director_id INTEGER NOT NULL REFERENCES directors(director_id) ON DELETE CASCADE,
    PRIMARY KEY (film_id, director_id)
);

CREATE TABLE IF NOT EXISTS likes (
    film_id INTEGER NOT NULL REFERENCES films(film_id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    PRIMARY KEY (film_id, user_id)
);

CREATE TABLE IF NOT EXISTS reviews (
    review_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    content     TEXT NOT NULL,
    is_positive INTEGER NOT NULL,
    user_id     INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    film_id     INTEGER NOT NULL REFERENCES films(film_id) ON DELETE CASCADE
);

-- One vote per (review, voter); a later vote overwrites.
CREATE TABLE IF NOT EXISTS review_votes (
    review_id  INTEGER NOT NULL REFERENCES reviews(review_id) ON DELETE CASCADE,
    user_id    INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    is_helpful INTEGER NOT NULL,
    PRIMARY KEY (review_id, user_id)
);

-- Append-only. Rows are only ever removed one at a time by id.
CREATE TABLE IF NOT EXISTS events (
    event_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL,
    entity_id  INTEGER NOT NULL,
    event_type TEXT NOT NULL,        -- 'LIKE' | 'FRIEND' | 'REVIEW'
    operation  TEXT NOT NULL,        -- 'ADD' | 'REMOVE' | 'UPDATE'
    timestamp  INTEGER NOT NULL      -- ms since the Unix epoch
);

CREATE INDEX IF NOT EXISTS likes_user_idx   ON likes(user_id);
CREATE INDEX IF NOT EXISTS reviews_film_idx ON reviews(film_id);
CREATE INDEX IF NOT EXISTS events_user_idx  ON events(user_id);

PRAGMA user_version = 1;
";

pub const SEED_GENRE: &str = "INSERT OR IGNORE INTO genres (genre_id, name) VALUES (?1, ?2)";

pub const SEED_MPA: &str = "INSERT OR IGNORE INTO mpa (mpa_id, name) VALUES (?1, ?2)";
