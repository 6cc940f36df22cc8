//! Handlers for `/films` endpoints: the catalogue, likes and rankings.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/films` | |
//! | `POST`   | `/films` | Body: [`NewFilm`]; returns 201 |
//! | `GET`    | `/films/{id}` | |
//! | `PUT`    | `/films/{id}` | Body: [`NewFilm`] |
//! | `DELETE` | `/films/{id}` | |
//! | `PUT`    | `/films/{id}/like/{user_id}` | 409 if already liked |
//! | `DELETE` | `/films/{id}/like/{user_id}` | No-op if absent |
//! | `GET`    | `/films/popular` | `?count=10&genre_id=..&year=..` |
//! | `GET`    | `/films/common` | `?user_id=..&friend_id=..` |
//! | `GET`    | `/films/director/{id}` | `?sort_by=year\|likes` |
//! | `GET`    | `/films/search` | `?query=..&by=title,director` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use cinegraph_core::{
  film::{Film, NewFilm},
  id::{DirectorId, FilmId, GenreId, UserId},
  ranking::{DEFAULT_TOP_COUNT, SortKey, TopFilter, parse_fields},
  store::FilmStore,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

// ─── Catalogue ───────────────────────────────────────────────────────────────

/// `GET /films`
pub async fn list<S: FilmStore>(
  State(service): State<AppState<S>>,
) -> Result<Json<Vec<Film>>, ApiError> {
  Ok(Json(service.list_films().await?))
}

/// `POST /films`
pub async fn create<S: FilmStore>(
  State(service): State<AppState<S>>,
  Json(body): Json<NewFilm>,
) -> Result<impl IntoResponse, ApiError> {
  let film = service.create_film(body).await?;
  Ok((StatusCode::CREATED, Json(film)))
}

/// `GET /films/{id}`
pub async fn get_one<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<FilmId>,
) -> Result<Json<Film>, ApiError> {
  Ok(Json(service.get_film(id).await?))
}

/// `PUT /films/{id}`
pub async fn update<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<FilmId>,
  Json(body): Json<NewFilm>,
) -> Result<Json<Film>, ApiError> {
  Ok(Json(service.update_film(id, body).await?))
}

/// `DELETE /films/{id}`
pub async fn delete<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<FilmId>,
) -> Result<StatusCode, ApiError> {
  service.delete_film(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Likes ───────────────────────────────────────────────────────────────────

/// `PUT /films/{id}/like/{user_id}`
pub async fn like<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path((id, user_id)): Path<(FilmId, UserId)>,
) -> Result<StatusCode, ApiError> {
  service.like(user_id, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /films/{id}/like/{user_id}`
pub async fn unlike<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path((id, user_id)): Path<(FilmId, UserId)>,
) -> Result<StatusCode, ApiError> {
  service.unlike(user_id, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Rankings ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PopularParams {
  #[serde(default = "default_count")]
  pub count:    usize,
  pub genre_id: Option<GenreId>,
  pub year:     Option<i32>,
}

fn default_count() -> usize { DEFAULT_TOP_COUNT }

/// `GET /films/popular[?count=..][&genre_id=..][&year=..]`
pub async fn popular<S: FilmStore>(
  State(service): State<AppState<S>>,
  Query(params): Query<PopularParams>,
) -> Result<Json<Vec<Film>>, ApiError> {
  let filter = TopFilter { genre: params.genre_id, year: params.year };
  Ok(Json(service.top_films(params.count, filter).await?))
}

#[derive(Debug, Deserialize)]
pub struct CommonParams {
  pub user_id:   UserId,
  pub friend_id: UserId,
}

/// `GET /films/common?user_id=..&friend_id=..`
pub async fn common<S: FilmStore>(
  State(service): State<AppState<S>>,
  Query(params): Query<CommonParams>,
) -> Result<Json<Vec<Film>>, ApiError> {
  Ok(Json(service.common_films(params.user_id, params.friend_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct DirectorParams {
  /// `year` or `likes`, any case. Defaults to `year`.
  pub sort_by: Option<String>,
}

/// `GET /films/director/{id}[?sort_by=year|likes]`
pub async fn by_director<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<DirectorId>,
  Query(params): Query<DirectorParams>,
) -> Result<Json<Vec<Film>>, ApiError> {
  let key = match params.sort_by.as_deref() {
    Some(raw) => SortKey::parse(raw)?,
    None => SortKey::Year,
  };
  Ok(Json(service.films_by_director(id, key).await?))
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Case-insensitive substring to look for.
  pub query: Option<String>,
  /// Comma-separated fields to search, e.g. `title,director`.
  pub by:    Option<String>,
}

/// `GET /films/search[?query=..][&by=title,director]`
pub async fn search<S: FilmStore>(
  State(service): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Film>>, ApiError> {
  let fields = parse_fields(params.by.as_deref().unwrap_or_default())?;
  Ok(Json(service.search(params.query.as_deref(), &fields).await?))
}
