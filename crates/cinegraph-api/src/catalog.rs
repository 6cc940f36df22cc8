//! Handlers for reference data (`/genres`, `/mpa`) and `/directors`.
//!
//! Genres and MPA ratings are seeded by the store and read-only here.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/genres` | Ordered by id |
//! | `GET`    | `/genres/{id}` | |
//! | `GET`    | `/mpa` | Ordered by id |
//! | `GET`    | `/mpa/{id}` | |
//! | `GET`    | `/directors` | |
//! | `POST`   | `/directors` | Body: [`NewDirector`]; returns 201 |
//! | `GET`    | `/directors/{id}` | |
//! | `PUT`    | `/directors/{id}` | Body: [`NewDirector`] |
//! | `DELETE` | `/directors/{id}` | Unlinks the director from its films |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use cinegraph_core::{
  film::{Director, Genre, Mpa, NewDirector},
  id::{DirectorId, GenreId, MpaId},
  store::FilmStore,
};

use crate::{AppState, error::ApiError};

// ─── Genres ──────────────────────────────────────────────────────────────────

/// `GET /genres`
pub async fn genres<S: FilmStore>(
  State(service): State<AppState<S>>,
) -> Result<Json<Vec<Genre>>, ApiError> {
  Ok(Json(service.genres().await?))
}

/// `GET /genres/{id}`
pub async fn genre<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<GenreId>,
) -> Result<Json<Genre>, ApiError> {
  Ok(Json(service.genre(id).await?))
}

// ─── MPA ratings ─────────────────────────────────────────────────────────────

/// `GET /mpa`
pub async fn mpa_ratings<S: FilmStore>(
  State(service): State<AppState<S>>,
) -> Result<Json<Vec<Mpa>>, ApiError> {
  Ok(Json(service.mpa_ratings().await?))
}

/// `GET /mpa/{id}`
pub async fn mpa<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<MpaId>,
) -> Result<Json<Mpa>, ApiError> {
  Ok(Json(service.mpa(id).await?))
}

// ─── Directors ───────────────────────────────────────────────────────────────

/// `GET /directors`
pub async fn directors<S: FilmStore>(
  State(service): State<AppState<S>>,
) -> Result<Json<Vec<Director>>, ApiError> {
  Ok(Json(service.list_directors().await?))
}

/// `POST /directors`
pub async fn create_director<S: FilmStore>(
  State(service): State<AppState<S>>,
  Json(body): Json<NewDirector>,
) -> Result<impl IntoResponse, ApiError> {
  let director = service.create_director(body).await?;
  Ok((StatusCode::CREATED, Json(director)))
}

/// `GET /directors/{id}`
pub async fn director<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<DirectorId>,
) -> Result<Json<Director>, ApiError> {
  Ok(Json(service.get_director(id).await?))
}

/// `PUT /directors/{id}`
pub async fn update_director<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<DirectorId>,
  Json(body): Json<NewDirector>,
) -> Result<Json<Director>, ApiError> {
  Ok(Json(service.update_director(id, body).await?))
}

/// `DELETE /directors/{id}`
pub async fn delete_director<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<DirectorId>,
) -> Result<StatusCode, ApiError> {
  service.delete_director(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
