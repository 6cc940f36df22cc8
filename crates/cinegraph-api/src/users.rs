//! Handlers for `/users` endpoints: accounts, the social graph,
//! recommendations and the per-user feed.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | |
//! | `POST`   | `/users` | Body: [`NewUser`]; returns 201 |
//! | `GET`    | `/users/{id}` | 404 if not found |
//! | `PUT`    | `/users/{id}` | Body: [`NewUser`] |
//! | `DELETE` | `/users/{id}` | Cascades to edges, likes and reviews |
//! | `GET`    | `/users/{id}/friends` | Users `id` has added |
//! | `PUT`    | `/users/{id}/friends/{friend_id}` | Idempotent |
//! | `DELETE` | `/users/{id}/friends/{friend_id}` | No-op if absent |
//! | `GET`    | `/users/{id}/friends/common/{other_id}` | |
//! | `GET`    | `/users/{id}/recommendations` | |
//! | `GET`    | `/users/{id}/feed` | Oldest first |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use cinegraph_core::{
  event::Event,
  film::Film,
  id::UserId,
  store::FilmStore,
  user::{NewUser, User},
};

use crate::{AppState, error::ApiError};

// ─── Accounts ────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S: FilmStore>(
  State(service): State<AppState<S>>,
) -> Result<Json<Vec<User>>, ApiError> {
  Ok(Json(service.list_users().await?))
}

/// `POST /users`
pub async fn create<S: FilmStore>(
  State(service): State<AppState<S>>,
  Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
  let user = service.create_user(body).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/{id}`
pub async fn get_one<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
  Ok(Json(service.get_user(id).await?))
}

/// `PUT /users/{id}`
pub async fn update<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<UserId>,
  Json(body): Json<NewUser>,
) -> Result<Json<User>, ApiError> {
  Ok(Json(service.update_user(id, body).await?))
}

/// `DELETE /users/{id}`
pub async fn delete<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<UserId>,
) -> Result<StatusCode, ApiError> {
  service.delete_user(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Friends ─────────────────────────────────────────────────────────────────

/// `GET /users/{id}/friends`
pub async fn friends<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<UserId>,
) -> Result<Json<Vec<User>>, ApiError> {
  Ok(Json(service.friends_of(id).await?))
}

/// `PUT /users/{id}/friends/{friend_id}`
pub async fn add_friend<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path((id, friend_id)): Path<(UserId, UserId)>,
) -> Result<StatusCode, ApiError> {
  service.add_friend(id, friend_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /users/{id}/friends/{friend_id}`
pub async fn remove_friend<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path((id, friend_id)): Path<(UserId, UserId)>,
) -> Result<StatusCode, ApiError> {
  service.remove_friend(id, friend_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/{id}/friends/common/{other_id}`
pub async fn common_friends<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path((id, other_id)): Path<(UserId, UserId)>,
) -> Result<Json<Vec<User>>, ApiError> {
  Ok(Json(service.common_friends(id, other_id).await?))
}

// ─── Recommendations and feed ────────────────────────────────────────────────

/// `GET /users/{id}/recommendations`
pub async fn recommendations<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<UserId>,
) -> Result<Json<Vec<Film>>, ApiError> {
  Ok(Json(service.recommendations(id).await?))
}

/// `GET /users/{id}/feed`
pub async fn feed<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<UserId>,
) -> Result<Json<Vec<Event>>, ApiError> {
  Ok(Json(service.feed_for(id).await?))
}
