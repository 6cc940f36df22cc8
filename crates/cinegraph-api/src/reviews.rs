//! Handlers for `/reviews` endpoints.
//!
//! Vote endpoints return the review with its recomputed `useful` score.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/reviews` | `?film_id=..&count=10`; most useful first |
//! | `POST`   | `/reviews` | Body: [`NewReview`]; returns 201 |
//! | `GET`    | `/reviews/{id}` | |
//! | `PUT`    | `/reviews/{id}` | Body: [`ReviewUpdate`] |
//! | `DELETE` | `/reviews/{id}` | |
//! | `PUT`    | `/reviews/{id}/like/{user_id}` | Replaces a prior dislike |
//! | `DELETE` | `/reviews/{id}/like/{user_id}` | |
//! | `PUT`    | `/reviews/{id}/dislike/{user_id}` | Replaces a prior like |
//! | `DELETE` | `/reviews/{id}/dislike/{user_id}` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use cinegraph_core::{
  id::{FilmId, ReviewId, UserId},
  review::{NewReview, Review, ReviewUpdate},
  store::FilmStore,
};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Restrict to reviews of one film.
  pub film_id: Option<FilmId>,
  pub count:   Option<usize>,
}

/// `GET /reviews[?film_id=..][&count=..]`
pub async fn list<S: FilmStore>(
  State(service): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Review>>, ApiError> {
  Ok(Json(service.list_reviews(params.film_id, params.count).await?))
}

// ─── Single review ───────────────────────────────────────────────────────────

/// `POST /reviews`
pub async fn create<S: FilmStore>(
  State(service): State<AppState<S>>,
  Json(body): Json<NewReview>,
) -> Result<impl IntoResponse, ApiError> {
  let review = service.create_review(body).await?;
  Ok((StatusCode::CREATED, Json(review)))
}

/// `GET /reviews/{id}`
pub async fn get_one<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<ReviewId>,
) -> Result<Json<Review>, ApiError> {
  Ok(Json(service.get_review(id).await?))
}

/// `PUT /reviews/{id}`
pub async fn update<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<ReviewId>,
  Json(body): Json<ReviewUpdate>,
) -> Result<Json<Review>, ApiError> {
  Ok(Json(service.update_review(id, body).await?))
}

/// `DELETE /reviews/{id}`
pub async fn delete<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<ReviewId>,
) -> Result<StatusCode, ApiError> {
  service.delete_review(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Votes ───────────────────────────────────────────────────────────────────

/// `PUT /reviews/{id}/like/{user_id}`
pub async fn like<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path((id, user_id)): Path<(ReviewId, UserId)>,
) -> Result<Json<Review>, ApiError> {
  Ok(Json(service.like_review(id, user_id).await?))
}

/// `DELETE /reviews/{id}/like/{user_id}`
pub async fn remove_like<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path((id, user_id)): Path<(ReviewId, UserId)>,
) -> Result<Json<Review>, ApiError> {
  Ok(Json(service.remove_review_like(id, user_id).await?))
}

/// `PUT /reviews/{id}/dislike/{user_id}`
pub async fn dislike<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path((id, user_id)): Path<(ReviewId, UserId)>,
) -> Result<Json<Review>, ApiError> {
  Ok(Json(service.dislike_review(id, user_id).await?))
}

/// `DELETE /reviews/{id}/dislike/{user_id}`
pub async fn remove_dislike<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path((id, user_id)): Path<(ReviewId, UserId)>,
) -> Result<Json<Review>, ApiError> {
  Ok(Json(service.remove_review_dislike(id, user_id).await?))
}
