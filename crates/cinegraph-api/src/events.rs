//! Administrative access to the raw event log. Per-user feeds live under
//! `/users/{id}/feed`.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use cinegraph_core::{event::Event, id::EventId, store::FilmStore};

use crate::{AppState, error::ApiError};

/// `GET /events`
pub async fn list<S: FilmStore>(
  State(service): State<AppState<S>>,
) -> Result<Json<Vec<Event>>, ApiError> {
  Ok(Json(service.list_events().await?))
}

/// `GET /events/{id}`
pub async fn get_one<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<EventId>,
) -> Result<Json<Event>, ApiError> {
  Ok(Json(service.get_event(id).await?))
}

/// `DELETE /events/{id}`
pub async fn delete<S: FilmStore>(
  State(service): State<AppState<S>>,
  Path(id): Path<EventId>,
) -> Result<StatusCode, ApiError> {
  service.delete_event(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
