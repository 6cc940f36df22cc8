//! JSON REST API for Cinegraph.
//!
//! Exposes an axum [`Router`] over a [`Service`] backed by any
//! [`cinegraph_core::store::FilmStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cinegraph_api::api_router(Arc::new(Service::new(store))))
//! ```

pub mod catalog;
pub mod error;
pub mod events;
pub mod films;
pub mod reviews;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, put},
};
use cinegraph_core::{Service, store::FilmStore};

pub use error::ApiError;

/// Shared handler state.
pub type AppState<S> = Arc<Service<S>>;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: AppState<S>) -> Router<()>
where
  S: FilmStore + 'static,
{
  Router::new()
    // Users and the social graph
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>).put(users::update::<S>).delete(users::delete::<S>),
    )
    .route("/users/{id}/friends", get(users::friends::<S>))
    .route(
      "/users/{id}/friends/{friend_id}",
      put(users::add_friend::<S>).delete(users::remove_friend::<S>),
    )
    .route("/users/{id}/friends/common/{other_id}", get(users::common_friends::<S>))
    .route("/users/{id}/recommendations", get(users::recommendations::<S>))
    .route("/users/{id}/feed", get(users::feed::<S>))
    // Films, likes and rankings
    .route("/films", get(films::list::<S>).post(films::create::<S>))
    .route("/films/popular", get(films::popular::<S>))
    .route("/films/common", get(films::common::<S>))
    .route("/films/search", get(films::search::<S>))
    .route("/films/director/{id}", get(films::by_director::<S>))
    .route(
      "/films/{id}",
      get(films::get_one::<S>).put(films::update::<S>).delete(films::delete::<S>),
    )
    .route("/films/{id}/like/{user_id}", put(films::like::<S>).delete(films::unlike::<S>))
    // Reference data and directors
    .route("/genres", get(catalog::genres::<S>))
    .route("/genres/{id}", get(catalog::genre::<S>))
    .route("/mpa", get(catalog::mpa_ratings::<S>))
    .route("/mpa/{id}", get(catalog::mpa::<S>))
    .route("/directors", get(catalog::directors::<S>).post(catalog::create_director::<S>))
    .route(
      "/directors/{id}",
      get(catalog::director::<S>)
        .put(catalog::update_director::<S>)
        .delete(catalog::delete_director::<S>),
    )
    // Reviews
    .route("/reviews", get(reviews::list::<S>).post(reviews::create::<S>))
    .route(
      "/reviews/{id}",
      get(reviews::get_one::<S>).put(reviews::update::<S>).delete(reviews::delete::<S>),
    )
    .route(
      "/reviews/{id}/like/{user_id}",
      put(reviews::like::<S>).delete(reviews::remove_like::<S>),
    )
    .route(
      "/reviews/{id}/dislike/{user_id}",
      put(reviews::dislike::<S>).delete(reviews::remove_dislike::<S>),
    )
    // Activity feed administration
    .route("/events", get(events::list::<S>))
    .route("/events/{id}", get(events::get_one::<S>).delete(events::delete::<S>))
    .with_state(service)
}

#[cfg(test)]
mod tests;
