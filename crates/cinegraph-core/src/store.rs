//! The `FilmStore` trait: the narrow interface between the core and its
//! backing store.
//!
//! The trait is implemented by storage backends (`cinegraph-store-sqlite`,
//! and [`MemoryStore`](crate::memory::MemoryStore) for tests and local
//! runs). Everything above it (the [`Service`](crate::service::Service),
//! the HTTP layer) depends on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::{
  Error, Result,
  engagement::Like,
  event::{Event, NewEvent},
  film::{Director, Film, Genre, Mpa, NewDirector, NewFilm},
  id::{DirectorId, EventId, FilmId, GenreId, MpaId, ReviewId, UserId},
  review::{NewReview, Review, ReviewUpdate, Vote},
  user::{NewUser, User},
};

/// Abstraction over a Cinegraph backing store.
///
/// Edge writes (`insert_friend`, `insert_like`, `upsert_vote`) are single
/// atomic calls. They report whether anything changed instead of making the
/// caller check first, so concurrent duplicate requests cannot both insert.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait FilmStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a validated user and assign its id.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Replace a user's profile fields. Returns `None` if the user does not
  /// exist. Friend edges are untouched.
  fn update_user(
    &self,
    id: UserId,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve a user with their outbound friend set.
  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// All users, ordered by id.
  fn list_users(&self) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Delete a user and every edge, like, review and vote referencing them.
  /// Returns `false` if there was no such user.
  fn delete_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Friend edges ──────────────────────────────────────────────────────

  /// Insert the directed edge `user → friend` if absent. Returns `true` if
  /// the edge was created by this call.
  fn insert_friend(
    &self,
    user: UserId,
    friend: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Remove the directed edge `user → friend`. Returns `true` if an edge
  /// was removed.
  fn delete_friend(
    &self,
    user: UserId,
    friend: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Reference data ────────────────────────────────────────────────────

  fn list_genres(&self) -> impl Future<Output = Result<Vec<Genre>, Self::Error>> + Send + '_;

  fn get_genre(
    &self,
    id: GenreId,
  ) -> impl Future<Output = Result<Option<Genre>, Self::Error>> + Send + '_;

  fn list_mpa(&self) -> impl Future<Output = Result<Vec<Mpa>, Self::Error>> + Send + '_;

  fn get_mpa(
    &self,
    id: MpaId,
  ) -> impl Future<Output = Result<Option<Mpa>, Self::Error>> + Send + '_;

  // ── Directors ─────────────────────────────────────────────────────────

  fn create_director(
    &self,
    input: NewDirector,
  ) -> impl Future<Output = Result<Director, Self::Error>> + Send + '_;

  fn update_director(
    &self,
    id: DirectorId,
    input: NewDirector,
  ) -> impl Future<Output = Result<Option<Director>, Self::Error>> + Send + '_;

  fn get_director(
    &self,
    id: DirectorId,
  ) -> impl Future<Output = Result<Option<Director>, Self::Error>> + Send + '_;

  fn list_directors(
    &self,
  ) -> impl Future<Output = Result<Vec<Director>, Self::Error>> + Send + '_;

  /// Delete a director and unlink them from their films.
  fn delete_director(
    &self,
    id: DirectorId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Films ─────────────────────────────────────────────────────────────

  /// Persist a validated film whose references are known to exist.
  fn create_film(
    &self,
    input: NewFilm,
  ) -> impl Future<Output = Result<Film, Self::Error>> + Send + '_;

  /// Replace a film's fields and its genre and director sets. Likes are
  /// untouched. Returns `None` if the film does not exist.
  fn update_film(
    &self,
    id: FilmId,
    input: NewFilm,
  ) -> impl Future<Output = Result<Option<Film>, Self::Error>> + Send + '_;

  /// Retrieve a film with genres, directors and likes resolved.
  fn get_film(
    &self,
    id: FilmId,
  ) -> impl Future<Output = Result<Option<Film>, Self::Error>> + Send + '_;

  /// All films, fully resolved, ordered by id.
  fn list_films(&self) -> impl Future<Output = Result<Vec<Film>, Self::Error>> + Send + '_;

  /// Delete a film and every like, link and review referencing it.
  fn delete_film(
    &self,
    id: FilmId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Like edges ────────────────────────────────────────────────────────

  /// Insert the like `(user, film)` if absent. Returns `true` if the like
  /// was created by this call.
  fn insert_like(
    &self,
    user: UserId,
    film: FilmId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Remove the like `(user, film)`. Returns `true` if a like was removed.
  fn delete_like(
    &self,
    user: UserId,
    film: FilmId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Every like edge in the ledger.
  fn list_likes(&self) -> impl Future<Output = Result<Vec<Like>, Self::Error>> + Send + '_;

  // ── Reviews ───────────────────────────────────────────────────────────

  fn create_review(
    &self,
    input: NewReview,
  ) -> impl Future<Output = Result<Review, Self::Error>> + Send + '_;

  fn update_review(
    &self,
    id: ReviewId,
    input: ReviewUpdate,
  ) -> impl Future<Output = Result<Option<Review>, Self::Error>> + Send + '_;

  fn get_review(
    &self,
    id: ReviewId,
  ) -> impl Future<Output = Result<Option<Review>, Self::Error>> + Send + '_;

  /// Reviews, optionally restricted to one film, most useful first (ties by
  /// id), at most `limit` of them.
  fn list_reviews(
    &self,
    film: Option<FilmId>,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  /// Delete a review and its votes.
  fn delete_review(
    &self,
    id: ReviewId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Record `voter`'s vote on a review, overwriting any earlier vote by the
  /// same voter.
  fn upsert_vote(
    &self,
    review: ReviewId,
    voter: UserId,
    vote: Vote,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove `voter`'s vote if it currently equals `vote`. Returns `true` if
  /// a vote was removed.
  fn delete_vote(
    &self,
    review: ReviewId,
    voter: UserId,
    vote: Vote,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Events: append-only ──────────────────────────────────────────────

  /// Append an event. The store assigns the id and a timestamp no earlier
  /// than any already stored.
  fn append_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  fn get_event(
    &self,
    id: EventId,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  /// Events whose acting user is `user`, in insertion order.
  fn events_for(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  /// Every event, in insertion order.
  fn list_events(&self) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  fn delete_event(
    &self,
    id: EventId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Lookup helpers ──────────────────────────────────────────────────────────

/// Lift a backend result into the core [`Result`].
pub trait StoreResultExt<T> {
  fn lift(self) -> Result<T>;
}

impl<T, E: Into<Error>> StoreResultExt<T> for std::result::Result<T, E> {
  fn lift(self) -> Result<T> { self.map_err(Into::into) }
}

pub(crate) async fn require_user<S: FilmStore>(store: &S, id: UserId) -> Result<User> {
  store.get_user(id).await.lift()?.ok_or(Error::UserNotFound(id))
}

pub(crate) async fn require_film<S: FilmStore>(store: &S, id: FilmId) -> Result<Film> {
  store.get_film(id).await.lift()?.ok_or(Error::FilmNotFound(id))
}

pub(crate) async fn require_director<S: FilmStore>(
  store: &S,
  id: DirectorId,
) -> Result<Director> {
  store
    .get_director(id)
    .await
    .lift()?
    .ok_or(Error::DirectorNotFound(id))
}

pub(crate) async fn require_review<S: FilmStore>(store: &S, id: ReviewId) -> Result<Review> {
  store.get_review(id).await.lift()?.ok_or(Error::ReviewNotFound(id))
}
