//! [`Service`]: the operation surface consumed by the HTTP layer.
//!
//! Each mutation runs the component function, then publishes the effects of
//! its [`Outcome`] to the activity feed. Reads go straight to the store and
//! the pure ranking code.

use std::collections::BTreeSet;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
  Error, Outcome, Result, engagement,
  event::{Event, NewEvent},
  feed,
  film::{Director, Film, Genre, Mpa, NewDirector, NewFilm},
  id::{DirectorId, EventId, FilmId, GenreId, MpaId, ReviewId, UserId},
  ranking::{self, SearchField, SortKey, TopFilter},
  recommend,
  review::{self, DEFAULT_REVIEW_LIMIT, NewReview, Review, ReviewUpdate, Vote},
  social,
  store::{
    FilmStore, StoreResultExt as _, require_director, require_film, require_review, require_user,
  },
  user::{NewUser, User},
};

fn log_rejection(op: &str, err: &Error) {
  if !matches!(err.kind(), crate::ErrorKind::Store) {
    warn!(op, error = %err, "operation rejected");
  }
}

/// Cinegraph operations over a backing store.
pub struct Service<S> {
  store: S,
}

impl<S: FilmStore> Service<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  /// Publish an outcome's effects and hand back its value.
  async fn settle<T>(&self, outcome: Outcome<T>) -> Result<T> {
    feed::publish(&self.store, outcome.effects).await?;
    Ok(outcome.value)
  }

  // ─── Users ─────────────────────────────────────────────────────────────────

  pub async fn create_user(&self, input: NewUser) -> Result<User> {
    let input = input.validate(Utc::now().date_naive())?;
    let user = self.store.create_user(input).await.lift()?;
    info!(user = %user.id, login = %user.login, "user created");
    Ok(user)
  }

  pub async fn update_user(&self, id: UserId, input: NewUser) -> Result<User> {
    let input = input.validate(Utc::now().date_naive())?;
    let user = self.store.update_user(id, input).await.lift()?.ok_or(Error::UserNotFound(id))?;
    info!(user = %id, "user updated");
    Ok(user)
  }

  pub async fn get_user(&self, id: UserId) -> Result<User> { require_user(&self.store, id).await }

  pub async fn list_users(&self) -> Result<Vec<User>> { self.store.list_users().await.lift() }

  pub async fn delete_user(&self, id: UserId) -> Result<()> {
    if !self.store.delete_user(id).await.lift()? {
      return Err(Error::UserNotFound(id));
    }
    info!(user = %id, "user deleted");
    Ok(())
  }

  // ─── Social graph ──────────────────────────────────────────────────────────

  pub async fn add_friend(&self, user: UserId, other: UserId) -> Result<()> {
    let outcome = social::add_friend(&self.store, user, other)
      .await
      .inspect_err(|e| log_rejection("add_friend", e))?;
    if outcome.value {
      info!(%user, %other, "friend added");
    }
    self.settle(outcome).await.map(|_| ())
  }

  pub async fn remove_friend(&self, user: UserId, other: UserId) -> Result<()> {
    let outcome = social::remove_friend(&self.store, user, other)
      .await
      .inspect_err(|e| log_rejection("remove_friend", e))?;
    if outcome.value {
      info!(%user, %other, "friend removed");
    }
    self.settle(outcome).await.map(|_| ())
  }

  pub async fn friends_of(&self, user: UserId) -> Result<Vec<User>> {
    debug!(%user, "listing friends");
    social::friends_of(&self.store, user).await
  }

  pub async fn common_friends(&self, user: UserId, other: UserId) -> Result<Vec<User>> {
    social::common_friends(&self.store, user, other).await
  }

  // ─── Reference data and directors ──────────────────────────────────────────

  pub async fn genres(&self) -> Result<Vec<Genre>> { self.store.list_genres().await.lift() }

  pub async fn genre(&self, id: GenreId) -> Result<Genre> {
    self.store.get_genre(id).await.lift()?.ok_or(Error::GenreNotFound(id))
  }

  pub async fn mpa_ratings(&self) -> Result<Vec<Mpa>> { self.store.list_mpa().await.lift() }

  pub async fn mpa(&self, id: MpaId) -> Result<Mpa> {
    self.store.get_mpa(id).await.lift()?.ok_or(Error::MpaNotFound(id))
  }

  pub async fn create_director(&self, input: NewDirector) -> Result<Director> {
    let director = self.store.create_director(input.validate()?).await.lift()?;
    info!(director = %director.id, "director created");
    Ok(director)
  }

  pub async fn update_director(&self, id: DirectorId, input: NewDirector) -> Result<Director> {
    self
      .store
      .update_director(id, input.validate()?)
      .await
      .lift()?
      .ok_or(Error::DirectorNotFound(id))
  }

  pub async fn get_director(&self, id: DirectorId) -> Result<Director> {
    require_director(&self.store, id).await
  }

  pub async fn list_directors(&self) -> Result<Vec<Director>> {
    self.store.list_directors().await.lift()
  }

  pub async fn delete_director(&self, id: DirectorId) -> Result<()> {
    if !self.store.delete_director(id).await.lift()? {
      return Err(Error::DirectorNotFound(id));
    }
    info!(director = %id, "director deleted");
    Ok(())
  }

  // ─── Films ─────────────────────────────────────────────────────────────────

  /// Every id a film refers to must name an existing record.
  async fn check_references(&self, input: &NewFilm) -> Result<()> {
    self.mpa(input.mpa).await?;
    for &genre in &input.genres {
      self.genre(genre).await?;
    }
    for &director in &input.directors {
      require_director(&self.store, director).await?;
    }
    Ok(())
  }

  pub async fn create_film(&self, input: NewFilm) -> Result<Film> {
    let input = input.validate()?;
    self.check_references(&input).await?;
    let film = self.store.create_film(input).await.lift()?;
    info!(film = %film.id, title = %film.title, "film created");
    Ok(film)
  }

  pub async fn update_film(&self, id: FilmId, input: NewFilm) -> Result<Film> {
    let input = input.validate()?;
    self.check_references(&input).await?;
    let film = self.store.update_film(id, input).await.lift()?.ok_or(Error::FilmNotFound(id))?;
    info!(film = %id, "film updated");
    Ok(film)
  }

  pub async fn get_film(&self, id: FilmId) -> Result<Film> { require_film(&self.store, id).await }

  pub async fn list_films(&self) -> Result<Vec<Film>> { self.store.list_films().await.lift() }

  pub async fn delete_film(&self, id: FilmId) -> Result<()> {
    if !self.store.delete_film(id).await.lift()? {
      return Err(Error::FilmNotFound(id));
    }
    info!(film = %id, "film deleted");
    Ok(())
  }

  // ─── Engagement ledger ─────────────────────────────────────────────────────

  pub async fn like(&self, user: UserId, film: FilmId) -> Result<()> {
    let outcome = engagement::like(&self.store, user, film)
      .await
      .inspect_err(|e| log_rejection("like", e))?;
    info!(%user, %film, "film liked");
    self.settle(outcome).await
  }

  pub async fn unlike(&self, user: UserId, film: FilmId) -> Result<()> {
    let outcome = engagement::unlike(&self.store, user, film)
      .await
      .inspect_err(|e| log_rejection("unlike", e))?;
    if outcome.value {
      info!(%user, %film, "like withdrawn");
    }
    self.settle(outcome).await.map(|_| ())
  }

  pub async fn likes_of(&self, film: FilmId) -> Result<BTreeSet<UserId>> {
    engagement::likes_of(&self.store, film).await
  }

  pub async fn like_count_of(&self, film: FilmId) -> Result<usize> {
    engagement::like_count_of(&self.store, film).await
  }

  // ─── Ranking ───────────────────────────────────────────────────────────────

  pub async fn top_films(&self, count: usize, filter: TopFilter) -> Result<Vec<Film>> {
    debug!(count, ?filter, "ranking top films");
    let films = self.store.list_films().await.lift()?;
    ranking::top_films(films, count, filter)
  }

  pub async fn common_films(&self, user: UserId, other: UserId) -> Result<Vec<Film>> {
    require_user(&self.store, user).await?;
    require_user(&self.store, other).await?;
    let films = self.store.list_films().await.lift()?;
    Ok(ranking::common_films(films, user, other))
  }

  pub async fn films_by_director(&self, director: DirectorId, key: SortKey) -> Result<Vec<Film>> {
    require_director(&self.store, director).await?;
    let films = self.store.list_films().await.lift()?;
    Ok(ranking::films_by_director(films, director, key))
  }

  pub async fn search(
    &self,
    query: Option<&str>,
    fields: &BTreeSet<SearchField>,
  ) -> Result<Vec<Film>> {
    debug!(?query, ?fields, "searching films");
    let films = self.store.list_films().await.lift()?;
    ranking::search(films, query, fields)
  }

  pub async fn recommendations(&self, user: UserId) -> Result<Vec<Film>> {
    recommend::recommendations(&self.store, user).await
  }

  // ─── Reviews ───────────────────────────────────────────────────────────────

  pub async fn create_review(&self, input: NewReview) -> Result<Review> {
    let outcome = review::create_review(&self.store, input).await?;
    info!(review = %outcome.value.review_id, film = %outcome.value.film_id, "review created");
    self.settle(outcome).await
  }

  pub async fn update_review(&self, id: ReviewId, update: ReviewUpdate) -> Result<Review> {
    let outcome = review::update_review(&self.store, id, update).await?;
    info!(review = %id, "review updated");
    self.settle(outcome).await
  }

  pub async fn delete_review(&self, id: ReviewId) -> Result<()> {
    let outcome = review::delete_review(&self.store, id).await?;
    info!(review = %id, "review deleted");
    self.settle(outcome).await
  }

  pub async fn get_review(&self, id: ReviewId) -> Result<Review> {
    require_review(&self.store, id).await
  }

  /// Reviews of `film` (or of every film), most useful first.
  pub async fn list_reviews(
    &self,
    film: Option<FilmId>,
    limit: Option<usize>,
  ) -> Result<Vec<Review>> {
    if let Some(film) = film {
      require_film(&self.store, film).await?;
    }
    let limit = limit.unwrap_or(DEFAULT_REVIEW_LIMIT);
    self.store.list_reviews(film, limit).await.lift()
  }

  pub async fn like_review(&self, review: ReviewId, voter: UserId) -> Result<Review> {
    self.vote(review, voter, Vote::Helpful).await
  }

  pub async fn dislike_review(&self, review: ReviewId, voter: UserId) -> Result<Review> {
    self.vote(review, voter, Vote::Unhelpful).await
  }

  pub async fn remove_review_like(&self, review: ReviewId, voter: UserId) -> Result<Review> {
    review::withdraw_vote(&self.store, review, voter, Vote::Helpful).await
  }

  pub async fn remove_review_dislike(&self, review: ReviewId, voter: UserId) -> Result<Review> {
    review::withdraw_vote(&self.store, review, voter, Vote::Unhelpful).await
  }

  async fn vote(&self, review: ReviewId, voter: UserId, vote: Vote) -> Result<Review> {
    let review = review::cast_vote(&self.store, review, voter, vote)
      .await
      .inspect_err(|e| log_rejection("vote", e))?;
    debug!(review = %review.review_id, %voter, ?vote, useful = review.useful, "vote recorded");
    Ok(review)
  }

  // ─── Activity feed ─────────────────────────────────────────────────────────

  pub async fn record(&self, event: NewEvent) -> Result<Event> {
    feed::record(&self.store, event).await
  }

  pub async fn feed_for(&self, user: UserId) -> Result<Vec<Event>> {
    feed::feed_for(&self.store, user).await
  }

  pub async fn get_event(&self, id: EventId) -> Result<Event> {
    self.store.get_event(id).await.lift()?.ok_or(Error::EventNotFound(id))
  }

  pub async fn list_events(&self) -> Result<Vec<Event>> { self.store.list_events().await.lift() }

  pub async fn delete_event(&self, id: EventId) -> Result<()> {
    if !self.store.delete_event(id).await.lift()? {
      return Err(Error::EventNotFound(id));
    }
    info!(event = %id, "event deleted");
    Ok(())
  }
}
