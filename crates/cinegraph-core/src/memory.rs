//! [`MemoryStore`]: an in-process [`FilmStore`] for tests and throwaway runs.
//!
//! All state sits behind one mutex and ids come from monotonic counters, so
//! ids are never reused after a delete. The lock is never held across an
//! `.await`.

use std::{
  collections::{BTreeMap, BTreeSet},
  sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::Utc;

use crate::{
  Error, Result,
  engagement::Like,
  event::{Event, NewEvent},
  film::{Director, Film, Genre, Mpa, NewDirector, NewFilm, SEED_GENRES, SEED_MPA},
  id::{DirectorId, EventId, FilmId, GenreId, MpaId, ReviewId, UserId},
  review::{NewReview, Review, ReviewUpdate, Vote, sort_by_usefulness, usefulness},
  store::FilmStore,
  user::{NewUser, User},
};

#[derive(Debug, Default)]
struct Counters {
  user:     i64,
  director: i64,
  film:     i64,
  review:   i64,
  event:    i64,
}

impl Counters {
  fn bump(slot: &mut i64) -> i64 {
    *slot += 1;
    *slot
  }
}

#[derive(Debug, Default)]
struct State {
  ids:            Counters,
  users:          BTreeMap<UserId, User>,
  /// Directed `(user, friend)` edges.
  friends:        BTreeSet<(UserId, UserId)>,
  genres:         BTreeMap<GenreId, Genre>,
  mpa:            BTreeMap<MpaId, Mpa>,
  directors:      BTreeMap<DirectorId, Director>,
  films:          BTreeMap<FilmId, NewFilm>,
  likes:          BTreeSet<Like>,
  reviews:        BTreeMap<ReviewId, NewReview>,
  votes:          BTreeMap<(ReviewId, UserId), Vote>,
  events:         BTreeMap<EventId, Event>,
  last_timestamp: i64,
}

impl State {
  fn seeded() -> Self {
    let mut state = State::default();
    for &(id, name) in SEED_GENRES {
      state.genres.insert(GenreId(id), Genre { id: GenreId(id), name: name.to_owned() });
    }
    for &(id, name) in SEED_MPA {
      state.mpa.insert(MpaId(id), Mpa { id: MpaId(id), name: name.to_owned() });
    }
    state
  }

  fn user(&self, id: UserId) -> Option<User> {
    let mut user = self.users.get(&id)?.clone();
    user.friends = self
      .friends
      .range((id, UserId(i64::MIN))..=(id, UserId(i64::MAX)))
      .map(|&(_, friend)| friend)
      .collect();
    Some(user)
  }

  /// Email and login are unique across users.
  fn check_unique(&self, input: &NewUser, except: Option<UserId>) -> Result<()> {
    for user in self.users.values().filter(|u| Some(u.id) != except) {
      if user.email == input.email {
        return Err(Error::Conflict(format!("email {:?} is already registered", input.email)));
      }
      if user.login == input.login {
        return Err(Error::Conflict(format!("login {:?} is already taken", input.login)));
      }
    }
    Ok(())
  }

  fn film(&self, id: FilmId) -> Option<Film> {
    let row = self.films.get(&id)?;
    Some(Film {
      id,
      title: row.title.clone(),
      description: row.description.clone(),
      release_date: row.release_date,
      duration: row.duration,
      mpa: self
        .mpa
        .get(&row.mpa)
        .cloned()
        .unwrap_or_else(|| Mpa { id: row.mpa, name: String::new() }),
      genres: row.genres.iter().filter_map(|g| self.genres.get(g).cloned()).collect(),
      directors: row.directors.iter().filter_map(|d| self.directors.get(d).cloned()).collect(),
      likes: self.likes.iter().filter(|l| l.film_id == id).map(|l| l.user_id).collect(),
    })
  }

  fn review(&self, id: ReviewId) -> Option<Review> {
    let row = self.reviews.get(&id)?;
    let votes = self
      .votes
      .range((id, UserId(i64::MIN))..=(id, UserId(i64::MAX)))
      .map(|(_, &v)| v);
    Some(Review {
      review_id:   id,
      content:     row.content.clone(),
      is_positive: row.is_positive,
      user_id:     row.user_id,
      film_id:     row.film_id,
      useful:      usefulness(votes),
    })
  }

  fn drop_reviews(&mut self, doomed: &BTreeSet<ReviewId>) {
    self.reviews.retain(|id, _| !doomed.contains(id));
    self.votes.retain(|(review, _), _| !doomed.contains(review));
  }
}

/// An in-memory store. Starts with the seeded genres and MPA ratings.
#[derive(Debug)]
pub struct MemoryStore {
  state: Mutex<State>,
}

impl Default for MemoryStore {
  fn default() -> Self { Self::new() }
}

impl MemoryStore {
  pub fn new() -> Self { Self { state: Mutex::new(State::seeded()) } }

  fn lock(&self) -> MutexGuard<'_, State> {
    // Every write leaves the maps consistent, so poisoning is ignored.
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

// ─── FilmStore impl ──────────────────────────────────────────────────────────

impl FilmStore for MemoryStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let mut state = self.lock();
    state.check_unique(&input, None)?;
    let id = UserId(Counters::bump(&mut state.ids.user));
    let user = User {
      id,
      name: input.display_name().to_owned(),
      email: input.email,
      login: input.login,
      birthday: input.birthday,
      friends: BTreeSet::new(),
    };
    state.users.insert(id, user.clone());
    Ok(user)
  }

  async fn update_user(&self, id: UserId, input: NewUser) -> Result<Option<User>> {
    let mut state = self.lock();
    if !state.users.contains_key(&id) {
      return Ok(None);
    }
    state.check_unique(&input, Some(id))?;
    let name = input.display_name().to_owned();
    if let Some(user) = state.users.get_mut(&id) {
      user.name = name;
      user.email = input.email;
      user.login = input.login;
      user.birthday = input.birthday;
    }
    Ok(state.user(id))
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> { Ok(self.lock().user(id)) }

  async fn list_users(&self) -> Result<Vec<User>> {
    let state = self.lock();
    Ok(state.users.keys().filter_map(|&id| state.user(id)).collect())
  }

  async fn delete_user(&self, id: UserId) -> Result<bool> {
    let mut state = self.lock();
    if state.users.remove(&id).is_none() {
      return Ok(false);
    }
    state.friends.retain(|&(a, b)| a != id && b != id);
    state.likes.retain(|l| l.user_id != id);
    state.votes.retain(|&(_, voter), _| voter != id);
    let authored: BTreeSet<ReviewId> =
      state.reviews.iter().filter(|(_, r)| r.user_id == id).map(|(&rid, _)| rid).collect();
    state.drop_reviews(&authored);
    Ok(true)
  }

  // ── Friend edges ──────────────────────────────────────────────────────

  async fn insert_friend(&self, user: UserId, friend: UserId) -> Result<bool> {
    Ok(self.lock().friends.insert((user, friend)))
  }

  async fn delete_friend(&self, user: UserId, friend: UserId) -> Result<bool> {
    Ok(self.lock().friends.remove(&(user, friend)))
  }

  // ── Reference data ────────────────────────────────────────────────────

  async fn list_genres(&self) -> Result<Vec<Genre>> {
    Ok(self.lock().genres.values().cloned().collect())
  }

  async fn get_genre(&self, id: GenreId) -> Result<Option<Genre>> {
    Ok(self.lock().genres.get(&id).cloned())
  }

  async fn list_mpa(&self) -> Result<Vec<Mpa>> { Ok(self.lock().mpa.values().cloned().collect()) }

  async fn get_mpa(&self, id: MpaId) -> Result<Option<Mpa>> {
    Ok(self.lock().mpa.get(&id).cloned())
  }

  // ── Directors ─────────────────────────────────────────────────────────

  async fn create_director(&self, input: NewDirector) -> Result<Director> {
    let mut state = self.lock();
    let id = DirectorId(Counters::bump(&mut state.ids.director));
    let director = Director { id, name: input.name };
    state.directors.insert(id, director.clone());
    Ok(director)
  }

  async fn update_director(&self, id: DirectorId, input: NewDirector) -> Result<Option<Director>> {
    let mut state = self.lock();
    Ok(state.directors.get_mut(&id).map(|d| {
      d.name = input.name;
      d.clone()
    }))
  }

  async fn get_director(&self, id: DirectorId) -> Result<Option<Director>> {
    Ok(self.lock().directors.get(&id).cloned())
  }

  async fn list_directors(&self) -> Result<Vec<Director>> {
    Ok(self.lock().directors.values().cloned().collect())
  }

  async fn delete_director(&self, id: DirectorId) -> Result<bool> {
    let mut state = self.lock();
    if state.directors.remove(&id).is_none() {
      return Ok(false);
    }
    for film in state.films.values_mut() {
      film.directors.remove(&id);
    }
    Ok(true)
  }

  // ── Films ─────────────────────────────────────────────────────────────

  async fn create_film(&self, input: NewFilm) -> Result<Film> {
    let mut state = self.lock();
    let id = FilmId(Counters::bump(&mut state.ids.film));
    state.films.insert(id, input);
    state.film(id).ok_or(Error::FilmNotFound(id))
  }

  async fn update_film(&self, id: FilmId, input: NewFilm) -> Result<Option<Film>> {
    let mut state = self.lock();
    match state.films.get_mut(&id) {
      Some(row) => *row = input,
      None => return Ok(None),
    }
    Ok(state.film(id))
  }

  async fn get_film(&self, id: FilmId) -> Result<Option<Film>> { Ok(self.lock().film(id)) }

  async fn list_films(&self) -> Result<Vec<Film>> {
    let state = self.lock();
    Ok(state.films.keys().filter_map(|&id| state.film(id)).collect())
  }

  async fn delete_film(&self, id: FilmId) -> Result<bool> {
    let mut state = self.lock();
    if state.films.remove(&id).is_none() {
      return Ok(false);
    }
    state.likes.retain(|l| l.film_id != id);
    let reviewed: BTreeSet<ReviewId> =
      state.reviews.iter().filter(|(_, r)| r.film_id == id).map(|(&rid, _)| rid).collect();
    state.drop_reviews(&reviewed);
    Ok(true)
  }

  // ── Like edges ────────────────────────────────────────────────────────

  async fn insert_like(&self, user: UserId, film: FilmId) -> Result<bool> {
    Ok(self.lock().likes.insert(Like { user_id: user, film_id: film }))
  }

  async fn delete_like(&self, user: UserId, film: FilmId) -> Result<bool> {
    Ok(self.lock().likes.remove(&Like { user_id: user, film_id: film }))
  }

  async fn list_likes(&self) -> Result<Vec<Like>> {
    Ok(self.lock().likes.iter().copied().collect())
  }

  // ── Reviews ───────────────────────────────────────────────────────────

  async fn create_review(&self, input: NewReview) -> Result<Review> {
    let mut state = self.lock();
    let id = ReviewId(Counters::bump(&mut state.ids.review));
    state.reviews.insert(id, input);
    state.review(id).ok_or(Error::ReviewNotFound(id))
  }

  async fn update_review(&self, id: ReviewId, input: ReviewUpdate) -> Result<Option<Review>> {
    let mut state = self.lock();
    match state.reviews.get_mut(&id) {
      Some(row) => {
        row.content = input.content;
        row.is_positive = input.is_positive;
      }
      None => return Ok(None),
    }
    Ok(state.review(id))
  }

  async fn get_review(&self, id: ReviewId) -> Result<Option<Review>> {
    Ok(self.lock().review(id))
  }

  async fn list_reviews(&self, film: Option<FilmId>, limit: usize) -> Result<Vec<Review>> {
    let state = self.lock();
    let mut reviews: Vec<Review> = state
      .reviews
      .iter()
      .filter(|(_, r)| film.is_none_or(|f| r.film_id == f))
      .filter_map(|(&id, _)| state.review(id))
      .collect();
    sort_by_usefulness(&mut reviews);
    reviews.truncate(limit);
    Ok(reviews)
  }

  async fn delete_review(&self, id: ReviewId) -> Result<bool> {
    let mut state = self.lock();
    if !state.reviews.contains_key(&id) {
      return Ok(false);
    }
    state.drop_reviews(&BTreeSet::from([id]));
    Ok(true)
  }

  async fn upsert_vote(&self, review: ReviewId, voter: UserId, vote: Vote) -> Result<()> {
    self.lock().votes.insert((review, voter), vote);
    Ok(())
  }

  async fn delete_vote(&self, review: ReviewId, voter: UserId, vote: Vote) -> Result<bool> {
    let mut state = self.lock();
    if state.votes.get(&(review, voter)) != Some(&vote) {
      return Ok(false);
    }
    state.votes.remove(&(review, voter));
    Ok(true)
  }

  // ── Events ────────────────────────────────────────────────────────────

  async fn append_event(&self, input: NewEvent) -> Result<Event> {
    let mut state = self.lock();
    let timestamp = Utc::now().timestamp_millis().max(state.last_timestamp);
    state.last_timestamp = timestamp;
    let event_id = EventId(Counters::bump(&mut state.ids.event));
    let event = Event {
      event_id,
      user_id: input.user_id,
      entity_id: input.entity_id,
      event_type: input.event_type,
      operation: input.operation,
      timestamp,
    };
    state.events.insert(event_id, event.clone());
    Ok(event)
  }

  async fn get_event(&self, id: EventId) -> Result<Option<Event>> {
    Ok(self.lock().events.get(&id).cloned())
  }

  async fn events_for(&self, user: UserId) -> Result<Vec<Event>> {
    Ok(self.lock().events.values().filter(|e| e.user_id == user).cloned().collect())
  }

  async fn list_events(&self) -> Result<Vec<Event>> {
    Ok(self.lock().events.values().cloned().collect())
  }

  async fn delete_event(&self, id: EventId) -> Result<bool> {
    Ok(self.lock().events.remove(&id).is_some())
  }
}
