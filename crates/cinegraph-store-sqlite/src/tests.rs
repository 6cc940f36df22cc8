//! Integration tests for `SqliteStore` against an in-memory database, plus a
//! file-backed reopen.

use std::{collections::BTreeSet, sync::Arc};

use chrono::NaiveDate;
use cinegraph_core::{
  ErrorKind, Service,
  event::{EventType, NewEvent, Operation},
  film::{NewDirector, NewFilm},
  id::{FilmId, GenreId, MpaId, UserId},
  ranking::{SortKey, TopFilter},
  review::{NewReview, ReviewUpdate, Vote},
  store::FilmStore,
  user::NewUser,
};

use crate::SqliteStore;

async fn store() -> SqliteStore { SqliteStore::open_in_memory().await.expect("in-memory store") }

fn new_user(login: &str) -> NewUser {
  NewUser {
    email:    format!("{login}@example.com"),
    login:    login.to_owned(),
    name:     None,
    birthday: NaiveDate::from_ymd_opt(1985, 3, 14).unwrap(),
  }
}

fn new_film(title: &str) -> NewFilm {
  NewFilm {
    title:        title.to_owned(),
    description:  "A film.".into(),
    release_date: NaiveDate::from_ymd_opt(1999, 3, 31).unwrap(),
    duration:     136,
    mpa:          MpaId(4),
    genres:       BTreeSet::from([GenreId(6), GenreId(4)]),
    directors:    BTreeSet::new(),
  }
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn reference_data_is_seeded_once() {
  let s = store().await;
  let genres = s.list_genres().await.unwrap();
  assert_eq!(genres.len(), 6);
  assert_eq!(genres[0].name, "Comedy");
  assert_eq!(s.list_mpa().await.unwrap().len(), 5);
  assert_eq!(s.get_mpa(MpaId(5)).await.unwrap().unwrap().name, "NC-17");
  assert!(s.get_genre(GenreId(7)).await.unwrap().is_none());
}

// ─── Users and friends ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;
  let created = s.create_user(new_user("neo")).await.unwrap();
  assert_eq!(created.name, "neo");

  let fetched = s.get_user(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
  assert!(s.get_user(UserId(404)).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_maps_to_conflict() {
  let s = store().await;
  s.create_user(new_user("neo")).await.unwrap();
  let mut dup = new_user("thomas");
  dup.email = "neo@example.com".into();

  let err: cinegraph_core::Error = s.create_user(dup).await.unwrap_err().into();
  assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn friend_inserts_report_whether_they_changed_anything() {
  let s = store().await;
  let a = s.create_user(new_user("a")).await.unwrap();
  let b = s.create_user(new_user("b")).await.unwrap();

  assert!(s.insert_friend(a.id, b.id).await.unwrap());
  assert!(!s.insert_friend(a.id, b.id).await.unwrap());

  let a = s.get_user(a.id).await.unwrap().unwrap();
  assert_eq!(a.friends, BTreeSet::from([b.id]));
  assert!(s.get_user(b.id).await.unwrap().unwrap().friends.is_empty());

  assert!(s.delete_friend(a.id, b.id).await.unwrap());
  assert!(!s.delete_friend(a.id, b.id).await.unwrap());
}

#[tokio::test]
async fn update_user_keeps_friends() {
  let s = store().await;
  let a = s.create_user(new_user("a")).await.unwrap();
  let b = s.create_user(new_user("b")).await.unwrap();
  s.insert_friend(a.id, b.id).await.unwrap();

  let mut input = new_user("a2");
  input.name = Some("Renamed".into());
  let updated = s.update_user(a.id, input).await.unwrap().unwrap();
  assert_eq!(updated.login, "a2");
  assert_eq!(updated.name, "Renamed");
  assert_eq!(updated.friends, BTreeSet::from([b.id]));

  assert!(s.update_user(UserId(99), new_user("x")).await.unwrap().is_none());
}

// ─── Films and likes ─────────────────────────────────────────────────────────

#[tokio::test]
async fn films_resolve_their_references() {
  let s = store().await;
  let d = s.create_director(NewDirector { name: "Lana Wachowski".into() }).await.unwrap();
  let mut input = new_film("The Matrix");
  input.directors.insert(d.id);

  let film = s.create_film(input).await.unwrap();
  assert_eq!(film.mpa.name, "R");
  let genres: Vec<_> = film.genres.iter().map(|g| g.name.as_str()).collect();
  assert_eq!(genres, ["Thriller", "Action"]);
  assert_eq!(film.directors, [d.clone()]);

  let mut replacement = new_film("The Matrix Reloaded");
  replacement.genres = BTreeSet::from([GenreId(1)]);
  let updated = s.update_film(film.id, replacement).await.unwrap().unwrap();
  assert_eq!(updated.genres.len(), 1);
  assert!(updated.directors.is_empty());

  assert!(s.delete_director(d.id).await.unwrap());
  assert!(s.get_director(d.id).await.unwrap().is_none());
}

#[tokio::test]
async fn like_inserts_are_idempotent_at_the_store() {
  let s = store().await;
  let u = s.create_user(new_user("u")).await.unwrap();
  let f = s.create_film(new_film("F")).await.unwrap();

  assert!(s.insert_like(u.id, f.id).await.unwrap());
  assert!(!s.insert_like(u.id, f.id).await.unwrap());
  assert_eq!(s.get_film(f.id).await.unwrap().unwrap().likes, BTreeSet::from([u.id]));
  assert_eq!(s.list_likes().await.unwrap().len(), 1);

  assert!(s.delete_like(u.id, f.id).await.unwrap());
  assert!(s.get_film(f.id).await.unwrap().unwrap().likes.is_empty());
}

#[tokio::test]
async fn deleting_a_film_cascades_to_likes_and_reviews() {
  let s = store().await;
  let u = s.create_user(new_user("u")).await.unwrap();
  let f = s.create_film(new_film("F")).await.unwrap();
  s.insert_like(u.id, f.id).await.unwrap();
  let review = s
    .create_review(NewReview {
      content:     "ok".into(),
      is_positive: true,
      user_id:     u.id,
      film_id:     f.id,
    })
    .await
    .unwrap();

  assert!(s.delete_film(f.id).await.unwrap());
  assert!(s.list_likes().await.unwrap().is_empty());
  assert!(s.get_review(review.review_id).await.unwrap().is_none());
  assert!(!s.delete_film(f.id).await.unwrap());
}

// ─── Reviews and votes ───────────────────────────────────────────────────────

#[tokio::test]
async fn votes_upsert_and_remove_by_polarity() {
  let s = store().await;
  let author = s.create_user(new_user("author")).await.unwrap();
  let voter = s.create_user(new_user("voter")).await.unwrap();
  let f = s.create_film(new_film("F")).await.unwrap();
  let review = s
    .create_review(NewReview {
      content:     "Worth it.".into(),
      is_positive: true,
      user_id:     author.id,
      film_id:     f.id,
    })
    .await
    .unwrap();
  assert_eq!(review.useful, 0);
  assert_eq!(s.get_review(review.review_id).await.unwrap().unwrap().useful, 0);

  s.upsert_vote(review.review_id, voter.id, Vote::Helpful).await.unwrap();
  assert_eq!(s.get_review(review.review_id).await.unwrap().unwrap().useful, 1);

  s.upsert_vote(review.review_id, voter.id, Vote::Unhelpful).await.unwrap();
  assert_eq!(s.get_review(review.review_id).await.unwrap().unwrap().useful, -1);

  assert!(!s.delete_vote(review.review_id, voter.id, Vote::Helpful).await.unwrap());
  assert!(s.delete_vote(review.review_id, voter.id, Vote::Unhelpful).await.unwrap());
  assert_eq!(s.get_review(review.review_id).await.unwrap().unwrap().useful, 0);

  let updated = s
    .update_review(review.review_id, ReviewUpdate {
      content:     "Not worth it.".into(),
      is_positive: false,
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.content, "Not worth it.");
  assert_eq!(updated.user_id, author.id);
}

#[tokio::test]
async fn review_listing_orders_by_usefulness_and_limits() {
  let s = store().await;
  let author = s.create_user(new_user("author")).await.unwrap();
  let voter = s.create_user(new_user("voter")).await.unwrap();
  let f = s.create_film(new_film("F")).await.unwrap();
  let g = s.create_film(new_film("G")).await.unwrap();
  let mut ids = Vec::new();
  for film in [f.id, f.id, g.id] {
    let r = s
      .create_review(NewReview {
        content:     "text".into(),
        is_positive: true,
        user_id:     author.id,
        film_id:     film,
      })
      .await
      .unwrap();
    ids.push(r.review_id);
  }
  s.upsert_vote(ids[1], voter.id, Vote::Helpful).await.unwrap();
  s.upsert_vote(ids[2], voter.id, Vote::Unhelpful).await.unwrap();

  let all: Vec<_> =
    s.list_reviews(None, 10).await.unwrap().into_iter().map(|r| r.review_id).collect();
  assert_eq!(all, [ids[1], ids[0], ids[2]]);

  let for_f: Vec<_> =
    s.list_reviews(Some(f.id), 10).await.unwrap().into_iter().map(|r| r.review_id).collect();
  assert_eq!(for_f, [ids[1], ids[0]]);

  assert_eq!(s.list_reviews(None, 1).await.unwrap().len(), 1);
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn event_timestamps_never_decrease() {
  let s = store().await;
  let mut last = i64::MIN;
  for entity in 0..25i64 {
    let e = s
      .append_event(NewEvent::new(UserId(1), entity, EventType::Like, Operation::Add))
      .await
      .unwrap();
    assert!(e.timestamp >= last);
    last = e.timestamp;
  }

  let events = s.events_for(UserId(1)).await.unwrap();
  assert_eq!(events.len(), 25);
  assert!(events.windows(2).all(|w| w[0].event_id < w[1].event_id));
  assert!(s.events_for(UserId(2)).await.unwrap().is_empty());
}

#[tokio::test]
async fn events_round_trip_and_delete() {
  let s = store().await;
  let e = s
    .append_event(NewEvent::new(UserId(3), FilmId(9), EventType::Review, Operation::Update))
    .await
    .unwrap();
  assert_eq!(s.get_event(e.event_id).await.unwrap().unwrap(), e);
  assert!(s.delete_event(e.event_id).await.unwrap());
  assert!(s.list_events().await.unwrap().is_empty());
}

// ─── Service over SQLite ─────────────────────────────────────────────────────

#[tokio::test]
async fn alice_bob_and_carol_over_sqlite() {
  let svc = Service::new(store().await);
  let alice = svc.create_user(new_user("alice")).await.unwrap();
  let bob = svc.create_user(new_user("bob")).await.unwrap();
  let carol = svc.create_user(new_user("carol")).await.unwrap();

  let film = svc.create_film(new_film("Shared")).await.unwrap();
  svc.like(alice.id, film.id).await.unwrap();
  svc.like(bob.id, film.id).await.unwrap();
  let err = svc.like(bob.id, film.id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);

  let common: Vec<_> =
    svc.common_films(alice.id, bob.id).await.unwrap().into_iter().map(|f| f.id).collect();
  assert_eq!(common, [film.id]);

  svc.add_friend(alice.id, carol.id).await.unwrap();
  svc.add_friend(bob.id, carol.id).await.unwrap();
  let friends: Vec<_> =
    svc.common_friends(alice.id, bob.id).await.unwrap().into_iter().map(|u| u.id).collect();
  assert_eq!(friends, [carol.id]);

  let feed = svc.feed_for(alice.id).await.unwrap();
  let kinds: Vec<_> = feed.iter().map(|e| e.event_type).collect();
  assert_eq!(kinds, [EventType::Like, EventType::Friend]);

  let top = svc.top_films(1, TopFilter::default()).await.unwrap();
  assert_eq!(top[0].like_count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_likes_over_sqlite_succeed_once() {
  let svc = Arc::new(Service::new(store().await));
  let u = svc.create_user(new_user("racer")).await.unwrap();
  let f = svc.create_film(new_film("Contested")).await.unwrap();

  let (user_id, film_id) = (u.id, f.id);
  let tasks: Vec<_> = (0..16)
    .map(|_| {
      let svc = Arc::clone(&svc);
      tokio::spawn(async move { svc.like(user_id, film_id).await })
    })
    .collect();
  let mut ok = 0;
  for task in tasks {
    match task.await.unwrap() {
      Ok(()) => ok += 1,
      Err(e) => assert_eq!(e.kind(), ErrorKind::Conflict),
    }
  }

  assert_eq!(ok, 1);
  assert_eq!(svc.like_count_of(f.id).await.unwrap(), 1);
  let feed = svc.feed_for(u.id).await.unwrap();
  assert_eq!(feed.len(), 1);
  assert_eq!((feed[0].event_type, feed[0].operation), (EventType::Like, Operation::Add));
}

#[tokio::test]
async fn like_of_a_vanished_user_conflicts() {
  let s = store().await;
  let f = s.create_film(new_film("Orphaned")).await.unwrap();
  let u = s.create_user(new_user("gone")).await.unwrap();
  assert!(s.delete_user(u.id).await.unwrap());

  let err = cinegraph_core::Error::from(s.insert_like(u.id, f.id).await.unwrap_err());
  assert_eq!(err.kind(), ErrorKind::Conflict);
  assert!(s.list_likes().await.unwrap().is_empty());
}

#[tokio::test]
async fn padded_email_hits_the_unique_column() {
  let svc = Service::new(store().await);
  svc.create_user(new_user("first")).await.unwrap();

  let mut padded = new_user("second");
  padded.email = "  first@example.com".into();
  let err = svc.create_user(padded).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn director_sort_over_sqlite() {
  let svc = Service::new(store().await);
  let d = svc.create_director(NewDirector { name: "Agnès Varda".into() }).await.unwrap();
  let mut early = new_film("Cléo from 5 to 7");
  early.release_date = NaiveDate::from_ymd_opt(1962, 4, 11).unwrap();
  early.directors.insert(d.id);
  let mut late = new_film("Vagabond");
  late.release_date = NaiveDate::from_ymd_opt(1985, 12, 4).unwrap();
  late.directors.insert(d.id);
  let late = svc.create_film(late).await.unwrap();
  let early = svc.create_film(early).await.unwrap();

  let by_year: Vec<_> =
    svc.films_by_director(d.id, SortKey::Year).await.unwrap().into_iter().map(|f| f.id).collect();
  assert_eq!(by_year, [early.id, late.id]);
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn data_survives_reopening_the_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cinegraph.db");

  let (user, film) = {
    let s = SqliteStore::open(&path).await.unwrap();
    let user = s.create_user(new_user("persist")).await.unwrap();
    let film = s.create_film(new_film("Persisted")).await.unwrap();
    s.insert_like(user.id, film.id).await.unwrap();
    (user, film)
  };

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.get_user(user.id).await.unwrap().unwrap().login, "persist");
  assert_eq!(s.get_film(film.id).await.unwrap().unwrap().likes, BTreeSet::from([user.id]));
  assert_eq!(s.list_genres().await.unwrap().len(), 6);

  // AUTOINCREMENT ids are not reused after a delete.
  assert!(s.delete_user(user.id).await.unwrap());
  let next = s.create_user(new_user("next")).await.unwrap();
  assert!(next.id > user.id);
}
