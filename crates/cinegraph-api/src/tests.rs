//! Router tests driven through `tower::ServiceExt::oneshot` against an
//! in-memory store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use cinegraph_core::{MemoryStore, Service};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::*;

fn make_state() -> AppState<MemoryStore> { Arc::new(Service::new(MemoryStore::new())) }

async fn send(
  state:  &AppState<MemoryStore>,
  method: &str,
  uri:    &str,
  body:   Option<Value>,
) -> Response {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(json) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(json.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  api_router(state.clone()).oneshot(req).await.unwrap()
}

async fn body_json(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

async fn create_user(state: &AppState<MemoryStore>, login: &str) -> i64 {
  let resp = send(
    state,
    "POST",
    "/users",
    Some(json!({
      "email": format!("{login}@example.com"),
      "login": login,
      "birthday": "1990-01-01",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  body_json(resp).await["id"].as_i64().unwrap()
}

async fn create_film(state: &AppState<MemoryStore>, title: &str) -> i64 {
  let resp = send(
    state,
    "POST",
    "/films",
    Some(json!({
      "title": title,
      "release_date": "2001-05-04",
      "duration": 110,
      "mpa": 1,
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  body_json(resp).await["id"].as_i64().unwrap()
}

fn ids(value: &Value) -> Vec<i64> {
  value.as_array().unwrap().iter().map(|v| v["id"].as_i64().unwrap()).collect()
}

// ── Users ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_returns_201_and_defaults_name() {
  let state = make_state();
  let resp = send(
    &state,
    "POST",
    "/users",
    Some(json!({ "email": "a@example.com", "login": "alice", "birthday": "1990-01-01" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let user = body_json(resp).await;
  assert_eq!(user["name"], "alice");
  assert_eq!(user["friends"], json!([]));
}

#[tokio::test]
async fn invalid_user_is_400_with_error_body() {
  let state = make_state();
  let resp = send(
    &state,
    "POST",
    "/users",
    Some(json!({ "email": "no-at-sign", "login": "alice", "birthday": "1990-01-01" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(body_json(resp).await["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn unknown_user_is_404() {
  let state = make_state();
  let resp = send(&state, "GET", "/users/999", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_login_is_409() {
  let state = make_state();
  create_user(&state, "alice").await;
  let resp = send(
    &state,
    "POST",
    "/users",
    Some(json!({ "email": "other@example.com", "login": "alice", "birthday": "1990-01-01" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
}

// ── Friends ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn friendship_is_one_way_over_http() {
  let state = make_state();
  let a = create_user(&state, "a").await;
  let b = create_user(&state, "b").await;

  let resp = send(&state, "PUT", &format!("/users/{a}/friends/{b}"), None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let resp = send(&state, "GET", &format!("/users/{a}/friends"), None).await;
  assert_eq!(ids(&body_json(resp).await), vec![b]);

  let resp = send(&state, "GET", &format!("/users/{b}/friends"), None).await;
  assert_eq!(ids(&body_json(resp).await), Vec::<i64>::new());
}

#[tokio::test]
async fn self_friendship_is_400() {
  let state = make_state();
  let a = create_user(&state, "a").await;
  let resp = send(&state, "PUT", &format!("/users/{a}/friends/{a}"), None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn common_friends_intersects_outbound_sets() {
  let state = make_state();
  let a = create_user(&state, "a").await;
  let b = create_user(&state, "b").await;
  let c = create_user(&state, "c").await;
  send(&state, "PUT", &format!("/users/{a}/friends/{c}"), None).await;
  send(&state, "PUT", &format!("/users/{b}/friends/{c}"), None).await;

  let resp = send(&state, "GET", &format!("/users/{a}/friends/common/{b}"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(ids(&body_json(resp).await), vec![c]);
}

// ── Films and likes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_like_is_409_and_unlike_is_idempotent() {
  let state = make_state();
  let u = create_user(&state, "u").await;
  let f = create_film(&state, "Amelie").await;

  let resp = send(&state, "PUT", &format!("/films/{f}/like/{u}"), None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  let resp = send(&state, "PUT", &format!("/films/{f}/like/{u}"), None).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);

  for _ in 0..2 {
    let resp = send(&state, "DELETE", &format!("/films/{f}/like/{u}"), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  }
  let film = body_json(send(&state, "GET", &format!("/films/{f}"), None).await).await;
  assert_eq!(film["likes"], json!([]));
}

#[tokio::test]
async fn film_with_unknown_mpa_is_404() {
  let state = make_state();
  let resp = send(
    &state,
    "POST",
    "/films",
    Some(json!({ "title": "X", "release_date": "2001-01-01", "duration": 90, "mpa": 99 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn popular_orders_by_likes_and_rejects_zero_count() {
  let state = make_state();
  let u = create_user(&state, "u").await;
  let v = create_user(&state, "v").await;
  let quiet = create_film(&state, "Quiet").await;
  let loud = create_film(&state, "Loud").await;
  send(&state, "PUT", &format!("/films/{loud}/like/{u}"), None).await;
  send(&state, "PUT", &format!("/films/{loud}/like/{v}"), None).await;
  send(&state, "PUT", &format!("/films/{quiet}/like/{u}"), None).await;

  let resp = send(&state, "GET", "/films/popular?count=2", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(ids(&body_json(resp).await), vec![loud, quiet]);

  let resp = send(&state, "GET", "/films/popular?count=1", None).await;
  assert_eq!(ids(&body_json(resp).await), vec![loud]);

  let resp = send(&state, "GET", "/films/popular?count=0", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_requires_query_and_fields_together() {
  let state = make_state();
  let f = create_film(&state, "The Matrix").await;

  let resp = send(&state, "GET", "/films/search?query=matrix&by=title", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(ids(&body_json(resp).await), vec![f]);

  let resp = send(&state, "GET", "/films/search?query=matrix", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(&state, "GET", "/films/search?by=title", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(&state, "GET", "/films/search?query=matrix&by=plot", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(&state, "GET", "/films/search", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(ids(&body_json(resp).await), vec![f]);
}

#[tokio::test]
async fn director_films_reject_unknown_sort_key() {
  let state = make_state();
  let resp = send(&state, "POST", "/directors", Some(json!({ "name": "Wachowski" }))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let d = body_json(resp).await["id"].as_i64().unwrap();

  let resp = send(&state, "GET", &format!("/films/director/{d}?sort_by=likes"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = send(&state, "GET", &format!("/films/director/{d}?sort_by=title"), None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn seeded_reference_data_is_served() {
  let state = make_state();
  let resp = send(&state, "GET", "/genres", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(!body_json(resp).await.as_array().unwrap().is_empty());

  let resp = send(&state, "GET", "/mpa/1", None).await;
  assert_eq!(body_json(resp).await["id"], 1);

  let resp = send(&state, "GET", "/genres/999", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Recommendations and feed ─────────────────────────────────────────────────

#[tokio::test]
async fn recommendations_come_from_nearest_neighbour() {
  let state = make_state();
  let alice = create_user(&state, "alice").await;
  let bob = create_user(&state, "bob").await;
  let shared = create_film(&state, "Shared").await;
  let extra = create_film(&state, "Extra").await;
  send(&state, "PUT", &format!("/films/{shared}/like/{alice}"), None).await;
  send(&state, "PUT", &format!("/films/{shared}/like/{bob}"), None).await;
  send(&state, "PUT", &format!("/films/{extra}/like/{bob}"), None).await;

  let resp = send(&state, "GET", &format!("/users/{alice}/recommendations"), None).await;
  assert_eq!(ids(&body_json(resp).await), vec![extra]);
}

#[tokio::test]
async fn feed_lists_own_actions_in_order() {
  let state = make_state();
  let a = create_user(&state, "a").await;
  let b = create_user(&state, "b").await;
  let f = create_film(&state, "F").await;
  send(&state, "PUT", &format!("/users/{a}/friends/{b}"), None).await;
  send(&state, "PUT", &format!("/films/{f}/like/{a}"), None).await;
  send(&state, "DELETE", &format!("/films/{f}/like/{a}"), None).await;

  let resp = send(&state, "GET", &format!("/users/{a}/feed"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let feed = body_json(resp).await;
  let kinds: Vec<(String, String)> = feed
    .as_array()
    .unwrap()
    .iter()
    .map(|e| {
      (e["event_type"].as_str().unwrap().to_owned(), e["operation"].as_str().unwrap().to_owned())
    })
    .collect();
  assert_eq!(
    kinds,
    vec![
      ("FRIEND".to_owned(), "ADD".to_owned()),
      ("LIKE".to_owned(), "ADD".to_owned()),
      ("LIKE".to_owned(), "REMOVE".to_owned()),
    ]
  );

  let resp = send(&state, "GET", "/users/999/feed", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Reviews ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn review_votes_update_usefulness() {
  let state = make_state();
  let author = create_user(&state, "author").await;
  let reader = create_user(&state, "reader").await;
  let f = create_film(&state, "F").await;

  let resp = send(
    &state,
    "POST",
    "/reviews",
    Some(json!({ "content": "Great", "is_positive": true, "user_id": author, "film_id": f })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let r = body_json(resp).await["review_id"].as_i64().unwrap();

  let resp = send(&state, "PUT", &format!("/reviews/{r}/like/{reader}"), None).await;
  assert_eq!(body_json(resp).await["useful"], 1);

  let resp = send(&state, "PUT", &format!("/reviews/{r}/dislike/{reader}"), None).await;
  assert_eq!(body_json(resp).await["useful"], -1);

  let resp = send(&state, "DELETE", &format!("/reviews/{r}/dislike/{reader}"), None).await;
  assert_eq!(body_json(resp).await["useful"], 0);

  let resp = send(&state, "PUT", &format!("/reviews/{r}/like/{author}"), None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(&state, "GET", &format!("/reviews?film_id={f}&count=5"), None).await;
  assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleted_event_is_gone() {
  let state = make_state();
  let a = create_user(&state, "a").await;
  let b = create_user(&state, "b").await;
  send(&state, "PUT", &format!("/users/{a}/friends/{b}"), None).await;

  let events = body_json(send(&state, "GET", "/events", None).await).await;
  let id = events[0]["event_id"].as_i64().unwrap();

  let resp = send(&state, "DELETE", &format!("/events/{id}"), None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  let resp = send(&state, "GET", &format!("/events/{id}"), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
