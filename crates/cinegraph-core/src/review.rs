//! Reviews and the helpful/unhelpful votes that score them.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Outcome, Result,
  event::{EventType, NewEvent, Operation},
  id::{FilmId, ReviewId, UserId},
  store::{FilmStore, StoreResultExt as _, require_film, require_review, require_user},
};

/// Default number of reviews returned by a listing.
pub const DEFAULT_REVIEW_LIMIT: usize = 10;

/// A review with its usefulness score computed from votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
  pub review_id:   ReviewId,
  pub content:     String,
  pub is_positive: bool,
  pub user_id:     UserId,
  pub film_id:     FilmId,
  /// Sum of +1 per helpful vote and −1 per unhelpful vote.
  pub useful:      i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
  pub content:     String,
  pub is_positive: bool,
  pub user_id:     UserId,
  pub film_id:     FilmId,
}

/// The mutable part of a review. Author and film never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewUpdate {
  pub content:     String,
  pub is_positive: bool,
}

fn check_content(content: &str) -> Result<()> {
  if content.trim().is_empty() {
    return Err(Error::Validation("review content must not be blank".to_owned()));
  }
  Ok(())
}

impl NewReview {
  pub fn validate(self) -> Result<Self> {
    check_content(&self.content)?;
    Ok(self)
  }
}

impl ReviewUpdate {
  pub fn validate(self) -> Result<Self> {
    check_content(&self.content)?;
    Ok(self)
  }
}

/// A single voter's opinion of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
  Helpful,
  Unhelpful,
}

impl Vote {
  pub fn score(self) -> i64 {
    match self {
      Vote::Helpful => 1,
      Vote::Unhelpful => -1,
    }
  }

  pub fn is_helpful(self) -> bool { matches!(self, Vote::Helpful) }

  pub fn from_helpful(helpful: bool) -> Self {
    if helpful { Vote::Helpful } else { Vote::Unhelpful }
  }
}

/// Usefulness of a review given all of its votes.
pub fn usefulness(votes: impl IntoIterator<Item = Vote>) -> i64 {
  votes.into_iter().map(Vote::score).sum()
}

/// Order reviews most useful first, ties by id.
pub fn sort_by_usefulness(reviews: &mut [Review]) {
  reviews.sort_by(|a, b| b.useful.cmp(&a.useful).then(a.review_id.cmp(&b.review_id)));
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// Publish a review. Author and film must exist.
pub async fn create_review<S: FilmStore>(
  store: &S,
  input: NewReview,
) -> Result<Outcome<Review>> {
  let input = input.validate()?;
  require_user(store, input.user_id).await?;
  require_film(store, input.film_id).await?;
  let review = store.create_review(input).await.lift()?;
  let effect = NewEvent::new(review.user_id, review.review_id, EventType::Review, Operation::Add);
  Ok(Outcome::with_effect(review, effect))
}

/// Replace a review's content and polarity. The event is attributed to the
/// stored author, whoever asked for the update.
pub async fn update_review<S: FilmStore>(
  store: &S,
  id: ReviewId,
  update: ReviewUpdate,
) -> Result<Outcome<Review>> {
  let update = update.validate()?;
  let review = store.update_review(id, update).await.lift()?.ok_or(Error::ReviewNotFound(id))?;
  let effect =
    NewEvent::new(review.user_id, review.review_id, EventType::Review, Operation::Update);
  Ok(Outcome::with_effect(review, effect))
}

pub async fn delete_review<S: FilmStore>(store: &S, id: ReviewId) -> Result<Outcome<()>> {
  let review = require_review(store, id).await?;
  if !store.delete_review(id).await.lift()? {
    // Lost a race with another delete.
    return Err(Error::ReviewNotFound(id));
  }
  let effect = NewEvent::new(review.user_id, id, EventType::Review, Operation::Remove);
  Ok(Outcome::with_effect((), effect))
}

/// Record `voter`'s vote, replacing any earlier one. Authors cannot vote on
/// their own reviews.
pub async fn cast_vote<S: FilmStore>(
  store: &S,
  review: ReviewId,
  voter: UserId,
  vote: Vote,
) -> Result<Review> {
  let target = require_review(store, review).await?;
  require_user(store, voter).await?;
  if target.user_id == voter {
    return Err(Error::SelfVote(voter));
  }
  store.upsert_vote(review, voter, vote).await.lift()?;
  require_review(store, review).await
}

/// Withdraw `voter`'s vote if it is a `vote`. A vote of the other polarity
/// is left alone.
pub async fn withdraw_vote<S: FilmStore>(
  store: &S,
  review: ReviewId,
  voter: UserId,
  vote: Vote,
) -> Result<Review> {
  require_review(store, review).await?;
  require_user(store, voter).await?;
  store.delete_vote(review, voter, vote).await.lift()?;
  require_review(store, review).await
}
