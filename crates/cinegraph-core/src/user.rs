//! Users and their registration input.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, id::UserId};

/// A registered user.
///
/// `friends` holds the *outbound* edges only: the users this user has added.
/// Friendship is directed, so `b ∈ a.friends` says nothing about
/// `a ∈ b.friends`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:       UserId,
  pub email:    String,
  pub login:    String,
  pub name:     String,
  pub birthday: NaiveDate,
  #[serde(default)]
  pub friends:  BTreeSet<UserId>,
}

/// Input for creating or replacing a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
  pub email:    String,
  pub login:    String,
  /// Display name; a blank or missing name falls back to `login`.
  #[serde(default)]
  pub name:     Option<String>,
  pub birthday: NaiveDate,
}

impl NewUser {
  /// Check field constraints and fill in the display name.
  ///
  /// `today` is passed in so callers (and tests) control the clock.
  pub fn validate(mut self, today: NaiveDate) -> Result<Self> {
    let email = self.email.trim();
    if email.is_empty() || !email.contains('@') || email.contains(char::is_whitespace) {
      return Err(Error::Validation(format!("invalid email address: {:?}", self.email)));
    }
    // Stored and compared for uniqueness in trimmed form.
    self.email = email.to_owned();
    if self.login.is_empty() || self.login.contains(char::is_whitespace) {
      return Err(Error::Validation(
        "login must be non-empty and contain no whitespace".to_owned(),
      ));
    }
    if self.birthday > today {
      return Err(Error::Validation(format!(
        "birthday {} is in the future",
        self.birthday
      )));
    }
    if self.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
      self.name = Some(self.login.clone());
    }
    Ok(self)
  }

  /// The display name after validation.
  pub fn display_name(&self) -> &str { self.name.as_deref().unwrap_or(&self.login) }
}
