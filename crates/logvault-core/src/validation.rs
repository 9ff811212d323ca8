//! Field validation for sign-up and sign-in forms.
//!
//! Failures here are ordinary values, not errors: every field carries a
//! `(valid, feedback)` pair so the caller can render all problems at once.

use serde::{Deserialize, Serialize};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Outcome of validating a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFeedback {
  pub valid:    bool,
  /// Message for the first failed check on this field. Empty when `valid`.
  pub feedback: String,
}

impl FieldFeedback {
  pub fn ok() -> Self {
    Self { valid: true, feedback: String::new() }
  }

  pub fn fail(message: impl Into<String>) -> Self {
    Self { valid: false, feedback: message.into() }
  }

  /// Presence check: non-empty passes, empty fails with `message`.
  pub fn require(value: &str, message: &str) -> Self {
    if value.is_empty() {
      Self::fail(message)
    } else {
      Self::ok()
    }
  }
}

/// Per-field feedback for a sign-up attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpFeedback {
  pub email:        FieldFeedback,
  pub password:     FieldFeedback,
  pub confirmation: FieldFeedback,
}

/// Per-field feedback for a sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInFeedback {
  pub email:    FieldFeedback,
  pub password: FieldFeedback,
}

/// Permissive `local@domain.tld` shape check: exactly one `@`, a non-empty
/// local part, and a dot with characters on both sides in the domain.
///
/// This is deliberately not RFC 5322; it only filters obvious non-addresses
/// before the database is consulted.
pub fn email_shaped(email: &str) -> bool {
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  match domain.rsplit_once('.') {
    Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
    None => false,
  }
}

/// Length check applied after presence: counts characters, not bytes.
pub fn password_long_enough(password: &str) -> bool {
  password.chars().count() >= MIN_PASSWORD_LEN
}
