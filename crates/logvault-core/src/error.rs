//! Error types for `logvault-core`.
//!
//! User-input problems never appear here; they travel as
//! [`validation`](crate::validation) feedback values so callers can render
//! them field by field.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A second account creation for an email that already owns one. Raised
  /// by the store's UNIQUE constraint, so two racing registrations cannot
  /// both win.
  #[error("email already registered: {0}")]
  EmailTaken(String),

  /// A credential referenced a user row that does not exist. This is a bug
  /// in the caller, not user input.
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("password hashing failed: {0}")]
  Hash(String),

  /// The backing store is unreachable, rejected a statement, or returned a
  /// row that cannot be decoded.
  #[error("store unavailable: {0}")]
  Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
