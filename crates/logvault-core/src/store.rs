//! The store traits implemented by storage backends.
//!
//! Higher layers (`logvault-auth`, `logvault-server`) depend on these
//! abstractions, not on any concrete backend. Methods return the concrete
//! [`Error`](crate::Error) taxonomy rather than a backend-specific type so
//! that callers can translate conflicts into validation feedback without
//! knowing which backend they hold.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Result,
  credential::Credential,
  log::{LogEntry, LogFile},
};

// ─── Credentials ─────────────────────────────────────────────────────────────

/// Accounts and their password material.
///
/// Mutations commit durably before the returned future resolves. The
/// one-account-per-email invariant is enforced by the backend's UNIQUE
/// constraint, never by callers pre-checking.
pub trait CredentialStore: Send + Sync {
  /// True iff a user row matches `email` exactly (case-sensitive).
  fn exists(&self, email: &str) -> impl Future<Output = Result<bool>> + Send;

  fn lookup_user_id(
    &self,
    email: &str,
  ) -> impl Future<Output = Result<Option<Uuid>>> + Send;

  /// Salt and digest for `email`, joined through the user row. `None` when
  /// no such account exists.
  fn lookup_credential(
    &self,
    email: &str,
  ) -> impl Future<Output = Result<Option<Credential>>> + Send;

  /// Insert a new user row and return its id.
  ///
  /// Fails with [`Error::EmailTaken`](crate::Error::EmailTaken) when the
  /// email is already registered.
  fn create_account(&self, email: &str)
  -> impl Future<Output = Result<Uuid>> + Send;

  /// Insert the credential row for an existing user.
  ///
  /// Fails with [`Error::UserNotFound`](crate::Error::UserNotFound) if
  /// `user_id` has no user row.
  fn attach_credential(
    &self,
    user_id: Uuid,
    credential: Credential,
  ) -> impl Future<Output = Result<()>> + Send;

  /// Both inserts of registration in a single transaction: either the user
  /// row and its credential both become visible, or neither does.
  fn create_account_with_credential(
    &self,
    email: &str,
    credential: Credential,
  ) -> impl Future<Output = Result<Uuid>> + Send;
}

// ─── Log files ───────────────────────────────────────────────────────────────

/// Per-user log files.
///
/// Every read and delete is scoped to `owner_id` in the SQL predicate
/// itself, so one user's operations can never touch another user's rows.
/// The trait never authenticates; `owner_id` must come from a verified
/// session.
pub trait LogStore: Send + Sync {
  /// Listing rows for `owner_id` in insertion order. Blobs are not loaded.
  fn list_logs(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<LogEntry>>> + Send;

  /// Persist a new log file and return its id. Filenames need not be
  /// unique.
  fn create_log(
    &self,
    owner_id: Uuid,
    filename: &str,
    blob: Vec<u8>,
  ) -> impl Future<Output = Result<Uuid>> + Send;

  /// The full file, or `None` when `log_id` does not exist or belongs to a
  /// different owner. The two cases are deliberately indistinguishable.
  fn fetch_log(
    &self,
    owner_id: Uuid,
    log_id: Uuid,
  ) -> impl Future<Output = Result<Option<LogFile>>> + Send;

  /// Delete at most one row matching both `log_id` and `owner_id`.
  /// Deleting a missing or foreign file is a silent no-op.
  fn delete_log(
    &self,
    owner_id: Uuid,
    log_id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send;
}
