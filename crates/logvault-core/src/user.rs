//! Users and authenticated identities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. One row per email; never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id: Uuid,
  pub email:   String,
}

/// The identity bound to a verified session.
///
/// Produced only by the registration service and the session authenticator.
/// Holding one means the email/password check — or a signed session token
/// carrying its result — has already passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub user_id: Uuid,
  pub email:   String,
}
