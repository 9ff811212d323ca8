//! Stored password material.

use serde::{Deserialize, Serialize};

/// Length in bytes of per-account random salts.
pub const SALT_LEN: usize = 32;

/// Length in bytes of the derived password digest.
pub const DIGEST_LEN: usize = 32;

/// Per-account salt and slow-hash digest. Never contains the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
  pub salt:          Vec<u8>,
  pub password_hash: Vec<u8>,
}

impl std::fmt::Debug for Credential {
  // Keeps password material out of logs and panic messages.
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credential").finish_non_exhaustive()
  }
}
