//! Salt generation and the slow password digest.
//!
//! Digests are argon2id (memory-hard) keyed by a per-account random salt.
//! Comparison goes through [`password_hash::Output`], whose equality is
//! constant-time, so verification cost does not depend on where the first
//! mismatching byte sits.

use argon2::{Argon2, password_hash::Output};
use logvault_core::{
  Error, Result,
  credential::{Credential, DIGEST_LEN, SALT_LEN},
};
use rand_core::{OsRng, RngCore as _};

/// A fresh cryptographically random salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
  let mut salt = [0u8; SALT_LEN];
  OsRng.fill_bytes(&mut salt);
  salt
}

/// The stored digest for `password` under `salt`. Deterministic for a given
/// (password, salt) pair.
pub fn derive_digest(password: &str, salt: &[u8]) -> Result<[u8; DIGEST_LEN]> {
  let mut digest = [0u8; DIGEST_LEN];
  Argon2::default()
    .hash_password_into(password.as_bytes(), salt, &mut digest)
    .map_err(|e| Error::Hash(e.to_string()))?;
  Ok(digest)
}

/// Build the credential persisted at registration.
pub fn new_credential(password: &str) -> Result<Credential> {
  let salt = generate_salt();
  let digest = derive_digest(password, &salt)?;
  Ok(Credential {
    salt:          salt.to_vec(),
    password_hash: digest.to_vec(),
  })
}

/// Recompute the digest for `password` under the stored salt and compare in
/// constant time.
pub fn verify_password(password: &str, credential: &Credential) -> Result<bool> {
  let candidate = derive_digest(password, &credential.salt)?;
  let lhs = Output::new(&candidate).map_err(|e| Error::Hash(e.to_string()))?;
  // A stored digest of impossible length can never match.
  let Ok(rhs) = Output::new(&credential.password_hash) else {
    return Ok(false);
  };
  Ok(lhs == rhs)
}
