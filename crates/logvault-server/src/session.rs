//! Signed session cookies and the `CurrentUser` extractor.
//!
//! A session token is `base64url(identity json) . base64url(hmac-sha256 tag)`
//! under a server-side secret. The server keeps no session table; a token is
//! valid exactly as long as its tag verifies.

use std::sync::Arc;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use logvault_core::user::Identity;
use sha2::Sha256;

use crate::{AppState, error::Error};

pub const SESSION_COOKIE: &str = "logvault_session";

type HmacSha256 = Hmac<Sha256>;

/// The HMAC key shared by all request handlers.
#[derive(Clone)]
pub struct SessionKey {
  secret: Arc<[u8]>,
}

impl SessionKey {
  pub fn new(secret: impl Into<Arc<[u8]>>) -> Self {
    Self {
      secret: secret.into(),
    }
  }

  fn mac(&self) -> Result<HmacSha256, Error> {
    HmacSha256::new_from_slice(&self.secret).map_err(|_| Error::Internal)
  }

  /// Serialize and sign an identity into a cookie value.
  pub fn seal(&self, identity: &Identity) -> Result<String, Error> {
    let payload = serde_json::to_vec(identity).map_err(|_| Error::Internal)?;
    let payload = URL_SAFE_NO_PAD.encode(payload);

    let mut mac = self.mac()?;
    mac.update(payload.as_bytes());
    let tag = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{payload}.{tag}"))
  }

  /// Verify a cookie value and recover the identity it carries.
  ///
  /// Any malformed, tampered, or foreign-keyed token comes back as `None`;
  /// the tag check is constant-time.
  pub fn unseal(&self, token: &str) -> Option<Identity> {
    let (payload, tag) = token.split_once('.')?;
    let tag = URL_SAFE_NO_PAD.decode(tag).ok()?;

    let mut mac = self.mac().ok()?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&tag).ok()?;

    let payload = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&payload).ok()
  }
}

/// The identity extracted from a verified session cookie.
///
/// Handlers that take this as an argument only run for signed-in requests;
/// everything else is rejected with 401 before the handler body.
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    identity_from_headers(&parts.headers, &state.session_key)
      .map(CurrentUser)
      .ok_or(Error::Unauthorized)
  }
}

/// Find the session cookie among the request's `Cookie` headers and verify
/// it.
pub fn identity_from_headers(
  headers: &HeaderMap,
  key: &SessionKey,
) -> Option<Identity> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == SESSION_COOKIE)
    .and_then(|(_, value)| key.unseal(value))
}

/// The `Set-Cookie` value that installs a session.
pub fn session_cookie(value: &str) -> String {
  format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax")
}

/// The `Set-Cookie` value that removes a session.
pub fn clear_session_cookie() -> String {
  format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
