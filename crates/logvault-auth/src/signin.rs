//! The session authenticator: email/password verification.

use logvault_core::{
  Result,
  store::CredentialStore,
  user::Identity,
  validation::{
    FieldFeedback, SignInFeedback, email_shaped, password_long_enough,
  },
};

use crate::{hash, messages};

/// Result of a sign-in attempt.
///
/// "Unknown email" and "wrong password" stay distinguishable in the
/// feedback — a deliberate usability trade-off inherited from the product,
/// not an oversight.
#[derive(Debug)]
pub enum SignInOutcome {
  SignedIn(Identity),
  Rejected(SignInFeedback),
}

/// Authenticate an email/password pair against the credential store.
///
/// Mirrors the registration ladder: presence and format checks first, then
/// the account lookup, and only for an existing account the digest
/// recomputation and constant-time comparison.
pub async fn sign_in<S: CredentialStore>(
  store:    &S,
  email:    &str,
  password: &str,
) -> Result<SignInOutcome> {
  let mut email_fb    = FieldFeedback::require(email, messages::EMAIL_REQUIRED);
  let mut password_fb = FieldFeedback::require(password, messages::PASSWORD_REQUIRED);

  if email_fb.valid && !email_shaped(email) {
    email_fb = FieldFeedback::fail(messages::EMAIL_MALFORMED);
  }
  if password_fb.valid && !password_long_enough(password) {
    password_fb = FieldFeedback::fail(messages::PASSWORD_TOO_SHORT);
  }

  if email_fb.valid && !store.exists(email).await? {
    email_fb = FieldFeedback::fail(messages::EMAIL_UNKNOWN);
  }

  // The password can only be judged once the email resolved to an account;
  // before that there is no salt to hash against.
  if email_fb.valid && password_fb.valid {
    match store.lookup_credential(email).await? {
      Some(credential) => {
        if !hash::verify_password(password, &credential)? {
          password_fb = FieldFeedback::fail(messages::PASSWORD_INCORRECT);
        }
      }
      // Account raced away between the two lookups; report it like any
      // other unknown email.
      None => email_fb = FieldFeedback::fail(messages::EMAIL_UNKNOWN),
    }
  }

  if email_fb.valid && password_fb.valid {
    match store.lookup_user_id(email).await? {
      Some(user_id) => {
        tracing::debug!(%user_id, "sign-in succeeded");
        return Ok(SignInOutcome::SignedIn(Identity {
          user_id,
          email: email.to_owned(),
        }));
      }
      None => email_fb = FieldFeedback::fail(messages::EMAIL_UNKNOWN),
    }
  }

  Ok(SignInOutcome::Rejected(SignInFeedback {
    email:    email_fb,
    password: password_fb,
  }))
}
