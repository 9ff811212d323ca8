//! The registration service: validation ladder plus atomic account creation.

use logvault_core::{
  Error, Result,
  store::CredentialStore,
  user::Identity,
  validation::{
    FieldFeedback, SignUpFeedback, email_shaped, password_long_enough,
  },
};

use crate::{hash, messages};

/// Result of a sign-up attempt. Validation problems are a value, not an
/// error: the caller renders them field by field.
#[derive(Debug)]
pub enum SignUpOutcome {
  SignedUp(Identity),
  Rejected(SignUpFeedback),
}

/// Register a new account.
///
/// Field-presence and format checks all run, so every problem is reported
/// together; the database duplicate check runs only once the email has
/// passed its format check. On success both inserts happen in one store
/// transaction, and the caller receives an authenticated [`Identity`] ready
/// to bind into a session.
pub async fn sign_up<S: CredentialStore>(
  store:        &S,
  email:        &str,
  password:     &str,
  confirmation: &str,
) -> Result<SignUpOutcome> {
  let mut email_fb        = FieldFeedback::require(email, messages::EMAIL_REQUIRED);
  let mut password_fb     = FieldFeedback::require(password, messages::PASSWORD_REQUIRED);
  let mut confirmation_fb =
    FieldFeedback::require(confirmation, messages::CONFIRMATION_REQUIRED);

  if email_fb.valid && !email_shaped(email) {
    email_fb = FieldFeedback::fail(messages::EMAIL_MALFORMED);
  }
  if password_fb.valid && !password_long_enough(password) {
    password_fb = FieldFeedback::fail(messages::PASSWORD_TOO_SHORT);
  }
  if confirmation_fb.valid && password != confirmation {
    confirmation_fb = FieldFeedback::fail(messages::CONFIRMATION_MISMATCH);
  }

  // The only DB-dependent check; skipped when the email is already known
  // bad, to avoid pointless store calls on malformed input.
  if email_fb.valid && store.exists(email).await? {
    email_fb = FieldFeedback::fail(messages::EMAIL_TAKEN);
  }

  if !(email_fb.valid && password_fb.valid && confirmation_fb.valid) {
    return Ok(SignUpOutcome::Rejected(SignUpFeedback {
      email:        email_fb,
      password:     password_fb,
      confirmation: confirmation_fb,
    }));
  }

  let credential = hash::new_credential(password)?;

  // The UNIQUE constraint is the real arbiter: losing a race with a
  // concurrent registration surfaces here and becomes ordinary
  // duplicate-email feedback, never a raw conflict error.
  let user_id = match store.create_account_with_credential(email, credential).await {
    Ok(id) => id,
    Err(Error::EmailTaken(_)) => {
      return Ok(SignUpOutcome::Rejected(SignUpFeedback {
        email:        FieldFeedback::fail(messages::EMAIL_TAKEN),
        password:     FieldFeedback::ok(),
        confirmation: FieldFeedback::ok(),
      }));
    }
    Err(e) => return Err(e),
  };

  tracing::info!(%user_id, "account registered");
  Ok(SignUpOutcome::SignedUp(Identity {
    user_id,
    email: email.to_owned(),
  }))
}

#[cfg(test)]
mod tests {
  use logvault_store_sqlite::SqliteStore;

  use super::*;

  async fn store() -> SqliteStore {
    SqliteStore::open_in_memory().await.expect("in-memory store")
  }

  fn rejected(outcome: SignUpOutcome) -> SignUpFeedback {
    match outcome {
      SignUpOutcome::Rejected(fb) => fb,
      SignUpOutcome::SignedUp(id) => panic!("expected rejection, got {id:?}"),
    }
  }

  #[tokio::test]
  async fn valid_sign_up_returns_identity() {
    let s = store().await;
    let outcome = sign_up(&s, "alice@example.com", "secret1", "secret1")
      .await
      .unwrap();

    let SignUpOutcome::SignedUp(identity) = outcome else {
      panic!("expected success");
    };
    assert_eq!(identity.email, "alice@example.com");
    assert!(s.exists("alice@example.com").await.unwrap());
  }

  #[tokio::test]
  async fn empty_fields_all_reported_at_once() {
    let s = store().await;
    let fb = rejected(sign_up(&s, "", "", "").await.unwrap());

    assert_eq!(fb.email.feedback, messages::EMAIL_REQUIRED);
    assert_eq!(fb.password.feedback, messages::PASSWORD_REQUIRED);
    assert_eq!(fb.confirmation.feedback, messages::CONFIRMATION_REQUIRED);
  }

  #[tokio::test]
  async fn malformed_email_and_short_password_reported_together() {
    let s = store().await;
    let fb = rejected(sign_up(&s, "not-an-email", "abc", "abc").await.unwrap());

    assert_eq!(fb.email.feedback, messages::EMAIL_MALFORMED);
    assert_eq!(fb.password.feedback, messages::PASSWORD_TOO_SHORT);
    assert!(fb.confirmation.valid);
  }

  #[tokio::test]
  async fn mismatched_confirmation_rejected() {
    let s = store().await;
    let fb =
      rejected(sign_up(&s, "alice@example.com", "secret1", "secret2").await.unwrap());

    assert!(fb.email.valid);
    assert!(fb.password.valid);
    assert_eq!(fb.confirmation.feedback, messages::CONFIRMATION_MISMATCH);
    // Nothing was created.
    assert!(!s.exists("alice@example.com").await.unwrap());
  }

  #[tokio::test]
  async fn duplicate_email_rejected_without_partial_state() {
    let s = store().await;
    sign_up(&s, "alice@example.com", "secret1", "secret1")
      .await
      .unwrap();

    let fb =
      rejected(sign_up(&s, "alice@example.com", "secret1", "secret1").await.unwrap());
    assert_eq!(fb.email.feedback, messages::EMAIL_TAKEN);

    // The original credential still authenticates.
    let cred = s
      .lookup_credential("alice@example.com")
      .await
      .unwrap()
      .expect("credential");
    assert!(crate::hash::verify_password("secret1", &cred).unwrap());
  }
}
