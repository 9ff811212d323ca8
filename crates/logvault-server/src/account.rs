//! Account handlers: sign-up, sign-in, sign-out.

use axum::{
  Json,
  extract::State,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use logvault_auth::{
  register::{SignUpOutcome, sign_up},
  signin::{SignInOutcome, sign_in},
};
use logvault_core::store::CredentialStore;
use serde::Deserialize;
use serde_json::json;

use crate::{
  AppState,
  error::Error,
  session::{clear_session_cookie, session_cookie},
};

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
  pub email:        String,
  pub password:     String,
  pub confirmation: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
  pub email:    String,
  pub password: String,
}

pub async fn sign_up_handler<S: CredentialStore>(
  State(state): State<AppState<S>>,
  Json(req): Json<SignUpRequest>,
) -> Result<Response, Error> {
  let outcome =
    sign_up(&*state.store, &req.email, &req.password, &req.confirmation)
      .await?;

  match outcome {
    SignUpOutcome::SignedUp(identity) => {
      let token = state.session_key.seal(&identity)?;
      Ok(
        (
          StatusCode::CREATED,
          [(header::SET_COOKIE, session_cookie(&token))],
          Json(json!({ "user_id": identity.user_id })),
        )
          .into_response(),
      )
    }
    SignUpOutcome::Rejected(feedback) => Ok(
      (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "feedback": feedback })),
      )
        .into_response(),
    ),
  }
}

pub async fn sign_in_handler<S: CredentialStore>(
  State(state): State<AppState<S>>,
  Json(req): Json<SignInRequest>,
) -> Result<Response, Error> {
  let outcome = sign_in(&*state.store, &req.email, &req.password).await?;

  match outcome {
    SignInOutcome::SignedIn(identity) => {
      let token = state.session_key.seal(&identity)?;
      Ok(
        (
          StatusCode::OK,
          [(header::SET_COOKIE, session_cookie(&token))],
          Json(json!({ "user_id": identity.user_id })),
        )
          .into_response(),
      )
    }
    SignInOutcome::Rejected(feedback) => Ok(
      (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "feedback": feedback })),
      )
        .into_response(),
    ),
  }
}

/// Sessions are stateless, so signing out is just clearing the cookie.
pub async fn sign_out_handler() -> impl IntoResponse {
  (
    StatusCode::NO_CONTENT,
    [(header::SET_COOKIE, clear_session_cookie())],
  )
}
