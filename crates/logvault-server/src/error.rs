//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found")]
  NotFound,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("internal error")]
  Internal,

  #[error("core error: {0}")]
  Core(#[from] logvault_core::Error),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
      Error::NotFound => (StatusCode::NOT_FOUND, "not found"),
      Error::BadRequest(m) => {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": m })))
          .into_response();
      }
      Error::Internal => {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
      }
      // Infrastructure detail stays in the logs, never in the body.
      Error::Core(e) => {
        tracing::error!(error = %e, "request failed on the store");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
