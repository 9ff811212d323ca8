//! Log file handlers. Every query is scoped to the session's user id, so one
//! user's requests can never observe or touch another user's files.

use axum::{
  Json,
  extract::{Path, State},
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use logvault_core::{log::LogEntry, store::LogStore};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::Error, session::CurrentUser};

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
  pub filename: String,
  /// File bytes, base64-encoded.
  pub content:  String,
}

pub async fn list_handler<S: LogStore>(
  State(state): State<AppState<S>>,
  CurrentUser(identity): CurrentUser,
) -> Result<Json<Vec<LogEntry>>, Error> {
  let entries = state.store.list_logs(identity.user_id).await?;
  Ok(Json(entries))
}

pub async fn upload_handler<S: LogStore>(
  State(state): State<AppState<S>>,
  CurrentUser(identity): CurrentUser,
  Json(req): Json<UploadRequest>,
) -> Result<Response, Error> {
  if req.filename.is_empty() {
    return Err(Error::BadRequest("filename must not be empty".into()));
  }
  let blob = STANDARD
    .decode(&req.content)
    .map_err(|_| Error::BadRequest("content is not valid base64".into()))?;

  let log_id = state
    .store
    .create_log(identity.user_id, &req.filename, blob)
    .await?;
  tracing::info!(user_id = %identity.user_id, %log_id, "log uploaded");

  Ok((StatusCode::CREATED, Json(json!({ "log_id": log_id }))).into_response())
}

pub async fn download_handler<S: LogStore>(
  State(state): State<AppState<S>>,
  CurrentUser(identity): CurrentUser,
  Path(log_id): Path<Uuid>,
) -> Result<Response, Error> {
  // Someone else's id looks identical to a nonexistent one.
  let file = state
    .store
    .fetch_log(identity.user_id, log_id)
    .await?
    .ok_or(Error::NotFound)?;

  Ok(
    (
      [
        (header::CONTENT_TYPE, "application/octet-stream".to_owned()),
        (
          header::CONTENT_DISPOSITION,
          format!("attachment; filename=\"{}\"", file.filename),
        ),
      ],
      file.blob,
    )
      .into_response(),
  )
}

pub async fn remove_handler<S: LogStore>(
  State(state): State<AppState<S>>,
  CurrentUser(identity): CurrentUser,
  Path(log_id): Path<Uuid>,
) -> Result<StatusCode, Error> {
  state.store.delete_log(identity.user_id, log_id).await?;
  Ok(StatusCode::NO_CONTENT)
}
