//! The Logvault HTTP server: session-cookie authentication over the store
//! traits, with per-user log file upload, listing, download, and deletion.

pub mod account;
pub mod error;
pub mod logs;
pub mod session;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use logvault_core::store::{CredentialStore, LogStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use self::session::SessionKey;

/// Server configuration, deserialized from TOML plus `LOGVAULT_*` overrides.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  /// Path to the SQLite database file.
  pub store_path:     PathBuf,
  /// Hex-encoded HMAC secret for session cookies, at least 32 bytes.
  pub session_secret: String,
}

/// Shared state handed to every request handler.
pub struct AppState<S> {
  pub store:       Arc<S>,
  pub session_key: SessionKey,
}

impl<S> AppState<S> {
  pub fn new(store: S, session_key: SessionKey) -> Self {
    Self {
      store: Arc::new(store),
      session_key,
    }
  }
}

// Manual impl; a derive would demand `S: Clone` that the `Arc` makes
// unnecessary.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:       self.store.clone(),
      session_key: self.session_key.clone(),
    }
  }
}

/// Build the application router over any store backend.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CredentialStore + LogStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .route("/api/sign_up", post(account::sign_up_handler::<S>))
    .route("/api/sign_in", post(account::sign_in_handler::<S>))
    .route("/api/sign_out", post(account::sign_out_handler))
    .route(
      "/api/logs",
      get(logs::list_handler::<S>).post(logs::upload_handler::<S>),
    )
    .route(
      "/api/logs/{id}",
      get(logs::download_handler::<S>).delete(logs::remove_handler::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn health() -> &'static str { "ok" }

#[cfg(test)]
mod tests {
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
  };
  use logvault_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;
  use crate::session::SESSION_COOKIE;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.expect("in-memory store");
    let key = SessionKey::new(&b"integration-test-secret-32bytes!"[..]);
    router(AppState::new(store, key))
  }

  fn post_json(uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
      builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
  }

  fn get_with(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
      builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
  }

  fn delete_with(uri: &str, cookie: &str) -> Request<Body> {
    Request::delete(uri)
      .header(header::COOKIE, cookie)
      .body(Body::empty())
      .unwrap()
  }

  /// The `name=value` pair from a `Set-Cookie` header, ready to send back.
  fn session_pair(response: &Response) -> String {
    let set_cookie = response
      .headers()
      .get(header::SET_COOKIE)
      .expect("Set-Cookie header")
      .to_str()
      .unwrap();
    assert!(set_cookie.starts_with(SESSION_COOKIE));
    set_cookie.split(';').next().unwrap().to_owned()
  }

  async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn register(app: &Router, email: &str) -> String {
    let response = app
      .clone()
      .oneshot(post_json(
        "/api/sign_up",
        json!({ "email": email, "password": "secret1", "confirmation": "secret1" }),
        None,
      ))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    session_pair(&response)
  }

  async fn upload(app: &Router, cookie: &str, filename: &str, bytes: &[u8]) -> String {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    let response = app
      .clone()
      .oneshot(post_json(
        "/api/logs",
        json!({ "filename": filename, "content": STANDARD.encode(bytes) }),
        Some(cookie),
      ))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["log_id"].as_str().unwrap().to_owned()
  }

  #[tokio::test]
  async fn sign_up_sets_a_session_cookie() {
    let app = app().await;
    let response = app
      .oneshot(post_json(
        "/api/sign_up",
        json!({
          "email": "alice@example.com",
          "password": "secret1",
          "confirmation": "secret1",
        }),
        None,
      ))
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_pair(&response);
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=")));

    let body = body_json(response).await;
    assert!(body["user_id"].as_str().is_some());
  }

  #[tokio::test]
  async fn sign_up_validation_problems_come_back_as_feedback() {
    let app = app().await;
    let response = app
      .oneshot(post_json(
        "/api/sign_up",
        json!({ "email": "not-an-email", "password": "abc", "confirmation": "xyz" }),
        None,
      ))
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["feedback"]["email"]["valid"], json!(false));
    assert_eq!(body["feedback"]["password"]["valid"], json!(false));
    assert_eq!(body["feedback"]["confirmation"]["valid"], json!(false));
  }

  #[tokio::test]
  async fn sign_in_after_sign_up_sets_a_session_cookie() {
    let app = app().await;
    register(&app, "alice@example.com").await;

    let response = app
      .oneshot(post_json(
        "/api/sign_in",
        json!({ "email": "alice@example.com", "password": "secret1" }),
        None,
      ))
      .await
      .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    session_pair(&response);
  }

  #[tokio::test]
  async fn logs_reject_missing_and_tampered_sessions() {
    let app = app().await;

    let response = app.clone().oneshot(get_with("/api/logs", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let cookie = register(&app, "alice@example.com").await;
    let mut tampered = cookie.clone();
    tampered.push('x');
    let response = app
      .oneshot(get_with("/api/logs", Some(&tampered)))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn upload_list_download_delete_flow() {
    let app = app().await;
    let cookie = register(&app, "alice@example.com").await;

    let log_id = upload(&app, &cookie, "boot.log", b"kernel: hello").await;

    let response = app
      .clone()
      .oneshot(get_with("/api/logs", Some(&cookie)))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["filename"], "boot.log");

    let response = app
      .clone()
      .oneshot(get_with(&format!("/api/logs/{log_id}"), Some(&cookie)))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
      response.headers()[header::CONTENT_DISPOSITION],
      "attachment; filename=\"boot.log\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"kernel: hello");

    let response = app
      .clone()
      .oneshot(delete_with(&format!("/api/logs/{log_id}"), &cookie))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
      .oneshot(get_with("/api/logs", Some(&cookie)))
      .await
      .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 0);
  }

  #[tokio::test]
  async fn empty_filename_is_a_bad_request() {
    let app = app().await;
    let cookie = register(&app, "alice@example.com").await;

    let response = app
      .oneshot(post_json(
        "/api/logs",
        json!({ "filename": "", "content": "" }),
        Some(&cookie),
      ))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn downloading_an_unknown_log_is_not_found() {
    let app = app().await;
    let cookie = register(&app, "alice@example.com").await;

    let response = app
      .oneshot(get_with(
        "/api/logs/00000000-0000-0000-0000-000000000000",
        Some(&cookie),
      ))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn another_users_files_are_invisible_and_undeletable() {
    let app = app().await;
    let alice = register(&app, "alice@example.com").await;
    let bob = register(&app, "bob@example.com").await;

    let log_id = upload(&app, &alice, "alice.log", b"private").await;

    // Bob cannot see it.
    let response = app
      .clone()
      .oneshot(get_with("/api/logs", Some(&bob)))
      .await
      .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 0);

    // Bob cannot fetch it.
    let response = app
      .clone()
      .oneshot(get_with(&format!("/api/logs/{log_id}"), Some(&bob)))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Bob's delete succeeds as a no-op and Alice's file survives.
    let response = app
      .clone()
      .oneshot(delete_with(&format!("/api/logs/{log_id}"), &bob))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
      .oneshot(get_with("/api/logs", Some(&alice)))
      .await
      .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn sign_out_clears_the_cookie() {
    let app = app().await;
    let cookie = register(&app, "alice@example.com").await;

    let response = app
      .oneshot(post_json("/api/sign_out", json!({}), Some(&cookie)))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));
  }
}
