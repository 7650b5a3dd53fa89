//! HTTP server wiring for NexBoard.
//!
//! Puts the public account endpoints and a health check beside the
//! token-protected [`nexboard_api`] router, and owns configuration.

pub mod auth;
pub mod token;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router, middleware,
  routing::{get, post},
};
use nexboard_core::{service::Services, store::TrackerStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use token::TokenService;

// ─── Configuration ────────────────────────────────────────────────────────────

pub const DEFAULT_TOKEN_SECRET: &str = "default-secret-key";

/// Runtime server configuration, deserialised from `config.toml` and
/// `NEXBOARD_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  #[serde(default = "default_token_secret")]
  pub token_secret:   String,
  #[serde(default = "default_token_ttl_secs")]
  pub token_ttl_secs: u64,
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("nexboard.db") }
fn default_token_secret() -> String { DEFAULT_TOKEN_SECRET.into() }
fn default_token_ttl_secs() -> u64 { 86_400 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:           default_host(),
      port:           default_port(),
      store_path:     default_store_path(),
      token_secret:   default_token_secret(),
      token_ttl_secs: default_token_ttl_secs(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the account handlers and the bearer gate.
pub struct AppState<S> {
  pub services: Arc<Services<S>>,
  pub tokens:   Arc<TokenService>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      services: self.services.clone(),
      tokens:   self.tokens.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: TrackerStore + 'static,
{
  let protected = nexboard_api::api_router(state.services.clone()).layer(
    middleware::from_fn_with_state(state.clone(), auth::require_bearer::<S>),
  );

  let accounts = Router::new()
    .route("/users/register", post(auth::register::<S>))
    .route("/users/login",    post(auth::login::<S>))
    .with_state(state);

  Router::new()
    .route("/health", get(health))
    .nest("/api", accounts.merge(protected))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use nexboard_core::ids::RandomIds;
  use nexboard_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      services: Arc::new(Services::new(Arc::new(store), Arc::new(RandomIds))),
      tokens:   Arc::new(TokenService::new("test-secret", 3600)),
    }
  }

  async fn oneshot_json(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn register_and_login(state: &AppState<SqliteStore>) -> String {
    let (status, _) = oneshot_json(
      state.clone(),
      "POST",
      "/api/users/register",
      None,
      Some(json!({ "name": "Ana", "email": "ana@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = oneshot_json(
      state.clone(),
      "POST",
      "/api/users/login",
      None,
      Some(json!({ "email": "ana@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ana");
    body["token"].as_str().unwrap().to_owned()
  }

  #[test]
  fn config_defaults() {
    let cfg = ServerConfig::default();
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("nexboard.db"));
    assert_eq!(cfg.token_secret, DEFAULT_TOKEN_SECRET);
    assert_eq!(cfg.token_ttl_secs, 86_400);
  }

  #[tokio::test]
  async fn health_is_public() {
    let (status, body) = oneshot_json(make_state().await, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
  }

  #[tokio::test]
  async fn protected_routes_require_a_valid_token() {
    let state = make_state().await;

    let (status, body) =
      oneshot_json(state.clone(), "GET", "/api/workspaces", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) =
      oneshot_json(state, "GET", "/api/workspaces", Some("forged.00"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn token_grants_access_to_the_api() {
    let state = make_state().await;
    let token = register_and_login(&state).await;

    let (status, profile) =
      oneshot_json(state.clone(), "GET", "/api/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "ana@example.com");

    let (status, ws) = oneshot_json(
      state,
      "POST",
      "/api/workspaces",
      Some(&token),
      Some(json!({ "name": "Acme" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ws["owner_external_id"], profile["external_id"]);
  }

  #[tokio::test]
  async fn registration_validates_and_rejects_duplicates() {
    let state = make_state().await;

    let (status, _) = oneshot_json(
      state.clone(),
      "POST",
      "/api/users/register",
      None,
      Some(json!({ "name": "Ana", "email": "ana@example.com", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = oneshot_json(
      state.clone(),
      "POST",
      "/api/users/register",
      None,
      Some(json!({ "name": "Ana", "email": "not-an-email", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    register_and_login(&state).await;
    let (status, _) = oneshot_json(
      state,
      "POST",
      "/api/users/register",
      None,
      Some(json!({ "name": "Other", "email": "ana@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn bad_credentials_are_indistinguishable() {
    let state = make_state().await;
    register_and_login(&state).await;

    let (wrong_pw, wrong_body) = oneshot_json(
      state.clone(),
      "POST",
      "/api/users/login",
      None,
      Some(json!({ "email": "ana@example.com", "password": "wrong-one" })),
    )
    .await;
    let (unknown, unknown_body) = oneshot_json(
      state,
      "POST",
      "/api/users/login",
      None,
      Some(json!({ "email": "nobody@example.com", "password": "secret1" })),
    )
    .await;

    assert_eq!(wrong_pw, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
  }

  #[tokio::test]
  async fn malformed_account_bodies_answer_with_json_errors() {
    let state = make_state().await;

    let (status, body) = oneshot_json(
      state.clone(),
      "POST",
      "/api/users/register",
      None,
      Some(json!({ "name": "Ana", "email": "ana@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("password"));

    let (status, body) = oneshot_json(
      state,
      "POST",
      "/api/users/login",
      None,
      Some(json!({ "email": 7, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }
}
