//! Registration, login and the bearer-token gate in front of the API.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::{Request, State},
  http::{StatusCode, header},
  middleware::Next,
  response::Response,
};
use nexboard_api::{Actor, ApiError, extract::Json};
use nexboard_core::{
  Error, ErrorKind,
  store::TrackerStore,
  user::{NewAccount, UserView},
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::AppState;

const MIN_PASSWORD_LEN: usize = 6;

// ─── Password hashing ────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Unavailable(format!("argon2 error: {e}").into()))
}

/// Whether `password` matches the PHC string `hash`. Unparseable hashes never
/// match.
pub fn verify_password(password: &str, hash: &str) -> bool {
  PasswordHash::new(hash).is_ok_and(|parsed| {
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  })
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:     String,
  pub email:    String,
  pub password: String,
}

/// `POST /api/users/register`
pub async fn register<S: TrackerStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
  if body.password.chars().count() < MIN_PASSWORD_LEN {
    return Err(
      Error::InvalidArgument(format!(
        "password must be at least {MIN_PASSWORD_LEN} characters"
      ))
      .into(),
    );
  }

  let account = NewAccount {
    name:            body.name,
    email:           body.email,
    credential_hash: hash_password(&body.password)?,
  };
  let user = state.services.users.register(account).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub token: String,
  pub user:  UserView,
}

fn invalid_credentials() -> ApiError {
  ApiError::Unauthenticated("invalid email or password".into())
}

/// `POST /api/users/login`
pub async fn login<S: TrackerStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError> {
  let user = match state.services.users.by_email(body.email.trim()).await {
    Ok(user) => user,
    Err(e) if e.kind() == ErrorKind::NotFound => return Err(invalid_credentials()),
    Err(e) => return Err(e.into()),
  };

  if !verify_password(&body.password, &user.credential_hash) {
    tracing::debug!(user = %user.external_id, "login rejected");
    return Err(invalid_credentials());
  }

  let token = state
    .tokens
    .issue(user.external_id, &user.email)
    .map_err(|e| Error::Unavailable(Box::new(e)))?;
  tracing::info!(user = %user.external_id, "issued token");

  Ok(Json(LoginResponse { token, user: user.view() }))
}

// ─── Middleware ──────────────────────────────────────────────────────────────

/// Reject requests without a valid `Authorization: Bearer` token; otherwise
/// attach the verified [`Actor`] to the request.
pub async fn require_bearer<S: TrackerStore>(
  State(state): State<AppState<S>>,
  mut req: Request,
  next: Next,
) -> Result<Response, ApiError> {
  let token = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or_else(|| ApiError::Unauthenticated("missing bearer token".into()))?;

  let claims = state.tokens.verify(token.trim()).map_err(|e| {
    tracing::debug!(error = %e, "bearer token rejected");
    ApiError::Unauthenticated(e.to_string())
  })?;

  req
    .extensions_mut()
    .insert(Actor { external_id: claims.sub, email: claims.email });
  Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hashes_verify_only_their_password() {
    let hash = hash_password("hunter22").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("hunter22", &hash));
    assert!(!verify_password("hunter23", &hash));
  }

  #[test]
  fn unparseable_hash_never_matches() {
    assert!(!verify_password("anything", "not-a-phc-string"));
  }
}
