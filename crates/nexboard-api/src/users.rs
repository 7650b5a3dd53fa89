//! Handlers for the caller's own profile.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/profile` | |
//! | `PUT`  | `/users/profile` | Body: `{"name":"…","avatar_url":"…"}` |

use axum::extract::State;
use nexboard_core::{
  store::TrackerStore,
  user::{ProfileChanges, UserView},
};
use serde::Deserialize;

use crate::{Actor, ApiError, Svc, extract::Json};

/// `GET /users/profile`
pub async fn profile<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
) -> Result<Json<UserView>, ApiError> {
  Ok(Json(svc.users.profile(actor.external_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
  pub name:       String,
  #[serde(default)]
  pub avatar_url: Option<String>,
}

/// `PUT /users/profile`
pub async fn update_profile<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Json(body): Json<ProfileBody>,
) -> Result<Json<UserView>, ApiError> {
  let changes = ProfileChanges { name: body.name, avatar_url: body.avatar_url };
  Ok(Json(svc.users.update_profile(actor.external_id, changes).await?))
}
