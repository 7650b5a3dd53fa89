//! Handlers for `/workspaces` and their members.
//!
//! | Method   | Path | Capability |
//! |----------|------|------------|
//! | `GET`    | `/workspaces` | workspaces the caller belongs to |
//! | `POST`   | `/workspaces` | any user; caller becomes owner |
//! | `GET`    | `/workspaces/{id}` | member |
//! | `PUT`    | `/workspaces/{id}` | owner |
//! | `DELETE` | `/workspaces/{id}` | owner |
//! | `GET`    | `/workspaces/{id}/members` | member |
//! | `POST`   | `/workspaces/{id}/members` | owner or admin |
//! | `PUT`    | `/workspaces/{id}/members/{user_id}` | owner |
//! | `DELETE` | `/workspaces/{id}/members/{user_id}` | owner or admin |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use nexboard_core::{
  membership::MemberView,
  store::TrackerStore,
  workspace::{Details, WorkspaceView},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Actor, ApiError, Svc,
  extract::{Json, Path},
};

// ─── Workspaces ──────────────────────────────────────────────────────────────

/// `GET /workspaces`
pub async fn list<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
) -> Result<Json<Vec<WorkspaceView>>, ApiError> {
  Ok(Json(svc.workspaces.list_mine(actor.external_id).await?))
}

/// `POST /workspaces`. Body: `{"name":"…","description":"…"}`
pub async fn create<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Json(body): Json<Details>,
) -> Result<impl IntoResponse, ApiError> {
  let workspace = svc.workspaces.create(actor.external_id, body).await?;
  Ok((StatusCode::CREATED, Json(workspace)))
}

/// `GET /workspaces/{id}`
pub async fn get_one<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<Json<WorkspaceView>, ApiError> {
  Ok(Json(svc.workspaces.get(actor.external_id, id).await?))
}

/// `PUT /workspaces/{id}`
pub async fn update<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
  Json(body): Json<Details>,
) -> Result<Json<WorkspaceView>, ApiError> {
  Ok(Json(svc.workspaces.update(actor.external_id, id, body).await?))
}

/// `DELETE /workspaces/{id}`
pub async fn delete<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  svc.workspaces.delete(actor.external_id, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Members ─────────────────────────────────────────────────────────────────

/// `GET /workspaces/{id}/members`
pub async fn members<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<MemberView>>, ApiError> {
  Ok(Json(svc.workspaces.members(actor.external_id, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct InviteBody {
  pub user_external_id: Uuid,
  pub role:             String,
}

/// `POST /workspaces/{id}/members`. Body: `{"user_external_id":"…","role":"member"}`
pub async fn invite<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
  Json(body): Json<InviteBody>,
) -> Result<impl IntoResponse, ApiError> {
  let member = svc
    .workspaces
    .invite(actor.external_id, id, body.user_external_id, &body.role)
    .await?;
  Ok((StatusCode::CREATED, Json(member)))
}

#[derive(Debug, Deserialize)]
pub struct RoleBody {
  pub role: String,
}

/// `PUT /workspaces/{id}/members/{user_id}`. Body: `{"role":"admin"}`
pub async fn change_role<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path((id, user_id)): Path<(Uuid, Uuid)>,
  Json(body): Json<RoleBody>,
) -> Result<Json<MemberView>, ApiError> {
  let member = svc
    .workspaces
    .change_role(actor.external_id, id, user_id, &body.role)
    .await?;
  Ok(Json(member))
}

/// `DELETE /workspaces/{id}/members/{user_id}`
pub async fn remove_member<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
  svc
    .workspaces
    .remove_member(actor.external_id, id, user_id)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}
