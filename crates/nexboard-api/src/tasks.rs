//! Handlers for tasks.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/boards/{id}/tasks` | by status position, then task position |
//! | `POST`   | `/boards/{id}/tasks` | appended to the bottom of its column |
//! | `GET`    | `/tasks/{id}` | |
//! | `PUT`    | `/tasks/{id}` | full replacement; empty priority keeps the old one |
//! | `DELETE` | `/tasks/{id}` | |
//! | `PATCH`  | `/tasks/{id}/status` | Body: `{"status_external_id":"…"}` |
//! | `PATCH`  | `/tasks/{id}/assign` | Body: `{"assigned_to_external_id":"…"\|null}` |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use nexboard_core::{
  store::TrackerStore,
  task::{TaskInput, TaskView},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Actor, ApiError, Svc,
  extract::{Json, Path},
};

/// `GET /boards/{id}/tasks`
pub async fn list<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(board): Path<Uuid>,
) -> Result<Json<Vec<TaskView>>, ApiError> {
  Ok(Json(svc.tasks.list(actor.external_id, board).await?))
}

/// `POST /boards/{id}/tasks`
pub async fn create<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(board): Path<Uuid>,
  Json(body): Json<TaskInput>,
) -> Result<impl IntoResponse, ApiError> {
  let task = svc.tasks.create(actor.external_id, board, body).await?;
  Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /tasks/{id}`
pub async fn get_one<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<Json<TaskView>, ApiError> {
  Ok(Json(svc.tasks.get(actor.external_id, id).await?))
}

/// `PUT /tasks/{id}`
pub async fn update<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
  Json(body): Json<TaskInput>,
) -> Result<Json<TaskView>, ApiError> {
  Ok(Json(svc.tasks.update(actor.external_id, id, body).await?))
}

/// `DELETE /tasks/{id}`
pub async fn delete<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  svc.tasks.delete(actor.external_id, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct MoveBody {
  pub status_external_id: Uuid,
}

/// `PATCH /tasks/{id}/status`
pub async fn move_status<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
  Json(body): Json<MoveBody>,
) -> Result<Json<TaskView>, ApiError> {
  let task = svc
    .tasks
    .move_status(actor.external_id, id, body.status_external_id)
    .await?;
  Ok(Json(task))
}

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  /// `null` or absent unassigns.
  #[serde(default)]
  pub assigned_to_external_id: Option<Uuid>,
}

/// `PATCH /tasks/{id}/assign`
pub async fn assign<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
  Json(body): Json<AssignBody>,
) -> Result<Json<TaskView>, ApiError> {
  let task = svc
    .tasks
    .assign(actor.external_id, id, body.assigned_to_external_id)
    .await?;
  Ok(Json(task))
}
