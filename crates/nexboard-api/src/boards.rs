//! Handlers for boards. Every route needs membership in the board's
//! workspace.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use nexboard_core::{board::BoardView, store::TrackerStore, workspace::Details};
use uuid::Uuid;

use crate::{
  Actor, ApiError, Svc,
  extract::{Json, Path},
};

/// `GET /workspaces/{id}/boards`
pub async fn list<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(workspace): Path<Uuid>,
) -> Result<Json<Vec<BoardView>>, ApiError> {
  Ok(Json(svc.boards.list(actor.external_id, workspace).await?))
}

/// `POST /workspaces/{id}/boards`. Body: `{"name":"…","description":"…"}`
pub async fn create<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(workspace): Path<Uuid>,
  Json(body): Json<Details>,
) -> Result<impl IntoResponse, ApiError> {
  let board = svc.boards.create(actor.external_id, workspace, body).await?;
  Ok((StatusCode::CREATED, Json(board)))
}

/// `GET /boards/{id}`
pub async fn get_one<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<Json<BoardView>, ApiError> {
  Ok(Json(svc.boards.get(actor.external_id, id).await?))
}

/// `PUT /boards/{id}`
pub async fn update<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
  Json(body): Json<Details>,
) -> Result<Json<BoardView>, ApiError> {
  Ok(Json(svc.boards.update(actor.external_id, id, body).await?))
}

/// `DELETE /boards/{id}`
pub async fn delete<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  svc.boards.delete(actor.external_id, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
