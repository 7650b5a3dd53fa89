//! Handlers for the global `/statuses` vocabulary. Any authenticated caller
//! may use them.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use nexboard_core::{
  status::{StatusInput, StatusView},
  store::TrackerStore,
};
use uuid::Uuid;

use crate::{
  Actor, ApiError, Svc,
  extract::{Json, Path},
};

/// `GET /statuses`, ordered by position.
pub async fn list<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
) -> Result<Json<Vec<StatusView>>, ApiError> {
  Ok(Json(svc.statuses.list(actor.external_id).await?))
}

/// `POST /statuses`. Body: `{"name":"Done","color":"#0f0","position":3}`
pub async fn create<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Json(body): Json<StatusInput>,
) -> Result<impl IntoResponse, ApiError> {
  let status = svc.statuses.create(actor.external_id, body).await?;
  Ok((StatusCode::CREATED, Json(status)))
}

/// `GET /statuses/{id}`
pub async fn get_one<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<Json<StatusView>, ApiError> {
  Ok(Json(svc.statuses.get(actor.external_id, id).await?))
}

/// `PUT /statuses/{id}`
pub async fn update<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusInput>,
) -> Result<Json<StatusView>, ApiError> {
  Ok(Json(svc.statuses.update(actor.external_id, id, body).await?))
}

/// `DELETE /statuses/{id}`. Answers 409 while tasks still use the status.
pub async fn delete<S: TrackerStore>(
  State(svc): Svc<S>,
  actor: Actor,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  svc.statuses.delete(actor.external_id, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
