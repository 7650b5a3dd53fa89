//! Identity resolution: external id in, internal record out.
//!
//! Pure lookups with no side effects. A miss, or a row that is no longer
//! active, is always `NotFound`.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  board::BoardRecord,
  status::StatusRecord,
  store::TrackerStore,
  task::TaskRecord,
  user::UserRecord,
  workspace::WorkspaceRecord,
};

pub struct Resolver<S> {
  store: Arc<S>,
}

fn found<T, E: Into<Error>>(
  lookup: std::result::Result<Option<T>, E>,
  what: impl FnOnce() -> String,
) -> Result<T> {
  lookup
    .map_err(Into::into)?
    .ok_or_else(|| Error::NotFound(what()))
}

impl<S: TrackerStore> Resolver<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn user(&self, external_id: Uuid) -> Result<UserRecord> {
    found(self.store.user_by_external_id(external_id).await, || {
      format!("user {external_id} not found")
    })
  }

  pub async fn user_by_email(&self, email: &str) -> Result<UserRecord> {
    found(self.store.user_by_email(email.trim().to_owned()).await, || {
      "user not found".to_owned()
    })
  }

  pub async fn workspace(&self, external_id: Uuid) -> Result<WorkspaceRecord> {
    found(self.store.workspace_by_external_id(external_id).await, || {
      format!("workspace {external_id} not found")
    })
  }

  pub async fn workspace_by_id(&self, id: i64) -> Result<WorkspaceRecord> {
    found(self.store.workspace_by_id(id).await, || {
      "workspace not found".to_owned()
    })
  }

  pub async fn board(&self, external_id: Uuid) -> Result<BoardRecord> {
    found(self.store.board_by_external_id(external_id).await, || {
      format!("board {external_id} not found")
    })
  }

  pub async fn board_by_id(&self, id: i64) -> Result<BoardRecord> {
    found(self.store.board_by_id(id).await, || "board not found".to_owned())
  }

  pub async fn status(&self, external_id: Uuid) -> Result<StatusRecord> {
    found(self.store.status_by_external_id(external_id).await, || {
      format!("status {external_id} not found")
    })
  }

  pub async fn task(&self, external_id: Uuid) -> Result<TaskRecord> {
    found(self.store.task_by_external_id(external_id).await, || {
      format!("task {external_id} not found")
    })
  }
}
