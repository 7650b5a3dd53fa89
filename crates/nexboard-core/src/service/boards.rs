//! Board lifecycle. Every operation needs membership in the governing
//! workspace, deletion included.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Result,
  access::{AccessPolicy, Capability},
  board::{BoardView, NewBoard},
  error::require_text,
  ids::IdGenerator,
  store::TrackerStore,
  workspace::Details,
};

pub struct BoardService<S> {
  store:  Arc<S>,
  policy: Arc<AccessPolicy<S>>,
  ids:    Arc<dyn IdGenerator>,
}

impl<S: TrackerStore> BoardService<S> {
  pub fn new(
    store: Arc<S>,
    policy: Arc<AccessPolicy<S>>,
    ids: Arc<dyn IdGenerator>,
  ) -> Self {
    Self { store, policy, ids }
  }

  pub async fn create(
    &self,
    actor: Uuid,
    workspace: Uuid,
    details: Details,
  ) -> Result<BoardView> {
    let grant = self
      .policy
      .workspace(actor, workspace, Capability::IsMember)
      .await?;
    require_text("name", &details.name)?;

    let input = NewBoard {
      external_id:  self.ids.next_id(),
      workspace_id: grant.workspace.id,
      created_by:   grant.actor.id,
      name:         details.name.trim().to_owned(),
      description:  details.description,
    };
    let board = self.store.create_board(input).await.map_err(Into::into)?;
    tracing::info!(board = %board.external_id, workspace = %workspace, "created board");
    Ok(board.view())
  }

  pub async fn list(&self, actor: Uuid, workspace: Uuid) -> Result<Vec<BoardView>> {
    let grant = self
      .policy
      .workspace(actor, workspace, Capability::IsMember)
      .await?;
    let boards = self
      .store
      .boards_in_workspace(grant.workspace.id)
      .await
      .map_err(Into::into)?;
    Ok(boards.iter().map(|b| b.view()).collect())
  }

  pub async fn get(&self, actor: Uuid, board: Uuid) -> Result<BoardView> {
    let (_, board) = self.policy.board(actor, board, Capability::IsMember).await?;
    Ok(board.view())
  }

  pub async fn update(
    &self,
    actor: Uuid,
    board: Uuid,
    details: Details,
  ) -> Result<BoardView> {
    let (_, board) = self.policy.board(actor, board, Capability::IsMember).await?;
    require_text("name", &details.name)?;

    let details = Details { name: details.name.trim().to_owned(), ..details };
    let updated = self
      .store
      .update_board(board.id, details)
      .await
      .map_err(Into::into)?;
    tracing::info!(board = %updated.external_id, "updated board");
    Ok(updated.view())
  }

  /// Delete a board and its tasks.
  pub async fn delete(&self, actor: Uuid, board: Uuid) -> Result<()> {
    let (_, record) =
      self.policy.board(actor, board, Capability::IsMember).await?;
    self.store.delete_board(record.id).await.map_err(Into::into)?;
    tracing::info!(board = %board, "deleted board");
    Ok(())
  }
}
