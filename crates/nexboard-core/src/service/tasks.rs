//! Task lifecycle.
//!
//! Creating, listing and reading tasks requires membership in the governing
//! workspace. Update, move, assign and delete only require that the actor and
//! task resolve. Whichever path sets an assignee, the assignee must be a
//! member of the task's workspace at that moment; membership is not
//! re-validated later.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  access::{AccessPolicy, Capability},
  error::require_text,
  ids::IdGenerator,
  store::TrackerStore,
  task::{NewTask, Priority, TaskInput, TaskRecord, TaskView},
  user::UserRecord,
  workspace::WorkspaceRecord,
};

pub struct TaskService<S> {
  store:  Arc<S>,
  policy: Arc<AccessPolicy<S>>,
  ids:    Arc<dyn IdGenerator>,
}

/// A task together with its governing workspace, resolved without any
/// capability check.
struct Located {
  task:      TaskRecord,
  workspace: WorkspaceRecord,
}

impl<S: TrackerStore> TaskService<S> {
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
    board: Uuid,
    input: TaskInput,
  ) -> Result<TaskView> {
    require_text("title", &input.title)?;
    let priority = Priority::resolve(input.priority.as_deref(), Priority::Low)?;

    let status = self.policy.resolver().status(input.status_external_id).await?;
    let assignee = self.assignee(input.assigned_to_external_id).await?;
    let (grant, board) =
      self.policy.board(actor, board, Capability::IsMember).await?;
    let assignee_id = self.vet_assignee(assignee, &grant.workspace).await?;

    let input = NewTask {
      external_id: self.ids.next_id(),
      board_id: board.id,
      status_id: status.id,
      assignee_id,
      created_by: grant.actor.id,
      title: input.title.trim().to_owned(),
      description: input.description,
      priority,
      due_date: input.due_date,
    };
    let task = self.store.create_task(input).await.map_err(Into::into)?;
    tracing::info!(task = %task.external_id, board = %board.external_id, "created task");
    Ok(task.view())
  }

  /// Tasks on a board, by status position then task position.
  pub async fn list(&self, actor: Uuid, board: Uuid) -> Result<Vec<TaskView>> {
    let (_, board) = self.policy.board(actor, board, Capability::IsMember).await?;
    let tasks = self
      .store
      .tasks_on_board(board.id)
      .await
      .map_err(Into::into)?;
    Ok(tasks.iter().map(|t| t.view()).collect())
  }

  pub async fn get(&self, actor: Uuid, task: Uuid) -> Result<TaskView> {
    let (_, _, task) = self.policy.task(actor, task, Capability::IsMember).await?;
    Ok(task.view())
  }

  /// Full replacement of title, description, due date, status and assignee.
  /// An empty or absent priority keeps the current one.
  pub async fn update(
    &self,
    actor: Uuid,
    task: Uuid,
    input: TaskInput,
  ) -> Result<TaskView> {
    let Located { task, workspace } = self.locate(actor, task).await?;
    let status = self.policy.resolver().status(input.status_external_id).await?;
    let assignee = self.assignee(input.assigned_to_external_id).await?;

    require_text("title", &input.title)?;
    let priority = Priority::resolve(input.priority.as_deref(), task.priority)?;
    let assignee_id = self.vet_assignee(assignee, &workspace).await?;

    let mut changes = task.changes();
    changes.status_id = status.id;
    changes.assignee_id = assignee_id;
    changes.title = input.title.trim().to_owned();
    changes.description = input.description;
    changes.priority = priority;
    changes.due_date = input.due_date;

    let updated = self
      .store
      .update_task(task.id, changes)
      .await
      .map_err(Into::into)?;
    tracing::info!(task = %updated.external_id, "updated task");
    Ok(updated.view())
  }

  /// Point the task at another status, leaving everything else alone. The
  /// task lands at the bottom of the new column.
  pub async fn move_status(
    &self,
    actor: Uuid,
    task: Uuid,
    status: Uuid,
  ) -> Result<TaskView> {
    let Located { task, .. } = self.locate(actor, task).await?;
    let status = self.policy.resolver().status(status).await?;

    let mut changes = task.changes();
    changes.status_id = status.id;
    let updated = self
      .store
      .update_task(task.id, changes)
      .await
      .map_err(Into::into)?;
    tracing::info!(task = %updated.external_id, status = %status.external_id, "moved task");
    Ok(updated.view())
  }

  /// Assign the task to `assignee`, or unassign it with `None`.
  pub async fn assign(
    &self,
    actor: Uuid,
    task: Uuid,
    assignee: Option<Uuid>,
  ) -> Result<TaskView> {
    let Located { task, workspace } = self.locate(actor, task).await?;
    let assignee = self.assignee(assignee).await?;
    let assignee_id = self.vet_assignee(assignee, &workspace).await?;

    let mut changes = task.changes();
    changes.assignee_id = assignee_id;
    let updated = self
      .store
      .update_task(task.id, changes)
      .await
      .map_err(Into::into)?;
    tracing::info!(
      task = %updated.external_id,
      assignee = ?updated.assignee.as_ref().map(|a| a.external_id),
      "assigned task"
    );
    Ok(updated.view())
  }

  pub async fn delete(&self, actor: Uuid, task: Uuid) -> Result<()> {
    let Located { task, .. } = self.locate(actor, task).await?;
    self.store.delete_task(task.id).await.map_err(Into::into)?;
    tracing::info!(task = %task.external_id, "deleted task");
    Ok(())
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  async fn locate(&self, actor: Uuid, task: Uuid) -> Result<Located> {
    let resolver = self.policy.resolver();
    resolver.user(actor).await?;
    let task = resolver.task(task).await?;
    let board = resolver.board_by_id(task.board_id).await?;
    let workspace = resolver.workspace_by_id(board.workspace_id).await?;
    Ok(Located { task, workspace })
  }

  async fn assignee(&self, user: Option<Uuid>) -> Result<Option<UserRecord>> {
    match user {
      Some(id) => Ok(Some(self.policy.resolver().user(id).await?)),
      None => Ok(None),
    }
  }

  /// The assignee must hold `IsMember` on the task's workspace.
  async fn vet_assignee(
    &self,
    assignee: Option<UserRecord>,
    workspace: &WorkspaceRecord,
  ) -> Result<Option<i64>> {
    let Some(user) = assignee else {
      return Ok(None);
    };
    if !self.policy.holds(&user, workspace, Capability::IsMember).await? {
      tracing::debug!(
        assignee = %user.external_id,
        workspace = %workspace.external_id,
        "refused assignment to non-member"
      );
      return Err(Error::InvalidArgument(
        "cannot assign task to a non-member".into(),
      ));
    }
    Ok(Some(user.id))
  }
}
