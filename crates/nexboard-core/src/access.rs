//! The access policy evaluator.
//!
//! Every permission decision in the system is made here. The evaluator always
//! walks a resource up to its governing workspace (task → board → workspace)
//! and decides on the actor's workspace role; there are no board- or
//! task-scoped roles.
//!
//! Resolution and authorization are separate phases. A missing actor or
//! resource is `NotFound`; an actor without the required capability is
//! `Unauthorized`. The two are never conflated.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  board::BoardRecord,
  membership::{MembershipTable, Role},
  resolve::Resolver,
  store::TrackerStore,
  task::TaskRecord,
  user::UserRecord,
  workspace::WorkspaceRecord,
};

// ─── Capabilities ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
  /// Any membership row.
  IsMember,
  /// Role `owner` or `admin`.
  IsOwnerOrAdmin,
  /// The workspace's recorded owner.
  IsOwner,
}

impl Capability {
  /// Decide on an existing membership.
  ///
  /// `IsOwner` is checked against the workspace's canonical owner field, not
  /// the role column, so `is_recorded_owner` is passed separately.
  pub fn permits(self, role: Role, is_recorded_owner: bool) -> bool {
    match self {
      Self::IsMember => true,
      Self::IsOwnerOrAdmin => matches!(role, Role::Owner | Role::Admin),
      Self::IsOwner => is_recorded_owner,
    }
  }

  fn denial(self) -> &'static str {
    match self {
      Self::IsMember => "not a member of this workspace",
      Self::IsOwnerOrAdmin => "only the workspace owner or an admin may do this",
      Self::IsOwner => "only the workspace owner may do this",
    }
  }
}

// ─── Requests and decisions ──────────────────────────────────────────────────

/// A resource named by external id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRef {
  Workspace(Uuid),
  Board(Uuid),
  Task(Uuid),
}

/// Proof that `actor` holds a capability on `workspace`.
#[derive(Debug, Clone)]
pub struct Grant {
  pub actor:     UserRecord,
  pub workspace: WorkspaceRecord,
  pub role:      Role,
}

/// The records resolved on the way up to the governing workspace.
#[derive(Debug, Clone)]
pub enum Target {
  Workspace,
  Board(BoardRecord),
  Task { task: TaskRecord, board: BoardRecord },
}

#[derive(Debug, Clone)]
pub struct Decision {
  pub grant:  Grant,
  pub target: Target,
}

// ─── Evaluator ───────────────────────────────────────────────────────────────

pub struct AccessPolicy<S> {
  resolver: Resolver<S>,
  members:  MembershipTable<S>,
}

impl<S: TrackerStore> AccessPolicy<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      resolver: Resolver::new(store.clone()),
      members:  MembershipTable::new(store),
    }
  }

  pub fn resolver(&self) -> &Resolver<S> { &self.resolver }

  /// `Authorize(actor, resource, capability)`.
  pub async fn authorize(
    &self,
    actor: Uuid,
    resource: ResourceRef,
    required: Capability,
  ) -> Result<Decision> {
    match resource {
      ResourceRef::Workspace(id) => {
        let grant = self.workspace(actor, id, required).await?;
        Ok(Decision { grant, target: Target::Workspace })
      }
      ResourceRef::Board(id) => {
        let (grant, board) = self.board(actor, id, required).await?;
        Ok(Decision { grant, target: Target::Board(board) })
      }
      ResourceRef::Task(id) => {
        let (grant, board, task) = self.task(actor, id, required).await?;
        Ok(Decision { grant, target: Target::Task { task, board } })
      }
    }
  }

  pub async fn workspace(
    &self,
    actor: Uuid,
    workspace: Uuid,
    required: Capability,
  ) -> Result<Grant> {
    let actor = self.resolver.user(actor).await?;
    let workspace = self.resolver.workspace(workspace).await?;
    self.decide(actor, workspace, required).await
  }

  pub async fn board(
    &self,
    actor: Uuid,
    board: Uuid,
    required: Capability,
  ) -> Result<(Grant, BoardRecord)> {
    let actor = self.resolver.user(actor).await?;
    let board = self.resolver.board(board).await?;
    let workspace = self.resolver.workspace_by_id(board.workspace_id).await?;
    let grant = self.decide(actor, workspace, required).await?;
    Ok((grant, board))
  }

  pub async fn task(
    &self,
    actor: Uuid,
    task: Uuid,
    required: Capability,
  ) -> Result<(Grant, BoardRecord, TaskRecord)> {
    let actor = self.resolver.user(actor).await?;
    let task = self.resolver.task(task).await?;
    let board = self.resolver.board_by_id(task.board_id).await?;
    let workspace = self.resolver.workspace_by_id(board.workspace_id).await?;
    let grant = self.decide(actor, workspace, required).await?;
    Ok((grant, board, task))
  }

  /// Whether `user` holds `required` on `workspace`, without failing on a
  /// denial. Used to vet third parties such as task assignees.
  pub async fn holds(
    &self,
    user: &UserRecord,
    workspace: &WorkspaceRecord,
    required: Capability,
  ) -> Result<bool> {
    match self.members.role_of(workspace.id, user.id).await {
      Ok(role) => Ok(required.permits(role, user.id == workspace.owner_id)),
      Err(Error::NotFound(_)) => Ok(false),
      Err(e) => Err(e),
    }
  }

  async fn decide(
    &self,
    actor: UserRecord,
    workspace: WorkspaceRecord,
    required: Capability,
  ) -> Result<Grant> {
    let role = match self.members.role_of(workspace.id, actor.id).await {
      Ok(role) => role,
      Err(Error::NotFound(_)) => {
        tracing::debug!(
          actor = %actor.external_id,
          workspace = %workspace.external_id,
          ?required,
          "access denied: no membership"
        );
        return Err(Error::Unauthorized(Capability::IsMember.denial().into()));
      }
      Err(e) => return Err(e),
    };

    if !required.permits(role, actor.id == workspace.owner_id) {
      tracing::debug!(
        actor = %actor.external_id,
        workspace = %workspace.external_id,
        %role,
        ?required,
        "access denied: insufficient role"
      );
      return Err(Error::Unauthorized(required.denial().into()));
    }

    Ok(Grant { actor, workspace, role })
  }
}
